// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{BUILDING_ID, create_test_dataset, create_test_session};
use crate::{Dataset, EntityStore, MemoryStore, StoreError, StoreEvent, keys};
use parking_lottery::LotterySession;
use parking_lottery_domain::{Building, ParkingSpot, Participant};
use serde_json::json;

#[test]
fn test_dataset_entities_are_scoped_by_building() {
    let store: MemoryStore = MemoryStore::from_dataset(&create_test_dataset()).unwrap();

    let building: Building = store.building(BUILDING_ID).unwrap();
    let participants: Vec<Participant> = store.participants(BUILDING_ID).unwrap();
    let spots: Vec<ParkingSpot> = store.parking_spots(BUILDING_ID).unwrap();

    assert_eq!(building.name, "Residencial Aurora");
    let ids: Vec<&str> = participants.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p-1", "p-2"]);
    assert_eq!(spots.len(), 1);
    assert!(store.parking_spots("building-2").unwrap().is_empty());
}

#[test]
fn test_missing_building_is_not_found() {
    let store: MemoryStore = MemoryStore::new();

    assert_eq!(
        store.building("nowhere").unwrap_err(),
        StoreError::NotFound {
            kind: "building",
            id: String::from("nowhere"),
        }
    );
}

#[test]
fn test_undecodable_value_is_a_serialization_error() {
    let store: MemoryStore = MemoryStore::new();
    store
        .set(&keys::building(BUILDING_ID), json!({ "unexpected": true }))
        .unwrap();

    assert!(matches!(
        store.building(BUILDING_ID),
        Err(StoreError::SerializationError(_))
    ));
}

#[test]
fn test_dataset_parses_camel_case_document() {
    let dataset: Dataset = Dataset::from_json(
        r#"{
            "buildings": [{ "id": "b-1", "name": "Aurora" }],
            "participants": [{ "id": "p-1", "buildingId": "b-1", "name": "Maria", "isUpToDate": false }],
            "parkingSpots": [{ "id": "s-1", "buildingId": "b-1", "number": "7", "type": ["PcD"] }]
        }"#,
    )
    .unwrap();

    assert_eq!(dataset.participants[0].is_up_to_date, Some(false));
    assert_eq!(dataset.parking_spots[0].number, "7");
}

#[test]
fn test_malformed_dataset_is_rejected() {
    assert!(matches!(
        Dataset::from_json("{ not json"),
        Err(StoreError::InvalidDataset(_))
    ));
}

#[tokio::test]
async fn test_saved_session_reads_back() {
    let store: MemoryStore = MemoryStore::new();
    let session: LotterySession = create_test_session().await;

    store.save_session(&session).unwrap();

    assert_eq!(store.session(&session.id).unwrap(), session);
}

#[tokio::test]
async fn test_subscribers_observe_set() {
    let store: MemoryStore = MemoryStore::new();
    let mut events = store.subscribe();

    store.set("buildings/b-1", json!({ "id": "b-1" })).unwrap();

    let event: StoreEvent = events.recv().await.unwrap();
    assert_eq!(event.key, "buildings/b-1");
    assert_eq!(store.get("buildings/b-1").unwrap(), Some(json!({ "id": "b-1" })));
}
