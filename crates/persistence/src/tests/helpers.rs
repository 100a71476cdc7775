// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Dataset;
use parking_lottery::{
    AutoSkipGate, DrawOutcome, DrawSettings, LotteryEngine, LotterySession, SeededRandom,
};
use parking_lottery_domain::{Building, ParkingSpot, Participant};
use time::OffsetDateTime;

pub const BUILDING_ID: &str = "building-1";

pub fn create_test_dataset() -> Dataset {
    let mut second: Participant = Participant::new("p-2", BUILDING_ID, "Joao");
    second.block = String::from("Bloco B");
    second.unit = String::from("204");

    Dataset {
        buildings: vec![
            Building::new(BUILDING_ID, "Residencial Aurora"),
            Building::new("building-2", "Edificio Horizonte"),
        ],
        participants: vec![
            Participant::new("p-1", BUILDING_ID, "Maria"),
            second,
            Participant::new("p-9", "building-2", "Ana"),
        ],
        parking_spots: vec![ParkingSpot::new("s-1", BUILDING_ID, "12")],
    }
}

/// Draws the test dataset: one spot for two participants.
pub async fn create_test_session() -> LotterySession {
    let dataset: Dataset = create_test_dataset();
    let participants: Vec<Participant> = dataset
        .participants
        .iter()
        .filter(|p| p.building_id == BUILDING_ID)
        .cloned()
        .collect();
    let mut engine: LotteryEngine<SeededRandom, AutoSkipGate> =
        LotteryEngine::new(SeededRandom::from_seed(1), AutoSkipGate);
    let outcome: DrawOutcome = engine
        .run(&dataset.buildings[0], &participants, &dataset.parking_spots)
        .await
        .unwrap();

    LotterySession::from_outcome(
        "session_1767225600_00000001",
        outcome,
        DrawSettings::default(),
        OffsetDateTime::UNIX_EPOCH,
    )
}
