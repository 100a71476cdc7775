// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    BUILDING_ID, OrderedRandom, create_test_actor, create_test_building, create_test_cause,
    participant, spot,
};
use crate::{
    AutoSkipGate, DrawOutcome, DrawSettings, LotteryEngine, LotteryResult, LotterySession,
    SessionCommand, SessionError, SessionStatus, SessionTransition, apply, build_session,
    draw_audit_event,
};
use parking_lottery_audit::AuditEvent;
use parking_lottery_domain::{DomainError, ParkingSpot, Participant, SpotStatus};
use time::OffsetDateTime;

const SESSION_ID: &str = "session_1767225600_0000abcd";

async fn drawn_session() -> LotterySession {
    let participants: Vec<Participant> = vec![participant("p-1"), participant("p-2")];
    let spots: Vec<ParkingSpot> = vec![spot("s-1", None), spot("s-2", None)];
    let mut engine: LotteryEngine<OrderedRandom, AutoSkipGate> =
        LotteryEngine::new(OrderedRandom, AutoSkipGate);
    let outcome: DrawOutcome = engine
        .run(&create_test_building(), &participants, &spots)
        .await
        .unwrap();

    LotterySession::from_outcome(
        SESSION_ID,
        outcome,
        DrawSettings::default(),
        OffsetDateTime::UNIX_EPOCH,
    )
}

fn reassign(result_id: &str, spot_id: &str) -> SessionCommand {
    SessionCommand::ReassignSpot {
        result_id: result_id.to_string(),
        spot: spot(spot_id, None),
    }
}

fn apply_ok(session: &LotterySession, command: SessionCommand) -> SessionTransition {
    apply(session, command, create_test_actor(), create_test_cause()).unwrap()
}

#[tokio::test]
async fn test_session_renumbers_results_and_completes() {
    let session: LotterySession = drawn_session().await;

    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.building_id, BUILDING_ID);
    let ids: Vec<&str> = session.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "session_1767225600_0000abcd-1",
            "session_1767225600_0000abcd-2"
        ]
    );
}

#[tokio::test]
async fn test_build_session_generates_session_id() {
    let mut engine: LotteryEngine<OrderedRandom, AutoSkipGate> =
        LotteryEngine::new(OrderedRandom, AutoSkipGate);
    let outcome: DrawOutcome = engine
        .run(
            &create_test_building(),
            &[participant("p-1")],
            &[spot("s-1", None)],
        )
        .await
        .unwrap();

    let session: LotterySession = build_session(
        outcome,
        DrawSettings {
            seed: Some(5),
            ..DrawSettings::default()
        },
    );

    assert!(session.id.starts_with("session_"));
    assert_eq!(session.id.split('_').count(), 3);
    assert_eq!(session.results[0].id, format!("{}-1", session.id));
    assert_eq!(session.settings.seed, Some(5));
}

#[tokio::test]
async fn test_draw_audit_event_is_scoped_to_session() {
    let session: LotterySession = drawn_session().await;

    let event: AuditEvent = draw_audit_event(&session, create_test_actor(), create_test_cause());

    assert_eq!(event.action.name, "RunDraw");
    assert_eq!(event.scope.session_id.as_deref(), Some(SESSION_ID));
    assert!(event.after.data.contains("results=2"));
    assert!(event.before.data.contains("results=0"));
}

#[tokio::test]
async fn test_reassign_moves_result_to_free_spot() {
    let session: LotterySession = drawn_session().await;
    let result_id: String = session.results[0].id.clone();

    let transition: SessionTransition = apply_ok(&session, reassign(&result_id, "s-3"));

    let edited: &LotteryResult = transition.new_session.result(&result_id).unwrap();
    assert_eq!(edited.parking_spot_id, "s-3");
    assert_eq!(edited.spot_snapshot.id, "s-3");
    assert_eq!(edited.participant_snapshot, session.results[0].participant_snapshot);
    assert_eq!(transition.audit_event.action.name, "ReassignSpot");
    assert!(transition.audit_event.before.data.contains("parking_spot_id=s-1"));
    assert!(transition.audit_event.after.data.contains("parking_spot_id=s-3"));
    // The input session is untouched.
    assert_eq!(session.results[0].parking_spot_id, "s-1");
}

#[tokio::test]
async fn test_reassign_back_restores_original_session() {
    let session: LotterySession = drawn_session().await;
    let result_id: String = session.results[0].id.clone();

    let moved: SessionTransition = apply_ok(&session, reassign(&result_id, "s-3"));
    let back: SessionTransition = apply_ok(&moved.new_session, reassign(&result_id, "s-1"));

    assert_eq!(back.new_session, session);
}

#[tokio::test]
async fn test_reassign_to_held_spot_is_rejected() {
    let session: LotterySession = drawn_session().await;
    let result_id: String = session.results[0].id.clone();
    let holder_id: String = session.results[1].id.clone();

    let err: SessionError = apply(
        &session,
        reassign(&result_id, "s-2"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        SessionError::SpotAlreadyAssigned {
            spot_id: String::from("s-2"),
            result_id: holder_id,
        }
    );
}

#[tokio::test]
async fn test_reassign_to_occupied_or_reserved_spot_is_rejected() {
    let session: LotterySession = drawn_session().await;
    let result_id: String = session.results[0].id.clone();

    for status in [SpotStatus::Occupied, SpotStatus::Reserved] {
        let mut taken: ParkingSpot = spot("s-3", None);
        taken.status = status;

        let err: SessionError = apply(
            &session,
            SessionCommand::ReassignSpot {
                result_id: result_id.clone(),
                spot: taken,
            },
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SessionError::SpotUnavailable {
                spot_id: String::from("s-3"),
                status,
            }
        );
    }
}

#[tokio::test]
async fn test_reassign_accepts_available_spot_outside_drawn_pool() {
    let session: LotterySession = drawn_session().await;
    assert!(!session.spot_ids.contains(&String::from("s-3")));

    let transition: SessionTransition =
        apply_ok(&session, reassign(&session.results[1].id, "s-3"));

    assert!(transition.new_session.holder_of("s-3").is_some());
    assert!(transition.new_session.holder_of("s-2").is_none());
}

#[tokio::test]
async fn test_reassign_to_same_spot_is_no_change() {
    let session: LotterySession = drawn_session().await;
    let result_id: String = session.results[0].id.clone();

    let err: SessionError = apply(
        &session,
        reassign(&result_id, "s-1"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, SessionError::NoChange { .. }));
}

#[tokio::test]
async fn test_reassign_to_other_building_is_rejected() {
    let session: LotterySession = drawn_session().await;
    let mut foreign: ParkingSpot = spot("s-9", None);
    foreign.building_id = String::from("building-2");

    let err: SessionError = apply(
        &session,
        SessionCommand::ReassignSpot {
            result_id: session.results[0].id.clone(),
            spot: foreign,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        SessionError::DomainViolation(DomainError::BuildingMismatch { .. })
    ));
}

#[tokio::test]
async fn test_unknown_result_is_rejected() {
    let session: LotterySession = drawn_session().await;

    let err: SessionError = apply(
        &session,
        SessionCommand::RevokeResult {
            result_id: String::from("missing"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(err, SessionError::ResultNotFound(String::from("missing")));
}

#[tokio::test]
async fn test_revoke_then_restore_is_a_round_trip() {
    let session: LotterySession = drawn_session().await;
    let revoked: LotteryResult = session.results[0].clone();

    let after_revoke: SessionTransition = apply_ok(
        &session,
        SessionCommand::RevokeResult {
            result_id: revoked.id.clone(),
        },
    );
    assert_eq!(after_revoke.new_session.results.len(), 1);
    assert!(after_revoke.new_session.holder_of("s-1").is_none());

    let after_restore: SessionTransition = apply_ok(
        &after_revoke.new_session,
        SessionCommand::RestoreResult { result: revoked },
    );

    assert_eq!(after_restore.new_session, session);
    assert_eq!(after_restore.audit_event.action.name, "RestoreResult");
}

#[tokio::test]
async fn test_restore_of_present_result_is_rejected() {
    let session: LotterySession = drawn_session().await;
    let present: LotteryResult = session.results[0].clone();
    let present_id: String = present.id.clone();

    let err: SessionError = apply(
        &session,
        SessionCommand::RestoreResult { result: present },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(err, SessionError::DuplicateResultId(present_id));
}

#[tokio::test]
async fn test_commands_require_completed_session() {
    let mut session: LotterySession = drawn_session().await;
    session.status = SessionStatus::Running;

    let err: SessionError = apply(
        &session,
        SessionCommand::RevokeResult {
            result_id: session.results[0].id.clone(),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, SessionError::SessionNotCompleted { .. }));
}

#[tokio::test]
async fn test_session_serializes_with_camel_case_keys() {
    let session: LotterySession = drawn_session().await;

    let value: serde_json::Value = serde_json::to_value(&session).unwrap();

    assert_eq!(value["buildingId"], BUILDING_ID);
    assert_eq!(value["status"], "completed");
    assert_eq!(value["createdAt"], "1970-01-01T00:00:00Z");
    assert_eq!(value["results"][0]["allocation"], "single-sector");
    assert_eq!(value["results"][0]["matchLevel"], "strict");
    let parsed: LotterySession = serde_json::from_value(value).unwrap();
    assert_eq!(parsed.results.len(), session.results.len());
}
