// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::SessionCommand;
use crate::error::SessionError;
use crate::result::LotteryResult;
use crate::session::{LotterySession, SessionStatus, SessionTransition};
use parking_lottery_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use parking_lottery_domain::{DomainError, ParkingSpot, SpotStatus, validate_spot_fields};
use tracing::info;

/// Applies a command to a completed session, producing a new session and
/// audit event.
///
/// The input session is never modified. Every successful command yields
/// exactly one audit event.
///
/// # Arguments
///
/// * `session` - The current session (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The session is not completed
/// - The addressed result does not exist (or already exists, for a restore)
/// - The target spot is not available, is held by another result or belongs
///   to another building
/// - The command would change nothing
pub fn apply(
    session: &LotterySession,
    command: SessionCommand,
    actor: Actor,
    cause: Cause,
) -> Result<SessionTransition, SessionError> {
    if session.status != SessionStatus::Completed {
        return Err(SessionError::SessionNotCompleted {
            session_id: session.id.clone(),
        });
    }

    let name: &'static str = command.name();
    let mut new_session: LotterySession = session.clone();

    let (before, after, details) = match command {
        SessionCommand::ReassignSpot { result_id, spot } => {
            reassign(&mut new_session, &result_id, spot)?
        }
        SessionCommand::RevokeResult { result_id } => revoke(&mut new_session, &result_id)?,
        SessionCommand::RestoreResult { result } => restore(&mut new_session, result)?,
    };

    info!(session_id = %session.id, command = name, %details, "Applied session command");

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(name), Some(details)),
        before,
        after,
        AuditScope::session(&session.building_id, &session.id),
    );

    Ok(SessionTransition {
        new_session,
        audit_event,
    })
}

fn result_snapshot(result: Option<&LotteryResult>, result_id: &str) -> StateSnapshot {
    StateSnapshot::new(result.map_or_else(
        || format!("result_id={result_id},present=false"),
        |result| {
            format!(
                "result_id={},participant_id={},parking_spot_id={}",
                result.id, result.participant_id, result.parking_spot_id
            )
        },
    ))
}

fn reassign(
    session: &mut LotterySession,
    result_id: &str,
    spot: ParkingSpot,
) -> Result<(StateSnapshot, StateSnapshot, String), SessionError> {
    validate_spot_fields(&spot)?;
    if spot.building_id != session.building_id {
        return Err(SessionError::DomainViolation(DomainError::BuildingMismatch {
            entity_id: spot.id,
            expected: session.building_id.clone(),
            found: spot.building_id,
        }));
    }

    let current: &LotteryResult = session
        .result(result_id)
        .ok_or_else(|| SessionError::ResultNotFound(result_id.to_string()))?;
    if current.parking_spot_id == spot.id {
        return Err(SessionError::NoChange {
            result_id: result_id.to_string(),
        });
    }
    // Spots outside the drawn pool are fine as long as they are free.
    if spot.status != SpotStatus::Available {
        return Err(SessionError::SpotUnavailable {
            spot_id: spot.id,
            status: spot.status,
        });
    }
    if let Some(holder) = session.holder_of(&spot.id) {
        return Err(SessionError::SpotAlreadyAssigned {
            spot_id: spot.id,
            result_id: holder.id.clone(),
        });
    }
    let before: StateSnapshot = result_snapshot(Some(current), result_id);
    let previous_spot_id: String = current.parking_spot_id.clone();

    let Some(result) = session.results.iter_mut().find(|r| r.id == result_id) else {
        return Err(SessionError::ResultNotFound(result_id.to_string()));
    };
    result.parking_spot_id.clone_from(&spot.id);
    result.spot_snapshot = spot;

    let after: StateSnapshot = result_snapshot(Some(result), result_id);
    let details: String = format!(
        "Reassigned result {result_id} from spot {previous_spot_id} to {}",
        result.parking_spot_id
    );
    Ok((before, after, details))
}

fn revoke(
    session: &mut LotterySession,
    result_id: &str,
) -> Result<(StateSnapshot, StateSnapshot, String), SessionError> {
    let index: usize = session
        .results
        .iter()
        .position(|result| result.id == result_id)
        .ok_or_else(|| SessionError::ResultNotFound(result_id.to_string()))?;

    let removed: LotteryResult = session.results.remove(index);
    let before: StateSnapshot = result_snapshot(Some(&removed), result_id);
    let after: StateSnapshot = result_snapshot(None, result_id);
    let details: String = format!(
        "Revoked spot {} from participant {}",
        removed.parking_spot_id, removed.participant_id
    );
    Ok((before, after, details))
}

fn restore(
    session: &mut LotterySession,
    result: LotteryResult,
) -> Result<(StateSnapshot, StateSnapshot, String), SessionError> {
    if session.result(&result.id).is_some() {
        return Err(SessionError::DuplicateResultId(result.id));
    }
    if let Some(holder) = session.holder_of(&result.parking_spot_id) {
        return Err(SessionError::SpotAlreadyAssigned {
            spot_id: result.parking_spot_id,
            result_id: holder.id.clone(),
        });
    }
    if !session.participant_ids.contains(&result.participant_id) {
        return Err(SessionError::DomainViolation(
            DomainError::InvalidParticipant {
                participant_id: result.participant_id,
                reason: format!("not part of session '{}'", session.id),
            },
        ));
    }

    let before: StateSnapshot = result_snapshot(None, &result.id);
    let after: StateSnapshot = result_snapshot(Some(&result), &result.id);
    let details: String = format!(
        "Restored spot {} to participant {}",
        result.parking_spot_id, result.participant_id
    );

    // Back into draw order so a revoke followed by a restore is a no-op.
    let sequence: Option<u64> = sequence_of(&result.id);
    let position: usize = session
        .results
        .iter()
        .position(|existing| {
            sequence.is_some_and(|n| sequence_of(&existing.id).is_some_and(|m| m > n))
        })
        .unwrap_or(session.results.len());
    session.results.insert(position, result);

    Ok((before, after, details))
}

/// The `n` of a `{sessionId}-{n}` result id.
fn sequence_of(result_id: &str) -> Option<u64> {
    result_id
        .rsplit_once('-')
        .and_then(|(_, n)| n.parse::<u64>().ok())
}
