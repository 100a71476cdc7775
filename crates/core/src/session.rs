// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::result::{AllocationShortfall, DrawOutcome, LotteryResult};
use parking_lottery_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

/// Lifecycle of a lottery session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Pending,
    Running,
    Completed,
}

impl SessionStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }
}

/// Settings a draw ran with. Recorded on the session for reference only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawSettings {
    /// Seed of the random source, when the draw was seeded.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Manual selection timeout; `None` waits indefinitely.
    #[serde(default)]
    pub gate_timeout_secs: Option<u64>,
    /// Tenant tag used when publishing.
    #[serde(default)]
    pub company_tag: Option<String>,
}

/// One completed draw for one building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotterySession {
    pub id: String,
    pub building_id: String,
    pub participant_ids: Vec<String>,
    pub spot_ids: Vec<String>,
    /// Assignments in draw order.
    pub results: Vec<LotteryResult>,
    #[serde(default)]
    pub shortfalls: Vec<AllocationShortfall>,
    pub status: SessionStatus,
    #[serde(default)]
    pub settings: DrawSettings,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl LotterySession {
    /// Packages an engine outcome under the given session id.
    ///
    /// Result ids become `{id}-{n}`, numbered from 1 in draw order.
    #[must_use]
    pub fn from_outcome(
        id: &str,
        outcome: DrawOutcome,
        settings: DrawSettings,
        created_at: OffsetDateTime,
    ) -> Self {
        let results: Vec<LotteryResult> = outcome
            .results
            .into_iter()
            .enumerate()
            .map(|(n, mut result)| {
                result.id = format!("{id}-{}", n + 1);
                result
            })
            .collect();

        Self {
            id: id.to_string(),
            building_id: outcome.building_id,
            participant_ids: outcome.participant_ids,
            spot_ids: outcome.spot_ids,
            results,
            shortfalls: outcome.shortfalls,
            status: SessionStatus::Completed,
            settings,
            created_at,
        }
    }

    /// Looks up a result by id.
    #[must_use]
    pub fn result(&self, result_id: &str) -> Option<&LotteryResult> {
        self.results.iter().find(|result| result.id == result_id)
    }

    /// Returns the result currently holding `spot_id`, if any.
    #[must_use]
    pub fn holder_of(&self, spot_id: &str) -> Option<&LotteryResult> {
        self.results
            .iter()
            .find(|result| result.parking_spot_id == spot_id)
    }

    /// Compact rendering used for audit snapshots.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "session_id={},status={},results={},shortfalls={}",
            self.id,
            self.status.as_str(),
            self.results.len(),
            self.shortfalls.len()
        ))
    }
}

/// The outcome of applying a session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTransition {
    /// The session after the command.
    pub new_session: LotterySession,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// Builds a completed session from a finished draw.
///
/// The id has the form `session_{unix_ts}_{random}`.
#[must_use]
pub fn build_session(outcome: DrawOutcome, settings: DrawSettings) -> LotterySession {
    let created_at: OffsetDateTime = OffsetDateTime::now_utc();
    let suffix: u32 = rand::random::<u32>();
    let id: String = format!("session_{}_{suffix:08x}", created_at.unix_timestamp());

    let session: LotterySession = LotterySession::from_outcome(&id, outcome, settings, created_at);
    info!(
        session_id = %session.id,
        building_id = %session.building_id,
        results = session.results.len(),
        "Built lottery session"
    );
    session
}

/// The audit event recording a completed draw.
#[must_use]
pub fn draw_audit_event(session: &LotterySession, actor: Actor, cause: Cause) -> AuditEvent {
    let before: StateSnapshot = StateSnapshot::new(format!(
        "session_id={},status={},results=0,shortfalls=0",
        session.id,
        SessionStatus::Pending.as_str()
    ));
    let action: Action = Action::new(
        String::from("RunDraw"),
        Some(format!(
            "Drew {} spots for {} participants ({} shortfalls)",
            session.results.len(),
            session.participant_ids.len(),
            session.shortfalls.len()
        )),
    );

    AuditEvent::new(
        actor,
        cause,
        action,
        before,
        session.to_snapshot(),
        AuditScope::session(&session.building_id, &session.id),
    )
}
