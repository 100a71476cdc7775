// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Public read-only projection of a completed session.
//!
//! Publishing never affects the session itself. A failed publish is reported
//! through [`PublishOutcome`] and can simply be retried.

use crate::memory::MemoryStore;
use crate::store::keys;
use parking_lottery::{AllocationTag, LotterySession};
use parking_lottery_domain::{ParkingSpot, Participant, PriorityTier};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Result of a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishOutcome {
    #[must_use]
    pub const fn published() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// One published assignment, denormalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicEntry {
    pub participant_label: String,
    pub spot_number: String,
    pub floor: String,
    pub sector: Option<String>,
    pub allocation: AllocationTag,
    pub priority: PriorityTier,
}

/// What residents see of a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSnapshot {
    pub session_id: String,
    pub building_id: String,
    pub building_name: String,
    pub company_tag: String,
    #[serde(with = "time::serde::rfc3339")]
    pub drawn_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub participant_count: usize,
    pub spot_count: usize,
    /// Assignments in draw order.
    pub entries: Vec<PublicEntry>,
    /// Labels of participants that received no spot.
    pub unserved: Vec<String>,
    /// Numbers of drawn spots nobody received.
    pub unassigned_spots: Vec<String>,
}

impl PublicSnapshot {
    /// Denormalizes a session.
    ///
    /// Entries come from the frozen result snapshots. Counts follow the
    /// session's drawn pool; `participants` and `spots` only supply labels
    /// and numbers for those left over.
    #[must_use]
    pub fn from_session(
        session: &LotterySession,
        building_name: &str,
        participants: &[Participant],
        spots: &[ParkingSpot],
        company_tag: &str,
        published_at: OffsetDateTime,
    ) -> Self {
        let entries: Vec<PublicEntry> = session
            .results
            .iter()
            .map(|result| PublicEntry {
                participant_label: result.participant_snapshot.label(),
                spot_number: result.spot_snapshot.number.clone(),
                floor: result.spot_snapshot.floor.clone(),
                sector: result.spot_snapshot.sector.clone(),
                allocation: result.allocation,
                priority: result.priority,
            })
            .collect();

        let served: HashSet<&str> = session
            .results
            .iter()
            .map(|result| result.participant_id.as_str())
            .collect();
        let unserved: Vec<String> = participants
            .iter()
            .filter(|p| {
                session.participant_ids.contains(&p.id) && !served.contains(p.id.as_str())
            })
            .map(Participant::label)
            .collect();
        let unassigned_spots: Vec<String> = spots
            .iter()
            .filter(|spot| {
                session.spot_ids.contains(&spot.id) && session.holder_of(&spot.id).is_none()
            })
            .map(|spot| spot.number.clone())
            .collect();

        Self {
            session_id: session.id.clone(),
            building_id: session.building_id.clone(),
            building_name: building_name.to_string(),
            company_tag: company_tag.to_string(),
            drawn_at: session.created_at,
            published_at,
            participant_count: session.participant_ids.len(),
            spot_count: session.spot_ids.len(),
            entries,
            unserved,
            unassigned_spots,
        }
    }
}

/// Writes the public projection of a session somewhere residents can read it.
pub trait Publisher {
    /// Publishes a session. Failures are reported, never raised.
    fn publish(
        &self,
        session: &LotterySession,
        building_name: &str,
        participants: &[Participant],
        spots: &[ParkingSpot],
        company_tag: &str,
    ) -> PublishOutcome;
}

/// Publishes into a [`MemoryStore`] under `public/{companyTag}/{buildingId}`.
#[derive(Debug, Clone)]
pub struct StorePublisher {
    store: Arc<MemoryStore>,
}

impl StorePublisher {
    #[must_use]
    pub const fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl Publisher for StorePublisher {
    fn publish(
        &self,
        session: &LotterySession,
        building_name: &str,
        participants: &[Participant],
        spots: &[ParkingSpot],
        company_tag: &str,
    ) -> PublishOutcome {
        let company_tag: &str = company_tag.trim();
        if company_tag.is_empty() {
            warn!(session_id = %session.id, "Cannot publish without a company tag");
            return PublishOutcome::failed("company tag is required");
        }

        let snapshot: PublicSnapshot = PublicSnapshot::from_session(
            session,
            building_name,
            participants,
            spots,
            company_tag,
            OffsetDateTime::now_utc(),
        );
        let key: String = keys::public(company_tag, &session.building_id);

        match self.store.set_as(&key, &snapshot) {
            Ok(()) => {
                info!(
                    session_id = %session.id,
                    %key,
                    entries = snapshot.entries.len(),
                    "Published session"
                );
                PublishOutcome::published()
            }
            Err(err) => {
                warn!(session_id = %session.id, %key, error = %err, "Publishing failed");
                PublishOutcome::failed(err.to_string())
            }
        }
    }
}
