// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use parking_lottery_domain::{ParkingSpot, Participant, PriorityTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// The five allocation stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Stage 1: PcD participants.
    Pcd,
    /// Stage 2: single-spot, sector-aware.
    SingleSector,
    /// Stage 3: double or linked spots, sector-aware.
    Linked,
    /// Stage 4: anyone still short of spots.
    Remainder,
    /// Stage 5: defaulters.
    Defaulter,
}

impl Stage {
    /// All stages in the order they run.
    pub const ORDER: [Self; 5] = [
        Self::Pcd,
        Self::SingleSector,
        Self::Linked,
        Self::Remainder,
        Self::Defaulter,
    ];

    /// 1-based stage number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Pcd => 1,
            Self::SingleSector => 2,
            Self::Linked => 3,
            Self::Remainder => 4,
            Self::Defaulter => 5,
        }
    }

    /// Converts this stage to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pcd => "pcd",
            Self::SingleSector => "single-sector",
            Self::Linked => "linked",
            Self::Remainder => "remainder",
            Self::Defaulter => "defaulter",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationTag {
    /// Automatic pick among PcD spots.
    PcdPriority,
    /// Human choice through the manual selection gate.
    PcdManualSelection,
    /// Stage 2 sector cascade.
    SingleSector,
    /// Stage 3 sector cascade.
    LinkedSector,
    /// Stage 4 random remainder.
    RandomRemainder,
    /// Stage 5 defaulter pick.
    Defaulter,
}

impl AllocationTag {
    /// Converts this tag to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PcdPriority => "pcd-priority",
            Self::PcdManualSelection => "pcd-manual-selection",
            Self::SingleSector => "single-sector",
            Self::LinkedSector => "linked-sector",
            Self::RandomRemainder => "random-remainder",
            Self::Defaulter => "defaulter",
        }
    }

    /// The stage that emits this tag.
    #[must_use]
    pub const fn stage(self) -> Stage {
        match self {
            Self::PcdPriority | Self::PcdManualSelection => Stage::Pcd,
            Self::SingleSector => Stage::SingleSector,
            Self::LinkedSector => Stage::Linked,
            Self::RandomRemainder => Stage::Remainder,
            Self::Defaulter => Stage::Defaulter,
        }
    }
}

impl std::fmt::Display for AllocationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How closely a result honours the participant's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchLevel {
    /// Sector order, coverage and floor preferences applied.
    Strict,
    /// Coverage preference dropped in the relaxation pass.
    CoverageRelaxed,
    /// Any remaining spot, sector ignored.
    AnySector,
    /// No preference filtering applies to this stage.
    Unfiltered,
}

impl MatchLevel {
    /// Converts this level to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::CoverageRelaxed => "coverage-relaxed",
            Self::AnySector => "any-sector",
            Self::Unfiltered => "unfiltered",
        }
    }
}

/// One (participant, spot) assignment.
///
/// Snapshots are frozen copies taken at assignment time; later edits to the
/// participant or spot never alter a historical result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotteryResult {
    /// Identifier, unique within the session.
    pub id: String,
    pub participant_id: String,
    pub parking_spot_id: String,
    /// Participant tier when the spot was assigned.
    pub priority: PriorityTier,
    pub allocation: AllocationTag,
    pub match_level: MatchLevel,
    pub participant_snapshot: Participant,
    pub spot_snapshot: ParkingSpot,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Why an iteration assigned no spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortfallReason {
    /// The pool had no candidate at any filtering level.
    NoSpotsRemaining,
    /// The operator chose to skip at the manual selection gate.
    ManualSkip,
    /// The manual selection gate timed out.
    GateTimedOut,
    /// The operator chose a spot that was not offered.
    InvalidManualChoice,
}

impl ShortfallReason {
    /// Converts this reason to its string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoSpotsRemaining => "no-spots-remaining",
            Self::ManualSkip => "manual-skip",
            Self::GateTimedOut => "gate-timed-out",
            Self::InvalidManualChoice => "invalid-manual-choice",
        }
    }
}

/// An iteration that ended without an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationShortfall {
    pub participant_id: String,
    pub stage: Stage,
    pub reason: ShortfallReason,
}

/// Aggregate figures for a finished draw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawSummary {
    pub results_by_tag: BTreeMap<AllocationTag, usize>,
    pub results_by_match_level: BTreeMap<MatchLevel, usize>,
    /// Participants that received every requested spot.
    pub fully_served: usize,
    /// Participants that received some but not all.
    pub partially_served: usize,
    /// Participants that received nothing.
    pub unserved: usize,
    /// Spots still in the pool after stage 5.
    pub spots_remaining: usize,
}

/// Everything a completed engine run produced, before it is packaged as a
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub building_id: String,
    /// Every participant considered, in input order.
    pub participant_ids: Vec<String>,
    /// Every available spot considered, in input order.
    pub spot_ids: Vec<String>,
    /// Assignments in the order they were made.
    pub results: Vec<LotteryResult>,
    pub shortfalls: Vec<AllocationShortfall>,
    pub summary: DrawSummary,
}

impl DrawOutcome {
    /// Returns the results for one participant, in assignment order.
    #[must_use]
    pub fn results_for(&self, participant_id: &str) -> Vec<&LotteryResult> {
        self.results
            .iter()
            .filter(|result| result.participant_id == participant_id)
            .collect()
    }

    /// Returns the shortfalls for one participant.
    #[must_use]
    pub fn shortfalls_for(&self, participant_id: &str) -> Vec<&AllocationShortfall> {
        self.shortfalls
            .iter()
            .filter(|shortfall| shortfall.participant_id == participant_id)
            .collect()
    }
}
