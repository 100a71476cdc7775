// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod classification;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use classification::{
    CoveragePreference, SpotCoverage, coverage_preference, is_defaulter, is_pcd_participant,
    is_pcd_spot, participant_sector, priority_tier, qualifies_for_linked_stage, required_spots,
    spot_sector, wants_covered, wants_uncovered,
};
pub use error::DomainError;
pub use types::{Building, ParkingSpot, Participant, PriorityTier, Sector, SpotStatus, SpotType};
pub use validation::{
    validate_building, validate_participant_fields, validate_spot_fields,
    validate_unique_participant_ids, validate_unique_spot_ids,
};
