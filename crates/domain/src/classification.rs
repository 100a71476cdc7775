// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Eligibility and classification rules.
//!
//! Every function here is pure: it reads a single participant or spot and
//! derives the attribute the allocation engine filters on.
//!
//! ## Priority tiers
//!
//! Tiers are evaluated first-match in this order:
//! 1. PcD (`has_special_needs`)
//! 2. Elderly (`is_elderly`)
//! 3. Up to date (`is_up_to_date == Some(true)`)
//! 4. Normal
//!
//! A PcD elderly defaulter is still classified PcD. Defaulter status is a
//! separate axis that the engine applies on top of the tier.

use crate::types::{ParkingSpot, Participant, PriorityTier, Sector, SpotType};

/// Returns whether the spot is tagged PcD.
#[must_use]
pub fn is_pcd_spot(spot: &ParkingSpot) -> bool {
    spot.has_type(&SpotType::Pcd)
}

/// Returns whether the participant has special needs.
#[must_use]
pub const fn is_pcd_participant(participant: &Participant) -> bool {
    participant.has_special_needs
}

/// Returns whether the participant is behind on dues.
///
/// Only an explicit `false` counts; a missing flag is not a default.
#[must_use]
pub const fn is_defaulter(participant: &Participant) -> bool {
    matches!(participant.is_up_to_date, Some(false))
}

/// Classifies the participant into a priority tier.
#[must_use]
pub const fn priority_tier(participant: &Participant) -> PriorityTier {
    if participant.has_special_needs {
        PriorityTier::Pcd
    } else if participant.is_elderly {
        PriorityTier::Elderly
    } else if matches!(participant.is_up_to_date, Some(true)) {
        PriorityTier::UpToDate
    } else {
        PriorityTier::Normal
    }
}

/// Returns the spot's sector; blank means wildcard.
#[must_use]
pub fn spot_sector(spot: &ParkingSpot) -> Sector {
    Sector::from_label(spot.sector.as_deref())
}

/// Returns the participant's home sector.
#[must_use]
pub fn participant_sector(participant: &Participant) -> Sector {
    Sector::from_label(participant.sector.as_deref())
}

/// True only if the participant asked for covered spots and not also for
/// uncovered ones.
#[must_use]
pub const fn wants_covered(participant: &Participant) -> bool {
    participant.prefers_covered && !participant.prefers_uncovered
}

/// True only if the participant asked for uncovered spots and not also for
/// covered ones.
#[must_use]
pub const fn wants_uncovered(participant: &Participant) -> bool {
    participant.prefers_uncovered && !participant.prefers_covered
}

/// A participant's effective coverage preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoveragePreference {
    /// Only covered spots are acceptable in a strict pass.
    Covered,
    /// Only uncovered spots are acceptable in a strict pass.
    Uncovered,
    /// Both or neither flag set.
    Indifferent,
}

impl CoveragePreference {
    /// Returns whether any coverage filtering applies.
    #[must_use]
    pub const fn is_strict(self) -> bool {
        !matches!(self, Self::Indifferent)
    }
}

/// Resolves the strict-exclusive coverage preference.
#[must_use]
pub const fn coverage_preference(participant: &Participant) -> CoveragePreference {
    if wants_covered(participant) {
        CoveragePreference::Covered
    } else if wants_uncovered(participant) {
        CoveragePreference::Uncovered
    } else {
        CoveragePreference::Indifferent
    }
}

/// Coverage of a spot, folded from both stored encodings.
///
/// A spot is covered if it carries the "Vaga Coberta" tag or has
/// `is_covered` set; likewise for uncovered. Both can be true on bad data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpotCoverage {
    /// Covered by either encoding.
    pub covered: bool,
    /// Uncovered by either encoding.
    pub uncovered: bool,
}

impl SpotCoverage {
    /// Reads coverage from a stored spot.
    #[must_use]
    pub fn of(spot: &ParkingSpot) -> Self {
        Self {
            covered: spot.is_covered || spot.has_type(&SpotType::Covered),
            uncovered: spot.is_uncovered || spot.has_type(&SpotType::Uncovered),
        }
    }

    /// Returns whether this coverage satisfies the preference.
    #[must_use]
    pub const fn satisfies(self, preference: CoveragePreference) -> bool {
        match preference {
            CoveragePreference::Covered => self.covered,
            CoveragePreference::Uncovered => self.uncovered,
            CoveragePreference::Indifferent => true,
        }
    }
}

/// Returns whether the participant is drawn in the linked-spot stage.
///
/// PcD participants are always served by the PcD stage instead.
#[must_use]
pub const fn qualifies_for_linked_stage(participant: &Participant) -> bool {
    !participant.has_special_needs
        && (participant.number_of_spots > 1 || participant.prefers_linked_spot)
}

/// Number of spots the participant should end the draw with.
///
/// At least one; at least two for linked-stage participants.
#[must_use]
pub fn required_spots(participant: &Participant) -> u32 {
    let requested: u32 = participant.number_of_spots.max(1);
    if qualifies_for_linked_stage(participant) {
        requested.max(2)
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant() -> Participant {
        Participant::new("p-1", "b-1", "Maria")
    }

    #[test]
    fn test_pcd_elderly_defaulter_is_still_pcd_tier() {
        let mut p: Participant = participant();
        p.has_special_needs = true;
        p.is_elderly = true;
        p.is_up_to_date = Some(false);

        assert_eq!(priority_tier(&p), PriorityTier::Pcd);
        assert!(is_defaulter(&p));
    }

    #[test]
    fn test_tier_order() {
        let mut p: Participant = participant();
        assert_eq!(priority_tier(&p), PriorityTier::Normal);

        p.is_up_to_date = Some(true);
        assert_eq!(priority_tier(&p), PriorityTier::UpToDate);

        p.is_elderly = true;
        assert_eq!(priority_tier(&p), PriorityTier::Elderly);

        assert!(PriorityTier::Pcd < PriorityTier::Elderly);
        assert!(PriorityTier::UpToDate < PriorityTier::Normal);
    }

    #[test]
    fn test_missing_up_to_date_flag_is_not_defaulter() {
        let mut p: Participant = participant();
        assert!(!is_defaulter(&p));

        p.is_up_to_date = Some(true);
        assert!(!is_defaulter(&p));
    }

    #[test]
    fn test_coverage_preference_is_strict_exclusive() {
        let mut p: Participant = participant();
        assert_eq!(coverage_preference(&p), CoveragePreference::Indifferent);

        p.prefers_covered = true;
        assert_eq!(coverage_preference(&p), CoveragePreference::Covered);

        p.prefers_uncovered = true;
        assert_eq!(coverage_preference(&p), CoveragePreference::Indifferent);
        assert!(!wants_covered(&p));
        assert!(!wants_uncovered(&p));

        p.prefers_covered = false;
        assert_eq!(coverage_preference(&p), CoveragePreference::Uncovered);
    }

    #[test]
    fn test_spot_coverage_reads_both_encodings() {
        let mut tagged: ParkingSpot = ParkingSpot::new("s-1", "b-1", "1");
        tagged.spot_type.insert(SpotType::from("Vaga Coberta"));
        let mut flagged: ParkingSpot = ParkingSpot::new("s-2", "b-1", "2");
        flagged.is_covered = true;
        let bare: ParkingSpot = ParkingSpot::new("s-3", "b-1", "3");

        assert!(SpotCoverage::of(&tagged).covered);
        assert!(SpotCoverage::of(&flagged).covered);
        assert!(!SpotCoverage::of(&bare).covered);
        assert!(SpotCoverage::of(&bare).satisfies(CoveragePreference::Indifferent));
        assert!(!SpotCoverage::of(&bare).satisfies(CoveragePreference::Covered));
    }

    #[test]
    fn test_blank_sector_is_wildcard() {
        let mut spot: ParkingSpot = ParkingSpot::new("s-1", "b-1", "1");
        spot.sector = Some(String::from("  "));

        let sector: Sector = spot_sector(&spot);
        assert_eq!(sector, Sector::Unassigned);
        assert!(sector.admits("A"));
        assert!(sector.admits("B"));

        spot.sector = Some(String::from("A"));
        assert!(spot_sector(&spot).admits("A"));
        assert!(!spot_sector(&spot).admits("B"));
    }

    #[test]
    fn test_required_spots() {
        let mut p: Participant = participant();
        assert_eq!(required_spots(&p), 1);

        p.prefers_linked_spot = true;
        assert_eq!(required_spots(&p), 2);

        p.number_of_spots = 3;
        assert_eq!(required_spots(&p), 3);

        p.has_special_needs = true;
        p.number_of_spots = 1;
        assert!(!qualifies_for_linked_stage(&p));
        assert_eq!(required_spots(&p), 1);

        p.number_of_spots = 0;
        assert_eq!(required_spots(&p), 1);
    }
}
