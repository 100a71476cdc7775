// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Building, ParkingSpot, Participant};
use std::collections::HashSet;

/// Validates that a building can host a draw.
///
/// # Errors
///
/// Returns an error if the building id or name is empty.
pub fn validate_building(building: &Building) -> Result<(), DomainError> {
    if building.id.trim().is_empty() {
        return Err(DomainError::InvalidBuilding(String::from(
            "Building id cannot be empty",
        )));
    }

    if building.name.trim().is_empty() {
        return Err(DomainError::InvalidBuilding(format!(
            "Building '{}' has no name",
            building.id
        )));
    }

    Ok(())
}

/// Validates a participant's basic field constraints.
///
/// Uniqueness is checked separately by [`validate_unique_participant_ids`].
///
/// # Errors
///
/// Returns an error if:
/// - The id is empty
/// - The name is empty
/// - `number_of_spots` is zero
pub fn validate_participant_fields(participant: &Participant) -> Result<(), DomainError> {
    if participant.id.trim().is_empty() {
        return Err(DomainError::InvalidParticipant {
            participant_id: participant.id.clone(),
            reason: String::from("Participant id cannot be empty"),
        });
    }

    if participant.name.trim().is_empty() {
        return Err(DomainError::InvalidParticipant {
            participant_id: participant.id.clone(),
            reason: String::from("Name cannot be empty"),
        });
    }

    if participant.number_of_spots == 0 {
        return Err(DomainError::InvalidParticipant {
            participant_id: participant.id.clone(),
            reason: String::from("Number of spots must be at least 1"),
        });
    }

    Ok(())
}

/// Validates a parking spot's basic field constraints.
///
/// # Errors
///
/// Returns an error if the id or number is empty.
pub fn validate_spot_fields(spot: &ParkingSpot) -> Result<(), DomainError> {
    if spot.id.trim().is_empty() {
        return Err(DomainError::InvalidSpot {
            spot_id: spot.id.clone(),
            reason: String::from("Spot id cannot be empty"),
        });
    }

    if spot.number.trim().is_empty() {
        return Err(DomainError::InvalidSpot {
            spot_id: spot.id.clone(),
            reason: String::from("Spot number cannot be empty"),
        });
    }

    Ok(())
}

/// Validates that no two participants share an id.
///
/// # Errors
///
/// Returns `DuplicateParticipantId` for the first repeated id.
pub fn validate_unique_participant_ids(participants: &[Participant]) -> Result<(), DomainError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for participant in participants {
        if !seen.insert(participant.id.as_str()) {
            return Err(DomainError::DuplicateParticipantId(participant.id.clone()));
        }
    }
    Ok(())
}

/// Validates that no two spots share an id.
///
/// # Errors
///
/// Returns `DuplicateSpotId` for the first repeated id.
pub fn validate_unique_spot_ids(spots: &[ParkingSpot]) -> Result<(), DomainError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for spot in spots {
        if !seen.insert(spot.id.as_str()) {
            return Err(DomainError::DuplicateSpotId(spot.id.clone()));
        }
    }
    Ok(())
}
