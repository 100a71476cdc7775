// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Building identifier or name is empty or invalid.
    InvalidBuilding(String),
    /// A participant field violates a domain rule.
    InvalidParticipant {
        /// The offending participant.
        participant_id: String,
        /// Description of the violated rule.
        reason: String,
    },
    /// A parking spot field violates a domain rule.
    InvalidSpot {
        /// The offending spot.
        spot_id: String,
        /// Description of the violated rule.
        reason: String,
    },
    /// Two participants share the same identifier.
    DuplicateParticipantId(String),
    /// Two parking spots share the same identifier.
    DuplicateSpotId(String),
    /// An entity belongs to a different building than the one being drawn.
    BuildingMismatch {
        /// The entity identifier.
        entity_id: String,
        /// The building being drawn.
        expected: String,
        /// The building recorded on the entity.
        found: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBuilding(msg) => write!(f, "Invalid building: {msg}"),
            Self::InvalidParticipant {
                participant_id,
                reason,
            } => {
                write!(f, "Invalid participant '{participant_id}': {reason}")
            }
            Self::InvalidSpot { spot_id, reason } => {
                write!(f, "Invalid parking spot '{spot_id}': {reason}")
            }
            Self::DuplicateParticipantId(id) => {
                write!(f, "Participant '{id}' appears more than once")
            }
            Self::DuplicateSpotId(id) => write!(f, "Parking spot '{id}' appears more than once"),
            Self::BuildingMismatch {
                entity_id,
                expected,
                found,
            } => {
                write!(
                    f,
                    "'{entity_id}' belongs to building '{found}', expected '{expected}'"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
