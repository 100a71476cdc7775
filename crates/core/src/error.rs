// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use parking_lottery_domain::{DomainError, SpotStatus};

/// Errors that stop a draw before or between stages.
///
/// Running out of spots is never one of these; see
/// [`crate::AllocationShortfall`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The draw has nobody to allocate to.
    #[error("No participants to draw for building '{building_id}'")]
    NoParticipants {
        /// The building requested.
        building_id: String,
    },
    /// No spot in the building has status `available`.
    #[error("No available parking spots in building '{building_id}'")]
    NoAvailableSpots {
        /// The building requested.
        building_id: String,
    },
    /// A building, participant or spot failed validation.
    #[error("Invalid draw input: {0}")]
    InvalidInput(#[from] DomainError),
    /// Cancellation was requested; no partial results are exposed.
    #[error("Draw cancelled after stage {after_stage}")]
    Cancelled {
        /// The last stage that completed (0 if none).
        after_stage: u8,
    },
}

impl EngineError {
    /// Returns whether the error was raised before stage 1 started.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        !matches!(self, Self::Cancelled { .. })
    }
}

/// Errors that can occur while editing a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Only completed sessions can be edited.
    SessionNotCompleted {
        /// The session identifier.
        session_id: String,
    },
    /// No result with this id exists in the session.
    ResultNotFound(String),
    /// The target spot is held by another result.
    SpotAlreadyAssigned {
        /// The spot requested.
        spot_id: String,
        /// The result currently holding it.
        result_id: String,
    },
    /// The target spot is occupied or reserved outside the lottery.
    SpotUnavailable {
        /// The spot requested.
        spot_id: String,
        /// Its current status.
        status: SpotStatus,
    },
    /// A restored result collides with an existing id.
    DuplicateResultId(String),
    /// The command would leave the session unchanged.
    NoChange {
        /// The result addressed by the command.
        result_id: String,
    },
    /// A domain rule was violated.
    DomainViolation(DomainError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionNotCompleted { session_id } => {
                write!(f, "Session '{session_id}' is not completed")
            }
            Self::ResultNotFound(result_id) => write!(f, "Result '{result_id}' not found"),
            Self::SpotAlreadyAssigned { spot_id, result_id } => {
                write!(
                    f,
                    "Parking spot '{spot_id}' is already assigned by result '{result_id}'"
                )
            }
            Self::SpotUnavailable { spot_id, status } => {
                write!(f, "Parking spot '{spot_id}' is {status}, not available")
            }
            Self::DuplicateResultId(result_id) => {
                write!(f, "Result '{result_id}' already exists in the session")
            }
            Self::NoChange { result_id } => {
                write!(f, "Command leaves result '{result_id}' unchanged")
            }
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
