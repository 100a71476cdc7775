// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::result::LotteryResult;
use parking_lottery_domain::ParkingSpot;

/// An edit to a completed lottery session, as data only.
///
/// Commands are the only way to change a session after the draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Move a result to another spot.
    ReassignSpot {
        /// The result to edit.
        result_id: String,
        /// The new spot; its snapshot replaces the old one.
        spot: ParkingSpot,
    },
    /// Remove a result from the session.
    RevokeResult {
        /// The result to remove.
        result_id: String,
    },
    /// Put a previously revoked result back.
    RestoreResult {
        /// The result exactly as it was revoked.
        result: LotteryResult,
    },
}

impl SessionCommand {
    /// Name recorded on the audit event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ReassignSpot { .. } => "ReassignSpot",
            Self::RevokeResult { .. } => "RevokeResult",
            Self::RestoreResult { .. } => "RestoreResult",
        }
    }
}
