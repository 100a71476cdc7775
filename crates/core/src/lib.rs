// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parking lottery engine.
//!
//! A draw runs five fixed stages over one building's participants and
//! available spots, producing an ordered list of [`LotteryResult`]s. The only
//! suspension point is the [`ManualSelectionGate`] in the PcD stage.
//!
//! Completed draws are packaged as a [`LotterySession`] and edited afterwards
//! only through [`SessionCommand`]s, each producing an audit event.

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
#![allow(clippy::multiple_crate_versions)]

mod apply;
mod cascade;
mod command;
mod context;
mod engine;
mod error;
mod gate;
mod random;
mod result;
mod session;

#[cfg(test)]
mod tests;

pub use apply::apply;
pub use command::SessionCommand;
pub use engine::{CancellationFlag, LotteryEngine, check_preconditions};
pub use error::{EngineError, SessionError};
pub use gate::{
    AutoSkipGate, ChannelGate, GateRequests, ManualDecision, ManualSelectionGate,
    ManualSelectionRequest, PendingChoice,
};
pub use random::{RandomSource, SeededRandom};
pub use result::{
    AllocationShortfall, AllocationTag, DrawOutcome, DrawSummary, LotteryResult, MatchLevel,
    ShortfallReason, Stage,
};
pub use session::{
    DrawSettings, LotterySession, SessionStatus, SessionTransition, build_session,
    draw_audit_event,
};
