// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Manual selection gate.
//!
//! When a PcD participant needs a spot and no PcD spot is left, stage 1
//! suspends and asks a human to pick one of the remaining regular spots (or
//! to skip). The engine awaits exactly one gate at a time.
//!
//! # Architecture
//!
//! - [`ManualSelectionGate`] is the seam the engine awaits on
//! - [`AutoSkipGate`] serves unattended runs
//! - [`ChannelGate`] hands each request to an interactive front end through a
//!   channel and waits for the reply, optionally bounded by a timeout

use parking_lottery_domain::{ParkingSpot, Participant};
use std::future::Future;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// What the engine asks the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualSelectionRequest {
    /// The PcD participant waiting for a spot.
    pub participant: Participant,
    /// Every currently available non-PcD spot.
    pub candidates: Vec<ParkingSpot>,
    /// 1-based iteration for this participant.
    pub iteration: u32,
    /// Total spots this participant needs.
    pub required: u32,
}

impl ManualSelectionRequest {
    /// Returns whether `spot_id` was offered.
    #[must_use]
    pub fn offers(&self, spot_id: &str) -> bool {
        self.candidates.iter().any(|spot| spot.id == spot_id)
    }
}

/// The operator's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualDecision {
    /// Assign this spot id.
    Choose(String),
    /// Assign nothing for this iteration.
    Skip,
    /// No answer arrived in time; handled like `Skip`.
    TimedOut,
}

/// Suspension point for manual PcD allocation.
pub trait ManualSelectionGate {
    /// Presents the request and resolves once the operator decides.
    fn request_manual_choice(
        &mut self,
        request: ManualSelectionRequest,
    ) -> impl Future<Output = ManualDecision> + Send;
}

/// Gate for unattended draws: every request is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSkipGate;

impl ManualSelectionGate for AutoSkipGate {
    async fn request_manual_choice(&mut self, request: ManualSelectionRequest) -> ManualDecision {
        info!(
            participant_id = %request.participant.id,
            candidates = request.candidates.len(),
            "Skipping manual selection (unattended draw)"
        );
        ManualDecision::Skip
    }
}

/// A request waiting for an answer on the interactive side.
///
/// Dropping it without answering counts as a skip.
#[derive(Debug)]
pub struct PendingChoice {
    /// The request being answered.
    pub request: ManualSelectionRequest,
    reply: oneshot::Sender<Option<String>>,
}

impl PendingChoice {
    /// Answers with a spot id.
    pub fn choose(self, spot_id: &str) {
        // The engine may have timed out already; nothing to do then.
        let _ = self.reply.send(Some(spot_id.to_string()));
    }

    /// Answers with "no decision".
    pub fn skip(self) {
        let _ = self.reply.send(None);
    }

    /// Resolves once the engine stops waiting for this answer, e.g. after a
    /// timeout.
    pub async fn abandoned(&mut self) {
        self.reply.closed().await;
    }
}

/// Receiving half of a [`ChannelGate`], held by the interactive front end.
#[derive(Debug)]
pub struct GateRequests {
    rx: mpsc::Receiver<PendingChoice>,
}

impl GateRequests {
    /// Waits for the next request. Returns `None` once the engine is gone.
    pub async fn next(&mut self) -> Option<PendingChoice> {
        self.rx.recv().await
    }
}

/// Gate that forwards requests over a channel.
#[derive(Debug, Clone)]
pub struct ChannelGate {
    tx: mpsc::Sender<PendingChoice>,
    timeout: Option<Duration>,
}

impl ChannelGate {
    /// Creates a connected gate and request stream.
    ///
    /// With `timeout = None` the engine waits indefinitely; otherwise an
    /// unanswered request resolves to [`ManualDecision::TimedOut`].
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> (Self, GateRequests) {
        // One slot: gates never overlap.
        let (tx, rx) = mpsc::channel(1);
        (Self { tx, timeout }, GateRequests { rx })
    }
}

impl ManualSelectionGate for ChannelGate {
    async fn request_manual_choice(&mut self, request: ManualSelectionRequest) -> ManualDecision {
        let participant_id: String = request.participant.id.clone();
        let (reply, answer) = oneshot::channel();

        if self.tx.send(PendingChoice { request, reply }).await.is_err() {
            warn!(%participant_id, "Manual selection front end is gone; skipping");
            return ManualDecision::Skip;
        }

        let received = match self.timeout {
            None => answer.await,
            Some(limit) => match tokio::time::timeout(limit, answer).await {
                Ok(received) => received,
                Err(_) => {
                    warn!(
                        %participant_id,
                        timeout_secs = limit.as_secs(),
                        "Manual selection timed out"
                    );
                    return ManualDecision::TimedOut;
                }
            },
        };

        match received {
            Ok(Some(spot_id)) => ManualDecision::Choose(spot_id),
            Ok(None) | Err(_) => ManualDecision::Skip,
        }
    }
}
