// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The five-stage allocation engine.
//!
//! ## Stage order (fixed)
//!
//! 1. PcD participants: PcD spots, else the manual selection gate
//! 2. Single-spot participants: sector cascade
//! 3. Double/linked participants: sector cascade, at least two spots
//! 4. Anyone not yet fully served: random remainder
//! 5. Defaulters: any spot left
//!
//! ## Invariants
//!
//! - Later stages never revisit earlier assignments
//! - A spot is assigned at most once
//! - Each stage shuffles its population once before processing
//! - Running out of spots is a data state (a shortfall), never an error

use crate::cascade::{resolve_by_sector, resolve_remainder};
use crate::context::AllocationContext;
use crate::error::EngineError;
use crate::gate::{ManualDecision, ManualSelectionGate, ManualSelectionRequest};
use crate::random::RandomSource;
use crate::result::{AllocationTag, DrawOutcome, MatchLevel, ShortfallReason, Stage};
use parking_lottery_domain::{
    Building, DomainError, ParkingSpot, Participant, SpotStatus, is_defaulter,
    is_pcd_participant, qualifies_for_linked_stage, required_spots, validate_building,
    validate_participant_fields, validate_spot_fields, validate_unique_participant_ids,
    validate_unique_spot_ids,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Cooperative cancellation for a running draw.
///
/// Checked between stages only; a stage in progress always finishes.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs draws with an injected random source and manual selection gate.
#[derive(Debug)]
pub struct LotteryEngine<R, G> {
    rng: R,
    gate: G,
    cancellation: CancellationFlag,
}

impl<R: RandomSource, G: ManualSelectionGate> LotteryEngine<R, G> {
    /// Creates an engine.
    pub fn new(rng: R, gate: G) -> Self {
        Self {
            rng,
            gate,
            cancellation: CancellationFlag::new(),
        }
    }

    /// Attaches a cancellation flag checked between stages.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Returns the gate, e.g. to inspect what it was asked.
    pub const fn gate(&self) -> &G {
        &self.gate
    }

    /// Runs all five stages over the given inputs.
    ///
    /// Only spots with status `available` enter the pool. Partial fulfilment
    /// is reported through the outcome's shortfalls.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The building, a participant or a spot fails validation
    /// - There are no participants or no available spots
    /// - Cancellation was requested between two stages
    pub async fn run(
        &mut self,
        building: &Building,
        participants: &[Participant],
        spots: &[ParkingSpot],
    ) -> Result<DrawOutcome, EngineError> {
        check_preconditions(building, participants, spots)?;

        let mut ctx: AllocationContext = AllocationContext::new(building, spots);
        info!(
            building_id = %building.id,
            participants = participants.len(),
            spots = ctx.available().len(),
            "Starting draw"
        );

        for stage in Stage::ORDER {
            if self.cancellation.is_cancelled() {
                let after_stage: u8 = stage.number() - 1;
                warn!(building_id = %building.id, after_stage, "Draw cancelled");
                return Err(EngineError::Cancelled { after_stage });
            }

            let before: usize = ctx.results_len();
            match stage {
                Stage::Pcd => self.run_pcd_stage(&mut ctx, participants).await,
                Stage::SingleSector => self.run_single_stage(&mut ctx, participants),
                Stage::Linked => self.run_linked_stage(&mut ctx, participants),
                Stage::Remainder => self.run_remainder_stage(&mut ctx, participants),
                Stage::Defaulter => self.run_defaulter_stage(&mut ctx, participants),
            }
            info!(
                stage = stage.number(),
                name = stage.as_str(),
                assigned = ctx.results_len() - before,
                remaining = ctx.available().len(),
                "Finished allocation stage"
            );
        }

        let outcome: DrawOutcome = ctx.into_outcome(participants);
        info!(
            building_id = %building.id,
            results = outcome.results.len(),
            shortfalls = outcome.shortfalls.len(),
            fully_served = outcome.summary.fully_served,
            "Draw complete"
        );
        Ok(outcome)
    }

    /// Shuffled stage population.
    fn population<'a, F>(
        &mut self,
        participants: &'a [Participant],
        include: F,
    ) -> Vec<&'a Participant>
    where
        F: Fn(&Participant) -> bool,
    {
        let mut population: Vec<&Participant> =
            participants.iter().filter(|&p| include(p)).collect();
        self.rng.shuffle(&mut population);
        population
    }

    async fn run_pcd_stage(&mut self, ctx: &mut AllocationContext, participants: &[Participant]) {
        let population: Vec<&Participant> =
            self.population(participants, |p| is_pcd_participant(p) && !is_defaulter(p));

        for participant in population {
            let required: u32 = required_spots(participant);
            for iteration in 1..=required {
                let pcd_spots: Vec<usize> = ctx.indices_where(|candidate| candidate.pcd);
                if let Some(&index) = self.rng.pick(&pcd_spots) {
                    ctx.assign(
                        participant,
                        index,
                        AllocationTag::PcdPriority,
                        MatchLevel::Unfiltered,
                    );
                    continue;
                }

                let candidates: Vec<ParkingSpot> = ctx
                    .available()
                    .iter()
                    .filter(|candidate| !candidate.pcd)
                    .map(|candidate| candidate.spot.clone())
                    .collect();
                if candidates.is_empty() {
                    warn!(
                        participant_id = %participant.id,
                        iteration,
                        "No spots left for PcD participant"
                    );
                    ctx.record_shortfall(
                        participant,
                        Stage::Pcd,
                        ShortfallReason::NoSpotsRemaining,
                    );
                    continue;
                }

                let request: ManualSelectionRequest = ManualSelectionRequest {
                    participant: participant.clone(),
                    candidates,
                    iteration,
                    required,
                };
                info!(
                    participant_id = %participant.id,
                    iteration,
                    candidates = request.candidates.len(),
                    "No PcD spot left; awaiting manual selection"
                );

                match self.gate.request_manual_choice(request).await {
                    ManualDecision::Choose(spot_id) => {
                        let chosen: Option<usize> = ctx
                            .position_of(&spot_id)
                            .filter(|&index| ctx.available().get(index).is_some_and(|c| !c.pcd));
                        if let Some(index) = chosen {
                            ctx.assign(
                                participant,
                                index,
                                AllocationTag::PcdManualSelection,
                                MatchLevel::Unfiltered,
                            );
                        } else {
                            warn!(
                                participant_id = %participant.id,
                                %spot_id,
                                "Manual selection named a spot that was not offered"
                            );
                            ctx.record_shortfall(
                                participant,
                                Stage::Pcd,
                                ShortfallReason::InvalidManualChoice,
                            );
                        }
                    }
                    ManualDecision::Skip => {
                        ctx.record_shortfall(participant, Stage::Pcd, ShortfallReason::ManualSkip);
                    }
                    ManualDecision::TimedOut => {
                        ctx.record_shortfall(
                            participant,
                            Stage::Pcd,
                            ShortfallReason::GateTimedOut,
                        );
                    }
                }
            }
        }
    }

    fn run_single_stage(&mut self, ctx: &mut AllocationContext, participants: &[Participant]) {
        let population: Vec<&Participant> = self.population(participants, |p| {
            !is_pcd_participant(p)
                && !is_defaulter(p)
                && p.number_of_spots == 1
                && !p.prefers_linked_spot
        });

        for participant in population {
            self.allocate_by_sector(ctx, participant, Stage::SingleSector);
        }
    }

    fn run_linked_stage(&mut self, ctx: &mut AllocationContext, participants: &[Participant]) {
        let population: Vec<&Participant> = self.population(participants, |p| {
            !is_defaulter(p) && qualifies_for_linked_stage(p)
        });

        for participant in population {
            self.allocate_by_sector(ctx, participant, Stage::Linked);
        }
    }

    /// Stages 2 and 3: one cascade per outstanding spot.
    fn allocate_by_sector(
        &mut self,
        ctx: &mut AllocationContext,
        participant: &Participant,
        stage: Stage,
    ) {
        let tag: AllocationTag = if stage == Stage::Linked {
            AllocationTag::LinkedSector
        } else {
            AllocationTag::SingleSector
        };

        for _ in 0..ctx.outstanding(participant) {
            match resolve_by_sector(participant, ctx, &mut self.rng) {
                Some((index, level)) => ctx.assign(participant, index, tag, level),
                None => {
                    ctx.record_shortfall(participant, stage, ShortfallReason::NoSpotsRemaining);
                }
            }
        }
    }

    fn run_remainder_stage(&mut self, ctx: &mut AllocationContext, participants: &[Participant]) {
        let population: Vec<&Participant> =
            self.population(participants, |p| !is_defaulter(p) && !ctx.is_fully_assigned(p));

        for participant in population {
            for _ in 0..ctx.outstanding(participant) {
                match resolve_remainder(participant, ctx, &mut self.rng) {
                    Some((index, level)) => {
                        ctx.assign(participant, index, AllocationTag::RandomRemainder, level);
                    }
                    None => ctx.record_shortfall(
                        participant,
                        Stage::Remainder,
                        ShortfallReason::NoSpotsRemaining,
                    ),
                }
            }
        }
    }

    fn run_defaulter_stage(&mut self, ctx: &mut AllocationContext, participants: &[Participant]) {
        let population: Vec<&Participant> =
            self.population(participants, |p| is_defaulter(p) && !ctx.is_fully_assigned(p));

        for participant in population {
            for _ in 0..ctx.outstanding(participant) {
                let pool_len: usize = ctx.available().len();
                match self.rng.pick_index(pool_len) {
                    Some(index) => ctx.assign(
                        participant,
                        index,
                        AllocationTag::Defaulter,
                        MatchLevel::Unfiltered,
                    ),
                    None => ctx.record_shortfall(
                        participant,
                        Stage::Defaulter,
                        ShortfallReason::NoSpotsRemaining,
                    ),
                }
            }
        }
    }
}

/// Rejects inputs that cannot produce a meaningful draw.
///
/// # Errors
///
/// See [`LotteryEngine::run`].
pub fn check_preconditions(
    building: &Building,
    participants: &[Participant],
    spots: &[ParkingSpot],
) -> Result<(), EngineError> {
    validate_building(building)?;

    if participants.is_empty() {
        return Err(EngineError::NoParticipants {
            building_id: building.id.clone(),
        });
    }
    if !spots.iter().any(|spot| spot.status == SpotStatus::Available) {
        return Err(EngineError::NoAvailableSpots {
            building_id: building.id.clone(),
        });
    }

    validate_unique_participant_ids(participants)?;
    validate_unique_spot_ids(spots)?;

    for participant in participants {
        validate_participant_fields(participant)?;
        ensure_same_building(building, &participant.id, &participant.building_id)?;
    }
    for spot in spots {
        validate_spot_fields(spot)?;
        ensure_same_building(building, &spot.id, &spot.building_id)?;
    }
    Ok(())
}

fn ensure_same_building(
    building: &Building,
    entity_id: &str,
    entity_building_id: &str,
) -> Result<(), DomainError> {
    if entity_building_id == building.id {
        Ok(())
    } else {
        Err(DomainError::BuildingMismatch {
            entity_id: entity_id.to_string(),
            expected: building.id.clone(),
            found: entity_building_id.to_string(),
        })
    }
}
