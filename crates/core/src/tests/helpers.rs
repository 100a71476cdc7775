// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CancellationFlag, ManualDecision, ManualSelectionGate, ManualSelectionRequest, RandomSource,
};
use parking_lottery_audit::{Actor, Cause};
use parking_lottery_domain::{Building, ParkingSpot, Participant};
use std::collections::VecDeque;

pub const BUILDING_ID: &str = "building-1";

/// Never reorders, always picks the first candidate.
#[derive(Debug, Default)]
pub struct OrderedRandom;

impl RandomSource for OrderedRandom {
    fn shuffle<T>(&mut self, _items: &mut [T]) {}

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then_some(0)
    }
}

/// Answers from a script and remembers every request.
#[derive(Debug, Default)]
pub struct RecordingGate {
    pub requests: Vec<ManualSelectionRequest>,
    answers: VecDeque<ManualDecision>,
}

impl RecordingGate {
    pub fn answering(answers: Vec<ManualDecision>) -> Self {
        Self {
            requests: Vec::new(),
            answers: answers.into(),
        }
    }
}

impl ManualSelectionGate for RecordingGate {
    async fn request_manual_choice(&mut self, request: ManualSelectionRequest) -> ManualDecision {
        self.requests.push(request);
        self.answers.pop_front().unwrap_or(ManualDecision::Skip)
    }
}

/// Requests cancellation the first time it is asked, then skips.
#[derive(Debug)]
pub struct CancellingGate {
    pub flag: CancellationFlag,
}

impl ManualSelectionGate for CancellingGate {
    async fn request_manual_choice(&mut self, _request: ManualSelectionRequest) -> ManualDecision {
        self.flag.cancel();
        ManualDecision::Skip
    }
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("syndic-1"), String::from("syndic"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(
        String::from("assembly-2026-03"),
        String::from("Annual parking assembly"),
    )
}

pub fn create_test_building() -> Building {
    let mut building: Building = Building::new(BUILDING_ID, "Residencial Aurora");
    building.sectors = vec![String::from("A"), String::from("B")];
    building
}

pub fn participant(id: &str) -> Participant {
    Participant::new(id, BUILDING_ID, &format!("Resident {id}"))
}

pub fn pcd_participant(id: &str) -> Participant {
    let mut participant: Participant = participant(id);
    participant.has_special_needs = true;
    participant
}

pub fn defaulter(id: &str) -> Participant {
    let mut participant: Participant = participant(id);
    participant.is_up_to_date = Some(false);
    participant
}

pub fn spot(id: &str, sector: Option<&str>) -> ParkingSpot {
    let mut spot: ParkingSpot = ParkingSpot::new(id, BUILDING_ID, id);
    spot.sector = sector.map(str::to_string);
    spot.floor = String::from("1");
    spot
}

pub fn pcd_spot(id: &str) -> ParkingSpot {
    let mut spot: ParkingSpot = spot(id, None);
    spot.spot_type.insert(parking_lottery_domain::SpotType::Pcd);
    spot
}

pub fn covered_spot(id: &str, sector: &str) -> ParkingSpot {
    let mut spot: ParkingSpot = spot(id, Some(sector));
    spot.is_covered = true;
    spot
}

pub fn uncovered_spot(id: &str, sector: &str) -> ParkingSpot {
    let mut spot: ParkingSpot = spot(id, Some(sector));
    spot.is_uncovered = true;
    spot
}
