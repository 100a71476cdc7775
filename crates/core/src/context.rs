// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::result::{
    AllocationShortfall, AllocationTag, DrawOutcome, DrawSummary, LotteryResult, MatchLevel,
    ShortfallReason, Stage,
};
use parking_lottery_domain::{
    Building, ParkingSpot, Participant, Sector, SpotCoverage, SpotStatus, is_pcd_spot,
    priority_tier, required_spots, spot_sector,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use time::OffsetDateTime;
use tracing::debug;

/// A pool entry with its filter attributes derived once.
#[derive(Debug, Clone)]
pub(crate) struct CandidateSpot {
    pub(crate) spot: ParkingSpot,
    pub(crate) sector: Sector,
    pub(crate) coverage: SpotCoverage,
    pub(crate) pcd: bool,
}

impl CandidateSpot {
    fn new(spot: &ParkingSpot) -> Self {
        Self {
            spot: spot.clone(),
            sector: spot_sector(spot),
            coverage: SpotCoverage::of(spot),
            pcd: is_pcd_spot(spot),
        }
    }
}

/// Mutable state shared by all five stages of one run.
///
/// Owned by the run; nothing outside the engine sees it until it is turned
/// into a [`DrawOutcome`] after stage 5.
#[derive(Debug)]
pub(crate) struct AllocationContext {
    building_id: String,
    available: Vec<CandidateSpot>,
    assigned_spot_ids: HashSet<String>,
    assigned_counts: HashMap<String, u32>,
    results: Vec<LotteryResult>,
    shortfalls: Vec<AllocationShortfall>,
    known_sectors: Vec<String>,
    proximity: BTreeMap<String, Vec<String>>,
    spot_ids: Vec<String>,
}

impl AllocationContext {
    /// Builds the pool from the spots with status `available`.
    pub(crate) fn new(building: &Building, spots: &[ParkingSpot]) -> Self {
        let available: Vec<CandidateSpot> = spots
            .iter()
            .filter(|spot| spot.status == SpotStatus::Available)
            .map(CandidateSpot::new)
            .collect();

        let mut known_sectors: Vec<String> = Vec::new();
        let declared = building.sectors.iter().map(String::as_str);
        let observed = available.iter().filter_map(|c| c.sector.name());
        for name in declared.chain(observed) {
            let name: &str = name.trim();
            if !name.is_empty() && !known_sectors.iter().any(|known| known == name) {
                known_sectors.push(name.to_string());
            }
        }

        let spot_ids: Vec<String> = available.iter().map(|c| c.spot.id.clone()).collect();

        Self {
            building_id: building.id.clone(),
            available,
            assigned_spot_ids: HashSet::new(),
            assigned_counts: HashMap::new(),
            results: Vec::new(),
            shortfalls: Vec::new(),
            known_sectors,
            proximity: building.sector_proximity.clone(),
            spot_ids,
        }
    }

    pub(crate) fn available(&self) -> &[CandidateSpot] {
        &self.available
    }

    /// Indices into [`Self::available`] matching `predicate`.
    pub(crate) fn indices_where<F>(&self, predicate: F) -> Vec<usize>
    where
        F: Fn(&CandidateSpot) -> bool,
    {
        self.available
            .iter()
            .enumerate()
            .filter(|(_, candidate)| predicate(candidate))
            .map(|(index, _)| index)
            .collect()
    }

    /// Index of an available spot by id.
    pub(crate) fn position_of(&self, spot_id: &str) -> Option<usize> {
        self.available
            .iter()
            .position(|candidate| candidate.spot.id == spot_id)
    }

    /// Sectors in stable order: building-declared first, then as seen on spots.
    pub(crate) fn known_sectors(&self) -> &[String] {
        &self.known_sectors
    }

    pub(crate) fn proximity_for(&self, home: &str) -> Option<&[String]> {
        self.proximity.get(home).map(Vec::as_slice)
    }

    pub(crate) fn assigned_count(&self, participant_id: &str) -> u32 {
        self.assigned_counts
            .get(participant_id)
            .copied()
            .unwrap_or(0)
    }

    /// Spots still owed to the participant.
    pub(crate) fn outstanding(&self, participant: &Participant) -> u32 {
        required_spots(participant).saturating_sub(self.assigned_count(&participant.id))
    }

    pub(crate) fn is_fully_assigned(&self, participant: &Participant) -> bool {
        self.outstanding(participant) == 0
    }

    /// Moves the spot at `index` out of the pool and records the result.
    pub(crate) fn assign(
        &mut self,
        participant: &Participant,
        index: usize,
        allocation: AllocationTag,
        match_level: MatchLevel,
    ) {
        if index >= self.available.len() {
            return;
        }
        let candidate: CandidateSpot = self.available.remove(index);
        if !self.assigned_spot_ids.insert(candidate.spot.id.clone()) {
            return;
        }
        *self
            .assigned_counts
            .entry(participant.id.clone())
            .or_insert(0) += 1;

        debug!(
            participant_id = %participant.id,
            spot_id = %candidate.spot.id,
            sector = %candidate.sector,
            allocation = allocation.as_str(),
            match_level = match_level.as_str(),
            "Assigned spot"
        );

        let id: String = format!("draft-{}", self.results.len() + 1);
        self.results.push(LotteryResult {
            id,
            participant_id: participant.id.clone(),
            parking_spot_id: candidate.spot.id.clone(),
            priority: priority_tier(participant),
            allocation,
            match_level,
            participant_snapshot: participant.clone(),
            spot_snapshot: candidate.spot,
            timestamp: OffsetDateTime::now_utc(),
        });
    }

    pub(crate) fn record_shortfall(
        &mut self,
        participant: &Participant,
        stage: Stage,
        reason: ShortfallReason,
    ) {
        debug!(
            participant_id = %participant.id,
            stage = stage.as_str(),
            reason = reason.as_str(),
            "No spot assigned"
        );
        self.shortfalls.push(AllocationShortfall {
            participant_id: participant.id.clone(),
            stage,
            reason,
        });
    }

    pub(crate) fn results_len(&self) -> usize {
        self.results.len()
    }

    /// Finishes the run.
    pub(crate) fn into_outcome(self, participants: &[Participant]) -> DrawOutcome {
        let mut summary: DrawSummary = DrawSummary {
            spots_remaining: self.available.len(),
            ..DrawSummary::default()
        };
        for result in &self.results {
            *summary.results_by_tag.entry(result.allocation).or_insert(0) += 1;
            *summary
                .results_by_match_level
                .entry(result.match_level)
                .or_insert(0) += 1;
        }
        for participant in participants {
            let received: u32 = self.assigned_count(&participant.id);
            if received == 0 {
                summary.unserved += 1;
            } else if received >= required_spots(participant) {
                summary.fully_served += 1;
            } else {
                summary.partially_served += 1;
            }
        }

        DrawOutcome {
            building_id: self.building_id,
            participant_ids: participants.iter().map(|p| p.id.clone()).collect(),
            spot_ids: self.spot_ids,
            results: self.results,
            shortfalls: self.shortfalls,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(id: &str, sector: Option<&str>) -> ParkingSpot {
        let mut spot: ParkingSpot = ParkingSpot::new(id, "b-1", id);
        spot.sector = sector.map(str::to_string);
        spot
    }

    #[test]
    fn test_pool_excludes_unavailable_spots() {
        let mut occupied: ParkingSpot = spot("s-2", None);
        occupied.status = SpotStatus::Occupied;
        let spots: Vec<ParkingSpot> = vec![spot("s-1", None), occupied];

        let ctx: AllocationContext = AllocationContext::new(&Building::new("b-1", "Aurora"), &spots);
        assert_eq!(ctx.available().len(), 1);
        assert_eq!(ctx.position_of("s-2"), None);
    }

    #[test]
    fn test_known_sectors_keep_declared_order_then_observed() {
        let mut building: Building = Building::new("b-1", "Aurora");
        building.sectors = vec![String::from("B"), String::from("A")];
        let spots: Vec<ParkingSpot> = vec![
            spot("s-1", Some("C")),
            spot("s-2", Some("A")),
            spot("s-3", None),
        ];

        let ctx: AllocationContext = AllocationContext::new(&building, &spots);
        assert_eq!(ctx.known_sectors(), ["B", "A", "C"]);
    }

    #[test]
    fn test_assign_consumes_spot_once() {
        let spots: Vec<ParkingSpot> = vec![spot("s-1", None), spot("s-2", None)];
        let participant: Participant = Participant::new("p-1", "b-1", "Maria");
        let mut ctx: AllocationContext =
            AllocationContext::new(&Building::new("b-1", "Aurora"), &spots);

        ctx.assign(&participant, 0, AllocationTag::SingleSector, MatchLevel::Strict);
        ctx.assign(&participant, 5, AllocationTag::SingleSector, MatchLevel::Strict);

        assert_eq!(ctx.results_len(), 1);
        assert_eq!(ctx.available().len(), 1);
        assert_eq!(ctx.assigned_count("p-1"), 1);
        assert!(ctx.is_fully_assigned(&participant));
    }
}
