// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Spot resolution shared by the sector-aware and remainder stages.
//!
//! ## Sector cascade (stages 2 and 3)
//!
//! 1. Strict pass: walk the participant's sector priority list; in each
//!    sector keep non-PcD spots of that sector (or sector-less spots), apply
//!    the coverage preference, then narrow to preferred floors when any match.
//!    A sector with no coverage match is skipped, never relaxed in place.
//! 2. Relaxation pass: only for participants with a coverage preference; the
//!    same walk without the coverage filter.
//! 3. Fallback: any remaining non-PcD spot.
//!
//! ## Remainder (stage 4)
//!
//! All available spots, coverage-filtered only if something matches, then
//! floor-narrowed only if something matches.

use crate::context::{AllocationContext, CandidateSpot};
use crate::random::RandomSource;
use crate::result::MatchLevel;
use parking_lottery_domain::{
    CoveragePreference, Participant, Sector, coverage_preference, participant_sector,
};

/// Builds the ordered list of sectors to try for a participant.
///
/// - Preferred sectors, then every other known sector
/// - Otherwise the home sector followed by its proximity list
/// - Otherwise the home sector followed by every other known sector
/// - Otherwise every known sector
pub(crate) fn sector_priority(participant: &Participant, ctx: &AllocationContext) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        let name: &str = name.trim();
        if !name.is_empty() && !order.iter().any(|existing| existing == name) {
            order.push(name.to_string());
        }
    };

    if !participant.preferred_sectors.is_empty() {
        participant
            .preferred_sectors
            .iter()
            .for_each(|s| push(s.as_str()));
        ctx.known_sectors().iter().for_each(|s| push(s.as_str()));
        return order;
    }

    match participant_sector(participant) {
        Sector::Named(home) => {
            push(home.as_str());
            match ctx.proximity_for(&home) {
                Some(nearby) => nearby.iter().for_each(|s| push(s.as_str())),
                None => ctx.known_sectors().iter().for_each(|s| push(s.as_str())),
            }
        }
        Sector::Unassigned => ctx.known_sectors().iter().for_each(|s| push(s.as_str())),
    }
    order
}

/// Resolves one spot through the sector cascade.
///
/// Returns the pool index and the level at which it matched.
pub(crate) fn resolve_by_sector<R: RandomSource>(
    participant: &Participant,
    ctx: &AllocationContext,
    rng: &mut R,
) -> Option<(usize, MatchLevel)> {
    let preference: CoveragePreference = coverage_preference(participant);
    let sectors: Vec<String> = sector_priority(participant, ctx);

    if let Some(index) = sector_pass(participant, ctx, &sectors, preference, rng) {
        return Some((index, MatchLevel::Strict));
    }

    let relaxed: Option<usize> = if preference.is_strict() {
        sector_pass(
            participant,
            ctx,
            &sectors,
            CoveragePreference::Indifferent,
            rng,
        )
    } else {
        None
    };
    if let Some(index) = relaxed {
        return Some((index, MatchLevel::CoverageRelaxed));
    }

    let fallback: Vec<usize> = ctx.indices_where(|candidate| !candidate.pcd);
    rng.pick(&fallback)
        .map(|&index| (index, MatchLevel::AnySector))
}

/// Walks the sector list once. An empty list means a single unfiltered
/// sector pass, so buildings without sectors still honour coverage and floors.
fn sector_pass<R: RandomSource>(
    participant: &Participant,
    ctx: &AllocationContext,
    sectors: &[String],
    preference: CoveragePreference,
    rng: &mut R,
) -> Option<usize> {
    let passes: Vec<Option<&str>> = if sectors.is_empty() {
        vec![None]
    } else {
        sectors.iter().map(|s| Some(s.as_str())).collect()
    };

    for sector in passes {
        let in_sector: Vec<usize> = ctx.indices_where(|candidate| {
            !candidate.pcd && sector.is_none_or(|name| candidate.sector.admits(name))
        });
        let matching: Vec<usize> = in_sector
            .into_iter()
            .filter(|&index| coverage_ok(ctx, index, preference))
            .collect();
        if matching.is_empty() {
            continue;
        }

        let candidates: Vec<usize> = narrow_to_floors(participant, ctx, matching);
        if let Some(&index) = rng.pick(&candidates) {
            return Some(index);
        }
    }
    None
}

/// Resolves one spot for the remainder stage.
pub(crate) fn resolve_remainder<R: RandomSource>(
    participant: &Participant,
    ctx: &AllocationContext,
    rng: &mut R,
) -> Option<(usize, MatchLevel)> {
    let everything: Vec<usize> = ctx.indices_where(|_| true);
    if everything.is_empty() {
        return None;
    }

    let preference: CoveragePreference = coverage_preference(participant);
    let covered: Vec<usize> = everything
        .iter()
        .copied()
        .filter(|&index| coverage_ok(ctx, index, preference))
        .collect();
    let (pool, level) = if covered.is_empty() {
        (everything, MatchLevel::CoverageRelaxed)
    } else {
        (covered, MatchLevel::Strict)
    };

    let candidates: Vec<usize> = narrow_to_floors(participant, ctx, pool);
    rng.pick(&candidates).map(|&index| (index, level))
}

fn coverage_ok(ctx: &AllocationContext, index: usize, preference: CoveragePreference) -> bool {
    ctx.available()
        .get(index)
        .is_some_and(|candidate: &CandidateSpot| candidate.coverage.satisfies(preference))
}

/// Keeps only preferred-floor spots, unless none of them is.
fn narrow_to_floors(
    participant: &Participant,
    ctx: &AllocationContext,
    indices: Vec<usize>,
) -> Vec<usize> {
    if participant.preferred_floors.is_empty() {
        return indices;
    }

    let on_floor: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&index| {
            ctx.available()
                .get(index)
                .is_some_and(|candidate| participant.preferred_floors.contains(&candidate.spot.floor))
        })
        .collect();

    if on_floor.is_empty() { indices } else { on_floor }
}
