// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::output::{append_audit, read_text, write_json};
use crate::prompt::{answer_requests, stdin_lines};
use clap::ValueEnum;
use color_eyre::Result;
use color_eyre::eyre::{Context, eyre};
use parking_lottery::{
    AutoSkipGate, CancellationFlag, ChannelGate, DrawOutcome, DrawSettings, DrawSummary,
    EngineError, LotteryEngine, LotterySession, ManualSelectionGate, SeededRandom,
    build_session, draw_audit_event,
};
use parking_lottery_audit::{Actor, AuditEvent, Cause};
use parking_lottery_domain::{Building, ParkingSpot, Participant};
use parking_lottery_persistence::{
    Dataset, EntityStore, MemoryStore, PublishOutcome, Publisher, StorePublisher,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How PcD participants without a PcD spot are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GateMode {
    /// Ask on the terminal.
    Interactive,
    /// Skip them; the remainder stage may still serve them.
    Skip,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DrawArgs {
    /// Dataset JSON with `buildings`, `participants` and `parkingSpots`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Building to draw
    #[arg(short, long)]
    pub building: String,

    /// Seed for a reproducible draw; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Manual selection behaviour
    #[arg(long, value_enum, default_value_t = GateMode::Interactive)]
    pub gate: GateMode,

    /// Seconds to wait for a manual selection before skipping
    #[arg(long)]
    pub gate_timeout: Option<u64>,

    /// Where to write the session JSON; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Tenant tag; the session is published when set
    #[arg(long)]
    pub company_tag: Option<String>,

    /// Who runs the draw
    #[arg(long, default_value = "operator")]
    pub actor: String,

    /// Why the draw is run
    #[arg(long, default_value = "Parking lottery draw")]
    pub cause: String,

    /// Append audit events to this JSON-lines file
    #[arg(long)]
    pub audit_log: Option<PathBuf>,
}

pub async fn run(args: DrawArgs) -> Result<()> {
    let dataset: Dataset = Dataset::from_json(&read_text(&args.input).await?)?;
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::from_dataset(&dataset)?);

    let building: Building = store
        .building(&args.building)
        .wrap_err_with(|| format!("Building '{}' is not in the dataset", args.building))?;
    let participants: Vec<Participant> = store.participants(&building.id)?;
    let spots: Vec<ParkingSpot> = store.parking_spots(&building.id)?;

    let rng: SeededRandom = args
        .seed
        .map_or_else(SeededRandom::from_entropy, SeededRandom::from_seed);
    let settings: DrawSettings = DrawSettings {
        seed: Some(rng.seed()),
        gate_timeout_secs: args.gate_timeout,
        company_tag: args.company_tag.clone(),
    };
    info!(
        building = %building.name,
        seed = rng.seed(),
        gate = ?args.gate,
        "Preparing draw"
    );

    let cancellation: CancellationFlag = CancellationFlag::new();
    let interrupt = {
        let flag: CancellationFlag = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; the draw stops after the current stage");
                flag.cancel();
            }
        })
    };

    let outcome: Result<DrawOutcome, EngineError> = match args.gate {
        GateMode::Skip => {
            let engine = LotteryEngine::new(rng, AutoSkipGate).with_cancellation(cancellation);
            execute(engine, &building, &participants, &spots).await
        }
        GateMode::Interactive => {
            let lines = stdin_lines().wrap_err("Cannot read operator input")?;
            let (gate, requests) = ChannelGate::new(args.gate_timeout.map(Duration::from_secs));
            let operator = tokio::spawn(answer_requests(requests, lines));
            let engine = LotteryEngine::new(rng, gate).with_cancellation(cancellation);
            let outcome = execute(engine, &building, &participants, &spots).await;
            // The engine and its gate are gone, so the prompt winds down.
            operator
                .await
                .map_err(|err| eyre!("Manual selection prompt panicked: {err}"))?
                .wrap_err("Manual selection prompt failed")?;
            outcome
        }
    };
    interrupt.abort();

    let outcome: DrawOutcome = outcome.wrap_err("Draw failed")?;
    let summary: DrawSummary = outcome.summary.clone();
    let session: LotterySession = build_session(outcome, settings);

    let actor: Actor = Actor::new(args.actor.clone(), String::from("operator"));
    let cause: Cause = Cause::new(session.id.clone(), args.cause.clone());
    let event: AuditEvent = draw_audit_event(&session, actor, cause);
    // The completed session reaches the output before anything that can fail.
    write_json(args.output.as_deref(), &session).await?;
    append_audit(args.audit_log.as_deref(), &event).await?;
    keep_session(&*store, &session);

    if let Some(company_tag) = &args.company_tag {
        let publisher: StorePublisher = StorePublisher::new(Arc::clone(&store));
        let published: PublishOutcome =
            publisher.publish(&session, &building.name, &participants, &spots, company_tag);
        if !published.success {
            warn!(
                error = published.error.as_deref().unwrap_or("unknown"),
                "Session kept but not published; publish again later"
            );
        }
    }

    print_summary(&building, &session, &summary);
    Ok(())
}

/// Saves the session, reporting instead of failing: the draw is already
/// written out and stays valid without the store copy.
fn keep_session(store: &impl EntityStore, session: &LotterySession) -> bool {
    match store.save_session(session) {
        Ok(()) => true,
        Err(err) => {
            warn!(session_id = %session.id, error = %err, "Session not saved to the store");
            false
        }
    }
}

async fn execute<G: ManualSelectionGate>(
    mut engine: LotteryEngine<SeededRandom, G>,
    building: &Building,
    participants: &[Participant],
    spots: &[ParkingSpot],
) -> Result<DrawOutcome, EngineError> {
    engine.run(building, participants, spots).await
}

fn print_summary(building: &Building, session: &LotterySession, summary: &DrawSummary) {
    eprintln!();
    eprintln!("Draw {} for {}", session.id, building.name);
    for result in &session.results {
        eprintln!(
            "  {:<40} spot {:<8} {}",
            result.participant_snapshot.label(),
            result.spot_snapshot.number,
            result.allocation
        );
    }
    eprintln!(
        "Served: {} fully, {} partially, {} without a spot; {} spots left",
        summary.fully_served, summary.partially_served, summary.unserved, summary.spots_remaining
    );
    if !session.shortfalls.is_empty() {
        eprintln!("Shortfalls:");
        for shortfall in &session.shortfalls {
            eprintln!(
                "  {} in stage {}: {}",
                shortfall.participant_id,
                shortfall.stage,
                shortfall.reason.as_str()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use parking_lottery_persistence::StoreError;

    /// Store whose writes always fail.
    struct BrokenStore;

    impl EntityStore for BrokenStore {
        fn building(&self, id: &str) -> Result<Building, StoreError> {
            Err(StoreError::NotFound {
                kind: "building",
                id: id.to_string(),
            })
        }

        fn participants(&self, _building_id: &str) -> Result<Vec<Participant>, StoreError> {
            Ok(Vec::new())
        }

        fn parking_spots(&self, _building_id: &str) -> Result<Vec<ParkingSpot>, StoreError> {
            Ok(Vec::new())
        }

        fn save_session(&self, _session: &LotterySession) -> Result<(), StoreError> {
            Err(StoreError::LockPoisoned)
        }

        fn session(&self, id: &str) -> Result<LotterySession, StoreError> {
            Err(StoreError::NotFound {
                kind: "session",
                id: id.to_string(),
            })
        }
    }

    async fn session() -> LotterySession {
        let building: Building = Building::new("b-1", "Aurora");
        let participants: Vec<Participant> = vec![Participant::new("p-1", "b-1", "Maria")];
        let spots: Vec<ParkingSpot> = vec![ParkingSpot::new("s-1", "b-1", "12")];
        let mut engine = LotteryEngine::new(SeededRandom::from_seed(7), AutoSkipGate);
        let outcome: DrawOutcome = engine.run(&building, &participants, &spots).await.unwrap();
        build_session(outcome, DrawSettings::default())
    }

    #[tokio::test]
    async fn test_failed_save_does_not_lose_the_session() {
        let session: LotterySession = session().await;

        assert!(!keep_session(&BrokenStore, &session));
        assert_eq!(session.results.len(), 1);
    }

    #[tokio::test]
    async fn test_saved_session_reads_back() {
        let session: LotterySession = session().await;
        let store: MemoryStore = MemoryStore::new();

        assert!(keep_session(&store, &session));
        let stored: LotterySession = store.session(&session.id).unwrap();
        assert_eq!(stored.results, session.results);
    }
}
