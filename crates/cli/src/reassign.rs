// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::output::{append_audit, read_text, write_json};
use color_eyre::Result;
use color_eyre::eyre::{Context, eyre};
use parking_lottery::{LotterySession, SessionCommand, SessionTransition, apply};
use parking_lottery_audit::{Actor, Cause};
use parking_lottery_domain::ParkingSpot;
use parking_lottery_persistence::{Dataset, EntityStore, MemoryStore};
use std::path::PathBuf;

#[derive(Debug, Clone, clap::Args)]
pub struct ReassignArgs {
    /// Session JSON written by `draw`
    #[arg(short, long)]
    pub session: PathBuf,

    /// Dataset JSON holding the target spot
    #[arg(short, long)]
    pub input: PathBuf,

    /// Result to move
    #[arg(short, long)]
    pub result: String,

    /// Id of the spot to move it to
    #[arg(long)]
    pub spot: String,

    /// Where to write the edited session; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Who makes the change
    #[arg(long, default_value = "manager")]
    pub actor: String,

    /// Why the change is made
    #[arg(long, default_value = "Manual reassignment")]
    pub cause: String,

    /// Append audit events to this JSON-lines file
    #[arg(long)]
    pub audit_log: Option<PathBuf>,
}

pub async fn run(args: ReassignArgs) -> Result<()> {
    let session: LotterySession = serde_json::from_str(&read_text(&args.session).await?)
        .wrap_err_with(|| format!("{} is not a lottery session", args.session.display()))?;
    let store: MemoryStore =
        MemoryStore::from_dataset(&Dataset::from_json(&read_text(&args.input).await?)?)?;

    let spot: ParkingSpot = store
        .parking_spots(&session.building_id)?
        .into_iter()
        .find(|spot| spot.id == args.spot)
        .ok_or_else(|| {
            eyre!(
                "Parking spot '{}' is not in building '{}'",
                args.spot,
                session.building_id
            )
        })?;

    let transition: SessionTransition = apply(
        &session,
        SessionCommand::ReassignSpot {
            result_id: args.result.clone(),
            spot,
        },
        Actor::new(args.actor.clone(), String::from("manager")),
        Cause::new(session.id.clone(), args.cause.clone()),
    )?;

    append_audit(args.audit_log.as_deref(), &transition.audit_event).await?;
    write_json(args.output.as_deref(), &transition.new_session).await
}
