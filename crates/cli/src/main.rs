// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # parking-lottery
//!
//! Runs condominium parking draws from a JSON dataset.
//!
//! - `parking-lottery draw` loads a dataset, runs the five-stage draw for one
//!   building and writes the completed session as JSON. With
//!   `--gate interactive` (the default) PcD participants left without a PcD
//!   spot are resolved by asking on the terminal.
//! - `parking-lottery reassign` moves one result of a saved session to
//!   another spot and writes the edited session.
//!
//! Logs go to stderr; `RUST_LOG` overrides the verbosity flags.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod draw;
mod output;
mod prompt;
mod reassign;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::Result;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(args.log_level().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match args.run().await {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Condominium parking lottery
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    async fn run(self) -> Result<()> {
        match self.command {
            Command::Draw(args) => draw::run(args).await,
            Command::Reassign(args) => reassign::run(args).await,
        }
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a draw for one building
    #[command(visible_alias = "d")]
    Draw(draw::DrawArgs),

    /// Move one result of a completed session to another spot
    #[command(visible_alias = "r")]
    Reassign(reassign::ReassignArgs),
}
