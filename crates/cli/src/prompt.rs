// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Terminal front end for the manual selection gate.

use parking_lottery::{GateRequests, ManualSelectionRequest};
use std::io::BufRead;
use tokio::sync::mpsc;

/// A line read from the operator's terminal.
pub type InputLine = std::io::Result<String>;

/// A parsed operator reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choose(String),
    Skip,
    /// Not one of the offered spots; ask again.
    Retry,
}

/// Interprets one line of operator input.
///
/// Accepts a spot id or number first, then a 1-based list position. Empty
/// input, `s` or `skip` skips.
pub fn parse_answer(input: &str, request: &ManualSelectionRequest) -> Answer {
    let input: &str = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("s") || input.eq_ignore_ascii_case("skip") {
        return Answer::Skip;
    }

    let by_label = request
        .candidates
        .iter()
        .find(|spot| spot.id == input || spot.number == input);
    let by_position = input
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| request.candidates.get(index));

    by_label
        .or(by_position)
        .map_or(Answer::Retry, |spot| Answer::Choose(spot.id.clone()))
}

fn describe(request: &ManualSelectionRequest) {
    eprintln!();
    eprintln!(
        "No PcD spot left for {} (spot {} of {}). Available spots:",
        request.participant.label(),
        request.iteration,
        request.required
    );
    for (position, spot) in request.candidates.iter().enumerate() {
        eprintln!(
            "  [{}] spot {} floor {} sector {}",
            position + 1,
            spot.number,
            if spot.floor.is_empty() { "-" } else { spot.floor.as_str() },
            spot.sector.as_deref().unwrap_or("-")
        );
    }
}

/// Starts reading stdin lines on a dedicated thread.
///
/// A blocked stdin read cannot be cancelled, so it must not run on the tokio
/// runtime: the process would stay alive until the next Enter after a gate
/// timeout. The thread ends at end of input or once the receiver is dropped.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn stdin_lines() -> std::io::Result<mpsc::Receiver<InputLine>> {
    let (sender, receiver) = mpsc::channel(1);
    std::thread::Builder::new()
        .name(String::from("stdin-reader"))
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if sender.blocking_send(line).is_err() {
                    return;
                }
            }
        })?;
    Ok(receiver)
}

/// Answers gate requests from operator input until the engine is done.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub async fn answer_requests(
    mut requests: GateRequests,
    mut lines: mpsc::Receiver<InputLine>,
) -> std::io::Result<()> {
    while let Some(mut pending) = requests.next().await {
        describe(&pending.request);
        loop {
            eprint!("Spot number, list position, or 's' to skip: ");
            let line: Option<String> = tokio::select! {
                line = lines.recv() => line.transpose()?,
                () = pending.abandoned() => {
                    eprintln!();
                    eprintln!("No answer in time; skipped.");
                    break;
                }
            };

            // Closed stdin: nobody left to ask.
            let Some(line) = line else {
                pending.skip();
                return Ok(());
            };
            match parse_answer(&line, &pending.request) {
                Answer::Choose(spot_id) => {
                    pending.choose(&spot_id);
                    break;
                }
                Answer::Skip => {
                    pending.skip();
                    break;
                }
                Answer::Retry => eprintln!("'{}' is not one of the offered spots.", line.trim()),
            }
        }
    }
    Ok(())
}
