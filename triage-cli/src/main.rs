//! Triage replay tool.
//!
//! Feeds admission records into an indexed priority heap and prints the
//! most urgent patient.
//!
//! Usage:
//!   triage --input admissions.jsonl
//!   cat admissions.jsonl | triage --strict --json
//!
//! Each input line is `{"id": <int>, "priority": <1..=10>, "label": <text>}`.
//! A repeated id updates the queued patient in place.

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use triage_cli::{ReplayOptions, render, replay};
use triage_queue::IndexedPriorityHeap;

#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(about = "Replay triage admissions and report the most urgent patient")]
struct Args {
    /// JSON-lines file of admissions (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Abort on the first invalid record
    #[arg(long)]
    strict: bool,

    /// Log the top patient after every applied record
    #[arg(long)]
    trace_top: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let options = ReplayOptions {
        strict: args.strict,
        trace_top: args.trace_top,
    };
    let mut heap = IndexedPriorityHeap::new();

    let report = match &args.input {
        Some(path) => {
            info!("Reading admissions from {:?}", path);
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            replay(&mut heap, BufReader::new(file), options)?
        }
        None => {
            info!("Reading admissions from stdin");
            replay(&mut heap, io::stdin().lock(), options)?
        }
    };

    println!("{}", render(&report, args.json)?);
    Ok(())
}
