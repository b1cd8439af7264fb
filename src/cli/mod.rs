//! CLI argument parsing for matrix-lock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::lock::Backoff;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// matrix-lock: run CI matrix jobs one at a time, in a fixed order.
///
/// One job initializes a queue of participant ids. Every job then waits
/// until it is at the head of the queue, does its work, and continues,
/// handing the lock to the next id. Coordination happens only through a
/// shared artifact store.
#[derive(Parser, Debug)]
#[command(name = "matrix-lock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Base working directory shared with the artifact store.
    #[arg(long, global = true, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Lock name; jobs using different names do not exclude each other.
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Config file (default: `<workspace>/.matrix-lock.yaml`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug details.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available steps.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the queue, replacing any existing one.
    ///
    /// Run once, before any job waits.
    Init(InitArgs),

    /// Block until this job is at the head of the queue.
    ///
    /// Polls the store a bounded number of times and fails if the lock
    /// was not handed over in time.
    Wait(WaitArgs),

    /// Release the lock and hand it to the next job in the queue.
    Continue(ContinueArgs),

    /// Show the current holder and waiters without changing anything.
    Status,
}

/// Arguments for the `init` step.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Comma-separated participant ids, in the order they run (e.g. `a,b,c`).
    #[arg(long)]
    pub order: String,
}

/// Arguments for the `wait` step.
#[derive(Parser, Debug)]
pub struct WaitArgs {
    /// This job's participant id.
    #[arg(long)]
    pub id: String,

    /// Number of attempts before giving up [default: 6].
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub retry_count: Option<u32>,

    /// Seconds to wait between attempts [default: 10].
    #[arg(long)]
    pub retry_delay: Option<u64>,

    /// Delay growth between attempts [default: fixed].
    #[arg(long, value_enum)]
    pub backoff: Option<Backoff>,
}

/// Arguments for the `continue` step.
#[derive(Parser, Debug)]
pub struct ContinueArgs {
    /// This job's participant id; when given, refuse to release unless it
    /// holds the lock.
    #[arg(long)]
    pub id: Option<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
