//! Command implementations for matrix-lock.
//!
//! This module provides the dispatcher that routes each CLI step to its
//! handler. Handlers are generic over the store and sleeper so the same code
//! runs against the workspace artifact store and against test doubles.

use crate::cli::{Cli, Command, ContinueArgs, InitArgs, WaitArgs};
use crate::config::Config;
use crate::context::LockContext;
use crate::error::Result;
use crate::lock::{LockSnapshot, MatrixLock, RetryPolicy, Sleeper};
use crate::queue::ParticipantId;
use crate::store::LockStore;
use tracing::{debug, info};

/// Dispatch a command to its implementation.
///
/// Resolves the invocation context first; a missing workspace or invalid
/// config fails before the store is touched.
pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = LockContext::resolve(
        cli.global.workspace.as_deref(),
        cli.global.config.as_deref(),
        cli.global.name.as_deref(),
    )?;
    debug!(
        workspace = %ctx.workspace.display(),
        store = %ctx.store_root().display(),
        file_name = %ctx.config.file_name,
        "resolved lock '{}'",
        ctx.lock_name()
    );
    let lock = ctx.open_lock();
    run(&ctx, &lock, cli.command)
}

/// Run one step against an already-opened lock.
pub(crate) fn run<S: LockStore, Z: Sleeper>(
    ctx: &LockContext,
    lock: &MatrixLock<S, Z>,
    command: Command,
) -> Result<()> {
    match command {
        Command::Init(args) => cmd_init(lock, args),
        Command::Wait(args) => cmd_wait(&ctx.config, lock, args),
        Command::Continue(args) => cmd_continue(lock, args),
        Command::Status => cmd_status(lock),
    }
}

fn cmd_init<S: LockStore, Z: Sleeper>(lock: &MatrixLock<S, Z>, args: InitArgs) -> Result<()> {
    let order = ParticipantId::parse_order(&args.order)?;
    lock.initialize(&order)?;
    Ok(())
}

fn cmd_wait<S: LockStore, Z: Sleeper>(
    config: &Config,
    lock: &MatrixLock<S, Z>,
    args: WaitArgs,
) -> Result<()> {
    let id = ParticipantId::parse(&args.id)?;
    let policy = wait_policy(config, &args)?;
    debug!(
        "Waiting at most {} seconds over {} attempts",
        policy.total_wait().as_secs(),
        policy.attempts
    );
    let acquired = lock.acquire(&id, &policy)?;
    debug!(handle = %acquired.handle, attempts = acquired.attempts, "acquired by {}", acquired.id);
    info!("Lock is ready");
    Ok(())
}

/// Merge command-line retry options over the configured ones.
fn wait_policy(config: &Config, args: &WaitArgs) -> Result<RetryPolicy> {
    let mut config = config.clone();
    if let Some(retry_count) = args.retry_count {
        config.retry_count = retry_count;
    }
    if let Some(retry_delay) = args.retry_delay {
        config.retry_delay_secs = retry_delay;
    }
    if let Some(backoff) = args.backoff {
        config.backoff = backoff;
    }
    config.validate()?;
    Ok(config.retry_policy())
}

fn cmd_continue<S: LockStore, Z: Sleeper>(
    lock: &MatrixLock<S, Z>,
    args: ContinueArgs,
) -> Result<()> {
    let caller = args.id.as_deref().map(ParticipantId::parse).transpose()?;
    let outcome = lock.release(caller.as_ref())?;
    debug!("release by {} complete", outcome.released());
    Ok(())
}

fn cmd_status<S: LockStore, Z: Sleeper>(lock: &MatrixLock<S, Z>) -> Result<()> {
    let snapshot = lock.snapshot()?;
    print!("{}", render_status(lock.name(), snapshot.as_ref()));
    Ok(())
}

/// Human-readable view of the lock document.
fn render_status(name: &str, snapshot: Option<&LockSnapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return format!("No lock document '{}'.\n", name);
    };

    let document = &snapshot.document;
    let holder = document.head().map_or("<none>", ParticipantId::as_str);
    let waiting = if document.waiters().is_empty() {
        "-".to_string()
    } else {
        document
            .waiters()
            .iter()
            .map(ParticipantId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = format!("Lock '{}' (version {}):\n", name, snapshot.handle);
    out.push_str(&format!("  Holder:  {}\n", holder));
    out.push_str(&format!("  Waiting: {}\n", waiting));
    if document.waiters().is_empty() {
        out.push_str(
            "  Note: a single entry is either the active holder or the last job left over after the queue drained\n",
        );
    }
    out
}
