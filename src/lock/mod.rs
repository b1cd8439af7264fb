//! Ordered mutual exclusion for matrix jobs.
//!
//! The lock is a single document in a shared store holding the queue of
//! participants. The head of the queue holds the lock:
//!
//! - `initialize` writes the queue in the order the jobs must run.
//! - `acquire` polls the document until the caller is at the head. The store
//!   has no notification mechanism, so polling is bounded by a
//!   [`RetryPolicy`] and ends in `AcquireTimeout` rather than a hang.
//! - `release` pops the head and writes the remainder back. When nothing
//!   remains, no write happens and the stale document marks completion.
//!
//! # Races
//!
//! The store offers no conditional write. A release racing another release
//! (or a re-initialize) loses one of the updates. The protocol relies on
//! only the current head ever releasing.

mod engine;
mod retry;
mod types;

pub use engine::MatrixLock;
pub use retry::{
    Backoff, DEFAULT_MAX_DELAY, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY, RetryPolicy, Sleeper,
    ThreadSleeper,
};
pub use types::{Acquired, LockSnapshot, ReleaseOutcome};
