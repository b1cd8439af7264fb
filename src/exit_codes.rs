//! Exit code constants for the matrix-lock CLI.
//!
//! - 0: Success
//! - 1: User error (missing input, bad config, nothing to release)
//! - 2: Store failure (artifact could not be read or written)
//! - 3: Decode failure (lock document is corrupt)
//! - 4: Lock acquisition timed out
//! - 5: Caller is not the current lock holder

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: missing required input, invalid configuration or state.
pub const USER_ERROR: i32 = 1;

/// The artifact store could not be read or written.
pub const STORE_FAILURE: i32 = 2;

/// The persisted lock document could not be decoded.
pub const DECODE_FAILURE: i32 = 3;

/// Retries were exhausted before this participant reached the head of the queue.
pub const LOCK_TIMEOUT: i32 = 4;

/// A release was attempted by a participant that does not hold the lock.
pub const AUTHORIZATION_FAILURE: i32 = 5;
