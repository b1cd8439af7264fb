//! The lock protocol: initialize, acquire, release.

use super::retry::{RetryPolicy, Sleeper, ThreadSleeper};
use super::types::{Acquired, LockSnapshot, ReleaseOutcome};
use crate::error::{LockError, Result};
use crate::queue::{DecodeError, LockDocument, ParticipantId};
use crate::store::{Handle, LockStore, StoreError};
use tracing::{debug, info, warn};

/// Why a read of the lock document failed.
enum ReadFailure {
    Store(StoreError),
    Decode(DecodeError),
}

/// A named FIFO lock kept in a [`LockStore`].
///
/// Every operation is one read-modify-write cycle against the store with no
/// compare-and-swap. Only the current head is expected to call
/// [`MatrixLock::release`]; two concurrent releases lose one update.
#[derive(Debug, Clone)]
pub struct MatrixLock<S, Z = ThreadSleeper> {
    store: S,
    name: String,
    sleeper: Z,
}

impl<S: LockStore> MatrixLock<S> {
    /// Create a lock that suspends the current thread between acquire attempts.
    pub fn new(store: S, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            sleeper: ThreadSleeper,
        }
    }
}

impl<S: LockStore, Z: Sleeper> MatrixLock<S, Z> {
    /// Replace the strategy used to suspend between acquire attempts.
    pub fn with_sleeper<Y: Sleeper>(self, sleeper: Y) -> MatrixLock<S, Y> {
        MatrixLock {
            store: self.store,
            name: self.name,
            sleeper,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write `order` as a fresh queue, replacing any existing one.
    ///
    /// Initializing twice silently overwrites the earlier queue.
    pub fn initialize(&self, order: &[ParticipantId]) -> Result<Handle> {
        if order.is_empty() {
            return Err(LockError::ConfigError(
                "order must name at least one participant".to_string(),
            ));
        }

        let order_str = order
            .iter()
            .map(ParticipantId::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        info!("Initializing matrix lock with order: {}", order_str);

        let document = LockDocument::new(order.to_vec());
        let handle = self
            .store
            .put(&self.name, &document.encode())
            .map_err(|source| self.write_error(source))?;

        info!("Matrix lock initialized successfully (ID: {})", handle);
        Ok(handle)
    }

    /// Poll until `id` is at the head of the queue or attempts run out.
    ///
    /// Store failures on an attempt are logged and retried; a corrupt
    /// document aborts immediately. There is no suspension after the final
    /// attempt.
    pub fn acquire(&self, id: &ParticipantId, policy: &RetryPolicy) -> Result<Acquired> {
        if policy.attempts == 0 {
            return Err(LockError::ConfigError(
                "retry count must be at least 1".to_string(),
            ));
        }

        info!("Waiting for lock...");

        for attempt in 1..=policy.attempts {
            info!("Attempt {}/{}", attempt, policy.attempts);

            match self.read() {
                Ok((handle, document)) => {
                    let holder = document.head().map_or("<none>", ParticipantId::as_str);
                    info!("Current lock holder: {}", holder);
                    info!("Waiting for: {}", id);

                    if document.head() == Some(id) {
                        info!("Lock acquired for: {}", id);
                        return Ok(Acquired {
                            id: id.clone(),
                            attempts: attempt,
                            handle,
                        });
                    }
                }
                Err(ReadFailure::Store(e)) => {
                    warn!("Failed to read lock on attempt {}: {}", attempt, e);
                }
                Err(ReadFailure::Decode(e)) => return Err(e.into()),
            }

            if attempt < policy.attempts {
                let delay = policy.delay_after(attempt);
                info!(
                    "Waiting {} seconds before next attempt...",
                    delay.as_secs_f64()
                );
                self.sleeper.sleep(delay);
            }
        }

        Err(LockError::AcquireTimeout {
            id: id.to_string(),
            attempts: policy.attempts,
        })
    }

    /// Pass the lock from the head of the queue to the next participant.
    ///
    /// When `caller` is given, the release is refused unless it is the
    /// current head. Releasing the last participant writes nothing and leaves
    /// the document in place, stale.
    pub fn release(&self, caller: Option<&ParticipantId>) -> Result<ReleaseOutcome> {
        info!("Releasing lock...");

        let (_, mut document) = self.read().map_err(|failure| match failure {
            ReadFailure::Store(source) => self.read_error(source),
            ReadFailure::Decode(e) => e.into(),
        })?;

        let Some(released) = document.pop_head() else {
            return Err(LockError::EmptyQueue(self.name.clone()));
        };

        if let Some(caller) = caller
            && caller != &released
        {
            return Err(LockError::AuthorizationError {
                caller: caller.to_string(),
                holder: released.to_string(),
            });
        }

        info!("Released lock for: {}", released);

        let Some(next) = document.head().cloned() else {
            info!("All jobs completed, lock released");
            return Ok(ReleaseOutcome::AllDrained { released });
        };

        let handle = self
            .store
            .put(&self.name, &document.encode())
            .map_err(|source| self.write_error(source))?;

        info!("Next in queue: {}", next);
        Ok(ReleaseOutcome::Released {
            released,
            next,
            handle,
        })
    }

    /// Read the current document without modifying it.
    ///
    /// Returns `None` when no document has ever been written under this name.
    pub fn snapshot(&self) -> Result<Option<LockSnapshot>> {
        match self.read() {
            Ok((handle, document)) => Ok(Some(LockSnapshot {
                name: self.name.clone(),
                handle,
                document,
            })),
            Err(ReadFailure::Store(StoreError::NotFound(_))) => Ok(None),
            Err(ReadFailure::Store(source)) => Err(self.read_error(source)),
            Err(ReadFailure::Decode(e)) => Err(e.into()),
        }
    }

    /// Resolve, fetch and decode the current document.
    fn read(&self) -> std::result::Result<(Handle, LockDocument), ReadFailure> {
        let handle = self.store.resolve(&self.name).map_err(ReadFailure::Store)?;
        let bytes = self.store.fetch(&handle).map_err(ReadFailure::Store)?;
        let document = LockDocument::decode(&bytes).map_err(ReadFailure::Decode)?;
        debug!(handle = %handle, participants = document.len(), "read lock document");
        Ok((handle, document))
    }

    fn read_error(&self, source: StoreError) -> LockError {
        LockError::StoreReadError {
            name: self.name.clone(),
            source,
        }
    }

    fn write_error(&self, source: StoreError) -> LockError {
        LockError::StoreWriteError {
            name: self.name.clone(),
            source,
        }
    }
}
