//! Outcome types for lock operations.

use crate::queue::{LockDocument, ParticipantId};
use crate::store::Handle;
use std::fmt;

/// A successful acquire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    pub id: ParticipantId,
    /// Attempt on which the head matched (1-based).
    pub attempts: u32,
    /// Version of the lock document that named this participant as head.
    pub handle: Handle,
}

/// Result of releasing the lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The head was removed and the shortened queue was written back.
    Released {
        released: ParticipantId,
        next: ParticipantId,
        handle: Handle,
    },
    /// The last participant released; nothing was written.
    AllDrained { released: ParticipantId },
}

impl ReleaseOutcome {
    /// The participant that gave up the lock.
    pub fn released(&self) -> &ParticipantId {
        match self {
            ReleaseOutcome::Released { released, .. } | ReleaseOutcome::AllDrained { released } => {
                released
            }
        }
    }
}

/// Read-only view of the current lock document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockSnapshot {
    pub name: String,
    pub handle: Handle,
    pub document: LockDocument,
}

impl fmt::Display for LockSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let holder = self
            .document
            .head()
            .map_or("<none>", ParticipantId::as_str);
        write!(
            f,
            "{} (version: {}, holder: {}, waiting: {})",
            self.name,
            self.handle,
            holder,
            self.document.waiters().len()
        )
    }
}
