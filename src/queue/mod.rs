//! The shared lock document: an ordered queue of participant ids.
//!
//! Position 0 is the current holder and every later position is a waiter, in
//! the order the queue was initialized with. The protocol never reorders the
//! queue; it only pops the head on release.

mod codec;

pub use codec::{DELIMITER, DecodeError, decode, encode};

use crate::error::{LockError, Result};
use std::fmt;

/// Identity of one participant (a single job in the matrix).
///
/// Uniqueness among participants is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Wrap a raw id without validation.
    ///
    /// Use [`ParticipantId::parse`] for ids coming from user input.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a user-supplied id, trimming surrounding whitespace.
    ///
    /// Fails with `ConfigError` if the id is empty or contains the delimiter.
    pub fn parse(raw: &str) -> Result<Self> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(LockError::ConfigError(
                "participant id must not be empty".to_string(),
            ));
        }
        if id.contains(DELIMITER) {
            return Err(LockError::ConfigError(format!(
                "participant id '{}' must not contain '{}'",
                id, DELIMITER
            )));
        }
        Ok(Self(id.to_string()))
    }

    /// Parse a delimiter-joined order such as `"A,B,C"`.
    ///
    /// Every entry must be a valid id and the list must not be empty.
    pub fn parse_order(raw: &str) -> Result<Vec<Self>> {
        if raw.trim().is_empty() {
            return Err(LockError::ConfigError(
                "order must name at least one participant".to_string(),
            ));
        }
        raw.split(DELIMITER).map(Self::parse).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The decoded contents of the lock document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockDocument {
    queue: Vec<ParticipantId>,
}

impl LockDocument {
    pub fn new(queue: Vec<ParticipantId>) -> Self {
        Self { queue }
    }

    /// Decode a document from its stored bytes.
    pub fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        decode(bytes).map(Self::new)
    }

    /// Encode the document into its stored bytes.
    pub fn encode(&self) -> Vec<u8> {
        encode(&self.queue)
    }

    /// The participant currently holding the lock.
    pub fn head(&self) -> Option<&ParticipantId> {
        self.queue.first()
    }

    /// Participants queued behind the holder, in order.
    pub fn waiters(&self) -> &[ParticipantId] {
        self.queue.get(1..).unwrap_or(&[])
    }

    /// Remove and return the holder. Later entries keep their order.
    pub fn pop_head(&mut self) -> Option<ParticipantId> {
        if self.queue.is_empty() {
            None
        } else {
            Some(self.queue.remove(0))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> &[ParticipantId] {
        &self.queue
    }
}
