//! Byte encoding of the participant queue.
//!
//! The persisted form is UTF-8 text with ids joined by [`DELIMITER`] and no
//! trailing delimiter. Ids are not escaped, so an id must never contain the
//! delimiter itself.

use super::ParticipantId;
use thiserror::Error;

/// Field separator between participant ids.
pub const DELIMITER: char = ',';

/// The stored bytes are not a readable queue.
#[derive(Error, Debug)]
#[error("content is not valid UTF-8: {0}")]
pub struct DecodeError(#[from] std::str::Utf8Error);

/// Encode an ordered queue into its stored representation.
pub fn encode(queue: &[ParticipantId]) -> Vec<u8> {
    let mut out = String::new();
    for (i, id) in queue.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        out.push_str(id.as_str());
    }
    out.into_bytes()
}

/// Decode stored bytes back into an ordered queue.
///
/// Empty input yields an empty queue. Segments are kept verbatim, including
/// surrounding whitespace.
pub fn decode(bytes: &[u8]) -> Result<Vec<ParticipantId>, DecodeError> {
    let text = std::str::from_utf8(bytes)?;
    if text.is_empty() {
        return Ok(Vec::new());
    }
    Ok(text.split(DELIMITER).map(ParticipantId::new).collect())
}
