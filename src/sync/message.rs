//! Wire format of cross-window messages.
//!
//! A single message shape travels on the channel:
//! `{"type": "UPDATE", "payload": <board>}`. The payload is the full board,
//! so a receiver never needs earlier messages to apply a later one.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use canvas::doc::Board;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Tag of the only message type.
pub const UPDATE_TYPE: &str = "UPDATE";

/// Error returned by [`decode_message`] and [`encode_message`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Not JSON, or a payload that is not a board.
    #[error("malformed sync message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Valid JSON whose `type` is missing or not one this crate knows.
    #[error("unknown sync message type: {0:?}")]
    UnknownType(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SyncMessage {
    /// The sender's canonical board after a commit.
    #[serde(rename = "UPDATE")]
    Update(Board),
}

impl SyncMessage {
    #[must_use]
    pub fn board(&self) -> &Board {
        match self {
            Self::Update(board) => board,
        }
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        match self {
            Self::Update(board) => board,
        }
    }
}

/// Serialize a message to its JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] if a card carries a value JSON cannot hold.
pub fn encode_message(message: &SyncMessage) -> Result<String, CodecError> {
    Ok(serde_json::to_string(message)?)
}

/// Parse a message from JSON text.
///
/// The payload is repaired: repeated card ids are dropped (first occurrence
/// wins) and card sizes are normalized.
///
/// # Errors
///
/// Returns [`CodecError::UnknownType`] when the `type` tag is absent or
/// unrecognized and [`CodecError::Malformed`] for anything else that does not
/// parse.
pub fn decode_message(raw: &str) -> Result<SyncMessage, CodecError> {
    let value: Value = serde_json::from_str(raw)?;
    let tag = value.get("type").and_then(Value::as_str);
    if tag != Some(UPDATE_TYPE) {
        return Err(CodecError::UnknownType(tag.map(str::to_string)));
    }
    let SyncMessage::Update(mut board) = serde_json::from_value(value)?;
    let dropped = board.repair();
    if dropped > 0 {
        warn!(dropped, "update repeated card ids; kept first occurrences");
    }
    Ok(SyncMessage::Update(board))
}
