//! Cross-window sync: the message codec and the channels that carry it.

pub mod bus;
pub mod message;

pub use bus::{BusChannel, Disconnected, LocalBus, SyncChannel, SyncError, SyncReceiver};
pub use message::{CodecError, SyncMessage, decode_message, encode_message};
