use serde::{Deserialize, Serialize};

use crate::board::Player;

pub const MAX_CHAT_MESSAGE_LENGTH: usize = 500;

// A chat line, sent either by a human player or synthesized by the server from
// an AI's reasoning. History entries on the wire carry a redundant
// `"type": "chat"` key, which deserialization silently drops.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub player: Player,
    pub message: String,
}
