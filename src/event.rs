use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, Point};
use crate::chat::ChatMessage;
use crate::game::{LastMove, MoveRecord};

// Messages pushed by the server over the WebSocket. The wire protocol tags
// every JSON object with a `"type"` string.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    // Sent once per (re)connection. Carries the full game state, so processing
    // it again after a reconnect is always safe.
    Init {
        player_number: Player,
        board: Board,
        current_player: Player,
        moves_history: Vec<MoveRecord>,
        chat_history: Vec<ChatMessage>,
        last_move: Option<LastMove>,
    },
    Chat {
        player: Player,
        message: String,
    },
    // An AI player has started computing its move.
    ThinkingStart {
        player: Player,
        board: Board,
        current_player: Player,
        moves_history: Vec<MoveRecord>,
    },
    // A move (human or AI) has been applied server-side. `thinking` duplicates
    // `last_move`'s reasoning text and is ignored in favor of the latter.
    MoveComplete {
        board: Board,
        current_player: Player,
        #[serde(default)]
        last_move: Option<LastMove>,
        #[serde(default)]
        thinking: Option<String>,
        chat_history: Vec<ChatMessage>,
        moves_history: Vec<MoveRecord>,
    },
}

// Messages the client sends over the WebSocket.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Move { x: u8, y: u8 },
    Chat { message: String },
}

impl ClientEvent {
    pub fn move_at(point: Point) -> Self {
        ClientEvent::Move { x: point.x(), y: point.y() }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Ai,
    Human,
}

// Body of `POST /start_game`. A side without a model URL is played by a human.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    pub player_type: PlayerKind,
    pub black_model_url: Option<String>,
    pub black_model_name: Option<String>,
    pub white_model_url: Option<String>,
    pub white_model_name: Option<String>,
    pub first_player: Player,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            player_type: PlayerKind::Ai,
            black_model_url: None,
            black_model_name: None,
            white_model_url: None,
            white_model_name: None,
            first_player: Player::Black,
        }
    }
}

// Response of `POST /start_game`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct GameStarted {
    pub game_id: String,
    pub message: String,
    pub board: Board,
    pub current_player: Player,
    #[serde(default)]
    pub last_move: Option<LastMove>,
}
