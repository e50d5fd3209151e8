use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, Point};

// One entry of `moves_history`. The wire format is the tuple `[x, y, player]`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8, u8)", into = "(u8, u8, u8)")]
pub struct MoveRecord {
    pub point: Point,
    pub player: Player,
}

impl TryFrom<(u8, u8, u8)> for MoveRecord {
    type Error = String;
    fn try_from((x, y, player): (u8, u8, u8)) -> Result<Self, Self::Error> {
        Ok(MoveRecord {
            point: Point::try_from((x, y))?,
            player: Player::try_from(player)?,
        })
    }
}

impl From<MoveRecord> for (u8, u8, u8) {
    fn from(record: MoveRecord) -> (u8, u8, u8) {
        (record.point.x(), record.point.y(), record.player.into())
    }
}

// The most recent move together with the AI's free-text justification.
// Wire format: `[x, y, reasoning]`, where `reasoning` may be null.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8, Option<String>)", into = "(u8, u8, Option<String>)")]
pub struct LastMove {
    pub point: Point,
    pub reasoning: Option<String>,
}

impl TryFrom<(u8, u8, Option<String>)> for LastMove {
    type Error = String;
    fn try_from((x, y, reasoning): (u8, u8, Option<String>)) -> Result<Self, Self::Error> {
        Ok(LastMove {
            point: Point::try_from((x, y))?,
            reasoning: reasoning.filter(|s| !s.is_empty()),
        })
    }
}

impl From<LastMove> for (u8, u8, Option<String>) {
    fn from(last_move: LastMove) -> (u8, u8, Option<String>) {
        (last_move.point.x(), last_move.point.y(), last_move.reasoning)
    }
}

// Response of `GET /game_state/{game_id}`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub game_id: String,
    pub board: Board,
    pub current_player: Player,
}
