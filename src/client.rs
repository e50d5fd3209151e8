use std::sync::mpsc;

use log::info;
use time::OffsetDateTime;

use crate::board::{Board, Player, Point};
use crate::chat::{ChatMessage, MAX_CHAT_MESSAGE_LENGTH};
use crate::event::{ClientEvent, ServerEvent};
use crate::game::{LastMove, MoveRecord};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveCommandError {
    NoGameInProgress,
    NotYourTurn,
    // A move was already sent and the server hasn't confirmed it yet.
    MovePending,
    PointOccupied(Point),
}

#[derive(Clone, Debug)]
pub enum EventError {
    CannotApplyEvent(String),
}

// Digest of a server event for client implementations that want to react
// beyond repainting (clear the screen, ring a bell, ...).
#[derive(Clone, PartialEq, Debug)]
pub enum NotableEvent {
    None,
    Initialized,
    ThinkingStarted(Player),
    MoveCompleted(Option<Point>),
    ChatReceived(ChatMessage),
}

// One entry of the AI reasoning panel, timestamped at receipt.
#[derive(Clone, PartialEq, Debug)]
pub struct ReasoningEntry {
    pub received: OffsetDateTime,
    pub player: Player,
    pub point: Point,
    pub text: String,
}

// Mirror of the latest server-pushed game snapshot. No invariants of its own:
// every field is replaced wholesale when the server says so.
#[derive(Clone, PartialEq, Debug)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    pub moves_history: Vec<MoveRecord>,
    pub chat_history: Vec<ChatMessage>,
    pub last_move: Option<LastMove>,
    // `Some(p)` while the server says player `p`'s AI is computing a move.
    pub thinking: Option<Player>,
}

pub struct ClientState {
    game_id: String,
    my_player_number: Option<Player>,
    move_pending: bool,
    game_state: Option<GameState>,
    reasoning_log: Vec<ReasoningEntry>,
    events_tx: mpsc::Sender<ClientEvent>,
}

impl ClientState {
    pub fn new(game_id: String, events_tx: mpsc::Sender<ClientEvent>) -> Self {
        ClientState {
            game_id,
            my_player_number: None,
            move_pending: false,
            game_state: None,
            reasoning_log: Vec::new(),
            events_tx,
        }
    }

    pub fn game_id(&self) -> &str { &self.game_id }
    pub fn my_player_number(&self) -> Option<Player> { self.my_player_number }
    pub fn game_state(&self) -> Option<&GameState> { self.game_state.as_ref() }
    pub fn reasoning_log(&self) -> &[ReasoningEntry] { &self.reasoning_log }

    // Whether a move can be entered right now. Mirrors the original client's
    // board enabling: the game is on, it is our turn, nothing is in flight.
    pub fn can_move(&self) -> bool {
        match (&self.game_state, self.my_player_number) {
            (Some(game_state), Some(me)) => {
                game_state.current_player == me
                    && game_state.thinking.is_none()
                    && !self.move_pending
            }
            _ => false,
        }
    }

    // Relays a move to the server. Only visibly nonsensical moves are rejected
    // here; real legality is the server's business.
    pub fn make_move(&mut self, point: Point) -> Result<(), MoveCommandError> {
        let me = self.my_player_number.ok_or(MoveCommandError::NoGameInProgress)?;
        let game_state =
            self.game_state.as_ref().ok_or(MoveCommandError::NoGameInProgress)?;
        if game_state.current_player != me || game_state.thinking.is_some() {
            return Err(MoveCommandError::NotYourTurn);
        }
        if self.move_pending {
            return Err(MoveCommandError::MovePending);
        }
        if !game_state.board.is_empty(point) {
            return Err(MoveCommandError::PointOccupied(point));
        }
        self.events_tx.send(ClientEvent::move_at(point)).unwrap();
        self.move_pending = true;
        Ok(())
    }

    // Relays a chat message. Empty input is dropped; overlong input is
    // truncated rather than rejected.
    pub fn send_chat(&mut self, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }
        let message = message.chars().take(MAX_CHAT_MESSAGE_LENGTH).collect();
        self.events_tx.send(ClientEvent::Chat { message }).unwrap();
    }

    pub fn process_server_event(
        &mut self, event: ServerEvent,
    ) -> Result<NotableEvent, EventError> {
        match event {
            ServerEvent::Init {
                player_number,
                board,
                current_player,
                moves_history,
                chat_history,
                last_move,
            } => {
                info!(
                    "Connected to game {} as player {} ({})",
                    self.game_id,
                    u8::from(player_number),
                    player_number
                );
                self.my_player_number = Some(player_number);
                self.move_pending = false;
                // Full snapshot: the reasoning panel is rebuilt from scratch,
                // like the chat panel, so a reconnect doesn't duplicate entries.
                self.reasoning_log.clear();
                self.game_state = Some(GameState {
                    board,
                    current_player,
                    moves_history,
                    chat_history,
                    last_move: last_move.clone(),
                    thinking: None,
                });
                if let Some(last_move) = last_move {
                    self.record_reasoning(last_move, current_player.opponent());
                }
                Ok(NotableEvent::Initialized)
            }
            ServerEvent::Chat { player, message } => {
                let game_state = self.game_state_mut("chat message")?;
                let message = ChatMessage { player, message };
                game_state.chat_history.push(message.clone());
                Ok(NotableEvent::ChatReceived(message))
            }
            ServerEvent::ThinkingStart { player, board, current_player, moves_history } => {
                let game_state = self.game_state_mut("thinking notification")?;
                game_state.board = board;
                game_state.current_player = current_player;
                game_state.moves_history = moves_history;
                game_state.thinking = Some(player);
                Ok(NotableEvent::ThinkingStarted(player))
            }
            ServerEvent::MoveComplete {
                board,
                current_player,
                last_move,
                thinking: _,
                chat_history,
                moves_history,
            } => {
                let game_state = self.game_state_mut("move")?;
                game_state.board = board;
                game_state.current_player = current_player;
                game_state.moves_history = moves_history;
                game_state.chat_history = chat_history;
                game_state.last_move = last_move.clone();
                game_state.thinking = None;
                self.move_pending = false;
                let point = last_move.as_ref().map(|m| m.point);
                if let Some(last_move) = last_move {
                    // The mover is whoever is *not* to play in the new snapshot.
                    self.record_reasoning(last_move, current_player.opponent());
                }
                Ok(NotableEvent::MoveCompleted(point))
            }
        }
    }

    fn game_state_mut(&mut self, what: &str) -> Result<&mut GameState, EventError> {
        self.game_state.as_mut().ok_or_else(|| {
            EventError::CannotApplyEvent(format!(
                "Got {what} before game init; dropping it"
            ))
        })
    }

    fn record_reasoning(&mut self, last_move: LastMove, player: Player) {
        let Some(text) = last_move.reasoning else {
            return;
        };
        self.reasoning_log.push(ReasoningEntry {
            received: OffsetDateTime::now_utc(),
            player,
            point: last_move.point,
            text,
        });
    }
}
