// Drives `ClientState` with raw JSON frames to pin down the wire format the
// server actually speaks (`board` as a 19x19 matrix of 0/1/2, `moves_history`
// entries and `last_move` as JSON arrays, everything tagged by `"type"`).

use std::sync::mpsc;

use goban::board::{Board, Player, Point, BOARD_SIZE};
use goban::client::{ClientState, MoveCommandError, NotableEvent};
use goban::event::{ClientEvent, GameConfig, GameStarted, ServerEvent};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn pt(x: u8, y: u8) -> Point {
    Point::new(x, y).unwrap()
}

fn board_json(stones: &[(u8, u8, u8)]) -> Value {
    let mut rows = vec![vec![0u8; BOARD_SIZE.into()]; BOARD_SIZE.into()];
    for &(x, y, player) in stones {
        rows[usize::from(y)][usize::from(x)] = player;
    }
    json!(rows)
}

fn server_event(value: Value) -> ServerEvent {
    serde_json::from_value(value).unwrap()
}

fn init_event(player_number: u8, current_player: u8, stones: &[(u8, u8, u8)]) -> ServerEvent {
    let moves: Vec<Value> = stones.iter().map(|&(x, y, p)| json!([x, y, p])).collect();
    server_event(json!({
        "type": "init",
        "player_number": player_number,
        "board": board_json(stones),
        "current_player": current_player,
        "moves_history": moves,
        "chat_history": [],
        "last_move": null,
    }))
}

fn new_client() -> (ClientState, mpsc::Receiver<ClientEvent>) {
    let (tx, rx) = mpsc::channel();
    (ClientState::new("test-game".to_owned(), tx), rx)
}

#[test]
fn init_mirrors_server_snapshot() {
    let (mut client, _rx) = new_client();
    let notable = client
        .process_server_event(init_event(1, 1, &[(3, 3, 1), (15, 15, 2)]))
        .unwrap();
    assert_eq!(notable, NotableEvent::Initialized);
    assert_eq!(client.my_player_number(), Some(Player::Black));

    let game_state = client.game_state().unwrap();
    assert_eq!(game_state.board.get(pt(3, 3)), Some(Player::Black));
    assert_eq!(game_state.board.get(pt(15, 15)), Some(Player::White));
    assert_eq!(game_state.board.stone_count(), 2);
    assert_eq!(game_state.current_player, Player::Black);
    assert_eq!(game_state.moves_history.len(), 2);
    assert_eq!(game_state.moves_history[0].point, pt(3, 3));
    assert_eq!(game_state.moves_history[0].player, Player::Black);
    assert!(client.can_move());
}

#[test]
fn events_before_init_are_rejected() {
    let (mut client, _rx) = new_client();
    let chat = server_event(json!({ "type": "chat", "player": 2, "message": "hi" }));
    assert!(client.process_server_event(chat).is_err());
    assert!(client.game_state().is_none());
}

#[test]
fn make_move_sends_wire_event_and_blocks_until_confirmed() {
    let (mut client, rx) = new_client();
    client.process_server_event(init_event(1, 1, &[])).unwrap();

    client.make_move(pt(16, 3)).unwrap();
    let sent = rx.try_recv().unwrap();
    assert_eq!(
        serde_json::to_value(&sent).unwrap(),
        json!({ "type": "move", "x": 16, "y": 3 })
    );

    // Another move before the server confirms is refused.
    assert_eq!(client.make_move(pt(4, 4)), Err(MoveCommandError::MovePending));
    assert!(!client.can_move());

    let confirmation = server_event(json!({
        "type": "move_complete",
        "board": board_json(&[(16, 3, 1)]),
        "current_player": 2,
        "last_move": [16, 3, null],
        "thinking": "",
        "chat_history": [],
        "moves_history": [[16, 3, 1]],
    }));
    let notable = client.process_server_event(confirmation).unwrap();
    assert_eq!(notable, NotableEvent::MoveCompleted(Some(pt(16, 3))));
    // Confirmed, but now it is White's turn.
    assert_eq!(client.make_move(pt(4, 4)), Err(MoveCommandError::NotYourTurn));
}

#[test]
fn move_guards() {
    let (mut client, _rx) = new_client();
    assert_eq!(client.make_move(pt(0, 0)), Err(MoveCommandError::NoGameInProgress));

    client.process_server_event(init_event(2, 2, &[(9, 9, 1)])).unwrap();
    assert_eq!(
        client.make_move(pt(9, 9)),
        Err(MoveCommandError::PointOccupied(pt(9, 9)))
    );

    client.process_server_event(init_event(2, 1, &[(9, 9, 1)])).unwrap();
    assert_eq!(client.make_move(pt(0, 0)), Err(MoveCommandError::NotYourTurn));
}

#[test]
fn thinking_start_raises_and_move_complete_clears_the_indicator() {
    let (mut client, _rx) = new_client();
    client.process_server_event(init_event(1, 2, &[(3, 3, 1)])).unwrap();

    let thinking = server_event(json!({
        "type": "thinking_start",
        "player": 2,
        "board": board_json(&[(3, 3, 1)]),
        "current_player": 2,
        "moves_history": [[3, 3, 1]],
    }));
    let notable = client.process_server_event(thinking).unwrap();
    assert_eq!(notable, NotableEvent::ThinkingStarted(Player::White));
    assert_eq!(client.game_state().unwrap().thinking, Some(Player::White));

    let complete = server_event(json!({
        "type": "move_complete",
        "board": board_json(&[(3, 3, 1), (15, 3, 2)]),
        "current_player": 1,
        "last_move": [15, 3, "Approaching the corner."],
        "thinking": "Approaching the corner.",
        "chat_history": [
            { "type": "chat", "player": 2, "message": "Approaching the corner." },
        ],
        "moves_history": [[3, 3, 1], [15, 3, 2]],
    }));
    client.process_server_event(complete).unwrap();

    let game_state = client.game_state().unwrap();
    assert_eq!(game_state.thinking, None);
    assert_eq!(game_state.board.get(pt(15, 3)), Some(Player::White));
    assert_eq!(game_state.chat_history.len(), 1);
    assert_eq!(game_state.chat_history[0].player, Player::White);

    // The reasoning is attributed to the player who made the move.
    let log = client.reasoning_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].player, Player::White);
    assert_eq!(log[0].point, pt(15, 3));
    assert_eq!(log[0].text, "Approaching the corner.");
    assert!(client.can_move());
}

#[test]
fn chat_messages_append_and_outgoing_chat_is_trimmed() {
    let (mut client, rx) = new_client();
    client.process_server_event(init_event(1, 1, &[])).unwrap();

    let chat = server_event(json!({ "type": "chat", "player": 2, "message": "good game" }));
    let notable = client.process_server_event(chat).unwrap();
    match notable {
        NotableEvent::ChatReceived(msg) => {
            assert_eq!(msg.player, Player::White);
            assert_eq!(msg.message, "good game");
        }
        other => panic!("expected ChatReceived, got {other:?}"),
    }
    assert_eq!(client.game_state().unwrap().chat_history.len(), 1);

    client.send_chat("  hello there  ");
    assert_eq!(
        serde_json::to_value(rx.try_recv().unwrap()).unwrap(),
        json!({ "type": "chat", "message": "hello there" })
    );

    // Whitespace-only input is dropped.
    client.send_chat("   ");
    assert!(rx.try_recv().is_err());
}

#[test]
fn reconnect_init_rebuilds_the_panels_without_duplicates() {
    let (mut client, _rx) = new_client();
    let init_with_reasoning = json!({
        "type": "init",
        "player_number": 1,
        "board": board_json(&[(3, 3, 1), (15, 3, 2)]),
        "current_player": 1,
        "moves_history": [[3, 3, 1], [15, 3, 2]],
        "chat_history": [
            { "type": "chat", "player": 2, "message": "Approaching the corner." },
        ],
        "last_move": [15, 3, "Approaching the corner."],
    });
    client.process_server_event(server_event(init_with_reasoning.clone())).unwrap();
    client.process_server_event(server_event(init_with_reasoning)).unwrap();

    assert_eq!(client.reasoning_log().len(), 1);
    assert_eq!(client.game_state().unwrap().chat_history.len(), 1);
    assert!(client.can_move());
}

#[test]
fn malformed_board_is_a_parse_error() {
    // 18 rows instead of 19.
    let rows = vec![vec![0u8; BOARD_SIZE.into()]; usize::from(BOARD_SIZE) - 1];
    assert!(serde_json::from_value::<Board>(json!(rows)).is_err());

    // An out-of-range stone color.
    let mut rows = vec![vec![0u8; BOARD_SIZE.into()]; BOARD_SIZE.into()];
    rows[0][0] = 3;
    assert!(serde_json::from_value::<Board>(json!(rows)).is_err());
}

#[test]
fn http_types_match_the_server_api() {
    let config = GameConfig {
        black_model_url: Some("http://llm:8080/v1/chat/completions".to_owned()),
        black_model_name: Some("some-model".to_owned()),
        ..GameConfig::default()
    };
    assert_eq!(
        serde_json::to_value(&config).unwrap(),
        json!({
            "player_type": "ai",
            "black_model_url": "http://llm:8080/v1/chat/completions",
            "black_model_name": "some-model",
            "white_model_url": null,
            "white_model_name": null,
            "first_player": 1,
        })
    );

    let started: GameStarted = serde_json::from_value(json!({
        "game_id": "8a2b...",
        "message": "created",
        "board": board_json(&[]),
        "current_player": 1,
        "last_move": null,
    }))
    .unwrap();
    assert_eq!(started.game_id, "8a2b...");
    assert_eq!(started.current_player, Player::Black);
    assert_eq!(started.board, Board::empty());
}
