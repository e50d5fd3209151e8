use std::fmt;
use std::io;
use std::net::TcpStream;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::style::{self, Stylize};
use crossterm::{cursor, event as term_event, execute, terminal};
use goban::board::{Point, BOARD_SIZE};
use goban::client::{ClientState, EventError, MoveCommandError, NotableEvent};
use goban::event::{ClientEvent, ServerEvent};
use log::{info, warn};
use scopeguard::defer;
use tungstenite::protocol::Role;
use tungstenite::WebSocket;

use crate::network;
use crate::tui;

const CHAT_PANEL_LINES: usize = 8;
const REASONING_PANEL_ENTRIES: usize = 3;

pub struct ClientConfig {
    pub server_address: String,
    pub game_id: String,
}

enum IncomingEvent {
    Network(ServerEvent),
    Connected,
    Disconnected,
    Terminal(term_event::Event),
    Tick,
}

enum OutgoingCmd {
    // A fresh connection was established; subsequent sends go through it.
    SocketReplaced(WebSocket<TcpStream>),
    Send(ClientEvent),
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(stdout, style::Print(line), cursor::MoveToNextLine(1), cursor::Hide)?;
    }
    Ok(())
}

fn render(
    stdout: &mut io::Stdout, client_state: &ClientState, board_cursor: Point, connected: bool,
    keyboard_input: &str, command_error: &Option<String>,
) -> io::Result<()> {
    execute!(stdout, cursor::MoveTo(0, 0))?;
    if let Some(game_state) = client_state.game_state() {
        let cursor_pos = client_state.can_move().then_some(board_cursor);
        let last_move = game_state.last_move.as_ref().map(|m| m.point);
        writeln_raw(stdout, tui::render_board(&game_state.board, last_move, cursor_pos))?;
        writeln_raw(stdout, tui::render_status(client_state))?;
        if !connected {
            writeln_raw(stdout, "Connection lost, reconnecting...".with(style::Color::Yellow))?;
        }
        writeln_raw(stdout, "")?;
        writeln_raw(stdout, tui::render_chat(&game_state.chat_history, CHAT_PANEL_LINES))?;
        writeln_raw(stdout, "")?;
        writeln_raw(
            stdout,
            tui::render_reasoning(client_state.reasoning_log(), REASONING_PANEL_ENTRIES),
        )?;
    } else if connected {
        writeln_raw(stdout, "Waiting for the server...")?;
    } else {
        writeln_raw(stdout, "Connecting...")?;
    }

    writeln_raw(stdout, "")?;
    let input_style = if client_state.can_move() {
        style::Color::White
    } else {
        style::Color::DarkGrey
    };
    writeln_raw(stdout, format!("> {keyboard_input}▂").with(input_style))?;
    if let Some(ref err) = command_error {
        writeln_raw(stdout, err.clone().with(style::Color::Red))?;
    }
    writeln_raw(
        stdout,
        "Arrows + Enter: play at cursor.  \"x y\": play by coordinates.  \
         Text: chat.  /quit: exit."
            .with(style::Color::DarkGrey),
    )?;
    execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;
    Ok(())
}

fn parse_coords(input: &str) -> Option<Point> {
    let mut parts = input.split([' ', ',']).filter(|s| !s.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Point::new(x, y)
}

fn move_error_message(err: MoveCommandError) -> String {
    match err {
        MoveCommandError::NoGameInProgress => "Cannot play: no game in progress".to_owned(),
        MoveCommandError::NotYourTurn => "Cannot play: not your turn".to_owned(),
        MoveCommandError::MovePending => "Cannot play: waiting for the server".to_owned(),
        MoveCommandError::PointOccupied(point) => {
            format!("Cannot play at {point}: intersection is occupied")
        }
    }
}

pub fn run(config: ClientConfig) -> io::Result<()> {
    let ClientConfig { server_address, game_id } = config;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show).unwrap();
        terminal::disable_raw_mode().unwrap();
    };

    let (tx, rx) = mpsc::channel();
    let (out_tx, out_rx) = mpsc::channel();

    // Connection lifecycle thread: connect, hand the write half to the writer
    // thread, pump incoming events, reconnect on a fixed delay when the socket
    // goes down. The server re-sends `init` on every connection.
    let tx_net = tx.clone();
    let out_tx_net = out_tx.clone();
    let net_server_address = server_address.clone();
    let net_game_id = game_id.clone();
    thread::spawn(move || loop {
        match network::connect_game_socket(&net_server_address, &net_game_id) {
            Ok(mut socket_in) => {
                match network::clone_websocket(&socket_in, Role::Client) {
                    Ok(socket_out) => {
                        if out_tx_net.send(OutgoingCmd::SocketReplaced(socket_out)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        warn!("Cannot clone websocket: {err}");
                        return;
                    }
                }
                if tx_net.send(IncomingEvent::Connected).is_err() {
                    return;
                }
                loop {
                    match network::read_obj(&mut socket_in) {
                        Ok(ev) => {
                            if tx_net.send(IncomingEvent::Network(ev)).is_err() {
                                return;
                            }
                        }
                        Err(err) => {
                            info!("Websocket closed: {err:?}");
                            break;
                        }
                    }
                }
            }
            Err(err) => info!("Cannot connect: {err:?}"),
        }
        if tx_net.send(IncomingEvent::Disconnected).is_err() {
            return;
        }
        thread::sleep(network::RECONNECT_DELAY);
    });

    let tx_local = tx.clone();
    thread::spawn(move || loop {
        let ev = term_event::read().unwrap();
        if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
            return;
        }
    });

    let tx_tick = tx;
    thread::spawn(move || loop {
        thread::sleep(Duration::from_millis(100));
        if tx_tick.send(IncomingEvent::Tick).is_err() {
            return;
        }
    });

    // Writer thread. Events sent while disconnected are dropped, which is what
    // the original browser client did with a closed socket too.
    thread::spawn(move || {
        let mut socket: Option<WebSocket<TcpStream>> = None;
        for cmd in out_rx {
            match cmd {
                OutgoingCmd::SocketReplaced(new_socket) => socket = Some(new_socket),
                OutgoingCmd::Send(ev) => {
                    if let Some(ref mut s) = socket {
                        if let Err(err) = network::write_obj(s, &ev) {
                            warn!("Cannot send event: {err:?}");
                            socket = None;
                        }
                    } else {
                        warn!("Dropping outgoing event: not connected");
                    }
                }
            }
        }
    });

    // `ClientState` writes to a plain event channel; forward into the writer.
    let (events_tx, events_rx) = mpsc::channel();
    thread::spawn(move || {
        for ev in events_rx {
            if out_tx.send(OutgoingCmd::Send(ev)).is_err() {
                return;
            }
        }
    });

    let mut client_state = ClientState::new(game_id, events_tx);
    let mut board_cursor = Point::new(BOARD_SIZE / 2, BOARD_SIZE / 2).unwrap();
    let mut keyboard_input = String::new();
    let mut command_error: Option<String> = None;
    let mut connected = false;

    for event in rx {
        match event {
            IncomingEvent::Connected => {
                connected = true;
            }
            IncomingEvent::Disconnected => {
                connected = false;
            }
            IncomingEvent::Network(event) => match client_state.process_server_event(event) {
                Ok(NotableEvent::Initialized) => {
                    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                }
                Ok(_) => {}
                Err(EventError::CannotApplyEvent(msg)) => warn!("{msg}"),
            },
            IncomingEvent::Terminal(event) => {
                if let term_event::Event::Key(key) = event {
                    if key.kind != term_event::KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        term_event::KeyCode::Char('c')
                            if key.modifiers.contains(term_event::KeyModifiers::CONTROL) =>
                        {
                            return Ok(());
                        }
                        term_event::KeyCode::Char(ch) => {
                            keyboard_input.push(ch);
                        }
                        term_event::KeyCode::Backspace => {
                            keyboard_input.pop();
                        }
                        term_event::KeyCode::Left => {
                            board_cursor = step_cursor(board_cursor, -1, 0);
                        }
                        term_event::KeyCode::Right => {
                            board_cursor = step_cursor(board_cursor, 1, 0);
                        }
                        term_event::KeyCode::Up => {
                            board_cursor = step_cursor(board_cursor, 0, -1);
                        }
                        term_event::KeyCode::Down => {
                            board_cursor = step_cursor(board_cursor, 0, 1);
                        }
                        term_event::KeyCode::Esc => {
                            keyboard_input.clear();
                            command_error = None;
                        }
                        term_event::KeyCode::Enter => {
                            command_error =
                                execute_input(&mut client_state, &keyboard_input, board_cursor);
                            let quit = keyboard_input.trim() == "/quit";
                            keyboard_input.clear();
                            if quit {
                                return Ok(());
                            }
                        }
                        _ => {}
                    }
                }
            }
            IncomingEvent::Tick => {
                // Any event triggers repaint, so no additional action is required.
            }
        }
        render(
            &mut stdout,
            &client_state,
            board_cursor,
            connected,
            &keyboard_input,
            &command_error,
        )?;
    }
    panic!("Unexpected end of events stream");
}

fn step_cursor(cursor: Point, dx: i16, dy: i16) -> Point {
    let clamp = |v: i16| v.clamp(0, i16::from(BOARD_SIZE) - 1) as u8;
    let x = clamp(i16::from(cursor.x()) + dx);
    let y = clamp(i16::from(cursor.y()) + dy);
    Point::new(x, y).unwrap()
}

// Returns an error message to display, if any.
fn execute_input(
    client_state: &mut ClientState, input: &str, board_cursor: Point,
) -> Option<String> {
    let input = input.trim();
    if let Some(cmd) = input.strip_prefix('/') {
        match cmd {
            "quit" => None,
            _ => Some(format!("Unknown command: '{cmd}'")),
        }
    } else if input.is_empty() {
        client_state.make_move(board_cursor).err().map(move_error_message)
    } else if let Some(point) = parse_coords(input) {
        client_state.make_move(point).err().map(move_error_message)
    } else {
        client_state.send_chat(input);
        None
    }
}
