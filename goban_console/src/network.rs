use std::net::TcpStream;
use std::time::Duration;

use serde::{de, Serialize};
use tungstenite::protocol::Role;
use tungstenite::{Message, WebSocket};
use url::Url;

use goban::event::{GameConfig, GameStarted};
use goban::game::GameStateSnapshot;

// The server answers a dropped connection with a fresh `init`, so the client
// just reconnects on a fixed cadence.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug)]
pub enum CommunicationError {
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    Protocol(String),
}

// "host" or "host:port"; the server's default port is assumed when absent.
pub fn with_default_port(server_address: &str) -> String {
    if server_address.contains(':') {
        server_address.to_owned()
    } else {
        format!("{server_address}:{DEFAULT_PORT}")
    }
}

pub fn connect_game_socket(
    server_address: &str, game_id: &str,
) -> Result<WebSocket<TcpStream>, CommunicationError> {
    let addr = with_default_port(server_address);
    let ws_url = Url::parse(&format!("ws://{addr}/ws/{game_id}"))
        .map_err(|err| CommunicationError::Protocol(format!("bad server address: {err}")))?;
    let stream = TcpStream::connect(&addr)
        .map_err(|err| CommunicationError::Socket(tungstenite::Error::Io(err)))?;
    let (socket, _response) = tungstenite::client(ws_url, stream)
        .map_err(|err| CommunicationError::Protocol(format!("handshake failed: {err}")))?;
    Ok(socket)
}

pub fn write_obj<T>(socket: &mut WebSocket<TcpStream>, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    socket.send(Message::Text(serialized.into())).map_err(CommunicationError::Socket)
}

pub fn read_obj<T>(socket: &mut WebSocket<TcpStream>) -> Result<T, CommunicationError>
where
    T: de::DeserializeOwned,
{
    loop {
        let msg = socket.read().map_err(CommunicationError::Socket)?;
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).map_err(CommunicationError::Serde);
            }
            // tungstenite answers pings internally on the next read/write.
            Message::Ping(_) | Message::Pong(_) => continue,
            other => {
                return Err(CommunicationError::Protocol(format!(
                    "Expected text, got {other:?}"
                )));
            }
        }
    }
}

// Read and write halves live on different threads, so the socket is cloned the
// way the underlying TcpStream allows.
pub fn clone_websocket(
    socket: &WebSocket<TcpStream>, role: Role,
) -> std::io::Result<WebSocket<TcpStream>> {
    let stream = socket.get_ref().try_clone()?;
    let config = *socket.get_config();
    Ok(WebSocket::from_raw_socket(stream, role, Some(config)))
}

pub fn start_game(server_address: &str, config: &GameConfig) -> anyhow::Result<GameStarted> {
    let addr = with_default_port(server_address);
    let response = reqwest::blocking::Client::new()
        .post(format!("http://{addr}/start_game"))
        .json(config)
        .send()?
        .error_for_status()?;
    Ok(response.json()?)
}

pub fn game_state(server_address: &str, game_id: &str) -> anyhow::Result<GameStateSnapshot> {
    let addr = with_default_port(server_address);
    let response = reqwest::blocking::Client::new()
        .get(format!("http://{addr}/game_state/{game_id}"))
        .send()?
        .error_for_status()?;
    Ok(response.json()?)
}
