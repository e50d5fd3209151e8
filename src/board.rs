use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: u8 = 19;

// Hoshi rows/columns on a 19x19 board.
const STAR_LINES: [u8; 3] = [3, 9, 15];

// Stone colors, numbered the way the server numbers players: 1 is Black, 2 is White.
#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
    pub fn stone_char(self) -> char {
        match self {
            Player::Black => '●',
            Player::White => '○',
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = String;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Player::Black),
            2 => Ok(Player::White),
            _ => Err(format!("invalid player number: {value}")),
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> u8 {
        match player {
            Player::Black => 1,
            Player::White => 2,
        }
    }
}

// A board intersection. `x` is the column and `y` is the row, both zero-based,
// matching the coordinates the server exchanges.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Point {
    x: u8,
    y: u8,
}

impl Point {
    pub fn new(x: u8, y: u8) -> Option<Self> {
        (x < BOARD_SIZE && y < BOARD_SIZE).then_some(Point { x, y })
    }
    pub fn x(self) -> u8 { self.x }
    pub fn y(self) -> u8 { self.y }
    pub fn is_star_point(self) -> bool {
        STAR_LINES.contains(&self.x) && STAR_LINES.contains(&self.y)
    }
}

impl TryFrom<(u8, u8)> for Point {
    type Error = String;
    fn try_from((x, y): (u8, u8)) -> Result<Self, Self::Error> {
        Point::new(x, y).ok_or_else(|| format!("point ({x}, {y}) is off the board"))
    }
}

impl From<Point> for (u8, u8) {
    fn from(p: Point) -> (u8, u8) { (p.x, p.y) }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// Mirror of the server's board snapshot. The wire format is a 19x19 row-major
// matrix of 0 (empty) / 1 (black) / 2 (white), indexed `board[y][x]`.
//
// The client never places or captures stones itself: the board is replaced
// wholesale whenever the server pushes a new snapshot.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Board {
    grid: Vec<Vec<Option<Player>>>, // [y][x]
}

impl Board {
    pub fn empty() -> Self {
        Board {
            grid: vec![vec![None; BOARD_SIZE.into()]; BOARD_SIZE.into()],
        }
    }

    pub fn get(&self, p: Point) -> Option<Player> {
        self.grid[usize::from(p.y())][usize::from(p.x())]
    }
    pub fn is_empty(&self, p: Point) -> bool { self.get(p).is_none() }

    pub fn stone_count(&self) -> usize {
        self.grid.iter().flatten().filter(|cell| cell.is_some()).count()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Board {
    type Error = String;
    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        if rows.len() != usize::from(BOARD_SIZE) {
            return Err(format!("expected {BOARD_SIZE} rows, got {}", rows.len()));
        }
        let mut grid = Vec::with_capacity(rows.len());
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != usize::from(BOARD_SIZE) {
                return Err(format!("row {y}: expected {BOARD_SIZE} columns, got {}", row.len()));
            }
            let mut typed_row = Vec::with_capacity(row.len());
            for (x, cell) in row.into_iter().enumerate() {
                typed_row.push(match cell {
                    0 => None,
                    _ => Some(
                        Player::try_from(cell).map_err(|err| format!("cell ({x}, {y}): {err}"))?,
                    ),
                });
            }
            grid.push(typed_row);
        }
        Ok(Board { grid })
    }
}

impl From<Board> for Vec<Vec<u8>> {
    fn from(board: Board) -> Vec<Vec<u8>> {
        board
            .grid
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.map_or(0, u8::from)).collect())
            .collect()
    }
}
