use serde::{Deserialize, Serialize};

use crate::CoordinateOutOfRange;

/// The side length of the square board.
pub const BOARD_SIZE: usize = 15;

const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// One of the two sides of a match.
///
/// Black always moves first in a fresh match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
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

    /// The number used for this player on the wire, `1` for black and `2` for white.
    pub fn id(self) -> u8 {
        match self {
            Player::Black => 1,
            Player::White => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Player::Black),
            2 => Some(Player::White),
            _ => None,
        }
    }

    /// `0` for black and `1` for white, for indexing per-player arrays.
    pub fn index(self) -> usize {
        self.id() as usize - 1
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Black => write!(f, "Black"),
            Player::White => write!(f, "White"),
        }
    }
}

/// The state of a single intersection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// The number used for this cell on the wire: `0` empty, `1` black, `2` white.
    pub fn id(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Black),
            2 => Some(Cell::White),
            _ => None,
        }
    }

    /// The owner of the stone on this cell, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// A `BOARD_SIZE` x `BOARD_SIZE` grid of cells.
///
/// Coordinates are zero-based, row first. They are signed because they come
/// straight from peer input; anything outside `0..BOARD_SIZE` is rejected with
/// [`CoordinateOutOfRange`] by the mutating accessors.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    /// Row-major.
    cells: [Cell; NUM_CELLS],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; NUM_CELLS],
        }
    }

    /// Creates a board from exactly `BOARD_SIZE * BOARD_SIZE` cells in row-major order.
    pub fn from_cells(cells: &[Cell]) -> Option<Self> {
        Some(Self {
            cells: cells.try_into().ok()?,
        })
    }

    pub fn is_in_bounds(row: i32, col: i32) -> bool {
        (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
    }

    fn index(row: i32, col: i32) -> Result<usize, CoordinateOutOfRange> {
        if Self::is_in_bounds(row, col) {
            Ok(row as usize * BOARD_SIZE + col as usize)
        } else {
            Err(CoordinateOutOfRange { row, col })
        }
    }

    /// Returns the cell at the given coordinates, or `None` if they are off the board.
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        Self::index(row, col).ok().map(|idx| self.cells[idx])
    }

    pub fn occupant(&self, row: i32, col: i32) -> Result<Cell, CoordinateOutOfRange> {
        Ok(self.cells[Self::index(row, col)?])
    }

    pub fn is_empty(&self, row: i32, col: i32) -> Result<bool, CoordinateOutOfRange> {
        Ok(self.occupant(row, col)? == Cell::Empty)
    }

    /// Puts a stone of `player` on the cell, replacing whatever was there.
    ///
    /// Whether the cell was empty is for the caller to check.
    pub fn place(&mut self, row: i32, col: i32, player: Player) -> Result<(), CoordinateOutOfRange> {
        self.cells[Self::index(row, col)?] = Cell::from(player);
        Ok(())
    }

    pub fn vacate(&mut self, row: i32, col: i32) -> Result<(), CoordinateOutOfRange> {
        self.cells[Self::index(row, col)?] = Cell::Empty;
        Ok(())
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; NUM_CELLS];
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The coordinates of all cells in the given state, in row-major order.
    pub fn coordinates_of(&self, cell: Cell) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == cell)
            .map(|(idx, _)| ((idx / BOARD_SIZE) as i32, (idx % BOARD_SIZE) as i32))
    }

    /// How many stones of `player` are on the board.
    pub fn count_stones(&self, player: Player) -> usize {
        let cell = Cell::from(player);
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::visualize_board(self))
    }
}
