//! Connect Four game logic with bit-based board representation.
//!
//! # Board Encoding (49 of 64 bits)
//!
//! ```text
//! Each column is a 7-bit lane: 6 playable rows plus 1 guard bit on top.
//! Bit index of (column c, row r counted from the bottom) = c * 7 + r
//!
//!   .  .  .  .  .  .  .   <- guard row, never set in a player mask
//!   5 12 19 26 33 40 47
//!   4 11 18 25 32 39 46
//!   3 10 17 24 31 38 45
//!   2  9 16 23 30 37 44
//!   1  8 15 22 29 36 43
//!   0  7 14 21 28 35 42   <- bottom
//! ```
//!
//! A position keeps one such mask per player, one fill cursor per column (the
//! bit the next token in that column lands on) and the list of columns played.
//! The guard bit makes "column full" a single bit test and keeps neighbouring
//! lanes apart under the horizontal and diagonal shifts used for win detection.
//!
//! # Move Notation
//!
//! ```text
//! A game is the string of the columns played, 0-based, first player first:
//!   "3323431"  -> first player wins along the bottom row (columns 1-4)
//! Whitespace is ignored when reading.
//! ```
//!
//! # Display Coordinates
//!
//! [`Position::token`] takes `(x, y)` with `x` the column and `y = 0` the
//! **top** row of the visual board, which is how presentation layers draw it.

pub mod perft;
#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

pub use perft::{divide, perft, PerftCounts};

/// Number of columns.
pub const WIDTH: usize = 7;
/// Number of playable rows per column.
pub const HEIGHT: usize = 6;
/// Bits per column lane (playable rows + guard bit).
pub const LANE: usize = HEIGHT + 1;
/// Number of cells, and so the longest possible game.
pub const MAX_MOVES: usize = WIDTH * HEIGHT;

/// A set of cells in the lane layout.
pub type Bitboard = u64;

/// The lowest cell of every column.
pub const BOTTOM: Bitboard = {
    let mut mask: Bitboard = 0;
    let mut col = 0;
    while col < WIDTH {
        mask |= 1 << (col * LANE);
        col += 1;
    }
    mask
};

/// The guard bit of every column.
pub const TOP: Bitboard = BOTTOM << HEIGHT;

/// Every playable cell.
pub const BOARD: Bitboard = BOTTOM * ((1 << HEIGHT) - 1);

/// Bit index of the bottom cell of each column.
const COLUMN_BASES: [u8; WIDTH] = {
    let mut bases = [0u8; WIDTH];
    let mut col = 0;
    while col < WIDTH {
        bases[col] = (col * LANE) as u8;
        col += 1;
    }
    bases
};

/// Shift between neighbouring cells of a line, one per direction.
const DIRECTIONS: [u32; 4] = [
    1,                // vertical |
    LANE as u32,      // horizontal -
    LANE as u32 + 1,  // diagonal /
    LANE as u32 - 1,  // diagonal \
];

#[inline]
fn cell_bit(index: u8) -> Bitboard {
    1 << index
}

/// The bit of the cell at column `x`, row `y` (row 0 is the top), or 0 if
/// the coordinates are off the board.
#[inline]
pub fn cell_at(x: usize, y: usize) -> Bitboard {
    if x >= WIDTH || y >= HEIGHT {
        return 0;
    }
    cell_bit((x * LANE + HEIGHT - 1 - y) as u8)
}

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    /// Moves first, drawn red.
    One = 1,
    /// Moves second, drawn yellow.
    Two = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index of this player's mask (0 or 1).
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// The player whose mask is selected by the parity of `n`.
    #[inline]
    fn from_parity(n: usize) -> Player {
        if n & 1 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }
}

/// Contents of one cell, as a presentation layer sees it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Token {
    /// No token, or no such cell.
    Empty,
    /// Token of [`Player::One`].
    Red,
    /// Token of [`Player::Two`].
    Yellow,
}

impl Token {
    /// The player owning this token, if any.
    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            Token::Empty => None,
            Token::Red => Some(Player::One),
            Token::Yellow => Some(Player::Two),
        }
    }

    /// Single-character form used by the text grid.
    pub fn symbol(self) -> char {
        match self {
            Token::Empty => '.',
            Token::Red => 'X',
            Token::Yellow => 'O',
        }
    }
}

impl From<Player> for Token {
    fn from(player: Player) -> Token {
        match player {
            Player::One => Token::Red,
            Player::Two => Token::Yellow,
        }
    }
}

/// Errors reported when a move, an undo, or a replayed game is rejected.
///
/// The position is left untouched whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("column {column} is full")]
    InvalidMove { column: usize },

    #[error("no moves to undo")]
    EmptyHistory,

    #[error("column {column} is out of range")]
    ColumnOutOfRange { column: usize },

    #[error("unexpected character {found:?} at move {index}")]
    BadNotation { index: usize, found: char },

    #[error("move {index} played after the game was already won")]
    GameOver { index: usize },
}

/// A Connect Four position: both player masks, the column fill cursors and
/// the move history.
///
/// See module documentation for the bit layout. The value is plain data
/// (`Copy`, no heap), so callers searching over it can clone freely; it has
/// no internal locking.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    /// One mask per player, indexed by `move_count & 1` of their moves.
    masks: [Bitboard; 2],
    /// Next free bit in each column's lane.
    cursors: [u8; WIDTH],
    /// Columns played, in order. Slots past `move_count` are zero.
    history: [u8; MAX_MOVES],
    move_count: u8,
}

impl Position {
    /// Create an empty position with Player One to move.
    pub fn new() -> Position {
        Position {
            masks: [0, 0],
            cursors: COLUMN_BASES,
            history: [0; MAX_MOVES],
            move_count: 0,
        }
    }

    // ========== Moves ==========

    /// Drop a token for the player to move into `column`.
    ///
    /// Fails with [`PositionError::ColumnOutOfRange`] or
    /// [`PositionError::InvalidMove`] (column full) without changing anything.
    pub fn make_move(&mut self, column: usize) -> Result<(), PositionError> {
        if column >= WIDTH {
            debug!("rejected move into column {column}: out of range");
            return Err(PositionError::ColumnOutOfRange { column });
        }
        if !self.can_play(column) {
            debug!("rejected move into column {column}: column is full");
            return Err(PositionError::InvalidMove { column });
        }
        self.make_move_unchecked(column);
        Ok(())
    }

    /// Drop a token into `column`.
    /// Does NOT validate - caller must ensure `can_play(column)`.
    #[inline]
    pub fn make_move_unchecked(&mut self, column: usize) {
        debug_assert!(self.can_play(column), "column {column} is not playable");
        let n = self.move_count as usize;
        self.masks[n & 1] |= cell_bit(self.cursors[column]);
        self.history[n] = column as u8;
        self.cursors[column] += 1;
        self.move_count += 1;
    }

    /// Take back the last move, returning the column it was played in.
    ///
    /// Exact inverse of [`Position::make_move`]. Fails with
    /// [`PositionError::EmptyHistory`] on a position with no moves.
    pub fn undo_move(&mut self) -> Result<usize, PositionError> {
        if self.move_count == 0 {
            debug!("rejected undo: no moves played");
            return Err(PositionError::EmptyHistory);
        }
        Ok(self.undo_move_unchecked())
    }

    /// Take back the last move.
    /// Does NOT validate - caller must ensure at least one move was made.
    #[inline]
    pub fn undo_move_unchecked(&mut self) -> usize {
        debug_assert!(self.move_count > 0, "no moves to undo");
        self.move_count -= 1;
        let n = self.move_count as usize;
        let column = self.history[n] as usize;
        self.history[n] = 0;
        self.cursors[column] -= 1;
        self.masks[n & 1] &= !cell_bit(self.cursors[column]);
        column
    }

    /// Check if a token can be dropped into `column`.
    #[inline]
    pub fn can_play(&self, column: usize) -> bool {
        column < WIDTH && (TOP & cell_bit(self.cursors[column])) == 0
    }

    /// Columns that are not full, in ascending order.
    pub fn list_moves(&self) -> Vec<usize> {
        (0..WIDTH).filter(|&column| self.can_play(column)).collect()
    }

    // ========== Win Detection ==========

    /// Check if a single player's mask holds four in a row.
    ///
    /// For each direction the mask is intersected with itself shifted by one,
    /// two and three steps; any surviving bit is the first cell of a run of
    /// four. Only meaningful for one player's mask, never the union.
    #[inline]
    pub fn is_win(mask: Bitboard) -> bool {
        DIRECTIONS.iter().any(|&d| {
            (mask & (mask >> d) & (mask >> (2 * d)) & (mask >> (3 * d))) != 0
        })
    }

    /// Every cell of `mask` that is part of some four in a row.
    pub fn winning_cells(mask: Bitboard) -> Bitboard {
        let mut cells: Bitboard = 0;
        for d in DIRECTIONS {
            let starts = mask & (mask >> d) & (mask >> (2 * d)) & (mask >> (3 * d));
            cells |= starts | (starts << d) | (starts << (2 * d)) | (starts << (3 * d));
        }
        cells
    }

    /// Check if the last move that has been made won the game.
    #[inline]
    pub fn has_won(&self) -> bool {
        Self::is_win(self.masks[(self.move_count as usize + 1) & 1])
    }

    /// The player holding four in a row, if any.
    pub fn winner(&self) -> Option<Player> {
        if Self::is_win(self.masks[0]) {
            Some(Player::One)
        } else if Self::is_win(self.masks[1]) {
            Some(Player::Two)
        } else {
            None
        }
    }

    /// Check if all 42 cells are filled.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.move_count as usize == MAX_MOVES
    }

    /// Check if the game has ended by a win or a full board.
    pub fn is_game_over(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    // ========== Queries ==========

    /// Token at column `x`, row `y` with `y = 0` the top row.
    ///
    /// Coordinates outside the board name no cell and read as empty.
    pub fn token(&self, x: usize, y: usize) -> Token {
        let bit = cell_at(x, y);
        if (self.masks[0] & bit) != 0 {
            Token::Red
        } else if (self.masks[1] & bit) != 0 {
            Token::Yellow
        } else {
            Token::Empty
        }
    }

    /// The player to move.
    #[inline]
    pub fn current_player(&self) -> Player {
        Player::from_parity(self.move_count as usize)
    }

    /// Number of moves played so far.
    #[inline]
    pub fn move_count(&self) -> usize {
        self.move_count as usize
    }

    /// Columns played so far, in order.
    #[inline]
    pub fn history(&self) -> &[u8] {
        &self.history[..self.move_count as usize]
    }

    /// The last column played, if any.
    pub fn last_move(&self) -> Option<usize> {
        self.history().last().map(|&column| column as usize)
    }

    /// Cells occupied by `player`.
    #[inline]
    pub fn mask(&self, player: Player) -> Bitboard {
        self.masks[player.index()]
    }

    /// Cells occupied by either player.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.masks[0] | self.masks[1]
    }

    /// Number of tokens in `column`, 0 for a column off the board.
    pub fn column_height(&self, column: usize) -> usize {
        if column >= WIDTH {
            return 0;
        }
        (self.cursors[column] - COLUMN_BASES[column]) as usize
    }

    /// Unique encoding of the position.
    ///
    /// Adding `BOTTOM` to the occupied cells leaves exactly one extra bit per
    /// column, at its fill cursor, so the occupancy is recoverable; OR-ing the
    /// mover's cells in tells the two colours apart.
    #[inline]
    pub fn key(&self) -> u64 {
        (self.occupied() + BOTTOM) | self.masks[self.move_count as usize & 1]
    }

    /// The game so far as a string of column digits.
    pub fn notation(&self) -> String {
        self.history().iter().map(|&column| char::from(b'0' + column)).collect()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

// ========== Replay & Conversions ==========

impl FromStr for Position {
    type Err = PositionError;

    /// Replay a string of column digits from the empty position.
    fn from_str(moves: &str) -> Result<Self, Self::Err> {
        let mut position = Position::new();
        for (index, found) in moves.chars().filter(|c| !c.is_whitespace()).enumerate() {
            let column = match found.to_digit(10) {
                Some(digit) => digit as usize,
                None => {
                    debug!("rejected replay: {found:?} at move {index} is not a column");
                    return Err(PositionError::BadNotation { index, found });
                }
            };
            if position.has_won() {
                debug!("rejected replay: move {index} follows a win");
                return Err(PositionError::GameOver { index });
            }
            position.make_move(column)?;
        }
        Ok(position)
    }
}

impl TryFrom<&str> for Position {
    type Error = PositionError;

    fn try_from(moves: &str) -> Result<Self, Self::Error> {
        moves.parse()
    }
}

impl TryFrom<String> for Position {
    type Error = PositionError;

    fn try_from(moves: String) -> Result<Self, Self::Error> {
        moves.parse()
    }
}

impl From<Position> for String {
    fn from(position: Position) -> String {
        position.notation()
    }
}

impl fmt::Display for Position {
    /// Text grid, top row first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..HEIGHT {
            let row: Vec<String> = (0..WIDTH)
                .map(|x| self.token(x, y).symbol().to_string())
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}
