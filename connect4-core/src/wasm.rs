//! WASM bindings for connect4-core
//!
//! Provides a JavaScript-friendly API for a browser front end. Cell values
//! cross the boundary as numbers: 0 = empty, 1 = first player, 2 = second.

use wasm_bindgen::prelude::*;
use crate::{cell_at, Bitboard, Position, Token, HEIGHT, WIDTH};

/// WASM-friendly wrapper around Position
#[wasm_bindgen]
pub struct WasmPosition {
    inner: Position,
}

#[wasm_bindgen]
impl WasmPosition {
    /// Create a new empty position
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmPosition {
        WasmPosition { inner: Position::new() }
    }

    /// Replay a string of column digits, e.g. "3323431"
    #[wasm_bindgen(js_name = fromMoves)]
    pub fn from_moves(moves: &str) -> Result<WasmPosition, JsError> {
        let inner = moves.parse::<Position>()?;
        Ok(WasmPosition { inner })
    }

    /// Drop a token into a column. Returns false if the column is full,
    /// out of range, or the game is already over.
    #[wasm_bindgen(js_name = makeMove)]
    pub fn make_move(&mut self, column: usize) -> bool {
        if self.inner.is_game_over() {
            return false;
        }
        self.inner.make_move(column).is_ok()
    }

    /// Take back the last move. Returns the column, or undefined if there
    /// was nothing to undo.
    #[wasm_bindgen(js_name = undoMove)]
    pub fn undo_move(&mut self) -> Option<usize> {
        self.inner.undo_move().ok()
    }

    /// Playable columns, ascending
    #[wasm_bindgen(js_name = listMoves)]
    pub fn list_moves(&self) -> Vec<usize> {
        self.inner.list_moves()
    }

    /// Cell at column x, row y (row 0 is the top)
    pub fn token(&self, x: usize, y: usize) -> u8 {
        token_code(self.inner.token(x, y))
    }

    /// Player to move (1 or 2)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.inner.current_player() as u8
    }

    /// Check for winner. Returns 0 (none), 1 (P1), or 2 (P2)
    pub fn winner(&self) -> u8 {
        self.inner.winner().map_or(0, |p| p as u8)
    }

    /// Check if game is over (winner or full board)
    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_game_over()
    }

    /// The game so far as column digits
    pub fn moves(&self) -> String {
        self.inner.notation()
    }

    /// Full state for one repaint, as a plain JS object
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        let snapshot = Snapshot::from(&self.inner);
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }

    /// Clone the position
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_position(&self) -> WasmPosition {
        WasmPosition { inner: self.inner }
    }
}

impl Default for WasmPosition {
    fn default() -> Self {
        Self::new()
    }
}

fn token_code(token: Token) -> u8 {
    token.owner().map_or(0, |p| p as u8)
}

/// Serializable view of a position for JavaScript
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    moves: String,
    current_player: u8,
    winner: u8,
    legal_moves: Vec<usize>,
    /// Rows top first, each WIDTH cells
    cells: Vec<Vec<u8>>,
    /// [x, y] of every cell in a winning line
    winning_cells: Vec<[usize; 2]>,
}

impl From<&Position> for Snapshot {
    fn from(position: &Position) -> Self {
        let cells = (0..HEIGHT)
            .map(|y| (0..WIDTH).map(|x| token_code(position.token(x, y))).collect())
            .collect();

        let winning: Bitboard = match position.winner() {
            Some(player) => Position::winning_cells(position.mask(player)),
            None => 0,
        };
        let mut winning_cells = Vec::new();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if (winning & cell_at(x, y)) != 0 {
                    winning_cells.push([x, y]);
                }
            }
        }

        Snapshot {
            moves: position.notation(),
            current_player: position.current_player() as u8,
            winner: position.winner().map_or(0, |p| p as u8),
            legal_moves: position.list_moves(),
            cells,
            winning_cells,
        }
    }
}
