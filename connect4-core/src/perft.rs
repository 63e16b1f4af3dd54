//! Game-tree node counting for validating move generation.
//!
//! Walks every line of play to a fixed depth using only `list_moves`,
//! `make_move_unchecked` and `undo_move_unchecked`. A line stops early when
//! its last move makes four in a row or fills the board.

use crate::{Position, WIDTH};

/// Totals gathered by a walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerftCounts {
    /// Positions reached after exactly `depth` moves.
    pub leaves: u64,
    /// Lines that ended in four in a row at or before `depth`.
    pub wins: u64,
    /// Lines that filled the board without a win at or before `depth`.
    pub draws: u64,
}

impl PerftCounts {
    /// Add another subtree's totals.
    pub fn merge(&mut self, other: PerftCounts) {
        self.leaves += other.leaves;
        self.wins += other.wins;
        self.draws += other.draws;
    }
}

/// Count the game tree below `position` to `depth` moves.
///
/// The position is restored before returning. Depth 0 counts the position
/// itself as the only leaf. A finished position has nothing below it, so any
/// deeper walk from one is empty.
pub fn perft(position: &mut Position, depth: usize) -> PerftCounts {
    let mut counts = PerftCounts::default();
    if depth > 0 && position.is_game_over() {
        return counts;
    }
    walk(position, depth, &mut counts);
    counts
}

/// Per-column subtotals of [`perft`] from `position`, one entry per legal
/// move in ascending column order. Empty at depth 0 or when the game is over.
pub fn divide(position: &mut Position, depth: usize) -> Vec<(usize, PerftCounts)> {
    if depth == 0 || position.is_game_over() {
        return Vec::new();
    }
    position
        .list_moves()
        .into_iter()
        .map(|column| {
            let mut counts = PerftCounts::default();
            step(position, column, depth, &mut counts);
            (column, counts)
        })
        .collect()
}

fn walk(position: &mut Position, depth: usize, counts: &mut PerftCounts) {
    if depth == 0 {
        counts.leaves += 1;
        return;
    }
    for column in 0..WIDTH {
        if position.can_play(column) {
            step(position, column, depth, counts);
        }
    }
}

/// Play `column`, count the result, and take it back.
#[inline]
fn step(position: &mut Position, column: usize, depth: usize, counts: &mut PerftCounts) {
    position.make_move_unchecked(column);
    if position.has_won() {
        counts.wins += 1;
        if depth == 1 {
            counts.leaves += 1;
        }
    } else if position.is_full() {
        counts.draws += 1;
        if depth == 1 {
            counts.leaves += 1;
        }
    } else {
        walk(position, depth - 1, counts);
    }
    position.undo_move_unchecked();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perft_shallow_depths() {
        // No column fills and no line completes before move 7.
        let mut position = Position::new();
        let mut expected = 1u64;
        for depth in 0..=6 {
            let counts = perft(&mut position, depth);
            assert_eq!(counts.leaves, expected, "depth {}", depth);
            assert_eq!(counts.wins, 0);
            assert_eq!(counts.draws, 0);
            expected *= WIDTH as u64;
        }
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_perft_depth_seven() {
        // Seven of the 7^7 lines fill one column in six moves and lose it.
        let mut position = Position::new();
        let counts = perft(&mut position, 7);
        assert_eq!(counts.leaves, 823_536);
        assert_eq!(counts.wins, 13_032);
        assert_eq!(counts.draws, 0);
        assert_eq!(position, Position::new());
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let mut position: Position = "3323".parse().unwrap();
        let before = position;

        let parts = divide(&mut position, 4);
        assert_eq!(parts.len(), WIDTH);
        assert!(parts.iter().map(|(column, _)| *column).eq(0..WIDTH));

        let mut total = PerftCounts::default();
        for (_, counts) in &parts {
            total.merge(*counts);
        }
        assert_eq!(total, perft(&mut position, 4));
        assert_eq!(position, before);
    }

    #[test]
    fn test_perft_from_won_position_stops() {
        // Column 4 completes the first player's bottom row.
        let mut position: Position = "332211".parse().unwrap();
        let parts = divide(&mut position, 3);
        let (_, win_line) = parts.iter().find(|(column, _)| *column == 4).unwrap();
        assert_eq!(win_line.wins, 1);
        assert_eq!(win_line.leaves, 0);
    }

    #[test]
    fn test_perft_from_finished_root_is_empty() {
        // First player stacks four in column 0.
        let mut won: Position = "0101010".parse().unwrap();
        let before = won;
        assert_eq!(perft(&mut won, 2), PerftCounts::default());
        assert!(divide(&mut won, 1).is_empty());
        assert_eq!(perft(&mut won, 0).leaves, 1);
        assert_eq!(won, before);

        let mut drawn: Position = "344603526506503656131365205344011101424222".parse().unwrap();
        assert_eq!(perft(&mut drawn, 3), PerftCounts::default());
        assert!(divide(&mut drawn, 3).is_empty());
    }

    #[test]
    fn test_perft_last_move_draw() {
        let drawn = "344603526506503656131365205344011101424222";
        let mut position: Position = drawn[..41].parse().unwrap();
        let counts = perft(&mut position, 1);
        assert_eq!(counts, PerftCounts { leaves: 1, wins: 0, draws: 1 });
    }
}
