//! Iterative depth-first walk of the game tree.
//!
//! Same counting rules as `connect4_core::perft`, but driven by an explicit
//! stack so a long walk can report progress and stop cleanly on request.
//! Only `can_play`, `make_move_unchecked` and `undo_move_unchecked` touch the
//! position; it is restored to the root on return, finished or not.

use std::sync::atomic::{AtomicBool, Ordering};

use connect4_core::{Position, WIDTH};
use log::debug;

use crate::stats::{Progress, WalkStats};

/// How often (in nodes) to poll the interrupt flag and the log timer.
const POLL_MASK: u64 = (1 << 16) - 1;

/// Result of a walk.
#[derive(Debug)]
pub struct Walk {
    pub stats: WalkStats,
    /// False if the walk was interrupted before covering the whole tree.
    pub completed: bool,
}

pub struct Walker<'a> {
    depth: usize,
    running: &'a AtomicBool,
    log_interval_secs: u64,
}

impl<'a> Walker<'a> {
    pub fn new(depth: usize, running: &'a AtomicBool, log_interval_secs: u64) -> Self {
        Self {
            depth,
            running,
            log_interval_secs,
        }
    }

    /// Count the tree below `position` to the configured depth.
    pub fn run(&self, position: &mut Position) -> Walk {
        let mut stats = WalkStats::default();
        let mut progress = Progress::new();

        if self.depth == 0 {
            stats.counts.leaves = 1;
            return Walk { stats, completed: true };
        }
        if position.is_game_over() {
            debug!("root is already finished, nothing to walk");
            return Walk { stats, completed: true };
        }

        // stack[k] = next column to try at k moves below the root
        let mut stack: Vec<usize> = Vec::with_capacity(self.depth);
        stack.push(0);

        while !stack.is_empty() {
            if stats.nodes & POLL_MASK == 0 {
                if !self.running.load(Ordering::SeqCst) {
                    debug!("walk interrupted at depth {}", stack.len());
                    for _ in 1..stack.len() {
                        position.undo_move_unchecked();
                    }
                    return Walk { stats, completed: false };
                }
                if progress.should_log(self.log_interval_secs) {
                    progress.log_progress(&stats, stack.len());
                }
            }

            let ply = stack.len();
            let column = match (stack[ply - 1]..WIDTH).find(|&c| position.can_play(c)) {
                Some(column) => column,
                None => {
                    // Frame exhausted: return to the parent.
                    stack.pop();
                    if !stack.is_empty() {
                        position.undo_move_unchecked();
                    }
                    continue;
                }
            };
            stack[ply - 1] = column + 1;

            position.make_move_unchecked(column);
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(ply);

            let terminal = if position.has_won() {
                stats.counts.wins += 1;
                true
            } else if position.is_full() {
                stats.counts.draws += 1;
                true
            } else {
                false
            };

            if ply == self.depth {
                stats.counts.leaves += 1;
            }
            if terminal || ply == self.depth {
                position.undo_move_unchecked();
            } else {
                stack.push(0);
            }
        }

        debug!("walk finished after {:.2}s", progress.elapsed_secs());
        Walk { stats, completed: true }
    }
}
