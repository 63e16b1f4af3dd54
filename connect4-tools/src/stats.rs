//! Walk statistics and progress logging.

use std::time::Instant;

use connect4_core::PerftCounts;
use log::info;

/// Running totals of a tree walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Every position entered below the root
    pub nodes: u64,
    /// Leaf, win and draw totals
    pub counts: PerftCounts,
    /// Deepest ply reached below the root
    pub max_depth: usize,
}

impl WalkStats {
    /// Fold in the stats of a walk rooted one ply below this one.
    pub fn merge_below(&mut self, child: &WalkStats) {
        self.nodes += child.nodes;
        self.counts.merge(child.counts);
        self.max_depth = self.max_depth.max(child.max_depth + 1);
    }

    /// Print final summary
    pub fn print_summary(&self) {
        println!("Nodes visited: {}", self.nodes);
        println!("Leaves: {}", self.counts.leaves);
        println!("Terminal positions: {}", self.counts.wins + self.counts.draws);
        println!("  - Wins: {}", self.counts.wins);
        println!("  - Draws: {}", self.counts.draws);
        println!("Max depth: {}", self.max_depth);
    }
}

/// Rate tracking between progress lines.
pub struct Progress {
    start_time: Instant,
    last_log_time: Instant,
    last_log_nodes: u64,
}

impl Progress {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            last_log_nodes: 0,
        }
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        self.last_log_time.elapsed().as_secs() >= interval_secs
    }

    /// Seconds since the walk started
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Log progress and reset log timer
    pub fn log_progress(&mut self, stats: &WalkStats, depth: usize) {
        let now = Instant::now();
        let elapsed_total = self.start_time.elapsed().as_secs();
        let elapsed_since_log = self.last_log_time.elapsed().as_secs_f64();

        let rate = if elapsed_since_log > 0.0 {
            (stats.nodes - self.last_log_nodes) as f64 / elapsed_since_log
        } else {
            0.0
        };

        info!(
            "[{:02}:{:02}:{:02}] nodes={} leaves={} rate={:.0}/s depth={} wins={} draws={}",
            elapsed_total / 3600,
            (elapsed_total % 3600) / 60,
            elapsed_total % 60,
            stats.nodes,
            stats.counts.leaves,
            rate,
            depth,
            stats.counts.wins,
            stats.counts.draws,
        );

        self.last_log_time = now;
        self.last_log_nodes = stats.nodes;
    }
}
