//! Connect Four game-tree counter
//!
//! Walks every line of play from a position to a fixed depth and reports leaf,
//! win and draw totals. Used to check move generation against known counts.

mod stats;
mod walker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use connect4_core::{PerftCounts, Position};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use crate::stats::WalkStats;
use crate::walker::Walker;

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Count the Connect Four game tree to a fixed depth")]
struct Cli {
    /// Plies to walk below the start position
    #[arg(short, long, default_value_t = 8)]
    depth: usize,

    /// Start position as 0-based column digits
    #[arg(short, long, default_value = "")]
    moves: String,

    /// Report subtotals for each move from the start position
    #[arg(long)]
    divide: bool,

    /// Seconds between progress lines
    #[arg(long, default_value_t = 5)]
    log_interval: u64,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new().with_level(level).init()?;

    let mut position: Position = cli
        .moves
        .parse()
        .with_context(|| format!("invalid start position {:?}", cli.moves))?;

    // Set up SIGINT handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        println!("\n\nInterrupt received, stopping walk...");
        r.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl-C handler")?;

    println!("Connect Four perft");
    println!("==================");
    println!("{}", position);
    println!("Moves: {:?}", position.notation());
    println!("Depth: {}", cli.depth);
    println!();

    if cli.depth > 0 && position.is_game_over() {
        info!("start position is already finished, nothing below it");
        return Ok(());
    }

    let start = Instant::now();
    let (stats, completed) = if cli.divide && cli.depth > 0 {
        divide(&mut position, cli.depth, cli.log_interval, &running)
    } else {
        let walk = Walker::new(cli.depth, &running, cli.log_interval).run(&mut position);
        (walk.stats, walk.completed)
    };
    let elapsed = start.elapsed();

    println!("\n==================");
    if completed {
        println!("Walk complete!");
    } else {
        println!("Walk interrupted, totals are partial.");
    }
    println!("==================");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    stats.print_summary();

    Ok(())
}

/// Walk each root move separately, printing its subtotal.
fn divide(
    position: &mut Position,
    depth: usize,
    log_interval_secs: u64,
    running: &AtomicBool,
) -> (WalkStats, bool) {
    let below = Walker::new(depth - 1, running, log_interval_secs);
    let mut total = WalkStats::default();

    for column in position.list_moves() {
        if !running.load(Ordering::SeqCst) {
            return (total, false);
        }

        position.make_move_unchecked(column);
        let (part, completed) = if position.has_won() {
            (terminal(depth, PerftCounts { wins: 1, ..Default::default() }), true)
        } else if position.is_full() {
            (terminal(depth, PerftCounts { draws: 1, ..Default::default() }), true)
        } else {
            let walk = below.run(position);
            (walk.stats, walk.completed)
        };
        position.undo_move_unchecked();

        total.nodes += 1;
        total.merge_below(&part);
        if !completed {
            return (total, false);
        }
        println!(
            "{}: leaves={} wins={} draws={}",
            column, part.counts.leaves, part.counts.wins, part.counts.draws
        );
    }

    (total, true)
}

/// Stats below a root move whose line ends immediately.
fn terminal(depth: usize, mut counts: PerftCounts) -> WalkStats {
    if depth == 1 {
        counts.leaves = 1;
    }
    WalkStats {
        counts,
        ..Default::default()
    }
}
