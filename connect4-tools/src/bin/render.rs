//! Render Connect Four positions as a text grid or SVG.
//!
//! Usage:
//!   # Text grid of a position
//!   cargo run --release --bin render -- --moves 3323441
//!
//!   # SVG with the winning line highlighted
//!   cargo run --release --bin render -- --moves 3323441155 --format svg -o board.svg
//!
//!   # One SVG frame per move of a game
//!   cargo run --release --bin render -- --moves 332211 --game --output-dir ./frames/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use connect4_core::{cell_at, Bitboard, Position, Token, HEIGHT, WIDTH};
use log::{debug, info, LevelFilter};
use simple_logger::SimpleLogger;

// ============================================================================
// Layout and colors
// ============================================================================

const CELL_SIZE: f32 = 64.0;
const HOLE_RADIUS: f32 = 26.0;
const BOARD_PADDING: f32 = 12.0;
const BOARD_RADIUS: f32 = 12.0;

// Image padding (space around the entire content)
const IMAGE_PADDING: f32 = 16.0;

// Colors
const BG_COLOR: &str = "#1a1a1a";
const BOARD_BG: &str = "#1f5fbf";
const HOLE_COLOR: &str = "#ffffff";
const RED_GRADIENT_START: &str = "#e74c3c";
const RED_GRADIENT_END: &str = "#c0392b";
const YELLOW_GRADIENT_START: &str = "#f7dc6f";
const YELLOW_GRADIENT_END: &str = "#f1c40f";

// Highlight colors
const HIGHLIGHT_LAST_MOVE: &str = "#f39c12";
const HIGHLIGHT_WINNER: &str = "#88cc88";

// ============================================================================
// Text output
// ============================================================================

/// Grid, column labels and a one-line status.
fn render_text(position: &Position) -> String {
    let mut out = position.to_string();
    let labels: Vec<String> = (0..WIDTH).map(|c| c.to_string()).collect();
    out.push_str(&labels.join(" "));
    out.push('\n');
    out.push_str(&status_line(position));
    out.push('\n');
    out
}

fn status_line(position: &Position) -> String {
    match position.winner() {
        Some(player) => format!("{:?} wins after {} moves", player, position.move_count()),
        None if position.is_full() => "Draw: board is full".to_string(),
        None => format!(
            "{:?} to move ({} moves played)",
            position.current_player(),
            position.move_count()
        ),
    }
}

// ============================================================================
// SVG generation
// ============================================================================

/// Options for rendering
struct RenderOptions {
    highlight_last: bool,
    highlight_winner: bool,
    scale: f32, // 1.0 = 64px cells
}

/// Generate SVG for a position
fn render_svg(position: &Position, opts: &RenderOptions) -> String {
    let scale = if opts.scale > 0.0 { opts.scale } else { 1.0 };

    let board_width = WIDTH as f32 * CELL_SIZE + 2.0 * BOARD_PADDING;
    let board_height = HEIGHT as f32 * CELL_SIZE + 2.0 * BOARD_PADDING;
    let width = board_width + 2.0 * IMAGE_PADDING;
    let height = board_height + 2.0 * IMAGE_PADDING;

    let mut svg = String::new();

    // SVG header with viewBox for scaling
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width * scale,
        height * scale,
        width,
        height
    ));
    svg.push('\n');

    // Definitions (gradients)
    svg.push_str("  <defs>\n");
    for (id, start, end) in [
        ("red-grad", RED_GRADIENT_START, RED_GRADIENT_END),
        ("yellow-grad", YELLOW_GRADIENT_START, YELLOW_GRADIENT_END),
    ] {
        svg.push_str(&format!(
            r#"    <linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:{}"/>
      <stop offset="100%" style="stop-color:{}"/>
    </linearGradient>
"#,
            id, start, end
        ));
    }
    svg.push_str("  </defs>\n");

    // Background
    svg.push_str(&format!(
        r#"  <rect width="{}" height="{}" fill="{}"/>"#,
        width, height, BG_COLOR
    ));
    svg.push('\n');

    // Board
    svg.push_str(&format!(
        r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"/>"#,
        IMAGE_PADDING, IMAGE_PADDING, board_width, board_height, BOARD_RADIUS, BOARD_BG
    ));
    svg.push('\n');

    let winning: Bitboard = match position.winner() {
        Some(player) if opts.highlight_winner => Position::winning_cells(position.mask(player)),
        _ => 0,
    };
    // Row 0 is the top of the picture, so the last token sits at HEIGHT - height.
    let last_cell = if opts.highlight_last {
        position
            .last_move()
            .map(|column| (column, HEIGHT - position.column_height(column)))
    } else {
        None
    };

    // Holes and tokens
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let cx = IMAGE_PADDING + BOARD_PADDING + (x as f32 + 0.5) * CELL_SIZE;
            let cy = IMAGE_PADDING + BOARD_PADDING + (y as f32 + 0.5) * CELL_SIZE;

            let fill = match position.token(x, y) {
                Token::Empty => HOLE_COLOR,
                Token::Red => "url(#red-grad)",
                Token::Yellow => "url(#yellow-grad)",
            };
            let (stroke, stroke_width) = if (winning & cell_at(x, y)) != 0 {
                (HIGHLIGHT_WINNER, 4.0)
            } else if last_cell == Some((x, y)) {
                (HIGHLIGHT_LAST_MOVE, 4.0)
            } else {
                ("rgba(0,0,0,0.2)", 2.0)
            };

            svg.push_str(&format!(
                r#"  <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                cx, cy, HOLE_RADIUS, fill, stroke, stroke_width
            ));
            svg.push('\n');
        }
    }

    svg.push_str("</svg>\n");
    svg
}

// ============================================================================
// CLI
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Svg,
}

#[derive(Parser, Debug)]
#[command(name = "render", about = "Render a Connect Four position as text or SVG")]
struct Cli {
    /// Moves to replay, as 0-based column digits
    #[arg(short, long, default_value = "")]
    moves: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Output file for SVG (default: board.svg)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write one SVG per move of the game into --output-dir
    #[arg(long)]
    game: bool,

    /// Output directory for --game frames
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Scale factor for SVG output
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Do not outline the winning cells and the last move
    #[arg(long)]
    no_highlight: bool,

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
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("initialising logger")?;
    let position: Position = cli
        .moves
        .parse()
        .with_context(|| format!("invalid moves {:?}", cli.moves))?;
    debug!("replayed {} moves", position.move_count());

    let opts = RenderOptions {
        highlight_last: !cli.no_highlight,
        highlight_winner: !cli.no_highlight,
        scale: cli.scale,
    };

    // Batch mode: one frame per move, starting from the empty board
    if cli.game {
        if cli.output.is_some() {
            bail!("--game writes SVG frames; --output does not apply");
        }
        fs::create_dir_all(&cli.output_dir)
            .with_context(|| format!("creating {}", cli.output_dir.display()))?;

        let mut frame = Position::new();
        write_frame(&frame, &opts, &cli.output_dir, 0)?;
        for (i, &column) in position.history().iter().enumerate() {
            frame.make_move_unchecked(column as usize);
            write_frame(&frame, &opts, &cli.output_dir, i + 1)?;
        }

        info!("Rendered {} frames", position.move_count() + 1);
        return Ok(());
    }

    match cli.format {
        Format::Text => print!("{}", render_text(&position)),
        Format::Svg => {
            let path = cli.output.unwrap_or_else(|| PathBuf::from("board.svg"));
            fs::write(&path, render_svg(&position, &opts))
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn write_frame(frame: &Position, opts: &RenderOptions, dir: &Path, index: usize) -> Result<()> {
    let path = dir.join(format!("move-{:02}.svg", index));
    fs::write(&path, render_svg(frame, opts))
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTS: RenderOptions = RenderOptions {
        highlight_last: true,
        highlight_winner: true,
        scale: 1.0,
    };

    #[test]
    fn test_svg_has_one_circle_per_cell() {
        let position: Position = "3323".parse().unwrap();
        let svg = render_svg(&position, &OPTS);
        assert_eq!(svg.matches("<circle").count(), WIDTH * HEIGHT);
        assert_eq!(svg.matches("url(#red-grad)\"").count(), 2);
        assert_eq!(svg.matches("url(#yellow-grad)\"").count(), 2);
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_svg_highlights() {
        // Bottom row 0..=3 for the first player, last move in column 3.
        let position: Position = "0011223".parse().unwrap();
        let svg = render_svg(&position, &OPTS);
        assert_eq!(svg.matches(HIGHLIGHT_WINNER).count(), 4);
        // The last move is part of the win, so the winner outline takes priority.
        assert_eq!(svg.matches(HIGHLIGHT_LAST_MOVE).count(), 0);

        let position: Position = "33".parse().unwrap();
        let svg = render_svg(&position, &OPTS);
        assert_eq!(svg.matches(HIGHLIGHT_WINNER).count(), 0);
        assert_eq!(svg.matches(HIGHLIGHT_LAST_MOVE).count(), 1);
    }

    #[test]
    fn test_text_status() {
        let text = render_text(&"0011223".parse().unwrap());
        assert!(text.contains("0 1 2 3 4 5 6"));
        assert!(text.ends_with("One wins after 7 moves\n"));

        let text = render_text(&Position::new());
        assert!(text.ends_with("One to move (0 moves played)\n"));
    }
}
