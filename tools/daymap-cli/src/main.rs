//! Daymap CLI: render and inspect calendar heatmaps of event logs.
//!
//! Usage:
//!   daymap render <EVENTS> --year <Y>    Render a year to PNG
//!   daymap stats <EVENTS> --year <Y>     Show per-day counts and totals
//!   daymap pick <EVENTS> --year <Y>      Resolve a pointer position to a day
//!   daymap locate --year <Y> <DATE>      Convert between dates and grid cells

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use daymap_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "daymap",
    about = "Calendar heatmaps for timestamped event logs",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one year of events to a PNG
    Render {
        /// JSON array or JSONL file of events
        events: PathBuf,

        /// Target year
        #[arg(short, long)]
        year: i32,

        /// Heatmap style: flat|raster
        #[arg(short, long)]
        mode: Option<String>,

        /// Fixed surface height in CSS pixels (raster mode)
        #[arg(long)]
        height: Option<f64>,

        /// Device pixel ratio of the backing buffer
        #[arg(long)]
        scale: Option<f64>,

        /// Treat this YYYY-MM-DD as today instead of the system date
        #[arg(long)]
        today: Option<String>,

        /// Day to draw as selected (YYYY-MM-DD)
        #[arg(long)]
        selected: Option<String>,

        /// Output PNG path
        #[arg(short, long, default_value = "daymap.png")]
        out: PathBuf,
    },

    /// Show aggregation results for one year
    Stats {
        /// JSON array or JSONL file of events
        events: PathBuf,

        /// Target year
        #[arg(short, long)]
        year: i32,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a pointer position (CSS pixels) to a day
    Pick {
        /// JSON array or JSONL file of events
        events: PathBuf,

        /// Target year
        #[arg(long)]
        year: i32,

        /// Pointer x relative to the surface's top-left
        #[arg(long, allow_hyphen_values = true)]
        x: f64,

        /// Pointer y relative to the surface's top-left
        #[arg(long, allow_hyphen_values = true)]
        y: f64,

        /// Heatmap style whose layout to use: flat|raster
        #[arg(short, long)]
        mode: Option<String>,

        /// Fixed surface height in CSS pixels (raster mode)
        #[arg(long)]
        height: Option<f64>,

        /// Treat this YYYY-MM-DD as today instead of the system date
        #[arg(long)]
        today: Option<String>,
    },

    /// Convert a date to its grid cell, or a grid cell to its date
    Locate {
        /// Target year
        #[arg(short, long)]
        year: i32,

        /// Date to locate (YYYY-MM-DD)
        date: Option<String>,

        /// Week column
        #[arg(long, requires = "weekday", conflicts_with = "date")]
        week: Option<u32>,

        /// Weekday row (0 = Monday)
        #[arg(long, requires = "week")]
        weekday: Option<u8>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    daymap_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Render {
            events,
            year,
            mode,
            height,
            scale,
            today,
            selected,
            out,
        } => commands::render::run(
            &config,
            commands::render::RenderArgs {
                events,
                year,
                mode,
                height,
                scale,
                today,
                selected,
                out,
            },
        ),
        Commands::Stats { events, year, json } => commands::stats::run(events, year, json),
        Commands::Pick {
            events,
            year,
            x,
            y,
            mode,
            height,
            today,
        } => commands::pick::run(
            &config,
            commands::pick::PickArgs {
                events,
                year,
                x,
                y,
                mode,
                height,
                today,
            },
        ),
        Commands::Locate {
            year,
            date,
            week,
            weekday,
        } => commands::locate::run(year, date, week, weekday),
    }
}
