//! Resolve a pointer position to a day, the way a click would.

use std::path::PathBuf;

use daymap_common::config::AppConfig;
use daymap_render_engine::frame::year_layout;
use daymap_render_engine::interaction::{Intent, ViewController, YearView};

use super::{load_events, resolve_render, resolve_today, year_heatmap};

pub struct PickArgs {
    pub events: PathBuf,
    pub year: i32,
    pub x: f64,
    pub y: f64,
    pub mode: Option<String>,
    pub height: Option<f64>,
    pub today: Option<String>,
}

pub fn run(config: &AppConfig, args: PickArgs) -> anyhow::Result<()> {
    let settings = resolve_render(&config.render, args.mode.as_deref(), args.height, None)?;
    let today = resolve_today(args.today.as_deref())?;

    let events = load_events(&args.events)?;
    let (heatmap, _) = year_heatmap(&events, args.year)?;
    let layout = year_layout(&heatmap.grid, settings.mode, &settings);

    let mut controller = ViewController::new(YearView::new(heatmap, layout)).with_today(today);

    match controller.pointer_move(args.x, args.y) {
        Some(tip) => println!(
            "Hover: {} ({}) count={}",
            tip.day, tip.weekday_label, tip.count
        ),
        None => println!("Hover: no day at ({}, {})", args.x, args.y),
    }

    match controller.click(args.x, args.y) {
        Some(Intent::DaySelected(day)) => println!("Click: day selected {day}"),
        Some(Intent::MonthSelected(month)) => println!("Click: month selected {month}"),
        None => println!("Click: no selection"),
    }

    Ok(())
}
