//! Render one year of events to a PNG.

use std::path::PathBuf;

use daymap_common::config::AppConfig;
use daymap_render_engine::export::export_png;
use daymap_render_engine::frame::{year_layout, RenderContext};
use daymap_render_engine::renderer_for;
use daymap_render_engine::sequencer::{FrameSequencer, RedrawCause};

use super::{load_events, parse_day, resolve_render, resolve_today, year_heatmap};

pub struct RenderArgs {
    pub events: PathBuf,
    pub year: i32,
    pub mode: Option<String>,
    pub height: Option<f64>,
    pub scale: Option<f64>,
    pub today: Option<String>,
    pub selected: Option<String>,
    pub out: PathBuf,
}

pub fn run(config: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let settings = resolve_render(
        &config.render,
        args.mode.as_deref(),
        args.height,
        args.scale,
    )?;
    let today = resolve_today(args.today.as_deref())?;
    let selected = args.selected.as_deref().map(parse_day).transpose()?;

    let events = load_events(&args.events)?;
    let (heatmap, density) = year_heatmap(&events, args.year)?;

    let mut sequencer = FrameSequencer::new();
    let ticket = sequencer.begin(RedrawCause::Data);

    let layout = year_layout(&heatmap.grid, settings.mode, &settings);
    let ctx = RenderContext::new(layout, settings.device_scale)
        .with_today(today)
        .with_selected(selected);
    let renderer = renderer_for(settings.mode, &settings);
    let frame = renderer.render(&heatmap, &ctx);

    let frame = sequencer.publish(ticket, frame)?;
    let summary = export_png(&frame.surface, &args.out)?;

    println!("Rendered {} ({:?})", args.year, settings.mode);
    println!("  Active days: {}", density.len());
    println!("  Max per day: {}", density.max());
    println!(
        "  Surface: {:.0}x{:.0} css px @ {}x ({}x{} px)",
        layout.surface_width(),
        layout.surface_height(),
        settings.device_scale,
        summary.width,
        summary.height
    );
    if !frame.stages.is_empty() {
        let stages: Vec<String> = frame.stages.iter().map(|s| format!("{s:?}")).collect();
        println!("  Stages: {}", stages.join(" > "));
    }
    println!("  Signature: {}", summary.signature);
    println!("  Output: {}", summary.path.display());

    Ok(())
}
