//! Show aggregation results for one year.

use std::collections::BTreeMap;
use std::path::PathBuf;

use daymap_processing_core::ramp::{Bucket, DiscreteRamp};
use serde::Serialize;

use super::{load_events, year_heatmap};

#[derive(Serialize)]
struct StatsReport {
    year: i32,
    total: usize,
    counted: usize,
    unparsable: usize,
    out_of_scope: usize,
    active_days: usize,
    max: u32,
    buckets: BTreeMap<Bucket, usize>,
    counts: BTreeMap<String, u32>,
}

pub fn run(events: PathBuf, year: i32, json: bool) -> anyhow::Result<()> {
    let events = load_events(&events)?;
    let (heatmap, density) = year_heatmap(&events, year)?;
    let stats = density.stats();

    let mut buckets: BTreeMap<Bucket, usize> = Bucket::ALL.iter().map(|b| (*b, 0)).collect();
    for cell in heatmap.days() {
        *buckets.entry(Bucket::for_count(cell.count)).or_default() += 1;
    }

    let report = StatsReport {
        year,
        total: stats.total,
        counted: stats.counted,
        unparsable: stats.unparsable,
        out_of_scope: stats.out_of_scope,
        active_days: density.len(),
        max: density.max(),
        buckets,
        counts: density.keyed_counts(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Year {}", report.year);
    println!("  Events: {}", report.total);
    println!("  Counted: {}", report.counted);
    println!("  Unparsable: {}", report.unparsable);
    println!("  Other years: {}", report.out_of_scope);
    println!("  Active days: {}", report.active_days);
    println!("  Max per day: {}", report.max);
    println!();

    println!("Buckets:");
    for token in DiscreteRamp::default().legend() {
        let [r, g, b, _] = token.color.to_rgba8();
        let days = report.buckets.get(&token.bucket).copied().unwrap_or(0);
        println!("  {:?} #{r:02x}{g:02x}{b:02x}: {days} day(s)", token.bucket);
    }

    if let Some((day, count)) = density.iter().max_by_key(|(day, count)| (*count, std::cmp::Reverse(*day))) {
        println!();
        println!("Busiest day: {day} ({count} event(s))");
    }

    Ok(())
}
