use std::path::PathBuf;

use chrono::FixedOffset;
use daymap_model::day::{CalendarDay, GridCoordinate};
use daymap_model::event::{parse_events, Event};
use daymap_processing_core::aggregate::DensityAggregator;
use daymap_processing_core::calendar::{all_dates_of_year, coord_to_date, max_week_index, YearGrid};
use daymap_processing_core::heatmap::HeatmapGrid;
use daymap_processing_core::ramp::{Bucket, ColorRamp, ContinuousRamp, DiscreteRamp};

fn load_fixture_events() -> Vec<Event> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-events")
        .join("events.jsonl");

    let content = std::fs::read_to_string(path).expect("fixture events should be readable");
    parse_events(&content).expect("fixture events should parse")
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn day(key: &str) -> CalendarDay {
    key.parse().unwrap()
}

fn fnv1a_64(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in input.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[test]
fn fixture_passes_through_display_fields() {
    let events = load_fixture_events();
    assert_eq!(events.len(), 15);
    assert_eq!(events[0].name.as_deref(), Some("Espresso"));
    assert_eq!(events[0].rating, Some(4.5));
    let decaf = events.iter().find(|e| e.name.as_deref() == Some("Decaf")).unwrap();
    assert_eq!(decaf.timestamp, "2024-03-01T21:10:00Z");
    assert_eq!(decaf.extra.get("venue").and_then(|v| v.as_str()), Some("Home"));
}

#[test]
fn fixture_aggregates_for_2024() {
    let events = load_fixture_events();
    let density = DensityAggregator::for_year(utc(), 2024).aggregate(&events);

    assert_eq!(density.count(day("2024-03-01")), 5);
    assert_eq!(density.count(day("2024-03-02")), 1);
    assert_eq!(density.count(day("2024-02-29")), 2);
    assert_eq!(density.count(day("2024-07-05")), 1);
    assert_eq!(density.count(day("2024-07-04")), 0);
    assert_eq!(density.max(), 5);
    assert_eq!(density.len(), 6);

    let stats = density.stats();
    assert_eq!(stats.total, 15);
    assert_eq!(stats.counted, 12);
    assert_eq!(stats.unparsable, 2);
    assert_eq!(stats.out_of_scope, 1);
    assert_eq!(stats.counted + stats.unparsable + stats.out_of_scope, stats.total);
    assert_eq!(
        density.iter().map(|(_, count)| count as usize).sum::<usize>(),
        stats.counted
    );

    let heat = ContinuousRamp::default().token(density.count(day("2024-03-01")), density.max());
    assert_eq!(heat.t, 1.0);
    let quiet = ContinuousRamp::default().token(density.count(day("2024-05-05")), density.max());
    assert_eq!(quiet.color.a, 0.0);

    let ramp = DiscreteRamp::default();
    assert_eq!(ramp.token(density.count(day("2024-03-01")), density.max()).bucket, Bucket::Max);
    assert_eq!(ramp.token(density.count(day("2024-02-29")), density.max()).bucket, Bucket::Mid);
}

#[test]
fn fixture_aggregation_follows_reference_zone() {
    let events = load_fixture_events();
    // 2024-07-04T23:30-04:00 is 22:30 on July 4th at UTC-5.
    let density =
        DensityAggregator::for_year(FixedOffset::west_opt(5 * 3600).unwrap(), 2024).aggregate(&events);
    assert_eq!(density.count(day("2024-07-04")), 1);
    assert_eq!(density.count(day("2024-07-05")), 0);
    // Bare dates and naive times never move with the zone.
    assert_eq!(density.count(day("2024-03-01")), 5);
}

#[test]
fn fixture_aggregation_is_order_independent() {
    let mut events = load_fixture_events();
    let forward = DensityAggregator::for_year(utc(), 2024).aggregate(&events);
    events.reverse();
    let backward = DensityAggregator::for_year(utc(), 2024).aggregate(&events);
    assert_eq!(forward, backward);
}

#[test]
fn fixture_heatmap_signature_is_stable() {
    let events = load_fixture_events();
    let density = DensityAggregator::for_year(utc(), 2024).aggregate(&events);
    let heatmap = HeatmapGrid::from_density(YearGrid::new(2024).unwrap(), &density);

    let signature = heatmap
        .active_days()
        .map(|cell| {
            format!(
                "{}|{}|{}|{}",
                cell.day, cell.coord.week, cell.coord.weekday, cell.count
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    assert_eq!(heatmap.days().count(), 366);
    assert_eq!(fnv1a_64(&signature), 0x65e79cedec6b5280);
}

#[test]
fn leap_year_corners() {
    assert_eq!(coord_to_date(0, 0, 2024), Some(day("2024-01-01")));
    assert_eq!(coord_to_date(52, 1, 2024), Some(day("2024-12-31")));
    assert_eq!(coord_to_date(52, 2, 2024), None);
    assert_eq!(max_week_index(2024).unwrap(), 52);
    assert_eq!(all_dates_of_year(2024).unwrap().len(), 366);
    assert_eq!(all_dates_of_year(2023).unwrap().len(), 365);

    let grid = YearGrid::new(2024).unwrap();
    assert_eq!(
        grid.date_to_coord(day("2024-02-29")),
        Some(GridCoordinate::new(8, 3))
    );
}
