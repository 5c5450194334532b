//! Density aggregation: event timestamps to per-day counts.
//!
//! Timestamps that fail to parse are skipped without error. Every parsed
//! timestamp goes through the same [`DayNormalizer`] the grid indexer uses,
//! so a given instant lands on the same day everywhere.

use std::collections::BTreeMap;

use chrono::TimeZone;
use daymap_model::day::CalendarDay;
use daymap_model::event::{parse_timestamp, Event};
use serde::Serialize;

use crate::calendar::DayNormalizer;

/// Bookkeeping for one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    /// Events seen.
    pub total: usize,
    /// Events credited to a day.
    pub counted: usize,
    /// Events whose timestamp did not parse.
    pub unparsable: usize,
    /// Events that parsed but fell outside the target year.
    pub out_of_scope: usize,
}

/// Per-day event counts plus the normalization bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DensityMap {
    counts: BTreeMap<CalendarDay, u32>,
    max: u32,
    stats: AggregateStats,
}

impl DensityMap {
    /// A map with no events. `max` is still 1.
    pub fn empty() -> Self {
        Self {
            counts: BTreeMap::new(),
            max: 1,
            stats: AggregateStats::default(),
        }
    }

    /// Events on `day`; 0 for days that are absent.
    pub fn count(&self, day: CalendarDay) -> u32 {
        self.counts.get(&day).copied().unwrap_or(0)
    }

    /// Largest per-day count, never below 1.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Days with at least one event, in date order.
    pub fn iter(&self) -> impl Iterator<Item = (CalendarDay, u32)> + '_ {
        self.counts.iter().map(|(d, c)| (*d, *c))
    }

    /// Number of days with at least one event.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn stats(&self) -> AggregateStats {
        self.stats
    }

    /// Counts keyed by canonical `YYYY-MM-DD` strings.
    pub fn keyed_counts(&self) -> BTreeMap<String, u32> {
        self.counts.iter().map(|(d, c)| (d.key(), *c)).collect()
    }
}

/// Turns events into a [`DensityMap`].
#[derive(Debug, Clone)]
pub struct DensityAggregator<Tz: TimeZone> {
    normalizer: DayNormalizer<Tz>,
    year: Option<i32>,
}

impl<Tz: TimeZone> DensityAggregator<Tz> {
    /// Aggregate every event regardless of year.
    pub fn new(tz: Tz) -> Self {
        Self {
            normalizer: DayNormalizer::new(tz),
            year: None,
        }
    }

    /// Aggregate only events that fall inside `year`.
    pub fn for_year(tz: Tz, year: i32) -> Self {
        Self {
            normalizer: DayNormalizer::new(tz),
            year: Some(year),
        }
    }

    pub fn normalizer(&self) -> &DayNormalizer<Tz> {
        &self.normalizer
    }

    /// Count events per normalized local day.
    pub fn aggregate(&self, events: &[Event]) -> DensityMap {
        self.aggregate_timestamps(events.iter().map(|e| e.timestamp.as_str()))
    }

    /// Count raw timestamp strings per normalized local day.
    pub fn aggregate_timestamps<'a, I>(&self, timestamps: I) -> DensityMap
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: BTreeMap<CalendarDay, u32> = BTreeMap::new();
        let mut stats = AggregateStats::default();

        for raw in timestamps {
            stats.total += 1;
            let Some(parsed) = parse_timestamp(raw) else {
                stats.unparsable += 1;
                continue;
            };
            let day = self.normalizer.day_of(&parsed);
            if self.year.is_some_and(|year| day.year() != year) {
                stats.out_of_scope += 1;
                continue;
            }
            *counts.entry(day).or_insert(0) += 1;
            stats.counted += 1;
        }

        let max = counts.values().copied().max().unwrap_or(0).max(1);

        tracing::debug!(
            total = stats.total,
            days = counts.len(),
            max,
            unparsable = stats.unparsable,
            out_of_scope = stats.out_of_scope,
            "aggregated event density"
        );

        DensityMap { counts, max, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn day(key: &str) -> CalendarDay {
        key.parse().unwrap()
    }

    #[test]
    fn test_five_and_one() {
        let mut events: Vec<Event> = (0..5)
            .map(|h| Event::at(format!("2024-03-01T{:02}:15:00Z", 8 + h)))
            .collect();
        events.push(Event::at("2024-03-02T09:00:00Z"));

        let density = DensityAggregator::for_year(utc(), 2024).aggregate(&events);
        assert_eq!(density.count(day("2024-03-01")), 5);
        assert_eq!(density.count(day("2024-03-02")), 1);
        assert_eq!(density.count(day("2024-03-03")), 0);
        assert_eq!(density.max(), 5);
        assert_eq!(density.len(), 2);
    }

    #[test]
    fn test_unparsable_contributes_nothing() {
        let events = vec![
            Event::at("not a date"),
            Event::at(""),
            Event::at("2024-02-30T10:00:00Z"),
            Event::at("2024-04-01"),
        ];
        let density = DensityAggregator::new(utc()).aggregate(&events);
        assert_eq!(density.len(), 1);
        assert_eq!(density.count(day("2024-04-01")), 1);
        assert_eq!(density.stats().unparsable, 3);
        assert_eq!(density.stats().counted, 1);
    }

    #[test]
    fn test_empty_input_max_is_one() {
        let density = DensityAggregator::new(utc()).aggregate(&[]);
        assert!(density.is_empty());
        assert_eq!(density.max(), 1);
        assert_eq!(density, DensityMap::empty());
    }

    #[test]
    fn test_order_independent() {
        let a = vec![
            Event::at("2024-05-01T10:00:00Z"),
            Event::at("2024-05-02"),
            Event::at("2024-05-01 23:59:59"),
            Event::at("garbage"),
        ];
        let mut b = a.clone();
        b.reverse();
        let agg = DensityAggregator::new(utc());
        assert_eq!(agg.aggregate(&a), agg.aggregate(&b));
        assert_eq!(agg.aggregate(&a), agg.aggregate(&a));
    }

    #[test]
    fn test_zone_decides_the_day() {
        let events = vec![Event::at("2024-03-01T23:30:00-05:00")];
        let utc_density = DensityAggregator::new(utc()).aggregate(&events);
        assert_eq!(utc_density.count(day("2024-03-02")), 1);

        let east_coast = FixedOffset::west_opt(5 * 3600).unwrap();
        let local_density = DensityAggregator::new(east_coast).aggregate(&events);
        assert_eq!(local_density.count(day("2024-03-01")), 1);
    }

    #[test]
    fn test_year_scope_excludes_neighbours() {
        let events = vec![
            Event::at("2023-12-31T12:00:00Z"),
            Event::at("2024-01-01T12:00:00Z"),
            Event::at("2025-01-01"),
        ];
        let density = DensityAggregator::for_year(utc(), 2024).aggregate(&events);
        assert_eq!(density.len(), 1);
        assert_eq!(density.stats().out_of_scope, 2);
    }

    #[test]
    fn test_keyed_counts_serialize() {
        let density =
            DensityAggregator::new(utc()).aggregate(&[Event::at("2024-03-01"), Event::at("2024-03-01")]);
        let keyed = density.keyed_counts();
        assert_eq!(keyed.get("2024-03-01"), Some(&2));
        let json = serde_json::to_string(&density).unwrap();
        assert!(json.contains("\"2024-03-01\":2"));
    }

    #[test]
    fn test_dst_transitions_keep_local_days() {
        let events: Vec<Event> = [
            "2024-03-10T04:59:00Z",
            "2024-03-10T05:00:00Z",
            "2024-03-10T02:30:00",
            "2024-03-11T03:59:00Z",
            "2024-03-11T04:00:00Z",
            "2024-11-03T03:59:00Z",
            "2024-11-03T04:00:00Z",
            "2024-11-03T01:30:00",
            "2024-11-04T04:59:00Z",
            "2024-11-04T05:00:00Z",
        ]
        .into_iter()
        .map(Event::at)
        .collect();

        let density = DensityAggregator::for_year(chrono_tz::America::New_York, 2024).aggregate(&events);
        assert_eq!(density.count(day("2024-03-09")), 1);
        // Spring forward: a 23-hour day, including a wall-clock time that never happened.
        assert_eq!(density.count(day("2024-03-10")), 3);
        assert_eq!(density.count(day("2024-03-11")), 1);
        assert_eq!(density.count(day("2024-11-02")), 1);
        // Fall back: a 25-hour day, including an ambiguous wall-clock time.
        assert_eq!(density.count(day("2024-11-03")), 3);
        assert_eq!(density.count(day("2024-11-04")), 1);
        assert_eq!(density.stats().counted, 10);
    }

    #[test]
    fn test_non_string_timestamps_count_as_unparsable() {
        let jsonl = concat!(
            "{\"timestamp\":\"2024-03-01\"}\n",
            "{\"timestamp\":null}\n",
            "{\"timestamp\":1709251200}\n",
            "{\"name\":\"missing\"}\n",
        );
        let events = daymap_model::event::parse_events(jsonl).unwrap();
        let density = DensityAggregator::for_year(utc(), 2024).aggregate(&events);
        let stats = density.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.counted, 1);
        assert_eq!(stats.unparsable, 3);
        assert_eq!(density.count(day("2024-03-01")), 1);
    }
}
