//! Convert between dates and grid cells.

use daymap_model::day::GridCoordinate;
use daymap_processing_core::calendar::YearGrid;

use super::parse_day;

pub fn run(
    year: i32,
    date: Option<String>,
    week: Option<u32>,
    weekday: Option<u8>,
) -> anyhow::Result<()> {
    let grid = YearGrid::new(year)?;

    match (date, week, weekday) {
        (Some(raw), _, _) => {
            let day = parse_day(&raw)?;
            match grid.date_to_coord(day) {
                Some(coord) => println!(
                    "{day}: week {} weekday {} ({})",
                    coord.week,
                    coord.weekday,
                    coord.weekday_label()
                ),
                None => println!("{day} is not in {year}"),
            }
        }
        (None, Some(week), Some(weekday)) => {
            let coord = GridCoordinate::new(week, weekday);
            match grid.coord_to_date(coord) {
                Some(day) => println!("week {week} weekday {weekday}: {day}"),
                None => println!("week {week} weekday {weekday}: no such day in {year}"),
            }
        }
        _ => anyhow::bail!("pass a date, or both --week and --weekday"),
    }

    println!(
        "Grid: {} weeks, Jan 1 on {}",
        grid.week_count(),
        grid.first_day().weekday_label()
    );
    Ok(())
}
