//! Pointer interaction: hover tooltip, day selection and month selection.
//!
//! A [`ViewController`] owns the transient state of one view instance. It
//! routes every click to at most one [`Intent`]: a click that lands on a day
//! cell is consumed by that cell, even when the day cannot be selected, so
//! the surrounding month never sees it.

use daymap_model::day::CalendarDay;
use daymap_model::layout::{GridLayout, Rect};
use daymap_processing_core::aggregate::DensityMap;
use daymap_processing_core::heatmap::HeatmapGrid;
use daymap_processing_core::month::MonthGrid;
use serde::Serialize;

use crate::frame::{month_headers, RenderContext};
use crate::hit::{Hit, HitTester, MonthHitTester};

/// Outcome of a click, handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Intent {
    /// `YYYY-MM-DD` key of the selected day.
    DaySelected(String),
    /// Zero-based month index.
    MonthSelected(u8),
}

/// Host callbacks for selection intents.
pub trait SelectionSink {
    fn on_day_selected(&mut self, day: &str);
    fn on_month_selected(&mut self, month: u8);
}

/// Collects intents in order.
impl SelectionSink for Vec<Intent> {
    fn on_day_selected(&mut self, day: &str) {
        self.push(Intent::DaySelected(day.to_string()));
    }

    fn on_month_selected(&mut self, month: u8) {
        self.push(Intent::MonthSelected(month));
    }
}

/// Hover details shown next to the pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub day: CalendarDay,
    pub weekday_label: &'static str,
    pub count: u32,
    pub x: f64,
    pub y: f64,
}

/// What a view exposes to pointer routing.
pub trait ViewTarget {
    /// Day cell under the pointer.
    fn pick(&self, x: f64, y: f64) -> Option<Hit>;

    /// Month container under the pointer.
    fn month_at(&self, x: f64, y: f64) -> Option<u32>;

    fn layout(&self) -> &GridLayout;
}

/// A full-year heatmap with per-month containers.
#[derive(Debug, Clone)]
pub struct YearView {
    heatmap: HeatmapGrid,
    layout: GridLayout,
    months: Vec<(u32, Rect)>,
}

impl YearView {
    pub fn new(heatmap: HeatmapGrid, layout: GridLayout) -> Self {
        let body = layout.pad_y + layout.content_height();
        let months = month_headers(&heatmap.grid, &layout)
            .into_iter()
            .map(|(month0, header)| (month0, Rect::new(header.x, 0.0, header.w, body)))
            .collect();
        Self {
            heatmap,
            layout,
            months,
        }
    }

    pub fn heatmap(&self) -> &HeatmapGrid {
        &self.heatmap
    }

    /// Month container rectangles, header strip through the last row.
    pub fn month_regions(&self) -> &[(u32, Rect)] {
        &self.months
    }
}

impl ViewTarget for YearView {
    fn pick(&self, x: f64, y: f64) -> Option<Hit> {
        HitTester::new(&self.heatmap, self.layout).pick(x, y)
    }

    fn month_at(&self, x: f64, y: f64) -> Option<u32> {
        self.months
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(month0, _)| *month0)
    }

    fn layout(&self) -> &GridLayout {
        &self.layout
    }
}

/// A single month; the whole surface is the month container.
#[derive(Debug, Clone)]
pub struct MonthView {
    month: MonthGrid,
    density: DensityMap,
    layout: GridLayout,
}

impl MonthView {
    pub fn new(month: MonthGrid, density: DensityMap, layout: GridLayout) -> Self {
        Self {
            month,
            density,
            layout,
        }
    }

    pub fn month(&self) -> &MonthGrid {
        &self.month
    }
}

impl ViewTarget for MonthView {
    fn pick(&self, x: f64, y: f64) -> Option<Hit> {
        MonthHitTester::new(&self.month, &self.density, self.layout).pick(x, y)
    }

    fn month_at(&self, x: f64, y: f64) -> Option<u32> {
        let bounds = Rect::new(0.0, 0.0, self.layout.surface_width(), self.layout.surface_height());
        bounds.contains(x, y).then_some(self.month.month0())
    }

    fn layout(&self) -> &GridLayout {
        &self.layout
    }
}

/// Transient interaction state for one view.
#[derive(Debug, Clone)]
pub struct ViewController<V> {
    view: V,
    today: Option<CalendarDay>,
    selected: Option<CalendarDay>,
    tooltip: Option<Tooltip>,
}

impl<V: ViewTarget> ViewController<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            today: None,
            selected: None,
            tooltip: None,
        }
    }

    /// Days after `today` become unselectable.
    pub fn with_today(mut self, today: CalendarDay) -> Self {
        self.today = Some(today);
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn selected(&self) -> Option<CalendarDay> {
        self.selected
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Context for redrawing this view with its current selection.
    pub fn render_context(&self, device_scale: f64) -> RenderContext {
        let ctx = RenderContext::new(*self.view.layout(), device_scale).with_selected(self.selected);
        match self.today {
            Some(today) => ctx.with_today(today),
            None => ctx,
        }
    }

    fn is_future(&self, day: CalendarDay) -> bool {
        self.today.is_some_and(|today| day > today)
    }

    /// Update the tooltip for a pointer position.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<&Tooltip> {
        self.tooltip = self.view.pick(x, y).map(|hit| Tooltip {
            day: hit.day,
            weekday_label: hit.weekday_label,
            count: hit.count,
            x,
            y,
        });
        self.tooltip.as_ref()
    }

    /// The pointer left the surface.
    pub fn pointer_leave(&mut self) {
        self.tooltip = None;
    }

    /// Resolve a click to at most one intent and update the selection.
    pub fn click(&mut self, x: f64, y: f64) -> Option<Intent> {
        if let Some(hit) = self.view.pick(x, y) {
            if self.is_future(hit.day) {
                tracing::debug!(day = %hit.day, "ignoring click on future day");
                return None;
            }
            self.selected = Some(hit.day);
            return Some(Intent::DaySelected(hit.day.key()));
        }
        // Filler cells and headers belong to the month container.
        let month0 = self.view.month_at(x, y)?;
        Some(Intent::MonthSelected(month0 as u8))
    }

    /// Like [`ViewController::click`], forwarding the intent to `sink`.
    pub fn click_into(&mut self, x: f64, y: f64, sink: &mut dyn SelectionSink) -> Option<Intent> {
        let intent = self.click(x, y)?;
        match &intent {
            Intent::DaySelected(day) => sink.on_day_selected(day),
            Intent::MonthSelected(month) => sink.on_month_selected(*month),
        }
        Some(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::month_layout;
    use crate::frame::{YEAR_PAD_X, YEAR_PAD_Y};
    use chrono::FixedOffset;
    use daymap_model::event::Event;
    use daymap_processing_core::aggregate::DensityAggregator;
    use daymap_processing_core::calendar::YearGrid;

    fn density(year: i32, stamps: &[&str]) -> DensityMap {
        let events: Vec<Event> = stamps.iter().map(|s| Event::at(*s)).collect();
        DensityAggregator::for_year(FixedOffset::east_opt(0).unwrap(), year).aggregate(&events)
    }

    fn year_controller(year: i32, stamps: &[&str]) -> ViewController<YearView> {
        let grid = YearGrid::new(year).unwrap();
        let heatmap = HeatmapGrid::from_density(grid, &density(year, stamps));
        let layout = GridLayout::square(heatmap.cols as u32, 12.0, YEAR_PAD_X, YEAR_PAD_Y);
        ViewController::new(YearView::new(heatmap, layout))
    }

    fn center_of(controller: &ViewController<YearView>, key: &str) -> (f64, f64) {
        let day: CalendarDay = key.parse().unwrap();
        let coord = controller.view().heatmap().grid.date_to_coord(day).unwrap();
        controller.view().layout().cell_center(coord.week, coord.weekday as u32)
    }

    #[test]
    fn test_hover_sets_and_leave_clears_tooltip() {
        let mut controller = year_controller(2024, &["2024-03-01", "2024-03-01"]);
        let (x, y) = center_of(&controller, "2024-03-01");
        let tip = controller.pointer_move(x, y).cloned().unwrap();
        assert_eq!(tip.day.key(), "2024-03-01");
        assert_eq!(tip.weekday_label, "Fri");
        assert_eq!(tip.count, 2);

        controller.pointer_leave();
        assert!(controller.tooltip().is_none());

        assert!(controller.pointer_move(1.0, 1.0).is_none());
    }

    #[test]
    fn test_click_selects_day_once() {
        let mut controller = year_controller(2024, &[]);
        let (x, y) = center_of(&controller, "2024-05-20");
        let mut sink: Vec<Intent> = Vec::new();
        let intent = controller.click_into(x, y, &mut sink);
        assert_eq!(intent, Some(Intent::DaySelected("2024-05-20".into())));
        assert_eq!(sink, vec![Intent::DaySelected("2024-05-20".into())]);
        assert_eq!(controller.selected().map(|d| d.key()), Some("2024-05-20".into()));
        assert_eq!(controller.render_context(1.0).selected, controller.selected());
    }

    #[test]
    fn test_click_on_future_day_is_noop() {
        let today: CalendarDay = "2024-06-15".parse().unwrap();
        let mut controller = year_controller(2024, &[]).with_today(today);
        let (x, y) = center_of(&controller, "2024-06-16");
        let mut sink: Vec<Intent> = Vec::new();
        assert_eq!(controller.click_into(x, y, &mut sink), None);
        assert!(sink.is_empty());
        assert_eq!(controller.selected(), None);

        let (x, y) = center_of(&controller, "2024-06-15");
        assert_eq!(
            controller.click(x, y),
            Some(Intent::DaySelected("2024-06-15".into()))
        );
    }

    #[test]
    fn test_month_header_and_filler_select_month() {
        // 2023-01-01 is a Sunday, so week 0 Monday is January filler.
        let mut controller = year_controller(2023, &[]);
        let regions = controller.view().month_regions().to_vec();
        assert_eq!(regions.len(), 12);

        let (march, header) = regions[2];
        assert_eq!(march, 2);
        let intent = controller.click(header.x + 1.0, YEAR_PAD_Y / 2.0);
        assert_eq!(intent, Some(Intent::MonthSelected(2)));

        let (x, y) = controller.view().layout().cell_center(0, 0);
        assert_eq!(controller.click(x, y), Some(Intent::MonthSelected(0)));
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn test_day_inside_month_container_never_selects_month() {
        let mut controller = year_controller(2024, &[]);
        let (x, y) = center_of(&controller, "2024-03-13");
        assert_eq!(controller.view().month_at(x, y), Some(2));

        let mut sink: Vec<Intent> = Vec::new();
        controller.click_into(x, y, &mut sink);
        assert_eq!(sink, vec![Intent::DaySelected("2024-03-13".into())]);
    }

    #[test]
    fn test_month_view_routes_blanks_to_month() {
        let month = MonthGrid::new(2024, 1).unwrap();
        let layout = month_layout(&month, 20.0, 16.0);
        let mut controller =
            ViewController::new(MonthView::new(month, density(2024, &["2024-02-01"]), layout));

        let (x, y) = layout.cell_center(3, 0);
        let mut sink: Vec<Intent> = Vec::new();
        controller.click_into(x, y, &mut sink);
        assert_eq!(sink, vec![Intent::DaySelected("2024-02-01".into())]);

        let (x, y) = layout.cell_center(0, 0);
        assert_eq!(controller.click(x, y), Some(Intent::MonthSelected(1)));
        assert_eq!(controller.click(-5.0, 4.0), None);
    }

    #[test]
    fn test_intent_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Intent::MonthSelected(4)).unwrap();
        assert_eq!(json, r#"{"kind":"month_selected","value":4}"#);
    }
}
