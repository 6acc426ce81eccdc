//! Paging layout of the three materialized months.
//!
//! ## Usage
//!
//! The picker's scroll surface is three pages wide. Page 0 shows the month
//! before the visible one, page 1 the visible month and page 2 the month
//! after. [`PagingLayoutEngine::layout`] places every cell, header and grid
//! background of those months in content coordinates, so the host only has to
//! draw what it is given.
use std::sync::Arc;

use chrono::NaiveDate;
use meridian_ui::{Point, Rect, Size};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::{
    cache::MonthGeometryCache,
    calendar::{Calendar, YearMonth},
    geometry::MonthGeometry,
    style::CalendarPickerStyle,
};

/// One of the three materialized months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The month before the visible one, on page 0.
    Previous,
    /// The visible month, on page 1.
    Current,
    /// The month after the visible one, on page 2.
    Next,
}

impl Slot {
    /// Every slot in page order.
    pub const ALL: [Slot; 3] = [Slot::Previous, Slot::Current, Slot::Next];

    /// Month displacement relative to the visible month.
    pub fn delta(self) -> i32 {
        match self {
            Slot::Previous => -1,
            Slot::Current => 0,
            Slot::Next => 1,
        }
    }

    /// Page the slot occupies in the scroll content.
    pub fn page_index(self) -> usize {
        match self {
            Slot::Previous => 0,
            Slot::Current => 1,
            Slot::Next => 2,
        }
    }

    /// Slot at `delta` months from the visible one.
    ///
    /// # Panics
    ///
    /// Panics when `delta` is outside `-1..=1`.
    pub fn from_delta(delta: i32) -> Self {
        match delta {
            -1 => Slot::Previous,
            0 => Slot::Current,
            1 => Slot::Next,
            other => panic!("slot delta {other} is outside -1..=1"),
        }
    }

    /// Slot shown on `page`, if the page exists.
    pub fn from_page_index(page: usize) -> Option<Self> {
        Slot::ALL.get(page).copied()
    }
}

/// A day cell placed in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedCell {
    /// Index of the cell inside its month grid.
    pub index: usize,
    /// Day the cell shows.
    pub date: NaiveDate,
    /// Whether the day belongs to the month of the page.
    pub is_in_month: bool,
    /// Frame in content coordinates.
    pub frame: Rect,
}

/// A month page placed in content coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMonth {
    /// Slot the month occupies.
    pub slot: Slot,
    /// Month offset relative to the picker's initial month.
    pub month_offset: i32,
    /// Month shown on the page.
    pub year_month: YearMonth,
    /// Header frame in content coordinates.
    pub header_frame: Rect,
    /// Grid background frame in content coordinates.
    pub background_frame: Rect,
    /// Every cell of the month grid in index order.
    pub cells: Vec<PlacedCell>,
    /// Height the month needs.
    pub preferred_height: f32,
}

impl PlacedMonth {
    /// Cell containing `point`, in content coordinates.
    pub fn cell_at(&self, point: Point) -> Option<&PlacedCell> {
        self.cells.iter().find(|cell| cell.frame.contains(point))
    }
}

/// Output of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedLayout {
    /// Width of one page, equal to the viewport width.
    pub page_width: f32,
    /// Extent of the scroll content: three pages wide, as tall as the visible
    /// month needs.
    pub content_size: Size,
    /// Placed months in page order.
    pub months: SmallVec<[PlacedMonth; 3]>,
}

impl PagedLayout {
    /// The month placed in `slot`.
    pub fn month(&self, slot: Slot) -> &PlacedMonth {
        &self.months[slot.page_index()]
    }

    /// Content offset that shows `slot`.
    pub fn offset_for(&self, slot: Slot) -> Point {
        Point::new(self.page_width * slot.page_index() as f32, 0.0)
    }

    /// Cell containing `point`, in content coordinates, with its slot.
    pub fn cell_at(&self, point: Point) -> Option<(Slot, &PlacedCell)> {
        if self.page_width <= 0.0 || point.x < 0.0 {
            return None;
        }
        let page = (point.x / self.page_width).floor() as usize;
        let slot = Slot::from_page_index(page)?;
        self.month(slot).cell_at(point).map(|cell| (slot, cell))
    }
}

/// Produces [`PagedLayout`]s from cached month geometry.
#[derive(Debug)]
pub struct PagingLayoutEngine {
    cache: MonthGeometryCache,
    layout: Option<(i32, PagedLayout)>,
    needs_reload: bool,
}

impl PagingLayoutEngine {
    /// Creates an engine whose offset 0 is `base_month`.
    pub fn new(
        base_month: YearMonth,
        calendar: Arc<dyn Calendar>,
        viewport_width: f32,
        style: CalendarPickerStyle,
    ) -> Self {
        Self {
            cache: MonthGeometryCache::new(base_month, calendar, viewport_width, style),
            layout: None,
            needs_reload: false,
        }
    }

    /// Current page width.
    pub fn viewport_width(&self) -> f32 {
        self.cache.layout_width()
    }

    /// Current style.
    pub fn style(&self) -> &CalendarPickerStyle {
        self.cache.style()
    }

    /// Read access to the geometry cache.
    pub fn cache(&self) -> &MonthGeometryCache {
        &self.cache
    }

    /// Updates the page width. Returns whether the layout was invalidated.
    pub fn set_viewport_width(&mut self, width: f32) -> bool {
        let style = *self.cache.style();
        self.reconfigure(width, style, "viewport width changed")
    }

    /// Replaces the style. Returns whether the layout was invalidated.
    pub fn set_style(&mut self, style: CalendarPickerStyle) -> bool {
        let width = self.cache.layout_width();
        self.reconfigure(width, style, "style changed")
    }

    fn reconfigure(&mut self, width: f32, style: CalendarPickerStyle, reason: &str) -> bool {
        let changed = self.cache.configure(width, style);
        if changed {
            debug!(width, reason, "paging layout invalidated");
            self.layout = None;
        }
        changed
    }

    /// Drops every cached geometry and the last layout.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
        self.layout = None;
    }

    /// Defers a reload to the next layout pass that runs outside a drag.
    pub fn mark_needs_reload(&mut self) {
        trace!("reload deferred");
        self.needs_reload = true;
    }

    /// Whether a deferred reload is waiting.
    pub fn has_pending_reload(&self) -> bool {
        self.needs_reload
    }

    /// Clears the deferred reload flag, returning whether it was set.
    pub fn take_pending_reload(&mut self) -> bool {
        std::mem::take(&mut self.needs_reload)
    }

    /// Geometry of the month `offset` months after the base month.
    pub fn geometry(&mut self, offset: i32) -> &MonthGeometry {
        self.cache.get(offset)
    }

    /// Places the three months around `month_offset`.
    ///
    /// Repeated calls with the same offset and configuration return the
    /// previous layout without touching the cache.
    ///
    /// # Panics
    ///
    /// Panics if the page width is not positive.
    pub fn layout(&mut self, month_offset: i32) -> &PagedLayout {
        let page_width = self.cache.layout_width();
        assert!(
            page_width > 0.0,
            "paging layout needs a positive page width, got {page_width}"
        );

        let layout = match self.layout.take() {
            Some((offset, layout)) if offset == month_offset => layout,
            _ => self.build(month_offset, page_width),
        };
        &self.layout.insert((month_offset, layout)).1
    }

    fn build(&mut self, month_offset: i32, page_width: f32) -> PagedLayout {
        trace!(month_offset, page_width, "building paging layout");
        let months: SmallVec<[PlacedMonth; 3]> = Slot::ALL
            .iter()
            .map(|&slot| {
                let offset = month_offset + slot.delta();
                place_month(slot, offset, self.cache.get(offset), page_width)
            })
            .collect();
        let height = months[Slot::Current.page_index()].preferred_height;
        PagedLayout {
            page_width,
            content_size: Size::new(page_width * Slot::ALL.len() as f32, height),
            months,
        }
    }
}

fn place_month(
    slot: Slot,
    month_offset: i32,
    geometry: &MonthGeometry,
    page_width: f32,
) -> PlacedMonth {
    let dx = page_width * slot.page_index() as f32;
    let cells = geometry
        .cell_frames()
        .iter()
        .enumerate()
        .map(|(index, frame)| PlacedCell {
            index,
            date: geometry.date_for_cell(index),
            is_in_month: geometry.is_in_month(index),
            frame: frame.translate(dx, 0.0),
        })
        .collect();

    PlacedMonth {
        slot,
        month_offset,
        year_month: geometry.year_month(),
        header_frame: geometry.header_frame().translate(dx, 0.0),
        background_frame: geometry.background_frame().translate(dx, 0.0),
        cells,
        preferred_height: geometry.preferred_height(),
    }
}
