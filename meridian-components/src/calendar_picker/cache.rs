//! Bounded cache of month geometries keyed by month offset.
use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use tracing::{debug, trace};

use super::{
    calendar::{Calendar, YearMonth},
    geometry::MonthGeometry,
    style::CalendarPickerStyle,
};

/// Maximum number of month geometries kept alive at once.
pub const GEOMETRY_CACHE_CAPACITY: usize = 5;

/// Month geometries for offsets relative to a base month.
///
/// Entries are only valid for one `(layout_width, style)` pair; changing
/// either through [`configure`](Self::configure) drops every entry before the
/// next read. Not thread-safe: the picker drives it from the UI thread.
#[derive(Debug)]
pub struct MonthGeometryCache {
    entries: LruCache<i32, MonthGeometry>,
    base_month: YearMonth,
    calendar: Arc<dyn Calendar>,
    layout_width: f32,
    style: CalendarPickerStyle,
    computations: usize,
}

impl MonthGeometryCache {
    /// Creates an empty cache. Offset 0 is `base_month`.
    pub fn new(
        base_month: YearMonth,
        calendar: Arc<dyn Calendar>,
        layout_width: f32,
        style: CalendarPickerStyle,
    ) -> Self {
        Self {
            entries: LruCache::new(
                NonZeroUsize::new(GEOMETRY_CACHE_CAPACITY)
                    .expect("geometry cache capacity must be > 0"),
            ),
            base_month,
            calendar,
            layout_width,
            style,
            computations: 0,
        }
    }

    /// Returns the geometry of the month `offset` months after the base
    /// month, computing it on a miss. May evict the least recently used entry.
    pub fn get(&mut self, offset: i32) -> &MonthGeometry {
        let Self {
            entries,
            base_month,
            calendar,
            layout_width,
            style,
            computations,
        } = self;
        entries.get_or_insert(offset, || {
            *computations += 1;
            trace!(offset, "computing month geometry");
            MonthGeometry::for_month(
                base_month.add_months(offset),
                calendar,
                *layout_width,
                style,
            )
        })
    }

    /// Drops every entry.
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            debug!(entries = self.entries.len(), "month geometry cache invalidated");
        }
        self.entries.clear();
    }

    /// Updates the layout inputs, invalidating when either differs from the
    /// current one. Returns whether the cache was invalidated.
    pub fn configure(&mut self, layout_width: f32, style: CalendarPickerStyle) -> bool {
        if layout_width == self.layout_width && style == self.style {
            return false;
        }
        self.layout_width = layout_width;
        self.style = style;
        self.invalidate();
        true
    }

    /// Whether `offset` is currently cached. Does not touch recency.
    pub fn contains(&self, offset: i32) -> bool {
        self.entries.contains(&offset)
    }

    /// Number of cached geometries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of geometries computed since construction.
    pub fn computations(&self) -> usize {
        self.computations
    }

    /// Month at offset 0.
    pub fn base_month(&self) -> YearMonth {
        self.base_month
    }

    /// Calendar used for every computation.
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Width geometries are computed for.
    pub fn layout_width(&self) -> f32 {
        self.layout_width
    }

    /// Style geometries are computed with.
    pub fn style(&self) -> &CalendarPickerStyle {
        &self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar_picker::{calendar::GregorianCalendar, style::CalendarHeightMode};

    fn cache() -> MonthGeometryCache {
        MonthGeometryCache::new(
            YearMonth::new(2024, 3).expect("valid month"),
            Arc::new(GregorianCalendar::default()),
            320.0,
            CalendarPickerStyle::default(),
        )
    }

    #[test]
    fn hits_do_not_recompute() {
        let mut cache = cache();
        assert_eq!(cache.get(0).month(), 3);
        assert_eq!(cache.get(1).month(), 4);
        assert_eq!(cache.get(-3).year(), 2023);
        cache.get(0);
        assert_eq!(cache.computations(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn capacity_is_respected() {
        let mut cache = cache();
        for offset in -4..=4 {
            cache.get(offset);
        }
        assert_eq!(cache.len(), GEOMETRY_CACHE_CAPACITY);
        assert!(cache.contains(4));
        assert!(!cache.contains(-4));
    }

    #[test]
    fn unchanged_configuration_keeps_entries() {
        let mut cache = cache();
        cache.get(0);
        assert!(!cache.configure(320.0, CalendarPickerStyle::default()));
        assert!(cache.contains(0));
    }

    #[test]
    fn width_or_style_changes_leave_no_stale_entries() {
        let mut cache = cache();
        for offset in -1..=1 {
            cache.get(offset);
        }

        assert!(cache.configure(400.0, CalendarPickerStyle::default()));
        assert!(cache.is_empty());
        for offset in -1..=1 {
            assert_eq!(cache.get(offset).layout_width(), 400.0);
        }

        let dynamic =
            CalendarPickerStyle::default().calendar_height_mode(CalendarHeightMode::Dynamic);
        assert!(cache.configure(400.0, dynamic));
        for offset in -1..=1 {
            let geometry = cache.get(offset);
            assert_eq!(geometry.style(), &dynamic);
            assert_eq!(
                geometry.week_count(),
                geometry.calendar().weeks_in_month(geometry.year_month())
            );
        }
    }
}
