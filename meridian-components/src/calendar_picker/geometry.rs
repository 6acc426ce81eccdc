//! Geometry of a single month grid.
//!
//! A [`MonthGeometry`] answers three questions for one month: how many rows
//! the grid has, which day each cell shows, and where every cell, the header
//! and the grid background sit inside the month's page. All frames are local
//! to the page; the paging layout engine translates them into content
//! coordinates.
use std::{cell::OnceCell, sync::Arc};

use chrono::{Days, NaiveDate};
use meridian_ui::{Point, Rect, Size};

use super::{
    calendar::{Calendar, YearMonth},
    style::{CalendarHeightMode, CalendarPickerStyle},
};

/// Computed layout of one month page.
///
/// Immutable after construction. Cell frames are derived on first use and
/// memoized.
#[derive(Debug, Clone)]
pub struct MonthGeometry {
    year_month: YearMonth,
    calendar: Arc<dyn Calendar>,
    layout_width: f32,
    style: CalendarPickerStyle,
    first_day: NaiveDate,
    first_weekday_offset: u32,
    days_in_month: u32,
    days_per_week: u32,
    week_count: u32,
    cell_size: Size,
    cell_frames: OnceCell<Vec<Rect>>,
}

impl MonthGeometry {
    /// Computes the geometry of `month`/`year`.
    ///
    /// Months outside `1..=12` roll into the neighbouring years, so month 13
    /// of 2024 lays out January 2025.
    ///
    /// # Panics
    ///
    /// Panics if the calendar reports zero days per week.
    pub fn compute(
        month: i32,
        year: i32,
        calendar: &Arc<dyn Calendar>,
        layout_width: f32,
        style: &CalendarPickerStyle,
    ) -> Self {
        Self::for_month(
            YearMonth::normalized(year, month),
            calendar,
            layout_width,
            style,
        )
    }

    /// Computes the geometry of an already normalized month.
    ///
    /// # Panics
    ///
    /// Panics if the calendar reports zero days per week.
    pub fn for_month(
        year_month: YearMonth,
        calendar: &Arc<dyn Calendar>,
        layout_width: f32,
        style: &CalendarPickerStyle,
    ) -> Self {
        let days_per_week = calendar.days_per_week();
        assert!(
            days_per_week > 0,
            "calendar must have at least one day per week"
        );

        let first_day = calendar.first_day_of_month(year_month);
        let week_count = match style.calendar_height_mode {
            CalendarHeightMode::Dynamic => calendar.weeks_in_month(year_month),
            CalendarHeightMode::Fixed => calendar.max_weeks_in_month(),
        };
        let cell_width = style.cell_width(layout_width, days_per_week);

        Self {
            year_month,
            calendar: Arc::clone(calendar),
            layout_width,
            style: *style,
            first_day,
            first_weekday_offset: calendar.weekday_column(first_day),
            days_in_month: calendar.days_in_month(year_month),
            days_per_week,
            week_count,
            cell_size: Size::new(cell_width, style.cell_height(cell_width)),
            cell_frames: OnceCell::new(),
        }
    }

    /// Month number, always in `1..=12`.
    pub fn month(&self) -> u32 {
        self.year_month.month()
    }

    /// Year the month belongs to.
    pub fn year(&self) -> i32 {
        self.year_month.year()
    }

    /// Month and year together.
    pub fn year_month(&self) -> YearMonth {
        self.year_month
    }

    /// Calendar the geometry was computed with.
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Width the geometry was computed for.
    pub fn layout_width(&self) -> f32 {
        self.layout_width
    }

    /// Style the geometry was computed with.
    pub fn style(&self) -> &CalendarPickerStyle {
        &self.style
    }

    /// Number of lead-in cells showing days of the previous month.
    pub fn first_weekday_offset(&self) -> u32 {
        self.first_weekday_offset
    }

    /// Number of grid rows.
    pub fn week_count(&self) -> u32 {
        self.week_count
    }

    /// Number of grid columns.
    pub fn days_per_week(&self) -> u32 {
        self.days_per_week
    }

    /// Total number of cells, `week_count * days_per_week`.
    pub fn cell_count(&self) -> usize {
        (self.week_count * self.days_per_week) as usize
    }

    /// Size shared by every cell.
    pub fn cell_size(&self) -> Size {
        self.cell_size
    }

    /// Day shown by the cell at `index`.
    ///
    /// Index 0 is the first cell of the first row, which may belong to the
    /// previous month.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`cell_count`](Self::cell_count).
    pub fn date_for_cell(&self, index: usize) -> NaiveDate {
        self.check_index(index);
        let grid_start = self.first_day - Days::new(u64::from(self.first_weekday_offset));
        grid_start + Days::new(index as u64)
    }

    /// Whether the cell at `index` shows a day of this month rather than a
    /// lead-in or lead-out day.
    pub fn is_in_month(&self, index: usize) -> bool {
        self.check_index(index);
        let start = self.first_weekday_offset as usize;
        (start..start + self.days_in_month as usize).contains(&index)
    }

    /// Frame of the cell at `index`, local to the month page.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`cell_count`](Self::cell_count).
    pub fn frame_for_cell(&self, index: usize) -> Rect {
        self.check_index(index);
        self.cell_frames()[index]
    }

    /// Frames of every cell in index order.
    pub fn cell_frames(&self) -> &[Rect] {
        self.cell_frames.get_or_init(|| {
            (0..self.cell_count())
                .map(|index| self.compute_cell_frame(index))
                .collect()
        })
    }

    /// Frame of the month header. Zero-height when no header is configured.
    pub fn header_frame(&self) -> Rect {
        let insets = self.style.content_insets;
        Rect::new(
            insets.left,
            insets.top,
            self.content_width(),
            self.style.header_height(),
        )
    }

    /// Frame behind the cell grid, spacing included.
    pub fn background_frame(&self) -> Rect {
        let insets = self.style.content_insets;
        Rect::new(
            insets.left,
            insets.top + self.style.header_height(),
            self.content_width(),
            self.grid_height(),
        )
    }

    /// Height the page needs to show the whole month.
    pub fn preferred_height(&self) -> f32 {
        self.style.content_insets.vertical() + self.style.header_height() + self.grid_height()
    }

    /// Index of the cell containing `point`, in page-local coordinates.
    ///
    /// Points in the spacing between cells, the header or the insets hit
    /// nothing.
    pub fn cell_index_at(&self, point: Point) -> Option<usize> {
        let insets = self.style.content_insets;
        let column = grid_track(
            point.x - insets.left - self.style.cell_spacing_x,
            self.cell_size.width,
            self.style.cell_spacing_x,
            self.days_per_week,
        )?;
        let row = grid_track(
            point.y - insets.top - self.style.header_height() - self.style.cell_spacing_y,
            self.cell_size.height,
            self.style.cell_spacing_y,
            self.week_count,
        )?;
        Some((row * self.days_per_week + column) as usize)
    }

    fn content_width(&self) -> f32 {
        (self.layout_width - self.style.content_insets.horizontal()).max(0.0)
    }

    fn grid_height(&self) -> f32 {
        let rows = self.week_count as f32;
        rows * self.cell_size.height + (rows + 1.0) * self.style.cell_spacing_y
    }

    fn compute_cell_frame(&self, index: usize) -> Rect {
        let row = (index / self.days_per_week as usize) as f32;
        let column = (index % self.days_per_week as usize) as f32;
        let insets = self.style.content_insets;
        let Size { width, height } = self.cell_size;

        let x = insets.left
            + self.style.cell_spacing_x
            + column * (width + self.style.cell_spacing_x);
        let y = insets.top
            + self.style.header_height()
            + self.style.cell_spacing_y
            + row * (height + self.style.cell_spacing_y);
        Rect::new(x, y, width, height)
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.cell_count(),
            "cell index {index} out of range for {} cells",
            self.cell_count()
        );
    }
}

/// Maps an offset measured from the first cell edge onto a row or column.
fn grid_track(offset: f32, extent: f32, spacing: f32, count: u32) -> Option<u32> {
    let stride = extent + spacing;
    if offset < 0.0 || stride <= 0.0 {
        return None;
    }
    let track = (offset / stride).floor();
    if track >= count as f32 || offset - track * stride >= extent {
        return None;
    }
    Some(track as u32)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Weekday};
    use meridian_ui::EdgeInsets;
    use rstest::rstest;

    use super::*;
    use crate::calendar_picker::{calendar::GregorianCalendar, style::CellHeightMode};

    /// Gregorian months grouped into five-day weeks.
    #[derive(Debug)]
    struct FiveDayWeekCalendar;

    impl Calendar for FiveDayWeekCalendar {
        fn days_per_week(&self) -> u32 {
            5
        }

        fn first_day_of_month(&self, month: YearMonth) -> NaiveDate {
            GregorianCalendar::default().first_day_of_month(month)
        }

        fn days_in_month(&self, month: YearMonth) -> u32 {
            GregorianCalendar::default().days_in_month(month)
        }

        fn max_days_in_month(&self) -> u32 {
            31
        }

        fn weekday_column(&self, date: NaiveDate) -> u32 {
            date.num_days_from_ce().rem_euclid(5) as u32
        }

        fn year_month_of(&self, date: NaiveDate) -> YearMonth {
            GregorianCalendar::default().year_month_of(date)
        }

        fn day_of_month(&self, date: NaiveDate) -> u32 {
            GregorianCalendar::default().day_of_month(date)
        }

        fn weekday_symbols(&self) -> Vec<String> {
            ["A", "B", "C", "D", "E"].map(String::from).to_vec()
        }
    }

    fn gregorian() -> Arc<dyn Calendar> {
        Arc::new(GregorianCalendar::new(Weekday::Sun))
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn padded_style() -> CalendarPickerStyle {
        CalendarPickerStyle::default()
            .content_insets(EdgeInsets::new(4.0, 5.0, 6.0, 5.0))
            .month_header_height(30.0)
            .cell_spacing_x(2.0)
            .cell_spacing_y(2.0)
            .cell_height_mode(CellHeightMode::Fixed(40.0))
    }

    #[rstest]
    #[case(13, 2024, 1, 2025)]
    #[case(0, 2024, 12, 2023)]
    #[case(-13, 2024, 11, 2022)]
    #[case(7, 2024, 7, 2024)]
    fn compute_normalizes_month_and_year(
        #[case] month: i32,
        #[case] year: i32,
        #[case] expected_month: u32,
        #[case] expected_year: i32,
    ) {
        let geometry = MonthGeometry::compute(
            month,
            year,
            &gregorian(),
            320.0,
            &CalendarPickerStyle::default(),
        );
        assert_eq!(geometry.month(), expected_month);
        assert_eq!(geometry.year(), expected_year);
    }

    #[rstest]
    #[case(2, 2024, 5)]
    #[case(2, 2025, 5)]
    #[case(2, 2026, 4)]
    #[case(3, 2024, 6)]
    fn dynamic_height_counts_spanned_weeks(
        #[case] month: i32,
        #[case] year: i32,
        #[case] weeks: u32,
    ) {
        let style =
            CalendarPickerStyle::default().calendar_height_mode(CalendarHeightMode::Dynamic);
        let geometry = MonthGeometry::compute(month, year, &gregorian(), 320.0, &style);
        assert_eq!(geometry.week_count(), weeks);
        assert_eq!(geometry.cell_count(), weeks as usize * 7);
    }

    #[test]
    fn fixed_height_reserves_maximum_rows() {
        let style = CalendarPickerStyle::default().calendar_height_mode(CalendarHeightMode::Fixed);
        let calendar = gregorian();
        for month in 1..=12 {
            let geometry = MonthGeometry::compute(month, 2026, &calendar, 320.0, &style);
            assert_eq!(geometry.week_count(), 6);
            assert!(geometry.week_count() >= calendar.weeks_in_month(geometry.year_month()));
            assert_eq!(geometry.cell_count(), 42);
        }
    }

    #[test]
    fn dates_walk_back_to_the_first_row() {
        let geometry = MonthGeometry::compute(
            3,
            2024,
            &gregorian(),
            320.0,
            &CalendarPickerStyle::default(),
        );
        // March 1st 2024 is a Friday.
        assert_eq!(geometry.first_weekday_offset(), 5);
        assert_eq!(geometry.date_for_cell(0), date(2024, 2, 25));
        assert_eq!(geometry.date_for_cell(4), date(2024, 2, 29));
        assert_eq!(geometry.date_for_cell(5), date(2024, 3, 1));
        assert_eq!(geometry.date_for_cell(41), date(2024, 4, 6));
        assert!(!geometry.is_in_month(4));
        assert!(geometry.is_in_month(5));
        assert!(geometry.is_in_month(35));
        assert!(!geometry.is_in_month(36));
    }

    #[test]
    fn dates_cross_year_boundaries() {
        let geometry = MonthGeometry::compute(
            1,
            2025,
            &gregorian(),
            320.0,
            &CalendarPickerStyle::default(),
        );
        // January 1st 2025 is a Wednesday.
        assert_eq!(geometry.date_for_cell(0), date(2024, 12, 29));
        assert_eq!(geometry.date_for_cell(3), date(2025, 1, 1));
    }

    #[test]
    fn consecutive_cells_are_consecutive_days() {
        let calendar: Arc<dyn Calendar> = Arc::new(FiveDayWeekCalendar);
        let style =
            CalendarPickerStyle::default().calendar_height_mode(CalendarHeightMode::Dynamic);
        for calendar in [gregorian(), calendar] {
            let geometry = MonthGeometry::compute(12, 2024, &calendar, 320.0, &style);
            for index in 1..geometry.cell_count() {
                assert_eq!(
                    geometry.date_for_cell(index),
                    geometry.date_for_cell(index - 1) + Days::new(1)
                );
            }
        }
    }

    #[test]
    fn non_seven_day_weeks_drive_the_grid() {
        let calendar: Arc<dyn Calendar> = Arc::new(FiveDayWeekCalendar);
        let style =
            CalendarPickerStyle::default().calendar_height_mode(CalendarHeightMode::Dynamic);
        let geometry = MonthGeometry::compute(3, 2024, &calendar, 320.0, &style);
        assert_eq!(geometry.days_per_week(), 5);
        assert_eq!(
            geometry.week_count(),
            (geometry.first_weekday_offset() + 31).div_ceil(5)
        );
        assert_eq!(geometry.cell_count(), geometry.week_count() as usize * 5);

        let first_in_month = geometry.first_weekday_offset() as usize;
        assert_eq!(geometry.date_for_cell(first_in_month), date(2024, 3, 1));
        // 320 - 6 * 2 = 308, over five columns
        assert!((geometry.cell_size().width - 61.6).abs() < 1e-4);
    }

    #[test]
    fn frames_follow_insets_header_and_spacing() {
        let geometry = MonthGeometry::compute(3, 2024, &gregorian(), 320.0, &padded_style());
        assert_eq!(geometry.cell_size(), Size::new(42.0, 40.0));
        assert_eq!(geometry.frame_for_cell(0), Rect::new(7.0, 36.0, 42.0, 40.0));
        assert_eq!(geometry.frame_for_cell(8), Rect::new(51.0, 78.0, 42.0, 40.0));
        assert_eq!(geometry.header_frame(), Rect::new(5.0, 4.0, 310.0, 30.0));
        assert_eq!(
            geometry.background_frame(),
            Rect::new(5.0, 34.0, 310.0, 254.0)
        );
        assert_eq!(geometry.preferred_height(), 294.0);
        assert_eq!(geometry.cell_frames().len(), geometry.cell_count());
    }

    #[test]
    fn aspect_ratio_scales_cell_height() {
        let style = padded_style().cell_height_mode(CellHeightMode::AspectRatio(0.5));
        let geometry = MonthGeometry::compute(3, 2024, &gregorian(), 320.0, &style);
        assert_eq!(geometry.cell_size(), Size::new(42.0, 21.0));
    }

    #[test]
    fn hit_testing_ignores_gaps_and_header() {
        let geometry = MonthGeometry::compute(3, 2024, &gregorian(), 320.0, &padded_style());
        assert_eq!(geometry.cell_index_at(Point::new(52.0, 79.0)), Some(8));
        assert_eq!(geometry.cell_index_at(Point::new(7.0, 36.0)), Some(0));
        assert_eq!(geometry.cell_index_at(Point::new(50.0, 79.0)), None);
        assert_eq!(geometry.cell_index_at(Point::new(52.0, 10.0)), None);
        assert_eq!(geometry.cell_index_at(Point::new(319.0, 79.0)), None);
        assert_eq!(geometry.cell_index_at(Point::new(52.0, 290.0)), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_cells_panic() {
        let geometry = MonthGeometry::compute(
            3,
            2024,
            &gregorian(),
            320.0,
            &CalendarPickerStyle::default(),
        );
        geometry.frame_for_cell(42);
    }
}
