//! Horizontally paging month calendar picker.
//!
//! ## Usage
//!
//! Let users browse months and pick one or more days. The picker keeps three
//! months materialized (previous, visible and next) on a three-page scroll
//! surface and recenters after every settle, so paging feels unbounded while
//! memory stays constant.
//!
//! ```
//! use meridian_components::calendar_picker::{
//!     CalendarPickerArgs, CalendarPickerController, YearMonth,
//! };
//! use meridian_ui::{HeadlessSurface, Size};
//!
//! let args = CalendarPickerArgs::default()
//!     .initial_month(YearMonth::new(2024, 3).expect("valid month"))
//!     .additional_month_count(12);
//! let surface = HeadlessSurface::new(Size::new(320.0, 400.0));
//! let mut picker = CalendarPickerController::new(args, surface).expect("valid style");
//!
//! assert!(picker.scroll_to_next(true));
//! while let Some(signal) = picker.surface_mut().finish_animation() {
//!     picker.handle_scroll_signal(signal);
//! }
//! assert_eq!(picker.visible_month().to_string(), "April 2024");
//! ```
pub use cache::{GEOMETRY_CACHE_CAPACITY, MonthGeometryCache};
pub use calendar::{
    Calendar, GregorianCalendar, IntoCalendarDay, YearMonth, YearMonthError, local_today,
};
pub use controller::{
    CalendarPickerArgs, CalendarPickerController, CalendarPickerDelegate, PickerPhase,
};
pub use geometry::MonthGeometry;
pub use layout::{PagedLayout, PagingLayoutEngine, PlacedCell, PlacedMonth, Slot};
pub use selection::{DateSelection, TapAction};
pub use style::{CalendarHeightMode, CalendarPickerStyle, CellHeightMode, StyleError};
pub use view::{
    CalendarContentProvider, CalendarPickerView, DayDescriptor, RenderedCell, RenderedMonth,
};

mod cache;
mod calendar;
mod controller;
mod geometry;
mod layout;
mod selection;
mod style;
mod view;
