//! Components built on the meridian UI primitives.
//!
//! # Usage
//!
//! Components are plain Rust state machines that drive a host surface through
//! the traits in [`meridian_ui`]. They compute which content is shown and
//! where; drawing it is left to the host.
//!
//! # Example
//!
//! ```
//! use meridian_components::calendar_picker::{CalendarPickerStyle, CalendarHeightMode};
//!
//! let style = CalendarPickerStyle::default()
//!     .calendar_height_mode(CalendarHeightMode::Dynamic)
//!     .month_header_height(32.0);
//! assert!(style.validate().is_ok());
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod calendar_picker;
