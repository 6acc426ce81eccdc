//! meridian-ui is the host-toolkit boundary of the meridian design system.
//!
//! # Overview
//!
//! The crate does not render anything. It describes the capabilities that the
//! component library consumes from whatever toolkit hosts it:
//!
//! - [`geometry`] provides logical-point [`Point`], [`Size`], [`Rect`] and
//!   [`EdgeInsets`] values used by every layout computation.
//! - [`surface`] defines the [`PagingSurface`] contract for a horizontally
//!   paging scroll container together with the [`ScrollSignal`] gesture
//!   notifications it delivers, plus a [`HeadlessSurface`] for tools and
//!   tests.
//! - [`logging`] installs a `tracing` subscriber for binaries.
//!
//! # Example
//!
//! ```
//! use meridian_ui::{PagingSurface, Point, Size, surface::HeadlessSurface};
//!
//! let mut surface = HeadlessSurface::new(Size::new(320.0, 400.0));
//! surface.set_content_offset(Point::new(320.0, 0.0), true);
//! assert_eq!(surface.content_offset(), Point::ZERO);
//!
//! let signal = surface.finish_animation();
//! assert!(signal.is_some());
//! assert_eq!(surface.content_offset(), Point::new(320.0, 0.0));
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod geometry;
pub mod logging;
pub mod surface;

pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use surface::{HeadlessSurface, PagingSurface, ScrollSignal};
