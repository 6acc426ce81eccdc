//! Horizontally paging scroll surfaces.
//!
//! ## Usage
//!
//! Components that page their content implement their logic against
//! [`PagingSurface`] and react to the [`ScrollSignal`]s the host delivers when a
//! drag or an animation finishes. [`HeadlessSurface`] is an in-memory surface
//! for tools and tests: animations stay pending until
//! [`HeadlessSurface::finish_animation`] is called.

use tracing::trace;

use crate::geometry::{Point, Size};

/// Gesture and animation notifications delivered by a paging surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSignal {
    /// The user put a finger down and started dragging.
    DidBeginDrag,
    /// The user lifted the finger.
    DidEndDrag {
        /// Whether the surface keeps moving with residual velocity.
        will_decelerate: bool,
    },
    /// Post-drag deceleration came to rest.
    DidEndDecelerating,
    /// An animated `set_content_offset` call completed.
    DidEndProgrammaticScroll,
}

/// Capabilities of a horizontally paging scroll container.
///
/// Offsets are measured from the left edge of the content; a page is exactly
/// one viewport wide.
pub trait PagingSurface {
    /// Size of the visible viewport.
    fn viewport_size(&self) -> Size;

    /// Current scroll offset of the content.
    fn content_offset(&self) -> Point;

    /// Moves the content. Animated moves complete later with
    /// [`ScrollSignal::DidEndProgrammaticScroll`].
    fn set_content_offset(&mut self, offset: Point, animated: bool);

    /// Updates the scrollable content extent.
    fn set_content_size(&mut self, size: Size);

    /// Enables or disables user gestures on the surface.
    fn set_user_interaction_enabled(&mut self, enabled: bool);

    /// Asks the host to run a layout pass for the visible content.
    fn request_layout(&mut self);
}

/// In-memory [`PagingSurface`] that records every request.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    viewport: Size,
    offset: Point,
    content_size: Size,
    pending_animation: Option<Point>,
    interaction_enabled: bool,
    dragging: bool,
    layout_requests: usize,
}

impl HeadlessSurface {
    /// Creates a surface with the given viewport and zero offset.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            offset: Point::ZERO,
            content_size: Size::ZERO,
            pending_animation: None,
            interaction_enabled: true,
            dragging: false,
            layout_requests: 0,
        }
    }

    /// Resizes the viewport, as a rotation or split-screen change would.
    pub fn set_viewport_size(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Returns the content extent last set by the component.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Whether user gestures are currently accepted.
    pub fn is_user_interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    /// Number of layout passes requested so far.
    pub fn layout_requests(&self) -> usize {
        self.layout_requests
    }

    /// Target of the animation in flight, if any.
    pub fn pending_animation(&self) -> Option<Point> {
        self.pending_animation
    }

    /// Index of the page the viewport currently shows, rounded to the nearest
    /// page.
    pub fn current_page(&self) -> i32 {
        if self.viewport.width <= f32::EPSILON {
            return 0;
        }
        (self.offset.x / self.viewport.width).round() as i32
    }

    /// Completes the animation in flight and returns the signal the host would
    /// deliver, or `None` when nothing was animating.
    pub fn finish_animation(&mut self) -> Option<ScrollSignal> {
        let target = self.pending_animation.take()?;
        trace!(x = target.x, "headless surface animation finished");
        self.offset = target;
        Some(ScrollSignal::DidEndProgrammaticScroll)
    }

    /// Starts a user drag. Returns `None` when interaction is disabled.
    pub fn begin_drag(&mut self) -> Option<ScrollSignal> {
        if !self.interaction_enabled {
            return None;
        }
        self.dragging = true;
        Some(ScrollSignal::DidBeginDrag)
    }

    /// Moves the content horizontally while dragging.
    pub fn drag_to(&mut self, x: f32) {
        if self.dragging {
            self.offset.x = x;
        }
    }

    /// Lifts the finger.
    pub fn end_drag(&mut self, will_decelerate: bool) -> ScrollSignal {
        self.dragging = false;
        ScrollSignal::DidEndDrag { will_decelerate }
    }

    /// Finishes deceleration by snapping to the given page.
    pub fn finish_deceleration(&mut self, page: i32) -> ScrollSignal {
        self.offset.x = self.viewport.width * page as f32;
        ScrollSignal::DidEndDecelerating
    }
}

impl PagingSurface for HeadlessSurface {
    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn content_offset(&self) -> Point {
        self.offset
    }

    fn set_content_offset(&mut self, offset: Point, animated: bool) {
        if animated {
            self.pending_animation = Some(offset);
        } else {
            self.pending_animation = None;
            self.offset = offset;
        }
    }

    fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    fn set_user_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
    }

    fn request_layout(&mut self) {
        self.layout_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animated_offsets_stay_pending_until_finished() {
        let mut surface = HeadlessSurface::new(Size::new(300.0, 200.0));
        surface.set_content_offset(Point::new(600.0, 0.0), true);
        assert_eq!(surface.content_offset(), Point::ZERO);
        assert_eq!(surface.pending_animation(), Some(Point::new(600.0, 0.0)));

        assert_eq!(
            surface.finish_animation(),
            Some(ScrollSignal::DidEndProgrammaticScroll)
        );
        assert_eq!(surface.current_page(), 2);
        assert_eq!(surface.finish_animation(), None);
    }

    #[test]
    fn immediate_offset_cancels_pending_animation() {
        let mut surface = HeadlessSurface::new(Size::new(300.0, 200.0));
        surface.set_content_offset(Point::new(600.0, 0.0), true);
        surface.set_content_offset(Point::new(300.0, 0.0), false);
        assert_eq!(surface.pending_animation(), None);
        assert_eq!(surface.current_page(), 1);
    }

    #[test]
    fn drags_are_rejected_while_interaction_is_disabled() {
        let mut surface = HeadlessSurface::new(Size::new(300.0, 200.0));
        surface.set_user_interaction_enabled(false);
        assert_eq!(surface.begin_drag(), None);

        surface.set_user_interaction_enabled(true);
        assert_eq!(surface.begin_drag(), Some(ScrollSignal::DidBeginDrag));
        surface.drag_to(120.0);
        assert_eq!(surface.content_offset().x, 120.0);
        assert_eq!(
            surface.end_drag(true),
            ScrollSignal::DidEndDrag {
                will_decelerate: true
            }
        );
        surface.drag_to(10.0);
        assert_eq!(surface.content_offset().x, 120.0);
        assert_eq!(
            surface.finish_deceleration(0),
            ScrollSignal::DidEndDecelerating
        );
        assert_eq!(surface.content_offset().x, 0.0);
    }

    #[test]
    fn layout_requests_are_counted() {
        let mut surface = HeadlessSurface::new(Size::new(300.0, 200.0));
        surface.request_layout();
        surface.request_layout();
        assert_eq!(surface.layout_requests(), 2);
    }
}
