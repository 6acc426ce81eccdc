//! Logical-point geometry shared by layout code.
//!
//! # Coordinate System
//!
//! - Origin (0, 0) at the top-left corner
//! - X-axis increases to the right
//! - Y-axis increases downward
//! - Values are `f32` logical points; fractional values are expected because
//!   grid cells divide the available width evenly
//!
//! # Example
//!
//! ```
//! use meridian_ui::geometry::{EdgeInsets, Point, Rect, Size};
//!
//! let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
//! assert!(rect.contains(Point::new(15.0, 25.0)));
//!
//! let shifted = rect.translate(320.0, 0.0);
//! assert_eq!(shifted.min_x(), 330.0);
//!
//! let insets = EdgeInsets::uniform(8.0);
//! assert_eq!(insets.horizontal(), 16.0);
//! assert_eq!(Size::new(3.0, 4.0).area(), 12.0);
//! ```

use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A 2D position in logical points.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by the given deltas.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// A 2D size in logical points.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// A zero-sized extent.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Creates a size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns `width * height`.
    pub fn area(self) -> f32 {
        self.width * self.height
    }
}

/// An axis-aligned rectangle in logical points.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent from the origin.
    pub size: Size,
}

impl Rect {
    /// An empty rectangle at the origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Creates a rectangle from its origin and extent.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Creates a rectangle from an origin point and a size.
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Left edge.
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    /// Right edge.
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Top edge.
    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Returns the width.
    pub fn width(&self) -> f32 {
        self.size.width
    }

    /// Returns the height.
    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Returns a copy moved by the given deltas.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            origin: self.origin.offset(dx, dy),
            size: self.size,
        }
    }

    /// Half-open containment test: the left and top edges are inside, the
    /// right and bottom edges are not.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }
}

/// Insets applied to each edge of a rectangle.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeInsets {
    /// Inset from the top edge.
    pub top: f32,
    /// Inset from the left edge.
    pub left: f32,
    /// Inset from the bottom edge.
    pub bottom: f32,
    /// Inset from the right edge.
    pub right: f32,
}

impl EdgeInsets {
    /// No insets.
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    /// Creates insets in top, left, bottom, right order.
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Same inset on every edge.
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sum of the left and right insets.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Returns true when every edge is finite and non-negative.
    pub fn is_non_negative(&self) -> bool {
        [self.top, self.left, self.bottom, self.right]
            .iter()
            .all(|edge| edge.is_finite() && *edge >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(2.5, -5.0);
        assert_eq!(a + b, Point::new(12.5, 15.0));
        assert_eq!(a - b, Point::new(7.5, 25.0));

        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a);
        assert_eq!(a.offset(1.0, 1.0), Point::new(11.0, 21.0));
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(4.0, 8.0, 40.0, 20.0);
        assert_eq!(rect.min_x(), 4.0);
        assert_eq!(rect.max_x(), 44.0);
        assert_eq!(rect.min_y(), 8.0);
        assert_eq!(rect.max_y(), 28.0);
        assert_eq!(rect.width(), 40.0);
        assert_eq!(rect.height(), 20.0);
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(9.99, 9.99)));
        assert!(!rect.contains(Point::new(10.0, 5.0)));
        assert!(!rect.contains(Point::new(5.0, 10.0)));
        assert!(!rect.contains(Point::new(-0.01, 5.0)));
    }

    #[test]
    fn test_rect_translate_keeps_size() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let moved = rect.translate(-1.0, 10.0);
        assert_eq!(moved, Rect::new(0.0, 12.0, 3.0, 4.0));
    }

    #[test]
    fn test_edge_insets() {
        let insets = EdgeInsets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.horizontal(), 6.0);
        assert_eq!(insets.vertical(), 4.0);
        assert!(insets.is_non_negative());
        assert!(!EdgeInsets::new(0.0, -1.0, 0.0, 0.0).is_non_negative());
        assert!(!EdgeInsets::uniform(f32::NAN).is_non_negative());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_rect_serializes_origin_and_size() {
        let json = serde_json::to_value(Rect::new(1.0, 2.0, 3.0, 4.0)).expect("serialize rect");
        assert_eq!(json["origin"]["x"], 1.0);
        assert_eq!(json["size"]["height"], 4.0);
    }
}
