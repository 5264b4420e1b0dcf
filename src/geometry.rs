//! Structures used to map areas on the screen

use serde::{Deserialize, Serialize};
use std::{
    cmp,
    fmt,
    ops::{Add, Sub},
};
use x11rb::protocol::xproto::ConfigureWindowAux;

// ============================== Padding =============================
// ====================================================================

/// Space taken off each edge of a [`Rectangle`]. Used both for the strips
/// the window manager reserves on a monitor and for the decorations a frame
/// draws around a client window
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Padding {
    /// Padding on the top
    pub(crate) top:    u32,
    /// Padding on the right
    pub(crate) right:  u32,
    /// Padding on the bottom
    pub(crate) bottom: u32,
    /// Padding on the left
    pub(crate) left:   u32,
}

impl Padding {
    /// Create a new [`Padding`]
    pub(crate) const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self { top, right, bottom, left }
    }
}

/// Type alias for [`Padding`]
pub(crate) type Extents = Padding;

impl Extents {
    /// No [`Extents`]
    pub(crate) const EMPTY: Self = Self {
        left:   0,
        right:  0,
        top:    0,
        bottom: 0,
    };

    /// Extents of a frame around a client, given both of their rectangles
    pub(crate) fn between(frame: Rectangle, client: Rectangle) -> Self {
        let gap = |outer: i32, inner: i32| (inner - outer).max(0) as u32;

        Self {
            top:    gap(frame.point.y, client.point.y),
            left:   gap(frame.point.x, client.point.x),
            bottom: gap(client.bottom_right().y, frame.bottom_right().y),
            right:  gap(client.bottom_right().x, frame.bottom_right().x),
        }
    }
}

// =============================== Point ==============================
// ====================================================================

/// A position in root window coordinates. When this is used with a
/// [`Rectangle`], it represents the top-left corner
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub(crate) struct Point {
    /// X-coordinate
    pub(crate) x: i32,
    /// Y-coordinate
    pub(crate) y: i32,
}

impl Point {
    /// Create a new [`Point`]
    pub(crate) const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check if [`Point`] is contained within the given [`Rectangle`]
    pub(crate) const fn is_inside(self, rect: Rectangle) -> bool {
        rect.is_inside(self)
    }

    /// Return the [`Point`] relative to the given [`Point`]
    pub(crate) const fn relative(self, p: Self) -> Self {
        Self {
            x: self.x - p.x,
            y: self.y - p.y,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x: {}, y: {}", self.x, self.y)
    }
}

impl Add<Self> for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::Output {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

// ============================= Dimension ===========================
// ====================================================================

/// An a `width` and a `height`. An `area` of a [`Rectangle`]`
#[derive(
    Debug, Default, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub(crate) struct Dimension {
    /// The width of the [`Rectangle`]
    pub(crate) width:  u32,
    /// The height of the [`Rectangle`]
    pub(crate) height: u32,
}

impl Dimension {
    /// Create a new [`Dimension`]
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if [`Dimension`] covers no area
    pub(crate) const fn is_zero(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Return the center of the `width` and `height`
    pub(crate) const fn center(self) -> Point {
        Point {
            x: (self.width / 2) as i32,
            y: (self.height / 2) as i32,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ============================= Rectangle ============================
// ====================================================================

/// Equivalent to `xcb_rectangle_t`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub(crate) struct Rectangle {
    /// Represents the top-left corner of the rectangle
    pub(crate) point:     Point,
    /// The width and height of the rectangle
    pub(crate) dimension: Dimension,
}

impl Rectangle {
    /// Create a new [`Rectangle`]
    pub(crate) const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            point:     Point::new(x, y),
            dimension: Dimension::new(width, height),
        }
    }

    /// Check if the [`Rectangle`]'s area/dimensions = 0
    pub(crate) const fn is_zero(&self) -> bool {
        self.dimension.is_zero()
    }

    /// Return the bottom right [`Point`] (exclusive)
    pub(crate) const fn bottom_right(&self) -> Point {
        Point {
            x: self.point.x + self.dimension.width as i32,
            y: self.point.y + self.dimension.height as i32,
        }
    }

    /// Return the [`Point`] at the center of the [`Rectangle`]
    pub(crate) const fn center(&self) -> Point {
        let center = self.dimension.center();

        Point {
            x: self.point.x + center.x,
            y: self.point.y + center.y,
        }
    }

    /// Test whether the given [`Point`] is contained within the [`Rectangle`]
    pub(crate) const fn is_inside(&self, point: Point) -> bool {
        point.x >= self.point.x
            && point.x < self.point.x + self.dimension.width as i32
            && point.y >= self.point.y
            && point.y < self.point.y + self.dimension.height as i32
    }

    /// Area shared by both [`Rectangle`]s
    pub(crate) fn overlap(&self, rect: Self) -> u64 {
        let (a, b) = (self.bottom_right(), rect.bottom_right());
        let width = cmp::min(a.x, b.x) - cmp::max(self.point.x, rect.point.x);
        let height = cmp::min(a.y, b.y) - cmp::max(self.point.y, rect.point.y);

        if width <= 0 || height <= 0 {
            0
        } else {
            width as u64 * height as u64
        }
    }

    /// How far apart two [`Rectangle`]s are: the sum of the absolute
    /// differences of their positions and sizes
    pub(crate) fn distance(&self, rect: Self) -> u64 {
        let diff = |a: i64, b: i64| (a - b).unsigned_abs();

        diff(self.point.x.into(), rect.point.x.into())
            + diff(self.point.y.into(), rect.point.y.into())
            + diff(self.dimension.width.into(), rect.dimension.width.into())
            + diff(self.dimension.height.into(), rect.dimension.height.into())
    }

    /// Move the [`Point`] onto the nearest pixel inside of the [`Rectangle`]
    pub(crate) fn clamp_point(&self, point: Point) -> Point {
        let last = |start: i32, len: u32| start + len.saturating_sub(1) as i32;

        Point {
            x: point.x.clamp(self.point.x, last(self.point.x, self.dimension.width)),
            y: point.y.clamp(self.point.y, last(self.point.y, self.dimension.height)),
        }
    }

    /// Split the [`Rectangle`] vertically into a left and right half. The
    /// right half takes the odd pixel
    pub(crate) const fn halves(&self) -> (Self, Self) {
        let left = self.dimension.width / 2;

        (
            Self {
                point:     self.point,
                dimension: Dimension::new(left, self.dimension.height),
            },
            Self {
                point:     Point::new(self.point.x + left as i32, self.point.y),
                dimension: Dimension::new(self.dimension.width - left, self.dimension.height),
            },
        )
    }

    /// Create a [`ConfigureWindowAux`] from a [`Rectangle`]
    pub(crate) fn to_aux(self) -> ConfigureWindowAux {
        ConfigureWindowAux::new()
            .x(self.point.x)
            .y(self.point.y)
            .width(self.dimension.width)
            .height(self.dimension.height)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}+{}+{}",
            self.dimension, self.point.x, self.point.y
        )
    }
}

impl Sub<Padding> for Rectangle {
    type Output = Self;

    fn sub(self, padding: Padding) -> Self::Output {
        Self::Output {
            point:     Point {
                x: self.point.x + padding.left as i32,
                y: self.point.y + padding.top as i32,
            },
            dimension: Dimension {
                width:  self
                    .dimension
                    .width
                    .saturating_sub(padding.left + padding.right),
                height: self
                    .dimension
                    .height
                    .saturating_sub(padding.top + padding.bottom),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_tile_the_rectangle() {
        let rect = Rectangle::new(1920, 0, 1279, 1024);
        let (left, right) = rect.halves();

        assert_eq!(left, Rectangle::new(1920, 0, 639, 1024));
        assert_eq!(right, Rectangle::new(2559, 0, 640, 1024));
        assert_eq!(left.bottom_right().x, right.point.x);
        assert_eq!(right.bottom_right(), rect.bottom_right());
    }

    #[test]
    fn padding_shrinks_from_each_edge() {
        let rect = Rectangle::new(0, 0, 1920, 1080) - Padding::new(0, 66, 66, 0);
        assert_eq!(rect, Rectangle::new(0, 0, 1854, 1014));

        let tiny = Rectangle::new(10, 10, 20, 20) - Padding::new(15, 15, 15, 15);
        assert_eq!(tiny, Rectangle::new(25, 25, 0, 0));
        assert!(tiny.is_zero());
    }

    #[test]
    fn frame_extents_from_both_rectangles() {
        let frame = Rectangle::new(100, 100, 802, 630);
        let client = Rectangle::new(101, 122, 800, 600);

        assert_eq!(Extents::between(frame, client), Padding::new(22, 1, 8, 1));
        assert_eq!(Extents::between(frame, frame), Extents::EMPTY);
    }

    #[test]
    fn overlap_and_distance() {
        let a = Rectangle::new(0, 0, 100, 100);
        let b = Rectangle::new(50, 50, 100, 100);
        let c = Rectangle::new(100, 0, 10, 10);

        assert_eq!(a.overlap(b), 2500);
        assert_eq!(a.overlap(c), 0);
        assert_eq!(a.distance(a), 0);
        assert_eq!(a.distance(b), 100);
        assert_eq!(b.distance(Rectangle::new(40, 60, 90, 110)), 40);
    }

    #[test]
    fn clamp_keeps_points_inside() {
        let rect = Rectangle::new(10, 20, 100, 50);

        assert_eq!(rect.clamp_point(Point::new(0, 0)), Point::new(10, 20));
        assert_eq!(rect.clamp_point(Point::new(500, 500)), Point::new(109, 69));
        assert_eq!(rect.clamp_point(Point::new(42, 42)), Point::new(42, 42));
        assert!(rect.clamp_point(Point::new(500, 500)).is_inside(rect));
    }

    #[test]
    fn center_uses_integer_halves() {
        assert_eq!(Rectangle::new(1280, 0, 1920, 1080).center(), Point::new(2240, 540));
        assert_eq!(Rectangle::new(0, 0, 1025, 767).center(), Point::new(512, 383));
    }
}
