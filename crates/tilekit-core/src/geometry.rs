#![forbid(unsafe_code)]

//! Pixel geometry in device-independent units.
//!
//! Hosts report sizes as floating point extents. A zero extent on either
//! axis means "not laid out yet"; consumers treat it as a valid, degenerate
//! size rather than an error.

use std::fmt;

/// Layout axis a slide travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Top to bottom.
    Vertical,
    /// Left to right.
    Horizontal,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn orthogonal(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either extent is zero (or negative, or NaN).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Extent along `axis`.
    #[inline]
    #[must_use]
    pub const fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }

    /// Copy of this size with the extent along `axis` multiplied by `factor`.
    #[must_use]
    pub fn scaled_along(self, axis: Axis, factor: f64) -> Self {
        match axis {
            Axis::Vertical => Self::new(self.width, self.height * factor),
            Axis::Horizontal => Self::new(self.width * factor, self.height),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` anchored at the origin.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Size of the rectangle.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_empty() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(10.0, 0.0).is_empty());
        assert!(Size::new(f64::NAN, 5.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn size_extent_per_axis() {
        let size = Size::new(200.0, 50.0);
        assert_eq!(size.extent(Axis::Horizontal), 200.0);
        assert_eq!(size.extent(Axis::Vertical), 50.0);
    }

    #[test]
    fn scaled_along_only_touches_one_axis() {
        let size = Size::new(200.0, 50.0);
        assert_eq!(size.scaled_along(Axis::Vertical, 2.0), Size::new(200.0, 100.0));
        assert_eq!(
            size.scaled_along(Axis::Horizontal, 2.0),
            Size::new(400.0, 50.0)
        );
    }

    #[test]
    fn rect_from_size_is_at_origin() {
        let rect = Rect::from_size(Size::new(200.0, 50.0));
        assert_eq!(rect, Rect::new(0.0, 0.0, 200.0, 50.0));
        assert_eq!(rect.right(), 200.0);
        assert_eq!(rect.bottom(), 50.0);
        assert_eq!(rect.size(), Size::new(200.0, 50.0));
    }

    #[test]
    fn axis_orthogonal_round_trips() {
        assert_eq!(Axis::Vertical.orthogonal(), Axis::Horizontal);
        assert_eq!(Axis::Horizontal.orthogonal().orthogonal(), Axis::Horizontal);
    }

    #[test]
    fn display_formats() {
        assert_eq!(Size::new(3.0, 4.5).to_string(), "3x4.5");
        assert_eq!(Rect::new(0.0, 0.0, 2.0, 1.0).to_string(), "(0,0,2,1)");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn axis() -> impl Strategy<Value = Axis> {
            prop_oneof![Just(Axis::Vertical), Just(Axis::Horizontal)]
        }

        proptest! {
            #[test]
            fn scaling_touches_only_the_chosen_axis(
                width in 0.0f64..10_000.0,
                height in 0.0f64..10_000.0,
                factor in 0.0f64..8.0,
                axis in axis(),
            ) {
                let size = Size::new(width, height);
                let scaled = size.scaled_along(axis, factor);
                prop_assert_eq!(scaled.extent(axis), size.extent(axis) * factor);
                prop_assert_eq!(
                    scaled.extent(axis.orthogonal()),
                    size.extent(axis.orthogonal())
                );
            }

            #[test]
            fn rect_from_size_round_trips(width in 0.0f64..10_000.0, height in 0.0f64..10_000.0) {
                let size = Size::new(width, height);
                let rect = Rect::from_size(size);
                prop_assert_eq!(rect.size(), size);
                prop_assert_eq!(rect.right(), width);
                prop_assert_eq!(rect.bottom(), height);
            }
        }
    }
}
