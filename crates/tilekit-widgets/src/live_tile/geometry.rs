#![forbid(unsafe_code)]

//! Geometry reactor: derives slot, container, and clip sizes from the
//! available size and direction.
//!
//! The container stacks the two slots along the travel axis, so it is
//! twice the slot extent on that axis. The clip is the visible region at
//! the origin, one slot in size. Travel distance equals the slot extent on
//! the travel axis.

use std::fmt;

use tilekit_core::{Direction, Rect, Size};
use tilekit_runtime::Observable;
use tracing::debug;

/// Layout of a tile for one size/direction pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Size of each slot.
    pub slot: Size,
    /// Size of the two-slot strip.
    pub container: Size,
    /// Distance a slide moves along the travel axis.
    pub travel_distance: f64,
    /// Visible region.
    pub clip: Rect,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::UNSIZED
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slot={} container={} travel={} clip={}",
            self.slot, self.container, self.travel_distance, self.clip
        )
    }
}

impl Geometry {
    /// Geometry before the host has reported any size.
    pub const UNSIZED: Self = Self {
        slot: Size::ZERO,
        container: Size::ZERO,
        travel_distance: 0.0,
        clip: Rect::from_size(Size::ZERO),
    };

    /// Compute the layout for `available` laid out along `direction`.
    ///
    /// Negative or NaN extents are treated as zero.
    #[must_use]
    pub fn compute(available: Size, direction: Direction) -> Self {
        let slot = Size::new(available.width.max(0.0), available.height.max(0.0));
        let axis = direction.axis();
        Self {
            slot,
            container: slot.scaled_along(axis, 2.0),
            travel_distance: slot.extent(axis),
            clip: Rect::from_size(slot),
        }
    }

    /// Whether a slide would actually move anything.
    #[must_use]
    pub fn is_sized(&self) -> bool {
        self.travel_distance > 0.0
    }
}

/// Republishes [`Geometry`] whenever size or direction changes.
#[derive(Debug)]
pub struct GeometryReactor {
    output: Observable<Geometry>,
}

impl Default for GeometryReactor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryReactor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: Observable::new(Geometry::UNSIZED),
        }
    }

    /// Latest published geometry.
    #[must_use]
    pub fn current(&self) -> Geometry {
        self.output.get()
    }

    #[must_use]
    pub fn observe(&self) -> &Observable<Geometry> {
        &self.output
    }

    /// Recompute and publish. Identical results do not notify.
    pub fn recompute(&self, available: Size, direction: Direction) -> Geometry {
        let geometry = Geometry::compute(available, direction);
        debug!(
            size = %available,
            direction = direction.as_str(),
            travel = geometry.travel_distance,
            "geometry recomputed"
        );
        self.output.set(geometry);
        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn up_doubles_height() {
        let g = Geometry::compute(Size::new(200.0, 50.0), Direction::Up);
        assert_eq!(g.slot, Size::new(200.0, 50.0));
        assert_eq!(g.container, Size::new(200.0, 100.0));
        assert_eq!(g.travel_distance, 50.0);
        assert_eq!(g.clip, Rect::new(0.0, 0.0, 200.0, 50.0));
    }

    #[test]
    fn left_doubles_width() {
        let g = Geometry::compute(Size::new(120.0, 80.0), Direction::Left);
        assert_eq!(g.container, Size::new(240.0, 80.0));
        assert_eq!(g.travel_distance, 120.0);
        assert_eq!(g.clip, Rect::new(0.0, 0.0, 120.0, 80.0));
    }

    #[test]
    fn zero_size_is_unsized() {
        let g = Geometry::compute(Size::ZERO, Direction::Up);
        assert_eq!(g, Geometry::UNSIZED);
        assert!(!g.is_sized());
    }

    #[test]
    fn negative_extents_clamp_to_zero() {
        let g = Geometry::compute(Size::new(-5.0, f64::NAN), Direction::Left);
        assert_eq!(g.slot, Size::ZERO);
        assert!(!g.is_sized());
    }

    #[test]
    fn reactor_publishes_changes_only() {
        let reactor = GeometryReactor::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = reactor.observe().subscribe(move |_| h.set(h.get() + 1));

        reactor.recompute(Size::new(100.0, 100.0), Direction::Up);
        reactor.recompute(Size::new(100.0, 100.0), Direction::Up);
        assert_eq!(hits.get(), 1);

        reactor.recompute(Size::new(200.0, 50.0), Direction::Up);
        assert_eq!(hits.get(), 2);
        assert_eq!(reactor.current().container, Size::new(200.0, 100.0));
    }

    #[test]
    fn display_lists_fields() {
        let g = Geometry::compute(Size::new(10.0, 20.0), Direction::Up);
        let text = g.to_string();
        assert!(text.contains("travel=20"), "{text}");
    }

    proptest! {
        #[test]
        fn container_is_two_slots_along_axis(
            w in 0.0f64..4000.0,
            h in 0.0f64..4000.0,
            left in any::<bool>(),
        ) {
            let direction = if left { Direction::Left } else { Direction::Up };
            let g = Geometry::compute(Size::new(w, h), direction);
            let axis = direction.axis();
            prop_assert_eq!(g.container.extent(axis), 2.0 * g.slot.extent(axis));
            let cross = axis.orthogonal();
            prop_assert_eq!(g.container.extent(cross), g.slot.extent(cross));
            prop_assert_eq!(g.travel_distance, g.slot.extent(axis));
            prop_assert_eq!(g.clip.size(), g.slot);
        }
    }
}
