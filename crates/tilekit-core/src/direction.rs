#![forbid(unsafe_code)]

//! Slide direction of a rotating tile.

use std::fmt;

use crate::geometry::Axis;

/// Direction the outgoing content leaves in.
///
/// `Up` slides vertically (the next item enters from below), `Left` slides
/// horizontally (the next item enters from the right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Up,
    Left,
}

impl Direction {
    /// Axis the slide travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Up => Axis::Vertical,
            Self::Left => Axis::Horizontal,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Left => "left",
        }
    }

    /// Parse a direction name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" | "vertical" => Some(Self::Up),
            "left" | "horizontal" => Some(Self::Left),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
