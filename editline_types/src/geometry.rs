//! Colours and on-surface geometry

use core::fmt;
use serde::{Deserialize, Serialize};

/// Foreground colour of an edit line's widgets, as a toolkit palette index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour(pub u8);

impl Colour {
    pub const BLACK: Self = Self(7);
    pub const RED: Self = Self(11);
}

impl Default for Colour {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "colour {}", self.0)
    }
}

/// Bounding box of a widget in surface work-area coordinates
///
/// `y` grows downwards from the top of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Extent {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// Returns true if both extents overlap vertically
    pub fn shares_row_with(&self, other: &Extent) -> bool {
        self.y0 < other.y1 && other.y0 < self.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_size() {
        let extent = Extent::new(10, 100, 210, 148);
        assert_eq!(extent.width(), 200);
        assert_eq!(extent.height(), 48);
    }

    #[test]
    fn test_shares_row() {
        let a = Extent::new(0, 0, 10, 48);
        let b = Extent::new(20, 40, 30, 88);
        let c = Extent::new(20, 56, 30, 104);
        assert!(a.shares_row_with(&b));
        assert!(!a.shares_row_with(&c));
    }
}
