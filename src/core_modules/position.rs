// THEORY:
// `Position` is the coordinate vocabulary of the whole crate: an integer pixel
// address with the origin at the top-left corner of the radar image, x growing to
// the right and y growing downwards.
//
// It is signed on purpose. The spiral enumerator walks square rings around a
// query pixel without caring where the image ends, so positions left of or above
// the image are ordinary values. Only the `PixelSource` decides which of them are
// real pixels.
//
// Three distances live here because each answers a different question:
// - `euclidean_distance`: straight-line distance in pixels.
// - `pixel_distance`: the reported distance, the Euclidean distance floored.
// - `ring_distance`: which spiral ring a position sits on (Chebyshev distance).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance in whole pixels, as reported for each quadrant.
pub type PixelDistance = u32;

/// An integer pixel coordinate. May lie outside any particular image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `(dx, dy)`.
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Simple 2D Euclidean distance.
    pub fn euclidean_distance(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// The Euclidean distance rounded down to a whole pixel.
    pub fn pixel_distance(&self, other: &Position) -> PixelDistance {
        self.euclidean_distance(other).floor() as PixelDistance
    }

    /// The index of the square ring around `other` that this position lies on.
    pub fn ring_distance(&self, other: &Position) -> u64 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i64, i64)> for Position {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(u32, u32)> for Position {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x as i64, y as i64)
    }
}
