// THEORY:
// The `OutwardSpiral` is the search order of the locator. It walks the perimeter
// of square rings around a center pixel, ring 1 first, then ring 2, and so on up
// to a maximum ring. Because every ring is exhausted before the next one starts,
// the first rain pixel the locator meets in a quadrant is also (up to ties within
// a ring) the nearest one, so the locator never needs to compare distances.
//
// Ring order, for ring `r` around `(cx, cy)`:
//
//     y = cy - r :  x = cx - r ..= cx + r        (top row, left to right)
//     y = cy - r + 1 ..= cy + r - 1 :  x = cx - r, then x = cx + r
//     y = cy + r :  x = cx - r ..= cx + r        (bottom row, left to right)
//
// i.e. a raster scan of the ring's perimeter. For ring 1 around the origin:
//
//     1 2 3
//     4 . 5
//     6 7 8
//
// Key principles:
// 1.  **Lazy**: Positions are produced on demand, so a caller that has what it
//     needs simply stops pulling. Nothing about later rings is ever computed.
// 2.  **Unbounded by images**: The spiral knows nothing about image bounds and
//     happily yields negative or too-large coordinates.
// 3.  **Deterministic**: The same center and maximum always give the same
//     sequence, with no position repeated. `Clone` and `restart` replay it.

use crate::core_modules::position::Position;
use std::iter::FusedIterator;

/// Iterator over the perimeters of growing square rings around a center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutwardSpiral {
    center: Position,
    max_distance: u32,
    /// The ring currently being walked. Exceeds `max_distance` once exhausted.
    ring: i64,
    /// Offset of the next position from `center`.
    dx: i64,
    dy: i64,
}

impl OutwardSpiral {
    /// Creates a spiral covering rings `1..=max_distance` around `center`.
    pub fn new(center: Position, max_distance: u32) -> Self {
        Self {
            center,
            max_distance,
            ring: 1,
            dx: -1,
            dy: -1,
        }
    }

    /// Rewinds to the first position of ring 1.
    pub fn restart(&mut self) {
        *self = Self::new(self.center, self.max_distance);
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn max_distance(&self) -> u32 {
        self.max_distance
    }

    /// Number of positions on ring `r`.
    pub fn ring_len(r: u64) -> u128 {
        8 * r as u128
    }

    /// Number of positions on rings `1..=r`. Fits in `u128` for any `u32` ring.
    fn cells_through(r: u64) -> u128 {
        let r = r as u128;
        4 * r * (r + 1)
    }

    /// Positions left to yield. Can exceed `usize::MAX` for very large rings.
    pub fn remaining(&self) -> u128 {
        if self.is_exhausted() {
            return 0;
        }
        let ring = self.ring as u64;
        let in_ring = Self::ring_len(ring) - self.index_in_ring() as u128;
        let later_rings = Self::cells_through(self.max_distance as u64) - Self::cells_through(ring);
        in_ring + later_rings
    }

    fn is_exhausted(&self) -> bool {
        self.ring > self.max_distance as i64
    }

    /// Index of the next position within its ring.
    fn index_in_ring(&self) -> u64 {
        let r = self.ring;
        let index = if self.dy == -r {
            self.dx + r
        } else if self.dy == r {
            (2 * r + 1) + 2 * (2 * r - 1) + (self.dx + r)
        } else {
            let side = if self.dx == -r { 0 } else { 1 };
            (2 * r + 1) + 2 * (self.dy + r - 1) + side
        };
        index as u64
    }

    /// Moves the cursor one step along the raster-ordered perimeter.
    fn advance(&mut self) {
        let r = self.ring;
        if self.dy == -r || self.dy == r {
            if self.dx == r {
                self.dx = -r;
                self.dy += 1;
            } else {
                self.dx += 1;
            }
        } else if self.dx == -r {
            self.dx = r;
        } else {
            self.dx = -r;
            self.dy += 1;
        }

        if self.dy > r {
            self.ring += 1;
            self.dx = -self.ring;
            self.dy = -self.ring;
        }
    }
}

impl Iterator for OutwardSpiral {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.is_exhausted() {
            return None;
        }
        let position = self.center.offset(self.dx, self.dy);
        self.advance();
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for OutwardSpiral {}
