// THEORY:
// The `quadrant` module answers "which way is this rain from me?" It splits the
// plane around a center pixel into four compass quadrants using the sign of the
// x and y offsets. Image y grows downwards, so a negative y offset is north.
//
// Points that share the center's row or column belong to no quadrant. They are
// classified as `Sector::OnAxis` and the locator ignores them, which means rain
// lying exactly due north, south, east or west never counts toward a result.
//
// `QuadrantMap` is the four-slot result table the locator fills while it scans.
// The first value written to a slot is permanent, so the scan order alone decides
// which candidate wins.

use crate::core_modules::position::Position;
use std::cmp::Ordering;
use std::fmt;

/// One of the four compass quadrants around a center pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest,
    SouthWest,
    NorthEast,
    SouthEast,
}

impl Quadrant {
    /// All quadrants, in result order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::SouthWest,
        Quadrant::NorthEast,
        Quadrant::SouthEast,
    ];

    /// Slot of this quadrant in the result order NW, SW, NE, SE.
    pub const fn index(self) -> usize {
        match self {
            Quadrant::NorthWest => 0,
            Quadrant::SouthWest => 1,
            Quadrant::NorthEast => 2,
            Quadrant::SouthEast => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Quadrant::NorthWest => "NW",
            Quadrant::SouthWest => "SW",
            Quadrant::NorthEast => "NE",
            Quadrant::SouthEast => "SE",
        }
    }

    /// Unit signs `(sx, sy)` of points in this quadrant.
    pub const fn signs(self) -> (i8, i8) {
        match self {
            Quadrant::NorthWest => (-1, -1),
            Quadrant::SouthWest => (-1, 1),
            Quadrant::NorthEast => (1, -1),
            Quadrant::SouthEast => (1, 1),
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a point lies relative to a center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sector {
    Quadrant(Quadrant),
    /// Same row or column as the center (including the center itself).
    OnAxis,
}

impl Sector {
    pub fn classify(center: &Position, point: &Position) -> Sector {
        use Ordering::*;
        match (point.x.cmp(&center.x), point.y.cmp(&center.y)) {
            (Less, Less) => Sector::Quadrant(Quadrant::NorthWest),
            (Less, Greater) => Sector::Quadrant(Quadrant::SouthWest),
            (Greater, Less) => Sector::Quadrant(Quadrant::NorthEast),
            (Greater, Greater) => Sector::Quadrant(Quadrant::SouthEast),
            _ => Sector::OnAxis,
        }
    }

    pub fn quadrant(self) -> Option<Quadrant> {
        match self {
            Sector::Quadrant(quadrant) => Some(quadrant),
            Sector::OnAxis => None,
        }
    }
}

/// A fixed four-slot table keyed by quadrant where the first write wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadrantMap<T> {
    slots: [Option<T>; 4],
}

impl<T> Default for QuadrantMap<T> {
    fn default() -> Self {
        Self {
            slots: [None, None, None, None],
        }
    }
}

impl<T> QuadrantMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` unless the quadrant already holds one. Returns whether it was stored.
    pub fn record_first(&mut self, quadrant: Quadrant, value: T) -> bool {
        let slot = &mut self.slots[quadrant.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    pub fn get(&self, quadrant: Quadrant) -> Option<&T> {
        self.slots[quadrant.index()].as_ref()
    }

    /// Number of resolved quadrants.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Slots in result order.
    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, Option<&T>)> + '_ {
        Quadrant::ALL.into_iter().map(move |q| (q, self.get(q)))
    }

    pub fn into_array(self) -> [Option<T>; 4] {
        self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_offset_signs() {
        let center = Position::new(5, 5);
        let at = |x, y| Sector::classify(&center, &Position::new(x, y));
        assert_eq!(at(1, 1), Sector::Quadrant(Quadrant::NorthWest));
        assert_eq!(at(1, 9), Sector::Quadrant(Quadrant::SouthWest));
        assert_eq!(at(9, 1), Sector::Quadrant(Quadrant::NorthEast));
        assert_eq!(at(9, 9), Sector::Quadrant(Quadrant::SouthEast));
    }

    #[test]
    fn row_and_column_of_center_are_on_axis() {
        let center = Position::new(5, 5);
        for point in [(5, 0), (5, 9), (0, 5), (9, 5), (5, 5)] {
            let point = Position::new(point.0, point.1);
            assert_eq!(Sector::classify(&center, &point), Sector::OnAxis);
            assert_eq!(Sector::classify(&center, &point).quadrant(), None);
        }
    }

    #[test]
    fn signs_agree_with_classification() {
        let center = Position::new(0, 0);
        for quadrant in Quadrant::ALL {
            let (sx, sy) = quadrant.signs();
            let point = Position::new(sx as i64 * 3, sy as i64 * 7);
            assert_eq!(Sector::classify(&center, &point), Sector::Quadrant(quadrant));
        }
    }

    #[test]
    fn result_order_is_nw_sw_ne_se() {
        let labels: Vec<&str> = Quadrant::ALL.iter().map(|q| q.label()).collect();
        assert_eq!(labels, ["NW", "SW", "NE", "SE"]);
        for (i, quadrant) in Quadrant::ALL.into_iter().enumerate() {
            assert_eq!(quadrant.index(), i);
        }
    }

    #[test]
    fn first_record_wins() {
        let mut map = QuadrantMap::new();
        assert!(map.record_first(Quadrant::NorthEast, 1));
        assert!(!map.record_first(Quadrant::NorthEast, 2));
        assert_eq!(map.get(Quadrant::NorthEast), Some(&1));
        assert_eq!(map.len(), 1);
        assert!(!map.is_complete());

        for quadrant in Quadrant::ALL {
            map.record_first(quadrant, 9);
        }
        assert!(map.is_complete());
        assert_eq!(map.into_array(), [Some(9), Some(9), Some(1), Some(9)]);
    }
}
