// THEORY:
// The locator is the heart of the crate. Given a query pixel it finds, for each
// of the four compass quadrants, the nearest pixel painted in a rain color and
// reports how far away it is in whole pixels.
//
// Algorithm:
// 1.  **Short circuit**: If the query pixel itself is rain, every quadrant is at
//     distance zero and no search happens.
// 2.  **Outward scan**: Otherwise an `OutwardSpiral` walks square rings around the
//     query pixel. Positions off the image are skipped silently, dry pixels are
//     skipped, and pixels on the query's own row or column belong to no quadrant.
// 3.  **First hit wins**: The first rain pixel seen in a quadrant is recorded and
//     never replaced. Rings are scanned strictly inside-out, so scan order stands
//     in for a distance comparison.
// 4.  **Early exit**: Once all four quadrants hold a hit the spiral is dropped;
//     no further pixels are read.
// 5.  **Report**: Each hit is turned into a floored Euclidean distance. Quadrants
//     with no rain inside the search radius stay `None`.
//
// The scan is single-threaded and keeps no state between calls, so any number of
// queries may run at once against the same read-only image.

use crate::core_modules::color::color::Rgb;
use crate::core_modules::palette::RainPalette;
use crate::core_modules::position::{PixelDistance, Position};
use crate::core_modules::quadrant::{Quadrant, QuadrantMap, Sector};
use crate::core_modules::radar_image::PixelSource;
use crate::core_modules::spiral::OutwardSpiral;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tunable search behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Furthest ring to search. `None` searches up to the larger image dimension,
    /// which is enough to reach every pixel of the image. Larger values are
    /// clamped to that dimension.
    pub max_distance: Option<u32>,
}

impl LocatorConfig {
    pub fn search_radius<S: PixelSource + ?Sized>(&self, image: &S) -> u32 {
        let max_dim = image.max_dimension();
        self.max_distance.map_or(max_dim, |d| d.min(max_dim))
    }
}

/// The nearest rain found in one quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainHit {
    pub position: Position,
    pub distance: PixelDistance,
    /// Rate of the palette band the rain pixel was drawn in.
    pub rate_mm_per_hour: Option<f32>,
}

/// Outcome of one nearest-rain query.
#[derive(Debug, Clone, PartialEq)]
pub struct RainReport {
    center: Position,
    raining_at_center: bool,
    hits: QuadrantMap<RainHit>,
    pixels_examined: usize,
}

impl RainReport {
    pub fn center(&self) -> Position {
        self.center
    }

    /// True when the query pixel is itself rain.
    pub fn raining_at_center(&self) -> bool {
        self.raining_at_center
    }

    pub fn hit(&self, quadrant: Quadrant) -> Option<&RainHit> {
        self.hits.get(quadrant)
    }

    pub fn distance(&self, quadrant: Quadrant) -> Option<PixelDistance> {
        self.hit(quadrant).map(|hit| hit.distance)
    }

    /// Distances in the order NW, SW, NE, SE. `None` marks a quadrant with no
    /// rain inside the search radius.
    pub fn distances(&self) -> [Option<PixelDistance>; 4] {
        Quadrant::ALL.map(|q| self.distance(q))
    }

    /// Hits in the order NW, SW, NE, SE.
    pub fn hits(&self) -> impl Iterator<Item = (Quadrant, Option<&RainHit>)> + '_ {
        self.hits.iter()
    }

    /// Number of quadrants where rain was found.
    pub fn resolved(&self) -> usize {
        self.hits.len()
    }

    pub fn is_complete(&self) -> bool {
        self.hits.is_complete()
    }

    /// The closest hit over all quadrants; ties go to the earlier quadrant.
    pub fn nearest(&self) -> Option<(Quadrant, &RainHit)> {
        self.hits
            .iter()
            .filter_map(|(q, hit)| hit.map(|hit| (q, hit)))
            .min_by_key(|(_, hit)| hit.distance)
    }

    /// How many pixel lookups the query made, including ones off the image.
    pub fn pixels_examined(&self) -> usize {
        self.pixels_examined
    }
}

/// Finds the nearest rain in each quadrant around `center`, searching up to the
/// larger image dimension.
pub fn nearest_rain<S>(center: Position, image: &S, palette: &RainPalette) -> Result<RainReport>
where
    S: PixelSource + ?Sized,
{
    nearest_rain_with(center, image, palette, &LocatorConfig::default())
}

/// Finds the nearest rain in each quadrant around `center`.
///
/// Fails only when `center` itself is outside the image.
pub fn nearest_rain_with<S>(
    center: Position,
    image: &S,
    palette: &RainPalette,
    config: &LocatorConfig,
) -> Result<RainReport>
where
    S: PixelSource + ?Sized,
{
    let center_color = image.color_at(center)?;
    if palette.contains(&center_color) {
        tracing::debug!(%center, "raining at query position");
        return Ok(raining_here(center, center_color, palette));
    }

    let radius = config.search_radius(image);
    tracing::debug!(%center, radius, palette = palette.name(), "searching outwards for rain");

    let mut hits = QuadrantMap::new();
    let mut pixels_examined = 1;
    for point in OutwardSpiral::new(center, radius) {
        pixels_examined += 1;
        let Ok(color) = image.color_at(point) else {
            continue;
        };
        if !palette.contains(&color) {
            continue;
        }
        let Some(quadrant) = Sector::classify(&center, &point).quadrant() else {
            continue;
        };

        let hit = RainHit {
            position: point,
            distance: point.pixel_distance(&center),
            rate_mm_per_hour: palette.rate_for(&color),
        };
        if hits.record_first(quadrant, hit) {
            tracing::trace!(%center, %point, %quadrant, distance = hit.distance, "found rain");
            if hits.is_complete() {
                break;
            }
        }
    }

    tracing::debug!(
        %center,
        resolved = hits.len(),
        pixels_examined,
        "nearest rain search finished"
    );

    Ok(RainReport {
        center,
        raining_at_center: false,
        hits,
        pixels_examined,
    })
}

fn raining_here(center: Position, color: Rgb, palette: &RainPalette) -> RainReport {
    let mut hits = QuadrantMap::new();
    let hit = RainHit {
        position: center,
        distance: 0,
        rate_mm_per_hour: palette.rate_for(&color),
    };
    for quadrant in Quadrant::ALL {
        hits.record_first(quadrant, hit);
    }
    RainReport {
        center,
        raining_at_center: true,
        hits,
        pixels_examined: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::radar_image::RadarImage;
    use std::cell::RefCell;
    use std::collections::HashSet;

    const RAIN: Rgb = Rgb::new(255, 0, 0);

    fn palette() -> RainPalette {
        RainPalette::from_colors("test", [RAIN]).unwrap()
    }

    fn grid(width: u32, height: u32, rain: &[(i64, i64)]) -> RadarImage {
        let mut image = RadarImage::filled(width, height, Rgb::WHITE);
        for &(x, y) in rain {
            image.paint(Position::new(x, y), RAIN);
        }
        image
    }

    /// Wraps an image and records every lookup.
    struct Recording<'a> {
        inner: &'a RadarImage,
        lookups: RefCell<Vec<Position>>,
    }

    impl<'a> Recording<'a> {
        fn new(inner: &'a RadarImage) -> Self {
            Self {
                inner,
                lookups: RefCell::new(Vec::new()),
            }
        }
    }

    impl PixelSource for Recording<'_> {
        fn width(&self) -> u32 {
            self.inner.width()
        }

        fn height(&self) -> u32 {
            self.inner.height()
        }

        fn color_at(&self, position: Position) -> Result<Rgb> {
            self.lookups.borrow_mut().push(position);
            self.inner.color_at(position)
        }
    }

    #[test]
    fn four_corners_are_equidistant() {
        let image = grid(5, 5, &[(0, 0), (4, 0), (0, 4), (4, 4)]);
        let report = nearest_rain(Position::new(2, 2), &image, &palette()).unwrap();

        assert_eq!(report.distances(), [Some(2), Some(2), Some(2), Some(2)]);
        assert_eq!(report.hit(Quadrant::NorthWest).unwrap().position, Position::new(0, 0));
        assert_eq!(report.hit(Quadrant::SouthWest).unwrap().position, Position::new(0, 4));
        assert_eq!(report.hit(Quadrant::NorthEast).unwrap().position, Position::new(4, 0));
        assert_eq!(report.hit(Quadrant::SouthEast).unwrap().position, Position::new(4, 4));
        assert!(!report.raining_at_center());
    }

    #[test]
    fn missing_quadrant_is_none() {
        let image = grid(5, 5, &[(0, 0), (4, 0), (0, 4)]);
        let report = nearest_rain(Position::new(2, 2), &image, &palette()).unwrap();

        assert_eq!(report.distances(), [Some(2), Some(2), Some(2), None]);
        assert_eq!(report.resolved(), 3);
        assert!(!report.is_complete());
    }

    #[test]
    fn rain_at_center_short_circuits() {
        let image = grid(5, 5, &[(2, 2)]);
        let recording = Recording::new(&image);
        let report = nearest_rain(Position::new(2, 2), &recording, &palette()).unwrap();

        assert_eq!(report.distances(), [Some(0); 4]);
        assert!(report.raining_at_center());
        assert_eq!(recording.lookups.borrow().as_slice(), &[Position::new(2, 2)]);
    }

    #[test]
    fn distances_are_floored() {
        // NW at (-3, -1) -> sqrt(10) = 3.16, SE at (+2, +2) -> sqrt(8) = 2.83
        let image = grid(11, 11, &[(2, 4), (7, 7)]);
        let report = nearest_rain(Position::new(5, 5), &image, &palette()).unwrap();
        assert_eq!(report.distances(), [Some(3), None, None, Some(2)]);
    }

    #[test]
    fn nearest_ring_wins_over_scan_order() {
        // (2, 1) is on ring 2 and (2, 2) is on ring 1; ring 1 is always scanned first.
        let image = grid(7, 7, &[(2, 1), (2, 2)]);
        let report = nearest_rain(Position::new(3, 3), &image, &palette()).unwrap();
        assert_eq!(report.hit(Quadrant::NorthWest).unwrap().position, Position::new(2, 2));
        assert_eq!(report.distance(Quadrant::NorthWest), Some(1));
    }

    #[test]
    fn ties_in_a_ring_go_to_the_first_scanned() {
        // Both are on ring 2 at distance sqrt(5); the top row is scanned first.
        let image = grid(7, 7, &[(1, 2), (2, 1)]);
        let report = nearest_rain(Position::new(3, 3), &image, &palette()).unwrap();
        assert_eq!(report.hit(Quadrant::NorthWest).unwrap().position, Position::new(2, 1));
    }

    #[test]
    fn rain_on_the_axes_is_ignored() {
        let image = grid(9, 9, &[(4, 0), (4, 8), (0, 4), (8, 4), (4, 3), (5, 4)]);
        let report = nearest_rain(Position::new(4, 4), &image, &palette()).unwrap();
        assert_eq!(report.distances(), [None; 4]);
    }

    #[test]
    fn stops_reading_once_every_quadrant_is_resolved() {
        let image = grid(9, 9, &[(3, 3), (5, 3), (3, 5), (5, 5)]);
        let recording = Recording::new(&image);
        let report = nearest_rain(Position::new(4, 4), &recording, &palette()).unwrap();

        assert_eq!(report.distances(), [Some(1); 4]);
        // Center plus the eight pixels of ring one, and nothing else.
        assert_eq!(recording.lookups.borrow().len(), 9);
        assert_eq!(report.pixels_examined(), 9);
    }

    #[test]
    fn never_reads_a_pixel_twice() {
        let image = grid(12, 8, &[(11, 7)]);
        let recording = Recording::new(&image);
        nearest_rain(Position::new(3, 2), &recording, &palette()).unwrap();

        let lookups = recording.lookups.borrow();
        let unique: HashSet<&Position> = lookups.iter().collect();
        assert_eq!(unique.len(), lookups.len());
    }

    #[test]
    fn corner_queries_step_off_the_image_safely() {
        let image = grid(10, 10, &[(9, 9)]);
        let report = nearest_rain(Position::new(0, 0), &image, &palette()).unwrap();
        assert_eq!(report.distances(), [None, None, None, Some(12)]);
    }

    #[test]
    fn dry_image_reads_every_ring() {
        let image = grid(3, 3, &[]);
        let report = nearest_rain(Position::new(1, 1), &image, &palette()).unwrap();
        assert_eq!(report.distances(), [None; 4]);
        // Rings 1..=3 around the center, plus the center itself.
        assert_eq!(report.pixels_examined(), 1 + 4 * 3 * 4);
    }

    #[test]
    fn single_pixel_image_has_nothing_to_search() {
        let image = grid(1, 1, &[]);
        let report = nearest_rain(Position::new(0, 0), &image, &palette()).unwrap();
        assert_eq!(report.distances(), [None; 4]);
        assert_eq!(report.pixels_examined(), 1 + 8);
    }

    #[test]
    fn search_radius_can_be_capped() {
        let image = grid(20, 20, &[(0, 0), (18, 18)]);
        let config = LocatorConfig { max_distance: Some(5) };
        let report = nearest_rain_with(Position::new(10, 10), &image, &palette(), &config).unwrap();
        assert_eq!(report.distances(), [None; 4]);

        let report = nearest_rain(Position::new(10, 10), &image, &palette()).unwrap();
        assert_eq!(report.distances(), [Some(14), None, None, Some(11)]);
    }

    #[test]
    fn oversized_radius_is_clamped_to_the_image() {
        let image = grid(3, 3, &[]);
        let config = LocatorConfig { max_distance: Some(500) };
        assert_eq!(config.search_radius(&image), 3);

        let report = nearest_rain_with(Position::new(1, 1), &image, &palette(), &config).unwrap();
        assert_eq!(report.distances(), [None; 4]);
        assert_eq!(report.pixels_examined(), 1 + 4 * 3 * 4);
    }

    #[test]
    fn center_outside_the_image_is_an_error() {
        let image = grid(4, 4, &[]);
        let err = nearest_rain(Position::new(4, 0), &image, &palette()).unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn hits_carry_band_rates() {
        let palette = RainPalette::met_eireann();
        let mut image = RadarImage::filled(5, 5, Rgb::WHITE);
        image.paint(Position::new(1, 1), Rgb::new(0, 211, 0));
        let report = nearest_rain(Position::new(2, 2), &image, &palette).unwrap();

        let (quadrant, hit) = report.nearest().unwrap();
        assert_eq!(quadrant, Quadrant::NorthWest);
        assert_eq!(hit.rate_mm_per_hour, Some(2.0));
    }
}
