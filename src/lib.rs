// THEORY:
// This file is the main entry point for the `rain_radar` library crate.
// It exposes the nearest-rain query in three layers of convenience:
//
// 1.  `core_modules::locator::nearest_rain` is the raw algorithm. It takes any
//     `PixelSource` and a `RainPalette` and walks an outward spiral until each of
//     the four quadrants around the query pixel has produced its nearest rain.
// 2.  `pipeline::RainRadar` bundles a palette and search settings, loads radar
//     images from disk and runs the locator against them.
// 3.  `parallel_pipeline::SurveyPool` answers many queries against a single image
//     on a pool of tokio workers.
//
// Image decoding, palettes and outer surfaces (the `radar_tester` binary) are
// collaborators around the core, never part of it.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use crate::core_modules::color::color::Rgb;
pub use crate::core_modules::locator::{nearest_rain, nearest_rain_with, LocatorConfig, RainHit, RainReport};
pub use crate::core_modules::palette::{RainBand, RainPalette};
pub use crate::core_modules::position::{PixelDistance, Position};
pub use crate::core_modules::quadrant::{Quadrant, Sector};
pub use crate::core_modules::radar_image::{PixelSource, RadarImage};
pub use crate::error::{RadarError, Result};
