// THEORY:
// The `pipeline` module is the top-level API of the crate. A `RainRadar` owns
// one provider palette and the search settings, and answers "how far is the
// nearest rain in each direction?" for a position on a radar image, either one
// already in memory or one it loads from disk.
//
// Image decoding happens here and only here. A frame that cannot be read is a
// hard error returned to the caller before any searching starts; everything
// after that point is the pure locator in `core_modules::locator`.

use crate::core_modules::locator::{nearest_rain_with, LocatorConfig};
use crate::core_modules::palette::{PaletteDefinition, RainPalette, MET_EIREANN};
use crate::core_modules::position::Position;
use crate::core_modules::radar_image::{PixelSource, RadarImage};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Re-export key data structures for the public API.
pub use crate::core_modules::locator::{RainHit, RainReport};
pub use crate::core_modules::quadrant::Quadrant;

/// Where a radar's rain colors come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteSource {
    /// A built-in provider, e.g. `"met-eireann"`.
    Named(String),
    /// A palette spelled out in the configuration.
    Inline(PaletteDefinition),
}

impl Default for PaletteSource {
    fn default() -> Self {
        PaletteSource::Named(MET_EIREANN.to_string())
    }
}

impl PaletteSource {
    pub fn resolve(&self) -> Result<RainPalette> {
        match self {
            PaletteSource::Named(name) => RainPalette::named(name),
            PaletteSource::Inline(definition) => RainPalette::from_definition(definition.clone()),
        }
    }
}

/// Configuration for a `RainRadar`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub palette: PaletteSource,
    #[serde(flatten)]
    pub locator: LocatorConfig,
}

impl RadarConfig {
    /// Load configuration from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Queries rainfall radar images for the nearest rain around a position.
#[derive(Debug, Clone)]
pub struct RainRadar {
    palette: RainPalette,
    locator: LocatorConfig,
}

impl RainRadar {
    pub fn new(config: RadarConfig) -> Result<Self> {
        Ok(Self {
            palette: config.palette.resolve()?,
            locator: config.locator,
        })
    }

    pub fn with_palette(palette: RainPalette, locator: LocatorConfig) -> Self {
        Self { palette, locator }
    }

    /// A radar reading Met Éireann rainfall images.
    pub fn met_eireann() -> Self {
        Self::with_palette(RainPalette::met_eireann(), LocatorConfig::default())
    }

    pub fn palette(&self) -> &RainPalette {
        &self.palette
    }

    pub fn locator_config(&self) -> &LocatorConfig {
        &self.locator
    }

    /// Find the nearest rain to `position` (pixels, origin top-left) on the radar
    /// image stored at `image_path`.
    pub fn nearest_rain(&self, position: Position, image_path: impl AsRef<Path>) -> Result<RainReport> {
        let image = RadarImage::open(image_path)?;
        self.nearest_rain_in(position, &image)
    }

    /// Find the nearest rain to `position` on an image already in memory.
    pub fn nearest_rain_in<S>(&self, position: Position, image: &S) -> Result<RainReport>
    where
        S: PixelSource + ?Sized,
    {
        nearest_rain_with(position, image, &self.palette, &self.locator)
    }
}

impl Default for RainRadar {
    fn default() -> Self {
        Self::met_eireann()
    }
}
