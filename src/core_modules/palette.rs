// THEORY:
// A `RainPalette` is the lookup table that turns a radar image into a rain map.
// Every provider draws its radar with its own fixed set of colors, one per
// precipitation band, and a pixel is rain exactly when its color is in that set.
//
// Key architectural principles:
// 1.  **Immutable after construction**: A palette is built once (from a built-in
//     provider, from JSON, or from a list of colors) and only ever read after that.
//     There are no mutators, so one palette can be shared freely between queries
//     and threads.
// 2.  **Exact membership**: `contains` is a hash-set lookup on the exact RGB
//     triple. This is the hot path of the locator.
// 3.  **Bands keep their order and meaning**: Alongside the set, the palette keeps
//     the bands in the order the provider listed them, each with its optional
//     rainfall rate, so callers can tell how heavy the rain they found is.

use crate::core_modules::color::color::Rgb;
use crate::error::{RadarError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One precipitation-intensity entry of a provider's legend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainBand {
    pub color: Rgb,
    /// Rainfall rate this color stands for, when the provider publishes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_mm_per_hour: Option<f32>,
}

impl RainBand {
    pub const fn new(color: Rgb, rate_mm_per_hour: f32) -> Self {
        Self {
            color,
            rate_mm_per_hour: Some(rate_mm_per_hour),
        }
    }

    pub const fn unrated(color: Rgb) -> Self {
        Self {
            color,
            rate_mm_per_hour: None,
        }
    }
}

/// The serialized form of a palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteDefinition {
    pub name: String,
    pub bands: Vec<RainBand>,
}

/// Met Éireann rainfall radar legend, heaviest band first.
const MET_EIREANN_BANDS: [RainBand; 14] = [
    RainBand::new(Rgb::new(230, 227, 230), 32.0),
    RainBand::new(Rgb::new(188, 189, 188), 24.0),
    RainBand::new(Rgb::new(239, 0, 0), 16.0),
    RainBand::new(Rgb::new(255, 153, 153), 12.0),
    RainBand::new(Rgb::new(255, 85, 255), 8.0),
    RainBand::new(Rgb::new(132, 0, 132), 6.0),
    RainBand::new(Rgb::new(255, 255, 140), 4.0),
    RainBand::new(Rgb::new(239, 243, 0), 3.0),
    RainBand::new(Rgb::new(0, 211, 0), 2.0),
    RainBand::new(Rgb::new(82, 243, 123), 1.5),
    RainBand::new(Rgb::new(0, 254, 254), 1.0),
    RainBand::new(Rgb::new(89, 169, 254), 0.5),
    RainBand::new(Rgb::new(81, 72, 254), 0.25),
    RainBand::new(Rgb::new(0, 0, 187), 0.1),
];

pub const MET_EIREANN: &str = "met-eireann";

/// An immutable set of colors that denote rain in one provider's radar images.
#[derive(Debug, Clone, PartialEq)]
pub struct RainPalette {
    name: String,
    bands: Vec<RainBand>,
    /// Color -> index into `bands`.
    lookup: HashMap<Rgb, usize>,
}

impl RainPalette {
    /// Builds a palette, rejecting empty band lists and colors that appear twice.
    pub fn new(name: impl Into<String>, bands: Vec<RainBand>) -> Result<Self> {
        let name = name.into();
        if bands.is_empty() {
            return Err(RadarError::EmptyPalette(name));
        }
        let mut lookup = HashMap::with_capacity(bands.len());
        for (index, band) in bands.iter().enumerate() {
            if lookup.insert(band.color, index).is_some() {
                return Err(RadarError::DuplicateColor {
                    palette: name,
                    color: band.color.to_hex(),
                });
            }
        }
        Ok(Self { name, bands, lookup })
    }

    /// Builds a palette of colors with no published rates.
    pub fn from_colors<I, C>(name: impl Into<String>, colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Rgb>,
    {
        let bands = colors.into_iter().map(|c| RainBand::unrated(c.into())).collect();
        Self::new(name, bands)
    }

    /// The colors which denote rain in Met Éireann's rainfall radar images.
    pub fn met_eireann() -> Self {
        let bands = MET_EIREANN_BANDS.to_vec();
        let lookup = bands.iter().enumerate().map(|(i, band)| (band.color, i)).collect();
        Self {
            name: MET_EIREANN.to_string(),
            bands,
            lookup,
        }
    }

    /// Looks up a built-in provider by name.
    pub fn named(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            MET_EIREANN => Ok(Self::met_eireann()),
            _ => Err(RadarError::UnknownPalette(name.to_string())),
        }
    }

    pub fn from_definition(definition: PaletteDefinition) -> Result<Self> {
        Self::new(definition.name, definition.bands)
    }

    /// Load a palette definition from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        let definition: PaletteDefinition = serde_json::from_str(json_str)?;
        Self::from_definition(definition)
    }

    /// Load a palette definition from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_definition(&self) -> PaletteDefinition {
        PaletteDefinition {
            name: self.name.clone(),
            bands: self.bands.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Is this pixel rain?
    #[inline]
    pub fn contains(&self, color: &Rgb) -> bool {
        self.lookup.contains_key(color)
    }

    pub fn band_for(&self, color: &Rgb) -> Option<&RainBand> {
        self.lookup.get(color).map(|&i| &self.bands[i])
    }

    /// Rainfall rate of the band drawn in `color`, if any.
    pub fn rate_for(&self, color: &Rgb) -> Option<f32> {
        self.band_for(color).and_then(|band| band.rate_mm_per_hour)
    }

    /// Bands in the order the provider listed them.
    pub fn bands(&self) -> &[RainBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}
