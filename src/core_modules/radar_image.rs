// THEORY:
// The locator never touches an image library directly. It reads pixels through
// `PixelSource`, a single bounds-checked lookup plus the image dimensions. This
// keeps the search algorithm independent of how radar frames are decoded and
// lets tests drive it with tiny synthetic grids.
//
// Out-of-range lookups return `RadarError::OutOfBounds`. For the locator that
// error is not a failure: the spiral regularly steps off the edge of the image,
// and those positions are simply terrain with no data.
//
// `RadarImage` is the concrete source for real radar frames. It decodes any
// format the `image` crate understands and converts it to plain RGB once, up
// front, so every lookup afterwards is a direct buffer read.

use crate::core_modules::color::color::Rgb;
use crate::core_modules::position::Position;
use crate::error::{RadarError, Result};
use image::{ImageReader, RgbImage, RgbaImage};
use std::path::Path;

/// Read-only, bounds-checked access to the pixels of an image.
pub trait PixelSource {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// The color at `position`, or `RadarError::OutOfBounds` outside
    /// `[0, width) x [0, height)`.
    fn color_at(&self, position: Position) -> Result<Rgb>;

    fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width() as i64
            && position.y < self.height() as i64
    }

    /// The larger of width and height; the default search radius.
    fn max_dimension(&self) -> u32 {
        self.width().max(self.height())
    }

    /// Builds the error for a lookup at `position`.
    fn out_of_bounds(&self, position: Position) -> RadarError {
        RadarError::out_of_bounds(position, self.width(), self.height())
    }
}

impl PixelSource for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn color_at(&self, position: Position) -> Result<Rgb> {
        if !PixelSource::contains(self, position) {
            return Err(self.out_of_bounds(position));
        }
        Ok(Rgb::from(*self.get_pixel(position.x as u32, position.y as u32)))
    }
}

impl PixelSource for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn color_at(&self, position: Position) -> Result<Rgb> {
        if !PixelSource::contains(self, position) {
            return Err(self.out_of_bounds(position));
        }
        Ok(Rgb::from(*self.get_pixel(position.x as u32, position.y as u32)))
    }
}

/// A decoded radar frame held as 8-bit RGB.
#[derive(Debug, Clone)]
pub struct RadarImage {
    pixels: RgbImage,
}

impl RadarImage {
    /// Opens and decodes an image file, converting it to RGB.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "decoded radar image"
        );
        Ok(Self::from(decoded))
    }

    /// Builds a solid image of one color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            pixels: RgbImage::from_pixel(width, height, color.into()),
        }
    }

    /// Paints a single pixel, ignoring positions outside the image.
    pub fn paint(&mut self, position: Position, color: Rgb) {
        if self.contains(position) {
            self.pixels.put_pixel(position.x as u32, position.y as u32, color.into());
        }
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }
}

impl From<image::DynamicImage> for RadarImage {
    fn from(image: image::DynamicImage) -> Self {
        Self {
            pixels: image.into_rgb8(),
        }
    }
}

impl From<RgbImage> for RadarImage {
    fn from(pixels: RgbImage) -> Self {
        Self { pixels }
    }
}

impl PixelSource for RadarImage {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn color_at(&self, position: Position) -> Result<Rgb> {
        self.pixels.color_at(position)
    }
}
