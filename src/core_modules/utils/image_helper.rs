pub mod image_helper {
    use crate::core_modules::locator::RainReport;
    use crate::core_modules::position::Position;
    use crate::core_modules::radar_image::PixelSource;
    use crate::error::Result;
    use image::{ImageEncoder, Rgb, RgbImage};
    use std::path::Path;

    const CENTER_MARK: Rgb<u8> = Rgb([0, 0, 0]);
    const HIT_MARK: Rgb<u8> = Rgb([255, 0, 255]);
    const MARK_ARM: i64 = 3;

    pub fn save_png(path: impl AsRef<Path>, image: &RgbImage) -> Result<()> {
        let output = std::io::BufWriter::new(std::fs::File::create(path)?);
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(image.as_raw(), image.width(), image.height(), image::ExtendedColorType::Rgb8)?;

        Ok(())
    }

    /// Copies `image` and marks the query position with a cross and every
    /// quadrant hit with a hollow square.
    pub fn annotate<S: PixelSource + ?Sized>(image: &S, report: &RainReport) -> RgbImage {
        let mut canvas = RgbImage::from_fn(image.width(), image.height(), |x, y| {
            image
                .color_at(Position::new(x as i64, y as i64))
                .map(Rgb::<u8>::from)
                .unwrap_or(CENTER_MARK)
        });

        for hit in report.hits().filter_map(|(_, hit)| hit) {
            if hit.position != report.center() {
                draw_square(&mut canvas, hit.position, HIT_MARK);
            }
        }
        draw_cross(&mut canvas, report.center(), CENTER_MARK);
        canvas
    }

    fn put(canvas: &mut RgbImage, position: Position, color: Rgb<u8>) {
        if PixelSource::contains(&*canvas, position) {
            canvas.put_pixel(position.x as u32, position.y as u32, color);
        }
    }

    fn draw_cross(canvas: &mut RgbImage, center: Position, color: Rgb<u8>) {
        for d in -MARK_ARM..=MARK_ARM {
            put(canvas, center.offset(d, 0), color);
            put(canvas, center.offset(0, d), color);
        }
    }

    fn draw_square(canvas: &mut RgbImage, center: Position, color: Rgb<u8>) {
        for d in -MARK_ARM..=MARK_ARM {
            put(canvas, center.offset(d, -MARK_ARM), color);
            put(canvas, center.offset(d, MARK_ARM), color);
            put(canvas, center.offset(-MARK_ARM, d), color);
            put(canvas, center.offset(MARK_ARM, d), color);
        }
    }
}
