pub mod color;
pub mod locator;
pub mod palette;
pub mod position;
pub mod quadrant;
pub mod radar_image;
pub mod spiral;
pub mod utils;
