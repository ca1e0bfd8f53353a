// THEORY:
// The `color` module holds the smallest unit of radar data: the RGB value of a
// single pixel. Radar providers encode precipitation intensity as a handful of
// exact colors, so the only question ever asked of a pixel here is "is this one
// of the rain colors?" That makes `Rgb` a "dumb" data container with exact
// equality and hashing, nothing more.
//
// Key principles:
// 1) Exact matching: no tolerance, no color-space math. Anti-aliased or
//    blended pixels are deliberately not rain.
// 2) Alpha is ignored. Images are converted to RGB before they reach the
//    locator, and RGBA byte slices drop their fourth channel.
// 3) Hex literals (`#RRGGBB`) are the on-disk form used by palette files.

pub mod color {
    use crate::error::RadarError;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    pub type Channel = u8;

    /// A single opaque RGB color.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct Rgb {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Rgb {
        pub const WHITE: Rgb = Rgb::new(255, 255, 255);
        pub const BLACK: Rgb = Rgb::new(0, 0, 0);

        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Rgb { red, green, blue }
        }

        /// Parses `#RRGGBB` or `RRGGBB`.
        pub fn from_hex(hex: &str) -> Result<Self, RadarError> {
            let trimmed = hex.trim();
            let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
            if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(RadarError::invalid_color(format!("expected #RRGGBB, got '{hex}'")));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&digits[range], 16)
                    .map_err(|_| RadarError::invalid_color(format!("'{hex}' is not hexadecimal")))
            };
            Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
        }

        pub fn to_hex(&self) -> String {
            format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
        }
    }

    impl fmt::Display for Rgb {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
        }
    }

    impl FromStr for Rgb {
        type Err = RadarError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Rgb::from_hex(s)
        }
    }

    impl TryFrom<String> for Rgb {
        type Error = RadarError;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            Rgb::from_hex(&value)
        }
    }

    impl From<Rgb> for String {
        fn from(color: Rgb) -> Self {
            color.to_hex()
        }
    }

    impl From<[Channel; 3]> for Rgb {
        fn from([red, green, blue]: [Channel; 3]) -> Self {
            Rgb::new(red, green, blue)
        }
    }

    impl From<(Channel, Channel, Channel)> for Rgb {
        fn from((red, green, blue): (Channel, Channel, Channel)) -> Self {
            Rgb::new(red, green, blue)
        }
    }

    impl From<image::Rgb<u8>> for Rgb {
        fn from(pixel: image::Rgb<u8>) -> Self {
            Rgb::from(pixel.0)
        }
    }

    impl From<image::Rgba<u8>> for Rgb {
        fn from(pixel: image::Rgba<u8>) -> Self {
            let [red, green, blue, _] = pixel.0;
            Rgb::new(red, green, blue)
        }
    }

    impl From<Rgb> for image::Rgb<u8> {
        fn from(color: Rgb) -> Self {
            image::Rgb([color.red, color.green, color.blue])
        }
    }

    impl TryFrom<&[u8]> for Rgb {
        type Error = RadarError;

        /// Accepts RGB or RGBA byte runs; alpha is dropped.
        fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
            match bytes {
                [red, green, blue] | [red, green, blue, _] => Ok(Rgb::new(*red, *green, *blue)),
                _ => Err(RadarError::invalid_color(format!(
                    "cannot convert {} bytes into a color",
                    bytes.len()
                ))),
            }
        }
    }
}
