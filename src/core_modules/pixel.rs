// THEORY:
// The `Pixel` module is the most fundamental building block of the engine. It is a
// "dumb" data container for the raw RGBA bytes of a single pixel.
//
// Key architectural principles:
// 1.  **Data Purity**: It holds the raw `u8` channel values without interpretation.
//     Gray formulas live in `formula`, not here.
// 2.  **Intrinsic Knowledge**: The only helpers are the ones every formula shares
//     (`max_channel`, `min_channel`) and `with_gray`, which writes a gray level back
//     into R, G and B while leaving alpha alone.
// 3.  **Efficiency**: The struct is `Copy`, four bytes wide, and cheap to store in
//     the large `Vec<Pixel>` that backs an `Image`.

pub mod pixel {
    use crate::error::{AssayError, Result};

    pub type Byte = u8;
    pub type Channel = Byte;
    /// A single gray intensity in 0..=255.
    pub type GrayLevel = Byte;

    pub const CHANNELS: usize = 4;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// A fully opaque pixel.
        pub fn opaque(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel::new(red, green, blue, Channel::MAX)
        }

        /// HSV value: the brightest of the three color channels.
        pub fn max_channel(&self) -> Channel {
            self.red.max(self.green.max(self.blue))
        }

        pub fn min_channel(&self) -> Channel {
            self.red.min(self.green.min(self.blue))
        }

        /// Replaces R, G and B with `level`. Alpha is passed through.
        pub fn with_gray(self, level: GrayLevel) -> Self {
            Pixel {
                red: level,
                green: level,
                blue: level,
                alpha: self.alpha,
            }
        }
    }

    impl TryFrom<&[Byte]> for Pixel {
        type Error = AssayError;

        fn try_from(bytes: &[Byte]) -> Result<Self> {
            match bytes {
                [red, green, blue, alpha] => Ok(Pixel::new(*red, *green, *blue, *alpha)),
                _ => Err(AssayError::InvalidArgument(format!(
                    "cannot convert {} bytes into a pixel, expected {}",
                    bytes.len(),
                    CHANNELS
                ))),
            }
        }
    }

    impl From<Pixel> for [Byte; CHANNELS] {
        fn from(pixel: Pixel) -> Self {
            [pixel.red, pixel.green, pixel.blue, pixel.alpha]
        }
    }
}
