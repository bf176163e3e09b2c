// THEORY:
// The `Image` is the in-memory grid every transform consumes and produces. It is a
// row-major `Vec<Pixel>` plus its dimensions and the `PixelFormat` it was decoded
// from (or will be encoded to).
//
// Key architectural principles:
// 1.  **Shape Invariant**: `pixels.len() == width * height` at all times. The
//     constructors check it, and no operation changes the dimensions.
// 2.  **Value Semantics**: `map_pixels` and `duplicate` always allocate fresh storage,
//     so a transformed image never aliases the caller's image. The in-place variant
//     exists for callers that explicitly want to overwrite their own handle.
// 3.  **Opaque RGB**: An `Rgb8` image has no alpha channel, so every pixel it holds
//     carries alpha 255. `Rgba8` images pass alpha through untouched.

pub mod raster {
    use crate::core_modules::pixel::pixel::{Byte, CHANNELS, Channel, Pixel};
    use crate::error::{AssayError, Result};

    /// The storage layout of an image, mirrored by the encoder on save.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum PixelFormat {
        /// Three channels, implicitly opaque.
        Rgb8,
        /// Four channels with straight alpha.
        #[default]
        Rgba8,
    }

    impl PixelFormat {
        pub fn has_alpha(self) -> bool {
            matches!(self, PixelFormat::Rgba8)
        }

        fn normalize(self, pixel: Pixel) -> Pixel {
            match self {
                PixelFormat::Rgb8 => Pixel {
                    alpha: Channel::MAX,
                    ..pixel
                },
                PixelFormat::Rgba8 => pixel,
            }
        }
    }

    /// A width x height grid of `Pixel`s stored row-major.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Image {
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<Pixel>,
    }

    impl Image {
        pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<Pixel>) -> Result<Self> {
            let expected = width as usize * height as usize;
            if pixels.len() != expected {
                return Err(AssayError::InvalidArgument(format!(
                    "{}x{} image needs {} pixels, got {}",
                    width,
                    height,
                    expected,
                    pixels.len()
                )));
            }
            let pixels = pixels.into_iter().map(|p| format.normalize(p)).collect();
            Ok(Self {
                width,
                height,
                format,
                pixels,
            })
        }

        /// Builds an image by calling `f(x, y)` for every coordinate.
        pub fn from_fn<F>(width: u32, height: u32, format: PixelFormat, mut f: F) -> Self
        where
            F: FnMut(u32, u32) -> Pixel,
        {
            let mut pixels = Vec::with_capacity(width as usize * height as usize);
            for y in 0..height {
                for x in 0..width {
                    pixels.push(format.normalize(f(x, y)));
                }
            }
            Self {
                width,
                height,
                format,
                pixels,
            }
        }

        /// Wraps a tightly packed RGBA8 buffer.
        pub fn from_rgba_bytes(width: u32, height: u32, format: PixelFormat, bytes: &[Byte]) -> Result<Self> {
            let expected = width as usize * height as usize * CHANNELS;
            if bytes.len() != expected {
                return Err(AssayError::InvalidArgument(format!(
                    "{}x{} RGBA buffer needs {} bytes, got {}",
                    width,
                    height,
                    expected,
                    bytes.len()
                )));
            }
            let pixels = bytes
                .chunks_exact(CHANNELS)
                .map(Pixel::try_from)
                .collect::<Result<Vec<_>>>()?;
            Self::new(width, height, format, pixels)
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        pub fn format(&self) -> PixelFormat {
            self.format
        }

        pub fn pixels(&self) -> &[Pixel] {
            &self.pixels
        }

        pub fn pixel_count(&self) -> usize {
            self.pixels.len()
        }

        pub fn is_empty(&self) -> bool {
            self.pixels.is_empty()
        }

        pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
            self.index_of(x, y).map(|i| self.pixels[i])
        }

        pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) -> Result<()> {
            let index = self.index_of(x, y).ok_or_else(|| {
                AssayError::InvalidArgument(format!(
                    "({}, {}) is outside the {}x{} image",
                    x, y, self.width, self.height
                ))
            })?;
            self.pixels[index] = self.format.normalize(pixel);
            Ok(())
        }

        /// Iterates the image one row at a time, top to bottom.
        pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
            // An empty pixel vector yields no chunks, so the `max(1)` never leaks a row.
            self.pixels.chunks(self.width.max(1) as usize)
        }

        /// Returns a new image with `f` applied to every pixel.
        pub fn map_pixels<F>(&self, f: F) -> Image
        where
            F: Fn(Pixel) -> Pixel,
        {
            let pixels = self
                .pixels
                .iter()
                .map(|&p| self.format.normalize(f(p)))
                .collect();
            Image {
                width: self.width,
                height: self.height,
                format: self.format,
                pixels,
            }
        }

        /// Overwrites every pixel with `f(pixel)`.
        pub fn map_pixels_in_place<F>(&mut self, f: F)
        where
            F: Fn(Pixel) -> Pixel,
        {
            let format = self.format;
            for pixel in self.pixels.iter_mut() {
                *pixel = format.normalize(f(*pixel));
            }
        }

        /// Copies the image into fresh storage laid out as `format`.
        ///
        /// RGB content is always identical. Converting to `Rgb8` drops the alpha
        /// channel (every pixel becomes opaque); converting to `Rgba8` keeps it.
        pub fn duplicate(&self, format: PixelFormat) -> Image {
            let pixels = self.pixels.iter().map(|&p| format.normalize(p)).collect();
            Image {
                width: self.width,
                height: self.height,
                format,
                pixels,
            }
        }

        pub fn to_rgba_bytes(&self) -> Vec<Byte> {
            let mut bytes = Vec::with_capacity(self.pixels.len() * CHANNELS);
            for p in &self.pixels {
                bytes.extend_from_slice(&<[Byte; CHANNELS]>::from(*p));
            }
            bytes
        }

        pub fn to_rgb_bytes(&self) -> Vec<Byte> {
            let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
            for p in &self.pixels {
                bytes.extend_from_slice(&[p.red, p.green, p.blue]);
            }
            bytes
        }

        fn index_of(&self, x: u32, y: u32) -> Option<usize> {
            if x < self.width && y < self.height {
                Some(y as usize * self.width as usize + x as usize)
            } else {
                None
            }
        }
    }
}
