// The file boundary of the engine: decoding any raster the `image` crate understands
// into an `Image`, and encoding an `Image` back out as PNG.

pub mod image_helper {
    use crate::core_modules::raster::raster::{Image, PixelFormat};
    use crate::error::{AssayError, Result};
    use image::ImageEncoder;
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::Path;

    /// Decodes the file at `path`. Images with alpha load as `Rgba8`, the rest as `Rgb8`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Image> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| AssayError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let format = if decoded.color().has_alpha() {
            PixelFormat::Rgba8
        } else {
            PixelFormat::Rgb8
        };
        let rgba = decoded.to_rgba8();
        log::debug!(
            "decoded {} as {}x{} {:?}",
            path.display(),
            rgba.width(),
            rgba.height(),
            format
        );

        Image::from_rgba_bytes(rgba.width(), rgba.height(), format, rgba.as_raw())
    }

    /// Writes `image` to `path` as PNG, replacing any existing file.
    pub fn save<P: AsRef<Path>>(image: &Image, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = File::create(path).map_err(|source| AssayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(output);
        let encoder = image::codecs::png::PngEncoder::new(&mut writer);

        let (buffer, color_type) = match image.format() {
            PixelFormat::Rgb8 => (image.to_rgb_bytes(), image::ExtendedColorType::Rgb8),
            PixelFormat::Rgba8 => (image.to_rgba_bytes(), image::ExtendedColorType::Rgba8),
        };

        encoder
            .write_image(&buffer, image.width(), image.height(), color_type)
            .map_err(|source| AssayError::Encode {
                path: path.to_path_buf(),
                source,
            })?;

        // Dropping a BufWriter discards flush errors, so the tail of the file is flushed here.
        writer.flush().map_err(|source| AssayError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::image_helper::*;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::core_modules::raster::raster::{Image, PixelFormat};
    use crate::error::AssayError;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gray_assay_{}_{}", std::process::id(), name))
    }

    fn gradient(format: PixelFormat) -> Image {
        Image::from_fn(40, 30, format, |x, y| {
            Pixel::new((x * 6) as u8, (y * 8) as u8, ((x + y) * 3) as u8, (255 - x) as u8)
        })
    }

    #[test]
    fn save_and_reload_rgba_gradient() {
        let path = scratch_path("rgba_gradient.png");
        let image = gradient(PixelFormat::Rgba8);

        save(&image, &path).expect("Error Saving File.");
        let reloaded = load(&path).expect("Error Loading File.");
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.format(), PixelFormat::Rgba8);
        assert_eq!(reloaded, image);
    }

    #[test]
    fn rgb_images_are_written_without_alpha() {
        let path = scratch_path("rgb_gradient.png");
        let image = gradient(PixelFormat::Rgb8);

        save(&image, &path).expect("Error Saving File.");
        let reloaded = load(&path).expect("Error Loading File.");
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.format(), PixelFormat::Rgb8);
        assert!(reloaded.pixels().iter().all(|p| p.alpha == 255));
        assert_eq!(reloaded, image);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let path = scratch_path("overwrite.png");
        let white = Image::from_fn(2, 2, PixelFormat::Rgb8, |_, _| Pixel::opaque(255, 255, 255));
        let black = Image::from_fn(3, 1, PixelFormat::Rgb8, |_, _| Pixel::opaque(0, 0, 0));

        save(&white, &path).expect("Error Saving File.");
        save(&black, &path).expect("Error Saving File.");
        let reloaded = load(&path).expect("Error Loading File.");
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded, black);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let result = load(scratch_path("does_not_exist.png"));
        assert!(matches!(result, Err(AssayError::Decode { .. })));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let path = scratch_path("garbage.png");
        std::fs::write(&path, [0xFFu8, 0xFE, 0x00, 0x01]).expect("scratch write");
        let result = load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AssayError::Decode { .. })));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_final_write_is_an_io_error() {
        // Every write to /dev/full fails with ENOSPC; a small PNG only reaches it on flush.
        let image = Image::from_fn(4, 4, PixelFormat::Rgb8, |_, _| Pixel::opaque(1, 2, 3));
        let result = save(&image, "/dev/full");
        assert!(matches!(result, Err(AssayError::Io { .. })), "{:?}", result);
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let path = scratch_path("no_such_dir").join("out.png");
        let image = gradient(PixelFormat::Rgba8);
        assert!(matches!(save(&image, &path), Err(AssayError::Io { .. })));
    }
}
