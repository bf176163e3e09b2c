// THEORY:
// The `pipeline` module is the top-level API of the engine. `GrayscaleTransformer`
// wraps the core modules behind one easy-to-use interface: load a photo, convert it
// with one of the nine formulas, save it, and read a concentration estimate off the
// converted image.
//
// Every transform takes `&Image` and returns a fresh `Image`, so callers never see
// their own data change under them. A caller that wants to overwrite its handle
// assigns the result back.

use crate::core_modules::concentration::concentration;
use crate::core_modules::statistics::statistics;
use crate::core_modules::utils::image_helper::image_helper;
use crate::error::Result;
use std::path::Path;

// Re-export key data structures for the public API.
pub use crate::core_modules::concentration::concentration::{CONCENTRATION_BANDS, ConcentrationEstimate};
pub use crate::core_modules::formula::formula::GrayscaleFormula;
pub use crate::core_modules::pixel::pixel::{GrayLevel, Pixel};
pub use crate::core_modules::raster::raster::{Image, PixelFormat};

/// Configuration for the GrayscaleTransformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformerConfig {
    /// Formula used by `apply` and `analyze`.
    pub formula: GrayscaleFormula,
    /// Layout of images produced by `duplicate_default` and `analyze`.
    pub output_format: PixelFormat,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            formula: GrayscaleFormula::LuminanceWeighted601,
            output_format: PixelFormat::Rgba8,
        }
    }
}

/// Result of running the full assay on one photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssayReport {
    pub formula: GrayscaleFormula,
    /// Mean red channel of the converted image.
    pub mean: u32,
    pub estimate: ConcentrationEstimate,
    /// The converted image the mean was read from.
    pub image: Image,
}

/// The main, top-level struct for the grayscale engine.
#[derive(Debug, Clone, Default)]
pub struct GrayscaleTransformer {
    config: TransformerConfig,
}

impl GrayscaleTransformer {
    pub fn new(config: TransformerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Image> {
        let path = path.as_ref();
        log::info!("loading {}", path.display());
        image_helper::load(path)
    }

    pub fn save<P: AsRef<Path>>(&self, image: &Image, path: P) -> Result<()> {
        let path = path.as_ref();
        log::info!(
            "saving {}x{} image to {}",
            image.width(),
            image.height(),
            path.display()
        );
        image_helper::save(image, path)
    }

    /// Converts every pixel of `image` with `formula`.
    pub fn transform(&self, formula: GrayscaleFormula, image: &Image) -> Image {
        log::debug!(
            "applying {} to {}x{} image",
            formula,
            image.width(),
            image.height()
        );
        image.map_pixels(|pixel| formula.apply(pixel))
    }

    /// Converts with the configured formula.
    pub fn apply(&self, image: &Image) -> Image {
        self.transform(self.config.formula, image)
    }

    pub fn averaging(&self, image: &Image) -> Image {
        self.transform(GrayscaleFormula::Averaging, image)
    }

    pub fn luminance_601(&self, image: &Image) -> Image {
        self.transform(GrayscaleFormula::LuminanceWeighted601, image)
    }

    pub fn luminance_709(&self, image: &Image) -> Image {
        self.transform(GrayscaleFormula::LuminanceWeighted709, image)
    }

    pub fn desaturation(&self, image: &Image) -> Image {
        self.transform(GrayscaleFormula::Desaturation, image)
    }

    pub fn decomposition_max(&self, image: &Image) -> Image {
        self.transform(GrayscaleFormula::DecompositionMax, image)
    }

    pub fn decomposition_min(&self, image: &Image) -> Image {
        self.transform(GrayscaleFormula::DecompositionMin, image)
    }

    pub fn single_channel_red(&self, image: &Image) -> Image {
        self.transform(GrayscaleFormula::SingleChannelRed, image)
    }

    pub fn single_channel_green(&self, image: &Image) -> Image {
        self.transform(GrayscaleFormula::SingleChannelGreen, image)
    }

    pub fn single_channel_blue(&self, image: &Image) -> Image {
        self.transform(GrayscaleFormula::SingleChannelBlue, image)
    }

    /// Independent copy of `image` laid out as `format`.
    pub fn duplicate(&self, image: &Image, format: PixelFormat) -> Image {
        image.duplicate(format)
    }

    /// Independent copy laid out as the configured output format.
    pub fn duplicate_default(&self, image: &Image) -> Image {
        image.duplicate(self.config.output_format)
    }

    pub fn mean_channel(&self, image: &Image) -> Result<u32> {
        statistics::mean_red_channel(image)
    }

    pub fn estimate_concentration(&self, total: i64) -> ConcentrationEstimate {
        concentration::estimate_concentration(total)
    }

    /// Converts `image` with the configured formula and reads the estimate off the result.
    pub fn analyze(&self, image: &Image) -> Result<AssayReport> {
        let converted = self.apply(&self.duplicate_default(image));
        let mean = self.mean_channel(&converted)?;
        let estimate = self.estimate_concentration(i64::from(mean));
        log::info!(
            "{}: mean gray {} -> {}",
            self.config.formula,
            mean,
            estimate
        );

        Ok(AssayReport {
            formula: self.config.formula,
            mean,
            estimate,
            image: converted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn swatch(r: u8, g: u8, b: u8, width: u32, height: u32) -> Image {
        Image::from_fn(width, height, PixelFormat::Rgba8, |_, _| Pixel::new(r, g, b, 200))
    }

    #[test]
    fn every_transform_writes_gray_and_keeps_shape() {
        init_logging();
        let transformer = GrayscaleTransformer::default();
        let source = Image::from_fn(7, 5, PixelFormat::Rgba8, |x, y| {
            Pixel::new((x * 30) as u8, (y * 50) as u8, 90, (x + y) as u8)
        });

        let outputs = [
            transformer.averaging(&source),
            transformer.luminance_601(&source),
            transformer.luminance_709(&source),
            transformer.desaturation(&source),
            transformer.decomposition_max(&source),
            transformer.decomposition_min(&source),
            transformer.single_channel_red(&source),
            transformer.single_channel_green(&source),
            transformer.single_channel_blue(&source),
        ];

        for (formula, output) in GrayscaleFormula::ALL.into_iter().zip(outputs.iter()) {
            assert_eq!((output.width(), output.height()), (7, 5), "{}", formula);
            for (before, after) in source.pixels().iter().zip(output.pixels()) {
                assert!(after.red == after.green && after.green == after.blue, "{}", formula);
                assert_eq!(after.alpha, before.alpha, "{}", formula);
                assert_eq!(after.red, formula.gray_level(before), "{}", formula);
            }
            assert_eq!(*output, transformer.transform(formula, &source));
        }
    }

    #[test]
    fn transforms_do_not_touch_the_input() {
        let transformer = GrayscaleTransformer::default();
        let source = swatch(200, 100, 50, 3, 3);
        let before = source.clone();
        let gray = transformer.desaturation(&source);
        assert_eq!(source, before);
        assert_eq!(gray.pixel(0, 0), Some(Pixel::new(125, 125, 125, 200)));
    }

    #[test]
    fn duplicate_is_independent() {
        let transformer = GrayscaleTransformer::default();
        let source = swatch(1, 2, 3, 2, 2);
        let mut copy = transformer.duplicate(&source, PixelFormat::Rgba8);
        copy.set_pixel(0, 0, Pixel::new(9, 9, 9, 9)).expect("in bounds");
        assert_eq!(source.pixel(0, 0), Some(Pixel::new(1, 2, 3, 200)));
    }

    #[test]
    fn analyze_reads_mean_of_converted_image() {
        init_logging();
        let transformer = GrayscaleTransformer::new(TransformerConfig {
            formula: GrayscaleFormula::Averaging,
            output_format: PixelFormat::Rgb8,
        });
        // (200 + 130 + 102) / 3 = 144
        let report = transformer.analyze(&swatch(200, 130, 102, 4, 4)).expect("non-empty");
        assert_eq!(report.mean, 144);
        assert_eq!(report.estimate, ConcentrationEstimate::Level(30));
        assert_eq!(report.formula, GrayscaleFormula::Averaging);
        assert_eq!(report.image.format(), PixelFormat::Rgb8);
        assert!(report.image.pixels().iter().all(|p| p.alpha == 255));
    }

    #[test]
    fn analyze_rejects_empty_image() {
        let transformer = GrayscaleTransformer::default();
        let empty = Image::new(0, 0, PixelFormat::Rgba8, Vec::new()).expect("0x0");
        assert!(transformer.analyze(&empty).is_err());
        assert_eq!(transformer.transform(GrayscaleFormula::Averaging, &empty), empty);
    }

    #[test]
    fn estimate_delegates_to_table() {
        let transformer = GrayscaleTransformer::default();
        assert_eq!(transformer.estimate_concentration(130), ConcentrationEstimate::Level(60));
        assert_eq!(transformer.estimate_concentration(100), ConcentrationEstimate::Undeterminable);
    }

    #[test]
    fn load_transform_save_round_trip() {
        init_logging();
        let transformer = GrayscaleTransformer::default();
        let path = std::env::temp_dir().join(format!("gray_assay_pipeline_{}.png", std::process::id()));
        let source = swatch(10, 200, 30, 5, 4);

        let gray = transformer.decomposition_max(&source);
        transformer.save(&gray, &path).expect("Error Saving File.");
        let reloaded = transformer.load(&path).expect("Error Loading File.");
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded, gray);
        assert_eq!(transformer.mean_channel(&reloaded).ok(), Some(200));
    }
}
