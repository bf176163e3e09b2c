// THEORY:
// The parallel pipeline runs the same per-pixel formulas as `GrayscaleTransformer`,
// but splits the image into contiguous row bands and converts each band on its own
// blocking worker. No pixel depends on any other, so the bands need no coordination:
// they are joined in band order and stitched back into one image that is identical
// to the sequential result.

use crate::core_modules::statistics::statistics;
use crate::error::{AssayError, Result};
use crate::pipeline::{AssayReport, GrayscaleFormula, GrayscaleTransformer, Image, Pixel, TransformerConfig};
use futures::future::join_all;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    pub transformer: TransformerConfig,
    /// Number of row bands processed concurrently.
    pub workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            transformer: TransformerConfig::default(),
            workers: num_cpus::get(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParallelTransformer {
    config: ParallelConfig,
    sequential: GrayscaleTransformer,
}

impl ParallelTransformer {
    pub fn new(config: ParallelConfig) -> Self {
        Self {
            sequential: GrayscaleTransformer::new(config.transformer),
            config,
        }
    }

    pub fn workers(&self) -> usize {
        self.config.workers.max(1)
    }

    /// Converts `image` with `formula`, one row band per worker.
    pub async fn transform(&self, formula: GrayscaleFormula, image: &Image) -> Result<Image> {
        if image.is_empty() {
            return Ok(image.clone());
        }

        let width = image.width() as usize;
        let height = image.height() as usize;
        let rows_per_band = height.div_ceil(self.workers());
        log::debug!(
            "applying {} to {}x{} image in bands of {} rows",
            formula,
            width,
            height,
            rows_per_band
        );

        let workers = image.pixels().chunks(rows_per_band * width).map(|band| {
            let band = band.to_vec();
            tokio::task::spawn_blocking(move || {
                band.into_iter()
                    .map(|pixel| formula.apply(pixel))
                    .collect::<Vec<Pixel>>()
            })
        });

        let mut pixels = Vec::with_capacity(image.pixel_count());
        for band in join_all(workers).await {
            let band = band.map_err(|e| AssayError::Worker(e.to_string()))?;
            pixels.extend(band);
        }

        Image::new(image.width(), image.height(), image.format(), pixels)
    }

    /// Converts with the configured formula.
    pub async fn apply(&self, image: &Image) -> Result<Image> {
        self.transform(self.config.transformer.formula, image).await
    }

    /// Same as `GrayscaleTransformer::analyze`, with the conversion spread over the workers.
    pub async fn analyze(&self, image: &Image) -> Result<AssayReport> {
        let duplicated = self.sequential.duplicate_default(image);
        let converted = self.apply(&duplicated).await?;
        let mean = statistics::mean_red_channel(&converted)?;
        let estimate = self.sequential.estimate_concentration(i64::from(mean));
        log::info!(
            "{} ({} workers): mean gray {} -> {}",
            self.config.transformer.formula,
            self.workers(),
            mean,
            estimate
        );

        Ok(AssayReport {
            formula: self.config.transformer.formula,
            mean,
            estimate,
            image: converted,
        })
    }
}
