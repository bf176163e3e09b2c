// THEORY:
// This file is the main entry point for the `gray_assay` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (like the `assay_tester` CLI).
//
// The primary goal is to export the `GrayscaleTransformer` and its associated data
// structures (`TransformerConfig`, `AssayReport`, etc.) as the clean, high-level
// interface for the engine. The per-pixel formulas, the image grid, the statistic
// and the calibration table live in `core_modules`, one concern per module.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use error::{AssayError, Result};
pub use parallel_pipeline::{ParallelConfig, ParallelTransformer};
pub use pipeline::{
    AssayReport, ConcentrationEstimate, GrayscaleFormula, GrayscaleTransformer, Image, Pixel,
    PixelFormat, TransformerConfig,
};
