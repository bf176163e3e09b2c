// THEORY:
// Every fallible operation in the engine reports through one enum. The pixel
// transforms themselves never fail. Errors come only from the edges of the system,
// and each variant names one of those edges.

use std::path::PathBuf;

/// Unified error type for the grayscale engine.
#[derive(Debug, thiserror::Error)]
pub enum AssayError {
    /// The file is missing or its content is not a decodable raster format.
    #[error("failed to decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The PNG encoder rejected the pixel data.
    #[error("failed to encode image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The destination could not be created or written.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The caller passed data the operation cannot work with (e.g. a zero-area image).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown grayscale formula `{0}`")]
    UnknownFormula(String),

    /// A band worker in the parallel transformer panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, AssayError>;
