//! Central error types for imgedit-bench.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("unsupported quantization backend: {0}")]
    UnsupportedBackend(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invocation requires at least one input image")]
    NoInputImage,

    #[error("benchmark requires at least one timed run")]
    NoSamples,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("report serialization error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
