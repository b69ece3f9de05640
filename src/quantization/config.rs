//! Quantization policy passed to the pipeline loader.

use serde::{Deserialize, Serialize};

/// The only backend this crate implements.
pub const DEFAULT_BACKEND: &str = "absmax_int8";

/// Rows with an absolute maximum above this stay in full precision.
pub const DEFAULT_THRESHOLD: f32 = 6.0;

/// Immutable quantization policy: which backend, its outlier threshold, and
/// which pipeline components to quantize. Built once at startup and handed
/// opaquely to the loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantizationConfig {
    pub backend: String,
    pub threshold: f32,
    pub components: Vec<String>,
}

impl Default for QuantizationConfig {
    fn default() -> Self {
        Self::int8(DEFAULT_THRESHOLD)
    }
}

impl QuantizationConfig {
    /// INT8 policy targeting the transformer submodule only.
    pub fn int8(threshold: f32) -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            threshold,
            components: vec!["transformer".to_string()],
        }
    }

    /// Policy that leaves every component in full precision.
    pub fn unquantized() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            threshold: DEFAULT_THRESHOLD,
            components: Vec::new(),
        }
    }
}
