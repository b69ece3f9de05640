//! Post-training INT8 weight quantization.

mod absmax;
mod config;

pub use absmax::{dequantize_int8, quantization_rmse, quantize_int8};
pub use config::{QuantizationConfig, DEFAULT_BACKEND, DEFAULT_THRESHOLD};
