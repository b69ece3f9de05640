//! # imgedit-bench
//!
//! Wall-clock latency benchmark for an image-edit diffusion pipeline under
//! INT8 weight quantization.
//!
//! ## Architecture
//!
//! - **Quantization**: per-row absmax INT8 with full-precision outlier rows
//!   above a configurable threshold
//! - **Kernels**: rayon-parallel INT8 and f32 mat-vec
//! - **Pipeline**: an object-safe [`EditPipeline`] trait over an opaque
//!   invokable, with a small deterministic demo edit transformer behind it
//! - **Harness**: warmup passes, barrier-bracketed timed passes, mean/min/max
//!   aggregation, and a single catch-print-continue error boundary in the
//!   driver

pub mod bench;
pub mod device;
pub mod errors;
pub mod kernels;
pub mod model;
pub mod pipeline;
pub mod quantization;

pub use bench::{
    benchmark, execute, print_summary, synthetic_input, BenchOptions, BenchReport, RunOptions,
    RunSummary, WARMUP_RUNS,
};
pub use device::{Device, DEVICE_ENV_VAR};
pub use errors::BenchError;
pub use kernels::{mat_vec_mul_f32, mat_vec_mul_int8, Int8Matrix};
pub use model::{
    create_demo_transformer, create_demo_transformer_seeded, ComputeDtype, EditConfig,
    EditTransformer, Linear, DEMO_MODEL_ID,
};
pub use pipeline::{
    load_pretrained, DemoEditPipeline, EditPipeline, InvocationParams, PipelineOutput,
};
pub use quantization::{
    dequantize_int8, quantization_rmse, quantize_int8, QuantizationConfig, DEFAULT_THRESHOLD,
};
