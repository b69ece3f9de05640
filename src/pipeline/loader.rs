//! Pretrained pipeline factory: resolve a model id, apply the quantization
//! policy, return a ready-to-invoke pipeline.

use tracing::{info, warn};

use crate::device::Device;
use crate::errors::BenchError;
use crate::model::{
    create_demo_transformer_seeded, ComputeDtype, EditConfig, DEMO_MODEL_ID, DEMO_WEIGHTS_SEED,
};
use crate::pipeline::{DemoEditPipeline, EditPipeline};
use crate::quantization::{QuantizationConfig, DEFAULT_BACKEND};

/// Load a pipeline by model id with the given quantization policy and
/// compute dtype.
///
/// Unknown component names in the policy are skipped with a warning; an
/// unknown model id or backend is an error. Requesting an accelerator
/// without a compiled-in backend falls back to CPU with a warning.
pub fn load_pretrained(
    model_id: &str,
    quantization: &QuantizationConfig,
    dtype: ComputeDtype,
    device: Device,
) -> Result<DemoEditPipeline, BenchError> {
    if model_id != DEMO_MODEL_ID {
        return Err(BenchError::ModelLoad(format!(
            "unknown model id: {} (expected {})",
            model_id, DEMO_MODEL_ID
        )));
    }
    if !quantization.components.is_empty() && quantization.backend != DEFAULT_BACKEND {
        return Err(BenchError::UnsupportedBackend(quantization.backend.clone()));
    }

    let device = if device.is_accelerated() {
        warn!("no accelerator backend compiled in, falling back to cpu");
        Device::Cpu
    } else {
        device
    };

    let mut transformer = create_demo_transformer_seeded(DEMO_WEIGHTS_SEED, EditConfig::default());
    if dtype == ComputeDtype::Bf16 {
        transformer.round_to_bf16();
    }

    for component in &quantization.components {
        match component.as_str() {
            "transformer" => {
                info!(
                    "quantizing transformer to int8 (threshold {})",
                    quantization.threshold
                );
                transformer.quantize(quantization.threshold);
            }
            other => warn!("unknown component {:?} in quantization config, skipping", other),
        }
    }

    let pipeline = DemoEditPipeline::new(transformer, device, dtype);
    info!(
        "loaded {} on {} (dtype {}, weights {:.1} MB)",
        model_id,
        device,
        dtype,
        pipeline.peak_allocated_bytes() as f64 / 1e6
    );
    Ok(pipeline)
}
