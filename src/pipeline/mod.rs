//! Pipeline surface: the invokable trait, invocation parameters, the demo
//! edit pipeline, and the pretrained loader.

mod demo;
mod loader;
mod params;

pub use demo::DemoEditPipeline;
pub use loader::load_pretrained;
pub use params::{InvocationParams, PipelineOutput};

use crate::device::Device;
use crate::errors::BenchError;

/// An opaque invokable image-edit pipeline.
///
/// The benchmark harness depends only on this trait, so it can be exercised
/// against stubs. `synchronize` must block until all queued device work has
/// finished; on CPU backends it is a no-op and the harness never calls it.
pub trait EditPipeline {
    /// Device the pipeline computes on.
    fn device(&self) -> Device;

    /// Barrier: block until previously queued device work completes.
    fn synchronize(&self);

    /// Run one edit inference over the given parameters.
    fn invoke(&self, params: &InvocationParams) -> Result<PipelineOutput, BenchError>;

    /// Peak bytes allocated for weights and activations so far.
    fn peak_allocated_bytes(&self) -> u64;
}
