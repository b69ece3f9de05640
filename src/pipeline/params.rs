//! Invocation parameters and output for one pipeline call.

use image::RgbImage;

/// Keyword-style parameters for one edit inference.
#[derive(Debug, Clone)]
pub struct InvocationParams {
    /// Input images to edit; the demo pipeline uses the first.
    pub images: Vec<RgbImage>,
    pub prompt: String,
    pub negative_prompt: String,
    /// Plain guidance multiplier applied to the predicted update.
    pub guidance_scale: f32,
    /// Classifier-free guidance mix between conditioned and unconditioned
    /// predictions.
    pub true_cfg_scale: f32,
    pub num_inference_steps: usize,
    /// Seed for the noise generator; `None` means nondeterministic.
    pub seed: Option<u64>,
}

impl Default for InvocationParams {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            prompt: String::new(),
            negative_prompt: " ".to_string(),
            guidance_scale: 1.0,
            true_cfg_scale: 4.0,
            num_inference_steps: 4,
            seed: None,
        }
    }
}

impl InvocationParams {
    /// One-image edit with the default guidance scales.
    pub fn edit(image: RgbImage, prompt: &str, steps: usize) -> Self {
        Self {
            images: vec![image],
            prompt: prompt.to_string(),
            num_inference_steps: steps,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub images: Vec<RgbImage>,
}
