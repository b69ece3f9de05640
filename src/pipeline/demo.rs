//! Demo edit pipeline: latent encode, iterative denoise with true-CFG
//! mixing, latent decode. Deterministic under a fixed seed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::device::Device;
use crate::errors::BenchError;
use crate::model::{ComputeDtype, EditTransformer};
use crate::pipeline::{EditPipeline, InvocationParams, PipelineOutput};

/// Amount of seeded noise mixed into the initial latent.
const INIT_NOISE: f32 = 0.1;

/// Loaded, possibly quantized, ready-to-invoke edit pipeline.
#[derive(Debug)]
pub struct DemoEditPipeline {
    transformer: EditTransformer,
    device: Device,
    dtype: ComputeDtype,
    weight_bytes: u64,
    peak_bytes: AtomicU64,
}

impl DemoEditPipeline {
    pub fn new(transformer: EditTransformer, device: Device, dtype: ComputeDtype) -> Self {
        let weight_bytes = transformer.memory_usage(dtype) as u64;
        Self {
            transformer,
            device,
            dtype,
            weight_bytes,
            peak_bytes: AtomicU64::new(weight_bytes),
        }
    }

    pub fn transformer(&self) -> &EditTransformer {
        &self.transformer
    }

    pub fn dtype(&self) -> ComputeDtype {
        self.dtype
    }

    /// Encode an image to the flattened latent grid: resize to the latent
    /// side, mean-channel luminance mapped to [-1, 1].
    fn encode_image(&self, image: &RgbImage) -> Vec<f32> {
        let side = self.transformer.config.latent_size as u32;
        let small = imageops::resize(image, side, side, FilterType::Triangle);
        small
            .pixels()
            .map(|Rgb([r, g, b])| {
                let luma = (*r as f32 + *g as f32 + *b as f32) / (3.0 * 255.0);
                luma * 2.0 - 1.0
            })
            .collect()
    }

    /// Decode the latent back to an RGB image at the input's dimensions.
    fn decode_latent(&self, latent: &[f32], width: u32, height: u32) -> RgbImage {
        let side = self.transformer.config.latent_size as u32;
        let mut small = RgbImage::new(side, side);
        for (i, px) in small.pixels_mut().enumerate() {
            let v = ((latent[i] + 1.0) * 0.5 * 255.0).clamp(0.0, 255.0) as u8;
            *px = Rgb([v, v, v]);
        }
        imageops::resize(&small, width, height, FilterType::Triangle)
    }

    /// Deterministic prompt embedding: hash the text, expand with a seeded RNG.
    fn prompt_embedding(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());
        (0..self.transformer.config.prompt_dim)
            .map(|_| rng.gen_range(-1.0f32..1.0))
            .collect()
    }

    fn record_activation_peak(&self, image_bytes: u64) {
        let cfg = &self.transformer.config;
        // Latent plus the three step buffers, hidden scratch, and both
        // resize buffers.
        let activations = (cfg.latent_len() * 4 * 4 + cfg.hidden_size * 4 * 4) as u64
            + cfg.latent_len() as u64 * 3
            + image_bytes * 2;
        self.peak_bytes
            .fetch_max(self.weight_bytes + activations, Ordering::Relaxed);
    }
}

impl EditPipeline for DemoEditPipeline {
    fn device(&self) -> Device {
        self.device
    }

    fn synchronize(&self) {
        // CPU backend: invoke returns only after all work is done.
    }

    fn invoke(&self, params: &InvocationParams) -> Result<PipelineOutput, BenchError> {
        let image = params.images.first().ok_or(BenchError::NoInputImage)?;
        let (width, height) = image.dimensions();
        self.record_activation_peak(width as u64 * height as u64 * 3);

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random::<u64>()),
        };

        let mut latent = self.encode_image(image);
        for v in latent.iter_mut() {
            *v += rng.gen_range(-INIT_NOISE..INIT_NOISE);
        }

        let prompt_emb = self.prompt_embedding(&params.prompt);
        let neg_emb = self.prompt_embedding(&params.negative_prompt);

        let steps = params.num_inference_steps.max(1);
        let dt = 1.0 / steps as f32;
        for step in 0..steps {
            let t = 1.0 - step as f32 * dt;
            let cond = self.transformer.forward(&latent, &prompt_emb, t)?;
            let uncond = self.transformer.forward(&latent, &neg_emb, t)?;
            for (i, v) in latent.iter_mut().enumerate() {
                let update = uncond[i] + params.true_cfg_scale * (cond[i] - uncond[i]);
                *v = (*v - dt * params.guidance_scale * update).clamp(-3.0, 3.0);
            }
        }

        let out = self.decode_latent(&latent, width, height);
        Ok(PipelineOutput { images: vec![out] })
    }

    fn peak_allocated_bytes(&self) -> u64 {
        self.peak_bytes.load(Ordering::Relaxed)
    }
}
