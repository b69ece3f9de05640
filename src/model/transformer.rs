//! Edit-transformer denoiser: residual stack of linear layers over a
//! flattened latent, conditioned on a prompt embedding and a timestep.

use crate::errors::BenchError;
use crate::kernels::{mat_vec_mul_f32, mat_vec_mul_int8, Int8Matrix};
use crate::model::{ComputeDtype, EditConfig};
use crate::quantization::quantize_int8;

/// A linear projection, either full precision or INT8-quantized.
#[derive(Debug, Clone)]
pub enum Linear {
    F32 {
        /// Row-major `[rows, cols]`.
        weights: Vec<f32>,
        rows: usize,
        cols: usize,
    },
    Int8(Int8Matrix),
}

impl Linear {
    pub fn f32(weights: Vec<f32>, rows: usize, cols: usize) -> Self {
        debug_assert_eq!(weights.len(), rows * cols);
        Linear::F32 {
            weights,
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            Linear::F32 { rows, .. } => *rows,
            Linear::Int8(m) => m.rows(),
        }
    }

    pub fn cols(&self) -> usize {
        match self {
            Linear::F32 { cols, .. } => *cols,
            Linear::Int8(m) => m.cols(),
        }
    }

    pub fn is_quantized(&self) -> bool {
        matches!(self, Linear::Int8(_))
    }

    /// Full-precision weights, if not quantized.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Linear::F32 { weights, .. } => Some(weights),
            Linear::Int8(_) => None,
        }
    }

    /// `output = W * input`. Lengths must match `rows`/`cols`.
    pub fn forward(&self, input: &[f32], output: &mut [f32]) {
        match self {
            Linear::F32 { weights, .. } => mat_vec_mul_f32(weights, input, output),
            Linear::Int8(m) => mat_vec_mul_int8(m, input, output),
        }
    }

    /// Replace full-precision weights with their INT8 quantization. No-op if
    /// already quantized.
    pub fn quantize_in_place(&mut self, threshold: f32) {
        if let Linear::F32 {
            weights,
            rows,
            cols,
        } = self
        {
            let quantized = quantize_int8(weights, *rows, *cols, threshold);
            *self = Linear::Int8(quantized);
        }
    }

    /// Round full-precision weights through bf16 precision (round-to-nearest
    /// mantissa truncation). No-op on quantized weights.
    pub fn round_to_bf16(&mut self) {
        if let Linear::F32 { weights, .. } = self {
            for w in weights.iter_mut() {
                *w = f32::from_bits(w.to_bits().wrapping_add(0x8000) & 0xffff_0000);
            }
        }
    }

    /// Reported storage bytes under the given compute dtype.
    pub fn memory_usage(&self, dtype: ComputeDtype) -> usize {
        match self {
            Linear::F32 { weights, .. } => weights.len() * dtype.bytes_per_param(),
            Linear::Int8(m) => m.memory_usage(),
        }
    }
}

/// One residual layer: mixing projection, feed-forward projection, norm gain.
#[derive(Debug, Clone)]
pub struct EditLayer {
    pub attn: Linear,
    pub ffn: Linear,
    pub norm: Vec<f32>,
}

/// The denoiser the quantization policy targets as `"transformer"`.
#[derive(Debug, Clone)]
pub struct EditTransformer {
    pub config: EditConfig,
    /// latent -> hidden
    pub encode: Linear,
    /// prompt embedding -> hidden
    pub prompt_proj: Linear,
    pub layers: Vec<EditLayer>,
    /// hidden -> latent
    pub decode: Linear,
}

impl EditTransformer {
    /// One denoise step: predict the update direction for `latent` under the
    /// prompt conditioning at `timestep` in [0, 1].
    pub fn forward(
        &self,
        latent: &[f32],
        prompt_emb: &[f32],
        timestep: f32,
    ) -> Result<Vec<f32>, BenchError> {
        let latent_len = self.config.latent_len();
        if latent.len() != latent_len {
            return Err(BenchError::DimensionMismatch {
                expected: latent_len,
                actual: latent.len(),
            });
        }
        if prompt_emb.len() != self.config.prompt_dim {
            return Err(BenchError::DimensionMismatch {
                expected: self.config.prompt_dim,
                actual: prompt_emb.len(),
            });
        }

        let hidden = self.config.hidden_size;
        let mut h = vec![0.0f32; hidden];
        self.encode.forward(latent, &mut h);

        let mut cond = vec![0.0f32; hidden];
        self.prompt_proj.forward(prompt_emb, &mut cond);
        for (hv, cv) in h.iter_mut().zip(&cond) {
            *hv += cv + 0.1 * timestep;
        }

        let mut mixed = vec![0.0f32; hidden];
        let mut ffn_out = vec![0.0f32; hidden];
        for layer in &self.layers {
            let normed = rms_norm(&h, &layer.norm);
            layer.attn.forward(&normed, &mut mixed);
            for v in mixed.iter_mut() {
                *v = silu(*v);
            }
            layer.ffn.forward(&mixed, &mut ffn_out);
            for (hv, fv) in h.iter_mut().zip(&ffn_out) {
                *hv += fv;
            }
        }

        let mut out = vec![0.0f32; latent_len];
        self.decode.forward(&h, &mut out);
        Ok(out)
    }

    /// Quantize every linear projection in place.
    pub fn quantize(&mut self, threshold: f32) {
        self.encode.quantize_in_place(threshold);
        self.prompt_proj.quantize_in_place(threshold);
        for layer in &mut self.layers {
            layer.attn.quantize_in_place(threshold);
            layer.ffn.quantize_in_place(threshold);
        }
        self.decode.quantize_in_place(threshold);
    }

    /// Round every full-precision projection through bf16 precision.
    pub fn round_to_bf16(&mut self) {
        self.encode.round_to_bf16();
        self.prompt_proj.round_to_bf16();
        for layer in &mut self.layers {
            layer.attn.round_to_bf16();
            layer.ffn.round_to_bf16();
        }
        self.decode.round_to_bf16();
    }

    /// Named linear projections, for per-layer reporting.
    pub fn named_linears(&self) -> Vec<(String, &Linear)> {
        let mut out = vec![
            ("encode".to_string(), &self.encode),
            ("prompt_proj".to_string(), &self.prompt_proj),
        ];
        for (i, layer) in self.layers.iter().enumerate() {
            out.push((format!("layer_{}.attn", i), &layer.attn));
            out.push((format!("layer_{}.ffn", i), &layer.ffn));
        }
        out.push(("decode".to_string(), &self.decode));
        out
    }

    /// Reported weight bytes under the given compute dtype.
    pub fn memory_usage(&self, dtype: ComputeDtype) -> usize {
        let mut bytes = self.encode.memory_usage(dtype)
            + self.prompt_proj.memory_usage(dtype)
            + self.decode.memory_usage(dtype);
        for layer in &self.layers {
            bytes += layer.attn.memory_usage(dtype) + layer.ffn.memory_usage(dtype);
            bytes += layer.norm.len() * 4;
        }
        bytes
    }
}

fn silu(x: f32) -> f32 {
    x / (1.0 + (-x).exp())
}

fn rms_norm(x: &[f32], gain: &[f32]) -> Vec<f32> {
    let mean_sq = x.iter().map(|v| v * v).sum::<f32>() / x.len().max(1) as f32;
    let inv_rms = 1.0 / (mean_sq + 1e-6).sqrt();
    x.iter()
        .zip(gain)
        .map(|(v, g)| v * inv_rms * g)
        .collect()
}
