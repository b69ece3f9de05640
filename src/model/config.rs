//! Edit-transformer configuration.

use std::fmt;
use std::str::FromStr;

/// Configuration for the edit-transformer denoiser.
#[derive(Debug, Clone)]
pub struct EditConfig {
    /// Side of the square latent grid the input image is encoded to.
    pub latent_size: usize,
    /// Hidden dimension of the transformer stack.
    pub hidden_size: usize,
    /// Number of residual layers.
    pub num_layers: usize,
    /// Dimension of the prompt embedding.
    pub prompt_dim: usize,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            latent_size: 64,
            hidden_size: 256,
            num_layers: 4,
            prompt_dim: 64,
        }
    }
}

impl EditConfig {
    /// Flattened latent length.
    pub fn latent_len(&self) -> usize {
        self.latent_size * self.latent_size
    }
}

/// Compute dtype requested at load time. `Bf16` rounds full-precision weights
/// through bf16 (mantissa truncation) and reports two bytes per parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeDtype {
    F32,
    Bf16,
}

impl ComputeDtype {
    /// Bytes per full-precision parameter when reporting memory footprints.
    pub fn bytes_per_param(&self) -> usize {
        match self {
            ComputeDtype::F32 => 4,
            ComputeDtype::Bf16 => 2,
        }
    }
}

impl fmt::Display for ComputeDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeDtype::F32 => write!(f, "f32"),
            ComputeDtype::Bf16 => write!(f, "bf16"),
        }
    }
}

impl FromStr for ComputeDtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f32" | "fp32" => Ok(ComputeDtype::F32),
            "bf16" => Ok(ComputeDtype::Bf16),
            other => Err(format!("unknown dtype: {}", other)),
        }
    }
}
