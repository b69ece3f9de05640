//! Build a small demo edit-transformer with random weights.

use super::{EditConfig, EditLayer, EditTransformer, Linear};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Model identifier the loader resolves to the built-in demo transformer.
pub const DEMO_MODEL_ID: &str = "demo/edit-transformer-small";

/// Fixed seed the loader uses so "pretrained" weights are reproducible.
pub(crate) const DEMO_WEIGHTS_SEED: u64 = 0xED17;

fn rand_linear(rng: &mut impl Rng, rows: usize, cols: usize) -> Linear {
    // 1/sqrt(cols) keeps activations stable through the residual stack.
    let scale = 1.0 / (cols.max(1) as f32).sqrt();
    let weights: Vec<f32> = (0..rows * cols)
        .map(|_| rng.gen_range(-1.0f32..1.0) * scale)
        .collect();
    Linear::f32(weights, rows, cols)
}

fn rand_norm(rng: &mut impl Rng, n: usize) -> Vec<f32> {
    (0..n).map(|_| rng.gen_range(0.9f32..=1.1)).collect()
}

/// Create a demo transformer with random weights.
pub fn create_demo_transformer() -> EditTransformer {
    create_demo_transformer_seeded(rand::random::<u64>(), EditConfig::default())
}

/// Create a deterministic demo transformer from a seed (for tests and the
/// loader's reproducible "pretrained" weights).
pub fn create_demo_transformer_seeded(seed: u64, config: EditConfig) -> EditTransformer {
    let mut rng = StdRng::seed_from_u64(seed);
    let hidden = config.hidden_size;
    let latent_len = config.latent_len();

    let layers = (0..config.num_layers)
        .map(|_| EditLayer {
            attn: rand_linear(&mut rng, hidden, hidden),
            ffn: rand_linear(&mut rng, hidden, hidden),
            norm: rand_norm(&mut rng, hidden),
        })
        .collect();

    EditTransformer {
        encode: rand_linear(&mut rng, hidden, latent_len),
        prompt_proj: rand_linear(&mut rng, hidden, config.prompt_dim),
        layers,
        decode: rand_linear(&mut rng, latent_len, hidden),
        config,
    }
}
