//! Edit-transformer model: configuration, layers, and the demo builder.

mod config;
mod demo;
mod transformer;

pub use config::{ComputeDtype, EditConfig};
pub use demo::{create_demo_transformer, create_demo_transformer_seeded, DEMO_MODEL_ID};
pub(crate) use demo::DEMO_WEIGHTS_SEED;
pub use transformer::{EditLayer, EditTransformer, Linear};
