//! Matrix storage and mat-vec kernels for quantized and full-precision weights.

mod int8;

pub use int8::{mat_vec_mul_f32, mat_vec_mul_int8, Int8Matrix};
