//! AbsMax INT8 quantization: convert f32 weights to per-row i8 with scales.

use crate::kernels::Int8Matrix;

/// Quantize row-major `[rows, cols]` weights to INT8 with one absmax scale
/// per row: `scale = absmax / 127`, `q = round(w / scale)`.
///
/// Rows whose absolute maximum exceeds `threshold` are outliers and kept in
/// full precision, so large-magnitude rows never lose resolution to a coarse
/// scale. `weights.len()` beyond `rows * cols` is ignored.
pub fn quantize_int8(weights: &[f32], rows: usize, cols: usize, threshold: f32) -> Int8Matrix {
    let len = (rows * cols).min(weights.len());
    let mut data = vec![0i8; rows * cols];
    let mut scales = vec![0.0f32; rows];
    let mut outliers = Vec::new();

    for row in 0..rows {
        let start = row * cols;
        if start >= len {
            break;
        }
        let end = (start + cols).min(len);
        let src = &weights[start..end];
        let absmax = src.iter().map(|w| w.abs()).fold(0.0f32, f32::max);

        if absmax > threshold {
            let mut vals = vec![0.0f32; cols];
            vals[..src.len()].copy_from_slice(src);
            outliers.push((row, vals));
            continue;
        }

        let scale = absmax.max(1e-12) / 127.0;
        scales[row] = scale;
        for (j, &w) in src.iter().enumerate() {
            data[start + j] = (w / scale).round().clamp(-127.0, 127.0) as i8;
        }
    }

    Int8Matrix::from_parts(data, scales, outliers, rows, cols)
}

/// Dequantize back to a row-major f32 matrix.
pub fn dequantize_int8(matrix: &Int8Matrix) -> Vec<f32> {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    let mut out = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            out.push(matrix.get(row, col));
        }
    }
    out
}

/// RMSE between original and quantize-dequantized values.
pub fn quantization_rmse(original: &[f32], roundtripped: &[f32]) -> f32 {
    let n = original.len().min(roundtripped.len());
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f32 = original[..n]
        .iter()
        .zip(roundtripped[..n].iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    (sum_sq / n as f32).sqrt()
}
