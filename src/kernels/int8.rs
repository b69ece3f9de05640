//! Row-quantized INT8 matrix and CPU mat-vec kernels.

use rayon::prelude::*;

/// Row-major INT8 matrix with one absmax scale per output row.
///
/// Rows whose absolute maximum exceeded the quantization threshold are kept
/// in full precision and stored sparsely; their packed bytes are zero and
/// their scale is unused.
#[derive(Debug, Clone)]
pub struct Int8Matrix {
    data: Vec<i8>,
    scales: Vec<f32>,
    /// Full-precision outlier rows, sorted by row index.
    outlier_rows: Vec<(usize, Vec<f32>)>,
    rows: usize,
    cols: usize,
}

impl Int8Matrix {
    /// Assemble from pre-quantized parts. `data` is row-major `rows * cols`,
    /// `scales` has one entry per row, `outlier_rows` must be sorted.
    pub fn from_parts(
        data: Vec<i8>,
        scales: Vec<f32>,
        outlier_rows: Vec<(usize, Vec<f32>)>,
        rows: usize,
        cols: usize,
    ) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        debug_assert_eq!(scales.len(), rows);
        debug_assert!(outlier_rows.windows(2).all(|w| w[0].0 < w[1].0));
        Self {
            data,
            scales,
            outlier_rows,
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows kept in full precision.
    pub fn outlier_count(&self) -> usize {
        self.outlier_rows.len()
    }

    pub fn outlier_row(&self, row: usize) -> Option<&[f32]> {
        self.outlier_rows
            .binary_search_by_key(&row, |(r, _)| *r)
            .ok()
            .map(|i| self.outlier_rows[i].1.as_slice())
    }

    pub fn scale(&self, row: usize) -> f32 {
        self.scales[row]
    }

    /// Dequantized value at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f32 {
        if let Some(vals) = self.outlier_row(row) {
            return vals[col];
        }
        self.data[row * self.cols + col] as f32 * self.scales[row]
    }

    /// Bytes of storage: packed i8 data, per-row scales, and f32 outlier rows.
    pub fn memory_usage(&self) -> usize {
        self.data.len()
            + self.scales.len() * 4
            + self.outlier_rows.len() * (self.cols * 4 + std::mem::size_of::<usize>())
    }
}

/// Mat-vec for an INT8 matrix: `output[row] = sum_col w[row,col] * input[col]`,
/// parallel over rows. Quantized rows accumulate in i32-ish f32 then apply the
/// row scale once; outlier rows take the full-precision path.
pub fn mat_vec_mul_int8(weight: &Int8Matrix, input: &[f32], output: &mut [f32]) {
    debug_assert_eq!(input.len(), weight.cols);
    debug_assert_eq!(output.len(), weight.rows);

    let cols = weight.cols;
    output.par_iter_mut().enumerate().for_each(|(row, out)| {
        if let Some(vals) = weight.outlier_row(row) {
            *out = vals.iter().zip(input).map(|(w, x)| w * x).sum();
            return;
        }
        let scale = weight.scales[row];
        let start = row * cols;
        let mut sum = 0.0f32;
        for (j, &x) in input.iter().enumerate() {
            sum += weight.data[start + j] as f32 * x;
        }
        *out = sum * scale;
    });
}

/// Full-precision reference mat-vec over a row-major `[rows, cols]` slice.
pub fn mat_vec_mul_f32(weight: &[f32], input: &[f32], output: &mut [f32]) {
    let cols = input.len();
    debug_assert_eq!(weight.len(), output.len() * cols);

    output.par_iter_mut().enumerate().for_each(|(row, out)| {
        let start = row * cols;
        let mut sum = 0.0f32;
        for (j, &x) in input.iter().enumerate() {
            sum += weight[start + j] * x;
        }
        *out = sum;
    });
}
