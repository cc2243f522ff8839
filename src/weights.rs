//! Xavier/Glorot-uniform weight generation. Layers carry no bias terms.

use rand::Rng;

use crate::normalize::INPUT_SIZE;

pub const HIDDEN1_SIZE: usize = 32;
pub const HIDDEN2_SIZE: usize = 24;
pub const HIDDEN3_SIZE: usize = 16;
pub const OUTPUT_SIZE: usize = 15;

/// Row-major `fan_in × fan_out` weights.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    pub fan_in: usize,
    pub fan_out: usize,
    pub values: Vec<f64>,
}

impl Matrix {
    pub fn filled(fan_in: usize, fan_out: usize, value: f64) -> Self {
        Self {
            fan_in,
            fan_out,
            values: vec![value; fan_in * fan_out],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.fan_out + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.fan_out..(row + 1) * self.fan_out]
    }

    /// Computes `input · self`. `input` must have `fan_in` entries.
    pub fn multiply(&self, input: &[f64]) -> Vec<f64> {
        debug_assert_eq!(input.len(), self.fan_in);
        let mut out = vec![0.0; self.fan_out];
        for (i, &x) in input.iter().enumerate() {
            for (o, &w) in out.iter_mut().zip(self.row(i)) {
                *o += x * w;
            }
        }
        out
    }
}

pub fn xavier_limit(fan_in: usize, fan_out: usize) -> f64 {
    (6.0 / (fan_in + fan_out) as f64).sqrt()
}

/// Draws every entry independently from U[-limit, +limit].
pub fn initialize<R: Rng + ?Sized>(fan_in: usize, fan_out: usize, rng: &mut R) -> Matrix {
    let limit = xavier_limit(fan_in, fan_out);
    let values = (0..fan_in * fan_out)
        .map(|_| rng.gen_range(-limit..=limit))
        .collect();
    Matrix {
        fan_in,
        fan_out,
        values,
    }
}

/// The four matrices of the prediction network, fixed for an engine's lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightSet {
    pub w1: Matrix,
    pub w2: Matrix,
    pub w3: Matrix,
    pub w4: Matrix,
}

impl WeightSet {
    pub const SHAPES: [(usize, usize); 4] = [
        (INPUT_SIZE, HIDDEN1_SIZE),
        (HIDDEN1_SIZE, HIDDEN2_SIZE),
        (HIDDEN2_SIZE, HIDDEN3_SIZE),
        (HIDDEN3_SIZE, OUTPUT_SIZE),
    ];

    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let [s1, s2, s3, s4] = Self::SHAPES;
        Self {
            w1: initialize(s1.0, s1.1, rng),
            w2: initialize(s2.0, s2.1, rng),
            w3: initialize(s3.0, s3.1, rng),
            w4: initialize(s4.0, s4.1, rng),
        }
    }

    /// Every weight set to `value`.
    pub fn constant(value: f64) -> Self {
        let [s1, s2, s3, s4] = Self::SHAPES;
        Self {
            w1: Matrix::filled(s1.0, s1.1, value),
            w2: Matrix::filled(s2.0, s2.1, value),
            w3: Matrix::filled(s3.0, s3.1, value),
            w4: Matrix::filled(s4.0, s4.1, value),
        }
    }

    pub fn layers(&self) -> [&Matrix; 4] {
        [&self.w1, &self.w2, &self.w3, &self.w4]
    }

    pub const WEIGHT_COUNT: usize = INPUT_SIZE * HIDDEN1_SIZE
        + HIDDEN1_SIZE * HIDDEN2_SIZE
        + HIDDEN2_SIZE * HIDDEN3_SIZE
        + HIDDEN3_SIZE * OUTPUT_SIZE;
}
