//! Dense sigmoid layer.

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Logistic activation `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// A fully connected layer with sigmoid activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Weight matrix (`input_size` × `output_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Layer {
    /// Creates a new layer with weights and biases drawn uniformly from [-1, 1].
    pub fn new_random<R: Rng + ?Sized>(input_size: usize, output_size: usize, rng: &mut R) -> Self {
        let weights = Array2::from_shape_fn((input_size, output_size), |_| {
            rng.random_range(-1.0..=1.0)
        });
        let biases = Array1::from_shape_fn(output_size, |_| rng.random_range(-1.0..=1.0));
        Self { weights, biases }
    }

    /// Number of inputs the layer expects.
    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of activations the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Performs forward pass with sigmoid activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.dot(&self.weights);
        output += &self.biases;
        output.mapv_inplace(sigmoid);
        output
    }

    /// Perturbs each weight, then each bias, with probability `rate` by a
    /// uniform amount in `[-amount, amount]`, clamping the result to [-1, 1].
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, amount: f32, rng: &mut R) {
        let mut perturb = |value: f32| {
            if rng.random::<f32>() < rate {
                let delta = if amount > 0.0 {
                    rng.random_range(-amount..=amount)
                } else {
                    0.0
                };
                (value + delta).clamp(-1.0, 1.0)
            } else {
                value
            }
        };
        self.weights.mapv_inplace(&mut perturb);
        self.biases.mapv_inplace(&mut perturb);
    }
}
