//! Neural network implementation for car brains.
//!
//! A brain is a two-layer sigmoid perceptron with a fixed topology. It is
//! evolved purely by mutation and selection, and persisted through the flat
//! [`BrainRecord`] form.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::params::ConfigError;

pub mod layer;
pub mod record;

pub use layer::Layer;
pub use record::{BrainError, BrainRecord};

/// Brain inputs: seven sensor closenesses plus normalized speed.
pub const INPUT_COUNT: usize = 8;
/// Hidden units.
pub const HIDDEN_COUNT: usize = 8;
/// Outputs: steer, throttle, brake.
pub const OUTPUT_COUNT: usize = 3;

/// Hidden and output activations of one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activations {
    /// Hidden layer activations.
    pub hidden: Array1<f32>,
    /// Output layer activations.
    pub outputs: Array1<f32>,
}

/// Feed-forward network that drives a car.
///
/// Cloning is a deep copy; no weight storage is ever shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BrainRecord", into = "BrainRecord")]
pub struct Brain {
    /// Input to hidden layer.
    pub hidden: Layer,
    /// Hidden to output layer.
    pub output: Layer,
}

impl Brain {
    /// Creates a brain with the given topology and uniform random weights.
    pub fn new_random<R: Rng + ?Sized>(
        input_count: usize,
        hidden_count: usize,
        output_count: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        if input_count == 0 || hidden_count == 0 || output_count == 0 {
            return Err(ConfigError::Invalid("brain layers must be non-empty"));
        }
        Ok(Self::with_layers(input_count, hidden_count, output_count, rng))
    }

    /// Creates a random brain with the driving topology (8 → 8 → 3).
    pub fn driver<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_layers(INPUT_COUNT, HIDDEN_COUNT, OUTPUT_COUNT, rng)
    }

    fn with_layers<R: Rng + ?Sized>(
        input_count: usize,
        hidden_count: usize,
        output_count: usize,
        rng: &mut R,
    ) -> Self {
        let hidden = Layer::new_random(input_count, hidden_count, rng);
        let output = Layer::new_random(hidden_count, output_count, rng);
        Self { hidden, output }
    }

    /// Returns `(inputs, hidden, outputs)`.
    pub fn topology(&self) -> (usize, usize, usize) {
        (
            self.hidden.input_size(),
            self.hidden.output_size(),
            self.output.output_size(),
        )
    }

    /// Runs a forward pass through the brain.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` does not match the input count.
    #[inline]
    pub fn predict(&self, inputs: &Array1<f32>) -> Activations {
        let hidden = self.hidden.forward(inputs);
        let outputs = self.output.forward(&hidden);
        Activations { hidden, outputs }
    }

    /// Mutates every weight and bias independently.
    ///
    /// Each value is perturbed with probability `rate` by a uniform amount in
    /// `[-amount, amount]` and clamped to [-1, 1].
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, amount: f32, rng: &mut R) {
        self.hidden.mutate(rate, amount, rng);
        self.output.mutate(rate, amount, rng);
    }

    /// Flattens all weights and biases into a single vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::new();
        for layer in [&self.hidden, &self.output] {
            flat.extend(layer.weights.iter().copied());
            flat.extend(layer.biases.iter().copied());
        }
        flat
    }

    /// Serializes the brain to its persisted JSON form.
    pub fn to_json(&self) -> Result<String, BrainError> {
        Ok(serde_json::to_string(&BrainRecord::from(self))?)
    }

    /// Parses a persisted brain, validating its shape.
    pub fn from_json(json: &str) -> Result<Self, BrainError> {
        let record: BrainRecord = serde_json::from_str(json)?;
        Self::try_from(record)
    }

    /// Parses a persisted driving brain, falling back to a fresh random one
    /// if the record is malformed or has the wrong topology.
    pub fn from_json_or_random<R: Rng + ?Sized>(json: &str, rng: &mut R) -> Self {
        match Self::from_json(json).and_then(Self::expect_driver) {
            Ok(brain) => brain,
            Err(err) => {
                warn!(%err, "rejected persisted brain, substituting a random one");
                Self::driver(rng)
            }
        }
    }

    /// Checks that the brain has the driving topology.
    pub fn expect_driver(self) -> Result<Self, BrainError> {
        let found = self.topology();
        let expected = (INPUT_COUNT, HIDDEN_COUNT, OUTPUT_COUNT);
        if found == expected {
            Ok(self)
        } else {
            Err(BrainError::TopologyMismatch { expected, found })
        }
    }
}
