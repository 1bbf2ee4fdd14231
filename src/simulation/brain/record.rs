//! Persisted form of a [`Brain`].

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Brain, Layer};

/// Errors raised when restoring a brain from its persisted form.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The record declares an empty layer.
    #[error("brain topology must have non-zero layer sizes")]
    EmptyTopology,
    /// An array does not match the declared topology.
    #[error("{field} has {found} entries, expected {expected}")]
    ShapeMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// Length required by the topology.
        expected: usize,
        /// Length found in the record.
        found: usize,
    },
    /// The brain is valid but not usable as a car driver.
    #[error("brain topology {found:?} does not match {expected:?}")]
    TopologyMismatch {
        /// Required `(inputs, hidden, outputs)`.
        expected: (usize, usize, usize),
        /// Actual `(inputs, hidden, outputs)`.
        found: (usize, usize, usize),
    },
    /// Matrix construction failed.
    #[error("invalid matrix shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
    /// The record is not valid JSON.
    #[error("malformed brain record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat, language-neutral record of a brain.
///
/// Matrices are stored row-major as nested arrays: `weights_input_hidden`
/// has `input_count` rows of `hidden_count` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrainRecord {
    /// Number of inputs.
    pub input_count: usize,
    /// Number of hidden units.
    pub hidden_count: usize,
    /// Number of outputs.
    pub output_count: usize,
    /// Input to hidden weights.
    pub weights_input_hidden: Vec<Vec<f32>>,
    /// Hidden biases.
    pub bias_hidden: Vec<f32>,
    /// Hidden to output weights.
    pub weights_hidden_output: Vec<Vec<f32>>,
    /// Output biases.
    pub bias_output: Vec<f32>,
}

fn matrix_rows(matrix: &Array2<f32>) -> Vec<Vec<f32>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

fn matrix_from_rows(
    rows: Vec<Vec<f32>>,
    nrows: usize,
    ncols: usize,
    field: &'static str,
) -> Result<Array2<f32>, BrainError> {
    if rows.len() != nrows {
        return Err(BrainError::ShapeMismatch {
            field,
            expected: nrows,
            found: rows.len(),
        });
    }
    if let Some(row) = rows.iter().find(|row| row.len() != ncols) {
        return Err(BrainError::ShapeMismatch {
            field,
            expected: ncols,
            found: row.len(),
        });
    }
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Ok(Array2::from_shape_vec((nrows, ncols), flat)?)
}

fn vector(values: Vec<f32>, len: usize, field: &'static str) -> Result<Array1<f32>, BrainError> {
    if values.len() == len {
        Ok(Array1::from_vec(values))
    } else {
        Err(BrainError::ShapeMismatch {
            field,
            expected: len,
            found: values.len(),
        })
    }
}

impl From<&Brain> for BrainRecord {
    fn from(brain: &Brain) -> Self {
        let (input_count, hidden_count, output_count) = brain.topology();
        Self {
            input_count,
            hidden_count,
            output_count,
            weights_input_hidden: matrix_rows(&brain.hidden.weights),
            bias_hidden: brain.hidden.biases.to_vec(),
            weights_hidden_output: matrix_rows(&brain.output.weights),
            bias_output: brain.output.biases.to_vec(),
        }
    }
}

impl From<Brain> for BrainRecord {
    fn from(brain: Brain) -> Self {
        Self::from(&brain)
    }
}

impl TryFrom<BrainRecord> for Brain {
    type Error = BrainError;

    fn try_from(record: BrainRecord) -> Result<Self, Self::Error> {
        let BrainRecord {
            input_count,
            hidden_count,
            output_count,
            weights_input_hidden,
            bias_hidden,
            weights_hidden_output,
            bias_output,
        } = record;

        if input_count == 0 || hidden_count == 0 || output_count == 0 {
            return Err(BrainError::EmptyTopology);
        }

        let hidden = Layer {
            weights: matrix_from_rows(
                weights_input_hidden,
                input_count,
                hidden_count,
                "weightsInputHidden",
            )?,
            biases: vector(bias_hidden, hidden_count, "biasHidden")?,
        };
        let output = Layer {
            weights: matrix_from_rows(
                weights_hidden_output,
                hidden_count,
                output_count,
                "weightsHiddenOutput",
            )?,
            biases: vector(bias_output, output_count, "biasOutput")?,
        };

        Ok(Brain { hidden, output })
    }
}
