//! Softmax activation layer
//!
//! Forward turns each column (sample) into a probability distribution over the
//! feature axis. Backward applies the softmax Jacobian dA/dZ, which is a full
//! `[neurons, neurons]` matrix rather than a diagonal mask:
//!
//! - diagonal:     dA_i/dZ_i = A_i (1 - A_i)
//! - off-diagonal: dA_i/dZ_j = -A_i A_j
//!
//! # Batch-shared Jacobian
//!
//! Backward builds ONE Jacobian for the whole batch and applies it to every
//! sample's gradient:
//!
//! - the diagonal term is averaged over the batch,
//! - the off-diagonal term is `-A · Aᵀ`, which sums `-A_i A_j` over the batch,
//! - then `dZ = J · dA`.
//!
//! For a batch of one this is the exact Jacobian-vector product. For larger
//! batches it is an approximation that differs from per-sample Jacobians, and is
//! only benign directly ahead of a cross-entropy style loss. Training behaviour
//! depends on it, so it is kept as is and locked in by tests.

use crate::error::{LayerError, Result};
use crate::layers::{ensure_non_empty, ensure_shape, Layer, Matrix};
use log::trace;
use ndarray::Axis;
use std::fmt;

const NAME: &str = "Softmax";

/// Column-wise softmax with no parameters.
#[derive(Debug, Clone, Default)]
pub struct Softmax {
    layer_output: Option<Matrix>,
}

impl Softmax {
    pub fn new() -> Self {
        Self::default()
    }

    /// The batch-shared Jacobian for cached output `activation` (`[n, m]` -> `[n, n]`).
    fn batch_jacobian(activation: &Matrix) -> Result<Matrix> {
        let diag = activation
            .mapv(|a| a * (1.0 - a))
            .mean_axis(Axis(1))
            .ok_or(LayerError::EmptyInput {
                layer: NAME,
                shape: activation.dim(),
            })?;

        // -A·Aᵀ accumulates over the batch; its diagonal is replaced by the mean term
        let mut jacobian = -activation.dot(&activation.t());
        jacobian.diag_mut().assign(&diag);
        Ok(jacobian)
    }
}

impl Layer for Softmax {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        ensure_non_empty(NAME, input)?;

        // Subtract each column's max so exp never overflows; softmax is shift invariant
        let column_max = input
            .fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &z| acc.max(z))
            .insert_axis(Axis(0));
        let exp = (input - &column_max).mapv(f64::exp);
        let column_sum = exp.sum_axis(Axis(0)).insert_axis(Axis(0));
        let activation = exp / &column_sum;

        trace!("Softmax forward: {:?}", activation.dim());
        self.layer_output = Some(activation.clone());
        Ok(activation)
    }

    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix> {
        let activation = self.layer_output.as_ref().ok_or(LayerError::UninitializedState {
            layer: NAME,
            reason: "backward called without a preceding forward",
        })?;
        ensure_shape(NAME, "output gradient", activation.dim(), grad_output.dim())?;

        let jacobian = Self::batch_jacobian(activation)?;
        let grad_input = jacobian.dot(grad_output);
        ensure_shape(NAME, "input gradient", grad_output.dim(), grad_input.dim())?;

        trace!("Softmax backward: {:?}", grad_input.dim());
        self.layer_output = None;
        Ok(grad_input)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn parameter_count(&self) -> usize {
        0
    }
}

impl fmt::Display for Softmax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer: {}", NAME)
    }
}
