//! ReLU activation layer
//!
//! Forward: A = ReLU(Z). Backward: dZ = dA ⊙ ReLU'(Z), where ReLU'(Z) is the
//! binary mask 1 where Z > 0 and 0 elsewhere (including Z == 0).

use crate::error::{LayerError, Result};
use crate::layers::{ensure_shape, Layer, Matrix};
use log::trace;
use std::fmt;

const NAME: &str = "Relu";

/// Elementwise rectifier with no parameters.
///
/// Caches the activation rather than the preactivation: A is zero exactly where
/// ReLU' is zero, so it reproduces the mask.
#[derive(Debug, Clone, Default)]
pub struct Relu {
    layer_output: Option<Matrix>,
}

impl Relu {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for Relu {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let activation = input.mapv(|z| if z > 0.0 { z } else { 0.0 });
        trace!("Relu forward: {:?}", activation.dim());
        self.layer_output = Some(activation.clone());
        Ok(activation)
    }

    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix> {
        let activation = self.layer_output.as_ref().ok_or(LayerError::UninitializedState {
            layer: NAME,
            reason: "backward called without a preceding forward",
        })?;
        ensure_shape(NAME, "output gradient", activation.dim(), grad_output.dim())?;

        let mut grad_input = grad_output.clone();
        grad_input.zip_mut_with(activation, |g, &a| {
            if a <= 0.0 {
                *g = 0.0;
            }
        });
        ensure_shape(NAME, "input gradient", activation.dim(), grad_input.dim())?;

        trace!("Relu backward: {:?}", grad_input.dim());
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

impl fmt::Display for Relu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer: {}", NAME)
    }
}
