//! Layer trait definition for feedforward layers
//!
//! This module defines the core Layer trait that all layer types implement,
//! along with the `Pass` selector for the single dual-purpose entry point.

use crate::error::{LayerError, Result};
use crate::layers::Matrix;
use std::fmt;
use std::str::FromStr;

/// Which direction a layer call runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Forward,
    Backward,
}

impl FromStr for Pass {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Pass::Forward),
            "backward" => Ok(Pass::Backward),
            _ => Err(LayerError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Forward => write!(f, "forward"),
            Pass::Backward => write!(f, "backward"),
        }
    }
}

/// Core trait for feedforward layers.
///
/// Every array is oriented `[features, batch]`: one row per feature, one column
/// per sample. That orientation is the only thing a layer may assume about its
/// neighbours.
///
/// # Example
///
/// ```ignore
/// // Forward caches what backward needs
/// let output = layer.forward(&input)?;
///
/// // Backward reads (and consumes) that cache
/// let grad_input = layer.backward(&grad_output)?;
/// ```
pub trait Layer {
    /// Forward propagation through the layer.
    ///
    /// Computes the layer output from `input` and caches whatever the next
    /// backward call needs. Calling forward again before backward simply
    /// overwrites the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is not initialised or `input` has the wrong shape.
    fn forward(&mut self, input: &Matrix) -> Result<Matrix>;

    /// Backward propagation through the layer.
    ///
    /// Takes the gradient of the loss w.r.t. this layer's output and returns the
    /// gradient w.r.t. its input. Parametric layers also overwrite their stored
    /// parameter gradients.
    ///
    /// # Errors
    ///
    /// Returns `UninitializedState` if there is no cached forward pass, and
    /// `ShapeMismatch` if `grad_output` or a computed gradient has the wrong shape.
    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix>;

    /// Run the pass selected by `pass`.
    fn call(&mut self, input_or_grad: &Matrix, pass: Pass) -> Result<Matrix> {
        match pass {
            Pass::Forward => self.forward(input_or_grad),
            Pass::Backward => self.backward(input_or_grad),
        }
    }

    /// Short layer name used in errors and display output.
    fn name(&self) -> &'static str;

    /// Get the number of trainable parameters in the layer.
    fn parameter_count(&self) -> usize;
}
