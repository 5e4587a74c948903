//! Layer abstractions for feedforward networks
//!
//! This module provides the Layer trait and the three layer types: `Dense`,
//! `Relu` and `Softmax`, plus `LayerKind`, the closed set of all of them.

mod r#trait;
pub mod dense;
pub mod kind;
pub mod relu;
pub mod softmax;

pub use dense::{Dense, DEFAULT_WEIGHT_INIT_SCALE};
pub use kind::LayerKind;
pub use r#trait::{Layer, Pass};
pub use relu::Relu;
pub use softmax::Softmax;

use crate::error::{LayerError, Result};

/// Two-dimensional array oriented `[features, batch]`.
pub type Matrix = ndarray::Array2<f64>;

pub(crate) fn ensure_shape(
    layer: &'static str,
    what: &'static str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(LayerError::ShapeMismatch {
            layer,
            what,
            expected,
            actual,
        })
    }
}

pub(crate) fn ensure_non_empty(layer: &'static str, input: &Matrix) -> Result<()> {
    if input.is_empty() {
        Err(LayerError::EmptyInput {
            layer,
            shape: input.dim(),
        })
    } else {
        Ok(())
    }
}
