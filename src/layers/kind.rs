//! Closed set of layer variants.
//!
//! Sequences of layers hold `LayerKind` values so one collection can mix dense
//! and activation layers without trait objects.

use crate::error::Result;
use crate::layers::{Dense, Layer, Matrix, Relu, Softmax};
use std::fmt;

#[derive(Debug, Clone)]
pub enum LayerKind {
    Dense(Dense),
    Relu(Relu),
    Softmax(Softmax),
}

impl LayerKind {
    /// The wrapped dense layer, for reading gradients.
    pub fn as_dense(&self) -> Option<&Dense> {
        match self {
            LayerKind::Dense(dense) => Some(dense),
            _ => None,
        }
    }

    /// The wrapped dense layer, for updating parameters.
    pub fn as_dense_mut(&mut self) -> Option<&mut Dense> {
        match self {
            LayerKind::Dense(dense) => Some(dense),
            _ => None,
        }
    }
}

impl Layer for LayerKind {
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        match self {
            LayerKind::Dense(layer) => layer.forward(input),
            LayerKind::Relu(layer) => layer.forward(input),
            LayerKind::Softmax(layer) => layer.forward(input),
        }
    }

    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix> {
        match self {
            LayerKind::Dense(layer) => layer.backward(grad_output),
            LayerKind::Relu(layer) => layer.backward(grad_output),
            LayerKind::Softmax(layer) => layer.backward(grad_output),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LayerKind::Dense(layer) => layer.name(),
            LayerKind::Relu(layer) => layer.name(),
            LayerKind::Softmax(layer) => layer.name(),
        }
    }

    fn parameter_count(&self) -> usize {
        match self {
            LayerKind::Dense(layer) => layer.parameter_count(),
            LayerKind::Relu(layer) => layer.parameter_count(),
            LayerKind::Softmax(layer) => layer.parameter_count(),
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Dense(layer) => fmt::Display::fmt(layer, f),
            LayerKind::Relu(layer) => fmt::Display::fmt(layer, f),
            LayerKind::Softmax(layer) => fmt::Display::fmt(layer, f),
        }
    }
}

impl From<Dense> for LayerKind {
    fn from(layer: Dense) -> Self {
        LayerKind::Dense(layer)
    }
}

impl From<Relu> for LayerKind {
    fn from(layer: Relu) -> Self {
        LayerKind::Relu(layer)
    }
}

impl From<Softmax> for LayerKind {
    fn from(layer: Softmax) -> Self {
        LayerKind::Softmax(layer)
    }
}
