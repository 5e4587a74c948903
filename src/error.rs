//! Error types for layer passes and architecture loading.

use thiserror::Error;

/// Errors raised by layer forward/backward passes and parameter setup.
///
/// All of these indicate a composition or programming error on the caller's side.
/// None of them are retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerError {
    #[error("Invalid mode '{0}': expected one of 'forward', 'backward'")]
    InvalidMode(String),

    #[error("{layer} layer is not ready: {reason}")]
    UninitializedState {
        layer: &'static str,
        reason: &'static str,
    },

    #[error("{layer} layer shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        layer: &'static str,
        what: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("{layer} layer received an empty input of shape {shape:?}")]
    EmptyInput {
        layer: &'static str,
        shape: (usize, usize),
    },

    #[error("Input feature count must be greater than 0, got {0}")]
    InvalidFeatureCount(usize),
}

pub type Result<T> = std::result::Result<T, LayerError>;

/// Errors raised while loading, validating or building an architecture config.
#[derive(Error, Debug)]
pub enum ArchitectureError {
    #[error("Failed to read architecture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse architecture JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}", format_invalid(.index, .message))]
    Invalid {
        index: Option<usize>,
        message: String,
    },

    #[error("Layer construction failed: {0}")]
    Layer(#[from] LayerError),
}

fn format_invalid(index: &Option<usize>, message: &str) -> String {
    match index {
        Some(i) => format!("Layer {}: {}", i, message),
        None => message.to_string(),
    }
}

impl ArchitectureError {
    pub(crate) fn invalid(index: Option<usize>, message: impl Into<String>) -> Self {
        ArchitectureError::Invalid {
            index,
            message: message.into(),
        }
    }
}
