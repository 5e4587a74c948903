//! Architecture configuration structures
//!
//! This module describes a feedforward stack as JSON and builds the layers from
//! it. Dense layers are initialised here with the width of whatever precedes
//! them, since a dense layer cannot know its input feature count on its own.
//!
//! Only construction lives here: running the sweeps, computing losses and
//! applying updates belong to the caller.

use crate::error::ArchitectureError;
use crate::layers::{Dense, LayerKind, Relu, Softmax, DEFAULT_WEIGHT_INIT_SCALE};
use crate::utils::rng::SimpleRng;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Seed used by [`ArchitectureConfig::rng`] when the config does not set one.
pub const DEFAULT_SEED: u64 = 42;

fn default_weight_init_scale() -> f64 {
    DEFAULT_WEIGHT_INIT_SCALE
}

/// Configuration for a single layer, tagged by `layer_type`.
///
/// # Examples
///
/// ```json
/// { "layer_type": "dense", "neurons": 128, "weight_init_scale": 0.01 }
/// ```
///
/// ```json
/// { "layer_type": "relu" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "layer_type", rename_all = "lowercase")]
pub enum LayerConfig {
    Dense {
        /// Number of neurons (output features)
        neurons: usize,
        /// Magnitude hint for weight initialization (default 0.01)
        #[serde(default = "default_weight_init_scale")]
        weight_init_scale: f64,
    },
    Relu,
    Softmax,
}

/// Configuration for the entire layer stack.
///
/// Layers are applied in the order they appear. `input_size` is the feature
/// count of the data fed into the first layer.
///
/// # Example
///
/// ```json
/// {
///   "input_size": 784,
///   "seed": 7,
///   "layers": [
///     { "layer_type": "dense", "neurons": 128 },
///     { "layer_type": "relu" },
///     { "layer_type": "dense", "neurons": 10 },
///     { "layer_type": "softmax" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArchitectureConfig {
    /// Number of input features to the first layer
    pub input_size: usize,

    /// Seed for weight initialization
    #[serde(default)]
    pub seed: Option<u64>,

    /// Sequence of layer configurations defining the network structure
    pub layers: Vec<LayerConfig>,
}

impl ArchitectureConfig {
    /// A random source seeded from `seed`, or [`DEFAULT_SEED`].
    pub fn rng(&self) -> SimpleRng {
        SimpleRng::new(self.seed.unwrap_or(DEFAULT_SEED))
    }
}

/// Loads an architecture configuration from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the JSON is invalid, or the
/// configuration fails validation.
///
/// # Examples
///
/// ```no_run
/// use feedforward_layers::architecture::load_architecture;
///
/// let arch = load_architecture("config/mlp.json").unwrap();
/// assert!(!arch.layers.is_empty());
/// ```
pub fn load_architecture(path: impl AsRef<Path>) -> Result<ArchitectureConfig, ArchitectureError> {
    let contents = fs::read_to_string(path)?;
    parse_architecture(&contents)
}

/// Parses and validates an architecture configuration from a JSON string.
pub fn parse_architecture(json: &str) -> Result<ArchitectureConfig, ArchitectureError> {
    let config: ArchitectureConfig = serde_json::from_str(json)?;
    validate_architecture(&config)?;
    Ok(config)
}

/// Validates an architecture configuration.
///
/// Checks that:
/// - Architecture has at least one layer
/// - `input_size` is greater than 0
/// - Every dense layer has at least one neuron and a positive, finite init scale
pub fn validate_architecture(config: &ArchitectureConfig) -> Result<(), ArchitectureError> {
    if config.layers.is_empty() {
        return Err(ArchitectureError::invalid(
            None,
            "Architecture must have at least one layer",
        ));
    }
    if config.input_size == 0 {
        return Err(ArchitectureError::invalid(
            None,
            "input_size must be greater than 0",
        ));
    }

    for (i, layer) in config.layers.iter().enumerate() {
        validate_layer(layer, i)?;
    }

    Ok(())
}

fn validate_layer(layer: &LayerConfig, index: usize) -> Result<(), ArchitectureError> {
    if let LayerConfig::Dense {
        neurons,
        weight_init_scale,
    } = *layer
    {
        if neurons == 0 {
            return Err(ArchitectureError::invalid(
                Some(index),
                "neurons must be greater than 0",
            ));
        }
        if !(weight_init_scale.is_finite() && weight_init_scale > 0.0) {
            return Err(ArchitectureError::invalid(
                Some(index),
                format!(
                    "weight_init_scale must be positive and finite, got {}",
                    weight_init_scale
                ),
            ));
        }
    }
    Ok(())
}

/// Feature count produced by the last layer.
pub fn output_size(config: &ArchitectureConfig) -> usize {
    config
        .layers
        .iter()
        .fold(config.input_size, |features, layer| match layer {
            LayerConfig::Dense { neurons, .. } => *neurons,
            LayerConfig::Relu | LayerConfig::Softmax => features,
        })
}

/// Builds the layer stack described by `config`.
///
/// Each dense layer is initialised with the running feature count: the
/// configured `input_size` for the first, the previous dense layer's neuron
/// count after that. Activations keep the feature count unchanged.
///
/// # Examples
///
/// ```no_run
/// use feedforward_layers::architecture::{build_layers, load_architecture};
///
/// let config = load_architecture("config/mlp.json").unwrap();
/// let mut rng = config.rng();
/// let layers = build_layers(&config, &mut rng).unwrap();
/// assert_eq!(layers.len(), config.layers.len());
/// ```
pub fn build_layers(
    config: &ArchitectureConfig,
    rng: &mut SimpleRng,
) -> Result<Vec<LayerKind>, ArchitectureError> {
    validate_architecture(config)?;

    let mut layers = Vec::with_capacity(config.layers.len());
    let mut features = config.input_size;

    for (i, layer_config) in config.layers.iter().enumerate() {
        let layer = match *layer_config {
            LayerConfig::Dense {
                neurons,
                weight_init_scale,
            } => {
                let mut dense = Dense::new(neurons, weight_init_scale);
                dense.initialise(features, rng)?;
                debug!("Layer {}: dense {} -> {}", i, features, neurons);
                features = neurons;
                LayerKind::Dense(dense)
            }
            LayerConfig::Relu => LayerKind::Relu(Relu::new()),
            LayerConfig::Softmax => LayerKind::Softmax(Softmax::new()),
        };
        layers.push(layer);
    }

    debug!(
        "Built {} layers: {} -> {} features",
        layers.len(),
        config.input_size,
        features
    );

    Ok(layers)
}
