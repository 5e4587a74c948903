//! Dense (fully connected) layer implementation
//!
//! This module provides a `Dense` layer that computes the preactivation
//! `Z = W · A_prev + b` over `[features, batch]` arrays, and its backward pass.
//!
//! Parameter shapes depend on the previous layer's width, which the layer
//! cannot know at construction. Parameters therefore go through an explicit
//! two-phase lifecycle: `Pending` until both weights and bias are initialised,
//! then `Ready`.

use crate::error::{LayerError, Result};
use crate::layers::{ensure_non_empty, ensure_shape, Layer, Matrix};
use crate::utils::SimpleRng;
use log::{debug, trace};
use ndarray::{Array2, Axis};
use std::fmt;

/// Default magnitude hint for weight initialization.
pub const DEFAULT_WEIGHT_INIT_SCALE: f64 = 0.01;

const NAME: &str = "Dense";

/// Materialized parameters and their gradients.
#[derive(Debug, Clone)]
struct DenseParameters {
    weights: Matrix,
    bias: Matrix,
    grad_weights: Matrix,
    grad_bias: Matrix,
}

#[derive(Debug, Clone)]
enum ParameterState {
    /// Hyperparameters only; either half may already be drawn.
    Pending {
        weights: Option<Matrix>,
        bias: Option<Matrix>,
    },
    Ready(DenseParameters),
}

/// Input cached by forward for exactly one backward call.
#[derive(Debug, Clone)]
struct ForwardCache {
    layer_input: Matrix,
    batch_size: usize,
}

/// Dense (fully connected) layer with weights and biases.
///
/// Performs the affine transformation `y = W · x + b` where x is the input
/// (input_feature_count × batch_size), W is the weight matrix
/// (neuron_count × input_feature_count), and b is a bias column
/// (neuron_count × 1) broadcast across the batch.
///
/// # Example
///
/// ```ignore
/// use feedforward_layers::layers::{Dense, Layer};
/// use feedforward_layers::utils::SimpleRng;
///
/// let mut rng = SimpleRng::new(42);
/// let mut layer = Dense::new(4, 0.01);
/// layer.initialise(3, &mut rng)?;
/// let z = layer.forward(&x)?;        // x: [3, m] -> z: [4, m]
/// let dx = layer.backward(&dz)?;     // dz: [4, m] -> dx: [3, m]
/// let dw = layer.grad_weights()?;    // [4, 3]
/// ```
#[derive(Debug, Clone)]
pub struct Dense {
    neuron_count: usize,
    weight_init_scale: f64,
    state: ParameterState,
    cache: Option<ForwardCache>,
}

impl Dense {
    /// Create a dense layer with `neuron_count` outputs and no parameters yet.
    ///
    /// # Panics
    ///
    /// Panics if `neuron_count` is 0 or `weight_init_scale` is not a positive finite number.
    pub fn new(neuron_count: usize, weight_init_scale: f64) -> Self {
        assert!(neuron_count > 0, "neuron_count must be greater than 0");
        assert!(
            weight_init_scale.is_finite() && weight_init_scale > 0.0,
            "weight_init_scale must be positive and finite"
        );

        Self {
            neuron_count,
            weight_init_scale,
            state: ParameterState::Pending {
                weights: None,
                bias: None,
            },
            cache: None,
        }
    }

    /// Create a ready layer from explicit parameters.
    ///
    /// `weights` must be `[neuron_count, input_feature_count]` with at least one
    /// column, and `bias` must be `[neuron_count, 1]`. Gradients start at zero.
    pub fn with_parameters(weights: Matrix, bias: Matrix) -> Result<Self> {
        let (neuron_count, input_feature_count) = weights.dim();
        if input_feature_count == 0 {
            return Err(LayerError::InvalidFeatureCount(0));
        }
        ensure_non_empty(NAME, &weights)?;
        ensure_shape(NAME, "bias", (neuron_count, 1), bias.dim())?;

        let mut layer = Self::new(neuron_count, DEFAULT_WEIGHT_INIT_SCALE);
        layer.state = ParameterState::Ready(DenseParameters {
            grad_weights: Array2::zeros(weights.raw_dim()),
            grad_bias: Array2::zeros(bias.raw_dim()),
            weights,
            bias,
        });
        Ok(layer)
    }

    /// Draw He-initialized weights for `input_feature_count` inputs.
    ///
    /// Samples are standard normal scaled by `sqrt(2 / input_feature_count)`.
    /// Also zeroes `grad_weights`. On an already ready layer this re-draws the
    /// weights and drops any cached forward pass.
    pub fn initialise_weights(&mut self, input_feature_count: usize, rng: &mut SimpleRng) -> Result<()> {
        if input_feature_count == 0 {
            return Err(LayerError::InvalidFeatureCount(input_feature_count));
        }

        // He initialisation keeps ReLU activations from dying out at the start
        let stdev_he = (2.0 / input_feature_count as f64).sqrt();
        let weights = Array2::from_shape_simple_fn((self.neuron_count, input_feature_count), || {
            rng.next_gaussian() * stdev_he
        });

        debug!(
            "Dense: initialised weights {:?} with He stdev {:.6}",
            weights.dim(),
            stdev_he
        );

        let state = std::mem::replace(
            &mut self.state,
            ParameterState::Pending {
                weights: None,
                bias: None,
            },
        );
        self.state = match state {
            ParameterState::Pending { bias: Some(bias), .. } => {
                ParameterState::Ready(DenseParameters::new(weights, bias))
            }
            ParameterState::Pending { bias: None, .. } => ParameterState::Pending {
                weights: Some(weights),
                bias: None,
            },
            ParameterState::Ready(params) => {
                ParameterState::Ready(DenseParameters::new(weights, params.bias))
            }
        };
        self.cache = None;
        Ok(())
    }

    /// Zero-initialize the bias column (and `grad_bias`).
    pub fn initialise_bias(&mut self) {
        let bias = Array2::zeros((self.neuron_count, 1));

        let state = std::mem::replace(
            &mut self.state,
            ParameterState::Pending {
                weights: None,
                bias: None,
            },
        );
        self.state = match state {
            ParameterState::Pending { weights: Some(weights), .. } => {
                ParameterState::Ready(DenseParameters::new(weights, bias))
            }
            ParameterState::Pending { weights: None, .. } => ParameterState::Pending {
                weights: None,
                bias: Some(bias),
            },
            ParameterState::Ready(params) => {
                ParameterState::Ready(DenseParameters::new(params.weights, bias))
            }
        };
        self.cache = None;
    }

    /// Initialise weights then bias.
    pub fn initialise(&mut self, input_feature_count: usize, rng: &mut SimpleRng) -> Result<()> {
        self.initialise_weights(input_feature_count, rng)?;
        self.initialise_bias();
        Ok(())
    }

    pub fn neuron_count(&self) -> usize {
        self.neuron_count
    }

    pub fn weight_init_scale(&self) -> f64 {
        self.weight_init_scale
    }

    /// Number of input features, known once weights exist.
    pub fn input_feature_count(&self) -> Option<usize> {
        match &self.state {
            ParameterState::Ready(params) => Some(params.weights.ncols()),
            ParameterState::Pending {
                weights: Some(weights),
                ..
            } => Some(weights.ncols()),
            ParameterState::Pending { weights: None, .. } => None,
        }
    }

    pub fn is_initialised(&self) -> bool {
        matches!(self.state, ParameterState::Ready(_))
    }

    /// Batch size of the cached forward pass, if any.
    pub fn batch_size(&self) -> Option<usize> {
        self.cache.as_ref().map(|cache| cache.batch_size)
    }

    pub fn weights(&self) -> Result<&Matrix> {
        Ok(&self.ready()?.weights)
    }

    pub fn bias(&self) -> Result<&Matrix> {
        Ok(&self.ready()?.bias)
    }

    /// Gradient of the loss w.r.t. the weights from the last backward call.
    pub fn grad_weights(&self) -> Result<&Matrix> {
        Ok(&self.ready()?.grad_weights)
    }

    /// Gradient of the loss w.r.t. the bias from the last backward call.
    pub fn grad_bias(&self) -> Result<&Matrix> {
        Ok(&self.ready()?.grad_bias)
    }

    /// Mutable `(weights, bias)` for an optimizer to update in place.
    pub fn parameters_mut(&mut self) -> Result<(&mut Matrix, &mut Matrix)> {
        let params = self.ready_mut()?;
        Ok((&mut params.weights, &mut params.bias))
    }

    /// Replace the weights with an array of the same shape.
    pub fn set_weights(&mut self, weights: Matrix) -> Result<()> {
        let params = self.ready_mut()?;
        ensure_shape(NAME, "weights", params.weights.dim(), weights.dim())?;
        params.weights = weights;
        Ok(())
    }

    /// Replace the bias with an array of the same shape.
    pub fn set_bias(&mut self, bias: Matrix) -> Result<()> {
        let params = self.ready_mut()?;
        ensure_shape(NAME, "bias", params.bias.dim(), bias.dim())?;
        params.bias = bias;
        Ok(())
    }

    fn ready(&self) -> Result<&DenseParameters> {
        match &self.state {
            ParameterState::Ready(params) => Ok(params),
            ParameterState::Pending { .. } => Err(not_initialised()),
        }
    }

    fn ready_mut(&mut self) -> Result<&mut DenseParameters> {
        match &mut self.state {
            ParameterState::Ready(params) => Ok(params),
            ParameterState::Pending { .. } => Err(not_initialised()),
        }
    }
}

impl DenseParameters {
    fn new(weights: Matrix, bias: Matrix) -> Self {
        Self {
            grad_weights: Array2::zeros(weights.raw_dim()),
            grad_bias: Array2::zeros(bias.raw_dim()),
            weights,
            bias,
        }
    }
}

fn not_initialised() -> LayerError {
    LayerError::UninitializedState {
        layer: NAME,
        reason: "weights and bias not initialised",
    }
}

impl Layer for Dense {
    /// Z_l = W_l · A_(l-1) + b_l, caching A_(l-1) and the batch size.
    fn forward(&mut self, input: &Matrix) -> Result<Matrix> {
        let params = match &self.state {
            ParameterState::Ready(params) => params,
            ParameterState::Pending { .. } => return Err(not_initialised()),
        };

        ensure_non_empty(NAME, input)?;
        let (input_features, batch_size) = input.dim();
        ensure_shape(
            NAME,
            "input",
            (params.weights.ncols(), batch_size),
            (input_features, batch_size),
        )?;

        // bias broadcasts across the batch columns
        let preactivation = params.weights.dot(input) + &params.bias;

        trace!(
            "Dense forward: {:?} -> {:?}",
            input.dim(),
            preactivation.dim()
        );

        self.cache = Some(ForwardCache {
            layer_input: input.clone(),
            batch_size,
        });

        Ok(preactivation)
    }

    /// Given dZ_l, stores dW_l and db_l averaged over the batch and returns dA_(l-1).
    fn backward(&mut self, grad_output: &Matrix) -> Result<Matrix> {
        let params = match &mut self.state {
            ParameterState::Ready(params) => params,
            ParameterState::Pending { .. } => return Err(not_initialised()),
        };
        let cache = self.cache.as_ref().ok_or(LayerError::UninitializedState {
            layer: NAME,
            reason: "backward called without a preceding forward",
        })?;
        ensure_shape(
            NAME,
            "output gradient",
            (self.neuron_count, cache.batch_size),
            grad_output.dim(),
        )?;

        let scale = 1.0 / cache.batch_size as f64;

        // dW = (1/m) dZ · A_prevᵀ; the matmul sums over samples
        let grad_weights = grad_output.dot(&cache.layer_input.t()) * scale;
        ensure_shape(NAME, "weight gradient", params.weights.dim(), grad_weights.dim())?;

        // db = (1/m) Σ_samples dZ, kept as a column
        let grad_bias = grad_output.sum_axis(Axis(1)).insert_axis(Axis(1)) * scale;
        ensure_shape(NAME, "bias gradient", params.bias.dim(), grad_bias.dim())?;

        // dA_prev = Wᵀ · dZ
        let grad_input = params.weights.t().dot(grad_output);
        ensure_shape(NAME, "input gradient", cache.layer_input.dim(), grad_input.dim())?;

        params.grad_weights = grad_weights;
        params.grad_bias = grad_bias;
        self.cache = None;

        trace!(
            "Dense backward: {:?} -> {:?}",
            grad_output.dim(),
            grad_input.dim()
        );

        Ok(grad_input)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn parameter_count(&self) -> usize {
        match &self.state {
            ParameterState::Ready(params) => params.weights.len() + params.bias.len(),
            ParameterState::Pending { .. } => 0,
        }
    }
}

impl fmt::Display for Dense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Layer: {}", NAME)?;
        match &self.state {
            ParameterState::Ready(params) => write!(
                f,
                "Weights shape: {:?}. Bias shape: {:?}. # trainable params: {}",
                params.weights.dim(),
                params.bias.dim(),
                self.parameter_count()
            ),
            ParameterState::Pending { .. } => write!(f, "Weights and bias not initialised yet."),
        }
    }
}
