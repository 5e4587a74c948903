//! Feedforward Layers Library
//!
//! Composable neural network layers with explicit forward and backward passes.
//! Each layer caches what it needs during `forward` and consumes that cache in
//! `backward`, returning the gradient w.r.t. its input.
//!
//! All arrays are `[features, batch]`: features as rows, samples as columns.
//!
//! # Modules
//!
//! - `layers`: Layer trait and implementations (Dense, Relu, Softmax)
//! - `architecture`: JSON layer-stack configuration and construction
//! - `error`: Error types
//! - `utils`: Seedable random source for weight initialization
//!
//! # Example
//!
//! ```
//! use feedforward_layers::layers::{Dense, Layer, Relu};
//! use feedforward_layers::utils::SimpleRng;
//! use ndarray::array;
//!
//! let mut rng = SimpleRng::new(42);
//! let mut dense = Dense::new(2, 0.01);
//! dense.initialise(3, &mut rng).unwrap();
//! let mut relu = Relu::new();
//!
//! let x = array![[1.0], [2.0], [3.0]];
//! let a = relu.forward(&dense.forward(&x).unwrap()).unwrap();
//! assert_eq!(a.dim(), (2, 1));
//!
//! let da = array![[1.0], [1.0]];
//! let dx = dense.backward(&relu.backward(&da).unwrap()).unwrap();
//! assert_eq!(dx.dim(), (3, 1));
//! assert_eq!(dense.grad_weights().unwrap().dim(), (2, 3));
//! ```

pub mod architecture;
pub mod error;
pub mod layers;
pub mod utils;

pub use error::{ArchitectureError, LayerError, Result};
