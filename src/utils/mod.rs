//! Shared utilities for layer implementations
//!
//! Currently the seedable random source used for weight initialization.

pub mod rng;

pub use rng::SimpleRng;
