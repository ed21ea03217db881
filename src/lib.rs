/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Crate error type
pub mod error;

/// Exploration policies
pub mod exploration;

/// Testing environments
pub mod gym;

mod util;

pub use error::{Error, Result};
