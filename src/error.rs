//! Error types in bayesnet
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Malformed input, unknown names, shape mismatches or invalid hyperparameters
    #[error("{0}")]
    InvalidArgument(String),
    /// An operation was called in a state that does not allow it
    #[error("{0}")]
    Logic(String),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}

