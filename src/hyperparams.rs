//! JSON shaped hyperparameter configuration
//!
//! Every parameter set of the workspace can be updated from a JSON object with
//! `with_hyperparameters`. The keys are matched once, exhaustively, by the parameter set itself;
//! the helpers below convert single values and produce uniform error messages naming the
//! offending key.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Return the key/value pairs of a hyperparameter object
pub fn entries(value: &Value) -> Result<&Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        Error::InvalidArgument(format!(
            "Invalid hyperparameters, expected a JSON object but got {}",
            value
        ))
    })
}

/// Error for a key the parameter set does not recognize
pub fn invalid_key(key: &str) -> Error {
    Error::InvalidArgument(format!("Invalid hyperparameter key: {}", key))
}

fn wrong_type(key: &str, expected: &str, value: &Value) -> Error {
    Error::InvalidArgument(format!(
        "Invalid value for hyperparameter {}: expected {} but got {}",
        key, expected, value
    ))
}

pub fn as_bool(key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| wrong_type(key, "a boolean", value))
}

pub fn as_usize(key: &str, value: &Value) -> Result<usize> {
    value
        .as_u64()
        .map(|v| v as usize)
        .ok_or_else(|| wrong_type(key, "a non-negative integer", value))
}

pub fn as_f64(key: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| wrong_type(key, "a number", value))
}

pub fn as_str<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| wrong_type(key, "a string", value))
}

pub fn as_usize_vec(key: &str, value: &Value) -> Result<Vec<usize>> {
    let values = value
        .as_array()
        .ok_or_else(|| wrong_type(key, "an array of integers", value))?;
    values.iter().map(|v| as_usize(key, v)).collect()
}
