use bayesnet::error::{Error, Result};
use bayesnet::hyperparams::{as_bool, as_str, entries, invalid_key};
use bayesnet::network::Smoothing;
use bayesnet::ParamGuard;
use serde_json::Value;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{A2de, Aode, Wa2de};

pub(crate) fn smoothing_from(key: &str, value: &Value) -> Result<Smoothing> {
    as_str(key, value)?.parse()
}

/// The set of valid hyperparameters shared by [AODE](crate::Aode), [A2DE](crate::A2de) and
/// [WA2DE](crate::Wa2de)
///
/// * `predict_voting`: combine the members by significance weighted votes instead of
///   averaging their posteriors. Default: `true`, `false` for WA2DE.
/// * `smoothing`: smoothing of the probability tables of every member.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AveragedValidParams {
    predict_voting: bool,
    smoothing: Smoothing,
}

impl AveragedValidParams {
    pub fn predict_voting(&self) -> bool {
        self.predict_voting
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    fn update(&mut self, hyperparameters: &Value) -> Result<()> {
        for (key, value) in entries(hyperparameters)? {
            match key.as_str() {
                "predict_voting" => self.predict_voting = as_bool(key, value)?,
                "smoothing" => self.smoothing = smoothing_from(key, value)?,
                _ => return Err(invalid_key(key)),
            }
        }
        Ok(())
    }
}

impl Default for AveragedValidParams {
    fn default() -> Self {
        AveragedValidParams {
            predict_voting: true,
            smoothing: Smoothing::default(),
        }
    }
}

/// Checked hyperparameters of [AODE](crate::Aode)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AodeValidParams(AveragedValidParams);

/// Checked hyperparameters of [A2DE](crate::A2de)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct A2deValidParams(AveragedValidParams);

/// Checked hyperparameters of [WA2DE](crate::Wa2de)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wa2deValidParams(AveragedValidParams);

impl Default for Wa2deValidParams {
    fn default() -> Self {
        Wa2deValidParams(AveragedValidParams {
            predict_voting: false,
            smoothing: Smoothing::default(),
        })
    }
}

/// A helper struct for building the hyperparameters of [AODE](crate::Aode)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AodeParams(AodeValidParams);

/// A helper struct for building the hyperparameters of [A2DE](crate::A2de)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct A2deParams(A2deValidParams);

/// A helper struct for building the hyperparameters of [WA2DE](crate::Wa2de)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Wa2deParams(Wa2deValidParams);

macro_rules! averaged_params {
    ($params:ident, $valid:ident, $model:ident) => {
        impl $params {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn predict_voting(mut self, predict_voting: bool) -> Self {
                (self.0).0.predict_voting = predict_voting;
                self
            }

            pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
                (self.0).0.smoothing = smoothing;
                self
            }

            /// Update from a JSON object with the keys `predict_voting` and `smoothing`
            pub fn with_hyperparameters(mut self, hyperparameters: &Value) -> Result<Self> {
                (self.0).0.update(hyperparameters)?;
                Ok(self)
            }
        }

        impl std::ops::Deref for $valid {
            type Target = AveragedValidParams;

            fn deref(&self) -> &AveragedValidParams {
                &self.0
            }
        }

        impl ParamGuard for $params {
            type Checked = $valid;
            type Error = Error;

            fn check_ref(&self) -> Result<&Self::Checked> {
                Ok(&self.0)
            }

            fn check(self) -> Result<Self::Checked> {
                self.check_ref()?;
                Ok(self.0)
            }
        }

        impl $model {
            // Violates the convention that new should return a value of type `Self`
            #[allow(clippy::new_ret_no_self)]
            pub fn params() -> $params {
                $params::new()
            }
        }
    };
}

averaged_params!(AodeParams, AodeValidParams, Aode);
averaged_params!(A2deParams, A2deValidParams, A2de);
averaged_params!(Wa2deParams, Wa2deValidParams, Wa2de);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_vote() {
        let params = Aode::params().check().unwrap();
        assert!(params.predict_voting());
        assert_eq!(params.smoothing(), Smoothing::default());
    }

    #[test]
    fn wa2de_averages_by_default() {
        let params = Wa2de::params().check().unwrap();
        assert!(!params.predict_voting());
        let params = Wa2de::params()
            .with_hyperparameters(&json!({"predict_voting": true}))
            .unwrap()
            .check()
            .unwrap();
        assert!(params.predict_voting());
    }

    #[test]
    fn json_hyperparameters() {
        let params = A2de::params()
            .with_hyperparameters(&json!({"predict_voting": false, "smoothing": "LAPLACE"}))
            .unwrap()
            .check()
            .unwrap();
        assert!(!params.predict_voting());
        assert_eq!(params.smoothing(), Smoothing::Laplace);

        assert!(Aode::params()
            .with_hyperparameters(&json!({"maxTolerance": 3}))
            .is_err());
        assert!(Aode::params()
            .with_hyperparameters(&json!({"smoothing": "GAUSS"}))
            .is_err());
    }
}
