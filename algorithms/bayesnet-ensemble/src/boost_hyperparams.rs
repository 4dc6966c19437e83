use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use bayesnet::error::{Error, Result};
use bayesnet::hyperparams::{as_bool, as_f64, as_str, as_usize, entries, invalid_key};
use bayesnet::network::Smoothing;
use bayesnet::ParamGuard;
use bayesnet_feature_selection::{Algorithm, MIN_THRESHOLD};
use serde_json::Value;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::family::BoostFamily;
use crate::hyperparams::smoothing_from;
use crate::Boost;

/// Order in which ranked candidates are added to the ensemble
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Least relevant first
    Asc,
    /// Most relevant first
    Desc,
    /// Shuffled with a fixed seed
    Rand,
}

impl FromStr for Order {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            "rand" => Ok(Order::Rand),
            _ => Err(Error::InvalidArgument(
                "Invalid order algorithm, valid values [asc, desc, rand]".to_string(),
            )),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
            Order::Rand => "rand",
        };
        write!(f, "{}", name)
    }
}

/// A verified hyper-parameter set ready for boosting
///
/// See [`BoostParams`] for the meaning and defaults of every value.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", bound = "")
)]
#[derive(Debug)]
pub struct BoostValidParams<F> {
    order: Order,
    convergence: bool,
    convergence_best: bool,
    bisection: bool,
    threshold: f64,
    max_tolerance: usize,
    select_features: Option<Algorithm>,
    block_update: bool,
    alpha_block: bool,
    predict_voting: bool,
    smoothing: Smoothing,
    #[cfg_attr(feature = "serde", serde(skip))]
    family: PhantomData<fn() -> F>,
}

// manual impls keep the family free of trait bounds
impl<F> Clone for BoostValidParams<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for BoostValidParams<F> {}

impl<F> PartialEq for BoostValidParams<F> {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
            && self.convergence == other.convergence
            && self.convergence_best == other.convergence_best
            && self.bisection == other.bisection
            && self.threshold == other.threshold
            && self.max_tolerance == other.max_tolerance
            && self.select_features == other.select_features
            && self.block_update == other.block_update
            && self.alpha_block == other.alpha_block
            && self.predict_voting == other.predict_voting
            && self.smoothing == other.smoothing
    }
}

impl<F> BoostValidParams<F> {
    pub fn order(&self) -> Order {
        self.order
    }

    pub fn convergence(&self) -> bool {
        self.convergence
    }

    pub fn convergence_best(&self) -> bool {
        self.convergence_best
    }

    pub fn bisection(&self) -> bool {
        self.bisection
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_tolerance(&self) -> usize {
        self.max_tolerance
    }

    pub fn select_features(&self) -> Option<Algorithm> {
        self.select_features
    }

    pub fn block_update(&self) -> bool {
        self.block_update
    }

    pub fn alpha_block(&self) -> bool {
        self.alpha_block
    }

    pub fn predict_voting(&self) -> bool {
        self.predict_voting
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

/// A hyper-parameter set during construction
///
/// | Name | JSON key | Default | Purpose |
/// | :--- | :--- | :--- | :--- |
/// | [order](Self::order) | `order` | `desc` | order of the ranked candidates |
/// | [convergence](Self::convergence) | `convergence` | `true` | stop on a plateau of the validation accuracy |
/// | [convergence_best](Self::convergence_best) | `convergence_best` | `false` | compare with the best accuracy instead of the last one |
/// | [bisection](Self::bisection) | `bisection` | `true` | add `2^tolerance` models per step |
/// | [threshold](Self::threshold) | `threshold` | `-1` | threshold of the feature selection |
/// | [max_tolerance](Self::max_tolerance) | `maxTolerance` | `3` | steps without improvement before stopping, in `[1, 6]` |
/// | [select_features](Self::select_features) | `select_features` | `None` | seed the ensemble with CFS, FCBF or IWSS |
/// | [block_update](Self::block_update) | `block_update` | `false` | one weight update per step |
/// | [alpha_block](Self::alpha_block) | `alpha_block` | `false` | measure candidates together with the ensemble |
/// | [predict_voting](Self::predict_voting) | `predict_voting` | `false` | combine members by weighted votes |
/// | [smoothing](Self::smoothing) | `smoothing` | `Original` | smoothing of every member |
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", bound = "")
)]
#[derive(Debug)]
pub struct BoostParams<F>(BoostValidParams<F>);

impl<F> Clone for BoostParams<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for BoostParams<F> {}

impl<F> PartialEq for BoostParams<F> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<F> Default for BoostParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> BoostParams<F> {
    pub fn new() -> Self {
        BoostParams(BoostValidParams {
            order: Order::Desc,
            convergence: true,
            convergence_best: false,
            bisection: true,
            threshold: -1.0,
            max_tolerance: 3,
            select_features: None,
            block_update: false,
            alpha_block: false,
            predict_voting: false,
            smoothing: Smoothing::default(),
            family: PhantomData,
        })
    }

    pub fn order(mut self, order: Order) -> Self {
        self.0.order = order;
        self
    }

    pub fn convergence(mut self, convergence: bool) -> Self {
        self.0.convergence = convergence;
        self
    }

    pub fn convergence_best(mut self, convergence_best: bool) -> Self {
        self.0.convergence_best = convergence_best;
        self
    }

    pub fn bisection(mut self, bisection: bool) -> Self {
        self.0.bisection = bisection;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.0.threshold = threshold;
        self
    }

    pub fn max_tolerance(mut self, max_tolerance: usize) -> Self {
        self.0.max_tolerance = max_tolerance;
        self
    }

    pub fn select_features(mut self, select_features: Option<Algorithm>) -> Self {
        self.0.select_features = select_features;
        self
    }

    pub fn block_update(mut self, block_update: bool) -> Self {
        self.0.block_update = block_update;
        self
    }

    pub fn alpha_block(mut self, alpha_block: bool) -> Self {
        self.0.alpha_block = alpha_block;
        self
    }

    pub fn predict_voting(mut self, predict_voting: bool) -> Self {
        self.0.predict_voting = predict_voting;
        self
    }

    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.0.smoothing = smoothing;
        self
    }

    /// Update from a JSON object, see the table above for the keys
    pub fn with_hyperparameters(mut self, hyperparameters: &Value) -> Result<Self> {
        for (key, value) in entries(hyperparameters)? {
            let p = &mut self.0;
            match key.as_str() {
                "order" => p.order = as_str(key, value)?.parse()?,
                "convergence" => p.convergence = as_bool(key, value)?,
                "convergence_best" => p.convergence_best = as_bool(key, value)?,
                "bisection" => p.bisection = as_bool(key, value)?,
                "threshold" => p.threshold = as_f64(key, value)?,
                "maxTolerance" => p.max_tolerance = as_usize(key, value)?,
                "select_features" => p.select_features = Some(as_str(key, value)?.parse()?),
                "block_update" => p.block_update = as_bool(key, value)?,
                "alpha_block" => p.alpha_block = as_bool(key, value)?,
                "predict_voting" => p.predict_voting = as_bool(key, value)?,
                "smoothing" => p.smoothing = smoothing_from(key, value)?,
                _ => return Err(invalid_key(key)),
            }
        }
        Ok(self)
    }
}

impl<F: BoostFamily> Boost<F> {
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> BoostParams<F> {
        BoostParams::new()
    }
}

impl<F> ParamGuard for BoostParams<F> {
    type Checked = BoostValidParams<F>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let p = &self.0;
        if !(1..=6).contains(&p.max_tolerance) {
            return Err(Error::InvalidArgument(
                "Invalid maxTolerance value, must be greater in [1, 6]".to_string(),
            ));
        }
        match p.select_features {
            Some(Algorithm::Iwss) if !(0.0..=0.5).contains(&p.threshold) => {
                return Err(Error::InvalidArgument(
                    "Invalid threshold value for IWSS [0, 0.5]".to_string(),
                ))
            }
            Some(Algorithm::Fcbf) if !(MIN_THRESHOLD..=1.0).contains(&p.threshold) => {
                return Err(Error::InvalidArgument(
                    "Invalid threshold value for FCBF [1e-7, 1]".to_string(),
                ))
            }
            _ => {}
        }
        if p.block_update && p.alpha_block {
            return Err(Error::InvalidArgument(
                "alpha_block and block_update cannot be true at the same time".to_string(),
            ));
        }
        if p.block_update && !p.bisection {
            return Err(Error::InvalidArgument(
                "block_update needs bisection to be true".to_string(),
            ));
        }
        Ok(p)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoostAode, XbA2de};
    use serde_json::json;

    #[test]
    fn defaults() {
        let params = BoostAode::params().check().unwrap();
        assert_eq!(params.order(), Order::Desc);
        assert!(params.convergence());
        assert!(!params.convergence_best());
        assert!(params.bisection());
        assert_eq!(params.threshold(), -1.0);
        assert_eq!(params.max_tolerance(), 3);
        assert_eq!(params.select_features(), None);
        assert!(!params.block_update());
        assert!(!params.alpha_block());
        assert!(!params.predict_voting());
    }

    #[test]
    fn json_keys() {
        let params = XbA2de::params()
            .with_hyperparameters(&json!({
                "order": "rand",
                "convergence": false,
                "convergence_best": true,
                "maxTolerance": 5,
                "select_features": "IWSS",
                "threshold": 0.25,
                "predict_voting": true,
                "smoothing": "CESTNIK",
            }))
            .unwrap()
            .check()
            .unwrap();
        assert_eq!(params.order(), Order::Rand);
        assert!(!params.convergence());
        assert!(params.convergence_best());
        assert_eq!(params.max_tolerance(), 5);
        assert_eq!(params.select_features(), Some(Algorithm::Iwss));
        assert_eq!(params.threshold(), 0.25);
        assert!(params.predict_voting());
        assert_eq!(params.smoothing(), Smoothing::Cestnik);
    }

    #[test]
    fn invalid_values() {
        let message = |value: Value| {
            BoostAode::params()
                .with_hyperparameters(&value)
                .and_then(|p| p.check())
                .unwrap_err()
                .to_string()
        };
        assert_eq!(
            message(json!({"order": "up"})),
            "Invalid order algorithm, valid values [asc, desc, rand]"
        );
        assert_eq!(
            message(json!({"maxTolerance": 7})),
            "Invalid maxTolerance value, must be greater in [1, 6]"
        );
        assert_eq!(
            message(json!({"maxTolerance": 0})),
            "Invalid maxTolerance value, must be greater in [1, 6]"
        );
        assert_eq!(
            message(json!({"select_features": "MRMR"})),
            "Invalid selectFeatures value, valid values [IWSS, CFS, FCBF]"
        );
        assert_eq!(
            message(json!({"select_features": "IWSS", "threshold": 0.7})),
            "Invalid threshold value for IWSS [0, 0.5]"
        );
        assert_eq!(
            message(json!({"select_features": "FCBF", "threshold": 0.0})),
            "Invalid threshold value for FCBF [1e-7, 1]"
        );
        assert_eq!(
            message(json!({"block_update": true, "alpha_block": true})),
            "alpha_block and block_update cannot be true at the same time"
        );
        assert_eq!(
            message(json!({"block_update": true, "bisection": false})),
            "block_update needs bisection to be true"
        );
        assert!(message(json!({"theta": 0.1})).contains("theta"));
    }

    #[test]
    fn cfs_ignores_the_threshold() {
        assert!(BoostAode::params()
            .select_features(Some(Algorithm::Cfs))
            .check()
            .is_ok());
    }

    #[test]
    fn order_names() {
        for name in ["asc", "desc", "rand"].iter() {
            let order: Order = name.parse().unwrap();
            assert_eq!(order.to_string(), *name);
        }
    }
}
