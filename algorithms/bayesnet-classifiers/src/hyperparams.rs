use bayesnet::error::{Error, Result};
use bayesnet::hyperparams::{as_f64, as_str, as_usize, as_usize_vec, entries, invalid_key};
use bayesnet::network::Smoothing;
use bayesnet::ParamGuard;
use serde_json::Value;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{Kdb, Spnde, Spode, Tan, XSpnde, XSpode};

fn smoothing_from(key: &str, value: &Value) -> Result<Smoothing> {
    as_str(key, value)?.parse()
}

/// A verified hyper-parameter set ready for the estimation of a [TAN](crate::Tan) classifier
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct TanValidParams {
    parent: Option<usize>,
    smoothing: Smoothing,
}

impl TanValidParams {
    /// Index of the root of the spanning tree, `None` picks the feature with the highest
    /// mutual information with the class
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

/// A hyper-parameter set during construction
///
/// | Name | Default | Purpose |
/// | :--- | :--- | :--- |
/// | [parent](Self::parent) | `None` | root of the maximum spanning tree |
/// | [smoothing](Self::smoothing) | `Original` | additive smoothing of the probability tables |
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct TanParams(TanValidParams);

impl TanParams {
    pub fn new() -> Self {
        Self(TanValidParams {
            parent: None,
            smoothing: Smoothing::default(),
        })
    }

    pub fn parent(mut self, parent: Option<usize>) -> Self {
        self.0.parent = parent;
        self
    }

    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.0.smoothing = smoothing;
        self
    }

    /// Update from a JSON object with the keys `parent` and `smoothing`
    pub fn with_hyperparameters(mut self, hyperparameters: &Value) -> Result<Self> {
        for (key, value) in entries(hyperparameters)? {
            match key.as_str() {
                "parent" if value.is_null() => self.0.parent = None,
                "parent" => self.0.parent = Some(as_usize(key, value)?),
                "smoothing" => self.0.smoothing = smoothing_from(key, value)?,
                _ => return Err(invalid_key(key)),
            }
        }
        Ok(self)
    }
}

impl Default for TanParams {
    fn default() -> Self {
        Self::new()
    }
}

impl Tan {
    /// Defaults: no fixed root, `Original` smoothing
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> TanParams {
        TanParams::new()
    }
}

impl ParamGuard for TanParams {
    type Checked = TanValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A verified hyper-parameter set ready for the estimation of a [KDB](crate::Kdb) classifier
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct KdbValidParams {
    k: usize,
    theta: f64,
    smoothing: Smoothing,
}

impl KdbValidParams {
    /// Maximum number of feature parents of every feature
    pub fn k(&self) -> usize {
        self.k
    }

    /// Minimum conditional mutual information of a feature parent
    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

/// A hyper-parameter set during construction
///
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :--- | :--- |
/// | [k](Self::k) | `2` | feature parents per feature | `[0, inf)` |
/// | [theta](Self::theta) | `0.03` | conditional mutual information threshold | `[0, inf)` |
/// | [smoothing](Self::smoothing) | `Original` | additive smoothing of the probability tables | |
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct KdbParams(KdbValidParams);

impl KdbParams {
    pub fn new() -> Self {
        Self(KdbValidParams {
            k: 2,
            theta: 0.03,
            smoothing: Smoothing::default(),
        })
    }

    pub fn k(mut self, k: usize) -> Self {
        self.0.k = k;
        self
    }

    pub fn theta(mut self, theta: f64) -> Self {
        self.0.theta = theta;
        self
    }

    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.0.smoothing = smoothing;
        self
    }

    /// Update from a JSON object with the keys `k`, `theta` and `smoothing`
    pub fn with_hyperparameters(mut self, hyperparameters: &Value) -> Result<Self> {
        for (key, value) in entries(hyperparameters)? {
            match key.as_str() {
                "k" => self.0.k = as_usize(key, value)?,
                "theta" => self.0.theta = as_f64(key, value)?,
                "smoothing" => self.0.smoothing = smoothing_from(key, value)?,
                _ => return Err(invalid_key(key)),
            }
        }
        Ok(self)
    }
}

impl Default for KdbParams {
    fn default() -> Self {
        Self::new()
    }
}

impl Kdb {
    /// Defaults: `k = 2`, `theta = 0.03`, `Original` smoothing
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> KdbParams {
        KdbParams::new()
    }
}

impl ParamGuard for KdbParams {
    type Checked = KdbValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if !self.0.theta.is_finite() || self.0.theta < 0.0 {
            Err(Error::InvalidArgument(format!(
                "Invalid theta value {}, must be a non-negative number",
                self.0.theta
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A verified hyper-parameter set ready for the estimation of a [SPODE](crate::Spode)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SpodeValidParams {
    parent: usize,
    smoothing: Smoothing,
}

impl SpodeValidParams {
    /// Index of the super-parent feature
    pub fn parent(&self) -> usize {
        self.parent
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SpodeParams(SpodeValidParams);

impl SpodeParams {
    pub fn new(parent: usize) -> Self {
        Self(SpodeValidParams {
            parent,
            smoothing: Smoothing::default(),
        })
    }

    pub fn parent(mut self, parent: usize) -> Self {
        self.0.parent = parent;
        self
    }

    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.0.smoothing = smoothing;
        self
    }

    /// Update from a JSON object with the keys `parent` and `smoothing`
    pub fn with_hyperparameters(mut self, hyperparameters: &Value) -> Result<Self> {
        for (key, value) in entries(hyperparameters)? {
            match key.as_str() {
                "parent" => self.0.parent = as_usize(key, value)?,
                "smoothing" => self.0.smoothing = smoothing_from(key, value)?,
                _ => return Err(invalid_key(key)),
            }
        }
        Ok(self)
    }
}

impl Spode {
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params(parent: usize) -> SpodeParams {
        SpodeParams::new(parent)
    }
}

impl ParamGuard for SpodeParams {
    type Checked = SpodeValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A verified hyper-parameter set ready for the estimation of a [SPnDE](crate::Spnde)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SpndeValidParams {
    parents: Vec<usize>,
    smoothing: Smoothing,
}

impl SpndeValidParams {
    /// Indices of the super-parent features
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SpndeParams(SpndeValidParams);

impl SpndeParams {
    pub fn new(parents: Vec<usize>) -> Self {
        Self(SpndeValidParams {
            parents,
            smoothing: Smoothing::default(),
        })
    }

    pub fn parents(mut self, parents: Vec<usize>) -> Self {
        self.0.parents = parents;
        self
    }

    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.0.smoothing = smoothing;
        self
    }

    /// Update from a JSON object with the keys `parents` and `smoothing`
    pub fn with_hyperparameters(mut self, hyperparameters: &Value) -> Result<Self> {
        for (key, value) in entries(hyperparameters)? {
            match key.as_str() {
                "parents" => self.0.parents = as_usize_vec(key, value)?,
                "smoothing" => self.0.smoothing = smoothing_from(key, value)?,
                _ => return Err(invalid_key(key)),
            }
        }
        Ok(self)
    }
}

impl Spnde {
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params(parents: Vec<usize>) -> SpndeParams {
        SpndeParams::new(parents)
    }
}

impl ParamGuard for SpndeParams {
    type Checked = SpndeValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let parents = &self.0.parents;
        if parents.is_empty() {
            return Err(Error::InvalidArgument(
                "SPnDE needs at least one super-parent".to_string(),
            ));
        }
        for (i, parent) in parents.iter().enumerate() {
            if parents[..i].contains(parent) {
                return Err(Error::InvalidArgument(format!(
                    "Super-parent {} is repeated in {:?}",
                    parent, parents
                )));
            }
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A verified hyper-parameter set ready for the estimation of a [flat SPODE](crate::XSpode)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct XSpodeValidParams {
    parent: usize,
    smoothing: Smoothing,
}

impl XSpodeValidParams {
    pub fn parent(&self) -> usize {
        self.parent
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct XSpodeParams(XSpodeValidParams);

impl XSpodeParams {
    pub fn new(parent: usize) -> Self {
        Self(XSpodeValidParams {
            parent,
            smoothing: Smoothing::default(),
        })
    }

    pub fn parent(mut self, parent: usize) -> Self {
        self.0.parent = parent;
        self
    }

    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.0.smoothing = smoothing;
        self
    }

    /// Update from a JSON object with the keys `parent` and `smoothing`
    pub fn with_hyperparameters(mut self, hyperparameters: &Value) -> Result<Self> {
        for (key, value) in entries(hyperparameters)? {
            match key.as_str() {
                "parent" => self.0.parent = as_usize(key, value)?,
                "smoothing" => self.0.smoothing = smoothing_from(key, value)?,
                _ => return Err(invalid_key(key)),
            }
        }
        Ok(self)
    }
}

impl XSpode {
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params(parent: usize) -> XSpodeParams {
        XSpodeParams::new(parent)
    }
}

impl ParamGuard for XSpodeParams {
    type Checked = XSpodeValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A verified hyper-parameter set ready for the estimation of a [flat SPnDE](crate::XSpnde)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct XSpndeValidParams {
    parent1: usize,
    parent2: usize,
    smoothing: Smoothing,
}

impl XSpndeValidParams {
    pub fn parent1(&self) -> usize {
        self.parent1
    }

    pub fn parent2(&self) -> usize {
        self.parent2
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct XSpndeParams(XSpndeValidParams);

impl XSpndeParams {
    pub fn new(parent1: usize, parent2: usize) -> Self {
        Self(XSpndeValidParams {
            parent1,
            parent2,
            smoothing: Smoothing::default(),
        })
    }

    pub fn parent1(mut self, parent1: usize) -> Self {
        self.0.parent1 = parent1;
        self
    }

    pub fn parent2(mut self, parent2: usize) -> Self {
        self.0.parent2 = parent2;
        self
    }

    pub fn smoothing(mut self, smoothing: Smoothing) -> Self {
        self.0.smoothing = smoothing;
        self
    }

    /// Update from a JSON object with the keys `parent1`, `parent2` and `smoothing`
    pub fn with_hyperparameters(mut self, hyperparameters: &Value) -> Result<Self> {
        for (key, value) in entries(hyperparameters)? {
            match key.as_str() {
                "parent1" => self.0.parent1 = as_usize(key, value)?,
                "parent2" => self.0.parent2 = as_usize(key, value)?,
                "smoothing" => self.0.smoothing = smoothing_from(key, value)?,
                _ => return Err(invalid_key(key)),
            }
        }
        Ok(self)
    }
}

impl XSpnde {
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params(parent1: usize, parent2: usize) -> XSpndeParams {
        XSpndeParams::new(parent1, parent2)
    }
}

impl ParamGuard for XSpndeParams {
    type Checked = XSpndeValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.parent1 == self.0.parent2 {
            Err(Error::InvalidArgument(format!(
                "The two super-parents must be different, both are {}",
                self.0.parent1
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
