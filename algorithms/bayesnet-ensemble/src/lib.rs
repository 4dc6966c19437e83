//!
//! # Ensembles of dependence estimators
//! `bayesnet-ensemble` combines super-parent estimators into averaged and boosted ensembles.
//!
//! * [`Aode`] and [`A2de`] fit one estimator for every feature, or every pair of features,
//!   and weight them all alike
//! * [`Wa2de`] averages two-dependence estimators straight from shared pairwise frequency
//!   tables, without fitting a member per pair
//! * [`Boost`] grows an ensemble with AdaBoost, adding the most relevant super-parents first
//!   until the accuracy on a validation fold stops improving. It comes in four flavours:
//!   [`BoostAode`], [`XbAode`], [`BoostA2de`] and [`XbA2de`]
//!
//! Members are combined by significance weighted votes or by the significance weighted average
//! of their class posteriors, depending on `predict_voting`.
//!
//! ## Example
//!
//! ```
//! use bayesnet::prelude::*;
//! use bayesnet_ensemble::{BoostAode, Order};
//!
//! let dataset = bayesnet_datasets::iris();
//! let model = BoostAode::params()
//!     .order(Order::Desc)
//!     .max_tolerance(2)
//!     .fit(&dataset)?;
//! let accuracy = model.score(dataset.records.view(), dataset.targets.view())?;
//! assert!(accuracy > 0.8);
//! # Ok::<(), bayesnet::Error>(())
//! ```

mod a2de;
mod aode;
mod boost;
mod boost_hyperparams;
mod ensemble;
mod family;
mod hyperparams;
mod wa2de;

pub use a2de::A2de;
pub use aode::Aode;
pub use boost::{update_weights, Boost};
pub use boost_hyperparams::{BoostParams, BoostValidParams, Order};
pub use ensemble::Ensemble;
pub use family::{BoostFamily, SpndeFamily, SpodeFamily, XSpndeFamily, XSpodeFamily};
pub use hyperparams::{
    A2deParams, A2deValidParams, AodeParams, AodeValidParams, AveragedValidParams, Wa2deParams,
    Wa2deValidParams,
};
pub use wa2de::Wa2de;

/// Boosted SPODE ensemble
pub type BoostAode = Boost<SpodeFamily>;
/// Boosted ensemble of flat array SPODEs
pub type XbAode = Boost<XSpodeFamily>;
/// Boosted SPnDE ensemble over feature pairs
pub type BoostA2de = Boost<SpndeFamily>;
/// Boosted ensemble of flat array SPnDEs
pub type XbA2de = Boost<XSpndeFamily>;
