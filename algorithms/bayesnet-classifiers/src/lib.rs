//!
//! # Bayesian network classifiers
//! `bayesnet-classifiers` provides the single model classifiers of the `bayesnet` workspace.
//!
//! # The big picture
//!
//! All classifiers share the factorization `p(c | x) ∝ p(c) prod p(x_i | parents(x_i))`, they
//! only differ in how the parents of every feature are chosen.
//!
//! * [`Tan`] adds a maximum spanning tree over the class conditional mutual information
//! * [`Kdb`] gives every feature up to `k` feature parents
//! * [`Spode`] and [`Spnde`] hang every feature from one or more super-parents
//! * [`XSpode`] and [`XSpnde`] estimate the same factorization over flat count tables, without
//!   building a network, which makes them cheap enough to be fitted hundreds of times inside
//!   a boosting loop
//!
//! Every model is configured with a parameter builder, checked and fitted with
//! [`Fit`](bayesnet::traits::Fit), and then queried through
//! [`Classifier`](bayesnet::traits::Classifier).
//!
//! ```
//! use bayesnet::prelude::*;
//! use bayesnet_classifiers::Kdb;
//!
//! let dataset = bayesnet_datasets::iris();
//! let model = Kdb::params().k(2).fit(&dataset)?;
//! let accuracy = model.score(dataset.records.view(), dataset.targets.view())?;
//! assert!(accuracy > 0.9);
//! # Ok::<(), bayesnet::Error>(())
//! ```

mod base;
pub mod flat;
mod hyperparams;
mod kdb;
mod spnde;
mod spode;
mod tan;
mod xspnde;
mod xspode;

pub use hyperparams::*;
pub use kdb::Kdb;
pub use spnde::Spnde;
pub use spode::Spode;
pub use tan::Tan;
pub use xspnde::XSpnde;
pub use xspode::XSpode;

pub use bayesnet::error::Result;
