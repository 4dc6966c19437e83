//! `bayesnet` provides Bayesian network classifiers over discrete data.
//!
//! The crate holds the shared machinery of the workspace:
//!
//! * [`Dataset`](dataset::Dataset), a container of discrete records with feature names, the
//!   class name, per variable states and sample weights
//! * [`Network`](network::Network), a directed acyclic graph of discrete variables with
//!   conditional probability tables estimated from weighted counts and exact inference over the
//!   class
//! * [`Metrics`](metrics::Metrics), entropy and (conditional) mutual information rankings
//! * a maximum spanning tree, seeded k-fold splitters and a counting semaphore
//! * the [`Fit`](traits::Fit) and [`Classifier`](traits::Classifier) traits together with the
//!   [`ParamGuard`] hyperparameter checking used by every algorithm crate
//!
//! Structure learners live in `bayesnet-classifiers`, ensembles in `bayesnet-ensemble` and
//! feature selection in `bayesnet-feature-selection`.
//!
//! ## Example
//!
//! ```
//! use bayesnet::prelude::*;
//!
//! let mut net = Network::new();
//! for name in ["A", "B", "C"].iter() {
//!     net.add_node(name).unwrap();
//! }
//! net.add_edge("A", "B").unwrap();
//! net.add_edge("B", "C").unwrap();
//! // closing the loop is rejected and leaves the graph untouched
//! assert!(net.add_edge("C", "A").is_err());
//! assert_eq!(net.num_edges(), 2);
//! ```

pub mod dataset;
pub mod error;
pub mod folding;
pub mod hyperparams;
pub mod metrics;
pub mod mst;
pub mod network;
mod param_guard;
pub mod prelude;
pub mod semaphore;
pub mod traits;
pub mod utils;

pub use dataset::{Dataset, DatasetBase, DatasetView, States};
pub use error::Error;
pub use param_guard::ParamGuard;
