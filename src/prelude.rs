//! bayesnet prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::traits::*;

#[doc(no_inline)]
pub use crate::param_guard::ParamGuard;

#[doc(no_inline)]
pub use crate::dataset::{Dataset, DatasetBase, DatasetView, Records, States};

#[doc(no_inline)]
pub use crate::folding::{Fold, KFold, StratifiedKFold};

#[doc(no_inline)]
pub use crate::metrics::Metrics;

#[doc(no_inline)]
pub use crate::network::{Network, Node, Smoothing};
