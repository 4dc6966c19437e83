//!
//! # Feature selection
//! `bayesnet-feature-selection` ranks discrete features by their symmetrical uncertainty with
//! the class and with each other, `SU(a, b) = 2 I(a; b) / (H(a) + H(b))`.
//!
//! Three strategies share the [`FeatureSelect`] contract:
//!
//! * [`Cfs`], a best first search on the correlation based merit of a subset
//! * [`Fcbf`], a relevance filter that drops features redundant with a better one
//! * [`Iwss`], an incremental search that tolerates small merit losses
//!
//! ```
//! use bayesnet::metrics::Metrics;
//! use bayesnet_feature_selection::{Algorithm, FeatureSelect};
//!
//! let dataset = bayesnet_datasets::iris();
//! let metrics = Metrics::new(
//!     dataset.samples()?,
//!     dataset.feature_names().to_vec(),
//!     dataset.class_name(),
//!     dataset.class_num_states(),
//! );
//! let algorithm: Algorithm = "FCBF".parse()?;
//! let mut selector = algorithm.selector(metrics, dataset.sample_weights(), 0, 1e-7)?;
//! selector.fit()?;
//! assert!(!selector.features()?.is_empty());
//! # Ok::<(), bayesnet::Error>(())
//! ```

mod base;
mod cfs;
mod fcbf;
mod iwss;

use bayesnet::error::{Error, Result};
use bayesnet::metrics::Metrics;
use ndarray::Array1;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use base::{FeatureSelect, Selection};
pub use cfs::Cfs;
pub use fcbf::{Fcbf, MIN_THRESHOLD};
pub use iwss::Iwss;

/// Selection strategy chosen by name
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Cfs,
    Fcbf,
    Iwss,
}

impl Algorithm {
    /// Build the selector, `threshold` is ignored by CFS
    pub fn selector(
        self,
        metrics: Metrics,
        weights: Array1<f64>,
        max_features: usize,
        threshold: f64,
    ) -> Result<Box<dyn FeatureSelect>> {
        Ok(match self {
            Algorithm::Cfs => Box::new(Cfs::new(metrics, weights, max_features)),
            Algorithm::Fcbf => Box::new(Fcbf::new(metrics, weights, max_features, threshold)?),
            Algorithm::Iwss => Box::new(Iwss::new(metrics, weights, max_features, threshold)?),
        })
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "CFS" => Ok(Algorithm::Cfs),
            "FCBF" => Ok(Algorithm::Fcbf),
            "IWSS" => Ok(Algorithm::Iwss),
            _ => Err(Error::InvalidArgument(
                "Invalid selectFeatures value, valid values [IWSS, CFS, FCBF]".to_string(),
            )),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Cfs => "CFS",
            Algorithm::Fcbf => "FCBF",
            Algorithm::Iwss => "IWSS",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for name in ["CFS", "FCBF", "IWSS"].iter() {
            let algorithm: Algorithm = name.parse().unwrap();
            assert_eq!(algorithm.to_string(), *name);
        }
        let err = "MRMR".parse::<Algorithm>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid selectFeatures value, valid values [IWSS, CFS, FCBF]"
        );
    }

    #[test]
    fn selectors_check_their_threshold() {
        let (metrics, weights) = base::tests::redundant_metrics();
        assert!(Algorithm::Cfs
            .selector(metrics.clone(), weights.clone(), 0, -1.0)
            .is_ok());
        assert!(Algorithm::Fcbf
            .selector(metrics.clone(), weights.clone(), 0, 0.0)
            .is_err());
        assert!(Algorithm::Iwss.selector(metrics, weights, 0, 0.7).is_err());
    }
}
