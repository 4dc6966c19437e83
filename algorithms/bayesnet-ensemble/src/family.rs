//! Base learners grown by the boosting loop
//!
//! A family fixes which estimator is trained for a candidate and how candidates are ranked:
//! single super-parents for the one-dependence families, super-parent pairs for the
//! two-dependence ones.
use std::fmt::Debug;

use bayesnet::error::Result;
use bayesnet::metrics::Metrics;
use bayesnet::network::Smoothing;
use bayesnet::traits::{Classifier, Fit};
use bayesnet::DatasetView;
use bayesnet_classifiers::{Spnde, Spode, XSpnde, XSpode};
use ndarray::ArrayView1;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A kind of base learner for [`Boost`](crate::Boost)
pub trait BoostFamily: Send + Sync + 'static {
    /// The fitted base learner
    type Model: Classifier + Clone + Debug;
    /// The super-parent(s) of a base learner
    type Candidate: Copy + PartialEq + Debug + Send + Sync;

    /// Name used in logs
    const NAME: &'static str;

    fn fit_candidate(
        candidate: Self::Candidate,
        dataset: &DatasetView,
        smoothing: Smoothing,
    ) -> Result<Self::Model>;

    /// Initial candidates built from the features kept by a feature selection, `None` when
    /// there are too few of them
    fn seed(selected: &[usize]) -> Option<Vec<Self::Candidate>>;

    /// Every candidate by weighted relevance, skipping those built on a `seeded` feature
    /// where the family requires it
    fn rank(
        metrics: &mut Metrics,
        weights: ArrayView1<f64>,
        ascending: bool,
        seeded: &[usize],
    ) -> Vec<Self::Candidate>;

    /// Note describing the candidates left out of the ensemble
    fn unused_note(used: usize, remaining: usize, n_features: usize) -> Option<String>;
}

fn singles(selected: &[usize]) -> Option<Vec<usize>> {
    Some(selected.to_vec())
}

fn pairs(selected: &[usize]) -> Option<Vec<(usize, usize)>> {
    if selected.len() < 2 {
        return None;
    }
    Some(
        selected
            .iter()
            .enumerate()
            .flat_map(|(i, &a)| selected[i + 1..].iter().map(move |&b| (a, b)))
            .collect(),
    )
}

fn unused_features(used: usize, n_features: usize) -> Option<String> {
    if used != n_features {
        Some(format!("Used features in train: {} of {}", used, n_features))
    } else {
        None
    }
}

fn unused_pairs(remaining: usize) -> Option<String> {
    if remaining > 0 {
        Some(format!("Pairs not used in train: {}", remaining))
    } else {
        None
    }
}

macro_rules! single_family {
    ($(#[$meta:meta])* $family:ident, $model:ty, $name:expr) => {
        $(#[$meta])*
        #[cfg_attr(
            feature = "serde",
            derive(Serialize, Deserialize),
            serde(crate = "serde_crate")
        )]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $family;

        impl BoostFamily for $family {
            type Model = $model;
            type Candidate = usize;

            const NAME: &'static str = $name;

            fn fit_candidate(
                parent: usize,
                dataset: &DatasetView,
                smoothing: Smoothing,
            ) -> Result<$model> {
                <$model>::params(parent).smoothing(smoothing).fit(dataset)
            }

            fn seed(selected: &[usize]) -> Option<Vec<usize>> {
                singles(selected)
            }

            fn rank(
                metrics: &mut Metrics,
                weights: ArrayView1<f64>,
                ascending: bool,
                _seeded: &[usize],
            ) -> Vec<usize> {
                metrics.select_k_best_weighted(weights, ascending, 0)
            }

            fn unused_note(used: usize, _remaining: usize, n_features: usize) -> Option<String> {
                unused_features(used, n_features)
            }
        }
    };
}

single_family!(
    /// SPODE base learners, boosted into BoostAODE
    SpodeFamily,
    Spode,
    "BoostAODE"
);
single_family!(
    /// Flat array SPODE base learners, boosted into XBAODE
    XSpodeFamily,
    XSpode,
    "XBAODE"
);

/// SPnDE base learners with two super-parents, boosted into BoostA2DE
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpndeFamily;

impl BoostFamily for SpndeFamily {
    type Model = Spnde;
    type Candidate = (usize, usize);

    const NAME: &'static str = "BoostA2DE";

    fn fit_candidate(
        (a, b): (usize, usize),
        dataset: &DatasetView,
        smoothing: Smoothing,
    ) -> Result<Spnde> {
        Spnde::params(vec![a, b]).smoothing(smoothing).fit(dataset)
    }

    fn seed(selected: &[usize]) -> Option<Vec<(usize, usize)>> {
        pairs(selected)
    }

    fn rank(
        metrics: &mut Metrics,
        weights: ArrayView1<f64>,
        ascending: bool,
        seeded: &[usize],
    ) -> Vec<(usize, usize)> {
        metrics.select_k_pairs(weights, seeded, ascending, 0)
    }

    fn unused_note(_used: usize, remaining: usize, _n_features: usize) -> Option<String> {
        unused_pairs(remaining)
    }
}

/// Flat array SPnDE base learners, boosted into XBA2DE
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct XSpndeFamily;

impl BoostFamily for XSpndeFamily {
    type Model = XSpnde;
    type Candidate = (usize, usize);

    const NAME: &'static str = "XBA2DE";

    fn fit_candidate(
        (a, b): (usize, usize),
        dataset: &DatasetView,
        smoothing: Smoothing,
    ) -> Result<XSpnde> {
        XSpnde::params(a, b).smoothing(smoothing).fit(dataset)
    }

    fn seed(selected: &[usize]) -> Option<Vec<(usize, usize)>> {
        pairs(selected)
    }

    fn rank(
        metrics: &mut Metrics,
        weights: ArrayView1<f64>,
        ascending: bool,
        seeded: &[usize],
    ) -> Vec<(usize, usize)> {
        metrics.select_k_pairs(weights, seeded, ascending, 0)
    }

    fn unused_note(_used: usize, remaining: usize, _n_features: usize) -> Option<String> {
        unused_pairs(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_seeds_need_two_features() {
        assert_eq!(SpndeFamily::seed(&[3]), None);
        assert_eq!(
            XSpndeFamily::seed(&[2, 0, 3]),
            Some(vec![(2, 0), (2, 3), (0, 3)])
        );
        assert_eq!(SpodeFamily::seed(&[]), Some(vec![]));
    }

    #[test]
    fn notes_on_unused_candidates() {
        assert_eq!(
            SpodeFamily::unused_note(3, 1, 4).as_deref(),
            Some("Used features in train: 3 of 4")
        );
        assert_eq!(XSpodeFamily::unused_note(4, 0, 4), None);
        assert_eq!(
            SpndeFamily::unused_note(2, 4, 4).as_deref(),
            Some("Pairs not used in train: 4")
        );
        assert_eq!(XSpndeFamily::unused_note(6, 0, 4), None);
    }

    #[test]
    fn ranked_pairs_skip_seeded_features() {
        let dataset = bayesnet_datasets::iris();
        let mut metrics = Metrics::new(
            dataset.samples().unwrap(),
            dataset.feature_names().to_vec(),
            dataset.class_name(),
            dataset.class_num_states(),
        );
        let weights = dataset.sample_weights();
        let ranked = SpndeFamily::rank(&mut metrics, weights.view(), false, &[1]);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|&(a, b)| a != 1 && b != 1));
        assert_eq!(
            SpodeFamily::rank(&mut metrics, weights.view(), false, &[1]).len(),
            4
        );
    }
}
