//! Averaged one-dependence estimators
use bayesnet::error::{Error, Result};
use bayesnet::traits::Fit;
use bayesnet::DatasetBase;
use bayesnet_classifiers::Spode;
use ndarray::{ArrayBase, Data, Ix1, Ix2};
use rayon::prelude::*;

use crate::ensemble::{impl_ensemble_classifier, Ensemble};
use crate::hyperparams::AodeValidParams;

/// Averaged one-dependence estimators
///
/// One [`Spode`] per feature, each one using that feature as super-parent. All members have
/// significance `1`.
///
/// ```
/// use bayesnet::prelude::*;
/// use bayesnet_ensemble::Aode;
///
/// let dataset = bayesnet_datasets::iris();
/// let model = Aode::params().fit(&dataset)?;
/// assert_eq!(model.ensemble().len(), 4);
/// assert!(model.score(dataset.records.view(), dataset.targets.view())? > 0.9);
/// # Ok::<(), bayesnet::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Aode {
    ensemble: Ensemble<Spode>,
}

impl Aode {
    pub fn ensemble(&self) -> &Ensemble<Spode> {
        &self.ensemble
    }
}

impl<S, T> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for AodeValidParams
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    type Object = Aode;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<Aode> {
        let view = dataset.view();
        let smoothing = self.smoothing();
        let models = (0..view.records.ncols())
            .into_par_iter()
            .map(|parent| Spode::params(parent).smoothing(smoothing).fit(&view))
            .collect::<Result<Vec<_>>>()?;

        let mut ensemble = Ensemble::new(self.predict_voting());
        for model in models {
            ensemble.push_model(model, 1.0);
        }
        tracing::debug!(models = ensemble.len(), "fitted AODE");
        Ok(Aode { ensemble })
    }
}

impl_ensemble_classifier!(Aode);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Aode;
    use bayesnet::prelude::*;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<Aode>();
        has_autotraits::<crate::AodeParams>();
        has_autotraits::<AodeValidParams>();
    }

    #[test]
    fn one_member_per_feature() {
        let dataset = bayesnet_datasets::iris();
        let model = Aode::params().fit(&dataset).unwrap();
        let parents: Vec<usize> = model.ensemble().models().iter().map(|m| m.parent()).collect();
        assert_eq!(parents, vec![0, 1, 2, 3]);
        assert!(model.ensemble().significances().iter().all(|&s| s == 1.0));
        // five nodes and seven edges per member
        assert_eq!(model.number_of_nodes(), 20);
        assert_eq!(model.number_of_edges(), 28);
        assert_eq!(model.class_num_states(), 3);
        assert!(model.notes().is_empty());
        assert_eq!(model.status(), Status::Normal);
    }

    #[test]
    fn voting_and_averaging_are_accurate() {
        let dataset = bayesnet_datasets::iris();
        for &voting in &[true, false] {
            let model = Aode::params()
                .predict_voting(voting)
                .fit(&dataset)
                .unwrap();
            let score = model
                .score(dataset.records.view(), dataset.targets.view())
                .unwrap();
            assert!(score > 0.9, "voting {}: {}", voting, score);
            let proba = model.predict_proba(dataset.records.view()).unwrap();
            assert_eq!(proba.dim(), (150, 3));
            for row in proba.rows() {
                approx::assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn member_errors_propagate() {
        let dataset = bayesnet_datasets::iris();
        let mut states = dataset.states().clone();
        states.remove("petalwidth");
        let dataset = dataset.with_states(states);
        assert!(Aode::params().fit(&dataset).is_err());
    }

    #[test]
    fn graphs_are_titled_per_member() {
        let dataset = bayesnet_datasets::iris();
        let model = Aode::params().fit(&dataset).unwrap();
        let graph = model.graph("Iris");
        assert!(graph.iter().any(|line| line.contains("Iris_0")));
        assert!(graph.iter().any(|line| line.contains("Iris_3")));
    }
}
