//! Averaged two-dependence estimators
use bayesnet::error::{Error, Result};
use bayesnet::traits::Fit;
use bayesnet::DatasetBase;
use bayesnet_classifiers::Spnde;
use ndarray::{ArrayBase, Data, Ix1, Ix2};
use rayon::prelude::*;

use crate::ensemble::{impl_ensemble_classifier, Ensemble};
use crate::hyperparams::A2deValidParams;

/// Averaged two-dependence estimators
///
/// One [`Spnde`] for every pair of features `i < j`, with significance `1` each.
#[derive(Debug, Clone)]
pub struct A2de {
    ensemble: Ensemble<Spnde>,
}

impl A2de {
    pub fn ensemble(&self) -> &Ensemble<Spnde> {
        &self.ensemble
    }
}

impl<S, T> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for A2deValidParams
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    type Object = A2de;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<A2de> {
        let n = dataset.records.ncols();
        if n < 2 {
            return Err(Error::InvalidArgument(
                "A2DE needs at least two features".to_string(),
            ));
        }
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();
        let view = dataset.view();
        let smoothing = self.smoothing();
        let models = pairs
            .into_par_iter()
            .map(|(i, j)| Spnde::params(vec![i, j]).smoothing(smoothing).fit(&view))
            .collect::<Result<Vec<_>>>()?;

        let mut ensemble = Ensemble::new(self.predict_voting());
        for model in models {
            ensemble.push_model(model, 1.0);
        }
        tracing::debug!(models = ensemble.len(), "fitted A2DE");
        Ok(A2de { ensemble })
    }
}

impl_ensemble_classifier!(A2de);

#[cfg(test)]
mod tests {
    use super::*;
    use bayesnet::prelude::*;
    use ndarray::{array, Array1};

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<A2de>();
        has_autotraits::<crate::A2deParams>();
        has_autotraits::<A2deValidParams>();
    }

    #[test]
    fn one_member_per_pair() {
        let dataset = bayesnet_datasets::iris();
        let model = A2de::params().fit(&dataset).unwrap();
        let parents: Vec<Vec<usize>> = model
            .ensemble()
            .models()
            .iter()
            .map(|m| m.parents().to_vec())
            .collect();
        assert_eq!(
            parents,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        // class edges and two super-parents over the other two features
        assert_eq!(model.number_of_edges(), 6 * 8);
        assert_eq!(model.number_of_nodes(), 6 * 5);
    }

    #[test]
    fn accurate_on_iris() {
        let dataset = bayesnet_datasets::iris();
        let model = A2de::params().fit(&dataset).unwrap();
        let score = model
            .score(dataset.records.view(), dataset.targets.view())
            .unwrap();
        assert!(score > 0.9);
    }

    #[test]
    fn single_feature_is_rejected() {
        let dataset = Dataset::new(array![[0], [1], [1], [0]], Array1::from(vec![0, 1, 1, 0]));
        let err = A2de::params().fit(&dataset).unwrap_err();
        assert_eq!(err.to_string(), "A2DE needs at least two features");
    }
}
