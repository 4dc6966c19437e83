//! Super-parent n-dependence estimator
use bayesnet::error::{Error, Result};
use bayesnet::metrics::Metrics;
use bayesnet::network::Network;
use bayesnet::traits::Fit;
use bayesnet::DatasetBase;
use ndarray::{ArrayBase, ArrayView1, Data, Ix1, Ix2};

use crate::base::{fit_network, impl_network_classifier, StructureBuilder};
use crate::hyperparams::SpndeValidParams;

/// Super-parent n-dependence estimator
///
/// The class is a parent of every feature and every super-parent is a parent of every
/// feature that is not a super-parent. The super-parents depend on the class only.
#[derive(Debug, Clone)]
pub struct Spnde {
    pub(crate) network: Network,
    parents: Vec<usize>,
}

impl Spnde {
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}

struct SpndeBuilder<'a> {
    parents: &'a [usize],
}

impl<'a> StructureBuilder for SpndeBuilder<'a> {
    fn build(
        &self,
        network: &mut Network,
        metrics: &mut Metrics,
        _weights: ArrayView1<f64>,
    ) -> Result<()> {
        let features = metrics.features();
        let class_name = metrics.class_name();
        for (i, feature) in features.iter().enumerate() {
            network.add_edge(class_name, feature)?;
            if !self.parents.contains(&i) {
                for &parent in self.parents {
                    network.add_edge(&features[parent], feature)?;
                }
            }
        }
        Ok(())
    }
}

impl<S, T> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for SpndeValidParams
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    type Object = Spnde;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<Spnde> {
        let n_features = dataset.records.ncols();
        if self.parents().iter().any(|&parent| parent >= n_features) {
            return Err(Error::InvalidArgument(
                "The parent node is not in the dataset".to_string(),
            ));
        }
        let builder = SpndeBuilder {
            parents: self.parents(),
        };
        let network = fit_network(&builder, dataset, self.smoothing())?;
        tracing::debug!(parents = ?self.parents(), "fitted SPnDE");
        Ok(Spnde {
            network,
            parents: self.parents().to_vec(),
        })
    }
}

impl_network_classifier!(Spnde);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bayesnet::network::Smoothing;
    use bayesnet::prelude::*;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<Spnde>();
        has_autotraits::<crate::SpndeParams>();
        has_autotraits::<SpndeValidParams>();
    }

    #[test]
    fn two_super_parents() {
        let dataset = bayesnet_datasets::iris();
        let model = Spnde::params(vec![0, 2]).fit(&dataset).unwrap();
        // four class edges and two children with two super-parents each
        assert_eq!(model.number_of_edges(), 4 + 4);
        let network = model.network();
        let parents_of = |name: &str| {
            network
                .node(name)
                .unwrap()
                .parents()
                .iter()
                .map(|&p| network.nodes()[p].name().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(parents_of("sepalwidth"), vec!["class", "sepallength", "petallength"]);
        assert_eq!(parents_of("petallength"), vec!["class"]);
        assert_eq!(parents_of("sepallength"), vec!["class"]);
    }

    #[test]
    fn single_parent_matches_spode() {
        let dataset = bayesnet_datasets::iris();
        let spnde = Spnde::params(vec![3]).fit(&dataset).unwrap();
        let spode = crate::Spode::params(3).fit(&dataset).unwrap();
        assert_eq!(spnde.show(), spode.show());
        let a = spnde.predict_proba(dataset.records.view()).unwrap();
        let b = spode.predict_proba(dataset.records.view()).unwrap();
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn two_parents_match_flat_estimator() {
        let dataset = bayesnet_datasets::iris();
        for &(p1, p2) in [(0, 1), (1, 3), (2, 0)].iter() {
            let spnde = Spnde::params(vec![p1, p2])
                .smoothing(Smoothing::Laplace)
                .fit(&dataset)
                .unwrap();
            let xspnde = crate::XSpnde::params(p1, p2)
                .smoothing(Smoothing::Laplace)
                .fit(&dataset)
                .unwrap();
            assert_eq!(spnde.number_of_edges(), xspnde.number_of_edges());
            let a = spnde.predict_proba(dataset.records.view()).unwrap();
            let b = xspnde.predict_proba(dataset.records.view()).unwrap();
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn parent_out_of_range() {
        let dataset = bayesnet_datasets::iris();
        assert!(Spnde::params(vec![1, 4]).fit(&dataset).is_err());
    }
}
