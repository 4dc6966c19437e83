//! Super-parent one-dependence estimator
use bayesnet::error::{Error, Result};
use bayesnet::metrics::Metrics;
use bayesnet::network::Network;
use bayesnet::traits::Fit;
use bayesnet::DatasetBase;
use ndarray::{ArrayBase, ArrayView1, Data, Ix1, Ix2};

use crate::base::{fit_network, impl_network_classifier, StructureBuilder};
use crate::hyperparams::SpodeValidParams;

/// Super-parent one-dependence estimator
///
/// Fixed topology: the class is a parent of every feature and the super-parent feature is a
/// parent of every other feature.
#[derive(Debug, Clone)]
pub struct Spode {
    pub(crate) network: Network,
    parent: usize,
}

impl Spode {
    /// Index of the super-parent feature
    pub fn parent(&self) -> usize {
        self.parent
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}

struct SpodeBuilder {
    root: usize,
}

impl StructureBuilder for SpodeBuilder {
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
            if i != self.root {
                network.add_edge(&features[self.root], feature)?;
            }
        }
        Ok(())
    }
}

impl<S, T> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for SpodeValidParams
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    type Object = Spode;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<Spode> {
        let root = self.parent();
        if root >= dataset.records.ncols() {
            return Err(Error::InvalidArgument(
                "The parent node is not in the dataset".to_string(),
            ));
        }
        let network = fit_network(&SpodeBuilder { root }, dataset, self.smoothing())?;
        tracing::debug!(parent = root, "fitted SPODE");
        Ok(Spode {
            network,
            parent: root,
        })
    }
}

impl_network_classifier!(Spode);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bayesnet::prelude::*;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<Spode>();
        has_autotraits::<crate::SpodeParams>();
        has_autotraits::<SpodeValidParams>();
    }

    #[test]
    fn iris_structure() {
        let dataset = bayesnet_datasets::iris();
        let model = Spode::params(1).fit(&dataset).unwrap();
        assert_eq!(model.number_of_nodes(), 5);
        // four class edges plus three from the super-parent
        assert_eq!(model.number_of_edges(), 7);
        assert_eq!(
            model.show(),
            vec![
                "class -> sepallength, sepalwidth, petallength, petalwidth, ",
                "petallength -> ",
                "petalwidth -> ",
                "sepallength -> ",
                "sepalwidth -> sepallength, petallength, petalwidth, ",
            ]
        );
    }

    #[test]
    fn cpt_columns_sum_to_one() {
        let dataset = bayesnet_datasets::iris();
        let model = Spode::params(0).fit(&dataset).unwrap();
        let node = model.network().node("petalwidth").unwrap();
        // shape [petalwidth, class, sepallength]
        assert_eq!(node.cpt().shape(), &[3, 3, 3]);
        for c in 0..3 {
            for s in 0..3 {
                let total: f64 = (0..3).map(|v| node.cpt()[&[v, c, s][..]]).sum();
                assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn parent_out_of_range() {
        let dataset = bayesnet_datasets::iris();
        let err = Spode::params(7).fit(&dataset).unwrap_err();
        assert_eq!(err.to_string(), "The parent node is not in the dataset");
    }

    #[test]
    fn dump_cpt_lists_every_node() {
        let dataset = bayesnet_datasets::iris();
        let model = Spode::params(2).fit(&dataset).unwrap();
        let dump = model.dump_cpt();
        for name in ["class", "sepallength", "sepalwidth", "petallength", "petalwidth"].iter() {
            assert!(dump.contains(&format!("* {}: (3)", name)));
        }
    }
}
