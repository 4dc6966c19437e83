//! K-dependence Bayesian classifier
use bayesnet::error::{Error, Result};
use bayesnet::metrics::Metrics;
use bayesnet::network::Network;
use bayesnet::traits::Fit;
use bayesnet::utils::argmax;
use bayesnet::DatasetBase;
use ndarray::{Array2, ArrayBase, ArrayView1, Data, Ix1, Ix2};

use crate::base::{fit_network, impl_network_classifier, StructureBuilder};
use crate::hyperparams::KdbValidParams;

/// K-dependence Bayesian classifier
///
/// Features are placed in decreasing order of mutual information with the class. Each one
/// receives the class as parent and up to `k` already placed features whose class conditional
/// mutual information with it exceeds `theta`.
#[derive(Debug, Clone)]
pub struct Kdb {
    pub(crate) network: Network,
    k: usize,
    theta: f64,
}

impl Kdb {
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    fn title(&self, title: &str) -> String {
        if title == "KDB" {
            format!("KDB (k={}, theta={})", self.k, self.theta)
        } else {
            title.to_string()
        }
    }
}

struct KdbBuilder {
    k: usize,
    theta: f64,
}

impl KdbBuilder {
    /// Wire up to `min(k, |placed|)` feature parents into `child`
    fn add_m_edges(
        &self,
        network: &mut Network,
        features: &[String],
        child: usize,
        placed: &[usize],
        weights: &Array2<f64>,
    ) {
        let n_edges = self.k.min(placed.len());
        let mut row = weights.row(child).to_owned();
        let mut added = 0;
        let mut finished = self.k == 0;
        while !finished {
            let candidate = argmax(row.view());
            if placed.contains(&candidate) && row[candidate] > self.theta {
                // edges closing a loop are skipped
                if network
                    .add_edge(&features[candidate], &features[child])
                    .is_ok()
                {
                    added += 1;
                }
            }
            row[candidate] = -1.0;
            let remaining = row.iter().filter(|&&w| w > self.theta).count();
            finished = added == n_edges || remaining == 0;
        }
    }
}

impl StructureBuilder for KdbBuilder {
    fn build(
        &self,
        network: &mut Network,
        metrics: &mut Metrics,
        weights: ArrayView1<f64>,
    ) -> Result<()> {
        let features = metrics.features().to_vec();
        let class_name = metrics.class_name().to_string();
        let conditional = metrics.conditional_edge(weights);
        let order = metrics.select_k_best_weighted(weights, false, 0);

        let mut placed = Vec::with_capacity(order.len());
        for idx in order {
            network.add_edge(&class_name, &features[idx])?;
            self.add_m_edges(network, &features, idx, &placed, &conditional);
            placed.push(idx);
        }
        Ok(())
    }
}

impl<S, T> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for KdbValidParams
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    type Object = Kdb;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<Kdb> {
        let builder = KdbBuilder {
            k: self.k(),
            theta: self.theta(),
        };
        let network = fit_network(&builder, dataset, self.smoothing())?;
        tracing::debug!(
            k = self.k(),
            theta = self.theta(),
            edges = network.num_edges(),
            "fitted k-dependence Bayesian classifier"
        );
        Ok(Kdb {
            network,
            k: self.k(),
            theta: self.theta(),
        })
    }
}

impl_network_classifier!(Kdb, |model: &Kdb, title: &str| model.title(title));

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bayesnet::prelude::*;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<Kdb>();
        has_autotraits::<crate::KdbParams>();
        has_autotraits::<KdbValidParams>();
    }

    #[test]
    fn every_feature_has_the_class_and_at_most_k_parents() {
        let dataset = bayesnet_datasets::iris();
        for k in 0..4 {
            let model = Kdb::params().k(k).fit(&dataset).unwrap();
            let network = model.network();
            for feature in dataset.feature_names() {
                let node = network.node(feature).unwrap();
                let parents = node
                    .parents()
                    .iter()
                    .map(|&p| network.nodes()[p].name().to_string())
                    .collect::<Vec<_>>();
                assert!(parents.contains(&"class".to_string()));
                assert!(parents.len() <= k + 1);
            }
        }
    }

    #[test]
    fn k_zero_is_naive_bayes() {
        let dataset = bayesnet_datasets::iris();
        let model = Kdb::params().k(0).fit(&dataset).unwrap();
        assert_eq!(model.number_of_edges(), 4);
        assert_eq!(model.number_of_nodes(), 5);
    }

    #[test]
    fn high_theta_keeps_only_class_edges() {
        let dataset = bayesnet_datasets::iris();
        let model = Kdb::params().theta(10.0).fit(&dataset).unwrap();
        assert_eq!(model.number_of_edges(), 4);
    }

    #[test]
    fn graph_title_carries_the_parameters() {
        let dataset = bayesnet_datasets::iris();
        let model = Kdb::params().k(2).fit(&dataset).unwrap();
        let graph = model.graph("KDB");
        assert!(graph[0].contains("KDB (k=2, theta=0.03)"));
        let graph = model.graph("other");
        assert!(graph[0].contains("BayesNet other"));
    }

    #[test]
    fn predictions_are_normalized() {
        let dataset = bayesnet_datasets::iris();
        let model = Kdb::params().fit(&dataset).unwrap();
        let proba = model.predict_proba(dataset.records.view()).unwrap();
        for row in proba.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
        }
        assert!(
            model
                .score(dataset.records.view(), dataset.targets.view())
                .unwrap()
                > 0.9
        );
    }
}
