//! Tree augmented naive Bayes
use bayesnet::error::{Error, Result};
use bayesnet::metrics::{mutual_information, Metrics};
use bayesnet::network::Network;
use bayesnet::traits::Fit;
use bayesnet::DatasetBase;
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2};

use crate::base::{fit_network, impl_network_classifier, StructureBuilder};
use crate::hyperparams::TanValidParams;

/// Tree augmented naive Bayes classifier
///
/// Every feature gets the class as parent plus at most one feature parent, chosen by a maximum
/// spanning tree over the class conditional mutual information between features. The tree is
/// rooted at the configured parent or at the feature sharing the most information with the
/// class.
///
/// ```
/// use bayesnet::prelude::*;
/// use bayesnet_classifiers::Tan;
///
/// let dataset = bayesnet_datasets::iris();
/// let model = Tan::params().fit(&dataset)?;
/// assert_eq!(model.number_of_edges(), 7);
/// # Ok::<(), bayesnet::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Tan {
    pub(crate) network: Network,
    root: usize,
}

impl Tan {
    /// Index of the feature the spanning tree was rooted at
    pub fn root(&self) -> usize {
        self.root
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}

struct TanBuilder {
    root: usize,
}

/// Feature with the highest mutual information with the class, the last one on ties
fn most_informative(samples: ArrayView2<usize>, weights: ArrayView1<f64>) -> usize {
    let n_features = samples.nrows() - 1;
    let labels = samples.row(n_features);
    let mut scores = (0..n_features)
        .map(|i| (i, mutual_information(labels, samples.row(i), weights)))
        .collect::<Vec<_>>();
    scores.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    scores.last().map(|(i, _)| *i).unwrap_or(0)
}

impl StructureBuilder for TanBuilder {
    fn build(
        &self,
        network: &mut Network,
        metrics: &mut Metrics,
        weights: ArrayView1<f64>,
    ) -> Result<()> {
        let features = metrics.features().to_vec();
        let class_name = metrics.class_name().to_string();
        let conditional = metrics.conditional_edge(weights);
        let tree = metrics.maximum_spanning_tree(&features, conditional.view(), self.root);
        for (from, to) in tree {
            network.add_edge(&features[from], &features[to])?;
        }
        for feature in features.iter() {
            network.add_edge(&class_name, feature)?;
        }
        Ok(())
    }
}

impl<S, T> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for TanValidParams
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    type Object = Tan;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<Tan> {
        let n_features = dataset.records.ncols();
        let root = match self.parent() {
            Some(parent) => parent,
            None => most_informative(
                dataset.samples()?.view(),
                dataset.sample_weights().view(),
            ),
        };
        if root >= n_features {
            return Err(Error::InvalidArgument(
                "The parent node is not in the dataset".to_string(),
            ));
        }
        let network = fit_network(&TanBuilder { root }, dataset, self.smoothing())?;
        tracing::debug!(
            root,
            edges = network.num_edges(),
            "fitted tree augmented naive Bayes"
        );
        Ok(Tan { network, root })
    }
}

impl_network_classifier!(Tan);
