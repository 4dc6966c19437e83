//! Fit path shared by the network backed classifiers
//!
//! Every structure learner goes through the same steps: validate the dataset against its
//! states, compute the metrics over the training samples, register one node per feature plus
//! the class, let the learner add its edges and finally estimate the probability tables.
use bayesnet::error::{Error, Result};
use bayesnet::metrics::Metrics;
use bayesnet::network::{Network, Smoothing};
use bayesnet::DatasetBase;
use ndarray::{ArrayBase, ArrayView1, Data, Ix1, Ix2};

/// Adds the edges of a network structure
///
/// Nodes for every feature and for the class are already registered when `build` is called.
pub(crate) trait StructureBuilder {
    fn build(
        &self,
        network: &mut Network,
        metrics: &mut Metrics,
        weights: ArrayView1<f64>,
    ) -> Result<()>;
}

/// Checks that the dataset describes every variable it uses
pub(crate) fn check_fit_parameters<S, T>(
    dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>,
) -> Result<()>
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    let n = dataset.records.ncols();
    let features = dataset.feature_names();
    if n != features.len() {
        return Err(Error::InvalidArgument(format!(
            "Classifier: X {} and features {} must have the same number of features",
            n,
            features.len()
        )));
    }
    if !dataset.states().contains_key(dataset.class_name()) {
        return Err(Error::InvalidArgument(
            "className not found in states".to_string(),
        ));
    }
    if let Some(feature) = features
        .iter()
        .find(|feature| !dataset.states().contains_key(*feature))
    {
        return Err(Error::InvalidArgument(format!(
            "feature [{}] not found in states",
            feature
        )));
    }
    Ok(())
}

/// Learns the structure given by `builder` and fits its probability tables
pub(crate) fn fit_network<S, T, B>(
    builder: &B,
    dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>,
    smoothing: Smoothing,
) -> Result<Network>
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
    B: StructureBuilder,
{
    check_fit_parameters(dataset)?;
    let samples = dataset.samples()?;
    let weights = dataset.sample_weights();
    let features = dataset.feature_names().to_vec();
    let class_name = dataset.class_name();

    let mut metrics = Metrics::new(
        samples.clone(),
        features.clone(),
        class_name,
        dataset.class_num_states(),
    );
    let mut network = Network::new();
    network.initialize();
    for feature in features.iter() {
        network.add_node(feature)?;
    }
    network.add_node(class_name)?;

    builder.build(&mut network, &mut metrics, weights.view())?;
    network.fit_samples(
        samples.view(),
        weights.view(),
        &features,
        class_name,
        dataset.states(),
        smoothing,
    )?;
    Ok(network)
}

/// Implements `Classifier` for a fitted model holding its `Network` in the field `network`
macro_rules! impl_network_classifier {
    ($model:ty) => {
        impl_network_classifier!($model, |_model: &$model, title: &str| title.to_string());
    };
    ($model:ty, $title:expr) => {
        impl bayesnet::traits::Classifier for $model {
            fn predict(
                &self,
                x: ndarray::ArrayView2<usize>,
            ) -> bayesnet::error::Result<ndarray::Array1<usize>> {
                self.network.predict(x)
            }

            fn predict_proba(
                &self,
                x: ndarray::ArrayView2<usize>,
            ) -> bayesnet::error::Result<ndarray::Array2<f64>> {
                self.network.predict_proba(x)
            }

            fn number_of_nodes(&self) -> usize {
                self.network.features().len()
            }

            fn number_of_edges(&self) -> usize {
                self.network.num_edges()
            }

            fn number_of_states(&self) -> usize {
                self.network.states()
            }

            fn class_num_states(&self) -> usize {
                self.network.class_num_states()
            }

            fn show(&self) -> Vec<String> {
                self.network.show()
            }

            fn graph(&self, title: &str) -> Vec<String> {
                let title = ($title)(self, title);
                self.network.graph(&title)
            }

            fn topological_order(&self) -> Vec<String> {
                self.network.topological_sort()
            }

            fn dump_cpt(&self) -> String {
                self.network.dump_cpt()
            }
        }
    };
}

pub(crate) use impl_network_classifier;
