//! Provide traits for different classes of algorithms
//!

use crate::dataset::{DatasetBase, Records};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset and creates a concept of some kind about it. For
/// example in Bayesian network classification a structure is learnt from the samples and its
/// conditional probability tables are estimated from the weighted counts.
pub trait Fit<R: Records, T, E: std::error::Error + From<Error>> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<R, T>) -> std::result::Result<Self::Object, E>;
}

/// Health of a fitted model
///
/// Ensembles that stop growing early are still usable; the reason is recorded in the notes and
/// reflected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Normal,
    Warning,
    Error,
}

impl Default for Status {
    fn default() -> Self {
        Status::Normal
    }
}

/// A fitted classifier over discrete samples
///
/// Samples are passed as a `m x n` matrix of codes, one row per sample. Every classifier in the
/// workspace, single networks as well as ensembles, implements this trait so that ensembles can
/// hold heterogeneous members behind `Box<dyn Classifier>`.
pub trait Classifier: Send + Sync {
    /// Predict the most probable class of every sample
    fn predict(&self, x: ArrayView2<usize>) -> Result<Array1<usize>>;

    /// Class posterior of every sample, rows sum to one
    fn predict_proba(&self, x: ArrayView2<usize>) -> Result<Array2<f64>>;

    /// Accuracy of the predictions against `y`
    fn score(&self, x: ArrayView2<usize>, y: ArrayView1<usize>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        if y_pred.len() != y.len() {
            return Err(Error::InvalidArgument(format!(
                "Predictions ({}) and labels ({}) must have the same number of samples",
                y_pred.len(),
                y.len()
            )));
        }
        if y.is_empty() {
            return Ok(0.0);
        }
        let correct = y_pred.iter().zip(y.iter()).filter(|(a, b)| a == b).count();
        Ok(correct as f64 / y.len() as f64)
    }

    fn number_of_nodes(&self) -> usize;
    fn number_of_edges(&self) -> usize;
    fn number_of_states(&self) -> usize;
    fn class_num_states(&self) -> usize;

    /// Adjacency list, one `"<node> -> <child>, <child>, "` line per node
    fn show(&self) -> Vec<String>;

    /// Graphviz description of the model
    fn graph(&self, title: &str) -> Vec<String>;

    fn topological_order(&self) -> Vec<String>;

    /// Human readable dump of the probability tables
    fn dump_cpt(&self) -> String;

    fn notes(&self) -> Vec<String> {
        Vec::new()
    }

    fn status(&self) -> Status {
        Status::Normal
    }
}
