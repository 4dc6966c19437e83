//! Datasets
//!
//! This module implements the dataset struct holding discrete samples, their class labels and
//! the metadata every Bayesian network classifier needs: feature names, the class name, the
//! valid states of every variable and optional sample weights.
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Ix1, Ix2, OwnedRepr};

use std::collections::BTreeMap;

mod impl_dataset;
mod impl_records;

/// Valid codes of every variable, keyed by feature name (including the class name)
///
/// The length of each entry is the cardinality of the variable. Codes are expected to be
/// `0..cardinality`.
pub type States = BTreeMap<String, Vec<usize>>;

/// DatasetBase
///
/// This is the fundamental structure of a dataset. It contains discrete records, the class of
/// every record and may contain weights, feature names and state definitions.
///
/// # Fields
///
/// * `records`: a two-dimensional matrix with dimensionality (nsamples, nfeatures) holding
/// zero-based discrete codes
/// * `targets`: the class code of every sample with dimensionality (nsamples)
/// * `weights`: optional weights for each sample with dimensionality (nsamples), empty means
/// uniform weights `1/nsamples`
/// * `feature_names`: descriptive feature names with dimensionality (nfeatures)
/// * `class_name`: name of the class variable
/// * `states`: valid codes of every feature and of the class
///
/// # Trait bounds
///
/// * `R: Records`: generic over owned matrices and views
/// * `T`: generic over owned and borrowed one-dimensional targets
#[derive(Debug, Clone)]
pub struct DatasetBase<R, T>
where
    R: Records,
{
    pub records: R,
    pub targets: T,

    pub weights: ndarray::Array1<f64>,
    feature_names: Vec<String>,
    class_name: String,
    states: States,
}

/// Dataset
///
/// The most commonly used type of dataset. Records are stored as an owned `Array2<usize>` and
/// the class of every record as an owned `Array1<usize>`.
pub type Dataset = DatasetBase<ArrayBase<OwnedRepr<usize>, Ix2>, ArrayBase<OwnedRepr<usize>, Ix1>>;

/// DatasetView
///
/// A read only view of a Dataset
pub type DatasetView<'a> = DatasetBase<ArrayView2<'a, usize>, ArrayView1<'a, usize>>;

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}
