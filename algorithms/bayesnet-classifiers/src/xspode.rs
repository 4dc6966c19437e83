//! Super-parent one-dependence estimator over flat count tables
//!
//! Equivalent to a SPODE but without the general network machinery: the probabilities
//! `p(c)`, `p(sp | c)` and `p(child | c, sp)` live in contiguous vectors indexed by hand.
use bayesnet::error::{Error, Result};
use bayesnet::traits::{Classifier, Fit};
use bayesnet::DatasetBase;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2};
use std::fmt;

use crate::flat::{argmax_rows, cardinalities, check_sample, normalize, predict_proba_chunked};
use crate::hyperparams::XSpodeValidParams;

/// Flat super-parent one-dependence estimator
///
/// Layout of the child tables: the block of child `f` starts at `child_offsets[f]` and the
/// cell of `(sp, v, c)` sits at `offset + sp * (card_f * C) + v * C + c`.
#[derive(Debug, Clone)]
pub struct XSpode {
    parent: usize,
    feature_names: Vec<String>,
    class_name: String,
    states: Vec<usize>,
    class_states: usize,
    class_counts: Vec<f64>,
    class_priors: Vec<f64>,
    sp_feature_counts: Vec<f64>,
    sp_feature_probs: Vec<f64>,
    child_counts: Vec<f64>,
    child_probs: Vec<f64>,
    child_offsets: Vec<Option<usize>>,
    alpha: f64,
    initializer: f64,
}

impl XSpode {
    /// Index of the super-parent feature
    pub fn parent(&self) -> usize {
        self.parent
    }

    pub fn n_features(&self) -> usize {
        self.states.len()
    }

    /// Number of states of every feature
    pub fn states(&self) -> &[usize] {
        &self.states
    }

    pub fn class_priors(&self) -> &[f64] {
        &self.class_priors
    }

    fn empty(parent: usize, feature_names: Vec<String>, class_name: String, states: Vec<usize>, class_states: usize) -> Self {
        let n = states.len();
        let sp_card = states[parent];
        let mut child_offsets = vec![None; n];
        let mut total = 0;
        for f in (0..n).filter(|&f| f != parent) {
            child_offsets[f] = Some(total);
            total += states[f] * class_states * sp_card;
        }
        XSpode {
            parent,
            feature_names,
            class_name,
            states,
            class_states,
            class_counts: vec![0.0; class_states],
            class_priors: vec![0.0; class_states],
            sp_feature_counts: vec![0.0; sp_card * class_states],
            sp_feature_probs: vec![0.0; sp_card * class_states],
            child_counts: vec![0.0; total],
            child_probs: vec![0.0; total],
            child_offsets,
            alpha: 1.0,
            initializer: 1.0,
        }
    }

    /// Add the weighted counts of one sample, class last
    fn add_sample(&mut self, sample: ArrayView1<usize>, class: usize, weight: f64) {
        if weight <= 0.0 {
            return;
        }
        let c_states = self.class_states;
        self.class_counts[class] += weight;
        let sp_value = sample[self.parent];
        self.sp_feature_counts[sp_value * c_states + class] += weight;
        for (f, &value) in sample.iter().enumerate() {
            if let Some(offset) = self.child_offsets[f] {
                let block = self.states[f] * c_states;
                self.child_counts[offset + sp_value * block + value * c_states + class] += weight;
            }
        }
    }

    fn compute_probabilities(&mut self) {
        let c_states = self.class_states;
        let alpha = self.alpha;
        let total: f64 = self.class_counts.iter().sum();
        if total <= 0.0 {
            let uniform = 1.0 / c_states as f64;
            self.class_priors.iter_mut().for_each(|p| *p = uniform);
        } else {
            for c in 0..c_states {
                self.class_priors[c] =
                    (self.class_counts[c] + alpha) / (total + alpha * c_states as f64);
            }
        }

        let sp_card = self.states[self.parent];
        for sp_value in 0..sp_card {
            for c in 0..c_states {
                let denominator = self.class_counts[c] + alpha * sp_card as f64;
                let numerator = self.sp_feature_counts[sp_value * c_states + c] + alpha;
                self.sp_feature_probs[sp_value * c_states + c] = if denominator <= 0.0 {
                    0.0
                } else {
                    numerator / denominator
                };
            }
        }

        for f in 0..self.states.len() {
            let offset = match self.child_offsets[f] {
                Some(offset) => offset,
                None => continue,
            };
            let child_card = self.states[f];
            for sp_value in 0..sp_card {
                for value in 0..child_card {
                    for c in 0..c_states {
                        let idx = offset + sp_value * (child_card * c_states) + value * c_states + c;
                        let denominator = self.sp_feature_counts[sp_value * c_states + c]
                            + alpha * child_card as f64;
                        self.child_probs[idx] = if denominator <= 0.0 {
                            0.0
                        } else {
                            (self.child_counts[idx] + alpha) / denominator
                        };
                    }
                }
            }
        }
    }

    /// `p(c | x)` of one sample written into `probs`
    fn predict_sample_into(&self, sample: ArrayView1<usize>, probs: &mut [f64]) -> Result<()> {
        check_sample(sample, &self.states)?;
        let c_states = self.class_states;
        let sp_value = sample[self.parent];
        for (c, p) in probs.iter_mut().enumerate() {
            *p = self.class_priors[c] * self.sp_feature_probs[sp_value * c_states + c] * self.initializer;
        }
        for (f, &value) in sample.iter().enumerate() {
            if let Some(offset) = self.child_offsets[f] {
                let base = offset + sp_value * (self.states[f] * c_states) + value * c_states;
                for (c, p) in probs.iter_mut().enumerate() {
                    *p *= self.child_probs[base + c];
                }
            }
        }
        normalize(probs);
        Ok(())
    }

    /// Class posterior of a single sample
    pub fn predict_proba_sample(&self, sample: ArrayView1<usize>) -> Result<Vec<f64>> {
        let mut probs = vec![0.0; self.class_states];
        self.predict_sample_into(sample, &mut probs)?;
        Ok(probs)
    }
}

impl<S, T> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for XSpodeValidParams
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    type Object = XSpode;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<XSpode> {
        let (states, class_states) = cardinalities(dataset)?;
        let n = states.len();
        if self.parent() >= n {
            return Err(Error::InvalidArgument(
                "The parent node is not in the dataset".to_string(),
            ));
        }
        let mut model = XSpode::empty(
            self.parent(),
            dataset.feature_names().to_vec(),
            dataset.class_name().to_string(),
            states,
            class_states,
        );
        let weights = dataset.sample_weights();
        for ((sample, &class), &weight) in dataset
            .records
            .rows()
            .into_iter()
            .zip(dataset.targets.iter())
            .zip(weights.iter())
        {
            model.add_sample(sample, class, weight);
        }
        model.alpha = self.smoothing().alpha(dataset.records.nrows());
        model.initializer = f64::MAX / (n * n) as f64;
        model.compute_probabilities();
        tracing::debug!(parent = self.parent(), "fitted flat SPODE");
        Ok(model)
    }
}

impl Classifier for XSpode {
    fn predict(&self, x: ArrayView2<usize>) -> Result<Array1<usize>> {
        let probabilities = self.predict_proba(x)?;
        Ok(argmax_rows(&probabilities))
    }

    fn predict_proba(&self, x: ArrayView2<usize>) -> Result<Array2<f64>> {
        predict_proba_chunked(x, self.class_states, |sample, probs| {
            self.predict_sample_into(sample, probs)
        })
    }

    fn number_of_nodes(&self) -> usize {
        self.n_features() + 1
    }

    fn number_of_edges(&self) -> usize {
        let n = self.n_features();
        n * (2 * n - 1)
    }

    fn number_of_states(&self) -> usize {
        self.states.iter().sum::<usize>() * self.n_features()
    }

    fn class_num_states(&self) -> usize {
        self.class_states
    }

    fn show(&self) -> Vec<String> {
        let sp_name = &self.feature_names[self.parent];
        let mut class_line = format!("{} -> ", self.class_name);
        let mut sp_line = format!("{} -> ", sp_name);
        for (f, name) in self.feature_names.iter().enumerate() {
            class_line.push_str(&format!("{}, ", name));
            if f != self.parent {
                sp_line.push_str(&format!("{}, ", name));
            }
        }
        vec![class_line, sp_line]
    }

    fn graph(&self, title: &str) -> Vec<String> {
        vec![title.to_string()]
    }

    fn topological_order(&self) -> Vec<String> {
        std::iter::once(self.parent)
            .chain((0..self.n_features()).filter(|&f| f != self.parent))
            .map(|f| self.feature_names[f].clone())
            .collect()
    }

    fn dump_cpt(&self) -> String {
        self.to_string()
    }
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for XSpode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- SPODE Model ----")?;
        writeln!(f, "nFeatures   = {}", self.n_features())?;
        writeln!(f, "superParent = {}", self.parent)?;
        writeln!(f, "statesClass = {}", self.class_states)?;
        writeln!(f)?;
        writeln!(f, "States: {:?}", self.states)?;
        writeln!(f, "classCounts: [{}]", join(&self.class_counts))?;
        writeln!(f, "classPriors: [{}]", join(&self.class_priors))?;
        writeln!(f, "spFeatureCounts: size = {}", self.sp_feature_counts.len())?;
        writeln!(f, "[{}]", join(&self.sp_feature_counts))?;
        writeln!(f, "spFeatureProbs: size = {}", self.sp_feature_probs.len())?;
        writeln!(f, "[{}]", join(&self.sp_feature_probs))?;
        writeln!(f, "childCounts: size = {}", self.child_counts.len())?;
        writeln!(f, "[{}]", join(&self.child_counts))?;
        writeln!(f, "childProbs: size = {}", self.child_probs.len())?;
        writeln!(f, "[{}]", join(&self.child_probs))?;
        let offsets = self
            .child_offsets
            .iter()
            .map(|o| o.map_or("-".to_string(), |o| o.to_string()))
            .collect::<Vec<_>>();
        writeln!(f, "childOffsets: [{}]", offsets.join(" "))?;
        writeln!(f, "---------------------")
    }
}
