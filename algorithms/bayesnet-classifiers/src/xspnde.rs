//! Two super-parent estimator over flat count tables
use bayesnet::error::{Error, Result};
use bayesnet::traits::{Classifier, Fit};
use bayesnet::DatasetBase;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2};
use std::fmt;

use crate::flat::{argmax_rows, cardinalities, check_sample, normalize, predict_proba_chunked};
use crate::hyperparams::XSpndeValidParams;

/// Flat estimator of `p(c) p(sp1 | c) p(sp2 | c) prod p(x_f | c, sp1, sp2)`
///
/// The cell of child `f` for `(sp1, sp2, v, c)` is stored at
/// `offset + sp1 * (card_sp2 * card_f * C) + sp2 * (card_f * C) + v * C + c`.
#[derive(Debug, Clone)]
pub struct XSpnde {
    parent1: usize,
    parent2: usize,
    feature_names: Vec<String>,
    class_name: String,
    states: Vec<usize>,
    class_states: usize,
    class_counts: Vec<f64>,
    class_priors: Vec<f64>,
    sp1_feature_counts: Vec<f64>,
    sp1_feature_probs: Vec<f64>,
    sp2_feature_counts: Vec<f64>,
    sp2_feature_probs: Vec<f64>,
    child_counts: Vec<f64>,
    child_probs: Vec<f64>,
    child_offsets: Vec<Option<usize>>,
    alpha: f64,
    initializer: f64,
}

impl XSpnde {
    pub fn parents(&self) -> (usize, usize) {
        (self.parent1, self.parent2)
    }

    pub fn n_features(&self) -> usize {
        self.states.len()
    }

    pub fn class_priors(&self) -> &[f64] {
        &self.class_priors
    }

    fn empty(
        (parent1, parent2): (usize, usize),
        feature_names: Vec<String>,
        class_name: String,
        states: Vec<usize>,
        class_states: usize,
    ) -> Self {
        let n = states.len();
        let mut child_offsets = vec![None; n];
        let mut total = 0;
        for f in (0..n).filter(|&f| f != parent1 && f != parent2) {
            child_offsets[f] = Some(total);
            total += states[f] * class_states * states[parent1] * states[parent2];
        }
        XSpnde {
            parent1,
            parent2,
            feature_names,
            class_name,
            class_counts: vec![0.0; class_states],
            class_priors: vec![0.0; class_states],
            sp1_feature_counts: vec![0.0; states[parent1] * class_states],
            sp1_feature_probs: vec![0.0; states[parent1] * class_states],
            sp2_feature_counts: vec![0.0; states[parent2] * class_states],
            sp2_feature_probs: vec![0.0; states[parent2] * class_states],
            child_counts: vec![0.0; total],
            child_probs: vec![0.0; total],
            child_offsets,
            states,
            class_states,
            alpha: 1.0,
            initializer: 1.0,
        }
    }

    /// First cell of child `f` for the given super-parent values
    fn child_base(&self, offset: usize, f: usize, sp1: usize, sp2: usize) -> usize {
        let block_child = self.states[f] * self.class_states;
        offset + sp1 * (self.states[self.parent2] * block_child) + sp2 * block_child
    }

    fn add_sample(&mut self, sample: ArrayView1<usize>, class: usize, weight: f64) {
        if weight <= 0.0 {
            return;
        }
        let c_states = self.class_states;
        let (sp1, sp2) = (sample[self.parent1], sample[self.parent2]);
        self.class_counts[class] += weight;
        self.sp1_feature_counts[sp1 * c_states + class] += weight;
        self.sp2_feature_counts[sp2 * c_states + class] += weight;
        for (f, &value) in sample.iter().enumerate() {
            if let Some(offset) = self.child_offsets[f] {
                let idx = self.child_base(offset, f, sp1, sp2) + value * c_states + class;
                self.child_counts[idx] += weight;
            }
        }
    }

    fn parent_probabilities(&self, counts: &[f64], card: usize) -> Vec<f64> {
        let c_states = self.class_states;
        let mut probs = vec![0.0; counts.len()];
        for value in 0..card {
            for c in 0..c_states {
                let denominator = self.class_counts[c] + self.alpha * card as f64;
                if denominator > 0.0 {
                    probs[value * c_states + c] =
                        (counts[value * c_states + c] + self.alpha) / denominator;
                }
            }
        }
        probs
    }

    fn compute_probabilities(&mut self) {
        let c_states = self.class_states;
        let alpha = self.alpha;
        let total: f64 = self.class_counts.iter().sum();
        for c in 0..c_states {
            self.class_priors[c] = if total <= 0.0 {
                1.0 / c_states as f64
            } else {
                (self.class_counts[c] + alpha) / (total + alpha * c_states as f64)
            };
        }
        self.sp1_feature_probs =
            self.parent_probabilities(&self.sp1_feature_counts, self.states[self.parent1]);
        self.sp2_feature_probs =
            self.parent_probabilities(&self.sp2_feature_counts, self.states[self.parent2]);

        for f in 0..self.states.len() {
            let offset = match self.child_offsets[f] {
                Some(offset) => offset,
                None => continue,
            };
            let card = self.states[f];
            for sp1 in 0..self.states[self.parent1] {
                for sp2 in 0..self.states[self.parent2] {
                    let base = self.child_base(offset, f, sp1, sp2);
                    for c in 0..c_states {
                        // count of (sp1, sp2, c) summed over the child values
                        let joint: f64 = (0..card)
                            .map(|v| self.child_counts[base + v * c_states + c])
                            .sum();
                        let denominator = joint + alpha * card as f64;
                        for v in 0..card {
                            let idx = base + v * c_states + c;
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
    }

    fn predict_sample_into(&self, sample: ArrayView1<usize>, probs: &mut [f64]) -> Result<()> {
        check_sample(sample, &self.states)?;
        let c_states = self.class_states;
        let (sp1, sp2) = (sample[self.parent1], sample[self.parent2]);
        for (c, p) in probs.iter_mut().enumerate() {
            *p = self.class_priors[c]
                * self.sp1_feature_probs[sp1 * c_states + c]
                * self.sp2_feature_probs[sp2 * c_states + c]
                * self.initializer;
        }
        for (f, &value) in sample.iter().enumerate() {
            if let Some(offset) = self.child_offsets[f] {
                let base = self.child_base(offset, f, sp1, sp2) + value * c_states;
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

impl<S, T> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for XSpndeValidParams
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    type Object = XSpnde;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<XSpnde> {
        let (states, class_states) = cardinalities(dataset)?;
        let n = states.len();
        if self.parent1() >= n || self.parent2() >= n {
            return Err(Error::InvalidArgument(
                "The parent node is not in the dataset".to_string(),
            ));
        }
        let mut model = XSpnde::empty(
            (self.parent1(), self.parent2()),
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
        tracing::debug!(
            parent1 = self.parent1(),
            parent2 = self.parent2(),
            "fitted flat SPnDE"
        );
        Ok(model)
    }
}

impl Classifier for XSpnde {
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
        (3 * self.n_features()).saturating_sub(4)
    }

    fn number_of_states(&self) -> usize {
        self.states.iter().sum::<usize>() * self.n_features()
    }

    fn class_num_states(&self) -> usize {
        self.class_states
    }

    fn show(&self) -> Vec<String> {
        let mut class_line = format!("{} -> ", self.class_name);
        let mut sp_lines = [self.parent1, self.parent2]
            .iter()
            .map(|&p| format!("{} -> ", self.feature_names[p]))
            .collect::<Vec<_>>();
        for (f, name) in self.feature_names.iter().enumerate() {
            class_line.push_str(&format!("{}, ", name));
            if self.child_offsets[f].is_some() {
                for line in sp_lines.iter_mut() {
                    line.push_str(&format!("{}, ", name));
                }
            }
        }
        std::iter::once(class_line).chain(sp_lines).collect()
    }

    fn graph(&self, title: &str) -> Vec<String> {
        vec![title.to_string()]
    }

    fn topological_order(&self) -> Vec<String> {
        [self.parent1, self.parent2]
            .iter()
            .copied()
            .chain((0..self.n_features()).filter(|&f| self.child_offsets[f].is_some()))
            .map(|f| self.feature_names[f].clone())
            .collect()
    }

    fn dump_cpt(&self) -> String {
        self.to_string()
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for XSpnde {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----- XSpnde Model -----")?;
        writeln!(f, "nFeatures    = {}", self.n_features())?;
        writeln!(f, "superParent1 = {}", self.parent1)?;
        writeln!(f, "superParent2 = {}", self.parent2)?;
        writeln!(f, "statesClass  = {}", self.class_states)?;
        writeln!(f)?;
        writeln!(f, "States: [{}]", join(&self.states))?;
        writeln!(f, "classCounts: [{}]", join(&self.class_counts))?;
        writeln!(f, "classPriors: [{}]", join(&self.class_priors))?;
        writeln!(f, "sp1FeatureCounts (size={})", self.sp1_feature_counts.len())?;
        writeln!(f, "[{}]", join(&self.sp1_feature_counts))?;
        writeln!(f, "sp2FeatureCounts (size={})", self.sp2_feature_counts.len())?;
        writeln!(f, "[{}]", join(&self.sp2_feature_counts))?;
        writeln!(f, "childCounts (size={})", self.child_counts.len())?;
        writeln!(f, "[{}]", join(&self.child_counts))?;
        let offsets = self
            .child_offsets
            .iter()
            .map(|o| o.map_or_else(|| "-".to_string(), |o| o.to_string()))
            .collect::<Vec<_>>();
        writeln!(f, "childOffsets: [{}]", offsets.join(" "))?;
        writeln!(f, "----------------------------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bayesnet::network::Smoothing;
    use bayesnet::prelude::*;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<XSpnde>();
        has_autotraits::<crate::XSpndeParams>();
        has_autotraits::<XSpndeValidParams>();
    }

    #[test]
    fn layout_and_counts() {
        let dataset = bayesnet_datasets::iris();
        let model = XSpnde::params(0, 3).fit(&dataset).unwrap();
        assert_eq!(model.parents(), (0, 3));
        assert_eq!(model.number_of_nodes(), 5);
        assert_eq!(model.number_of_edges(), 8);
        assert_eq!(model.number_of_states(), 48);
        // two children, 3 values each, 3 classes and 3 x 3 super-parent values
        assert_eq!(model.child_counts.len(), 2 * 81);
        assert_eq!(model.child_offsets, vec![None, Some(0), Some(81), None]);
        assert_eq!(
            model.topological_order(),
            vec!["sepallength", "petalwidth", "sepalwidth", "petallength"]
        );
        assert_eq!(model.show().len(), 3);
    }

    #[test]
    fn child_distributions_sum_to_one() {
        let dataset = bayesnet_datasets::iris();
        let model = XSpnde::params(1, 2)
            .smoothing(Smoothing::Laplace)
            .fit(&dataset)
            .unwrap();
        for f in [0usize, 3].iter().copied() {
            let offset = model.child_offsets[f].unwrap();
            for sp1 in 0..3 {
                for sp2 in 0..3 {
                    let base = model.child_base(offset, f, sp1, sp2);
                    for c in 0..3 {
                        let total: f64 = (0..3).map(|v| model.child_probs[base + v * 3 + c]).sum();
                        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn predictions_are_normalized() {
        let dataset = bayesnet_datasets::iris();
        let model = XSpnde::params(2, 3).fit(&dataset).unwrap();
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
        let probs = model
            .predict_proba_sample(dataset.records.row(0))
            .unwrap();
        assert_abs_diff_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(model.to_string().starts_with("----- XSpnde Model -----"));
    }

    #[test]
    fn invalid_parents() {
        let dataset = bayesnet_datasets::iris();
        assert!(XSpnde::params(1, 1).fit(&dataset).is_err());
        assert!(XSpnde::params(1, 5).fit(&dataset).is_err());
    }
}
