//! Averaged two-dependence estimator over flat pairwise frequency tables
use bayesnet::error::{Error, Result};
use bayesnet::traits::{Classifier, Fit};
use bayesnet::utils::{argmax, normalize};
use bayesnet::DatasetBase;
use bayesnet_classifiers::flat::{argmax_rows, cardinalities, check_sample, predict_proba_chunked};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2};
use std::fmt;

use crate::hyperparams::Wa2deValidParams;

/// Weighted averaged two-dependence estimator
///
/// Every feature acts once as super-parent `sp` and scores the class with
/// `log p(c) + sum_{ch != sp} log p(x_sp, x_ch | c)`. The pairwise tables are shared by all the
/// super-parents, so no member model is built. The per super-parent scores are averaged in
/// log space, or each super-parent casts one vote when `predict_voting` is set.
///
/// The cell of `(x_i = u, x_j = v, c)` for `i < j` sits at
/// `pair_offsets[i * n + j] + (u * card_j + v) * C + c`.
#[derive(Debug, Clone)]
pub struct Wa2de {
    feature_names: Vec<String>,
    class_name: String,
    states: Vec<usize>,
    class_states: usize,
    class_counts: Vec<f64>,
    log_priors: Vec<f64>,
    pair_offsets: Vec<usize>,
    pair_counts: Vec<f64>,
    log_pair_probs: Vec<f64>,
    alpha: f64,
    predict_voting: bool,
}

fn ln_ratio(numerator: f64, denominator: f64) -> f64 {
    if numerator > 0.0 && denominator > 0.0 {
        (numerator / denominator).ln()
    } else {
        f64::NEG_INFINITY
    }
}

impl Wa2de {
    pub fn n_features(&self) -> usize {
        self.states.len()
    }

    pub fn predict_voting(&self) -> bool {
        self.predict_voting
    }

    /// Weighted class frequencies seen in fit
    pub fn class_counts(&self) -> &[f64] {
        &self.class_counts
    }

    fn empty(
        feature_names: Vec<String>,
        class_name: String,
        states: Vec<usize>,
        class_states: usize,
        predict_voting: bool,
    ) -> Self {
        let n = states.len();
        let mut pair_offsets = vec![0; n * n];
        let mut total = 0;
        for i in 0..n {
            for j in i + 1..n {
                pair_offsets[i * n + j] = total;
                total += states[i] * states[j] * class_states;
            }
        }
        Wa2de {
            feature_names,
            class_name,
            states,
            class_states,
            class_counts: vec![0.0; class_states],
            log_priors: vec![0.0; class_states],
            pair_offsets,
            pair_counts: vec![0.0; total],
            log_pair_probs: vec![0.0; total],
            alpha: 1.0,
            predict_voting,
        }
    }

    /// First cell of the pair `(i, j)` at values `(u, v)`, in either feature order
    fn pair_base(&self, i: usize, u: usize, j: usize, v: usize) -> usize {
        let (i, u, j, v) = if i < j { (i, u, j, v) } else { (j, v, i, u) };
        let n = self.states.len();
        self.pair_offsets[i * n + j] + (u * self.states[j] + v) * self.class_states
    }

    fn add_sample(&mut self, sample: ArrayView1<usize>, class: usize, weight: f64) {
        if weight <= 0.0 {
            return;
        }
        self.class_counts[class] += weight;
        let n = self.states.len();
        for i in 0..n {
            for j in i + 1..n {
                let idx = self.pair_base(i, sample[i], j, sample[j]) + class;
                self.pair_counts[idx] += weight;
            }
        }
    }

    fn compute_probabilities(&mut self) {
        let c_states = self.class_states;
        let alpha = self.alpha;
        let total: f64 = self.class_counts.iter().sum();
        for c in 0..c_states {
            self.log_priors[c] = if total <= 0.0 {
                -(c_states as f64).ln()
            } else {
                ln_ratio(
                    self.class_counts[c] + alpha,
                    total + alpha * c_states as f64,
                )
            };
        }
        let n = self.states.len();
        for i in 0..n {
            for j in i + 1..n {
                let cells = self.states[i] * self.states[j];
                let offset = self.pair_offsets[i * n + j];
                for cell in 0..cells {
                    for c in 0..c_states {
                        let idx = offset + cell * c_states + c;
                        self.log_pair_probs[idx] = ln_ratio(
                            self.pair_counts[idx] + alpha,
                            self.class_counts[c] + alpha * cells as f64,
                        );
                    }
                }
            }
        }
    }

    /// Log score of every class for every super-parent, `n x C` row major
    fn super_parent_scores(&self, sample: ArrayView1<usize>) -> Vec<f64> {
        let n = self.states.len();
        let c_states = self.class_states;
        let mut scores = Vec::with_capacity(n * c_states);
        for sp in 0..n {
            scores.extend_from_slice(&self.log_priors);
            let row = &mut scores[sp * c_states..];
            for ch in (0..n).filter(|&ch| ch != sp) {
                let base = self.pair_base(sp, sample[sp], ch, sample[ch]);
                for (c, score) in row.iter_mut().enumerate() {
                    *score += self.log_pair_probs[base + c];
                }
            }
        }
        scores
    }

    fn predict_sample_into(&self, sample: ArrayView1<usize>, probs: &mut [f64]) -> Result<()> {
        check_sample(sample, &self.states)?;
        let c_states = self.class_states;
        let scores = self.super_parent_scores(sample);
        if self.predict_voting {
            probs.iter_mut().for_each(|p| *p = 0.0);
            for row in scores.chunks(c_states) {
                probs[argmax(ArrayView1::from(row))] += 1.0;
            }
        } else {
            // log-sum-exp over the super-parents, then over the classes
            for (c, p) in probs.iter_mut().enumerate() {
                let column = scores.iter().skip(c).step_by(c_states);
                let max = column.clone().cloned().fold(f64::NEG_INFINITY, f64::max);
                *p = if max == f64::NEG_INFINITY {
                    max
                } else {
                    max + column.map(|s| (s - max).exp()).sum::<f64>().ln()
                };
            }
            let max = probs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            probs.iter_mut().for_each(|p| {
                *p = if max == f64::NEG_INFINITY {
                    0.0
                } else {
                    (*p - max).exp()
                }
            });
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

impl<S, T> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for Wa2deValidParams
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    type Object = Wa2de;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<Wa2de> {
        let (states, class_states) = cardinalities(dataset)?;
        if states.len() < 2 {
            return Err(Error::InvalidArgument(
                "WA2DE needs at least two features".to_string(),
            ));
        }
        let mut model = Wa2de::empty(
            dataset.feature_names().to_vec(),
            dataset.class_name().to_string(),
            states,
            class_states,
            self.predict_voting(),
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
        model.compute_probabilities();
        tracing::debug!(
            features = model.n_features(),
            cells = model.pair_counts.len(),
            "fitted WA2DE"
        );
        Ok(model)
    }
}

impl Classifier for Wa2de {
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

    /// Edges of the `n` super-parent estimators sharing the tables
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
        let mut lines = vec![format!("{} -> {}, ", self.class_name, self.feature_names.join(", "))];
        for (sp, name) in self.feature_names.iter().enumerate() {
            let mut line = format!("{} -> ", name);
            for (ch, child) in self.feature_names.iter().enumerate() {
                if ch != sp {
                    line.push_str(&format!("{}, ", child));
                }
            }
            lines.push(line);
        }
        lines
    }

    fn graph(&self, title: &str) -> Vec<String> {
        vec![
            title.to_string(),
            "Graph visualization not implemented.".to_string(),
        ]
    }

    fn topological_order(&self) -> Vec<String> {
        self.feature_names.clone()
    }

    fn dump_cpt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Wa2de {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----- WA2DE Model -----")?;
        writeln!(f, "nFeatures   = {}", self.n_features())?;
        writeln!(f, "statesClass = {}", self.class_states)?;
        writeln!(f, "States: {:?}", self.states)?;
        writeln!(f, "classCounts: {:?}", self.class_counts)?;
        writeln!(f, "pairCounts: size = {}", self.pair_counts.len())?;
        writeln!(f, "-----------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bayesnet::network::Smoothing;
    use bayesnet::prelude::*;
    use ndarray::array;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<Wa2de>();
        has_autotraits::<crate::Wa2deParams>();
        has_autotraits::<Wa2deValidParams>();
    }

    #[test]
    fn fit_and_score_on_iris() {
        let dataset = bayesnet_datasets::iris();
        let model = Wa2de::params().fit(&dataset).unwrap();
        assert!(!model.predict_voting());
        assert_eq!(model.number_of_nodes(), 5);
        // six pairs of 3 x 3 values over 3 classes
        assert_eq!(model.pair_counts.len(), 6 * 27);
        assert_abs_diff_eq!(model.pair_counts.iter().sum::<f64>(), 6.0, epsilon = 1e-9);

        let proba = model.predict_proba(dataset.records.view()).unwrap();
        for row in proba.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
        }
        let score = model
            .score(dataset.records.view(), dataset.targets.view())
            .unwrap();
        assert!(score > 0.9);

        let voting = Wa2de::params()
            .predict_voting(true)
            .fit(&dataset)
            .unwrap();
        let proba = voting.predict_proba(dataset.records.view()).unwrap();
        for row in proba.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
            // four super-parents, one vote each
            assert!(row.iter().all(|&p| (p * 4.0 - (p * 4.0).round()).abs() < 1e-9));
        }
        assert!(
            voting
                .score(dataset.records.view(), dataset.targets.view())
                .unwrap()
                > 0.9
        );
    }

    #[test]
    fn pair_tables_are_symmetric() {
        let dataset = bayesnet_datasets::iris();
        let model = Wa2de::params()
            .smoothing(Smoothing::Laplace)
            .fit(&dataset)
            .unwrap();
        assert_eq!(model.pair_base(0, 2, 3, 1), model.pair_base(3, 1, 0, 2));
        // every pairwise table is a distribution over the value pairs given the class
        for &(i, j) in [(0, 1), (1, 3), (2, 3)].iter() {
            for c in 0..3 {
                let total: f64 = (0..3)
                    .flat_map(|u| (0..3).map(move |v| (u, v)))
                    .map(|(u, v)| model.log_pair_probs[model.pair_base(i, u, j, v) + c].exp())
                    .sum();
                assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn graph_is_not_drawn() {
        let dataset = bayesnet_datasets::iris();
        let model = Wa2de::params().fit(&dataset).unwrap();
        assert_eq!(
            model.graph("BayesNet WA2DE"),
            vec!["BayesNet WA2DE", "Graph visualization not implemented."]
        );
        assert_eq!(model.show().len(), 5);
        assert!(model.dump_cpt().starts_with("----- WA2DE Model -----"));
    }

    #[test]
    fn invalid_inputs() {
        let dataset = Dataset::new(array![[0], [1], [1], [0]], Array1::from(vec![0, 1, 1, 0]));
        let err = Wa2de::params().fit(&dataset).unwrap_err();
        assert_eq!(err.to_string(), "WA2DE needs at least two features");

        let dataset = bayesnet_datasets::iris();
        let model = Wa2de::params().fit(&dataset).unwrap();
        assert!(model.predict(array![[0, 1, 3, 0]].view()).is_err());
        assert!(model.predict(array![[0, 1, 2]].view()).is_err());
    }
}
