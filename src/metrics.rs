//! Information theoretic scores over weighted discrete samples
//!
//! All quantities are in nats. Samples are stored as a `(n+1) x m` matrix with one row per
//! feature and the class in the last row; weights act as sample multiplicities.
use crate::mst;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Weighted bincount of a discrete vector
fn bincount(values: ArrayView1<usize>, weights: ArrayView1<f64>) -> Vec<f64> {
    let size = values.iter().max().map(|&max| max + 1).unwrap_or(0);
    let mut counts = vec![0.0; size];
    for (&value, &weight) in values.iter().zip(weights.iter()) {
        counts[value] += weight;
    }
    counts
}

/// Shannon entropy of a weighted discrete vector, zero probability bins contribute nothing
pub fn entropy(feature: ArrayView1<usize>, weights: ArrayView1<f64>) -> f64 {
    let counts = bincount(feature, weights);
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    counts
        .iter()
        .map(|&count| count / total)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

/// `H(first | second)`
pub fn conditional_entropy(
    first: ArrayView1<usize>,
    second: ArrayView1<usize>,
    weights: ArrayView1<f64>,
) -> f64 {
    let mut marginal: HashMap<usize, f64> = HashMap::new();
    let mut joint: HashMap<usize, HashMap<usize, f64>> = HashMap::new();
    let mut total = 0.0;
    for ((&a, &b), &w) in first.iter().zip(second.iter()).zip(weights.iter()) {
        *marginal.entry(b).or_insert(0.0) += w;
        *joint.entry(b).or_default().entry(a).or_insert(0.0) += w;
        total += w;
    }
    if total <= 0.0 {
        return 0.0;
    }
    marginal
        .iter()
        .filter(|(_, &count)| count > 0.0)
        .map(|(value, &count)| {
            let inner: f64 = joint[value]
                .values()
                .map(|&c| c / count)
                .filter(|&p| p > 0.0)
                .map(|p| -p * p.ln())
                .sum();
            count / total * inner
        })
        .sum()
}

/// `I(first; second) = H(first) - H(first | second)`
pub fn mutual_information(
    first: ArrayView1<usize>,
    second: ArrayView1<usize>,
    weights: ArrayView1<f64>,
) -> f64 {
    entropy(first, weights) - conditional_entropy(first, second, weights)
}

/// `I(first; second | labels) = H(first | labels) - H(first | second, labels)`, clamped at zero
pub fn conditional_mutual_information(
    first: ArrayView1<usize>,
    second: ArrayView1<usize>,
    labels: ArrayView1<usize>,
    weights: ArrayView1<f64>,
) -> f64 {
    let label_states = labels.iter().max().map(|&max| max + 1).unwrap_or(1);
    let joint = second
        .iter()
        .zip(labels.iter())
        .map(|(&s, &c)| s * label_states + c)
        .collect::<Array1<usize>>();
    let cmi = conditional_entropy(first, labels, weights)
        - conditional_entropy(first, joint.view(), weights);
    cmi.max(0.0)
}

/// `2 I(a; b) / (H(a) + H(b))`, zero when both variables are constant
pub fn symmetrical_uncertainty(
    a: ArrayView1<usize>,
    b: ArrayView1<usize>,
    weights: ArrayView1<f64>,
) -> f64 {
    let h_a = entropy(a, weights);
    let h_b = entropy(b, weights);
    let denominator = h_a + h_b;
    if denominator <= 0.0 {
        return 0.0;
    }
    2.0 * mutual_information(a, b, weights) / denominator
}

/// Sort `items` by `scores` and keep `k` of them (`0` keeps all)
///
/// Ascending order drops from the front so the `k` best remain; descending order truncates.
fn rank<T: Copy>(mut scored: Vec<(T, f64)>, ascending: bool, k: usize) -> (Vec<T>, Vec<f64>) {
    if ascending {
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    } else {
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    }
    let n = scored.len();
    if k != 0 && k < n {
        if ascending {
            scored.drain(..n - k);
        } else {
            scored.truncate(k);
        }
    }
    scored.into_iter().unzip()
}

/// Scores over a sample matrix
///
/// The ranking methods cache their last result, available through [`Metrics::scores_k_best`]
/// and [`Metrics::scores_k_pairs`] until the next call.
#[derive(Debug, Clone)]
pub struct Metrics {
    samples: Array2<usize>,
    features: Vec<String>,
    class_name: String,
    class_num_states: usize,
    scores_k_best: Vec<f64>,
    features_k_best: Vec<usize>,
    scores_k_pairs: Vec<f64>,
    pairs_k_best: Vec<(usize, usize)>,
}

impl Metrics {
    /// `samples` is the `(n+1) x m` matrix used to fit the model, class last
    pub fn new(
        samples: Array2<usize>,
        features: Vec<String>,
        class_name: &str,
        class_num_states: usize,
    ) -> Self {
        Metrics {
            samples,
            features,
            class_name: class_name.to_string(),
            class_num_states,
            scores_k_best: Vec::new(),
            features_k_best: Vec::new(),
            scores_k_pairs: Vec::new(),
            pairs_k_best: Vec::new(),
        }
    }

    /// Build from one vector per feature plus the labels
    pub fn from_vectors(
        x: &[Vec<usize>],
        labels: &[usize],
        features: Vec<String>,
        class_name: &str,
        class_num_states: usize,
    ) -> Self {
        let m = labels.len();
        let mut samples = Array2::zeros((x.len() + 1, m));
        for (mut row, values) in samples.rows_mut().into_iter().zip(x.iter()) {
            for (cell, &value) in row.iter_mut().zip(values.iter()) {
                *cell = value;
            }
        }
        samples.row_mut(x.len()).assign(&ArrayView1::from(labels));
        Self::new(samples, features, class_name, class_num_states)
    }

    pub fn samples(&self) -> ArrayView2<usize> {
        self.samples.view()
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn class_num_states(&self) -> usize {
        self.class_num_states
    }

    fn labels(&self) -> ArrayView1<usize> {
        self.samples.row(self.samples.nrows() - 1)
    }

    /// Rank features by mutual information with the class, `k = 0` ranks all of them
    pub fn select_k_best_weighted(
        &mut self,
        weights: ArrayView1<f64>,
        ascending: bool,
        k: usize,
    ) -> Vec<usize> {
        let labels = self.labels();
        let scored = (0..self.features.len())
            .map(|i| (i, mutual_information(labels, self.samples.row(i), weights)))
            .collect::<Vec<_>>();
        let (features, scores) = rank(scored, ascending, k);
        self.features_k_best = features;
        self.scores_k_best = scores;
        self.features_k_best.clone()
    }

    pub fn scores_k_best(&self) -> &[f64] {
        &self.scores_k_best
    }

    /// Rank feature pairs by conditional mutual information given the class
    ///
    /// Pairs with a feature in `excluded` are skipped; `k = 0` ranks all of them.
    pub fn select_k_pairs(
        &mut self,
        weights: ArrayView1<f64>,
        excluded: &[usize],
        ascending: bool,
        k: usize,
    ) -> Vec<(usize, usize)> {
        let labels = self.labels();
        let n = self.features.len();
        let mut scored = Vec::new();
        for i in (0..n).filter(|i| !excluded.contains(i)) {
            for j in (i + 1..n).filter(|j| !excluded.contains(j)) {
                let score = conditional_mutual_information(
                    self.samples.row(i),
                    self.samples.row(j),
                    labels,
                    weights,
                );
                scored.push(((i, j), score));
            }
        }
        let (pairs, scores) = rank(scored, ascending, k);
        self.pairs_k_best = pairs;
        self.scores_k_pairs = scores;
        self.pairs_k_best.clone()
    }

    pub fn scores_k_pairs(&self) -> &[f64] {
        &self.scores_k_pairs
    }

    /// Symmetric `(n+1) x (n+1)` matrix of class conditional mutual information
    ///
    /// Cell `(i, j)` is `sum_c p(c) I(i; j | class = c)` where `p(c)` is the unweighted class
    /// frequency. The class row and column are zero.
    pub fn conditional_edge(&self, weights: ArrayView1<f64>) -> Array2<f64> {
        let n_vars = self.features.len() + 1;
        let m = self.samples.ncols();
        let labels = self.labels();

        let masks = (0..self.class_num_states)
            .map(|value| {
                labels
                    .iter()
                    .enumerate()
                    .filter(|(_, &label)| label == value)
                    .map(|(i, _)| i)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let margin = masks
            .iter()
            .map(|mask| mask.len() as f64 / m.max(1) as f64)
            .collect::<Vec<_>>();

        let mut matrix = Array2::zeros((n_vars, n_vars));
        for i in 0..n_vars {
            for j in i + 1..n_vars {
                let mut accumulated = 0.0;
                for (mask, &prior) in masks.iter().zip(margin.iter()) {
                    if mask.is_empty() {
                        continue;
                    }
                    let first = self.samples.row(i).select(Axis(0), mask);
                    let second = self.samples.row(j).select(Axis(0), mask);
                    let masked_weights = weights.select(Axis(0), mask);
                    accumulated += prior
                        * mutual_information(first.view(), second.view(), masked_weights.view());
                }
                matrix[[i, j]] = accumulated;
                matrix[[j, i]] = accumulated;
            }
        }
        matrix
    }

    /// Directed maximum spanning tree of `features` under `weights`, rooted at `root`
    pub fn maximum_spanning_tree(
        &self,
        features: &[String],
        weights: ArrayView2<f64>,
        root: usize,
    ) -> Vec<(usize, usize)> {
        mst::maximum_spanning_tree(features.len(), weights, root)
    }
}
