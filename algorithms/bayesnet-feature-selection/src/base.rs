use bayesnet::error::{Error, Result};
use bayesnet::metrics::{symmetrical_uncertainty, Metrics};
use ndarray::Array1;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Common contract of the feature selectors
///
/// A selector is built over a sample matrix, fitted once and then queried for the ordered list
/// of selected feature indices and one score per selected feature.
pub trait FeatureSelect: Send + Sync {
    fn fit(&mut self) -> Result<()>;

    #[doc(hidden)]
    fn selection(&self) -> &Selection;

    /// Selected feature indices in selection order
    fn features(&self) -> Result<&[usize]> {
        self.selection().checked().map(|s| s.selected.as_slice())
    }

    /// Score of every selected feature, parallel to [`FeatureSelect::features`]
    fn scores(&self) -> Result<&[f64]> {
        self.selection().checked().map(|s| s.scores.as_slice())
    }
}

/// State shared by the selectors: the samples, symmetrical uncertainty caches and the result
#[derive(Debug, Clone)]
pub struct Selection {
    metrics: Metrics,
    weights: Array1<f64>,
    pub(crate) max_features: usize,
    pub(crate) su_labels: Vec<f64>,
    su_features: HashMap<(usize, usize), f64>,
    pub(crate) selected: Vec<usize>,
    pub(crate) scores: Vec<f64>,
    fitted: bool,
}

impl Selection {
    /// `max_features == 0` selects up to every feature
    pub(crate) fn new(metrics: Metrics, weights: Array1<f64>, max_features: usize) -> Self {
        let n = metrics.features().len();
        let max_features = if max_features == 0 { n } else { max_features };
        Selection {
            metrics,
            weights,
            max_features,
            su_labels: Vec::new(),
            su_features: HashMap::new(),
            selected: Vec::new(),
            scores: Vec::new(),
            fitted: false,
        }
    }

    pub(crate) fn n_features(&self) -> usize {
        self.metrics.features().len()
    }

    fn checked(&self) -> Result<&Self> {
        if self.fitted {
            Ok(self)
        } else {
            Err(Error::Logic("FeatureSelect not fitted".to_string()))
        }
    }

    /// Reset the result and compute the uncertainty of every feature with the class
    pub(crate) fn initialize(&mut self) {
        self.selected.clear();
        self.scores.clear();
        self.fitted = false;
        let class = self.n_features();
        self.su_labels = (0..class)
            .map(|feature| self.uncertainty(feature, class))
            .collect();
    }

    pub(crate) fn finish(&mut self) {
        self.fitted = true;
    }

    fn uncertainty(&self, a: usize, b: usize) -> f64 {
        let samples = self.metrics.samples();
        symmetrical_uncertainty(samples.row(a), samples.row(b), self.weights.view())
    }

    /// Symmetrical uncertainty between two features, cached per ordered pair
    pub(crate) fn su_features(&mut self, a: usize, b: usize) -> f64 {
        if let Some(&value) = self.su_features.get(&(a, b)) {
            return value;
        }
        let value = self.uncertainty(a, b);
        self.su_features.insert((a, b), value);
        value
    }

    /// Correlation based merit of the current selection
    ///
    /// `sum su(f, c) / sqrt(n + (n^2 - n) sum su(f_i, f_j))` over the selected features and
    /// every pair of them.
    pub(crate) fn merit_cfs(&mut self) -> f64 {
        let rcf: f64 = self.selected.iter().map(|&f| self.su_labels[f]).sum();
        let selected = self.selected.clone();
        let mut rff = 0.0;
        for (i, &first) in selected.iter().enumerate() {
            for &second in &selected[i + 1..] {
                rff += self.su_features(first, second);
            }
        }
        let n = selected.len() as f64;
        rcf / (n + (n * n - n) * rff).sqrt()
    }

    /// Feature indices by decreasing uncertainty with the class, ties keep index order
    pub(crate) fn order_by_su(&self) -> Vec<usize> {
        let mut order = (0..self.su_labels.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| {
            self.su_labels[b]
                .partial_cmp(&self.su_labels[a])
                .unwrap_or(Ordering::Equal)
        });
        order
    }
}
