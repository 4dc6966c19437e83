//! Correlation based feature selection
use bayesnet::error::Result;
use bayesnet::metrics::Metrics;
use ndarray::Array1;

use crate::base::{FeatureSelect, Selection};

/// Subsets explored without improvement before the search gives up
const STALL_LIMIT: usize = 5;

/// Best first forward search on the CFS merit
///
/// Starting from the feature most correlated with the class, every step adds the candidate
/// that maximizes the merit of the grown subset. The search stops when `max_features` is
/// reached, no candidate remains or the last five merits did not improve.
#[derive(Debug, Clone)]
pub struct Cfs {
    selection: Selection,
}

impl Cfs {
    pub fn new(metrics: Metrics, weights: Array1<f64>, max_features: usize) -> Self {
        Cfs {
            selection: Selection::new(metrics, weights, max_features),
        }
    }

    fn keep_searching(&self, remaining: usize) -> bool {
        let s = &self.selection;
        if s.selected.len() >= s.max_features || remaining == 0 {
            return false;
        }
        if s.scores.len() >= STALL_LIMIT {
            let last = &s.scores[s.scores.len() - STALL_LIMIT..];
            if last.windows(2).all(|pair| pair[1] <= pair[0]) {
                return false;
            }
        }
        true
    }
}

impl FeatureSelect for Cfs {
    fn fit(&mut self) -> Result<()> {
        self.selection.initialize();
        let mut candidates = self.selection.order_by_su();
        if candidates.is_empty() {
            self.selection.finish();
            return Ok(());
        }
        let first = candidates.remove(0);
        self.selection.selected.push(first);
        let score = self.selection.su_labels[first];
        self.selection.scores.push(score);

        while self.keep_searching(candidates.len()) {
            let mut best: Option<(usize, f64)> = None;
            for (position, &candidate) in candidates.iter().enumerate() {
                self.selection.selected.push(candidate);
                let merit = self.selection.merit_cfs();
                self.selection.selected.pop();
                if best.map_or(true, |(_, best_merit)| merit > best_merit) {
                    best = Some((position, merit));
                }
            }
            let (position, merit) = match best {
                Some(best) => best,
                None => break,
            };
            let feature = candidates.remove(position);
            self.selection.selected.push(feature);
            self.selection.scores.push(merit);
        }
        tracing::debug!(selected = ?self.selection.selected, "CFS search finished");
        self.selection.finish();
        Ok(())
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::tests::redundant_metrics;
    use approx::assert_abs_diff_eq;

    #[test]
    fn grows_the_subset_by_merit() {
        let (metrics, weights) = redundant_metrics();
        let mut cfs = Cfs::new(metrics, weights, 0);
        cfs.fit().unwrap();
        assert_eq!(cfs.features().unwrap(), &[0, 1, 2]);
        let scores = cfs.scores().unwrap();
        assert_abs_diff_eq!(scores[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[2], 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn honours_max_features() {
        let (metrics, weights) = redundant_metrics();
        let mut cfs = Cfs::new(metrics, weights, 2);
        assert!(cfs.features().is_err());
        cfs.fit().unwrap();
        assert_eq!(cfs.features().unwrap(), &[0, 1]);
    }

    #[test]
    fn iris_starts_with_the_most_informative_feature() {
        let dataset = bayesnet_datasets::iris();
        let samples = dataset.samples().unwrap();
        let metrics = Metrics::new(
            samples,
            dataset.feature_names().to_vec(),
            dataset.class_name(),
            dataset.class_num_states(),
        );
        let weights = dataset.sample_weights();
        let mut cfs = Cfs::new(metrics, weights, 0);
        cfs.fit().unwrap();
        let selected = cfs.features().unwrap();
        assert!(!selected.is_empty() && selected.len() <= 4);
        assert_eq!(cfs.scores().unwrap().len(), selected.len());
        let mut unique = selected.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), selected.len());
    }
}
