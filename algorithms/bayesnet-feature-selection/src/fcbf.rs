//! Fast correlation based filter
use bayesnet::error::{Error, Result};
use bayesnet::metrics::Metrics;
use ndarray::Array1;

use crate::base::{FeatureSelect, Selection};

/// Smallest accepted relevance threshold
pub const MIN_THRESHOLD: f64 = 1e-7;

/// Relevance filter with redundancy removal
///
/// Features are visited by decreasing uncertainty with the class. A visited feature is
/// selected and then drops every later feature that is at least as correlated with it as with
/// the class. The visit stops below `threshold` or at `max_features`.
#[derive(Debug, Clone)]
pub struct Fcbf {
    selection: Selection,
    threshold: f64,
}

impl Fcbf {
    pub fn new(
        metrics: Metrics,
        weights: Array1<f64>,
        max_features: usize,
        threshold: f64,
    ) -> Result<Self> {
        if threshold.is_nan() || threshold < MIN_THRESHOLD {
            return Err(Error::InvalidArgument(
                "Threshold cannot be less than 1e-7".to_string(),
            ));
        }
        Ok(Fcbf {
            selection: Selection::new(metrics, weights, max_features),
            threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl FeatureSelect for Fcbf {
    fn fit(&mut self) -> Result<()> {
        let s = &mut self.selection;
        s.initialize();
        let order = s.order_by_su();
        for (position, &feature) in order.iter().enumerate() {
            // removed as redundant
            if s.su_labels[feature] == 0.0 {
                continue;
            }
            if s.su_labels[feature] < self.threshold {
                break;
            }
            for &other in &order[position + 1..] {
                if s.su_features(feature, other) >= s.su_labels[other] {
                    s.su_labels[other] = 0.0;
                }
            }
            s.selected.push(feature);
            s.scores.push(s.su_labels[feature]);
            if s.selected.len() == s.max_features {
                break;
            }
        }
        tracing::debug!(selected = ?s.selected, threshold = self.threshold, "FCBF filter finished");
        s.finish();
        Ok(())
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }
}
