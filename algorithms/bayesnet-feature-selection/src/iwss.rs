//! Incremental wrapper subset selection
use bayesnet::error::{Error, Result};
use bayesnet::metrics::Metrics;
use ndarray::Array1;

use crate::base::{FeatureSelect, Selection};

/// Incremental selection on the CFS merit
///
/// The two features most correlated with the class are always taken. Every further feature,
/// in decreasing order of correlation, is kept when it raises the merit or changes it by less
/// than `threshold` relative to the best merit so far; the first rejection ends the search.
#[derive(Debug, Clone)]
pub struct Iwss {
    selection: Selection,
    threshold: f64,
}

impl Iwss {
    /// `threshold` must lie in `[0, 0.5]`
    pub fn new(
        metrics: Metrics,
        weights: Array1<f64>,
        max_features: usize,
        threshold: f64,
    ) -> Result<Self> {
        if !(0.0..=0.5).contains(&threshold) {
            return Err(Error::InvalidArgument(
                "Threshold has to be in [0, 0.5]".to_string(),
            ));
        }
        Ok(Iwss {
            selection: Selection::new(metrics, weights, max_features),
            threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl FeatureSelect for Iwss {
    fn fit(&mut self) -> Result<()> {
        let s = &mut self.selection;
        s.initialize();
        let mut order = s.order_by_su().into_iter();
        if let Some(first) = order.next() {
            s.selected.push(first);
            s.scores.push(s.su_labels[first]);
        }
        let mut merit = 0.0;
        if let Some(second) = order.next() {
            s.selected.push(second);
            merit = s.merit_cfs();
            s.scores.push(merit);
        }
        for feature in order {
            if s.selected.len() >= s.max_features {
                break;
            }
            s.selected.push(feature);
            let candidate = s.merit_cfs();
            let delta = if merit != 0.0 {
                (merit - candidate).abs() / merit
            } else {
                0.0
            };
            if candidate > merit || delta < self.threshold {
                merit = merit.max(candidate);
                s.scores.push(candidate);
            } else {
                s.selected.pop();
                break;
            }
        }
        tracing::debug!(selected = ?s.selected, threshold = self.threshold, "IWSS search finished");
        s.finish();
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
    fn tolerant_threshold_keeps_small_losses() {
        let (metrics, weights) = redundant_metrics();
        let mut iwss = Iwss::new(metrics, weights, 0, 0.5).unwrap();
        iwss.fit().unwrap();
        // the constant feature costs a third of the merit
        assert_eq!(iwss.features().unwrap(), &[0, 1, 2]);
        assert_abs_diff_eq!(iwss.scores().unwrap()[2], 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn strict_threshold_stops_at_first_loss() {
        let (metrics, weights) = redundant_metrics();
        let mut iwss = Iwss::new(metrics, weights, 0, 0.1).unwrap();
        iwss.fit().unwrap();
        assert_eq!(iwss.features().unwrap(), &[0, 1]);
        assert_eq!(iwss.scores().unwrap().len(), 2);
    }

    #[test]
    fn threshold_bounds() {
        let (metrics, weights) = redundant_metrics();
        for &threshold in &[-0.1, 0.6, f64::NAN] {
            let err = Iwss::new(metrics.clone(), weights.clone(), 0, threshold).unwrap_err();
            assert_eq!(err.to_string(), "Threshold has to be in [0, 0.5]");
        }
    }
}
