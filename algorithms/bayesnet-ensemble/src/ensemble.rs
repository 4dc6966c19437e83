//! Significance weighted combination of fitted classifiers
use bayesnet::error::{Error, Result};
use bayesnet::traits::{Classifier, Status};
use bayesnet::utils::argmax;
use ndarray::{Array1, Array2, ArrayView2};
use rayon::prelude::*;

/// A list of fitted models, each one weighted by its significance
///
/// Models and significances are only mutated together so both lists always have the same
/// length. With `predict_voting` every model casts a vote worth its significance for the class
/// it predicts; otherwise the class posteriors of the models are averaged with the
/// significances as weights.
#[derive(Debug, Clone)]
pub struct Ensemble<M> {
    models: Vec<M>,
    significances: Vec<f64>,
    predict_voting: bool,
    notes: Vec<String>,
    status: Status,
}

impl<M> Ensemble<M> {
    pub fn new(predict_voting: bool) -> Self {
        Ensemble {
            models: Vec::new(),
            significances: Vec::new(),
            predict_voting,
            notes: Vec::new(),
            status: Status::Normal,
        }
    }

    pub fn models(&self) -> &[M] {
        &self.models
    }

    pub fn significances(&self) -> &[f64] {
        &self.significances
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn predict_voting(&self) -> bool {
        self.predict_voting
    }

    pub fn push_model(&mut self, model: M, significance: f64) {
        self.models.push(model);
        self.significances.push(significance);
    }

    pub fn pop_model(&mut self) -> Option<(M, f64)> {
        let model = self.models.pop()?;
        let significance = self.significances.pop()?;
        Some((model, significance))
    }

    /// Keep the first `len` models
    pub fn truncate(&mut self, len: usize) {
        self.models.truncate(len);
        self.significances.truncate(len);
    }

    /// Overwrite the significance of every model from `start` on
    pub(crate) fn set_significances_from(&mut self, start: usize, significance: f64) {
        for value in self.significances.iter_mut().skip(start) {
            *value = significance;
        }
    }

    pub(crate) fn add_note<S: Into<String>>(&mut self, note: S) {
        self.notes.push(note.into());
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

fn n_classes<M: Classifier>(models: &[M]) -> Result<usize> {
    models
        .first()
        .map(|model| model.class_num_states())
        .ok_or_else(|| Error::Logic("Ensemble has no models to predict with".to_string()))
}

/// Significance weighted votes, one row per sample and one column per class
fn votes<M: Classifier>(
    models: &[M],
    significances: &[f64],
    x: ArrayView2<usize>,
) -> Result<Array2<f64>> {
    let n_classes = n_classes(models)?;
    let predictions = models
        .par_iter()
        .map(|model| model.predict(x))
        .collect::<Result<Vec<_>>>()?;
    let mut votes = Array2::zeros((x.nrows(), n_classes));
    for (prediction, &significance) in predictions.iter().zip(significances.iter()) {
        for (mut row, &class) in votes.rows_mut().into_iter().zip(prediction.iter()) {
            row[class] += significance;
        }
    }
    Ok(votes)
}

/// Significance weighted sum of the class posteriors
fn weighted_proba<M: Classifier>(
    models: &[M],
    significances: &[f64],
    x: ArrayView2<usize>,
) -> Result<Array2<f64>> {
    let n_classes = n_classes(models)?;
    let probabilities = models
        .par_iter()
        .map(|model| model.predict_proba(x))
        .collect::<Result<Vec<_>>>()?;
    let mut total = Array2::zeros((x.nrows(), n_classes));
    for (proba, &significance) in probabilities.iter().zip(significances.iter()) {
        total.scaled_add(significance, proba);
    }
    Ok(total)
}

fn normalize_rows(mut values: Array2<f64>) -> Array2<f64> {
    let n_classes = values.ncols();
    for mut row in values.rows_mut() {
        let total = row.sum();
        if total > 0.0 {
            row /= total;
        } else {
            row.fill(1.0 / n_classes as f64);
        }
    }
    values
}

fn argmax_rows(values: &Array2<f64>) -> Array1<usize> {
    values.rows().into_iter().map(argmax).collect()
}

/// Class posteriors of a subset of models with explicit significances
pub(crate) fn predict_proba_members<M: Classifier>(
    models: &[M],
    significances: &[f64],
    predict_voting: bool,
    x: ArrayView2<usize>,
) -> Result<Array2<f64>> {
    let combined = if predict_voting {
        votes(models, significances, x)?
    } else {
        weighted_proba(models, significances, x)?
    };
    Ok(normalize_rows(combined))
}

/// Predictions of a subset of models with explicit significances
pub(crate) fn predict_members<M: Classifier>(
    models: &[M],
    significances: &[f64],
    predict_voting: bool,
    x: ArrayView2<usize>,
) -> Result<Array1<usize>> {
    let combined = if predict_voting {
        votes(models, significances, x)?
    } else {
        weighted_proba(models, significances, x)?
    };
    Ok(argmax_rows(&combined))
}

impl<M: Classifier> Classifier for Ensemble<M> {
    fn predict(&self, x: ArrayView2<usize>) -> Result<Array1<usize>> {
        predict_members(&self.models, &self.significances, self.predict_voting, x)
    }

    fn predict_proba(&self, x: ArrayView2<usize>) -> Result<Array2<f64>> {
        predict_proba_members(&self.models, &self.significances, self.predict_voting, x)
    }

    fn number_of_nodes(&self) -> usize {
        self.models.iter().map(|m| m.number_of_nodes()).sum()
    }

    fn number_of_edges(&self) -> usize {
        self.models.iter().map(|m| m.number_of_edges()).sum()
    }

    fn number_of_states(&self) -> usize {
        self.models.iter().map(|m| m.number_of_states()).sum()
    }

    fn class_num_states(&self) -> usize {
        self.models
            .first()
            .map(|m| m.class_num_states())
            .unwrap_or(0)
    }

    fn show(&self) -> Vec<String> {
        self.models.iter().flat_map(|m| m.show()).collect()
    }

    fn graph(&self, title: &str) -> Vec<String> {
        self.models
            .iter()
            .enumerate()
            .flat_map(|(i, m)| m.graph(&format!("{}_{}", title, i)))
            .collect()
    }

    fn topological_order(&self) -> Vec<String> {
        Vec::new()
    }

    fn dump_cpt(&self) -> String {
        let separator = "-".repeat(80);
        self.models
            .iter()
            .map(|m| format!("{}{}\n", m.dump_cpt(), separator))
            .collect()
    }

    fn notes(&self) -> Vec<String> {
        self.notes.clone()
    }

    fn status(&self) -> Status {
        self.status
    }
}

/// Implements `Classifier` for a fitted model holding an `Ensemble` in the field `ensemble`
macro_rules! impl_ensemble_classifier {
    ([$($generics:tt)*] $model:ty) => {
        impl<$($generics)*> bayesnet::traits::Classifier for $model {
            fn predict(
                &self,
                x: ndarray::ArrayView2<usize>,
            ) -> bayesnet::error::Result<ndarray::Array1<usize>> {
                bayesnet::traits::Classifier::predict(&self.ensemble, x)
            }

            fn predict_proba(
                &self,
                x: ndarray::ArrayView2<usize>,
            ) -> bayesnet::error::Result<ndarray::Array2<f64>> {
                bayesnet::traits::Classifier::predict_proba(&self.ensemble, x)
            }

            fn number_of_nodes(&self) -> usize {
                bayesnet::traits::Classifier::number_of_nodes(&self.ensemble)
            }

            fn number_of_edges(&self) -> usize {
                bayesnet::traits::Classifier::number_of_edges(&self.ensemble)
            }

            fn number_of_states(&self) -> usize {
                bayesnet::traits::Classifier::number_of_states(&self.ensemble)
            }

            fn class_num_states(&self) -> usize {
                bayesnet::traits::Classifier::class_num_states(&self.ensemble)
            }

            fn show(&self) -> Vec<String> {
                bayesnet::traits::Classifier::show(&self.ensemble)
            }

            fn graph(&self, title: &str) -> Vec<String> {
                bayesnet::traits::Classifier::graph(&self.ensemble, title)
            }

            fn topological_order(&self) -> Vec<String> {
                bayesnet::traits::Classifier::topological_order(&self.ensemble)
            }

            fn dump_cpt(&self) -> String {
                bayesnet::traits::Classifier::dump_cpt(&self.ensemble)
            }

            fn notes(&self) -> Vec<String> {
                bayesnet::traits::Classifier::notes(&self.ensemble)
            }

            fn status(&self) -> bayesnet::traits::Status {
                bayesnet::traits::Classifier::status(&self.ensemble)
            }
        }
    };
    ($model:ty) => {
        $crate::ensemble::impl_ensemble_classifier!([] $model);
    };
}

pub(crate) use impl_ensemble_classifier;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Always predicts the same class with a fixed posterior
    #[derive(Debug, Clone)]
    struct Constant {
        class: usize,
        confidence: f64,
    }

    impl Classifier for Constant {
        fn predict(&self, x: ArrayView2<usize>) -> Result<Array1<usize>> {
            Ok(Array1::from_elem(x.nrows(), self.class))
        }

        fn predict_proba(&self, x: ArrayView2<usize>) -> Result<Array2<f64>> {
            let mut proba = Array2::from_elem((x.nrows(), 2), 1.0 - self.confidence);
            proba.column_mut(self.class).fill(self.confidence);
            Ok(proba)
        }

        fn number_of_nodes(&self) -> usize {
            2
        }

        fn number_of_edges(&self) -> usize {
            1
        }

        fn number_of_states(&self) -> usize {
            4
        }

        fn class_num_states(&self) -> usize {
            2
        }

        fn show(&self) -> Vec<String> {
            vec![format!("class -> {}, ", self.class)]
        }

        fn graph(&self, title: &str) -> Vec<String> {
            vec![title.to_string()]
        }

        fn topological_order(&self) -> Vec<String> {
            vec!["x".to_string()]
        }

        fn dump_cpt(&self) -> String {
            format!("* model {}\n", self.class)
        }
    }

    fn two_models(predict_voting: bool) -> Ensemble<Constant> {
        let mut ensemble = Ensemble::new(predict_voting);
        ensemble.push_model(
            Constant {
                class: 0,
                confidence: 0.6,
            },
            1.0,
        );
        ensemble.push_model(
            Constant {
                class: 1,
                confidence: 0.9,
            },
            0.5,
        );
        ensemble
    }

    #[test]
    fn voting_follows_significance() {
        let ensemble = two_models(true);
        let x = array![[0usize], [1]];
        assert_eq!(ensemble.predict(x.view()).unwrap(), array![0, 0]);
        let proba = ensemble.predict_proba(x.view()).unwrap();
        assert_abs_diff_eq!(proba, array![[2. / 3., 1. / 3.], [2. / 3., 1. / 3.]], epsilon = 1e-12);
    }

    #[test]
    fn averaging_weights_the_posteriors() {
        let ensemble = two_models(false);
        let x = array![[0usize]];
        // class 0: 0.6 + 0.5 * 0.1, class 1: 0.4 + 0.5 * 0.9
        let proba = ensemble.predict_proba(x.view()).unwrap();
        assert_abs_diff_eq!(proba[[0, 0]], 0.65 / 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(proba[[0, 1]], 0.85 / 1.5, epsilon = 1e-12);
        assert_eq!(ensemble.predict(x.view()).unwrap(), array![1]);
    }

    #[test]
    fn models_and_significances_move_together() {
        let mut ensemble = two_models(true);
        assert_eq!(ensemble.len(), 2);
        let (model, significance) = ensemble.pop_model().unwrap();
        assert_eq!(model.class, 1);
        assert_abs_diff_eq!(significance, 0.5);
        assert_eq!(ensemble.significances().len(), 1);
        ensemble.truncate(0);
        assert!(ensemble.is_empty());
        assert!(ensemble.pop_model().is_none());
        assert!(ensemble.predict(array![[0usize]].view()).is_err());
    }

    #[test]
    fn introspection_aggregates_members() {
        let ensemble = two_models(true);
        assert_eq!(ensemble.number_of_nodes(), 4);
        assert_eq!(ensemble.number_of_edges(), 2);
        assert_eq!(ensemble.number_of_states(), 8);
        assert_eq!(ensemble.graph("G"), vec!["G_0", "G_1"]);
        assert_eq!(ensemble.show(), vec!["class -> 0, ", "class -> 1, "]);
        assert!(ensemble.topological_order().is_empty());
        let separator = "-".repeat(80);
        assert_eq!(
            ensemble.dump_cpt(),
            format!("* model 0\n{}\n* model 1\n{}\n", separator, separator)
        );
    }
}
