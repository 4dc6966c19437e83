//! Boosted ensembles of one and two dependence estimators
//!
//! Training follows AdaBoost as described in *Ensemble Methods* (Zhou, 2012): candidates are
//! ranked by their weighted mutual information with the class, fitted on the current sample
//! weights and added with the significance given by their weighted error. Candidates are added
//! in packs whose size doubles every time the accuracy on a validation fold stops improving.
use bayesnet::error::{Error, Result};
use bayesnet::folding::{Fold, StratifiedKFold};
use bayesnet::metrics::Metrics;
use bayesnet::traits::{Classifier, Fit, Status};
use bayesnet::{DatasetBase, DatasetView};
use bayesnet_feature_selection::Algorithm;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix1, Ix2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::boost_hyperparams::{BoostValidParams, Order};
use crate::ensemble::{impl_ensemble_classifier, predict_members, Ensemble};
use crate::family::BoostFamily;

/// Minimum accuracy gain on the validation fold that resets the tolerance
const CONVERGENCE_THRESHOLD: f64 = 1e-4;
const VALIDATION_FOLDS: usize = 5;
const VALIDATION_SEED: u64 = 271;
const ORDER_SEED: u64 = 173;

/// A boosted ensemble of base learners of the family `F`
///
/// ```
/// use bayesnet::prelude::*;
/// use bayesnet_ensemble::BoostAode;
///
/// let dataset = bayesnet_datasets::iris();
/// let model = BoostAode::params().convergence(false).fit(&dataset)?;
/// assert_eq!(
///     model.notes().last().unwrap(),
///     &format!("Number of models: {}", model.ensemble().len())
/// );
/// # Ok::<(), bayesnet::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Boost<F: BoostFamily> {
    ensemble: Ensemble<F::Model>,
}

impl<F: BoostFamily> Boost<F> {
    pub fn ensemble(&self) -> &Ensemble<F::Model> {
        &self.ensemble
    }
}

impl_ensemble_classifier!([F: BoostFamily] Boost<F>);

/// AdaBoost update of the sample weights
///
/// The weighted error `e` is the weight of the misclassified samples. Above `0.5` the model is
/// worse than chance: the weights are left untouched and `(0, true)` is returned. Otherwise
/// the significance is `0.5 ln((1 - e) / e)`, or `1` for a perfect model, the weight of every
/// misclassified sample grows by a factor `1 + exp(alpha)`, the weight of every other sample by
/// `1 + exp(-alpha)`, and the weights are normalized to sum one.
pub fn update_weights(
    y: ArrayView1<usize>,
    y_pred: ArrayView1<usize>,
    weights: &mut Array1<f64>,
) -> (f64, bool) {
    let epsilon: f64 = y
        .iter()
        .zip(y_pred.iter())
        .zip(weights.iter())
        .filter(|((truth, pred), _)| truth != pred)
        .map(|(_, &weight)| weight)
        .sum();
    if epsilon > 0.5 {
        return (0.0, true);
    }
    let alpha = if epsilon == 0.0 {
        1.0
    } else {
        0.5 * ((1.0 - epsilon) / epsilon).ln()
    };
    let (wrong, right) = (alpha.exp(), (-alpha).exp());
    for ((weight, truth), pred) in weights.iter_mut().zip(y.iter()).zip(y_pred.iter()) {
        let factor = if truth != pred { wrong } else { right };
        *weight += factor * *weight;
    }
    let total = weights.sum();
    if total > 0.0 {
        weights.mapv_inplace(|weight| weight / total);
    }
    (alpha, false)
}

impl<S, T, F> Fit<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>, Error> for BoostValidParams<F>
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
    F: BoostFamily,
{
    type Object = Boost<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>) -> Result<Boost<F>> {
        let (train_set, x_test, y_test) = if self.convergence() {
            let labels = dataset.targets.to_vec();
            let (train, test) =
                StratifiedKFold::new(VALIDATION_FOLDS, &labels, VALIDATION_SEED).fold(0)?;
            (
                Some(dataset.select(&train)),
                dataset.records.select(Axis(0), &test),
                dataset.targets.select(Axis(0), &test),
            )
        } else {
            (None, Array2::zeros((0, dataset.records.ncols())), Array1::zeros(0))
        };
        let train = match &train_set {
            Some(train) => train.view(),
            None => dataset.view(),
        };
        let metrics = Metrics::new(
            train.samples()?,
            train.feature_names().to_vec(),
            train.class_name(),
            train.class_num_states(),
        );
        let m = train.records.nrows();
        let trainer = Trainer {
            params: self,
            train,
            x_test,
            y_test,
            metrics,
            weights: Array1::from_elem(m, 1.0 / m.max(1) as f64),
            ensemble: Ensemble::new(self.predict_voting()),
        };
        let ensemble = trainer.run()?;
        Ok(Boost { ensemble })
    }
}

struct Trainer<'a, F: BoostFamily> {
    params: &'a BoostValidParams<F>,
    train: DatasetView<'a>,
    x_test: Array2<usize>,
    y_test: Array1<usize>,
    metrics: Metrics,
    weights: Array1<f64>,
    ensemble: Ensemble<F::Model>,
}

impl<'a, F: BoostFamily> Trainer<'a, F> {
    fn fit_candidate(&self, candidate: F::Candidate) -> Result<F::Model> {
        let weighted = self.train.clone().with_weights(self.weights.clone());
        F::fit_candidate(candidate, &weighted, self.params.smoothing())
    }

    fn update(&mut self, y_pred: &Array1<usize>) -> (f64, bool) {
        update_weights(self.train.targets, y_pred.view(), &mut self.weights)
    }

    /// One weight update for the last `k` models, measured without the rest of the ensemble
    fn update_block(&mut self, k: usize) -> Result<bool> {
        let start = self.ensemble.len() - k;
        let y_pred = predict_members(
            &self.ensemble.models()[start..],
            &vec![1.0; k],
            self.ensemble.predict_voting(),
            self.train.records,
        )?;
        let (alpha, terminate) = self.update(&y_pred);
        self.ensemble.set_significances_from(start, alpha);
        Ok(terminate)
    }

    fn validation_accuracy(&self) -> Result<f64> {
        if self.y_test.is_empty() || self.ensemble.is_empty() {
            return Ok(0.0);
        }
        Classifier::score(&self.ensemble, self.x_test.view(), self.y_test.view())
    }

    /// Seeds the ensemble with the features kept by `algorithm`
    ///
    /// Returns the seeded candidates, the selected features and whether the seeds already
    /// failed the weight update.
    fn initialize(&mut self, algorithm: Algorithm) -> Result<(Vec<F::Candidate>, Vec<usize>, bool)> {
        let n = self.train.records.ncols();
        let mut selector = algorithm.selector(
            self.metrics.clone(),
            self.weights.clone(),
            0,
            self.params.threshold(),
        )?;
        selector.fit()?;
        let selected = selector.features()?.to_vec();
        let seeds = match F::seed(&selected) {
            Some(seeds) => seeds,
            None => {
                self.ensemble
                    .add_note("No features selected in initialization");
                self.ensemble.set_status(Status::Error);
                return Ok((Vec::new(), Vec::new(), false));
            }
        };
        for &candidate in &seeds {
            let model = self.fit_candidate(candidate)?;
            self.ensemble.push_model(model, 1.0);
        }
        self.ensemble.add_note(format!(
            "Used features in initialization: {} of {} with {}",
            selected.len(),
            n,
            algorithm
        ));
        if self.ensemble.is_empty() {
            return Ok((seeds, selected, false));
        }
        let y_pred = Classifier::predict(&self.ensemble, self.train.records)?;
        let (alpha, terminate) = self.update(&y_pred);
        self.ensemble.set_significances_from(0, alpha);
        tracing::debug!(models = self.ensemble.len(), alpha, "{} seeded", F::NAME);
        Ok((seeds, selected, terminate))
    }

    fn run(mut self) -> Result<Ensemble<F::Model>> {
        let p = self.params;
        let n_features = self.train.records.ncols();
        let x_train = self.train.records;

        let mut used: Vec<F::Candidate> = Vec::new();
        let mut seeded: Vec<usize> = Vec::new();
        let mut finished = false;
        if let Some(algorithm) = p.select_features() {
            let (seeds, selected, terminate) = self.initialize(algorithm)?;
            used = seeds;
            seeded = selected;
            finished = terminate;
        }

        let ascending = p.order() == Order::Asc;
        let mut rng = StdRng::seed_from_u64(ORDER_SEED);
        let mut candidates: Vec<F::Candidate> = Vec::new();
        let mut tolerance = 0;
        let mut num_items_pack = 0;
        let mut prior_accuracy = 0.0;
        let mut improvement = 1.0;
        while !finished {
            candidates = F::rank(&mut self.metrics, self.weights.view(), ascending, &seeded);
            if p.order() == Order::Rand {
                candidates.shuffle(&mut rng);
            }
            candidates.retain(|candidate| !used.contains(candidate));

            let k = if p.bisection() { 1 << tolerance } else { 1 };
            let mut pack = 0;
            while pack < k && !candidates.is_empty() {
                let candidate = candidates.remove(0);
                let model = self.fit_candidate(candidate)?;
                if p.block_update() {
                    self.ensemble.push_model(model, 0.0);
                } else if p.alpha_block() {
                    self.ensemble.push_model(model, 1.0);
                    let y_pred = Classifier::predict(&self.ensemble, x_train)?;
                    let (alpha, terminate) = self.update(&y_pred);
                    if terminate {
                        self.ensemble.pop_model();
                        finished = true;
                        break;
                    }
                    self.ensemble
                        .set_significances_from(self.ensemble.len() - 1, alpha);
                } else {
                    let y_pred = model.predict(x_train)?;
                    let (alpha, terminate) = self.update(&y_pred);
                    if terminate {
                        finished = true;
                        break;
                    }
                    self.ensemble.push_model(model, alpha);
                }
                pack += 1;
                num_items_pack += 1;
                used.push(candidate);
            }
            if p.block_update() && pack > 0 {
                finished = self.update_block(pack)? || finished;
            }

            if p.convergence() && !finished {
                let accuracy = self.validation_accuracy()?;
                if prior_accuracy == 0.0 {
                    prior_accuracy = accuracy;
                } else {
                    improvement = accuracy - prior_accuracy;
                }
                if improvement < CONVERGENCE_THRESHOLD {
                    tolerance += 1;
                } else {
                    tolerance = 0;
                    num_items_pack = 0;
                }
                prior_accuracy = if p.convergence_best() {
                    accuracy.max(prior_accuracy)
                } else {
                    accuracy
                };
            }
            tracing::trace!(
                pack,
                k,
                tolerance,
                num_items_pack,
                models = self.ensemble.len(),
                left = candidates.len(),
                accuracy = prior_accuracy,
                "{} pack added",
                F::NAME
            );
            finished = finished || tolerance > p.max_tolerance() || candidates.is_empty();
        }

        if tolerance > p.max_tolerance() {
            if num_items_pack < self.ensemble.len() {
                self.ensemble
                    .truncate(self.ensemble.len() - num_items_pack);
                self.ensemble.add_note(format!(
                    "Convergence threshold reached & {} models eliminated",
                    num_items_pack
                ));
            } else {
                self.ensemble
                    .add_note("Convergence threshold reached & 0 models eliminated");
            }
        }
        if let Some(note) = F::unused_note(used.len(), candidates.len(), n_features) {
            self.ensemble.add_note(note);
            if Classifier::status(&self.ensemble) == Status::Normal {
                self.ensemble.set_status(Status::Warning);
            }
        }
        let models = self.ensemble.len();
        self.ensemble
            .add_note(format!("Number of models: {}", models));

        let status = Classifier::status(&self.ensemble);
        if status != Status::Normal {
            tracing::warn!(?status, notes = ?Classifier::notes(&self.ensemble), "{} stopped early", F::NAME);
        }
        tracing::debug!(models, used = used.len(), "fitted {}", F::NAME);
        Ok(self.ensemble)
    }
}
