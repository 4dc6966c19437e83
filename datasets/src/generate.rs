//! Utility functions for randomly generating discrete datasets

use bayesnet::{Dataset, States};
use ndarray::{Array1, Array2};
use rand::Rng;

/// Random discrete dataset whose class follows the first feature
///
/// Feature `i` takes values in `0..cardinalities[i]`. The class is the first feature modulo
/// `classes`, replaced by a random class for roughly one sample in ten.
pub fn discrete(
    rng: &mut impl Rng,
    n_samples: usize,
    cardinalities: &[usize],
    classes: usize,
) -> Dataset {
    let n_features = cardinalities.len();
    let mut records = Array2::zeros((n_samples, n_features));
    for mut row in records.rows_mut() {
        for (cell, &cardinality) in row.iter_mut().zip(cardinalities.iter()) {
            *cell = rng.gen_range(0..cardinality.max(1));
        }
    }
    let targets = records
        .rows()
        .into_iter()
        .map(|row| {
            if rng.gen_bool(0.1) {
                rng.gen_range(0..classes.max(1))
            } else {
                row.get(0).copied().unwrap_or(0) % classes.max(1)
            }
        })
        .collect::<Array1<usize>>();

    let feature_names = (0..n_features)
        .map(|i| format!("feature_{}", i))
        .collect::<Vec<_>>();
    let mut states = feature_names
        .iter()
        .zip(cardinalities.iter())
        .map(|(name, &cardinality)| (name.clone(), (0..cardinality).collect()))
        .collect::<States>();
    states.insert("class".to_string(), (0..classes).collect());

    Dataset::new(records, targets)
        .with_feature_names(feature_names)
        .with_states(states)
}
