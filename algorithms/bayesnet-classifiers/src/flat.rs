//! Helpers shared by the flat count table estimators
use bayesnet::error::{Error, Result};
use bayesnet::semaphore::CountingSemaphore;
use bayesnet::utils::argmax;
use bayesnet::DatasetBase;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix1, Ix2};

use crate::base::check_fit_parameters;

/// Samples predicted by one worker at most
const MAX_CHUNK: usize = 150;

/// Number of states of every feature and of the class, read from the dataset states
///
/// Fails when a variable has no states or a value falls outside them.
pub fn cardinalities<S, T>(
    dataset: &DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>,
) -> Result<(Vec<usize>, usize)>
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    check_fit_parameters(dataset)?;
    let states = dataset
        .feature_names()
        .iter()
        .map(|name| dataset.states()[name].len())
        .collect::<Vec<_>>();
    let class_states = dataset.class_num_states();
    for (f, column) in dataset.records.columns().into_iter().enumerate() {
        if let Some(&value) = column.iter().find(|&&value| value >= states[f]) {
            return Err(Error::InvalidArgument(format!(
                "Value {} of feature {} is out of its {} states",
                value,
                dataset.feature_names()[f],
                states[f]
            )));
        }
    }
    if let Some(&value) = dataset.targets.iter().find(|&&c| c >= class_states) {
        return Err(Error::InvalidArgument(format!(
            "Class value {} is out of its {} states",
            value, class_states
        )));
    }
    Ok((states, class_states))
}

/// Checks a sample against the feature cardinalities before indexing the tables
pub fn check_sample(sample: ArrayView1<usize>, states: &[usize]) -> Result<()> {
    if sample.len() != states.len() {
        return Err(Error::InvalidArgument(format!(
            "Sample size ({}) does not match the number of features ({})",
            sample.len(),
            states.len()
        )));
    }
    for (f, (&value, &card)) in sample.iter().zip(states.iter()).enumerate() {
        if value >= card {
            return Err(Error::InvalidArgument(format!(
                "Value {} of feature {} is out of its {} states",
                value, f, card
            )));
        }
    }
    Ok(())
}

/// Scale to sum one, left untouched when the total is not positive
pub(crate) fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    }
}

/// Class posterior of every row of `x`, chunked over workers bounded by the global semaphore
///
/// Every worker owns a disjoint block of rows of the output, `predict_one` fills one row.
pub fn predict_proba_chunked<F>(
    x: ArrayView2<usize>,
    class_states: usize,
    predict_one: F,
) -> Result<Array2<f64>>
where
    F: Fn(ArrayView1<usize>, &mut [f64]) -> Result<()> + Sync,
{
    let m = x.nrows();
    let mut probabilities = Array2::zeros((m, class_states));
    if m == 0 {
        return Ok(probabilities);
    }
    let semaphore = CountingSemaphore::global();
    let chunk_size = MAX_CHUNK.min(m / semaphore.max_count() + 1);
    let predict_one = &predict_one;

    std::thread::scope(|scope| {
        let mut workers = Vec::new();
        for (records, mut block) in x
            .axis_chunks_iter(Axis(0), chunk_size)
            .zip(probabilities.axis_chunks_iter_mut(Axis(0), chunk_size))
        {
            let permit = semaphore.permit();
            workers.push(scope.spawn(move || {
                let _permit = permit;
                let mut result = Ok(());
                let mut row = vec![0.0; class_states];
                for (sample, mut out) in records.rows().into_iter().zip(block.rows_mut()) {
                    if let Err(err) = predict_one(sample, &mut row) {
                        result = Err(err);
                        break;
                    }
                    out.assign(&ArrayView1::from(&row[..]));
                }
                result
            }));
        }
        workers
            .into_iter()
            .map(|worker| {
                worker
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect::<Result<Vec<_>>>()
    })?;
    Ok(probabilities)
}

/// Arg-max of every row
pub fn argmax_rows(probabilities: &Array2<f64>) -> Array1<usize> {
    probabilities
        .rows()
        .into_iter()
        .map(argmax)
        .collect::<Array1<usize>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn chunks_cover_every_row() {
        let x = Array2::from_shape_fn((1000, 2), |(i, j)| (i + j) % 3);
        let proba = predict_proba_chunked(x.view(), 3, |sample, out| {
            out.iter_mut().for_each(|v| *v = 0.0);
            out[sample[0]] = 1.0;
            Ok(())
        })
        .unwrap();
        assert_eq!(proba.dim(), (1000, 3));
        for (i, row) in proba.rows().into_iter().enumerate() {
            assert_abs_diff_eq!(row[i % 3], 1.0);
            assert_abs_diff_eq!(row.sum(), 1.0);
        }
        assert_eq!(argmax_rows(&proba)[4], 1);
    }

    #[test]
    fn worker_errors_are_returned() {
        let x = array![[0usize], [1], [2]];
        let result = predict_proba_chunked(x.view(), 2, |sample, _| {
            if sample[0] == 2 {
                Err(Error::InvalidArgument("bad sample".to_string()))
            } else {
                Ok(())
            }
        });
        assert_eq!(result.unwrap_err().to_string(), "bad sample");
    }

    #[test]
    fn samples_are_checked() {
        assert!(check_sample(array![0, 1].view(), &[2, 2]).is_ok());
        assert!(check_sample(array![0, 2].view(), &[2, 2]).is_err());
        let err = check_sample(array![0].view(), &[2, 2]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sample size (1) does not match the number of features (2)"
        );
    }
}
