//! Small numeric helpers shared by the classifiers
use ndarray::ArrayView1;

/// Scale `values` to sum one, falling back to uniform when the total is not positive
pub fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 && total.is_finite() {
        values.iter_mut().for_each(|v| *v /= total);
    } else if !values.is_empty() {
        let uniform = 1.0 / values.len() as f64;
        values.iter_mut().for_each(|v| *v = uniform);
    }
}

/// Index of the first maximum
pub fn argmax(values: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn normalize_falls_back_to_uniform() {
        let mut values = [1.0, 3.0];
        normalize(&mut values);
        assert_abs_diff_eq!(values[1], 0.75);
        let mut zeros = [0.0, 0.0, 0.0, 0.0];
        normalize(&mut zeros);
        assert_abs_diff_eq!(zeros[2], 0.25);
    }

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax(array![0.2, 0.4, 0.4].view()), 1);
        assert_eq!(argmax(ndarray::Array1::<f64>::zeros(0).view()), 0);
    }
}
