use super::{Dataset, DatasetBase, DatasetView, Records, States};
use crate::error::{Error, Result};
use ndarray::{concatenate, s, Array1, Array2, ArrayBase, ArrayView2, Axis, Data, Ix1, Ix2};

/// Cardinality inferred from the largest code of a column
fn infer_states<'a, I: Iterator<Item = &'a usize>>(values: I) -> Vec<usize> {
    let max = values.copied().max();
    match max {
        Some(max) => (0..=max).collect(),
        None => Vec::new(),
    }
}

impl Dataset {
    /// Create a new dataset from records and class codes
    ///
    /// Features are named `feature-0`, `feature-1`, ..., the class is named `class` and the
    /// states of every variable are `0..=max` of the observed codes.
    pub fn new(records: Array2<usize>, targets: Array1<usize>) -> Dataset {
        let feature_names = (0..records.ncols())
            .map(|i| format!("feature-{}", i))
            .collect::<Vec<_>>();
        let class_name = "class".to_string();

        let mut states = feature_names
            .iter()
            .zip(records.columns())
            .map(|(name, column)| (name.clone(), infer_states(column.iter())))
            .collect::<States>();
        states.insert(class_name.clone(), infer_states(targets.iter()));

        DatasetBase {
            records,
            targets,
            weights: Array1::zeros(0),
            feature_names,
            class_name,
            states,
        }
    }

    /// Create a dataset from a `(n+1) x m` sample matrix
    ///
    /// The first `n` rows are the features, the last row the class.
    pub fn from_samples<I: Into<String>>(
        samples: ArrayView2<usize>,
        features: Vec<I>,
        class_name: I,
        states: States,
    ) -> Result<Dataset> {
        let features = features.into_iter().map(Into::into).collect::<Vec<String>>();
        if samples.nrows() != features.len() + 1 {
            return Err(Error::InvalidArgument(format!(
                "Samples ({}) must have one row per feature ({}) plus the class row",
                samples.nrows(),
                features.len()
            )));
        }
        let n = features.len();
        let records = samples.slice(s![..n, ..]).t().to_owned();
        let targets = samples.row(n).to_owned();

        Ok(DatasetBase {
            records,
            targets,
            weights: Array1::zeros(0),
            feature_names: features,
            class_name: class_name.into(),
            states,
        })
    }
}

impl<R: Records, T> DatasetBase<R, T> {
    /// Updates the feature names of a dataset
    ///
    /// States inferred for the previous names are moved to the new ones.
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> Self {
        let names = names.into_iter().map(Into::into).collect::<Vec<String>>();
        for (old, new) in self.feature_names.iter().zip(names.iter()) {
            if old != new {
                if let Some(values) = self.states.remove(old) {
                    self.states.insert(new.clone(), values);
                }
            }
        }
        self.feature_names = names;
        self
    }

    /// Updates the name of the class variable
    pub fn with_class_name<I: Into<String>>(mut self, name: I) -> Self {
        let name = name.into();
        if let Some(values) = self.states.remove(&self.class_name) {
            self.states.insert(name.clone(), values);
        }
        self.class_name = name;
        self
    }

    /// Replaces the inferred states of the dataset
    pub fn with_states(mut self, states: States) -> Self {
        self.states = states;
        self
    }

    /// Updates the weights of a dataset
    pub fn with_weights(mut self, weights: Array1<f64>) -> Self {
        self.weights = weights;
        self
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn states(&self) -> &States {
        &self.states
    }

    /// Return the sample weights if any were set
    pub fn weights(&self) -> Option<&Array1<f64>> {
        if self.weights.is_empty() {
            None
        } else {
            Some(&self.weights)
        }
    }
}

impl<S, T> DatasetBase<ArrayBase<S, Ix2>, ArrayBase<T, Ix1>>
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    /// Creates a view of a dataset
    pub fn view(&self) -> DatasetView<'_> {
        DatasetBase {
            records: self.records.view(),
            targets: self.targets.view(),
            weights: self.weights.clone(),
            feature_names: self.feature_names.clone(),
            class_name: self.class_name.clone(),
            states: self.states.clone(),
        }
    }

    /// Number of states of the class variable
    pub fn class_num_states(&self) -> usize {
        self.states
            .get(&self.class_name)
            .map(|values| values.len())
            .unwrap_or(0)
    }

    /// Explicit weights, or the uniform `1/m` vector if none were set
    pub fn sample_weights(&self) -> Array1<f64> {
        match self.weights() {
            Some(weights) => weights.clone(),
            None => {
                let m = self.records.nsamples();
                Array1::from_elem(m, 1.0 / m.max(1) as f64)
            }
        }
    }

    /// Returns the `(n+1) x m` sample matrix with the class as last row
    pub fn samples(&self) -> Result<Array2<usize>> {
        let targets = self.targets.view().insert_axis(Axis(0));
        Ok(concatenate(Axis(0), &[self.records.t(), targets])?)
    }

    /// Returns the subset of samples at the given indices
    pub fn select(&self, indices: &[usize]) -> Dataset {
        let weights = match self.weights() {
            Some(weights) => weights.select(Axis(0), indices),
            None => Array1::zeros(0),
        };
        DatasetBase {
            records: self.records.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            weights,
            feature_names: self.feature_names.clone(),
            class_name: self.class_name.clone(),
            states: self.states.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn toy() -> Dataset {
        Dataset::new(
            array![[0, 1], [1, 2], [0, 0], [1, 1]],
            array![0, 1, 0, 1],
        )
    }

    #[test]
    fn infers_states_from_codes() {
        let dataset = toy();
        assert_eq!(dataset.states()["feature-0"], vec![0, 1]);
        assert_eq!(dataset.states()["feature-1"], vec![0, 1, 2]);
        assert_eq!(dataset.class_num_states(), 2);
        assert_eq!(dataset.nsamples(), 4);
        assert_eq!(dataset.nfeatures(), 2);
    }

    #[test]
    fn renames_move_states() {
        let dataset = toy()
            .with_feature_names(vec!["a", "b"])
            .with_class_name("label");
        assert_eq!(dataset.feature_names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(dataset.states()["b"].len(), 3);
        assert!(dataset.states().contains_key("label"));
        assert!(!dataset.states().contains_key("class"));
    }

    #[test]
    fn samples_put_class_last() {
        let dataset = toy();
        let samples = dataset.samples().unwrap();
        assert_eq!(samples.dim(), (3, 4));
        assert_eq!(samples.row(2), array![0, 1, 0, 1]);
        assert_eq!(samples.row(1), array![1, 2, 0, 1]);

        let back = Dataset::from_samples(
            samples.view(),
            vec!["feature-0", "feature-1"],
            "class",
            dataset.states().clone(),
        )
        .unwrap();
        assert_eq!(back.records, dataset.records);
        assert_eq!(back.targets, dataset.targets);
    }

    #[test]
    fn from_samples_checks_rows() {
        let samples = array![[0, 1], [1, 0]];
        let res = Dataset::from_samples(samples.view(), vec!["a", "b"], "class", States::new());
        assert!(res.is_err());
    }

    #[test]
    fn uniform_weights_by_default() {
        let dataset = toy();
        assert!(dataset.weights().is_none());
        assert_abs_diff_eq!(dataset.sample_weights().sum(), 1.0, epsilon = 1e-12);

        let subset = dataset
            .with_weights(array![0.1, 0.2, 0.3, 0.4])
            .select(&[3, 1]);
        assert_eq!(subset.targets, array![1, 1]);
        assert_eq!(subset.weights().unwrap(), &array![0.4, 0.2]);
    }
}
