//! `bayesnet-datasets` provides discretized datasets ready to be used in tests and examples.
//!
//! ## Current State
//!
//! Currently the following datasets are provided:
//!
//! * `["iris"]` : iris flower dataset, every measurement discretized into three codes
//!
//! together with a generator of random discrete datasets (`["generate"]`). Loaded datasets are
//! returned as a [`bayesnet::Dataset`] with named features, a named class and the states of
//! every variable.
//!
//! ## Using a dataset
//!
//! ```ignore
//! let dataset = bayesnet_datasets::iris();
//! let (x, y) = (dataset.records.view(), dataset.targets.view());
//! ```

#[cfg(feature = "generate")]
pub mod generate;

#[cfg(feature = "iris")]
use bayesnet::{Dataset, States};
#[cfg(feature = "iris")]
use csv::ReaderBuilder;
#[cfg(feature = "iris")]
use flate2::read::GzDecoder;
#[cfg(feature = "iris")]
use ndarray::prelude::*;
#[cfg(feature = "iris")]
use ndarray_csv::Array2Reader;

#[cfg(feature = "iris")]
fn array_from_buf(buf: &[u8]) -> Array2<usize> {
    // unzip file
    let file = GzDecoder::new(buf);
    // create a CSV reader with headers and `,` as delimiter
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .from_reader(file);

    // extract ndarray
    reader.deserialize_array2_dynamic().unwrap()
}

#[cfg(feature = "iris")]
/// Read in the discretized iris-flower dataset.
///
/// 150 samples of four features with three codes each and a class with three states.
// The `.csv` data is two dimensional: Axis(0) denotes y-axis (rows), Axis(1) denotes x-axis (columns)
pub fn iris() -> Dataset {
    let data = include_bytes!("../data/iris.csv.gz");
    let array = array_from_buf(&data[..]);

    let (data, targets) = (
        array.slice(s![.., 0..4]).to_owned(),
        array.column(4).to_owned(),
    );

    let feature_names = vec!["sepallength", "sepalwidth", "petallength", "petalwidth"];
    let states = feature_names
        .iter()
        .chain(std::iter::once(&"class"))
        .map(|name| (name.to_string(), (0..3).collect()))
        .collect::<States>();

    Dataset::new(data, targets)
        .with_feature_names(feature_names)
        .with_class_name("class")
        .with_states(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iris() {
        let ds = iris();

        assert_eq!(ds.records.dim(), (150, 4));
        assert_eq!(ds.targets.len(), 150);
        assert_eq!(
            ds.feature_names(),
            &["sepallength", "sepalwidth", "petallength", "petalwidth"]
        );
        assert_eq!(ds.class_name(), "class");
        assert_eq!(ds.class_num_states(), 3);
        for class in 0..3 {
            assert_eq!(ds.targets.iter().filter(|&&c| c == class).count(), 50);
        }
        assert_eq!(ds.records.column(2).iter().filter(|&&v| v == 0).count(), 50);
        assert!(ds.records.iter().all(|&v| v < 3));
    }
}
