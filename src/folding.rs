//! Seeded train/test partitions
//!
//! Both splitters shuffle with a `StdRng` seeded from the caller, so the same seed always
//! yields the same folds.
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// A k-fold partition of sample indices
pub trait Fold {
    fn number_of_folds(&self) -> usize;

    /// Return `(train, test)` indices of fold `n_fold`
    fn fold(&self, n_fold: usize) -> Result<(Vec<usize>, Vec<usize>)>;
}

fn check_fold(n_fold: usize, k: usize) -> Result<()> {
    if n_fold >= k {
        return Err(Error::InvalidArgument(format!(
            "nFold ({}) must be less than k ({})",
            n_fold, k
        )));
    }
    Ok(())
}

/// Plain k-fold over `n` shuffled indices
///
/// Fold `i` tests the `n / k` indices at positions `[i * n/k, (i+1) * n/k)` of the shuffled
/// order; the remainder of the division is always in the train part.
#[derive(Debug, Clone)]
pub struct KFold {
    k: usize,
    indices: Vec<usize>,
}

impl KFold {
    pub fn new(k: usize, n: usize, seed: u64) -> Self {
        let mut indices = (0..n).collect::<Vec<_>>();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
        KFold { k, indices }
    }
}

impl Fold for KFold {
    fn number_of_folds(&self) -> usize {
        self.k
    }

    fn fold(&self, n_fold: usize) -> Result<(Vec<usize>, Vec<usize>)> {
        check_fold(n_fold, self.k)?;
        let n_test = self.indices.len() / self.k;
        let (start, end) = (n_test * n_fold, n_test * (n_fold + 1));
        let mut train = Vec::with_capacity(self.indices.len() - n_test);
        let mut test = Vec::with_capacity(n_test);
        for (position, &index) in self.indices.iter().enumerate() {
            if position >= start && position < end {
                test.push(index);
            } else {
                train.push(index);
            }
        }
        Ok((train, test))
    }
}

/// k-fold keeping the class proportions of `y` in every fold
///
/// The shuffled indices of each class are dealt evenly over the folds; the samples left over
/// go to distinct folds chosen at random. A class with fewer than `k` samples cannot be
/// represented in every fold, which is reported by [`StratifiedKFold::is_faulty`].
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    k: usize,
    folds: Vec<Vec<usize>>,
    faulty: bool,
}

impl StratifiedKFold {
    pub fn new(k: usize, y: &[usize], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (index, &label) in y.iter().enumerate() {
            by_class.entry(label).or_default().push(index);
        }

        let mut folds = vec![Vec::new(); k];
        let mut faulty = false;
        for (_, mut indices) in by_class {
            indices.shuffle(&mut rng);
            let fold_size = indices.len() / k.max(1);
            let remainder = indices.len() % k.max(1);
            if indices.len() < k {
                faulty = true;
            }
            let mut chunks = indices.into_iter();
            for fold in folds.iter_mut() {
                fold.extend(chunks.by_ref().take(fold_size));
            }
            if remainder > 0 {
                let mut targets = (0..k).collect::<Vec<_>>();
                targets.shuffle(&mut rng);
                for (&target, index) in targets.iter().zip(chunks) {
                    folds[target].push(index);
                }
            }
        }
        StratifiedKFold { k, folds, faulty }
    }

    /// True when some class has fewer samples than folds
    pub fn is_faulty(&self) -> bool {
        self.faulty
    }
}

impl Fold for StratifiedKFold {
    fn number_of_folds(&self) -> usize {
        self.k
    }

    fn fold(&self, n_fold: usize) -> Result<(Vec<usize>, Vec<usize>)> {
        check_fold(n_fold, self.k)?;
        let test = self.folds[n_fold].clone();
        let train = self
            .folds
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != n_fold)
            .flat_map(|(_, fold)| fold.iter().copied())
            .collect();
        Ok((train, test))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn kfold_sizes() {
        let kfold = KFold::new(5, 100, 19);
        assert_eq!(kfold.number_of_folds(), 5);
        let mut tested = HashSet::new();
        for i in 0..5 {
            let (train, test) = kfold.fold(i).unwrap();
            assert_eq!(train.len() + test.len(), 100);
            assert!(train.len() == 80 || train.len() == 81);
            tested.extend(test);
        }
        assert_eq!(tested.len(), 100);
    }

    #[test]
    fn kfold_is_reproducible() {
        let a = KFold::new(3, 10, 7).fold(1).unwrap();
        let b = KFold::new(3, 10, 7).fold(1).unwrap();
        assert_eq!(a, b);
        let (train, test) = a;
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 7);
    }

    #[test]
    fn fold_out_of_range() {
        let err = KFold::new(5, 100, 19).fold(5).unwrap_err();
        assert_eq!(err.to_string(), "nFold (5) must be less than k (5)");
        let err = StratifiedKFold::new(3, &[0, 1, 0], 1).fold(3).unwrap_err();
        assert_eq!(err.to_string(), "nFold (3) must be less than k (3)");
    }

    #[test]
    fn stratified_keeps_proportions() {
        let y = (0..150).map(|i| i / 50).collect::<Vec<_>>();
        let skf = StratifiedKFold::new(5, &y, 271);
        assert!(!skf.is_faulty());
        let mut seen = HashSet::new();
        for i in 0..5 {
            let (train, test) = skf.fold(i).unwrap();
            assert_eq!(test.len(), 30);
            assert_eq!(train.len(), 120);
            for class in 0..3 {
                assert_eq!(test.iter().filter(|&&t| y[t] == class).count(), 10);
            }
            seen.extend(test);
        }
        assert_eq!(seen.len(), 150);
    }

    #[test]
    fn stratified_spreads_remainders() {
        let y = vec![0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
        let skf = StratifiedKFold::new(3, &y, 17);
        let sizes = (0..3)
            .map(|i| skf.fold(i).unwrap().1.len())
            .collect::<Vec<_>>();
        assert_eq!(sizes.iter().sum::<usize>(), y.len());
        assert!(sizes.iter().all(|&s| s == 5 || s == 6 || s == 7));
        for i in 0..3 {
            let test = skf.fold(i).unwrap().1;
            let zeros = test.iter().filter(|&&t| y[t] == 0).count();
            assert!(zeros == 2 || zeros == 3);
        }
    }

    #[test]
    fn stratified_flags_small_classes() {
        let skf = StratifiedKFold::new(5, &[0, 0, 0, 0, 0, 1, 1], 3);
        assert!(skf.is_faulty());
    }
}
