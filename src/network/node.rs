use crate::error::{Error, Result};
use ndarray::{ArrayD, ArrayView1, ArrayView2, Axis, IxDyn};
use std::collections::BTreeSet;

/// A discrete random variable of a [`Network`](super::Network)
///
/// Parents and children are indices into the arena of the owning network, in insertion order.
/// The probability table has shape `[num_states, parent_0 states, parent_1 states, ...]`.
#[derive(Debug, Clone)]
pub struct Node {
    index: usize,
    name: String,
    num_states: usize,
    parents: Vec<usize>,
    children: Vec<usize>,
    cpt: ArrayD<f64>,
}

impl Node {
    pub(crate) fn new(index: usize, name: &str) -> Self {
        Node {
            index,
            name: name.to_string(),
            num_states: 0,
            parents: Vec::new(),
            children: Vec::new(),
            cpt: ArrayD::zeros(IxDyn(&[0])),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn set_num_states(&mut self, num_states: usize) {
        self.num_states = num_states;
    }

    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn cpt(&self) -> &ArrayD<f64> {
        &self.cpt
    }

    /// Append a parent, duplicates are not checked
    pub fn add_parent(&mut self, parent: usize) {
        self.parents.push(parent);
    }

    /// Append a child, duplicates are not checked
    pub fn add_child(&mut self, child: usize) {
        self.children.push(child);
    }

    pub fn remove_parent(&mut self, parent: usize) {
        self.parents.retain(|&p| p != parent);
    }

    pub fn remove_child(&mut self, child: usize) {
        self.children.retain(|&c| c != child);
    }

    /// Number of unordered pairs among the distinct neighbors of the node
    ///
    /// This is the count of fill-in edges eliminating the variable would add.
    pub fn min_fill(&self) -> usize {
        let neighbors = self
            .parents
            .iter()
            .chain(self.children.iter())
            .collect::<BTreeSet<_>>();
        let n = neighbors.len();
        n * n.saturating_sub(1) / 2
    }

    /// Estimate the conditional probability table from weighted counts
    ///
    /// `rows[i]` is the row of `samples` holding the values of node `i` and `cardinalities[i]`
    /// its number of states. Every cell starts at `smoothing`; each parent configuration is then
    /// normalized over the states of this node. Configurations with a zero total get zeros.
    pub fn compute_cpt(
        &mut self,
        samples: ArrayView2<usize>,
        rows: &[usize],
        cardinalities: &[usize],
        smoothing: f64,
        weights: ArrayView1<f64>,
    ) -> Result<()> {
        let mut shape = Vec::with_capacity(self.parents.len() + 1);
        shape.push(self.num_states);
        shape.extend(self.parents.iter().map(|&p| cardinalities[p]));

        let mut cpt = ArrayD::from_elem(IxDyn(&shape), smoothing);
        let mut coordinates = vec![0; shape.len()];
        let own_row = rows[self.index];

        for (sample, column) in samples.columns().into_iter().enumerate() {
            coordinates[0] = column[own_row];
            for (k, &parent) in self.parents.iter().enumerate() {
                coordinates[k + 1] = column[rows[parent]];
            }
            match cpt.get_mut(IxDyn(&coordinates)) {
                Some(cell) => *cell += weights[sample],
                None => {
                    return Err(Error::InvalidArgument(format!(
                        "Sample {} has values {:?} outside the states of node {} and its parents {:?}",
                        sample, coordinates, self.name, shape
                    )))
                }
            }
        }

        let totals = cpt.sum_axis(Axis(0));
        for mut column in cpt.axis_iter_mut(Axis(0)) {
            column.zip_mut_with(&totals, |cell, &total| {
                *cell = if total > 0.0 { *cell / total } else { 0.0 };
            });
        }
        self.cpt = cpt;
        Ok(())
    }

    /// Probability of the node value given its parents' values
    ///
    /// `evidence` holds one value per node of the network, indexed by node index. Values
    /// outside the table yield 0.
    pub fn factor_value(&self, evidence: &[usize]) -> f64 {
        let mut coordinates = Vec::with_capacity(self.parents.len() + 1);
        coordinates.push(evidence[self.index]);
        coordinates.extend(self.parents.iter().map(|&p| evidence[p]));
        self.cpt.get(IxDyn(&coordinates)).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    #[test]
    fn min_fill_counts_distinct_neighbors() {
        let mut node = Node::new(0, "A");
        assert_eq!(node.min_fill(), 0);
        node.add_parent(1);
        node.add_parent(2);
        node.add_child(3);
        node.add_child(1);
        // neighbors {1, 2, 3}
        assert_eq!(node.min_fill(), 3);
        node.remove_parent(1);
        node.remove_child(1);
        assert_eq!(node.min_fill(), 1);
    }

    #[test]
    fn cpt_columns_are_distributions() {
        // node 0 (3 states) with parent 1 (2 states)
        let samples = array![[0, 1, 2, 2, 1, 0], [0, 0, 1, 1, 1, 0]];
        let weights = Array1::from_elem(6, 1.0 / 6.0);
        let mut node = Node::new(0, "A");
        node.set_num_states(3);
        node.add_parent(1);
        node.compute_cpt(samples.view(), &[0, 1], &[3, 2], 1.0 / 6.0, weights.view())
            .unwrap();

        assert_eq!(node.cpt().shape(), &[3, 2]);
        for total in node.cpt().sum_axis(Axis(0)).iter() {
            assert_abs_diff_eq!(*total, 1.0, epsilon = 1e-12);
        }
        // parent = 0 was seen with A = 0 (twice) and A = 1 (once)
        let expected = (2.0 / 6.0 + 1.0 / 6.0) / (3.0 / 6.0 + 3.0 / 6.0);
        assert_abs_diff_eq!(node.factor_value(&[0, 0]), expected, epsilon = 1e-12);
    }

    #[test]
    fn unseen_configurations_are_uniform() {
        let samples = array![[0, 1], [0, 0]];
        let weights = array![0.5, 0.5];
        let mut node = Node::new(0, "A");
        node.set_num_states(2);
        node.add_parent(1);
        node.compute_cpt(samples.view(), &[0, 1], &[2, 2], 0.5, weights.view())
            .unwrap();
        assert_abs_diff_eq!(node.factor_value(&[0, 1]), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(node.factor_value(&[1, 1]), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn zero_totals_without_smoothing() {
        let samples = array![[0, 1], [0, 0]];
        let weights = array![0.5, 0.5];
        let mut node = Node::new(0, "A");
        node.set_num_states(2);
        node.add_parent(1);
        node.compute_cpt(samples.view(), &[0, 1], &[2, 2], 0.0, weights.view())
            .unwrap();
        assert_abs_diff_eq!(node.factor_value(&[0, 1]), 0.0);
        assert_abs_diff_eq!(node.factor_value(&[1, 0]), 0.5);
    }

    #[test]
    fn out_of_range_values_fail() {
        let samples = array![[0, 3]];
        let weights = array![0.5, 0.5];
        let mut node = Node::new(0, "A");
        node.set_num_states(2);
        assert!(node
            .compute_cpt(samples.view(), &[0], &[2], 0.0, weights.view())
            .is_err());
    }
}
