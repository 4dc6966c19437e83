//! Discrete Bayesian network
//!
//! The network owns an arena of [`Node`]s. Edges are stored as parent/child index lists on the
//! nodes themselves, so the edge set is always derived from the graph. Every edge insertion is
//! cycle checked and rolled back when it would break acyclicity.
//!
//! Fitting estimates every probability table in parallel; prediction is exact inference by
//! enumerating the values of the class variable.
mod node;
mod smoothing;

pub use node::Node;
pub use smoothing::Smoothing;

use crate::dataset::States;
use crate::error::{Error, Result};
use crate::utils::{argmax, normalize};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: Vec<Node>,
    by_name: BTreeMap<String, usize>,
    features: Vec<String>,
    class_name: String,
    class_num_states: usize,
    /// Node index of every sample row seen at fit time, class last
    sample_order: Vec<usize>,
    fitted: bool,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every node and edge and forget any previous fit
    pub fn initialize(&mut self) {
        *self = Self::default();
    }

    /// Add a variable; adding an existing name is a no-op
    pub fn add_node(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "Node name cannot be empty".to_string(),
            ));
        }
        if self.by_name.contains_key(name) {
            return Ok(());
        }
        let index = self.nodes.len();
        self.nodes.push(Node::new(index, name));
        self.by_name.insert(name.to_string(), index);
        self.features.push(name.to_string());
        Ok(())
    }

    /// Add the edge `parent -> child`
    ///
    /// The edge is linked first and then the graph reachable from `child` is searched for a
    /// cycle. If one is found the link is undone and an error returned, leaving the network as
    /// it was.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<()> {
        let p = *self.by_name.get(parent).ok_or_else(|| {
            Error::InvalidArgument(format!("Parent node {} does not exist", parent))
        })?;
        let c = *self.by_name.get(child).ok_or_else(|| {
            Error::InvalidArgument(format!("Child node {} does not exist", child))
        })?;

        self.nodes[p].add_child(c);
        self.nodes[c].add_parent(p);
        let mut visited = HashSet::new();
        let mut stack = HashSet::new();
        if self.is_cyclic(c, &mut visited, &mut stack) {
            self.nodes[p].remove_child(c);
            self.nodes[c].remove_parent(p);
            return Err(Error::InvalidArgument(format!(
                "Adding this edge forms a cycle in the graph ({} -> {})",
                parent, child
            )));
        }
        Ok(())
    }

    fn is_cyclic(
        &self,
        node: usize,
        visited: &mut HashSet<usize>,
        stack: &mut HashSet<usize>,
    ) -> bool {
        if visited.insert(node) {
            stack.insert(node);
            for &child in self.nodes[node].children() {
                if !visited.contains(&child) && self.is_cyclic(child, visited, stack) {
                    return true;
                }
                if stack.contains(&child) {
                    return true;
                }
            }
        }
        stack.remove(&node);
        false
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.by_name.get(name).map(|&i| &self.nodes[i])
    }

    /// Variable names in insertion order
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn class_num_states(&self) -> usize {
        self.class_num_states
    }

    /// Sum of the number of states of every node
    pub fn states(&self) -> usize {
        self.nodes.iter().map(Node::num_states).sum()
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    #[allow(clippy::too_many_arguments)]
    fn check_fit_data(
        &self,
        n_samples: usize,
        n_features: usize,
        n_samples_y: usize,
        n_weights: usize,
        feature_names: &[String],
        class_name: &str,
        states: &States,
    ) -> Result<()> {
        if n_weights != n_samples {
            return Err(Error::InvalidArgument(format!(
                "Weights ({}) must have the same number of elements as samples ({}) in Network::fit",
                n_weights, n_samples
            )));
        }
        if n_samples != n_samples_y {
            return Err(Error::InvalidArgument(format!(
                "X and y must have the same number of samples in Network::fit ({} != {})",
                n_samples, n_samples_y
            )));
        }
        if n_features != feature_names.len() {
            return Err(Error::InvalidArgument(format!(
                "X and features must have the same number of features in Network::fit ({} != {})",
                n_features,
                feature_names.len()
            )));
        }
        if self.features.is_empty() {
            return Err(Error::InvalidArgument(
                "The network has not been initialized. You must call add_node() before calling fit()"
                    .to_string(),
            ));
        }
        if n_features != self.features.len() - 1 {
            return Err(Error::InvalidArgument(format!(
                "X and local features must have the same number of features in Network::fit ({} != {})",
                n_features,
                self.features.len() - 1
            )));
        }
        if !self.by_name.contains_key(class_name) {
            return Err(Error::InvalidArgument(format!(
                "Class Name {} not found in Network::features",
                class_name
            )));
        }
        if !states.contains_key(class_name) {
            return Err(Error::InvalidArgument(format!(
                "Class Name {} not found in states",
                class_name
            )));
        }
        for feature in feature_names {
            if !self.by_name.contains_key(feature) {
                return Err(Error::InvalidArgument(format!(
                    "Feature {} not found in Network::features",
                    feature
                )));
            }
            if !states.contains_key(feature) {
                return Err(Error::InvalidArgument(format!(
                    "Feature {} not found in states",
                    feature
                )));
            }
        }
        Ok(())
    }

    /// Fit the probability tables from a `(n+1) x m` sample matrix, class last
    pub fn fit_samples(
        &mut self,
        samples: ArrayView2<usize>,
        weights: ArrayView1<f64>,
        feature_names: &[String],
        class_name: &str,
        states: &States,
        smoothing: Smoothing,
    ) -> Result<()> {
        let n_features = samples.nrows().saturating_sub(1);
        self.check_fit_data(
            samples.ncols(),
            n_features,
            samples.ncols(),
            weights.len(),
            feature_names,
            class_name,
            states,
        )?;
        self.class_name = class_name.to_string();
        self.complete_fit(samples, weights, feature_names, states, smoothing)
    }

    /// Fit from records `x` (`m x n`, one row per sample) and labels `y`
    #[allow(clippy::too_many_arguments)]
    pub fn fit(
        &mut self,
        x: ArrayView2<usize>,
        y: ArrayView1<usize>,
        weights: ArrayView1<f64>,
        feature_names: &[String],
        class_name: &str,
        states: &States,
        smoothing: Smoothing,
    ) -> Result<()> {
        self.check_fit_data(
            x.nrows(),
            x.ncols(),
            y.len(),
            weights.len(),
            feature_names,
            class_name,
            states,
        )?;
        let targets = y.insert_axis(Axis(0));
        let samples = ndarray::concatenate(Axis(0), &[x.t(), targets.view()])?;
        self.class_name = class_name.to_string();
        self.complete_fit(samples.view(), weights, feature_names, states, smoothing)
    }

    /// Fit from `n` vectors of `m` values each, one vector per feature
    #[allow(clippy::too_many_arguments)]
    pub fn fit_vectors(
        &mut self,
        x: &[Vec<usize>],
        y: &[usize],
        weights: &[f64],
        feature_names: &[String],
        class_name: &str,
        states: &States,
        smoothing: Smoothing,
    ) -> Result<()> {
        let m = x.first().map(Vec::len).unwrap_or(0);
        if let Some(row) = x.iter().find(|row| row.len() != m) {
            return Err(Error::InvalidArgument(format!(
                "Every feature vector must have {} samples, found one with {}",
                m,
                row.len()
            )));
        }
        self.check_fit_data(
            m,
            x.len(),
            y.len(),
            weights.len(),
            feature_names,
            class_name,
            states,
        )?;
        let mut samples = Array2::zeros((x.len() + 1, m));
        for (mut row, values) in samples.rows_mut().into_iter().zip(x.iter()) {
            row.assign(&ArrayView1::from(values.as_slice()));
        }
        samples.row_mut(x.len()).assign(&ArrayView1::from(y));
        self.class_name = class_name.to_string();
        self.complete_fit(
            samples.view(),
            ArrayView1::from(weights),
            feature_names,
            states,
            smoothing,
        )
    }

    fn complete_fit(
        &mut self,
        samples: ArrayView2<usize>,
        weights: ArrayView1<f64>,
        feature_names: &[String],
        states: &States,
        smoothing: Smoothing,
    ) -> Result<()> {
        for node in self.nodes.iter_mut() {
            let values = states.get(node.name()).ok_or_else(|| {
                Error::InvalidArgument(format!("Feature {} not found in states", node.name()))
            })?;
            node.set_num_states(values.len());
        }
        let class_index = self.by_name[&self.class_name];
        self.class_num_states = self.nodes[class_index].num_states();

        // row of the sample matrix holding every node
        let mut rows = vec![0; self.nodes.len()];
        self.sample_order = Vec::with_capacity(feature_names.len() + 1);
        for (row, name) in feature_names.iter().enumerate() {
            let index = self.by_name[name];
            rows[index] = row;
            self.sample_order.push(index);
        }
        rows[class_index] = feature_names.len();
        self.sample_order.push(class_index);

        let cardinalities = self.nodes.iter().map(Node::num_states).collect::<Vec<_>>();
        let n_samples = samples.ncols();
        self.nodes.par_iter_mut().try_for_each(|node| {
            let factor = smoothing.factor(n_samples, node.num_states());
            node.compute_cpt(samples, &rows, &cardinalities, factor, weights)
        })?;
        self.fitted = true;
        tracing::debug!(
            nodes = self.nodes.len(),
            edges = self.num_edges(),
            samples = n_samples,
            %smoothing,
            "network fitted"
        );
        Ok(())
    }

    fn check_fitted(&self, operation: &str) -> Result<()> {
        if self.fitted {
            Ok(())
        } else {
            Err(Error::Logic(format!(
                "You must call fit() before calling {}()",
                operation
            )))
        }
    }

    /// Class posterior of a single sample given in fit feature order
    pub fn predict_sample(&self, sample: &[usize]) -> Result<Vec<f64>> {
        self.check_fitted("predict")?;
        let n_features = self.sample_order.len() - 1;
        if sample.len() != n_features {
            return Err(Error::InvalidArgument(format!(
                "Sample size ({}) does not match the number of features ({})",
                sample.len(),
                n_features
            )));
        }
        let mut evidence = vec![0; self.nodes.len()];
        for (&value, &index) in sample.iter().zip(self.sample_order.iter()) {
            evidence[index] = value;
        }
        Ok(self.exact_inference(&evidence))
    }

    fn compute_factor(&self, evidence: &[usize]) -> f64 {
        self.nodes
            .iter()
            .map(|node| node.factor_value(evidence))
            .product()
    }

    fn exact_inference(&self, evidence: &[usize]) -> Vec<f64> {
        let class_index = self.by_name[&self.class_name];
        let mut result = (0..self.class_num_states)
            .into_par_iter()
            .map(|value| {
                let mut complete = evidence.to_vec();
                complete[class_index] = value;
                self.compute_factor(&complete)
            })
            .collect::<Vec<f64>>();
        normalize(&mut result);
        result
    }

    /// Class posteriors of every row of `x` (`m x n`)
    pub fn predict_proba(&self, x: ArrayView2<usize>) -> Result<Array2<f64>> {
        self.check_fitted("predict_proba")?;
        let mut result = Array2::zeros((x.nrows(), self.class_num_states));
        for (sample, mut row) in x.rows().into_iter().zip(result.rows_mut()) {
            let sample = sample.to_vec();
            row.assign(&Array1::from(self.predict_sample(&sample)?));
        }
        Ok(result)
    }

    /// Most probable class of every row of `x` (`m x n`)
    pub fn predict(&self, x: ArrayView2<usize>) -> Result<Array1<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.rows().into_iter().map(argmax).collect())
    }

    /// Most probable class of every sample, `x` holding one vector of `m` values per feature
    pub fn predict_vectors(&self, x: &[Vec<usize>]) -> Result<Vec<usize>> {
        let proba = self.predict_proba_vectors(x)?;
        Ok(proba
            .iter()
            .map(|row| argmax(ArrayView1::from(row.as_slice())))
            .collect())
    }

    pub fn predict_proba_vectors(&self, x: &[Vec<usize>]) -> Result<Vec<Vec<f64>>> {
        self.check_fitted("predict_proba")?;
        let n_features = self.sample_order.len() - 1;
        if x.len() != n_features {
            return Err(Error::InvalidArgument(format!(
                "Sample size ({}) does not match the number of features ({})",
                x.len(),
                n_features
            )));
        }
        let m = x.first().map(Vec::len).unwrap_or(0);
        if let Some(row) = x.iter().find(|row| row.len() != m) {
            return Err(Error::InvalidArgument(format!(
                "Every feature vector must have {} samples, found one with {}",
                m,
                row.len()
            )));
        }
        (0..m)
            .map(|sample| {
                let values = x.iter().map(|feature| feature[sample]).collect::<Vec<_>>();
                self.predict_sample(&values)
            })
            .collect()
    }

    /// Accuracy over records `x` (`m x n`) and labels `y`
    pub fn score(&self, x: ArrayView2<usize>, y: ArrayView1<usize>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        if y_pred.len() != y.len() {
            return Err(Error::InvalidArgument(format!(
                "X and y must have the same number of samples ({} != {})",
                y_pred.len(),
                y.len()
            )));
        }
        let correct = y_pred.iter().zip(y.iter()).filter(|(a, b)| a == b).count();
        Ok(correct as f64 / y.len().max(1) as f64)
    }

    /// Adjacency list in alphabetical node order
    pub fn show(&self) -> Vec<String> {
        self.by_name
            .iter()
            .map(|(name, &index)| {
                let mut line = format!("{} -> ", name);
                for &child in self.nodes[index].children() {
                    line.push_str(self.nodes[child].name());
                    line.push_str(", ");
                }
                line
            })
            .collect()
    }

    /// Graphviz lines describing the network
    pub fn graph(&self, title: &str) -> Vec<String> {
        let mut output = vec![format!(
            "digraph BayesNet {{\nlabel=<BayesNet {}>\nfontsize=30\nfontcolor=blue\nlabelloc=t\nlayout=circo\n",
            title
        )];
        for (name, &index) in self.by_name.iter() {
            let style = if *name == self.class_name {
                ", fontcolor=red, fillcolor=lightblue, style=filled "
            } else {
                ""
            };
            output.push(format!("\"{}\" [shape=circle{}] \n", name, style));
            for &child in self.nodes[index].children() {
                output.push(format!("\"{}\" -> \"{}\"", name, self.nodes[child].name()));
            }
        }
        output.push("}\n".to_string());
        output
    }

    /// Every `(parent, child)` pair, parents in alphabetical order
    pub fn edges(&self) -> Vec<(String, String)> {
        self.by_name
            .iter()
            .flat_map(|(name, &index)| {
                self.nodes[index]
                    .children()
                    .iter()
                    .map(move |&child| (name.clone(), self.nodes[child].name().to_string()))
            })
            .collect()
    }

    pub fn num_edges(&self) -> usize {
        self.nodes.iter().map(|node| node.children().len()).sum()
    }

    /// Features ordered so that every feature parent precedes its children
    ///
    /// Starting from insertion order without the class, parents found after one of their
    /// children are moved right in front of it until a full pass moves nothing.
    pub fn topological_sort(&self) -> Vec<String> {
        let mut result = self
            .features
            .iter()
            .filter(|name| **name != self.class_name)
            .cloned()
            .collect::<Vec<_>>();
        let mut ending = false;
        while !ending {
            ending = true;
            for feature in self.features.iter() {
                let node = &self.nodes[self.by_name[feature]];
                for &parent in node.parents() {
                    let parent_name = self.nodes[parent].name();
                    if parent_name == self.class_name {
                        continue;
                    }
                    let parent_pos = result.iter().position(|name| name == parent_name);
                    let feature_pos = result.iter().position(|name| name == feature);
                    if let (Some(parent_pos), Some(feature_pos)) = (parent_pos, feature_pos) {
                        if parent_pos > feature_pos {
                            let moved = result.remove(parent_pos);
                            result.insert(feature_pos, moved);
                            ending = false;
                        }
                    }
                }
            }
        }
        result
    }

    /// One block per node in alphabetical order: header with the table shape, then the table
    pub fn dump_cpt(&self) -> String {
        let mut output = String::new();
        for (name, &index) in self.by_name.iter() {
            let node = &self.nodes[index];
            let _ = writeln!(
                output,
                "* {}: ({}) : {:?}",
                name,
                node.num_states(),
                node.cpt().shape()
            );
            let _ = writeln!(output, "{}", node.cpt());
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn abc() -> Network {
        let mut net = Network::new();
        for name in ["A", "B", "C"].iter() {
            net.add_node(name).unwrap();
        }
        net.add_edge("A", "B").unwrap();
        net.add_edge("B", "C").unwrap();
        net
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_empty_and_unknown_nodes() {
        let mut net = Network::new();
        assert!(net.add_node("").is_err());
        net.add_node("A").unwrap();
        net.add_node("A").unwrap();
        assert_eq!(net.features(), &["A".to_string()]);
        let err = net.add_edge("A", "Z").unwrap_err();
        assert_eq!(err.to_string(), "Child node Z does not exist");
        let err = net.add_edge("Z", "A").unwrap_err();
        assert_eq!(err.to_string(), "Parent node Z does not exist");
    }

    #[test]
    fn cycles_are_rolled_back() {
        let mut net = abc();
        assert_eq!(
            net.edges(),
            vec![
                ("A".to_string(), "B".to_string()),
                ("B".to_string(), "C".to_string())
            ]
        );
        let err = net.add_edge("C", "A").unwrap_err();
        assert!(err.to_string().contains("cycle"));
        assert_eq!(net.num_edges(), 2);
        assert!(net.node("C").unwrap().children().is_empty());
        assert!(net.node("A").unwrap().parents().is_empty());
        assert!(net.add_edge("B", "B").is_err());
        assert_eq!(net.num_edges(), 2);
    }

    #[test]
    fn topological_sort_moves_parents_forward() {
        let mut net = Network::new();
        for name in ["D", "C", "B", "A", "class"].iter() {
            net.add_node(name).unwrap();
        }
        net.add_edge("A", "B").unwrap();
        net.add_edge("B", "C").unwrap();
        net.add_edge("C", "D").unwrap();
        for name in ["A", "B", "C", "D"].iter() {
            net.add_edge("class", name).unwrap();
        }
        net.class_name = "class".to_string();
        assert_eq!(net.topological_sort(), names(&["A", "B", "C", "D"]));
    }

    #[test]
    fn fit_checks_dimensions() {
        let mut net = abc();
        let states = [("A", 2), ("B", 2), ("C", 2)]
            .iter()
            .map(|(n, k)| (n.to_string(), (0..*k).collect()))
            .collect::<States>();
        let x = array![[0, 1], [1, 0], [1, 1]];
        let y = array![0, 1, 1];
        let features = names(&["A", "B"]);

        let err = net
            .fit(x.view(), y.view(), array![0.5, 0.5].view(), &features, "C", &states, Smoothing::Original)
            .unwrap_err();
        assert!(err.to_string().contains("Weights (2)"));

        let err = net
            .fit(x.view(), array![0, 1].view(), array![0.3, 0.3, 0.4].view(), &features, "C", &states, Smoothing::Original)
            .unwrap_err();
        assert!(err.to_string().contains("(3 != 2)"));

        let mut missing = states.clone();
        missing.remove("B");
        let err = net
            .fit(x.view(), y.view(), array![0.3, 0.3, 0.4].view(), &features, "C", &missing, Smoothing::Original)
            .unwrap_err();
        assert_eq!(err.to_string(), "Feature B not found in states");
    }

    #[test]
    fn predict_before_fit_is_a_logic_error() {
        let net = abc();
        match net.predict(array![[0, 1]].view()) {
            Err(Error::Logic(msg)) => assert!(msg.contains("fit()")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn fit_and_predict_naive_bayes() {
        let mut net = Network::new();
        for name in ["f0", "f1", "class"].iter() {
            net.add_node(name).unwrap();
        }
        net.add_edge("class", "f0").unwrap();
        net.add_edge("class", "f1").unwrap();
        let x = array![[0, 0], [0, 1], [1, 1], [1, 1], [0, 0], [1, 0]];
        let y = array![0, 0, 1, 1, 0, 1];
        let states = [("f0", 2), ("f1", 2), ("class", 2)]
            .iter()
            .map(|(n, k)| (n.to_string(), (0..*k).collect()))
            .collect::<States>();
        let weights = Array1::from_elem(6, 1.0 / 6.0);
        net.fit(
            x.view(),
            y.view(),
            weights.view(),
            &names(&["f0", "f1"]),
            "class",
            &states,
            Smoothing::Original,
        )
        .unwrap();

        assert!(net.is_fitted());
        assert_eq!(net.class_num_states(), 2);
        assert_eq!(net.states(), 6);
        for node in net.nodes() {
            for total in node.cpt().sum_axis(Axis(0)).iter() {
                assert_abs_diff_eq!(*total, 1.0, epsilon = 1e-12);
            }
        }

        let proba = net.predict_proba(x.view()).unwrap();
        let pred = net.predict(x.view()).unwrap();
        for (row, &p) in proba.rows().into_iter().zip(pred.iter()) {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
            assert_eq!(argmax(row), p);
        }
        assert_eq!(pred, array![0, 0, 1, 1, 0, 1]);
        assert_abs_diff_eq!(net.score(x.view(), y.view()).unwrap(), 1.0);

        let vectors = vec![vec![0, 0, 1, 1, 0, 1], vec![0, 1, 1, 1, 0, 0]];
        assert_eq!(net.predict_vectors(&vectors).unwrap(), vec![0, 0, 1, 1, 0, 1]);

        let mut other = net.clone();
        other
            .fit_vectors(
                &vectors,
                &[0, 0, 1, 1, 0, 1],
                &[1.0 / 6.0; 6],
                &names(&["f0", "f1"]),
                "class",
                &states,
                Smoothing::Original,
            )
            .unwrap();
        assert_abs_diff_eq!(
            other.predict_proba(x.view()).unwrap(),
            proba,
            epsilon = 1e-12
        );

        let err = net.predict_sample(&[0]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sample size (1) does not match the number of features (2)"
        );
    }

    #[test]
    fn ragged_feature_vectors_are_rejected() {
        let mut net = Network::new();
        for name in ["f0", "f1", "class"].iter() {
            net.add_node(name).unwrap();
        }
        net.add_edge("class", "f0").unwrap();
        net.add_edge("class", "f1").unwrap();
        let states = [("f0", 2), ("f1", 2), ("class", 2)]
            .iter()
            .map(|(n, k)| (n.to_string(), (0..*k).collect()))
            .collect::<States>();
        net.fit_vectors(
            &[vec![0, 1, 1, 0], vec![0, 1, 0, 1]],
            &[0, 1, 1, 0],
            &[0.25; 4],
            &names(&["f0", "f1"]),
            "class",
            &states,
            Smoothing::Laplace,
        )
        .unwrap();

        match net.predict_proba_vectors(&[vec![1, 0], vec![0]]) {
            Err(Error::InvalidArgument(msg)) => {
                assert_eq!(msg, "Every feature vector must have 2 samples, found one with 1")
            }
            other => panic!("unexpected {:?}", other),
        }
        match net.predict_vectors(&[vec![1, 0], vec![0, 1], vec![1, 1]]) {
            Err(Error::InvalidArgument(msg)) => {
                assert_eq!(msg, "Sample size (3) does not match the number of features (2)")
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            net.predict_proba_vectors(&[vec![1, 0], vec![0, 1]]).unwrap().len(),
            2
        );
    }

    #[test]
    fn introspection_formats() {
        let mut net = abc();
        net.add_node("class").unwrap();
        net.class_name = "class".to_string();
        assert_eq!(net.show(), vec!["A -> B, ", "B -> C, ", "C -> ", "class -> "]);
        let graph = net.graph("Test");
        assert!(graph[0].starts_with("digraph BayesNet {\nlabel=<BayesNet Test>"));
        assert!(graph.contains(&"\"A\" -> \"B\"".to_string()));
        assert!(graph
            .iter()
            .any(|line| line.contains("\"class\" [shape=circle, fontcolor=red")));
        assert_eq!(graph.last().unwrap(), "}\n");
        assert!(net.dump_cpt().starts_with("* A: (0) : "));
    }
}
