//! Maximum spanning tree over a dense weight matrix
//!
//! Kruskal's algorithm keeps the heaviest edges that do not close a cycle. The undirected tree
//! is then oriented away from a chosen root with a breadth first walk.
use ndarray::ArrayView2;
use std::cmp::Ordering;
use std::collections::VecDeque;

type WeightedEdge = (f64, (usize, usize));

struct Graph {
    parent: Vec<usize>,
    edges: Vec<WeightedEdge>,
    tree: Vec<WeightedEdge>,
}

impl Graph {
    fn new(vertices: usize) -> Self {
        Graph {
            parent: (0..vertices).collect(),
            edges: Vec::new(),
            tree: Vec::new(),
        }
    }

    fn add_edge(&mut self, u: usize, v: usize, weight: f64) {
        self.edges.push((weight, (u, v)));
    }

    fn find_set(&self, i: usize) -> usize {
        if self.parent[i] == i {
            i
        } else {
            self.find_set(self.parent[i])
        }
    }

    fn union_set(&mut self, u: usize, v: usize) {
        self.parent[u] = self.parent[v];
    }

    fn kruskal(&mut self) {
        // stable, heaviest first
        self.edges
            .sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        for i in 0..self.edges.len() {
            let (u, v) = self.edges[i].1;
            let set_u = self.find_set(u);
            let set_v = self.find_set(v);
            if set_u != set_v {
                self.tree.push(self.edges[i]);
                self.union_set(set_u, set_v);
            }
        }
    }
}

fn insert_element(variables: &mut VecDeque<usize>, variable: usize) {
    if !variables.contains(&variable) {
        variables.push_front(variable);
    }
}

/// Orient the tree edges away from `root`
///
/// Edges touching the current node are taken in their tree order. Edges never reached from the
/// root are appended with their original orientation.
fn reorder(mut tree: Vec<WeightedEdge>, root: usize) -> Vec<(usize, usize)> {
    let mut result = Vec::with_capacity(tree.len());
    let mut next = VecDeque::new();
    next.push_front(root);
    while let Some(current) = next.pop_front() {
        let mut remaining = Vec::with_capacity(tree.len());
        for edge in tree.into_iter() {
            let (from, to) = edge.1;
            if from == current {
                result.push((from, to));
                insert_element(&mut next, to);
            } else if to == current {
                result.push((to, from));
                insert_element(&mut next, from);
            } else {
                remaining.push(edge);
            }
        }
        tree = remaining;
    }
    result.extend(tree.into_iter().map(|(_, edge)| edge));
    result
}

/// Directed maximum spanning tree of the complete graph over the first `num_features` indices
/// of `weights`, rooted at `root`
pub fn maximum_spanning_tree(
    num_features: usize,
    weights: ArrayView2<f64>,
    root: usize,
) -> Vec<(usize, usize)> {
    let mut graph = Graph::new(num_features);
    for i in 0..num_features {
        for j in i + 1..num_features {
            graph.add_edge(i, j, weights[[i, j]]);
        }
    }
    graph.kruskal();
    reorder(graph.tree, root)
}
