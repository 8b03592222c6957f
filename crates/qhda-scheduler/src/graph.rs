//! Conflict graph for a batch of orders
//!
//! Builds the undirected graph whose nodes are the orders of a batch and
//! whose edges join every pair of orders that may not share a slot.

use crate::error::{SchedulerError, SchedulerResult};
use crate::order::Order;
use crate::resource_key::ResourceKey;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How conflict edges are discovered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphStrategy {
    /// Pairwise below the index threshold, indexed above it
    #[default]
    Auto,
    /// Evaluate the predicate for every pair
    Pairwise,
    /// Bucket orders by resource key and only pair orders sharing a key
    Indexed,
}

/// Thresholds steering graph construction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Discovery strategy
    pub strategy: GraphStrategy,
    /// Batch size at which `Auto` switches to `Indexed`
    pub index_threshold: usize,
    /// Batch size at which discovery runs on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            strategy: GraphStrategy::Auto,
            index_threshold: crate::config::DEFAULT_INDEX_THRESHOLD,
            parallel_threshold: crate::config::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Summary statistics of a conflict graph
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of orders
    pub nodes: usize,
    /// Number of conflicting pairs
    pub edges: usize,
    /// Largest number of conflicts of a single order
    pub max_degree: usize,
    /// Edges over possible pairs, 0 for fewer than two nodes
    pub density: f64,
}

/// Undirected, simple conflict graph
///
/// Node `i` is the order at position `i` of the batch. Adjacency lists are
/// sorted and free of duplicates and self-loops.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConflictGraph {
    ids: Vec<String>,
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

#[derive(Default)]
struct KeyBucket {
    writers: Vec<usize>,
    readers: Vec<usize>,
}

impl ConflictGraph {
    /// Build the conflict graph of a validated batch
    pub fn build(orders: &[Order], options: &BuildOptions) -> Self {
        let parallel = orders.len() >= options.parallel_threshold;
        let strategy = match options.strategy {
            GraphStrategy::Auto if orders.len() >= options.index_threshold => GraphStrategy::Indexed,
            GraphStrategy::Auto => GraphStrategy::Pairwise,
            other => other,
        };

        tracing::debug!(
            orders = orders.len(),
            ?strategy,
            parallel,
            "building conflict graph"
        );

        match strategy {
            GraphStrategy::Indexed => Self::build_indexed(orders, parallel),
            _ => Self::build_pairwise(orders, parallel),
        }
    }

    /// Evaluate the conflict predicate for every pair of orders
    pub fn build_pairwise(orders: &[Order], parallel: bool) -> Self {
        let n = orders.len();
        let row = |i: usize| {
            (i + 1..n)
                .filter(move |&j| orders[i].conflicts_with(&orders[j]))
                .map(move |j| (i, j))
        };

        let edges: Vec<(usize, usize)> = if parallel {
            (0..n).into_par_iter().flat_map_iter(row).collect()
        } else {
            (0..n).flat_map(row).collect()
        };

        Self::from_edges(ids_of(orders), edges)
    }

    /// Pair only orders that touch a common resource key
    ///
    /// Every key contributes writer/writer and writer/reader pairs. Keys that
    /// are only read contribute nothing.
    pub fn build_indexed(orders: &[Order], parallel: bool) -> Self {
        let mut index: HashMap<&ResourceKey, KeyBucket> = HashMap::new();
        for (i, order) in orders.iter().enumerate() {
            for key in &order.rw_set.writes {
                index.entry(key).or_default().writers.push(i);
            }
            for key in &order.rw_set.reads {
                if !order.rw_set.writes.contains(key) {
                    index.entry(key).or_default().readers.push(i);
                }
            }
        }

        let buckets: Vec<KeyBucket> = index
            .into_values()
            .filter(|bucket| !bucket.writers.is_empty())
            .collect();

        let edges: Vec<(usize, usize)> = if parallel {
            buckets.par_iter().flat_map_iter(bucket_edges).collect()
        } else {
            buckets.iter().flat_map(bucket_edges).collect()
        };

        Self::from_edges(ids_of(orders), edges)
    }

    /// Build from a caller-supplied 0/1 conflict matrix
    ///
    /// The matrix must be square with one row per order, contain only 0 and
    /// 1, be symmetric and have a zero diagonal.
    pub fn from_matrix(orders: &[Order], matrix: &[Vec<u8>]) -> SchedulerResult<Self> {
        let n = orders.len();
        if matrix.len() != n {
            return Err(SchedulerError::MalformedConflictMatrix(format!(
                "expected {} rows, got {}",
                n,
                matrix.len()
            )));
        }

        if let Some((i, row)) = matrix.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(SchedulerError::MalformedConflictMatrix(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                n
            )));
        }

        let mut edges = Vec::new();
        for (i, row) in matrix.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                if cell > 1 {
                    return Err(SchedulerError::MalformedConflictMatrix(format!(
                        "cell ({i}, {j}) is {cell}, expected 0 or 1"
                    )));
                }
                if i == j && cell != 0 {
                    return Err(SchedulerError::MalformedConflictMatrix(format!(
                        "diagonal cell ({i}, {i}) must be 0"
                    )));
                }
                if j > i {
                    if matrix[j][i] != cell {
                        return Err(SchedulerError::MalformedConflictMatrix(format!(
                            "cells ({i}, {j}) and ({j}, {i}) differ"
                        )));
                    }
                    if cell == 1 {
                        edges.push((i, j));
                    }
                }
            }
        }

        Ok(Self::from_edges(ids_of(orders), edges))
    }

    /// Normalize a raw edge list into sorted adjacency
    fn from_edges(ids: Vec<String>, mut edges: Vec<(usize, usize)>) -> Self {
        for edge in edges.iter_mut() {
            if edge.0 > edge.1 {
                *edge = (edge.1, edge.0);
            }
        }
        edges.retain(|(a, b)| a != b);
        edges.sort_unstable();
        edges.dedup();

        let mut adjacency = vec![Vec::new(); ids.len()];
        for &(a, b) in &edges {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
        for neighbors in adjacency.iter_mut() {
            neighbors.sort_unstable();
        }

        Self {
            ids,
            adjacency,
            edge_count: edges.len(),
        }
    }

    /// Get number of orders
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if graph is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifier of node `index`
    pub fn id(&self, index: usize) -> &str {
        &self.ids[index]
    }

    /// All identifiers in batch order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Sorted neighbors of node `index`
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }

    /// Number of conflicts of node `index`
    pub fn degree(&self, index: usize) -> usize {
        self.adjacency[index].len()
    }

    /// Check whether two nodes conflict
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        a < self.len() && self.adjacency[a].binary_search(&b).is_ok()
    }

    /// Get total number of conflicting pairs
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterate edges as `(a, b)` with `a < b`, in ascending order
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, neighbors)| neighbors.iter().filter(move |&&b| b > a).map(move |&b| (a, b)))
    }

    /// Largest degree, 0 for an empty graph
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Summary statistics
    pub fn stats(&self) -> GraphStats {
        let n = self.len();
        let possible = n * n.saturating_sub(1) / 2;
        let density = if possible == 0 {
            0.0
        } else {
            self.edge_count as f64 / possible as f64
        };
        GraphStats {
            nodes: n,
            edges: self.edge_count,
            max_degree: self.max_degree(),
            density,
        }
    }

    /// First edge whose endpoints share a color, if any
    ///
    /// `colors` must hold one entry per node.
    pub fn find_violation(&self, colors: &[usize]) -> Option<(usize, usize)> {
        self.edges().find(|&(a, b)| colors[a] == colors[b])
    }
}

fn ids_of(orders: &[Order]) -> Vec<String> {
    orders.iter().map(|order| order.id.clone()).collect()
}

fn bucket_edges(bucket: &KeyBucket) -> impl Iterator<Item = (usize, usize)> + '_ {
    let writer_pairs = bucket
        .writers
        .iter()
        .enumerate()
        .flat_map(move |(k, &a)| bucket.writers[k + 1..].iter().map(move |&b| (a, b)));
    let writer_reader = bucket
        .writers
        .iter()
        .flat_map(move |&w| bucket.readers.iter().map(move |&r| (w, r)));
    writer_pairs.chain(writer_reader)
}
