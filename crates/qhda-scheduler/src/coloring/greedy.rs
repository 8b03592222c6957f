//! Degree-ordered greedy coloring

use super::{smallest_free_color, Colorer, Coloring};
use crate::cancel::CancelFlag;
use crate::error::SchedulerResult;
use crate::graph::ConflictGraph;

/// Welsh–Powell style first-fit
///
/// Nodes are visited by descending degree, ties broken by ascending order
/// identifier; each takes the smallest slot free among its colored
/// neighbors.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyColorer;

impl Colorer for GreedyColorer {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn color(&self, graph: &ConflictGraph, _cancel: &CancelFlag) -> SchedulerResult<Coloring> {
        Ok(Coloring::from_colors(&greedy_colors(graph)))
    }
}

/// Raw greedy colors, before normalization
pub(super) fn greedy_colors(graph: &ConflictGraph) -> Vec<usize> {
    let mut visit: Vec<usize> = (0..graph.len()).collect();
    visit.sort_by(|&a, &b| {
        graph
            .degree(b)
            .cmp(&graph.degree(a))
            .then_with(|| graph.id(a).cmp(graph.id(b)))
    });

    let mut colors: Vec<Option<usize>> = vec![None; graph.len()];
    for node in visit {
        colors[node] = Some(smallest_free_color(graph, node, &colors));
    }
    colors.into_iter().map(|c| c.unwrap_or_default()).collect()
}
