//! DSATUR coloring

use super::{smallest_free_color, Colorer, Coloring};
use crate::cancel::CancelFlag;
use crate::error::SchedulerResult;
use crate::graph::ConflictGraph;
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

/// Saturation-degree ordering (Brélaz)
///
/// Repeatedly colors the uncolored node with the most distinct neighbor
/// colors; ties go to the higher degree, then the smaller identifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct DsaturColorer;

impl Colorer for DsaturColorer {
    fn name(&self) -> &'static str {
        "dsatur"
    }

    fn color(&self, graph: &ConflictGraph, cancel: &CancelFlag) -> SchedulerResult<Coloring> {
        let n = graph.len();
        let mut colors: Vec<Option<usize>> = vec![None; n];
        let mut saturation: Vec<HashSet<usize>> = vec![HashSet::new(); n];

        for _ in 0..n {
            cancel.check()?;

            let node = (0..n)
                .filter(|&v| colors[v].is_none())
                .max_by(|&a, &b| priority(graph, &saturation, a, b));
            let Some(node) = node else { break };

            let color = smallest_free_color(graph, node, &colors);
            colors[node] = Some(color);
            for &neighbor in graph.neighbors(node) {
                saturation[neighbor].insert(color);
            }
        }

        let raw: Vec<usize> = colors.into_iter().map(|c| c.unwrap_or_default()).collect();
        Ok(Coloring::from_colors(&raw))
    }
}

fn priority(graph: &ConflictGraph, saturation: &[HashSet<usize>], a: usize, b: usize) -> Ordering {
    let key = |v: usize| (saturation[v].len(), graph.degree(v), Reverse(graph.id(v)));
    key(a).cmp(&key(b))
}
