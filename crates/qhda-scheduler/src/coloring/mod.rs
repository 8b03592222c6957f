//! Slot assignment as graph coloring
//!
//! A [`Colorer`] maps every node of a [`ConflictGraph`] to a slot so that
//! no two adjacent nodes share one. Implementations differ in how hard they
//! try to minimize the number of slots; all of them must return a valid
//! assignment.

mod annealing;
mod dsatur;
mod greedy;

pub use annealing::{AnnealingColorer, AnnealingConfig};
pub use dsatur::DsaturColorer;
pub use greedy::GreedyColorer;

use crate::cancel::CancelFlag;
use crate::error::SchedulerResult;
use crate::graph::ConflictGraph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interface for slot assignment strategies
pub trait Colorer: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Assign a slot to every node of `graph`
    ///
    /// Long-running implementations poll `cancel` and return
    /// [`crate::SchedulerError::Cancelled`] once it is raised.
    fn color(&self, graph: &ConflictGraph, cancel: &CancelFlag) -> SchedulerResult<Coloring>;
}

/// Slot per node, normalized so slots are numbered by first appearance
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coloring {
    slots: Vec<usize>,
    slot_count: usize,
}

impl Coloring {
    /// Normalize raw colors: the first node gets slot 0, and each color
    /// seen for the first time gets the next free slot number.
    pub fn from_colors(colors: &[usize]) -> Self {
        let mut relabel: Vec<Option<usize>> = Vec::new();
        let mut slot_count = 0;
        let mut slots = Vec::with_capacity(colors.len());

        for &color in colors {
            if color >= relabel.len() {
                relabel.resize(color + 1, None);
            }
            let slot = *relabel[color].get_or_insert_with(|| {
                slot_count += 1;
                slot_count - 1
            });
            slots.push(slot);
        }

        Self { slots, slot_count }
    }

    /// Slot of every node, in batch order
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Slot of node `index`
    pub fn slot_of(&self, index: usize) -> usize {
        self.slots[index]
    }

    /// Number of distinct slots used
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Number of colored nodes
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no node was colored
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Colorer selection, as written in configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorerKind {
    /// Degree-ordered greedy coloring
    #[default]
    Greedy,
    /// Saturation-degree ordering
    Dsatur,
    /// Simulated annealing seeded from the greedy result
    Annealing,
}

impl ColorerKind {
    /// Configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorerKind::Greedy => "greedy",
            ColorerKind::Dsatur => "dsatur",
            ColorerKind::Annealing => "annealing",
        }
    }

    /// Instantiate the selected colorer
    pub fn build(&self, annealing: &AnnealingConfig) -> Box<dyn Colorer> {
        match self {
            ColorerKind::Greedy => Box::new(GreedyColorer),
            ColorerKind::Dsatur => Box::new(DsaturColorer),
            ColorerKind::Annealing => Box::new(AnnealingColorer::new(annealing.clone())),
        }
    }
}

impl fmt::Display for ColorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(ColorerKind::Greedy),
            "dsatur" => Ok(ColorerKind::Dsatur),
            "annealing" => Ok(ColorerKind::Annealing),
            other => Err(format!(
                "unknown colorer {other:?} (expected greedy, dsatur or annealing)"
            )),
        }
    }
}

/// Smallest color not used by an already-colored neighbor
fn smallest_free_color(graph: &ConflictGraph, node: usize, colors: &[Option<usize>]) -> usize {
    let mut taken = vec![false; graph.degree(node) + 1];
    for &neighbor in graph.neighbors(node) {
        if let Some(color) = colors[neighbor] {
            if color < taken.len() {
                taken[color] = true;
            }
        }
    }
    taken.iter().position(|&t| !t).unwrap_or(taken.len())
}
