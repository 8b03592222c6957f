//! Simulated annealing colorer
//!
//! Starts from the greedy coloring and repeatedly tries to squeeze it into
//! one slot fewer: nodes of the dropped slot are scattered at random, then
//! single-node recolorings are annealed until no conflict remains or the
//! iteration budget runs out. Only conflict-free colorings are ever kept, so
//! the result is never worse than greedy.

use super::greedy::greedy_colors;
use super::{Colorer, Coloring};
use crate::cancel::CancelFlag;
use crate::error::SchedulerResult;
use crate::graph::ConflictGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Temperature floor, keeps the acceptance probability well defined
const MIN_TEMPERATURE: f64 = 1e-3;

/// Iterations between cancellation checks
const CANCEL_POLL_INTERVAL: usize = 1024;

/// Annealing parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// RNG seed; equal seeds give equal results
    pub seed: u64,
    /// Total recoloring moves across all attempts
    pub max_iterations: usize,
    /// Starting temperature of every attempt
    pub initial_temperature: f64,
    /// Multiplicative cooling per move, in (0, 1]
    pub cooling_rate: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_iterations: 20_000,
            initial_temperature: 2.0,
            cooling_rate: 0.999,
        }
    }
}

/// Metaheuristic colorer
#[derive(Clone, Debug, Default)]
pub struct AnnealingColorer {
    config: AnnealingConfig,
}

impl AnnealingColorer {
    /// Create a colorer with the given parameters
    pub fn new(config: AnnealingConfig) -> Self {
        Self { config }
    }

    /// Anneal `colors` towards a conflict-free assignment using `target` colors
    ///
    /// Returns `Ok(true)` on success; `colors` is then valid.
    fn anneal(
        &self,
        graph: &ConflictGraph,
        colors: &mut [usize],
        target: usize,
        rng: &mut StdRng,
        budget: &mut usize,
        cancel: &CancelFlag,
    ) -> SchedulerResult<bool> {
        let n = graph.len();
        let mut conflicts: Vec<usize> = (0..n)
            .map(|v| same_colored(graph, colors, v, colors[v]))
            .collect();
        let mut total: usize = conflicts.iter().sum::<usize>() / 2;
        let cooling = self.config.cooling_rate.clamp(f64::MIN_POSITIVE, 1.0);
        let mut temperature = self.config.initial_temperature.max(MIN_TEMPERATURE);

        while total > 0 {
            if *budget == 0 {
                return Ok(false);
            }
            *budget -= 1;
            if *budget % CANCEL_POLL_INTERVAL == 0 {
                cancel.check()?;
            }

            let conflicted: Vec<usize> = (0..n).filter(|&v| conflicts[v] > 0).collect();
            let node = conflicted[rng.gen_range(0..conflicted.len())];
            let old = colors[node];
            let new = {
                let pick = rng.gen_range(0..target - 1);
                if pick >= old {
                    pick + 1
                } else {
                    pick
                }
            };

            let before = conflicts[node];
            let after = same_colored(graph, colors, node, new);
            let delta = after as f64 - before as f64;

            if delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp() {
                for &neighbor in graph.neighbors(node) {
                    if colors[neighbor] == old {
                        conflicts[neighbor] -= 1;
                    } else if colors[neighbor] == new {
                        conflicts[neighbor] += 1;
                    }
                }
                conflicts[node] = after;
                colors[node] = new;
                total = total + after - before;
            }

            temperature = (temperature * cooling).max(MIN_TEMPERATURE);
        }

        Ok(true)
    }
}

impl Colorer for AnnealingColorer {
    fn name(&self) -> &'static str {
        "annealing"
    }

    fn color(&self, graph: &ConflictGraph, cancel: &CancelFlag) -> SchedulerResult<Coloring> {
        let mut best = Coloring::from_colors(&greedy_colors(graph));
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut budget = self.config.max_iterations;

        // A graph with an edge needs two slots; greedy already reaches the
        // floor for edgeless graphs
        while best.slot_count() > 2 && budget > 0 {
            cancel.check()?;

            let target = best.slot_count() - 1;
            let mut colors = best.slots().to_vec();
            for color in colors.iter_mut() {
                if *color >= target {
                    *color = rng.gen_range(0..target);
                }
            }

            if self.anneal(graph, &mut colors, target, &mut rng, &mut budget, cancel)? {
                tracing::trace!(slots = target, "annealing reduced slot count");
                best = Coloring::from_colors(&colors);
            } else {
                break;
            }
        }

        Ok(best)
    }
}

fn same_colored(graph: &ConflictGraph, colors: &[usize], node: usize, color: usize) -> usize {
    graph
        .neighbors(node)
        .iter()
        .filter(|&&neighbor| colors[neighbor] == color)
        .count()
}
