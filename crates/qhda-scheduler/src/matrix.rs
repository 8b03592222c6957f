//! Dense conflict matrix for presentation and debugging

use crate::graph::ConflictGraph;

/// n×n 0/1 conflict indicator, consistent with a [`ConflictGraph`]
///
/// Immutable once built; the diagonal is always 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictMatrix {
    size: usize,
    cells: Vec<u8>,
}

impl ConflictMatrix {
    /// Build from a conflict graph
    pub fn from_graph(graph: &ConflictGraph) -> Self {
        let size = graph.len();
        let mut cells = vec![0u8; size * size];
        for (a, b) in graph.edges() {
            cells[a * size + b] = 1;
            cells[b * size + a] = 1;
        }
        Self { size, cells }
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether orders `a` and `b` conflict
    pub fn get(&self, a: usize, b: usize) -> bool {
        self.cells[a * self.size + b] == 1
    }

    /// Number of conflicting unordered pairs
    pub fn conflict_count(&self) -> usize {
        self.cells.iter().map(|&c| c as usize).sum::<usize>() / 2
    }

    /// Row-major copy, as sent over the wire
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.size).map(<[u8]>::to_vec).collect()
    }
}
