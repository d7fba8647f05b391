//! Transient per-edge marks for single-pass traversals.
//!
//! Marks live outside the graph so that a traversal can't leave state
//! behind: build the overlay, run the walk, drop it.

use crate::graph::{EdgeGraph, EdgeIdx};

/// A visited-flag per half-edge of one [`EdgeGraph`].
#[derive(Clone, Debug)]
pub struct EdgeMarks {
    marked: Vec<bool>,
}

impl EdgeMarks {
    /// Creates an all-unmarked overlay sized to `graph`.
    pub fn for_graph(graph: &EdgeGraph) -> Self {
        EdgeMarks {
            marked: vec![false; graph.num_half_edges()],
        }
    }

    /// Is this half-edge marked?
    pub fn is_marked(&self, e: EdgeIdx) -> bool {
        self.marked[e.index()]
    }

    /// Marks a single half-edge.
    pub fn mark(&mut self, e: EdgeIdx) {
        self.marked[e.index()] = true;
    }

    /// Marks both directions of a segment.
    ///
    /// This is how traversals consume a segment: once an undirected segment
    /// has been used, it must not be re-entered from either end.
    pub fn mark_both(&mut self, e: EdgeIdx) {
        self.mark(e);
        self.mark(e.sym());
    }
}
