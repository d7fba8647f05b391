//! Merging line work into maximal lines.
//!
//! Dissolving takes any number of input geometries and produces the minimal
//! set of maximal-length lines covering the same segments: each unique
//! undirected segment appears in exactly one output line, and lines break
//! only at true topological nodes (degree 1 or >= 3). Components where
//! every vertex has degree 2 come out as closed rings.

use std::collections::HashSet;

use crate::geom::Point;
use crate::geometry::Geometry;
use crate::graph::{EdgeGraph, EdgeIdx};
use crate::mark::EdgeMarks;

/// Dissolves the linear components of a geometry in one call.
///
/// Equivalent to feeding `geometry` to a fresh [`LineDissolver`] and taking
/// its result.
pub fn dissolve(geometry: &Geometry) -> Geometry {
    let mut dissolver = LineDissolver::new();
    dissolver.add(geometry);
    dissolver.result()
}

/// Merges the segments of any number of input geometries into maximal
/// lines.
///
/// Feed geometries in with [`add`](LineDissolver::add), then extract the
/// merged lines with [`result`](LineDissolver::result). The output is fully
/// deterministic: it depends on the set of input segments, never on the
/// order they arrived in.
#[derive(Clone, Debug, Default)]
pub struct LineDissolver {
    graph: EdgeGraph,
    /// The first non-degenerate edge of each input line, in the direction
    /// the line was given. Rings built from several inputs start at the
    /// smallest of these.
    start_edges: HashSet<EdgeIdx>,
    result: Option<Geometry>,
}

impl LineDissolver {
    /// Creates an empty dissolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the linear components of a geometry.
    ///
    /// Points contribute nothing; polygon rings are treated as closed
    /// lines. Has no effect once a result has been computed.
    pub fn add(&mut self, geometry: &Geometry) {
        if self.result.is_some() {
            return;
        }
        let mut add_line = |pts: &[Point]| {
            let mut start_seen = false;
            for w in pts.windows(2) {
                if let Some(e) = self.graph.add_edge(w[0], w[1]) {
                    if !start_seen {
                        self.start_edges.insert(e);
                        start_seen = true;
                    }
                }
            }
        };
        geometry.for_each_line(&mut add_line);
    }

    /// The dissolved lines, packaged through [`Geometry::from_lines`].
    ///
    /// Computed once; repeated calls return the cached result.
    pub fn result(&mut self) -> Geometry {
        if let Some(g) = &self.result {
            return g.clone();
        }
        let mut lines = self.extract_lines();
        lines.sort();
        let g = Geometry::from_lines(lines);
        self.result = Some(g.clone());
        g
    }

    fn extract_lines(&self) -> Vec<Vec<Point>> {
        let mut marks = EdgeMarks::for_graph(&self.graph);
        let mut lines = Vec::new();

        // First pass: every vertex of degree != 2 is a node, and every
        // unmarked edge leaving a node starts a maximal line.
        for (v, _) in self.graph.vertices() {
            if self.graph.degree(v) == 2 {
                continue;
            }
            for e in self.graph.out_edges(v) {
                if !marks.is_marked(e) {
                    lines.push(canonical_line(self.walk_line(e, &mut marks)));
                }
            }
        }

        // Second pass: any segment still unmarked lives in a component with
        // no node at all, i.e. a pure ring.
        for e in self.graph.half_edges() {
            if !marks.is_marked(e) {
                lines.push(self.walk_ring(e, &mut marks));
            }
        }

        lines
    }

    /// Walks forward from a node edge, consuming pass-through vertices until
    /// the next node.
    fn walk_line(&self, e0: EdgeIdx, marks: &mut EdgeMarks) -> Vec<Point> {
        let mut pts = vec![self.graph.point(self.graph.orig(e0))];
        let mut e = e0;
        loop {
            marks.mark_both(e);
            let dv = self.graph.dest(e);
            pts.push(self.graph.point(dv));
            if self.graph.degree(dv) != 2 {
                return pts;
            }
            e = self.graph.onext(e.sym());
        }
    }

    /// Walks a pure ring, then re-emits it from its canonical start: the
    /// start-flagged edge with the smallest `(origin, destination)` pair.
    fn walk_ring(&self, e0: EdgeIdx, marks: &mut EdgeMarks) -> Vec<Point> {
        let mut best: Option<(Point, Point, EdgeIdx)> = None;
        let mut e = e0;
        let mut steps = 0;
        loop {
            marks.mark_both(e);
            for cand in [e, e.sym()] {
                if self.start_edges.contains(&cand) {
                    let o = self.graph.point(self.graph.orig(cand));
                    let d = self.graph.point(self.graph.dest(cand));
                    if best.map_or(true, |(bo, bd, _)| (o, d) < (bo, bd)) {
                        best = Some((o, d, cand));
                    }
                }
            }
            e = self.graph.onext(e.sym());
            steps += 1;
            debug_assert!(
                steps <= self.graph.num_half_edges(),
                "ring walk failed to close"
            );
            if e == e0 {
                break;
            }
        }

        let start = best.map_or(e0, |(_, _, b)| b);
        let mut pts = vec![self.graph.point(self.graph.orig(start))];
        let mut e = start;
        loop {
            pts.push(self.graph.point(self.graph.dest(e)));
            e = self.graph.onext(e.sym());
            if e == start {
                return pts;
            }
        }
    }
}

/// Orients an open line so that its coordinate sequence is the
/// lexicographically smaller of the two readings. This keeps the output
/// independent of which end the walk happened to start from.
fn canonical_line(mut pts: Vec<Point>) -> Vec<Point> {
    if pts.iter().rev().cmp(pts.iter()) == std::cmp::Ordering::Less {
        pts.reverse();
    }
    pts
}
