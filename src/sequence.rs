//! Ordering a set of lines into continuous paths.
//!
//! Sequencing asks: can these lines be arranged (reordering and reversing
//! as needed) so that each one starts where the previous one ended? Per
//! connected component this is the classical Euler-path question -- a
//! component is sequenceable iff it has zero or two odd-degree vertices --
//! and the path itself is built with an edge-consuming depth-first walk.
//!
//! Unsequenceable input is a normal outcome, not a failure: check
//! [`LineSequencer::is_sequenceable`] before asking for the result.

use std::collections::{BTreeSet, HashMap};

use crate::geom::Point;
use crate::geometry::Geometry;
use crate::Error;

/// Reorders a set of lines into continuous paths.
///
/// Every added line is one graph edge between its endpoints, so two
/// identical input lines are two distinct edges (unlike dissolving, which
/// coalesces them). The result orders the lines of each connected component
/// into a single traversal; components are emitted in order of their
/// smallest coordinate, making the output independent of input order.
#[derive(Clone, Debug, Default)]
pub struct LineSequencer {
    lines: Vec<Vec<Point>>,
    computed: Option<Option<Geometry>>,
}

impl LineSequencer {
    /// Creates an empty sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the linear components of a geometry.
    ///
    /// Consecutive repeated points are merged; components with fewer than
    /// two distinct points are dropped as degenerate. Has no effect once a
    /// result has been computed.
    pub fn add(&mut self, geometry: &Geometry) {
        if self.computed.is_some() {
            return;
        }
        let mut add_line = |pts: &[Point]| {
            let line = normalized(pts);
            if line.len() >= 2 {
                self.lines.push(line);
            }
        };
        geometry.for_each_line(&mut add_line);
    }

    /// Can the added lines be ordered into one continuous path per
    /// connected component?
    pub fn is_sequenceable(&mut self) -> bool {
        self.ensure_computed();
        matches!(self.computed, Some(Some(_)))
    }

    /// The sequenced lines, reordered and reoriented so that each continues
    /// from the last, packaged through [`Geometry::from_lines`].
    ///
    /// Computed once and cached. Returns [`Error::NotSequenceable`] if the
    /// lines admit no such ordering; callers are expected to check
    /// [`is_sequenceable`](Self::is_sequenceable) first.
    pub fn sequenced_line_strings(&mut self) -> Result<Geometry, Error> {
        self.ensure_computed();
        match &self.computed {
            Some(Some(g)) => Ok(g.clone()),
            _ => Err(Error::NotSequenceable),
        }
    }

    /// Is this geometry already sequenced?
    ///
    /// Walking the lines of a multi-line string in the given order, each
    /// line must either continue from the previous endpoint or start a new
    /// connected run that never touches an already-finished one. Any other
    /// geometry is trivially sequenced.
    pub fn is_sequenced(geometry: &Geometry) -> bool {
        let Geometry::MultiLineString(lines) = geometry else {
            return true;
        };

        // Endpoints of runs that have been fully scanned; touching one of
        // these from a later line means the input doubles back.
        let mut prev_nodes: BTreeSet<Point> = BTreeSet::new();
        let mut curr_nodes: Vec<Point> = Vec::new();
        let mut last: Option<Point> = None;
        for line in lines {
            let (Some(&start), Some(&end)) = (line.first(), line.last()) else {
                continue;
            };
            if prev_nodes.contains(&start) || prev_nodes.contains(&end) {
                return false;
            }
            if let Some(l) = last {
                if start != l {
                    prev_nodes.extend(curr_nodes.drain(..));
                }
            }
            curr_nodes.push(start);
            curr_nodes.push(end);
            last = Some(end);
        }
        true
    }

    fn ensure_computed(&mut self) {
        if self.computed.is_none() {
            let result = sequence_lines(&self.lines).map(Geometry::from_lines);
            self.computed = Some(result);
        }
    }
}

fn normalized(pts: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

struct SeqEdge {
    u: usize,
    v: usize,
    line: usize,
}

fn other_end(edges: &[SeqEdge], eid: usize, v: usize) -> usize {
    let e = &edges[eid];
    if e.u == v {
        e.v
    } else {
        e.u
    }
}

/// Orders `lines` into an Euler path per connected component, or `None` if
/// some component has more than two odd-degree vertices.
fn sequence_lines(lines: &[Vec<Point>]) -> Option<Vec<Vec<Point>>> {
    if lines.is_empty() {
        return Some(Vec::new());
    }

    // Each line is one edge between its endpoint vertices.
    let mut vert_ids: HashMap<Point, usize> = HashMap::new();
    let mut verts: Vec<Point> = Vec::new();
    let mut edges: Vec<SeqEdge> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let (Some(&first), Some(&last)) = (line.first(), line.last()) else {
            continue;
        };
        let u = *vert_ids.entry(first).or_insert_with(|| {
            verts.push(first);
            verts.len() - 1
        });
        let v = *vert_ids.entry(last).or_insert_with(|| {
            verts.push(last);
            verts.len() - 1
        });
        edges.push(SeqEdge { u, v, line: i });
    }

    // Self-loops appear twice in their vertex's list, so a list's length is
    // the vertex degree.
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); verts.len()];
    for (i, e) in edges.iter().enumerate() {
        adj[e.u].push(i);
        adj[e.v].push(i);
    }

    // Deterministic walk order: neighbors sorted by coordinate, then by the
    // content of the line itself. Input order can't leak into the result.
    for v in 0..adj.len() {
        let mut list = std::mem::take(&mut adj[v]);
        list.sort_by(|&a, &b| {
            let ka = (verts[other_end(&edges, a, v)], &lines[edges[a].line]);
            let kb = (verts[other_end(&edges, b, v)], &lines[edges[b].line]);
            ka.cmp(&kb)
        });
        adj[v] = list;
    }

    // Connected components, ordered by their smallest coordinate.
    let mut comp_of = vec![usize::MAX; verts.len()];
    let mut comps: Vec<Vec<usize>> = Vec::new();
    for s in 0..verts.len() {
        if comp_of[s] != usize::MAX {
            continue;
        }
        let id = comps.len();
        comp_of[s] = id;
        let mut comp = Vec::new();
        let mut stack = vec![s];
        while let Some(v) = stack.pop() {
            comp.push(v);
            for &eid in &adj[v] {
                let w = other_end(&edges, eid, v);
                if comp_of[w] == usize::MAX {
                    comp_of[w] = id;
                    stack.push(w);
                }
            }
        }
        comps.push(comp);
    }
    comps.sort_by_key(|comp| comp.iter().map(|&v| verts[v]).min());

    let mut used = vec![false; edges.len()];
    let mut ptr = vec![0usize; verts.len()];
    let mut out: Vec<Vec<Point>> = Vec::with_capacity(lines.len());
    for comp in &comps {
        let odd: Vec<usize> = comp
            .iter()
            .copied()
            .filter(|&v| adj[v].len() % 2 == 1)
            .collect();
        let start = match odd.len() {
            // An Euler circuit exists; start anywhere, so start at the
            // smallest coordinate.
            0 => comp.iter().copied().min_by_key(|&v| verts[v]),
            // An open Euler path must start at an odd vertex.
            2 => odd.iter().copied().min_by_key(|&v| verts[v]),
            _ => return None,
        };
        let Some(start) = start else {
            continue;
        };

        // Hierholzer's walk: consume an unused edge whenever possible, and
        // emit edges on backtrack. The emitted order is the reverse of the
        // final path.
        let mut stack: Vec<(usize, Option<(usize, bool)>)> = vec![(start, None)];
        let mut path: Vec<(usize, bool)> = Vec::new();
        loop {
            let Some(&(v, via)) = stack.last() else {
                break;
            };
            let mut advanced = false;
            while ptr[v] < adj[v].len() {
                let eid = adj[v][ptr[v]];
                if used[eid] {
                    ptr[v] += 1;
                    continue;
                }
                used[eid] = true;
                let w = other_end(&edges, eid, v);
                let from_u = edges[eid].u == v;
                stack.push((w, Some((eid, from_u))));
                advanced = true;
                break;
            }
            if !advanced {
                stack.pop();
                if let Some(via) = via {
                    path.push(via);
                }
            }
        }
        path.reverse();

        let comp_edges: usize = comp.iter().map(|&v| adj[v].len()).sum::<usize>() / 2;
        debug_assert_eq!(path.len(), comp_edges, "walk failed to consume the component");

        for (eid, from_u) in path {
            let line = &lines[edges[eid].line];
            out.push(if from_u {
                line.clone()
            } else {
                line.iter().rev().copied().collect()
            });
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn line(pts: &[(f64, f64)]) -> Vec<Point> {
        pts.iter().map(|&(x, y)| pt(x, y)).collect()
    }

    fn sequencer(lines: &[&[(f64, f64)]]) -> LineSequencer {
        let mut seq = LineSequencer::new();
        seq.add(&Geometry::MultiLineString(
            lines.iter().map(|l| line(l)).collect(),
        ));
        seq
    }

    #[test]
    fn shuffled_path_is_reassembled() {
        let mut seq = sequencer(&[
            &[(0.0, 0.0), (0.0, 10.0)],
            &[(0.0, 20.0), (0.0, 30.0)],
            &[(0.0, 10.0), (0.0, 20.0)],
        ]);
        assert!(seq.is_sequenceable());
        assert_eq!(
            seq.sequenced_line_strings().unwrap(),
            Geometry::MultiLineString(vec![
                line(&[(0.0, 0.0), (0.0, 10.0)]),
                line(&[(0.0, 10.0), (0.0, 20.0)]),
                line(&[(0.0, 20.0), (0.0, 30.0)]),
            ])
        );
    }

    #[test]
    fn lines_are_reversed_as_needed() {
        let mut seq = sequencer(&[&[(0.0, 0.0), (0.0, 10.0)], &[(0.0, 20.0), (0.0, 10.0)]]);
        assert_eq!(
            seq.sequenced_line_strings().unwrap(),
            Geometry::MultiLineString(vec![
                line(&[(0.0, 0.0), (0.0, 10.0)]),
                line(&[(0.0, 10.0), (0.0, 20.0)]),
            ])
        );
    }

    #[test]
    fn two_edge_loop_sequences() {
        let mut seq = sequencer(&[&[(0.0, 0.0), (0.0, 10.0)], &[(0.0, 10.0), (0.0, 0.0)]]);
        assert!(seq.is_sequenceable());
        let result = seq.sequenced_line_strings().unwrap();
        let Geometry::MultiLineString(lines) = &result else {
            panic!("expected a multi-line string, got {result:?}");
        };
        // Both edges of the loop are traversed.
        assert_eq!(lines.len(), 2);
        assert!(LineSequencer::is_sequenced(&result));
    }

    #[test]
    fn branch_with_ring_is_not_sequenceable() {
        // Three open lines and a closed loop all meet at (0,10), which
        // leaves four odd-degree vertices in the component.
        let mut seq = sequencer(&[
            &[(0.0, 0.0), (0.0, 10.0)],
            &[(0.0, 10.0), (0.0, 20.0)],
            &[(0.0, 10.0), (10.0, 10.0)],
            &[(0.0, 10.0), (5.0, 15.0), (0.0, 10.0)],
        ]);
        assert!(!seq.is_sequenceable());
        assert_matches!(seq.sequenced_line_strings(), Err(Error::NotSequenceable));
    }

    #[test]
    fn components_are_sequenced_separately() {
        let mut seq = sequencer(&[
            &[(10.0, 0.0), (10.0, 1.0)],
            &[(0.0, 0.0), (0.0, 1.0)],
            &[(10.0, 1.0), (10.0, 2.0)],
        ]);
        assert!(seq.is_sequenceable());
        assert_eq!(
            seq.sequenced_line_strings().unwrap(),
            Geometry::MultiLineString(vec![
                line(&[(0.0, 0.0), (0.0, 1.0)]),
                line(&[(10.0, 0.0), (10.0, 1.0)]),
                line(&[(10.0, 1.0), (10.0, 2.0)]),
            ])
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let lines: [&[(f64, f64)]; 3] = [
            &[(0.0, 10.0), (5.0, 10.0)],
            &[(0.0, 0.0), (0.0, 10.0)],
            &[(5.0, 10.0), (5.0, 0.0)],
        ];
        let mut a = sequencer(&lines);
        let mut b = sequencer(&[lines[2], lines[0], lines[1]]);
        assert_eq!(
            a.sequenced_line_strings().unwrap(),
            b.sequenced_line_strings().unwrap()
        );
    }

    #[test]
    fn closed_ring_input_sequences_as_itself() {
        let ring: &[(f64, f64)] = &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)];
        let mut seq = sequencer(&[ring]);
        assert_eq!(
            seq.sequenced_line_strings().unwrap(),
            Geometry::LineString(line(ring))
        );
    }

    #[test]
    fn empty_input_is_sequenceable() {
        let mut seq = LineSequencer::new();
        assert!(seq.is_sequenceable());
        assert_eq!(
            seq.sequenced_line_strings().unwrap(),
            Geometry::MultiLineString(vec![])
        );
    }

    #[test]
    fn is_sequenced_rejects_out_of_order_lines() {
        let sequenced = Geometry::MultiLineString(vec![
            line(&[(0.0, 0.0), (0.0, 10.0)]),
            line(&[(0.0, 10.0), (0.0, 20.0)]),
        ]);
        assert!(LineSequencer::is_sequenced(&sequenced));

        let doubles_back = Geometry::MultiLineString(vec![
            line(&[(0.0, 20.0), (0.0, 30.0)]),
            line(&[(0.0, 0.0), (0.0, 10.0)]),
            line(&[(0.0, 10.0), (0.0, 20.0)]),
        ]);
        assert!(!LineSequencer::is_sequenced(&doubles_back));

        // Non-multi-line geometries are trivially sequenced.
        assert!(LineSequencer::is_sequenced(&Geometry::Point(pt(0.0, 0.0))));
    }
}
