//! A half-edge graph over a set of undirected line segments.
//!
//! Every undirected segment is stored as a pair of directed half-edges,
//! allocated in adjacent arena slots so that flipping a half-edge is just an
//! index XOR. Vertices are deduplicated by coordinate value, and the edges
//! leaving each vertex form a ring in counter-clockwise order, which is what
//! lets traversal code walk "the next edge around this point"
//! deterministically.

use std::collections::HashMap;

use crate::geom::{pseudo_angle, Point};
use crate::num::CheapOrderedFloat;

/// An index into the half-edge arena of an [`EdgeGraph`].
///
/// The two directions of one undirected segment always occupy an even/odd
/// index pair, so [`EdgeIdx::sym`] needs no lookup.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeIdx(usize);

impl EdgeIdx {
    /// The half-edge representing the same segment in the opposite
    /// direction.
    pub fn sym(self) -> EdgeIdx {
        EdgeIdx(self.0 ^ 1)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// An index into the vertex arena of an [`EdgeGraph`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexIdx(usize);

#[derive(Clone)]
pub(crate) struct EdgeVec<T> {
    inner: Vec<T>,
}

#[derive(Clone)]
pub(crate) struct VertexVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(EdgeVec, EdgeIdx, "e");
impl_typed_vec!(VertexVec, VertexIdx, "v");

#[derive(Clone, Debug)]
struct EdgeRecord {
    orig: VertexIdx,
    /// The next half-edge counter-clockwise around `orig`.
    onext: EdgeIdx,
}

#[derive(Clone, Debug)]
struct VertexRecord {
    pt: Point,
    /// The first half-edge inserted with this origin. Stable across later
    /// insertions, which makes it a deterministic ring representative.
    out: EdgeIdx,
}

/// A planar graph of undirected segments, stored as half-edge pairs.
#[derive(Clone, Default)]
pub struct EdgeGraph {
    edges: EdgeVec<EdgeRecord>,
    verts: VertexVec<VertexRecord>,
    vert_ids: HashMap<Point, VertexIdx>,
}

impl std::fmt::Debug for EdgeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (v, rec) in self.verts.iter() {
            map.entry(&(v, rec.pt), &self.out_edges(v));
        }
        map.finish()
    }
}

impl EdgeGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the undirected segment between `a` and `b`.
    ///
    /// Returns the half-edge directed from `a` to `b`. Zero-length segments
    /// (`a == b`) are skipped and return `None`. Inserting a segment that is
    /// already present coalesces with the existing edge pair, so each
    /// physical segment appears in the graph exactly once.
    pub fn add_edge(&mut self, a: Point, b: Point) -> Option<EdgeIdx> {
        if a == b {
            return None;
        }
        if let Some(e) = self.find_edge(a, b) {
            return Some(e);
        }

        // The records don't exist yet, but their indices are known: the pair
        // goes at the end of the arena.
        let e = EdgeIdx(self.edges.len());
        let s = e.sym();
        let va = self.vertex_for(a, e);
        let vb = self.vertex_for(b, s);
        self.edges.push(EdgeRecord { orig: va, onext: e });
        self.edges.push(EdgeRecord { orig: vb, onext: s });
        self.splice(va, e);
        self.splice(vb, s);

        #[cfg(feature = "slow-asserts")]
        {
            self.check_ring(va);
            self.check_ring(vb);
        }

        Some(e)
    }

    /// Looks up the half-edge directed from `a` to `b`, if that segment is
    /// in the graph.
    pub fn find_edge(&self, a: Point, b: Point) -> Option<EdgeIdx> {
        let &va = self.vert_ids.get(&a)?;
        let &vb = self.vert_ids.get(&b)?;
        let first = self.verts[va].out;
        let mut cur = first;
        let mut steps = 0;
        loop {
            if self.edges[cur.sym()].orig == vb {
                return Some(cur);
            }
            cur = self.edges[cur].onext;
            if cur == first {
                return None;
            }
            steps += 1;
            debug_assert!(steps <= self.edges.len(), "edge ring failed to close");
        }
    }

    /// The origin vertex of a half-edge.
    pub fn orig(&self, e: EdgeIdx) -> VertexIdx {
        self.edges[e].orig
    }

    /// The destination vertex of a half-edge.
    pub fn dest(&self, e: EdgeIdx) -> VertexIdx {
        self.edges[e.sym()].orig
    }

    /// The coordinate of a vertex.
    pub fn point(&self, v: VertexIdx) -> Point {
        self.verts[v].pt
    }

    /// The next half-edge counter-clockwise around the origin of `e`.
    pub fn onext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e].onext
    }

    /// The number of segments incident to a vertex.
    pub fn degree(&self, v: VertexIdx) -> usize {
        self.out_edges(v).len()
    }

    /// The half-edges leaving `v`, in counter-clockwise ring order starting
    /// from the vertex's representative edge.
    pub fn out_edges(&self, v: VertexIdx) -> Vec<EdgeIdx> {
        let first = self.verts[v].out;
        let mut ring = vec![first];
        let mut cur = self.edges[first].onext;
        while cur != first {
            ring.push(cur);
            debug_assert!(ring.len() <= self.edges.len(), "edge ring failed to close");
            cur = self.edges[cur].onext;
        }
        ring
    }

    /// Iterates over all vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexIdx, Point)> + '_ {
        self.verts.iter().map(|(v, rec)| (v, rec.pt))
    }

    /// One representative half-edge per vertex, in vertex insertion order.
    pub fn vertex_edges(&self) -> impl Iterator<Item = EdgeIdx> + '_ {
        self.verts.iter().map(|(_, rec)| rec.out)
    }

    /// Iterates over all half-edge indices.
    pub fn half_edges(&self) -> impl Iterator<Item = EdgeIdx> {
        self.edges.indices()
    }

    /// The number of half-edges (twice the number of segments).
    pub fn num_half_edges(&self) -> usize {
        self.edges.len()
    }

    /// The number of distinct vertices.
    pub fn num_vertices(&self) -> usize {
        self.verts.len()
    }

    fn vertex_for(&mut self, p: Point, out: EdgeIdx) -> VertexIdx {
        if let Some(&v) = self.vert_ids.get(&p) {
            v
        } else {
            let v = self.verts.push(VertexRecord { pt: p, out });
            self.vert_ids.insert(p, v);
            v
        }
    }

    fn edge_angle(&self, e: EdgeIdx) -> f64 {
        let o = self.verts[self.edges[e].orig].pt;
        let d = self.verts[self.edges[e.sym()].orig].pt;
        pseudo_angle(d.x - o.x, d.y - o.y)
    }

    /// Links `e` into the ring around `v`, keeping the ring sorted by
    /// outgoing pseudo-angle.
    fn splice(&mut self, v: VertexIdx, e: EdgeIdx) {
        let first = self.verts[v].out;
        if first == e {
            // A brand-new vertex: `e` is its whole ring and already points
            // at itself.
            return;
        }

        // Find the edge to insert after: the one with the largest angle not
        // exceeding ours, or the largest angle overall if we're becoming the
        // ring's minimum. Ties keep the incumbent edges first.
        let ae = self.edge_angle(e);
        let key = |angle: f64| (angle <= ae, CheapOrderedFloat::from(angle));
        let mut best = first;
        let mut best_key = key(self.edge_angle(first));
        let mut cur = self.edges[first].onext;
        let mut steps = 0;
        while cur != first {
            let k = key(self.edge_angle(cur));
            if k >= best_key {
                best = cur;
                best_key = k;
            }
            cur = self.edges[cur].onext;
            steps += 1;
            debug_assert!(steps <= self.edges.len(), "edge ring failed to close");
        }

        self.edges[e].onext = self.edges[best].onext;
        self.edges[best].onext = e;
    }

    /// Validates the ring structure around `v`: it must close, every edge in
    /// it must originate at `v`, and the angles must be cyclically sorted.
    #[cfg(feature = "slow-asserts")]
    fn check_ring(&self, v: VertexIdx) {
        let ring = self.out_edges(v);
        let mut descents = 0;
        for (i, &e) in ring.iter().enumerate() {
            assert_eq!(self.edges[e].orig, v);
            let next = ring[(i + 1) % ring.len()];
            if self.edge_angle(e) > self.edge_angle(next) {
                descents += 1;
            }
        }
        assert!(descents <= 1, "edge ring is not angularly sorted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn zero_length_segments_are_skipped() {
        let mut g = EdgeGraph::new();
        assert_eq!(g.add_edge(pt(1.0, 1.0), pt(1.0, 1.0)), None);
        assert_eq!(g.num_half_edges(), 0);
        assert_eq!(g.num_vertices(), 0);
    }

    #[test]
    fn duplicate_segments_coalesce() {
        let mut g = EdgeGraph::new();
        let e = g.add_edge(pt(0.0, 0.0), pt(1.0, 0.0)).unwrap();
        assert_eq!(g.add_edge(pt(0.0, 0.0), pt(1.0, 0.0)), Some(e));
        // The reverse insertion coalesces too, giving back the other half.
        assert_eq!(g.add_edge(pt(1.0, 0.0), pt(0.0, 0.0)), Some(e.sym()));
        assert_eq!(g.num_half_edges(), 2);
        assert_eq!(g.num_vertices(), 2);
    }

    #[test]
    fn vertices_are_shared_by_value() {
        let mut g = EdgeGraph::new();
        g.add_edge(pt(0.0, 0.0), pt(1.0, 0.0));
        g.add_edge(pt(1.0, 0.0), pt(2.0, 0.0));
        assert_eq!(g.num_vertices(), 3);
        let (mid, _) = g.vertices().find(|&(_, p)| p == pt(1.0, 0.0)).unwrap();
        assert_eq!(g.degree(mid), 2);
    }

    #[test]
    fn sym_is_an_involution() {
        let mut g = EdgeGraph::new();
        let e = g.add_edge(pt(0.0, 0.0), pt(1.0, 1.0)).unwrap();
        assert_eq!(e.sym().sym(), e);
        assert_eq!(g.orig(e.sym()), g.dest(e));
        assert_eq!(g.dest(e.sym()), g.orig(e));
    }

    #[test]
    fn ring_is_counter_clockwise() {
        let center = pt(0.0, 0.0);
        let east = pt(1.0, 0.0);
        let north = pt(0.0, 1.0);
        let west = pt(-1.0, 0.0);
        let south = pt(0.0, -1.0);

        // Insert in a scrambled order; the ring must still come out in
        // counter-clockwise rotation.
        let mut g = EdgeGraph::new();
        let e_n = g.add_edge(center, north).unwrap();
        let e_s = g.add_edge(center, south).unwrap();
        let e_e = g.add_edge(center, east).unwrap();
        let e_w = g.add_edge(center, west).unwrap();

        let v = g.orig(e_n);
        assert_eq!(g.degree(v), 4);
        assert_eq!(g.onext(e_e), e_n);
        assert_eq!(g.onext(e_n), e_w);
        assert_eq!(g.onext(e_w), e_s);
        assert_eq!(g.onext(e_s), e_e);
    }

    #[test]
    fn find_edge_respects_direction() {
        let mut g = EdgeGraph::new();
        let e = g.add_edge(pt(0.0, 0.0), pt(3.0, 4.0)).unwrap();
        assert_eq!(g.find_edge(pt(0.0, 0.0), pt(3.0, 4.0)), Some(e));
        assert_eq!(g.find_edge(pt(3.0, 4.0), pt(0.0, 0.0)), Some(e.sym()));
        assert_eq!(g.find_edge(pt(0.0, 0.0), pt(9.0, 9.0)), None);
    }
}
