#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

pub mod bintree;
pub mod dissolve;
pub mod geom;
pub mod geometry;
pub mod graph;
pub mod mark;
mod num;
pub mod rtree;
pub mod sequence;

pub use bintree::{Bintree, Interval};
pub use dissolve::{dissolve, LineDissolver};
pub use geom::Point;
pub use geometry::{Geometry, Polygon};
pub use graph::EdgeGraph;
pub use rtree::PackedRTree;
pub use sequence::LineSequencer;

/// The caller asked for something the current state can't provide.
///
/// These are usage errors, not data errors: degenerate input (empty
/// geometries, zero-length segments) is normalized silently and never
/// surfaces here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A sequenced result was requested, but the input lines do not admit a
    /// continuous path. Check [`LineSequencer::is_sequenceable`] first.
    NotSequenceable,
    /// An insertion or removal was attempted on a packed index after its
    /// first query froze it.
    IndexBuilt,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotSequenceable => write!(f, "the input lines cannot be sequenced"),
            Error::IndexBuilt => write!(f, "the index was already built by a query"),
        }
    }
}

impl std::error::Error for Error {}
