//! A sorted-packed R-tree: a bulk-loaded, write-once spatial index.
//!
//! Items accumulate until the first query, which freezes the set and builds
//! the tree in one pass: leaves are sorted by the centre of their bounds,
//! then adjacent nodes are paired bottom-up into binary parents until a
//! single root remains. The packing is what makes queries fast, and it is
//! also why the item set must not change afterwards -- mutating a built
//! tree is reported as a usage error, not accommodated.

use arrayvec::ArrayVec;
use kurbo::Rect;

use crate::num::CheapOrderedFloat;
use crate::Error;

fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.min_x() <= b.max_x() && b.min_x() <= a.max_x() && a.min_y() <= b.max_y() && b.min_y() <= a.max_y()
}

fn centre_key(r: &Rect) -> (CheapOrderedFloat, CheapOrderedFloat) {
    let c = r.center();
    (c.x.into(), c.y.into())
}

/// A write-once 2D spatial index over [`kurbo::Rect`] bounds.
///
/// Insert all items first; the first [`query`](PackedRTree::query) builds
/// the tree, after which [`insert`](PackedRTree::insert) and
/// [`remove`](PackedRTree::remove) fail with [`Error::IndexBuilt`].
#[derive(Clone, Debug)]
pub struct PackedRTree<T> {
    items: Vec<(Rect, T)>,
    /// Bounds per tree level, leaves first; `levels.last()` is the root.
    /// Node `i` of a level has children `2i` and `2i + 1` one level down.
    levels: Vec<Vec<Rect>>,
    built: bool,
}

impl<T> Default for PackedRTree<T> {
    fn default() -> Self {
        PackedRTree {
            items: Vec::new(),
            levels: Vec::new(),
            built: false,
        }
    }
}

impl<T> PackedRTree<T> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of items in the index.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Is the index empty?
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds an item with the given bounds.
    ///
    /// Fails with [`Error::IndexBuilt`] once the index has served a query.
    pub fn insert(&mut self, bounds: Rect, item: T) -> Result<(), Error> {
        if self.built {
            return Err(Error::IndexBuilt);
        }
        self.items.push((bounds, item));
        Ok(())
    }

    /// Removes the first item equal to `item`, reporting whether one was
    /// found.
    ///
    /// Like insertion, this only works before the index has been built.
    pub fn remove(&mut self, item: &T) -> Result<bool, Error>
    where
        T: PartialEq,
    {
        if self.built {
            return Err(Error::IndexBuilt);
        }
        match self.items.iter().position(|(_, it)| it == item) {
            Some(pos) => {
                self.items.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// All items whose bounds intersect `bounds`.
    ///
    /// The first query triggers the one-time build.
    pub fn query(&mut self, bounds: &Rect) -> Vec<&T> {
        self.build();

        let mut out = Vec::new();
        let Some(top) = self.levels.len().checked_sub(1) else {
            return out;
        };

        // Depth-first descent. Popping a node pushes at most its two
        // children one level down, so the stack never holds more than one
        // pending sibling per level: its size is bounded by the tree
        // height, which for binary packing can't reach 64.
        let mut stack: ArrayVec<(usize, usize), 80> = ArrayVec::new();
        stack.push((top, 0));
        while let Some((level, i)) = stack.pop() {
            if !rects_overlap(&self.levels[level][i], bounds) {
                continue;
            }
            if level == 0 {
                out.push(&self.items[i].1);
            } else {
                let child = 2 * i;
                stack.push((level - 1, child));
                if child + 1 < self.levels[level - 1].len() {
                    stack.push((level - 1, child + 1));
                }
            }
        }
        out
    }

    fn build(&mut self) {
        if self.built {
            return;
        }
        self.built = true;
        if self.items.is_empty() {
            return;
        }

        self.items
            .sort_by(|(a, _), (b, _)| centre_key(a).cmp(&centre_key(b)));

        let leaves: Vec<Rect> = self.items.iter().map(|(r, _)| *r).collect();
        self.levels.push(leaves);
        while let Some(level) = self.levels.last() {
            if level.len() <= 1 {
                break;
            }
            let parents: Vec<Rect> = level
                .chunks(2)
                .map(|pair| {
                    if pair.len() == 2 {
                        pair[0].union(pair[1])
                    } else {
                        pair[0]
                    }
                })
                .collect();
            self.levels.push(parents);
        }
    }
}
