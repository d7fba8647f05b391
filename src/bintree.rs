//! A binary interval tree over the 1-D real axis.
//!
//! Items are stored at the deepest node whose span wholly contains them:
//! each node splits exactly at its centre, so an item straddling the centre
//! stays put while anything else is pushed down into a half. The root
//! doubles outward as needed, which keeps the exact-halving invariant
//! without requiring the extent up front.

/// A closed interval `[lo, hi]` on the real axis.
///
/// The constructor swaps misordered bounds, so `lo <= hi` always holds for
/// non-empty intervals. The empty state is a sentinel (NaN bounds), useful
/// as the identity for [`expand_to_include`](Interval::expand_to_include).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    /// The empty interval.
    pub const EMPTY: Interval = Interval {
        lo: f64::NAN,
        hi: f64::NAN,
    };

    /// Creates the interval between `a` and `b`, in either order.
    pub fn new(a: f64, b: f64) -> Self {
        debug_assert!(a.is_finite());
        debug_assert!(b.is_finite());
        if a <= b {
            Interval { lo: a, hi: b }
        } else {
            Interval { lo: b, hi: a }
        }
    }

    /// Is this the empty interval?
    pub fn is_empty(&self) -> bool {
        self.lo.is_nan()
    }

    /// The lower bound.
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// The upper bound.
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// The length of the interval.
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// The midpoint of the interval.
    pub fn centre(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    /// Does this interval wholly contain `other`?
    pub fn contains(&self, other: &Interval) -> bool {
        !self.is_empty() && !other.is_empty() && self.lo <= other.lo && other.hi <= self.hi
    }

    /// Do the two intervals share at least one value?
    pub fn overlaps(&self, other: &Interval) -> bool {
        !self.is_empty() && !other.is_empty() && self.lo <= other.hi && other.lo <= self.hi
    }

    /// Grows this interval to cover `other`.
    pub fn expand_to_include(&mut self, other: &Interval) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = *other;
        } else {
            self.lo = self.lo.min(other.lo);
            self.hi = self.hi.max(other.hi);
        }
    }
}

/// Returns the child wholly containing `interval` in a node split at
/// `centre`: `0` for the low half, `1` for the high half, or `None` when
/// the interval straddles the centre and must stay at the node itself.
fn sub_node_index(interval: &Interval, centre: f64) -> Option<usize> {
    if interval.hi() <= centre {
        Some(0)
    } else if interval.lo() >= centre {
        Some(1)
    } else {
        None
    }
}

struct BinNode<T> {
    span: Interval,
    items: Vec<(Interval, T)>,
    sub: [Option<Box<BinNode<T>>>; 2],
}

impl<T> BinNode<T> {
    fn new(span: Interval) -> Self {
        BinNode {
            span,
            items: Vec::new(),
            sub: [None, None],
        }
    }

    fn child_span(&self, idx: usize) -> Interval {
        let centre = self.span.centre();
        if idx == 0 {
            Interval::new(self.span.lo(), centre)
        } else {
            Interval::new(centre, self.span.hi())
        }
    }

    /// `placement` decides where the item lands (it may be a padded copy of
    /// `bounds`); `bounds` is what gets stored and matched by queries.
    fn insert(&mut self, placement: Interval, bounds: Interval, item: T) {
        if let Some(idx) = sub_node_index(&placement, self.span.centre()) {
            let span = self.child_span(idx);
            let child = self.sub[idx].get_or_insert_with(|| Box::new(BinNode::new(span)));
            // Rounding can make the computed half-span miss the item by a
            // hair; in that case the item belongs here, not below.
            if child.span.contains(&placement) {
                child.insert(placement, bounds, item);
                return;
            }
        }
        self.items.push((bounds, item));
    }

    fn query<'a>(&'a self, q: &Interval, out: &mut Vec<&'a T>) {
        if !self.span.overlaps(q) {
            return;
        }
        for (bounds, item) in &self.items {
            if bounds.overlaps(q) {
                out.push(item);
            }
        }
        for child in self.sub.iter().flatten() {
            child.query(q, out);
        }
    }
}

/// A dynamic 1-D interval index.
///
/// Good for "find all items whose extent overlaps this range" queries where
/// the item set keeps growing; for a fixed item set the bulk-loaded
/// [`PackedRTree`](crate::rtree::PackedRTree) queries faster.
pub struct Bintree<T> {
    root: Option<Box<BinNode<T>>>,
    /// The smallest positive item width seen; degenerate (zero-width) items
    /// are padded by this much so that descent terminates.
    min_extent: f64,
    size: usize,
}

impl<T> Default for Bintree<T> {
    fn default() -> Self {
        Bintree {
            root: None,
            min_extent: 1.0,
            size: 0,
        }
    }
}

impl<T> Bintree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of items in the tree.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Is the tree empty?
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Inserts an item with the given extent.
    pub fn insert(&mut self, bounds: Interval, item: T) {
        debug_assert!(!bounds.is_empty());
        let width = bounds.width();
        if width > 0.0 && width < self.min_extent {
            self.min_extent = width;
        }
        let placement = if width > 0.0 {
            bounds
        } else {
            Interval::new(
                bounds.lo() - self.min_extent / 2.0,
                bounds.hi() + self.min_extent / 2.0,
            )
        };

        match &mut self.root {
            None => {
                let mut node = Box::new(BinNode::new(placement));
                node.insert(placement, bounds, item);
                self.root = Some(node);
            }
            Some(_) => {
                self.grow_to(&placement);
                if let Some(root) = &mut self.root {
                    root.insert(placement, bounds, item);
                }
            }
        }
        self.size += 1;
    }

    /// All items whose extent overlaps `q`.
    pub fn query(&self, q: &Interval) -> Vec<&T> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.query(q, &mut out);
        }
        out
    }

    /// Doubles the root outward until it covers `bounds`, keeping the old
    /// root as the matching half of each new root.
    fn grow_to(&mut self, bounds: &Interval) {
        let Some(mut root) = self.root.take() else {
            return;
        };
        while !root.span.contains(bounds) {
            let w = root.span.width();
            let (span, child_idx) = if bounds.lo() < root.span.lo() {
                (Interval::new(root.span.lo() - w, root.span.hi()), 1)
            } else {
                (Interval::new(root.span.lo(), root.span.hi() + w), 0)
            };
            let mut parent = Box::new(BinNode::new(span));
            parent.sub[child_idx] = Some(root);
            root = parent;
        }
        self.root = Some(root);
    }
}
