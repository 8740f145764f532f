// Copyright 2019 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::{
    geometry::{Point, Square},
    node::Node,
    types::StoreType,
};
use num::Float;
use std::cmp::Ordering;
use tracing::debug;

// Default coordinate tolerance, cast into `U` at construction time.
const DEFAULT_PRECISION: f64 = 1e-9;

pub(crate) const BROKEN_LINK: &str =
    "I followed a node id out of the tree, but the store had no node under it!";

// A position in a level's ordered point list. `None` addresses the slot
// before the first point (the list head); `Some(id)` addresses the slot
// after the point `id`.
pub(crate) type ListPos = Option<u64>;

/// Counters reporting what a [`clear`] released.
///
/// `total` counts every node released, `leaf` the point nodes among them, and
/// `levels` the levels traversed. `clean` counts nodes that were live at
/// release time; in this serial design every node is, so `clean == total`.
///
/// [`clear`]: struct.SkipQuadtree.html#method.clear
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeReport {
    pub total: u64,
    pub clean: u64,
    pub leaf: u64,
    pub levels: u64,
}

/// A deterministic compressed skip quadtree over `D`-dimensional points.
///
/// The structure stores points drawn from a fixed bounding square and
/// supports membership query, insertion, and deletion, each in worst-case
/// logarithmic time. It is a stack of compressed quadtrees — every internal
/// square has at least two occupied quadrants — where each level holds a
/// subset of the level below, chosen by a deterministic 1-2-3 skip-list rule
/// rather than coin flips.
///
/// ## Parameterization
///
/// `SkipQuadtree<U, D>` is parameterized over
///  - `U`, the coordinate scalar, any `num::Float`, and
///  - `D`, the spatial dimension; each square has `2^D` child quadrants.
///
/// Coordinates within the tree's `precision` of each other are treated as
/// equal, so a point can only be stored once per tolerance ball.
///
/// # Quick start
/// ```
/// use skip_quadtree_rs::SkipQuadtree;
///
/// // A tree over the square of side 2 centred on the origin.
/// let mut tree = SkipQuadtree::<f64, 2>::new(2.0, [0.0, 0.0]);
///
/// assert!(tree.insert([0.25, 0.25].into()));
/// assert!(tree.insert([-0.5, 0.75].into()));
///
/// assert!(tree.search([0.25, 0.25].into()));
/// assert!(!tree.search([0.25, -0.25].into()));
///
/// assert!(tree.remove([0.25, 0.25].into()));
/// assert!(!tree.search([0.25, 0.25].into()));
/// assert_eq!(tree.len(), 1);
/// ```
pub struct SkipQuadtree<U, const D: usize>
where
    U: Float,
{
    // All nodes, keyed by a handle that is never reused.
    store: StoreType<U, D>,

    // The last-allocated handle. This is a monotonically increasing counter.
    node_counter: u64,

    // Per-level roots and list heads. Index 0 is the ground level; the last
    // entry is the top level, which is always empty.
    roots: Vec<u64>,
    heads: Vec<ListPos>,

    // The region every stored point must fall in.
    bounds: Square<U, D>,

    // Coordinate tolerance.
    precision: U,

    // The number of stored points (ground-level point count).
    len: usize,
}

impl<U, const D: usize> std::fmt::Debug for SkipQuadtree<U, D>
where
    U: Float + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "SkipQuadtree{{bounds: {:?}, levels: {:?}, len: {:?}}}",
            self.bounds,
            self.levels(),
            self.len
        )
    }
}

impl<U, const D: usize> SkipQuadtree<U, D>
where
    U: Float,
{
    // pub

    /// Creates a new, empty tree over the square of side `length` centred on
    /// `center`, with the default coordinate tolerance of `1e-9`.
    ///
    /// Containment in the bounding square is half-open: points on its low
    /// faces are storable, points on its high faces are not.
    ///
    /// # Panics
    /// Panics if `length` is nonpositive.
    /// ```
    /// use skip_quadtree_rs::SkipQuadtree;
    ///
    /// let tree = SkipQuadtree::<f64, 2>::new(2.0, [0.0, 0.0]);
    ///
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.length(), 2.0);
    /// ```
    pub fn new(length: U, center: impl Into<Point<U, D>>) -> Self {
        Self::with_precision(
            length,
            center,
            U::from(DEFAULT_PRECISION).expect("Unexpected error in SkipQuadtree::new()."),
        )
    }

    /// Creates a new, empty tree with an explicit coordinate tolerance.
    ///
    /// # Panics
    /// Panics if `length` is nonpositive or `precision` is negative.
    pub fn with_precision(length: U, center: impl Into<Point<U, D>>, precision: U) -> Self {
        assert!(precision >= U::zero());
        let bounds = Square::new(center, length);
        debug!(levels = 1, "creating skip quadtree");
        let mut tree = Self {
            store: StoreType::new(),
            node_counter: 0,
            roots: Vec::new(),
            heads: Vec::new(),
            bounds,
            precision,
            len: 0,
        };
        let root = tree.alloc(Node::new_square(bounds));
        tree.roots.push(root);
        tree.heads.push(None);
        tree
    }

    /// The centre of the region which this tree represents.
    pub fn center(&self) -> Point<U, D> {
        self.bounds.center()
    }

    /// The side length of the region which this tree represents.
    pub fn length(&self) -> U {
        self.bounds.length()
    }

    /// The coordinate tolerance under which two points count as equal.
    pub fn precision(&self) -> U {
        self.precision
    }

    /// The number of points in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether or not the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of levels in the tree, counting the always-empty top
    /// level. An empty tree has one.
    pub fn levels(&self) -> usize {
        self.roots.len()
    }

    /// Whether or not `p` could be stored in this tree, i.e. falls within
    /// the bounding square.
    pub fn contains(&self, p: Point<U, D>) -> bool {
        self.bounds.contains(p)
    }

    /// Whether or not `p` is present in the tree, within tolerance.
    ///
    /// Starting from the top level, the query descends each compressed
    /// quadtree by quadrant until the trail goes cold, then drops to the same
    /// square one level below. Only a miss on the ground level is a miss.
    /// ```
    /// use skip_quadtree_rs::SkipQuadtree;
    ///
    /// let mut tree = SkipQuadtree::<f64, 2>::new(2.0, [0.0, 0.0]);
    /// tree.insert([0.125, -0.25].into());
    ///
    /// assert!(tree.search([0.125, -0.25].into()));
    /// assert!(!tree.search([0.5, 0.5].into()));
    /// ```
    pub fn search(&self, p: Point<U, D>) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        let mut cur = self.top_root();
        loop {
            let (last_square, target) = self.descend(cur, p);
            if let Some(t) = target {
                let node = self.node(t);
                if node.is_point() && node.center().approx_eq(p, self.precision) {
                    return true;
                }
            }
            match self.node(last_square).down() {
                Some(below) => cur = below,
                None => return false,
            }
        }
    }

    /// Releases every node in the tree, level by level from the top, and
    /// resets the tree to its initial empty state. Returns a [`FreeReport`]
    /// of what was released.
    ///
    /// Each level's nodes are released through child links alone, so no
    /// subtree's release depends on any other and a repeated `clear` is
    /// safe.
    ///
    /// [`FreeReport`]: struct.FreeReport.html
    /// ```
    /// use skip_quadtree_rs::SkipQuadtree;
    ///
    /// let mut tree = SkipQuadtree::<f64, 2>::new(2.0, [0.0, 0.0]);
    /// tree.insert([0.25, 0.25].into());
    /// tree.insert([-0.25, 0.25].into());
    ///
    /// let report = tree.clear();
    /// assert_eq!(report.leaf, 2);  // two stored points, each on one level
    /// assert_eq!(report.clean, report.total);
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) -> FreeReport {
        let mut report = FreeReport {
            levels: self.roots.len() as u64,
            ..FreeReport::default()
        };
        // Top level first. Within a level, post-order on the child tables;
        // `down` links are never followed, so nothing is visited twice.
        for lvl in (0..self.roots.len()).rev() {
            let mut stack = vec![self.roots[lvl]];
            while let Some(id) = stack.pop() {
                if let Some(node) = self.store.remove(&id) {
                    report.total += 1;
                    report.clean += 1;
                    if node.is_point() {
                        report.leaf += 1;
                    }
                    stack.extend(node.children().iter().flatten());
                }
            }
        }
        debug_assert!(self.store.is_empty());
        self.store.clear();
        self.roots.clear();
        self.heads.clear();
        self.len = 0;
        let root = self.alloc(Node::new_square(self.bounds));
        self.roots.push(root);
        self.heads.push(None);
        debug!(
            total = report.total,
            leaf = report.leaf,
            levels = report.levels,
            "cleared skip quadtree"
        );
        report
    }

    // pub(crate) — arena plumbing

    pub(crate) fn node(&self, id: u64) -> &Node<U, D> {
        self.store.get(&id).expect(BROKEN_LINK)
    }

    pub(crate) fn node_mut(&mut self, id: u64) -> &mut Node<U, D> {
        self.store.get_mut(&id).expect(BROKEN_LINK)
    }

    pub(crate) fn alloc(&mut self, node: Node<U, D>) -> u64 {
        let id = self.node_counter;
        self.node_counter += 1;
        self.store.insert(id, node);
        id
    }

    pub(crate) fn release(&mut self, id: u64) -> Option<Node<U, D>> {
        self.store.remove(&id)
    }

    pub(crate) fn top_index(&self) -> usize {
        self.roots.len() - 1
    }

    pub(crate) fn top_root(&self) -> u64 {
        *self.roots.last().expect(BROKEN_LINK)
    }

    pub(crate) fn root(&self, lvl: usize) -> u64 {
        self.roots[lvl]
    }

    pub(crate) fn bump_len(&mut self, delta: isize) {
        self.len = (self.len as isize + delta) as usize;
    }

    // pub(crate) — level stack maintenance

    // Grow a fresh, empty top level once the current top root gains a child,
    // so the top is always vacant.
    pub(crate) fn maybe_grow(&mut self) {
        let top = self.top_root();
        if self.node(top).has_children() {
            let mut root = Node::new_square(self.bounds);
            root.set_down(Some(top));
            let id = self.alloc(root);
            self.roots.push(id);
            self.heads.push(None);
            debug!(levels = self.roots.len(), "grew a level");
        }
    }

    // Drop the top level once the top two roots are both empty.
    pub(crate) fn maybe_shrink(&mut self) {
        let n = self.roots.len();
        if n < 2 {
            return;
        }
        if !self.node(self.roots[n - 1]).has_children()
            && !self.node(self.roots[n - 2]).has_children()
        {
            let id = self.roots.pop().expect(BROKEN_LINK);
            self.heads.pop();
            self.release(id);
            debug!(levels = self.roots.len(), "dropped a level");
        }
    }

    // pub(crate) — tree traversal

    // Quadrant descent from the square `from`, which must contain `p`. Stops
    // at the last square on `p`'s path; `target` reports what ended the walk:
    // `None` for an empty child slot, or the point / non-containing square
    // occupying `p`'s quadrant.
    pub(crate) fn descend(&self, from: u64, p: Point<U, D>) -> (u64, Option<u64>) {
        let mut cur = from;
        loop {
            let sq = match self.node(cur).as_square() {
                Some(sq) => sq,
                None => return (cur, None),
            };
            let q = sq.quadrant_of(p, self.precision);
            match self.node(cur).child(q) {
                None => return (cur, None),
                Some(c) => match self.node(c).as_square() {
                    Some(child_sq) if child_sq.contains(p) => cur = c,
                    _ => return (cur, Some(c)),
                },
            }
        }
    }

    // pub(crate) — list traversal

    // The id after `pos` in level `lvl`'s list, if any.
    pub(crate) fn list_next(&self, lvl: usize, pos: ListPos) -> Option<u64> {
        match pos {
            None => self.heads[lvl],
            Some(id) => self.node(id).next(),
        }
    }

    pub(crate) fn list_set_next(&mut self, lvl: usize, pos: ListPos, v: Option<u64>) {
        match pos {
            None => self.heads[lvl] = v,
            Some(id) => self.node_mut(id).set_next(v),
        }
    }

    // Advance from `start` to the last position strictly before `p`.
    pub(crate) fn list_walk(&self, lvl: usize, start: ListPos, p: Point<U, D>) -> ListPos {
        let mut pos = start;
        while let Some(nx) = self.list_next(lvl, pos) {
            if self.node(nx).center().cmp_within(p, self.precision) == Ordering::Less {
                pos = Some(nx);
            } else {
                break;
            }
        }
        pos
    }

    // The position one level below `pos`: the head below the head, or a
    // point's lower copy.
    pub(crate) fn pos_down(&self, pos: ListPos) -> ListPos {
        pos.and_then(|id| self.node(id).down())
    }

    // The ids strictly between `start` and `stop` in level `lvl`'s list
    // (to the end of the list if `stop` is `None`). Under the 1-2-3
    // invariant, callers see at most three.
    pub(crate) fn gap(&self, lvl: usize, start: ListPos, stop: Option<u64>) -> Vec<u64> {
        let mut out = Vec::new();
        let mut pos = start;
        while let Some(nx) = self.list_next(lvl, pos) {
            if Some(nx) == stop {
                break;
            }
            out.push(nx);
            pos = Some(nx);
        }
        out
    }
}
