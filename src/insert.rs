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

//! Insertion: a single top-to-ground pass which splits full gaps on the way
//! down by promoting their middle element, then attaches the new point on
//! the ground level.

use crate::{
    geometry::Point,
    node::Node,
    tree::{ListPos, SkipQuadtree},
    types::Outcome,
};
use num::Float;
use tracing::{debug, trace, warn};

impl<U, const D: usize> SkipQuadtree<U, D>
where
    U: Float,
{
    /// Adds `p` to the tree. Returns whether the tree changed: `false` if
    /// `p` falls outside the bounding square, or is already present within
    /// tolerance (in which case nothing is mutated).
    ///
    /// ```
    /// use skip_quadtree_rs::SkipQuadtree;
    ///
    /// let mut tree = SkipQuadtree::<f64, 2>::new(2.0, [0.0, 0.0]);
    ///
    /// assert!(tree.insert([0.0, 0.0].into()));
    /// assert!(!tree.insert([0.0, 0.0].into()));   // duplicate
    /// assert!(!tree.insert([1.5, 0.0].into()));   // out of bounds
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, p: Point<U, D>) -> bool {
        if !self.contains(p) {
            debug!("insert rejected: out of bounds");
            return false;
        }
        // Checking membership up front keeps a duplicate insert from
        // promoting anything: the tree really is untouched.
        if self.search(p) {
            debug!("insert rejected: already present");
            return false;
        }
        match self.add_levels(p) {
            Outcome::Success => {
                self.bump_len(1);
                self.maybe_grow();
                debug!(len = self.len(), levels = self.levels(), "inserted");
                true
            }
            Outcome::Exists => false,
            Outcome::Nonexistent | Outcome::Failure => {
                warn!("insert failed: structural precondition violated");
                false
            }
        }
    }

    // The descent. At each level above ground, measure the gap on the level
    // below between the list predecessor's lower copy and the successor's;
    // a gap of three is split by promoting its middle element into the
    // current level. The ground level attaches `p` itself.
    fn add_levels(&mut self, p: Point<U, D>) -> Outcome {
        // The descent state: a square covering `p` and a list position at or
        // before `p`, both on the current level.
        let mut from = self.top_root();
        let mut pos: ListPos = None;

        for lvl in (0..=self.top_index()).rev() {
            let (parent, _) = self.descend(from, p);
            let prev = self.list_walk(lvl, pos, p);

            if lvl == 0 {
                return self.promote(0, parent, prev, None, p);
            }

            let next = self.list_next(lvl, prev);
            let below_start = self.pos_down(prev);
            let below_stop = next.and_then(|id| self.node(id).down());
            let gap = self.gap(lvl - 1, below_start, below_stop);
            if gap.len() == 3 {
                let mid = gap[1];
                let mid_center = self.node(mid).center();
                // Invariant: the promotion root must contain the promoted
                // centre. The descended parent usually does; the level root
                // always does.
                let promote_root = match self.node(parent).as_square() {
                    Some(sq) if sq.contains(mid_center) => parent,
                    _ => self.root(lvl),
                };
                trace!(level = lvl, "splitting a full gap");
                match self.promote(lvl, promote_root, prev, Some(mid), mid_center) {
                    Outcome::Success => (),
                    _ => return Outcome::Failure,
                }
            }

            from = match self.node(parent).down() {
                Some(below) => below,
                None => return Outcome::Failure,
            };
            pos = below_start;
        }
        Outcome::Failure
    }

    // Inserts a point at `p` into level `lvl`, descending the tree from
    // `root` and the list from `start`. `down` is the point's copy one level
    // below (`None` on the ground level).
    //
    // When `p`'s quadrant is already occupied, a fresh containing square is
    // wedged between the parent and the two conflicting children, shrunk
    // until they separate.
    pub(crate) fn promote(
        &mut self,
        lvl: usize,
        root: u64,
        start: ListPos,
        down: Option<u64>,
        p: Point<U, D>,
    ) -> Outcome {
        match self.node(root).as_square() {
            Some(sq) if sq.contains(p) => (),
            _ => return Outcome::Failure,
        }

        let (parent, sibling) = self.descend(root, p);
        let prev = self.list_walk(lvl, start, p);
        let next = self.list_next(lvl, prev);

        // Idempotence: an equal point already on this level.
        if let Some(sib) = sibling {
            let sib_node = self.node(sib);
            if sib_node.is_point() && sib_node.center().approx_eq(p, self.precision()) {
                return Outcome::Exists;
            }
        }
        if let Some(nx) = next {
            if self.node(nx).center().approx_eq(p, self.precision()) {
                return Outcome::Exists;
            }
        }

        let parent_sq = match self.node(parent).as_square() {
            Some(sq) => sq,
            None => return Outcome::Failure,
        };
        let quadrant = parent_sq.quadrant_of(p, self.precision());

        let mut point_node = Node::new_point(p);
        point_node.set_down(down);
        point_node.set_next(next);
        let point = self.alloc(point_node);

        match sibling {
            None => {
                self.node_mut(parent).set_child(quadrant, Some(point));
            }
            Some(sib) => {
                // Shrink a copy of the parent's region toward `p` until `p`
                // and the sibling land in different quadrants of it.
                let sib_center = self.node(sib).center();
                let mut region = parent_sq;
                loop {
                    region = region.child(region.quadrant_of(p, self.precision()));
                    if region.length() < self.precision() {
                        // The pair is tolerance-equal; no square separates it.
                        self.release(point);
                        return Outcome::Exists;
                    }
                    if region.quadrant_of(p, self.precision())
                        != region.quadrant_of(sib_center, self.precision())
                    {
                        break;
                    }
                }

                // The square with this centre and length is guaranteed to
                // exist one level down, where both children already live.
                let square_down = match self.node(parent).down() {
                    None => None,
                    Some(below) => match self.find_matching_square(below, region) {
                        Some(m) => Some(m),
                        None => {
                            self.release(point);
                            return Outcome::Failure;
                        }
                    },
                };

                let mut square_node = Node::new_square(region);
                square_node.set_down(square_down);
                square_node.set_child(region.quadrant_of(p, self.precision()), Some(point));
                square_node.set_child(
                    region.quadrant_of(sib_center, self.precision()),
                    Some(sib),
                );
                let square = self.alloc(square_node);
                self.node_mut(parent).set_child(quadrant, Some(square));
            }
        }

        self.list_set_next(lvl, prev, Some(point));
        trace!(level = lvl, "attached a point");
        Outcome::Success
    }

    // Quadrant descent from `from` to the square coinciding with `target`.
    fn find_matching_square(
        &self,
        from: u64,
        target: crate::geometry::Square<U, D>,
    ) -> Option<u64> {
        let mut cur = from;
        loop {
            let node = self.node(cur);
            let sq = node.as_square()?;
            if sq.coincides(target, self.precision()) {
                return Some(cur);
            }
            if sq.length() <= target.length() {
                return None;
            }
            cur = node.child(sq.quadrant_of(target.center(), self.precision()))?;
        }
    }
}
