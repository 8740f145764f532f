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

//! Deletion: a single top-to-ground pass which rebalances the gaps along the
//! point's search path before removing its copy from each level it occupies.

use crate::{
    geometry::Point,
    tree::{ListPos, SkipQuadtree},
    types::Outcome,
};
use num::Float;
use std::cmp::Ordering;
use tracing::{debug, trace, warn};

impl<U, const D: usize> SkipQuadtree<U, D>
where
    U: Float,
{
    /// Removes `p` from the tree. Returns whether the tree changed: `false`
    /// if `p` is outside the bounding square or not present within tolerance
    /// (in which case nothing is mutated).
    ///
    /// ```
    /// use skip_quadtree_rs::SkipQuadtree;
    ///
    /// let mut tree = SkipQuadtree::<f64, 2>::new(2.0, [0.0, 0.0]);
    /// tree.insert([0.25, -0.5].into());
    ///
    /// assert!(tree.remove([0.25, -0.5].into()));
    /// assert!(!tree.remove([0.25, -0.5].into()));   // already gone
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, p: Point<U, D>) -> bool {
        if !self.contains(p) {
            debug!("remove rejected: out of bounds");
            return false;
        }
        // Checking membership up front keeps a miss from rebalancing
        // anything: the tree really is untouched.
        if !self.search(p) {
            debug!("remove rejected: not present");
            return false;
        }
        match self.remove_levels(p) {
            Outcome::Success => {
                self.bump_len(-1);
                self.maybe_shrink();
                debug!(len = self.len(), levels = self.levels(), "removed");
                true
            }
            Outcome::Nonexistent => false,
            Outcome::Exists | Outcome::Failure => {
                warn!("remove failed: structural precondition violated");
                false
            }
        }
    }

    // The descent. The window (`pos`, `rb`) brackets `p`'s path on the
    // current level: both are lower copies of the adjacent anchors one level
    // up, so neither may be demoted here — rebalancing works strictly with
    // the points between them, whose gaps on the level below it may merge or
    // split freely.
    fn remove_levels(&mut self, p: Point<U, D>) -> Outcome {
        let mut pos: ListPos = None;
        let mut rb: Option<u64> = None;

        for lvl in (0..=self.top_index()).rev() {
            // The two list positions before p and the two points after.
            let mut prevprev = pos;
            let mut prev = pos;
            while let Some(nx) = self.list_next(lvl, prev) {
                if self.node(nx).center().cmp_within(p, self.precision()) == Ordering::Less {
                    prevprev = prev;
                    prev = Some(nx);
                } else {
                    break;
                }
            }
            let next = self.list_next(lvl, prev);
            let nextnext = next.and_then(|id| self.node(id).next());

            if lvl == 0 {
                return match next {
                    Some(nx) if self.node(nx).center().approx_eq(p, self.precision()) => {
                        self.demote(0, prev, nx)
                    }
                    _ => Outcome::Nonexistent,
                };
            }

            match next {
                // p is an anchor on this level. Demoting it merges the two
                // gaps flanking its lower copy; split the merge first when
                // it would come out wider than three.
                Some(pid) if self.node(pid).center().approx_eq(p, self.precision()) => {
                    let p_down = self.node(pid).down();
                    let left = self.gap(lvl - 1, self.pos_down(prev), p_down);
                    let right_stop = nextnext.and_then(|id| self.node(id).down());
                    let right = self.gap(lvl - 1, p_down, right_stop);
                    if left.len() + right.len() > 3 {
                        let anchor = if right.len() > 1 {
                            right[0]
                        } else {
                            match left.last() {
                                Some(&y) => y,
                                None => return Outcome::Failure,
                            }
                        };
                        let c = self.node(anchor).center();
                        trace!(level = lvl, "splitting before demoting an anchor");
                        match self.promote(lvl, self.root(lvl), prev, Some(anchor), c) {
                            Outcome::Success => (),
                            _ => return Outcome::Failure,
                        }
                    }
                    match self.demote(lvl, prev, pid) {
                        Outcome::Success => (),
                        _ => return Outcome::Failure,
                    }
                }
                // p is not on this level: it descends into the gap between
                // prev and next. A gap of one cannot absorb the deletion, so
                // widen it by merging with (or borrowing from) the sibling
                // gap on whichever side offers one.
                _ => {
                    let gap = self.gap(
                        lvl - 1,
                        self.pos_down(prev),
                        next.and_then(|id| self.node(id).down()),
                    );
                    if gap.len() == 1 {
                        if prev != pos {
                            let pv = match prev {
                                Some(pv) => pv,
                                None => return Outcome::Failure,
                            };
                            let left =
                                self.gap(lvl - 1, self.pos_down(prevprev), self.node(pv).down());
                            if left.len() > 1 {
                                let y = match left.last() {
                                    Some(&y) => y,
                                    None => return Outcome::Failure,
                                };
                                let c = self.node(y).center();
                                match self.promote(lvl, self.root(lvl), prevprev, Some(y), c) {
                                    Outcome::Success => (),
                                    _ => return Outcome::Failure,
                                }
                            }
                            match self.demote(lvl, prevprev, pv) {
                                Outcome::Success => (),
                                _ => return Outcome::Failure,
                            }
                        } else if let Some(nid) = next {
                            if Some(nid) != rb {
                                let right = self.gap(
                                    lvl - 1,
                                    self.node(nid).down(),
                                    nextnext.and_then(|id| self.node(id).down()),
                                );
                                if right.len() > 1 {
                                    let x = right[0];
                                    let c = self.node(x).center();
                                    match self.promote(lvl, self.root(lvl), prev, Some(x), c) {
                                        Outcome::Success => (),
                                        _ => return Outcome::Failure,
                                    }
                                }
                                match self.demote(lvl, prev, nid) {
                                    Outcome::Success => (),
                                    _ => return Outcome::Failure,
                                }
                            }
                        }
                    }
                }
            }

            // A fresh window around p for the level below.
            let prev2 = self.list_walk(lvl, pos, p);
            let next2 = self.list_next(lvl, prev2);
            pos = self.pos_down(prev2);
            rb = next2.and_then(|id| self.node(id).down());
        }
        Outcome::Failure
    }

    // Removes `victim` from level `lvl`: detach it from its parent square,
    // collapse the parent if the detachment leaves it a single child, splice
    // it out of the level's list, and release it. `start` is any list
    // position at or before the victim.
    pub(crate) fn demote(&mut self, lvl: usize, start: ListPos, victim: u64) -> Outcome {
        let vc = self.node(victim).center();

        // Land both walks before mutating anything.
        let mut pred = start;
        loop {
            match self.list_next(lvl, pred) {
                Some(nx) if nx == victim => break,
                Some(nx) => pred = Some(nx),
                None => return Outcome::Failure,
            }
        }

        // Pure quadrant descent from the level root, retracing how the
        // victim was attached; tracks the grandparent and each square's slot
        // in its parent for the collapse step.
        let root = self.root(lvl);
        let mut grandparent: Option<(u64, usize)> = None;
        let mut parent = root;
        let slot = loop {
            let sq = match self.node(parent).as_square() {
                Some(sq) => sq,
                None => return Outcome::Failure,
            };
            let q = sq.quadrant_of(vc, self.precision());
            match self.node(parent).child(q) {
                Some(c) if c == victim => break q,
                Some(c) if self.node(c).is_square() => {
                    grandparent = Some((parent, q));
                    parent = c;
                }
                _ => return Outcome::Failure,
            }
        };

        self.node_mut(parent).set_child(slot, None);

        // Collapse: a non-root square reduced to one child gives that child
        // to its grandparent and disappears.
        if parent != root {
            if let (Some(only), Some((gp, gp_slot))) =
                (self.node(parent).single_child(), grandparent)
            {
                self.node_mut(gp).set_child(gp_slot, Some(only));
                self.release(parent);
                trace!(level = lvl, "collapsed a square");
            }
        }

        let after = self.node(victim).next();
        self.list_set_next(lvl, pred, after);
        self.release(victim);
        trace!(level = lvl, "demoted a point");
        Outcome::Success
    }
}
