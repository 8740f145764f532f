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

//! Test-only structural checker: asserts every tree invariant over every
//! level. Randomized tests call this after each mutation.

use crate::tree::SkipQuadtree;
use num::Float;
use std::cmp::Ordering;
use std::collections::HashSet;

// Asserts, in order: quadrant containment, compression, matched `down`
// links, the 1-2-3 gap rule, strict list ordering, the empty top level, and
// agreement between each level's tree and list views.
pub(crate) fn check_invariants<U, const D: usize>(tree: &SkipQuadtree<U, D>)
where
    U: Float + std::fmt::Debug,
{
    let top = tree.top_index();
    for lvl in 0..=top {
        check_level_tree(tree, lvl);
        let list = level_list(tree, lvl);
        check_level_order(tree, &list);
        check_tree_list_agreement(tree, lvl, &list);
        if lvl < top {
            check_gaps(tree, lvl);
        }
    }

    // The top level is always vacant; every level under it is not.
    assert!(
        !tree.node(tree.root(top)).has_children(),
        "top level root must be empty"
    );
    for lvl in 0..top {
        assert!(
            tree.node(tree.root(lvl)).has_children(),
            "only the top level may be empty (level {} is not the top)",
            lvl
        );
    }

    assert_eq!(
        tree.len(),
        level_list(tree, 0).len(),
        "len must match the ground list"
    );
}

// Containment, compression, and matched-down, over one level's tree.
fn check_level_tree<U, const D: usize>(tree: &SkipQuadtree<U, D>, lvl: usize)
where
    U: Float + std::fmt::Debug,
{
    let root = tree.root(lvl);
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        let sq = match node.as_square() {
            Some(sq) => sq,
            None => continue,
        };

        // Invariant: each occupied slot holds a child whose centre falls in
        // that quadrant of the square.
        let mut occupied = 0;
        for (q, slot) in node.children().iter().enumerate() {
            if let Some(child) = *slot {
                occupied += 1;
                let cc = tree.node(child).center();
                assert_eq!(
                    sq.quadrant_of(cc, tree.precision()),
                    q,
                    "child sits in the wrong quadrant slot (level {})",
                    lvl
                );
                stack.push(child);
            }
        }

        // Invariant: no single-child squares, level roots excepted.
        if id != root {
            assert!(
                occupied >= 2,
                "non-root square with {} children survived (level {})",
                occupied,
                lvl
            );
        }

        // Invariant: a square's down is the coinciding square one level
        // deeper. Above ground it must exist; on the ground it must not.
        match node.down() {
            Some(below) => {
                assert!(lvl > 0, "ground square with a down link");
                let below_sq = tree
                    .node(below)
                    .as_square()
                    .expect("square down link leads to a point");
                assert!(
                    sq.coincides(below_sq, tree.precision()),
                    "square down link does not coincide (level {})",
                    lvl
                );
            }
            None => assert_eq!(lvl, 0, "upper-level square without a down link"),
        }
    }
}

// Strict ascending order along the list.
fn check_level_order<U, const D: usize>(tree: &SkipQuadtree<U, D>, list: &[u64])
where
    U: Float + std::fmt::Debug,
{
    for pair in list.windows(2) {
        let a = tree.node(pair[0]).center();
        let b = tree.node(pair[1]).center();
        assert_eq!(
            a.cmp_within(b, tree.precision()),
            Ordering::Less,
            "list order violated"
        );
    }
}

// The 1-2-3 rule: the downs of level lvl+1's points split level lvl's list
// into gaps of one to three points, in matching order.
fn check_gaps<U, const D: usize>(tree: &SkipQuadtree<U, D>, lvl: usize)
where
    U: Float + std::fmt::Debug,
{
    let list = level_list(tree, lvl);
    let anchors: Vec<u64> = level_list(tree, lvl + 1)
        .iter()
        .map(|&id| {
            let node = tree.node(id);
            let down = node.down().expect("upper-level point without a down link");
            assert!(
                tree.node(down).center().approx_eq(node.center(), tree.precision()),
                "point down link leads to a different point"
            );
            down
        })
        .collect();

    let mut widths = Vec::new();
    let mut width = 0usize;
    let mut expected = anchors.iter();
    let mut awaiting = expected.next();
    for id in &list {
        if Some(id) == awaiting {
            widths.push(width);
            width = 0;
            awaiting = expected.next();
        } else {
            width += 1;
        }
    }
    assert!(awaiting.is_none(), "anchor downs out of order or missing");
    widths.push(width);

    for (i, w) in widths.iter().enumerate() {
        assert!(
            (1..=3).contains(w),
            "gap {} on level {} has width {} (gaps: {:?})",
            i,
            lvl,
            w,
            widths
        );
    }
}

// Both views of a level hold exactly the same points.
fn check_tree_list_agreement<U, const D: usize>(tree: &SkipQuadtree<U, D>, lvl: usize, list: &[u64])
where
    U: Float + std::fmt::Debug,
{
    let mut tree_points = HashSet::new();
    let mut stack = vec![tree.root(lvl)];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if node.is_point() {
            tree_points.insert(id);
        }
        stack.extend(node.children().iter().flatten());
    }
    let list_points: HashSet<u64> = list.iter().copied().collect();
    assert_eq!(
        tree_points, list_points,
        "tree and list disagree on level {}",
        lvl
    );
}

fn level_list<U, const D: usize>(tree: &SkipQuadtree<U, D>, lvl: usize) -> Vec<u64>
where
    U: Float,
{
    let mut out = Vec::new();
    let mut pos = None;
    while let Some(nx) = tree.list_next(lvl, pos) {
        out.push(nx);
        pos = Some(nx);
    }
    out
}
