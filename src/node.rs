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

use crate::geometry::{Point, Square};
use num::Float;

// A node is either an internal square or a point leaf. Points double as
// entries in their level's ordered list via `next`; squares hold a child
// table of 2^D slots. Both kinds carry `down`, the same node one level below:
// for a square that is the square with identical centre and length, for a
// point it is the point's own lower copy (its list link and its tree link
// coincide).
#[derive(Clone, PartialEq)]
pub(crate) enum NodeKind<U> {
    Square {
        length: U,
        children: Box<[Option<u64>]>,
    },
    Point {
        next: Option<u64>,
    },
}

#[derive(Clone, PartialEq)]
pub(crate) struct Node<U, const D: usize> {
    center: Point<U, D>,
    down: Option<u64>,
    kind: NodeKind<U>,
}

impl<U, const D: usize> std::fmt::Debug for Node<U, D>
where
    U: Float + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.kind {
            NodeKind::Square { length, children } => {
                write!(
                    f,
                    "Square{{center: {:?}, length: {:?}, down: {:?}, children: {:?}}}",
                    self.center, length, self.down, children
                )
            }
            NodeKind::Point { next } => {
                write!(
                    f,
                    "Point{{center: {:?}, down: {:?}, next: {:?}}}",
                    self.center, self.down, next
                )
            }
        }
    }
}

impl<U, const D: usize> Node<U, D>
where
    U: Float,
{
    pub fn new_point(center: Point<U, D>) -> Self {
        Self {
            center,
            down: None,
            kind: NodeKind::Point { next: None },
        }
    }

    pub fn new_square(region: Square<U, D>) -> Self {
        Self {
            center: region.center(),
            down: None,
            kind: NodeKind::Square {
                length: region.length(),
                children: vec![None; 1 << D].into_boxed_slice(),
            },
        }
    }

    // Accessors //

    pub fn center(&self) -> Point<U, D> {
        self.center
    }

    pub fn is_square(&self) -> bool {
        matches!(self.kind, NodeKind::Square { .. })
    }

    pub fn is_point(&self) -> bool {
        matches!(self.kind, NodeKind::Point { .. })
    }

    pub fn down(&self) -> Option<u64> {
        self.down
    }

    pub fn set_down(&mut self, down: Option<u64>) {
        self.down = down;
    }

    // The geometric region, for square nodes.
    pub fn as_square(&self) -> Option<Square<U, D>> {
        match &self.kind {
            NodeKind::Square { length, .. } => Some(Square::new(self.center, *length)),
            NodeKind::Point { .. } => None,
        }
    }

    // List links (point nodes; squares have no successor).

    pub fn next(&self) -> Option<u64> {
        match &self.kind {
            NodeKind::Point { next } => *next,
            NodeKind::Square { .. } => None,
        }
    }

    pub fn set_next(&mut self, v: Option<u64>) {
        match &mut self.kind {
            NodeKind::Point { next } => *next = v,
            NodeKind::Square { .. } => debug_assert!(false, "squares carry no list link"),
        }
    }

    // Child table (square nodes; points have no children).

    pub fn children(&self) -> &[Option<u64>] {
        match &self.kind {
            NodeKind::Square { children, .. } => children,
            NodeKind::Point { .. } => &[],
        }
    }

    pub fn child(&self, quadrant: usize) -> Option<u64> {
        self.children().get(quadrant).copied().flatten()
    }

    pub fn set_child(&mut self, quadrant: usize, v: Option<u64>) {
        match &mut self.kind {
            NodeKind::Square { children, .. } => children[quadrant] = v,
            NodeKind::Point { .. } => debug_assert!(false, "points carry no child table"),
        }
    }

    pub fn has_children(&self) -> bool {
        self.children().iter().any(Option::is_some)
    }

    // The sole occupied child slot, if exactly one is occupied.
    pub fn single_child(&self) -> Option<u64> {
        let mut occupied = self.children().iter().flatten();
        match (occupied.next(), occupied.next()) {
            (Some(&id), None) => Some(id),
            _ => None,
        }
    }
}
