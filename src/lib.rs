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

//! A deterministic compressed [skip
//! quadtree](https://en.wikipedia.org/wiki/Quadtree) for d-dimensional
//! points.
//!
//! # Quick Start
//! ```
//! use skip_quadtree_rs::SkipQuadtree;
//!
//! // Instantiate a new tree over the square of side 2 centred on the
//! // origin. The second type parameter is the dimension.
//! let mut tree = SkipQuadtree::<f64, 2>::new(2.0, [0.0, 0.0]);
//!
//! // Points anywhere in the bounding square go in...
//! assert!(tree.insert([0.25, 0.25].into()));
//! assert!(tree.insert([-0.5, 0.125].into()));
//!
//! // ...membership comes back out...
//! assert!(tree.search([0.25, 0.25].into()));
//!
//! // ...and points come back out again.
//! assert!(tree.remove([0.25, 0.25].into()));
//! assert_eq!(tree.len(), 1);
//! ```
//!
//! # Implementation
//!
//! The tree is a stack of levels. Each level is a compressed quadtree over a
//! subset of the points — every internal square splits its points across at
//! least two quadrants, and runs of single-child squares are elided — and
//! doubles as an ordered singly linked list of its points. Which points
//! appear on which levels is not random, as in an ordinary skip list, but
//! follows the deterministic 1-2-3 rule: between any two neighbouring points
//! of a level, the level below holds one, two, or three points.
//!
//! ```text
//! level 2   ( root )──────────────────────────   (empty, always)
//! level 1   ( root )───────────── c ──────────
//! level 0   ( root )── a ──── b ── c ── d ─────
//! ```
//!
//! Searches descend one level's quadtree until the trail goes cold, then hop
//! to the same square one level down, for logarithmic time overall.
//! Insertion splits every width-3 gap along its descent by promoting the
//! gap's middle point one level up; deletion merges or borrows around every
//! width-1 gap along its descent by demoting a neighbouring point. Both
//! leave the 1-2-3 rule intact, so the logarithmic bound is worst-case, not
//! expected-case.
//!
//! Coordinates are any [`num::Float`]; two points within the tree's
//! `precision` of each other are the same point. The dimension is a const
//! generic — `SkipQuadtree<f64, 3>` is an octree variant with eight child
//! slots per square.
//!
//! # Usage
//!
//! For further usage details, see the documentation for the [`SkipQuadtree`]
//! struct.
//!
//! [`SkipQuadtree`]: struct.SkipQuadtree.html

// For extra-pedantic documentation tests.
#![doc(test(attr(deny(warnings))))]

pub mod geometry;

mod insert;
mod node;
mod remove;
mod tree;
mod types;
#[cfg(test)]
mod validate;

pub use geometry::{Point, Square, SquareBuilder};
pub use tree::{FreeReport, SkipQuadtree};
