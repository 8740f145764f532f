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

use num::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A point in `D`-dimensional space. Lightweight, should be passed by value.
///
/// Coordinate equality and ordering are always evaluated relative to a
/// tolerance: two coordinates within `tolerance` of each other are
/// indistinguishable. The tolerance is owned by the tree, not the point, so
/// both comparison methods take it as an argument.
///
/// ```
/// use skip_quadtree_rs::Point;
///
/// let a = Point::from([0.5, 0.25]);
/// let b = Point::from([0.5 + 1e-12, 0.25]);
///
/// assert!(a.approx_eq(b, 1e-9));
/// assert!(!a.approx_eq(b, 1e-15));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Clone, Copy)]
pub struct Point<U, const D: usize> {
    inner: [U; D],
}

impl<U, const D: usize> std::fmt::Debug for Point<U, D>
where
    U: Float + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}

impl<U, const D: usize> From<[U; D]> for Point<U, D>
where
    U: Float,
{
    fn from(inner: [U; D]) -> Self {
        Point { inner }
    }
}

impl<U, const D: usize> From<Point<U, D>> for [U; D]
where
    U: Float,
{
    fn from(value: Point<U, D>) -> Self {
        value.inner
    }
}

impl<U, const D: usize> Point<U, D>
where
    U: Float,
{
    // Accessors //

    /// The coordinate in dimension `i`.
    pub fn coord(&self, i: usize) -> U {
        self.inner[i]
    }

    /// All `D` coordinates.
    pub fn coords(&self) -> &[U; D] {
        &self.inner
    }

    // Evaluation //

    /// Whether every coordinate of `self` is within `tolerance` of the
    /// corresponding coordinate of `other`.
    pub fn approx_eq(&self, other: Point<U, D>, tolerance: U) -> bool {
        (0..D).all(|i| (self.inner[i] - other.inner[i]).abs() <= tolerance)
    }

    /// Total order used by the per-level point lists.
    ///
    /// Dimensions are scanned from `D-1` down to `0`; the first dimension
    /// which differs by more than `tolerance` decides. Points which agree in
    /// every dimension compare `Equal`, exactly when [`approx_eq`] holds.
    ///
    /// [`approx_eq`]: #method.approx_eq
    pub fn cmp_within(&self, other: Point<U, D>, tolerance: U) -> Ordering {
        for i in (0..D).rev() {
            if (self.inner[i] - other.inner[i]).abs() > tolerance {
                if self.inner[i] > other.inner[i] {
                    return Ordering::Greater;
                }
                return Ordering::Less;
            }
        }
        Ordering::Equal
    }
}
