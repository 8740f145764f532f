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

//! An axis-aligned square region, in any dimension.

use crate::geometry::point::Point;
use derive_builder::Builder;
use num::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned hypercube region in `D`-dimensional space.
///
/// Lightweight, should be passed by value. Defined by its centre and side
/// length; the boundaries lie `length / 2` from the centre in every
/// dimension. Containment is half-open: the low face belongs to the square,
/// the high face does not.
///
/// **NB:** The side length must be positive and nonzero.
///
/// ```
/// use skip_quadtree_rs::SquareBuilder;
///
/// let sq = SquareBuilder::default()
///     .center([0.0, 0.0])
///     .length(2.0)
///     .build().unwrap();
///
/// assert!(sq.contains([-1.0, 0.0].into()));  // low face is inside,
/// assert!(!sq.contains([1.0, 0.0].into()));  // high face is not.
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Clone, Copy, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Square<U, const D: usize>
where
    U: Float,
{
    #[builder(setter(into))]
    center: Point<U, D>,
    length: U,
}

impl<U, const D: usize> SquareBuilder<U, D>
where
    U: Float,
{
    fn validate(&self) -> Result<(), String> {
        if let Some(l) = self.length {
            if l <= U::zero() {
                return Err("Squares may not have nonpositive lengths.".to_string());
            }
        }
        Ok(())
    }
}

impl<U, const D: usize> std::fmt::Debug for Square<U, D>
where
    U: Float + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:?})->{:?}", self.center, self.length)
    }
}

impl<U, const D: usize> Square<U, D>
where
    U: Float,
{
    /// Construct a new [`Square`].
    /// # Panics
    /// Panics if `length` is nonpositive.
    pub fn new(center: impl Into<Point<U, D>>, length: U) -> Self {
        assert!(length > U::zero());
        Self {
            center: center.into(),
            length,
        }
    }

    // Accessors //

    /// The centre of the region.
    pub fn center(&self) -> Point<U, D> {
        self.center
    }

    /// The side length of the region.
    pub fn length(&self) -> U {
        self.length
    }

    // Evaluation //

    /// Whether `p` lies within the region: in every dimension,
    /// `c - l/2 <= p < c + l/2`.
    pub fn contains(&self, p: Point<U, D>) -> bool {
        let bound = self.length / Self::two();
        (0..D).all(|i| {
            self.center.coord(i) - bound <= p.coord(i) && p.coord(i) < self.center.coord(i) + bound
        })
    }

    /// The quadrant (orthant) of `p` relative to this square's centre.
    ///
    /// Bit `i` of the result is set iff `p` lies on the non-negative side of
    /// dimension `i`, judged with a `tolerance` fudge toward the positive
    /// side. Results are in `[0, 2^D)`.
    pub fn quadrant_of(&self, p: Point<U, D>, tolerance: U) -> usize {
        let mut quadrant = 0;
        for i in 0..D {
            if p.coord(i) >= self.center.coord(i) - tolerance {
                quadrant |= 1 << i;
            }
        }
        quadrant
    }

    /// The sub-square occupying `quadrant` of this square: its centre is
    /// offset a quarter-length toward the quadrant's corner, and its side
    /// length is halved.
    pub fn child(&self, quadrant: usize) -> Self {
        let quarter = self.length / (Self::two() + Self::two());
        let mut coords = *self.center.coords();
        for (i, c) in coords.iter_mut().enumerate() {
            if (quadrant >> i) & 1 == 1 {
                *c = *c + quarter;
            } else {
                *c = *c - quarter;
            }
        }
        Self {
            center: coords.into(),
            length: self.length / Self::two(),
        }
    }

    /// Whether `other` has the same centre and side length, within
    /// `tolerance`.
    pub fn coincides(&self, other: Square<U, D>, tolerance: U) -> bool {
        self.center.approx_eq(other.center, tolerance)
            && (self.length - other.length).abs() <= tolerance
    }

    // Strongly-typed alias for U::one() + U::one()
    fn two() -> U {
        U::one() + U::one()
    }
}
