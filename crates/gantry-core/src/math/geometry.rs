// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides the axis-aligned bounding volume used for structure bounds.

use serde::{Deserialize, Serialize};

use super::{BlockPos, Vec3};

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// A structure keeps its bounds in local space; the world-space box is obtained by
/// offsetting them with the structure's anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a new `Aabb` from two corner points, in any order.
    #[inline]
    pub fn from_min_max(min_pt: Vec3, max_pt: Vec3) -> Self {
        Self {
            min: Vec3::new(
                min_pt.x.min(max_pt.x),
                min_pt.y.min(max_pt.y),
                min_pt.z.min(max_pt.z),
            ),
            max: Vec3::new(
                min_pt.x.max(max_pt.x),
                min_pt.y.max(max_pt.y),
                min_pt.z.max(max_pt.z),
            ),
        }
    }

    /// Returns the unit box covering one grid cell.
    #[inline]
    pub fn from_block(pos: BlockPos) -> Self {
        let min = pos.as_vec3();
        Self {
            min,
            max: min + Vec3::ONE,
        }
    }

    /// Creates the smallest box enclosing every given cell.
    ///
    /// # Returns
    ///
    /// Returns `None` if the iterator is empty.
    pub fn enclosing_blocks<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = BlockPos>,
    {
        positions
            .into_iter()
            .map(Self::from_block)
            .reduce(|acc, cell| acc.merge(&cell))
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and another one.
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: Vec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Returns this box translated by `offset`.
    #[inline]
    pub fn offset(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

impl Default for Aabb {
    /// Returns the unit box of the origin cell.
    #[inline]
    fn default() -> Self {
        Self::from_block(BlockPos::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosing_blocks_spans_all_cells() {
        let bounds = Aabb::enclosing_blocks([
            BlockPos::new(0, 0, 0),
            BlockPos::new(1, 0, 0),
            BlockPos::new(0, -2, 3),
        ])
        .expect("non-empty");
        assert_eq!(bounds.min, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(2.0, 1.0, 4.0));
    }

    #[test]
    fn enclosing_nothing_is_none() {
        assert!(Aabb::enclosing_blocks(std::iter::empty()).is_none());
    }

    #[test]
    fn offset_translates_both_corners() {
        let bounds = Aabb::from_block(BlockPos::ZERO).offset(Vec3::new(10.0, 64.0, 10.0));
        assert_eq!(bounds.min, Vec3::new(10.0, 64.0, 10.0));
        assert_eq!(bounds.max, Vec3::new(11.0, 65.0, 11.0));
        assert_eq!(bounds.merge(&Aabb::default()).min, Vec3::ZERO);
    }

    #[test]
    fn from_min_max_orders_corners() {
        let b = Aabb::from_min_max(Vec3::new(1.0, -1.0, 5.0), Vec3::new(-1.0, 1.0, 2.0));
        assert_eq!(b.min, Vec3::new(-1.0, -1.0, 2.0));
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 5.0));
    }
}
