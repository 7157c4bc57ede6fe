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

//! Integer grid-cell coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use super::{Direction, Vec3};

/// The integer coordinates of one grid cell.
///
/// A cell `p` covers the half-open box `[p, p + 1)` on every axis.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// The x coordinate.
    pub x: i32,
    /// The y coordinate.
    pub y: i32,
    /// The z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// The origin cell.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a new `BlockPos`.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the cell enclosing a continuous point.
    ///
    /// # Examples
    ///
    /// ```
    /// use gantry_core::math::{BlockPos, Vec3};
    /// assert_eq!(BlockPos::containing(Vec3::new(-0.25, 3.9, 0.0)), BlockPos::new(-1, 3, 0));
    /// ```
    #[inline]
    pub fn containing(point: Vec3) -> Self {
        Self::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }

    /// Returns the minimum corner of the cell as a vector.
    #[inline]
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f64, self.y as f64, self.z as f64)
    }

    /// Returns the centre point of the cell.
    #[inline]
    pub fn center(self) -> Vec3 {
        self.as_vec3().add_xyz(0.5, 0.5, 0.5)
    }

    /// Returns the neighbouring cell in the given direction.
    #[inline]
    pub fn offset(self, direction: Direction) -> Self {
        self + direction.normal()
    }
}

impl Add for BlockPos {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for BlockPos {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}
