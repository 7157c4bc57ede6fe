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

//! Grid axes and the six cell-face directions.

use serde::{Deserialize, Serialize};

use super::{BlockPos, Mat3, Vec3};

/// One of the three principal axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// The X axis (east/west).
    X,
    /// The Y axis (up/down).
    Y,
    /// The Z axis (north/south).
    Z,
}

/// One of the six faces of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Negative Y.
    Down,
    /// Positive Y.
    Up,
    /// Negative Z.
    North,
    /// Positive Z.
    South,
    /// Negative X.
    West,
    /// Positive X.
    East,
}

impl Direction {
    /// All directions, in declaration order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the integer unit offset of this face.
    pub const fn normal(self) -> BlockPos {
        match self {
            Direction::Down => BlockPos::new(0, -1, 0),
            Direction::Up => BlockPos::new(0, 1, 0),
            Direction::North => BlockPos::new(0, 0, -1),
            Direction::South => BlockPos::new(0, 0, 1),
            Direction::West => BlockPos::new(-1, 0, 0),
            Direction::East => BlockPos::new(1, 0, 0),
        }
    }

    /// Returns the axis this direction lies on.
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    /// Returns the direction whose normal is closest to `vec`.
    pub fn nearest(vec: Vec3) -> Self {
        let mut best = Direction::North;
        let mut best_dot = f64::NEG_INFINITY;
        for direction in Self::ALL {
            let dot = direction.normal().as_vec3().dot(vec);
            if dot > best_dot {
                best_dot = dot;
                best = direction;
            }
        }
        best
    }

    /// Rotates this direction by a rotation matrix, snapping to the nearest face.
    pub fn rotate(self, rotation: &Mat3) -> Self {
        Self::nearest(*rotation * self.normal().as_vec3())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_picks_dominant_component() {
        assert_eq!(Direction::nearest(Vec3::new(0.1, 0.9, 0.0)), Direction::Up);
        assert_eq!(Direction::nearest(Vec3::new(-2.0, 0.5, 1.0)), Direction::West);
    }

    #[test]
    fn quarter_turn_about_y_cycles_horizontal_faces() {
        let rot = Mat3::from_quarter_turns_y(1);
        assert_eq!(Direction::North.rotate(&rot), Direction::West);
        assert_eq!(Direction::Up.rotate(&rot), Direction::Up);
        for direction in Direction::ALL {
            assert_eq!(direction.rotate(&Mat3::IDENTITY), direction);
        }
    }
}
