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

//! The grid-aligned placement used when a moving structure is put back into the world.

use serde::{Deserialize, Serialize};

use super::{BlockPos, Direction, Mat3, RotationState, Vec3};

/// Maps structure-local points and cells to their final world placement.
///
/// Unlike [`super::SpatialTransform`], which follows the structure continuously, this
/// transform snaps every angle to the nearest quarter turn and the anchor to a whole
/// cell, so that cells land exactly on cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureTransform {
    /// World cell receiving the local cell holding the pivot.
    pub offset: BlockPos,
    /// Quarter turns around the X axis.
    pub x_turns: i32,
    /// Quarter turns around the Y axis.
    pub y_turns: i32,
    /// Quarter turns around the Z axis.
    pub z_turns: i32,
    /// The local rotation pivot.
    pub pivot: Vec3,
}

impl StructureTransform {
    /// Derives the placement for a structure at `anchor` with the given orientation.
    pub fn from_rotation_state(anchor: Vec3, rotation: &RotationState, pivot: Vec3) -> Self {
        Self {
            offset: BlockPos::containing(anchor + pivot),
            x_turns: snap_to_quarter_turns(rotation.x()),
            y_turns: snap_to_quarter_turns(rotation.y()),
            z_turns: snap_to_quarter_turns(rotation.z()),
            pivot,
        }
    }

    /// The exact rotation matrix of this placement.
    ///
    /// Sign conventions match [`RotationState::as_matrix`].
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_quarter_turns_x(-self.x_turns)
            * Mat3::from_quarter_turns_y(self.y_turns)
            * Mat3::from_quarter_turns_z(-self.z_turns)
    }

    /// Maps a continuous local point to world space.
    pub fn apply_vec(&self, local: Vec3) -> Vec3 {
        self.matrix() * (local - self.pivot) + self.pivot + self.offset.as_vec3()
    }

    /// Maps a local cell to the world cell it is placed into.
    ///
    /// Cells are rotated around their centre.
    pub fn apply_block(&self, local: BlockPos) -> BlockPos {
        BlockPos::containing(self.apply_vec(local.center()))
    }

    /// Rotates a facing along with the structure.
    pub fn apply_direction(&self, direction: Direction) -> Direction {
        direction.rotate(&self.matrix())
    }

    /// Rotates a direction vector along with the structure, without translation.
    pub fn apply_rotation(&self, vec: Vec3) -> Vec3 {
        self.matrix() * vec
    }
}

fn snap_to_quarter_turns(degrees: f64) -> i32 {
    ((degrees / 90.0).round() as i64).rem_euclid(4) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const PIVOT: Vec3 = Vec3::splat(0.5);

    #[test]
    fn unrotated_structure_lands_on_its_anchor() {
        let transform =
            StructureTransform::from_rotation_state(Vec3::new(10.0, 64.0, 10.0), &RotationState::NONE, PIVOT);
        assert_eq!(transform.offset, BlockPos::new(10, 64, 10));
        assert_eq!(transform.apply_block(BlockPos::new(0, 0, 0)), BlockPos::new(10, 64, 10));
        assert_eq!(transform.apply_block(BlockPos::new(1, 0, 0)), BlockPos::new(11, 64, 10));
    }

    #[test]
    fn fractional_anchor_snaps_to_the_pivot_cell() {
        let transform =
            StructureTransform::from_rotation_state(Vec3::new(2.7, 0.4, -0.6), &RotationState::NONE, PIVOT);
        assert_eq!(transform.offset, BlockPos::new(3, 0, -1));
    }

    #[test]
    fn angles_snap_to_the_nearest_quarter_turn() {
        let transform = StructureTransform::from_rotation_state(
            Vec3::ZERO,
            &RotationState::new(-89.0, 134.0, 361.0),
            PIVOT,
        );
        assert_eq!((transform.x_turns, transform.y_turns, transform.z_turns), (3, 1, 0));
    }

    #[test]
    fn quarter_yaw_rotates_cells_and_facings() {
        let transform =
            StructureTransform::from_rotation_state(Vec3::ZERO, &RotationState::new(0.0, 90.0, 0.0), PIVOT);
        assert_eq!(transform.apply_block(BlockPos::new(1, 0, 0)), BlockPos::new(0, 0, -1));
        assert_eq!(transform.apply_block(BlockPos::new(0, 0, 1)), BlockPos::new(1, 0, 0));
        assert_eq!(transform.apply_direction(Direction::East), Direction::North);
        assert_eq!(transform.apply_direction(Direction::Up), Direction::Up);
    }

    #[test]
    fn matches_continuous_transform_on_exact_quarter_turns() {
        let rotation = RotationState::new(90.0, 180.0, -90.0);
        let anchor = Vec3::new(-5.0, 12.0, 7.0);
        let placement = StructureTransform::from_rotation_state(anchor, &rotation, PIVOT);
        let continuous = super::super::SpatialTransform::new(anchor, &rotation, PIVOT);
        for p in [Vec3::ZERO, Vec3::new(1.5, 2.0, -3.25)] {
            assert_abs_diff_eq!(placement.apply_vec(p), continuous.to_global(p), epsilon = 1e-9);
        }
    }
}
