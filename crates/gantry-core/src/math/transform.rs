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

//! Conversion between a structure's local space and world space.

use super::{Mat3, RotationState, Vec3};

/// A snapshot of the local-to-world mapping of a moving structure.
///
/// Built from the anchor and the rotation state at one instant. It is a plain value,
/// passed explicitly to whoever needs it during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTransform {
    anchor: Vec3,
    pivot: Vec3,
    rotation: Mat3,
}

impl SpatialTransform {
    /// Creates a transform for a structure anchored at `anchor`, rotating around
    /// `pivot` (in local space).
    ///
    /// # Example
    ///
    /// ```rust
    /// use gantry_core::math::{RotationState, SpatialTransform, Vec3};
    ///
    /// let transform = SpatialTransform::new(
    ///     Vec3::new(10.0, 64.0, 10.0),
    ///     &RotationState::NONE,
    ///     Vec3::splat(0.5),
    /// );
    /// assert_eq!(transform.to_global(Vec3::ZERO), Vec3::new(10.0, 64.0, 10.0));
    /// ```
    pub fn new(anchor: Vec3, rotation: &RotationState, pivot: Vec3) -> Self {
        Self {
            anchor,
            pivot,
            rotation: rotation.as_matrix(),
        }
    }

    /// The identity mapping anchored at `anchor`.
    pub fn translation(anchor: Vec3, pivot: Vec3) -> Self {
        Self {
            anchor,
            pivot,
            rotation: Mat3::IDENTITY,
        }
    }

    /// The world position of the structure's local origin.
    #[inline]
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// The rotation matrix of this transform.
    #[inline]
    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    /// Maps a local point to world space.
    #[inline]
    pub fn to_global(&self, local: Vec3) -> Vec3 {
        self.rotation * (local - self.pivot) + self.pivot + self.anchor
    }

    /// Maps a world point to local space. Exact inverse of [`Self::to_global`].
    #[inline]
    pub fn to_local(&self, global: Vec3) -> Vec3 {
        self.rotation.transpose() * (global - self.anchor - self.pivot) + self.pivot
    }

    /// Rotates a local direction into world orientation, without translation.
    #[inline]
    pub fn rotate(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Rotates a world direction into local orientation, without translation.
    #[inline]
    pub fn reverse_rotate(&self, global: Vec3) -> Vec3 {
        self.rotation.transpose() * global
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const PIVOT: Vec3 = Vec3::splat(0.5);

    #[test]
    fn identity_rotation_only_translates() {
        let transform = SpatialTransform::new(Vec3::new(10.0, 64.0, 10.0), &RotationState::NONE, PIVOT);
        assert_eq!(transform.to_global(Vec3::ZERO), Vec3::new(10.0, 64.0, 10.0));
        assert_eq!(transform.to_global(Vec3::X), Vec3::new(11.0, 64.0, 10.0));
        assert_eq!(transform, SpatialTransform::translation(Vec3::new(10.0, 64.0, 10.0), PIVOT));
    }

    #[test]
    fn to_local_inverts_to_global() {
        let rotations = [
            RotationState::NONE,
            RotationState::new(0.0, 90.0, 0.0),
            RotationState::new(33.0, -71.0, 190.0),
            RotationState::new(-720.5, 0.0, 12.0),
        ];
        let points = [
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-3.25, 7.0, 0.125),
            Vec3::new(100.0, -40.0, 2.0),
        ];
        for rotation in &rotations {
            let transform = SpatialTransform::new(Vec3::new(-12.0, 70.5, 3.0), rotation, PIVOT);
            for &p in &points {
                assert_abs_diff_eq!(transform.to_local(transform.to_global(p)), p, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn pivot_cell_centre_is_fixed_by_rotation() {
        let anchor = Vec3::new(4.0, 5.0, 6.0);
        let transform = SpatialTransform::new(anchor, &RotationState::new(10.0, 80.0, -30.0), PIVOT);
        assert_abs_diff_eq!(transform.to_global(PIVOT), anchor + PIVOT, epsilon = 1e-12);
    }

    #[test]
    fn quarter_yaw_swings_points_around_the_pivot() {
        let transform = SpatialTransform::new(Vec3::ZERO, &RotationState::new(0.0, 90.0, 0.0), PIVOT);
        // (1.5, 0.5, 0.5) is one unit east of the pivot; a right-handed yaw sends it north.
        assert_abs_diff_eq!(
            transform.to_global(Vec3::new(1.5, 0.5, 0.5)),
            Vec3::new(0.5, 0.5, -0.5),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(transform.reverse_rotate(transform.rotate(Vec3::Z)), Vec3::Z, epsilon = 1e-12);
    }
}
