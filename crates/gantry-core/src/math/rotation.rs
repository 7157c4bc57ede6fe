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

//! Defines the orientation state of a moving structure.

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

use super::{degrees_to_radians, Mat3, Vec3};

/// The orientation of a moving structure.
///
/// Holds three principal angles and a secondary yaw, all in degrees. The composed
/// rotation matrix is built on first read and reset whenever an angle changes, so a
/// read never observes a stale matrix.
///
/// Angles are unconstrained; wrapping them is the caller's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RotationState {
    x: f64,
    y: f64,
    z: f64,
    second_y: f64,
    #[serde(skip)]
    matrix: OnceCell<Mat3>,
}

impl RotationState {
    /// The identity orientation.
    #[allow(clippy::declare_interior_mutable_const)]
    pub const NONE: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        second_y: 0.0,
        matrix: OnceCell::new(),
    };

    /// Creates a state from the three principal angles.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Self::NONE
        }
    }

    /// Sets the angle around the X axis.
    pub fn set_x(&mut self, degrees: f64) {
        self.x = degrees;
        self.matrix = OnceCell::new();
    }

    /// Sets the angle around the Y axis.
    pub fn set_y(&mut self, degrees: f64) {
        self.y = degrees;
        self.matrix = OnceCell::new();
    }

    /// Sets the angle around the Z axis.
    pub fn set_z(&mut self, degrees: f64) {
        self.z = degrees;
        self.matrix = OnceCell::new();
    }

    /// Sets the secondary yaw. It does not take part in the composed matrix.
    pub fn set_second_yaw(&mut self, degrees: f64) {
        self.second_y = degrees;
    }

    /// The angle around the X axis, in degrees.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// The angle around the Y axis, in degrees.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// The angle around the Z axis, in degrees.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// The secondary yaw offset, in degrees.
    pub fn yaw_offset(&self) -> f64 {
        self.second_y
    }

    /// Returns `true` if the structure is tilted off the horizontal plane.
    pub fn has_vertical_rotation(&self) -> bool {
        self.x != 0.0 || self.z != 0.0
    }

    /// Returns the composed rotation matrix, building it if needed.
    ///
    /// Axes are applied X, then Y, then Z; a zero angle contributes an identity factor
    /// and is skipped.
    pub fn as_matrix(&self) -> Mat3 {
        *self.matrix.get_or_init(|| {
            let mut matrix = Mat3::IDENTITY;
            if self.x != 0.0 {
                matrix = matrix * Mat3::from_rotation_x(degrees_to_radians(-self.x));
            }
            if self.y != 0.0 {
                matrix = matrix * Mat3::from_rotation_y(degrees_to_radians(self.y));
            }
            if self.z != 0.0 {
                matrix = matrix * Mat3::from_rotation_z(degrees_to_radians(-self.z));
            }
            matrix
        })
    }

    /// Rotates a local direction into world orientation.
    #[inline]
    pub fn apply(&self, vec: Vec3) -> Vec3 {
        self.as_matrix() * vec
    }

    /// Rotates a world direction back into local orientation.
    #[inline]
    pub fn reverse(&self, vec: Vec3) -> Vec3 {
        self.as_matrix().transpose() * vec
    }
}

impl PartialEq for RotationState {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.z == other.z
            && self.second_y == other.second_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn compose_without_skipping(state: &RotationState) -> Mat3 {
        Mat3::IDENTITY
            * Mat3::from_rotation_x(degrees_to_radians(-state.x()))
            * Mat3::from_rotation_y(degrees_to_radians(state.y()))
            * Mat3::from_rotation_z(degrees_to_radians(-state.z()))
    }

    #[test]
    fn none_is_identity() {
        assert_eq!(RotationState::NONE.as_matrix(), Mat3::IDENTITY);
        assert!(!RotationState::NONE.has_vertical_rotation());
    }

    #[test]
    fn skipping_zero_axes_matches_full_composition() {
        let states = [
            RotationState::new(0.0, 37.0, 0.0),
            RotationState::new(15.0, 0.0, 0.0),
            RotationState::new(0.0, 0.0, -80.0),
            RotationState::new(12.5, -200.0, 33.0),
        ];
        for state in &states {
            assert_abs_diff_eq!(state.as_matrix(), compose_without_skipping(state), epsilon = 1e-12);
        }
    }

    #[test]
    fn setting_an_angle_invalidates_the_cached_matrix() {
        let mut state = RotationState::NONE;
        assert_eq!(state.as_matrix(), Mat3::IDENTITY);

        state.set_y(90.0);
        assert_abs_diff_eq!(state.apply(Vec3::X), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-12);

        state.set_y(0.0);
        assert_eq!(state.as_matrix(), Mat3::IDENTITY);
    }

    #[test]
    fn vertical_rotation_ignores_yaw() {
        let mut state = RotationState::new(0.0, 45.0, 0.0);
        assert!(!state.has_vertical_rotation());
        state.set_z(10.0);
        assert!(state.has_vertical_rotation());
        state.set_z(0.0);
        state.set_x(-5.0);
        assert!(state.has_vertical_rotation());
    }

    #[test]
    fn second_yaw_does_not_rotate() {
        let mut state = RotationState::NONE;
        state.set_second_yaw(90.0);
        assert_eq!(state.yaw_offset(), 90.0);
        assert_eq!(state.as_matrix(), Mat3::IDENTITY);
    }

    #[test]
    fn reverse_undoes_apply() {
        let state = RotationState::new(20.0, 110.0, -45.0);
        let v = Vec3::new(0.3, -2.0, 7.5);
        assert_abs_diff_eq!(state.reverse(state.apply(v)), v, epsilon = 1e-12);
    }
}
