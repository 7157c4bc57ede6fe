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

//! Defines the `Mat3` rotation matrix type and associated operations.

use super::{Vec3, EPSILON};
use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// A 3x3 column-major matrix.
///
/// In this crate it only ever holds rotations: the composed orientation of a moving
/// structure, or the exact quarter-turn rotation applied when the structure is placed
/// back into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat3 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// Creates a new matrix from three column vectors.
    #[inline]
    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Creates a matrix for a rotation around the X-axis.
    ///
    /// # Arguments
    ///
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_x(angle_radians: f64) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::rotation_x_sc(s, c)
    }

    /// Creates a matrix for a right-handed rotation around the Y-axis.
    #[inline]
    pub fn from_rotation_y(angle_radians: f64) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::rotation_y_sc(s, c)
    }

    /// Creates a matrix for a rotation around the Z-axis.
    #[inline]
    pub fn from_rotation_z(angle_radians: f64) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::rotation_z_sc(s, c)
    }

    /// Exact rotation of `turns * 90` degrees around the X-axis.
    ///
    /// Unlike [`Mat3::from_rotation_x`], every entry is exactly `-1`, `0` or `1`, so
    /// integer cell coordinates survive the rotation without rounding drift.
    #[inline]
    pub fn from_quarter_turns_x(turns: i32) -> Self {
        let (s, c) = quarter_turn_sin_cos(turns);
        Self::rotation_x_sc(s, c)
    }

    /// Exact rotation of `turns * 90` degrees around the Y-axis.
    #[inline]
    pub fn from_quarter_turns_y(turns: i32) -> Self {
        let (s, c) = quarter_turn_sin_cos(turns);
        Self::rotation_y_sc(s, c)
    }

    /// Exact rotation of `turns * 90` degrees around the Z-axis.
    #[inline]
    pub fn from_quarter_turns_z(turns: i32) -> Self {
        let (s, c) = quarter_turn_sin_cos(turns);
        Self::rotation_z_sc(s, c)
    }

    fn rotation_x_sc(s: f64, c: f64) -> Self {
        Self::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, c, s),
            Vec3::new(0.0, -s, c),
        )
    }

    fn rotation_y_sc(s: f64, c: f64) -> Self {
        Self::from_cols(
            Vec3::new(c, 0.0, -s),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(s, 0.0, c),
        )
    }

    fn rotation_z_sc(s: f64, c: f64) -> Self {
        Self::from_cols(
            Vec3::new(c, s, 0.0),
            Vec3::new(-s, c, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    ///
    /// For a pure rotation this is also its inverse.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(
            Vec3::new(self.cols[0].x, self.cols[1].x, self.cols[2].x),
            Vec3::new(self.cols[0].y, self.cols[1].y, self.cols[2].y),
            Vec3::new(self.cols[0].z, self.cols[1].z, self.cols[2].z),
        )
    }
}

fn quarter_turn_sin_cos(turns: i32) -> (f64, f64) {
    match turns.rem_euclid(4) {
        0 => (0.0, 1.0),
        1 => (1.0, 0.0),
        2 => (0.0, -1.0),
        _ => (-1.0, 0.0),
    }
}

impl Default for Mat3 {
    /// Returns the 3x3 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Mat3) -> Self::Output {
        Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, v: Vec3) -> Self::Output {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

impl AbsDiffEq for Mat3 {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{degrees_to_radians, FRAC_PI_2};
    use approx::assert_abs_diff_eq;

    #[test]
    fn rotation_y_turns_x_into_negative_z() {
        let m = Mat3::from_rotation_y(FRAC_PI_2);
        assert_abs_diff_eq!(m * Vec3::X, Vec3::new(0.0, 0.0, -1.0));
        assert_abs_diff_eq!(m * Vec3::Y, Vec3::Y);
    }

    #[test]
    fn quarter_turns_match_trigonometric_rotations() {
        for turns in -4..8 {
            let angle = degrees_to_radians(90.0 * turns as f64);
            assert_abs_diff_eq!(
                Mat3::from_quarter_turns_x(turns),
                Mat3::from_rotation_x(angle),
                epsilon = 1e-12
            );
            assert_abs_diff_eq!(
                Mat3::from_quarter_turns_y(turns),
                Mat3::from_rotation_y(angle),
                epsilon = 1e-12
            );
            assert_abs_diff_eq!(
                Mat3::from_quarter_turns_z(turns),
                Mat3::from_rotation_z(angle),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn transpose_inverts_rotation() {
        let m = Mat3::from_rotation_x(0.3) * Mat3::from_rotation_y(-1.1) * Mat3::from_rotation_z(2.0);
        assert_abs_diff_eq!(m * m.transpose(), Mat3::IDENTITY, epsilon = 1e-12);
        assert_abs_diff_eq!(m.transpose() * m, Mat3::IDENTITY, epsilon = 1e-12);
    }
}
