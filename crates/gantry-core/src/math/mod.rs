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

//! Provides the mathematics primitives for moving structures.
//!
//! World coordinates are stored in `f64` so that grid-cell resolution stays exact far
//! from the origin. Discrete cells are addressed with [`BlockPos`].
//!
//! Rotation angles handed to [`RotationState`] are in **degrees**, matching how
//! structures are driven by their controllers. Everything below the rotation state
//! works in radians.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

pub use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f64 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f64 = 180.0 / PI;

// --- Declare Sub-Modules ---

pub mod block_pos;
pub mod direction;
pub mod geometry;
pub mod matrix;
pub mod rotation;
pub mod structure_transform;
pub mod transform;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::block_pos::BlockPos;
pub use self::direction::{Axis, Direction};
pub use self::geometry::Aabb;
pub use self::matrix::Mat3;
pub use self::rotation::RotationState;
pub use self::structure_transform::StructureTransform;
pub use self::transform::SpatialTransform;
pub use self::vector::Vec3;

// --- Utility Functions ---

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use gantry_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
#[inline]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * RAD_TO_DEG
}

/// Performs an approximate equality comparison between two floats with a custom tolerance.
#[inline]
pub fn approx_eq_eps(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    approx_eq_eps(a, b, EPSILON)
}

/// Returns the yaw, in degrees, a structure must face to look along `vec`.
///
/// The result is not wrapped into `[0, 360)`.
///
/// # Examples
///
/// ```
/// use gantry_core::math::{yaw_from_vector, Vec3};
/// assert!((yaw_from_vector(Vec3::new(1.0, 0.0, 0.0)) - 270.0).abs() < 1e-9);
/// ```
pub fn yaw_from_vector(vec: Vec3) -> f64 {
    (3.0 * PI / 2.0 + vec.z.atan2(vec.x)) / PI * 180.0
}

/// Returns the pitch, in degrees, between `vec` and the vertical axis.
///
/// `vec` is expected to be normalized.
pub fn pitch_from_vector(vec: Vec3) -> f64 {
    vec.y.acos() / PI * 180.0
}
