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

//! Provides a Quaternion type for representing 3D rotations.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{EulerAngles, Mat3, Vec3, EPSILON};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Represents a quaternion for efficient 3D rotations.
///
/// A quaternion is stored as `(x, y, z, w)`, where `[x, y, z]` is the
/// "vector" part and `w` is the "scalar" part. It represents a rotation
/// when of unit magnitude; the magnitude is not enforced, so normalize
/// explicitly after operations that may drift (interpolation, accumulated
/// products). The matrix conversion [`Quaternion::from_mat3`] normalizes
/// its own result.
///
/// Unit quaternions double-cover the rotation group: `q` and `-q` encode
/// the same rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from its raw components.
    ///
    /// Note: This does not guarantee a unit quaternion. For creating
    /// rotations, prefer [`Quaternion::from_axis_angle`] or the conversion
    /// constructors.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a quaternion representing a rotation around a given axis by
    /// a given angle: `w = cos(angle/2)`, `xyz = axis * sin(angle/2)`.
    ///
    /// # Arguments
    ///
    /// * `axis`: The axis of rotation. Must already be a unit vector; it is
    ///   not normalized here.
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let half_angle = angle_radians * 0.5;
        let s = half_angle.sin();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half_angle.cos(),
        }
    }

    /// Creates a quaternion from a rotation matrix.
    ///
    /// The matrix rows are normalized first, then the branch is selected
    /// for numerical stability: the trace when it is usefully positive,
    /// otherwise the largest diagonal entry (checked in X, Y, Z priority)
    /// so the divisor `s` stays away from zero. The result is explicitly
    /// renormalized, since row normalization alone does not guarantee a
    /// unit quaternion under floating-point error.
    pub fn from_mat3(m: &Mat3) -> Self {
        let n = m.normalized();

        let trace = n[0][0] + n[1][1] + n[2][2];

        let r = if trace > f32::EPSILON {
            let s = 2.0 * (trace + 1.0).sqrt();
            Self::new(
                (n[2][1] - n[1][2]) / s,
                (n[0][2] - n[2][0]) / s,
                (n[1][0] - n[0][1]) / s,
                0.25 * s,
            )
        } else if n[0][0] > n[1][1] && n[0][0] > n[2][2] {
            let s = 2.0 * (1.0 + n[0][0] - n[1][1] - n[2][2]).sqrt();
            Self::new(
                0.25 * s,
                (n[0][1] + n[1][0]) / s,
                (n[0][2] + n[2][0]) / s,
                (n[2][1] - n[1][2]) / s,
            )
        } else if n[1][1] > n[2][2] {
            let s = 2.0 * (1.0 + n[1][1] - n[0][0] - n[2][2]).sqrt();
            Self::new(
                (n[0][1] + n[1][0]) / s,
                0.25 * s,
                (n[1][2] + n[2][1]) / s,
                (n[0][2] - n[2][0]) / s,
            )
        } else {
            let s = 2.0 * (1.0 + n[2][2] - n[0][0] - n[1][1]).sqrt();
            Self::new(
                (n[0][2] + n[2][0]) / s,
                (n[1][2] + n[2][1]) / s,
                0.25 * s,
                (n[1][0] - n[0][1]) / s,
            )
        };

        r.normalize()
    }

    /// Creates a quaternion from Euler angles, routing through the matrix
    /// representation; there is no direct formula here.
    #[inline]
    pub fn from_euler(e: EulerAngles) -> Self {
        Self::from_mat3(&Mat3::from_euler(e))
    }

    /// Calculates the squared length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Calculates the length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a normalized version of the quaternion with a length of 1.
    /// If the quaternion has a near-zero magnitude, it returns the identity
    /// quaternion.
    pub fn normalize(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > EPSILON {
            let inv_mag = 1.0 / mag_sq.sqrt();
            Self {
                x: self.x * inv_mag,
                y: self.y * inv_mag,
                z: self.z * inv_mag,
                w: self.w * inv_mag,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the conjugate of the quaternion, which negates the vector part.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Computes the inverse of the quaternion.
    /// For a unit quaternion, the inverse is equal to its conjugate.
    #[inline]
    pub fn inverted(&self) -> Self {
        let mag_squared = self.magnitude_squared();
        if mag_squared > EPSILON {
            self.conjugate() * (1.0 / mag_squared)
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the dot product of two quaternions.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// The rotation angle, `2 * acos(w)`, in radians.
    #[inline]
    pub fn angle(&self) -> f32 {
        2.0 * self.w.acos()
    }

    /// The rotation axis direction: the vector part divided by `1 - w^2`.
    /// Not unit length. Near the identity rotation the divisor degenerates
    /// and the zero vector is returned.
    #[inline]
    pub fn axis(&self) -> Vec3 {
        let sin_theta = 1.0 - self.w * self.w;

        if sin_theta.abs() < f32::EPSILON {
            return Vec3::ZERO;
        }

        Vec3::new(self.x / sin_theta, self.y / sin_theta, self.z / sin_theta)
    }

    /// Rotates a 3D vector by this quaternion (which must be of unit
    /// magnitude), using the Hamilton sandwich `q * (0, v) * q̄`.
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let r = *self * Self::new(v.x, v.y, v.z, 0.0) * self.conjugate();
        Vec3::new(r.x, r.y, r.z)
    }

    /// Performs a spherical linear interpolation (slerp) between two
    /// quaternions.
    ///
    /// When the endpoints' dot product is negative, `start` is negated to
    /// take the short path (`q` and `-q` encode the same rotation). When
    /// the endpoints are nearly parallel the spherical weights degenerate,
    /// and plain linear weights `(1 - t)` and `t` are used instead.
    ///
    /// * `t` - The interpolation factor, clamped to the `[0.0, 1.0]` range.
    pub fn slerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mut cos_theta = start.dot(end);
        let mut a = start;

        if cos_theta < 0.0 {
            cos_theta = -cos_theta;
            a = -a;
        }

        let (ra, rb);
        if 1.0 - cos_theta > f32::EPSILON {
            let theta = cos_theta.acos();
            let sin_theta = theta.sin();
            ra = ((1.0 - t) * theta).sin() / sin_theta;
            rb = (t * theta).sin() / sin_theta;
        } else {
            ra = 1.0 - t;
            rb = t;
        }

        a * ra + end * rb
    }
}

// --- Operator Overloads ---

impl Default for Quaternion {
    /// Returns the identity quaternion, representing no rotation.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;
    /// Combines two rotations using the Hamilton product.
    /// Note that quaternion multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl MulAssign<Quaternion> for Quaternion {
    /// Combines this rotation with another.
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;
    /// Rotates a `Vec3` by this quaternion, which must be of unit magnitude.
    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        self.rotate_vec3(rhs)
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Self;
    /// Adds two quaternions component-wise.
    /// Note: This is not a rotation composition.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w + rhs.w,
        }
    }
}

impl Add<f32> for Quaternion {
    type Output = Self;
    /// Adds a scalar to every component.
    #[inline]
    fn add(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x + rhs,
            y: self.y + rhs,
            z: self.z + rhs,
            w: self.w + rhs,
        }
    }
}

impl Sub<Quaternion> for Quaternion {
    type Output = Self;
    /// Subtracts two quaternions component-wise.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            w: self.w - rhs.w,
        }
    }
}

impl Sub<f32> for Quaternion {
    type Output = Self;
    /// Subtracts a scalar from every component.
    #[inline]
    fn sub(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x - rhs,
            y: self.y - rhs,
            z: self.z - rhs,
            w: self.w - rhs,
        }
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    /// Scales all components of the quaternion by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self::Output {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
            w: self.w * scalar,
        }
    }
}

impl Div<f32> for Quaternion {
    type Output = Self;
    /// Divides all components of the quaternion by a scalar.
    #[inline]
    fn div(self, scalar: f32) -> Self::Output {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
            w: self.w / scalar,
        }
    }
}

impl AddAssign<Quaternion> for Quaternion {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign<Quaternion> for Quaternion {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Quaternion {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Neg for Quaternion {
    type Output = Self;
    /// Negates all components of the quaternion. The negation encodes the
    /// same rotation.
    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }
}

impl fmt::Display for Quaternion {
    /// Formats the quaternion as `(w, (x, y, z))`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, ({}, {}, {}))", self.w, self.x, self.y, self.z)
    }
}

// --- Approximate Comparison ---

impl AbsDiffEq for Quaternion {
    type Epsilon = f32;

    #[inline]
    fn default_epsilon() -> f32 {
        EPSILON
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        f32::abs_diff_eq(&self.x, &other.x, epsilon)
            && f32::abs_diff_eq(&self.y, &other.y, epsilon)
            && f32::abs_diff_eq(&self.z, &other.z, epsilon)
            && f32::abs_diff_eq(&self.w, &other.w, epsilon)
    }
}

impl RelativeEq for Quaternion {
    #[inline]
    fn default_max_relative() -> f32 {
        EPSILON
    }

    #[inline]
    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        f32::relative_eq(&self.x, &other.x, epsilon, max_relative)
            && f32::relative_eq(&self.y, &other.y, epsilon, max_relative)
            && f32::relative_eq(&self.z, &other.z, epsilon, max_relative)
            && f32::relative_eq(&self.w, &other.w, epsilon, max_relative)
    }
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EulerOrder, FRAC_PI_2, FRAC_PI_4, PI};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn quat_approx_eq(q1: Quaternion, q2: Quaternion) -> bool {
        // Compare up to the double-cover ambiguity.
        let dot = q1.dot(q2).abs();
        approx::relative_eq!(dot, 1.0, epsilon = EPSILON * 10.0)
    }

    #[test]
    fn test_identity_and_default() {
        let q = Quaternion::IDENTITY;
        assert_eq!(q, Quaternion::default());
        assert_relative_eq!(q.x, 0.0);
        assert_relative_eq!(q.y, 0.0);
        assert_relative_eq!(q.z, 0.0);
        assert_relative_eq!(q.w, 1.0);
        assert_relative_eq!(q.magnitude(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_from_axis_angle() {
        let q = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);

        let half_angle = FRAC_PI_2 * 0.5;
        assert_relative_eq!(q.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(q.y, half_angle.sin(), epsilon = EPSILON);
        assert_relative_eq!(q.z, 0.0, epsilon = EPSILON);
        assert_relative_eq!(q.w, half_angle.cos(), epsilon = EPSILON);
        assert_relative_eq!(q.magnitude(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_from_mat3_identity() {
        let q = Quaternion::from_mat3(&Mat3::IDENTITY);
        assert!(quat_approx_eq(q, Quaternion::IDENTITY));
    }

    #[test]
    fn test_from_mat3_simple_rotations() {
        let angle = FRAC_PI_4;

        let qx = Quaternion::from_mat3(&Mat3::from_rotation_x(angle));
        assert!(quat_approx_eq(
            qx,
            Quaternion::from_axis_angle(Vec3::X, angle)
        ));

        let qy = Quaternion::from_mat3(&Mat3::from_rotation_y(angle));
        assert!(quat_approx_eq(
            qy,
            Quaternion::from_axis_angle(Vec3::Y, angle)
        ));

        let qz = Quaternion::from_mat3(&Mat3::from_rotation_z(angle));
        assert!(quat_approx_eq(
            qz,
            Quaternion::from_axis_angle(Vec3::Z, angle)
        ));
    }

    #[test]
    fn test_from_mat3_half_turns() {
        // Trace is -1 for 180-degree rotations, exercising the
        // largest-diagonal branches.
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let expected = Quaternion::from_axis_angle(axis, PI);
            let q = Quaternion::from_mat3(&Mat3::from_quaternion(expected));
            assert!(quat_approx_eq(q, expected));
        }
    }

    #[test]
    fn test_matrix_roundtrip() {
        let axis = Vec3::new(-1.0, 2.5, 0.7).normalize();
        let angle = 1.85;

        let q = Quaternion::from_axis_angle(axis, angle);
        let back = Quaternion::from_mat3(&Mat3::from_quaternion(q));

        // Equal up to sign: q and -q encode the same rotation.
        assert!(quat_approx_eq(q, back));
        assert_relative_eq!(back.magnitude(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_agreement() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, -2.0, 3.0).normalize(), PI / 7.0);
        let m = Mat3::from_quaternion(q);

        let v = Vec3::new(0.5, 1.0, -0.2);
        assert_abs_diff_eq!(q * v, m * v, epsilon = EPSILON * 10.0);
    }

    #[test]
    fn test_from_euler() {
        let e = EulerAngles::new(0.3, -0.4, 0.9, EulerOrder::XYZ);
        let q = Quaternion::from_euler(e);
        let m = Mat3::from_euler(e);

        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_abs_diff_eq!(q * v, m * v, epsilon = EPSILON * 100.0);
    }

    #[test]
    fn test_conjugate_and_inverse_unit() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 2.0, 3.0).normalize(), 0.75);
        let q_conj = q.conjugate();
        let q_inv = q.inverted();

        // For a unit quaternion the inverse equals the conjugate.
        assert_abs_diff_eq!(q_conj, q_inv, epsilon = EPSILON);
        assert_relative_eq!(q_conj.x, -q.x, epsilon = EPSILON);
        assert_relative_eq!(q_conj.w, q.w, epsilon = EPSILON);
    }

    #[test]
    fn test_multiplication_identity() {
        let q = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert_abs_diff_eq!(q * Quaternion::IDENTITY, q, epsilon = EPSILON);
        assert_abs_diff_eq!(Quaternion::IDENTITY * q, q, epsilon = EPSILON);
    }

    #[test]
    fn test_multiplication_composition() {
        let rot_y = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let rot_x = Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2);
        let combined = rot_x * rot_y; // Y then X

        let v_start = Vec3::Z;
        let v_stepwise = rot_x * (rot_y * v_start);
        let v_combined = combined * v_start;

        assert_abs_diff_eq!(v_stepwise, Vec3::X, epsilon = EPSILON);
        assert_abs_diff_eq!(v_combined, v_stepwise, epsilon = EPSILON);
    }

    #[test]
    fn test_multiplication_inverse() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, -2.0, 0.5).normalize(), 1.2);
        assert_abs_diff_eq!(q * q.inverted(), Quaternion::IDENTITY, epsilon = EPSILON);
        assert_abs_diff_eq!(q.inverted() * q, Quaternion::IDENTITY, epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_vec3_convention() {
        // Fixed handedness convention: rotating +X a quarter turn about +Y
        // yields -Z.
        let q = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);

        let v_method = q.rotate_vec3(Vec3::X);
        let v_operator = q * Vec3::X;
        let expected = Vec3::new(0.0, 0.0, -1.0);

        assert_abs_diff_eq!(v_method, expected, epsilon = EPSILON);
        assert_abs_diff_eq!(v_operator, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_normalization() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let n = q.normalize();
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_normalize_zero_quaternion() {
        let q_zero = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(q_zero.normalize(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_dot_product() {
        let angle = 0.5;
        let q1 = Quaternion::from_axis_angle(Vec3::X, angle);
        let q2 = Quaternion::from_axis_angle(Vec3::X, -angle);

        assert_relative_eq!(q1.dot(q1), 1.0, epsilon = EPSILON);
        assert_relative_eq!(q1.dot(q2), angle.cos(), epsilon = EPSILON);
    }

    #[test]
    fn test_angle_axis_extraction() {
        let q = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert_relative_eq!(q.angle(), FRAC_PI_2, epsilon = EPSILON * 10.0);
        assert_abs_diff_eq!(q.axis().normalize(), Vec3::Y, epsilon = EPSILON);

        // Near the identity the axis denominator degenerates to zero.
        assert_eq!(Quaternion::IDENTITY.axis(), Vec3::ZERO);
    }

    #[test]
    fn test_slerp_endpoints() {
        let q_start = Quaternion::IDENTITY;
        let q_end = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);

        assert_abs_diff_eq!(
            Quaternion::slerp(q_start, q_end, 0.0),
            q_start,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Quaternion::slerp(q_start, q_end, 1.0),
            q_end,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_slerp_midpoint() {
        let q_start = Quaternion::IDENTITY;
        let q_end = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let q_half = Quaternion::slerp(q_start, q_end, 0.5);
        let expected = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2 * 0.5);

        assert_abs_diff_eq!(q_half, expected, epsilon = EPSILON);
        assert_relative_eq!(q_half.magnitude(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_slerp_constant_endpoint() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.8);
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_abs_diff_eq!(Quaternion::slerp(q, q, t), q, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_slerp_short_path_handling() {
        let q_start = Quaternion::from_axis_angle(Vec3::Y, -30.0f32.to_radians());
        let q_end = Quaternion::from_axis_angle(Vec3::Y, 170.0f32.to_radians());
        assert!(q_start.dot(q_end) < 0.0);

        let q_mid = Quaternion::slerp(q_start, q_end, 0.5);
        // Midpoint on the shortest path between -30 and 170 degrees, going
        // backwards through -110.
        let expected = Quaternion::from_axis_angle(Vec3::Y, -110.0f32.to_radians());
        assert!(quat_approx_eq(q_mid.normalize(), expected));

        let v = Vec3::X;
        assert_abs_diff_eq!(
            q_mid.normalize() * v,
            expected * v,
            epsilon = EPSILON * 10.0
        );
    }

    #[test]
    fn test_slerp_near_identical_quaternions() {
        let q1 = Quaternion::from_axis_angle(Vec3::Y, 1e-5);
        let q2 = Quaternion::from_axis_angle(Vec3::Y, 2e-5);

        // The near-parallel fallback interpolates linearly.
        let q_mid = Quaternion::slerp(q1, q2, 0.5);
        assert_relative_eq!(q_mid.magnitude(), 1.0, epsilon = EPSILON * 10.0);

        let v_rotated = q_mid.normalize() * Vec3::X;
        assert_abs_diff_eq!(v_rotated, Vec3::X, epsilon = EPSILON * 10.0);
    }

    #[test]
    fn test_slerp_clamps_t() {
        let q_start = Quaternion::IDENTITY;
        let q_end = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);

        assert_abs_diff_eq!(
            Quaternion::slerp(q_start, q_end, -0.5),
            q_start,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Quaternion::slerp(q_start, q_end, 1.5),
            q_end,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_scalar_ops() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q * 2.0, Quaternion::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(q / 2.0, Quaternion::new(0.5, 1.0, 1.5, 2.0));
        assert_eq!(q + 1.0, Quaternion::new(2.0, 3.0, 4.0, 5.0));
        assert_eq!(q - 1.0, Quaternion::new(0.0, 1.0, 2.0, 3.0));
        assert_eq!(-q, Quaternion::new(-1.0, -2.0, -3.0, -4.0));

        let sum = q + Quaternion::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(sum, Quaternion::new(2.0, 3.0, 4.0, 5.0));
        let diff = q - Quaternion::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(diff, Quaternion::new(0.0, 1.0, 2.0, 3.0));
    }

    #[test]
    fn test_display() {
        let q = Quaternion::new(0.0, 1.0, 0.0, 0.5);
        assert_eq!(format!("{}", q), "(0.5, (0, 1, 0))");
    }
}
