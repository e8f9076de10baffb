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

//! Defines the `Mat2`, `Mat3`, and `Mat4` types and associated operations.
//!
//! Matrices are **row-major** (`m[row][col]`) and multiply column vectors in
//! algebraically correct order: `M * v`. Matrix stacks compose first-on,
//! last-off: `(Z * Y * X) * v == Z * (Y * (X * v))`.
//!
//! Inversion of a matrix whose determinant (or pivot, for `Mat4`) falls
//! within machine epsilon of zero silently yields the identity matrix; the
//! `checked_inverted` variants return `None` instead for callers that need
//! to detect singularity.

use approx::{AbsDiffEq, RelativeEq};
use log::trace;

use super::{EulerAngles, EulerOrder, Quaternion, Vec2, Vec3, Vec4, EPSILON, SQRT_2};
use std::fmt;
use std::ops::{Div, DivAssign, Index, IndexMut, Mul, MulAssign};

// --- Mat2 ---

/// A 2x2 row-major matrix for 2D linear transforms (scale, rotation).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat2 {
    /// The rows of the matrix. `rows[0]` is the first row, and so on.
    pub rows: [Vec2; 2],
}

impl Mat2 {
    /// The 2x2 identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [Vec2::X, Vec2::Y],
    };

    /// A 2x2 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        rows: [Vec2::ZERO; 2],
    };

    /// Creates a new matrix from two row vectors.
    #[inline]
    pub fn from_rows(r0: Vec2, r1: Vec2) -> Self {
        Self { rows: [r0, r1] }
    }

    /// Creates a 2D scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec2) -> Self {
        Self::from_rows(Vec2::new(scale.x, 0.0), Vec2::new(0.0, scale.y))
    }

    /// Creates a 2D rotation matrix.
    ///
    /// # Arguments
    ///
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(Vec2::new(c, -s), Vec2::new(s, c))
    }

    /// Creates a scale-rotation composite whose rows are the rotation rows
    /// scaled per axis, so [`Mat2::scale_component`] and
    /// [`Mat2::rotation_component`] recover the factors exactly.
    #[inline]
    pub fn from_scale_rotation(scale: Vec2, angle_radians: f32) -> Self {
        Self::from_scale(scale) * Self::from_rotation(angle_radians)
    }

    /// Creates a `Mat2` from the upper-left 2x2 corner of a [`Mat3`].
    #[inline]
    pub fn from_mat3(m: &Mat3) -> Self {
        Self::from_rows(m.rows[0].truncate(), m.rows[1].truncate())
    }

    /// Creates a `Mat2` from the upper-left 2x2 corner of a [`Mat4`].
    #[inline]
    pub fn from_mat4(m: &Mat4) -> Self {
        Self::from_rows(
            Vec2::new(m.rows[0].x, m.rows[0].y),
            Vec2::new(m.rows[1].x, m.rows[1].y),
        )
    }

    /// Returns a row of the matrix.
    #[inline]
    pub fn row(&self, index: usize) -> Vec2 {
        self.rows[index]
    }

    /// Returns a column of the matrix.
    #[inline]
    pub fn col(&self, index: usize) -> Vec2 {
        Vec2::new(self.rows[0][index], self.rows[1][index])
    }

    /// The first row, the image of the local X-axis under the transform.
    #[inline]
    pub fn x_axis(&self) -> Vec2 {
        self.rows[0]
    }

    /// The second row, the image of the local Y-axis under the transform.
    #[inline]
    pub fn y_axis(&self) -> Vec2 {
        self.rows[1]
    }

    /// Computes the determinant of the matrix.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.rows[0].x * self.rows[1].y - self.rows[1].x * self.rows[0].y
    }

    /// Computes the adjugate (transposed cofactor) matrix.
    #[inline]
    pub fn adjugate(&self) -> Self {
        Self::from_rows(
            Vec2::new(self.rows[1].y, -self.rows[0].y),
            Vec2::new(-self.rows[1].x, self.rows[0].x),
        )
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self::from_rows(self.col(0), self.col(1))
    }

    /// Computes the inverse of the matrix.
    ///
    /// If the determinant is within machine epsilon of zero the matrix is
    /// uninvertible and the identity matrix is returned instead. Use
    /// [`Mat2::checked_inverted`] to detect that case.
    pub fn inverted(&self) -> Self {
        self.checked_inverted().unwrap_or_else(|| {
            trace!("inverting a singular Mat2; substituting identity");
            Self::IDENTITY
        })
    }

    /// Computes the inverse of the matrix, or `None` if the determinant is
    /// within machine epsilon of zero.
    pub fn checked_inverted(&self) -> Option<Self> {
        let d = self.determinant();
        if d.abs() < f32::EPSILON {
            return None;
        }
        Some(self.adjugate() / d)
    }

    /// Returns a copy with each row normalized to unit length.
    ///
    /// Rows are normalized independently; they are not made mutually
    /// orthogonal. Valid as a rotation only when the input is already
    /// orthogonal up to scale.
    #[inline]
    pub fn normalized(&self) -> Self {
        Self::from_rows(self.rows[0].normalize(), self.rows[1].normalize())
    }

    /// The per-axis scale factors: the length of each row.
    #[inline]
    pub fn scale_component(&self) -> Vec2 {
        Vec2::new(self.x_axis().length(), self.y_axis().length())
    }

    /// The rotation part of a scale-rotation composite.
    #[inline]
    pub fn rotation_component(&self) -> Self {
        self.normalized()
    }
}

// --- Operator Overloads ---

impl Default for Mat2 {
    /// Returns the 2x2 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat2> for Mat2 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat2`.
    #[inline]
    fn mul(self, rhs: Mat2) -> Self::Output {
        Self::from_rows(
            Vec2::new(self.rows[0].dot(rhs.col(0)), self.rows[0].dot(rhs.col(1))),
            Vec2::new(self.rows[1].dot(rhs.col(0)), self.rows[1].dot(rhs.col(1))),
        )
    }
}

impl Mul<Vec2> for Mat2 {
    type Output = Vec2;
    /// Transforms a `Vec2` by this matrix.
    #[inline]
    fn mul(self, v: Vec2) -> Self::Output {
        Vec2::new(self.rows[0].dot(v), self.rows[1].dot(v))
    }
}

impl Mul<f32> for Mat2 {
    type Output = Self;
    /// Scales every element of the matrix.
    #[inline]
    fn mul(self, b: f32) -> Self::Output {
        Self::from_rows(self.rows[0] * b, self.rows[1] * b)
    }
}

impl Div<f32> for Mat2 {
    type Output = Self;
    /// Divides every element of the matrix by a scalar.
    #[inline]
    fn div(self, b: f32) -> Self::Output {
        Self::from_rows(self.rows[0] / b, self.rows[1] / b)
    }
}

impl MulAssign<Mat2> for Mat2 {
    #[inline]
    fn mul_assign(&mut self, rhs: Mat2) {
        *self = *self * rhs;
    }
}

impl MulAssign<f32> for Mat2 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Mat2 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Index<usize> for Mat2 {
    type Output = Vec2;
    /// Allows accessing a matrix row by index.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl IndexMut<usize> for Mat2 {
    /// Allows mutably accessing a matrix row by index.
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.rows[index]
    }
}

impl fmt::Display for Mat2 {
    /// Formats the matrix with one bracketed row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ {}, {} ]", self.rows[0].x, self.rows[0].y)?;
        write!(f, "[ {}, {} ]", self.rows[1].x, self.rows[1].y)
    }
}

// --- Mat3 ---

/// A 3x3 row-major matrix: the canonical rotation representation.
///
/// Both [`EulerAngles`] and [`Quaternion`] convert to and from `Mat3`; it is
/// also the upper-left rotation/scale block of a [`Mat4`]. No structural
/// invariant is enforced; a `Mat3` only carries rotation semantics when it
/// was constructed as one or recovered via [`Mat3::rotation_component`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// The rows of the matrix. `rows[0]` is the first row, and so on.
    pub rows: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// A 3x3 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        rows: [Vec3::ZERO; 3],
    };

    /// Creates a new matrix from three row vectors.
    #[inline]
    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self { rows: [r0, r1, r2] }
    }

    /// Creates a 3D scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_rows(
            Vec3::new(scale.x, 0.0, 0.0),
            Vec3::new(0.0, scale.y, 0.0),
            Vec3::new(0.0, 0.0, scale.z),
        )
    }

    /// Creates a matrix for a rotation around the X-axis.
    ///
    /// # Arguments
    ///
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_x(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, c, -s),
            Vec3::new(0.0, s, c),
        )
    }

    /// Creates a matrix for a right-handed rotation around the Y-axis.
    ///
    /// # Arguments
    ///
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_y(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(
            Vec3::new(c, 0.0, s),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-s, 0.0, c),
        )
    }

    /// Creates a matrix for a rotation around the Z-axis.
    ///
    /// # Arguments
    ///
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_z(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(
            Vec3::new(c, -s, 0.0),
            Vec3::new(s, c, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Creates a rotation matrix from Euler angles.
    ///
    /// Elementary axis rotations are built only for angles whose magnitude
    /// exceeds machine epsilon (the rest stay identity) and are composed in
    /// the order dictated by the angles' [`EulerOrder`] tag: for `XYZ` the
    /// product is `Z * Y * X`, applying the X rotation first.
    pub fn from_euler(e: EulerAngles) -> Self {
        let x = if e.x.abs() > f32::EPSILON {
            Self::from_rotation_x(e.x)
        } else {
            Self::IDENTITY
        };
        let y = if e.y.abs() > f32::EPSILON {
            Self::from_rotation_y(e.y)
        } else {
            Self::IDENTITY
        };
        let z = if e.z.abs() > f32::EPSILON {
            Self::from_rotation_z(e.z)
        } else {
            Self::IDENTITY
        };

        match e.order {
            EulerOrder::XYZ => z * y * x,
            EulerOrder::XZY => y * z * x,
            EulerOrder::YXZ => z * x * y,
            EulerOrder::YZX => x * z * y,
            EulerOrder::ZXY => y * x * z,
            EulerOrder::ZYX => x * y * z,
        }
    }

    /// Creates a rotation matrix from a quaternion.
    ///
    /// The quaternion must be of unit magnitude. The components are
    /// pre-scaled by `sqrt(2)` so their pairwise products carry the factor
    /// of two the standard formula needs.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let w = SQRT_2 * q.w;
        let x = SQRT_2 * q.x;
        let y = SQRT_2 * q.y;
        let z = SQRT_2 * q.z;

        let wx = w * x; // 2 * w * x
        let wy = w * y; // etc...
        let wz = w * z;
        let xx = x * x;
        let xy = x * y;
        let xz = x * z;
        let yy = y * y;
        let yz = y * z;
        let zz = z * z;

        Self::from_rows(
            Vec3::new(1.0 - yy - zz, xy - wz, xz + wy),
            Vec3::new(xy + wz, 1.0 - xx - zz, yz - wx),
            Vec3::new(xz - wy, yz + wx, 1.0 - xx - yy),
        )
    }

    /// Creates a scale-rotation composite whose rows are the rotation rows
    /// scaled per axis, so [`Mat3::scale_component`] and
    /// [`Mat3::rotation_component`] recover the factors exactly.
    #[inline]
    pub fn from_scale_euler(scale: Vec3, rotation: EulerAngles) -> Self {
        Self::from_scale(scale) * Self::from_euler(rotation)
    }

    /// Creates a scale-rotation composite from a quaternion rotation.
    /// See [`Mat3::from_scale_euler`].
    #[inline]
    pub fn from_scale_quaternion(scale: Vec3, rotation: Quaternion) -> Self {
        Self::from_scale(scale) * Self::from_quaternion(rotation)
    }

    /// Embeds a [`Mat2`] in the upper-left corner, with 1 in the lower-right.
    #[inline]
    pub fn from_mat2(m: &Mat2) -> Self {
        Self::from_rows(
            Vec3::from_vec2(m.rows[0], 0.0),
            Vec3::from_vec2(m.rows[1], 0.0),
            Vec3::Z,
        )
    }

    /// Creates a `Mat3` from the upper-left 3x3 corner of a [`Mat4`].
    /// This extracts the rotation and scale block, discarding translation.
    #[inline]
    pub fn from_mat4(m: &Mat4) -> Self {
        Self::from_rows(
            m.rows[0].truncate(),
            m.rows[1].truncate(),
            m.rows[2].truncate(),
        )
    }

    /// Returns a row of the matrix.
    #[inline]
    pub fn row(&self, index: usize) -> Vec3 {
        self.rows[index]
    }

    /// Returns a column of the matrix.
    #[inline]
    pub fn col(&self, index: usize) -> Vec3 {
        Vec3::new(
            self.rows[0][index],
            self.rows[1][index],
            self.rows[2][index],
        )
    }

    /// The first row, the image of the local X-axis under the transform.
    #[inline]
    pub fn x_axis(&self) -> Vec3 {
        self.rows[0]
    }

    /// The second row, the image of the local Y-axis under the transform.
    #[inline]
    pub fn y_axis(&self) -> Vec3 {
        self.rows[1]
    }

    /// The third row, the image of the local Z-axis under the transform.
    #[inline]
    pub fn z_axis(&self) -> Vec3 {
        self.rows[2]
    }

    /// Computes the determinant of the matrix by cofactor expansion along
    /// the first row.
    #[inline]
    pub fn determinant(&self) -> f32 {
        let r0 = self.rows[0];
        let r1 = self.rows[1];
        let r2 = self.rows[2];
        r0.x * (r1.y * r2.z - r2.y * r1.z) - r0.y * (r1.x * r2.z - r2.x * r1.z)
            + r0.z * (r1.x * r2.y - r2.x * r1.y)
    }

    /// Computes the adjugate (transposed cofactor) matrix, used with the
    /// determinant for inversion.
    pub fn adjugate(&self) -> Self {
        let r0 = self.rows[0];
        let r1 = self.rows[1];
        let r2 = self.rows[2];

        Self::from_rows(
            Vec3::new(
                r1.y * r2.z - r2.y * r1.z,
                -(r0.y * r2.z - r2.y * r0.z),
                r0.y * r1.z - r1.y * r0.z,
            ),
            Vec3::new(
                -(r1.x * r2.z - r2.x * r1.z),
                r0.x * r2.z - r2.x * r0.z,
                -(r0.x * r1.z - r1.x * r0.z),
            ),
            Vec3::new(
                r1.x * r2.y - r2.x * r1.y,
                -(r0.x * r2.y - r2.x * r0.y),
                r0.x * r1.y - r1.x * r0.y,
            ),
        )
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self::from_rows(self.col(0), self.col(1), self.col(2))
    }

    /// Computes the inverse of the matrix as `adjugate / determinant`.
    ///
    /// If the determinant is within machine epsilon of zero the matrix is
    /// uninvertible and the identity matrix is returned instead. Use
    /// [`Mat3::checked_inverted`] to detect that case.
    pub fn inverted(&self) -> Self {
        self.checked_inverted().unwrap_or_else(|| {
            trace!("inverting a singular Mat3; substituting identity");
            Self::IDENTITY
        })
    }

    /// Computes the inverse of the matrix, or `None` if the determinant is
    /// within machine epsilon of zero.
    pub fn checked_inverted(&self) -> Option<Self> {
        let d = self.determinant();
        if d.abs() < f32::EPSILON {
            return None;
        }
        Some(self.adjugate() / d)
    }

    /// Returns a copy with each row normalized to unit length.
    ///
    /// Rows are normalized independently; they are not made mutually
    /// orthogonal. Valid as a rotation only when the input is already
    /// orthogonal up to scale.
    #[inline]
    pub fn normalized(&self) -> Self {
        Self::from_rows(
            self.x_axis().normalize(),
            self.y_axis().normalize(),
            self.z_axis().normalize(),
        )
    }

    /// The per-axis scale factors: the length of each row.
    #[inline]
    pub fn scale_component(&self) -> Vec3 {
        Vec3::new(
            self.x_axis().length(),
            self.y_axis().length(),
            self.z_axis().length(),
        )
    }

    /// The rotation part of a scale-rotation composite.
    ///
    /// Rows are normalized; if the basis has negative handedness (mirrored
    /// by a negative scale), all three rows are negated so the result is a
    /// proper, positive-handed rotation.
    pub fn rotation_component(&self) -> Self {
        let n = self.normalized();

        if self.is_negative() {
            Self::from_rows(-n.x_axis(), -n.y_axis(), -n.z_axis())
        } else {
            n
        }
    }

    /// Whether the rows form a left-handed basis, tested via the sign of
    /// their scalar triple product.
    fn is_negative(&self) -> bool {
        let z = self.x_axis().cross(self.y_axis());
        z.dot(self.z_axis()) < 0.0
    }
}

// --- Operator Overloads ---

impl Default for Mat3 {
    /// Returns the 3x3 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat3`.
    #[inline]
    fn mul(self, rhs: Mat3) -> Self::Output {
        let c0 = rhs.col(0);
        let c1 = rhs.col(1);
        let c2 = rhs.col(2);
        Self::from_rows(
            Vec3::new(
                self.rows[0].dot(c0),
                self.rows[0].dot(c1),
                self.rows[0].dot(c2),
            ),
            Vec3::new(
                self.rows[1].dot(c0),
                self.rows[1].dot(c1),
                self.rows[1].dot(c2),
            ),
            Vec3::new(
                self.rows[2].dot(c0),
                self.rows[2].dot(c1),
                self.rows[2].dot(c2),
            ),
        )
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    /// Transforms a `Vec3` by this matrix.
    #[inline]
    fn mul(self, v: Vec3) -> Self::Output {
        Vec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }
}

impl Mul<f32> for Mat3 {
    type Output = Self;
    /// Scales every element of the matrix.
    #[inline]
    fn mul(self, b: f32) -> Self::Output {
        Self::from_rows(self.rows[0] * b, self.rows[1] * b, self.rows[2] * b)
    }
}

impl Div<f32> for Mat3 {
    type Output = Self;
    /// Divides every element of the matrix by a scalar.
    #[inline]
    fn div(self, b: f32) -> Self::Output {
        Self::from_rows(self.rows[0] / b, self.rows[1] / b, self.rows[2] / b)
    }
}

impl MulAssign<Mat3> for Mat3 {
    #[inline]
    fn mul_assign(&mut self, rhs: Mat3) {
        *self = *self * rhs;
    }
}

impl MulAssign<f32> for Mat3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Mat3 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Index<usize> for Mat3 {
    type Output = Vec3;
    /// Allows accessing a matrix row by index.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl IndexMut<usize> for Mat3 {
    /// Allows mutably accessing a matrix row by index.
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.rows[index]
    }
}

impl fmt::Display for Mat3 {
    /// Formats the matrix with one bracketed row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[ {}, {}, {} ]", r.x, r.y, r.z)?;
        }
        Ok(())
    }
}

// --- Mat4 ---

/// A 4x4 row-major matrix for 3D affine transforms via homogeneous
/// coordinates.
///
/// Composes a rotation/scale block (upper-left 3x3) with a translation
/// (fourth column). The decomposition accessors
/// ([`Mat4::scale_component`], [`Mat4::rotation_component`],
/// [`Mat4::translation_component`]) recover the factors from matrices built
/// by the composite constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The rows of the matrix. `rows[0]` is the first row, and so on.
    pub rows: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        rows: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four row vectors.
    #[inline]
    pub fn from_rows(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Self {
            rows: [r0, r1, r2, r3],
        }
    }

    /// Creates a translation matrix.
    ///
    /// # Arguments
    ///
    /// * `v`: The translation vector to apply.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_rows(
            Vec4::new(1.0, 0.0, 0.0, v.x),
            Vec4::new(0.0, 1.0, 0.0, v.y),
            Vec4::new(0.0, 0.0, 1.0, v.z),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_mat3(&Mat3::from_scale(scale))
    }

    /// Creates a combined scale-then-translate matrix.
    #[inline]
    pub fn from_scale_translation(scale: Vec3, translation: Vec3) -> Self {
        Self::from_translation(translation) * Self::from_scale(scale)
    }

    /// Creates a rotation matrix from Euler angles. See [`Mat3::from_euler`].
    #[inline]
    pub fn from_euler(e: EulerAngles) -> Self {
        Self::from_mat3(&Mat3::from_euler(e))
    }

    /// Creates a rotation matrix from a unit quaternion.
    /// See [`Mat3::from_quaternion`].
    #[inline]
    pub fn from_quaternion(q: Quaternion) -> Self {
        Self::from_mat3(&Mat3::from_quaternion(q))
    }

    /// Creates the full scale/rotation/translation composite with an Euler
    /// rotation. The upper-left block is the scale-rotation composite of
    /// [`Mat3::from_scale_euler`]; the fourth column is the translation.
    #[inline]
    pub fn from_scale_euler_translation(
        scale: Vec3,
        rotation: EulerAngles,
        translation: Vec3,
    ) -> Self {
        Self::from_translation(translation)
            * Self::from_mat3(&Mat3::from_scale_euler(scale, rotation))
    }

    /// Creates the full scale/rotation/translation composite with a
    /// quaternion rotation. See [`Mat4::from_scale_euler_translation`].
    #[inline]
    pub fn from_scale_quaternion_translation(
        scale: Vec3,
        rotation: Quaternion,
        translation: Vec3,
    ) -> Self {
        Self::from_translation(translation)
            * Self::from_mat3(&Mat3::from_scale_quaternion(scale, rotation))
    }

    /// Embeds a [`Mat2`] in the upper-left corner, identity elsewhere.
    #[inline]
    pub fn from_mat2(m: &Mat2) -> Self {
        Self::from_rows(
            Vec4::new(m.rows[0].x, m.rows[0].y, 0.0, 0.0),
            Vec4::new(m.rows[1].x, m.rows[1].y, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// Embeds a [`Mat3`] in the upper-left corner, with no translation.
    #[inline]
    pub fn from_mat3(m: &Mat3) -> Self {
        Self::from_rows(
            Vec4::from_vec3(m.rows[0], 0.0),
            Vec4::from_vec3(m.rows[1], 0.0),
            Vec4::from_vec3(m.rows[2], 0.0),
            Vec4::W,
        )
    }

    /// Returns a row of the matrix.
    #[inline]
    pub fn row(&self, index: usize) -> Vec4 {
        self.rows[index]
    }

    /// Returns a column of the matrix.
    #[inline]
    pub fn col(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.rows[0][index],
            self.rows[1][index],
            self.rows[2][index],
            self.rows[3][index],
        )
    }

    /// The `xyz` part of the first row, the image of the local X-axis.
    #[inline]
    pub fn x_axis(&self) -> Vec3 {
        self.rows[0].truncate()
    }

    /// The `xyz` part of the second row, the image of the local Y-axis.
    #[inline]
    pub fn y_axis(&self) -> Vec3 {
        self.rows[1].truncate()
    }

    /// The `xyz` part of the third row, the image of the local Z-axis.
    #[inline]
    pub fn z_axis(&self) -> Vec3 {
        self.rows[2].truncate()
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self::from_rows(self.col(0), self.col(1), self.col(2), self.col(3))
    }

    /// Computes the determinant by cofactor expansion along the first row
    /// into four 3x3 determinants.
    pub fn determinant(&self) -> f32 {
        let m = self.to_array();
        m[0][0] * minor(&m, 0, 0) - m[0][1] * minor(&m, 0, 1) + m[0][2] * minor(&m, 0, 2)
            - m[0][3] * minor(&m, 0, 3)
    }

    /// Computes the adjugate (transposed cofactor) matrix from sixteen 3x3
    /// minor determinants.
    pub fn adjugate(&self) -> Self {
        let m = self.to_array();
        let mut a = [[0.0f32; 4]; 4];
        for (r, row) in a.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                // The adjugate is the transposed cofactor matrix.
                let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
                *value = sign * minor(&m, c, r);
            }
        }
        Self::from_array(a)
    }

    /// Computes the inverse by Gauss-Jordan elimination with partial
    /// pivoting, applied simultaneously to an identity accumulator. Cheaper
    /// than adjugate-based inversion, which needs sixteen 3x3 determinants.
    ///
    /// If any pivot column's maximum absolute value falls within machine
    /// epsilon of zero the matrix is uninvertible and the identity matrix
    /// is returned instead. Use [`Mat4::checked_inverted`] to detect that
    /// case.
    pub fn inverted(&self) -> Self {
        self.checked_inverted().unwrap_or_else(|| {
            trace!("inverting a singular Mat4; substituting identity");
            Self::IDENTITY
        })
    }

    /// Computes the inverse of the matrix, or `None` if a pivot degenerates.
    pub fn checked_inverted(&self) -> Option<Self> {
        let mut t = self.to_array();
        let mut r = Self::IDENTITY.to_array();

        // Each iteration shrinks the active block by one row and column.
        for pivot in 0..4 {
            let mut max = t[pivot][pivot].abs();
            let mut max_row = pivot;
            for row in (pivot + 1)..4 {
                if t[row][pivot].abs() > max {
                    max = t[row][pivot].abs();
                    max_row = row;
                }
            }

            if max < f32::EPSILON {
                return None;
            }

            if max_row != pivot {
                t.swap(max_row, pivot);
                r.swap(max_row, pivot);
            }

            let lead = t[pivot][pivot];
            for index in 0..4 {
                t[pivot][index] /= lead;
                r[pivot][index] /= lead;
            }

            for row in 0..4 {
                if row != pivot {
                    let value = t[row][pivot];
                    for index in 0..4 {
                        t[row][index] -= t[pivot][index] * value;
                        r[row][index] -= r[pivot][index] * value;
                    }
                }
            }
        }

        Some(Self::from_array(r))
    }

    /// Returns a copy with the `xyz` part of each of the first three rows
    /// normalized to unit length; each row's fourth element is divided by
    /// the same length, and the fourth row's `w` is forced to 1.
    pub fn normalized(&self) -> Self {
        let mut rows = [Vec4::ZERO; 4];
        for (i, row) in self.rows.iter().take(3).enumerate() {
            let l = row.length();
            rows[i] = if l > EPSILON {
                Vec4::new(row.x / l, row.y / l, row.z / l, row.w / l)
            } else {
                *row
            };
        }
        rows[3] = Vec4::new(self.rows[3].x, self.rows[3].y, self.rows[3].z, 1.0);
        Self { rows }
    }

    /// The per-axis scale factors: the length of each axis row.
    #[inline]
    pub fn scale_component(&self) -> Vec3 {
        Vec3::new(
            self.x_axis().length(),
            self.y_axis().length(),
            self.z_axis().length(),
        )
    }

    /// The rotation part of the upper-left 3x3 block.
    /// See [`Mat3::rotation_component`].
    #[inline]
    pub fn rotation_component(&self) -> Mat3 {
        Mat3::from_mat4(self).rotation_component()
    }

    /// The translation: the `xyz` part of the fourth column.
    #[inline]
    pub fn translation_component(&self) -> Vec3 {
        Vec3::new(self.rows[0].w, self.rows[1].w, self.rows[2].w)
    }

    #[inline]
    fn to_array(&self) -> [[f32; 4]; 4] {
        [
            [self.rows[0].x, self.rows[0].y, self.rows[0].z, self.rows[0].w],
            [self.rows[1].x, self.rows[1].y, self.rows[1].z, self.rows[1].w],
            [self.rows[2].x, self.rows[2].y, self.rows[2].z, self.rows[2].w],
            [self.rows[3].x, self.rows[3].y, self.rows[3].z, self.rows[3].w],
        ]
    }

    #[inline]
    fn from_array(m: [[f32; 4]; 4]) -> Self {
        Self::from_rows(
            Vec4::new(m[0][0], m[0][1], m[0][2], m[0][3]),
            Vec4::new(m[1][0], m[1][1], m[1][2], m[1][3]),
            Vec4::new(m[2][0], m[2][1], m[2][2], m[2][3]),
            Vec4::new(m[3][0], m[3][1], m[3][2], m[3][3]),
        )
    }
}

/// The determinant of the 3x3 submatrix left after deleting `skip_row` and
/// `skip_col`.
fn minor(m: &[[f32; 4]; 4], skip_row: usize, skip_col: usize) -> f32 {
    let mut sub = [[0.0f32; 3]; 3];
    let mut si = 0;
    for r in 0..4 {
        if r == skip_row {
            continue;
        }
        let mut sj = 0;
        for c in 0..4 {
            if c == skip_col {
                continue;
            }
            sub[si][sj] = m[r][c];
            sj += 1;
        }
        si += 1;
    }
    sub[0][0] * (sub[1][1] * sub[2][2] - sub[2][1] * sub[1][2])
        - sub[0][1] * (sub[1][0] * sub[2][2] - sub[2][0] * sub[1][2])
        + sub[0][2] * (sub[1][0] * sub[2][1] - sub[2][0] * sub[1][1])
}

// --- Operator Overloads ---

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat4`. Note that matrix
    /// multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        let c0 = rhs.col(0);
        let c1 = rhs.col(1);
        let c2 = rhs.col(2);
        let c3 = rhs.col(3);
        Self::from_rows(
            Vec4::new(
                self.rows[0].dot(c0),
                self.rows[0].dot(c1),
                self.rows[0].dot(c2),
                self.rows[0].dot(c3),
            ),
            Vec4::new(
                self.rows[1].dot(c0),
                self.rows[1].dot(c1),
                self.rows[1].dot(c2),
                self.rows[1].dot(c3),
            ),
            Vec4::new(
                self.rows[2].dot(c0),
                self.rows[2].dot(c1),
                self.rows[2].dot(c2),
                self.rows[2].dot(c3),
            ),
            Vec4::new(
                self.rows[3].dot(c0),
                self.rows[3].dot(c1),
                self.rows[3].dot(c2),
                self.rows[3].dot(c3),
            ),
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a `Vec4` by this matrix; the result keeps its true
    /// homogeneous `w`.
    #[inline]
    fn mul(self, v: Vec4) -> Self::Output {
        Vec4::new(
            self.rows[0].dot(v),
            self.rows[1].dot(v),
            self.rows[2].dot(v),
            self.rows[3].dot(v),
        )
    }
}

impl Mul<f32> for Mat4 {
    type Output = Self;
    /// Scales every element of the matrix, including the fourth components.
    #[inline]
    fn mul(self, b: f32) -> Self::Output {
        let scale_row = |r: Vec4| Vec4::new(r.x * b, r.y * b, r.z * b, r.w * b);
        Self::from_rows(
            scale_row(self.rows[0]),
            scale_row(self.rows[1]),
            scale_row(self.rows[2]),
            scale_row(self.rows[3]),
        )
    }
}

impl Div<f32> for Mat4 {
    type Output = Self;
    /// Divides every element of the matrix, including the fourth components.
    #[inline]
    fn div(self, b: f32) -> Self::Output {
        let div_row = |r: Vec4| Vec4::new(r.x / b, r.y / b, r.z / b, r.w / b);
        Self::from_rows(
            div_row(self.rows[0]),
            div_row(self.rows[1]),
            div_row(self.rows[2]),
            div_row(self.rows[3]),
        )
    }
}

impl MulAssign<Mat4> for Mat4 {
    #[inline]
    fn mul_assign(&mut self, rhs: Mat4) {
        *self = *self * rhs;
    }
}

impl MulAssign<f32> for Mat4 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Mat4 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;
    /// Allows accessing a matrix row by index.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl IndexMut<usize> for Mat4 {
    /// Allows mutably accessing a matrix row by index.
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.rows[index]
    }
}

impl fmt::Display for Mat4 {
    /// Formats the matrix with one bracketed row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[ {}, {}, {}, {} ]", r.x, r.y, r.z, r.w)?;
        }
        Ok(())
    }
}

// --- Approximate Comparison ---

impl AbsDiffEq for Mat2 {
    type Epsilon = f32;

    #[inline]
    fn default_epsilon() -> f32 {
        EPSILON
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rows[0].abs_diff_eq(&other.rows[0], epsilon)
            && self.rows[1].abs_diff_eq(&other.rows[1], epsilon)
    }
}

impl RelativeEq for Mat2 {
    #[inline]
    fn default_max_relative() -> f32 {
        EPSILON
    }

    #[inline]
    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.rows[0].relative_eq(&other.rows[0], epsilon, max_relative)
            && self.rows[1].relative_eq(&other.rows[1], epsilon, max_relative)
    }
}

impl AbsDiffEq for Mat3 {
    type Epsilon = f32;

    #[inline]
    fn default_epsilon() -> f32 {
        EPSILON
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat3 {
    #[inline]
    fn default_max_relative() -> f32 {
        EPSILON
    }

    #[inline]
    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    #[inline]
    fn default_epsilon() -> f32 {
        EPSILON
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    #[inline]
    fn default_max_relative() -> f32 {
        EPSILON
    }

    #[inline]
    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

// --- Tests ---
