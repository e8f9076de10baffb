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

//! Provides 2D, 3D, and 4D vector types and their associated operations.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::EPSILON;
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

// --- Vec2 ---

/// A 2-dimensional vector with `f32` components.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Vec2 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
}

impl Vec2 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };
    /// The unit vector pointing along the positive X-axis.
    pub const X: Self = Self { x: 1.0, y: 0.0 };
    /// The unit vector pointing along the positive Y-axis.
    pub const Y: Self = Self { x: 0.0, y: 1.0 };

    /// Creates a new `Vec2` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculates the squared length (magnitude) of the vector.
    /// This is faster than `length()` as it avoids a square root.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Calculates the length (magnitude) of the vector.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a normalized version of the vector with a length of 1.
    /// If the vector's length is near zero, it returns `Vec2::ZERO`.
    #[inline]
    pub fn normalize(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > EPSILON * EPSILON {
            *self * (1.0 / len_sq.sqrt())
        } else {
            Self::ZERO
        }
    }

    /// Calculates the dot product of this vector and another.
    #[inline]
    pub fn dot(&self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Projects this vector onto `other`.
    #[inline]
    pub fn project_onto(&self, other: Self) -> Self {
        other * (self.dot(other) / other.length_squared())
    }

    /// Returns `true` if every component is within machine epsilon of zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x.abs() < f32::EPSILON && self.y.abs() < f32::EPSILON
    }

    /// Performs a linear interpolation between two vectors.
    #[inline]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        Self {
            x: start.x + (end.x - start.x) * t,
            y: start.y + (end.y - start.y) * t,
        }
    }
}

// --- Operator Overloads ---

impl Add for Vec2 {
    type Output = Self;
    /// Adds two vectors component-wise.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Add<f32> for Vec2 {
    type Output = Self;
    /// Adds a scalar to every component.
    #[inline]
    fn add(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x + rhs,
            y: self.y + rhs,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    /// Subtracts two vectors component-wise.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Sub<f32> for Vec2 {
    type Output = Self;
    /// Subtracts a scalar from every component.
    #[inline]
    fn sub(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x - rhs,
            y: self.y - rhs,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    /// Multiplies the vector by a scalar.
    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;
    /// Multiplies a scalar by a vector.
    #[inline]
    fn mul(self, rhs: Vec2) -> Self::Output {
        rhs * self
    }
}

impl Mul<Vec2> for Vec2 {
    type Output = Self;
    /// Multiplies two vectors component-wise.
    #[inline]
    fn mul(self, rhs: Vec2) -> Self::Output {
        Self {
            x: self.x * rhs.x,
            y: self.y * rhs.y,
        }
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    /// Divides the vector by a scalar.
    #[inline]
    fn div(self, rhs: f32) -> Self::Output {
        let inv_rhs = 1.0 / rhs;
        Self {
            x: self.x * inv_rhs,
            y: self.y * inv_rhs,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    /// Negates the vector.
    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vec2 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vec2 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Index<usize> for Vec2 {
    type Output = f32;
    /// Allows accessing a vector component by index (`v[0]`, `v[1]`).
    ///
    /// # Panics
    /// Panics if `index` is not 0 or 1.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Index out of bounds for Vec2"),
        }
    }
}

impl IndexMut<usize> for Vec2 {
    /// Allows mutably accessing a vector component by index (`v[0] = ...`).
    ///
    /// # Panics
    /// Panics if `index` is not 0 or 1.
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Index out of bounds for Vec2"),
        }
    }
}

impl fmt::Display for Vec2 {
    /// Formats the vector as `(x, y)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// --- Vec3 ---

/// A 3-dimensional vector with `f32` components.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Vec3 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
    /// The z component of the vector.
    pub z: f32,
}

impl Vec3 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };
    /// The unit vector pointing along the positive X-axis.
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    /// The unit vector pointing along the positive Y-axis.
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    /// The unit vector pointing along the positive Z-axis.
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    /// Creates a new `Vec3` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a `Vec3` from a `Vec2` and a `z` component.
    #[inline]
    pub fn from_vec2(v: Vec2, z: f32) -> Self {
        Self::new(v.x, v.y, z)
    }

    /// Returns the `[x, y]` components of the vector as a `Vec2`, discarding `z`.
    #[inline]
    pub fn truncate(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Calculates the squared length (magnitude) of the vector.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Calculates the length (magnitude) of the vector.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a normalized version of the vector with a length of 1.
    /// If the vector's length is near zero, it returns `Vec3::ZERO`.
    #[inline]
    pub fn normalize(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > EPSILON * EPSILON {
            *self * (1.0 / len_sq.sqrt())
        } else {
            Self::ZERO
        }
    }

    /// Calculates the dot product of this vector and another.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the cross product of this vector and another.
    #[inline]
    pub fn cross(&self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Projects this vector onto `other`.
    #[inline]
    pub fn project_onto(&self, other: Self) -> Self {
        other * (self.dot(other) / other.length_squared())
    }

    /// Returns `true` if every component is within machine epsilon of zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x.abs() < f32::EPSILON && self.y.abs() < f32::EPSILON && self.z.abs() < f32::EPSILON
    }

    /// Calculates the squared distance between this vector and another.
    #[inline]
    pub fn distance_squared(&self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Calculates the distance between this vector and another.
    #[inline]
    pub fn distance(&self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Performs a linear interpolation between two vectors.
    #[inline]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        Self {
            x: start.x + (end.x - start.x) * t,
            y: start.y + (end.y - start.y) * t,
            z: start.z + (end.z - start.z) * t,
        }
    }

    /// Retrieves a component of the vector by its index.
    ///
    /// # Panics
    /// Panics if `index` is not 0, 1, or 2.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => panic!("Index out of bounds for Vec3"),
        }
    }
}

// --- Operator Overloads ---

impl Default for Vec3 {
    /// Returns `Vec3::ZERO`.
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Vec3 {
    type Output = Self;
    /// Adds two vectors component-wise.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Add<f32> for Vec3 {
    type Output = Self;
    /// Adds a scalar to every component.
    #[inline]
    fn add(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x + rhs,
            y: self.y + rhs,
            z: self.z + rhs,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    /// Subtracts two vectors component-wise.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Sub<f32> for Vec3 {
    type Output = Self;
    /// Subtracts a scalar from every component.
    #[inline]
    fn sub(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x - rhs,
            y: self.y - rhs,
            z: self.z - rhs,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    /// Multiplies the vector by a scalar.
    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    /// Multiplies a scalar by a vector.
    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs * self
    }
}

impl Mul<Vec3> for Vec3 {
    type Output = Self;
    /// Multiplies two vectors component-wise.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x * rhs.x,
            y: self.y * rhs.y,
            z: self.z * rhs.z,
        }
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    /// Divides the vector by a scalar.
    #[inline]
    fn div(self, rhs: f32) -> Self::Output {
        let inv_rhs = 1.0 / rhs;
        Self {
            x: self.x * inv_rhs,
            y: self.y * inv_rhs,
            z: self.z * inv_rhs,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    /// Negates the vector.
    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vec3 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;
    /// Allows accessing a vector component by index.
    /// # Panics
    /// Panics if `index` is not 0, 1, or 2.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Index out of bounds for Vec3"),
        }
    }
}

impl IndexMut<usize> for Vec3 {
    /// Allows mutably accessing a vector component by index.
    /// # Panics
    /// Panics if `index` is not 0, 1, or 2.
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Index out of bounds for Vec3"),
        }
    }
}

impl fmt::Display for Vec3 {
    /// Formats the vector as `(x, y, z)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// --- Vec4 ---

/// A 4-dimensional vector with `f32` components, used for homogeneous coordinates.
///
/// `Vec4` represents a homogeneous point: `w` defaults to 1.0 and the
/// value-returning arithmetic operators (`+ - * /`, with a vector or scalar
/// on the right) operate on the `xyz` part only, fixing the result's `w` to
/// 1.0. The compound-assign forms delegate to the value-returning forms, so
/// the `w` policy is uniform. The only operation that consumes `w` is
/// [`Vec4::normalized_w`], the homogeneous divide.
///
/// `length`, `normalize`, `cross`, and `is_zero` likewise consider only the
/// `xyz` part; [`Vec4::dot`] is the full 4-component product so matrix rows
/// can use it.
#[derive(
    Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Vec4 {
    /// The x component of the vector.
    pub x: f32,
    /// The y component of the vector.
    pub y: f32,
    /// The z component of the vector.
    pub z: f32,
    /// The w component, used for homogeneous coordinates.
    pub w: f32,
}

impl Vec4 {
    /// A vector with all components set to `0.0`.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 0.0,
    };
    /// A vector with all components set to `1.0`.
    pub const ONE: Self = Self {
        x: 1.0,
        y: 1.0,
        z: 1.0,
        w: 1.0,
    };
    /// The unit vector pointing along the positive X-axis.
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
        w: 0.0,
    };
    /// The unit vector pointing along the positive Y-axis.
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
        w: 0.0,
    };
    /// The unit vector pointing along the positive Z-axis.
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
        w: 0.0,
    };
    /// The unit vector pointing along the positive W-axis.
    pub const W: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new `Vec4` with the specified components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a homogeneous point from three components, with `w` set to 1.0.
    #[inline]
    pub const fn point(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// Creates a `Vec4` from a `Vec3` and a `w` component.
    #[inline]
    pub fn from_vec3(v: Vec3, w: f32) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Returns the `[x, y, z]` components of the vector as a `Vec3`, discarding `w`.
    #[inline]
    pub fn truncate(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Calculates the squared length of the `xyz` part, ignoring `w`.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Calculates the length of the `xyz` part, ignoring `w`.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns a copy with the `xyz` part normalized to length 1 and `w` set
    /// to 1.0. If the `xyz` length is near zero, returns `(0, 0, 0, 1)`.
    #[inline]
    pub fn normalize(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > EPSILON * EPSILON {
            let inv = 1.0 / len_sq.sqrt();
            Self::new(self.x * inv, self.y * inv, self.z * inv, 1.0)
        } else {
            Self::new(0.0, 0.0, 0.0, 1.0)
        }
    }

    /// Performs the homogeneous divide: `xyz` divided by `w`, with `w` reset
    /// to 1.0.
    #[inline]
    pub fn normalized_w(&self) -> Self {
        Self::new(self.x / self.w, self.y / self.w, self.z / self.w, 1.0)
    }

    /// Calculates the full 4-component dot product of this vector and another.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Calculates the dot product of the `xyz` part with a `Vec3`.
    #[inline]
    pub fn dot3(&self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the cross product of the `xyz` part with a `Vec3`; the
    /// result's `w` is 1.0.
    #[inline]
    pub fn cross(&self, other: Vec3) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
            1.0,
        )
    }

    /// Projects the `xyz` part of this vector onto `other`; the result's `w`
    /// is 1.0.
    #[inline]
    pub fn project_onto(&self, other: Vec3) -> Self {
        let t = self.dot3(other) / other.length_squared();
        Self::new(other.x * t, other.y * t, other.z * t, 1.0)
    }

    /// Returns `true` if the `xyz` components are within machine epsilon of
    /// zero. `w` is not considered.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x.abs() < f32::EPSILON && self.y.abs() < f32::EPSILON && self.z.abs() < f32::EPSILON
    }

    /// Performs a linear interpolation of the `xyz` parts; the result's `w`
    /// is 1.0.
    #[inline]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        Self::new(
            start.x + (end.x - start.x) * t,
            start.y + (end.y - start.y) * t,
            start.z + (end.z - start.z) * t,
            1.0,
        )
    }

    /// Retrieves a component of the vector by its index.
    ///
    /// # Panics
    /// Panics if `index` is not between 0 and 3.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            3 => self.w,
            _ => panic!("Index out of bounds for Vec4"),
        }
    }
}

// --- Operator Overloads ---

impl Default for Vec4 {
    /// Returns the homogeneous origin `(0, 0, 0, 1)`.
    #[inline]
    fn default() -> Self {
        Self::W
    }
}

impl Add for Vec4 {
    type Output = Self;
    /// Adds the `xyz` parts component-wise; the result's `w` is 1.0.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, 1.0)
    }
}

impl Add<f32> for Vec4 {
    type Output = Self;
    /// Adds a scalar to the `xyz` components; the result's `w` is 1.0.
    #[inline]
    fn add(self, rhs: f32) -> Self::Output {
        Self::new(self.x + rhs, self.y + rhs, self.z + rhs, 1.0)
    }
}

impl Sub for Vec4 {
    type Output = Self;
    /// Subtracts the `xyz` parts component-wise; the result's `w` is 1.0.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, 1.0)
    }
}

impl Sub<f32> for Vec4 {
    type Output = Self;
    /// Subtracts a scalar from the `xyz` components; the result's `w` is 1.0.
    #[inline]
    fn sub(self, rhs: f32) -> Self::Output {
        Self::new(self.x - rhs, self.y - rhs, self.z - rhs, 1.0)
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;
    /// Scales the `xyz` components; the result's `w` is 1.0.
    #[inline]
    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, 1.0)
    }
}

impl Mul<Vec4> for f32 {
    type Output = Vec4;
    /// Multiplies a scalar by a vector.
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        rhs * self
    }
}

impl Div<f32> for Vec4 {
    type Output = Self;
    /// Divides the `xyz` components by a scalar; the result's `w` is 1.0.
    #[inline]
    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs, 1.0)
    }
}

impl Neg for Vec4 {
    type Output = Self;
    /// Negates the `xyz` components; the result's `w` is 1.0.
    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, 1.0)
    }
}

impl AddAssign for Vec4 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec4 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vec4 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl DivAssign<f32> for Vec4 {
    #[inline]
    fn div_assign(&mut self, rhs: f32) {
        *self = *self / rhs;
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;
    /// Allows accessing a vector component by index.
    /// # Panics
    /// Panics if `index` is not between 0 and 3.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Index out of bounds for Vec4"),
        }
    }
}

impl IndexMut<usize> for Vec4 {
    /// Allows mutably accessing a vector component by index.
    /// # Panics
    /// Panics if `index` is not between 0 and 3.
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Index out of bounds for Vec4"),
        }
    }
}

impl fmt::Display for Vec4 {
    /// Formats the vector as `(x, y, z, w)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

// --- Approximate Comparison ---

impl AbsDiffEq for Vec2 {
    type Epsilon = f32;

    #[inline]
    fn default_epsilon() -> f32 {
        EPSILON
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        f32::abs_diff_eq(&self.x, &other.x, epsilon) && f32::abs_diff_eq(&self.y, &other.y, epsilon)
    }
}

impl RelativeEq for Vec2 {
    #[inline]
    fn default_max_relative() -> f32 {
        EPSILON
    }

    #[inline]
    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        f32::relative_eq(&self.x, &other.x, epsilon, max_relative)
            && f32::relative_eq(&self.y, &other.y, epsilon, max_relative)
    }
}

impl AbsDiffEq for Vec3 {
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
    }
}

impl RelativeEq for Vec3 {
    #[inline]
    fn default_max_relative() -> f32 {
        EPSILON
    }

    #[inline]
    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        f32::relative_eq(&self.x, &other.x, epsilon, max_relative)
            && f32::relative_eq(&self.y, &other.y, epsilon, max_relative)
            && f32::relative_eq(&self.z, &other.z, epsilon, max_relative)
    }
}

impl AbsDiffEq for Vec4 {
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

impl RelativeEq for Vec4 {
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
    use crate::approx_eq;
    use approx::assert_relative_eq;

    // Test Vec2

    #[test]
    fn test_vec2_new() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
    }

    #[test]
    fn test_vec2_constants() {
        assert_eq!(Vec2::ZERO, Vec2::new(0.0, 0.0));
        assert_eq!(Vec2::ONE, Vec2::new(1.0, 1.0));
        assert_eq!(Vec2::X, Vec2::new(1.0, 0.0));
        assert_eq!(Vec2::Y, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_vec2_ops() {
        let v1 = Vec2::new(1.0, 2.0);
        let v2 = Vec2::new(3.0, 4.0);
        assert_eq!(v1 + v2, Vec2::new(4.0, 6.0));
        assert_eq!(v2 - v1, Vec2::new(2.0, 2.0));
        assert_eq!(v1 + 1.0, Vec2::new(2.0, 3.0));
        assert_eq!(v2 - 1.0, Vec2::new(2.0, 3.0));
        assert_eq!(v1 * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(3.0 * v1, Vec2::new(3.0, 6.0));
        assert_eq!(v1 * v2, Vec2::new(3.0, 8.0)); // Component-wise
        assert_eq!(-v1, Vec2::new(-1.0, -2.0));
        assert_relative_eq!(Vec2::new(4.0, 6.0) / 2.0, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_vec2_compound_ops() {
        let mut v = Vec2::new(1.0, 2.0);
        v += Vec2::new(1.0, 1.0);
        assert_eq!(v, Vec2::new(2.0, 3.0));
        v -= Vec2::new(2.0, 2.0);
        assert_eq!(v, Vec2::new(0.0, 1.0));
        v *= 4.0;
        assert_eq!(v, Vec2::new(0.0, 4.0));
        v /= 2.0;
        assert_eq!(v, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_vec2_dot_and_length() {
        let v1 = Vec2::new(1.0, 2.0);
        let v2 = Vec2::new(3.0, 4.0);
        assert!(approx_eq(v1.dot(v2), 11.0));
        assert!(approx_eq(v2.length_squared(), 25.0));
        assert!(approx_eq(v2.length(), 5.0));
    }

    #[test]
    fn test_vec2_normalize() {
        let v1 = Vec2::new(3.0, 0.0);
        let norm_v1 = v1.normalize();
        assert_relative_eq!(norm_v1, Vec2::X);
        assert!(approx_eq(norm_v1.length(), 1.0));

        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_vec2_project_onto() {
        let v = Vec2::new(2.0, 3.0);
        let onto = Vec2::new(4.0, 0.0);
        assert_relative_eq!(v.project_onto(onto), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_vec2_lerp() {
        let start = Vec2::new(0.0, 10.0);
        let end = Vec2::new(10.0, 0.0);
        assert_relative_eq!(Vec2::lerp(start, end, 0.0), start);
        assert_relative_eq!(Vec2::lerp(start, end, 1.0), end);
        assert_relative_eq!(Vec2::lerp(start, end, 0.5), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_vec2_index() {
        let mut v = Vec2::new(5.0, 6.0);
        assert_eq!(v[0], 5.0);
        assert_eq!(v[1], 6.0);
        v[0] = 10.0;
        assert_eq!(v.x, 10.0);
    }

    #[test]
    #[should_panic]
    fn test_vec2_index_out_of_bounds() {
        let v = Vec2::new(1.0, 2.0);
        let _ = v[2]; // Should panic
    }

    // Test Vec3

    #[test]
    fn test_vec3_new() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_constants() {
        assert_eq!(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(Vec3::ONE, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(Vec3::X, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(Vec3::Y, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(Vec3::Z, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_vec3_add_sub() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(v1 + v2, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(v2 - v1, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(v1 + 1.0, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(v1 - 1.0, Vec3::new(0.0, 1.0, 2.0));
    }

    #[test]
    fn test_vec3_scalar_mul_div() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(3.0 * v, Vec3::new(3.0, 6.0, 9.0));
        assert_eq!(Vec3::new(2.0, 4.0, 6.0) / 2.0, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_vec3_neg() {
        let v = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(-v, Vec3::new(-1.0, 2.0, -3.0));
    }

    #[test]
    fn test_vec3_length() {
        let v1 = Vec3::new(3.0, 4.0, 0.0);
        assert!(approx_eq(v1.length_squared(), 25.0));
        assert!(approx_eq(v1.length(), 5.0));
    }

    #[test]
    fn test_vec3_dot() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, -5.0, 6.0);
        // 1*4 + 2*(-5) + 3*6 = 4 - 10 + 18 = 12
        assert!(approx_eq(v1.dot(v2), 12.0));
        assert!(approx_eq(Vec3::X.dot(Vec3::Y), 0.0));
    }

    #[test]
    fn test_vec3_cross() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Z.cross(Vec3::X), Vec3::Y);

        // Anti-commutative property
        assert_eq!(Vec3::Y.cross(Vec3::X), -Vec3::Z);

        // Parallel vectors
        assert_eq!(Vec3::X.cross(Vec3::X), Vec3::ZERO);
    }

    #[test]
    fn test_vec3_normalize() {
        let v1 = Vec3::new(3.0, 0.0, 0.0);
        let norm_v1 = v1.normalize();
        assert_relative_eq!(norm_v1, Vec3::X);
        assert!(approx_eq(norm_v1.length(), 1.0));

        let v2 = Vec3::new(1.0, 1.0, 1.0);
        assert!(approx_eq(v2.normalize().length(), 1.0));

        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_vec3_project_onto() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let onto = Vec3::new(0.0, 5.0, 0.0);
        assert_relative_eq!(v.project_onto(onto), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_vec3_is_zero() {
        assert!(Vec3::ZERO.is_zero());
        assert!(!Vec3::new(0.0, 1e-3, 0.0).is_zero());
    }

    #[test]
    fn test_vec3_distance() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, 5.0, 6.0);
        assert!(approx_eq(v1.distance(v2), 3.0 * (3.0_f32).sqrt()));
    }

    #[test]
    fn test_vec3_lerp() {
        let start = Vec3::new(0.0, 0.0, 0.0);
        let end = Vec3::new(10.0, 10.0, 10.0);
        assert_relative_eq!(Vec3::lerp(start, end, 0.0), start);
        assert_relative_eq!(Vec3::lerp(start, end, 1.0), end);
        assert_relative_eq!(Vec3::lerp(start, end, 0.5), Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_vec3_conversions() {
        let v2 = Vec2::new(1.0, 2.0);
        assert_eq!(Vec3::from_vec2(v2, 3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vec3::new(1.0, 2.0, 3.0).truncate(), v2);
    }

    // Test Vec4

    #[test]
    fn test_vec4_new_and_default() {
        let v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
        assert_eq!(v.w, 4.0);

        // The default is a homogeneous point, not the zero vector.
        assert_eq!(Vec4::default(), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(Vec4::point(1.0, 2.0, 3.0), Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_vec4_ops_reset_w() {
        let a = Vec4::new(1.0, 2.0, 3.0, 5.0);
        let b = Vec4::new(4.0, 5.0, 6.0, 7.0);
        assert_eq!(a + b, Vec4::new(5.0, 7.0, 9.0, 1.0));
        assert_eq!(b - a, Vec4::new(3.0, 3.0, 3.0, 1.0));
        assert_eq!(a * 2.0, Vec4::new(2.0, 4.0, 6.0, 1.0));
        assert_eq!(2.0 * a, Vec4::new(2.0, 4.0, 6.0, 1.0));
        assert_eq!(a / 2.0, Vec4::new(0.5, 1.0, 1.5, 1.0));
        assert_eq!(a + 1.0, Vec4::new(2.0, 3.0, 4.0, 1.0));
        assert_eq!(a - 1.0, Vec4::new(0.0, 1.0, 2.0, 1.0));
        assert_eq!(-a, Vec4::new(-1.0, -2.0, -3.0, 1.0));

        let mut c = a;
        c += b;
        assert_eq!(c.w, 1.0);
    }

    #[test]
    fn test_vec4_length_ignores_w() {
        let v = Vec4::new(3.0, 4.0, 0.0, 9.0);
        assert!(approx_eq(v.length(), 5.0));
        assert!(approx_eq(v.length_squared(), 25.0));
    }

    #[test]
    fn test_vec4_normalize() {
        let v = Vec4::new(0.0, 3.0, 0.0, 7.0);
        let n = v.normalize();
        assert_relative_eq!(n, Vec4::new(0.0, 1.0, 0.0, 1.0));

        assert_eq!(Vec4::ZERO.normalize(), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_vec4_normalized_w() {
        let v = Vec4::new(2.0, 4.0, 6.0, 2.0);
        assert_relative_eq!(v.normalized_w(), Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_vec4_dot() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::new(5.0, 6.0, 7.0, 8.0);
        assert!(approx_eq(a.dot(b), 5.0 + 12.0 + 21.0 + 32.0));
        assert!(approx_eq(a.dot3(Vec3::new(5.0, 6.0, 7.0)), 38.0));
    }

    #[test]
    fn test_vec4_cross() {
        let x = Vec4::new(1.0, 0.0, 0.0, 0.5);
        let c = x.cross(Vec3::Y);
        assert_eq!(c, Vec4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_vec4_conversions() {
        let v3 = Vec3::new(1.0, 2.0, 3.0);
        let v4 = Vec4::from_vec3(v3, 4.0);
        assert_eq!(v4, Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(v4.truncate(), v3);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Vec2::new(1.0, 2.0)), "(1, 2)");
        assert_eq!(format!("{}", Vec3::new(1.0, 2.0, 3.0)), "(1, 2, 3)");
        assert_eq!(format!("{}", Vec4::new(1.0, 2.0, 3.0, 4.0)), "(1, 2, 3, 4)");
    }
}
