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

//! Provides Euler angles tagged with their axis-composition order.

use log::trace;
use serde::{Deserialize, Serialize};

use super::{Mat3, Quaternion, Vec3};
use std::fmt;

/// The order in which the three elementary axis rotations are composed.
///
/// `XYZ` means the X rotation is applied to a vector first, then Y, then Z
/// (the matrix product is `Z * Y * X`).
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EulerOrder {
    /// X first, then Y, then Z.
    XYZ,
    /// X first, then Z, then Y.
    XZY,
    /// Y first, then X, then Z.
    YXZ,
    /// Y first, then Z, then X.
    YZX,
    /// Z first, then X, then Y.
    ZXY,
    /// Z first, then Y, then X.
    ZYX,
}

impl Default for EulerOrder {
    /// Returns [`EulerOrder::XYZ`].
    #[inline]
    fn default() -> Self {
        Self::XYZ
    }
}

impl fmt::Display for EulerOrder {
    /// Formats the order as its axis sequence, e.g. `XYZ`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::XYZ => "XYZ",
            Self::XZY => "XZY",
            Self::YXZ => "YXZ",
            Self::YZX => "YZX",
            Self::ZXY => "ZXY",
            Self::ZYX => "ZYX",
        };
        write!(f, "{}", name)
    }
}

/// A rotation expressed as three sequential angles about the coordinate
/// axes, in radians.
///
/// The angle values are only meaningful together with the [`EulerOrder`]
/// tag. Conversion back from a matrix ([`EulerAngles::from_mat3`]) always
/// extracts in `XYZ` order regardless of how the matrix was built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    /// The rotation angle about the X-axis, in radians.
    pub x: f32,
    /// The rotation angle about the Y-axis, in radians.
    pub y: f32,
    /// The rotation angle about the Z-axis, in radians.
    pub z: f32,
    /// The order in which the three axis rotations compose.
    pub order: EulerOrder,
}

impl EulerAngles {
    /// Creates a new set of Euler angles.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, order: EulerOrder) -> Self {
        Self { x, y, z, order }
    }

    /// Creates Euler angles from a vector of per-axis angles.
    #[inline]
    pub fn from_vec3(v: Vec3, order: EulerOrder) -> Self {
        Self::new(v.x, v.y, v.z, order)
    }

    /// Extracts Euler angles from a rotation matrix, always in `XYZ` order.
    ///
    /// The input is first reduced to its proper rotation part via
    /// [`Mat3::rotation_component`], so scaled and mirrored inputs are
    /// tolerated. Euler extraction has two solutions (from the `±` square
    /// root of `cos y`); the candidate with the smaller total angle
    /// magnitude is returned, a deterministic tie-break toward the identity.
    ///
    /// At gimbal lock (`|cos y|` within `8 * f32::EPSILON` of zero, i.e. a Y
    /// rotation near ±90°) one degree of freedom is lost and `z` is forced
    /// to exactly zero.
    pub fn from_mat3(m: &Mat3) -> Self {
        let r = m.rotation_component();

        let cos_y = (r[0][0] * r[0][0] + r[1][0] * r[1][0]).sqrt();

        let (e1, e2);
        if cos_y > 8.0 * f32::EPSILON {
            e1 = Vec3::new(
                r[2][1].atan2(r[2][2]),
                (-r[2][0]).atan2(cos_y),
                r[1][0].atan2(r[0][0]),
            );
            e2 = Vec3::new(
                (-r[2][1]).atan2(-r[2][2]),
                (-r[2][0]).atan2(-cos_y),
                (-r[1][0]).atan2(-r[0][0]),
            );
        } else {
            trace!("gimbal lock in Euler extraction; z forced to zero");
            e1 = Vec3::new((-r[1][2]).atan2(r[1][1]), (-r[2][0]).atan2(cos_y), 0.0);
            e2 = e1;
        }

        // Select the candidate with the lowest total magnitude.
        let e = if e1.x.abs() + e1.y.abs() + e1.z.abs() > e2.x.abs() + e2.y.abs() + e2.z.abs() {
            e2
        } else {
            e1
        };

        Self::new(e.x, e.y, e.z, EulerOrder::XYZ)
    }

    /// Extracts Euler angles from a quaternion, routing through the matrix
    /// representation. Always in `XYZ` order.
    #[inline]
    pub fn from_quaternion(q: Quaternion) -> Self {
        Self::from_mat3(&Mat3::from_quaternion(q))
    }
}

impl Default for EulerAngles {
    /// Returns the zero rotation in `XYZ` order.
    #[inline]
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, EulerOrder::XYZ)
    }
}

impl fmt::Display for EulerAngles {
    /// Formats the angles as `((x, y, z), ORDER)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(({}, {}, {}), {})", self.x, self.y, self.z, self.order)
    }
}

// --- Tests ---
