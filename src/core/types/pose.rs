//! 6-DoF rigid transform type.

use nalgebra::{Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Rigid-body transform in 3D space: translation plus unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose3D {
    /// Translation in meters
    pub translation: Translation3<f64>,
    /// Rotation as a unit quaternion
    pub rotation: UnitQuaternion<f64>,
}

impl Pose3D {
    /// Create a pose from translation and rotation parts.
    #[inline]
    pub fn new(translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            translation: Translation3::from(translation),
            rotation,
        }
    }

    /// Identity pose at the origin.
    #[inline]
    pub fn identity() -> Self {
        Self {
            translation: Translation3::identity(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pure translation with no rotation.
    #[inline]
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            translation: Translation3::new(x, y, z),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Compose two poses: self ⊕ other
    ///
    /// Applies `other` relative to the `self` frame.
    #[inline]
    pub fn compose(&self, other: &Pose3D) -> Pose3D {
        Pose3D {
            translation: Translation3::from(
                self.translation.vector + self.rotation * other.translation.vector,
            ),
            rotation: self.rotation * other.rotation,
        }
    }

    /// Inverse transform, such that `self.compose(&self.inverse())` is the
    /// identity.
    #[inline]
    pub fn inverse(&self) -> Pose3D {
        let inv_rotation = self.rotation.inverse();
        Pose3D {
            translation: Translation3::from(-(inv_rotation * self.translation.vector)),
            rotation: inv_rotation,
        }
    }

    /// Translation part as a vector.
    #[inline]
    pub fn translation_vector(&self) -> Vector3<f64> {
        self.translation.vector
    }
}

impl Default for Pose3D {
    fn default() -> Self {
        Self::identity()
    }
}
