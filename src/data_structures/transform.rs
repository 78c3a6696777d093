//! Per-quad transformation data.
//!
//! A [`Transform`] is recomputed by the caller every frame and copied into the
//! batch by value. It is expanded into a model matrix only when the batch is
//! flushed, on whichever worker thread owns the quad.

use cgmath::{Deg, Matrix4, Vector3};

/// Location, rotation and scale of a quad.
///
/// Rotation is stored as Euler angles in degrees and always composed as
/// X, then Y, then Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub location: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Create a transform with identity values (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            location: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_location(mut self, location: impl Into<Vector3<f32>>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_rotation(mut self, rotation: impl Into<Vector3<f32>>) -> Self {
        self.rotation = rotation.into();
        self
    }

    pub fn with_scale(mut self, scale: impl Into<Vector3<f32>>) -> Self {
        self.scale = scale.into();
        self
    }

    /// `translate(location) * rotate_x * rotate_y * rotate_z * scale(scale)`
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.location)
            * rotation_matrix(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(location: Vector3<f32>) -> Self {
        Transform {
            location,
            ..Default::default()
        }
    }
}

/// Euler rotation in degrees, composed X * Y * Z.
///
/// The composition order is part of the vertex output contract: changing it
/// changes every rotated vertex.
pub fn rotation_matrix(rotation: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_angle_x(Deg(rotation.x))
        * Matrix4::from_angle_y(Deg(rotation.y))
        * Matrix4::from_angle_z(Deg(rotation.z))
}

/// Rotation of the negated angles, used for camera view matrices.
pub(crate) fn inverse_rotation_matrix(rotation: Vector3<f32>) -> Matrix4<f32> {
    rotation_matrix(-rotation)
}
