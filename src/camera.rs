//! Scene camera: view and projection for one `begin_scene`.
//!
//! The camera looks down +Z in a left-handed world. Projection follows the GL
//! clip-space convention (depth in [-1, 1]); GPU backends with a different
//! convention convert when the matrix is uploaded.

use cgmath::{Angle, Deg, Matrix4, Vector3};

use crate::data_structures::transform::{Transform, inverse_rotation_matrix};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    pub fov: Deg<f32>,
    pub aspect_ratio: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(location: impl Into<Vector3<f32>>, fov: Deg<f32>, aspect_ratio: f32) -> Self {
        Self {
            transform: Transform::new().with_location(location),
            fov,
            aspect_ratio,
            z_near: 0.1,
            z_far: 10_000.0,
        }
    }

    pub fn with_rotation(mut self, rotation: impl Into<Vector3<f32>>) -> Self {
        self.transform.rotation = rotation.into();
        self
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// `rotate(-rotation) * translate(-location)`
    pub fn view_matrix(&self) -> Matrix4<f32> {
        inverse_rotation_matrix(self.transform.rotation)
            * Matrix4::from_translation(-self.transform.location)
    }

    /// Left-handed perspective: the right-handed GL matrix with its Z column
    /// negated.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        cgmath::perspective(self.fov, self.aspect_ratio, self.z_near, self.z_far)
            * Matrix4::from_nonuniform_scale(1.0, 1.0, -1.0)
    }

    pub fn forward(&self) -> Vector3<f32> {
        let (x, y) = self.pitch_yaw();
        Vector3::new(x.cos() * y.sin(), -x.sin(), x.cos() * y.cos())
    }

    pub fn right(&self) -> Vector3<f32> {
        let (_, y) = self.pitch_yaw();
        Vector3::new(y.cos(), 0.0, -y.sin())
    }

    pub fn up(&self) -> Vector3<f32> {
        self.forward().cross(self.right())
    }

    fn pitch_yaw(&self) -> (Deg<f32>, Deg<f32>) {
        (Deg(self.transform.rotation.x), Deg(self.transform.rotation.y))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, -5.0), Deg(60.0), 16.0 / 9.0)
    }
}
