//! Pending quad descriptors and the vertices they expand into.

use cgmath::Vector3;

use crate::data_structures::transform::Transform;

/// Slot index used by quads that sample the reserved white texture.
pub const WHITE_TEXTURE_SLOT: u32 = 0;

/// One `draw_quad` request, stored in the batch until the next flush.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadDescriptor {
    pub transform: Transform,
    pub color: Vector3<f32>,
    pub texture_slot: u32,
    pub tiling_factor: f32,
}

impl QuadDescriptor {
    /// A solid-colour quad: white texture, tiling 1.
    pub fn untextured(transform: Transform, color: Vector3<f32>) -> Self {
        Self {
            transform,
            color,
            texture_slot: WHITE_TEXTURE_SLOT,
            tiling_factor: 1.0,
        }
    }

    pub fn textured(
        transform: Transform,
        texture_slot: u32,
        tiling_factor: f32,
        color_tint: Vector3<f32>,
    ) -> Self {
        Self {
            transform,
            color: color_tint,
            texture_slot,
            tiling_factor,
        }
    }
}

/// A world-space vertex as uploaded to the GPU.
///
/// The texture slot travels as a float because that is how the vertex stage
/// receives it; the fragment stage rounds it back to an integer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coords: [f32; 2],
    pub tex_index: f32,
}

impl Vertex {
    /**
     * Byte layout of one vertex in the batch vertex buffer:
     *
     * position (3 floats) + color (3 floats) + uv (2 floats) + slot (1 float)
     */
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}
