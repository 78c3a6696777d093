//! The collaborators a [`BatchRenderer`](crate::renderer::BatchRenderer)
//! submits to.
//!
//! Calls are synchronous from the renderer's point of view and cannot fail:
//! once a batch is handed over it is the backend's problem.

use cgmath::Matrix4;

use crate::data_structures::texture::TextureHandle;

pub const U_VIEW: &str = "u_View";
pub const U_PROJ: &str = "u_Proj";
pub const U_TEX_SLOTS: &str = "u_TexSlots";

/// Receives finished geometry and issues draw calls.
pub trait DrawBackend {
    /// Called once at renderer init with indices for the full quad capacity.
    fn upload_index_buffer(&mut self, indices: &[u32]);

    /// Copies vertex bytes into the GPU vertex buffer at a byte offset.
    fn upload_vertex_range(&mut self, bytes: &[u8], offset: u64);

    /// Binds `texture` to sampler slot `slot` for the next draw.
    fn bind_texture(&mut self, texture: TextureHandle, slot: u32);

    /// Draws `index_count` indices from the start of the index buffer.
    fn draw_indexed(&mut self, index_count: u32);

    /// End of frame hand-off. Backends without a presentation step ignore it.
    fn present(&mut self) {}
}

/// Receives shader uniforms by name.
pub trait UniformSink {
    fn set_matrix4(&mut self, name: &str, value: &Matrix4<f32>);

    fn set_int_array(&mut self, name: &str, values: &[i32]);
}
