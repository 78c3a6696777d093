//! The unit quad every batched quad is expanded from.
//!
//! Corner order is bottom-left, bottom-right, top-right, top-left. Texture
//! coordinates and the index pattern below are both written against that order.

use cgmath::Vector4;

use crate::config::{INDICES_PER_QUAD, VERTICES_PER_QUAD};

pub const QUAD_CORNERS: [[f32; 3]; 4] = [
    [-0.5, -0.5, 0.0],
    [0.5, -0.5, 0.0],
    [0.5, 0.5, 0.0],
    [-0.5, 0.5, 0.0],
];

/// Two counter-clockwise triangles relative to a quad's first vertex.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Corner `i` as a homogeneous point ready for a model matrix.
pub fn corner(i: usize) -> Vector4<f32> {
    let [x, y, z] = QUAD_CORNERS[i];
    Vector4::new(x, y, z, 1.0)
}

/// UVs matching [`QUAD_CORNERS`] for a tiling factor `t`.
///
/// The span is `[0, t]` on both axes, so a sampler in repeat mode shows the
/// texture `t` times across the quad.
pub fn tex_coords(tiling_factor: f32) -> [[f32; 2]; 4] {
    let t = tiling_factor;
    [[0.0, t], [t, t], [t, 0.0], [0.0, 0.0]]
}

/// Index data for `max_quads` quads, generated once at renderer init.
pub fn build_indices(max_quads: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity(max_quads as usize * INDICES_PER_QUAD as usize);
    for quad in 0..max_quads {
        let base = quad * VERTICES_PER_QUAD;
        indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }
    indices
}
