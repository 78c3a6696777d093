//! Fixed-capacity storage for the quads of one batch.

use bytemuck::Zeroable;
use cgmath::Vector3;

use crate::{
    batch::builder::ParallelVertexBuilder,
    config::VERTICES_PER_QUAD,
    data_structures::{
        quad::{QuadDescriptor, Vertex},
        transform::Transform,
    },
};

/// Pending quad descriptors plus the CPU vertex scratch they expand into.
///
/// Both arrays are allocated once for `capacity` quads and reused by every
/// batch. The scheduler is responsible for flushing before the buffer
/// overflows; pushing into a full buffer is a bug and panics.
#[derive(Debug)]
pub struct QuadBatchBuffer {
    quads: Vec<QuadDescriptor>,
    vertices: Vec<Vertex>,
    capacity: usize,
}

impl QuadBatchBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            quads: Vec::with_capacity(capacity),
            vertices: vec![Vertex::zeroed(); capacity * VERTICES_PER_QUAD as usize],
            capacity,
        }
    }

    /// Appends a solid-colour quad. Returns `true` if the buffer is now full.
    pub fn push_untextured(&mut self, transform: Transform, color: Vector3<f32>) -> bool {
        self.push(QuadDescriptor::untextured(transform, color))
    }

    /// Appends a quad sampling an already resolved texture slot. Returns
    /// `true` if the buffer is now full.
    pub fn push_textured(
        &mut self,
        transform: Transform,
        texture_slot: u32,
        tiling_factor: f32,
        color_tint: Vector3<f32>,
    ) -> bool {
        self.push(QuadDescriptor::textured(
            transform,
            texture_slot,
            tiling_factor,
            color_tint,
        ))
    }

    pub fn push(&mut self, quad: QuadDescriptor) -> bool {
        assert!(
            self.quads.len() < self.capacity,
            "quad batch overflow: {} quads pushed without a flush",
            self.capacity
        );
        self.quads.push(quad);
        self.is_full()
    }

    /// Expands every pending quad into the vertex scratch and returns the
    /// filled vertex range.
    pub fn expand(&mut self, builder: &ParallelVertexBuilder) -> &[Vertex] {
        let count = self.quads.len() * VERTICES_PER_QUAD as usize;
        builder.build(&self.quads, &mut self.vertices[..count]);
        &self.vertices[..count]
    }

    /// Logically discards the pending quads. Storage is kept for reuse.
    pub fn clear(&mut self) {
        self.quads.clear();
    }

    pub fn pending(&self) -> &[QuadDescriptor] {
        &self.quads
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.quads.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
