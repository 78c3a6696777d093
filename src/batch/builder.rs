//! Parallel expansion of quad descriptors into vertices.
//!
//! The pending quads are split into one contiguous chunk per worker thread.
//! Each worker owns a disjoint slice of the vertex scratch, so no locking is
//! needed; the flush blocks on the scope join before uploading.

use std::{num::NonZeroUsize, ops::Range, thread};

use anyhow::Context;

use crate::{
    config::VERTICES_PER_QUAD,
    data_structures::{
        geometry,
        quad::{QuadDescriptor, Vertex},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallelVertexBuilder {
    thread_count: NonZeroUsize,
}

impl ParallelVertexBuilder {
    pub fn new(thread_count: usize) -> anyhow::Result<Self> {
        let thread_count =
            NonZeroUsize::new(thread_count).context("vertex builder needs at least one thread")?;
        Ok(Self { thread_count })
    }

    /// One worker per hardware thread. Failing to detect the hardware
    /// concurrency is a startup error.
    pub fn detect() -> anyhow::Result<Self> {
        let thread_count = thread::available_parallelism()
            .context("could not determine hardware concurrency for vertex building")?;
        Ok(Self { thread_count })
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count.get()
    }

    /// Contiguous quad ranges, one per thread. Every chunk but the last has
    /// `quad_count / thread_count` quads; the last one takes the remainder.
    pub fn partition(&self, quad_count: usize) -> Vec<Range<usize>> {
        let threads = self.thread_count.get();
        let chunk = quad_count / threads;
        (0..threads)
            .map(|i| {
                let start = i * chunk;
                let end = if i + 1 == threads {
                    quad_count
                } else {
                    start + chunk
                };
                start..end
            })
            .collect()
    }

    /// Writes `quads.len() * 4` vertices into `vertices`, quad `i` landing in
    /// `vertices[i * 4..i * 4 + 4]` regardless of the partitioning.
    pub fn build(&self, quads: &[QuadDescriptor], vertices: &mut [Vertex]) {
        assert_eq!(
            vertices.len(),
            quads.len() * VERTICES_PER_QUAD as usize,
            "vertex range does not match the pending quad count"
        );
        if quads.is_empty() {
            return;
        }
        if self.thread_count.get() == 1 {
            expand_quads(quads, vertices);
            return;
        }

        let ranges = self.partition(quads.len());
        thread::scope(|scope| {
            let mut rest = vertices;
            for range in ranges {
                let (out, tail) =
                    std::mem::take(&mut rest).split_at_mut(range.len() * VERTICES_PER_QUAD as usize);
                rest = tail;
                let chunk = &quads[range];
                if chunk.is_empty() {
                    continue;
                }
                scope.spawn(move || expand_quads(chunk, out));
            }
        });
    }
}

fn expand_quads(quads: &[QuadDescriptor], vertices: &mut [Vertex]) {
    for (quad, out) in quads
        .iter()
        .zip(vertices.chunks_exact_mut(VERTICES_PER_QUAD as usize))
    {
        expand_quad(quad, out);
    }
}

/// Transforms the unit quad by the descriptor's model matrix.
pub fn expand_quad(quad: &QuadDescriptor, out: &mut [Vertex]) {
    let model = quad.transform.to_matrix();
    let tex_coords = geometry::tex_coords(quad.tiling_factor);
    let color: [f32; 3] = quad.color.into();
    for (i, vertex) in out.iter_mut().enumerate() {
        let position = model * geometry::corner(i);
        *vertex = Vertex {
            position: [position.x, position.y, position.z],
            color,
            tex_coords: tex_coords[i],
            tex_index: quad.texture_slot as f32,
        };
    }
}
