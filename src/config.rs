//! Renderer configuration.
//!
//! The batch renderer consumes exactly two sizing knobs: how many quads fit in
//! one batch and how many texture slots the fragment stage exposes. Both are
//! fixed when the renderer is created; every buffer is sized from them once.

use anyhow::{Context, bail};

/// Default number of quads accumulated before a flush is forced.
pub const MAX_QUADS_PER_BATCH: u32 = 10_000;
/// Default number of sampler slots, slot 0 included.
pub const MAX_TEXTURE_SLOTS: u32 = 16;

pub const VERTICES_PER_QUAD: u32 = 4;
pub const INDICES_PER_QUAD: u32 = 6;

/// Sizing parameters for a [`BatchRenderer`](crate::renderer::BatchRenderer).
///
/// `thread_count` of `None` means the vertex builder uses the detected
/// hardware concurrency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererConfig {
    pub max_quads_per_batch: u32,
    pub max_texture_slots: u32,
    pub thread_count: Option<usize>,
}

impl RendererConfig {
    pub fn new(max_quads_per_batch: u32, max_texture_slots: u32) -> Self {
        Self {
            max_quads_per_batch,
            max_texture_slots,
            thread_count: None,
        }
    }

    pub fn with_max_quads(mut self, max_quads_per_batch: u32) -> Self {
        self.max_quads_per_batch = max_quads_per_batch;
        self
    }

    pub fn with_texture_slots(mut self, max_texture_slots: u32) -> Self {
        self.max_texture_slots = max_texture_slots;
        self
    }

    pub fn with_thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = Some(thread_count);
        self
    }

    /// Checks that the configuration can back a renderer.
    ///
    /// Slot 0 is reserved for the white texture, so at least two slots are
    /// needed for textured quads to be drawable at all.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_quads_per_batch == 0 {
            bail!("max_quads_per_batch must be at least 1");
        }
        self.max_quads_per_batch
            .checked_mul(VERTICES_PER_QUAD)
            .context("max_quads_per_batch * 4 vertices does not fit a u32 index")?;
        self.max_quads_per_batch
            .checked_mul(INDICES_PER_QUAD)
            .context("max_quads_per_batch * 6 indices does not fit a u32 index count")?;
        if self.max_texture_slots < 2 {
            bail!(
                "max_texture_slots is {}, but slot 0 is reserved and at least one more slot is required",
                self.max_texture_slots
            );
        }
        if self.thread_count == Some(0) {
            bail!("thread_count must be at least 1");
        }
        Ok(())
    }

    pub fn vertex_capacity(&self) -> usize {
        self.max_quads_per_batch as usize * VERTICES_PER_QUAD as usize
    }

    pub fn index_capacity(&self) -> usize {
        self.max_quads_per_batch as usize * INDICES_PER_QUAD as usize
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::new(MAX_QUADS_PER_BATCH, MAX_TEXTURE_SLOTS)
    }
}
