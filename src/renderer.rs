//! Begin/draw/flush/end scheduling for batched quads.
//!
//! A [`BatchRenderer`] owns every piece of batch state: the quad buffer, the
//! texture-slot table, the vertex builder and the backend it submits to.
//!
//! # Lifecycle
//!
//! 1. `begin_scene()` caches view/projection and resets the frame statistics
//! 2. `draw_quad()` / `draw_textured_quad()` accumulate quads, flushing
//!    whenever the quad buffer or the texture-slot table fills up
//! 3. `end_scene()` flushes whatever is left and presents
//!
//! A flush expands the pending quads into vertices in parallel, uploads them,
//! binds the batch's textures and issues exactly one indexed draw.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::{
    backend::{DrawBackend, U_PROJ, U_TEX_SLOTS, U_VIEW, UniformSink},
    batch::{buffer::QuadBatchBuffer, builder::ParallelVertexBuilder, slots::TextureSlotTable},
    camera::Camera,
    config::{INDICES_PER_QUAD, RendererConfig},
    data_structures::{geometry, quad::WHITE_TEXTURE_SLOT, texture::TextureHandle, transform::Transform},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneState {
    /// Between scenes. Drawing is not allowed.
    Idle,
    /// Inside `begin_scene`..`end_scene`.
    Accumulating,
    /// A flush is in progress.
    Flushing,
}

/// Diagnostic counters for the current, or last finished, frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub quads: u32,
    /// Distinct texture registrations this frame, white texture included.
    pub textures: u32,
}

pub struct BatchRenderer<B> {
    config: RendererConfig,
    backend: B,
    quads: QuadBatchBuffer,
    slots: TextureSlotTable,
    builder: ParallelVertexBuilder,
    state: SceneState,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    stats: FrameStats,
}

impl<B: DrawBackend + UniformSink> BatchRenderer<B> {
    /// Sizes all buffers from `config` and primes the backend.
    ///
    /// Fails if the configuration is invalid or the vertex builder cannot
    /// determine how many threads to use. Nothing is submitted to the backend
    /// in that case.
    pub fn new(config: RendererConfig, mut backend: B) -> anyhow::Result<Self> {
        config.validate()?;
        let builder = match config.thread_count {
            Some(threads) => ParallelVertexBuilder::new(threads)?,
            None => ParallelVertexBuilder::detect()?,
        };

        let indices = geometry::build_indices(config.max_quads_per_batch);
        debug_assert_eq!(indices.len(), config.index_capacity());
        backend.upload_index_buffer(&indices);
        backend.bind_texture(TextureHandle::WHITE, WHITE_TEXTURE_SLOT);
        let samplers: Vec<i32> = (0..config.max_texture_slots as i32).collect();
        backend.set_int_array(U_TEX_SLOTS, &samplers);

        log::info!(
            "Batch renderer ready: {} quads per batch, {} texture slots, {} vertex threads",
            config.max_quads_per_batch,
            config.max_texture_slots,
            builder.thread_count()
        );

        Ok(Self {
            quads: QuadBatchBuffer::new(config.max_quads_per_batch as usize),
            slots: TextureSlotTable::new(config.max_texture_slots as usize),
            builder,
            backend,
            config,
            state: SceneState::Idle,
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            stats: FrameStats::default(),
        })
    }

    pub fn begin_scene(&mut self, camera: &Camera) {
        assert_eq!(
            self.state,
            SceneState::Idle,
            "begin_scene called while a scene is already open"
        );
        self.stats = FrameStats {
            textures: 1,
            ..Default::default()
        };
        self.view = camera.view_matrix();
        self.projection = camera.projection_matrix();
        self.state = SceneState::Accumulating;
    }

    /// Queues a solid-colour quad.
    pub fn draw_quad(&mut self, transform: &Transform, color: Vector3<f32>) {
        self.expect_accumulating("draw_quad");
        self.stats.quads += 1;
        if self.quads.push_untextured(*transform, color) {
            self.flush();
        }
    }

    /// Queues a textured quad.
    ///
    /// The quad that registers the last free texture slot is still part of
    /// the batch it fills; the flush happens right after it is queued.
    pub fn draw_textured_quad(
        &mut self,
        transform: &Transform,
        texture: &TextureHandle,
        tiling_factor: f32,
        color_tint: Vector3<f32>,
    ) {
        self.expect_accumulating("draw_textured_quad");
        let newly_bound = self.slots.find(texture).is_none();
        let slot = match self.slots.resolve(texture) {
            Some(slot) => slot,
            None => {
                self.flush();
                self.slots
                    .resolve(texture)
                    .expect("texture slot table must accept a texture right after a flush")
            }
        };
        if newly_bound {
            self.stats.textures += 1;
        }
        self.stats.quads += 1;

        let quads_full = self.quads.push_textured(*transform, slot, tiling_factor, color_tint);
        if quads_full || self.slots.is_full() {
            self.flush();
        }
    }

    pub fn end_scene(&mut self) {
        self.expect_accumulating("end_scene");
        if !self.quads.is_empty() || self.slots.active_count() > 1 {
            self.flush();
        }
        self.backend.present();
        self.state = SceneState::Idle;
        log::debug!(
            "Scene finished: {} draw calls, {} quads, {} textures",
            self.stats.draw_calls,
            self.stats.quads,
            self.stats.textures
        );
    }

    fn flush(&mut self) {
        if self.quads.is_empty() {
            // Nothing to draw; never submit an empty draw call.
            self.slots.reset();
            return;
        }
        self.state = SceneState::Flushing;

        let quad_count = self.quads.len();
        log::trace!(
            "Flushing {} quads with {} active texture slots",
            quad_count,
            self.slots.active_count()
        );

        let vertices = self.quads.expand(&self.builder);
        self.backend.set_matrix4(U_VIEW, &self.view);
        self.backend.set_matrix4(U_PROJ, &self.projection);
        self.backend
            .upload_vertex_range(bytemuck::cast_slice(vertices), 0);
        self.slots.bind_all(&mut self.backend);
        self.backend
            .draw_indexed(quad_count as u32 * INDICES_PER_QUAD);

        self.quads.clear();
        self.slots.reset();
        self.stats.draw_calls += 1;
        self.state = SceneState::Accumulating;
    }

    fn expect_accumulating(&self, operation: &str) {
        assert_eq!(
            self.state,
            SceneState::Accumulating,
            "{operation} called outside begin_scene/end_scene"
        );
    }
}

impl<B> BatchRenderer<B> {
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Quads waiting for the next flush.
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// Occupied texture slots, the reserved white slot included.
    pub fn active_texture_slots(&self) -> usize {
        self.slots.active_count()
    }

    pub fn thread_count(&self) -> usize {
        self.builder.thread_count()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
