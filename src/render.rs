//! A [`DrawBackend`] and [`UniformSink`] on top of wgpu.
//!
//! [`WgpuBackend`] owns every GPU resource a batch needs: the preallocated
//! vertex buffer, the index buffer, the camera uniform, a registry of textures
//! and a depth buffer matching the current frame target.
//!
//! # Frame protocol
//!
//! 1. [`begin_frame`](WgpuBackend::begin_frame) hands over the colour target
//! 2. each flush of the batch renderer becomes one render pass and one queue
//!    submission; the first pass of the frame clears, later passes load
//! 3. [`present`](DrawBackend::present) clears the target if nothing was drawn
//!    and releases it; presenting the surface is left to the caller
//!
//! Submitting per flush keeps successive batches from overwriting each other's
//! vertex data: every `write_buffer` lands before the pass that reads it.

use std::iter;

use anyhow::bail;
use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::{
    backend::{DrawBackend, U_PROJ, U_TEX_SLOTS, U_VIEW, UniformSink},
    config::RendererConfig,
    context::GpuContext,
    data_structures::{
        quad::Vertex,
        texture::{Texture, TextureHandle, create_repeat_sampler},
    },
    pipelines::quad::{
        CameraUniform, SHADER_TEXTURE_SLOTS, mk_camera_bind_group_layout, mk_quad_pipeline,
        mk_texture_slots_bind_group, mk_texture_slots_layout,
    },
};

/// Converts GL clip space (depth in [-1, 1]) to wgpu clip space ([0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// The colour attachment of the frame currently being drawn.
struct FrameTarget {
    view: wgpu::TextureView,
    cleared: bool,
}

pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    sampler: wgpu::Sampler,
    /// Index = texture id; id 0 is the white texture.
    textures: Vec<Texture>,
    /// Texture id bound to each slot for the next draw.
    bound: Vec<u32>,
    depth_texture: Texture,
    target: Option<FrameTarget>,
    pub clear_colour: wgpu::Color,
    submissions: u32,
}

impl WgpuBackend {
    /// Allocates buffers for `config` and compiles the quad pipeline for
    /// targets of `color_format`.
    pub fn new(
        ctx: &GpuContext,
        color_format: wgpu::TextureFormat,
        config: &RendererConfig,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        if config.max_texture_slots > SHADER_TEXTURE_SLOTS {
            bail!(
                "the quad shader declares {} texture slots but {} were requested",
                SHADER_TEXTURE_SLOTS,
                config.max_texture_slots
            );
        }
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        let camera_layout = mk_camera_bind_group_layout(&device);
        let texture_layout = mk_texture_slots_layout(&device);
        let pipeline = mk_quad_pipeline(&device, color_format, &camera_layout, &texture_layout);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::new()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Batch Vertex Buffer"),
            size: (config.vertex_capacity() * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let white = Texture::create_white(&device, &queue);
        let sampler = create_repeat_sampler(&device);
        let depth_texture = Texture::create_depth_texture(&device, [1, 1], "depth_texture");

        Ok(Self {
            pipeline,
            texture_layout,
            camera_buffer,
            camera_bind_group,
            vertex_buffer,
            index_buffer: None,
            sampler,
            textures: vec![white],
            bound: vec![TextureHandle::WHITE.id(); SHADER_TEXTURE_SLOTS as usize],
            depth_texture,
            target: None,
            clear_colour: wgpu::Color::BLACK,
            submissions: 0,
            device,
            queue,
        })
    }

    /// Takes ownership of `texture` and returns the handle to batch it with.
    pub fn register_texture(&mut self, texture: Texture) -> TextureHandle {
        let id = self.textures.len() as u32;
        let handle = TextureHandle::new(id, texture.size[0], texture.size[1], texture.channels);
        self.textures.push(texture);
        handle
    }

    /// Decodes image file bytes and registers the result.
    pub fn load_texture(&mut self, bytes: &[u8], label: &str) -> anyhow::Result<TextureHandle> {
        let texture = Texture::from_bytes(&self.device, &self.queue, bytes, label, None)?;
        Ok(self.register_texture(texture))
    }

    /// Like [`load_texture`](Self::load_texture) with an explicit format
    /// extension such as `"png"`.
    pub fn load_texture_with_format(
        &mut self,
        bytes: &[u8],
        label: &str,
        format: &str,
    ) -> anyhow::Result<TextureHandle> {
        let texture = Texture::from_bytes(&self.device, &self.queue, bytes, label, Some(format))?;
        Ok(self.register_texture(texture))
    }

    pub fn texture(&self, handle: &TextureHandle) -> Option<&Texture> {
        self.textures.get(handle.id() as usize)
    }

    /// Sets the colour target for the next frame. `size` must match the
    /// target; the depth buffer is recreated when it changes.
    pub fn begin_frame(&mut self, view: wgpu::TextureView, size: [u32; 2]) {
        if self.depth_texture.size != [size[0].max(1), size[1].max(1)] {
            self.depth_texture = Texture::create_depth_texture(&self.device, size, "depth_texture");
        }
        self.target = Some(FrameTarget {
            view,
            cleared: false,
        });
        self.submissions = 0;
    }

    /// Queue submissions made for the current frame.
    pub fn submissions(&self) -> u32 {
        self.submissions
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn slot_textures(&self) -> Vec<&Texture> {
        self.bound
            .iter()
            .map(|id| &self.textures[*id as usize])
            .collect()
    }

    /// Records one render pass over `target` and submits it.
    fn submit_pass(&mut self, index_count: u32) {
        let Some(target) = self.target.as_mut() else {
            log::warn!("draw submitted without a frame target; call begin_frame first");
            return;
        };
        let load = if target.cleared {
            wgpu::LoadOp::Load
        } else {
            wgpu::LoadOp::Clear(self.clear_colour)
        };
        let depth_load = if target.cleared {
            wgpu::LoadOp::Load
        } else {
            wgpu::LoadOp::Clear(1.0)
        };
        target.cleared = true;

        let texture_group = (index_count > 0).then(|| {
            mk_texture_slots_bind_group(
                &self.device,
                &self.texture_layout,
                &self.slot_textures(),
                &self.sampler,
            )
        });
        let Some(target) = self.target.as_ref() else {
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Batch Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Batch Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            if let (Some(group), Some(index_buffer)) = (&texture_group, &self.index_buffer) {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_bind_group(1, group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..index_count, 0, 0..1);
            }
        }
        self.queue.submit(iter::once(encoder.finish()));
        self.submissions += 1;
    }
}

impl DrawBackend for WgpuBackend {
    fn upload_index_buffer(&mut self, indices: &[u32]) {
        self.index_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Batch Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        ));
    }

    fn upload_vertex_range(&mut self, bytes: &[u8], offset: u64) {
        if offset + bytes.len() as u64 > self.vertex_buffer.size() {
            log::error!(
                "vertex upload of {} bytes at {} overflows the {} byte vertex buffer",
                bytes.len(),
                offset,
                self.vertex_buffer.size()
            );
            return;
        }
        self.queue.write_buffer(&self.vertex_buffer, offset, bytes);
    }

    fn bind_texture(&mut self, texture: TextureHandle, slot: u32) {
        let Some(bound) = self.bound.get_mut(slot as usize) else {
            log::warn!("texture slot {} is outside the shader's slot range", slot);
            return;
        };
        if (texture.id() as usize) < self.textures.len() {
            *bound = texture.id();
        } else {
            log::warn!("texture id {} is not registered; slot {} samples white", texture.id(), slot);
            *bound = TextureHandle::WHITE.id();
        }
    }

    fn draw_indexed(&mut self, index_count: u32) {
        if self.index_buffer.is_none() {
            log::warn!("draw_indexed before the index buffer was uploaded");
            return;
        }
        self.submit_pass(index_count);
        // Slot bindings only live for one batch.
        self.bound.fill(TextureHandle::WHITE.id());
    }

    fn present(&mut self) {
        if self.target.as_ref().is_some_and(|target| !target.cleared) {
            self.submit_pass(0);
        }
        self.target = None;
    }
}

impl UniformSink for WgpuBackend {
    fn set_matrix4(&mut self, name: &str, value: &Matrix4<f32>) {
        let (offset, matrix) = match name {
            U_VIEW => (CameraUniform::VIEW_OFFSET, *value),
            U_PROJ => (CameraUniform::PROJ_OFFSET, OPENGL_TO_WGPU_MATRIX * *value),
            _ => {
                log::warn!("unknown matrix uniform {}", name);
                return;
            }
        };
        let raw: [[f32; 4]; 4] = matrix.into();
        self.queue
            .write_buffer(&self.camera_buffer, offset, bytemuck::cast_slice(&[raw]));
    }

    fn set_int_array(&mut self, name: &str, values: &[i32]) {
        if name == U_TEX_SLOTS {
            // Slots map to binding indices in the bind group layout.
            let missing = slots_without_binding(values);
            if missing.is_empty() {
                log::debug!("{} texture sampler slots requested", values.len());
            } else {
                log::warn!(
                    "sampler slots {:?} have no binding in the quad shader ({} slots)",
                    missing,
                    SHADER_TEXTURE_SLOTS
                );
            }
        } else {
            log::warn!("unknown int array uniform {}", name);
        }
    }
}

/// Requested sampler slots outside the shader's texture bindings.
fn slots_without_binding(values: &[i32]) -> Vec<i32> {
    values
        .iter()
        .copied()
        .filter(|slot| !(0..SHADER_TEXTURE_SLOTS as i32).contains(slot))
        .collect()
}
