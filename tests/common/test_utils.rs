use batch_ngin::{
    BatchRenderer, Camera, DrawBackend, Matrix4, RendererConfig, TextureHandle, Transform,
    UniformSink, Vector3,
};

/// Every call a [`BatchRenderer`] makes on its backend, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    UploadIndices(usize),
    UploadVertices { bytes: usize, offset: u64 },
    BindTexture { id: u32, slot: u32 },
    DrawIndexed(u32),
    Present,
    SetMatrix4(String),
    SetIntArray(String, Vec<i32>),
}

/// Backend double that only records what it is asked to do.
#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub indices: Vec<u32>,
    /// Raw bytes of the most recent vertex upload.
    pub last_vertices: Vec<u8>,
}

impl RecordingBackend {
    pub fn draw_calls(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DrawIndexed(count) => Some(*count),
                _ => None,
            })
            .collect()
    }

    /// Texture bindings issued since the last draw call.
    pub fn pending_bindings(&self) -> Vec<(u32, u32)> {
        self.calls
            .iter()
            .rev()
            .take_while(|call| !matches!(call, Call::DrawIndexed(_)))
            .filter_map(|call| match call {
                Call::BindTexture { id, slot } => Some((*id, *slot)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DrawBackend for RecordingBackend {
    fn upload_index_buffer(&mut self, indices: &[u32]) {
        self.indices = indices.to_vec();
        self.calls.push(Call::UploadIndices(indices.len()));
    }

    fn upload_vertex_range(&mut self, bytes: &[u8], offset: u64) {
        self.last_vertices = bytes.to_vec();
        self.calls.push(Call::UploadVertices {
            bytes: bytes.len(),
            offset,
        });
    }

    fn bind_texture(&mut self, texture: TextureHandle, slot: u32) {
        self.calls.push(Call::BindTexture {
            id: texture.id(),
            slot,
        });
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.calls.push(Call::DrawIndexed(index_count));
    }

    fn present(&mut self) {
        self.calls.push(Call::Present);
    }
}

impl UniformSink for RecordingBackend {
    fn set_matrix4(&mut self, name: &str, _value: &Matrix4<f32>) {
        self.calls.push(Call::SetMatrix4(name.to_string()));
    }

    fn set_int_array(&mut self, name: &str, values: &[i32]) {
        self.calls
            .push(Call::SetIntArray(name.to_string(), values.to_vec()));
    }
}

pub fn recording_renderer(config: RendererConfig) -> BatchRenderer<RecordingBackend> {
    BatchRenderer::new(config, RecordingBackend::default()).expect("valid test config")
}

/// `n` distinct non-white textures with ids starting at 1.
pub fn textures(n: u32) -> Vec<TextureHandle> {
    (1..=n).map(|id| TextureHandle::new(id, 32, 32, 4)).collect()
}

pub fn camera() -> Camera {
    Camera::new(Vector3::new(0.0, 0.0, -2.0), batch_ngin::Deg(90.0), 1.0)
}

pub fn at(x: f32, y: f32) -> Transform {
    Transform::new().with_location(Vector3::new(x, y, 0.0))
}

/// Small deterministic xorshift generator for scripted draw sequences.
pub struct XorShift(pub u64);

impl XorShift {
    pub fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

#[cfg(feature = "integration-tests")]
pub mod gpu {
    use std::time::Duration;

    /// Colour target that can be copied back to the CPU.
    pub struct OffscreenTarget {
        pub texture: wgpu::Texture,
        pub size: [u32; 2],
    }

    pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    impl OffscreenTarget {
        /// `size[0] * 4` must be a multiple of 256 for the readback copy.
        pub fn new(device: &wgpu::Device, size: [u32; 2]) -> Self {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("offscreen target"),
                size: wgpu::Extent3d {
                    width: size[0],
                    height: size[1],
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TARGET_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            });
            Self { texture, size }
        }

        pub fn view(&self) -> wgpu::TextureView {
            self.texture
                .create_view(&wgpu::TextureViewDescriptor::default())
        }

        pub fn read(
            &self,
            device: &wgpu::Device,
            queue: &wgpu::Queue,
        ) -> image::ImageBuffer<image::Rgba<u8>, Vec<u8>> {
            let u32_size = std::mem::size_of::<u32>() as u32;
            let [width, height] = self.size;
            let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                size: (u32_size * width * height) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                label: None,
                mapped_at_creation: false,
            });
            let mut encoder =
                device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &self.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &output_buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(u32_size * width),
                        rows_per_image: Some(height),
                    },
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
            queue.submit(std::iter::once(encoder.finish()));

            futures::executor::block_on(async {
                let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
                let buffer_slice = output_buffer.slice(..);
                buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
                    tx.send(result).unwrap();
                });
                device
                    .poll(wgpu::PollType::Wait {
                        submission_index: None,
                        timeout: Some(Duration::from_secs(3)),
                    })
                    .unwrap();
                rx.receive().await.unwrap().unwrap();
                let data = buffer_slice.get_mapped_range().to_vec();
                image::ImageBuffer::from_raw(width, height, data).unwrap()
            })
        }
    }
}
