//! Texture identities and GPU textures.
//!
//! The batching core only ever sees a [`TextureHandle`]: an opaque id plus the
//! image metadata. The GPU side lives in [`Texture`], which is owned by a
//! backend and outlives every batch that references it.

use std::hash::{Hash, Hasher};

use anyhow::*;
use image::{GenericImageView, ImageFormat, load_from_memory_with_format};

/// Non-owning reference to a texture registered with a backend.
///
/// Two handles are the same texture iff their ids match; the metadata rides
/// along for diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct TextureHandle {
    id: u32,
    width: u32,
    height: u32,
    channels: u32,
}

impl TextureHandle {
    /// The implicit 1x1 opaque white texture. Always bound at slot 0.
    pub const WHITE: TextureHandle = TextureHandle {
        id: 0,
        width: 1,
        height: 1,
        channels: 4,
    };

    pub const fn new(id: u32, width: u32, height: u32, channels: u32) -> Self {
        Self {
            id,
            width,
            height,
            channels,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn is_white(&self) -> bool {
        self.id == Self::WHITE.id
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TextureHandle {}

impl Hash for TextureHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A GPU texture and its default view. Sampling state is shared and owned
/// by the backend.
///
/// Created via [`from_bytes`](Self::from_bytes), [`from_image`](Self::from_image),
/// [`create_white`](Self::create_white) or
/// [`create_depth_texture`](Self::create_depth_texture).
#[derive(Clone, Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub size: [u32; 2],
    pub channels: u32,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// # Arguments
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let extent = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            size: [extent.width, extent.height],
            channels: 1,
        }
    }

    /// The 1x1 opaque white texture sampled by untextured quads.
    pub fn create_white(device: &wgpu::Device, queue: &wgpu::Queue) -> Texture {
        let pixel = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        Self::from_rgba(device, queue, &pixel, Some("white texture"))
    }

    /// Load a texture from raw byte data (image file contents).
    ///
    /// # Arguments
    ///
    /// * `bytes` represent raw image file data (PNG, JPEG, etc.)
    /// * `label` is used as a debug name for the GPU resource
    /// * `format` is an optional file extension hint (e.g., "png"). If None, auto-detect.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
        format: Option<&str>,
    ) -> Result<Self> {
        let img = match format {
            None => image::load_from_memory(bytes)?,
            Some(ext) => {
                let fmt = ImageFormat::from_extension(ext)
                    .with_context(|| format!("unknown image format '{ext}' for {label}"))?;
                load_from_memory_with_format(bytes, fmt)?
            }
        };
        Self::from_image(device, queue, &img, Some(label))
    }

    /// Upload a decoded image. The source channel count is kept as metadata;
    /// the GPU copy is always RGBA8 sRGB.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Result<Self> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            bail!("cannot create an empty {width}x{height} texture");
        }
        let channels = img.color().channel_count() as u32;
        let mut texture = Self::from_rgba(device, queue, &img.to_rgba8(), label);
        texture.channels = channels;
        Ok(texture)
    }

    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &image::RgbaImage,
        label: Option<&str>,
    ) -> Self {
        let dimensions = rgba.dimensions();
        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            size: [dimensions.0, dimensions.1],
            channels: 4,
        }
    }
}

/// Repeat addressing is what makes tiling factors above 1 tile.
pub fn create_repeat_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn handles_compare_by_id_only() {
        let a = TextureHandle::new(3, 64, 64, 4);
        let b = TextureHandle::new(3, 1, 1, 3);
        let c = TextureHandle::new(4, 64, 64, 4);
        assert_eq!(a, b);
        assert_ne!(a, c);
        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn white_handle_is_reserved_id_zero() {
        assert!(TextureHandle::WHITE.is_white());
        assert_eq!(TextureHandle::WHITE.width(), 1);
        assert!(!TextureHandle::new(1, 1, 1, 4).is_white());
    }
}
