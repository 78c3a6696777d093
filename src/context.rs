use anyhow::Context as _;

/// The GPU device and queue a [`WgpuBackend`](crate::render::WgpuBackend)
/// submits to.
///
/// Windowing is left to the caller: pass the surface to
/// [`GpuContext::new`] to get an adapter able to present to it, or use
/// [`GpuContext::headless`] for off-screen rendering.
#[derive(Debug)]
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub async fn new(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> anyhow::Result<Self> {
        log::info!("WGPU setup");
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter found")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("batch renderer device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .context("failed to create GPU device")?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// A context without any surface, for render-to-texture use.
    pub async fn headless() -> anyhow::Result<Self> {
        let mut descriptor = wgpu::InstanceDescriptor::new_without_display_handle();
        descriptor.backends = wgpu::Backends::PRIMARY;
        let instance = wgpu::Instance::new(descriptor);
        Self::new(instance, None).await
    }

    /// Blocking variant of [`headless`](Self::headless).
    pub fn headless_blocking() -> anyhow::Result<Self> {
        futures::executor::block_on(Self::headless())
    }
}
