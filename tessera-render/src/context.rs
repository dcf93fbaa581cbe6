//! GPU context — owns the `wgpu::Device`, `Queue`, and optional
//! window surface.
//!
//! `headless()` skips the surface entirely (tests, CI); `for_window()`
//! configures an sRGB swapchain with vsync. Both paths share the same
//! adapter/device bring-up.

use thiserror::Error;
use wgpu::{
    Adapter, Device, DeviceDescriptor, Instance, InstanceDescriptor, PowerPreference, Queue,
    RequestAdapterOptions, Surface, SurfaceConfiguration, TextureFormat, TextureUsages,
};

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
}

/// Core GPU state shared by the whole draw layer.
pub struct RenderContext {
    pub device: Device,
    pub queue: Queue,
    /// Present only when rendering to a window.
    pub surface: Option<Surface<'static>>,
    pub surface_config: Option<SurfaceConfiguration>,
    pub surface_format: TextureFormat,
}

impl RenderContext {
    /// Context without a window, for off-screen rendering and tests.
    pub async fn headless() -> Result<Self, GpuError> {
        let instance = Instance::new(&InstanceDescriptor::default());
        let (_, device, queue) = request_device(&instance, None).await?;

        Ok(Self {
            device,
            queue,
            surface: None,
            surface_config: None,
            surface_format: TextureFormat::Bgra8UnormSrgb,
        })
    }

    /// Context presenting to `window` at `width`×`height`.
    pub async fn for_window<W>(window: W, width: u32, height: u32) -> Result<Self, GpuError>
    where
        W: wgpu::WasmNotSendSync + Into<wgpu::SurfaceTarget<'static>>,
    {
        let instance = Instance::new(&InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;
        let (adapter, device, queue) = request_device(&instance, Some(&surface)).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface: Some(surface),
            surface_config: Some(config),
            surface_format: format,
        })
    }

    /// Reconfigure the surface after a resize. No-op if headless or if
    /// either dimension is zero (minimized window).
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let (Some(surface), Some(config)) = (&self.surface, &mut self.surface_config) {
            config.width = width;
            config.height = height;
            surface.configure(&self.device, config);
        }
    }

    /// Current surface dimensions, or `(0, 0)` when headless.
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_config
            .as_ref()
            .map(|c| (c.width, c.height))
            .unwrap_or((0, 0))
    }
}

async fn request_device(
    instance: &Instance,
    compatible_surface: Option<&Surface<'_>>,
) -> Result<(Adapter, Device, Queue), GpuError> {
    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::HighPerformance,
            compatible_surface,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(GpuError::NoAdapter)?;

    log::info!("rendering on {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                label: Some("tessera"),
                ..Default::default()
            },
            None,
        )
        .await?;
    Ok((adapter, device, queue))
}

// ===================================================================
// Tests
// ===================================================================
