//! Page surfaces on the GPU — the wgpu backend behind the atlas.
//!
//! Each atlas page is its own `R8Unorm` texture with a prebuilt bind
//! group, created zero-initialized when the allocator grows and
//! written with `queue.write_texture` once per placed glyph. Textures
//! are released on drop, with the atlas that owns them.

use tessera_text::{PageId, PageSurfaces};
use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindingResource,
    Device, Extent3d, FilterMode, Queue, Sampler, SamplerDescriptor, Texture, TextureDescriptor,
    TextureDimension, TextureFormat, TextureUsages,
};

use crate::context::RenderContext;

/// One wgpu texture + bind group per atlas page.
pub struct AtlasTextures {
    device: Device,
    queue: Queue,
    layout: BindGroupLayout,
    sampler: Sampler,
    textures: Vec<Texture>,
    bind_groups: Vec<BindGroup>,
}

impl AtlasTextures {
    /// `page_layout` is the pipeline's texture+sampler bind group
    /// layout (see [`crate::renderer::Renderer::page_layout`]).
    pub fn new(ctx: &RenderContext, page_layout: &BindGroupLayout) -> Self {
        let sampler = ctx.device.create_sampler(&SamplerDescriptor {
            label: Some("glyph_page_sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..Default::default()
        });

        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            layout: page_layout.clone(),
            sampler,
            textures: Vec::new(),
            bind_groups: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.textures.len()
    }

    /// Bind group for one page, to bind before drawing its quads.
    pub fn bind_group(&self, page: PageId) -> Option<&BindGroup> {
        self.bind_groups.get(page)
    }
}

impl PageSurfaces for AtlasTextures {
    fn create_page(&mut self, side: u32) {
        // wgpu guarantees new textures read as zero.
        let texture = self.device.create_texture(&TextureDescriptor {
            label: Some("glyph_page"),
            size: Extent3d {
                width: side,
                height: side,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::R8Unorm,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&BindGroupDescriptor {
            label: Some("glyph_page_bg"),
            layout: &self.layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(&view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.textures.push(texture);
        self.bind_groups.push(bind_group);
        log::debug!("glyph page {} created at {side}x{side}", self.textures.len() - 1);
    }

    fn upload(&mut self, page: PageId, x: u32, y: u32, width: u32, height: u32, coverage: &[u8]) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.textures[page],
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            coverage,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width),
                rows_per_image: Some(height),
            },
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

// ===================================================================
// Tests
// ===================================================================
