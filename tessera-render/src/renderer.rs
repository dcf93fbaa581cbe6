//! Frame orchestration: batch quads by page, upload once, then issue
//! one draw call per page with that page's texture bound.

use std::ops::Range;

use thiserror::Error;
use tessera_text::{GlyphVertex, PageId, Quad};
use wgpu::{
    Color, CommandEncoderDescriptor, LoadOp, Operations, RenderPassColorAttachment,
    RenderPassDescriptor, StoreOp, TextureViewDescriptor,
};

use crate::context::RenderContext;
use crate::pipelines::TextPipeline;
use crate::textures::AtlasTextures;
use crate::vertex::CameraUniform;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("no surface configured (headless mode)")]
    NoSurface,
}

/// Statistics for one rendered frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameStats {
    /// Glyph quads drawn.
    pub quads: u32,
    /// Draw calls issued (one per touched page).
    pub draw_calls: u32,
}

/// Ties the text pipeline and per-frame uploads together.
///
/// # Usage
///
/// ```ignore
/// let mut renderer = Renderer::new(&ctx);
/// let textures = AtlasTextures::new(&ctx, renderer.page_layout());
/// // ... place glyphs through an Atlas built over `textures` ...
/// renderer.prepare(&ctx, &run.quads, &camera, [0.0, 0.0, 0.0, 1.0]);
/// let stats = renderer.render_to_surface(&ctx, atlas.surfaces())?;
/// ```
pub struct Renderer {
    text: TextPipeline,
    clear_color: Color,
    batches: Vec<(PageId, Range<u32>)>,
}

impl Renderer {
    pub fn new(ctx: &RenderContext) -> Self {
        Self {
            text: TextPipeline::new(&ctx.device, ctx.surface_format),
            clear_color: Color::WHITE,
            batches: Vec::new(),
        }
    }

    /// Layout for page texture bind groups; hand this to
    /// [`AtlasTextures::new`].
    pub fn page_layout(&self) -> &wgpu::BindGroupLayout {
        self.text.page_layout()
    }

    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.clear_color = Color { r, g, b, a };
    }

    /// Upload this frame's quads, projection, and text color.
    pub fn prepare(
        &mut self,
        ctx: &RenderContext,
        quads: &[Quad],
        camera: &CameraUniform,
        color: [f32; 4],
    ) {
        let (vertices, batches) = batch_by_page(quads);
        self.text.upload_vertices(&ctx.queue, &vertices);
        self.text.upload_camera(&ctx.queue, camera);
        self.text.upload_color(&ctx.queue, color);
        self.batches = batches;
    }

    /// Render the prepared frame to the window surface.
    pub fn render_to_surface(
        &self,
        ctx: &RenderContext,
        textures: &AtlasTextures,
    ) -> Result<FrameStats, RenderError> {
        let surface = ctx.surface.as_ref().ok_or(RenderError::NoSurface)?;
        let output = surface.get_current_texture()?;
        let view = output.texture.create_view(&TextureViewDescriptor::default());

        let stats = self.encode(ctx, &view, textures);
        output.present();
        Ok(stats)
    }

    /// Render the prepared frame to an off-screen view (headless mode).
    pub fn render_to_texture(
        &self,
        ctx: &RenderContext,
        target_view: &wgpu::TextureView,
        textures: &AtlasTextures,
    ) -> FrameStats {
        self.encode(ctx, target_view, textures)
    }

    fn encode(
        &self,
        ctx: &RenderContext,
        view: &wgpu::TextureView,
        textures: &AtlasTextures,
    ) -> FrameStats {
        let mut encoder = ctx.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("tessera_frame_encoder"),
        });

        let mut draw_calls = 0;
        {
            let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("tessera_text_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for (page, range) in &self.batches {
                let Some(bind_group) = textures.bind_group(*page) else {
                    log::error!("quad references page {page} with no texture");
                    continue;
                };
                self.text.draw_range(&mut pass, bind_group, range.clone());
                draw_calls += 1;
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));

        FrameStats {
            quads: self.text.vertex_count() / 6,
            draw_calls,
        }
    }
}

/// Flatten quads into one vertex array grouped by page, preserving
/// emission order within each page. Returns the vertices plus the
/// per-page ranges into them.
fn batch_by_page(quads: &[Quad]) -> (Vec<GlyphVertex>, Vec<(PageId, Range<u32>)>) {
    let mut per_page: Vec<Vec<GlyphVertex>> = Vec::new();
    for quad in quads {
        if per_page.len() <= quad.page {
            per_page.resize_with(quad.page + 1, Vec::new);
        }
        per_page[quad.page].extend_from_slice(&quad.vertices);
    }

    let mut vertices = Vec::with_capacity(quads.len() * 6);
    let mut batches = Vec::new();
    for (page, page_vertices) in per_page.into_iter().enumerate() {
        if page_vertices.is_empty() {
            continue;
        }
        let start = vertices.len() as u32;
        vertices.extend(page_vertices);
        batches.push((page, start..vertices.len() as u32));
    }
    (vertices, batches)
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_on(page: PageId, x: f32) -> Quad {
        let v = GlyphVertex { pos: [x, 0.0], uv: [0.0, 0.0] };
        Quad { page, vertices: [v; 6] }
    }

    #[test]
    fn test_batching_groups_by_page_in_order() {
        let quads = [quad_on(0, 1.0), quad_on(1, 2.0), quad_on(0, 3.0)];
        let (vertices, batches) = batch_by_page(&quads);

        assert_eq!(vertices.len(), 18);
        assert_eq!(batches, vec![(0, 0..12), (1, 12..18)]);
        // Page 0 kept its two quads in emission order.
        assert_eq!(vertices[0].pos[0], 1.0);
        assert_eq!(vertices[6].pos[0], 3.0);
        assert_eq!(vertices[12].pos[0], 2.0);
    }

    #[test]
    fn test_batching_skips_untouched_pages() {
        let quads = [quad_on(2, 5.0)];
        let (vertices, batches) = batch_by_page(&quads);

        assert_eq!(vertices.len(), 6);
        assert_eq!(batches, vec![(2, 0..6)]);
    }

    #[test]
    fn test_batching_empty_input() {
        let (vertices, batches) = batch_by_page(&[]);
        assert!(vertices.is_empty());
        assert!(batches.is_empty());
    }

    #[test]
    fn test_headless_frame_renders() {
        // Needs a GPU — skip gracefully without one.
        let Ok(ctx) = pollster::block_on(RenderContext::headless()) else {
            return;
        };
        let mut renderer = Renderer::new(&ctx);
        let textures = AtlasTextures::new(&ctx, renderer.page_layout());
        let mut alloc = tessera_text::PageAllocator::new(64, textures);
        alloc.place(8, 8, &[0xFF; 64]).unwrap();

        let target = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen_target"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&TextureViewDescriptor::default());

        let camera = CameraUniform::orthographic(64.0, 64.0);
        renderer.prepare(&ctx, &[quad_on(0, 4.0)], &camera, [0.0, 0.0, 0.0, 1.0]);
        let stats = renderer.render_to_texture(&ctx, &view, alloc.surfaces());

        assert_eq!(stats.quads, 1);
        assert_eq!(stats.draw_calls, 1);
    }
}
