//! Text render pipeline — draws pre-built glyph quads from a shared
//! vertex buffer, one contiguous range per atlas page.
//!
//! Bind groups: camera (0), page texture + sampler (1), text color (2).
//! The page group is supplied per draw by the caller, since a single
//! string may span several pages.

use std::ops::Range;

use tessera_text::GlyphVertex;
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingType, BlendState, Buffer, BufferBindingType, BufferDescriptor,
    BufferUsages, ColorTargetState, ColorWrites, Device, FragmentState, FrontFace,
    MultisampleState, PipelineCompilationOptions, PipelineLayoutDescriptor, PolygonMode,
    PrimitiveState, PrimitiveTopology, Queue, RenderPass, RenderPipeline,
    RenderPipelineDescriptor, SamplerBindingType, ShaderModuleDescriptor, ShaderStages,
    TextureFormat, TextureSampleType, TextureViewDimension, VertexState,
};

use crate::vertex::{glyph_vertex_layout, CameraUniform, TextColor};

/// Largest number of glyph quads a single frame can hold.
const MAX_QUADS: usize = 16_384;

/// Owns the wgpu pipeline, vertex buffer, and uniform bind groups.
pub struct TextPipeline {
    pipeline: RenderPipeline,

    vertex_buffer: Buffer,
    vertex_count: u32,

    camera_buffer: Buffer,
    camera_bind_group: BindGroup,

    color_buffer: Buffer,
    color_bind_group: BindGroup,

    page_layout: BindGroupLayout,
}

impl TextPipeline {
    pub fn new(device: &Device, surface_format: TextureFormat) -> Self {
        // ── Shader ──────────────────────────────────────────────
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("text_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/text.wgsl").into()),
        });

        // ── Camera bind group layout (group 0) ──────────────────
        let camera_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("text_camera_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // ── Page texture bind group layout (group 1) ────────────
        let page_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("text_page_bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // ── Text color bind group layout (group 2) ──────────────
        let color_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("text_color_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // ── Pipeline ────────────────────────────────────────────
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("text_pipeline_layout"),
            bind_group_layouts: &[&camera_layout, &page_layout, &color_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("text_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[glyph_vertex_layout()],
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // ── Buffers + uniform bind groups ───────────────────────
        let vertex_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("text_vertices"),
            size: (MAX_QUADS * 6 * std::mem::size_of::<GlyphVertex>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("text_camera_ub"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("text_camera_bg"),
            layout: &camera_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let color_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("text_color_ub"),
            size: std::mem::size_of::<TextColor>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let color_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("text_color_bg"),
            layout: &color_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: color_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            camera_buffer,
            camera_bind_group,
            color_buffer,
            color_bind_group,
            page_layout,
        }
    }

    /// Layout page textures must be bound with (group 1).
    pub fn page_layout(&self) -> &BindGroupLayout {
        &self.page_layout
    }

    // ───────────────────── Upload ─────────────────────────────────

    /// Upload this frame's glyph vertices. Returns the count kept,
    /// clamped to a whole number of quads within capacity.
    pub fn upload_vertices(&mut self, queue: &Queue, vertices: &[GlyphVertex]) -> u32 {
        let count = vertices.len().min(MAX_QUADS * 6);
        if count < vertices.len() {
            log::warn!("frame dropped {} glyph vertices over capacity", vertices.len() - count);
        }
        if count > 0 {
            queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&vertices[..count]),
            );
        }
        self.vertex_count = count as u32;
        self.vertex_count
    }

    pub fn upload_camera(&self, queue: &Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
    }

    pub fn upload_color(&self, queue: &Queue, color: [f32; 4]) {
        queue.write_buffer(
            &self.color_buffer,
            0,
            bytemuck::bytes_of(&TextColor { color }),
        );
    }

    // ───────────────────── Draw ───────────────────────────────────

    /// Draw one contiguous vertex range with `page_bind_group` bound.
    pub fn draw_range<'a>(
        &'a self,
        pass: &mut RenderPass<'a>,
        page_bind_group: &'a BindGroup,
        range: Range<u32>,
    ) {
        if range.is_empty() || range.end > self.vertex_count {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(1, page_bind_group, &[]);
        pass.set_bind_group(2, &self.color_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(range, 0..1);
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
