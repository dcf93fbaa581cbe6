//! GPU-visible uniform types and the glyph vertex layout.
//!
//! All types derive `bytemuck::Pod` + `Zeroable` for zero-copy upload.
//! The vertex type itself lives in `tessera-text` (the layout emits
//! it); this module only describes it to wgpu.

use bytemuck::{Pod, Zeroable};
use tessera_text::GlyphVertex;
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Buffer layout for [`tessera_text::GlyphVertex`]:
/// position at location 0, atlas uv at location 1.
pub fn glyph_vertex_layout() -> VertexBufferLayout<'static> {
    static ATTRS: &[VertexAttribute] = &[
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x2,
        },
        VertexAttribute {
            offset: 8,
            shader_location: 1,
            format: VertexFormat::Float32x2,
        },
    ];
    VertexBufferLayout {
        array_stride: std::mem::size_of::<GlyphVertex>() as BufferAddress,
        step_mode: VertexStepMode::Vertex,
        attributes: ATTRS,
    }
}

/// Viewport projection sent to the GPU once per frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// 4×4 orthographic projection matrix (column-major).
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Orthographic projection for a `width`×`height` viewport:
    /// (0,0) maps to the top-left corner, y grows downward.
    pub fn orthographic(width: f32, height: f32) -> Self {
        let sx = 2.0 / width;
        let sy = -2.0 / height;
        Self {
            view_proj: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0, 1.0],
            ],
        }
    }
}

/// Uniform text color, modulating the sampled atlas alpha.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TextColor {
    pub color: [f32; 4],
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn project(cam: &CameraUniform, x: f32, y: f32) -> (f32, f32) {
        let vp = cam.view_proj;
        (
            x * vp[0][0] + y * vp[1][0] + vp[3][0],
            x * vp[0][1] + y * vp[1][1] + vp[3][1],
        )
    }

    #[test]
    fn test_glyph_vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<GlyphVertex>(), 16);
        let layout = glyph_vertex_layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.step_mode, VertexStepMode::Vertex);
        assert_eq!(layout.attributes[0].shader_location, 0); // pos
        assert_eq!(layout.attributes[1].shader_location, 1); // uv
        assert_eq!(layout.attributes[1].offset, 8);
    }

    #[test]
    fn test_camera_top_left_is_ndc_minus_one_one() {
        let cam = CameraUniform::orthographic(800.0, 600.0);
        let (x, y) = project(&cam, 0.0, 0.0);
        assert!((x + 1.0).abs() < 1e-5);
        assert!((y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_camera_bottom_right_is_ndc_one_minus_one() {
        let cam = CameraUniform::orthographic(800.0, 600.0);
        let (x, y) = project(&cam, 800.0, 600.0);
        assert!((x - 1.0).abs() < 1e-5);
        assert!((y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_camera_center_is_ndc_origin() {
        let cam = CameraUniform::orthographic(800.0, 600.0);
        let (x, y) = project(&cam, 400.0, 300.0);
        assert!(x.abs() < 1e-5);
        assert!(y.abs() < 1e-5);
    }

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
        assert_eq!(std::mem::size_of::<TextColor>(), 16);
    }
}
