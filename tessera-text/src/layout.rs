//! Text layout — walks a string through the glyph cache and emits one
//! textured quad per visible glyph.
//!
//! Coordinates are device-independent with the origin top-left and y
//! growing down; the pen rides the baseline. The pen advances for
//! every codepoint — whitespace and unrenderable glyphs move it
//! without contributing geometry — so a string's final pen position
//! depends only on the string and the scale.

use bytemuck::{Pod, Zeroable};

use crate::atlas::Atlas;
use crate::pages::AtlasError;
use crate::raster::Rasterizer;
use crate::surface::{PageId, PageSurfaces};

/// One corner of a glyph quad: screen position + atlas uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlyphVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

/// Two triangles covering one glyph. `page` names the texture the uv
/// coordinates are relative to; one string may span several pages.
#[derive(Clone, Copy, Debug)]
pub struct Quad {
    pub page: PageId,
    pub vertices: [GlyphVertex; 6],
}

/// Result of laying out one string: the quads plus the final pen
/// position, ready for the next run on the same line.
#[derive(Clone, Debug, Default)]
pub struct TextRun {
    pub quads: Vec<Quad>,
    pub pen_x: f32,
    pub pen_y: f32,
}

impl<R: Rasterizer, S: PageSurfaces> Atlas<R, S> {
    /// Lay out `text` starting at baseline `(pen_x, pen_y)`.
    ///
    /// Each call is independent and finite; quads come out in input
    /// order. `Err` only surfaces the fatal oversize configuration
    /// error — missing glyphs lay out as blank advances.
    pub fn layout_text(
        &mut self,
        text: &str,
        pen_x: f32,
        pen_y: f32,
        scale_x: f32,
        scale_y: f32,
    ) -> Result<TextRun, AtlasError> {
        let mut run = TextRun {
            quads: Vec::with_capacity(text.len()),
            pen_x,
            pen_y,
        };
        let inv_side = 1.0 / self.page_side() as f32;

        for ch in text.chars() {
            let glyph = *self.query(ch)?;

            let x0 = run.pen_x + glyph.bearing_left * scale_x;
            let y0 = run.pen_y - glyph.bearing_top * scale_y;
            let x1 = x0 + glyph.bitmap_w as f32 * scale_x;
            let y1 = y0 + glyph.bitmap_h as f32 * scale_y;

            // The pen moves for every glyph, visible or not.
            run.pen_x += glyph.advance_x * scale_x;
            run.pen_y += glyph.advance_y * scale_y;

            // Whitespace and unrenderable glyphs emit nothing.
            if glyph.bitmap_w == 0 || glyph.bitmap_h == 0 {
                continue;
            }

            let s0 = glyph.tex_offset_x;
            let t0 = glyph.tex_offset_y;
            let s1 = s0 + glyph.bitmap_w as f32 * inv_side;
            let t1 = t0 + glyph.bitmap_h as f32 * inv_side;

            let tl = GlyphVertex { pos: [x0, y0], uv: [s0, t0] };
            let tr = GlyphVertex { pos: [x1, y0], uv: [s1, t0] };
            let bl = GlyphVertex { pos: [x0, y1], uv: [s0, t1] };
            let br = GlyphVertex { pos: [x1, y1], uv: [s1, t1] };

            run.quads.push(Quad {
                page: glyph.page,
                vertices: [tl, tr, bl, tr, br, bl],
            });
        }

        Ok(run)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::mock::MockRaster;
    use crate::surface::CpuPages;

    // 'H' and 'i' both 8x10, advance 10; space zero-size, advance 2.
    fn demo_atlas() -> Atlas<MockRaster, CpuPages> {
        let raster = MockRaster::new(16.0)
            .glyph('H', 8, 10)
            .glyph('i', 8, 10)
            .glyph('é', 6, 12)
            .glyph(' ', 0, 0);
        Atlas::new(raster, CpuPages::new(), 64).unwrap()
    }

    #[test]
    fn test_two_visible_glyphs_make_two_quads() {
        let mut atlas = demo_atlas();
        let run = atlas.layout_text("Hi", 0.0, 0.0, 1.0, 1.0).unwrap();

        assert_eq!(run.quads.len(), 2);
        // Second quad's left edge sits one advance past the first's.
        let first_left = run.quads[0].vertices[0].pos[0];
        let second_left = run.quads[1].vertices[0].pos[0];
        assert_eq!(first_left, 1.0); // bearing_left
        assert_eq!(second_left, 10.0 + 1.0); // advance + bearing_left
    }

    #[test]
    fn test_quad_geometry_from_bearing_and_scale() {
        let mut atlas = demo_atlas();
        let run = atlas.layout_text("H", 5.0, 20.0, 2.0, 3.0).unwrap();

        let v = run.quads[0].vertices;
        // Top-left: pen + bearing_left*sx, pen - bearing_top*sy.
        assert_eq!(v[0].pos, [5.0 + 2.0, 20.0 - 30.0]);
        // Bottom-right: + bitmap size * scale.
        assert_eq!(v[4].pos, [7.0 + 16.0, -10.0 + 30.0]);
        // Pen advanced by advance_x * sx.
        assert_eq!(run.pen_x, 5.0 + 20.0);
        assert_eq!(run.pen_y, 20.0);
    }

    #[test]
    fn test_uv_covers_bitmap_over_page_side() {
        let mut atlas = demo_atlas();
        let run = atlas.layout_text("H", 0.0, 0.0, 1.0, 1.0).unwrap();

        let v = run.quads[0].vertices;
        assert_eq!(v[0].uv, [0.0, 0.0]);
        assert_eq!(v[4].uv, [8.0 / 64.0, 10.0 / 64.0]);
    }

    #[test]
    fn test_winding_is_consistent() {
        let mut atlas = demo_atlas();
        let run = atlas.layout_text("H", 0.0, 0.0, 1.0, 1.0).unwrap();

        let v = run.quads[0].vertices;
        // Triangles (tl, tr, bl) and (tr, br, bl) share the tr-bl edge.
        assert_eq!(v[1], v[3]);
        assert_eq!(v[2], v[5]);
    }

    #[test]
    fn test_whitespace_advances_without_geometry() {
        let mut atlas = demo_atlas();
        let run = atlas.layout_text("H i", 0.0, 0.0, 1.0, 1.0).unwrap();

        assert_eq!(run.quads.len(), 2);
        // H (10) + space (2) + i (10).
        assert_eq!(run.pen_x, 22.0);
    }

    #[test]
    fn test_missing_glyph_is_skipped_not_fatal() {
        let mut atlas = demo_atlas();
        // '?' was never scripted: unrenderable, zero advance.
        let run = atlas.layout_text("H?i", 0.0, 0.0, 1.0, 1.0).unwrap();

        assert_eq!(run.quads.len(), 2);
        assert_eq!(run.pen_x, 20.0);
    }

    #[test]
    fn test_layout_is_deterministic_under_cache_warmup() {
        let mut atlas = demo_atlas();
        let cold = atlas.layout_text("Hi", 0.0, 0.0, 1.0, 1.0).unwrap();

        // Unrelated churn between identical runs.
        atlas.layout_text("é é é", 3.0, 9.0, 1.5, 1.5).unwrap();
        let warm = atlas.layout_text("Hi", 0.0, 0.0, 1.0, 1.0).unwrap();

        assert_eq!(cold.quads.len(), warm.quads.len());
        assert_eq!((cold.pen_x, cold.pen_y), (warm.pen_x, warm.pen_y));
        for (a, b) in cold.quads.iter().zip(&warm.quads) {
            assert_eq!(a.page, b.page);
            assert_eq!(a.vertices, b.vertices);
        }
    }

    #[test]
    fn test_multibyte_input_decodes_per_codepoint() {
        let mut atlas = demo_atlas();
        let run = atlas.layout_text("éé", 0.0, 0.0, 1.0, 1.0).unwrap();

        assert_eq!(run.quads.len(), 2);
        assert_eq!(run.pen_x, 16.0); // two advances of 8
    }

    #[test]
    fn test_quads_carry_their_page() {
        // 40x40 glyphs on a 64px page: one glyph per page.
        let raster = MockRaster::new(40.0).glyph('A', 40, 40).glyph('B', 40, 40);
        let mut atlas = Atlas::new(raster, CpuPages::new(), 64).unwrap();

        let run = atlas.layout_text("AB", 0.0, 50.0, 1.0, 1.0).unwrap();
        assert_eq!(run.quads[0].page, 0);
        assert_eq!(run.quads[1].page, 1);
    }
}
