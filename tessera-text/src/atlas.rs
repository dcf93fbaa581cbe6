//! The glyph cache — a sparse, codepoint-indexed table of glyph
//! records over the page allocator.
//!
//! A codepoint is rasterized the first time it is queried and never
//! again: hits return the memoized record, and a codepoint the face
//! cannot render is memoized too, as a permanently blank record.
//! Records are immutable once created — glyphs are never relocated or
//! evicted, so texture coordinates stay valid for the atlas lifetime.

use std::collections::HashMap;

use crate::pages::{AtlasError, PageAllocator};
use crate::raster::Rasterizer;
use crate::surface::{PageId, PageSurfaces};

/// Cached metrics and placement for one codepoint.
///
/// `rendered == false` means the face could not render the codepoint;
/// every other field is only meaningful when `rendered` is true.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphRecord {
    pub rendered: bool,
    /// Page holding this glyph's pixels. Owned by the page allocator.
    pub page: PageId,
    pub advance_x: f32,
    pub advance_y: f32,
    /// Bitmap size in pixels; zero for glyphs with no visible pixels.
    pub bitmap_w: u32,
    pub bitmap_h: u32,
    pub bearing_left: f32,
    pub bearing_top: f32,
    /// Glyph top-left within its page, normalized by the page side.
    pub tex_offset_x: f32,
    pub tex_offset_y: f32,
}

/// Glyph cache + page allocator + rasterizer for one (face, pixel
/// height) pair. Single-owner, single-threaded: a cache miss mutates
/// both the glyph table and the allocator cursor.
#[derive(Debug)]
pub struct Atlas<R: Rasterizer, S: PageSurfaces> {
    raster: R,
    pages: PageAllocator<S>,
    glyphs: HashMap<char, GlyphRecord>,
}

impl<R: Rasterizer, S: PageSurfaces> Atlas<R, S> {
    /// Build an atlas with `page_side`-sized pages.
    ///
    /// Fails if the page side is zero or smaller than the rasterization
    /// pixel height — such a page could not hold a full-height glyph.
    pub fn new(raster: R, surfaces: S, page_side: u32) -> Result<Self, AtlasError> {
        let pixel_height = raster.pixel_height();
        if page_side == 0 || (page_side as f32) < pixel_height {
            return Err(AtlasError::PageTooSmall {
                side: page_side,
                pixel_height,
            });
        }
        Ok(Self {
            raster,
            pages: PageAllocator::new(page_side, surfaces),
            glyphs: HashMap::new(),
        })
    }

    pub fn page_side(&self) -> u32 {
        self.pages.side()
    }

    pub fn page_count(&self) -> usize {
        self.pages.page_count()
    }

    /// Codepoints cached so far, renderable or not.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn pixel_height(&self) -> f32 {
        self.raster.pixel_height()
    }

    pub fn surfaces(&self) -> &S {
        self.pages.surfaces()
    }

    /// Look up a codepoint, rasterizing and placing it on first sight.
    ///
    /// `Err` only for the fatal oversize condition; a codepoint the
    /// face cannot render comes back `Ok` with `rendered == false` and
    /// is never retried.
    pub fn query(&mut self, codepoint: char) -> Result<&GlyphRecord, AtlasError> {
        if !self.glyphs.contains_key(&codepoint) {
            let record = self.render_glyph(codepoint)?;
            self.glyphs.insert(codepoint, record);
        }
        Ok(&self.glyphs[&codepoint])
    }

    fn render_glyph(&mut self, codepoint: char) -> Result<GlyphRecord, AtlasError> {
        let Some(glyph) = self.raster.rasterize(codepoint) else {
            log::warn!(
                "face cannot render U+{:04X}; it will lay out as blank",
                codepoint as u32
            );
            return Ok(GlyphRecord::default());
        };

        let mut record = GlyphRecord {
            rendered: true,
            advance_x: glyph.advance_x,
            advance_y: glyph.advance_y,
            bitmap_w: glyph.width,
            bitmap_h: glyph.height,
            bearing_left: glyph.bearing_left,
            bearing_top: glyph.bearing_top,
            ..GlyphRecord::default()
        };

        // Whitespace owns no pixels: nothing to place, nothing to upload.
        if glyph.width == 0 || glyph.height == 0 {
            return Ok(record);
        }

        let placement = self.pages.place(glyph.width, glyph.height, &glyph.coverage)?;
        let inv_side = 1.0 / self.pages.side() as f32;
        record.page = placement.page;
        record.tex_offset_x = placement.x as f32 * inv_side;
        record.tex_offset_y = placement.y as f32 * inv_side;
        Ok(record)
    }
}

// ===================================================================
// Tests
// ===================================================================
