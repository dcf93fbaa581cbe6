//! Glyph rasterization — the seam between the atlas and the font library.
//!
//! The atlas talks to a [`Rasterizer`], not to `fontdue` directly, so
//! tests can substitute a scripted implementation with exact bitmap
//! sizes. [`FontRaster`] is the production adapter: codepoint + pixel
//! height in, coverage bitmap + metrics out.

use fontdue::Font;

/// One rasterized glyph: a tightly packed alpha bitmap plus the metrics
/// layout needs to position it and advance the pen.
///
/// `coverage` holds `width * height` bytes, row-major, top row first.
/// Whitespace rasterizes to a zero-size bitmap with a real advance.
#[derive(Clone, Debug)]
pub struct RasterizedGlyph {
    pub width: u32,
    pub height: u32,
    /// Offset from the pen origin to the bitmap's left edge, in pixels.
    pub bearing_left: f32,
    /// Height of the bitmap's top edge above the baseline, in pixels.
    pub bearing_top: f32,
    pub advance_x: f32,
    pub advance_y: f32,
    pub coverage: Vec<u8>,
}

/// Produces glyph bitmaps at a pixel height fixed at construction.
pub trait Rasterizer {
    /// The pixel height this rasterizer was configured with.
    fn pixel_height(&self) -> f32;

    /// Rasterize one codepoint. `None` means the face cannot render it;
    /// the caller decides what a missing glyph means.
    fn rasterize(&mut self, codepoint: char) -> Option<RasterizedGlyph>;
}

/// Production rasterizer over a `fontdue` font face.
pub struct FontRaster {
    font: Font,
    pixel_height: f32,
}

impl FontRaster {
    pub fn new(font: Font, pixel_height: f32) -> Self {
        Self { font, pixel_height }
    }
}

impl Rasterizer for FontRaster {
    fn pixel_height(&self) -> f32 {
        self.pixel_height
    }

    fn rasterize(&mut self, codepoint: char) -> Option<RasterizedGlyph> {
        // Index 0 is .notdef — the face has no glyph for this codepoint.
        if self.font.lookup_glyph_index(codepoint) == 0 {
            return None;
        }

        let (metrics, coverage) = self.font.rasterize(codepoint, self.pixel_height);
        Some(RasterizedGlyph {
            width: metrics.width as u32,
            height: metrics.height as u32,
            bearing_left: metrics.xmin as f32,
            // fontdue's ymin is the bitmap bottom relative to the baseline.
            bearing_top: (metrics.ymin + metrics.height as i32) as f32,
            advance_x: metrics.advance_width,
            advance_y: metrics.advance_height,
            coverage,
        })
    }
}

// ===================================================================
// Test support
// ===================================================================

/// Scripted rasterizer for unit tests: fixed bitmap sizes per codepoint,
/// solid coverage, and an invocation log for idempotence checks.
#[cfg(test)]
pub(crate) mod mock {
    use super::{RasterizedGlyph, Rasterizer};
    use std::collections::HashMap;

    #[derive(Debug)]
    pub(crate) struct MockRaster {
        pixel_height: f32,
        sizes: HashMap<char, (u32, u32)>,
        pub(crate) calls: Vec<char>,
    }

    impl MockRaster {
        pub(crate) fn new(pixel_height: f32) -> Self {
            Self {
                pixel_height,
                sizes: HashMap::new(),
                calls: Vec::new(),
            }
        }

        /// Script a codepoint to rasterize at `width`×`height`.
        /// Codepoints never scripted rasterize to `None`.
        pub(crate) fn glyph(mut self, ch: char, width: u32, height: u32) -> Self {
            self.sizes.insert(ch, (width, height));
            self
        }

        pub(crate) fn calls_for(&self, ch: char) -> usize {
            self.calls.iter().filter(|&&c| c == ch).count()
        }
    }

    impl Rasterizer for MockRaster {
        fn pixel_height(&self) -> f32 {
            self.pixel_height
        }

        fn rasterize(&mut self, codepoint: char) -> Option<RasterizedGlyph> {
            self.calls.push(codepoint);
            let &(width, height) = self.sizes.get(&codepoint)?;
            Some(RasterizedGlyph {
                width,
                height,
                bearing_left: 1.0,
                bearing_top: height as f32,
                advance_x: width as f32 + 2.0,
                advance_y: 0.0,
                coverage: vec![0xFF; (width * height) as usize],
            })
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
