//! Shelf bin packing over a growable list of fixed-size pages.
//!
//! Glyphs fill a shelf left-to-right; when one no longer fits the row,
//! the shelf closes and the cursor drops by the tallest glyph placed on
//! it. When the page itself runs out of height, a fresh page is created
//! and the cursor fully resets. Pages are never compacted or evicted,
//! so placements (and the texture coordinates derived from them) are
//! stable for the allocator's lifetime.

use thiserror::Error;

use crate::surface::{PageId, PageSurfaces};

/// Pixels kept free after each glyph, on both axes, so linear sampling
/// never bleeds a neighbor in.
pub const GUTTER: u32 = 1;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error(
        "glyph bitmap {width}x{height} exceeds the {side}x{side} atlas page; \
         raise the page size or lower the pixel height"
    )]
    GlyphTooLarge { width: u32, height: u32, side: u32 },
    #[error("atlas page side {side} cannot hold glyphs rasterized at {pixel_height}px")]
    PageTooSmall { side: u32, pixel_height: f32 },
}

/// Packing cursor of one page: next free shelf position and the height
/// of the tallest glyph on the open shelf.
#[derive(Clone, Copy, Debug, Default)]
struct Page {
    cursor_x: u32,
    cursor_y: u32,
    shelf_height: u32,
}

/// Where a glyph bitmap ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub page: PageId,
    pub x: u32,
    pub y: u32,
}

/// Owns the page surfaces and the per-page packing state.
#[derive(Debug)]
pub struct PageAllocator<S: PageSurfaces> {
    side: u32,
    surfaces: S,
    pages: Vec<Page>,
}

impl<S: PageSurfaces> PageAllocator<S> {
    /// Creates the allocator and its first page.
    pub fn new(side: u32, mut surfaces: S) -> Self {
        surfaces.create_page(side);
        Self {
            side,
            surfaces,
            pages: vec![Page::default()],
        }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn surfaces(&self) -> &S {
        &self.surfaces
    }

    /// Place one `width`×`height` coverage bitmap and upload it.
    ///
    /// Placement never fails for lack of room — a full page grows the
    /// list — only for a glyph that could not fit an empty page.
    pub fn place(
        &mut self,
        width: u32,
        height: u32,
        coverage: &[u8],
    ) -> Result<Placement, AtlasError> {
        if width > self.side || height > self.side {
            return Err(AtlasError::GlyphTooLarge {
                width,
                height,
                side: self.side,
            });
        }

        // Close the shelf when the glyph no longer fits the row.
        let side = self.side;
        let page = self.active();
        if page.cursor_x + width > side {
            page.cursor_y += page.shelf_height;
            page.shelf_height = 0;
            page.cursor_x = 0;
        }

        // Page exhausted: grow by one fresh page, cursor fully reset.
        if self.active().cursor_y + height > self.side {
            self.surfaces.create_page(self.side);
            self.pages.push(Page::default());
            log::debug!("glyph atlas grew to {} pages", self.pages.len());
        }

        let id = self.pages.len() - 1;
        let page = self.active();
        let x = page.cursor_x;
        let y = page.cursor_y;
        page.shelf_height = page.shelf_height.max(height + GUTTER);
        page.cursor_x += width + GUTTER;

        self.surfaces.upload(id, x, y, width, height, coverage);
        Ok(Placement { page: id, x, y })
    }

    fn active(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

// ===================================================================
// Tests
// ===================================================================
