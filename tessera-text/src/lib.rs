//! # tessera-text
//!
//! Glyph atlas core for the tessera terminal-style text renderer.
//! Rasterizes glyphs on demand, packs their bitmaps into fixed-size
//! texture pages with shelf packing, and turns strings into textured
//! quads. No GPU dependency — the page surfaces sit behind a trait so
//! the whole crate runs headless.
//!
//! ## Architecture
//!
//! ```text
//! layout_text(str, pen, scale) ──► TextRun { Vec<Quad> }
//!     │
//!     ▼
//! Atlas.query(codepoint) ──► &GlyphRecord          (memoized)
//!     │ miss
//!     ▼
//! Rasterizer.rasterize() ──► PageAllocator.place() ──► PageSurfaces.upload()
//! ```
//!
//! - **`raster`** — the rasterizer seam (`fontdue` in production).
//! - **`surface`** — page surface trait + CPU reference backend.
//! - **`pages`** — shelf bin packing over a growable page list.
//! - **`atlas`** — the codepoint-indexed glyph cache.
//! - **`layout`** — pen walking and quad emission.
//! - **`fonts`** — font loading and system discovery.
//! - **`grid`** — generic character-cell container for the demo app.

pub mod atlas;
pub mod fonts;
pub mod grid;
pub mod layout;
pub mod pages;
pub mod raster;
pub mod surface;

// Re-exports for ergonomic use.
pub use atlas::{Atlas, GlyphRecord};
pub use fonts::FontError;
pub use grid::{Cell, Grid};
pub use layout::{GlyphVertex, Quad, TextRun};
pub use pages::{AtlasError, PageAllocator, Placement};
pub use raster::{FontRaster, RasterizedGlyph, Rasterizer};
pub use surface::{CpuPages, PageId, PageSurfaces};
