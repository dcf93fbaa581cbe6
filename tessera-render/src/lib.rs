//! # tessera-render
//!
//! GPU draw layer for the tessera text renderer, built on `wgpu`.
//!
//! ## Architecture
//!
//! ```text
//! Atlas (tessera-text) ──► AtlasTextures        ◀── one R8 texture per page
//!       │
//!       ▼
//! TextRun { Vec<Quad> }
//!       │
//!       ▼
//! Renderer.prepare()        ◀── group vertices by page, upload
//!       │
//!       ▼
//! Renderer.render_to_surface()   ◀── one draw call per page
//! ```
//!
//! - [`context`] — device/queue/surface initialisation
//! - [`textures`] — the page-surface backend over wgpu textures
//! - [`vertex`] — camera + uniform types, glyph vertex layout
//! - [`pipelines`] — the text render pipeline (WGSL)
//! - [`renderer`] — per-frame orchestration

pub mod context;
pub mod pipelines;
pub mod renderer;
pub mod textures;
pub mod vertex;

// Re-exports for convenience
pub use context::{GpuError, RenderContext};
pub use renderer::{FrameStats, RenderError, Renderer};
pub use textures::AtlasTextures;
pub use vertex::{glyph_vertex_layout, CameraUniform, TextColor};
