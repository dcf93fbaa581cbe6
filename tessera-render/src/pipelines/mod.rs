//! wgpu render pipelines.

pub mod text;

pub use text::TextPipeline;
