//! Markdown rendering for model answers.

mod code;
mod render;
mod table;

pub use code::{classify_code, CodeKind};
pub use render::render_markdown;
