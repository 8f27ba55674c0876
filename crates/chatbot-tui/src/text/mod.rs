//! Text rendering utilities.
//!
//! - [`render_markdown`] - Render model replies to styled ratatui Lines
//! - `MarkdownStyles` - Style configuration for markdown elements
//! - [`wrap_text`] - Width-aware wrapping

mod markdown;
mod styles;
mod wrap;

pub use markdown::render_markdown;
pub use wrap::wrap_text;
