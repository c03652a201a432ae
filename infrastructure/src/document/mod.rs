//! Manuscript rendering
//!
//! [`PandocRenderer`] implements the
//! [`DocumentRenderer`](council_application::DocumentRenderer) port: it builds
//! a Markdown manuscript and converts it with `pandoc`, falling back to plain
//! text when conversion is unavailable.

mod markdown;
mod pandoc;

pub use markdown::manuscript_markdown;
pub use pandoc::PandocRenderer;
