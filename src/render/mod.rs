//! Rendering: rich text, code highlighting and full pages

mod highlight;
mod page;
mod portable_text;

pub use highlight::CodeHighlighter;
pub use page::PageRenderer;
pub use portable_text::PortableTextRenderer;
