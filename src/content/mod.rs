//! Content module - post records, the rich-text block tree and store access

mod block;
mod post;
pub mod query;
mod store;

pub use block::{Block, CodeBlock, MarkDef, Span, TextBlock};
pub use post::{AssetRef, Author, Comment, ImageRef, Post, Slug};
pub use store::{ContentStore, MemoryStore, SanityClient};
