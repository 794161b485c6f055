//! Content module - reads, parses and renders posts

mod frontmatter;
mod markdown;
mod post;
pub mod repository;
pub mod store;

pub use frontmatter::{FrontMatter, FrontMatterError};
pub use markdown::{MarkdownRenderer, DEFAULT_THEME};
pub use post::{Author, OgImage, Post};
pub use repository::PostRepository;
pub use store::PostStore;
