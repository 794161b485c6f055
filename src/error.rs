//! Error types for the content pipeline and the theme controller

use thiserror::Error;

use crate::content::FrontMatterError;

/// Errors raised while reading, parsing and assembling posts
#[derive(Error, Debug)]
pub enum Error {
    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Malformed front-matter in {path}: {source}")]
    MalformedFrontmatter {
        path: String,
        #[source]
        source: FrontMatterError,
    },

    #[error("Missing front-matter field `{field}` in post {slug}")]
    MissingField { slug: String, field: &'static str },

    #[error("Theme preference has not been loaded yet")]
    ThemeNotLoaded,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
