//! Post source files on disk

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Extension of post source files
pub const POST_EXTENSION: &str = "md";

/// Reads post sources from a single content directory
#[derive(Debug, Clone)]
pub struct PostRepository {
    root: PathBuf,
}

impl PostRepository {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File names of all posts, sorted by name
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", self.root);
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!("Skipping non UTF-8 file name {:?}", entry.path());
                continue;
            };
            if !name.starts_with('.') && is_markdown_file(entry.path()) {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    /// Raw contents of one post file
    pub fn read(&self, name: &str) -> Result<String> {
        if !is_plain_file_name(name) {
            return Err(Error::NotFound(name.to_string()));
        }

        match fs::read_to_string(self.root.join(name)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == POST_EXTENSION)
        .unwrap_or(false)
}

/// Reject anything that could escape the content root
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some()
}
