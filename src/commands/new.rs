//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use super::init::POST_SCAFFOLD;
use crate::Blog;

/// Create a new post from the scaffold
///
/// The file is named after `path` when given, otherwise after the slugified title.
pub fn create_post(blog: &Blog, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Utc::now();

    let slug = match path {
        Some(p) => p.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() || slug.contains(['/', '\\']) || slug.starts_with('.') {
        anyhow::bail!("Invalid post name: {:?}", slug);
    }

    fs::create_dir_all(&blog.content_dir)?;
    let file_path = blog.content_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    // Load scaffold template
    let scaffold_path = blog.base_dir.join("scaffolds").join("post.md");
    let scaffold_content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        POST_SCAFFOLD.to_string()
    };

    // Replace template variables
    let content = scaffold_content
        .replace("{{ title }}", &yaml_escape(title))
        .replace("{{ author }}", &yaml_escape(&blog.config.author))
        .replace("{{ date }}", &now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string());

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Escape a value for a double-quoted YAML scalar
fn yaml_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
