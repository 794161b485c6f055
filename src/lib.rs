//! blog-starter: build-time content pipeline for a Markdown blog
//!
//! Posts are Markdown files with YAML front-matter. They are parsed, rendered
//! to HTML with syntax highlighted code blocks and handed to the page layer as
//! [`content::Post`] records, newest first.

pub mod commands;
pub mod config;
pub mod content;
mod error;
pub mod theme;

use std::path::{Path, PathBuf};

pub use error::{Error, Result};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding `<slug>.md` post files
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Post store configured for this site
    pub fn store(&self) -> content::PostStore {
        content::PostStore::new(
            content::PostRepository::new(&self.content_dir),
            content::MarkdownRenderer::from_config(&self.config.highlight),
        )
    }

    /// Slugs of all posts
    pub fn list_slugs(&self) -> Result<Vec<String>> {
        self.store().list_slugs()
    }

    /// A single post by slug
    pub fn get_by_slug(&self, slug: &str) -> Result<content::Post> {
        self.store().get_by_slug(slug)
    }

    /// All posts, newest first
    pub fn get_all(&self) -> Result<Vec<content::Post>> {
        self.store().get_all()
    }

    /// Initialize a new site
    pub fn init(&self) -> anyhow::Result<()> {
        commands::init::init_site(&self.base_dir)
    }

    /// Build the post data for the page layer
    pub fn build(&self) -> anyhow::Result<()> {
        commands::build::run(self).map(|_| ())
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> anyhow::Result<PathBuf> {
        commands::new::create_post(self, title, None)
    }
}
