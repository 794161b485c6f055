//! Build post data for the page layer

use anyhow::{Context, Result};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::theme;
use crate::{Blog, CONFIG_FILE};

/// All posts, newest first
pub const POSTS_FILE: &str = "posts.json";
/// Slugs in discovery order
pub const SLUGS_FILE: &str = "slugs.json";
/// One `<slug>.json` per post
pub const POSTS_DIR: &str = "posts";
/// Theme initialization script
pub const THEME_SCRIPT_FILE: &str = "theme-init.js";

/// What a build produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub posts: usize,
    pub files_written: usize,
}

/// Build everything into the public directory
pub fn run(blog: &Blog) -> Result<BuildSummary> {
    let start = std::time::Instant::now();

    let store = blog.store();
    let slugs = store.list_slugs()?;
    let posts = store.get_all()?;

    tracing::info!("Loaded {} posts", posts.len());

    // Drop per-post files of posts that no longer exist
    let posts_dir = blog.public_dir.join(POSTS_DIR);
    if posts_dir.exists() {
        fs::remove_dir_all(&posts_dir)
            .with_context(|| format!("Failed to clear {:?}", posts_dir))?;
    }
    fs::create_dir_all(&posts_dir)
        .with_context(|| format!("Failed to create {:?}", posts_dir))?;

    let mut files_written = 0;

    write_json(&blog.public_dir.join(POSTS_FILE), &posts)?;
    write_json(&blog.public_dir.join(SLUGS_FILE), &slugs)?;
    files_written += 2;

    for post in &posts {
        write_json(&posts_dir.join(format!("{}.json", post.slug)), post)?;
        files_written += 1;
    }

    let script = theme::init_script(&blog.config.theme_switcher.storage_key);
    fs::write(blog.public_dir.join(THEME_SCRIPT_FILE), script)?;
    files_written += 1;

    let duration = start.elapsed();
    tracing::info!(
        "Wrote {} files in {:.2}s",
        files_written,
        duration.as_secs_f64()
    );

    Ok(BuildSummary {
        posts: posts.len(),
        files_written,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

/// Watch the content directory and config, rebuilding on change
pub async fn watch(blog: &Blog) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            let _ = tx.send(res);
        },
    )?;

    if blog.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&blog.content_dir, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", blog.content_dir);
    }

    let config_path = blog.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => match event {
                Some(Ok(events)) => {
                    let relevant = events.iter().any(|e| {
                        let path = e.path.to_string_lossy();
                        !path.ends_with('~') && !path.contains(".DS_Store")
                    });
                    if !relevant {
                        continue;
                    }

                    tracing::info!("File changed, rebuilding...");
                    // Config edits need a fresh Blog
                    let rebuilt = Blog::new(&blog.base_dir).and_then(|b| run(&b));
                    if let Err(e) = rebuilt {
                        tracing::error!("Build failed: {:#}", e);
                    }
                }
                Some(Err(e)) => tracing::error!("Watch error: {:?}", e),
                None => break,
            },
        }
    }

    Ok(())
}
