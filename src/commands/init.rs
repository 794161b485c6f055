//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

/// Default site configuration
const CONFIG_TEMPLATE: &str = r#"# Site
title: Blog
description: ''
author: John Doe
url: http://example.com

# Directory
content_dir: _posts
public_dir: public

# Code highlighting
highlight:
  theme: base16-ocean.dark
  line_number: false
  auto_detect: true

# Client theme switcher
theme_switcher:
  storage_key: blog-starter-theme
"#;

/// Front-matter scaffold used by `new`
pub const POST_SCAFFOLD: &str = r#"---
title: "{{ title }}"
excerpt: ""
coverImage: ""
date: "{{ date }}"
author:
  name: "{{ author }}"
  picture: ""
ogImage:
  url: ""
---
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir.join("_posts"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    write_if_missing(&target_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;
    write_if_missing(&target_dir.join("scaffolds/post.md"), POST_SCAFFOLD)?;

    // Create a sample post
    let now = chrono::Utc::now();
    let sample_post = format!(
        r#"---
title: "Hello World"
excerpt: "Your very first post."
coverImage: ""
date: "{}"
author:
  name: "John Doe"
  picture: ""
---

Welcome! This is your very first post. Posts live in `_posts/` as Markdown
files; the file name becomes the slug.

## Quick Start

### Create a new post

```bash
$ blog-starter new "My New Post"
```

### Build post data

```bash
$ blog-starter build
```
"#,
        now.format("%Y-%m-%dT%H:%M:%S%.3fZ")
    );

    write_if_missing(&target_dir.join("_posts/hello-world.md"), &sample_post)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created {:?}", path);
    Ok(())
}
