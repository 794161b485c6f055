//! Post store - assembles posts from source files

use super::post::{check_iso_date, PostMeta};
use super::repository::POST_EXTENSION;
use super::{FrontMatter, FrontMatterError, MarkdownRenderer, Post, PostRepository};
use crate::{Error, Result};

/// Build-time API over the posts of a content directory
pub struct PostStore {
    repository: PostRepository,
    renderer: MarkdownRenderer,
}

impl PostStore {
    pub fn new(repository: PostRepository, renderer: MarkdownRenderer) -> Self {
        Self {
            repository,
            renderer,
        }
    }

    pub fn repository(&self) -> &PostRepository {
        &self.repository
    }

    /// Slugs of every post, in discovery order
    pub fn list_slugs(&self) -> Result<Vec<String>> {
        Ok(self
            .repository
            .list()?
            .iter()
            .map(|name| slug_from_file_name(name).to_string())
            .collect())
    }

    /// Load a single post; the slug is the file name without `.md`
    pub fn get_by_slug(&self, slug: &str) -> Result<Post> {
        let file_name = format!("{}.{}", slug, POST_EXTENSION);
        let raw = self.repository.read(&file_name)?;
        self.assemble(slug, &raw)
    }

    /// Load all posts, newest first
    ///
    /// Posts sharing a date keep their discovery (file name) order.
    pub fn get_all(&self) -> Result<Vec<Post>> {
        let mut posts = self
            .repository
            .list()?
            .iter()
            .map(|name| {
                let raw = self.repository.read(name)?;
                self.assemble(slug_from_file_name(name), &raw)
            })
            .collect::<Result<Vec<_>>>()?;

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.repository.root());
        Ok(posts)
    }

    fn assemble(&self, slug: &str, raw: &str) -> Result<Post> {
        let malformed = |source: FrontMatterError| Error::MalformedFrontmatter {
            path: format!("{}.{}", slug, POST_EXTENSION),
            source,
        };

        let (fm, body) = FrontMatter::parse(raw).map_err(malformed)?;
        // Derived fields cannot be authored
        if let Some(key) = RESERVED_KEYS.iter().copied().find(|key| fm.get(key).is_some()) {
            return Err(malformed(FrontMatterError::ReservedKey(key)));
        }
        let meta: PostMeta = fm.deserialize().map_err(malformed)?;

        let title = meta.title.ok_or_else(|| Error::MissingField {
            slug: slug.to_string(),
            field: "title",
        })?;
        let date = meta.date.ok_or_else(|| Error::MissingField {
            slug: slug.to_string(),
            field: "date",
        })?;
        check_iso_date(&date).map_err(malformed)?;

        let excerpt = meta.excerpt.unwrap_or_else(|| {
            MarkdownRenderer::split_excerpt(body)
                .unwrap_or_default()
                .to_string()
        });

        tracing::debug!("Rendering post {}", slug);
        let content = self.renderer.render(body);

        Ok(Post {
            slug: slug.to_string(),
            title,
            date,
            cover_image: meta.cover_image,
            author: meta.author,
            excerpt,
            og_image: meta.og_image,
            content,
            extra: meta.extra,
        })
    }
}

/// Post fields computed during assembly
const RESERVED_KEYS: [&str; 2] = ["slug", "content"];

/// Strip the post extension from a file name
fn slug_from_file_name(name: &str) -> &str {
    name.strip_suffix(POST_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, PostStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let store = PostStore::new(PostRepository::new(dir.path()), MarkdownRenderer::new());
        (dir, store)
    }

    const FULL_POST: &str = r#"---
title: "Learn How to Pre-render Pages Using Static Generation"
excerpt: "Lorem ipsum dolor sit amet."
coverImage: "/assets/blog/hello-world/cover.jpg"
date: "2020-03-16T05:35:07.322Z"
author:
  name: Tim Neutkens
  picture: "/assets/blog/authors/tim.jpeg"
ogImage:
  url: "/assets/blog/hello-world/cover.jpg"
tags: [nextjs, static]
---

Lorem ipsum **dolor** sit amet.

```js
export default function Page() {}
```
"#;

    #[test]
    fn test_get_by_slug() {
        let (_dir, store) = store_with(&[("hello-world.md", FULL_POST)]);
        let post = store.get_by_slug("hello-world").unwrap();

        assert_eq!(post.slug, "hello-world");
        assert_eq!(
            post.title,
            "Learn How to Pre-render Pages Using Static Generation"
        );
        assert_eq!(post.date, "2020-03-16T05:35:07.322Z");
        assert_eq!(post.cover_image, "/assets/blog/hello-world/cover.jpg");
        assert_eq!(post.author.name, "Tim Neutkens");
        assert_eq!(post.author.picture, "/assets/blog/authors/tim.jpeg");
        assert_eq!(
            post.og_image.as_ref().map(|o| o.url.as_str()),
            Some("/assets/blog/hello-world/cover.jpg")
        );
        assert!(post.content.contains("<strong>dolor</strong>"));
        assert!(post.content.contains(r#"<code class="language-js">"#));
        assert!(post.extra.contains_key("tags"));
    }

    #[test]
    fn test_slug_matches_file_name() {
        let (_dir, store) = store_with(&[
            ("hello-world.md", FULL_POST),
            ("dynamic-routing.md", "---\ntitle: B\ndate: 2020-03-17\n---\n"),
        ]);
        for slug in store.list_slugs().unwrap() {
            assert_eq!(store.get_by_slug(&slug).unwrap().slug, slug);
        }
        assert_eq!(
            store.list_slugs().unwrap(),
            vec!["dynamic-routing", "hello-world"]
        );
    }

    #[test]
    fn test_double_extension_is_its_own_post() {
        let (_dir, store) = store_with(&[
            ("a.md", "---\ntitle: A\ndate: 2021-01-01\n---\n"),
            ("a.md.md", "---\ntitle: AA\ndate: 2021-01-01\n---\n"),
        ]);
        assert_eq!(store.list_slugs().unwrap(), vec!["a", "a.md"]);
        assert_eq!(store.get_by_slug("a").unwrap().title, "A");
        assert_eq!(store.get_by_slug("a.md").unwrap().title, "AA");

        let posts: Vec<_> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|p| (p.slug, p.title))
            .collect();
        assert_eq!(
            posts,
            vec![
                ("a".to_string(), "A".to_string()),
                ("a.md".to_string(), "AA".to_string()),
            ]
        );
    }

    #[test]
    fn test_slug_key_is_rejected() {
        let (_dir, store) = store_with(&[(
            "real.md",
            "---\ntitle: T\ndate: 2021-01-01\nslug: fake\n---\nbody\n",
        )]);
        assert!(matches!(
            store.get_by_slug("real"),
            Err(Error::MalformedFrontmatter {
                source: FrontMatterError::ReservedKey("slug"),
                ..
            })
        ));
    }

    #[test]
    fn test_content_key_is_rejected() {
        let (_dir, store) = store_with(&[(
            "real.md",
            "---\ntitle: T\ndate: 2021-01-01\ncontent: injected\n---\nbody\n",
        )]);
        assert!(matches!(
            store.get_all(),
            Err(Error::MalformedFrontmatter {
                source: FrontMatterError::ReservedKey("content"),
                ..
            })
        ));
    }

    #[test]
    fn test_serialized_post_has_single_slug_and_content() {
        let (_dir, store) = store_with(&[(
            "real.md",
            "---\ntitle: T\ndate: 2021-01-01\nlayout: wide\n---\nbody\n",
        )]);
        let json = serde_json::to_string(&store.get_by_slug("real").unwrap()).unwrap();
        assert_eq!(json.matches("\"slug\":").count(), 1);
        assert_eq!(json.matches("\"content\":").count(), 1);
        assert!(json.contains("\"layout\":\"wide\""));
    }

    #[test]
    fn test_get_by_slug_missing() {
        let (_dir, store) = store_with(&[("hello-world.md", FULL_POST)]);
        assert!(matches!(store.get_by_slug("missing"), Err(Error::NotFound(_))));
        assert!(matches!(store.get_by_slug("../hello-world"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_get_all_sorted_newest_first() {
        let (_dir, store) = store_with(&[
            ("example.md", "---\ntitle: \"A\"\ndate: \"2021-01-01T00:00:00.000Z\"\n---\n"),
            ("other.md", "---\ntitle: \"B\"\ndate: \"2022-01-01T00:00:00.000Z\"\n---\n"),
        ]);
        let slugs: Vec<_> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["other", "example"]);
    }

    #[test]
    fn test_get_all_adjacent_dates_descend() {
        let (_dir, store) = store_with(&[
            ("a.md", "---\ntitle: a\ndate: 2019-05-01\n---\n"),
            ("b.md", "---\ntitle: b\ndate: 2023-12-24T08:00:00Z\n---\n"),
            ("c.md", "---\ntitle: c\ndate: 2021-07-15T12:00:00.000Z\n---\n"),
            ("d.md", "---\ntitle: d\ndate: 2020-02-29\n---\n"),
        ]);
        let posts = store.get_all().unwrap();
        assert_eq!(posts.len(), 4);
        for pair in posts.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }

    #[test]
    fn test_equal_dates_keep_discovery_order() {
        let date = "2022-06-01T00:00:00.000Z";
        let post = |title: &str| format!("---\ntitle: {}\ndate: \"{}\"\n---\n", title, date);
        let (_dir, store) = store_with(&[
            ("charlie.md", post("c").as_str()),
            ("alpha.md", post("a").as_str()),
            ("bravo.md", post("b").as_str()),
            ("newer.md", "---\ntitle: n\ndate: \"2023-01-01\"\n---\n"),
        ]);
        let slugs: Vec<_> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["newer", "alpha", "bravo", "charlie"]);
    }

    #[test]
    fn test_broken_post_fails_get_all() {
        let (_dir, store) = store_with(&[
            ("good.md", FULL_POST),
            ("broken.md", "---\ntitle: Never closed\n\nBody"),
        ]);
        match store.get_all() {
            Err(Error::MalformedFrontmatter { path, source }) => {
                assert_eq!(path, "broken.md");
                assert!(matches!(source, FrontMatterError::Unterminated));
            }
            other => panic!("expected malformed front-matter, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_title() {
        let (_dir, store) = store_with(&[("untitled.md", "# Only a body\n")]);
        assert!(matches!(
            store.get_by_slug("untitled"),
            Err(Error::MissingField { field: "title", .. })
        ));
    }

    #[test]
    fn test_invalid_date() {
        let (_dir, store) = store_with(&[("bad-date.md", "---\ntitle: x\ndate: March 3rd\n---\n")]);
        assert!(matches!(
            store.get_by_slug("bad-date"),
            Err(Error::MalformedFrontmatter {
                source: FrontMatterError::InvalidDate { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_optional_fields_default() {
        let (_dir, store) = store_with(&[("minimal.md", "---\ntitle: Min\ndate: 2021-01-01\n---\nHi\n")]);
        let post = store.get_by_slug("minimal").unwrap();
        assert_eq!(post.cover_image, "");
        assert_eq!(post.author, Default::default());
        assert!(post.og_image.is_none());
        assert_eq!(post.excerpt, "");
        assert_eq!(post.content, "<p>Hi</p>\n");
    }

    #[test]
    fn test_excerpt_from_more_marker() {
        let (_dir, store) = store_with(&[(
            "teaser.md",
            "---\ntitle: T\ndate: 2021-01-01\n---\nShort intro.\n\n<!-- more -->\n\nThe rest.\n",
        )]);
        let post = store.get_by_slug("teaser").unwrap();
        assert_eq!(post.excerpt, "Short intro.");
        assert!(post.content.contains("The rest."));
    }

    #[test]
    fn test_content_is_deterministic() {
        let (_dir, store) = store_with(&[("hello-world.md", FULL_POST)]);
        let first = store.get_by_slug("hello-world").unwrap();
        let second = store.get_by_slug("hello-world").unwrap();
        assert_eq!(first.content, second.content);
    }

    #[test]
    fn test_slug_from_file_name() {
        assert_eq!(slug_from_file_name("post.md"), "post");
        assert_eq!(slug_from_file_name("post"), "post");
        assert_eq!(slug_from_file_name("v1.2.md"), "v1.2");
        assert_eq!(slug_from_file_name("cmd"), "cmd");
    }
}
