//! List site content

use anyhow::Result;

use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let posts = blog.get_all()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!("  {} - {} [{}]", date_part(&post.date), post.title, post.slug);
            }
        }
        "slug" | "slugs" => {
            for slug in blog.list_slugs()? {
                println!("{}", slug);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, slug", content_type);
        }
    }

    Ok(())
}

/// `2021-01-01` from `2021-01-01T00:00:00.000Z`
fn date_part(date: &str) -> &str {
    date.split_once('T').map(|(day, _)| day).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2021-01-01T00:00:00.000Z"), "2021-01-01");
        assert_eq!(date_part("2021-01-01"), "2021-01-01");
    }

    #[test]
    fn test_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path().to_path_buf(), SiteConfig::default());
        assert!(run(&blog, "tags").is_err());
        assert!(run(&blog, "post").is_ok());
    }
}
