//! Post model

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::FrontMatterError;

/// Post author
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub picture: String,
}

/// Open Graph image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OgImage {
    pub url: String,
}

/// A blog post, ready for the page layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// File name without extension
    pub slug: String,

    pub title: String,

    /// ISO-8601 publication date
    pub date: String,

    pub cover_image: String,

    pub author: Author,

    pub excerpt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<OgImage>,

    /// Rendered HTML content
    pub content: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Typed view of a post's front-matter
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostMeta {
    pub title: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub author: Author,
    pub excerpt: Option<String>,
    pub og_image: Option<OgImage>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Validate that a front-matter date is ISO-8601
pub(crate) fn check_iso_date(value: &str) -> Result<(), FrontMatterError> {
    let trimmed = value.trim();
    let valid = DateTime::parse_from_rfc3339(trimmed).is_ok()
        || NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok();

    if valid {
        Ok(())
    } else {
        Err(FrontMatterError::InvalidDate {
            field: "date",
            value: value.to_string(),
        })
    }
}
