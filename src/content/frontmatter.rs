//! Front-matter parsing

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Delimiter line that opens and closes a front-matter block
const DELIMITER: &str = "---";

/// Reasons a front-matter block can be rejected
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter block opened with `---` but never closed")]
    Unterminated,

    #[error("front-matter is not a key/value mapping")]
    NotAMapping,

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("`{0}` is derived from the file and cannot be set in front-matter")]
    ReservedKey(&'static str),

    #[error("`{field}` is not an ISO-8601 date: {value}")]
    InvalidDate { field: &'static str, value: String },
}

/// Front-matter data from a post: an ordered mapping of keys to YAML values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = content.split_inclusive('\n');
        match lines.next() {
            Some(first) if is_delimiter(first) => {}
            // No front-matter found
            _ => return Ok((FrontMatter::default(), content)),
        }

        let yaml_start = content.len() - lines.clone().map(str::len).sum::<usize>();
        let mut offset = yaml_start;
        for line in lines {
            if is_delimiter(line) {
                let yaml = &content[yaml_start..offset];
                let body = &content[offset + line.len()..];
                return Ok((Self::from_yaml(yaml)?, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unterminated)
    }

    fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(fields) => Ok(Self { fields }),
            // A block holding only comments
            Value::Null => Ok(FrontMatter::default()),
            _ => Err(FrontMatterError::NotAMapping),
        }
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Top-level keys in source order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().filter_map(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deserialize the mapping into a typed structure
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, FrontMatterError> {
        Ok(serde_yaml::from_value(Value::Mapping(self.fields.clone()))?)
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}
