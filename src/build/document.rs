use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Documents
// =============================================================================

/// An article source as read from disk.
///
/// Documents are immutable once loaded; the pipeline derives everything else
/// (metadata, body tree, page) from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the content root (e.g., "haskell/kinds.md").
    /// This is the document's identity throughout a build.
    pub source_path: PathBuf,
    /// The file contents
    pub raw: String,
}

impl Document {
    pub fn new(source_path: impl Into<PathBuf>, raw: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            raw: raw.into(),
        }
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Metadata parsed from a document's front matter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    /// Tags in the order they were written; duplicates are kept.
    pub tags: Vec<String>,
    /// Overrides the last segment of the page URL
    pub slug: Option<String>,
    /// Any other front matter keys, available to templates as `page.<key>`
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The raw front matter block, before required fields are checked.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    #[serde(default, deserialize_with = "deserialize_scalar")]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_date")]
    date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_scalar")]
    slug: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

/// The text of a YAML scalar; `2024` and `9.8` read as written.
fn scalar_text(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn deserialize_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(None),
        value => scalar_text(value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a string")),
    }
}

/// `tags` may be written as a list or as a single value.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let not_a_tag = || D::Error::custom("tags must be strings");
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(Vec::new()),
        serde_yaml::Value::Sequence(items) => items
            .into_iter()
            .map(|item| scalar_text(item).ok_or_else(not_a_tag))
            .collect(),
        value => scalar_text(value).map(|tag| vec![tag]).ok_or_else(not_a_tag),
    }
}

/// Accepts `2021-04-16` or an RFC 3339 timestamp, keeping only the date.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| D::Error::custom(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

// =============================================================================
// Front matter parsing
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum FrontMatterError {
    #[error("document must begin with a `---` line")]
    MissingOpeningDelimiter,

    #[error("front matter is missing its closing `---` line")]
    MissingClosingDelimiter,

    #[error("front matter is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front matter has no `title`")]
    MissingTitle,
}

const DELIMITER: &str = "---";

/// Split a document's text into its metadata and body.
///
/// The text must open with a `---` line; the YAML block runs up to the next
/// line that is exactly `---`:
///
/// ```markdown
/// ---
/// title: Kinds
/// date: 2024-02-01
/// tags: [haskell, type-level]
/// ---
///
/// # Content starts here
/// ```
///
/// Returns the metadata and the body text that follows the closing line.
pub fn parse_front_matter(raw: &str) -> Result<(Metadata, String), FrontMatterError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut lines = raw.split_inclusive('\n');
    let opening = lines.next().ok_or(FrontMatterError::MissingOpeningDelimiter)?;
    if opening.trim_end() != DELIMITER {
        return Err(FrontMatterError::MissingOpeningDelimiter);
    }

    // Byte offsets into `raw` as we walk the lines
    let yaml_start = opening.len();
    let mut offset = yaml_start;
    let mut yaml_end = None;
    for line in lines {
        if line.trim_end() == DELIMITER {
            yaml_end = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }
    let (yaml_end, body_start) = yaml_end.ok_or(FrontMatterError::MissingClosingDelimiter)?;

    let yaml = &raw[yaml_start..yaml_end];
    let front_matter: FrontMatter = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    let title = front_matter
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(FrontMatterError::MissingTitle)?;

    let metadata = Metadata {
        title,
        date: front_matter.date,
        description: front_matter.description.filter(|d| !d.trim().is_empty()),
        tags: front_matter
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        slug: front_matter.slug.filter(|s| !s.trim().is_empty()),
        extra: front_matter.extra,
    };

    let body = raw[body_start..].trim_start_matches(['\r', '\n']).to_string();
    Ok((metadata, body))
}
