//! Post records and metadata extraction from decoded front matter.
//!
//! Field names on the wire match the persisted index schema: `date` holds
//! the created date, `url` the base URL, and so on. Extraction is permissive
//! by design: a present-but-wrong-typed value is coerced to a string where
//! that makes sense, and ignored otherwise. It never panics.

use crate::frontmatter;
use crate::utils::date::{self, Ymd};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A post author, by name and optional ORCID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Creator {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub orcid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// One published document in the index.
///
/// Identity key is `slug`, unique within a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub slug: String,
    pub document: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub byline: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub series: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(rename = "abstract", skip_serializing_if = "String::is_empty")]
    pub abstract_: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lang: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub direction: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<Creator>,
    /// Created date, serialized under the historical `date` key.
    #[serde(rename = "date", skip_serializing_if = "String::is_empty")]
    pub created: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated: String,
}

impl Post {
    /// Build a post from a published document on disk.
    ///
    /// Reads the file, splits and decodes its front matter, and maps the
    /// decoded fields onto the record. The slug is the file name minus its
    /// extension; `created` defaults to the bucket date, `updated` to today.
    pub fn from_document(document: &Path, ymd: &Ymd) -> Result<Self> {
        let src = fs::read(document)
            .with_context(|| format!("failed to read post {:?}", document.display()))?;

        let split = frontmatter::split(&src);
        let meta = frontmatter::decode(split.format, split.meta)
            .with_context(|| format!("failed to decode front matter in {:?}", document.display()))?;

        let mut post = Self::from_meta(&meta);
        post.document = document.to_string_lossy().into_owned();
        post.slug = slug_of(document);
        if post.created.is_empty() {
            post.created = ymd.to_date_string();
        }
        if post.updated.is_empty() {
            post.updated = date::today();
        }
        Ok(post)
    }

    /// Map a decoded front-matter map onto a post record.
    ///
    /// Every field is optional and decoded permissively (see module docs).
    pub fn from_meta(meta: &Map<String, Value>) -> Self {
        let mut post = Self::default();

        let field = |key: &str| meta.get(key).and_then(coerce_string);

        post.title = field("title").unwrap_or_default();
        post.subtitle = field("subtitle").unwrap_or_default();
        post.byline = field("byline").unwrap_or_default();
        post.series = field("series").unwrap_or_default();
        post.number = field("number").unwrap_or_default();
        post.subject = field("subject").unwrap_or_default();
        post.abstract_ = field("abstract").unwrap_or_default();
        post.description = field("description").unwrap_or_default();
        post.category = field("category").unwrap_or_default();
        post.lang = field("lang").unwrap_or_default();
        post.direction = field("direction").unwrap_or_default();

        if let Some(keywords) = meta.get("keywords") {
            post.keywords = coerce_string_list(keywords);
        }
        if let Some(draft) = meta.get("draft") {
            post.draft = coerce_bool(draft).unwrap_or(false);
        }
        if let Some(creators) = meta.get("creators") {
            post.creators = coerce_creators(creators);
        } else if let Some(authors) = meta.get("authors") {
            // Legacy Pandoc blocks carry plain author names
            post.creators = coerce_creators(authors);
        }
        if let Some(created) = meta.get("date").and_then(coerce_date) {
            post.created = created;
        }
        if let Some(updated) = meta.get("updated").and_then(coerce_date) {
            post.updated = updated;
        }

        post
    }
}

/// File name minus extension, the post's identity within a day.
pub fn slug_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ============================================================================
// Permissive coercion
// ============================================================================

/// Coerce a value to a string: strings as-is, numbers and bools rendered.
/// Arrays and objects are ignored.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce to a list of strings, keeping order and dropping non-coercible
/// entries. A bare scalar becomes a single-element list.
fn coerce_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(coerce_string).collect(),
        other => coerce_string(other).into_iter().collect(),
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_date(value: &Value) -> Option<String> {
    coerce_string(value).and_then(|s| date::normalize_date(&s))
}

/// Unpack creators from either bare name strings or `{name, orcid}` maps.
fn coerce_creators(value: &Value) -> Vec<Creator> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(Creator {
                name: name.clone(),
                orcid: String::new(),
            }),
            Value::Object(obj) => Some(Creator {
                name: obj.get("name").and_then(coerce_string).unwrap_or_default(),
                orcid: obj.get("orcid").and_then(coerce_string).unwrap_or_default(),
            }),
            _ => None,
        })
        .collect()
}
