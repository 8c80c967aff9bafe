//! Index persistence.
//!
//! The index is serialized as JSON or YAML, chosen by the file extension of
//! the index path. A missing or empty file loads as an empty index so a
//! first `publish` can bootstrap a site.

use super::BlogIndex;
use crate::utils::date;
use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Persistence errors for the index file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unsupported index format `{0}`, expecting .json, .yaml or .yml")]
    UnsupportedFormat(PathBuf),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("failed to parse index `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("failed to parse index `{0}`")]
    Yaml(PathBuf, #[source] serde_yaml::Error),
}

/// Serialization format, derived from the index file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexFormat {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Result<IndexFormat, StoreError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(IndexFormat::Json),
        Some("yaml" | "yml") => Ok(IndexFormat::Yaml),
        _ => Err(StoreError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load an index from disk.
///
/// A missing or empty file yields an empty index; an unsupported extension
/// or a parse failure is an error.
pub fn load(path: &Path) -> Result<BlogIndex> {
    let format = format_of(path)?;

    let src = match fs::read(path) {
        Ok(src) => src,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BlogIndex::default()),
        Err(err) => return Err(StoreError::Io(path.to_path_buf(), err).into()),
    };
    if src.is_empty() {
        return Ok(BlogIndex::default());
    }

    let index = match format {
        IndexFormat::Json => serde_json::from_slice(&src)
            .map_err(|err| StoreError::Json(path.to_path_buf(), err))?,
        IndexFormat::Yaml => serde_yaml::from_slice(&src)
            .map_err(|err| StoreError::Yaml(path.to_path_buf(), err))?,
    };
    Ok(index)
}

/// Save the index to disk, stamping `updated` with today's date.
pub fn save(index: &mut BlogIndex, path: &Path) -> Result<()> {
    let format = format_of(path)?;
    index.updated = date::today();

    let src = match format {
        IndexFormat::Json => serde_json::to_string_pretty(index)?,
        IndexFormat::Yaml => serde_yaml::to_string(index)?,
    };
    fs::write(path, src).map_err(|err| StoreError::Io(path.to_path_buf(), err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Day, Month, Post, Year};
    use tempfile::tempdir;

    fn sample_index() -> BlogIndex {
        BlogIndex {
            name: "Test Blog".into(),
            quip: "words, occasionally".into(),
            base_url: "https://example.com".into(),
            language: "en-US".into(),
            years: vec![Year {
                year: "2021".into(),
                months: vec![Month {
                    month: "05".into(),
                    days: vec![Day {
                        day: "01".into(),
                        posts: vec![Post {
                            slug: "hello".into(),
                            document: "blog/2021/05/01/hello.md".into(),
                            title: "Hello".into(),
                            keywords: vec!["greeting".into()],
                            created: "2021-05-01".into(),
                            ..Post::default()
                        }],
                    }],
                }],
            }],
            ..BlogIndex::default()
        }
    }

    #[test]
    fn test_json_round_trip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("blog.json");

        let mut index = sample_index();
        save(&mut index, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, index);
    }

    #[test]
    fn test_yaml_round_trip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("blog.yaml");

        let mut index = sample_index();
        save(&mut index, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, index);
    }

    #[test]
    fn test_load_missing_file_is_empty_index() {
        let tmp = tempdir().unwrap();
        let index = load(&tmp.path().join("blog.json")).unwrap();
        assert_eq!(index, BlogIndex::default());
    }

    #[test]
    fn test_load_empty_file_is_empty_index() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("blog.json");
        fs::write(&path, "").unwrap();
        assert_eq!(load(&path).unwrap(), BlogIndex::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("blog.toml");
        assert!(load(&path).is_err());
        assert!(save(&mut BlogIndex::default(), &path).is_err());
    }

    #[test]
    fn test_load_malformed_json_errors() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("blog.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_save_stamps_updated() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("blog.json");
        let mut index = BlogIndex::default();
        save(&mut index, &path).unwrap();
        assert_eq!(index.updated, date::today());
    }
}
