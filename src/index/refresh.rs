//! Rebuilding the index from the on-disk directory layout.
//!
//! This is the disaster-recovery path: when `blog.json` is lost or
//! corrupted, the whole tree can be reconstructed from the
//! `PREFIX/YYYY/MM/DD` layout and the front matter of the files found there.

use super::BlogIndex;
use crate::utils::date::{self, Ymd};
use anyhow::{Result, bail};
use std::path::Path;
use walkdir::WalkDir;

/// File extensions considered publishable content during a crawl.
const TARGET_EXTS: &[&str] = &["md", "rst", "textile", "jira", "txt"];

/// Crawl `prefix/year/MM/DD` and upsert every content file found.
///
/// Directories that do not look like zero-padded date components are
/// skipped. A single file whose front matter fails to parse aborts the
/// refresh for the year; the caller decides whether to persist anything.
pub fn refresh_from_path(index: &mut BlogIndex, prefix: &Path, year: &str) -> Result<()> {
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        bail!("invalid year {year:?}, expecting YYYY");
    }

    let root = prefix.join(year);
    if !root.is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(&root)
        .min_depth(3)
        .max_depth(3)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !has_target_ext(path) {
            continue;
        }

        // Path shape is prefix/YYYY/MM/DD/file
        let Some(ymd) = bucket_date(path, year) else {
            continue;
        };

        index.publish_document(&ymd, path)?;
    }

    index.updated = date::today();
    Ok(())
}

fn has_target_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TARGET_EXTS.contains(&ext))
}

/// Derive the bucket date from a file's month and day directory names.
/// Returns `None` when the components do not form a valid calendar date.
fn bucket_date(path: &Path, year: &str) -> Option<Ymd> {
    let day_dir = path.parent()?.file_name()?.to_str()?;
    let month_dir = path.parent()?.parent()?.file_name()?.to_str()?;

    Ymd::parse(&format!("{year}-{month_dir}-{day_dir}")).ok()
}
