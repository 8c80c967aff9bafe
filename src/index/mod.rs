//! The chronological content index.
//!
//! Posts are organized Year -> Month -> Day -> Post, with every level kept in
//! descending key order so the tree renders newest-first. Keys are
//! zero-padded date components, so lexicographic comparison implements
//! numeric ordering.
//!
//! The index is persisted as `blog.json` (or `blog.yaml`) next to the posts
//! and is fully rebuildable from the on-disk `PREFIX/YYYY/MM/DD` layout, see
//! [`refresh`].

pub mod post;
pub mod refresh;
pub mod store;

pub use post::{Creator, Post};

use crate::config::BaseConfig;
use crate::utils::date::{self, Ymd};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A calendar day bucket holding posts, newest-inserted first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Day {
    pub day: String,
    pub posts: Vec<Post>,
}

impl Day {
    /// Insert or update a post by slug.
    ///
    /// An existing post with the same slug is replaced in place; a new post
    /// is prepended so the most recently published leads within the day.
    pub fn upsert_post(&mut self, post: Post) {
        match self.posts.iter_mut().find(|p| p.slug == post.slug) {
            Some(existing) => *existing = post,
            None => self.posts.insert(0, post),
        }
    }
}

/// A month bucket with its days in descending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Month {
    pub month: String,
    pub days: Vec<Day>,
}

/// A year bucket with its months in descending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Year {
    pub year: String,
    pub months: Vec<Month>,
}

/// Top-level persisted index: site metadata plus the year tree.
///
/// Field names follow the historical on-disk schema (`quip` for the tagline,
/// `url` for the base URL, `date` for a post's created date).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogIndex {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub quip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "url", skip_serializing_if = "String::is_empty")]
    pub base_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub copyright: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub started: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ended: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub index_tmpl: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub post_tmpl: String,
    pub years: Vec<Year>,
}

impl BlogIndex {
    /// Publish a document: copy it into the `prefix/YYYY/MM/DD/` bucket and
    /// insert or update its post record in the index.
    ///
    /// An empty `date` defaults to today. Returns the target path the
    /// document was copied to.
    pub fn publish(&mut self, prefix: &Path, file: &Path, date: Option<&str>) -> Result<PathBuf> {
        let date = resolve_date(date);
        let ymd = Ymd::parse(&date)?;
        let target = copy_into_bucket(prefix, file, &ymd)?;

        self.publish_document(&ymd, &target)?;
        self.updated = date::today();
        Ok(target)
    }

    /// Upsert a post at `years[Y] -> months[M] -> days[D]`, creating any
    /// missing container along the way.
    pub(crate) fn publish_document(&mut self, ymd: &Ymd, document: &Path) -> Result<()> {
        let post = Post::from_document(document, ymd)?;

        let year = find_or_insert_desc(&mut self.years, &ymd.year, |key| Year {
            year: key.to_string(),
            months: Vec::new(),
        });
        let month = find_or_insert_desc(&mut year.months, &ymd.month, |key| Month {
            month: key.to_string(),
            days: Vec::new(),
        });
        let day = find_or_insert_desc(&mut month.days, &ymd.day, |key| Day {
            day: key.to_string(),
            posts: Vec::new(),
        });

        day.upsert_post(post);
        Ok(())
    }

    /// Seed the index's site-level fields from configuration.
    ///
    /// Only non-empty configured values override what is already persisted.
    pub fn apply_site(&mut self, base: &BaseConfig) {
        let fields = [
            (&mut self.name, &base.name),
            (&mut self.quip, &base.quip),
            (&mut self.description, &base.description),
            (&mut self.copyright, &base.copyright),
            (&mut self.license, &base.license),
            (&mut self.language, &base.language),
            (&mut self.started, &base.started),
            (&mut self.ended, &base.ended),
        ];
        for (field, value) in fields {
            if !value.is_empty() {
                *field = value.clone();
            }
        }
        if let Some(url) = &base.url {
            self.base_url = url.clone();
        }
    }

    /// Iterate all posts newest-first, paired with their bucket date.
    pub fn posts(&self) -> impl Iterator<Item = (Ymd, &Post)> {
        self.years.iter().flat_map(|year| {
            year.months.iter().flat_map(move |month| {
                month.days.iter().flat_map(move |day| {
                    day.posts.iter().map(move |post| {
                        (
                            Ymd {
                                year: year.year.clone(),
                                month: month.month.clone(),
                                day: day.day.clone(),
                            },
                            post,
                        )
                    })
                })
            })
        })
    }

    /// Total number of posts across all buckets.
    pub fn post_count(&self) -> usize {
        self.posts().count()
    }
}

/// Copy a file into the date bucket under `prefix`, creating directories on
/// demand, without touching the index. This is the `asset` operation.
pub fn copy_asset(prefix: &Path, file: &Path, date: Option<&str>) -> Result<PathBuf> {
    let date = resolve_date(date);
    let ymd = Ymd::parse(&date)?;
    copy_into_bucket(prefix, file, &ymd)
}

fn resolve_date(date: Option<&str>) -> String {
    match date {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => date::today(),
    }
}

fn copy_into_bucket(prefix: &Path, file: &Path, ymd: &Ymd) -> Result<PathBuf> {
    let dir = prefix.join(&ymd.year).join(&ymd.month).join(&ymd.day);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {:?}", dir.display()))?;

    let file_name = file
        .file_name()
        .with_context(|| format!("{:?} has no file name", file.display()))?;
    let target = dir.join(file_name);
    fs::copy(file, &target)
        .with_context(|| format!("failed to copy {:?} to {:?}", file.display(), target.display()))?;
    Ok(target)
}

/// Find the container with the given key in a descending-sorted list, or
/// insert a new one at its sorted position (newest key first).
fn find_or_insert_desc<'a, T>(
    items: &'a mut Vec<T>,
    key: &str,
    make: impl FnOnce(&str) -> T,
) -> &'a mut T
where
    T: KeyedByDate,
{
    // Comparator reversed: the list is sorted descending by key
    let position = items.binary_search_by(|item| key.cmp(item.key()));
    let index = match position {
        Ok(i) => i,
        Err(i) => {
            items.insert(i, make(key));
            i
        }
    };
    &mut items[index]
}

/// Containers addressable by their zero-padded date component.
trait KeyedByDate {
    fn key(&self) -> &str;
}

impl KeyedByDate for Year {
    fn key(&self) -> &str {
        &self.year
    }
}

impl KeyedByDate for Month {
    fn key(&self) -> &str {
        &self.month
    }
}

impl KeyedByDate for Day {
    fn key(&self) -> &str {
        &self.day
    }
}
