//! `[publish]` section configuration.
//!
//! Controls where date-bucketed posts and the persisted index live.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[publish]` section in folio.toml.
///
/// # Example
/// ```toml
/// [publish]
/// prefix = "blog"
/// index = "blog.json"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Prefix directory placed before the `YYYY/MM/DD` buckets.
    #[serde(default = "defaults::publish::prefix")]
    #[educe(Default = defaults::publish::prefix())]
    pub prefix: PathBuf,

    /// Index file name, resolved under `prefix`. The extension selects the
    /// serialization format (.json, .yaml or .yml).
    #[serde(default = "defaults::publish::index")]
    #[educe(Default = defaults::publish::index())]
    pub index: PathBuf,

    /// Template path hint for index pages, carried in the persisted index.
    #[serde(default)]
    pub index_tmpl: String,

    /// Template path hint for post pages, carried in the persisted index.
    #[serde(default)]
    pub post_tmpl: String,
}
