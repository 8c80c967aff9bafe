//! `[base]` section configuration.
//!
//! Site-level metadata seeded into the persisted index and used by the feed
//! and sitemap generators.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in folio.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// name = "My Blog"
/// quip = "words, most days"
/// description = "A personal blog"
/// url = "https://myblog.example"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site name displayed in feeds and listings.
    #[serde(default)]
    pub name: String,

    /// Site tagline.
    #[serde(default)]
    pub quip: String,

    /// Site description for the feed channel.
    #[serde(default)]
    pub description: String,

    /// Author name for feed items without a byline.
    #[serde(default)]
    pub author: String,

    /// Author email for the feed author field.
    #[serde(default)]
    pub email: String,

    /// Base URL for absolute links in feed/sitemap.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// Copyright notice.
    #[serde(default)]
    pub copyright: String,

    /// Content license.
    #[serde(default)]
    pub license: String,

    /// BCP 47 language code (e.g., "en-US").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Date the site started publishing.
    #[serde(default)]
    pub started: String,

    /// Date the site stopped publishing, if it has.
    #[serde(default)]
    pub ended: String,
}
