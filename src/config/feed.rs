//! `[feed]` and `[sitemap]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[feed]` section in folio.toml - RSS output settings.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Output path for the feed, relative to the project root.
    #[serde(default = "defaults::feed::path")]
    #[educe(Default = defaults::feed::path())]
    pub path: PathBuf,

    /// Maximum number of items carried in the feed, newest first.
    #[serde(default = "defaults::feed::limit")]
    #[educe(Default = defaults::feed::limit())]
    pub limit: usize,
}

/// `[sitemap]` section in folio.toml.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Output path for the sitemap, relative to the project root.
    #[serde(default = "defaults::sitemap::path")]
    #[educe(Default = defaults::sitemap::path())]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_feed_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert_eq!(config.feed.path, PathBuf::from("feed.xml"));
        assert_eq!(config.feed.limit, 24);
        assert_eq!(config.sitemap.path, PathBuf::from("sitemap.xml"));
    }

    #[test]
    fn test_feed_overrides() {
        let config = r#"
            [feed]
            path = "rss.xml"
            limit = 10

            [sitemap]
            path = "site/sitemap.xml"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert_eq!(config.feed.path, PathBuf::from("rss.xml"));
        assert_eq!(config.feed.limit, 10);
        assert_eq!(config.sitemap.path, PathBuf::from("site/sitemap.xml"));
    }
}
