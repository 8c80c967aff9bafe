//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                       |
//! |-------------|-----------------------------------------------|
//! | `[base]`    | Site metadata (name, quip, url, copyright)    |
//! | `[publish]` | Prefix path and index file name               |
//! | `[feed]`    | RSS output path and item limit                |
//! | `[sitemap]` | Sitemap output path                           |
//! | `[extra]`   | User-defined custom fields                    |
//!
//! # Example
//!
//! ```toml
//! [base]
//! name = "My Blog"
//! description = "A personal blog"
//! url = "https://example.com"
//!
//! [publish]
//! prefix = "blog"
//! index = "blog.json"
//!
//! [feed]
//! path = "feed.xml"
//! limit = 24
//! ```

mod base;
pub mod defaults;
mod error;
mod feed;
mod publish;

pub use base::BaseConfig;
pub use feed::{FeedConfig, SitemapConfig};
pub use publish::PublishConfig;

use crate::cli::{Cli, Commands, SiteArgs};
use anyhow::{Result, bail};
use error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Publishing settings
    #[serde(default)]
    pub publish: PublishConfig,

    /// RSS feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Sitemap settings
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Path of the persisted index file, under the publish prefix.
    pub fn index_path(&self) -> PathBuf {
        self.publish.prefix.join(&self.publish.index)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));

        Self::update_option(&mut self.publish.prefix, cli.prefix.as_ref());
        Self::update_option(&mut self.publish.index, cli.index.as_ref());

        // Tilde-expand the prefix, then anchor relative paths at the root
        let expanded = shellexpand::tilde(&self.publish.prefix.to_string_lossy()).into_owned();
        let prefix = PathBuf::from(expanded);
        self.publish.prefix = if prefix.is_relative() {
            root.join(prefix)
        } else {
            prefix
        };
        if self.feed.path.is_relative() {
            self.feed.path = root.join(&self.feed.path);
        }
        if self.sitemap.path.is_relative() {
            self.sitemap.path = root.join(&self.sitemap.path);
        }

        match &cli.command {
            Commands::Publish { site, .. } | Commands::Refresh { site, .. } => {
                self.apply_site_args(site);
            }
            _ => {}
        }
    }

    /// Apply per-invocation site metadata overrides.
    fn apply_site_args(&mut self, site: &SiteArgs) {
        Self::update_option(&mut self.base.name, site.name.as_ref());
        Self::update_option(&mut self.base.quip, site.quip.as_ref());
        Self::update_option(&mut self.base.description, site.description.as_ref());
        Self::update_option(&mut self.base.copyright, site.copyright.as_ref());
        Self::update_option(&mut self.base.license, site.license.as_ref());
        Self::update_option(&mut self.base.language, site.language.as_ref());
        Self::update_option(&mut self.base.started, site.started.as_ref());
        Self::update_option(&mut self.base.ended, site.ended.as_ref());
        if site.url.is_some() {
            self.base.url = site.url.clone();
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::UrlScheme(base_url.clone()));
        }

        let supported = matches!(
            self.publish.index.extension().and_then(|e| e.to_str()),
            Some("json" | "yaml" | "yml")
        );
        if !supported {
            bail!(ConfigError::IndexExtension(self.publish.index.clone()));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let config_str = r#"
            [base]
            name = "My Blog"
            description = "A test blog"
            author = "Test Author"
        "#;
        let config = SiteConfig::from_str(config_str).unwrap();
        assert_eq!(config.base.name, "My Blog");
        assert_eq!(config.base.author, "Test Author");
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let invalid_config = r#"
            [base
            name = "My Blog"
        "#;
        assert!(SiteConfig::from_str(invalid_config).is_err());
    }

    #[test]
    fn test_index_path() {
        let config = r#"
            [publish]
            prefix = "phlog"
            index = "phlog.yaml"
        "#;
        let config = SiteConfig::from_str(config).unwrap();
        assert_eq!(config.index_path(), PathBuf::from("phlog/phlog.yaml"));
    }

    #[test]
    fn test_validate_url_scheme() {
        let config = r#"
            [base]
            url = "gopher://example.com"
        "#;
        let config = SiteConfig::from_str(config).unwrap();
        assert!(config.validate().is_err());

        let config = SiteConfig::from_str("[base]\nurl = \"https://example.com\"").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_index_extension() {
        let config = r#"
            [publish]
            index = "blog.toml"
        "#;
        let config = SiteConfig::from_str(config).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extra_fields() {
        let config = r#"
            [base]
            name = "Test"

            [extra]
            custom_field = "custom_value"
            number_field = 42
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(
            config.extra.get("custom_field").and_then(|v| v.as_str()),
            Some("custom_value")
        );
        assert_eq!(
            config.extra.get("number_field").and_then(|v| v.as_integer()),
            Some(42)
        );
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let config = r#"
            [base]
            name = "Test"

            [unknown_section]
            field = "value"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_with_cli_anchors_paths_at_root() {
        use clap::Parser;

        let cli = Cli::parse_from([
            "folio", "--root", "site", "--prefix", "phlog", "--index", "phlog.yaml", "sitemap",
        ]);
        let mut config = SiteConfig::default();
        config.update_with_cli(&cli);

        assert_eq!(config.publish.prefix, PathBuf::from("site/phlog"));
        assert_eq!(config.publish.index, PathBuf::from("phlog.yaml"));
        assert_eq!(config.feed.path, PathBuf::from("site/feed.xml"));
        assert_eq!(config.sitemap.path, PathBuf::from("site/sitemap.xml"));
        assert_eq!(config.index_path(), PathBuf::from("site/phlog/phlog.yaml"));
    }

    #[test]
    fn test_update_with_cli_site_overrides() {
        use clap::Parser;

        let cli = Cli::parse_from([
            "folio",
            "publish",
            "post.md",
            "--name",
            "New Name",
            "--base-url",
            "https://example.com",
        ]);
        let mut config = SiteConfig::default();
        config.base.name = "Old".into();
        config.update_with_cli(&cli);

        assert_eq!(config.base.name, "New Name");
        assert_eq!(config.base.url, Some("https://example.com".into()));
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();
        assert_eq!(config.base.name, "");
        assert_eq!(config.publish.prefix, PathBuf::from("blog"));
        assert_eq!(config.feed.limit, 24);
    }
}
