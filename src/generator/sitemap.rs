//! Sitemap generation from the persisted index.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/2024/01/15/hello.html</loc>
//!     <lastmod>2024-01-15</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{config::SiteConfig, index::BlogIndex, log, utils::date::Ymd};
use anyhow::{Context, Result, bail};
use std::fs;

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// Public API
// ============================================================================

/// Build the sitemap and write it to the configured path.
pub fn build_sitemap(config: &SiteConfig, index: &BlogIndex) -> Result<()> {
    if index.base_url.is_empty() {
        bail!("a sitemap needs [base.url] set (entries carry absolute links)");
    }
    Sitemap::from_index(index).write(config)
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
struct Sitemap {
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (YYYY-MM-DD), empty when unknown
    lastmod: String,
}

impl Sitemap {
    /// One entry per indexed post, newest first. Drafts are skipped.
    fn from_index(index: &BlogIndex) -> Self {
        let urls: Vec<UrlEntry> = index
            .posts()
            .filter(|(_, post)| !post.draft)
            .map(|(ymd, post)| UrlEntry {
                loc: super::post_url(&index.base_url, &ymd, &post.slug),
                lastmod: lastmod_of(&ymd, &post.updated, &post.created),
            })
            .collect();

        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if !entry.lastmod.is_empty() {
                xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to the configured output file.
    fn write(self, config: &SiteConfig) -> Result<()> {
        let sitemap_path = &config.sitemap.path;
        let xml = self.into_xml();

        if let Some(parent) = sitemap_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(sitemap_path, &xml)
            .with_context(|| format!("failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{}", sitemap_path.display());
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Last-modified date for a post: `updated`, else `created`, else the
/// bucket date. Values that fail to parse as dates are passed over.
fn lastmod_of(ymd: &Ymd, updated: &str, created: &str) -> String {
    [updated, created]
        .into_iter()
        .find_map(|s| Ymd::parse(s).ok())
        .unwrap_or_else(|| ymd.clone())
        .to_date_string()
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// Tests
// ============================================================================
