//! RSS feed generation from the persisted index.
//!
//! Items are emitted newest-first up to the configured limit. Draft posts
//! never appear in the feed.

use crate::{
    config::SiteConfig,
    convert::Converter,
    frontmatter,
    index::{BlogIndex, Post},
    log,
    utils::date::Ymd,
};
use anyhow::{Result, anyhow, bail};
use regex::Regex;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::{fs, path::Path, sync::LazyLock};

// ============================================================================
// Public API
// ============================================================================

/// Build the RSS feed and write it to the configured path.
pub fn build_feed(
    config: &SiteConfig,
    index: &BlogIndex,
    converter: Option<&dyn Converter>,
) -> Result<()> {
    RssFeed::build(config, index)?.write(config, converter)
}

// ============================================================================
// RssFeed Implementation
// ============================================================================

/// RSS feed builder over the index's newest posts.
struct RssFeed<'a> {
    config: &'a SiteConfig,
    index: &'a BlogIndex,
    posts: Vec<(Ymd, &'a Post)>,
}

impl<'a> RssFeed<'a> {
    /// Collect the newest posts up to the feed limit, skipping drafts.
    fn build(config: &'a SiteConfig, index: &'a BlogIndex) -> Result<Self> {
        if index.base_url.is_empty() {
            bail!("a feed needs [base.url] set (items carry absolute links)");
        }
        let posts: Vec<_> = index
            .posts()
            .filter(|(_, post)| !post.draft)
            .take(config.feed.limit)
            .collect();

        Ok(Self {
            config,
            index,
            posts,
        })
    }

    /// Generate the feed XML string.
    fn into_xml(self, converter: Option<&dyn Converter>) -> Result<String> {
        let items: Vec<_> = self
            .posts
            .iter()
            .map(|(ymd, post)| post_to_rss_item(ymd, post, self.index, self.config, converter))
            .collect();

        let channel = ChannelBuilder::default()
            .title(&self.index.name)
            .link(&self.index.base_url)
            .description(&self.index.description)
            .language(non_empty(&self.index.language))
            .copyright(non_empty(&self.index.copyright))
            .generator("folio".to_string())
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| anyhow!("rss validation failed: {e}"))?;
        Ok(channel.to_string())
    }

    /// Write the feed to the configured output file.
    fn write(self, config: &SiteConfig, converter: Option<&dyn Converter>) -> Result<()> {
        let feed_path = config.feed.path.clone();
        let xml = self.into_xml(converter)?;

        if let Some(parent) = feed_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&feed_path, &xml)?;

        log!("rss"; "{}", feed_path.display());
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a post record to an RSS item.
fn post_to_rss_item(
    ymd: &Ymd,
    post: &Post,
    index: &BlogIndex,
    config: &SiteConfig,
    converter: Option<&dyn Converter>,
) -> rss::Item {
    let link = super::post_url(&index.base_url, ymd, &post.slug);
    // Prefer the front-matter date over the bucket date for pubDate. Both
    // come from the persisted index, so neither is trusted: a post whose
    // dates fail to re-parse simply carries no pubDate.
    let pub_date = Ymd::parse(&post.created)
        .or_else(|_| Ymd::parse(&ymd.to_date_string()))
        .map(|d| d.to_rfc2822())
        .ok();
    let author = normalize_rss_author(post_author(post), config);
    let description = [&post.abstract_, &post.description]
        .into_iter()
        .find(|s| !s.is_empty())
        .cloned();
    let content = converter.and_then(|c| render_content(post, c));

    ItemBuilder::default()
        .title(non_empty(&post.title))
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(description)
        .content(content)
        .pub_date(pub_date)
        .author(author)
        .build()
}

/// Byline if present, otherwise the first listed creator.
fn post_author(post: &Post) -> Option<&String> {
    if !post.byline.is_empty() {
        return Some(&post.byline);
    }
    post.creators.first().map(|c| &c.name)
}

/// Render the post body to HTML for the item's full-content field.
///
/// Returns None when the document cannot be read, its markup format is
/// unknown, or conversion fails; the item then carries only its description.
fn render_content(post: &Post, converter: &dyn Converter) -> Option<String> {
    let path = Path::new(&post.document);
    let from = markup_format(path)?;
    let src = fs::read(path).ok()?;
    let split = frontmatter::split(&src);
    let body = std::str::from_utf8(split.body).ok()?;
    converter.convert(body, from, "html").ok()
}

/// Pandoc-style format name for a document extension.
fn markup_format(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "md" => Some("markdown"),
        "rst" => Some("rst"),
        "textile" => Some("textile"),
        "jira" => Some("jira"),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Normalize author field to RSS format: "email@example.com (Name)"
///
/// Priority:
/// 1. Post author if already in valid format
/// 2. Site config author if in valid format
/// 3. Combine site config email and author, when both are set
/// 4. The post author as-is
fn normalize_rss_author(author: Option<&String>, config: &SiteConfig) -> Option<String> {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });

    let author = author?;

    if RE_VALID_AUTHOR.is_match(author) {
        return Some(author.clone());
    }

    let site_author = &config.base.author;
    if RE_VALID_AUTHOR.is_match(site_author) {
        return Some(site_author.clone());
    }

    // Combining needs both halves; "mail@example.com ()" is not an author
    if config.base.email.is_empty() || site_author.is_empty() {
        return Some(author.clone());
    }
    Some(format!("{} ({})", config.base.email, site_author))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::stub::TagConverter;
    use crate::index::Creator;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn make_config(author: &str, email: &str) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.author = author.to_string();
        config.base.email = email.to_string();
        config
    }

    fn make_index(base_url: &str) -> BlogIndex {
        BlogIndex {
            name: "Test Blog".into(),
            description: "A test blog".into(),
            language: "en-US".into(),
            base_url: base_url.into(),
            ..BlogIndex::default()
        }
    }

    fn make_post(slug: &str, title: &str, created: &str) -> Post {
        Post {
            slug: slug.into(),
            title: title.into(),
            created: created.into(),
            ..Post::default()
        }
    }

    fn ymd(y: &str, m: &str, d: &str) -> Ymd {
        Ymd {
            year: y.into(),
            month: m.into(),
            day: d.into(),
        }
    }

    #[test]
    fn test_normalize_rss_author() {
        let config = make_config("Site Author", "site@example.com");

        let post_author = "post@example.com (Post Author)".to_string();
        assert_eq!(
            normalize_rss_author(Some(&post_author), &config),
            Some(post_author)
        );

        let bare_name = "Post Author".to_string();
        assert_eq!(
            normalize_rss_author(Some(&bare_name), &config),
            Some("site@example.com (Site Author)".to_string())
        );

        assert_eq!(normalize_rss_author(None, &config), None);

        let config_valid = make_config("site@example.com (Site Author)", "");
        assert_eq!(
            normalize_rss_author(Some(&bare_name), &config_valid),
            Some("site@example.com (Site Author)".to_string())
        );

        // No site author configured: pass the post byline through as-is
        let config_empty = make_config("", "");
        assert_eq!(
            normalize_rss_author(Some(&bare_name), &config_empty),
            Some(bare_name.clone())
        );

        // Email without an author name must not produce "email ()"
        let config_email_only = make_config("", "site@example.com");
        assert_eq!(
            normalize_rss_author(Some(&bare_name), &config_email_only),
            Some(bare_name)
        );
    }

    #[test]
    fn test_post_to_rss_item() {
        let config = make_config("Site Author", "site@example.com");
        let index = make_index("https://example.com");
        let mut post = make_post("hello", "Hello World", "2024-01-15");
        post.abstract_ = "A greeting".into();
        post.byline = "author@example.com (Author)".into();

        let item = post_to_rss_item(&ymd("2024", "01", "15"), &post, &index, &config, None);
        assert_eq!(item.title(), Some("Hello World"));
        assert_eq!(item.link(), Some("https://example.com/2024/01/15/hello.html"));
        assert_eq!(item.description(), Some("A greeting"));
        assert_eq!(item.author(), Some("author@example.com (Author)"));
        assert!(item.pub_date().unwrap().contains("Jan 2024"));
        assert!(item.guid().unwrap().is_permalink());
    }

    #[test]
    fn test_feed_tolerates_corrupt_bucket_date() {
        use crate::index::{Day, Month, Year};

        // A hand-edited blog.json can hold impossible date components; the
        // feed must come out without a pubDate rather than fall over
        let mut index = make_index("https://example.com");
        index.years = vec![Year {
            year: "2024".into(),
            months: vec![Month {
                month: "13".into(),
                days: vec![Day {
                    day: "01".into(),
                    posts: vec![make_post("hello", "Hello", "")],
                }],
            }],
        }];

        let config = make_config("", "");
        let xml = RssFeed::build(&config, &index)
            .unwrap()
            .into_xml(None)
            .unwrap();
        assert!(xml.contains("<title>Hello</title>"));
        assert!(!xml.contains("pubDate"));
    }

    #[test]
    fn test_item_pub_date_falls_back_to_bucket() {
        let config = make_config("", "");
        let index = make_index("https://example.com");
        let post = make_post("hello", "Hello", "");

        let item = post_to_rss_item(&ymd("2023", "06", "02"), &post, &index, &config, None);
        assert!(item.pub_date().unwrap().contains("Jun 2023"));
    }

    #[test]
    fn test_item_author_from_creators() {
        let config = make_config("", "");
        let index = make_index("https://example.com");
        let mut post = make_post("hello", "Hello", "2024-01-15");
        post.creators = vec![Creator {
            name: "Jane Doe".into(),
            orcid: String::new(),
        }];

        let item = post_to_rss_item(&ymd("2024", "01", "15"), &post, &index, &config, None);
        assert_eq!(item.author(), Some("Jane Doe"));
    }

    #[test]
    fn test_item_content_via_converter() {
        let tmp = tempdir().unwrap();
        let doc = tmp.path().join("hello.md");
        std::fs::write(&doc, "---\ntitle: Hello\n---\n# Hi\n").unwrap();

        let config = make_config("", "");
        let index = make_index("https://example.com");
        let mut post = make_post("hello", "Hello", "2024-01-15");
        post.document = doc.to_string_lossy().into_owned();

        let item = post_to_rss_item(
            &ymd("2024", "01", "15"),
            &post,
            &index,
            &config,
            Some(&TagConverter),
        );
        assert_eq!(item.content(), Some("[markdown->html]# Hi\n"));
    }

    #[test]
    fn test_markup_format() {
        assert_eq!(markup_format(Path::new("a.md")), Some("markdown"));
        assert_eq!(markup_format(Path::new("a.rst")), Some("rst"));
        assert_eq!(markup_format(Path::new("a.txt")), None);
        assert_eq!(markup_format(Path::new("noext")), None);
    }

    #[test]
    fn test_feed_skips_drafts_and_honors_limit() {
        let tmp = tempdir().unwrap();
        let doc = tmp.path().join("post.md");
        std::fs::write(&doc, "body\n").unwrap();
        let prefix = tmp.path().join("blog");

        let mut index = make_index("https://example.com");
        for day in ["2024-01-01", "2024-01-02", "2024-01-03"] {
            index.publish(&prefix, &doc, Some(day)).unwrap();
        }
        index.years[0].months[0].days[0].posts[0].draft = true;

        let mut config = make_config("", "");
        config.feed.limit = 2;

        let feed = RssFeed::build(&config, &index).unwrap();
        assert_eq!(feed.posts.len(), 2);
        let dates: Vec<_> = feed
            .posts
            .iter()
            .map(|(ymd, _)| ymd.to_date_string())
            .collect();
        // Newest (2024-01-03) is the draft
        assert_eq!(dates, ["2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn test_feed_requires_base_url() {
        let config = make_config("", "");
        let index = make_index("");
        assert!(RssFeed::build(&config, &index).is_err());
    }

    #[test]
    fn test_feed_xml_validates() {
        let tmp = tempdir().unwrap();
        let doc = tmp.path().join("hello.md");
        std::fs::write(&doc, "---\ntitle: Hello\nabstract: hi there\n---\nBody\n").unwrap();

        let mut index = make_index("https://example.com");
        index
            .publish(&tmp.path().join("blog"), &doc, Some("2024-01-15"))
            .unwrap();

        let config = make_config("Site Author", "site@example.com");
        let xml = RssFeed::build(&config, &index)
            .unwrap()
            .into_xml(None)
            .unwrap();

        assert!(xml.contains("<title>Test Blog</title>"));
        assert!(xml.contains("<title>Hello</title>"));
        assert!(xml.contains("https://example.com/2024/01/15/hello.html"));
        assert!(xml.contains("<description>hi there</description>"));
    }

    #[test]
    fn test_build_feed_writes_file() {
        let tmp = tempdir().unwrap();
        let doc = tmp.path().join("hello.md");
        std::fs::write(&doc, "---\ntitle: Hello\n---\nBody\n").unwrap();

        let mut index = make_index("https://example.com");
        index
            .publish(&tmp.path().join("blog"), &doc, Some("2024-01-15"))
            .unwrap();

        let mut config = make_config("", "");
        config.feed.path = PathBuf::from(tmp.path().join("out/feed.xml"));

        build_feed(&config, &index, None).unwrap();
        let xml = std::fs::read_to_string(config.feed.path).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<rss"));
    }
}
