//! Output generators fed from the persisted index.

pub mod rss;
pub mod sitemap;

use crate::utils::date::Ymd;

/// Absolute URL of a published post: `BASE/YYYY/MM/DD/SLUG.html`.
pub(crate) fn post_url(base_url: &str, ymd: &Ymd, slug: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}/{}/{}/{}/{slug}.html", ymd.year, ymd.month, ymd.day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd() -> Ymd {
        Ymd {
            year: "2024".into(),
            month: "01".into(),
            day: "15".into(),
        }
    }

    #[test]
    fn test_post_url() {
        assert_eq!(
            post_url("https://example.com", &ymd(), "hello"),
            "https://example.com/2024/01/15/hello.html"
        );
    }

    #[test]
    fn test_post_url_trims_trailing_slash() {
        assert_eq!(
            post_url("https://example.com/", &ymd(), "hello"),
            "https://example.com/2024/01/15/hello.html"
        );
    }
}
