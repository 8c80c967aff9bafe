//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn language() -> String {
        "en-US".into()
    }
}

pub mod publish {
    use std::path::PathBuf;

    pub fn prefix() -> PathBuf {
        "blog".into()
    }

    pub fn index() -> PathBuf {
        "blog.json".into()
    }
}

pub mod feed {
    use std::path::PathBuf;

    pub fn path() -> PathBuf {
        "feed.xml".into()
    }

    pub fn limit() -> usize {
        24
    }
}

pub mod sitemap {
    use std::path::PathBuf;

    pub fn path() -> PathBuf {
        "sitemap.xml".into()
    }
}
