//! Typed errors for loading and validating `folio.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// What can go wrong between reading folio.toml and running a verb.
///
/// The validation variants name the offending config key so the message
/// points straight at the line to fix.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config")]
    Toml(#[from] toml::de::Error),

    #[error("[base.url] must start with http:// or https://, got `{0}`")]
    UrlScheme(String),

    #[error("[publish.index] `{0}` has an unsupported extension, expecting .json, .yaml or .yml")]
    IndexExtension(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_errors_name_the_offending_key() {
        let err = ConfigError::Io(
            PathBuf::from("folio.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("folio.toml"));

        let err = ConfigError::UrlScheme("gopher://example.com".into());
        let display = err.to_string();
        assert!(display.contains("[base.url]"));
        assert!(display.contains("gopher://example.com"));

        let err = ConfigError::IndexExtension(PathBuf::from("blog.toml"));
        let display = err.to_string();
        assert!(display.contains("[publish.index]"));
        assert!(display.contains("blog.toml"));
    }
}
