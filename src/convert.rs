//! Document conversion seam.
//!
//! Rendering markup to HTML is delegated to an external processor behind
//! this trait. The feed generator takes an optional converter to fill item
//! content; without one, items fall back to the post's abstract.

use anyhow::Result;

/// Converts document text between markup formats.
///
/// `from` and `to` name formats the way a processor like Pandoc does
/// ("markdown", "html", "rst", ...).
pub trait Converter {
    fn convert(&self, text: &str, from: &str, to: &str) -> Result<String>;
}


#[cfg(test)]
mod tests {
    use super::stub::TagConverter;
    use super::*;

    #[test]
    fn test_stub_converter_tags_output() {
        let out = TagConverter.convert("# Hi\n", "markdown", "html").unwrap();
        assert_eq!(out, "[markdown->html]# Hi\n");
    }
}
