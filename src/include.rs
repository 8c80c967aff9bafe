//! File include preprocessor, in the Software Tools tradition.
//!
//! A line starting with `#include(FILENAME);` is replaced by the named
//! file's content, expanded recursively. Anything on the line after `);`
//! is dropped. Every other line passes through unchanged.

use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};

const PREFIX: &str = "#include(";
const SUFFIX: &str = ");";

/// Self-include chains deeper than this are treated as cycles.
const MAX_DEPTH: usize = 32;

/// Expand a file's include directives and return the result.
pub fn expand_file(input: &Path) -> Result<String> {
    let base = input.parent().unwrap_or_else(|| Path::new(".")).to_owned();
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    expand(&text, &base)
}

/// Expand include directives in `text`. Relative include names are resolved
/// against `base`.
pub fn expand(text: &str, base: &Path) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    expand_into(&mut out, text, base, 0)?;
    Ok(out)
}

fn expand_into(out: &mut String, text: &str, base: &Path, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        bail!("include depth exceeds {MAX_DEPTH}, probable include cycle");
    }

    for line in text.lines() {
        match include_name(line) {
            Some(name) => {
                let path = resolve(base, name);
                let included = fs::read_to_string(&path)
                    .with_context(|| format!("failed to include {}", path.display()))?;
                let nested_base = path.parent().unwrap_or(base).to_owned();
                expand_into(out, &included, &nested_base, depth + 1)?;
            }
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    Ok(())
}

/// File name carried by an include directive, if the line is one.
fn include_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(PREFIX)?;
    let end = rest.find(SUFFIX)?;
    Some(&rest[..end])
}

fn resolve(base: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_include_name() {
        assert_eq!(include_name("#include(toc.md);"), Some("toc.md"));
        assert_eq!(include_name("#include(a/b.md); trailing text"), Some("a/b.md"));
        // Directive must start the line
        assert_eq!(include_name("  #include(toc.md);"), None);
        // Unclosed directive is not a directive
        assert_eq!(include_name("#include(toc.md"), None);
        assert_eq!(include_name("plain text"), None);
    }

    #[test]
    fn test_expand_passthrough() {
        let tmp = tempdir().unwrap();
        let out = expand("line one\nline two\n", tmp.path()).unwrap();
        assert_eq!(out, "line one\nline two\n");
    }

    #[test]
    fn test_expand_single_include() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("part.md"), "included body\n").unwrap();

        let out = expand("before\n#include(part.md);\nafter\n", tmp.path()).unwrap();
        assert_eq!(out, "before\nincluded body\nafter\n");
    }

    #[test]
    fn test_expand_recursive_includes() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("outer.md"), "outer\n#include(inner.md);\n").unwrap();
        fs::write(tmp.path().join("inner.md"), "inner\n").unwrap();

        let out = expand("#include(outer.md);\n", tmp.path()).unwrap();
        assert_eq!(out, "outer\ninner\n");
    }

    #[test]
    fn test_expand_resolves_relative_to_including_file() {
        let tmp = tempdir().unwrap();
        fs::create_dir(tmp.path().join("chapters")).unwrap();
        fs::write(
            tmp.path().join("chapters/ch1.md"),
            "chapter one\n#include(ch1-notes.md);\n",
        )
        .unwrap();
        fs::write(tmp.path().join("chapters/ch1-notes.md"), "notes\n").unwrap();

        let out = expand("#include(chapters/ch1.md);\n", tmp.path()).unwrap();
        assert_eq!(out, "chapter one\nnotes\n");
    }

    #[test]
    fn test_expand_missing_file_errors() {
        let tmp = tempdir().unwrap();
        let err = expand("#include(nope.md);\n", tmp.path()).unwrap_err();
        assert!(err.to_string().contains("nope.md"));
    }

    #[test]
    fn test_expand_detects_cycle() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.md"), "#include(b.md);\n").unwrap();
        fs::write(tmp.path().join("b.md"), "#include(a.md);\n").unwrap();

        let err = expand("#include(a.md);\n", tmp.path()).unwrap_err();
        assert!(err.root_cause().to_string().contains("cycle"));
    }

    #[test]
    fn test_expand_file() {
        let tmp = tempdir().unwrap();
        let book = tmp.path().join("book.txt");
        fs::write(&book, "# Book\n\n#include(toc.md);\n").unwrap();
        fs::write(tmp.path().join("toc.md"), "- chapter 1\n").unwrap();

        let out = expand_file(&book).unwrap();
        assert_eq!(out, "# Book\n\n- chapter 1\n");
    }
}
