//! Front-matter detection, splitting, and decoding.
//!
//! A document may start with one of three metadata block styles:
//!
//! - a JSON object delimited by `{\n ... \n}\n`
//! - a YAML block fenced by `---\n ... \n---\n`
//! - a legacy Pandoc metadata block of three `% `-prefixed lines
//!   (title, authors, date)
//!
//! [`split`] separates the metadata bytes from the body without copying, so
//! that concatenating the two halves always reconstructs the input exactly.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::fmt;

/// Front-matter block style detected at the start of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// No metadata block present.
    None,
    /// JSON object front matter.
    Json,
    /// YAML fenced front matter.
    Yaml,
    /// Legacy Pandoc three-line metadata block.
    Pandoc,
}

/// A document split into metadata and body byte slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub format: Format,
    /// Metadata bytes including their delimiters. Empty when `format` is
    /// [`Format::None`].
    pub meta: &'a [u8],
    /// Remaining document body.
    pub body: &'a [u8],
}

/// Split a document into front matter and body.
///
/// Formats are checked by literal byte prefix in priority order. When the
/// closing delimiter of a block is missing, the entire remainder is treated
/// as metadata and the body is empty.
pub fn split(input: &[u8]) -> Split<'_> {
    if input.starts_with(b"{\n") {
        return split_at_close(input, Format::Json, b"\n}\n");
    }
    if input.starts_with(b"---\n") {
        // Skip the opening fence so an immediately-closing block still works
        return split_at_close(input, Format::Yaml, b"\n---\n");
    }
    if input.starts_with(b"% ")
        && let Some(split) = split_pandoc(input)
    {
        return split;
    }
    Split {
        format: Format::None,
        meta: b"",
        body: input,
    }
}

/// Split at the first occurrence of `close` after the opening delimiter.
fn split_at_close<'a>(input: &'a [u8], format: Format, close: &[u8]) -> Split<'a> {
    match find(input, close, 1) {
        Some(i) => {
            let end = i + close.len();
            Split {
                format,
                meta: &input[..end],
                body: &input[end..],
            }
        }
        None => Split {
            format,
            meta: input,
            body: b"",
        },
    }
}

/// Split a legacy Pandoc metadata block.
///
/// Consumes lines until three `% `-prefixed fields have been seen;
/// continuation lines between fields are part of the block. Returns `None`
/// when fewer than three fields are present, in which case the whole input
/// is body.
fn split_pandoc(input: &[u8]) -> Option<Split<'_>> {
    let mut field_count = 0;
    let mut meta_len = 0;

    for line in input.split_inclusive(|&b| b == b'\n') {
        if field_count == 3 {
            break;
        }
        if line.starts_with(b"% ") {
            field_count += 1;
        }
        meta_len += line.len();
    }

    (field_count == 3).then(|| Split {
        format: Format::Pandoc,
        meta: &input[..meta_len],
        body: &input[meta_len..],
    })
}

/// Find `needle` in `haystack` starting at byte offset `from`.
fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if haystack.len() < from + needle.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

// ============================================================================
// Pandoc metadata block
// ============================================================================

/// Parser state for the legacy Pandoc block.
///
/// Each `% `-prefixed line advances the state; lines without the prefix are
/// continuations of the field opened by the previous state. Dates are single
/// line, so the third field closes the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    ExpectTitle,
    ExpectAuthors,
    ExpectDate,
    Done,
}

/// Legacy Pandoc metadata block: `% title`, `% authors`, `% date`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PandocBlock {
    pub title: String,
    pub authors: Vec<String>,
    pub date: String,
}

impl PandocBlock {
    /// Parse a metadata block from raw bytes.
    ///
    /// Fails when the block has fewer than the three expected fields.
    pub fn parse(src: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(src).context("metadata block is not valid UTF-8")?;

        let mut block = Self::default();
        let mut state = BlockState::ExpectTitle;

        for line in text.lines() {
            if let Some(rest) = line.strip_prefix("% ") {
                state = match state {
                    BlockState::ExpectTitle => {
                        block.title = rest.trim().to_string();
                        BlockState::ExpectAuthors
                    }
                    BlockState::ExpectAuthors => {
                        block.push_authors(rest);
                        BlockState::ExpectDate
                    }
                    BlockState::ExpectDate => {
                        block.date = rest.trim().to_string();
                        BlockState::Done
                    }
                    BlockState::Done => BlockState::Done,
                };
            } else {
                // Continuation line extends the field opened above it
                match state {
                    BlockState::ExpectAuthors if !line.trim().is_empty() => {
                        block.title.push('\n');
                        block.title.push_str(line.trim());
                    }
                    BlockState::ExpectDate if !line.trim().is_empty() => {
                        block.push_authors(line);
                    }
                    _ => {}
                }
            }
        }

        if state != BlockState::Done {
            bail!("missing or ill formed metablock, expecting title, author(s), date");
        }
        Ok(block)
    }

    /// Append one or more authors from a `;`-separated line.
    fn push_authors(&mut self, line: &str) {
        for part in line.split(';') {
            let part = part.trim();
            if !part.is_empty() {
                self.authors.push(part.to_string());
            }
        }
    }

    /// Convert to the generic string-keyed map used by metadata extraction.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("title".into(), Value::String(self.title.clone()));
        map.insert(
            "authors".into(),
            Value::Array(
                self.authors
                    .iter()
                    .map(|a| Value::String(a.clone()))
                    .collect(),
            ),
        );
        map.insert("date".into(), Value::String(self.date.clone()));
        map
    }
}

impl fmt::Display for PandocBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "% {}\n% {}\n% {}",
            self.title,
            self.authors.join("; "),
            self.date
        )
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode front-matter bytes into a generic string-keyed map.
///
/// The map values keep their decoded types; field-level coercion is the
/// caller's concern.
pub fn decode(format: Format, meta: &[u8]) -> Result<Map<String, Value>> {
    match format {
        Format::None => Ok(Map::new()),
        Format::Json => {
            let value: Value =
                serde_json::from_slice(meta).context("malformed JSON front matter")?;
            match value {
                Value::Object(map) => Ok(map),
                _ => bail!("JSON front matter is not an object"),
            }
        }
        Format::Yaml => {
            let src = strip_yaml_fences(meta);
            let value: Value =
                serde_yaml::from_slice(src).context("malformed YAML front matter")?;
            match value {
                Value::Object(map) => Ok(map),
                Value::Null => Ok(Map::new()),
                _ => bail!("YAML front matter is not a mapping"),
            }
        }
        Format::Pandoc => Ok(PandocBlock::parse(meta)?.to_map()),
    }
}

/// Remove the `---` fences so the block parses as a single YAML document.
fn strip_yaml_fences(meta: &[u8]) -> &[u8] {
    let meta = meta.strip_prefix(b"---\n").unwrap_or(meta);
    meta.strip_suffix(b"---\n")
        .and_then(|m| m.strip_suffix(b"\n").or(Some(m)))
        .unwrap_or(meta)
}
