//! USX chapter parsing.
//!
//! Entry points for turning one chapter's USX markup into a [`Content`]
//! tree. Parsing is a pure, synchronous transformation: no I/O, no shared
//! state, no retries. Each call builds its own tokenizer, verse cursor,
//! and container stack, so chapters can be parsed concurrently during bulk
//! import.

mod cursor;
mod parser;
mod tokenizer;

use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::error::{Position, Result};

/// Parse a chapter with default options, discarding warnings.
///
/// ```
/// use versicle::{contents_to_text, parse};
///
/// let tree = parse(r#"<para style="p"><verse number="1" style="v"/>In the beginning</para>"#)?;
/// assert_eq!(contents_to_text(&tree), "In the beginning");
/// # Ok::<(), versicle::Error>(())
/// ```
pub fn parse(usx: &str) -> Result<Vec<Content>> {
    parser::parse_document(usx, &ParseOptions::default()).map(|output| output.contents)
}

/// Parse a chapter, returning the tree together with any tolerated-markup
/// warnings for the ingestion pipeline to surface.
pub fn parse_with_options(usx: &str, options: &ParseOptions) -> Result<ParseOutput> {
    parser::parse_document(usx, options)
}

/// Call-time parser configuration. There is no ambient configuration:
/// everything is passed explicitly per parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// How to treat tags outside the supported dialect.
    pub unknown_tags: UnknownTagMode,
    /// Prefix for generated node ids, used to namespace per chapter
    /// (e.g. `"GEN.1."`). Ids are otherwise a deterministic counter.
    pub id_prefix: String,
}

/// Strictness toward markup dialect drift across publishers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTagMode {
    /// Skip the tag, flatten its children into the enclosing context, and
    /// record a [`ParseWarning`]. The default: a cosmetically unsupported
    /// tag should not fail an entire book import.
    #[default]
    Lenient,
    /// Treat any unknown tag as a structural error.
    Strict,
}

/// A successful parse: the chapter tree plus non-fatal warnings.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// Top-level content in document order.
    pub contents: Vec<Content>,
    /// Tolerated irregularities, in source order.
    pub warnings: Vec<ParseWarning>,
}

/// A non-fatal condition recorded during a lenient parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub message: String,
    pub position: Position,
}
