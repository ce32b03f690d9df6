//! The chapter content tree.
//!
//! A parsed chapter is an ordered sequence of [`Content`] nodes. The tree is
//! built once during ingestion, serialized, and read many times by the
//! reader UI, highlight persistence, and reference-link builder, all of
//! which pattern-match on the serialized `type` tag. The JSON shape here
//! is a contract, not an implementation detail.

mod query;

pub use query::{contents_to_text, find_text_content_by_verse_numbers};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Markup attributes copied verbatim from a tag (`style`, `strong`, `loc`).
///
/// Ordered so serialized output is deterministic.
pub type Attrs = BTreeMap<String, String>;

/// One node of the chapter tree.
///
/// Two nesting disciplines coexist here. `para`, `char`, and `note` are
/// *owning* containers: their children live in `contents` in document
/// order. `verse` and `text`/`ref` are leaves; in particular a verse is a
/// *milestone* that marks where a verse begins without holding its text,
/// so a single verse's words can span paragraph boundaries.
///
/// Verse-bound nodes (`text`, `ref`, `char`, `note`) carry the id and
/// number of the nearest verse milestone preceding them in document order,
/// not their XML ancestor, which may be a paragraph the verse started
/// outside of. Nodes produced before any milestone (chapter headings) have
/// no binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Milestone marking the start of verse `number`. Holds no text.
    Verse {
        id: String,
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
        number: u32,
    },

    /// A run of reading text, segmented exactly as the markup was.
    #[serde(rename_all = "camelCase")]
    Text {
        id: String,
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verse_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verse_number: Option<u32>,
    },

    /// A cross-reference leaf. `attrs["loc"]` carries the target location
    /// string (`"GEN 1:1"`) used to build navigation links; `text` is the
    /// human-readable label. Not part of the canonical reading text.
    #[serde(rename_all = "camelCase")]
    Ref {
        id: String,
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verse_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verse_number: Option<u32>,
    },

    /// Inline character-styled run (emphasis, poetry indents, word-level
    /// tagging such as Strong's numbers in `attrs["strong"]`).
    #[serde(rename_all = "camelCase")]
    Char {
        id: String,
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
        contents: Vec<Content>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verse_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verse_number: Option<u32>,
    },

    /// Paragraph-level block (body paragraph, heading, poetry line).
    /// Never verse-bound: one paragraph can span a verse boundary or
    /// precede the first verse entirely.
    Para {
        id: String,
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
        contents: Vec<Content>,
    },

    /// Footnote or cross-reference-note body. Verse-bound, but excluded
    /// from plain-text flattening.
    #[serde(rename_all = "camelCase")]
    Note {
        id: String,
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
        contents: Vec<Content>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verse_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        verse_number: Option<u32>,
    },
}

impl Content {
    /// The node's process-unique id (DOM anchor key, highlight foreign key).
    pub fn id(&self) -> &str {
        match self {
            Content::Verse { id, .. }
            | Content::Text { id, .. }
            | Content::Ref { id, .. }
            | Content::Char { id, .. }
            | Content::Para { id, .. }
            | Content::Note { id, .. } => id,
        }
    }

    /// Markup attributes carried by the node.
    pub fn attrs(&self) -> &Attrs {
        match self {
            Content::Verse { attrs, .. }
            | Content::Text { attrs, .. }
            | Content::Ref { attrs, .. }
            | Content::Char { attrs, .. }
            | Content::Para { attrs, .. }
            | Content::Note { attrs, .. } => attrs,
        }
    }

    /// Children of an owning container; empty for leaves.
    pub fn contents(&self) -> &[Content] {
        match self {
            Content::Char { contents, .. }
            | Content::Para { contents, .. }
            | Content::Note { contents, .. } => contents,
            Content::Verse { .. } | Content::Text { .. } | Content::Ref { .. } => &[],
        }
    }

    /// The verse number the node is bound to, if any.
    ///
    /// For a `verse` milestone this is its own number; `para` is never
    /// bound.
    pub fn verse_number(&self) -> Option<u32> {
        match self {
            Content::Verse { number, .. } => Some(*number),
            Content::Text { verse_number, .. }
            | Content::Ref { verse_number, .. }
            | Content::Char { verse_number, .. }
            | Content::Note { verse_number, .. } => *verse_number,
            Content::Para { .. } => None,
        }
    }

    /// The id of the verse milestone the node is bound to, if any.
    pub fn verse_id(&self) -> Option<&str> {
        match self {
            Content::Verse { id, .. } => Some(id),
            Content::Text { verse_id, .. }
            | Content::Ref { verse_id, .. }
            | Content::Char { verse_id, .. }
            | Content::Note { verse_id, .. } => verse_id.as_deref(),
            Content::Para { .. } => None,
        }
    }

    /// Whether the node is a non-owning leaf (`verse`, `text`, `ref`).
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Content::Verse { .. } | Content::Text { .. } | Content::Ref { .. }
        )
    }
}
