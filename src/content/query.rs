//! Read-only queries over a finished chapter tree.

use std::collections::BTreeSet;

use super::Content;

/// Flatten a subtree into its canonical reading text.
///
/// Concatenates `text` leaves in document order, recursing through `para`
/// and `char`. Verse milestones contribute nothing (they are boundaries,
/// not content). `ref` leaves and entire `note` subtrees are skipped:
/// cross-reference labels and footnote bodies are not part of the text a
/// reader sees inline. Total over any valid tree.
pub fn contents_to_text(nodes: &[Content]) -> String {
    let mut out = String::new();
    append_text(nodes, &mut out);
    out
}

fn append_text(nodes: &[Content], out: &mut String) {
    for node in nodes {
        match node {
            Content::Text { text, .. } => out.push_str(text),
            Content::Para { contents, .. } | Content::Char { contents, .. } => {
                append_text(contents, out);
            }
            Content::Verse { .. } | Content::Ref { .. } | Content::Note { .. } => {}
        }
    }
}

/// Collect every `text` leaf bound to one of the requested verse numbers.
///
/// Depth-first, document order. Recurses through `para`, `char`, *and*
/// `note`: this query feeds highlight anchoring, where footnote text is
/// addressable, so its exclusion policy intentionally differs from
/// [`contents_to_text`]. `ref` leaves are not `text`-typed and never match.
/// An empty set or no matches yields an empty vec, never an error.
pub fn find_text_content_by_verse_numbers<'a>(
    nodes: &'a [Content],
    verse_numbers: &BTreeSet<u32>,
) -> Vec<&'a Content> {
    let mut found = Vec::new();
    collect_by_verse(nodes, verse_numbers, &mut found);
    found
}

fn collect_by_verse<'a>(
    nodes: &'a [Content],
    verse_numbers: &BTreeSet<u32>,
    found: &mut Vec<&'a Content>,
) {
    for node in nodes {
        match node {
            Content::Text { verse_number, .. } => {
                if verse_number.is_some_and(|n| verse_numbers.contains(&n)) {
                    found.push(node);
                }
            }
            Content::Para { contents, .. }
            | Content::Char { contents, .. }
            | Content::Note { contents, .. } => {
                collect_by_verse(contents, verse_numbers, found);
            }
            Content::Verse { .. } | Content::Ref { .. } => {}
        }
    }
}
