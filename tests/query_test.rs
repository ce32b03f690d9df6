//! Tree-utility tests over parsed chapters.

use std::collections::BTreeSet;

use versicle::{Content, contents_to_text, find_text_content_by_verse_numbers, parse};

const CHAPTER: &str = concat!(
    r#"<para style="s1">The Creation</para>"#,
    r#"<para style="p"><verse number="1" style="v"/>In the beginning, "#,
    r#"<char style="w" strong="H0430">God</char> created the heavens and the earth. "#,
    r#"<verse number="2" style="v"/>The earth was formless and empty."#,
    r#"<note style="f" caller="+">Or: <char style="ft">waste and void</char></note></para>"#,
    r#"<para style="p"><verse number="3" style="v"/>God said, "#,
    r#"<ref loc="JHN 1:1">John 1:1</ref> echoes this.</para>"#,
);

// ============================================================================
// contents_to_text
// ============================================================================

#[test]
fn flattened_text_has_no_markup() {
    let tree = parse(CHAPTER).unwrap();
    let text = contents_to_text(&tree);
    assert!(!text.contains('<'));
    assert!(!text.contains('>'));
    assert!(!text.contains("style"));
}

#[test]
fn flattened_text_excludes_notes_and_refs() {
    let tree = parse(CHAPTER).unwrap();
    let text = contents_to_text(&tree);
    assert!(text.contains("In the beginning, God created"));
    assert!(text.contains("formless and empty."));
    // Footnote body and cross-reference label are not reading text.
    assert!(!text.contains("waste and void"));
    assert!(!text.contains("John 1:1"));
    // Text around the skipped ref is kept.
    assert!(text.contains("God said, "));
    assert!(text.contains(" echoes this."));
}

#[test]
fn flattened_text_includes_unbound_headings() {
    let tree = parse(CHAPTER).unwrap();
    assert!(contents_to_text(&tree).starts_with("The Creation"));
}

// ============================================================================
// find_text_content_by_verse_numbers
// ============================================================================

fn leaf_texts<'a>(leaves: &[&'a Content]) -> Vec<&'a str> {
    leaves
        .iter()
        .map(|c| match c {
            Content::Text { text, .. } => text.as_str(),
            other => panic!("query returned a non-text node: {other:?}"),
        })
        .collect()
}

#[test]
fn collects_only_requested_verses_in_document_order() {
    let tree = parse(CHAPTER).unwrap();
    let leaves = find_text_content_by_verse_numbers(&tree, &BTreeSet::from([1]));
    assert_eq!(
        leaf_texts(&leaves),
        ["In the beginning, ", "God", " created the heavens and the earth. "],
    );
    for leaf in &leaves {
        assert_eq!(leaf.verse_number(), Some(1));
    }
}

#[test]
fn note_text_is_included_for_anchoring() {
    let tree = parse(CHAPTER).unwrap();
    let leaves = find_text_content_by_verse_numbers(&tree, &BTreeSet::from([2]));
    let texts = leaf_texts(&leaves);
    assert!(texts.contains(&"Or: "));
    assert!(texts.contains(&"waste and void"));
}

#[test]
fn ref_leaves_are_not_text_typed() {
    let tree = parse(CHAPTER).unwrap();
    let leaves = find_text_content_by_verse_numbers(&tree, &BTreeSet::from([3]));
    let texts = leaf_texts(&leaves);
    assert_eq!(texts, ["God said, ", " echoes this."]);
}

#[test]
fn multiple_verses_collect_across_paragraphs() {
    let tree = parse(CHAPTER).unwrap();
    let leaves = find_text_content_by_verse_numbers(&tree, &BTreeSet::from([1, 3]));
    let texts = leaf_texts(&leaves);
    assert_eq!(texts.first(), Some(&"In the beginning, "));
    assert_eq!(texts.last(), Some(&" echoes this."));
}

#[test]
fn absent_verse_yields_empty() {
    let tree = parse(CHAPTER).unwrap();
    assert!(find_text_content_by_verse_numbers(&tree, &BTreeSet::from([40])).is_empty());
    assert!(find_text_content_by_verse_numbers(&tree, &BTreeSet::new()).is_empty());
    assert!(find_text_content_by_verse_numbers(&[], &BTreeSet::from([1])).is_empty());
}

#[test]
fn query_is_idempotent() {
    let tree = parse(CHAPTER).unwrap();
    let wanted = BTreeSet::from([1, 2, 3]);
    let first = find_text_content_by_verse_numbers(&tree, &wanted);
    let second = find_text_content_by_verse_numbers(&tree, &wanted);
    assert_eq!(first, second);
}
