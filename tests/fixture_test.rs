//! Fixture tests: parse a realistic chapter and persist it the way the
//! ingestion pipeline does, serializing the tree to a `.json` file.

use std::collections::BTreeSet;
use std::fs;

use tempfile::TempDir;

use versicle::{
    Content, ParseOptions, contents_to_text, find_text_content_by_verse_numbers,
    parse_with_options,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn load_fixture(name: &str) -> String {
    fs::read_to_string(format!("{FIXTURES_DIR}/{name}")).expect("fixture should be readable")
}

#[test]
fn genesis_chapter_parses_and_serializes() {
    let usx = load_fixture("genesis_1.usx");
    let output = parse_with_options(&usx, &ParseOptions::default()).expect("fixture should parse");
    assert!(!output.contents.is_empty());

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("GEN.1.json");
    let json = serde_json::to_string_pretty(&output.contents).unwrap();
    fs::write(&path, &json).unwrap();

    // The minimum observable contract: a non-empty .json file.
    let written = fs::read_to_string(&path).unwrap();
    assert!(!written.is_empty());

    // And the stricter one: the stored tree reads back identically.
    let restored: Vec<Content> = serde_json::from_str(&written).unwrap();
    assert_eq!(restored, output.contents);
}

#[test]
fn genesis_chapter_tolerates_wrapper_tags() {
    let usx = load_fixture("genesis_1.usx");
    let output = parse_with_options(&usx, &ParseOptions::default()).unwrap();

    // <usx> and <chapter> are outside the supported dialect; the chapter
    // still imports, with a warning each.
    let skipped: Vec<_> = output
        .warnings
        .iter()
        .map(|w| w.message.as_str())
        .collect();
    assert_eq!(skipped.len(), 2, "{skipped:?}");
    assert!(skipped[0].contains("usx"));
    assert!(skipped[1].contains("chapter"));
}

#[test]
fn genesis_chapter_reading_text() {
    let usx = load_fixture("genesis_1.usx");
    let output = parse_with_options(&usx, &ParseOptions::default()).unwrap();
    let text = contents_to_text(&output.contents);

    assert!(text.starts_with("The Creation"));
    assert!(text.contains("In the beginning, God created the heavens and the earth."));
    // The verse-5 poetry line crosses into the next paragraph.
    assert!(text.contains("the first day."));
    // Footnote body is not reading text.
    assert!(!text.contains("Compare"));
    assert!(!text.contains("John 1:1"));
}

#[test]
fn genesis_chapter_verse_lookup() {
    let usx = load_fixture("genesis_1.usx");
    let output = parse_with_options(&usx, &ParseOptions::default()).unwrap();

    let verse3 = find_text_content_by_verse_numbers(&output.contents, &BTreeSet::from([3]));
    let texts: Vec<_> = verse3
        .iter()
        .filter_map(|c| match c {
            Content::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    // Includes the footnote's body text (anchor gathering), not just the
    // running text.
    assert!(texts.iter().any(|t| t.contains("God said, ")));
    assert!(texts.iter().any(|t| t.contains("1:3")));

    // Verse 5 continues into the q2 paragraph without a new milestone.
    let verse5 = find_text_content_by_verse_numbers(&output.contents, &BTreeSet::from([5]));
    let last = verse5.last().expect("verse 5 should have leaves");
    if let Content::Text { text, .. } = last {
        assert!(text.contains("the first day"));
    } else {
        panic!("expected text leaf, got {last:?}");
    }
}
