//! # versicle
//!
//! A parser for USX (Unified Scripture XML) chapters, producing an
//! in-memory, serializable content tree with verse attribution.
//!
//! USX mixes two nesting disciplines: paragraph and character markup nest
//! normally, but verse boundaries are *milestones*, self-closing markers
//! that cross paragraph boundaries instead of wrapping their text. The
//! parser reconciles the two, stamping every text run, character-styled
//! span, and footnote with the verse that was open where it appears in
//! document order. The resulting tree is a plain value: stored once as
//! JSON, read thousands of times by whatever renders, highlights, or
//! indexes the text.
//!
//! ## Quick Start
//!
//! ```
//! use std::collections::BTreeSet;
//! use versicle::{contents_to_text, find_text_content_by_verse_numbers, parse};
//!
//! let usx = r#"<para style="p">
//!   <verse number="1" style="v"/>In the beginning
//!   <char style="w" strong="H0430">God</char> created.</para>"#;
//!
//! let tree = parse(usx)?;
//!
//! // Flatten to the canonical reading text.
//! let text = contents_to_text(&tree);
//! assert!(text.contains("God created."));
//!
//! // Collect the text leaves of verse 1, e.g. to anchor highlights.
//! let leaves = find_text_content_by_verse_numbers(&tree, &BTreeSet::from([1]));
//! assert!(!leaves.is_empty());
//! # Ok::<(), versicle::Error>(())
//! ```
//!
//! ## Errors and leniency
//!
//! Parsing either returns a complete tree or fails; never a partial tree,
//! because truncated output with broken verse attribution is undetectable
//! downstream. Lexical problems are [`Error::MalformedMarkup`], nesting
//! problems are [`Error::Structural`]. The one tolerated condition is an
//! unknown tag, controlled by [`UnknownTagMode`] via
//! [`parse_with_options`].

pub mod content;
pub mod error;
pub mod usx;

pub use content::{Attrs, Content, contents_to_text, find_text_content_by_verse_numbers};
pub use error::{Error, Position, Result};
pub use usx::{ParseOptions, ParseOutput, ParseWarning, UnknownTagMode, parse, parse_with_options};
