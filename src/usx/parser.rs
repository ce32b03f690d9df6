//! Structural parser: token stream -> chapter content tree.
//!
//! The parser walks the tokenizer's events with an explicit frame stack for
//! the owning containers (`para`, `char`, `note`) and reads verse
//! attribution from the [`VerseCursor`] rather than the element nesting:
//! verse markers are milestones that cross container boundaries, so a
//! node's verse is "the last marker seen", never "the enclosing element".

use crate::content::{Attrs, Content};
use crate::error::{Error, Position, Result};

use super::cursor::{IdGenerator, VerseCursor};
use super::tokenizer::{Token, Tokenizer};
use super::{ParseOptions, ParseOutput, ParseWarning, UnknownTagMode};

/// Parse one chapter's USX markup into its content tree.
pub(crate) fn parse_document(usx: &str, options: &ParseOptions) -> Result<ParseOutput> {
    // All parse state is local to this call: chapters are parsed
    // concurrently during bulk import and must never share a cursor.
    let mut parser = ChapterParser {
        tokenizer: Tokenizer::new(usx),
        options,
        ids: IdGenerator::new(&options.id_prefix),
        cursor: VerseCursor::new(),
        stack: Vec::new(),
        root: Vec::new(),
        warnings: Vec::new(),
    };
    parser.run()
}

/// An open owning container (or tolerated foreign element) on the stack.
enum Frame {
    Para {
        id: String,
        attrs: Attrs,
        contents: Vec<Content>,
        opened_at: Position,
    },
    Char {
        id: String,
        attrs: Attrs,
        contents: Vec<Content>,
        verse_id: Option<String>,
        verse_number: Option<u32>,
        opened_at: Position,
    },
    Note {
        id: String,
        attrs: Attrs,
        contents: Vec<Content>,
        verse_id: Option<String>,
        verse_number: Option<u32>,
        opened_at: Position,
    },
    /// A cross-reference being read. Collects bare text only; the node
    /// model treats the whole reference as a single leaf.
    Ref {
        id: String,
        attrs: Attrs,
        text: String,
        verse_id: Option<String>,
        verse_number: Option<u32>,
        opened_at: Position,
    },
    /// An unrecognized element kept on the stack so its close tag pops
    /// cleanly. Transparent: children land in the nearest real container.
    Unknown { name: String, opened_at: Position },
}

impl Frame {
    fn tag_name(&self) -> &str {
        match self {
            Frame::Para { .. } => "para",
            Frame::Char { .. } => "char",
            Frame::Note { .. } => "note",
            Frame::Ref { .. } => "ref",
            Frame::Unknown { name, .. } => name,
        }
    }

    fn opened_at(&self) -> Position {
        match self {
            Frame::Para { opened_at, .. }
            | Frame::Char { opened_at, .. }
            | Frame::Note { opened_at, .. }
            | Frame::Ref { opened_at, .. }
            | Frame::Unknown { opened_at, .. } => *opened_at,
        }
    }
}

struct ChapterParser<'a> {
    tokenizer: Tokenizer<'a>,
    options: &'a ParseOptions,
    ids: IdGenerator,
    cursor: VerseCursor,
    stack: Vec<Frame>,
    root: Vec<Content>,
    warnings: Vec<ParseWarning>,
}

impl ChapterParser<'_> {
    fn run(mut self) -> Result<ParseOutput> {
        while let Some(token) = self.tokenizer.next_token()? {
            match token {
                Token::Open {
                    name,
                    attrs,
                    self_closing,
                    position,
                } => self.open_tag(&name, attrs, self_closing, position)?,
                Token::Close { name, position } => self.close_tag(&name, position)?,
                Token::Text { raw, position: _ } => self.text_run(raw),
            }
        }

        if let Some(frame) = self.stack.last() {
            return Err(Error::structural(
                format!(
                    "unexpected end of input: <{}> opened at {} is never closed",
                    frame.tag_name(),
                    frame.opened_at()
                ),
                self.tokenizer.end_position(),
            ));
        }

        Ok(ParseOutput {
            contents: self.root,
            warnings: self.warnings,
        })
    }

    // ------------------------------------------------------------------
    // Tag dispatch
    // ------------------------------------------------------------------

    fn open_tag(
        &mut self,
        name: &str,
        attrs: Attrs,
        self_closing: bool,
        position: Position,
    ) -> Result<()> {
        // Inside a reference, nested elements are flattened into the
        // reference's label text; the leaf model has no structure there.
        // A verse milestone is the exception: dropping one would corrupt
        // attribution for everything after it.
        if matches!(self.enclosing(), Some(Frame::Ref { .. })) {
            if name == "verse" {
                return Err(Error::structural(
                    "verse milestone inside a reference".to_string(),
                    position,
                ));
            }
            if !self_closing {
                self.stack.push(Frame::Unknown {
                    name: name.to_string(),
                    opened_at: position,
                });
            }
            return Ok(());
        }

        match name {
            "para" => self.open_para(attrs, self_closing, position),
            "char" => self.open_char(attrs, self_closing, position),
            "note" => self.open_note(attrs, self_closing, position),
            "verse" => self.verse_milestone(attrs, self_closing, position),
            "ref" => self.open_ref(attrs, self_closing, position),
            _ => self.open_unknown(name, self_closing, position),
        }
    }

    fn open_para(&mut self, attrs: Attrs, self_closing: bool, position: Position) -> Result<()> {
        if let Some(container) = self.enclosing() {
            return Err(Error::structural(
                format!("<para> inside <{}>", container.tag_name()),
                position,
            ));
        }
        let id = self.ids.next_id();
        if self_closing {
            // Blank-line markers like <para style="b"/> are legal paragraphs.
            self.root.push(Content::Para {
                id,
                attrs,
                contents: Vec::new(),
            });
        } else {
            self.stack.push(Frame::Para {
                id,
                attrs,
                contents: Vec::new(),
                opened_at: position,
            });
        }
        Ok(())
    }

    fn open_char(&mut self, attrs: Attrs, self_closing: bool, position: Position) -> Result<()> {
        match self.enclosing() {
            Some(Frame::Para { .. }) | Some(Frame::Char { .. }) | Some(Frame::Note { .. }) => {}
            _ => {
                return Err(Error::structural(
                    "<char> outside any paragraph".to_string(),
                    position,
                ));
            }
        }
        let id = self.ids.next_id();
        let (verse_id, verse_number) = self.attribution();
        if self_closing {
            self.append(Content::Char {
                id,
                attrs,
                contents: Vec::new(),
                verse_id,
                verse_number,
            });
        } else {
            self.stack.push(Frame::Char {
                id,
                attrs,
                contents: Vec::new(),
                verse_id,
                verse_number,
                opened_at: position,
            });
        }
        Ok(())
    }

    fn open_note(&mut self, attrs: Attrs, self_closing: bool, position: Position) -> Result<()> {
        match self.enclosing() {
            Some(Frame::Para { .. }) => {}
            Some(container) => {
                return Err(Error::structural(
                    format!("<note> inside <{}>", container.tag_name()),
                    position,
                ));
            }
            None => {
                return Err(Error::structural(
                    "<note> outside any paragraph".to_string(),
                    position,
                ));
            }
        }
        let id = self.ids.next_id();
        let (verse_id, verse_number) = self.attribution();
        if self_closing {
            self.append(Content::Note {
                id,
                attrs,
                contents: Vec::new(),
                verse_id,
                verse_number,
            });
        } else {
            self.stack.push(Frame::Note {
                id,
                attrs,
                contents: Vec::new(),
                verse_id,
                verse_number,
                opened_at: position,
            });
        }
        Ok(())
    }

    /// A verse marker is a milestone leaf: it opens a verse on the cursor
    /// and is emitted in place without changing the container context.
    fn verse_milestone(
        &mut self,
        mut attrs: Attrs,
        self_closing: bool,
        position: Position,
    ) -> Result<()> {
        let number = match attrs.remove("number") {
            Some(raw) => match leading_verse_number(&raw) {
                Some(number) => number,
                None => {
                    return Err(Error::structural(
                        format!("invalid verse number {raw:?}"),
                        position,
                    ));
                }
            },
            None if attrs.contains_key("eid") => {
                // USX 3 end milestone. The milestone model has no close
                // operation: the verse stays open until the next marker.
                return Ok(());
            }
            None => {
                return Err(Error::structural(
                    "verse milestone without a number".to_string(),
                    position,
                ));
            }
        };

        let id = self.cursor.open_verse(number, &mut self.ids);
        self.append(Content::Verse { id, attrs, number });

        // Odd markup can write the milestone as an open/close pair; keep a
        // transparent frame so the close tag pops cleanly.
        if !self_closing {
            self.stack.push(Frame::Unknown {
                name: "verse".to_string(),
                opened_at: position,
            });
        }
        Ok(())
    }

    fn open_ref(&mut self, attrs: Attrs, self_closing: bool, position: Position) -> Result<()> {
        let id = self.ids.next_id();
        let (verse_id, verse_number) = self.attribution();
        if self_closing {
            self.append(Content::Ref {
                id,
                attrs,
                text: String::new(),
                verse_id,
                verse_number,
            });
        } else {
            self.stack.push(Frame::Ref {
                id,
                attrs,
                text: String::new(),
                verse_id,
                verse_number,
                opened_at: position,
            });
        }
        Ok(())
    }

    /// Publishers drift from the supported dialect; an unrecognized tag is
    /// the one recoverable condition. Lenient mode flattens its children
    /// into the enclosing context and records a warning.
    fn open_unknown(&mut self, name: &str, self_closing: bool, position: Position) -> Result<()> {
        if self.options.unknown_tags == UnknownTagMode::Strict {
            return Err(Error::structural(format!("unknown tag <{name}>"), position));
        }
        self.warnings.push(ParseWarning {
            message: format!("skipped unknown tag <{name}>"),
            position,
        });
        if !self_closing {
            self.stack.push(Frame::Unknown {
                name: name.to_string(),
                opened_at: position,
            });
        }
        Ok(())
    }

    /// Pop the frame a close tag ends. Any mismatch is fatal: bad nesting
    /// of owning containers corrupts verse attribution downstream, and a
    /// truncated tree is indistinguishable from a complete one.
    fn close_tag(&mut self, name: &str, position: Position) -> Result<()> {
        let frame = match self.stack.pop() {
            Some(frame) if frame.tag_name() == name => frame,
            Some(frame) => {
                return Err(Error::structural(
                    format!(
                        "mismatched close tag </{}>, expected </{}>",
                        name,
                        frame.tag_name()
                    ),
                    position,
                ));
            }
            None => {
                return Err(Error::structural(
                    format!("close tag </{name}> with no open element"),
                    position,
                ));
            }
        };

        let node = match frame {
            Frame::Para { id, attrs, contents, .. } => Some(Content::Para {
                id,
                attrs,
                contents,
            }),
            Frame::Char {
                id,
                attrs,
                contents,
                verse_id,
                verse_number,
                ..
            } => Some(Content::Char {
                id,
                attrs,
                contents,
                verse_id,
                verse_number,
            }),
            Frame::Note {
                id,
                attrs,
                contents,
                verse_id,
                verse_number,
                ..
            } => Some(Content::Note {
                id,
                attrs,
                contents,
                verse_id,
                verse_number,
            }),
            Frame::Ref {
                id,
                attrs,
                text,
                verse_id,
                verse_number,
                ..
            } => Some(Content::Ref {
                id,
                attrs,
                text,
                verse_id,
                verse_number,
            }),
            Frame::Unknown { .. } => None,
        };
        if let Some(node) = node {
            self.append(node);
        }
        Ok(())
    }

    fn text_run(&mut self, raw: String) {
        // A reference collects its label as bare text.
        if let Some(Frame::Ref { text, .. }) = self.enclosing_mut() {
            text.push_str(&raw);
            return;
        }

        // Indentation between top-level elements is markup formatting, not
        // content.
        if self.enclosing().is_none() && raw.trim().is_empty() {
            return;
        }

        let id = self.ids.next_id();
        let (verse_id, verse_number) = self.attribution();
        self.append(Content::Text {
            id,
            attrs: Attrs::new(),
            text: raw,
            verse_id,
            verse_number,
        });
    }

    // ------------------------------------------------------------------
    // Stack helpers
    // ------------------------------------------------------------------

    /// The nearest frame that is a real element context (unknown frames
    /// are transparent).
    fn enclosing(&self) -> Option<&Frame> {
        self.stack
            .iter()
            .rev()
            .find(|frame| !matches!(frame, Frame::Unknown { .. }))
    }

    fn enclosing_mut(&mut self) -> Option<&mut Frame> {
        self.stack
            .iter_mut()
            .rev()
            .find(|frame| !matches!(frame, Frame::Unknown { .. }))
    }

    /// Append a finished node to the innermost owning container, or to the
    /// chapter root when no container is open.
    fn append(&mut self, node: Content) {
        match self.enclosing_mut() {
            Some(Frame::Para { contents, .. })
            | Some(Frame::Char { contents, .. })
            | Some(Frame::Note { contents, .. }) => contents.push(node),
            // Refs collect text only; nodes cannot land here because every
            // element opened inside a ref is pushed as a transparent frame.
            Some(Frame::Ref { .. }) | Some(Frame::Unknown { .. }) => unreachable!(),
            None => self.root.push(node),
        }
    }

    fn attribution(&self) -> (Option<String>, Option<u32>) {
        match self.cursor.current() {
            Some((id, number)) => (Some(id.to_string()), Some(number)),
            None => (None, None),
        }
    }
}

/// Extract the leading integer of a verse number attribute.
///
/// Publishers write bridge numbers (`"1-2"`) and segments (`"12a"`); the
/// leading decimal run names the verse the milestone opens. Zero or a
/// missing digit run is invalid.
fn leading_verse_number(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<u32>().ok().filter(|&n| n >= 1)
}
