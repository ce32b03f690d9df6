//! Lexical layer over USX markup.
//!
//! A thin wrapper around quick-xml that flattens its event stream into the
//! three token kinds the structural parser consumes, stamped with source
//! positions. Tag semantics are not interpreted here.

use memchr::{memchr_iter, memrchr};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::content::Attrs;
use crate::error::{Error, Position, Result};

/// One structural event from the markup.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Open {
        name: String,
        attrs: Attrs,
        self_closing: bool,
        position: Position,
    },
    Close {
        name: String,
        position: Position,
    },
    Text {
        raw: String,
        position: Position,
    },
}

/// Streaming tokenizer over one chapter's USX text.
///
/// Adjacent character data, CDATA sections, and resolved entity references
/// coalesce into a single `Text` token: entity boundaries are not markup
/// segmentation, element boundaries are. Comments, processing instructions,
/// the XML declaration, and DOCTYPE are dropped.
pub(crate) struct Tokenizer<'a> {
    reader: Reader<&'a [u8]>,
    input: &'a str,
    /// Structural token held back while a buffered text run is emitted.
    pending: Option<Token>,
    eof: bool,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a str) -> Tokenizer<'a> {
        // DBL packages occasionally ship files with a UTF-8 BOM.
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let mut reader = Reader::from_str(input);
        // Close-tag matching is the structural parser's job (it must report
        // mismatches as structural, with container context); the lexical
        // layer only rejects markup that is not parseable at all.
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        Tokenizer {
            reader,
            input,
            pending: None,
            eof: false,
        }
    }

    /// Next token, or `None` at end of input.
    ///
    /// Any lexical error (truncated tag, unterminated quote, undefined
    /// entity, mismatched close at the well-formedness level) is
    /// `MalformedMarkup`; there is no recovery.
    pub(crate) fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.pending.take() {
            return Ok(Some(token));
        }
        if self.eof {
            return Ok(None);
        }

        let mut text = String::new();
        let mut text_start: Option<Position> = None;

        loop {
            let offset = self.reader.buffer_position() as usize;
            let position = self.position_at(offset);

            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let at = self.position_at(self.reader.error_position() as usize);
                    return Err(Error::malformed(e.to_string(), at));
                }
            };

            let structural = match event {
                Event::Start(e) => Some(Token::Open {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    attrs: read_attrs(&e, position)?,
                    self_closing: false,
                    position,
                }),
                Event::Empty(e) => Some(Token::Open {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    attrs: read_attrs(&e, position)?,
                    self_closing: true,
                    position,
                }),
                Event::End(e) => Some(Token::Close {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    position,
                }),
                Event::Text(e) => {
                    text_start.get_or_insert(position);
                    text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    None
                }
                Event::CData(e) => {
                    text_start.get_or_insert(position);
                    text.push_str(&String::from_utf8_lossy(e.as_ref()));
                    None
                }
                Event::GeneralRef(e) => {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    let Some(resolved) = resolve_entity(&entity) else {
                        return Err(Error::malformed(
                            format!("undefined entity reference: &{entity};"),
                            position,
                        ));
                    };
                    text_start.get_or_insert(position);
                    text.push_str(&resolved);
                    None
                }
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => None,
                Event::Eof => {
                    self.eof = true;
                    None
                }
            };

            // A buffered text run is emitted before the event that ended it.
            if let Some(start) = text_start
                && (structural.is_some() || self.eof)
            {
                self.pending = structural;
                return Ok(Some(Token::Text {
                    raw: text,
                    position: start,
                }));
            }
            if let Some(token) = structural {
                return Ok(Some(token));
            }
            if self.eof {
                return Ok(None);
            }
        }
    }

    /// Position of the end of input; used for unexpected-EOF diagnostics.
    pub(crate) fn end_position(&self) -> Position {
        self.position_at(self.input.len())
    }

    fn position_at(&self, offset: usize) -> Position {
        position_at(self.input, offset)
    }
}

/// Derive a 1-based line/column pair from a byte offset.
fn position_at(input: &str, offset: usize) -> Position {
    let offset = offset.min(input.len());
    let prefix = &input.as_bytes()[..offset];
    let line = memchr_iter(b'\n', prefix).count() as u32 + 1;
    let column = match memrchr(b'\n', prefix) {
        Some(nl) => (offset - nl) as u32,
        None => offset as u32 + 1,
    };
    Position {
        offset,
        line,
        column,
    }
}

fn read_attrs(e: &quick_xml::events::BytesStart<'_>, position: Position) -> Result<Attrs> {
    let mut attrs = Attrs::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::malformed(e.to_string(), position))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::malformed(e.to_string(), position))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

/// Resolve a predefined or numeric character reference.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#') {
        if let Ok(code) = dec.parse::<u32>()
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    }

    None
}
