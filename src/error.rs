//! Error types for USX parsing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A location in the source markup, tracked per token for diagnostics.
///
/// `offset` is a byte index into the input; `line` and `column` are 1-based
/// and derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Position of the start of the input.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {} (byte {})", self.line, self.column, self.offset)
    }
}

/// Errors that can occur while parsing a chapter's USX markup.
///
/// Both kinds are fatal: no partial tree is returned, because a half-built
/// tree can carry broken verse attribution that downstream consumers have
/// no way to detect. The caller (the ingestion pipeline) decides whether a
/// failed chapter fails the whole import.
#[derive(Error, Debug)]
pub enum Error {
    /// Lexical-level failure: truncated tag, unterminated attribute quote,
    /// undefined entity, non-well-formed nesting.
    #[error("malformed markup at {position}: {message}")]
    MalformedMarkup { message: String, position: Position },

    /// Semantic-level failure: mismatched open/close of owning containers,
    /// a container opened in a context that does not accept it, an invalid
    /// verse number.
    #[error("structural error at {position}: {message}")]
    Structural { message: String, position: Position },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>, position: Position) -> Error {
        Error::MalformedMarkup {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn structural(message: impl Into<String>, position: Position) -> Error {
        Error::Structural {
            message: message.into(),
            position,
        }
    }

    /// The source position the error points at.
    pub fn position(&self) -> Position {
        match self {
            Error::MalformedMarkup { position, .. } => *position,
            Error::Structural { position, .. } => *position,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
