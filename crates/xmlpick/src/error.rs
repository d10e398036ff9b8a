//! Error types for xmlpick

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Broad family an [`ErrorKind`] belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// A path string violates the segment grammar
    MalformedPath,
    /// XML source text could not be decoded
    MalformedXml,
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    // path grammar
    EmptySegment,
    UnbalancedBracket,
    InvalidIndex { index: String },
    TrailingCharacters,

    // xml
    InvalidToken,
    Expected { expected: String, found: String },
    MismatchedTag { expected: String, found: String },
    UnterminatedMarkup,
    InvalidEntity { entity: String },
    InvalidUtf8,
    MissingRoot,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

impl ErrorKind {
    pub const fn category(&self) -> Category {
        match self {
            Self::EmptySegment
            | Self::UnbalancedBracket
            | Self::InvalidIndex { .. }
            | Self::TrailingCharacters => Category::MalformedPath,
            _ => Category::MalformedXml,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySegment => write!(f, "empty path segment"),
            Self::UnbalancedBracket => write!(f, "unbalanced bracket"),
            Self::InvalidIndex { index } => write!(f, "invalid index: {index:?}"),
            Self::TrailingCharacters => write!(f, "unexpected characters after index"),
            Self::InvalidToken => write!(f, "invalid token"),
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::UnterminatedMarkup => write!(f, "unterminated markup"),
            Self::InvalidEntity { entity } => write!(f, "invalid xml entity: &{entity};"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::MissingRoot => write!(f, "document has no root element"),
            Self::MaxDepthExceeded { max } => {
                write!(f, "max depth exceeded: {max}")
            }
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Main error type for xmlpick
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// True for errors raised by the path codec
    pub fn is_malformed_path(&self) -> bool {
        self.category() == Category::MalformedPath
    }

    /// True for errors raised by the XML codec
    pub fn is_malformed_xml(&self) -> bool {
        self.category() == Category::MalformedXml
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        Self::new(kind, Span::at(Pos::new(offset, line, col)))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category() {
            Category::MalformedPath => {
                write!(f, "malformed path at offset {}: {}", self.span.start.offset, self.message)
            }
            Category::MalformedXml => write!(f, "malformed xml at {}: {}", self.span.start, self.message),
        }
    }
}

/// Result type alias for xmlpick
pub type Result<T> = std::result::Result<T, Error>;
