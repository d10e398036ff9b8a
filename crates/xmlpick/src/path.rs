//! Dotted path codec
//!
//! A path names one node of a tree as a chain of segments separated by `.`.
//! A segment is either a bare `name` (a mapping child) or `name[index]`
//! (one element of the sequence stored under `name`):
//!
//! ```
//! use xmlpick::Path;
//! # fn main() -> Result<(), xmlpick::Error> {
//! let path: Path = "catalog.book[1].title".parse()?;
//! assert_eq!(path.len(), 3);
//! assert_eq!(path.segments()[1].index(), Some(1));
//! assert_eq!(path.to_string(), "catalog.book[1].title");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;

use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind, Result};

/// One step of a path
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment {
    name: String,
    index: Option<usize>,
}

impl Segment {
    /// Segment addressing a mapping child
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    /// Segment addressing one element of the sequence stored under `name`
    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Non-empty chain of segments from the tree root.
///
/// Names containing `.`, `[` or `]` can be built programmatically but do not
/// survive a format/parse round trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<Segment>);

impl Path {
    /// Parse a dotted path string
    pub fn parse(text: &str) -> Result<Self> {
        PathParser::new(text).parse()
    }

    /// Single-segment path naming a top-level entry
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![Segment::new(name)])
    }

    /// Builds a path from segments; None if `segments` is empty
    pub fn from_segments(segments: Vec<Segment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments))
        }
    }

    /// Path to the mapping child `name` of this node
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::new(name));
        Self(segments)
    }

    /// Path to element `index` of the sequence this path names
    pub fn at(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        if let Some(last) = segments.last_mut() {
            last.index = Some(index);
        }
        Self(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.0.last()
    }

    /// True if `self` is `other` or one of its ancestors
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse a dotted path string
pub fn parse(text: &str) -> Result<Path> {
    Path::parse(text)
}

/// Render a path in its canonical string form
pub fn format(path: &Path) -> String {
    path.to_string()
}

#[cfg(feature = "serde")]
impl serde::Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Path {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Name,
    Index,
    AfterIndex,
}

/// Explicit state machine over the segment grammar
struct PathParser<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    state: State,
    segments: Vec<Segment>,
    name_start: usize,
    name: &'a str,
    index_start: usize,
}

impl<'a> PathParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: Cursor::new(text.as_bytes()),
            state: State::Name,
            segments: Vec::new(),
            name_start: 0,
            name: "",
            index_start: 0,
        }
    }

    fn parse(mut self) -> Result<Path> {
        while let Some(b) = self.cursor.current() {
            match (self.state, b) {
                (State::Name, b'.') => {
                    let name = self.take_name()?;
                    self.segments.push(Segment::new(name));
                    self.cursor.advance();
                    self.start_segment();
                }
                (State::Name, b'[') => {
                    self.name = self.take_name()?;
                    self.cursor.advance();
                    self.index_start = self.cursor.pos();
                    self.state = State::Index;
                }
                (State::Name, b']') => return Err(self.error(ErrorKind::UnbalancedBracket)),
                (State::Name, _) => self.cursor.advance(),
                (State::Index, b'0'..=b'9') => self.cursor.advance(),
                (State::Index, b']') => {
                    let index = self.take_index()?;
                    self.segments.push(Segment::indexed(self.name, index));
                    self.cursor.advance();
                    self.state = State::AfterIndex;
                }
                (State::Index, b'[' | b'.') => return Err(self.error(ErrorKind::UnbalancedBracket)),
                (State::Index, _) => {
                    let index = self.rest_of_index().to_string();
                    return Err(self.error(ErrorKind::InvalidIndex { index }));
                }
                (State::AfterIndex, b'.') => {
                    self.cursor.advance();
                    self.start_segment();
                }
                (State::AfterIndex, _) => {
                    return Err(self.error(ErrorKind::TrailingCharacters));
                }
            }
        }

        match self.state {
            State::Name => {
                let name = self.take_name()?;
                self.segments.push(Segment::new(name));
            }
            State::Index => return Err(self.error(ErrorKind::UnbalancedBracket)),
            State::AfterIndex => {}
        }

        Ok(Path(self.segments))
    }

    fn start_segment(&mut self) {
        self.state = State::Name;
        self.name_start = self.cursor.pos();
    }

    fn take_name(&self) -> Result<&'a str> {
        let name = self
            .text
            .get(self.name_start..self.cursor.pos())
            .unwrap_or_default();
        if name.is_empty() {
            Err(self.error(ErrorKind::EmptySegment))
        } else {
            Ok(name)
        }
    }

    fn take_index(&self) -> Result<usize> {
        let digits = self
            .text
            .get(self.index_start..self.cursor.pos())
            .unwrap_or_default();
        digits.parse::<usize>().map_err(|_| {
            self.error(ErrorKind::InvalidIndex {
                index: digits.to_string(),
            })
        })
    }

    fn rest_of_index(&self) -> &'a str {
        let rest = self.text.get(self.index_start..).unwrap_or_default();
        rest.split(']').next().unwrap_or(rest)
    }

    fn error(&self, kind: ErrorKind) -> Error {
        let pos = self.cursor.position();
        Error::at(kind, pos.offset, pos.line, pos.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ensure_eq<T: PartialEq + std::fmt::Debug>(left: T, right: T) -> Result<()> {
        if left == right {
            Ok(())
        } else {
            Err(Error::with_message(
                ErrorKind::InvalidToken,
                crate::error::Span::empty(),
                format!("assertion failed: left={left:?} right={right:?}"),
            ))
        }
    }

    fn kind_of(text: &str) -> Option<ErrorKind> {
        Path::parse(text).err().map(|err| err.kind().clone())
    }

    #[test]
    fn test_parse_plain_segments() -> Result<()> {
        let path = Path::parse("catalog.book.title")?;
        ensure_eq(
            path.segments().to_vec(),
            vec![
                Segment::new("catalog"),
                Segment::new("book"),
                Segment::new("title"),
            ],
        )
    }

    #[test]
    fn test_parse_indexed_segments() -> Result<()> {
        let path = Path::parse("catalog.book[12].author[0]")?;
        ensure_eq(path.segments()[1].clone(), Segment::indexed("book", 12))?;
        ensure_eq(path.segments()[2].clone(), Segment::indexed("author", 0))
    }

    #[test]
    fn test_parse_keeps_case_and_unicode() -> Result<()> {
        let path = Path::parse("Katalog.Ürün[3].Adı")?;
        ensure_eq(path.to_string(), "Katalog.Ürün[3].Adı".to_string())?;
        ensure_eq(path.segments()[1].name(), "Ürün")
    }

    #[test]
    fn test_parse_single_segment() -> Result<()> {
        ensure_eq(Path::parse("root")?, Path::root("root"))
    }

    #[test]
    fn test_empty_segments_rejected() {
        assert_eq!(kind_of(""), Some(ErrorKind::EmptySegment));
        assert_eq!(kind_of(".a"), Some(ErrorKind::EmptySegment));
        assert_eq!(kind_of("a..b"), Some(ErrorKind::EmptySegment));
        assert_eq!(kind_of("a."), Some(ErrorKind::EmptySegment));
        assert_eq!(kind_of("[1]"), Some(ErrorKind::EmptySegment));
    }

    #[test]
    fn test_bracket_errors() {
        assert_eq!(kind_of("a[1"), Some(ErrorKind::UnbalancedBracket));
        assert_eq!(kind_of("a]"), Some(ErrorKind::UnbalancedBracket));
        assert_eq!(kind_of("a[1.b]"), Some(ErrorKind::UnbalancedBracket));
        assert_eq!(kind_of("a[[1]]"), Some(ErrorKind::UnbalancedBracket));
        assert_eq!(kind_of("a[1]b"), Some(ErrorKind::TrailingCharacters));
        assert_eq!(kind_of("a[1][2]"), Some(ErrorKind::TrailingCharacters));
    }

    #[test]
    fn test_index_errors() {
        assert_eq!(
            kind_of("a[]"),
            Some(ErrorKind::InvalidIndex {
                index: String::new()
            })
        );
        assert_eq!(
            kind_of("a[-1]"),
            Some(ErrorKind::InvalidIndex { index: "-1".into() })
        );
        assert_eq!(
            kind_of("a[x2]"),
            Some(ErrorKind::InvalidIndex { index: "x2".into() })
        );
        assert_eq!(
            kind_of("a[99999999999999999999999999]"),
            Some(ErrorKind::InvalidIndex {
                index: "99999999999999999999999999".into()
            })
        );
    }

    #[test]
    fn test_error_offset_points_at_problem() {
        let err = Path::parse("a.b..c").err();
        assert_eq!(err.map(|e| e.span().start.offset), Some(4));
    }

    #[test]
    fn test_errors_are_path_category() {
        let err = Path::parse("a[").err();
        assert!(err.is_some_and(|e| e.is_malformed_path()));
    }

    #[test]
    fn test_builders() {
        let path = Path::root("catalog").child("book").at(1).child("title");
        assert_eq!(path.to_string(), "catalog.book[1].title");
        assert_eq!(path.last(), Some(&Segment::new("title")));
        assert!(Path::root("catalog").is_prefix_of(&path));
        assert!(!path.is_prefix_of(&Path::root("catalog")));
        assert_eq!(Path::from_segments(Vec::new()), None);
    }

    #[test]
    fn test_free_functions() -> Result<()> {
        let path = parse("a.b[2]")?;
        ensure_eq(format(&path), "a.b[2]".to_string())
    }
}
