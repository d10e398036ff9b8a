//! XML parser implementation

use indexmap::IndexMap;
use tracing::trace;

use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::decode::DecodeOptions;
use crate::xml::model::{Content, Document, Element};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// XML parser with depth and size limits
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    input_len: usize,
    max_depth: u16,
    max_size: usize,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with default limits
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, &DecodeOptions::default())
    }

    /// Create a new XML parser using the limits of `options`
    pub fn with_options(input: &'a [u8], options: &DecodeOptions) -> Self {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        Self {
            cursor: Cursor::new(input),
            input_len: input.len(),
            max_depth: options.max_depth,
            max_size: options.max_size,
            depth: 0,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        if self.max_size > 0 && self.input_len > self.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded { max: self.max_size },
                0,
                1,
                1,
            ));
        }

        self.skip_misc()?;
        if self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::MissingRoot));
        }

        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_with(ErrorKind::InvalidToken, "content after root element"));
        }

        trace!(root = %root.name, "parsed xml document");
        Ok(Document { root })
    }

    /// Skip whitespace, comments, processing instructions and the doctype
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else if self.cursor.starts_with(b"<!") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_with(ErrorKind::InvalidToken, "unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;
        self.enter()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.depth = self.depth.saturating_sub(1);
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.starts_with(b"</") {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(self.error_here(ErrorKind::MismatchedTag {
                        expected: name,
                        found: close_name,
                    }));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                self.cursor.advance_by(9);
                children.push(Content::Text(self.parse_cdata()?));
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                children.push(Content::Element(child));
                continue;
            }

            if self.cursor.is_eof() {
                return Err(self.error_with(ErrorKind::UnterminatedMarkup, "unterminated element"));
            }

            if let Some(text) = self.parse_text()? {
                children.push(Content::Text(text));
            }
        }

        self.depth = self.depth.saturating_sub(1);
        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn enter(&mut self) -> Result<()> {
        if self.max_depth > 0 && self.depth >= self.max_depth {
            return Err(self.error_here(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => {
                    return Err(self.error_with(ErrorKind::UnterminatedMarkup, "unexpected end of input"))
                }
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_with(ErrorKind::InvalidToken, "duplicate attribute"));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.expected("quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                let text = self.bytes_to_string(raw)?;
                self.check_chars(&text)?;
                self.cursor.advance();
                return self.decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(self.error_with(ErrorKind::UnterminatedMarkup, "unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = self.bytes_to_string(raw)?;
        self.check_chars(&text)?;
        let text = self.decode_entities(&text)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_cdata(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(b"]]>") {
                let raw = self.cursor.slice_from(start);
                let text = self.bytes_to_string(raw)?;
                self.check_chars(&text)?;
                self.cursor.advance_by(3);
                return Ok(text);
            }
            self.cursor.advance();
        }
        Err(self.error_with(ErrorKind::UnterminatedMarkup, "unterminated cdata section"))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            _ => return Err(self.expected("name")),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        self.bytes_to_string(raw)
    }

    /// Skip `<!DOCTYPE ...>` including an internal subset in brackets
    fn skip_doctype(&mut self) -> Result<()> {
        let mut brackets = 0usize;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match b {
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                b'>' if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_with(ErrorKind::UnterminatedMarkup, "unterminated declaration"))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnterminatedMarkup))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.expected(&format!("'{}'", char::from(expected))))
        }
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(ToString::to_string)
            .map_err(|_| self.error_here(ErrorKind::InvalidUtf8))
    }

    /// Reject raw characters outside the XML `Char` production
    fn check_chars(&self, text: &str) -> Result<()> {
        match text.chars().find(|&ch| !is_xml_char(ch)) {
            Some(ch) => Err(self.error_with(
                ErrorKind::InvalidToken,
                &format!("character U+{:04X} is not allowed in xml", u32::from(ch)),
            )),
            None => Ok(()),
        }
    }

    fn decode_entities(&self, input: &str) -> Result<String> {
        decode_entities(input).map_err(|entity| self.error_here(ErrorKind::InvalidEntity { entity }))
    }

    fn expected(&self, expected: &str) -> Error {
        let found = match self.cursor.current() {
            Some(b) if b.is_ascii_graphic() => format!("'{}'", char::from(b)),
            Some(_) => "non-ascii byte".to_string(),
            None => "end of input".to_string(),
        };
        self.error_here(ErrorKind::Expected {
            expected: expected.to_string(),
            found,
        })
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::new(kind, Span::at(self.cursor.position()))
    }

    fn error_with(&self, kind: ErrorKind, message: &str) -> Error {
        Error::with_message(kind, Span::at(self.cursor.position()), message)
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Decode predefined and numeric entities. On failure returns the offending
/// entity name
fn decode_entities(input: &str) -> std::result::Result<String, String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            _ if !terminated => None,
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(entity),
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };
    code.and_then(char::from_u32).filter(|&ch| is_xml_char(ch))
}

/// `#x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]`
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
