//! OpenStep-style ASCII property lists, as written by Glyphs.app.
//!
//! Values keep enough of their surface form (quoted vs. bare tokens,
//! dictionary key order) that a parse followed by [`Plist::to_text`] yields a
//! document Glyphs reads back identically.

use std::fmt::Write;

use indexmap::IndexMap;

use crate::error::SyntaxError;

/// A property list value.
#[derive(Debug, Clone, PartialEq)]
pub enum Plist {
    Dictionary(IndexMap<String, Plist>),
    Array(Vec<Plist>),
    /// A quoted string.
    String(String),
    /// A bare token: numbers, identifiers, glyph names and `<hex>` data.
    Atom(String),
}

type ParseResult<T> = Result<T, SyntaxError>;

impl Plist {
    /// Parse a complete property list document.
    pub fn parse(text: &str) -> ParseResult<Self> {
        let mut parser = Parser { text, pos: 0 };
        let value = parser.parse_value()?;
        parser.skip_whitespace();
        if parser.pos < text.len() {
            return Err(parser.error("trailing content after root value"));
        }
        Ok(value)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Plist::String(s) | Plist::Atom(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Plist]> {
        match self {
            Plist::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, Plist>> {
        match self {
            Plist::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a dictionary.
    pub fn get(&self, key: &str) -> Option<&Plist> {
        self.as_dict().and_then(|map| map.get(key))
    }

    fn is_scalar(&self) -> bool {
        matches!(self, Plist::String(_) | Plist::Atom(_))
    }

    /// Serialize to the Glyphs text layout, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out.push('\n');
        out
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Plist::Dictionary(map) => {
                out.push_str("{\n");
                for (key, value) in map {
                    write_key(out, key);
                    out.push_str(" = ");
                    value.write_to(out);
                    out.push_str(";\n");
                }
                out.push('}');
            }
            Plist::Array(items) if items.is_empty() => out.push_str("()"),
            Plist::Array(items) if items.iter().all(Plist::is_scalar) => {
                out.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_to(out);
                }
                out.push(')');
            }
            Plist::Array(items) => {
                out.push_str("(\n");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                    }
                    item.write_to(out);
                }
                out.push_str("\n)");
            }
            Plist::String(s) => write_quoted(out, s),
            Plist::Atom(s) => out.push_str(s),
        }
    }
}

fn write_key(out: &mut String, key: &str) {
    let bare = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_');
    if bare {
        out.push_str(key);
    } else {
        write_quoted(out, key);
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\012"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn is_atom_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !b.is_ascii_control() && !b"{}()=;,\"<>".contains(&b)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        let end = self.pos.min(self.text.len());
        let line = self.text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1;
        SyntaxError { line, message: message.into() }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> ParseResult<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(b) => {
                Err(self.error(format!("expected '{}', found '{}'", byte as char, b as char)))
            }
            None => Err(self.error(format!("expected '{}', found end of input", byte as char))),
        }
    }

    fn parse_value(&mut self) -> ParseResult<Plist> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => self.parse_dict(),
            Some(b'(') => self.parse_array(),
            Some(b'"') => self.parse_string().map(Plist::String),
            Some(b'<') => self.parse_data(),
            Some(b) if is_atom_byte(b) => Ok(Plist::Atom(self.parse_atom())),
            Some(b) => Err(self.error(format!("unexpected character '{}'", b as char))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_dict(&mut self) -> ParseResult<Plist> {
        self.expect(b'{')?;
        let mut map = IndexMap::new();
        loop {
            self.skip_whitespace();
            let key = match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(b'"') => self.parse_string()?,
                Some(b) if is_atom_byte(b) => self.parse_atom(),
                Some(b) => return Err(self.error(format!("expected key, found '{}'", b as char))),
                None => return Err(self.error("unterminated dictionary")),
            };
            self.expect(b'=')?;
            let value = self.parse_value()?;
            self.expect(b';')?;
            map.insert(key, value);
        }
        Ok(Plist::Dictionary(map))
    }

    fn parse_array(&mut self) -> ParseResult<Plist> {
        self.expect(b'(')?;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(Plist::Array(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    // Trailing comma before the closing paren.
                    if self.peek() == Some(b')') {
                        self.pos += 1;
                        break;
                    }
                }
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                Some(b) => {
                    return Err(self.error(format!("expected ',' or ')', found '{}'", b as char)));
                }
                None => return Err(self.error("unterminated array")),
            }
        }
        Ok(Plist::Array(items))
    }

    fn parse_atom(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_atom_byte) {
            self.pos += 1;
        }
        self.text[start..self.pos].to_string()
    }

    fn parse_data(&mut self) -> ParseResult<Plist> {
        let start = self.pos;
        match self.text[start..].find('>') {
            Some(offset) => {
                self.pos = start + offset + 1;
                Ok(Plist::Atom(self.text[start..self.pos].to_string()))
            }
            None => Err(self.error("unterminated data block")),
        }
    }

    fn parse_string(&mut self) -> ParseResult<String> {
        self.expect(b'"')?;
        let mut out = String::new();
        let mut start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => {
                    out.push_str(&self.text[start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.text[start..self.pos]);
                    self.pos += 1;
                    self.parse_escape(&mut out)?;
                    start = self.pos;
                }
                Some(_) => self.pos += 1,
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> ParseResult<()> {
        let Some(b) = self.peek() else {
            return Err(self.error("unterminated escape sequence"));
        };
        match b {
            b'n' => out.push('\n'),
            b't' => out.push('\t'),
            b'r' => out.push('\r'),
            b'U' | b'u' => {
                self.pos += 1;
                let unit = self.hex_unit()?;
                let c = if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate; the low half follows as another \U escape.
                    if !self.text[self.pos..].starts_with("\\U")
                        && !self.text[self.pos..].starts_with("\\u")
                    {
                        return Err(self.error("unpaired surrogate in string"));
                    }
                    self.pos += 2;
                    let low = self.hex_unit()?;
                    char::decode_utf16([unit, low]).next().and_then(|r| r.ok())
                } else {
                    char::from_u32(unit as u32)
                };
                out.push(c.ok_or_else(|| self.error("invalid unicode escape"))?);
                return Ok(());
            }
            b'0'..=b'7' => {
                let start = self.pos;
                while self.pos - start < 3 && matches!(self.peek(), Some(b'0'..=b'7')) {
                    self.pos += 1;
                }
                let value = u32::from_str_radix(&self.text[start..self.pos], 8)
                    .map_err(|_| self.error("invalid octal escape"))?;
                out.push(char::from_u32(value).ok_or_else(|| self.error("invalid octal escape"))?);
                return Ok(());
            }
            _ => {
                // Any other escaped character stands for itself.
                let c = self.text[self.pos..].chars().next().unwrap_or('\\');
                out.push(c);
                self.pos += c.len_utf8();
                return Ok(());
            }
        }
        self.pos += 1;
        Ok(())
    }

    fn hex_unit(&mut self) -> ParseResult<u16> {
        let digits = self
            .text
            .get(self.pos..self.pos + 4)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| self.error("expected four hex digits in unicode escape"))?;
        let unit = u16::from_str_radix(digits, 16)
            .map_err(|_| self.error("invalid unicode escape"))?;
        self.pos += 4;
        Ok(unit)
    }
}
