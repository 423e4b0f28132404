//! Family metadata (`METADATA.pb`) from a Google Fonts style license tree.
//!
//! `METADATA.pb` files are protobuf messages in text format. Only top-level
//! scalar fields are kept; nested messages such as `fonts { ... }` are
//! skipped.

use std::{
    fmt,
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
    result,
    str::FromStr,
};

/// Conventional file name of the family metadata file.
pub const METADATA_FILENAME: &str = "METADATA.pb";

const CATEGORY_FIELD: &str = "category";

/// Errors that can occur while reading family metadata.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("metadata has no '{0}' field")]
    MissingField(&'static str),

    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

pub type Result<T> = result::Result<T, Error>;

/// Catalog category of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Serif,
    SansSerif,
    Display,
    Handwriting,
    Monospace,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Serif,
        Category::SansSerif,
        Category::Display,
        Category::Handwriting,
        Category::Monospace,
    ];

    /// Enum name as stored in `METADATA.pb` (e.g. `SANS_SERIF`).
    pub fn proto_name(self) -> &'static str {
        match self {
            Category::Serif => "SERIF",
            Category::SansSerif => "SANS_SERIF",
            Category::Display => "DISPLAY",
            Category::Handwriting => "HANDWRITING",
            Category::Monospace => "MONOSPACE",
        }
    }

    /// Human-readable label (e.g. `Sans Serif`).
    pub fn label(self) -> &'static str {
        match self {
            Category::Serif => "Serif",
            Category::SansSerif => "Sans Serif",
            Category::Display => "Display",
            Category::Handwriting => "Handwriting",
            Category::Monospace => "Monospace",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.proto_name() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Top-level scalar fields of a `METADATA.pb` file, in file order.
#[derive(Debug, Clone, Default)]
pub struct FamilyMetadata {
    fields: Vec<(String, String)>,
}

impl FamilyMetadata {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = TextReader { bytes: text.as_bytes(), pos: 0 };
        let mut fields = Vec::new();
        while let Some(name) = reader.field_name()? {
            reader.skip_trivia();
            let has_colon = reader.eat(b':');
            reader.skip_trivia();
            match reader.peek() {
                Some(b'{' | b'<') => reader.skip_message()?,
                Some(b'[') => {
                    for value in reader.list()? {
                        fields.push((name.clone(), value));
                    }
                }
                _ if has_colon => fields.push((name, reader.scalar()?)),
                _ => return Err(reader.error(format!("expected ':' after '{name}'"))),
            }
            reader.skip_trivia();
            if !reader.eat(b',') {
                reader.eat(b';');
            }
        }
        Ok(Self { fields })
    }

    /// First value of a top-level field.
    pub fn field<'a>(&'a self, name: &str) -> Option<&'a str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// All values of a (possibly repeated) top-level field.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields.iter().filter(move |(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// The family's primary category.
    pub fn category(&self) -> Result<Category> {
        self.field(CATEGORY_FIELD).ok_or(Error::MissingField(CATEGORY_FIELD))?.parse()
    }
}

/// Read the primary category from a `METADATA.pb` file.
pub fn read_category(path: impl AsRef<Path>) -> Result<Category> {
    FamilyMetadata::load(path)?.category()
}

struct TextReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl TextReader<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        let line = self.bytes[..self.pos].iter().filter(|b| **b == b'\n').count() + 1;
        Error::Syntax { line, message: message.into() }
    }

    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while self.peek().is_some_and(|b| b != b'\n') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn field_name(&mut self) -> Result<Option<String>> {
        self.skip_trivia();
        let start = self.pos;
        match self.peek() {
            None => return Ok(None),
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
            Some(b) => return Err(self.error(format!("unexpected character '{}'", b as char))),
        }
        while self.peek().is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_') {
            self.pos += 1;
        }
        Ok(Some(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()))
    }

    fn skip_message(&mut self) -> Result<()> {
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            match b {
                b'{' | b'<' => depth += 1,
                b'}' | b'>' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                b'"' | b'\'' => {
                    self.string()?;
                    continue;
                }
                b'#' => {
                    self.skip_trivia();
                    continue;
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(self.error("unterminated message"))
    }

    fn list(&mut self) -> Result<Vec<String>> {
        self.pos += 1;
        let mut values = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return Ok(values);
                }
                Some(b',') => self.pos += 1,
                Some(b'{' | b'<') => self.skip_message()?,
                Some(_) => values.push(self.scalar()?),
                None => return Err(self.error("unterminated list")),
            }
        }
    }

    fn scalar(&mut self) -> Result<String> {
        match self.peek() {
            Some(b'"' | b'\'') => {
                // Adjacent string literals concatenate.
                let mut bytes = self.string()?;
                loop {
                    self.skip_trivia();
                    if !matches!(self.peek(), Some(b'"' | b'\'')) {
                        break;
                    }
                    bytes.extend(self.string()?);
                }
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Some(_) => {
                let start = self.pos;
                while self.peek().is_some_and(|b| {
                    !b.is_ascii_whitespace() && !b",;:#[]{}<>\"'".contains(&b)
                }) {
                    self.pos += 1;
                }
                if start == self.pos {
                    return Err(self.error("expected a value"));
                }
                Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
            }
            None => Err(self.error("expected a value, found end of input")),
        }
    }

    // Escapes produce raw bytes: octal escapes spell out UTF-8 sequences.
    fn string(&mut self) -> Result<Vec<u8>> {
        let Some(quote) = self.peek() else {
            return Err(self.error("expected a string"));
        };
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(self.error("unterminated string"));
            };
            if b == b'\n' {
                return Err(self.error("newline in string"));
            }
            self.pos += 1;
            match b {
                b'\\' => self.escape(&mut out)?,
                b if b == quote => return Ok(out),
                b => out.push(b),
            }
        }
    }

    fn escape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let Some(b) = self.peek() else {
            return Err(self.error("unterminated escape"));
        };
        self.pos += 1;
        match b {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'0'..=b'7' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                let byte = u8::try_from(value)
                    .map_err(|_| self.error(format!("octal escape out of range: \\{value:o}")))?;
                out.push(byte);
            }
            b'x' => {
                let start = self.pos;
                while self.pos - start < 2 && self.peek().is_some_and(|d| d.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
                let digits = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
                let value =
                    u8::from_str_radix(digits, 16).map_err(|_| self.error("invalid hex escape"))?;
                out.push(value);
            }
            other => out.push(other),
        }
        Ok(())
    }
}
