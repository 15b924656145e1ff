//! Decoder for the `data-setup` blobs embedded in listing entries
//!
//! RTVE writes these attributes as script-style mapping literals, which are
//! frequently not strict JSON (single quotes, `True`/`None`, bare keys,
//! trailing commas). The blob comes from a remote page, so it is only ever
//! parsed as data: strict JSON first, then a small literal grammar that
//! accepts nothing beyond mappings, sequences, strings, numbers and the
//! boolean/null constants.

use serde_json::{Map, Number, Value};

use crate::error::{RtveError, Result};

/// Deepest nesting accepted before the blob is rejected.
const MAX_DEPTH: usize = 64;

/// Decode a setup blob into a key/value mapping.
///
/// # Returns
/// * `Ok(map)` if the blob is a mapping in JSON or literal syntax
/// * `Err(RtveError::ParseError)` for anything else, including any
///   expression that is not a plain literal
///
/// # Examples
/// ```
/// use rtve_core::parser::parse_setup_blob;
///
/// let map = parse_setup_blob("{'idAsset': '7012345', 'autoplay': False}").unwrap();
/// assert_eq!(map["idAsset"], "7012345");
///
/// assert!(parse_setup_blob("__import__('os').system('id')").is_err());
/// ```
pub fn parse_setup_blob(text: &str) -> Result<Map<String, Value>> {
    let trimmed = text.trim();
    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(_) => parse_literal(trimmed)?,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(RtveError::ParseError(
            "setup blob is not a mapping".to_string(),
        )),
    }
}

/// Read the asset identifier out of a decoded setup mapping.
///
/// Numeric identifiers are rendered as text; empty strings count as absent.
pub fn asset_id_from_setup(setup: &Map<String, Value>) -> Option<String> {
    match setup.get("idAsset")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a single literal value, rejecting trailing input.
fn parse_literal(text: &str) -> Result<Value> {
    let mut parser = LiteralParser::new(text);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(parser.error("trailing characters after literal"));
    }
    Ok(value)
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl LiteralParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            _ => Err(self.error(&format!("expected '{}'", expected))),
        }
    }

    fn error(&self, message: &str) -> RtveError {
        RtveError::ParseError(format!("setup blob at offset {}: {}", self.pos, message))
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.nested(Self::parse_mapping),
            Some('[') => self.nested(|p| p.parse_sequence('[', ']')),
            Some('(') => self.nested(|p| p.parse_sequence('(', ')')),
            Some(q @ ('\'' | '"')) => Ok(Value::String(self.parse_string(q)?)),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_constant(),
            Some(c) => Err(self.error(&format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Result<Value>) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_mapping(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = Map::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Object(map));
            }

            let key = self.parse_key()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                _ => return Err(self.error("expected ',' or '}' in mapping")),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ ('\'' | '"')) => self.parse_string(q),
            Some(c) if c.is_alphanumeric() || c == '_' || c == '-' => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_alphanumeric() || matches!(c, '_' | '-' | '.')) {
                    self.pos += 1;
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            _ => Err(self.error("expected mapping key")),
        }
    }

    fn parse_sequence(&mut self, open: char, close: char) -> Result<Value> {
        self.expect(open)?;
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(Value::Array(items));
            }

            items.push(self.parse_value()?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(Value::Array(items)),
                _ => return Err(self.error("expected ',' or end of sequence")),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        self.expect(quote)?;
        let mut out = String::new();

        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('b') => out.push('\u{8}'),
                    Some('f') => out.push('\u{c}'),
                    Some('a') => out.push('\u{7}'),
                    Some('v') => out.push('\u{b}'),
                    Some('u') => out.push(self.parse_unicode_escape()?),
                    Some('U') => out.push(self.parse_wide_escape()?),
                    Some('x') => out.push(self.parse_byte_escape()?),
                    Some(c @ '0'..='7') => out.push(self.parse_octal_escape(c)),
                    Some(c @ ('\\' | '\'' | '"' | '/')) => out.push(c),
                    // Named escapes (\N{...}) and unknown ones are kept as written.
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Read exactly `digits` hex digits as a code point value.
    fn read_hex(&mut self, digits: usize) -> Result<u32> {
        let end = self.pos + digits;
        if end > self.chars.len() {
            return Err(self.error("truncated escape"));
        }
        let hex = &self.chars[self.pos..end];
        if !hex.iter().all(char::is_ascii_hexdigit) {
            return Err(self.error("invalid hex escape"));
        }
        let code = hex.iter().fold(0u32, |acc, c| {
            (acc << 4) | c.to_digit(16).unwrap_or_default()
        });
        self.pos = end;
        Ok(code)
    }

    /// `\uXXXX`, joining UTF-16 surrogate pairs. Unpaired surrogates become
    /// U+FFFD.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let code = self.read_hex(4)?;

        if (0xD800..0xDC00).contains(&code) {
            let resume = self.pos;
            if self.peek() == Some('\\') && self.chars.get(self.pos + 1) == Some(&'u') {
                self.pos += 2;
                if let Ok(low) = self.read_hex(4) {
                    if (0xDC00..0xE000).contains(&low) {
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        return Ok(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                    }
                }
                self.pos = resume;
            }
            return Ok(char::REPLACEMENT_CHARACTER);
        }

        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// `\UXXXXXXXX`
    fn parse_wide_escape(&mut self) -> Result<char> {
        let code = self.read_hex(8)?;
        char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"))
    }

    /// `\xNN`, a Latin-1 code point.
    fn parse_byte_escape(&mut self) -> Result<char> {
        let code = self.read_hex(2)?;
        char::from_u32(code).ok_or_else(|| self.error("invalid hex escape"))
    }

    /// `\N`, `\NN` or `\NNN` in octal; `first` is already consumed.
    fn parse_octal_escape(&mut self, first: char) -> char {
        let mut code = first.to_digit(8).unwrap_or_default();
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(digit) => {
                    code = code * 8 + digit;
                    self.pos += 1;
                }
                None => break,
            }
        }
        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_')) {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let raw = raw.strip_prefix('+').unwrap_or(&raw);

        if let Ok(int) = raw.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(&format!("invalid number '{}'", raw)))
    }

    fn parse_constant(&mut self) -> Result<Value> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        match word.as_str() {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => Err(RtveError::ParseError(format!(
                "setup blob at offset {}: unsupported identifier '{}'",
                start, word
            ))),
        }
    }
}
