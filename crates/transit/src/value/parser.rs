//! Recursive-descent parser for [`Value`] documents.
//!
//! Grammar (whitespace allowed between tokens, no comments, no trailing
//! commas):
//!
//! ```text
//! value   := array | object | string | number | literal
//! array   := '[' (value (',' value)*)? ']'
//! object  := '{' (string ':' value (',' string ':' value)*)? '}'
//! string  := '"' (char | escape)* '"'
//! number  := '-'? digit+ ('.' digit+)?
//! literal := letters matching true | false | null, case-insensitively
//! ```
//!
//! The whole document must be available up front; [`from_reader`] buffers
//! its input before parsing.

use std::io::Read;

use crate::models::{Result, TransitError};
use crate::value::{Object, Value};

/// Nesting limit, keeps hostile input from exhausting the stack.
const MAX_DEPTH: usize = 512;

/// Parse a complete document. Anything but whitespace after the top-level
/// value is an error.
pub fn parse(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(parser.error("trailing characters after document"));
    }
    Ok(value)
}

/// Read `reader` to the end, then [`parse`] it.
pub fn from_reader<R: Read>(mut reader: R) -> Result<Value> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse(&input)
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> TransitError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> TransitError {
        let consumed = &self.input[..pos.min(self.input.len())];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
        let column = consumed[line_start..].chars().count() + 1;
        TransitError::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> TransitError {
        match self.input[self.pos..].chars().next() {
            Some(c) => self.error(format!("unexpected character '{}', expected {}", c, expected)),
            None => self.error(format!("unexpected end of input, expected {}", expected)),
        }
    }

    fn expect(&mut self, byte: u8, expected: &str) -> Result<()> {
        self.skip_whitespace();
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'[') => self.nested(Self::parse_array),
            Some(b'{') => self.nested(Self::parse_object),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b) if b.is_ascii_alphabetic() => self.parse_literal(),
            _ => Err(self.unexpected("a value")),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("document nested too deeply"));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect(b'[', "'['")?;
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.expect(b'{', "'{'")?;
        let mut map = Object::new();

        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(self.unexpected("a string key"));
            }
            let key = self.parse_string()?;
            self.expect(b':', "':'")?;
            let value = self.parse_value()?;
            // First occurrence of a key wins
            map.entry(key).or_insert(value);

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        let open = self.pos;
        self.expect(b'"', "'\"'")?;
        let mut out = String::new();
        let mut run_start = self.pos;

        loop {
            match self.peek() {
                None => return Err(self.error_at(open, "unterminated string")),
                Some(b'"') => {
                    out.push_str(&self.input[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.input[run_start..self.pos]);
                    self.pos += 1;
                    out.push(self.parse_escape()?);
                    run_start = self.pos;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char> {
        let start = self.pos - 1;
        let c = match self.bump() {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\u{8}',
            Some(b'f') => '\u{c}',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => return self.parse_unicode_escape(start),
            Some(_) => return Err(self.error_at(start, "invalid escape sequence")),
            None => return Err(self.error_at(start, "unexpected end of input in escape sequence")),
        };
        Ok(c)
    }

    fn parse_unicode_escape(&mut self, start: usize) -> Result<char> {
        let high = self.parse_hex4()?;
        let code = match high {
            0xD800..=0xDBFF => {
                if self.bump() != Some(b'\\') || self.bump() != Some(b'u') {
                    return Err(self.error_at(start, "unpaired surrogate in \\u escape"));
                }
                let low = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.error_at(start, "unpaired surrogate in \\u escape"));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.error_at(start, "unpaired surrogate in \\u escape")),
            _ => high,
        };
        char::from_u32(code).ok_or_else(|| self.error_at(start, "invalid \\u escape"))
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let digits = self
            .bytes
            .get(self.pos..self.pos + 4)
            .filter(|digits| digits.iter().all(u8::is_ascii_hexdigit))
            .ok_or_else(|| self.error("expected four hex digits"))?;
        let mut code = 0;
        for &digit in digits {
            // is_ascii_hexdigit guarantees to_digit succeeds
            code = code * 16 + (digit as char).to_digit(16).unwrap_or(0);
        }
        self.pos += 4;
        Ok(code)
    }

    fn consume_digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        if self.consume_digits() == 0 {
            return Err(self.unexpected("a digit"));
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if self.consume_digits() == 0 {
                return Err(self.unexpected("a digit after '.'"));
            }
        }

        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Value::Number)
            .map_err(|e| self.error_at(start, format!("invalid number '{}': {}", text, e)))
    }

    fn parse_literal(&mut self) -> Result<Value> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphabetic()) {
            self.pos += 1;
        }

        let word = &self.input[start..self.pos];
        match word.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            _ => Err(self.error_at(start, format!("unexpected literal '{}'", word))),
        }
    }
}
