//! JSON text parsing.
//!
//! This module turns RFC 8259 JSON text into a [`JsonNode`] tree.
//!
//! ## Overview
//!
//! - **Single-pass parsing**: O(n) recursive descent with no backtracking
//! - **Strict grammar**: no trailing commas, no leading zeros, no bare words
//! - **Error reporting**: byte offset, line and column of the offending input
//! - **Depth limit**: nesting beyond the configured maximum is rejected
//!
//! ```rust
//! use json_mapper::parse;
//!
//! let tree = parse(r#"{"name":"Juan Garcia","birthdate":[1980,9,15]}"#).unwrap();
//! assert_eq!(tree.get("name").and_then(|v| v.as_str()), Some("Juan Garcia"));
//! ```

use crate::{Error, JsonMap, JsonNode, Number, Result};
use num_bigint::BigInt;

/// Parses a complete JSON document. Trailing non-whitespace is an error.
pub fn parse(input: &str) -> Result<JsonNode> {
    Parser::new(input, crate::CodecOptions::default().max_depth).parse_document()
}

/// A recursive-descent JSON parser over a string slice.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, max_depth: usize) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth,
        }
    }

    /// Parses one value and requires that only whitespace follows it.
    pub fn parse_document(&mut self) -> Result<JsonNode> {
        self.skip_whitespace();
        let value = self.parse_value()?;
        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.error("trailing characters after JSON value"));
        }
        Ok(value)
    }

    fn error(&self, msg: &str) -> Error {
        Error::malformed(self.position, self.line, self.column, msg)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if matches!(ch, ' ' | '\t' | '\n' | '\r') {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char, msg: &str) -> Result<()> {
        if self.peek_char() == Some(expected) {
            self.next_char();
            Ok(())
        } else {
            Err(self.error(msg))
        }
    }

    fn parse_value(&mut self) -> Result<JsonNode> {
        match self.peek_char() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => Ok(JsonNode::String(self.parse_string()?)),
            Some('t') => self.parse_literal("true", JsonNode::Bool(true)),
            Some('f') => self.parse_literal("false", JsonNode::Bool(false)),
            Some('n') => self.parse_literal("null", JsonNode::Null),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => {
                Ok(JsonNode::Number(self.parse_number()?))
            }
            Some(_) => Err(self.error("expected JSON value")),
            None => Err(self.error("unexpected end of input, expected JSON value")),
        }
    }

    fn parse_literal(&mut self, word: &str, value: JsonNode) -> Result<JsonNode> {
        if self.input[self.position..].starts_with(word) {
            for _ in 0..word.len() {
                self.next_char();
            }
            Ok(value)
        } else {
            Err(self.error(&format!("expected `{}`", word)))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error("nesting exceeds maximum depth"));
        }
        Ok(())
    }

    fn parse_array(&mut self) -> Result<JsonNode> {
        self.enter()?;
        self.next_char(); // consume '['
        let mut elements = Vec::new();

        self.skip_whitespace();
        if self.peek_char() == Some(']') {
            self.next_char();
            self.depth -= 1;
            return Ok(JsonNode::Array(elements));
        }

        loop {
            self.skip_whitespace();
            elements.push(self.parse_value()?);
            self.skip_whitespace();
            match self.next_char() {
                Some(',') => continue,
                Some(']') => break,
                Some(_) => return Err(self.error("expected ',' or ']' in array")),
                None => return Err(self.error("unterminated array")),
            }
        }

        self.depth -= 1;
        Ok(JsonNode::Array(elements))
    }

    fn parse_object(&mut self) -> Result<JsonNode> {
        self.enter()?;
        self.next_char(); // consume '{'
        let mut map = JsonMap::new();

        self.skip_whitespace();
        if self.peek_char() == Some('}') {
            self.next_char();
            self.depth -= 1;
            return Ok(JsonNode::Object(map));
        }

        loop {
            self.skip_whitespace();
            if self.peek_char() != Some('"') {
                return Err(self.error("expected string key in object"));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            self.expect(':', "expected ':' after object key")?;
            self.skip_whitespace();

            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.next_char() {
                Some(',') => continue,
                Some('}') => break,
                Some(_) => return Err(self.error("expected ',' or '}' in object")),
                None => return Err(self.error("unterminated object")),
            }
        }

        self.depth -= 1;
        Ok(JsonNode::Object(map))
    }

    fn parse_string(&mut self) -> Result<String> {
        self.next_char(); // consume opening quote
        let mut result = String::new();

        loop {
            match self.next_char() {
                Some('"') => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some('"') => result.push('"'),
                    Some('\\') => result.push('\\'),
                    Some('/') => result.push('/'),
                    Some('b') => result.push('\u{0008}'),
                    Some('f') => result.push('\u{000C}'),
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('u') => result.push(self.parse_unicode_escape()?),
                    Some(_) => return Err(self.error("invalid escape sequence")),
                    None => return Err(self.error("unterminated string")),
                },
                Some(ch) if (ch as u32) < 0x20 => {
                    return Err(self.error("control character in string"));
                }
                Some(ch) => result.push(ch),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            match self.next_char().and_then(|ch| ch.to_digit(16)) {
                Some(digit) => code = code * 16 + digit,
                None => {
                    return Err(self.error(
                        "invalid unicode escape sequence (expected 4 hex digits)",
                    ))
                }
            }
        }
        Ok(code)
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let first = self.parse_hex4()?;
        let code_point = match first {
            0xD800..=0xDBFF => {
                if !self.input[self.position..].starts_with("\\u") {
                    return Err(self.error("unpaired surrogate in unicode escape"));
                }
                self.next_char();
                self.next_char();
                let second = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(self.error("invalid low surrogate in unicode escape"));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(self.error("unpaired surrogate in unicode escape")),
            other => other,
        };
        char::from_u32(code_point).ok_or_else(|| self.error("invalid unicode code point"))
    }

    fn consume_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                self.next_char();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn parse_number(&mut self) -> Result<Number> {
        let start = self.position;

        if self.peek_char() == Some('-') {
            self.next_char();
        }

        match self.peek_char() {
            Some('0') => {
                self.next_char();
                if matches!(self.peek_char(), Some(ch) if ch.is_ascii_digit()) {
                    return Err(self.error("leading zeros are not allowed"));
                }
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.consume_digits();
            }
            _ => return Err(self.error("expected digit")),
        }

        let mut integral = true;

        if self.peek_char() == Some('.') {
            integral = false;
            self.next_char();
            if self.consume_digits() == 0 {
                return Err(self.error("expected digit after decimal point"));
            }
        }

        if matches!(self.peek_char(), Some('e') | Some('E')) {
            integral = false;
            self.next_char();
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.next_char();
            }
            if self.consume_digits() == 0 {
                return Err(self.error("expected digit in exponent"));
            }
        }

        let literal = &self.input[start..self.position];

        if integral {
            if let Ok(i) = literal.parse::<i64>() {
                return Ok(Number::Integer(i));
            }
            return literal
                .parse::<BigInt>()
                .map(Number::BigInt)
                .map_err(|_| self.error("invalid integer"));
        }

        match literal.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Number::Float(f)),
            _ => Err(self.error("number out of range")),
        }
    }
}
