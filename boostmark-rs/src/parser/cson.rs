//! CSON parsing.
//!
//! Note records are stored as CSON: CoffeeScript object literals with an
//! implicit top-level object, indentation-nested objects, newline-separated
//! arrays and `'''` block strings. Parsing produces a `serde_json::Value` so
//! that records can be decoded into typed structs with serde.
//!
//! Supported:
//! - `key: value` pairs, keys bare (`[A-Za-z0-9_$]+`) or quoted
//! - `'...'` / `"..."` strings with JavaScript escapes
//! - `'''` / `"""` block strings, dedented CoffeeScript-style
//! - numbers (decimal, exponent, `0x` hex), `true`/`false`/`null`,
//!   `yes`/`no`/`on`/`off`
//! - `[ ... ]` arrays and `{ ... }` objects, comma or newline separated
//! - `#` line comments and `###` block comments

use crate::error::{Result, VaultError};
use serde_json::{Map, Number, Value};

/// Parse a CSON document into a JSON value.
pub fn parse_cson(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    parser.parse_document()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        // CR is dropped up front, so CRLF records lex like LF ones
        Self {
            chars: input.chars().filter(|c| *c != '\r').collect(),
            pos: 0,
        }
    }

    fn parse_document(&mut self) -> Result<Value> {
        self.skip_blank();
        if self.at_end() {
            return Ok(Value::Object(Map::new()));
        }

        let value = if self.looks_like_key() {
            let indent = self.column(self.pos);
            self.parse_implicit_object(indent)?
        } else {
            self.parse_value()?
        };

        self.skip_blank();
        if !self.at_end() {
            return Err(self.error(format!("unexpected '{}'", self.chars[self.pos])));
        }
        Ok(value)
    }

    // --- objects ---

    fn parse_implicit_object(&mut self, indent: usize) -> Result<Value> {
        let mut map = Map::new();
        let mut same_line = false;

        loop {
            if !same_line {
                self.skip_blank();
                if self.at_end() || matches!(self.peek(), Some('}') | Some(']')) {
                    break;
                }
                let col = self.column(self.pos);
                if col < indent {
                    break;
                }
                if col > indent {
                    return Err(self.error("unexpected indentation"));
                }
            }

            if !self.looks_like_key() {
                return Err(self.error("expected 'key: value'"));
            }
            let key = self.parse_key()?;
            self.skip_inline();
            self.expect(':')?;
            self.skip_inline();
            self.skip_comment();

            let value = if self.at_line_end() {
                // value continues on an indented line
                self.skip_blank();
                if self.at_end() || self.column(self.pos) <= indent {
                    return Err(self.error(format!("missing value for key '{}'", key)));
                }
                if self.looks_like_key() {
                    let nested = self.column(self.pos);
                    self.parse_implicit_object(nested)?
                } else {
                    self.parse_value()?
                }
            } else {
                self.parse_value()?
            };
            map.insert(key, value);

            self.skip_inline();
            self.skip_comment();
            same_line = false;
            if self.peek() == Some(',') {
                self.pos += 1;
                self.skip_inline();
                self.skip_comment();
                same_line = !self.at_line_end();
            } else if !self.at_line_end()
                && !self.at_line_start()
                && !matches!(self.peek(), Some('}') | Some(']'))
            {
                return Err(self.error(format!("unexpected '{}'", self.chars[self.pos])));
            }
        }

        Ok(Value::Object(map))
    }

    fn parse_braced_object(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = Map::new();

        loop {
            self.skip_blank_and_commas();
            match self.peek() {
                None => return Err(self.error("unterminated object")),
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                _ => {}
            }

            let key = self.parse_key()?;
            self.skip_inline();
            self.expect(':')?;
            self.skip_blank();
            let value = if self.looks_like_key() {
                let nested = self.column(self.pos);
                self.parse_implicit_object(nested)?
            } else {
                self.parse_value()?
            };
            map.insert(key, value);
        }

        Ok(Value::Object(map))
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ ('\'' | '"')) => self.parse_inline_string(q),
            Some(c) if is_ident_char(c) => {
                let start = self.pos;
                while self.peek().is_some_and(is_ident_char) {
                    self.pos += 1;
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            _ => Err(self.error("expected key")),
        }
    }

    /// Lookahead: does a `key:` start at the current position?
    fn looks_like_key(&mut self) -> bool {
        let saved = self.pos;
        let result = self.parse_key().is_ok() && {
            self.skip_inline();
            self.peek() == Some(':') && self.peek_at(1) != Some(':')
        };
        self.pos = saved;
        result
    }

    // --- values ---

    fn parse_value(&mut self) -> Result<Value> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('{') => self.parse_braced_object(),
            Some('[') => self.parse_array(),
            Some(q @ ('\'' | '"')) => {
                if self.peek_at(1) == Some(q) && self.peek_at(2) == Some(q) {
                    self.parse_block_string(q).map(Value::String)
                } else {
                    self.parse_inline_string(q).map(Value::String)
                }
            }
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                self.parse_number()
            }
            Some(c) if c.is_alphabetic() => self.parse_keyword(),
            Some(c) => Err(self.error(format!("unexpected '{}'", c))),
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_blank_and_commas();
            match self.peek() {
                None => return Err(self.error("unterminated array")),
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                _ => {}
            }

            let item = if self.looks_like_key() {
                let nested = self.column(self.pos);
                self.parse_implicit_object(nested)?
            } else {
                self.parse_value()?
            };
            items.push(item);
        }

        Ok(Value::Array(items))
    }

    fn parse_keyword(&mut self) -> Result<Value> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "true" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "off" => Ok(Value::Bool(false)),
            "null" | "undefined" => Ok(Value::Null),
            _ => {
                self.pos = start;
                Err(self.error(format!("unexpected identifier '{}'", word)))
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();

        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(&text)),
        };

        let radix = match digits.get(..2) {
            Some("0x") | Some("0X") => Some(16),
            Some("0o") | Some("0O") => Some(8),
            Some("0b") | Some("0B") => Some(2),
            _ => None,
        };

        let number = if let Some(radix) = radix {
            i64::from_str_radix(&digits[2..], radix)
                .ok()
                .map(|n| Number::from(if negative { -n } else { n }))
        } else if let Ok(n) = text.parse::<i64>() {
            Some(Number::from(n))
        } else {
            text.parse::<f64>().ok().and_then(Number::from_f64)
        };

        match number {
            Some(n) => Ok(Value::Number(n)),
            None => {
                self.pos = start;
                Err(self.error(format!("invalid number '{}'", text)))
            }
        }
    }

    fn parse_inline_string(&mut self, quote: char) -> Result<String> {
        self.expect(quote)?;
        let start_line = self.line_of(self.pos);
        let mut raw = String::new();

        loop {
            match self.peek() {
                None => {
                    return Err(VaultError::CsonParse {
                        line: start_line,
                        message: "unterminated string".to_string(),
                    });
                }
                Some('\\') => {
                    raw.push('\\');
                    self.pos += 1;
                    if let Some(c) = self.peek() {
                        raw.push(c);
                        self.pos += 1;
                    }
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some('\n') => {
                    // CoffeeScript joins multi-line strings with a single space
                    while raw.ends_with([' ', '\t', '\r']) {
                        raw.pop();
                    }
                    raw.push(' ');
                    self.pos += 1;
                    self.skip_inline();
                }
                Some(c) => {
                    raw.push(c);
                    self.pos += 1;
                }
            }
        }

        self.unescape(&raw)
    }

    fn parse_block_string(&mut self, quote: char) -> Result<String> {
        let start_line = self.line_of(self.pos);
        self.pos += 3;
        let mut raw = String::new();

        loop {
            match self.peek() {
                None => {
                    return Err(VaultError::CsonParse {
                        line: start_line,
                        message: "unterminated block string".to_string(),
                    });
                }
                Some('\\') => {
                    raw.push('\\');
                    self.pos += 1;
                    if let Some(c) = self.peek() {
                        raw.push(c);
                        self.pos += 1;
                    }
                }
                Some(c)
                    if c == quote
                        && self.peek_at(1) == Some(quote)
                        && self.peek_at(2) == Some(quote) =>
                {
                    self.pos += 3;
                    break;
                }
                Some(c) => {
                    raw.push(c);
                    self.pos += 1;
                }
            }
        }

        self.unescape(&dedent_block(&raw))
    }

    fn unescape(&self, raw: &str) -> Result<String> {
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                None => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('b') => out.push('\u{8}'),
                Some('f') => out.push('\u{c}'),
                Some('v') => out.push('\u{b}'),
                Some('0') => out.push('\0'),
                Some('\n') => {}
                Some('x') => {
                    let hex: String = chars.by_ref().take(2).collect();
                    out.push(self.code_point(&hex)?);
                }
                Some('u') => {
                    let hex: String = if chars.peek() == Some(&'{') {
                        chars.next();
                        chars.by_ref().take_while(|c| *c != '}').collect()
                    } else {
                        chars.by_ref().take(4).collect()
                    };
                    let code = u32::from_str_radix(&hex, 16)
                        .map_err(|_| self.error(format!("invalid escape '\\u{}'", hex)))?;
                    // surrogate pairs arrive as two \u escapes
                    if (0xD800..0xDC00).contains(&code) {
                        let mut ahead = chars.clone();
                        let low = if ahead.next() == Some('\\') && ahead.next() == Some('u') {
                            let hex: String = ahead.by_ref().take(4).collect();
                            u32::from_str_radix(&hex, 16)
                                .ok()
                                .filter(|low| (0xDC00..0xE000).contains(low))
                        } else {
                            None
                        };
                        match low {
                            Some(low) => {
                                chars = ahead;
                                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                                out.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                            }
                            // unpaired high surrogate
                            None => out.push('\u{FFFD}'),
                        }
                    } else {
                        out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                    }
                }
                Some(other) => out.push(other),
            }
        }

        Ok(out)
    }

    fn code_point(&self, hex: &str) -> Result<char> {
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid escape '\\x{}'", hex)))
    }

    // --- whitespace and positions ---

    fn skip_inline(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.pos += 1;
        }
    }

    fn skip_comment(&mut self) {
        if self.peek() != Some('#') {
            return;
        }
        if self.peek_at(1) == Some('#') && self.peek_at(2) == Some('#') && self.peek_at(3) != Some('#') {
            self.pos += 3;
            while !self.at_end()
                && !(self.peek() == Some('#') && self.peek_at(1) == Some('#') && self.peek_at(2) == Some('#'))
            {
                self.pos += 1;
            }
            self.pos = (self.pos + 3).min(self.chars.len());
            return;
        }
        while !self.at_end() && self.peek() != Some('\n') {
            self.pos += 1;
        }
    }

    fn skip_blank(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => self.pos += 1,
                Some('#') => self.skip_comment(),
                _ => break,
            }
        }
    }

    fn skip_blank_and_commas(&mut self) {
        loop {
            self.skip_blank();
            if self.peek() == Some(',') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some('\n'))
    }

    /// True when only indentation precedes the current position on its line,
    /// which is where a nested implicit object leaves the cursor.
    fn at_line_start(&self) -> bool {
        let col = self.column(self.pos);
        self.chars[self.pos - col..self.pos]
            .iter()
            .all(|c| matches!(c, ' ' | '\t'))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    fn column(&self, pos: usize) -> usize {
        let line_start = self.chars[..pos]
            .iter()
            .rposition(|c| *c == '\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        pos - line_start
    }

    fn line_of(&self, pos: usize) -> usize {
        self.chars[..pos.min(self.chars.len())]
            .iter()
            .filter(|c| **c == '\n')
            .count()
            + 1
    }

    fn error(&self, message: impl Into<String>) -> VaultError {
        VaultError::CsonParse {
            line: self.line_of(self.pos),
            message: message.into(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Dedent a block string body the way CoffeeScript heredocs are dedented.
///
/// The smallest indentation among non-blank lines after the first is removed
/// from every following line, then a blank first line and a blank last line
/// are dropped.
fn dedent_block(raw: &str) -> String {
    let leading_ws = |line: &str| line.len() - line.trim_start_matches([' ', '\t']).len();

    let min_indent = raw
        .split('\n')
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(leading_ws)
        .min()
        .unwrap_or(0);

    let mut lines = raw.split('\n');
    let mut out = String::with_capacity(raw.len());
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push('\n');
        let cut = min_indent.min(leading_ws(line));
        out.push_str(&line[cut..]);
    }

    if let Some(nl) = out.find('\n') {
        if out[..nl].trim_matches([' ', '\t', '\r']).is_empty() {
            out.drain(..=nl);
        }
    }
    if let Some(nl) = out.rfind('\n') {
        if out[nl + 1..].trim_matches([' ', '\t', '\r']).is_empty() {
            out.truncate(nl);
        }
    }

    out
}
