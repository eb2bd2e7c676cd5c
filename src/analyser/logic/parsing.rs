//! Tolerant cell parsers.
//!
//! Exported cells are all text. Numbers may carry thousands separators or be
//! written as ranges (`"10-20"`), and nested cells hold literal dicts and lists
//! such as `{'CA': {'spend': 120, 'impressions': 4500}}`. Nothing in here
//! returns an error: a cell that cannot be read becomes [`Parsed::Absent`] or
//! an empty structure.
//!
//! String escapes follow the exported literal syntax: `\n`, `\t`, `\r`, `\0`,
//! `\a`, `\b`, `\f`, `\v`, `\xHH`, `\uHHHH` and `\UHHHHHHHH` are decoded.
//! Named escapes (`\N{...}`) and unknown escapes are kept verbatim.
//! Literals nested deeper than [`MAX_NESTING`] levels do not decode.
//!
//! Hyphen handling is deliberately lossy. A hyphen between two numbers is a
//! range delimiter and yields the midpoint; any other hyphen is stripped, so
//! `"-5"` reads as `5.0`.

use super::types::{Parsed, Structured};
use serde_json::{Map, Number, Value};

/// Deepest bracket nesting the literal decoder accepts.
pub const MAX_NESTING: usize = 128;

pub fn parse_number(raw: &str) -> Parsed<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.contains('-') {
        let pieces: Vec<&str> = cleaned
            .split('-')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if pieces.len() >= 2 {
            let endpoints: Option<Vec<f64>> = pieces.iter().map(|p| parse_finite(p)).collect();
            if let Some(endpoints) = endpoints {
                return Parsed::Value(endpoints.iter().sum::<f64>() / endpoints.len() as f64);
            }
        }
        return parse_finite(&cleaned.replace('-', "")).into();
    }
    parse_finite(&cleaned).into()
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decodes a cell holding either a mapping or a sequence literal.
///
/// Only text whose first non-blank character is `{` or `[` is decoded.
pub fn parse_structured(raw: &str) -> Parsed<Structured> {
    match raw.trim_start().chars().next() {
        Some('{') => Parsed::Value(Structured::Mapping(parse_mapping(raw))),
        Some('[') => Parsed::Value(Structured::Sequence(parse_sequence(raw))),
        _ => Parsed::Absent,
    }
}

pub fn parse_mapping(raw: &str) -> Map<String, Value> {
    if !raw.trim_start().starts_with('{') {
        return Map::new();
    }
    match decode_literal(raw) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

pub fn parse_sequence(raw: &str) -> Vec<Value> {
    if !raw.trim_start().starts_with('[') {
        return Vec::new();
    }
    match decode_literal(raw) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Decodes a complete literal. Trailing garbage fails the whole decode.
pub fn decode_literal(raw: &str) -> Option<Value> {
    let mut decoder = LiteralDecoder::new(raw);
    let value = decoder.value()?;
    decoder.skip_ws();
    if decoder.peek().is_some() {
        return None;
    }
    Some(value)
}

/// Renders a decoded scalar the way it would appear as a cell.
pub fn value_to_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_owned(),
        Value::Bool(true) => "True".to_owned(),
        Value::Bool(false) => "False".to_owned(),
        other => other.to_string(),
    }
}

struct LiteralDecoder {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl LiteralDecoder {
    fn new(raw: &str) -> Self {
        Self {
            chars: raw.chars().collect(),
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

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Option<Value> {
        self.skip_ws();
        match self.peek()? {
            c @ ('{' | '[' | '(') => self.nested(c),
            '\'' | '"' => self.string().map(Value::String),
            c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() => self.keyword(),
            _ => None,
        }
    }

    fn nested(&mut self, open: char) -> Option<Value> {
        if self.depth >= MAX_NESTING {
            return None;
        }
        self.depth += 1;
        let value = match open {
            '{' => self.mapping(),
            '[' => self.sequence(']'),
            _ => self.sequence(')'),
        };
        self.depth -= 1;
        value
    }

    fn mapping(&mut self) -> Option<Value> {
        self.bump();
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek()? == '}' {
                self.bump();
                return Some(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(s) => s,
                other => value_to_cell(&other),
            };
            self.skip_ws();
            if self.bump()? != ':' {
                return None;
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.bump()? {
                ',' => {}
                '}' => return Some(Value::Object(map)),
                _ => return None,
            }
        }
    }

    fn sequence(&mut self, close: char) -> Option<Value> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek()? == close {
                self.bump();
                return Some(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump()? {
                ',' => {}
                c if c == close => return Some(Value::Array(items)),
                _ => return None,
            }
        }
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => {
                    let escaped = self.bump()?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        'a' => out.push('\u{7}'),
                        'b' => out.push('\u{8}'),
                        'f' => out.push('\u{c}'),
                        'v' => out.push('\u{b}'),
                        '\\' | '\'' | '"' => out.push(escaped),
                        'x' => out.push(self.hex_escape(2)?),
                        'u' => out.push(self.hex_escape(4)?),
                        'U' => out.push(self.hex_escape(8)?),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            code = code * 16 + self.bump()?.to_digit(16)?;
        }
        char::from_u32(code)
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E' | '_'))
        {
            self.pos += 1;
        }
        let text: String = self
            .chars
            .get(start..self.pos)?
            .iter()
            .filter(|c| **c != '_')
            .collect();
        if !text.contains(['.', 'e', 'E'])
            && let Ok(i) = text.parse::<i64>()
        {
            return Some(Value::from(i));
        }
        let f = text.parse::<f64>().ok()?;
        Number::from_f64(f).map(Value::Number)
    }

    fn keyword(&mut self) -> Option<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let word: String = self.chars.get(start..self.pos)?.iter().collect();
        match word.as_str() {
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            "None" => Some(Value::Null),
            _ => None,
        }
    }
}
