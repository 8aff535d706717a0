//! Attribute value parsing.
//!
//! Turns the raw text of one tag attribute into a `ParsedValue`. The
//! grammar is small:
//!
//! ```text
//! value   := array | scalar
//! array   := ('[' | '{') (entry (',' entry)*)? (']' | '}')
//! entry   := value | scalar ':' value
//! scalar  := quoted | unquoted
//! ```
//!
//! Brackets and braces are interchangeable. An array with at least one
//! `key: value` entry becomes a `Mapping`, anything else a `Sequence`.
//! A backslash takes the next character literally.

use thiserror::Error;

use crate::types::{Mapping, ParsedValue};

/// Why a raw value could not be parsed.
///
/// Offsets count characters from the start of the raw value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("empty value")]
    Empty,

    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedToken { offset: usize, found: char },

    #[error("unterminated quoted string starting at offset {offset}")]
    UnterminatedQuote { offset: usize },

    #[error("unterminated array starting at offset {offset}")]
    UnterminatedArray { offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    End,
    BracketOpen,
    BracketClose,
    CurlyOpen,
    CurlyClose,
    Comma,
    Colon,
    Scalar,
}

impl Token {
    fn from_char(c: char) -> Self {
        match c {
            '[' => Token::BracketOpen,
            ']' => Token::BracketClose,
            '{' => Token::CurlyOpen,
            '}' => Token::CurlyClose,
            ',' => Token::Comma,
            ':' => Token::Colon,
            _ => Token::Scalar,
        }
    }
}

enum Entry {
    Positional(ParsedValue),
    Keyed(String, ParsedValue),
}

/// An array whose closing bracket has not been reached yet.
struct Frame {
    open: usize,
    braced: bool,
    entries: Vec<Entry>,
    /// Key waiting for its value.
    key: Option<String>,
}

impl Frame {
    fn new(open: usize, braced: bool) -> Self {
        Self {
            open,
            braced,
            entries: Vec::new(),
            key: None,
        }
    }

    fn push(&mut self, value: ParsedValue) {
        match self.key.take() {
            Some(key) => self.entries.push(Entry::Keyed(key, value)),
            None => self.entries.push(Entry::Positional(value)),
        }
    }
}

/// Parser over one raw attribute value.
///
/// Arrays are tracked on an explicit stack, so nesting depth is bounded
/// only by the input length.
pub struct ValueParser {
    chars: Vec<char>,
    pos: usize,
    /// Offsets of the currently open arrays.
    open: Vec<usize>,
}

impl ValueParser {
    /// Parse a raw attribute value.
    ///
    /// Only the first complete value is read; anything after it (for a
    /// top-level scalar, anything after the first unescaped comma) is
    /// ignored.
    pub fn parse(raw: &str) -> Result<ParsedValue, ValueError> {
        if raw.trim().is_empty() {
            return Err(ValueError::Empty);
        }

        let mut parser = Self {
            chars: raw.chars().collect(),
            pos: 0,
            open: Vec::new(),
        };
        parser.parse_value()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Token {
        self.skip_whitespace();
        match self.chars.get(self.pos) {
            Some(&c) => Token::from_char(c),
            None => Token::End,
        }
    }

    fn bump(&mut self) -> Token {
        let token = self.peek();
        if token != Token::End {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self) -> ValueError {
        match self.chars.get(self.pos) {
            Some(&found) => ValueError::UnexpectedToken {
                offset: self.pos,
                found,
            },
            None => match self.open.last() {
                Some(&offset) => ValueError::UnterminatedArray { offset },
                None => ValueError::Empty,
            },
        }
    }

    fn parse_value(&mut self) -> Result<ParsedValue, ValueError> {
        let mut frames: Vec<Frame> = Vec::new();

        loop {
            // Start of a value: open an array or read a scalar
            let mut value = match self.peek() {
                Token::BracketOpen | Token::CurlyOpen => {
                    let open = self.pos;
                    let braced = self.bump() == Token::CurlyOpen;
                    self.open.push(open);
                    frames.push(Frame::new(open, braced));
                    None
                }
                Token::Scalar => Some(ParsedValue::Scalar(self.parse_scalar()?)),
                _ => return Err(self.unexpected()),
            };

            // Hand finished values to their arrays until another value starts
            loop {
                let Some(frame) = frames.last_mut() else {
                    return value.ok_or(ValueError::Empty);
                };

                if let Some(mut finished) = value.take() {
                    let is_key =
                        frame.key.is_none() && finished.is_scalar() && self.peek() == Token::Colon;
                    if is_key {
                        self.bump();
                        if let ParsedValue::Scalar(key) = &mut finished {
                            frame.key = Some(std::mem::take(key));
                        }
                        break;
                    }
                    frame.push(finished);
                }

                match self.peek() {
                    Token::End => return Err(ValueError::UnterminatedArray { offset: frame.open }),
                    Token::Comma => {
                        self.bump();
                    }
                    Token::BracketClose | Token::CurlyClose => {
                        self.bump();
                        self.open.pop();
                        value = frames
                            .pop()
                            .map(|frame| build_array(frame.entries, frame.braced));
                    }
                    _ => break,
                }
            }
        }
    }

    fn terminates(&self, c: char) -> bool {
        if !self.open.is_empty() {
            matches!(c, ',' | ':' | '[' | ']' | '{' | '}')
        } else {
            c == ','
        }
    }

    fn parse_scalar(&mut self) -> Result<String, ValueError> {
        self.skip_whitespace();

        let start = self.pos;
        let quote = match self.chars.get(self.pos) {
            Some(&c @ ('\'' | '"')) => {
                self.pos += 1;
                Some(c)
            }
            _ => None,
        };

        let mut scalar = String::new();
        let mut escaped = false;
        while let Some(&c) = self.chars.get(self.pos) {
            if !escaped {
                match quote {
                    Some(q) if c == q => {
                        self.pos += 1;
                        return Ok(scalar);
                    }
                    None if self.terminates(c) => return Ok(self.finish_unquoted(scalar)),
                    _ => {}
                }
                if c == '\\' {
                    escaped = true;
                    self.pos += 1;
                    continue;
                }
            }
            scalar.push(c);
            escaped = false;
            self.pos += 1;
        }

        match quote {
            Some(_) => Err(ValueError::UnterminatedQuote { offset: start }),
            None => Ok(self.finish_unquoted(scalar)),
        }
    }

    /// Inside arrays, whitespace before a delimiter belongs to the delimiter.
    fn finish_unquoted(&self, scalar: String) -> String {
        if !self.open.is_empty() {
            scalar.trim_end().to_string()
        } else {
            scalar
        }
    }
}

fn build_array(entries: Vec<Entry>, braced: bool) -> ParsedValue {
    let keyed = entries.iter().any(|e| matches!(e, Entry::Keyed(..)));
    if !keyed && !(braced && entries.is_empty()) {
        return ParsedValue::Sequence(
            entries
                .into_iter()
                .map(|e| match e {
                    Entry::Positional(v) | Entry::Keyed(_, v) => v,
                })
                .collect(),
        );
    }

    // Positional entries in a mapping get the next free integer key
    let mut map = Mapping::new();
    let mut next_index = 0usize;
    for entry in entries {
        match entry {
            Entry::Keyed(key, value) => {
                if let Ok(n) = key.parse::<usize>() {
                    next_index = next_index.max(n + 1);
                }
                map.insert(key, value);
            }
            Entry::Positional(value) => {
                map.insert(next_index.to_string(), value);
                next_index += 1;
            }
        }
    }
    ParsedValue::Mapping(map)
}
