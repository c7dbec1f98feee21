//! Parser for coordinate-array literals embedded in program source
//!
//! The accepted grammar is the subset of JavaScript/TypeScript array syntax
//! that route paths are written in:
//!
//! ```text
//! array  := '[' ( element ( ',' element )* ','? )? ']'
//! element:= array | number
//! number := ['+' | '-'] digits-with-optional-fraction-and-exponent
//! ```
//!
//! Whitespace, `// line` and `/* block */` comments may appear between any
//! two tokens. Unlike a strict JSON parser, trailing commas are accepted.
//! Nothing is evaluated: any other construct is rejected.

use crate::coordinate::{Coordinate, CoordinatePath};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    #[error("unbalanced brackets: reached end of input at depth {depth}")]
    UnbalancedBrackets { depth: usize },

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("unterminated comment starting at offset {offset}")]
    UnterminatedComment { offset: usize },

    #[error("element {index} is not a [lat, lon] pair")]
    NotAPair { index: usize },

    #[error("expected an array literal")]
    NotAnArray,

    #[error("arrays nested too deeply at offset {offset}")]
    TooDeep { offset: usize },
}

/// Coordinate literals need two levels; anything far beyond that is rejected
/// before it can exhaust the stack.
pub const MAX_DEPTH: usize = 64;

/// Parsed literal value
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Number(f64),
    Array(Vec<Value>),
}

/// Parse a complete `[[lat, lon], ...]` literal into a coordinate path
pub fn parse_coordinate_literal(text: &str) -> Result<CoordinatePath, LiteralError> {
    #[cfg(feature = "profiling")]
    profiling::scope!("literal::parse_coordinate_literal");

    let mut parser = Parser::new(text);
    parser.skip_trivia()?;
    let value = parser.parse_value(0)?;
    parser.skip_trivia()?;
    if let Some((offset, ch)) = parser.peek() {
        return Err(LiteralError::UnexpectedChar { ch, offset });
    }

    let Value::Array(elements) = value else {
        return Err(LiteralError::NotAnArray);
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| match element {
            Value::Array(pair) => match pair.as_slice() {
                [Value::Number(lat), Value::Number(lon)] => Ok(Coordinate::new(*lat, *lon)),
                _ => Err(LiteralError::NotAPair { index }),
            },
            Value::Number(_) => Err(LiteralError::NotAPair { index }),
        })
        .collect()
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<(usize, char)> {
        self.text[self.pos..].chars().next().map(|c| (self.pos, c))
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.text[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) -> Result<(), LiteralError> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                match rest.find('\n') {
                    Some(end) => self.pos += end + 1,
                    None => self.pos = self.text.len(),
                }
            } else if rest.starts_with("/*") {
                let start = self.pos;
                match rest[2..].find("*/") {
                    Some(end) => self.pos += 2 + end + 2,
                    None => return Err(LiteralError::UnterminatedComment { offset: start }),
                }
            } else if let Some((_, c)) = self.peek()
                && c.is_whitespace()
            {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    /// `depth` is the number of arrays enclosing this value
    fn parse_value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some((offset, '[')) if depth >= MAX_DEPTH => Err(LiteralError::TooDeep { offset }),
            Some((_, '[')) => self.parse_array(depth + 1),
            Some((_, c)) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                self.parse_number()
            }
            Some((offset, ch)) => Err(LiteralError::UnexpectedChar { ch, offset }),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.bump(); // '['
        let mut elements = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some((_, ']')) => {
                    self.bump();
                    return Ok(Value::Array(elements));
                }
                Some(_) => {}
            }

            elements.push(self.parse_value(depth)?);

            self.skip_trivia()?;
            match self.peek() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some((_, ',')) => {
                    self.bump();
                }
                Some((_, ']')) => {}
                Some((offset, ch)) => return Err(LiteralError::UnexpectedChar { ch, offset }),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if let Some((_, '-' | '+')) = self.peek() {
            self.bump();
        }
        while let Some((_, c)) = self.peek() {
            let in_exponent_sign = matches!(c, '-' | '+')
                && matches!(self.text[start..self.pos].chars().last(), Some('e' | 'E'));
            if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E') || in_exponent_sign {
                self.bump();
            } else {
                break;
            }
        }

        let text = &self.text[start..self.pos];
        let digits = text.strip_prefix('+').unwrap_or(text);
        digits
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Value::Number)
            .ok_or_else(|| LiteralError::InvalidNumber {
                text: text.to_string(),
                offset: start,
            })
    }
}
