//! Lexer (tokenizer) for the command script.

use crate::error::{Result, SchemeError};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the script language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A keyword, type name, element id or pin label
    Word,
    /// A decimal number, possibly signed or fractional
    Number,
    /// Connection arrow `-->`
    Arrow,
    /// Disconnection arrow `-!>`
    BrokenArrow,
    /// Equals sign '='
    Equals,
    /// Newline
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing script input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => return Ok(token(TokenKind::Eof, String::new())),
        };

        match ch {
            '\n' => {
                self.advance();
                Ok(token(TokenKind::Newline, "\n".to_string()))
            }
            '=' => {
                self.advance();
                Ok(token(TokenKind::Equals, "=".to_string()))
            }
            '-' => {
                self.advance();
                match self.chars.peek().copied() {
                    Some('-') | Some('!') => {
                        let middle = self.advance().unwrap_or('-');
                        if self.chars.peek() != Some(&'>') {
                            return Err(SchemeError::lexer(line, column, "unterminated arrow"));
                        }
                        self.advance();
                        let kind = if middle == '-' {
                            TokenKind::Arrow
                        } else {
                            TokenKind::BrokenArrow
                        };
                        Ok(token(kind, format!("-{}>", middle)))
                    }
                    Some(c) if c.is_ascii_digit() => {
                        let text = format!("-{}", self.read_word());
                        Ok(token(classify(&text), text))
                    }
                    _ => Err(SchemeError::lexer(line, column, "unexpected character '-'")),
                }
            }
            _ if ch.is_alphanumeric() || ch == '_' || ch == '.' => {
                let text = self.read_word();
                Ok(token(classify(&text), text))
            }
            _ => Err(SchemeError::lexer(
                line,
                column,
                format!("unexpected character '{}'", ch),
            )),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }
}

/// Numbers are words that parse as a float.
fn classify(text: &str) -> TokenKind {
    let numeric = text.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
        && text.parse::<f64>().is_ok();
    if numeric {
        TokenKind::Number
    } else {
        TokenKind::Word
    }
}
