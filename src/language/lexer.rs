use std::fmt::{Display, Formatter};
use thiserror::Error;
use tracing::debug;
use crate::language::token::{Literal, Token, TokenKind, TokenSpan};
use crate::util;

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: u32,
    pub column: u32,
}

impl TokenPos {
    pub fn new(line: u32, column: u32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 0)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}, column {}]", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexerError {
    #[error("{0} Unexpected character '{1}'")]
    UnexpectedCharacter(TokenPos, char),
    #[error("{pos} Unterminated string")]
    UnterminatedString {
        pos: TokenPos,
    },
    #[error("{pos} Unterminated block comment")]
    UnterminatedComment {
        pos: TokenPos,
    },
    /// Number text that `f64::from_str` rejects. The scanner only collects `digits(.digits)?`,
    /// which always parses, so this stays unreachable until the literal grammar grows
    /// (exponents, separators).
    #[error("{pos} Invalid number literal '{text}'")]
    InvalidNumber {
        pos: TokenPos,
        text: String,
    },
}

type LexerResult<T> = Result<T, LexerError>;

/// Splits source text into tokens.
///
/// Lexing never fails: problems are reported in-band as [`TokenKind::Error`] tokens and the
/// lexer carries on after them, so the parser can report every error in one pass.
pub struct Lexer<'source> {
    input: &'source str,

    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    /// Scans the whole input. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.input.len() / 4 + 1);

        loop {
            let token = self.scan_token();
            let eof = token.is(TokenKind::Eof);
            tokens.push(token);

            if eof {
                break;
            }
        }

        tokens
    }

    pub fn scan_token(&mut self) -> Token {
        let token = match self.scan() {
            Ok(token) => token,
            Err(err) => self.error_token(err),
        };

        debug!("Created {}", token);
        token
    }

    fn scan(&mut self) -> LexerResult<Token> {
        loop {
            self.skip_whitespace();
            self.start_index = self.current_index;
            self.start_pos = self.current_pos;

            let c = match self.consume() {
                Some(c) => c,
                None => return Ok(self.make_token(TokenKind::Eof)),
            };

            return match c {
                '(' => Ok(self.make_token(TokenKind::ParenthesisLeft)),
                ')' => Ok(self.make_token(TokenKind::ParenthesisRight)),
                '{' => Ok(self.make_token(TokenKind::BraceLeft)),
                '}' => Ok(self.make_token(TokenKind::BraceRight)),
                '[' => Ok(self.make_token(TokenKind::BracketLeft)),
                ']' => Ok(self.make_token(TokenKind::BracketRight)),
                ',' => Ok(self.make_token(TokenKind::Comma)),
                '.' => Ok(self.make_token(TokenKind::Dot)),
                ';' => Ok(self.make_token(TokenKind::Semicolon)),
                '?' => Ok(self.make_token(TokenKind::Question)),
                ':' => Ok(self.make_token(TokenKind::Colon)),
                '%' => Ok(self.make_token(TokenKind::Percent)),
                '$' => Ok(self.make_token(TokenKind::Dollar)),
                '^' => Ok(self.make_token(TokenKind::Caret)),
                '~' => Ok(self.make_token(TokenKind::Tilde)),

                '=' => Ok(if self.expect('=') { self.make_token(TokenKind::EqualEqual) } else {
                    self.make_token(TokenKind::Equal)
                }),
                '!' => Ok(if self.expect('=') { self.make_token(TokenKind::BangEqual) } else {
                    self.make_token(TokenKind::Bang)
                }),
                '>' => Ok(if self.expect('=') { self.make_token(TokenKind::GreaterEqual) } else if self.expect('>') {
                    self.make_token(TokenKind::GreaterGreater)
                } else {
                    self.make_token(TokenKind::Greater)
                }),
                '<' => Ok(if self.expect('=') { self.make_token(TokenKind::LessEqual) } else if self.expect('<') {
                    self.make_token(TokenKind::LessLess)
                } else {
                    self.make_token(TokenKind::Less)
                }),
                '&' => Ok(if self.expect('&') { self.make_token(TokenKind::AmpersandAmpersand) } else {
                    self.make_token(TokenKind::Ampersand)
                }),
                '|' => Ok(if self.expect('|') { self.make_token(TokenKind::PipePipe) } else {
                    self.make_token(TokenKind::Pipe)
                }),

                '+' => Ok(if self.expect('+') { self.make_token(TokenKind::PlusPlus) } else if self.expect('=') {
                    self.make_token(TokenKind::PlusEqual)
                } else {
                    self.make_token(TokenKind::Plus)
                }),
                '-' => Ok(if self.expect('-') { self.make_token(TokenKind::MinusMinus) } else if self.expect('=') {
                    self.make_token(TokenKind::MinusEqual)
                } else {
                    self.make_token(TokenKind::Minus)
                }),
                '*' => Ok(if self.expect('*') { self.make_token(TokenKind::StarStar) } else if self.expect('=') {
                    self.make_token(TokenKind::StarEqual)
                } else {
                    self.make_token(TokenKind::Star)
                }),
                '/' => Ok(if self.expect('=') { self.make_token(TokenKind::SlashEqual) } else if self.expect('/') {
                    self.skip_line();
                    continue;
                } // Skip line comments
                else if self.expect('*') {
                    /* Skip block comments */
                    self.skip_block_comment()?;
                    continue;
                } else {
                    self.make_token(TokenKind::Slash)
                }),

                '"' => self.scan_string(),
                c if util::is_numeric(c) => self.scan_number(),
                c if util::is_alphabetic(c) => Ok(self.scan_identifier()),

                _ => Err(LexerError::UnexpectedCharacter(self.start_pos, c)),
            };
        }
    }

    fn scan_string(&mut self) -> LexerResult<Token> {
        let mut value = String::new();

        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }

            self.consume();

            // Line breaks only count towards line numbers, they are not part of the value
            if c != '\n' {
                value.push(c);
            }
        }

        if self.consume().is_none() {
            return Err(LexerError::UnterminatedString { pos: self.start_pos });
        }

        Ok(self.make_literal_token(TokenKind::String, Literal::String(value)))
    }

    fn scan_number(&mut self) -> LexerResult<Token> {
        while let Some('0'..='9') = self.peek() {
            self.consume();
        }

        if let Some('.') = self.peek() {
            if let Some('0'..='9') = self.peek_next() {
                self.consume();

                while let Some('0'..='9') = self.peek() {
                    self.consume();
                }
            }
        }

        let text = &self.input[self.start_index..self.current_index];
        let value = text.parse::<f64>().map_err(|_| LexerError::InvalidNumber {
            pos: self.start_pos,
            text: text.to_owned(),
        })?;

        Ok(self.make_literal_token(TokenKind::Number, Literal::Number(value)))
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        self.make_token(TokenKind::keyword(name).unwrap_or(TokenKind::Identifier))
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        self.make_literal_token(kind, Literal::Nil)
    }

    fn make_literal_token(&self, kind: TokenKind, literal: Literal) -> Token {
        Token::new(kind, self.input[self.start_index..self.current_index].to_owned(), literal, self.span())
    }

    fn error_token(&self, error: LexerError) -> Token {
        let message = error.to_string();
        Token::new(TokenKind::Error, message.clone(), Literal::String(message), self.span())
    }

    fn span(&self) -> TokenSpan {
        TokenSpan::new(self.start_pos.line, self.start_pos.column, self.current_pos.column)
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 0;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.current_index..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.input[self.current_index..].chars().nth(1)
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            self.consume();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.consume() {
            if c == '\n' {
                return;
            }
        }
    }

    fn skip_block_comment(&mut self) -> LexerResult<()> {
        while let Some(c) = self.consume() {
            if c == '*' && self.expect('/') {
                return Ok(());
            }
        }

        Err(LexerError::UnterminatedComment { pos: self.start_pos })
    }
}

pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}
