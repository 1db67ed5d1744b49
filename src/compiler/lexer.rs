//! This module contains the character cursor and the tokenizer built on it.

use std::iter::Peekable;
use std::str::Chars;

use tracing::trace;

use super::token::END_OF_FILE;
use super::Token;
use super::TokenType;

/// A location in the source, as tracked by a `Cursor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Position {
    /// Byte offset of the current character.
    pub(crate) offset: usize,
    pub(crate) line: u32,
    pub(crate) column: u32,
}

/// A `Cursor` walks a source string one character at a time, keeping track
/// of the line and column of the current character.
#[derive(Debug)]
pub(crate) struct Cursor<'a> {
    iter: Peekable<Chars<'a>>,
    pos: Position,
}

/// A `TokenStream` is a wrapper around a `Cursor`. It holds exactly one token
/// of lookahead: the current token.
#[derive(Debug)]
pub(crate) struct TokenStream<'a> {
    cursor: Cursor<'a>,
    current: Token,
}

/// The only characters which separate tokens without being one.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

pub(crate) fn is_binder(c: char) -> bool {
    matches!(c, '\\' | 'λ')
}

pub(crate) fn is_body_delimiter(c: char) -> bool {
    c == '.'
}

pub(crate) fn is_group_open(c: char) -> bool {
    c == '('
}

pub(crate) fn is_group_close(c: char) -> bool {
    c == ')'
}

/// Whether `name` lexes as exactly one identifier.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_identifier_char)
}

/// Identifiers are made of every character which isn't reserved.
pub(crate) fn is_identifier_char(c: char) -> bool {
    !is_whitespace(c)
        && !is_binder(c)
        && !is_body_delimiter(c)
        && !is_group_open(c)
        && !is_group_close(c)
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Cursor {
            iter: source.chars().peekable(),
            pos: Position {
                offset: 0,
                line: 1,
                column: 1,
            },
        }
    }

    /// The current character, or `None` at the end of input.
    pub(crate) fn current(&mut self) -> Option<char> {
        self.iter.peek().copied()
    }

    pub(crate) fn position(&self) -> Position {
        self.pos
    }

    /// Move past the current character. Returns `false` if there was nothing
    /// left to consume.
    pub(crate) fn advance(&mut self) -> bool {
        match self.iter.next() {
            Some(c) => {
                self.pos.offset += c.len_utf8();
                if c == '\n' {
                    self.pos.line += 1;
                    self.pos.column = 1;
                } else {
                    self.pos.column += 1;
                }
                true
            }
            None => false,
        }
    }

    pub(crate) fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            self.advance();
        }
    }

    /// Consume characters for as long as `pred` holds, and return them.
    pub(crate) fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }
}

impl<'a> TokenStream<'a> {
    /// Create a stream positioned on the first token of `source`.
    pub(crate) fn new(source: &'a str) -> Self {
        let mut cursor = Cursor::new(source);
        let current = next_token(&mut cursor);
        TokenStream { cursor, current }
    }

    pub(crate) fn current(&self) -> &Token {
        &self.current
    }

    /// Replace the current token with the next one. Once the end of file has
    /// been reached, the current token stays the end-of-file token.
    pub(crate) fn advance(&mut self) {
        if !self.current.is_eof() {
            self.current = next_token(&mut self.cursor);
        }
    }
}

/// Skip whitespace, then read a single token.
fn next_token(cursor: &mut Cursor<'_>) -> Token {
    cursor.skip_while(is_whitespace);
    let Position {
        offset,
        line,
        column,
    } = cursor.position();
    let token = match cursor.current() {
        Some(c) if is_body_delimiter(c) => single(cursor, TokenType::BodyDelimiter, c),
        Some(c) if is_binder(c) => single(cursor, TokenType::Binder, c),
        Some(c) if is_group_open(c) => single(cursor, TokenType::GroupOpen, c),
        Some(c) if is_group_close(c) => single(cursor, TokenType::GroupClose, c),
        Some(_) => {
            let name = cursor.read_while(is_identifier_char);
            Token::new(TokenType::Identifier, line, column, name)
        }
        None => Token::new(TokenType::EndOfFile, line, column, END_OF_FILE),
    };
    trace!(?token, offset, "lexed");
    token
}

fn single(cursor: &mut Cursor<'_>, typ: TokenType, c: char) -> Token {
    let Position { line, column, .. } = cursor.position();
    cursor.advance();
    Token::new(typ, line, column, c)
}
