// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Go lexical scanner.
//!
//! Produces tokens with byte spans and applies Go's automatic semicolon
//! insertion: when a line's final token is an identifier, a literal, one of
//! the keywords `break`, `continue`, `fallthrough` or `return`, or one of
//! `++ -- ) ] }`, a semicolon token is emitted at the newline. Inserted
//! semicolons have an empty span. Comments are collected on the side.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokType {
    Ident,
    Int,
    Float,
    Imag,
    Char,
    String,

    // keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    // operators and punctuation
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
    AddAssign,
    SubAssign,
    MulAssign,
    QuoAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    LogAnd,
    LogOr,
    Arrow,
    Inc,
    Dec,
    Eql,
    Lss,
    Gtr,
    Assign,
    Not,
    Neq,
    Leq,
    Geq,
    Define,
    Ellipsis,
    Tilde,
    LParen,
    LBrack,
    LBrace,
    Comma,
    Period,
    RParen,
    RBrack,
    RBrace,
    Semicolon,
    Colon,

    EndMarker,
}

impl TokType {
    fn keyword(ident: &str) -> Option<TokType> {
        Some(match ident {
            "break" => TokType::Break,
            "case" => TokType::Case,
            "chan" => TokType::Chan,
            "const" => TokType::Const,
            "continue" => TokType::Continue,
            "default" => TokType::Default,
            "defer" => TokType::Defer,
            "else" => TokType::Else,
            "fallthrough" => TokType::Fallthrough,
            "for" => TokType::For,
            "func" => TokType::Func,
            "go" => TokType::Go,
            "goto" => TokType::Goto,
            "if" => TokType::If,
            "import" => TokType::Import,
            "interface" => TokType::Interface,
            "map" => TokType::Map,
            "package" => TokType::Package,
            "range" => TokType::Range,
            "return" => TokType::Return,
            "select" => TokType::Select,
            "struct" => TokType::Struct,
            "switch" => TokType::Switch,
            "type" => TokType::Type,
            "var" => TokType::Var,
            _ => return None,
        })
    }

    /// Whether a newline after this token inserts a semicolon.
    fn ends_statement(self) -> bool {
        matches!(
            self,
            TokType::Ident
                | TokType::Int
                | TokType::Float
                | TokType::Imag
                | TokType::Char
                | TokType::String
                | TokType::Break
                | TokType::Continue
                | TokType::Fallthrough
                | TokType::Return
                | TokType::Inc
                | TokType::Dec
                | TokType::RParen
                | TokType::RBrack
                | TokType::RBrace
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokType::Int | TokType::Float | TokType::Imag | TokType::Char | TokType::String
        )
    }
}

/// A token and its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokType,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        &source[self.start..self.end]
    }

    /// `true` for semicolons inserted at a newline or end of file.
    pub fn is_implicit_semicolon(&self) -> bool {
        self.kind == TokType::Semicolon && self.start == self.end
    }
}

/// A comment and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub start: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokErrorKind {
    UnterminatedString,
    UnterminatedRawString,
    UnterminatedRune,
    EmptyRune,
    UnterminatedComment,
    BadNumber,
    BadCharacter(char),
}

impl std::fmt::Display for TokErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokErrorKind::UnterminatedString => f.write_str("string literal not terminated"),
            TokErrorKind::UnterminatedRawString => {
                f.write_str("raw string literal not terminated")
            }
            TokErrorKind::UnterminatedRune => f.write_str("rune literal not terminated"),
            TokErrorKind::EmptyRune => f.write_str("empty rune literal or unescaped ' in rune literal"),
            TokErrorKind::UnterminatedComment => f.write_str("comment not terminated"),
            TokErrorKind::BadNumber => f.write_str("invalid numeric literal"),
            TokErrorKind::BadCharacter(ch) => write!(f, "invalid character {:?}", ch),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct TokError {
    pub kind: TokErrorKind,
    pub offset: usize,
}

/// Scanner state; iterate it to get tokens, ending with one `EndMarker`.
pub struct TokState<'t> {
    text: &'t str,
    pos: usize,
    insert_semi: bool,
    finished: bool,
    pub comments: Vec<RawComment>,
}

impl<'t> TokState<'t> {
    pub fn new(text: &'t str) -> Self {
        TokState {
            text,
            pos: 0,
            insert_semi: false,
            finished: false,
            comments: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, kind: TokErrorKind, offset: usize) -> TokError {
        TokError { kind, offset }
    }

    fn semicolon_at(&mut self, offset: usize) -> Token {
        self.insert_semi = false;
        Token {
            kind: TokType::Semicolon,
            start: offset,
            end: offset,
        }
    }

    fn next_token(&mut self) -> Result<Token, TokError> {
        loop {
            let start = self.pos;
            let Some(ch) = self.peek() else {
                if self.insert_semi {
                    return Ok(self.semicolon_at(start));
                }
                return Ok(Token {
                    kind: TokType::EndMarker,
                    start,
                    end: start,
                });
            };
            match ch {
                '\n' => {
                    self.pos += 1;
                    if self.insert_semi {
                        return Ok(self.semicolon_at(start));
                    }
                }
                ' ' | '\t' | '\r' => {
                    self.pos += 1;
                }
                '/' if self.peek_at(1) == Some('/') => {
                    let end = memchr::memchr(b'\n', &self.text.as_bytes()[start..])
                        .map_or(self.text.len(), |i| start + i);
                    let text = self.text[start..end].trim_end_matches('\r');
                    self.comments.push(RawComment {
                        start,
                        text: text.to_string(),
                    });
                    self.pos = end;
                }
                '/' if self.peek_at(1) == Some('*') => {
                    let body = &self.text[start + 2..];
                    let Some(close) = body.find("*/") else {
                        return Err(self.error(TokErrorKind::UnterminatedComment, start));
                    };
                    let end = start + 2 + close + 2;
                    let text = &self.text[start..end];
                    self.comments.push(RawComment {
                        start,
                        text: text.to_string(),
                    });
                    self.pos = end;
                    if self.insert_semi && text.contains('\n') {
                        return Ok(self.semicolon_at(start));
                    }
                }
                _ => {
                    let kind = self.scan_token(ch)?;
                    self.insert_semi = kind.ends_statement();
                    return Ok(Token {
                        kind,
                        start,
                        end: self.pos,
                    });
                }
            }
        }
    }

    fn scan_token(&mut self, ch: char) -> Result<TokType, TokError> {
        let start = self.pos;
        if ch == '_' || ch.is_alphabetic() {
            while let Some(c) = self.peek() {
                if c == '_' || c.is_alphanumeric() {
                    self.bump();
                } else {
                    break;
                }
            }
            return Ok(TokType::keyword(&self.text[start..self.pos]).unwrap_or(TokType::Ident));
        }
        if ch.is_ascii_digit() || (ch == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())) {
            return self.scan_number();
        }
        self.bump();
        let kind = match ch {
            '"' => return self.scan_string(start),
            '`' => return self.scan_raw_string(start),
            '\'' => return self.scan_rune(start),
            '(' => TokType::LParen,
            ')' => TokType::RParen,
            '[' => TokType::LBrack,
            ']' => TokType::RBrack,
            '{' => TokType::LBrace,
            '}' => TokType::RBrace,
            ',' => TokType::Comma,
            ';' => TokType::Semicolon,
            '~' => TokType::Tilde,
            '.' => {
                if self.peek() == Some('.') && self.peek_at(1) == Some('.') {
                    self.pos += 2;
                    TokType::Ellipsis
                } else {
                    TokType::Period
                }
            }
            ':' => {
                if self.eat('=') {
                    TokType::Define
                } else {
                    TokType::Colon
                }
            }
            '+' => {
                if self.eat('+') {
                    TokType::Inc
                } else if self.eat('=') {
                    TokType::AddAssign
                } else {
                    TokType::Add
                }
            }
            '-' => {
                if self.eat('-') {
                    TokType::Dec
                } else if self.eat('=') {
                    TokType::SubAssign
                } else {
                    TokType::Sub
                }
            }
            '*' => self.assign_variant(TokType::Mul, TokType::MulAssign),
            '/' => self.assign_variant(TokType::Quo, TokType::QuoAssign),
            '%' => self.assign_variant(TokType::Rem, TokType::RemAssign),
            '^' => self.assign_variant(TokType::Xor, TokType::XorAssign),
            '=' => self.assign_variant(TokType::Assign, TokType::Eql),
            '!' => self.assign_variant(TokType::Not, TokType::Neq),
            '<' => {
                if self.eat('-') {
                    TokType::Arrow
                } else if self.eat('<') {
                    self.assign_variant(TokType::Shl, TokType::ShlAssign)
                } else {
                    self.assign_variant(TokType::Lss, TokType::Leq)
                }
            }
            '>' => {
                if self.eat('>') {
                    self.assign_variant(TokType::Shr, TokType::ShrAssign)
                } else {
                    self.assign_variant(TokType::Gtr, TokType::Geq)
                }
            }
            '&' => {
                if self.eat('&') {
                    TokType::LogAnd
                } else if self.eat('^') {
                    self.assign_variant(TokType::AndNot, TokType::AndNotAssign)
                } else {
                    self.assign_variant(TokType::And, TokType::AndAssign)
                }
            }
            '|' => {
                if self.eat('|') {
                    TokType::LogOr
                } else {
                    self.assign_variant(TokType::Or, TokType::OrAssign)
                }
            }
            other => return Err(self.error(TokErrorKind::BadCharacter(other), start)),
        };
        Ok(kind)
    }

    fn assign_variant(&mut self, plain: TokType, with_eq: TokType) -> TokType {
        if self.eat('=') {
            with_eq
        } else {
            plain
        }
    }

    fn eat_digits(&mut self, radix: u32) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if c == '_' || c.is_digit(radix) {
                self.bump();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn eat_exponent(&mut self, markers: [char; 2]) -> Result<bool, TokError> {
        if !self.peek().is_some_and(|c| markers.contains(&c)) {
            return Ok(false);
        }
        let start = self.pos;
        self.bump();
        if !self.eat('+') {
            self.eat('-');
        }
        if self.eat_digits(10) == 0 {
            return Err(self.error(TokErrorKind::BadNumber, start));
        }
        Ok(true)
    }

    fn scan_number(&mut self) -> Result<TokType, TokError> {
        let start = self.pos;
        let mut kind = TokType::Int;
        let prefix = if self.peek() == Some('0') {
            self.peek_at(1).map(|c| c.to_ascii_lowercase())
        } else {
            None
        };
        match prefix {
            Some('x') => {
                self.pos += 2;
                self.eat_digits(16);
                if self.eat('.') {
                    self.eat_digits(16);
                    kind = TokType::Float;
                }
                if self.eat_exponent(['p', 'P'])? {
                    kind = TokType::Float;
                }
            }
            Some('b') | Some('o') => {
                self.pos += 2;
                if self.eat_digits(10) == 0 {
                    return Err(self.error(TokErrorKind::BadNumber, start));
                }
            }
            _ => {
                self.eat_digits(10);
                if self.peek() == Some('.') && self.peek_at(1) != Some('.') {
                    self.bump();
                    self.eat_digits(10);
                    kind = TokType::Float;
                }
                if self.eat_exponent(['e', 'E'])? {
                    kind = TokType::Float;
                }
            }
        }
        if self.eat('i') {
            kind = TokType::Imag;
        }
        if self.peek().is_some_and(|c| c == '_' || c.is_alphanumeric()) {
            return Err(self.error(TokErrorKind::BadNumber, start));
        }
        Ok(kind)
    }

    fn scan_escaped(&mut self, start: usize, quote: char, unterminated: TokErrorKind) -> Result<usize, TokError> {
        let mut count = 0;
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error(unterminated, start)),
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(self.error(unterminated, start));
                    }
                }
                Some(c) if c == quote => return Ok(count),
                Some(_) => {}
            }
            count += 1;
        }
    }

    fn scan_string(&mut self, start: usize) -> Result<TokType, TokError> {
        self.scan_escaped(start, '"', TokErrorKind::UnterminatedString)?;
        Ok(TokType::String)
    }

    fn scan_rune(&mut self, start: usize) -> Result<TokType, TokError> {
        let count = self.scan_escaped(start, '\'', TokErrorKind::UnterminatedRune)?;
        if count == 0 {
            return Err(self.error(TokErrorKind::EmptyRune, start));
        }
        Ok(TokType::Char)
    }

    fn scan_raw_string(&mut self, start: usize) -> Result<TokType, TokError> {
        match self.text[self.pos..].find('`') {
            Some(close) => {
                self.pos += close + 1;
                Ok(TokType::String)
            }
            None => Err(self.error(TokErrorKind::UnterminatedRawString, start)),
        }
    }
}

impl Iterator for TokState<'_> {
    type Item = Result<Token, TokError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        match &token {
            Ok(tok) if tok.kind == TokType::EndMarker => self.finished = true,
            Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(token)
    }
}
