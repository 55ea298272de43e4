//! Hand-rolled tokenizer. Stands in for the grammar-driven lexer the
//! specification treats as an external collaborator.

use crate::errors::SyntaxError;
use crate::location::{FileId, Position, Range};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int(u64),
    Float(f64),

    Let,
    Function,
    Class,
    If,
    Else,
    While,
    Break,
    Continue,
    Return,
    Not,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    Eq,
    Question,
    Colon,
    Semi,
    Comma,
    Dot,
    LParen,
    RParen,
    LBrace,
    RBrace,

    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("let", TokenKind::Let),
    ("function", TokenKind::Function),
    ("class", TokenKind::Class),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("return", TokenKind::Return),
    ("not", TokenKind::Not),
];

pub struct Lexer<'src> {
    src: &'src [u8],
    pos: usize,
    line: u32,
    col: u32,
    file: FileId,
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(src: &'src str, file: FileId) -> Self {
        Self { src: src.as_bytes(), pos: 0, line: 0, col: 0, file }
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.col)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.src.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.bump();
                }
                Some(b'/') if self.peek2() == Some(b'/') => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_trivia();
        let start = self.here();
        let Some(c) = self.peek() else {
            return Ok(Token { kind: TokenKind::Eof, range: Range::new(self.file, start, start) });
        };

        let kind = match c {
            b'0'..=b'9' => self.lex_number()?,
            b'_' | b'a'..=b'z' | b'A'..=b'Z' => self.lex_ident(),
            b'+' => { self.bump(); TokenKind::Plus }
            b'-' => { self.bump(); TokenKind::Minus }
            b'*' => { self.bump(); TokenKind::Star }
            b'/' => { self.bump(); TokenKind::Slash }
            b'%' => { self.bump(); TokenKind::Percent }
            b'^' => { self.bump(); TokenKind::Caret }
            b'?' => { self.bump(); TokenKind::Question }
            b':' => { self.bump(); TokenKind::Colon }
            b';' => { self.bump(); TokenKind::Semi }
            b',' => { self.bump(); TokenKind::Comma }
            b'.' => { self.bump(); TokenKind::Dot }
            b'(' => { self.bump(); TokenKind::LParen }
            b')' => { self.bump(); TokenKind::RParen }
            b'{' => { self.bump(); TokenKind::LBrace }
            b'}' => { self.bump(); TokenKind::RBrace }
            b'=' => {
                self.bump();
                if self.peek() == Some(b'=') {
                    self.bump();
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }
            b'!' => {
                self.bump();
                if self.peek() == Some(b'=') {
                    self.bump();
                    TokenKind::Ne
                } else {
                    return Err(SyntaxError::UnexpectedChar {
                        found: '!',
                        range: Range::new(self.file, start, self.here()),
                    });
                }
            }
            b'<' => {
                self.bump();
                match self.peek() {
                    Some(b'=') => { self.bump(); TokenKind::Le }
                    Some(b'<') => { self.bump(); TokenKind::Shl }
                    _ => TokenKind::Lt,
                }
            }
            b'>' => {
                self.bump();
                match self.peek() {
                    Some(b'=') => { self.bump(); TokenKind::Ge }
                    Some(b'>') => { self.bump(); TokenKind::Shr }
                    _ => TokenKind::Gt,
                }
            }
            b'&' => {
                self.bump();
                if self.peek() == Some(b'&') {
                    self.bump();
                    TokenKind::AndAnd
                } else {
                    TokenKind::Amp
                }
            }
            b'|' => {
                self.bump();
                if self.peek() == Some(b'|') {
                    self.bump();
                    TokenKind::OrOr
                } else {
                    TokenKind::Pipe
                }
            }
            other => {
                self.bump();
                return Err(SyntaxError::UnexpectedChar {
                    found: other as char,
                    range: Range::new(self.file, start, self.here()),
                });
            }
        };

        Ok(Token { kind, range: Range::new(self.file, start, self.here()) })
    }

    fn lex_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(b'_' | b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9')) {
            self.bump();
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap();
        if let Some((_, kind)) = KEYWORDS.iter().find(|(kw, _)| *kw == text) {
            kind.clone()
        } else {
            TokenKind::Ident(text.to_string())
        }
    }

    fn lex_number(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        let start_pos = self.here();
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.bump();
        }
        let mut is_float = false;
        if self.peek() == Some(b'.') && matches!(self.peek2(), Some(b'0'..=b'9')) {
            is_float = true;
            self.bump();
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap();
        if is_float {
            let v: f64 = text.parse().map_err(|_| SyntaxError::UnexpectedToken {
                expected: "number".into(),
                found: text.into(),
                range: Range::new(self.file, start_pos, self.here()),
            })?;
            Ok(TokenKind::Float(v))
        } else {
            let v: u64 = text.parse().map_err(|_| SyntaxError::UnexpectedToken {
                expected: "number".into(),
                found: text.into(),
                range: Range::new(self.file, start_pos, self.here()),
            })?;
            Ok(TokenKind::Int(v))
        }
    }
}
