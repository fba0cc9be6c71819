use std::{fmt::Display, vec::IntoIter};

use thiserror::Error;
use tracing::warn;

/// Characters the scanner could not turn into a token. These never stop the scan, the
/// character is skipped and the next real token is returned instead.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum LexerError {
    #[error("{loc}: unknown character '{ch}' skipped")]
    UnknownCharacter { ch: char, loc: Loc },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Loc {
    pub line: usize,
    pub column: usize,
}

impl Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TokenKind {
    Eof,
    Identifier(String),
    Constant(i64),
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,
    Assign,

    // Operator
    Plus,     // +
    Minus,    // -
    Asterisk, // *
    Slash,    // /

    // Keywords
    KWInt,
    KWReturn,
}

impl TokenKind {
    pub fn from_string(string: &str) -> Self {
        match string {
            "int" => Self::KWInt,
            "return" => Self::KWReturn,
            _ => Self::Identifier(string.to_owned()),
        }
    }

    /// Name of the kind without its payload, for "expected ..." messages.
    pub fn kind_name(&self) -> String {
        match self {
            TokenKind::Eof => "end of input".to_owned(),
            TokenKind::Identifier(_) => "identifier".to_owned(),
            TokenKind::Constant(_) => "integer constant".to_owned(),
            kind => format!("'{}'", kind),
        }
    }

    /// Kind together with its payload, for "found ..." messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::Constant(value) => format!("integer constant {}", value),
            kind => kind.kind_name(),
        }
    }
}

/// Writes the exact lexeme of the token. End of input has no lexeme.
impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Eof => Ok(()),
            TokenKind::Identifier(name) => write!(f, "{}", name),
            TokenKind::Constant(value) => write!(f, "{}", value),
            TokenKind::OpenParen => write!(f, "("),
            TokenKind::CloseParen => write!(f, ")"),
            TokenKind::OpenBrace => write!(f, "{{"),
            TokenKind::CloseBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Asterisk => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::KWInt => write!(f, "int"),
            TokenKind::KWReturn => write!(f, "return"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: Loc,
}

#[derive(Debug)]
pub struct Lexer {
    chars: IntoIter<char>,
    loc: Loc,

    ch: char,
    peek_ch: char,

    diagnostics: Vec<LexerError>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            chars: input.chars().collect::<Vec<_>>().into_iter(),
            ch: '\0',
            peek_ch: '\0',

            loc: Loc { column: 0, line: 1 },
            diagnostics: vec![],
        };

        lexer.peek_ch = lexer.chars.next().unwrap_or('\0');
        lexer.read_char();
        lexer
    }

    /// Every character that was skipped so far.
    pub fn diagnostics(&self) -> &[LexerError] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<LexerError> {
        self.diagnostics
    }

    fn peek_char(&self) -> char {
        self.peek_ch
    }

    fn is_digit(&self) -> bool {
        self.ch.is_ascii_digit()
    }

    fn is_identifier_start(&self) -> bool {
        self.ch.is_ascii_alphabetic() || self.ch == '_'
    }

    fn is_valid_identifier_char(&self) -> bool {
        self.is_identifier_start() || self.is_digit()
    }

    fn is_whitespace(&self) -> bool {
        matches!(self.ch, ' ' | '\n' | '\r' | '\t' | '\x0b' | '\x0c')
    }

    fn read_char(&mut self) {
        if self.ch == '\n' {
            self.loc.column = 0;
            self.loc.line += 1;
        }
        self.ch = self.peek_ch;
        self.peek_ch = self.chars.next().unwrap_or('\0');
        self.loc.column += 1;
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match (self.ch, self.peek_char()) {
                _ if self.is_whitespace() => self.read_char(),
                ('/', '/') => self.skip_line_comment(),
                ('/', '*') => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while self.ch != '\n' && self.ch != '\0' {
            self.read_char();
        }
    }

    // An unterminated comment runs until the end of the input.
    fn skip_block_comment(&mut self) {
        self.read_char();
        self.read_char();

        while self.ch != '\0' && !(self.ch == '*' && self.peek_char() == '/') {
            self.read_char();
        }

        if self.ch != '\0' {
            self.read_char();
            self.read_char();
        }
    }

    fn read_constant(&mut self) -> Token {
        let old_loc = self.loc;
        let mut value: i64 = 0;

        while let Some(digit) = self.ch.to_digit(10) {
            value = value.wrapping_mul(10).wrapping_add(i64::from(digit));
            self.read_char();
        }

        Token {
            kind: TokenKind::Constant(value),
            loc: old_loc,
        }
    }

    fn read_identifier(&mut self) -> Token {
        let old_loc = self.loc;
        let mut string = String::new();

        while self.is_valid_identifier_char() {
            string.push(self.ch);
            self.read_char();
        }
        Token {
            kind: TokenKind::from_string(&string),
            loc: old_loc,
        }
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            let old_loc = self.loc;

            let result = match self.ch {
                '(' => TokenKind::OpenParen,
                ')' => TokenKind::CloseParen,
                '{' => TokenKind::OpenBrace,
                '}' => TokenKind::CloseBrace,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                '=' => TokenKind::Assign,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Asterisk,
                '/' => TokenKind::Slash,
                '\0' => {
                    return Token {
                        kind: TokenKind::Eof,
                        loc: old_loc,
                    }
                }
                _ if self.is_digit() => return self.read_constant(),
                _ if self.is_identifier_start() => return self.read_identifier(),
                ch => {
                    let error = LexerError::UnknownCharacter { ch, loc: old_loc };
                    warn!("{}", error);
                    self.diagnostics.push(error);
                    self.read_char();
                    continue;
                }
            };

            self.read_char();
            return Token {
                kind: result,
                loc: old_loc,
            };
        }
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();

        if let TokenKind::Eof = token.kind {
            return None;
        }

        Some(token)
    }
}
