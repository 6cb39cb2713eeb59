//! Tokenizer for Go source text.
//!
//! Produces the token stream the declaration parser works on, including the
//! semicolons Go inserts automatically at the end of a line.

use std::ops::Range;

use crate::error::{ParseError, ParseResult};
use crate::tag::unquote_bytes;

/// Reserved words that never end a statement.
const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Keywords after which a newline still terminates the statement.
const TERMINATING_KEYWORDS: &[&str] = &["break", "continue", "fallthrough", "return"];

/// Operators and delimiters, longest first.
const PUNCTUATION: &[&str] = &[
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%", "&",
    "|", "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ".", ":", "~",
];

pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifier or keyword.
    Ident(String),
    Number,
    Rune,
    /// String literal (raw or interpreted), already decoded.
    Str(String),
    Punct(&'static str),
    /// Explicit `;` or one inserted at a line end.
    Semi,
    Eof,
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn is_ident(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(w) if w == word)
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if p == punct)
    }

    pub fn is_open(&self) -> bool {
        self.is_punct("(") || self.is_punct("[") || self.is_punct("{")
    }

    pub fn is_close(&self) -> bool {
        self.is_punct(")") || self.is_punct("]") || self.is_punct("}")
    }

    /// Whether a newline directly after this token inserts a semicolon.
    fn ends_statement(&self) -> bool {
        match &self.kind {
            TokenKind::Ident(word) => {
                !is_keyword(word) || TERMINATING_KEYWORDS.contains(&word.as_str())
            }
            TokenKind::Number | TokenKind::Rune | TokenKind::Str(_) => true,
            TokenKind::Punct(p) => matches!(*p, "++" | "--" | ")" | "]" | "}"),
            TokenKind::Semi | TokenKind::Eof => false,
        }
    }
}

/// Split `src` into tokens, ending with a single [`TokenKind::Eof`].
pub(crate) fn tokenize(src: &str) -> ParseResult<Vec<Token>> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
    token_line: usize,
    token_column: usize,
    tokens: Vec<Token>,
    insert_semi: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            line_start: 0,
            token_line: 1,
            token_column: 1,
            tokens: Vec::new(),
            insert_semi: false,
        }
    }

    fn run(mut self) -> ParseResult<Vec<Token>> {
        while let Some(c) = self.peek() {
            self.mark();
            match c {
                '\n' => {
                    self.newline_semi();
                    self.bump();
                }
                ' ' | '\t' | '\r' | '\u{feff}' => {
                    self.bump();
                }
                '/' if self.rest().starts_with("//") => self.line_comment(),
                '/' if self.rest().starts_with("/*") => self.block_comment()?,
                '"' => self.interpreted_string()?,
                '`' => self.raw_string()?,
                '\'' => self.rune()?,
                ';' => {
                    let start = self.pos;
                    self.bump();
                    self.push(TokenKind::Semi, start);
                }
                c if c.is_ascii_digit() => self.number(),
                '.' if self.rest()[1..].starts_with(|c: char| c.is_ascii_digit()) => self.number(),
                c if c == '_' || c.is_alphabetic() => self.ident(),
                _ => self.punct()?,
            }
        }

        self.newline_semi();
        let end = self.src.len();
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            span: end..end,
            line: self.line,
            column: self.column(),
        });
        Ok(self.tokens)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(c)
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let before = &self.src[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        (line, before[line_start..].chars().count() + 1)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> ParseError {
        let (line, column) = self.position(offset);
        ParseError::new(line, column, message)
    }

    fn column(&self) -> usize {
        self.src[self.line_start..self.pos].chars().count() + 1
    }

    fn mark(&mut self) {
        self.token_line = self.line;
        self.token_column = self.column();
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let token = Token {
            kind,
            span: start..self.pos,
            line: self.token_line,
            column: self.token_column,
        };
        self.insert_semi = token.ends_statement();
        self.tokens.push(token);
    }

    /// Emit the semicolon a line break implies, if any.
    fn newline_semi(&mut self) {
        if self.insert_semi {
            self.tokens.push(Token {
                kind: TokenKind::Semi,
                span: self.pos..self.pos,
                line: self.line,
                column: self.column(),
            });
            self.insert_semi = false;
        }
    }

    fn line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn block_comment(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let Some(len) = self.rest()[2..].find("*/") else {
            return Err(self.error_at(start, "comment not terminated"));
        };
        let body_end = self.pos + 2 + len;
        if self.src[start..body_end].contains('\n') {
            self.newline_semi();
        }
        while self.pos < body_end + 2 {
            self.bump();
        }
        Ok(())
    }

    fn interpreted_string(&mut self) -> ParseResult<()> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error_at(start, "string literal not terminated"));
                }
                Some('\\') => {
                    self.bump();
                }
                Some('"') => break,
                Some(_) => {}
            }
        }
        let inner = &self.src[start + 1..self.pos - 1];
        let bytes = unquote_bytes(inner)
            .ok_or_else(|| self.error_at(start, "invalid escape in string literal"))?;
        let value = String::from_utf8_lossy(&bytes).into_owned();
        self.push(TokenKind::Str(value), start);
        Ok(())
    }

    fn raw_string(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let Some(len) = self.rest()[1..].find('`') else {
            return Err(self.error_at(start, "raw string literal not terminated"));
        };
        let value = self.src[start + 1..start + 1 + len].replace('\r', "");
        while self.pos < start + len + 2 {
            self.bump();
        }
        self.push(TokenKind::Str(value), start);
        Ok(())
    }

    fn rune(&mut self) -> ParseResult<()> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error_at(start, "rune literal not terminated"));
                }
                Some('\\') => {
                    self.bump();
                }
                Some('\'') => break,
                Some(_) => {}
            }
        }
        self.push(TokenKind::Rune, start);
        Ok(())
    }

    fn number(&mut self) {
        let start = self.pos;
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign) {
                break;
            }
            prev = c;
            self.bump();
        }
        self.push(TokenKind::Number, start);
    }

    fn ident(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !(c == '_' || c.is_alphanumeric()) {
                break;
            }
            self.bump();
        }
        let word = self.src[start..self.pos].to_string();
        self.push(TokenKind::Ident(word), start);
    }

    fn punct(&mut self) -> ParseResult<()> {
        let start = self.pos;
        let Some(punct) = PUNCTUATION.iter().copied().find(|p| self.rest().starts_with(p)) else {
            let c = self.peek().unwrap_or('\0');
            return Err(self.error_at(start, format!("unexpected character {c:?}")));
        };
        self.pos += punct.len();
        self.push(TokenKind::Punct(punct), start);
        Ok(())
    }
}

#[cfg(test)]
#[path = "lexer/lexer_tests.rs"]
mod lexer_tests;
