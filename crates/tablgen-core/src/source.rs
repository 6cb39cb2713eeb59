//! Declaration tree for a Go source unit.
//!
//! This is deliberately not a full Go parser. It recognises the package
//! clause and the shape of every top-level declaration, and fully parses only
//! type declarations. Function bodies, variable and constant initialisers,
//! interface bodies and non-struct type expressions are skipped by balanced
//! delimiter scanning, keeping their source text where it is useful.
//!
//! # Supported
//!
//! - Single and grouped `import`, `type`, `var` and `const` declarations
//! - Generic type parameter lists (`type List[T any] struct { ... }`)
//! - Alias declarations (`type ID = string`)
//! - Struct fields with identifier lists, embedded types (including generic
//!   ones such as `List[int]`) and raw or interpreted string tags
//!
//! # Limitations
//!
//! - Semantic validity (unresolved types, duplicate names) is not checked

mod lexer;

use crate::error::{ParseError, ParseResult};
use lexer::{Token, TokenKind, is_keyword, tokenize};

/// A parsed source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Name from the `package` clause.
    pub package: String,

    /// Top-level declarations, in file order.
    pub decls: Vec<Decl>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    /// `import "fmt"` or a grouped import; holds the import paths.
    Import(Vec<String>),

    /// `type X ...` or `type ( ... )`.
    Type(TypeDecl),

    /// Function or method declaration.
    Func { name: String },

    /// `var` declaration.
    Var,

    /// `const` declaration.
    Const,
}

/// One `type` keyword and the specs it introduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub specs: Vec<TypeSpec>,
}

/// A single `Name Type` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: String,

    /// Line of the name, 1-based.
    pub line: usize,

    pub shape: TypeShape,
}

/// What a type spec binds its name to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// `struct { ... }`
    Record(Vec<FieldDecl>),

    /// `= T`; holds the aliased type as written.
    Alias(String),

    /// `interface { ... }`
    Interface,

    /// Any other type expression, as written.
    Other(String),
}

impl TypeShape {
    pub fn is_record(&self) -> bool {
        matches!(self, TypeShape::Record(_))
    }
}

/// One line of a struct body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Declared identifiers. Empty for an embedded field.
    pub names: Vec<String>,

    /// Field type as written, whitespace-normalised.
    pub type_expr: String,

    /// Decoded tag literal, if present.
    pub tag: Option<String>,

    pub line: usize,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parse the text of a Go source unit.
pub fn parse_unit(src: &str) -> ParseResult<SourceUnit> {
    let tokens = tokenize(src)?;
    Parser {
        src,
        tokens,
        pos: 0,
    }
    .unit()
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError::new(token.line, token.column, message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = match &self.peek().kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Semi => "newline or ';'".to_string(),
            _ => format!("'{}'", &self.src[self.peek().span.clone()]),
        };
        self.error(format!("expected {expected}, found {found}"))
    }

    fn skip_semis(&mut self) {
        while self.peek().kind == TokenKind::Semi {
            self.advance();
        }
    }

    fn expect_punct(&mut self, punct: &str) -> ParseResult<Token> {
        if self.peek().is_punct(punct) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{punct}'")))
        }
    }

    fn expect_name(&mut self) -> ParseResult<Token> {
        match &self.peek().kind {
            TokenKind::Ident(word) if !is_keyword(word) => Ok(self.advance()),
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_decl_end(&mut self) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::Semi => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("';' or newline after declaration")),
        }
    }

    fn text(&self, first: usize, end: usize) -> String {
        if first >= end {
            return String::new();
        }
        let start = self.tokens[first].span.start;
        let stop = self.tokens[end - 1].span.end;
        self.src[start..stop].split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn unit(mut self) -> ParseResult<SourceUnit> {
        self.skip_semis();
        if !self.peek().is_ident("package") {
            return Err(self.unexpected("'package' clause"));
        }
        self.advance();
        let package = ident_text(&self.expect_name()?);
        self.expect_decl_end()?;

        let mut decls = Vec::new();
        loop {
            self.skip_semis();
            if self.at_eof() {
                break;
            }
            let keyword = match &self.peek().kind {
                TokenKind::Ident(word) => word.clone(),
                _ => String::new(),
            };
            let decl = match keyword.as_str() {
                "import" => self.import_decl()?,
                "type" => Decl::Type(self.type_decl()?),
                "func" => self.func_decl()?,
                "var" => {
                    self.value_decl()?;
                    Decl::Var
                }
                "const" => {
                    self.value_decl()?;
                    Decl::Const
                }
                _ => return Err(self.error("non-declaration statement outside function body")),
            };
            self.expect_decl_end()?;
            decls.push(decl);
        }

        Ok(SourceUnit { package, decls })
    }

    fn import_decl(&mut self) -> ParseResult<Decl> {
        self.advance();
        let mut paths = Vec::new();
        if self.peek().is_punct("(") {
            self.advance();
            loop {
                self.skip_semis();
                if self.peek().is_punct(")") {
                    self.advance();
                    break;
                }
                paths.push(self.import_spec()?);
                if !self.peek().is_punct(")") && self.peek().kind != TokenKind::Semi {
                    return Err(self.unexpected("';' or ')' in import group"));
                }
            }
        } else {
            paths.push(self.import_spec()?);
        }
        Ok(Decl::Import(paths))
    }

    fn import_spec(&mut self) -> ParseResult<String> {
        if self.peek().is_punct(".") || matches!(self.peek().kind, TokenKind::Ident(_)) {
            self.advance();
        }
        let TokenKind::Str(path) = &self.peek().kind else {
            return Err(self.unexpected("import path"));
        };
        let path = path.clone();
        self.advance();
        Ok(path)
    }

    fn type_decl(&mut self) -> ParseResult<TypeDecl> {
        self.advance();
        if !self.peek().is_punct("(") {
            let spec = self.type_spec()?;
            return Ok(TypeDecl { specs: vec![spec] });
        }

        self.advance();
        let mut specs = Vec::new();
        loop {
            self.skip_semis();
            if self.peek().is_punct(")") {
                self.advance();
                break;
            }
            specs.push(self.type_spec()?);
            if !self.peek().is_punct(")") && self.peek().kind != TokenKind::Semi {
                return Err(self.unexpected("';' or ')' in type group"));
            }
        }
        Ok(TypeDecl { specs })
    }

    fn type_spec(&mut self) -> ParseResult<TypeSpec> {
        let name_token = self.expect_name()?;
        let name = ident_text(&name_token);

        if self.peek().is_punct("[") && self.starts_type_params() {
            self.skip_balanced()?;
        }

        let shape = if self.peek().is_punct("=") {
            self.advance();
            TypeShape::Alias(self.skip_type()?)
        } else if self.peek().is_ident("struct") {
            TypeShape::Record(self.struct_body()?)
        } else if self.peek().is_ident("interface") {
            self.skip_type()?;
            TypeShape::Interface
        } else {
            TypeShape::Other(self.skip_type()?)
        };

        Ok(TypeSpec {
            name,
            line: name_token.line,
            shape,
        })
    }

    /// After `Name`, tell `[T any]` apart from an array or slice type.
    fn starts_type_params(&self) -> bool {
        matches!(self.peek_nth(1).kind, TokenKind::Ident(_)) && !self.peek_nth(2).is_punct("]")
    }

    fn struct_body(&mut self) -> ParseResult<Vec<FieldDecl>> {
        self.advance();
        self.expect_punct("{")?;
        let mut fields = Vec::new();
        loop {
            self.skip_semis();
            if self.peek().is_punct("}") {
                self.advance();
                break;
            }
            fields.push(self.field_decl()?);
            match self.peek().kind {
                TokenKind::Semi => {
                    self.advance();
                }
                _ if self.peek().is_punct("}") => {}
                _ => return Err(self.unexpected("';' or '}' after field")),
            }
        }
        Ok(fields)
    }

    fn field_decl(&mut self) -> ParseResult<FieldDecl> {
        let line = self.peek().line;
        let mut names = Vec::new();

        let named = match &self.peek().kind {
            TokenKind::Ident(word) if !is_keyword(word) => {
                let next = self.peek_nth(1);
                if next.is_punct("[") {
                    !self.type_args_end_field(1)
                } else {
                    !(next.is_punct(".") || ends_field(next))
                }
            }
            _ if self.peek().is_punct("*") => false,
            _ => return Err(self.unexpected("field name or embedded type")),
        };

        if named {
            names.push(ident_text(&self.advance()));
            while self.peek().is_punct(",") {
                self.advance();
                names.push(ident_text(&self.expect_name()?));
            }
        }

        let type_expr = self.skip_type()?;
        let tag = match &self.peek().kind {
            TokenKind::Str(tag) => {
                let tag = tag.clone();
                self.advance();
                Some(tag)
            }
            _ => None,
        };

        Ok(FieldDecl {
            names,
            type_expr,
            tag,
            line,
        })
    }

    /// Whether the bracket group opening at lookahead `open` is directly
    /// followed by the end of the field, making `Name[...]` an embedded
    /// generic type rather than a field of array or slice type.
    fn type_args_end_field(&self, open: usize) -> bool {
        let mut depth = 0usize;
        let mut n = open;
        loop {
            let token = self.peek_nth(n);
            if token.kind == TokenKind::Eof {
                return false;
            }
            if token.is_open() {
                depth += 1;
            } else if token.is_close() {
                depth -= 1;
                if depth == 0 {
                    return ends_field(self.peek_nth(n + 1));
                }
            }
            n += 1;
        }
    }

    /// Consume one type expression and return its source text.
    ///
    /// Stops before a `;`, `,`, tag literal or unmatched closing delimiter at
    /// nesting depth zero.
    fn skip_type(&mut self) -> ParseResult<String> {
        let first = self.pos;
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::Eof => return Err(self.unexpected("type")),
                TokenKind::Semi | TokenKind::Str(_) if depth == 0 => break,
                _ if token.is_punct(",") && depth == 0 => break,
                _ if token.is_open() => depth += 1,
                _ if token.is_close() => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
        if self.pos == first {
            return Err(self.unexpected("type"));
        }
        Ok(self.text(first, self.pos))
    }

    /// Consume an opening delimiter and everything up to its match.
    fn skip_balanced(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Eof => return Err(self.unexpected("closing delimiter")),
                _ if token.is_open() => depth += 1,
                _ if token.is_close() => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    fn func_decl(&mut self) -> ParseResult<Decl> {
        self.advance();
        if self.peek().is_punct("(") {
            self.skip_balanced()?;
        }
        let name = ident_text(&self.expect_name()?);

        // Signature runs until the body or the end of the declaration. A
        // brace directly after `struct`/`interface` belongs to a result type.
        let mut previous_is_type_keyword = false;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof | TokenKind::Semi => break,
                _ if token.is_punct("{") && !previous_is_type_keyword => {
                    self.skip_balanced()?;
                    break;
                }
                _ if token.is_open() => {
                    self.skip_balanced()?;
                    previous_is_type_keyword = false;
                }
                _ => {
                    previous_is_type_keyword =
                        token.is_ident("struct") || token.is_ident("interface");
                    self.advance();
                }
            }
        }
        Ok(Decl::Func { name })
    }

    fn value_decl(&mut self) -> ParseResult<()> {
        self.advance();
        if self.peek().is_punct("(") {
            return self.skip_balanced();
        }
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof | TokenKind::Semi => return Ok(()),
                _ if token.is_open() => self.skip_balanced()?,
                _ if token.is_close() => return Err(self.unexpected("expression")),
                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// A token that can follow the type of a field: the separator, the end of
/// the struct body or a tag.
fn ends_field(token: &Token) -> bool {
    token.is_punct("}") || matches!(token.kind, TokenKind::Semi | TokenKind::Str(_))
}

fn ident_text(token: &Token) -> String {
    match &token.kind {
        TokenKind::Ident(word) => word.clone(),
        _ => String::new(),
    }
}
