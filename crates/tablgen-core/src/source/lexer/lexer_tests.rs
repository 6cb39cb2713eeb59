#![allow(non_snake_case)]

use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
}

fn ident(word: &str) -> TokenKind {
    TokenKind::Ident(word.to_string())
}

#[test]
fn tokenize___empty_source___yields_only_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
}

#[test]
fn tokenize___newline_after_identifier___inserts_semicolon() {
    assert_eq!(
        kinds("package main\n"),
        vec![ident("package"), ident("main"), TokenKind::Semi, TokenKind::Eof]
    );
}

#[test]
fn tokenize___newline_after_open_brace___inserts_nothing() {
    assert_eq!(
        kinds("struct {\n}"),
        vec![
            ident("struct"),
            TokenKind::Punct("{"),
            TokenKind::Punct("}"),
            TokenKind::Semi,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize___newline_after_return___inserts_semicolon() {
    let tokens = kinds("return\n");

    assert_eq!(tokens[1], TokenKind::Semi);
}

#[test]
fn tokenize___newline_after_struct_keyword___inserts_nothing() {
    let tokens = kinds("struct\n{");

    assert_eq!(tokens[1], TokenKind::Punct("{"));
}

#[test]
fn tokenize___raw_string___keeps_content_verbatim() {
    let tokens = kinds(r#"`name:"-" compl:"x"`"#);

    assert_eq!(tokens[0], TokenKind::Str(r#"name:"-" compl:"x""#.to_string()));
}

#[test]
fn tokenize___interpreted_string___decodes_escapes() {
    let tokens = kinds(r#""name:\"-\"""#);

    assert_eq!(tokens[0], TokenKind::Str(r#"name:"-""#.to_string()));
}

#[test]
fn tokenize___non_utf8_byte_escapes___are_accepted() {
    let tokens = kinds(r#""\xff\376ok""#);

    assert_eq!(tokens[0], TokenKind::Str("\u{fffd}\u{fffd}ok".to_string()));
}

#[test]
fn tokenize___invalid_escape___fails() {
    let err = tokenize(r#"x = "\q""#).unwrap_err();

    assert_eq!((err.line, err.column), (1, 5));
    assert!(err.message.contains("invalid escape"));
}

#[test]
fn tokenize___line_comment___is_skipped_but_newline_kept() {
    assert_eq!(
        kinds("x // trailing\ny"),
        vec![
            ident("x"),
            TokenKind::Semi,
            ident("y"),
            TokenKind::Semi,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize___multiline_block_comment___acts_as_newline() {
    assert_eq!(
        kinds("x /* a\nb */ y"),
        vec![
            ident("x"),
            TokenKind::Semi,
            ident("y"),
            TokenKind::Semi,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize___single_line_block_comment___is_transparent() {
    assert_eq!(
        kinds("x /* a */ y"),
        vec![ident("x"), ident("y"), TokenKind::Semi, TokenKind::Eof]
    );
}

#[test]
fn tokenize___longest_operator___wins() {
    assert_eq!(
        kinds("a <<= b ... c"),
        vec![
            ident("a"),
            TokenKind::Punct("<<="),
            ident("b"),
            TokenKind::Punct("..."),
            ident("c"),
            TokenKind::Semi,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize___numbers_and_runes___are_single_tokens() {
    assert_eq!(
        kinds("1.5e+10 0x1F 'a' '\\n'"),
        vec![
            TokenKind::Number,
            TokenKind::Number,
            TokenKind::Rune,
            TokenKind::Rune,
            TokenKind::Semi,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize___positions___are_one_based() {
    let tokens = tokenize("package main\n\ntype  User struct{}").unwrap();

    let user = tokens.iter().find(|t| t.is_ident("User")).unwrap();

    assert_eq!((user.line, user.column), (3, 7));
}

#[test]
fn tokenize___unterminated_string___reports_position() {
    let err = tokenize("x := \"open\n").unwrap_err();

    assert_eq!((err.line, err.column), (1, 6));
    assert!(err.message.contains("not terminated"));
}

#[test]
fn tokenize___unterminated_raw_string___fails() {
    assert!(tokenize("`open").is_err());
}

#[test]
fn tokenize___unterminated_block_comment___fails() {
    assert!(tokenize("/* open").is_err());
}

#[test]
fn tokenize___unknown_character___fails() {
    let err = tokenize("type A @").unwrap_err();

    assert!(err.message.contains("unexpected character"));
}
