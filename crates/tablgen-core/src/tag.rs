//! Struct tag interpretation.
//!
//! A Go struct tag is a string of space-separated `key:"value"` pairs. Two
//! keys matter to tablgen:
//!
//! | Key (default) | Value | Effect |
//! |---------------|-------|--------|
//! | `compl` | `-` | field is excluded, whatever else the tag says |
//! | `name` | `-` | field is kept with an empty exposed name |
//! | `name` | other | field is exposed under that name |
//!
//! Lookup follows the conventional tag scan: pairs are read left to right and
//! the scan stops at the first malformed pair, so a key after a syntax error
//! is treated as absent. Interpretation never fails.

use serde::{Deserialize, Serialize};

/// Sentinel value for both the exclusion and the rename marker.
pub const SENTINEL: &str = "-";

/// Which tag keys carry the exclusion and rename markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagKeys {
    #[serde(default = "default_exclude_key")]
    pub exclude: String,

    #[serde(default = "default_rename_key")]
    pub rename: String,
}

fn default_exclude_key() -> String {
    "compl".to_string()
}

fn default_rename_key() -> String {
    "name".to_string()
}

impl Default for TagKeys {
    fn default() -> Self {
        Self {
            exclude: default_exclude_key(),
            rename: default_rename_key(),
        }
    }
}

/// Structured directives parsed from one field's tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDirective {
    pub excluded: bool,
    pub rename_to: Option<String>,
}

impl TagDirective {
    /// Interpret the tag attached to a field, if any.
    pub fn parse(tag: Option<&str>, keys: &TagKeys) -> Self {
        let Some(tag) = tag else {
            return Self::default();
        };

        if lookup(tag, &keys.exclude).as_deref() == Some(SENTINEL) {
            return Self {
                excluded: true,
                rename_to: None,
            };
        }

        let rename_to = lookup(tag, &keys.rename).map(|name| {
            if name == SENTINEL {
                String::new()
            } else {
                name
            }
        });

        Self {
            excluded: false,
            rename_to,
        }
    }

    /// Name the field is exposed under, or `None` when the field is excluded.
    pub fn exposed_name(&self, storage_name: &str) -> Option<String> {
        if self.excluded {
            return None;
        }
        Some(
            self.rename_to
                .clone()
                .unwrap_or_else(|| storage_name.to_string()),
        )
    }
}

/// Find the value associated with `key` in a struct tag.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag.as_bytes();

    loop {
        while let [b' ', tail @ ..] = rest {
            rest = tail;
        }
        if rest.is_empty() {
            return None;
        }

        // Key: run of printable, non-space bytes up to the colon.
        let key_len = rest
            .iter()
            .position(|&b| b <= b' ' || b == b':' || b == b'"' || b == 0x7f)
            .unwrap_or(rest.len());
        if key_len == 0 || key_len + 1 >= rest.len() || rest[key_len] != b':' {
            return None;
        }
        if rest[key_len + 1] != b'"' {
            return None;
        }
        let name = &rest[..key_len];
        rest = &rest[key_len + 1..];

        // Quoted value, honouring backslash escapes.
        let mut i = 1;
        while i < rest.len() && rest[i] != b'"' {
            if rest[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= rest.len() {
            return None;
        }
        let quoted = &rest[..=i];
        rest = &rest[i + 1..];

        if name == key.as_bytes() {
            let inner = std::str::from_utf8(&quoted[1..quoted.len() - 1]).ok()?;
            return unquote(inner);
        }
    }
}

/// Resolve the escape sequences of an interpreted string literal body
/// (the text between the double quotes).
///
/// Returns `None` for an invalid escape, an unescaped `"`, a raw newline, or
/// escapes that decode to bytes which are not UTF-8.
pub fn unquote(inner: &str) -> Option<String> {
    String::from_utf8(unquote_bytes(inner)?).ok()
}

/// Like [`unquote`], but returns the raw bytes. Go strings are byte strings,
/// so `"\xff"` is a valid literal even though it is not UTF-8.
pub fn unquote_bytes(inner: &str) -> Option<Vec<u8>> {
    if !inner.contains('\\') {
        if inner.contains('"') || inner.contains('\n') {
            return None;
        }
        return Some(inner.as_bytes().to_vec());
    }

    let mut bytes: Vec<u8> = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escape = chars.next()?;
                match escape {
                    'a' => bytes.push(0x07),
                    'b' => bytes.push(0x08),
                    'f' => bytes.push(0x0c),
                    'n' => bytes.push(b'\n'),
                    'r' => bytes.push(b'\r'),
                    't' => bytes.push(b'\t'),
                    'v' => bytes.push(0x0b),
                    '\\' => bytes.push(b'\\'),
                    '"' => bytes.push(b'"'),
                    'x' => {
                        let hex: String = [chars.next()?, chars.next()?].iter().collect();
                        bytes.push(u8::from_str_radix(&hex, 16).ok()?);
                    }
                    '0'..='7' => {
                        let octal: String = [escape, chars.next()?, chars.next()?].iter().collect();
                        bytes.push(u8::from_str_radix(&octal, 8).ok()?);
                    }
                    'u' | 'U' => {
                        let width = if escape == 'u' { 4 } else { 8 };
                        let mut hex = String::with_capacity(width);
                        for _ in 0..width {
                            hex.push(chars.next()?);
                        }
                        let ch = char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?;
                        let mut buf = [0u8; 4];
                        bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    }
                    _ => return None,
                }
            }
            _ => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    Some(bytes)
}
