//! Templates compiled into the binary.
//!
//! `base.tmpl` is the root: it renders the whole unit and composes
//! `record.tmpl` once per record, which in turn composes `header.tmpl` and
//! `row.tmpl` with the record as their data.

/// Name of the root template.
pub const ROOT_TEMPLATE: &str = "base.tmpl";

/// Built-in `(name, source)` pairs.
pub const BUILTIN: &[(&str, &str)] = &[
    ("base.tmpl", include_str!("../templates/base.tmpl")),
    ("record.tmpl", include_str!("../templates/record.tmpl")),
    ("header.tmpl", include_str!("../templates/header.tmpl")),
    ("row.tmpl", include_str!("../templates/row.tmpl")),
];
