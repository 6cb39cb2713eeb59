//! tablgen-core - Source analysis for the tablgen code generator
//!
//! This crate turns the text of a Go source unit into a [`GenerationModel`]:
//! - [`source`] lexes and parses the unit into a declaration tree
//! - [`tag`] interprets struct field tags into [`TagDirective`]s
//! - [`extract`] walks the declaration tree and selects record types
//!
//! ```text
//! Go source
//!     ↓
//!  [source::parse_unit]
//!     ↓
//!  SourceUnit (declaration tree)
//!     ↓
//!  [Extractor] ← TagKeys, target names
//!     ↓
//!  GenerationModel → tablgen-render
//! ```
//!
//! # Example
//!
//! ```
//! use tablgen_core::{Extractor, TargetSet};
//!
//! let source = r#"
//! package users
//!
//! type User struct {
//!     ID     int
//!     Name   string `name:"-"`
//!     Secret string `compl:"-"`
//! }
//! "#;
//!
//! let model = Extractor::default()
//!     .extract_source("users", source, &TargetSet::all())
//!     .unwrap();
//!
//! assert_eq!(model.package_name, "users");
//! assert_eq!(model.records[0].fields.len(), 2);
//! assert_eq!(model.records[0].fields[1].exposed_name, "");
//! ```

mod error;
pub mod extract;
mod model;
pub mod source;
pub mod tag;

pub use error::{ParseError, ParseResult};
pub use extract::{Extractor, TargetSet};
pub use model::{FieldDescriptor, GenerationModel, RecordType};
pub use source::{SourceUnit, parse_unit};
pub use tag::{TagDirective, TagKeys};
