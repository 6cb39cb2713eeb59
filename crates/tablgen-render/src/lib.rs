//! tablgen-render - Template engine for the tablgen code generator
//!
//! A [`TemplateSet`] holds named templates (Tera syntax). [`render`] turns one
//! of them plus JSON data into text. Templates compose through the
//! `template_to_string(name=..., data=...)` function, which renders another
//! template of the same set and returns its output.
//!
//! The built-in set renders a [`GenerationModel`](tablgen_core::GenerationModel)
//! into a templ file with one table component per record:
//!
//! ```
//! use tablgen_core::{Extractor, TargetSet};
//! use tablgen_render::{ROOT_TEMPLATE, TemplateSet};
//!
//! let model = Extractor::default()
//!     .extract_source("users", "package users\ntype User struct { ID int }\n", &TargetSet::all())
//!     .unwrap();
//!
//! let output = TemplateSet::builtin()
//!     .unwrap()
//!     .render_model(ROOT_TEMPLATE, &model)
//!     .unwrap();
//!
//! assert!(output.contains("templ UserTable(rows []User) {"));
//! ```

pub mod engine;
mod error;
mod filters;
pub mod templates;

pub use engine::{COMPOSE_FUNCTION, MAX_DEPTH, TemplateSet, render};
pub use error::{RenderError, RenderResult};
pub use templates::ROOT_TEMPLATE;
