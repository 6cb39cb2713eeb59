//! Intermediate representation handed from extraction to rendering.
//!
//! The model is language-agnostic and serializable: the template engine
//! renders directly from its serde representation, so the field names below
//! are the names templates see (`records`, `fields`, `exposed_name`, ...).

use serde::Serialize;

/// Everything a generation unit contributes to rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationModel {
    /// Base name of the input file without its extension.
    pub unit_name: String,

    /// Package declared by the source unit.
    pub package_name: String,

    /// Selected record types, in declaration order.
    pub records: Vec<RecordType>,
}

/// A selected record (struct) declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordType {
    /// Declared type name.
    pub name: String,

    /// Visible fields, in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

/// A field that survived tag interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Identifier as declared.
    pub storage_name: String,

    /// Externally visible name. Empty means "present, but no public name".
    pub exposed_name: String,

    /// Declared type, as written in the source.
    pub type_expr: String,
}

impl GenerationModel {
    pub fn new(unit_name: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            unit_name: unit_name.into(),
            package_name: package_name.into(),
            records: Vec::new(),
        }
    }
}
