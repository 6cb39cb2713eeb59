//! Record selection over a parsed source unit.
//!
//! Traversal is depth-first over the top-level declarations in file order.
//! Every spec of a `type` declaration is its own branch: visiting it reports
//! whether the walk descends into its fields.
//!
//! A spec is a candidate when the [`TargetSet`] is empty or names it. A
//! candidate that is not a record (an alias, interface or any other type)
//! terminates its own branch and produces nothing. Sibling specs, in the same
//! `type ( ... )` group or elsewhere, are still visited. Names in the target
//! set that match nothing are not an error.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::ParseResult;
use crate::model::{FieldDescriptor, GenerationModel, RecordType};
use crate::source::{Decl, FieldDecl, SourceUnit, TypeDecl, TypeShape, TypeSpec, parse_unit};
use crate::tag::{TagDirective, TagKeys};

/// Type names to restrict extraction to. Empty selects every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    names: BTreeSet<String>,
}

impl TargetSet {
    /// Select every top-level record declaration.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether a declaration with this name is a candidate.
    pub fn selects(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }
}

impl<S: Into<String>> FromIterator<S> for TargetSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of visiting one type spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk<'a> {
    /// Selected record; its fields are visited.
    Descend(&'a [FieldDecl]),
    /// Not selected.
    Skip,
    /// Selected, but not a record; the branch ends here.
    Stop,
}

/// Builds a [`GenerationModel`] from a declaration tree.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    keys: TagKeys,
}

impl Extractor {
    pub fn new(keys: TagKeys) -> Self {
        Self { keys }
    }

    /// Parse `src` and extract its records.
    ///
    /// Fails only when the source is not syntactically valid.
    pub fn extract_source(
        &self,
        unit_name: &str,
        src: &str,
        targets: &TargetSet,
    ) -> ParseResult<GenerationModel> {
        let unit = parse_unit(src)?;
        Ok(self.extract(unit_name, &unit, targets))
    }

    /// Select the records of an already parsed unit.
    pub fn extract(
        &self,
        unit_name: &str,
        unit: &SourceUnit,
        targets: &TargetSet,
    ) -> GenerationModel {
        let mut model = GenerationModel::new(unit_name, unit.package.clone());

        for decl in &unit.decls {
            if let Decl::Type(type_decl) = decl {
                self.walk_type_decl(type_decl, targets, &mut model.records);
            }
        }

        debug!(
            unit = unit_name,
            package = %model.package_name,
            records = model.records.len(),
            "extracted records"
        );
        model
    }

    fn walk_type_decl(
        &self,
        decl: &TypeDecl,
        targets: &TargetSet,
        records: &mut Vec<RecordType>,
    ) {
        for spec in &decl.specs {
            if let Walk::Descend(fields) = self.visit_spec(spec, targets) {
                records.push(RecordType {
                    name: spec.name.clone(),
                    fields: fields
                        .iter()
                        .flat_map(|field| self.describe(&spec.name, field))
                        .collect(),
                });
            }
        }
    }

    fn visit_spec<'a>(&self, spec: &'a TypeSpec, targets: &TargetSet) -> Walk<'a> {
        if !targets.selects(&spec.name) {
            return Walk::Skip;
        }

        match &spec.shape {
            TypeShape::Record(fields) => Walk::Descend(fields),
            _ => {
                debug!(
                    name = %spec.name,
                    line = spec.line,
                    "selected type is not a struct; skipping"
                );
                Walk::Stop
            }
        }
    }

    /// Descriptors contributed by one field line: one per declared name,
    /// none when the tag excludes the field.
    fn describe(&self, record: &str, field: &FieldDecl) -> Vec<FieldDescriptor> {
        if field.is_embedded() {
            warn!(
                record,
                line = field.line,
                embedded = %field.type_expr,
                "embedded fields are not supported; skipping"
            );
            return Vec::new();
        }

        let directive = TagDirective::parse(field.tag.as_deref(), &self.keys);
        field
            .names
            .iter()
            .filter_map(|name| {
                directive.exposed_name(name).map(|exposed_name| FieldDescriptor {
                    storage_name: name.clone(),
                    exposed_name,
                    type_expr: field.type_expr.clone(),
                })
            })
            .collect()
    }
}
