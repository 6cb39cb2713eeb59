//! Property-based tests for tag interpretation and record extraction
//!
//! Sources are generated from random record layouts, then extracted; the
//! resulting model is checked against the layout it was generated from.

use proptest::prelude::*;
use tablgen_core::{Extractor, TagDirective, TagKeys, TargetSet};

/// How a generated field is annotated.
#[derive(Debug, Clone)]
enum Annotation {
    None,
    Rename(String),
    HideName,
    Exclude,
    ExcludeAndRename(String),
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    annotation: Annotation,
}

#[derive(Debug, Clone)]
struct RecordSpec {
    name: String,
    fields: Vec<FieldSpec>,
}

// Strategy: exported Go identifier, prefixed so generated names never collide
fn arb_ident(prefix: &'static str) -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,8}".prop_map(move |s| format!("{prefix}{s}"))
}

fn arb_label() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 _]{0,12}"
}

fn arb_annotation() -> impl Strategy<Value = Annotation> {
    prop_oneof![
        Just(Annotation::None),
        arb_label().prop_map(Annotation::Rename),
        Just(Annotation::HideName),
        Just(Annotation::Exclude),
        arb_label().prop_map(Annotation::ExcludeAndRename),
    ]
}

fn arb_record() -> impl Strategy<Value = RecordSpec> {
    (
        arb_ident("R"),
        prop::collection::vec((arb_ident("F"), arb_annotation()), 0..8),
    )
        .prop_map(|(name, fields)| {
            let mut seen = std::collections::HashSet::new();
            let fields = fields
                .into_iter()
                .filter(|(n, _)| seen.insert(n.clone()))
                .map(|(name, annotation)| FieldSpec { name, annotation })
                .collect();
            RecordSpec { name, fields }
        })
}

fn arb_records() -> impl Strategy<Value = Vec<RecordSpec>> {
    prop::collection::vec(arb_record(), 0..6).prop_map(|records| {
        let mut seen = std::collections::HashSet::new();
        records
            .into_iter()
            .filter(|r| seen.insert(r.name.clone()))
            .collect()
    })
}

fn render_tag(annotation: &Annotation) -> String {
    match annotation {
        Annotation::None => String::new(),
        Annotation::Rename(label) => format!(" `name:\"{label}\"`"),
        Annotation::HideName => " `name:\"-\"`".to_string(),
        Annotation::Exclude => " `compl:\"-\"`".to_string(),
        Annotation::ExcludeAndRename(label) => format!(" `name:\"{label}\" compl:\"-\"`"),
    }
}

fn render_source(records: &[RecordSpec]) -> String {
    let mut src = String::from("package generated\n\nimport \"time\"\n\n");
    for record in records {
        src.push_str(&format!("type {} struct {{\n", record.name));
        for field in &record.fields {
            src.push_str(&format!(
                "\t{} string{}\n",
                field.name,
                render_tag(&field.annotation)
            ));
        }
        src.push_str("}\n\nfunc helper() time.Time { return time.Now() }\n\n");
    }
    src
}

fn expected_fields(record: &RecordSpec) -> Vec<(String, String)> {
    record
        .fields
        .iter()
        .filter_map(|f| match &f.annotation {
            Annotation::None => Some((f.name.clone(), f.name.clone())),
            Annotation::Rename(label) => Some((f.name.clone(), label.clone())),
            Annotation::HideName => Some((f.name.clone(), String::new())),
            Annotation::Exclude | Annotation::ExcludeAndRename(_) => None,
        })
        .collect()
}

proptest! {
    /// Property: exclusion always dominates any rename in the same tag
    #[test]
    fn proptest_exclusion_dominates_rename(label in arb_label(), rename_first in any::<bool>()) {
        let tag = if rename_first {
            format!("name:\"{label}\" compl:\"-\"")
        } else {
            format!("compl:\"-\" name:\"{label}\"")
        };

        let directive = TagDirective::parse(Some(&tag), &TagKeys::default());

        prop_assert!(directive.excluded);
        prop_assert_eq!(directive.exposed_name("Field"), None);
    }

    /// Property: every record and field comes out exactly as declared
    #[test]
    fn proptest_extraction_matches_declarations(records in arb_records()) {
        let src = render_source(&records);

        let model = Extractor::default()
            .extract_source("generated", &src, &TargetSet::all())
            .unwrap();

        prop_assert_eq!(&model.package_name, "generated");
        prop_assert_eq!(model.records.len(), records.len());
        for (record, spec) in model.records.iter().zip(&records) {
            prop_assert_eq!(&record.name, &spec.name);
            let actual: Vec<(String, String)> = record
                .fields
                .iter()
                .map(|f| (f.storage_name.clone(), f.exposed_name.clone()))
                .collect();
            prop_assert_eq!(actual, expected_fields(spec));
        }
    }

    /// Property: filtering removes records but never reorders them
    #[test]
    fn proptest_filtering_preserves_order(
        records in arb_records(),
        mask in prop::collection::vec(any::<bool>(), 6),
    ) {
        let src = render_source(&records);
        let wanted: Vec<&str> = records
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(r, _)| r.name.as_str())
            .collect();
        // Reverse the filter's own order; it must not influence the output.
        let targets: TargetSet = wanted.iter().rev().copied().collect();

        let model = Extractor::default()
            .extract_source("generated", &src, &targets)
            .unwrap();
        let names: Vec<&str> = model.records.iter().map(|r| r.name.as_str()).collect();

        if wanted.is_empty() {
            prop_assert_eq!(names.len(), records.len());
        } else {
            prop_assert_eq!(names, wanted);
        }
    }
}
