#![allow(non_snake_case)]

use super::*;
use tempfile::TempDir;
use test_case::test_case;

const USERS_GO: &str = r#"package users

import "time"

type User struct {
	ID      int
	Name    string    `name:"-"`
	Secret  string    `compl:"-"`
	Created time.Time `name:"Created At"`
}

type Role string

type Group struct {
	Title string
}
"#;

fn workspace(source: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("users.go");
    fs::write(&file, source).unwrap();
    (dir, file)
}

fn request(file: &Path, targets: &[&str]) -> Request {
    Request {
        file: file.to_path_buf(),
        targets: targets.iter().map(|t| t.to_string()).collect(),
        out_dir: None,
        destination: Destination::File,
    }
}

// ============================================================================
// Naming
// ============================================================================

#[test_case("users.go", "users" ; "plain")]
#[test_case("dir/users.go", "users" ; "nested")]
#[test_case("models.v2.go", "models.v2" ; "only last extension dropped")]
#[test_case("Makefile", "Makefile" ; "no extension")]
fn unit_name___strips_directory_and_extension(path: &str, expected: &str) {
    assert_eq!(unit_name(Path::new(path)).unwrap(), expected);
}

#[test]
fn unit_name___no_file_name___fails() {
    assert!(unit_name(Path::new("/")).is_err());
}

#[test]
fn output_path___joins_unit_and_suffix() {
    let path = output_path(Path::new("models"), "users", "_tabl.templ");

    assert_eq!(path, Path::new("models").join("users_tabl.templ"));
}

#[test]
fn source_dir___bare_file_name___current_dir() {
    assert_eq!(source_dir(Path::new("users.go")), PathBuf::from("."));
}

// ============================================================================
// generate
// ============================================================================

#[test]
fn generate___all_records___renders_each_in_order() {
    let (dir, file) = workspace(USERS_GO);

    let generated = generate(&request(&file, &[]), &Config::default()).unwrap();

    assert_eq!(generated.records, 2);
    assert_eq!(generated.output_path, dir.path().join("users_tabl.templ"));
    let user = generated.contents.find("templ UserTable").unwrap();
    let group = generated.contents.find("templ GroupTable").unwrap();
    assert!(user < group);
    assert!(!generated.contents.contains("RoleTable"));
    assert!(!generated.contents.contains("Secret"));
    assert!(generated.contents.contains(r#"<th>{ "Created At" }</th>"#));
    assert!(generated.contents.contains("fmt.Sprint(row.Created)"));
}

#[test]
fn generate___targets___restrict_records() {
    let (_dir, file) = workspace(USERS_GO);

    let generated = generate(&request(&file, &["Group", "Missing"]), &Config::default()).unwrap();

    assert_eq!(generated.records, 1);
    assert!(generated.contents.contains("templ GroupTable"));
    assert!(!generated.contents.contains("templ UserTable"));
}

#[test]
fn generate___custom_tag_keys___honoured() {
    let (_dir, file) = workspace(
        "package p\ntype T struct {\n\tA int `skip:\"-\"`\n\tB int `label:\"Bee\"`\n}\n",
    );
    let mut config = Config::default();
    config.tags.exclude = "skip".into();
    config.tags.rename = "label".into();

    let generated = generate(&request(&file, &[]), &config).unwrap();

    assert!(!generated.contents.contains("row.A"));
    assert!(generated.contents.contains(r#"<th>{ "Bee" }</th>"#));
}

#[test]
fn generate___template_override___used() {
    let (dir, file) = workspace(USERS_GO);
    let templates = dir.path().join("tpl");
    fs::create_dir(&templates).unwrap();
    fs::write(templates.join("row.tmpl"), "ROW({{ name }})").unwrap();
    let mut config = Config::default();
    config.template_dir = Some(templates);

    let generated = generate(&request(&file, &["User"]), &config).unwrap();

    assert!(generated.contents.contains("ROW(User)"));
}

#[test]
fn generate___custom_root___renders_it() {
    let (dir, file) = workspace(USERS_GO);
    let templates = dir.path().join("tpl");
    fs::create_dir(&templates).unwrap();
    fs::write(
        templates.join("names.tmpl"),
        "{% for r in records %}{{ r.name }};{% endfor %}",
    )
    .unwrap();
    let mut config = Config::default();
    config.template_dir = Some(templates);
    config.root_template = "names.tmpl".into();

    let generated = generate(&request(&file, &[]), &config).unwrap();

    assert_eq!(generated.contents, "User;Group;");
}

#[test]
fn generate___missing_root_template___fails() {
    let (_dir, file) = workspace(USERS_GO);
    let mut config = Config::default();
    config.root_template = "ghost.tmpl".into();

    let err = generate(&request(&file, &[]), &config).unwrap_err();

    assert!(format!("{err:#}").contains("template 'ghost.tmpl' not found"), "{err:#}");
}

#[test]
fn generate___missing_source___fails() {
    let dir = tempfile::tempdir().unwrap();

    let err = generate(&request(&dir.path().join("nope.go"), &[]), &Config::default()).unwrap_err();

    assert!(err.to_string().contains("Failed to read source file"), "{err}");
}

// ============================================================================
// run
// ============================================================================

#[test]
fn run___writes_output_next_to_source() {
    let (dir, file) = workspace(USERS_GO);

    run(&request(&file, &["User"]), &Config::default()).unwrap();

    let written = fs::read_to_string(dir.path().join("users_tabl.templ")).unwrap();
    assert!(written.contains("package users"));
    assert!(written.contains("templ UserTable(rows []User) {"));
}

#[test]
fn run___existing_output___truncated() {
    let (dir, file) = workspace(USERS_GO);
    let output = dir.path().join("users_tabl.templ");
    fs::write(&output, "x".repeat(100_000)).unwrap();

    run(&request(&file, &[]), &Config::default()).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("// Code generated by tablgen from users."));
    assert!(!written.contains("xxx"));
}

#[test]
fn run___out_dir___created() {
    let (dir, file) = workspace(USERS_GO);
    let out_dir = dir.path().join("gen").join("views");
    let mut req = request(&file, &[]);
    req.out_dir = Some(out_dir.clone());

    run(&req, &Config::default()).unwrap();

    assert!(out_dir.join("users_tabl.templ").is_file());
}

#[test]
fn run___parse_error___leaves_no_file() {
    let (dir, file) = workspace("package users\n\ntype User struct {\n\tID int\n");

    let err = run(&request(&file, &[]), &Config::default()).unwrap_err();

    assert!(err.to_string().contains("Failed to parse Go source"), "{err}");
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn run___render_error___keeps_previous_output() {
    let (dir, file) = workspace(USERS_GO);
    let output = dir.path().join("users_tabl.templ");
    fs::write(&output, "previous").unwrap();
    let mut config = Config::default();
    config.root_template = "ghost.tmpl".into();

    assert!(run(&request(&file, &[]), &config).is_err());

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn run___custom_suffix___used() {
    let (dir, file) = workspace(USERS_GO);
    let mut config = Config::default();
    config.suffix = ".grid.templ".into();

    run(&request(&file, &[]), &config).unwrap();

    assert!(dir.path().join("users.grid.templ").is_file());
}

#[cfg(unix)]
#[test]
fn run___output_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;
    let (dir, file) = workspace(USERS_GO);

    run(&request(&file, &[]), &Config::default()).unwrap();

    let mode = fs::metadata(dir.path().join("users_tabl.templ"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn run___no_records___still_writes_package() {
    let (dir, file) = workspace("package empty\n\nfunc main() {}\n");

    run(&request(&file, &[]), &Config::default()).unwrap();

    let written = fs::read_to_string(dir.path().join("users_tabl.templ")).unwrap();
    assert!(written.contains("package empty"));
    assert!(!written.contains("templ "));
}
