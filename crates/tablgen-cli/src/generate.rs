//! Generate command: read a Go source unit, extract records, render, write.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tablgen_core::{Extractor, TargetSet};
use tablgen_render::TemplateSet;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::Config;

/// Where rendered output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// `<dir>/<unit_name><suffix>`
    File,
    Stdout,
}

/// One generation run.
#[derive(Debug, Clone)]
pub struct Request {
    /// Go source file.
    pub file: PathBuf,

    /// Type names to select. Empty selects every record.
    pub targets: Vec<String>,

    /// Directory for the output file. Defaults to the source's directory.
    pub out_dir: Option<PathBuf>,

    pub destination: Destination,
}

/// Rendered output for one source unit.
#[derive(Debug, Clone)]
pub struct Generated {
    pub output_path: PathBuf,
    pub contents: String,
    pub records: usize,
}

/// Generate command implementation
pub fn run(request: &Request, config: &Config) -> Result<()> {
    let generated = generate(request, config)?;

    match request.destination {
        Destination::Stdout => {
            std::io::stdout()
                .write_all(generated.contents.as_bytes())
                .context("Failed to write to stdout")?;
        }
        Destination::File => {
            write_output(&generated.output_path, &generated.contents)?;
            info!(
                output = %generated.output_path.display(),
                records = generated.records,
                "wrote generated file"
            );
        }
    }

    Ok(())
}

/// Parse, extract and render without touching the output location.
pub fn generate(request: &Request, config: &Config) -> Result<Generated> {
    let file = &request.file;
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read source file: {}", file.display()))?;
    let unit = unit_name(file)?;

    let targets: TargetSet = request.targets.iter().cloned().collect();
    let model = Extractor::new(config.tags.clone())
        .extract_source(&unit, &source, &targets)
        .with_context(|| format!("Failed to parse Go source: {}", file.display()))?;

    if model.records.is_empty() {
        debug!(unit = %unit, "no records selected");
    }

    let templates = load_templates(config)?;
    let contents = templates
        .render_model(&config.root_template, &model)
        .with_context(|| format!("Failed to render {}", file.display()))?;

    let dir = match &request.out_dir {
        Some(dir) => dir.clone(),
        None => source_dir(file),
    };

    Ok(Generated {
        output_path: output_path(&dir, &unit, &config.suffix),
        contents,
        records: model.records.len(),
    })
}

fn load_templates(config: &Config) -> Result<TemplateSet> {
    match &config.template_dir {
        Some(dir) => TemplateSet::with_overrides(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display())),
        None => TemplateSet::builtin().context("Failed to load built-in templates"),
    }
}

/// Base name of `file` without its extension.
pub fn unit_name(file: &Path) -> Result<String> {
    file.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive a unit name from {}", file.display()))
}

fn source_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn output_path(dir: &Path, unit_name: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{unit_name}{suffix}"))
}

/// Replace `path` with `contents`.
///
/// The text goes to a temporary file in the same directory first, which is
/// renamed over `path` only once fully written.
fn write_output(path: &Path, contents: &str) -> Result<()> {
    let dir = source_dir(path);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    set_output_permissions(tmp.as_file())?;

    tmp.persist(path)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    Ok(())
}

#[cfg(unix)]
fn set_output_permissions(file: &fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    // Temp files are created owner-only.
    file.set_permissions(fs::Permissions::from_mode(0o644))
        .context("Failed to set output file permissions")
}

#[cfg(not(unix))]
fn set_output_permissions(_file: &fs::File) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "generate/generate_tests.rs"]
mod generate_tests;
