//! Named template sets and recursive rendering.
//!
//! Every template can call `template_to_string(name=..., data=...)` to render
//! another template of the same set and splice its output in place. `data`
//! defaults to the data the calling template was rendered with. Composition
//! is plain recursion through [`render`]; a template that composes itself
//! without end fails with [`RenderError::TooDeep`].

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tablgen_core::GenerationModel;
use tera::{Context, Function, Tera};
use tracing::{debug, trace};

use crate::error::{RenderError, RenderResult, describe};
use crate::filters;
use crate::templates::BUILTIN;

/// Name of the composition function visible to templates.
pub const COMPOSE_FUNCTION: &str = "template_to_string";

/// Deepest chain of nested `template_to_string` calls allowed.
pub const MAX_DEPTH: usize = 16;

/// File extension of override templates.
pub const TEMPLATE_EXTENSION: &str = "tmpl";

/// An immutable collection of named templates.
///
/// Cloning is cheap; clones share the parsed templates.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    tera: Arc<Tera>,
}

impl TemplateSet {
    /// The templates compiled into the binary.
    pub fn builtin() -> RenderResult<Self> {
        Self::from_sources(BUILTIN.iter().copied())
    }

    /// Built-in templates, with every `*.tmpl` file in `dir` added on top.
    ///
    /// A file named like a built-in template replaces it.
    pub fn with_overrides(dir: &Path) -> RenderResult<Self> {
        let mut sources: BTreeMap<String, String> = BUILTIN
            .iter()
            .map(|(name, source)| (name.to_string(), source.to_string()))
            .collect();

        for (name, source) in read_template_dir(dir)? {
            if sources.insert(name.clone(), source).is_some() {
                debug!(template = %name, dir = %dir.display(), "overriding built-in template");
            } else {
                debug!(template = %name, dir = %dir.display(), "adding template");
            }
        }

        Self::from_sources(sources)
    }

    /// Build a set from `(name, source)` pairs.
    ///
    /// Fails if any template does not parse.
    pub fn from_sources<I, N, C>(sources: I) -> RenderResult<Self>
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<str>,
    {
        let mut tera = Tera::default();
        // Output is source code, never HTML to be escaped.
        tera.autoescape_on(Vec::new());
        filters::register(&mut tera);
        tera.add_raw_templates(sources).map_err(|e| RenderError::Load(describe(&e)))?;

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Names of all templates, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Render the template `name` with `data`. See [`render`].
    pub fn render(&self, name: &str, data: &Value) -> RenderResult<String> {
        render(self, name, data)
    }

    /// Render `root` with a serialized [`GenerationModel`] as its data.
    pub fn render_model(&self, root: &str, model: &GenerationModel) -> RenderResult<String> {
        let data = serde_json::to_value(model).map_err(|e| RenderError::Template {
            template: root.to_string(),
            message: format!("cannot serialize model: {e}"),
        })?;
        render(self, root, &data)
    }
}

/// Render the template `name` of `set` with `data` and return the text.
///
/// `data` must be a JSON object; its keys become the template's variables.
/// Rendering has no side effects, so the same inputs always give the same
/// output.
pub fn render(set: &TemplateSet, name: &str, data: &Value) -> RenderResult<String> {
    render_at_depth(set, name, data, 0)
}

fn render_at_depth(
    set: &TemplateSet,
    name: &str,
    data: &Value,
    depth: usize,
) -> RenderResult<String> {
    if depth > MAX_DEPTH {
        return Err(RenderError::TooDeep {
            template: name.to_string(),
            limit: MAX_DEPTH,
        });
    }
    if !set.contains(name) {
        return Err(RenderError::MissingTemplate(name.to_string()));
    }
    if !data.is_object() {
        return Err(RenderError::InvalidData {
            template: name.to_string(),
            kind: kind(data).to_string(),
        });
    }

    trace!(template = name, depth, "rendering template");

    let context =
        Context::from_value(data.clone()).map_err(|e| RenderError::template(name, &e))?;

    let mut tera = (*set.tera).clone();
    tera.register_function(
        COMPOSE_FUNCTION,
        TemplateToString {
            set: set.clone(),
            current: data.clone(),
            depth: depth + 1,
        },
    );

    tera.render(name, &context).map_err(|e| RenderError::template(name, &e))
}

/// The `template_to_string` function bound to one rendering frame.
struct TemplateToString {
    set: TemplateSet,
    current: Value,
    depth: usize,
}

impl Function for TemplateToString {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let name = match args.get("name") {
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(tera::Error::msg(format!(
                    "{COMPOSE_FUNCTION}: `name` must be a string, got {}",
                    kind(other)
                )));
            }
            None => {
                return Err(tera::Error::msg(format!(
                    "{COMPOSE_FUNCTION}: missing `name` argument"
                )));
            }
        };
        let data = args.get("data").unwrap_or(&self.current);

        render_at_depth(&self.set, name, data, self.depth)
            .map(Value::String)
            .map_err(|e| tera::Error::msg(e.to_string()))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read every `*.tmpl` file directly inside `dir`, sorted by name.
fn read_template_dir(dir: &Path) -> RenderResult<Vec<(String, String)>> {
    let mut templates = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        let is_template = path.extension().and_then(OsStr::to_str) == Some(TEMPLATE_EXTENSION);
        if !is_template || !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(OsStr::to_str) else {
            continue;
        };
        let source = fs::read_to_string(&path).map_err(io_error(&path))?;
        templates.push((name.to_string(), source));
    }
    templates.sort();
    Ok(templates)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RenderError {
    let path = path.to_path_buf();
    move |source| RenderError::Io { path, source }
}
