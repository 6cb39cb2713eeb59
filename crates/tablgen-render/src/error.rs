//! Error types for template loading and rendering

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for template operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Error type for template operations
///
/// Every variant is fatal for the invocation: nothing rendered up to the
/// failure is returned.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No template with this name is loaded
    #[error("template '{0}' not found")]
    MissingTemplate(String),

    /// A template failed to parse while the set was being built
    #[error("failed to load templates: {0}")]
    Load(String),

    /// Reading an override template directory failed
    #[error("failed to read templates from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data handed to a template is not an object
    #[error("cannot render '{template}': data must be an object, got {kind}")]
    InvalidData { template: String, kind: String },

    /// Template composition nested deeper than the limit
    #[error("cannot render '{template}': templates nested deeper than {limit} levels")]
    TooDeep { template: String, limit: usize },

    /// Template execution failed
    #[error("failed to render '{template}': {message}")]
    Template { template: String, message: String },
}

impl RenderError {
    /// Wrap a Tera failure, flattening its cause chain into the message.
    pub(crate) fn template(template: &str, err: &tera::Error) -> Self {
        RenderError::Template {
            template: template.to_string(),
            message: describe(err),
        }
    }
}

/// Join an error and all of its sources into one line.
pub(crate) fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
