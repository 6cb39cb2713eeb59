//! Configuration file loading and validation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tablgen_core::TagKeys;
use tablgen_render::ROOT_TEMPLATE;
use tracing::debug;

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "tablgen.toml";

/// Suffix appended to the unit name to form the output file name.
pub const DEFAULT_SUFFIX: &str = "_tabl.templ";

/// tablgen.toml structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output file name suffix.
    pub suffix: String,

    /// Template rendered for the whole unit.
    pub root_template: String,

    /// Directory of `*.tmpl` files layered over the built-in templates.
    pub template_dir: Option<PathBuf>,

    /// Struct tag keys.
    pub tags: TagKeys,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            root_template: ROOT_TEMPLATE.to_string(),
            template_dir: None,
            tags: TagKeys::default(),
        }
    }
}

/// Values given on the command line; `Some` wins over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub suffix: Option<String>,
    pub root_template: Option<String>,
    pub template_dir: Option<PathBuf>,
}

impl Config {
    /// Load from `explicit` if given, otherwise from [`CONFIG_FILE_NAME`] in
    /// `search_dir` if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>, search_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidate = search_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::from_file(&candidate)
        } else {
            debug!("no {CONFIG_FILE_NAME} found; using defaults");
            Ok(Self::default())
        }
    }

    /// Load config from a file
    ///
    /// A relative `template_dir` is resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;

        if let (Some(dir), Some(base)) = (&config.template_dir, path.parent())
            && dir.is_relative()
        {
            config.template_dir = Some(base.join(dir));
        }

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(suffix) = overrides.suffix {
            self.suffix = suffix;
        }
        if let Some(root) = overrides.root_template {
            self.root_template = root;
        }
        if let Some(dir) = overrides.template_dir {
            self.template_dir = Some(dir);
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<()> {
        if self.suffix.is_empty() {
            anyhow::bail!("Output suffix cannot be empty");
        }

        if self.suffix.contains(['/', '\\']) {
            anyhow::bail!("Output suffix cannot contain a path separator: {}", self.suffix);
        }

        if self.root_template.is_empty() {
            anyhow::bail!("Root template name cannot be empty");
        }

        if self.tags.exclude.is_empty() {
            anyhow::bail!("Exclusion tag key cannot be empty");
        }

        if self.tags.rename.is_empty() {
            anyhow::bail!("Rename tag key cannot be empty");
        }

        Ok(())
    }
}
