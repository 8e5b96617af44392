use crate::error::{ProjectContextError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const EXTENSIONS_ENV: &str = "CONTEXT_PROJECT_EXTENSIONS";
const LIBRARY_DIR_ENV: &str = "CONTEXT_PROJECT_LIBRARY_DIR";
const SEQUENTIAL_UPDATES_ENV: &str = "CONTEXT_PROJECT_SEQUENTIAL_UPDATES";

const LIBRARY_DIR_NAME: &str = "indexing";

/// Settings for the project context controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectContextConfig {
    /// Extensions that qualify a file for indexing (e.g. `.java`)
    pub source_extensions: Vec<String>,

    /// Directory handed to the engine launcher
    pub library_dir: PathBuf,

    /// Apply index updates one at a time, in arrival order
    pub sequential_updates: bool,

    /// Honour `.gitignore` and hidden-file rules during discovery
    pub respect_gitignore: bool,
}

impl Default for ProjectContextConfig {
    fn default() -> Self {
        Self {
            source_extensions: vec![".java".to_string()],
            library_dir: default_library_dir(),
            sequential_updates: false,
            respect_gitignore: false,
        }
    }
}

impl ProjectContextConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ProjectContextError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Defaults with `CONTEXT_PROJECT_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(extensions) = lookup(EXTENSIONS_ENV).as_deref().and_then(parse_extension_list)
        {
            self.source_extensions = extensions;
        }
        if let Some(dir) = lookup(LIBRARY_DIR_ENV) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                self.library_dir = PathBuf::from(trimmed);
            }
        }
        if let Some(flag) = lookup(SEQUENTIAL_UPDATES_ENV).as_deref().and_then(parse_flag) {
            self.sequential_updates = flag;
        }
        self
    }
}

fn default_library_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .map(|dir| dir.join(LIBRARY_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(LIBRARY_DIR_NAME))
}

fn parse_extension_list(raw: &str) -> Option<Vec<String>> {
    let extensions: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect();
    (!extensions.is_empty()).then_some(extensions)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
