//! Application configuration
//!
//! Read from the environment, then overridden by command-line flags.

use std::env;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::sheet::template::SheetTemplate;
use crate::state::autosave::AutosaveManager;

pub const HOME_VAR: &str = "WHEEL_OF_FATE_HOME";
pub const TEMPLATE_VAR: &str = "WHEEL_OF_FATE_TEMPLATE";
pub const AUTOSAVE_VAR: &str = "WHEEL_OF_FATE_AUTOSAVE_MS";

/// Store directory used when nothing else is configured.
pub const DEFAULT_HOME: &str = ".wheel-of-fate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory backing the file store.
    pub store_dir: PathBuf,

    /// Optional sheet template; the built-in sheet is used when unset.
    pub template_path: Option<PathBuf>,

    /// Debounce interval for autosave. `None` saves on every change.
    pub autosave_ms: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_HOME),
            template_path: None,
            autosave_ms: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable numbers are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_dir = lookup(HOME_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME));
        let template_path = lookup(TEMPLATE_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let autosave_ms = lookup(AUTOSAVE_VAR).and_then(|s| s.trim().parse().ok());

        Self {
            store_dir,
            template_path,
            autosave_ms,
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, store_dir: Option<&Path>, template: Option<&Path>) -> Self {
        if let Some(dir) = store_dir {
            self.store_dir = dir.to_path_buf();
        }
        if let Some(path) = template {
            self.template_path = Some(path.to_path_buf());
        }
        self
    }

    pub fn load_template(&self) -> Result<SheetTemplate> {
        match &self.template_path {
            Some(path) => {
                debug!("Loading sheet template from {}", path.display());
                SheetTemplate::load(path)
            }
            None => Ok(SheetTemplate::default()),
        }
    }

    pub fn autosave(&self) -> AutosaveManager {
        match self.autosave_ms {
            Some(ms) if ms > 0 => AutosaveManager::with_debounce(ms),
            _ => AutosaveManager::new(),
        }
    }
}
