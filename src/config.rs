//! Launcher settings and their layering.
//!
//! Lowest precedence first: built-in defaults, an optional YAML file,
//! `GCM_CORRECT_*` environment variables (a `.env` file is loaded by the
//! binary before this runs), then command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CorrectionError;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gcm-correct.yaml";

/// Where data, outputs, scripts and transient files live, and what runs
/// the scripts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Root of the per-variable input data folders.
    pub data_dir: PathBuf,
    /// Output root; models are saved under `<output_dir>/models`.
    pub output_dir: PathBuf,
    /// Directory holding the training scripts.
    pub scripts_dir: PathBuf,
    /// Directory receiving patched transient scripts; the scripts
    /// directory when unset, so a patched copy runs beside its original.
    pub transient_dir: Option<PathBuf>,
    /// Interpreter used to run the scripts.
    pub interpreter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("../data"),
            output_dir: PathBuf::from("../output"),
            scripts_dir: PathBuf::from("."),
            transient_dir: None,
            interpreter: "python3".to_string(),
        }
    }
}

/// Values given on the command line; `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// `--data-dir`
    pub data_dir: Option<PathBuf>,
    /// `--output-dir`
    pub output_dir: Option<PathBuf>,
    /// `--scripts-dir`
    pub scripts_dir: Option<PathBuf>,
    /// `--python`
    pub interpreter: Option<String>,
}

impl Settings {
    /// Directory holding the saved models.
    #[must_use]
    pub fn models_dir(&self) -> PathBuf {
        self.output_dir.join("models")
    }

    /// Directory receiving patched transient scripts.
    #[must_use]
    pub fn transient_dir(&self) -> &Path {
        self.transient_dir.as_deref().unwrap_or(&self.scripts_dir)
    }

    /// Parses settings from YAML; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectionError::Config`] on malformed YAML or unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self, CorrectionError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| CorrectionError::Config(e.to_string()))
    }

    /// Applies `GCM_CORRECT_*` variables obtained through `lookup`.
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        if let Some(v) = var("GCM_CORRECT_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("GCM_CORRECT_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = var("GCM_CORRECT_SCRIPTS_DIR") {
            self.scripts_dir = PathBuf::from(v);
        }
        if let Some(v) = var("GCM_CORRECT_TRANSIENT_DIR") {
            self.transient_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = var("GCM_CORRECT_PYTHON") {
            self.interpreter = v;
        }
        self
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(v) = &overrides.data_dir {
            self.data_dir.clone_from(v);
        }
        if let Some(v) = &overrides.output_dir {
            self.output_dir.clone_from(v);
        }
        if let Some(v) = &overrides.scripts_dir {
            self.scripts_dir.clone_from(v);
        }
        if let Some(v) = &overrides.interpreter {
            self.interpreter.clone_from(v);
        }
        self
    }

    /// Loads the full layered configuration from the process environment.
    ///
    /// An explicit `config` path must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectionError::Config`] if the config file cannot be read
    /// or parsed.
    pub fn load(
        config: Option<&Path>,
        overrides: &SettingsOverrides,
    ) -> Result<Self, CorrectionError> {
        let file = match config {
            Some(path) => Some(read_config(path)?),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Some(read_config(path)?)
                } else {
                    None
                }
            }
        };
        let base = file.unwrap_or_default();
        Ok(base.with_env(|name| std::env::var(name).ok()).with_overrides(overrides))
    }
}

fn read_config(path: &Path) -> Result<Settings, CorrectionError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CorrectionError::Config(format!("cannot read {}: {e}", path.display())))?;
    Settings::from_yaml(&text)
        .map_err(|e| CorrectionError::Config(format!("{}: {e}", path.display())))
}
