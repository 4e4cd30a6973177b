//! Application configuration.
//!
//! Values come from `~/.config/bvets/config.toml` (when present) overlaid with
//! `BVETS_*` environment variables, e.g. `BVETS_PREVIEW_ONLY=true`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use ::config::{Config, Environment, File};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::parser::LoadOptions;

/// Location of the config file below the user's config directory.
pub const DEFAULT_CONFIG_FILE: &str = "bvets/config.toml";

const DEFAULT_CONFIG: &str = r#"# Encoding label used when a list file has no byte order mark.
encoding = "utf-8"

# Skip geometry and passenger data.
preview_only = false

# Train folder used to pick scoped compatibility objects.
# train_scope = "Kiha40"

# Compatibility object descriptor loaded before the route.
# compatibility_database = "/usr/share/openbve/Compatibility/CompatibilityObjects.xml"

# Track position stamped on stations loaded outside of a map parse.
track_position = 0.0
"#;

/// Settings for loading route packages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// WHATWG encoding label, e.g. `utf-8` or `shift_jis`.
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Skip geometry and passenger data.
    #[serde(default)]
    pub preview_only: bool,
    /// Train folder used to pick scoped compatibility objects.
    #[serde(default)]
    pub train_scope: Option<String>,
    /// Descriptor loaded into the compatibility registry before the route.
    #[serde(default)]
    pub compatibility_database: Option<PathBuf>,
    /// Track position stamped on stations.
    #[serde(default)]
    pub track_position: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            encoding: default_encoding(),
            preview_only: false,
            train_scope: None,
            compatibility_database: None,
            track_position: 0.0,
        }
    }
}

impl AppConfig {
    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE)
    }

    /// Load from the default location and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load from `path` (optional) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("BVETS"))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Options for a [`RouteLoader`](crate::parser::RouteLoader).
    pub fn load_options(&self) -> Result<LoadOptions> {
        Ok(LoadOptions {
            encoding: resolve_encoding(&self.encoding)?,
            preview_only: self.preview_only,
            train_scope: self.train_scope.clone().filter(|scope| !scope.is_empty()),
        })
    }
}

/// Look up an encoding by its WHATWG label.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| anyhow!("unknown text encoding {label:?}"))
}

/// Write a commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = AppConfig::default_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote default config to {}", path.display());
    Ok(())
}

fn default_encoding() -> String {
    "utf-8".to_string()
}
