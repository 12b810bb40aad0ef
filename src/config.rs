//! Project configuration (`dtsdoc.toml`) parsing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dtsdoc_emit::{AccessLevel, Destination, EmitOptions};
use serde::Deserialize;

/// Default configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "dtsdoc.toml";

/// Root configuration structure for dtsdoc.toml.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DtsdocConfig {
    /// Emit settings.
    #[serde(default)]
    pub emit: EmitConfig,
}

/// The `[emit]` section. Every field falls back to the built-in default.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct EmitConfig {
    /// Minimum access level to emit.
    pub access: Option<AccessLevel>,
    /// Emit `private` doclets regardless of `access`.
    pub private: Option<bool>,
    /// Output directory, or `console`.
    pub destination: Option<String>,
    /// Output file name inside the destination.
    pub out_file: Option<String>,
}

impl DtsdocConfig {
    /// Load `path` when given (it must exist), else `dtsdoc.toml` when
    /// present, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if default.exists() {
                    Self::load_from_path(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Options from this file on top of the built-in defaults.
    pub fn emit_options(&self) -> EmitOptions {
        let defaults = EmitOptions::default();
        EmitOptions {
            access: self.emit.access.unwrap_or(defaults.access),
            private: self.emit.private.unwrap_or(defaults.private),
            destination: self
                .emit
                .destination
                .clone()
                .map(Destination::from)
                .unwrap_or(defaults.destination),
            out_file: self.emit.out_file.clone().or(defaults.out_file),
        }
    }
}
