//! Configuration loading and parsing.
//!
//! Parses `argsplit.toml` (or an override path provided by the binary). Only
//! the `[split]` table is recognized:
//!
//! ```toml
//! [split]
//! indent_unit = "  "              # extra indentation for argument lines
//! arguments = "balanced"          # or "sentinel"
//! declaration_keywords = ["func"] # keywords that open a declaration head
//! ```
//!
//! Every field has a default, unknown fields are ignored, and a file that
//! fails to parse falls back to defaults so a bad config never blocks a
//! command.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "argsplit.toml";

/// How the text between a head's parentheses is broken into arguments.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentStyle {
    /// Split on commas outside nested brackets, generics and literals.
    #[default]
    Balanced,
    /// Legacy: mark `", "` as `",  "` and split on double spaces.
    Sentinel,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    #[serde(default = "SplitConfig::default_indent_unit")]
    pub indent_unit: String,
    #[serde(default)]
    pub arguments: ArgumentStyle,
    #[serde(default = "SplitConfig::default_declaration_keywords")]
    pub declaration_keywords: Vec<String>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            indent_unit: Self::default_indent_unit(),
            arguments: ArgumentStyle::default(),
            declaration_keywords: Self::default_declaration_keywords(),
        }
    }
}

impl SplitConfig {
    fn default_indent_unit() -> String {
        "  ".to_string()
    }
    fn default_declaration_keywords() -> Vec<String> {
        vec!["func".to_string()]
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub split: SplitConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub path: Option<PathBuf>,
    pub file: ConfigFile, // parsed (or default) data
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("argsplit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            debug!(
                target: "config",
                path = %path.display(),
                arguments = ?file.split.arguments,
                keywords = file.split.declaration_keywords.len(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}
