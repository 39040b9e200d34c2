//! Plugin configuration passed by the shim at load time.

use std::path::PathBuf;

use log::LevelFilter;
use serde::Deserialize;

/// Configuration document given to `bars_plugin_init`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    /// Directory for log files; no file logging when absent
    pub log_dir: Option<PathBuf>,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`
    pub log_level: Option<String>,
}

impl PluginConfig {
    /// Parse the JSON configuration. An empty document means defaults.
    pub fn parse(bytes: &[u8]) -> serde_json::Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Configured log level, `info` when unset or unrecognised
    pub fn level(&self) -> LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Info)
    }
}
