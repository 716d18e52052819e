//! Centralized TOML-based settings for tooldeck.
//!
//! Settings load from `~/.tooldeck/settings.toml`. All structs use
//! `#[serde(default)]` so partial configuration files are fine; missing
//! fields are filled with defaults. A missing file is not an error.
//!
//! ```toml
//! [terminal]
//! shell = "/bin/zsh"
//!
//! [limits]
//! default_timeout_ms = 30000
//! max_output_bytes = 10485760
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default timeout for `run_command` in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default timeout for `run_command_stream` in milliseconds.
pub const DEFAULT_STREAM_TIMEOUT_MS: u64 = 60_000;

/// Cap on captured subprocess output (10 MB).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Shell execution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TerminalSettings {
    /// Shell binary to use for command execution. When unset, `$SHELL` is
    /// consulted, falling back to `/bin/sh`.
    pub shell: Option<String>,
}

/// Resource limits applied to tool execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitSettings {
    pub default_timeout_ms: u64,
    pub stream_timeout_ms: u64,
    pub max_output_bytes: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            stream_timeout_ms: DEFAULT_STREAM_TIMEOUT_MS,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// Root settings schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeckSettings {
    pub terminal: TerminalSettings,
    pub limits: LimitSettings,
}

impl DeckSettings {
    /// Load settings from an explicit path. The file must exist and parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing settings {}", path.display()))
    }

    /// Load settings from the given path or the default location, falling
    /// back to defaults (with a warning) when the file is missing or broken.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let resolved = match path {
            Some(p) => Some(p.to_path_buf()),
            None => settings_path(),
        };
        let Some(resolved) = resolved else {
            return Self::default();
        };
        if !resolved.exists() {
            return Self::default();
        }
        match Self::load_from(&resolved) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(
                    path = %resolved.display(),
                    error = %err,
                    "failed to load settings, using defaults"
                );
                Self::default()
            }
        }
    }
}

/// Default settings file location: `~/.tooldeck/settings.toml`.
pub fn settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tooldeck").join("settings.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = DeckSettings::default();
        assert_eq!(settings.limits.default_timeout_ms, 30_000);
        assert_eq!(settings.limits.stream_timeout_ms, 60_000);
        assert_eq!(settings.limits.max_output_bytes, 10 * 1024 * 1024);
        assert!(settings.terminal.shell.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[terminal]\nshell = \"/bin/bash\"\n").unwrap();

        let settings = DeckSettings::load_from(&path).unwrap();
        assert_eq!(settings.terminal.shell.as_deref(), Some("/bin/bash"));
        assert_eq!(settings.limits.default_timeout_ms, 30_000);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let settings = DeckSettings::load_or_default(Some(&path));
        assert_eq!(settings, DeckSettings::default());
    }

    #[test]
    fn broken_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "this is not toml [[").unwrap();
        let settings = DeckSettings::load_or_default(Some(&path));
        assert_eq!(settings, DeckSettings::default());
    }

    #[test]
    fn limits_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[limits]\ndefault_timeout_ms = 5000\n").unwrap();
        let settings = DeckSettings::load_from(&path).unwrap();
        assert_eq!(settings.limits.default_timeout_ms, 5000);
        assert_eq!(settings.limits.stream_timeout_ms, 60_000);
    }
}
