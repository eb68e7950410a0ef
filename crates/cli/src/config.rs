//! CLI configuration via `supplychain.toml`
//!
//! A missing file means defaults. `init` writes the commented default file so
//! there is something to edit afterwards.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use supplychain_executor::{Error, Result};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "supplychain.toml";

/// CLI configuration loaded from `supplychain.toml`.
///
/// # Example
///
/// ```toml
/// state_file = ".supplychain/world_state.json"
/// log_level = "warn"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Where the world state is loaded from and saved to.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".supplychain/world_state.json")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_level: default_log_level(),
        }
    }
}

impl CliConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Supply-chain ledger CLI configuration
#
# World state file. Loaded before every command, rewritten after every
# successful write.
state_file = ".supplychain/world_state.json"

# Log filter (overridden by RUST_LOG): "error", "warn", "info", "debug", "trace"
log_level = "warn"
"#
    }

    /// Read and parse config from a file path; a missing file gives defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::invalid_argument(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_default_toml_parses_to_default() {
        let parsed: CliConfig = toml::from_str(CliConfig::default_toml()).unwrap();
        assert_eq!(parsed, CliConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.state_file, default_state_file());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "initial_status = \"New\"\n").unwrap();

        let err = CliConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_write_default_if_missing_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "log_level = \"info\"\n").unwrap();

        CliConfig::write_default_if_missing(&path).unwrap();
        assert_eq!(CliConfig::load(&path).unwrap().log_level, "info");
    }
}
