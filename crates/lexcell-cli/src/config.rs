//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use lexcell::{LexcellError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for LexcellError {
    fn from(err: ConfigError) -> Self {
        LexcellError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (lexcell/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - The loaded configuration has conflicting settings
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, LexcellError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("lexcell/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "lexcell", "lexcell") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
/// - The settings conflict with each other
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, LexcellError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    config.validate().map_err(|err| match err {
        LexcellError::Config(message) => ConfigError::Validation(message),
        other => ConfigError::Validation(other.to_string()),
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use lexcell::config::SingletonMode;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_sections_from_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[parser]
separators = [";"]
elision = "-"

[validation]
strict = true

[singletons]
mode = "whole-form"
status = "auto"
"#,
        )
        .expect("Failed to write config");

        let config = load_config(Some(&path)).expect("Failed to load config");
        assert_eq!(config.parser().separators(), &[';']);
        assert!(config.validation().strict());
        assert!(!config.validation().report_uncovered());
        assert_eq!(config.singletons().mode(), SingletonMode::WholeForm);
        assert_eq!(config.singletons().status(), Some("auto"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().expect("Failed to create temp directory");
        let err = load_config(Some(dir.path().join("absent.toml"))).expect_err("Expected an error");
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[validation]\nstrict = \"yes\"\n").expect("Failed to write config");

        let err = load_config(Some(&path)).expect_err("Expected an error");
        assert!(matches!(err, LexcellError::Config(_)));
    }

    #[test]
    fn test_conflicting_settings_rejected() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[parser]\nseparators = [\"/\"]\n").expect("Failed to write config");

        let err = load_config(Some(&path)).expect_err("Expected an error");
        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("`/`"));
    }
}
