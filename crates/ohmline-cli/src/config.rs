//! Configuration file loading for the CLI
//!
//! Finds and loads the TOML configuration from an explicit path, the local
//! project directory or the platform configuration directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use ohmline::{OhmlineError, config::AppConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for OhmlineError {
    fn from(err: ConfigError) -> Self {
        OhmlineError::Io(std::io::Error::other(err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (ohmline/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or holds invalid values
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, OhmlineError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("ohmline/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "ohmline", "ohmline") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, OhmlineError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|err| OhmlineError::new_script_error(&err, content.as_str()))?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let unit = config.draw().unit();
    if !unit.is_finite() || unit <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "draw.unit must be positive, got {unit}"
        )));
    }
    let scale = config.style().scale();
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "style.scale must be positive, got {scale}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_explicit_path() {
        let file = config_file("[draw]\nunit = 1.27\n");
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.draw().unit(), 1.27);
    }

    #[test]
    fn test_missing_explicit_path() {
        let err = load_config(Some("/nonexistent/ohmline.toml")).unwrap_err();
        assert!(matches!(err, OhmlineError::Io(_)));
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let file = config_file("[style]\nscale = \"big\"\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, OhmlineError::Script { span: Some(_), .. }));
    }

    #[test]
    fn test_validation() {
        let file = config_file("[draw]\nunit = -2.54\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("draw.unit must be positive"));
    }
}
