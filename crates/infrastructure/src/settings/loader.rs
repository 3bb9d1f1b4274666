//! Settings loader built on the `config` crate.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use khabari_domain::AppSettings;
use tracing::debug;

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "KHABARI";

/// Error type for settings loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// An explicitly requested file does not exist.
    #[error("configuration file not found: {0}")]
    MissingFile(PathBuf),
}

/// Returns the per-user data directory for persisted state.
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("khabari"))
}

/// Returns the default configuration file location.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("khabari").join("config.toml"))
}

/// Loads settings.
///
/// With `explicit_file` the file must exist; otherwise the default
/// location is used if present.
///
/// # Errors
///
/// Returns an error if a source is malformed or an explicit file is missing.
pub fn load_settings(explicit_file: Option<&Path>) -> Result<AppSettings, ConfigError> {
    let mut builder = Config::builder();

    match explicit_file {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        None => {
            if let Some(path) = default_config_file() {
                builder = builder.add_source(
                    File::from(path.as_path())
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }
    }

    let config = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?;
    Ok(config.try_deserialize()?)
}
