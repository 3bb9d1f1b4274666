//! Settings loading.
//!
//! Layers, lowest to highest precedence: built-in defaults, an optional
//! TOML file, then `KHABARI_*` environment variables
//! (e.g. `KHABARI_HISTORY_LIMIT=20`).

mod loader;

pub use loader::{ConfigError, default_config_file, default_data_dir, load_settings};
