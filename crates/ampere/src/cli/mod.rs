//! Command handlers.

pub mod config;
pub mod run;
pub mod types;

use ampere_core::{Config, ConfigError};
use std::path::Path;

/// Load the config from `path`, or from the default location when `None`.
///
/// An explicit path must exist; the default location may be absent.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
