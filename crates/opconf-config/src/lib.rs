// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for opconf.
//!
//! Two concerns live here: the tool's own settings (`opconf.toml`, parsed
//! with strict validation, XDG file hierarchy lookup, `OPCONF_*` environment
//! overrides and miette diagnostics), and the application documents whose
//! secret references get resolved ([`StructuredDocument`]).
//!
//! # Usage
//!
//! ```no_run
//! use opconf_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("schema: {}", config.resolver.schema);
//! ```

pub mod diagnostic;
pub mod document;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use document::{DocumentFormat, StructuredDocument};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::OpconfConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Deserialization failures become miette diagnostics pointing into whichever
/// config file caused them; validation failures are collected, not fail-fast.
pub fn load_and_validate() -> Result<OpconfConfig, Vec<ConfigError>> {
    checked(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<OpconfConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<OpconfConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

// Sources are only read when there is an error to point into.
fn checked(
    loaded: Result<OpconfConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<OpconfConfig, Vec<ConfigError>> {
    let config =
        loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Read every config file that exists, most specific first.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into());

    [
        local,
        loader::user_config_path(),
        loader::SYSTEM_CONFIG_PATH.into(),
    ]
    .into_iter()
    .filter_map(|path| {
        std::fs::read_to_string(&path)
            .ok()
            .map(|content| (path.display().to_string(), content))
    })
    .collect()
}
