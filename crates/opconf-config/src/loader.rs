// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./opconf.toml` > `~/.config/opconf/opconf.toml` > `/etc/opconf/opconf.toml`
//! with environment variable overrides via `OPCONF_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::OpconfConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/opconf/opconf.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "opconf.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/opconf/opconf.toml` (system-wide)
/// 3. `~/.config/opconf/opconf.toml` (user XDG config)
/// 4. `./opconf.toml` (local directory)
/// 5. `OPCONF_*` environment variables
pub fn load_config() -> Result<OpconfConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpconfConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<OpconfConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpconfConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OpconfConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OpconfConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Path of the per-user config file (`$XDG_CONFIG_HOME/opconf/opconf.toml`).
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("opconf/opconf.toml"))
        .unwrap_or_default()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `OPCONF_RESOLVER_FAIL_SILENTLY` must map to
/// `resolver.fail_silently`, not `resolver.fail.silently`.
fn env_provider() -> Env {
    Env::prefixed("OPCONF_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let mapped = key
            .as_str()
            .replacen("resolver_", "resolver.", 1)
            .replacen("cli_", "cli.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
