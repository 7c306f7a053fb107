// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the opconf tool.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use opconf_core::{ResolverOptions, DEFAULT_SCHEMA};
use serde::{Deserialize, Serialize};

/// Top-level opconf configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpconfConfig {
    /// Reference detection and failure policy.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// External `op` CLI settings.
    #[serde(default)]
    pub cli: CliConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl OpconfConfig {
    /// Options for a resolution call derived from the `[resolver]` section.
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            schema: self.resolver.schema.clone(),
            account: self.resolver.account.clone(),
            fail_silently: self.resolver.fail_silently,
        }
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Prefix marking a configuration value as a secret reference.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// 1Password account or sign-in address (`op --account`).
    #[serde(default)]
    pub account: Option<String>,

    /// Leave references untouched instead of failing when `op` errors out.
    #[serde(default)]
    pub fail_silently: bool,

    /// Character separating identifier and value in the batch protocol.
    #[serde(default = "default_separator")]
    pub separator: char,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            account: None,
            fail_silently: false,
            separator: default_separator(),
        }
    }
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_separator() -> char {
    '='
}

/// `op` CLI process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Path or name of the `op` binary.
    #[serde(default = "default_op_path")]
    pub op_path: String,

    /// Kill the `op` process if it has not finished after this many seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            op_path: default_op_path(),
            timeout_secs: None,
        }
    }
}

fn default_op_path() -> String {
    "op".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OpconfConfig::default();
        assert_eq!(config.resolver.schema, "op://");
        assert_eq!(config.resolver.separator, '=');
        assert!(!config.resolver.fail_silently);
        assert_eq!(config.cli.op_path, "op");
        assert!(config.cli.timeout_secs.is_none());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn resolver_options_mirror_section() {
        let mut config = OpconfConfig::default();
        config.resolver.account = Some("my.1password.com".into());
        config.resolver.fail_silently = true;
        config.resolver.schema = "op-company://".into();

        let options = config.resolver_options();
        assert_eq!(options.account.as_deref(), Some("my.1password.com"));
        assert!(options.fail_silently);
        assert_eq!(options.schema, "op-company://");
    }
}
