// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! source spans, valid key listings, and "did you mean?" suggestions using
//! Jaro-Winkler string similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// One problem with the tool configuration, renderable by miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no configuration section accepts.
    #[error("`{key}` is not an opconf configuration key")]
    #[diagnostic(
        code(opconf::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if one is similar enough.
        suggestion: Option<String>,
        /// Keys accepted by the enclosing section, comma separated.
        valid_keys: String,
        #[label("unrecognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value whose TOML type does not match the field.
    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(opconf::config::invalid_type), help("use a value of type {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `cli.timeout_secs`.
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` is required")]
    #[diagnostic(code(opconf::config::missing_key))]
    MissingKey { key: String },

    /// A value that parsed but cannot be used.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(opconf::config::validation))]
    Validation { message: String },

    #[error("could not load configuration: {0}")]
    #[diagnostic(code(opconf::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    let mut help = String::new();
    if let Some(key) = suggestion {
        help.push_str(&format!("did you mean `{key}`? "));
    }
    help.push_str(&format!("this section accepts: {valid_keys}"));
    help
}

/// Turn every error carried by a `figment::Error` into a diagnostic.
///
/// `toml_sources` are `(path, content)` pairs of the files that were merged;
/// they let unknown keys and mistyped values point at the offending line.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.iter().map(ToString::to_string).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let (span, src) = locate(&error, &path, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(actual, expected) => {
                    // For type errors figment's path ends with the field itself.
                    let (span, src) = match path.split_last() {
                        Some((field, section)) => locate(&error, section, field, toml_sources),
                        None => (None, None),
                    };
                    ConfigError::InvalidType {
                        key: path.join("."),
                        detail: format!("found {actual}"),
                        expected: expected.to_string(),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Which merged file produced `error`, if it can be told.
fn origin<'a>(
    error: &figment::error::Error,
    toml_sources: &'a [(String, String)],
) -> Option<&'a (String, String)> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    match file {
        Some(file) => toml_sources.iter().find(|(p, _)| *p == file),
        // Inline strings carry no file metadata.
        None if toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    }
}

fn locate(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    origin(error, toml_sources)
        .and_then(|(path, content)| {
            let offset = find_key_offset(content, section, field)?;
            Some((
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.clone())),
            ))
        })
        .unwrap_or((None, None))
}

/// Find the byte offset of a key in TOML content, relative to a section path.
///
/// For `path = ["resolver"]` and `field = "schem"`, finds the `[resolver]`
/// header then searches for `schem` after it. Top-level fields are searched
/// from the start.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut byte_offset = 0;
    for line in content[search_start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field)
            && after.starts_with([' ', '\t', '='])
        {
            return Some(search_start + byte_offset + (line.len() - trimmed.len()));
        }
        byte_offset += line.len();
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("opconf: {error}"),
        }
    }
    if errors.len() > 1 {
        eprintln!("opconf: {} configuration errors", errors.len());
    }
}
