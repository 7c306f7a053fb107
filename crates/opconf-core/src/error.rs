// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for secret reference resolution.

use thiserror::Error;

/// Guidance appended to every invocation failure.
const INVOCATION_HELP: &str = "ensure the 1Password CLI ('op') is installed and you are authenticated; \
     run 'op signin' to authenticate or 'op --version' to verify installation";

/// The primary error type used across the opconf crates.
#[derive(Debug, Error)]
pub enum OpconfError {
    /// The external resolver exited unsuccessfully, could not be started, or timed out.
    ///
    /// `exit_code` is `None` when the process never produced one (spawn failure,
    /// signal, timeout).
    #[error(
        "failed to resolve secrets from 1Password (exit code {code}): {help}\nSTDERR:\n{stderr}",
        code = display_exit_code(.exit_code),
        help = INVOCATION_HELP
    )]
    Invocation {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// A line of the batch response could not be split into identifier and value.
    #[error("received malformed output from 1Password CLI. Expected '{expected}' format but got: {line}")]
    Decode { line: String, expected: String },

    /// A scanned path cannot be sent as a batch identifier.
    #[error("cannot resolve secret reference at `{path}`: {reason}")]
    Identifier { path: String, reason: String },

    /// A configuration document could not be read, parsed, or written.
    #[error("document error: {0}")]
    Document(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

fn display_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl OpconfError {
    /// Whether this error originated from invoking the external resolver.
    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::Invocation { .. })
    }

    /// Whether this error originated from decoding the resolver's response.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Whether a scanned path was refused before anything was sent.
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_error_carries_exit_code_and_stderr() {
        let err = OpconfError::Invocation {
            exit_code: Some(1),
            stderr: "auth required".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("auth required"));
        assert!(msg.contains("op signin"));
        assert!(err.is_invocation());
        assert!(!err.is_decode());
    }

    #[test]
    fn invocation_error_without_exit_code() {
        let err = OpconfError::Invocation {
            exit_code: None,
            stderr: "no such file".into(),
        };
        assert!(err.to_string().contains("exit code none"));
    }

    #[test]
    fn decode_error_echoes_line_and_expected_format() {
        let err = OpconfError::Decode {
            line: "garbage".into(),
            expected: "key=\"value\"".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("garbage"));
        assert!(msg.contains("key=\"value\""));
        assert!(err.is_decode());
    }

    #[test]
    fn identifier_error_names_the_path() {
        let err = OpconfError::Identifier {
            path: "Conn=Primary".into(),
            reason: "contains the batch separator `=`".into(),
        };
        assert!(err.to_string().contains("`Conn=Primary`"));
        assert!(err.is_identifier());
        assert!(!err.is_decode());
    }
}
