// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the resolver, the codec, and the invoker boundary.

/// Default schema prefix marking a value as a 1Password secret reference.
pub const DEFAULT_SCHEMA: &str = "op://";

/// Options governing one resolution call.
///
/// The resolver keeps its own copy, so changing an options value after the
/// resolver is built has no effect on calls already configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Prefix (compared ASCII case-insensitively) that marks a reference value.
    pub schema: String,

    /// Account or sign-in address passed to `op --account`.
    pub account: Option<String>,

    /// Leave references untouched instead of failing on invocation or decode errors.
    pub fail_silently: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            account: None,
            fail_silently: false,
        }
    }
}

impl ResolverOptions {
    /// Options for the given account with every other setting at its default.
    pub fn for_account(account: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
            ..Default::default()
        }
    }

    /// Whether `value` starts with the configured schema prefix.
    pub fn is_reference(&self, value: &str) -> bool {
        value
            .get(..self.schema.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&self.schema))
    }
}

/// A scanned reference awaiting resolution: its identifier and raw reference string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Full hierarchical path, used as the batch correlation key.
    pub id: String,
    /// Raw reference string, e.g. `op://vault/item/field`.
    pub reference: String,
}

impl ReferenceEntry {
    pub fn new(id: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reference: reference.into(),
        }
    }
}

/// Captured result of one external resolver invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeOutput {
    /// Process exit code; `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl InvokeOutput {
    /// A successful invocation with the given standard output.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed invocation with the given exit code and standard error.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Summary of a tree resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Number of reference values found by the scan.
    pub scanned: usize,
    /// Paths whose values were replaced.
    pub replaced: Vec<String>,
    /// Response identifiers that matched no scanned path.
    pub unmatched: Vec<String>,
    /// True when a failure was swallowed because fail-silently was set.
    pub skipped: bool,
}

impl ResolutionReport {
    /// Scanned paths that received no value from the response.
    pub fn unresolved(&self) -> usize {
        self.scanned.saturating_sub(self.replaced.len())
    }
}
