// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `op inject` template format: one `identifier="value"` line per entry.
//!
//! `op inject` replaces every reference it finds in the template and echoes
//! the rest verbatim, so each response line carries the identifier it was
//! requested under. Embedded double quotes are not escaped in either
//! direction; a reference or secret containing `"` is passed through as is.

use opconf_core::{OpconfError, ResponseCodec};

/// Default separator between identifier and value.
pub const DEFAULT_SEPARATOR: char = '=';

/// Line-oriented codec splitting identifier and value on a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedCodec {
    separator: char,
}

impl Default for DelimitedCodec {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl DelimitedCodec {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Template shown in decode errors, e.g. `key="value"`.
    pub fn expected_format(&self) -> String {
        self.encode_entry("key", "value")
    }
}

impl ResponseCodec for DelimitedCodec {
    fn encode_entry(&self, id: &str, value: &str) -> String {
        format!("{id}{}\"{value}\"", self.separator)
    }

    fn id_conflict(&self, id: &str) -> Option<String> {
        if id.contains(self.separator) {
            Some(format!("contains the batch separator `{}`", self.separator))
        } else if id.contains(['\n', '\r']) {
            Some("contains a line break".to_string())
        } else {
            None
        }
    }

    fn decode_line(&self, line: &str) -> Result<(String, String), OpconfError> {
        // First separator only: resolved values may contain it, identifiers may not.
        let (id, value) = line
            .split_once(self.separator)
            .ok_or_else(|| OpconfError::Decode {
                line: line.to_string(),
                expected: self.expected_format(),
            })?;
        Ok((id.to_string(), unquote(value).to_string()))
    }
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
