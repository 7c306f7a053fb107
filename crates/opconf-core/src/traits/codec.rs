// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire format for batch requests and responses.

use crate::error::OpconfError;
use crate::types::ReferenceEntry;

/// Encodes reference entries into a batch request and decodes response lines.
pub trait ResponseCodec: Send + Sync {
    /// Render one request line for `id` and `value`.
    fn encode_entry(&self, id: &str, value: &str) -> String;

    /// Parse one non-blank response line into `(identifier, value)`.
    fn decode_line(&self, line: &str) -> Result<(String, String), OpconfError>;

    /// Why `id` cannot be sent as an identifier, or `None` if it can.
    fn id_conflict(&self, _id: &str) -> Option<String> {
        None
    }

    /// Render a complete batch request, one line per entry.
    fn encode(&self, entries: &[ReferenceEntry]) -> String {
        entries
            .iter()
            .map(|entry| self.encode_entry(&entry.id, &entry.reference))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse a complete batch response.
    ///
    /// Blank lines are dropped. A malformed line is skipped when
    /// `fail_silently` is set and returned as the error otherwise.
    fn decode(
        &self,
        text: &str,
        fail_silently: bool,
    ) -> Result<Vec<(String, String)>, OpconfError> {
        let mut pairs = Vec::new();
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }
            match self.decode_line(line) {
                Ok(pair) => pairs.push(pair),
                Err(_) if fail_silently => {
                    tracing::warn!(len = line.len(), "skipping malformed response line");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(pairs)
    }
}
