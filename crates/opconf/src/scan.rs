// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `opconf scan` command implementation.
//!
//! Lists the references a `resolve` would send to `op`, without invoking it.

use std::path::Path;

use opconf_config::{DocumentFormat, OpconfConfig, StructuredDocument};
use opconf_core::OpconfError;
use serde::Serialize;

/// One reference in `--json` output.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ScanEntry {
    pub path: String,
    pub reference: String,
}

/// References in `document` in resolution order.
pub fn collect_entries(document: &StructuredDocument, config: &OpconfConfig) -> Vec<ScanEntry> {
    opconf_resolver::scan(document.tree(), &config.resolver_options())
        .into_iter()
        .map(|found| ScanEntry {
            path: found.id,
            reference: found.reference,
        })
        .collect()
}

/// Run the `opconf scan` command.
pub fn run_scan(
    config: &OpconfConfig,
    file: &Path,
    format: Option<DocumentFormat>,
    json: bool,
) -> Result<(), OpconfError> {
    let document = StructuredDocument::load(file, format)?;
    let entries = collect_entries(&document, config);

    if json {
        let rendered = serde_json::to_string_pretty(&entries)
            .map_err(|e| OpconfError::Internal(format!("failed to serialize scan: {e}")))?;
        println!("{rendered}");
    } else if entries.is_empty() {
        eprintln!("opconf: no secret references found in {}", file.display());
    } else {
        for entry in &entries {
            println!("{}\t{}", entry.path, entry.reference);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_follow_breadth_first_order() {
        let toml = r#"
api_key = "op://vault/api/key"
port = 8080

[database]
password = "OP://vault/db/password"
host = "localhost"
"#;
        let document = StructuredDocument::parse(toml, DocumentFormat::Toml).unwrap();
        let entries = collect_entries(&document, &OpconfConfig::default());
        assert_eq!(
            entries,
            vec![
                ScanEntry {
                    path: "api_key".into(),
                    reference: "op://vault/api/key".into(),
                },
                ScanEntry {
                    path: "database:password".into(),
                    reference: "OP://vault/db/password".into(),
                },
            ]
        );
    }

    #[test]
    fn schema_from_config_is_used() {
        let json = r#"{"a": "op://x/y/z", "b": "op-company://x/y/z"}"#;
        let document = StructuredDocument::parse(json, DocumentFormat::Json).unwrap();
        let mut config = OpconfConfig::default();
        config.resolver.schema = "op-company://".into();
        let entries = collect_entries(&document, &config);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "b");
    }
}
