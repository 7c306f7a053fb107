// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `opconf resolve` and `opconf read` command implementations.

use std::path::Path;
use std::sync::Arc;

use opconf_config::{DocumentFormat, OpconfConfig, StructuredDocument};
use opconf_core::OpconfError;
use opconf_resolver::{SecretParameter, SecretResolver};
use secrecy::ExposeSecret;
use tracing::info;

use crate::mask::{mask_paths, mask_secret};

/// Run the `opconf resolve` command.
///
/// Loads the document, resolves every reference with one `op inject` call
/// and writes the result to `output` or stdout, in the document's own format.
pub async fn run_resolve(
    config: &OpconfConfig,
    file: &Path,
    format: Option<DocumentFormat>,
    output: Option<&Path>,
    mask: bool,
) -> Result<(), OpconfError> {
    let mut document = StructuredDocument::load(file, format)?;
    let resolver = SecretResolver::from_config(config);

    let report = resolver.resolve_tree(document.tree_mut()).await?;
    if mask {
        mask_paths(document.tree_mut(), &report.replaced);
    }
    let rendered = document.render()?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| {
                OpconfError::Document(format!("failed to write {}: {e}", path.display()))
            })?;
            info!(path = %path.display(), "wrote resolved document");
            eprintln!(
                "opconf: resolved {}/{} references into {}",
                report.replaced.len(),
                report.scanned,
                path.display()
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Run the `opconf read` command.
pub async fn run_read(
    config: &OpconfConfig,
    name: &str,
    reference: &str,
    mask: bool,
) -> Result<(), OpconfError> {
    let resolver = Arc::new(SecretResolver::from_config(config));
    let secret = SecretParameter::new(name, reference, resolver).value().await?;

    if mask {
        println!("{}", mask_secret(secret.expose_secret()));
    } else {
        println!("{}", secret.expose_secret());
    }
    Ok(())
}
