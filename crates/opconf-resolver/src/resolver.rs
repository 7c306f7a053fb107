// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scan, encode, invoke, decode, write back.
//!
//! [`SecretResolver`] drives one resolution as a straight pipeline with two
//! early exits (no references found; failure swallowed under fail-silently).
//! Every reference in a tree goes to the external resolver in a single
//! invocation, and a failed invocation is never retried.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use opconf_config::OpconfConfig;
use opconf_core::{
    CliInvoker, ConfigTree, OpconfError, ReferenceEntry, ResolutionReport, ResolverOptions,
    ResponseCodec,
};
use tracing::{debug, info, warn};

use crate::codec::DelimitedCodec;
use crate::op_cli::OpCliInvoker;
use crate::scanner::{self, ScannedReference};

/// Resolves secret references through an injected [`CliInvoker`].
///
/// Holds no mutable state, so one resolver can serve concurrent calls.
#[derive(Clone)]
pub struct SecretResolver {
    options: ResolverOptions,
    invoker: Arc<dyn CliInvoker>,
    codec: Arc<dyn ResponseCodec>,
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretResolver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SecretResolver {
    /// Create a resolver using the `op inject` line format.
    pub fn new(options: ResolverOptions, invoker: Arc<dyn CliInvoker>) -> Self {
        Self {
            options,
            invoker,
            codec: Arc::new(DelimitedCodec::default()),
        }
    }

    /// Create a resolver backed by the real `op` CLI as described by `config`.
    pub fn from_config(config: &OpconfConfig) -> Self {
        let invoker = OpCliInvoker::from_config(&config.cli);
        Self::new(config.resolver_options(), Arc::new(invoker))
            .with_codec(Arc::new(DelimitedCodec::new(config.resolver.separator)))
    }

    /// Replace the wire codec.
    pub fn with_codec(mut self, codec: Arc<dyn ResponseCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve every reference in `tree` and overwrite those values in place.
    ///
    /// Response identifiers matching no scanned path are ignored, and scanned
    /// paths missing from the response keep their reference string.
    pub async fn resolve_tree<T: ConfigTree>(
        &self,
        tree: &mut T,
    ) -> Result<ResolutionReport, OpconfError> {
        let found = scanner::scan(tree, &self.options);
        if found.is_empty() {
            debug!("no secret references found");
            return Ok(ResolutionReport::default());
        }

        let mut report = ResolutionReport {
            scanned: found.len(),
            ..Default::default()
        };
        let found = self.admit(found)?;
        if found.is_empty() {
            return Ok(report);
        }

        let entries: Vec<ReferenceEntry> = found.iter().map(|r| r.entry()).collect();
        let request = self.codec.encode(&entries);
        debug!(count = entries.len(), "resolving secret references in one batch");

        let Some(stdout) = self.run_batch(&request).await? else {
            report.skipped = true;
            return Ok(report);
        };
        let pairs = self.codec.decode(&stdout, self.options.fail_silently)?;

        let nodes: HashMap<String, T::Node> = found.into_iter().map(|r| (r.id, r.node)).collect();
        let mut seen = HashSet::new();
        for (id, value) in pairs {
            match nodes.get(&id) {
                Some(node) => {
                    tree.set_value(node, value);
                    if seen.insert(id.clone()) {
                        report.replaced.push(id);
                    }
                }
                None => {
                    warn!(id = %id, "ignoring resolved value for unknown identifier");
                    report.unmatched.push(id);
                }
            }
        }

        if report.unresolved() > 0 {
            warn!(
                unresolved = report.unresolved(),
                "some secret references were not resolved and keep their reference value"
            );
        }
        info!(
            replaced = report.replaced.len(),
            scanned = report.scanned,
            "secret references resolved"
        );
        Ok(report)
    }

    /// Blocking wrapper over [`resolve_tree`](Self::resolve_tree).
    ///
    /// Runs the async pipeline on a private current-thread runtime, so it must
    /// not be called from inside an async context.
    pub fn resolve_tree_blocking<T: ConfigTree>(
        &self,
        tree: &mut T,
    ) -> Result<ResolutionReport, OpconfError> {
        block_on(self.resolve_tree(tree))
    }

    /// Resolve a single named reference without scanning a tree.
    ///
    /// Under fail-silently, any failure (including a response without `key`)
    /// returns `reference` unchanged.
    pub async fn resolve_single(&self, key: &str, reference: &str) -> Result<String, OpconfError> {
        if let Some(reason) = self.codec.id_conflict(key) {
            let err = OpconfError::Identifier {
                path: key.to_string(),
                reason,
            };
            if self.options.fail_silently {
                warn!(error = %err, "leaving secret reference unchanged");
                return Ok(reference.to_string());
            }
            return Err(err);
        }
        let request = self.codec.encode(&[ReferenceEntry::new(key, reference)]);

        let Some(stdout) = self.run_batch(&request).await? else {
            return Ok(reference.to_string());
        };
        let pairs = self.codec.decode(&stdout, self.options.fail_silently)?;

        match pairs.into_iter().rev().find(|(id, _)| id == key) {
            Some((_, value)) => Ok(value),
            None if self.options.fail_silently => {
                warn!(key = %key, "resolver response did not contain the requested key");
                Ok(reference.to_string())
            }
            None => Err(OpconfError::Decode {
                line: stdout.trim().to_string(),
                expected: self.codec.encode_entry(key, "value"),
            }),
        }
    }

    /// Blocking wrapper over [`resolve_single`](Self::resolve_single).
    pub fn resolve_single_blocking(&self, key: &str, reference: &str) -> Result<String, OpconfError> {
        block_on(self.resolve_single(key, reference))
    }

    /// Drop references whose path cannot be sent as a unique identifier.
    ///
    /// Fails on the first such path unless failing silently, in which case
    /// the path is skipped and keeps its reference value.
    fn admit<N>(
        &self,
        found: Vec<ScannedReference<N>>,
    ) -> Result<Vec<ScannedReference<N>>, OpconfError> {
        let mut ids = HashSet::new();
        let mut admitted = Vec::with_capacity(found.len());
        for scanned in found {
            let reason = match self.codec.id_conflict(&scanned.id) {
                Some(reason) => Some(reason),
                None if !ids.insert(scanned.id.clone()) => {
                    Some("shared by another node in the same tree".to_string())
                }
                None => None,
            };
            let Some(reason) = reason else {
                admitted.push(scanned);
                continue;
            };
            let err = OpconfError::Identifier {
                path: scanned.id,
                reason,
            };
            if !self.options.fail_silently {
                return Err(err);
            }
            warn!(error = %err, "skipping secret reference");
        }
        Ok(admitted)
    }

    /// Invoke once; `Ok(None)` means a failure was swallowed under fail-silently.
    async fn run_batch(&self, request: &str) -> Result<Option<String>, OpconfError> {
        let account = self.options.account.as_deref();
        let err = match self.invoker.invoke(account, request).await {
            Ok(output) if output.is_success() => return Ok(Some(output.stdout)),
            Ok(output) => OpconfError::Invocation {
                exit_code: output.exit_code,
                stderr: output.stderr,
            },
            Err(err) => err,
        };

        if self.options.fail_silently {
            warn!(error = %err, "secret resolution failed; leaving references unchanged");
            return Ok(None);
        }
        Err(err)
    }
}

fn block_on<F, R>(future: F) -> Result<R, OpconfError>
where
    F: Future<Output = Result<R, OpconfError>>,
{
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(OpconfError::Internal(
            "blocking resolution called from within an async runtime; use the async variant"
                .to_string(),
        ));
    }
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| OpconfError::Internal(format!("failed to start runtime: {e}")))?
        .block_on(future)
}
