// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batched resolution of 1Password secret references.
//!
//! A [`SecretResolver`] scans a [`ConfigTree`](opconf_core::ConfigTree) for
//! values starting with the `op://` schema, sends them all to `op inject` in
//! one invocation, and writes the resolved values back in place.
//!
//! ```no_run
//! use std::sync::Arc;
//! use opconf_core::{ConfigDocument, ResolverOptions};
//! use opconf_resolver::{OpCliInvoker, SecretResolver};
//!
//! # async fn run() -> Result<(), opconf_core::OpconfError> {
//! let mut doc = ConfigDocument::from_pairs([("Db:Password", "op://Private/Db/password")]);
//! let resolver = SecretResolver::new(ResolverOptions::default(), Arc::new(OpCliInvoker::default()));
//! resolver.resolve_tree(&mut doc).await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod op_cli;
pub mod parameter;
pub mod resolver;
pub mod scanner;

pub use codec::{DelimitedCodec, DEFAULT_SEPARATOR};
pub use op_cli::OpCliInvoker;
pub use parameter::SecretParameter;
pub use resolver::SecretResolver;
pub use scanner::{scan, ScannedReference};
