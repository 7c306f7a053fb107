// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazily resolved single secret parameter.

use std::sync::Arc;

use opconf_core::OpconfError;
use secrecy::SecretString;

use crate::resolver::SecretResolver;

/// A named application parameter whose value comes from a secret reference.
///
/// Nothing is resolved at construction. Each call to [`value`](Self::value)
/// invokes the external resolver again; results are never cached.
#[derive(Debug, Clone)]
pub struct SecretParameter {
    name: String,
    reference: String,
    resolver: Arc<SecretResolver>,
}

impl SecretParameter {
    pub fn new(
        name: impl Into<String>,
        reference: impl Into<String>,
        resolver: Arc<SecretResolver>,
    ) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            resolver,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Resolve the parameter now.
    ///
    /// Under fail-silently a failed resolution yields the reference string
    /// itself, wrapped like any other value.
    pub async fn value(&self) -> Result<SecretString, OpconfError> {
        let value = self
            .resolver
            .resolve_single(&self.name, &self.reference)
            .await?;
        Ok(SecretString::from(value))
    }

    /// Blocking variant of [`value`](Self::value).
    pub fn value_blocking(&self) -> Result<SecretString, OpconfError> {
        self.resolver
            .resolve_single_blocking(&self.name, &self.reference)
            .map(SecretString::from)
    }
}
