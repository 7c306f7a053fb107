// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary trait for the external secret resolver process.

use async_trait::async_trait;

use crate::error::OpconfError;
use crate::types::InvokeOutput;

/// Runs the external resolver once for a whole batch.
///
/// Implementations perform no parsing: they hand `request` to the tool and
/// return whatever it produced. A non-zero exit is reported through
/// [`InvokeOutput::exit_code`], not as an `Err`; `Err` is reserved for
/// failures to run the tool at all (spawn failure, timeout), which should be
/// reported as [`OpconfError::Invocation`].
#[async_trait]
pub trait CliInvoker: Send + Sync {
    /// Invoke the resolver with an optional account and the batch request text.
    async fn invoke(
        &self,
        account: Option<&str>,
        request: &str,
    ) -> Result<InvokeOutput, OpconfError>;
}
