// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock external resolver for deterministic testing.
//!
//! `MockInvoker` implements `CliInvoker` with pre-configured responses and
//! records every call, so tests can assert on invocation count, the account
//! passed, and the exact batch request text without a real `op` binary.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use opconf_core::{CliInvoker, InvokeOutput, OpconfError};

/// What the mock answers with for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// The process ran; exit code and streams as given.
    Output(InvokeOutput),
    /// The process could not be run at all.
    Unavailable(String),
}

impl MockResponse {
    fn into_result(self) -> Result<InvokeOutput, OpconfError> {
        match self {
            Self::Output(output) => Ok(output),
            Self::Unavailable(stderr) => Err(OpconfError::Invocation {
                exit_code: None,
                stderr,
            }),
        }
    }
}

/// A recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub account: Option<String>,
    pub request: String,
}

/// A mock invoker that returns queued responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty the
/// fallback response is returned, so a mock built with a single response
/// answers every call the same way.
pub struct MockInvoker {
    queue: Arc<Mutex<VecDeque<MockResponse>>>,
    fallback: MockResponse,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    count: AtomicUsize,
}

impl MockInvoker {
    /// Create a mock that answers every call with `fallback`.
    pub fn new(fallback: MockResponse) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            calls: Arc::new(Mutex::new(Vec::new())),
            count: AtomicUsize::new(0),
        }
    }

    /// Successful exit with the given standard output.
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self::new(MockResponse::Output(InvokeOutput::success(stdout)))
    }

    /// Answer every call with `output`.
    pub fn with_output(output: InvokeOutput) -> Self {
        Self::new(MockResponse::Output(output))
    }

    /// Non-zero exit with the given standard error.
    pub fn failing(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::with_output(InvokeOutput::failure(exit_code, stderr))
    }

    /// The tool cannot be started; every call returns an invocation error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(MockResponse::Unavailable(message.into()))
    }

    /// Queue a response ahead of the fallback.
    pub async fn push_response(&self, response: MockResponse) {
        self.queue.lock().await.push_back(response);
    }

    /// Number of times `invoke` has been called.
    pub fn invocation_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// All recorded calls in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Request text of the most recent call.
    pub async fn last_request(&self) -> Option<String> {
        self.calls.lock().await.last().map(|c| c.request.clone())
    }

    /// Account of the most recent call; outer `None` if never called.
    pub async fn last_account(&self) -> Option<Option<String>> {
        self.calls.lock().await.last().map(|c| c.account.clone())
    }
}

impl Default for MockInvoker {
    fn default() -> Self {
        Self::with_stdout("")
    }
}

#[async_trait]
impl CliInvoker for MockInvoker {
    async fn invoke(
        &self,
        account: Option<&str>,
        request: &str,
    ) -> Result<InvokeOutput, OpconfError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().await.push(RecordedCall {
            account: account.map(str::to_string),
            request: request.to_string(),
        });
        let response = self
            .queue
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        response.into_result()
    }
}
