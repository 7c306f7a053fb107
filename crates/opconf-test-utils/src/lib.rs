// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for opconf.
//!
//! Provides a mock external resolver and shared fixtures for fast,
//! deterministic tests that never spawn the real `op` binary.
//!
//! # Components
//!
//! - [`MockInvoker`] - Mock `CliInvoker` with queued responses and call capture
//! - [`fixtures`] - Prebuilt configuration trees and response rendering

pub mod fixtures;
pub mod mock_invoker;

pub use mock_invoker::{MockInvoker, MockResponse, RecordedCall};
