// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two pluggable seams of the resolver.
//!
//! [`CliInvoker`] talks to the external tool; [`ResponseCodec`] owns the
//! textual batch format. Both are object safe and are injected into the
//! resolver as trait objects.

pub mod codec;
pub mod invoker;

pub use codec::ResponseCodec;
pub use invoker::CliInvoker;
