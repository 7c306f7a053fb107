// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for opconf.
//!
//! This crate provides the error type, the configuration tree abstraction,
//! and the two traits the resolver is generic over: the batch wire codec and
//! the external resolver invoker.

pub mod error;
pub mod traits;
pub mod tree;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::OpconfError;
pub use traits::{CliInvoker, ResponseCodec};
pub use tree::{ConfigDocument, ConfigTree, NodeId, KEY_DELIMITER};
pub use types::{
    InvokeOutput, ReferenceEntry, ResolutionReport, ResolverOptions, DEFAULT_SCHEMA,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opconf_error_has_all_variants() {
        let _invocation = OpconfError::Invocation {
            exit_code: Some(1),
            stderr: "test".into(),
        };
        let _decode = OpconfError::Decode {
            line: "test".into(),
            expected: "key=\"value\"".into(),
        };
        let _document = OpconfError::Document("test".into());
        let _internal = OpconfError::Internal("test".into());
    }

    #[test]
    fn traits_are_object_safe() {
        fn _assert_invoker(_: &dyn CliInvoker) {}
        fn _assert_codec(_: &dyn ResponseCodec) {}
    }

    #[test]
    fn document_implements_config_tree() {
        fn _assert_tree<T: ConfigTree>() {}
        _assert_tree::<ConfigDocument>();
    }
}
