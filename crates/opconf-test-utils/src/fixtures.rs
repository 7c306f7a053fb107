// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared configuration trees for resolver tests.

use opconf_core::ConfigDocument;

/// Four levels deep with two references and two plain values.
pub fn nested_document() -> ConfigDocument {
    ConfigDocument::from_pairs([
        ("Level1:Level2:Level3:Level4:Secret", "op://vault/item/field1"),
        ("Level1:Level2:Level3:OtherValue", "plain-value"),
        ("Level1:Level2:AnotherSecret", "op://vault/item/field2"),
        ("Level1:NonSecret", "plain-value-2"),
    ])
}

/// Two sections sharing the same leaf key name.
pub fn colliding_leaves_document() -> ConfigDocument {
    ConfigDocument::from_pairs([
        ("Section1:Nested:Key", "op://vault/one/key"),
        ("Section2:Nested:Key", "op://vault/two/key"),
    ])
}

/// Render a response in the `op inject` line format.
pub fn inject_response<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(id, value)| format!("{id}=\"{value}\""))
        .collect::<Vec<_>>()
        .join("\n")
}
