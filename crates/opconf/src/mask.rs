// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display masking for resolved secrets.

use opconf_core::{ConfigDocument, ConfigTree};

/// Number of leading characters left visible.
const VISIBLE_PREFIX: usize = 4;

/// Keep the first four characters and replace the rest with `*`.
///
/// Values of four characters or fewer are fully hidden as `****`; an empty
/// value stays empty.
pub fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len == 0 {
        return String::new();
    }
    if len <= VISIBLE_PREFIX {
        return "*".repeat(VISIBLE_PREFIX);
    }
    let visible: String = secret.chars().take(VISIBLE_PREFIX).collect();
    visible + &"*".repeat(len - VISIBLE_PREFIX)
}

/// Mask the values at `paths` in place.
pub fn mask_paths(tree: &mut ConfigDocument, paths: &[String]) {
    for path in paths {
        let Some(node) = tree.find(path) else {
            continue;
        };
        if let Some(masked) = tree.value(&node).map(mask_secret) {
            tree.set_value(&node, masked);
        }
    }
}
