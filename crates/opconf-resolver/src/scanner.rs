// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Breadth-first discovery of secret references in a configuration tree.

use std::collections::VecDeque;

use opconf_core::{ConfigTree, ReferenceEntry, ResolverOptions};

/// A node whose value is a secret reference.
#[derive(Debug, Clone)]
pub struct ScannedReference<N> {
    /// Full hierarchical path of the node.
    pub id: String,
    /// The raw reference string.
    pub reference: String,
    /// Handle used to write the resolved value back.
    pub node: N,
}

impl<N> ScannedReference<N> {
    pub fn entry(&self) -> ReferenceEntry {
        ReferenceEntry::new(self.id.clone(), self.reference.clone())
    }
}

/// Collect every node whose value starts with the configured schema prefix.
///
/// Traversal is breadth-first from the root's direct children. A matched
/// node is terminal: its children, if any, are not visited. Results are in
/// visit order and keyed by full path, so same-named leaves in different
/// sections never collide.
pub fn scan<T: ConfigTree>(
    tree: &T,
    options: &ResolverOptions,
) -> Vec<ScannedReference<T::Node>> {
    let mut queue: VecDeque<T::Node> = tree.root_children().into();
    let mut found = Vec::new();

    while let Some(node) = queue.pop_front() {
        match tree.value(&node) {
            Some(value) if options.is_reference(value) => {
                found.push(ScannedReference {
                    id: tree.path(&node),
                    reference: value.to_string(),
                    node,
                });
            }
            _ => queue.extend(tree.children(&node)),
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use opconf_core::ConfigDocument;

    fn ids<N>(found: &[ScannedReference<N>]) -> Vec<&str> {
        found.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn finds_references_at_every_depth() {
        let doc = ConfigDocument::from_pairs([
            ("Level1:Level2:Level3:Level4:Secret", "op://vault/item/field1"),
            ("Level1:Level2:Level3:OtherValue", "plain-value"),
            ("Level1:Level2:AnotherSecret", "op://vault/item/field2"),
            ("Level1:NonSecret", "plain-value-2"),
        ]);

        let found = scan(&doc, &ResolverOptions::default());
        // Breadth-first: the shallower reference is visited first.
        assert_eq!(
            ids(&found),
            vec![
                "Level1:Level2:AnotherSecret",
                "Level1:Level2:Level3:Level4:Secret"
            ]
        );
        assert_eq!(found[0].reference, "op://vault/item/field2");
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let found = scan(&ConfigDocument::new(), &ResolverOptions::default());
        assert!(found.is_empty());
    }

    #[test]
    fn no_references_yields_nothing() {
        let doc = ConfigDocument::from_pairs([("A:B", "plain"), ("C", "https://op.example")]);
        assert!(scan(&doc, &ResolverOptions::default()).is_empty());
    }

    #[test]
    fn schema_match_is_case_insensitive() {
        let doc = ConfigDocument::from_pairs([("A", "OP://Vault/Item/Field")]);
        assert_eq!(ids(&scan(&doc, &ResolverOptions::default())), vec!["A"]);
    }

    #[test]
    fn matched_node_is_terminal() {
        let doc = ConfigDocument::from_pairs([("A", "op://vault/a"), ("A:B", "op://vault/b")]);
        assert_eq!(ids(&scan(&doc, &ResolverOptions::default())), vec!["A"]);
    }

    #[test]
    fn same_leaf_names_get_distinct_identifiers() {
        let doc = ConfigDocument::from_pairs([
            ("Section1:Nested:Key", "op://vault/one/key"),
            ("Section2:Nested:Key", "op://vault/two/key"),
        ]);
        let found = scan(&doc, &ResolverOptions::default());
        assert_eq!(
            ids(&found),
            vec!["Section1:Nested:Key", "Section2:Nested:Key"]
        );
    }

    #[test]
    fn custom_schema_ignores_default_prefix() {
        let doc = ConfigDocument::from_pairs([
            ("Personal", "op://Private/Item/password"),
            ("Company", "op-company://Private/Item/password"),
        ]);
        let options = ResolverOptions {
            schema: "op-company://".into(),
            ..Default::default()
        };
        assert_eq!(ids(&scan(&doc, &options)), vec!["Company"]);
    }

    #[test]
    fn entry_pairs_path_and_reference() {
        let doc = ConfigDocument::from_pairs([("ConnectionStrings:Primary", "op://vault/db1/conn")]);
        let found = scan(&doc, &ResolverOptions::default());
        assert_eq!(
            found[0].entry(),
            ReferenceEntry::new("ConnectionStrings:Primary", "op://vault/db1/conn")
        );
    }
}
