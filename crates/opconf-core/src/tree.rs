// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical configuration tree model.
//!
//! [`ConfigTree`] is the seam the resolver walks: anything that can enumerate
//! children, read and write scalar values, and report node paths can have its
//! secret references resolved in place. [`ConfigDocument`] is the in-memory
//! implementation used by the loaders and the CLI.

/// Separator between path segments, e.g. `ConnectionStrings:Database`.
pub const KEY_DELIMITER: &str = ":";

/// A mutable hierarchical key/value store.
///
/// Nodes are addressed through cheap, cloneable handles so a scan can hold
/// on to them while the tree is later borrowed mutably for write-back.
pub trait ConfigTree {
    /// Handle addressing a single node.
    type Node: Clone;

    /// Direct children of the (implicit, valueless) root, in order.
    fn root_children(&self) -> Vec<Self::Node>;

    /// Direct children of `node`, in order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Scalar value of `node`, if it has one.
    fn value(&self, node: &Self::Node) -> Option<&str>;

    /// Overwrite the scalar value of `node` in place.
    fn set_value(&mut self, node: &Self::Node, value: String);

    /// Full hierarchical path of `node`, segments joined with [`KEY_DELIMITER`].
    fn path(&self, node: &Self::Node) -> String;

    /// Leaf segment name of `node`.
    fn key(&self, node: &Self::Node) -> &str;
}

/// Handle to a node inside a [`ConfigDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    key: String,
    parent: Option<NodeId>,
    value: Option<String>,
    children: Vec<NodeId>,
}

/// Arena-backed configuration tree.
///
/// Nodes are never removed, so a [`NodeId`] stays valid for the lifetime of
/// the document.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from flat `A:B:C -> value` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut doc = Self::new();
        for (path, value) in pairs {
            doc.insert(path.as_ref(), value);
        }
        doc
    }

    /// Set the value at `path`, creating intermediate sections as needed.
    pub fn insert(&mut self, path: &str, value: impl Into<String>) -> NodeId {
        let id = self.ensure_path(None, path);
        self.nodes[id.0].value = Some(value.into());
        id
    }

    /// Node at `path` below `parent`, creating missing sections on the way.
    ///
    /// `path` may span several segments, so `ensure_path(None, "A:B")` and
    /// `ensure_path(Some(a), "B")` address the same node.
    pub fn ensure_path(&mut self, parent: Option<NodeId>, path: &str) -> NodeId {
        let mut current = parent;
        for segment in path.split(KEY_DELIMITER) {
            current = Some(match self.child_by_key(current, segment) {
                Some(existing) => existing,
                None => self.add_child(current, segment, None),
            });
        }
        // `split` always yields at least one segment.
        current.unwrap_or(NodeId(0))
    }

    /// Node at `path` below `parent`, if every segment exists.
    pub fn find_below(&self, parent: Option<NodeId>, path: &str) -> Option<NodeId> {
        let mut current = parent;
        for segment in path.split(KEY_DELIMITER) {
            current = Some(self.child_by_key(current, segment)?);
        }
        current
    }

    /// Append a child under `parent` (or at the top level when `None`).
    pub fn add_child(
        &mut self,
        parent: Option<NodeId>,
        key: impl Into<String>,
        value: Option<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            key: key.into(),
            parent,
            value,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Look up a node by its full path.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.find_below(None, path)
    }

    /// Value at `path`, if the node exists and holds a value.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.find(path).and_then(|id| self.nodes[id.0].value.as_deref())
    }

    /// Every `(path, value)` pair in depth-first order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if let Some(value) = &node.value {
                pairs.push((self.path(&id), value.clone()));
            }
            stack.extend(node.children.iter().rev().copied());
        }
        pairs
    }

    /// Number of nodes, sections included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn child_by_key(&self, parent: Option<NodeId>, key: &str) -> Option<NodeId> {
        let siblings = match parent {
            Some(p) => &self.nodes[p.0].children,
            None => &self.roots,
        };
        siblings.iter().copied().find(|id| self.nodes[id.0].key == key)
    }
}

impl ConfigTree for ConfigDocument {
    type Node = NodeId;

    fn root_children(&self) -> Vec<NodeId> {
        self.roots.clone()
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn value(&self, node: &NodeId) -> Option<&str> {
        self.nodes[node.0].value.as_deref()
    }

    fn set_value(&mut self, node: &NodeId, value: String) {
        self.nodes[node.0].value = Some(value);
    }

    fn path(&self, node: &NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(*node);
        while let Some(id) = current {
            let data = &self.nodes[id.0];
            segments.push(data.key.as_str());
            current = data.parent;
        }
        segments.reverse();
        segments.join(KEY_DELIMITER)
    }

    fn key(&self, node: &NodeId) -> &str {
        &self.nodes[node.0].key
    }
}
