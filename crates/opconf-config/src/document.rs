// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML and JSON application documents as [`ConfigDocument`] trees.
//!
//! Tables and objects become sections, arrays become sections keyed `0`, `1`,
//! ..., and scalars become node values (numbers and booleans rendered to
//! text). When a document is rendered back, only leaves whose text changed
//! are rewritten, always as strings; every other value keeps its original type.

use std::path::Path;
use std::str::FromStr;

use opconf_core::{ConfigDocument, ConfigTree, NodeId, OpconfError};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// On-disk format of an application document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| Self::from_str(ext).ok())
    }
}

/// A parsed application document together with its resolvable tree.
#[derive(Debug, Clone)]
pub struct StructuredDocument {
    format: DocumentFormat,
    original: Value,
    tree: ConfigDocument,
}

impl StructuredDocument {
    /// Parse `content` in the given format.
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self, OpconfError> {
        let original = match format {
            DocumentFormat::Toml => {
                let table: toml::Table = toml::from_str(content)
                    .map_err(|e| OpconfError::Document(format!("invalid TOML: {e}")))?;
                toml_to_json(toml::Value::Table(table))
            }
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|e| OpconfError::Document(format!("invalid JSON: {e}")))?,
        };

        let Value::Object(map) = &original else {
            return Err(OpconfError::Document(
                "top-level value must be an object".to_string(),
            ));
        };

        let mut tree = ConfigDocument::new();
        for (key, value) in map {
            build(&mut tree, None, key, value);
        }

        Ok(Self {
            format,
            original,
            tree,
        })
    }

    /// Read and parse a file, inferring the format from its extension unless given.
    pub fn load(path: &Path, format: Option<DocumentFormat>) -> Result<Self, OpconfError> {
        let format = format
            .or_else(|| DocumentFormat::from_path(path))
            .ok_or_else(|| {
                OpconfError::Document(format!(
                    "cannot infer document format of {}; pass --format",
                    path.display()
                ))
            })?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| OpconfError::Document(format!("failed to read {}: {e}", path.display())))?;
        Self::parse(&content, format)
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn tree(&self) -> &ConfigDocument {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ConfigDocument {
        &mut self.tree
    }

    /// The original document with changed leaves taken from the tree.
    pub fn to_value(&self) -> Value {
        let mut value = self.original.clone();
        if let Value::Object(map) = &mut value {
            merge_object(&self.tree, None, map);
        }
        value
    }

    /// Serialise the document back into its own format.
    pub fn render(&self) -> Result<String, OpconfError> {
        let value = self.to_value();
        match self.format {
            DocumentFormat::Toml => toml::to_string_pretty(&value)
                .map_err(|e| OpconfError::Document(format!("failed to render TOML: {e}"))),
            DocumentFormat::Json => serde_json::to_string_pretty(&value)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| OpconfError::Document(format!("failed to render JSON: {e}"))),
        }
    }
}

// Keys are split on the path delimiter, so `"A:B"` and `{"A":{"B":..}}` land
// on the same node and the later entry wins.
fn build(tree: &mut ConfigDocument, parent: Option<NodeId>, key: &str, value: &Value) {
    let node = tree.ensure_path(parent, key);
    if let Some(text) = scalar_text(value) {
        tree.set_value(&node, text);
    }
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                build(tree, Some(node), k, v);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                build(tree, Some(node), &i.to_string(), v);
            }
        }
        _ => {}
    }
}

fn merge_object(tree: &ConfigDocument, parent: Option<NodeId>, map: &mut Map<String, Value>) {
    for (key, value) in map.iter_mut() {
        if let Some(node) = tree.find_below(parent, key) {
            merge(tree, node, value);
        }
    }
}

fn merge(tree: &ConfigDocument, node: NodeId, value: &mut Value) {
    match value {
        Value::Object(map) => merge_object(tree, Some(node), map),
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                if let Some(child) = tree.find_below(Some(node), &i.to_string()) {
                    merge(tree, child, item);
                }
            }
        }
        _ => {
            if let Some(current) = tree.value(&node)
                && scalar_text(value).as_deref() != Some(current)
            {
                *value = Value::String(current.to_string());
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        toml::Value::Boolean(b) => Value::Bool(b),
        // Datetimes have no JSON counterpart; they round-trip as strings.
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
