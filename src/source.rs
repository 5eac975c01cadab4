//! Source tree supplied by the hosting editor
//!
//! The host parses its document and hands over a tree of [`SourceNode`]s.
//! Ids are structural paths (e.g. `/catalog/book[2]`) that the host can use
//! to relocate the node in its document; this crate never parses documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::NavResult;

/// Separator between segments of a structural path id
pub const PATH_SEPARATOR: char = '/';

/// A node of the host's document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    /// Stable structural path, unique within the tree
    pub id: String,

    /// Display name (element name, heading text, ...)
    pub name: String,

    /// Attributes, ordered so summaries are deterministic
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Child nodes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SourceNode>,

    /// 1-based line in the source document, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl SourceNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            line: None,
        }
    }

    /// Decode a source tree from JSON
    pub fn from_json(json: &str) -> NavResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: SourceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Number of nodes in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SourceNode::subtree_len).sum::<usize>()
    }

    /// Depth of the deepest node below this one (0 for a leaf)
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Parent path of a structural id, or `None` for a top-level id
///
/// `/root/a/b` → `/root/a`, `/root` → `None`.
pub fn parent_path(id: &str) -> Option<&str> {
    let trimmed = id.trim_end_matches(PATH_SEPARATOR);
    let cut = trimmed.rfind(PATH_SEPARATOR)?;
    if cut == 0 {
        return None;
    }
    Some(&trimmed[..cut])
}
