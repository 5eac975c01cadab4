//! Level of detail for station rendering
//!
//! Detail is a pure function of zoom. Captions are derived from a node and
//! a detail level on demand; nothing is cached on the node.

use serde::{Deserialize, Serialize};

use crate::graph::GraphNode;

/// Zoom below which stations are simplified
pub const SIMPLIFIED_BELOW: f32 = 0.5;

/// Zoom above which stations are detailed
pub const DETAILED_ABOVE: f32 = 1.5;

/// Amount of information a station shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    /// Label only
    Simplified,
    /// Label and child-count badge
    Normal,
    /// Label, attribute summary and child count
    Detailed,
}

impl DetailLevel {
    /// Determine the detail level for a zoom factor
    pub fn from_zoom(zoom: f32) -> Self {
        if zoom < SIMPLIFIED_BELOW {
            DetailLevel::Simplified
        } else if zoom > DETAILED_ABOVE {
            DetailLevel::Detailed
        } else {
            DetailLevel::Normal
        }
    }

    /// Longest label shown untruncated, and the length it is cut to otherwise
    fn label_limits(self) -> (usize, usize) {
        match self {
            DetailLevel::Simplified => (10, 8),
            DetailLevel::Normal | DetailLevel::Detailed => (15, 12),
        }
    }
}

/// Free-function form of [`DetailLevel::from_zoom`]
pub fn detail_level(zoom: f32) -> DetailLevel {
    DetailLevel::from_zoom(zoom)
}

/// Text a renderer draws for one station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub label: String,
    /// Child count badge (Normal, when the node has children)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<usize>,
    /// Attribute lines (Detailed only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    /// `Children: N` line (Detailed, when the node has children)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl Caption {
    pub fn for_node(node: &GraphNode, level: DetailLevel) -> Self {
        let (max, cut) = level.label_limits();
        let label = truncate(&node.label, max, cut);
        let has_children = node.child_count > 0;

        match level {
            DetailLevel::Simplified => Self {
                label,
                badge: None,
                attributes: Vec::new(),
                footer: None,
            },
            DetailLevel::Normal => Self {
                label,
                badge: has_children.then_some(node.child_count),
                attributes: Vec::new(),
                footer: None,
            },
            DetailLevel::Detailed => Self {
                label,
                badge: None,
                attributes: node
                    .attribute_summary
                    .iter()
                    .map(|line| truncate(line, 15, 12))
                    .collect(),
                footer: has_children.then(|| format!("Children: {}", node.child_count)),
            },
        }
    }

    /// Hover text listing the first few attributes in full
    pub fn tooltip(node: &GraphNode) -> String {
        let mut text = node.label.clone();
        if node.attribute_count > 0 {
            text.push_str("\n\nAttributes:");
            for (key, value) in &node.leading_attributes {
                text.push_str(&format!("\n  {key}={value}"));
            }
            let hidden = node.attribute_count.saturating_sub(node.leading_attributes.len());
            if hidden > 0 {
                text.push_str(&format!("\n  ... and {hidden} more"));
            }
        }
        if node.child_count > 0 {
            text.push_str(&format!("\n\nChildren: {}", node.child_count));
        }
        text
    }
}

/// Cut `text` to `cut` characters plus "..." when it is longer than `max`
fn truncate(text: &str, max: usize, cut: usize) -> String {
    if text.chars().count() > max {
        let mut short: String = text.chars().take(cut).collect();
        short.push_str("...");
        short
    } else {
        text.to_string()
    }
}
