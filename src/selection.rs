//! Selection and root path highlighting
//!
//! Selecting a station highlights exactly the stations and connections on
//! the path from the root down to it. Ids that are not in the bounded graph
//! (because their source node sits below the depth cut) resolve to the
//! nearest ancestor that is.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::BoundedGraph;

/// Notification for the host that the selected station changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChanged {
    /// Structural id of the station now selected
    pub node_id: String,
    /// Id that was asked for; differs from `node_id` when it was pruned
    pub requested_id: String,
    /// Source line of the selected station, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl SelectionChanged {
    pub fn resolved_to_ancestor(&self) -> bool {
        self.node_id != self.requested_id
    }
}

/// Tracks which station is selected
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select `node_id` (or its nearest present ancestor) and highlight the
    /// root path to it
    ///
    /// Returns a notification when the selected station changed. Ids with no
    /// present ancestor leave the selection untouched.
    pub fn select(&mut self, graph: &mut BoundedGraph, node_id: &str) -> Option<SelectionChanged> {
        let Some(target) = graph.resolve(node_id) else {
            debug!(id = node_id, "selection target not in graph, ignoring");
            return None;
        };

        let path = graph.path_from_root(target);
        let (nodes, edges) = graph.parts_mut();
        for node in nodes.iter_mut() {
            node.selected = false;
            node.highlighted = false;
        }
        for edge in edges.iter_mut() {
            edge.highlighted = false;
        }

        for &index in &path {
            nodes[index].highlighted = true;
            if let Some(edge) = nodes[index].parent_edge {
                edges[edge].highlighted = true;
            }
        }
        nodes[target].selected = true;

        let selected = &nodes[target];
        if self.selected.as_deref() == Some(selected.id.as_str()) {
            return None;
        }
        self.selected = Some(selected.id.clone());
        Some(SelectionChanged {
            node_id: selected.id.clone(),
            requested_id: node_id.to_string(),
            line: selected.line,
        })
    }

    /// Drop the selection and every highlight
    pub fn clear(&mut self, graph: &mut BoundedGraph) {
        self.selected = None;
        let (nodes, edges) = graph.parts_mut();
        for node in nodes.iter_mut() {
            node.selected = false;
            node.highlighted = false;
        }
        for edge in edges.iter_mut() {
            edge.highlighted = false;
        }
    }

    /// Re-apply the current selection to a rebuilt graph
    pub fn reapply(&mut self, graph: &mut BoundedGraph) -> Option<SelectionChanged> {
        let previous = self.selected.clone()?;
        if graph.resolve(&previous).is_none() {
            self.clear(graph);
            return None;
        }
        self.select(graph, &previous)
    }
}

/// Indices of the highlighted nodes and edges, in arena order
pub fn highlighted(graph: &BoundedGraph) -> (Vec<usize>, Vec<usize>) {
    let nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, n)| n.highlighted)
        .map(|(i, _)| i)
        .collect();
    let edges = graph
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.highlighted)
        .map(|(i, _)| i)
        .collect();
    (nodes, edges)
}
