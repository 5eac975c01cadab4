//! Bounded graph model
//!
//! Converts the host's source tree into an arena of stations (nodes) and
//! connections (edges). Only the first three levels are ever materialized;
//! deeper source nodes are omitted, not hidden. Parent/child links are
//! integer indices into the arena.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{NavError, NavResult};
use crate::geometry::{BoundingBox, Point, station_size};
use crate::layout::LayoutResult;
use crate::source::{SourceNode, parent_path};

/// Number of levels kept from the source tree (depths 0, 1 and 2)
pub const MAX_LEVELS: usize = 3;

/// Deepest depth a materialized node can have
pub const MAX_DEPTH: u8 = (MAX_LEVELS - 1) as u8;

/// Attributes shown in a node's summary
const SUMMARY_ATTRIBUTES: usize = 2;

/// Attribute values are cut to this many characters in the summary
const SUMMARY_VALUE_CHARS: usize = 8;

/// Attributes kept in full for tooltips
pub const TOOLTIP_ATTRIBUTES: usize = 3;

/// Copy the first `max_levels` levels of a source tree
///
/// `max_levels` is capped at [`MAX_LEVELS`]. Nodes below the cut are
/// omitted from the copy. Returns `None` for a missing or malformed root
/// (empty id) or when `max_levels` is zero.
pub fn extract_bounded(source_root: Option<&SourceNode>, max_levels: usize) -> Option<SourceNode> {
    let root = source_root?;
    if root.id.is_empty() {
        warn!("source tree root has no id, treating it as empty");
        return None;
    }

    let max_levels = max_levels.min(MAX_LEVELS);
    if max_levels == 0 {
        return None;
    }

    Some(copy_limited(root, 0, max_levels))
}

fn copy_limited(node: &SourceNode, level: usize, max_levels: usize) -> SourceNode {
    let children = if level + 1 < max_levels {
        node.children
            .iter()
            .map(|child| copy_limited(child, level + 1, max_levels))
            .collect()
    } else {
        Vec::new()
    };

    SourceNode {
        id: node.id.clone(),
        name: node.name.clone(),
        attributes: node.attributes.clone(),
        children,
        line: node.line,
    }
}

/// Flatten a bounded tree into a graph
///
/// Positions start unset. Nodes deeper than [`MAX_DEPTH`] and nodes whose id
/// repeats an earlier one are dropped together with their subtrees.
pub fn to_graph(bounded: Option<&SourceNode>) -> BoundedGraph {
    let mut graph = BoundedGraph::empty();
    if let Some(root) = bounded {
        if root.id.is_empty() {
            warn!("source tree root has no id, treating it as empty");
        } else {
            graph.insert_subtree(root, None, 0);
        }
    }
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "built bounded graph"
    );
    graph
}

/// A station in the bounded graph
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Structural path from the source tree
    pub id: String,
    /// 0 for the root, at most [`MAX_DEPTH`]
    pub depth: u8,
    pub label: String,
    /// Up to two `key=value` entries
    pub attribute_summary: Vec<String>,
    /// First attributes in key order, uncut
    pub leading_attributes: Vec<(String, String)>,
    pub attribute_count: usize,
    /// Children in the source tree, including ones cut by the depth bound
    pub child_count: usize,
    pub line: Option<u32>,
    /// `None` until a layout has been applied
    pub position: Option<Point>,
    pub selected: bool,
    pub highlighted: bool,
    pub parent: Option<usize>,
    /// Index of the edge from `parent` to this node
    pub parent_edge: Option<usize>,
    pub children: Vec<usize>,
}

impl GraphNode {
    /// Station size in world units
    pub fn size(&self) -> (f32, f32) {
        station_size(self.depth)
    }

    /// World-space rectangle of the station, if positioned
    pub fn rect(&self) -> Option<BoundingBox> {
        let (w, h) = self.size();
        self.position
            .map(|p| BoundingBox::around(p, w / 2.0, h / 2.0))
    }
}

/// A parent/child connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub parent: usize,
    pub child: usize,
    pub highlighted: bool,
}

/// Arena of stations and connections built from one source snapshot
#[derive(Debug, Clone, Default)]
pub struct BoundedGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
    generation: u64,
}

impl BoundedGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tag the graph with the rebuild generation it belongs to
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    fn insert_subtree(&mut self, node: &SourceNode, parent: Option<usize>, depth: u8) {
        if self.index_by_id.contains_key(&node.id) {
            warn!(id = %node.id, "duplicate node id in source tree, dropping subtree");
            return;
        }

        let index = self.nodes.len();
        let parent_edge = parent.map(|parent| {
            self.edges.push(Edge {
                parent,
                child: index,
                highlighted: false,
            });
            self.edges.len() - 1
        });

        self.nodes.push(GraphNode {
            id: node.id.clone(),
            depth,
            label: node.name.clone(),
            attribute_summary: summarize_attributes(node),
            leading_attributes: node
                .attributes
                .iter()
                .take(TOOLTIP_ATTRIBUTES)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            attribute_count: node.attributes.len(),
            child_count: node.children.len(),
            line: node.line,
            position: None,
            selected: false,
            highlighted: false,
            parent,
            parent_edge,
            children: Vec::new(),
        });
        self.index_by_id.insert(node.id.clone(), index);
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }

        if depth >= MAX_DEPTH {
            return;
        }
        for child in &node.children {
            self.insert_subtree(child, Some(index), depth + 1);
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [GraphNode], &mut [Edge]) {
        (&mut self.nodes, &mut self.edges)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.first()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Index of `id`, or of its nearest ancestor present in the graph
    pub fn resolve(&self, id: &str) -> Option<usize> {
        let mut cursor = Some(id);
        while let Some(candidate) = cursor {
            if let Some(index) = self.index_of(candidate) {
                return Some(index);
            }
            cursor = parent_path(candidate);
        }
        None
    }

    /// Indices from the root down to `index`, inclusive
    pub fn path_from_root(&self, index: usize) -> Vec<usize> {
        let mut path = Vec::with_capacity(MAX_LEVELS);
        let mut cursor = self.nodes.get(index).map(|_| index);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.nodes[current].parent;
        }
        path.reverse();
        path
    }

    /// Ids of the endpoints of an edge
    pub fn edge_ids(&self, edge: &Edge) -> (&str, &str) {
        (&self.nodes[edge.parent].id, &self.nodes[edge.child].id)
    }

    /// Whether every node has a position
    pub fn is_laid_out(&self) -> bool {
        self.nodes.iter().all(|n| n.position.is_some())
    }

    /// Bounding box of all positioned station rectangles
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        for node in &self.nodes {
            if let Some(p) = node.position {
                let (w, h) = node.size();
                bounds.include_rect(p, w, h);
            }
        }
        bounds
    }

    /// Apply a layout result to every node at once
    ///
    /// Fails without touching any position if the result was computed for a
    /// different generation of the graph.
    pub fn apply_layout(&mut self, layout: &LayoutResult) -> NavResult<()> {
        if layout.generation != self.generation {
            return Err(NavError::StaleLayout {
                expected: self.generation,
                found: layout.generation,
            });
        }
        for node in &mut self.nodes {
            node.position = layout.positions.get(&node.id).copied();
        }
        Ok(())
    }
}

fn summarize_attributes(node: &SourceNode) -> Vec<String> {
    node.attributes
        .iter()
        .take(SUMMARY_ATTRIBUTES)
        .map(|(key, value)| {
            let value: String = value.chars().take(SUMMARY_VALUE_CHARS).collect();
            format!("{key}={value}")
        })
        .collect()
}
