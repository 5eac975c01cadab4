//! View transform and viewport virtualization
//!
//! Pure calculation logic: the transform maps world coordinates to canvas
//! pixels, and virtualization picks the stations worth drawing for the
//! current transform. Neither ever triggers a layout.

use serde::{Deserialize, Serialize};

use crate::detail::DetailLevel;
use crate::geometry::{BoundingBox, CanvasSize, Point};
use crate::graph::GraphNode;

/// Smallest zoom factor
pub const MIN_ZOOM: f32 = 0.25;

/// Largest zoom factor
pub const MAX_ZOOM: f32 = 4.0;

/// Node count at or below which every node is visible
pub const VIRTUALIZATION_THRESHOLD: usize = 100;

/// Clamp a zoom factor into [`MIN_ZOOM`, `MAX_ZOOM`], mapping NaN to 1.0
pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        1.0
    } else {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}

/// Zoom and centre of the view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Zoom factor, always within [`MIN_ZOOM`, `MAX_ZOOM`]
    zoom: f32,
    /// World point shown at the centre of the canvas
    pub center: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            center: Point::ORIGIN,
        }
    }
}

impl ViewTransform {
    /// Create a transform, clamping zoom into bounds
    ///
    /// A non-finite centre falls back to the origin.
    pub fn new(zoom: f32, center: Point) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            center: if center.is_finite() { center } else { Point::ORIGIN },
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn with_zoom(self, zoom: f32) -> Self {
        Self::new(zoom, self.center)
    }

    pub fn with_center(self, center: Point) -> Self {
        Self::new(self.zoom, center)
    }

    /// Convert world coordinates to canvas pixels
    pub fn world_to_screen(&self, p: Point, canvas: CanvasSize) -> Point {
        (p - self.center) * self.zoom + canvas.center()
    }

    /// Convert canvas pixels to world coordinates
    pub fn screen_to_world(&self, p: Point, canvas: CanvasSize) -> Point {
        (p - canvas.center()) / self.zoom + self.center
    }

    /// World-space rectangle covered by the canvas
    pub fn world_rect(&self, canvas: CanvasSize) -> BoundingBox {
        BoundingBox::around(
            self.center,
            canvas.width / 2.0 / self.zoom,
            canvas.height / 2.0 / self.zoom,
        )
    }

    pub fn detail_level(&self) -> DetailLevel {
        DetailLevel::from_zoom(self.zoom)
    }
}

/// Virtualization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Filtering only happens above this node count
    pub virtualization_threshold: usize,
    /// Screen pixels kept around the canvas when filtering
    pub margin: f32,
    /// Node count above which a performance advisory is raised
    pub advisory_threshold: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            virtualization_threshold: VIRTUALIZATION_THRESHOLD,
            margin: 200.0,
            advisory_threshold: 500,
        }
    }
}

impl ViewportConfig {
    pub fn sanitized(mut self) -> Self {
        if !self.margin.is_finite() || self.margin < 0.0 {
            self.margin = 0.0;
        }
        self
    }
}

/// Indices of nodes inside the margin-expanded viewport
///
/// Graphs of up to [`VIRTUALIZATION_THRESHOLD`] nodes are returned whole.
/// `margin` is in screen pixels.
pub fn visible_nodes(
    all_nodes: &[GraphNode],
    transform: &ViewTransform,
    canvas: CanvasSize,
    margin: f32,
) -> Vec<usize> {
    filter_visible(all_nodes, transform, canvas, margin, VIRTUALIZATION_THRESHOLD)
}

fn filter_visible(
    all_nodes: &[GraphNode],
    transform: &ViewTransform,
    canvas: CanvasSize,
    margin: f32,
    threshold: usize,
) -> Vec<usize> {
    if all_nodes.len() <= threshold {
        return (0..all_nodes.len()).collect();
    }

    let area = transform
        .world_rect(canvas)
        .expanded(margin.max(0.0) / transform.zoom());

    all_nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.position.is_some_and(|p| area.contains(p)))
        .map(|(index, _)| index)
        .collect()
}

/// Owns the current transform and canvas size
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    transform: ViewTransform,
    canvas: CanvasSize,
    config: ViewportConfig,
}

impl Viewport {
    pub fn new(canvas: CanvasSize, config: ViewportConfig) -> Self {
        Self {
            transform: ViewTransform::default(),
            canvas,
            config: config.sanitized(),
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Store a new transform, clamping zoom
    pub fn set_transform(&mut self, zoom: f32, center: Point) {
        self.transform = ViewTransform::new(zoom, center);
    }

    pub fn apply(&mut self, transform: ViewTransform) {
        self.transform = transform;
    }

    pub fn resize(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    pub fn detail_level(&self) -> DetailLevel {
        self.transform.detail_level()
    }

    /// Indices of nodes to draw for the current transform
    pub fn visible(&self, nodes: &[GraphNode]) -> Vec<usize> {
        filter_visible(
            nodes,
            &self.transform,
            self.canvas,
            self.config.margin,
            self.config.virtualization_threshold,
        )
    }
}
