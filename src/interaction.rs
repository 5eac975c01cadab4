//! Pointer and wheel handling
//!
//! Every handler takes the current transform and returns the next one in
//! constant time (fit-to-view and hit testing are linear in node count).
//! Nothing here touches the graph.

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, CanvasSize, Point};
use crate::graph::GraphNode;
use crate::viewport::ViewTransform;

/// Interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Zoom factor applied per wheel notch
    pub wheel_step: f32,
    /// Screen pixels kept free around content when fitting to view
    pub fit_margin: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            wheel_step: 1.15,
            fit_margin: 40.0,
        }
    }
}

impl InteractionConfig {
    pub fn sanitized(mut self) -> Self {
        if !self.wheel_step.is_finite() || self.wheel_step <= 1.0 {
            self.wheel_step = 1.15;
        }
        if !self.fit_margin.is_finite() || self.fit_margin < 0.0 {
            self.fit_margin = 0.0;
        }
        self
    }
}

/// Turns input into transform updates
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    config: InteractionConfig,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Zoom by `notches` wheel steps (positive zooms in) around `cursor`
    ///
    /// The world point under the cursor stays under the cursor unless the
    /// zoom bounds stop the change.
    pub fn on_wheel(
        &self,
        notches: f32,
        cursor: Point,
        transform: ViewTransform,
        canvas: CanvasSize,
    ) -> ViewTransform {
        if !notches.is_finite() || notches == 0.0 {
            return transform;
        }
        let target = transform.zoom() * self.config.wheel_step.powf(notches);
        zoom_about(transform, target, cursor, canvas)
    }

    /// Pan by a screen-space drag
    ///
    /// Dragging moves the content with the pointer, so the centre moves the
    /// opposite way by `delta / zoom` world units.
    pub fn on_drag(&self, delta: Point, transform: ViewTransform) -> ViewTransform {
        if !delta.is_finite() {
            return transform;
        }
        transform.with_center(transform.center - delta / transform.zoom())
    }

    /// Transform that fits every positioned station inside the canvas
    ///
    /// Zoom is clamped into bounds, so very large or very small content
    /// gets the closest fit the bounds allow. With nothing positioned the
    /// default transform is returned.
    pub fn fit_to_view(&self, all_nodes: &[GraphNode], canvas: CanvasSize) -> ViewTransform {
        let mut bounds = BoundingBox::empty();
        for node in all_nodes {
            if let Some(p) = node.position {
                let (w, h) = node.size();
                bounds.include_rect(p, w, h);
            }
        }
        self.fit_bounds(&bounds, canvas)
    }

    /// Transform that fits `bounds` inside the canvas
    pub fn fit_bounds(&self, bounds: &BoundingBox, canvas: CanvasSize) -> ViewTransform {
        if bounds.is_empty() {
            return ViewTransform::default();
        }

        let available_width = (canvas.width - 2.0 * self.config.fit_margin).max(1.0);
        let available_height = (canvas.height - 2.0 * self.config.fit_margin).max(1.0);
        let zoom = (available_width / bounds.width()).min(available_height / bounds.height());

        ViewTransform::new(zoom, bounds.center())
    }
}

/// Zoom to `target` keeping the world point under `anchor` fixed on screen
pub fn zoom_about(
    transform: ViewTransform,
    target: f32,
    anchor: Point,
    canvas: CanvasSize,
) -> ViewTransform {
    let anchor_world = transform.screen_to_world(anchor, canvas);
    let zoomed = transform.with_zoom(target);
    let offset = (anchor - canvas.center()) / zoomed.zoom();
    zoomed.with_center(anchor_world - offset)
}

/// Topmost station whose rectangle contains the screen point
pub fn hit_test(
    all_nodes: &[GraphNode],
    candidates: &[usize],
    screen: Point,
    transform: &ViewTransform,
    canvas: CanvasSize,
) -> Option<usize> {
    let world = transform.screen_to_world(screen, canvas);
    candidates
        .iter()
        .rev()
        .copied()
        .find(|&index| all_nodes[index].rect().is_some_and(|rect| rect.contains(world)))
}
