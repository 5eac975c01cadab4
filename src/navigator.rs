//! Navigator session: the piece a host embeds
//!
//! Owns the bounded graph, the viewport and the selection. Structural
//! changes go through [`Navigator::rebuild`], which lays the new graph out
//! before returning. Input is queued with [`Navigator::push_event`] and
//! consumed once per frame by [`Navigator::tick`], which hands back the
//! updates the host has to act on. [`Navigator::frame`] gives a renderer the
//! visible, annotated stations and connections.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::NavigatorConfig;
use crate::detail::{Caption, DetailLevel};
use crate::error::NavResult;
use crate::geometry::{CanvasSize, Point};
use crate::graph::{BoundedGraph, MAX_LEVELS, extract_bounded, to_graph};
use crate::interaction::{InteractionController, hit_test, zoom_about};
use crate::layout::{LayoutEngine, LayoutRequest, LayoutResult};
use crate::selection::{Selection, SelectionChanged};
use crate::source::SourceNode;
use crate::viewport::{ViewTransform, Viewport, clamp_zoom};

/// Input queued by the host, consumed in order on the next tick
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// Wheel notches (positive zooms in) at a canvas position
    Wheel { notches: f32, cursor: Point },
    /// Pointer drag by a canvas-space delta
    Drag { delta: Point },
    /// Click at a canvas position
    Click { position: Point },
    /// Double click at a canvas position; selects and asks to open
    DoubleClick { position: Point },
    /// Ask the host to open the selected station in the editor
    OpenSelected,
    /// Select a station by structural id
    Select { id: String },
    FitToView,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Resize { width: f32, height: f32 },
}

/// Something the host has to act on
#[derive(Debug, Clone, PartialEq)]
pub enum HostUpdate {
    SelectionChanged(SelectionChanged),
    TransformChanged(ViewTransform),
    /// The host should move its editor to this station
    OpenInEditor { node_id: String, line: Option<u32> },
    /// The graph is large enough that rendering may slow down
    PerformanceAdvisory { node_count: usize },
}

/// Serializable snapshot of the view, for saving between sessions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            center_x: 0.0,
            center_y: 0.0,
        }
    }
}

impl ViewState {
    pub fn from_json(json: &str) -> NavResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> NavResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<ViewTransform> for ViewState {
    fn from(transform: ViewTransform) -> Self {
        Self {
            zoom: transform.zoom(),
            center_x: transform.center.x,
            center_y: transform.center.y,
        }
    }
}

impl From<ViewState> for ViewTransform {
    fn from(state: ViewState) -> Self {
        ViewTransform::new(state.zoom, Point::new(state.center_x, state.center_y))
    }
}

/// A station ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct StationView {
    pub id: String,
    pub depth: u8,
    /// World-space centre
    pub position: Point,
    pub selected: bool,
    pub highlighted: bool,
    pub caption: Caption,
}

/// A connection ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionView {
    pub parent_id: String,
    pub child_id: String,
    pub from: Point,
    pub to: Point,
    pub highlighted: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub transform: ViewTransform,
    pub detail: DetailLevel,
    pub stations: Vec<StationView>,
    pub connections: Vec<ConnectionView>,
    /// Stations in the whole graph, visible or not
    pub total_stations: usize,
}

/// Layout, viewport and selection state for one embedded navigator
#[derive(Debug)]
pub struct Navigator {
    graph: BoundedGraph,
    generation: u64,
    layout: LayoutEngine,
    viewport: Viewport,
    interaction: InteractionController,
    selection: Selection,
    advisory_threshold: usize,
    events: VecDeque<InteractionEvent>,
    pending: Vec<HostUpdate>,
    reported_transform: ViewTransform,
    /// Set once the view has been fitted or placed by the host
    view_placed: bool,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavigatorConfig::default(), CanvasSize::default())
    }
}

impl Navigator {
    pub fn new(config: NavigatorConfig, canvas: CanvasSize) -> Self {
        let config = config.sanitized();
        let viewport = Viewport::new(canvas, config.viewport.clone());
        Self {
            graph: BoundedGraph::empty(),
            generation: 0,
            layout: LayoutEngine::new(config.layout),
            advisory_threshold: config.viewport.advisory_threshold,
            reported_transform: viewport.transform(),
            viewport,
            interaction: InteractionController::new(config.interaction),
            selection: Selection::new(),
            events: VecDeque::new(),
            pending: Vec::new(),
            view_placed: false,
        }
    }

    pub fn graph(&self) -> &BoundedGraph {
        &self.graph
    }

    pub fn transform(&self) -> ViewTransform {
        self.viewport.transform()
    }

    pub fn canvas(&self) -> CanvasSize {
        self.viewport.canvas()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    /// Replace the graph after a structural change in the source document
    ///
    /// Blocks until the new graph is fully laid out. Any layout computed
    /// for an earlier graph can no longer be applied. The first non-empty
    /// graph is fitted into the canvas unless the host already placed the
    /// view; later rebuilds keep the user's view.
    pub fn rebuild(&mut self, source: Option<&SourceNode>) {
        self.generation += 1;
        let bounded = extract_bounded(source, MAX_LEVELS);
        self.graph = to_graph(bounded.as_ref()).with_generation(self.generation);

        let result = self.layout.run(&self.layout_request());
        self.apply_layout(result);

        let node_count = self.graph.len();
        info!(
            generation = self.generation,
            nodes = node_count,
            "navigator graph rebuilt"
        );
        if node_count > self.advisory_threshold {
            warn!(nodes = node_count, "large graph, rendering may slow down");
            self.pending.push(HostUpdate::PerformanceAdvisory { node_count });
        }

        if !self.view_placed && !self.graph.is_empty() {
            let fitted = self
                .interaction
                .fit_to_view(self.graph.nodes(), self.viewport.canvas());
            self.viewport.apply(fitted);
            self.view_placed = true;
            debug!(zoom = fitted.zoom(), "fitted initial view");
        }

        if let Some(changed) = self.selection.reapply(&mut self.graph) {
            self.pending.push(HostUpdate::SelectionChanged(changed));
        }
    }

    /// Rebuild from a JSON source tree; undecodable input gives an empty graph
    pub fn rebuild_from_json(&mut self, json: &str) {
        match SourceNode::from_json(json) {
            Ok(source) => self.rebuild(Some(&source)),
            Err(err) => {
                warn!(error = %err, "malformed source tree, showing empty graph");
                self.rebuild(None);
            }
        }
    }

    /// Snapshot of the current graph for running a layout elsewhere
    pub fn layout_request(&self) -> LayoutRequest {
        let canvas = self.viewport.canvas();
        LayoutRequest::from_graph(&self.graph, canvas.width, canvas.height)
    }

    /// Apply a layout result; results for an older graph are discarded
    ///
    /// Returns whether the result was applied.
    pub fn apply_layout(&mut self, result: LayoutResult) -> bool {
        match self.graph.apply_layout(&result) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "discarding layout result");
                false
            }
        }
    }

    /// Queue input for the next tick
    pub fn push_event(&mut self, event: InteractionEvent) {
        self.events.push_back(event);
    }

    /// Consume queued input and return updates for the host, in order
    ///
    /// Transform changes are coalesced into at most one update per tick,
    /// reported after any selection changes.
    pub fn tick(&mut self) -> Vec<HostUpdate> {
        let mut updates = std::mem::take(&mut self.pending);

        while let Some(event) = self.events.pop_front() {
            self.handle(event, &mut updates);
        }

        let transform = self.viewport.transform();
        if transform != self.reported_transform {
            self.reported_transform = transform;
            updates.push(HostUpdate::TransformChanged(transform));
        }
        updates
    }

    /// Index of the visible station under a canvas position
    fn station_at(&self, position: Point) -> Option<usize> {
        let nodes = self.graph.nodes();
        let visible = self.viewport.visible(nodes);
        hit_test(
            nodes,
            &visible,
            position,
            &self.viewport.transform(),
            self.viewport.canvas(),
        )
    }

    fn select(&mut self, id: &str, updates: &mut Vec<HostUpdate>) {
        if let Some(changed) = self.selection.select(&mut self.graph, id) {
            updates.push(HostUpdate::SelectionChanged(changed));
        }
    }

    fn open_in_editor(&self, index: usize, updates: &mut Vec<HostUpdate>) {
        let node = &self.graph.nodes()[index];
        updates.push(HostUpdate::OpenInEditor {
            node_id: node.id.clone(),
            line: node.line,
        });
    }

    fn handle(&mut self, event: InteractionEvent, updates: &mut Vec<HostUpdate>) {
        let canvas = self.viewport.canvas();
        let transform = self.viewport.transform();
        let step = self.interaction.config().wheel_step;

        match event {
            InteractionEvent::Wheel { notches, cursor } => {
                let next = self.interaction.on_wheel(notches, cursor, transform, canvas);
                self.viewport.apply(next);
            }
            InteractionEvent::Drag { delta } => {
                self.viewport.apply(self.interaction.on_drag(delta, transform));
            }
            InteractionEvent::Click { position } => {
                if let Some(hit) = self.station_at(position) {
                    let id = self.graph.nodes()[hit].id.clone();
                    self.select(&id, updates);
                }
            }
            InteractionEvent::DoubleClick { position } => {
                if let Some(hit) = self.station_at(position) {
                    let id = self.graph.nodes()[hit].id.clone();
                    self.select(&id, updates);
                    self.open_in_editor(hit, updates);
                }
            }
            InteractionEvent::OpenSelected => {
                let selected = self.selected_id().and_then(|id| self.graph.index_of(id));
                if let Some(index) = selected {
                    self.open_in_editor(index, updates);
                }
            }
            InteractionEvent::Select { id } => self.select(&id, updates),
            InteractionEvent::FitToView => {
                let fitted = self.interaction.fit_to_view(self.graph.nodes(), canvas);
                self.viewport.apply(fitted);
            }
            InteractionEvent::ZoomIn => {
                let next = zoom_about(transform, transform.zoom() * step, canvas.center(), canvas);
                self.viewport.apply(next);
            }
            InteractionEvent::ZoomOut => {
                let next = zoom_about(transform, transform.zoom() / step, canvas.center(), canvas);
                self.viewport.apply(next);
            }
            InteractionEvent::ResetZoom => {
                self.viewport.apply(transform.with_zoom(1.0));
            }
            InteractionEvent::Resize { width, height } => {
                self.viewport.resize(CanvasSize::new(width, height));
            }
        }
    }

    /// Select the station matching the editor's cursor and centre on it
    ///
    /// No selection notification is produced since the host initiated it;
    /// the transform change is reported on the next tick. Returns the id
    /// actually selected.
    pub fn sync_with_editor(&mut self, id: &str) -> Option<String> {
        let index = self.graph.resolve(id)?;
        self.selection.select(&mut self.graph, id);

        let node = &self.graph.nodes()[index];
        if let Some(position) = node.position {
            let transform = self.viewport.transform();
            self.viewport.apply(transform.with_center(position));
        }
        debug!(requested = id, selected = %node.id, "synced with editor");
        Some(node.id.clone())
    }

    /// Hover text for the visible station under a canvas position
    pub fn tooltip_at(&self, position: Point) -> Option<String> {
        let index = self.station_at(position)?;
        Some(Caption::tooltip(&self.graph.nodes()[index]))
    }

    /// Set zoom and centre directly, clamping zoom
    pub fn set_transform(&mut self, zoom: f32, center: Point) {
        self.viewport.set_transform(zoom, center);
        self.view_placed = true;
    }

    pub fn get_view_state(&self) -> ViewState {
        self.viewport.transform().into()
    }

    pub fn set_view_state(&mut self, state: ViewState) {
        self.viewport.set_transform(
            clamp_zoom(state.zoom),
            Point::new(state.center_x, state.center_y),
        );
        self.view_placed = true;
    }

    /// Visible stations and connections for the current transform
    pub fn frame(&self) -> Frame {
        let transform = self.viewport.transform();
        let detail = transform.detail_level();
        let nodes = self.graph.nodes();
        let visible_indices = self.viewport.visible(nodes);

        let mut visible = vec![false; nodes.len()];
        let stations = visible_indices
            .iter()
            .filter_map(|&index| {
                let node = &nodes[index];
                let position = node.position?;
                visible[index] = true;
                Some(StationView {
                    id: node.id.clone(),
                    depth: node.depth,
                    position,
                    selected: node.selected,
                    highlighted: node.highlighted,
                    caption: Caption::for_node(node, detail),
                })
            })
            .collect();

        let connections = self
            .graph
            .edges()
            .iter()
            .filter(|edge| visible[edge.parent] || visible[edge.child])
            .filter_map(|edge| {
                let parent = &nodes[edge.parent];
                let child = &nodes[edge.child];
                Some(ConnectionView {
                    parent_id: parent.id.clone(),
                    child_id: child.id.clone(),
                    from: parent.position?,
                    to: child.position?,
                    highlighted: edge.highlighted,
                })
            })
            .collect();

        Frame {
            transform,
            detail,
            stations,
            connections,
            total_stations: nodes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::MAX_ZOOM;

    fn document() -> SourceNode {
        SourceNode::new("/doc", "doc")
            .with_child(
                SourceNode::new("/doc/head", "head")
                    .with_child(SourceNode::new("/doc/head/title", "title").with_line(3)),
            )
            .with_child(SourceNode::new("/doc/body", "body"))
    }

    /// Navigator over [`document`] with the initial fit already reported
    fn built() -> Navigator {
        let mut nav = Navigator::default();
        nav.rebuild(Some(&document()));
        nav.tick();
        nav
    }

    /// Root with `branches` children, each with one leaf
    fn broad(branches: usize) -> SourceNode {
        let mut root = SourceNode::new("/r", "r");
        for b in 0..branches {
            root = root.with_child(
                SourceNode::new(format!("/r/b{b}"), "branch")
                    .with_child(SourceNode::new(format!("/r/b{b}/leaf"), "leaf")),
            );
        }
        root
    }

    fn screen_of(nav: &Navigator, id: &str) -> Point {
        let world = nav.graph().node(id).unwrap().position.unwrap();
        nav.transform().world_to_screen(world, nav.canvas())
    }

    #[test]
    fn rebuild_lays_out_every_station() {
        let nav = built();
        assert_eq!(nav.graph().len(), 4);
        assert!(nav.graph().is_laid_out());
        assert_eq!(nav.graph().generation(), 1);
    }

    #[test]
    fn rebuild_with_nothing_gives_empty_graph() {
        let mut nav = built();
        nav.rebuild(None);

        assert!(nav.graph().is_empty());
        assert!(nav.frame().stations.is_empty());
    }

    #[test]
    fn malformed_json_gives_empty_graph() {
        let mut nav = built();
        nav.rebuild_from_json("{ not json");
        assert!(nav.graph().is_empty());
    }

    #[test]
    fn stale_layout_is_discarded() {
        let mut nav = built();
        let stale = nav.layout_request();
        let stale_result = LayoutEngine::default().run(&stale);

        nav.rebuild(Some(&document()));
        let before: Vec<_> = nav.graph().nodes().iter().map(|n| n.position).collect();

        assert!(!nav.apply_layout(stale_result));
        let after: Vec<_> = nav.graph().nodes().iter().map(|n| n.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn click_selects_station_and_reports_it() {
        let mut nav = built();
        let screen = screen_of(&nav, "/doc/head/title");

        nav.push_event(InteractionEvent::Click { position: screen });
        let updates = nav.tick();

        match updates.as_slice() {
            [HostUpdate::SelectionChanged(changed)] => {
                assert_eq!(changed.node_id, "/doc/head/title");
                assert_eq!(changed.line, Some(3));
            }
            other => panic!("Expected one selection update, got {other:?}"),
        }
    }

    #[test]
    fn clicking_empty_space_keeps_selection() {
        let mut nav = built();
        nav.push_event(InteractionEvent::Select {
            id: "/doc/body".to_string(),
        });
        nav.tick();

        nav.push_event(InteractionEvent::Click {
            position: Point::new(-5000.0, -5000.0),
        });

        assert!(nav.tick().is_empty());
        assert_eq!(nav.selected_id(), Some("/doc/body"));
    }

    #[test]
    fn transform_changes_are_coalesced_per_tick() {
        let mut nav = built();
        nav.push_event(InteractionEvent::Drag {
            delta: Point::new(10.0, 0.0),
        });
        nav.push_event(InteractionEvent::Drag {
            delta: Point::new(10.0, 0.0),
        });
        nav.push_event(InteractionEvent::ZoomIn);

        let updates = nav.tick();

        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0], HostUpdate::TransformChanged(_)));
        assert!(nav.tick().is_empty());
    }

    #[test]
    fn events_are_processed_in_order() {
        let mut nav = built();
        nav.push_event(InteractionEvent::Select {
            id: "/doc/head".to_string(),
        });
        nav.push_event(InteractionEvent::ZoomOut);
        nav.push_event(InteractionEvent::Select {
            id: "/doc/body".to_string(),
        });

        let updates = nav.tick();
        let selected: Vec<_> = updates
            .iter()
            .filter_map(|u| match u {
                HostUpdate::SelectionChanged(c) => Some(c.node_id.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(selected, vec!["/doc/head", "/doc/body"]);
        assert!(matches!(updates.last(), Some(HostUpdate::TransformChanged(_))));
    }

    #[test]
    fn zoom_keys_step_and_reset() {
        let mut nav = built();
        for _ in 0..40 {
            nav.push_event(InteractionEvent::ZoomIn);
        }
        nav.tick();
        assert_eq!(nav.transform().zoom(), MAX_ZOOM);

        nav.push_event(InteractionEvent::ResetZoom);
        nav.tick();
        assert_eq!(nav.transform().zoom(), 1.0);
    }

    #[test]
    fn sync_with_editor_centres_on_resolved_station() {
        let mut nav = built();
        nav.set_transform(1.0, Point::ORIGIN);
        nav.tick();
        let head = nav.graph().node("/doc/head").unwrap().position.unwrap();

        let selected = nav.sync_with_editor("/doc/head/meta/charset");

        assert_eq!(selected.as_deref(), Some("/doc/head"));
        assert_eq!(nav.transform().center, head);
        let updates = nav.tick();
        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0], HostUpdate::TransformChanged(_)));
    }

    #[test]
    fn selection_survives_rebuild() {
        let mut nav = built();
        nav.sync_with_editor("/doc/head/title");

        let smaller =
            SourceNode::new("/doc", "doc").with_child(SourceNode::new("/doc/head", "head"));
        nav.rebuild(Some(&smaller));

        assert_eq!(nav.selected_id(), Some("/doc/head"));
        let updates = nav.tick();
        assert!(updates.iter().any(|u| matches!(
            u,
            HostUpdate::SelectionChanged(c) if c.node_id == "/doc/head"
        )));
    }

    #[test]
    fn oversized_graph_raises_advisory() {
        let mut config = NavigatorConfig::default();
        config.viewport.advisory_threshold = 3;
        let mut nav = Navigator::new(config, CanvasSize::default());

        nav.rebuild(Some(&document()));

        assert!(nav.tick().contains(&HostUpdate::PerformanceAdvisory { node_count: 4 }));
        assert_eq!(nav.graph().len(), 4);
    }

    #[test]
    fn view_state_roundtrip_and_clamp() {
        let mut nav = built();
        nav.set_view_state(ViewState {
            zoom: 1.75,
            center_x: 120.5,
            center_y: -33.25,
        });
        let state = nav.get_view_state();
        let restored = ViewState::from_json(&state.to_json().unwrap()).unwrap();

        assert!((restored.zoom - 1.75).abs() <= 0.01);
        assert!((restored.center_x - 120.5).abs() <= 0.01);
        assert!((restored.center_y + 33.25).abs() <= 0.01);

        nav.set_view_state(ViewState {
            zoom: 99.0,
            ..state
        });
        assert_eq!(nav.get_view_state().zoom, MAX_ZOOM);
    }

    #[test]
    fn frame_annotates_highlighted_path() {
        let mut nav = built();
        nav.push_event(InteractionEvent::Select {
            id: "/doc/head/title".to_string(),
        });
        nav.push_event(InteractionEvent::ResetZoom);
        nav.tick();

        let frame = nav.frame();
        let highlighted: Vec<_> = frame
            .stations
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.id.as_str())
            .collect();

        assert_eq!(frame.total_stations, 4);
        assert_eq!(frame.stations.len(), 4);
        assert_eq!(frame.connections.len(), 3);
        assert_eq!(highlighted, vec!["/doc", "/doc/head", "/doc/head/title"]);
        assert_eq!(frame.connections.iter().filter(|c| c.highlighted).count(), 2);
        assert_eq!(frame.detail, DetailLevel::Normal);
    }

    #[test]
    fn first_rebuild_fits_every_station_into_view() {
        let canvas = CanvasSize::new(2560.0, 1440.0);
        let mut nav = Navigator::new(NavigatorConfig::default(), canvas);
        nav.rebuild(Some(&broad(60)));
        assert_eq!(nav.graph().len(), 121);

        let fitted = InteractionController::default().fit_to_view(nav.graph().nodes(), canvas);
        assert_eq!(nav.transform(), fitted);

        let frame = nav.frame();
        assert_eq!(frame.total_stations, 121);
        assert_eq!(frame.stations.len(), 121);
        assert!(nav.tick().contains(&HostUpdate::TransformChanged(fitted)));
    }

    #[test]
    fn later_rebuilds_keep_the_view() {
        let mut nav = built();
        nav.set_transform(2.0, Point::new(5.0, 5.0));

        nav.rebuild(Some(&broad(3)));

        assert_eq!(nav.transform(), ViewTransform::new(2.0, Point::new(5.0, 5.0)));
    }

    #[test]
    fn restored_view_is_not_refitted() {
        let mut nav = Navigator::default();
        nav.set_view_state(ViewState {
            zoom: 0.5,
            center_x: -40.0,
            center_y: 12.0,
        });

        nav.rebuild(Some(&document()));

        assert_eq!(nav.transform(), ViewTransform::new(0.5, Point::new(-40.0, 12.0)));
    }

    #[test]
    fn empty_rebuild_waits_for_content_before_fitting() {
        let mut nav = Navigator::default();
        nav.rebuild(None);
        assert_eq!(nav.transform(), ViewTransform::default());

        nav.rebuild(Some(&document()));
        let fitted =
            InteractionController::default().fit_to_view(nav.graph().nodes(), nav.canvas());
        assert_eq!(nav.transform(), fitted);
    }

    #[test]
    fn double_click_selects_and_opens_in_editor() {
        let mut nav = built();
        let screen = screen_of(&nav, "/doc/head/title");

        nav.push_event(InteractionEvent::DoubleClick { position: screen });
        let updates = nav.tick();

        match updates.as_slice() {
            [HostUpdate::SelectionChanged(changed), open] => {
                assert_eq!(changed.node_id, "/doc/head/title");
                assert_eq!(
                    open,
                    &HostUpdate::OpenInEditor {
                        node_id: "/doc/head/title".to_string(),
                        line: Some(3),
                    }
                );
            }
            other => panic!("Expected selection then open, got {other:?}"),
        }
    }

    #[test]
    fn double_click_on_selected_station_only_opens() {
        let mut nav = built();
        let screen = screen_of(&nav, "/doc/body");
        nav.push_event(InteractionEvent::Click { position: screen });
        nav.tick();

        nav.push_event(InteractionEvent::DoubleClick { position: screen });

        assert_eq!(
            nav.tick(),
            vec![HostUpdate::OpenInEditor {
                node_id: "/doc/body".to_string(),
                line: None,
            }]
        );
    }

    #[test]
    fn double_click_on_empty_space_does_nothing() {
        let mut nav = built();
        nav.push_event(InteractionEvent::DoubleClick {
            position: Point::new(-5000.0, -5000.0),
        });

        assert!(nav.tick().is_empty());
        assert_eq!(nav.selected_id(), None);
    }

    #[test]
    fn open_selected_needs_a_selection() {
        let mut nav = built();
        nav.push_event(InteractionEvent::OpenSelected);
        assert!(nav.tick().is_empty());

        nav.sync_with_editor("/doc/head/title");
        nav.push_event(InteractionEvent::OpenSelected);
        let updates = nav.tick();

        assert!(updates.contains(&HostUpdate::OpenInEditor {
            node_id: "/doc/head/title".to_string(),
            line: Some(3),
        }));
    }

    #[test]
    fn tooltip_follows_the_pointer() {
        let nav = built();
        let screen = screen_of(&nav, "/doc/head");

        assert_eq!(nav.tooltip_at(screen).as_deref(), Some("head\n\nChildren: 1"));
        assert_eq!(nav.tooltip_at(Point::new(-5000.0, -5000.0)), None);
    }
}
