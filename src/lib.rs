//! metronav - Layout and virtualization engine for metro-style document navigation.
//!
//! A source document tree is cut down to at most three levels and drawn as a
//! metro map: each level is a horizontal line and every element is a
//! station. The crate lays stations out with a force simulation followed by
//! a collision pass, limits drawing to what the viewport can show, picks a
//! level of detail from the zoom factor, and highlights the root path of the
//! selected station.
//!
//! [`Navigator`] ties the pieces together for an embedding host. The
//! component modules can also be used on their own.

pub mod collision;
pub mod config;
pub mod detail;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod navigator;
pub mod selection;
pub mod source;
pub mod viewport;

pub use collision::{CollisionConfig, CollisionReport, resolve_collisions};
pub use config::NavigatorConfig;
pub use detail::{Caption, DetailLevel, detail_level};
pub use error::{NavError, NavResult};
pub use geometry::{BoundingBox, CanvasSize, Point};
pub use graph::{BoundedGraph, Edge, GraphNode, MAX_LEVELS, extract_bounded, to_graph};
pub use interaction::{InteractionConfig, InteractionController};
pub use layout::{LayoutConfig, LayoutEngine, LayoutRequest, LayoutResult};
pub use navigator::{
    ConnectionView, Frame, HostUpdate, InteractionEvent, Navigator, StationView, ViewState,
};
pub use selection::{Selection, SelectionChanged};
pub use source::SourceNode;
pub use viewport::{MAX_ZOOM, MIN_ZOOM, ViewTransform, Viewport, ViewportConfig, visible_nodes};
