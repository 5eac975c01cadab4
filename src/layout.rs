//! Force-directed layout for the bounded graph
//!
//! Each run seeds stations on horizontal bands by depth, runs a fixed
//! number of simulation steps (all-pairs repulsion, Hooke springs along
//! edges, a pull toward each depth band), snaps every station onto its band
//! and finally resolves collisions. The whole run is synchronous and
//! deterministic: identical graphs and canvas sizes give identical output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collision::{
    CollisionConfig, CollisionReport, identity_key, resolve_collisions, tie_break_direction,
};
use crate::geometry::{Point, station_size};
use crate::graph::BoundedGraph;

/// Fewest simulation steps a run may be configured with
pub const MIN_ITERATIONS: usize = 100;

/// Most simulation steps a run may be configured with
pub const MAX_ITERATIONS: usize = 200;

/// Smallest allowed spacing between depth bands
pub const MIN_LEVEL_SPACING: f32 = 120.0;

/// Smallest allowed distance between two stations
pub const MIN_NODE_DISTANCE: f32 = 80.0;

/// Below this distance repulsion uses the tie-break direction
const MIN_SEPARATION: f32 = 0.1;

/// Horizontal margin added to a station's width when seeding a band
const SEED_MARGIN: f32 = 20.0;

/// Fraction of the canvas width a band is spread over when seeding
const SEED_SPREAD: f32 = 0.8;

/// Configuration for the force simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Repulsion constant (force = repulsion / distance²)
    pub repulsion: f32,
    /// Spring constant along edges (force = spring · distance)
    pub spring: f32,
    /// Velocity damping applied every step
    pub damping: f32,
    /// Simulation steps per run
    pub iterations: usize,
    /// Vertical distance between depth bands
    pub level_spacing: f32,
    /// y coordinate of the root band
    pub level_offset: f32,
    /// Strength of the pull toward a node's depth band
    pub level_pull: f32,
    /// Largest distance a node may travel in one step
    pub max_step: f32,
    /// Node count above which children are grouped under their parent
    pub grouping_threshold: usize,
    /// Horizontal pull of children toward their parent
    pub grouping_strength: f32,
    pub collision: CollisionConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 5000.0,
            spring: 0.1,
            damping: 0.85,
            iterations: 150,
            level_spacing: 120.0,
            level_offset: 100.0,
            level_pull: 0.3,
            max_step: 60.0,
            grouping_threshold: 50,
            grouping_strength: 0.5,
            collision: CollisionConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Force values into the ranges the layout guarantees depend on
    pub fn sanitized(mut self) -> Self {
        self.iterations = self.iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        self.level_spacing =
            finite_or(self.level_spacing, MIN_LEVEL_SPACING).max(MIN_LEVEL_SPACING);
        self.collision.min_distance =
            finite_or(self.collision.min_distance, MIN_NODE_DISTANCE).max(MIN_NODE_DISTANCE);
        self.collision.max_iterations = self.collision.max_iterations.max(1);
        self.damping = finite_or(self.damping, 0.85).clamp(0.0, 0.99);
        self.max_step = finite_or(self.max_step, 60.0).max(1.0);
        self.level_offset = finite_or(self.level_offset, 100.0);
        self.repulsion = finite_or(self.repulsion, 5000.0).max(0.0);
        self.spring = finite_or(self.spring, 0.1).max(0.0);
        self.level_pull = finite_or(self.level_pull, 0.3).clamp(0.0, 1.0);
        self.grouping_strength = finite_or(self.grouping_strength, 0.5).clamp(0.0, 1.0);
        self
    }

    /// y coordinate of the band for `depth`
    pub fn band_y(&self, depth: u8) -> f32 {
        f32::from(depth) * self.level_spacing + self.level_offset
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// One node as seen by the layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub depth: u8,
    pub parent: Option<usize>,
    /// Descendants inside the bounded graph
    pub descendants: usize,
}

/// Snapshot of a graph's structure taken when a layout is requested
///
/// Owning its data lets a request outlive the graph it was taken from;
/// the generation tag is what stops its result from being applied to a
/// newer graph.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRequest {
    pub generation: u64,
    pub nodes: Vec<LayoutNode>,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl LayoutRequest {
    pub fn from_graph(graph: &BoundedGraph, canvas_width: f32, canvas_height: f32) -> Self {
        let mut nodes: Vec<LayoutNode> = graph
            .nodes()
            .iter()
            .map(|n| LayoutNode {
                id: n.id.clone(),
                depth: n.depth,
                parent: n.parent,
                descendants: 0,
            })
            .collect();

        // Parents precede their children in the arena
        for index in (0..nodes.len()).rev() {
            if let Some(parent) = nodes[index].parent {
                nodes[parent].descendants += nodes[index].descendants + 1;
            }
        }

        Self {
            generation: graph.generation(),
            nodes,
            canvas_width: finite_or(canvas_width, 0.0).max(1.0),
            canvas_height: finite_or(canvas_height, 0.0).max(1.0),
        }
    }
}

/// Positions produced by one layout run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutResult {
    /// Generation of the graph this layout was computed for
    pub generation: u64,
    pub positions: HashMap<String, Point>,
    /// Simulation steps run
    pub iterations: usize,
    pub collisions: CollisionReport,
}

impl LayoutResult {
    pub fn empty(generation: u64) -> Self {
        Self {
            generation,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Computes station positions
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `graph` for a canvas of the given size
    pub fn compute_layout(
        &self,
        graph: &BoundedGraph,
        canvas_width: f32,
        canvas_height: f32,
    ) -> LayoutResult {
        self.run(&LayoutRequest::from_graph(graph, canvas_width, canvas_height))
    }

    /// Run a full layout for a request
    pub fn run(&self, request: &LayoutRequest) -> LayoutResult {
        if request.nodes.is_empty() {
            return LayoutResult::empty(request.generation);
        }

        let seeded = self.seed_positions(request);
        let mut simulation = Simulation::new(&self.config, request, seeded.clone());
        simulation.run(self.config.iterations);

        let mut positions = simulation.into_positions();
        if positions.iter().any(|p| !p.is_finite()) {
            warn!(
                generation = request.generation,
                "simulation diverged, falling back to seeded positions"
            );
            positions = seeded;
        }
        self.align_levels(request, &mut positions);

        let keys: Vec<u64> = request.nodes.iter().map(|n| identity_key(&n.id)).collect();
        let collisions = resolve_collisions(&mut positions, &keys, &self.config.collision);

        debug!(
            generation = request.generation,
            nodes = request.nodes.len(),
            iterations = self.config.iterations,
            residual_overlaps = collisions.residual_overlaps,
            "layout computed"
        );

        LayoutResult {
            generation: request.generation,
            positions: request
                .nodes
                .iter()
                .map(|n| n.id.clone())
                .zip(positions)
                .collect(),
            iterations: self.config.iterations,
            collisions,
        }
    }

    /// Place nodes on their depth bands, spreading each band across the
    /// canvas in proportion to subtree size
    fn seed_positions(&self, request: &LayoutRequest) -> Vec<Point> {
        let mut positions = vec![Point::ORIGIN; request.nodes.len()];
        let width = request.canvas_width;

        let mut bands: Vec<Vec<usize>> = Vec::new();
        for (index, node) in request.nodes.iter().enumerate() {
            let depth = usize::from(node.depth);
            if bands.len() <= depth {
                bands.resize_with(depth + 1, Vec::new);
            }
            bands[depth].push(index);
        }

        for (depth, band) in bands.iter().enumerate() {
            let y = self.config.band_y(depth as u8);
            match band.as_slice() {
                [] => {}
                [only] => positions[*only] = Point::new(width / 2.0, y),
                _ => {
                    let (station_width, _) = station_size(depth as u8);
                    let min_spacing = station_width + SEED_MARGIN;
                    let weights: Vec<f32> = band
                        .iter()
                        .map(|&i| (request.nodes[i].descendants + 1) as f32)
                        .collect();
                    let total_weight: f32 = weights.iter().sum();
                    let available = (width * SEED_SPREAD).max(band.len() as f32 * min_spacing);

                    let mut cursor = (width - available) / 2.0;
                    for (&index, weight) in band.iter().zip(weights) {
                        let space = (weight / total_weight * available).max(min_spacing);
                        positions[index] = Point::new(cursor + space / 2.0, y);
                        cursor += space;
                    }
                }
            }
        }

        positions
    }

    /// Snap every node onto its depth band
    fn align_levels(&self, request: &LayoutRequest, positions: &mut [Point]) {
        for (node, position) in request.nodes.iter().zip(positions.iter_mut()) {
            position.y = self.config.band_y(node.depth);
        }
    }
}

/// Double-buffered force simulation state
struct Simulation<'a> {
    config: &'a LayoutConfig,
    request: &'a LayoutRequest,
    keys: Vec<u64>,
    bands: Vec<f32>,
    current: Vec<Point>,
    next: Vec<Point>,
    velocity: Vec<Point>,
    force: Vec<Point>,
    grouping: bool,
}

impl<'a> Simulation<'a> {
    fn new(config: &'a LayoutConfig, request: &'a LayoutRequest, seeded: Vec<Point>) -> Self {
        let n = seeded.len();
        Self {
            config,
            request,
            keys: request.nodes.iter().map(|node| identity_key(&node.id)).collect(),
            bands: request.nodes.iter().map(|node| config.band_y(node.depth)).collect(),
            next: seeded.clone(),
            current: seeded,
            velocity: vec![Point::ORIGIN; n],
            force: vec![Point::ORIGIN; n],
            grouping: n > config.grouping_threshold,
        }
    }

    fn run(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.step();
        }
    }

    /// One step: forces are read from `current`, results go to `next`
    fn step(&mut self) {
        self.force.iter_mut().for_each(|f| *f = Point::ORIGIN);

        self.apply_repulsion();
        self.apply_attraction();
        if self.grouping {
            self.apply_grouping();
        }
        self.apply_level_constraint();
        self.integrate();

        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Coulomb-style repulsion between every pair of nodes
    fn apply_repulsion(&mut self) {
        let n = self.current.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.current[j] - self.current[i];
                let dist = delta.length();

                let (direction, dist) = if dist > MIN_SEPARATION {
                    (delta / dist, dist)
                } else {
                    (tie_break_direction(self.keys[i], self.keys[j]), 1.0)
                };
                let push = direction * (self.config.repulsion / (dist * dist));

                self.force[i] -= push;
                self.force[j] += push;
            }
        }
    }

    /// Hooke springs pulling each child toward its parent
    fn apply_attraction(&mut self) {
        for (child, node) in self.request.nodes.iter().enumerate() {
            let Some(parent) = node.parent else {
                continue;
            };
            let pull = (self.current[child] - self.current[parent]) * self.config.spring;

            self.force[parent] += pull;
            self.force[child] -= pull;
        }
    }

    /// Horizontal pull of children toward their parent's column
    fn apply_grouping(&mut self) {
        for (child, node) in self.request.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                let dx = self.current[parent].x - self.current[child].x;
                self.force[child].x += dx * self.config.grouping_strength;
            }
        }
    }

    /// Pull toward the band for each node's depth
    fn apply_level_constraint(&mut self) {
        for (i, band) in self.bands.iter().enumerate() {
            self.force[i].y += (band - self.current[i].y) * self.config.level_pull;
        }
    }

    fn integrate(&mut self) {
        for i in 0..self.current.len() {
            let mut velocity = (self.velocity[i] + self.force[i]) * self.config.damping;
            let speed = velocity.length();
            if speed > self.config.max_step {
                velocity = velocity * (self.config.max_step / speed);
            }
            self.velocity[i] = velocity;
            self.next[i] = self.current[i] + velocity;
        }
    }

    fn into_positions(self) -> Vec<Point> {
        self.current
    }
}
