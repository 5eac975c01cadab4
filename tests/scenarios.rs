//! End-to-end behaviour of the navigator on small, hand-built documents

use metronav::collision::identity_key;
use metronav::interaction::zoom_about;
use metronav::selection::highlighted;
use metronav::{
    BoundingBox, CanvasSize, CollisionConfig, DetailLevel, HostUpdate, InteractionController,
    InteractionEvent, LayoutEngine, MAX_LEVELS, MAX_ZOOM, MIN_ZOOM, Navigator, NavigatorConfig,
    Point, SourceNode, ViewState, ViewTransform, detail_level, extract_bounded,
    resolve_collisions, to_graph, visible_nodes,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `root -> a -> b -> c -> d`
fn chain() -> SourceNode {
    SourceNode::new("/root", "root").with_child(
        SourceNode::new("/root/a", "a").with_child(
            SourceNode::new("/root/a/b", "b").with_child(
                SourceNode::new("/root/a/b/c", "c")
                    .with_child(SourceNode::new("/root/a/b/c/d", "d")),
            ),
        ),
    )
}

/// Root with `branches` children, each with `leaves` children
fn wide_tree(branches: usize, leaves: usize) -> SourceNode {
    let mut root = SourceNode::new("/w", "w");
    for b in 0..branches {
        let mut branch = SourceNode::new(format!("/w/b{b}"), format!("branch{b}"));
        for l in 0..leaves {
            branch = branch.with_child(SourceNode::new(format!("/w/b{b}/l{l}"), "leaf"));
        }
        root = root.with_child(branch);
    }
    root
}

fn ids(node: &SourceNode, out: &mut Vec<String>) {
    out.push(node.id.clone());
    for child in &node.children {
        ids(child, out);
    }
}

#[test]
fn four_level_chain_extracts_three_levels() {
    init_tracing();
    let bounded = extract_bounded(Some(&chain()), MAX_LEVELS).unwrap();

    let mut extracted = Vec::new();
    ids(&bounded, &mut extracted);
    insta::assert_debug_snapshot!(extracted, @r#"
    [
        "/root",
        "/root/a",
        "/root/a/b",
    ]
    "#);

    let graph = to_graph(Some(&bounded));
    assert_eq!(graph.len(), 3);
    assert!(graph.node("/root/a/b/c").is_none());
    assert!(graph.node("/root/a/b/c/d").is_none());
    assert_eq!(graph.node("/root/a/b").unwrap().child_count, 0);
}

#[test]
fn siblings_forty_apart_end_at_least_eighty_apart() {
    init_tracing();
    let mut positions = vec![Point::new(380.0, 220.0), Point::new(420.0, 220.0)];
    let keys = vec![identity_key("/root/a"), identity_key("/root/b")];

    resolve_collisions(&mut positions, &keys, &CollisionConfig::default());

    assert!(positions[0].distance(positions[1]) >= 80.0 - 0.01);
    assert_eq!(positions[0].y, 220.0);
    assert_eq!(positions[1].y, 220.0);
}

#[test]
fn selection_highlights_only_the_root_path() {
    init_tracing();
    let mut nav = Navigator::default();
    nav.rebuild(Some(&chain()));
    nav.tick();

    nav.push_event(InteractionEvent::Select {
        id: "/root/a/b".to_string(),
    });
    let updates = nav.tick();
    assert!(matches!(
        updates.as_slice(),
        [HostUpdate::SelectionChanged(changed)] if changed.node_id == "/root/a/b"
    ));

    let graph = nav.graph();
    let (nodes, edges) = highlighted(graph);
    let names: Vec<_> = nodes.iter().map(|&i| graph.nodes()[i].label.as_str()).collect();
    assert_eq!(names, vec!["root", "a", "b"]);
    assert_eq!(edges.len(), 2);

    nav.push_event(InteractionEvent::Select {
        id: "/root".to_string(),
    });
    nav.tick();

    let graph = nav.graph();
    let (nodes, edges) = highlighted(graph);
    let names: Vec<_> = nodes.iter().map(|&i| graph.nodes()[i].label.as_str()).collect();
    assert_eq!(names, vec!["root"]);
    assert!(edges.is_empty());
}

#[test]
fn wheel_zoom_toward_ten_clamps_to_four() {
    init_tracing();
    let canvas = CanvasSize::new(800.0, 600.0);
    let cursor = Point::new(200.0, 150.0);

    let direct = zoom_about(ViewTransform::default(), 10.0, cursor, canvas);
    assert_eq!(direct.zoom(), MAX_ZOOM);

    let controller = InteractionController::default();
    let wheeled = controller.on_wheel(17.0, cursor, ViewTransform::default(), canvas);
    assert_eq!(wheeled.zoom(), MAX_ZOOM);

    let mut nav = Navigator::default();
    nav.set_transform(10.0, Point::ORIGIN);
    assert_eq!(nav.transform().zoom(), MAX_ZOOM);
}

#[test]
fn fit_to_view_on_large_content_zooms_out() {
    init_tracing();
    let bounds = BoundingBox {
        min_x: -1000.0,
        max_x: 1000.0,
        min_y: -750.0,
        max_y: 750.0,
    };

    let fitted =
        InteractionController::default().fit_bounds(&bounds, CanvasSize::new(800.0, 600.0));

    assert!(fitted.zoom() <= 0.4);
    assert!((MIN_ZOOM..=MAX_ZOOM).contains(&fitted.zoom()));
    assert_eq!(fitted.center, Point::ORIGIN);
}

#[test]
fn fit_to_view_event_shows_every_station() {
    init_tracing();
    let mut nav = Navigator::default();
    nav.rebuild(Some(&wide_tree(4, 3)));

    nav.push_event(InteractionEvent::FitToView);
    nav.tick();

    let transform = nav.transform();
    let view = transform.world_rect(nav.canvas());
    let bounds = nav.graph().bounds();
    if transform.zoom() > MIN_ZOOM {
        assert!(view.covers(&bounds), "{view:?} should cover {bounds:?}");
    }
}

#[test]
fn large_graphs_are_virtualized() {
    init_tracing();
    // 1 + 10 + 120 stations
    let mut nav = Navigator::default();
    nav.rebuild(Some(&wide_tree(10, 12)));
    let graph = nav.graph();
    assert_eq!(graph.len(), 131);

    let canvas = nav.canvas();
    let root = graph.root().unwrap().position.unwrap();
    let close_up = ViewTransform::new(MAX_ZOOM, root);
    assert!(!close_up.world_rect(canvas).expanded(50.0).covers(&graph.bounds()));

    let visible = visible_nodes(graph.nodes(), &close_up, canvas, 200.0);
    assert!(!visible.is_empty());
    assert!(visible.len() < graph.len());
    assert!(visible.contains(&0));
}

#[test]
fn small_graphs_are_never_virtualized() {
    init_tracing();
    let mut nav = Navigator::default();
    nav.rebuild(Some(&wide_tree(9, 10)));
    let graph = nav.graph();
    assert_eq!(graph.len(), 100);

    let far_away = ViewTransform::new(MAX_ZOOM, Point::new(1.0e6, 1.0e6));
    let visible = visible_nodes(graph.nodes(), &far_away, nav.canvas(), 0.0);

    assert_eq!(visible.len(), graph.len());
}

#[test]
fn detail_tiers_at_the_zoom_bounds() {
    assert_eq!(detail_level(0.25), DetailLevel::Simplified);
    assert_eq!(detail_level(1.0), DetailLevel::Normal);
    assert_eq!(detail_level(4.0), DetailLevel::Detailed);
}

#[test]
fn view_state_survives_a_session() {
    init_tracing();
    let mut nav = Navigator::default();
    nav.rebuild(Some(&chain()));
    nav.set_view_state(ViewState {
        zoom: 2.0,
        center_x: 10.5,
        center_y: -20.0,
    });

    let json = nav.get_view_state().to_json().unwrap();
    insta::assert_snapshot!(json, @r#"{"zoom":2.0,"center_x":10.5,"center_y":-20.0}"#);

    let mut restored = Navigator::default();
    restored.set_view_state(ViewState::from_json(&json).unwrap());
    assert_eq!(restored.transform(), nav.transform());
}

#[test]
fn stale_layouts_never_reach_the_new_graph() {
    init_tracing();
    let mut nav = Navigator::default();
    nav.rebuild(Some(&chain()));
    let in_flight = nav.layout_request();

    nav.rebuild(Some(&wide_tree(2, 2)));
    let stale = LayoutEngine::default().run(&in_flight);

    assert!(!nav.apply_layout(stale));
    assert!(nav.graph().node("/root").is_none());
    assert!(nav.graph().is_laid_out());

    let fresh = LayoutEngine::default().run(&nav.layout_request());
    assert!(nav.apply_layout(fresh));
}

#[test]
fn oversized_graphs_are_processed_with_an_advisory() {
    init_tracing();
    let mut nav = Navigator::new(NavigatorConfig::default(), CanvasSize::new(1280.0, 720.0));
    nav.rebuild(Some(&wide_tree(20, 25)));

    assert_eq!(nav.graph().len(), 521);
    assert!(nav.graph().is_laid_out());
    assert!(nav
        .tick()
        .contains(&HostUpdate::PerformanceAdvisory { node_count: 521 }));
}

#[test]
fn malformed_source_degrades_to_an_empty_frame() {
    init_tracing();
    let mut nav = Navigator::default();
    nav.rebuild_from_json(r#"{ "id": "/doc", "children": 7 }"#);

    let frame = nav.frame();
    assert_eq!(frame.total_stations, 0);
    assert!(frame.stations.is_empty());
    assert!(frame.connections.is_empty());
}

#[test]
fn source_json_from_the_host_is_laid_out() {
    init_tracing();
    let json = r#"{
        "id": "/html",
        "name": "html",
        "line": 1,
        "children": [
            { "id": "/html/head", "name": "head", "line": 2 },
            {
                "id": "/html/body",
                "name": "body",
                "attributes": { "class": "main" },
                "line": 5,
                "children": [{ "id": "/html/body/div", "name": "div", "line": 6 }]
            }
        ]
    }"#;
    let mut nav = Navigator::default();
    nav.rebuild_from_json(json);

    assert_eq!(nav.graph().len(), 4);
    assert_eq!(nav.sync_with_editor("/html/body/div/span").as_deref(), Some("/html/body/div"));
    assert_eq!(nav.graph().node("/html/body").unwrap().attribute_summary, vec!["class=main"]);
}
