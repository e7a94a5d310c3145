use std::path::Path;

use mindflow_layout::templates;
use mindflow_layout::{
    DegenerateTopologyWarning, DiagramKind, Graph, Layout, LayoutConfig, LayoutError,
    MalformedGraphError, MindMapTree, Position, SourceSide, compute_layout, tree_to_graph,
};

const EPS: f32 = 1e-3;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("fixture missing: {name}"))
}

fn layout_fixture(name: &str, kind: DiagramKind) -> Layout {
    let graph = Graph::from_json(&fixture(name)).expect("fixture parse failed");
    compute_layout(&graph, kind, &LayoutConfig::default()).expect("layout failed")
}

fn pos(layout: &Layout, id: &str) -> Position {
    layout
        .graph
        .node(id)
        .and_then(|n| n.position)
        .unwrap_or_else(|| panic!("{id} has no position"))
}

fn assert_rows_do_not_overlap(layout: &Layout, gap: f32) {
    let mut placed: Vec<Position> = layout.graph.nodes.iter().filter_map(|n| n.position).collect();
    placed.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    for pair in placed.windows(2) {
        if (pair[0].y - pair[1].y).abs() < EPS {
            assert!(
                pair[1].x - pair[0].x >= gap - 0.01,
                "nodes at {:?} and {:?} overlap",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn starter_flowchart_matches_its_authored_positions() {
    let config = LayoutConfig::default();
    let layout = compute_layout(&templates::new_flowchart(), DiagramKind::Flowchart, &config).unwrap();
    let expected = [
        ("1", 250.0, 0.0),
        ("2", 250.0, 150.0),
        ("3", 250.0, 300.0),
        ("4", 100.0, 450.0),
        ("5", 400.0, 450.0),
        ("6", 250.0, 600.0),
    ];
    for (id, x, y) in expected {
        assert_eq!(pos(&layout, id), Position::new(x, y), "node {id}");
    }
    assert!(layout.warnings.is_empty());
}

#[test]
fn every_template_lays_out_cleanly() {
    let config = LayoutConfig::default();
    for name in templates::NAMES {
        let (graph, kind) = templates::by_name(name).unwrap();
        let layout = compute_layout(&graph, kind, &config).unwrap();
        assert_eq!(layout.graph.nodes.len(), graph.nodes.len(), "{name}");
        assert!(layout.graph.nodes.iter().all(|n| n.position.is_some()), "{name}");
        if kind == DiagramKind::Flowchart {
            assert_rows_do_not_overlap(&layout, config.flowchart.sibling_spacing);
        }
    }
}

#[test]
fn process_flowchart_keeps_the_retry_loop_out_of_the_levels() {
    let layout = compute_layout(
        &templates::process_flowchart(),
        DiagramKind::Flowchart,
        &LayoutConfig::default(),
    )
    .unwrap();
    // "Handle Error" loops back to input; input must stay above it.
    assert!(pos(&layout, "2").y < pos(&layout, "5").y);
    assert!(pos(&layout, "6").x < pos(&layout, "4").x);
    assert!(pos(&layout, "5").x > pos(&layout, "4").x);
    let retry = layout.graph.edge("e5-2").unwrap();
    assert_eq!(retry.source_side(), None);
}

#[test]
fn login_flow_splits_branches_and_merges_under_the_decision() {
    let layout = layout_fixture("login_flow.json", DiagramKind::Flowchart);
    let check = pos(&layout, "check");
    assert!(pos(&layout, "home").x < check.x);
    assert!(pos(&layout, "error").x > check.x);
    assert!((pos(&layout, "audit").x - check.x).abs() < EPS);
    assert!(pos(&layout, "end").y > pos(&layout, "audit").y);

    // Stale input positions are replaced, editor extras survive.
    let start = layout.graph.node("start").unwrap();
    assert_eq!(start.position, Some(Position::new(250.0, 0.0)));
    assert_eq!(start.extra["dragHandle"], ".node");

    let to_error = layout.graph.edge("e3").unwrap();
    assert_eq!(to_error.source_side(), Some(SourceSide::Right));
    assert_eq!(to_error.branch_label.as_deref(), Some("no"));
    assert_eq!(to_error.extra["markerEnd"]["type"], "arrowclosed");
    assert_eq!(layout.graph.edge("e4").unwrap().source_side(), Some(SourceSide::Left));
}

#[test]
fn unlabeled_decision_falls_back_to_edge_order() {
    let layout = layout_fixture("unlabeled_decision.json", DiagramKind::Flowchart);
    assert!(pos(&layout, "a").x < pos(&layout, "q").x);
    assert!(pos(&layout, "b").x > pos(&layout, "q").x);
    let qa = layout.graph.edge("qa").unwrap();
    assert_eq!(qa.branch_label.as_deref(), Some("Yes"));
    assert_eq!(qa.source_side(), Some(SourceSide::Left));
    let qb = layout.graph.edge("qb").unwrap();
    assert_eq!(qb.branch_label.as_deref(), Some("No"));
    assert_eq!(
        layout.warnings,
        vec![DegenerateTopologyWarning::AmbiguousDecision {
            decision: "q".to_string()
        }]
    );
}

#[test]
fn headless_cycle_is_laid_out_with_a_warning() {
    for kind in [DiagramKind::Flowchart, DiagramKind::Mindmap] {
        let layout = layout_fixture("headless_cycle.json", kind);
        assert!(layout.graph.nodes.iter().all(|n| n.position.is_some()));
        assert_eq!(
            layout.warnings[0],
            DegenerateTopologyWarning::NoRoot {
                fallback: "plan".to_string()
            }
        );
    }
}

#[test]
fn dangling_edges_are_rejected_by_both_engines() {
    let graph = Graph::from_json(&fixture("dangling_edge.json")).unwrap();
    for kind in [DiagramKind::Flowchart, DiagramKind::Mindmap] {
        let err = compute_layout(&graph, kind, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Malformed(MalformedGraphError::DanglingEdge { .. })
        ));
    }
}

#[test]
fn stored_mind_map_tree_lays_out_on_rings() {
    let tree = MindMapTree::from_json(&fixture("mindmap_tree.json")).unwrap();
    let graph = tree_to_graph(&tree);
    let config = LayoutConfig::default();
    let layout = compute_layout(&graph, DiagramKind::Mindmap, &config).unwrap();
    let radius = config.mindmap.ring_radius;

    assert_eq!(pos(&layout, "1"), Position::ORIGIN);
    for id in ["2", "3", "4"] {
        let p = pos(&layout, id);
        assert!((p.x.hypot(p.y) - radius).abs() < EPS, "{id} off the first ring");
    }
    // Middle of three first-ring slots points straight up.
    let up = pos(&layout, "3");
    assert!(up.x.abs() < EPS && (up.y + radius).abs() < EPS);

    // A single child continues along its parent's ray.
    let only = pos(&layout, "7");
    assert!(only.x.abs() < 0.01 && (only.y + 2.0 * radius).abs() < 0.01);
    assert_eq!(layout.levels, vec![0, 1, 2, 2, 1, 2, 1]);
}

#[test]
fn layouts_are_deterministic_across_runs() {
    let graph = Graph::from_json(&fixture("login_flow.json")).unwrap();
    let first = compute_layout(&graph, DiagramKind::Flowchart, &LayoutConfig::default()).unwrap();
    for _ in 0..5 {
        let again = compute_layout(&graph, DiagramKind::Flowchart, &LayoutConfig::default()).unwrap();
        assert_eq!(again.graph, first.graph);
    }
}
