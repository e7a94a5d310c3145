mod emit;
mod flowchart;
mod ingest;
mod mindmap;
mod ranking;
pub(crate) mod types;
pub use types::{DecisionSummary, Layout, LevelAssignment, NodeIndex};

use emit::emit_graph;
use flowchart::{compute_flowchart_layout, derive_edge_annotations};
use ingest::GraphIndex;
use mindmap::compute_mindmap_layout;
use ranking::compute_topology;

use crate::config::LayoutConfig;
use crate::error::{DegenerateTopologyWarning, LayoutError};
use crate::ir::{DiagramKind, Graph};

/// Lays out `graph` with the engine that matches `kind`.
///
/// The input is never modified; the returned [`Layout`] holds a new graph
/// with the same node and edge identities.
pub fn compute_layout(
    graph: &Graph,
    kind: DiagramKind,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    match kind {
        DiagramKind::Mindmap => layout_radial(graph, config),
        DiagramKind::Flowchart => layout_hierarchical(graph, config),
    }
}

/// Mind-map layout: root at `(0, 0)`, descendants on rings of
/// `mindmap.ring_radius`.
pub fn layout_radial(graph: &Graph, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    let index = GraphIndex::build(graph)?;
    let topology = compute_topology(&index);
    let placement = compute_mindmap_layout(&index, &topology, &config.mindmap);
    let output = emit_graph(graph, &placement.positions, None);
    report(&topology.warnings);
    Ok(Layout {
        kind: DiagramKind::Mindmap,
        graph: output,
        warnings: topology.warnings,
        levels: placement.depths,
        decisions: Vec::new(),
    })
}

/// Flowchart layout: one row per level, decision branches split left/right.
///
/// An empty node list is returned unchanged.
pub fn layout_hierarchical(graph: &Graph, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    if graph.nodes.is_empty() {
        return Ok(Layout {
            kind: DiagramKind::Flowchart,
            graph: graph.clone(),
            warnings: Vec::new(),
            levels: Vec::new(),
            decisions: Vec::new(),
        });
    }
    let index = GraphIndex::build(graph)?;
    let topology = compute_topology(&index);
    let placement = compute_flowchart_layout(&index, &topology, &config.flowchart);
    let annotations = derive_edge_annotations(&index, &placement.positions, &config.flowchart);
    let output = emit_graph(graph, &placement.positions, Some(&annotations));
    let id_of = |idx: NodeIndex| index.node(idx).id.clone();
    let decisions = placement
        .decisions
        .iter()
        .map(|record| DecisionSummary {
            decision: id_of(record.decision),
            yes: record.yes.map(id_of),
            no: record.no.map(id_of),
            merge: record.merge.map(id_of),
        })
        .collect();

    let mut warnings = topology.warnings;
    warnings.extend(placement.warnings);
    report(&warnings);
    Ok(Layout {
        kind: DiagramKind::Flowchart,
        graph: output,
        warnings,
        levels: topology.levels,
        decisions,
    })
}

fn report(warnings: &[DegenerateTopologyWarning]) {
    for warning in warnings {
        log::warn!("layout may look wrong: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedGraphError;
    use crate::ir::{GraphEdge, GraphNode, Position};
    use serde_json::json;
    use std::collections::HashSet;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-3;

    fn node(id: &str, kind: &str) -> GraphNode {
        GraphNode::new(id, kind, json!({ "label": id }))
    }

    fn edge(from: &str, to: &str) -> GraphEdge {
        GraphEdge::new(format!("e{from}-{to}"), from, to)
    }

    fn pos(layout: &Layout, id: &str) -> Position {
        layout
            .graph
            .node(id)
            .and_then(|n| n.position)
            .unwrap_or_else(|| panic!("{id} has no position"))
    }

    /// A deterministic, moderately bushy flowchart with decisions and merges.
    fn sample_flowchart(size: usize, cross_edges: bool) -> Graph {
        let mut graph = Graph::new();
        for i in 0..size {
            let kind = if i % 5 == 2 { "decision" } else { "process" };
            graph.nodes.push(node(&format!("n{i}"), kind));
        }
        for i in 1..size {
            let parent = if i % 2 == 1 { (i - 1) / 2 } else { i / 3 };
            graph.edges.push(edge(&format!("n{parent}"), &format!("n{i}")));
        }
        if cross_edges {
            for i in (4..size).step_by(6) {
                graph.edges.push(GraphEdge::new(
                    format!("x{i}"),
                    format!("n{}", i - 3),
                    format!("n{i}"),
                ));
            }
        }
        graph
    }

    #[test]
    fn chain_stacks_on_one_column() {
        let graph = Graph {
            nodes: vec![node("A", "terminal"), node("B", "process"), node("C", "terminal")],
            edges: vec![edge("A", "B"), edge("B", "C")],
        };
        let mut config = LayoutConfig::default();
        config.flowchart.level_spacing = 100.0;
        let layout = layout_hierarchical(&graph, &config).unwrap();
        let cx = pos(&layout, "A").x;
        assert_eq!(pos(&layout, "A"), Position::new(cx, 0.0));
        assert_eq!(pos(&layout, "B"), Position::new(cx, 100.0));
        assert_eq!(pos(&layout, "C"), Position::new(cx, 200.0));
        assert_eq!(layout.levels, vec![0, 1, 2]);
    }

    #[test]
    fn decision_branches_diverge_and_merge() {
        let graph = Graph {
            nodes: vec![
                node("D", "decision"),
                node("Y", "process"),
                node("N", "process"),
                node("M", "process"),
            ],
            edges: vec![
                edge("D", "Y").labeled("Yes"),
                edge("D", "N").labeled("No"),
                edge("Y", "M"),
                edge("N", "M"),
            ],
        };
        let layout = layout_hierarchical(&graph, &LayoutConfig::default()).unwrap();
        let (d, y, n, m) = (
            pos(&layout, "D"),
            pos(&layout, "Y"),
            pos(&layout, "N"),
            pos(&layout, "M"),
        );
        assert!(y.x < d.x && d.x < n.x);
        assert_eq!(m.x, d.x);
        assert!(layout.warnings.is_empty());
        let sides: Vec<_> = layout.graph.edges.iter().map(|e| e.source_side()).collect();
        assert_eq!(
            sides,
            vec![
                Some(crate::ir::SourceSide::Left),
                Some(crate::ir::SourceSide::Right),
                None,
                None
            ]
        );
        assert_eq!(
            layout.decisions,
            vec![DecisionSummary {
                decision: "D".to_string(),
                yes: Some("Y".to_string()),
                no: Some("N".to_string()),
                merge: Some("M".to_string()),
            }]
        );
    }

    #[test]
    fn same_level_nodes_share_a_row_and_keep_their_distance() {
        let graph = sample_flowchart(60, true);
        let config = LayoutConfig::default();
        let layout = layout_hierarchical(&graph, &config).unwrap();
        let placed: Vec<(usize, Position)> = layout
            .graph
            .nodes
            .iter()
            .zip(&layout.levels)
            .map(|(n, level)| (*level, n.position.unwrap()))
            .collect();
        for (i, (level_a, a)) in placed.iter().enumerate() {
            assert_eq!(a.y, *level_a as f32 * config.flowchart.level_spacing);
            for (level_b, b) in &placed[i + 1..] {
                if level_a == level_b {
                    assert!(
                        (a.x - b.x).abs() >= config.flowchart.sibling_spacing - 0.01,
                        "overlap at level {level_a}: {} vs {}",
                        a.x,
                        b.x
                    );
                }
            }
        }
    }

    #[test]
    fn tree_levels_never_decrease_along_edges() {
        let graph = sample_flowchart(40, false);
        let layout = layout_hierarchical(&graph, &LayoutConfig::default()).unwrap();
        let level_of = |id: &str| {
            let idx = graph.nodes.iter().position(|n| n.id == id).unwrap();
            layout.levels[idx]
        };
        for e in &graph.edges {
            assert!(level_of(&e.target) >= level_of(&e.source));
        }
    }

    #[test]
    fn radial_star_spreads_children_on_first_ring() {
        let graph = Graph {
            nodes: vec![
                node("root", "topic"),
                node("a", "topic"),
                node("b", "topic"),
                node("c", "topic"),
                node("d", "topic"),
            ],
            edges: vec![edge("root", "a"), edge("root", "b"), edge("root", "c"), edge("root", "d")],
        };
        let config = LayoutConfig::default();
        let layout = layout_radial(&graph, &config).unwrap();
        assert_eq!(pos(&layout, "root"), Position::ORIGIN);

        let mut angles = Vec::new();
        for id in ["a", "b", "c", "d"] {
            let p = pos(&layout, id);
            let radius = (p.x * p.x + p.y * p.y).sqrt();
            assert!((radius - config.mindmap.ring_radius).abs() < EPS);
            angles.push(p.y.atan2(p.x));
        }
        let distinct: HashSet<u32> = angles.iter().map(|a| a.to_bits()).collect();
        assert_eq!(distinct.len(), 4);
        // Nothing sits inside the excluded wedge below the root.
        let half = config.mindmap.top_exclusion_angle / 2.0;
        for angle in angles {
            assert!((angle - PI / 2.0).abs() > half - EPS);
        }
    }

    #[test]
    fn radial_grandchildren_sit_on_the_second_ring() {
        let graph = Graph {
            nodes: vec![node("r", "topic"), node("a", "topic"), node("a1", "topic")],
            edges: vec![edge("r", "a"), edge("a", "a1")],
        };
        let config = LayoutConfig::default();
        let layout = layout_radial(&graph, &config).unwrap();
        let a = pos(&layout, "a");
        let a1 = pos(&layout, "a1");
        assert!((a1.x - 2.0 * a.x).abs() < EPS);
        assert!((a1.y - 2.0 * a.y).abs() < EPS);
        assert_eq!(layout.levels, vec![0, 1, 2]);
    }

    #[test]
    fn extra_roots_join_the_first_ring() {
        let graph = Graph {
            nodes: vec![node("r", "topic"), node("orphan", "topic"), node("a", "topic")],
            edges: vec![edge("r", "a")],
        };
        let config = LayoutConfig::default();
        let layout = layout_radial(&graph, &config).unwrap();
        assert_eq!(pos(&layout, "r"), Position::ORIGIN);
        for id in ["orphan", "a"] {
            let p = pos(&layout, id);
            assert!(((p.x * p.x + p.y * p.y).sqrt() - config.mindmap.ring_radius).abs() < EPS);
        }
        assert_eq!(layout.levels, vec![0, 1, 1]);
    }

    #[test]
    fn layouts_are_deterministic() {
        let graph = sample_flowchart(50, true);
        let config = LayoutConfig::default();
        for kind in [DiagramKind::Mindmap, DiagramKind::Flowchart] {
            let first = compute_layout(&graph, kind, &config).unwrap();
            let second = compute_layout(&graph, kind, &config).unwrap();
            let bits = |layout: &Layout| -> Vec<(u32, u32)> {
                layout
                    .graph
                    .nodes
                    .iter()
                    .map(|n| {
                        let p = n.position.unwrap();
                        (p.x.to_bits(), p.y.to_bits())
                    })
                    .collect()
            };
            assert_eq!(bits(&first), bits(&second));
        }
    }

    #[test]
    fn identities_and_payloads_survive() {
        let graph = sample_flowchart(20, true);
        for kind in [DiagramKind::Mindmap, DiagramKind::Flowchart] {
            let layout = compute_layout(&graph, kind, &LayoutConfig::default()).unwrap();
            assert_eq!(layout.graph.nodes.len(), graph.nodes.len());
            assert_eq!(layout.graph.edges.len(), graph.edges.len());
            for (before, after) in graph.nodes.iter().zip(&layout.graph.nodes) {
                assert_eq!(before.id, after.id);
                assert_eq!(before.kind, after.kind);
                assert_eq!(before.payload, after.payload);
            }
            for (before, after) in graph.edges.iter().zip(&layout.graph.edges) {
                assert_eq!(before.id, after.id);
                assert_eq!(before.source, after.source);
                assert_eq!(before.target, after.target);
            }
        }
    }

    #[test]
    fn malformed_input_is_rejected_by_both_engines() {
        let graph = Graph {
            nodes: vec![node("a", "process")],
            edges: vec![edge("a", "missing")],
        };
        for kind in [DiagramKind::Mindmap, DiagramKind::Flowchart] {
            let err = compute_layout(&graph, kind, &LayoutConfig::default()).unwrap_err();
            assert!(matches!(
                err,
                LayoutError::Malformed(MalformedGraphError::DanglingEdge { .. })
            ));
        }
    }

    #[test]
    fn empty_graphs() {
        let config = LayoutConfig::default();
        let layout = layout_hierarchical(&Graph::new(), &config).unwrap();
        assert!(layout.graph.nodes.is_empty());
        assert!(matches!(
            layout_radial(&Graph::new(), &config),
            Err(LayoutError::Malformed(MalformedGraphError::EmptyGraph))
        ));
    }

    #[test]
    fn cyclic_input_degrades_with_a_warning() {
        let graph = Graph {
            nodes: vec![node("a", "process"), node("b", "process")],
            edges: vec![edge("a", "b"), edge("b", "a")],
        };
        let layout = layout_hierarchical(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(
            layout.warnings,
            vec![DegenerateTopologyWarning::NoRoot {
                fallback: "a".to_string()
            }]
        );
        assert_eq!(pos(&layout, "a").y, 0.0);
        assert_eq!(pos(&layout, "b").y, 150.0);
    }
}
