//! Starter graphs offered when a new diagram is created.

use serde_json::{Map, Value, json};

use crate::ir::{DiagramKind, Graph, GraphEdge, GraphNode, SourceSide};

const START_GREEN: &str = "#90EE90";
const PROCESS_BLUE: &str = "#ADD8E6";
const DECISION_YELLOW: &str = "#FFFACD";
const END_PINK: &str = "#FFB6C1";
const INPUT_KHAKI: &str = "#F0E68C";
const OUTPUT_THISTLE: &str = "#D8BFD8";

fn shape(id: &str, kind: &str, label: &str, color: &str, x: f32, y: f32) -> GraphNode {
    GraphNode::new(id, kind, json!({ "label": label, "color": color })).with_position(x, y)
}

fn arrow(source: &str, target: &str) -> GraphEdge {
    let mut edge = GraphEdge::new(format!("e{source}-{target}"), source, target);
    edge.extra = Map::from_iter([
        ("animated".to_string(), Value::Bool(false)),
        ("markerEnd".to_string(), json!({ "type": "arrowclosed" })),
    ]);
    edge
}

fn yes(source: &str, target: &str) -> GraphEdge {
    arrow(source, target).labeled("Yes").from_side(SourceSide::Left)
}

fn no(source: &str, target: &str) -> GraphEdge {
    arrow(source, target).labeled("No").from_side(SourceSide::Right)
}

/// A single central topic at the origin.
pub fn new_mindmap() -> Graph {
    let mut root = GraphNode::new(
        "1",
        "mindMapNode",
        json!({ "label": "Central Idea", "isRoot": true }),
    )
    .with_position(0.0, 0.0);
    root.extra
        .insert("dragHandle".to_string(), Value::String(".mindmap-node".to_string()));
    Graph {
        nodes: vec![root],
        edges: Vec::new(),
    }
}

/// Start, one step, a Yes/No decision and an end node where both paths meet.
pub fn new_flowchart() -> Graph {
    Graph {
        nodes: vec![
            shape("1", "terminal", "Start", START_GREEN, 250.0, 0.0),
            shape("2", "process", "Process Step", PROCESS_BLUE, 250.0, 100.0),
            shape("3", "decision", "Decision?", DECISION_YELLOW, 250.0, 200.0),
            shape("4", "process", "Yes Path", PROCESS_BLUE, 100.0, 300.0),
            shape("5", "process", "No Path", PROCESS_BLUE, 400.0, 300.0),
            shape("6", "terminal", "End", END_PINK, 250.0, 400.0),
        ],
        edges: vec![
            arrow("1", "2"),
            arrow("2", "3"),
            yes("3", "4"),
            no("3", "5"),
            arrow("4", "6"),
            arrow("5", "6"),
        ],
    }
}

/// Two nested decisions whose four leaves all end at one terminal.
pub fn decision_tree() -> Graph {
    Graph {
        nodes: vec![
            shape("1", "terminal", "Start", START_GREEN, 250.0, 0.0),
            shape("2", "decision", "Decision Point 1", DECISION_YELLOW, 250.0, 100.0),
            shape("3", "process", "Option A", PROCESS_BLUE, 100.0, 200.0),
            shape("4", "process", "Option B", PROCESS_BLUE, 400.0, 200.0),
            shape("5", "decision", "Decision Point 2", DECISION_YELLOW, 100.0, 300.0),
            shape("6", "process", "Option C", PROCESS_BLUE, 0.0, 400.0),
            shape("7", "process", "Option D", PROCESS_BLUE, 200.0, 400.0),
            shape("8", "terminal", "End", END_PINK, 250.0, 500.0),
        ],
        edges: vec![
            arrow("1", "2"),
            yes("2", "3"),
            no("2", "4"),
            arrow("3", "5"),
            yes("5", "6"),
            no("5", "7"),
            arrow("4", "8"),
            arrow("6", "8"),
            arrow("7", "8"),
        ],
    }
}

/// Input, processing and validation with a retry loop back to the input step.
pub fn process_flowchart() -> Graph {
    Graph {
        nodes: vec![
            shape("1", "terminal", "Start", START_GREEN, 250.0, 0.0),
            shape("2", "input", "Get User Input", INPUT_KHAKI, 250.0, 100.0),
            shape("3", "process", "Process Data", PROCESS_BLUE, 250.0, 200.0),
            shape("4", "decision", "Valid Data?", DECISION_YELLOW, 250.0, 300.0),
            shape("5", "process", "Handle Error", END_PINK, 450.0, 400.0),
            shape("6", "output", "Display Results", OUTPUT_THISTLE, 250.0, 400.0),
            shape("7", "terminal", "End", END_PINK, 250.0, 500.0),
        ],
        edges: vec![
            arrow("1", "2"),
            arrow("2", "3"),
            arrow("3", "4"),
            no("4", "5"),
            yes("4", "6"),
            arrow("5", "2"),
            arrow("6", "7"),
        ],
    }
}

/// Looks a template up by its command-line name.
pub fn by_name(name: &str) -> Option<(Graph, DiagramKind)> {
    match name {
        "new-mindmap" => Some((new_mindmap(), DiagramKind::Mindmap)),
        "new-flowchart" => Some((new_flowchart(), DiagramKind::Flowchart)),
        "decision-tree" => Some((decision_tree(), DiagramKind::Flowchart)),
        "process-flowchart" => Some((process_flowchart(), DiagramKind::Flowchart)),
        _ => None,
    }
}

pub const NAMES: [&str; 4] = [
    "new-mindmap",
    "new-flowchart",
    "decision-tree",
    "process-flowchart",
];
