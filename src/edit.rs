//! Editing operations on a [`Graph`].
//!
//! Every function takes the current graph and returns a new one, so an editor
//! can keep the previous value for undo or for rejecting a failed layout.

use std::collections::{HashSet, VecDeque};

use serde_json::{Value, json};

use crate::error::{Endpoint, MalformedGraphError};
use crate::ir::{Graph, GraphEdge, GraphNode, Position};

/// Smallest `node_<n>` id not used in `graph`.
pub fn fresh_node_id(graph: &Graph) -> String {
    let taken: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    (1..)
        .map(|n| format!("node_{n}"))
        .find(|id| !taken.contains(id.as_str()))
        .unwrap_or_default()
}

/// `base`, or `base-<n>` for the smallest `n >= 2` that `taken` rejects.
pub(crate) fn unused_id(base: String, taken: impl Fn(&str) -> bool) -> String {
    if !taken(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let id = format!("{base}-{n}");
        if !taken(&id) {
            return id;
        }
        n += 1;
    }
}

fn fresh_edge_id(graph: &Graph, base: String) -> String {
    let taken: HashSet<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
    unused_id(base, |id| taken.contains(id))
}

fn require_node(graph: &Graph, edge: &str, id: &str, endpoint: Endpoint) -> Result<(), MalformedGraphError> {
    if graph.contains_node(id) {
        Ok(())
    } else {
        Err(MalformedGraphError::DanglingEdge {
            edge: edge.to_string(),
            endpoint,
            node: id.to_string(),
        })
    }
}

pub fn add_node(graph: &Graph, kind: &str, label: &str, position: Option<Position>) -> Graph {
    let mut next = graph.clone();
    let mut node = GraphNode::new(fresh_node_id(graph), kind, json!({ "label": label }));
    node.position = position;
    next.nodes.push(node);
    next
}

/// Drops the node and every edge that touches it.
pub fn remove_node(graph: &Graph, id: &str) -> Graph {
    Graph {
        nodes: graph.nodes.iter().filter(|n| n.id != id).cloned().collect(),
        edges: graph
            .edges
            .iter()
            .filter(|e| e.source != id && e.target != id)
            .cloned()
            .collect(),
    }
}

/// Connects two existing nodes with an edge id of the form `e<source>-<target>`.
pub fn add_edge(
    graph: &Graph,
    source: &str,
    target: &str,
    label: Option<&str>,
) -> Result<Graph, MalformedGraphError> {
    let id = fresh_edge_id(graph, format!("e{source}-{target}"));
    require_node(graph, &id, source, Endpoint::Source)?;
    require_node(graph, &id, target, Endpoint::Target)?;
    let mut edge = GraphEdge::new(id, source, target);
    edge.branch_label = label.map(str::to_string);
    let mut next = graph.clone();
    next.edges.push(edge);
    Ok(next)
}

pub fn remove_edge(graph: &Graph, id: &str) -> Graph {
    let mut next = graph.clone();
    next.edges.retain(|e| e.id != id);
    next
}

/// Sets `data.label`, keeping every other payload field.
pub fn update_node_label(graph: &Graph, id: &str, label: &str) -> Graph {
    let mut next = graph.clone();
    if let Some(node) = next.nodes.iter_mut().find(|n| n.id == id) {
        match &mut node.payload {
            Value::Object(fields) => {
                fields.insert("label".to_string(), Value::String(label.to_string()));
            }
            other => *other = json!({ "label": label }),
        }
    }
    next
}

pub fn update_edge_label(graph: &Graph, id: &str, label: Option<&str>) -> Graph {
    let mut next = graph.clone();
    if let Some(edge) = next.edges.iter_mut().find(|e| e.id == id) {
        edge.branch_label = label.map(str::to_string);
    }
    next
}

/// Adds a mind-map topic under `parent`, shaped like the editor's own
/// `mindMapNode` records.
pub fn add_child_node(graph: &Graph, parent: &str, label: &str) -> Result<Graph, MalformedGraphError> {
    let child_id = fresh_node_id(graph);
    let edge_id = fresh_edge_id(graph, format!("e-{parent}-{child_id}"));
    require_node(graph, &edge_id, parent, Endpoint::Source)?;
    let mut child = GraphNode::new(
        child_id.clone(),
        "mindMapNode",
        json!({ "label": label, "isRoot": false }),
    );
    child
        .extra
        .insert("dragHandle".to_string(), Value::String(".mindmap-node".to_string()));
    let mut next = graph.clone();
    next.nodes.push(child);
    next.edges.push(GraphEdge::new(edge_id, parent, child_id));
    Ok(next)
}

/// Removes a node together with everything reachable from it.
///
/// Roots (nodes without an incoming edge) are never deleted; the graph comes
/// back unchanged.
pub fn delete_subtree(graph: &Graph, id: &str) -> Graph {
    let is_root = !graph.edges.iter().any(|e| e.target == id);
    if is_root || !graph.contains_node(id) {
        return graph.clone();
    }

    let mut doomed: HashSet<&str> = HashSet::from([id]);
    let mut queue: VecDeque<&str> = VecDeque::from([id]);
    while let Some(current) = queue.pop_front() {
        for edge in graph.edges.iter().filter(|e| e.source == current) {
            if doomed.insert(edge.target.as_str()) {
                queue.push_back(edge.target.as_str());
            }
        }
    }

    Graph {
        nodes: graph
            .nodes
            .iter()
            .filter(|n| !doomed.contains(n.id.as_str()))
            .cloned()
            .collect(),
        edges: graph
            .edges
            .iter()
            .filter(|e| !doomed.contains(e.source.as_str()) && !doomed.contains(e.target.as_str()))
            .cloned()
            .collect(),
    }
}
