//! The persisted mind-map shape: a root id plus a map of topics and their
//! children, converted to and from the node/edge [`Graph`] the layout uses.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::edit::unused_id;
use crate::error::LayoutError;
use crate::ir::{Graph, GraphEdge, GraphNode};

const UNTITLED: &str = "New Topic";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapTree {
    pub root_id: String,
    pub nodes: BTreeMap<String, TreeNode>,
}

impl MindMapTree {
    pub fn from_json(text: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Flattens a tree into a graph.
///
/// Nodes come out in pre-order from the root, followed by any entries the
/// root cannot reach in key order. Child ids with no entry are skipped.
/// Edge ids are `<parent>-<child>`, suffixed when that id is already taken.
pub fn tree_to_graph(tree: &MindMapTree) -> Graph {
    let mut graph = Graph::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut edge_ids: HashSet<String> = HashSet::new();

    let starts = std::iter::once(tree.root_id.as_str()).chain(tree.nodes.keys().map(String::as_str));
    for start in starts {
        if seen.contains(start) || !tree.nodes.contains_key(start) {
            continue;
        }
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(id) = stack.pop() {
            let Some(entry) = tree.nodes.get(id) else {
                continue;
            };
            graph
                .nodes
                .push(GraphNode::new(id, "topic", json!({ "label": entry.text })));
            for child in &entry.children {
                if tree.nodes.contains_key(child) {
                    let edge_id = unused_id(format!("{id}-{child}"), |taken| {
                        edge_ids.contains(taken)
                    });
                    edge_ids.insert(edge_id.clone());
                    graph.edges.push(GraphEdge::new(edge_id, id, child.as_str()));
                }
            }
            for child in entry.children.iter().rev() {
                if tree.nodes.contains_key(child) && seen.insert(child.as_str()) {
                    stack.push(child.as_str());
                }
            }
        }
    }
    graph
}

/// Rebuilds a tree from a graph. Children follow edge order.
pub fn graph_to_tree(graph: &Graph) -> Option<MindMapTree> {
    let targets: HashSet<&str> = graph.edges.iter().map(|e| e.target.as_str()).collect();
    let root = graph
        .nodes
        .iter()
        .find(|n| !targets.contains(n.id.as_str()))
        .or_else(|| graph.nodes.first())?;

    let mut nodes: BTreeMap<String, TreeNode> = graph
        .nodes
        .iter()
        .map(|node| {
            let entry = TreeNode {
                id: node.id.clone(),
                text: node.label().unwrap_or(UNTITLED).to_string(),
                children: Vec::new(),
            };
            (node.id.clone(), entry)
        })
        .collect();

    for edge in &graph.edges {
        if !nodes.contains_key(&edge.target) {
            continue;
        }
        if let Some(parent) = nodes.get_mut(&edge.source) {
            parent.children.push(edge.target.clone());
        }
    }

    Some(MindMapTree {
        root_id: root.id.clone(),
        nodes,
    })
}
