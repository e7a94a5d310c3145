use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::types::NodeIndex;
use crate::error::{Endpoint, MalformedGraphError};
use crate::ir::{Graph, GraphEdge, GraphNode};

/// Adjacency view over a borrowed [`Graph`].
///
/// Edge lists keep the input's edge order so repeated layouts of the same
/// input walk the graph identically.
#[derive(Debug)]
pub(crate) struct GraphIndex<'a> {
    pub nodes: &'a [GraphNode],
    pub edges: &'a [GraphEdge],
    /// Edge indices leaving each node.
    pub outgoing: Vec<Vec<usize>>,
    /// Edge indices entering each node.
    pub incoming: Vec<Vec<usize>>,
    /// `(source, target)` node indices per edge.
    pub endpoints: Vec<(NodeIndex, NodeIndex)>,
}

impl<'a> GraphIndex<'a> {
    pub fn build(graph: &'a Graph) -> Result<Self, MalformedGraphError> {
        if graph.nodes.is_empty() {
            return Err(MalformedGraphError::EmptyGraph);
        }

        let mut ids: HashMap<&str, NodeIndex> = HashMap::with_capacity(graph.nodes.len());
        for (idx, node) in graph.nodes.iter().enumerate() {
            match ids.entry(node.id.as_str()) {
                Entry::Occupied(_) => {
                    return Err(MalformedGraphError::DuplicateNodeId(node.id.clone()));
                }
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
            }
        }

        let mut edge_ids: HashMap<&str, usize> = HashMap::with_capacity(graph.edges.len());
        let mut outgoing = vec![Vec::new(); graph.nodes.len()];
        let mut incoming = vec![Vec::new(); graph.nodes.len()];
        let mut endpoints = Vec::with_capacity(graph.edges.len());
        for (edge_idx, edge) in graph.edges.iter().enumerate() {
            if edge_ids.insert(edge.id.as_str(), edge_idx).is_some() {
                return Err(MalformedGraphError::DuplicateEdgeId(edge.id.clone()));
            }
            let source = lookup(&ids, edge, Endpoint::Source)?;
            let target = lookup(&ids, edge, Endpoint::Target)?;
            outgoing[source].push(edge_idx);
            incoming[target].push(edge_idx);
            endpoints.push((source, target));
        }

        Ok(Self {
            nodes: &graph.nodes,
            edges: &graph.edges,
            outgoing,
            incoming,
            endpoints,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, idx: NodeIndex) -> &'a GraphNode {
        &self.nodes[idx]
    }

    pub fn source(&self, edge_idx: usize) -> NodeIndex {
        self.endpoints[edge_idx].0
    }

    pub fn target(&self, edge_idx: usize) -> NodeIndex {
        self.endpoints[edge_idx].1
    }

    /// Targets of a node's outgoing edges, in edge order (duplicates kept).
    pub fn successors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.outgoing[idx].iter().map(|&edge| self.target(edge))
    }

    pub fn predecessors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.incoming[idx].iter().map(|&edge| self.source(edge))
    }
}

fn lookup(
    ids: &HashMap<&str, NodeIndex>,
    edge: &GraphEdge,
    endpoint: Endpoint,
) -> Result<NodeIndex, MalformedGraphError> {
    let node = match endpoint {
        Endpoint::Source => &edge.source,
        Endpoint::Target => &edge.target,
    };
    ids.get(node.as_str())
        .copied()
        .ok_or_else(|| MalformedGraphError::DanglingEdge {
            edge: edge.id.clone(),
            endpoint,
            node: node.clone(),
        })
}
