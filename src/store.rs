//! The editor's graph state, seen from the layout engine.
//!
//! Editing operations and layout never interleave: a layout reads the graph
//! once, computes, and writes the result back once.

use crate::config::LayoutConfig;
use crate::error::{DegenerateTopologyWarning, LayoutError};
use crate::ir::{DiagramKind, Graph};
use crate::layout::compute_layout;

pub trait GraphStore {
    fn get_graph(&self) -> Graph;
    fn set_graph(&mut self, graph: Graph);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    graph: Graph,
}

impl MemoryStore {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Applies an editing function (see [`crate::edit`]) to the stored graph.
    pub fn update(&mut self, edit: impl FnOnce(&Graph) -> Graph) {
        self.graph = edit(&self.graph);
    }
}

impl GraphStore for MemoryStore {
    fn get_graph(&self) -> Graph {
        self.graph.clone()
    }

    fn set_graph(&mut self, graph: Graph) {
        self.graph = graph;
    }
}

/// Lays out the store's graph in place.
///
/// On error the store is left holding the graph it had before the call.
pub fn apply_layout<S: GraphStore + ?Sized>(
    store: &mut S,
    kind: DiagramKind,
    config: &LayoutConfig,
) -> Result<Vec<DegenerateTopologyWarning>, LayoutError> {
    let graph = store.get_graph();
    let layout = compute_layout(&graph, kind, config)?;
    store.set_graph(layout.graph);
    Ok(layout.warnings)
}
