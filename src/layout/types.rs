use crate::error::DegenerateTopologyWarning;
use crate::ir::{DiagramKind, Graph, Position};
use serde::Serialize;

/// Index of a node in the input's node collection.
pub type NodeIndex = usize;

/// Level per node, indexed by [`NodeIndex`]. Built once per layout call and dropped after.
pub type LevelAssignment = Vec<usize>;

/// Result of the breadth-first walk over the ingested graph.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Nodes seeded at level 0, in insertion order.
    pub roots: Vec<NodeIndex>,
    pub levels: LevelAssignment,
    /// The node whose outgoing edge first reached each node; `None` for roots.
    pub parents: Vec<Option<NodeIndex>>,
    /// Nodes in the order the walk discovered them. Levels never decrease along it.
    pub order: Vec<NodeIndex>,
    pub warnings: Vec<DegenerateTopologyWarning>,
}

impl Topology {
    pub fn level(&self, node: NodeIndex) -> usize {
        self.levels.get(node).copied().unwrap_or(0)
    }

    pub fn max_level(&self) -> usize {
        self.levels.iter().copied().max().unwrap_or(0)
    }

    /// Discovery order grouped into one bucket per level.
    pub fn bands(&self) -> Vec<Vec<NodeIndex>> {
        let mut bands: Vec<Vec<NodeIndex>> = vec![Vec::new(); self.max_level() + 1];
        for &node in &self.order {
            bands[self.level(node)].push(node);
        }
        bands
    }
}

/// Arena-style position table filled in by a placer, keyed by [`NodeIndex`].
#[derive(Debug, Clone)]
pub struct PositionTable {
    slots: Vec<Option<Position>>,
}

impl PositionTable {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn set(&mut self, node: NodeIndex, position: Position) {
        if let Some(slot) = self.slots.get_mut(node) {
            *slot = Some(position);
        }
    }

    pub fn get(&self, node: NodeIndex) -> Option<Position> {
        self.slots.get(node).copied().flatten()
    }

    pub fn x(&self, node: NodeIndex) -> Option<f32> {
        self.get(node).map(|p| p.x)
    }
}

/// A laid-out graph and the notes the engine collected on the way.
#[derive(Debug, Clone)]
pub struct Layout {
    pub kind: DiagramKind,
    /// Same node and edge identities as the input, with updated positions.
    pub graph: Graph,
    pub warnings: Vec<DegenerateTopologyWarning>,
    /// Level used for each node, in node order. Empty for a no-op layout.
    pub levels: Vec<usize>,
    /// One entry per decision node, in walk order. Always empty for mind maps.
    pub decisions: Vec<DecisionSummary>,
}

/// Where a decision's branches went and where they met again, by node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionSummary {
    pub decision: String,
    pub yes: Option<String>,
    pub no: Option<String>,
    pub merge: Option<String>,
}
