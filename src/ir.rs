use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LayoutError, MalformedGraphError};

/// Which layout engine a graph is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Mindmap,
    Flowchart,
}

impl DiagramKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "mindmap" | "mind-map" | "radial" => Some(Self::Mindmap),
            "flowchart" | "flow" | "hierarchical" => Some(Self::Flowchart),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Connector stub a renderer should draw a decision branch from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSide {
    Left,
    Right,
}

impl SourceSide {
    /// Reads a connector handle id; handles other than `left`/`right` have no side.
    pub fn from_handle(handle: &str) -> Option<Self> {
        match handle {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_handle(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "data", default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Editor fields this crate does not interpret (`dragHandle`, `style`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, payload: Value) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            payload,
            position: None,
            extra: Map::new(),
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }

    /// The `label` field of the payload, when it is a string.
    pub fn label(&self) -> Option<&str> {
        self.payload.get("label").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "label", default, skip_serializing_if = "Option::is_none")]
    pub branch_label: Option<String>,
    #[serde(
        rename = "sourceHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    /// Connector handle id as the editor stores it (`left`, `right`,
    /// `bottom`, `input-source`, ...).
    pub source_handle: Option<String>,
    /// Editor fields this crate does not interpret (`animated`, `markerEnd`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            branch_label: None,
            source_handle: None,
            extra: Map::new(),
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.branch_label = Some(label.into());
        self
    }

    pub fn from_side(mut self, side: SourceSide) -> Self {
        self.set_source_side(side);
        self
    }

    /// The left/right side encoded in the handle, if it names one.
    pub fn source_side(&self) -> Option<SourceSide> {
        self.source_handle.as_deref().and_then(SourceSide::from_handle)
    }

    pub fn set_source_side(&mut self, side: SourceSide) {
        self.source_handle = Some(side.as_handle().to_string());
    }
}

/// Nodes and edges in creation order. This is both the layout input and output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Parses a `{ "nodes": [...], "edges": [...] }` document. Both arrays must be present.
    pub fn from_json(input: &str) -> Result<Self, LayoutError> {
        let value: Value = serde_json::from_str(input)?;
        let has_arrays = value.get("nodes").is_some_and(Value::is_array)
            && value.get("edges").is_some_and(Value::is_array);
        if !has_arrays {
            return Err(MalformedGraphError::MissingCollections.into());
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
