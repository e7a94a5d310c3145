use crate::error::DegenerateTopologyWarning;
use crate::ir::SourceSide;
use crate::layout::{DecisionSummary, Layout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub decisions: Vec<DecisionSummary>,
    pub warnings: Vec<DegenerateTopologyWarning>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub level: Option<usize>,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    pub source_side: Option<SourceSide>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .graph
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| NodeDump {
                id: node.id.clone(),
                kind: node.kind.clone(),
                level: layout.levels.get(idx).copied(),
                x: node.position.map(|p| p.x),
                y: node.position.map(|p| p.y),
            })
            .collect();

        let edges = layout
            .graph
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                label: edge.branch_label.clone(),
                source_side: edge.source_side(),
            })
            .collect();

        LayoutDump {
            kind: format!("{:?}", layout.kind),
            nodes,
            edges,
            decisions: layout.decisions.clone(),
            warnings: layout.warnings.clone(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
