pub mod config;
pub mod edit;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod store;
pub mod templates;
pub mod tree;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{FlowchartConfig, LayoutConfig, MindmapConfig, load_config, parse_config};
pub use error::{DegenerateTopologyWarning, LayoutError, MalformedGraphError};
pub use ir::{DiagramKind, Graph, GraphEdge, GraphNode, Position, SourceSide};
pub use layout::{Layout, compute_layout, layout_hierarchical, layout_radial};
pub use store::{GraphStore, MemoryStore, apply_layout};
pub use tree::{MindMapTree, TreeNode, graph_to_tree, tree_to_graph};
