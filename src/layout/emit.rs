use super::flowchart::EdgeAnnotation;
use super::types::PositionTable;
use crate::ir::Graph;

/// Copies the input graph and writes the computed positions onto it.
///
/// Node and edge order, ids and payloads are carried over as-is; only
/// `position` changes, plus the side hint and fallback label of annotated
/// edges. A node the placer skipped keeps its previous position.
pub(crate) fn emit_graph(
    input: &Graph,
    positions: &PositionTable,
    annotations: Option<&[Option<EdgeAnnotation>]>,
) -> Graph {
    let mut output = input.clone();
    for (idx, node) in output.nodes.iter_mut().enumerate() {
        if let Some(position) = positions.get(idx) {
            node.position = Some(position);
        }
    }
    if let Some(annotations) = annotations {
        for (edge, annotation) in output.edges.iter_mut().zip(annotations) {
            let Some(annotation) = annotation else {
                continue;
            };
            edge.set_source_side(annotation.source_side);
            if let Some(label) = &annotation.label {
                edge.branch_label = Some(label.clone());
            }
        }
    }
    output
}
