use mindflow_layout::{DiagramKind, Graph, LayoutConfig, compute_layout, parse_config};
use wasm_bindgen::prelude::*;

/// Reads the editor's options with the same camelCase keys and checks as a
/// config file. Anything left out keeps its default.
fn build_config(options_json: Option<&str>) -> Result<LayoutConfig, String> {
    match options_json {
        Some(raw) => parse_config(raw).map_err(|err| format!("{err:#}")),
        None => Ok(LayoutConfig::default()),
    }
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Lays out a `{ nodes, edges }` document and returns it with positions filled in.
#[wasm_bindgen]
pub fn layout_graph_json(
    kind: &str,
    graph_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let kind = DiagramKind::from_token(kind)
        .ok_or_else(|| JsValue::from_str(&format!("unknown diagram kind '{kind}'")))?;
    let config = build_config(options_json.as_deref()).map_err(to_js)?;
    let graph = Graph::from_json(graph_json).map_err(to_js)?;
    let layout = compute_layout(&graph, kind, &config).map_err(to_js)?;
    layout.graph.to_json_pretty().map_err(to_js)
}
