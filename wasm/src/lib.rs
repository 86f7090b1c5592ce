use family_tree_layout::config::parse_config;
use family_tree_layout::{LayoutConfig, TrackedWorkspace, WorkspaceSnapshot};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormatResponse {
    #[serde(flatten)]
    snapshot: WorkspaceSnapshot,
    diagnostics: Vec<family_tree_layout::Diagnostic>,
    changed_node_ids: Vec<String>,
}

fn format_workspace(snapshot_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let config = match options_json {
        Some(raw) => parse_config(raw).map_err(|error| format!("{error:#}"))?,
        None => LayoutConfig::default(),
    };
    let snapshot: WorkspaceSnapshot =
        serde_json::from_str(snapshot_json).map_err(|error| error.to_string())?;
    let mut workspace = TrackedWorkspace::from_snapshot(snapshot);
    let diagnostics = workspace
        .auto_format(&config)
        .map_err(|error| error.to_string())?
        .diagnostics;
    let changed_node_ids = workspace
        .node_changes()
        .updated
        .into_iter()
        .map(|node| node.id)
        .collect();
    let response = FormatResponse {
        snapshot: workspace.snapshot(),
        diagnostics,
        changed_node_ids,
    };
    serde_json::to_string(&response).map_err(|error| error.to_string())
}

/// Auto-formats a workspace snapshot and returns it as JSON together with
/// the ids of the nodes that moved.
#[wasm_bindgen]
pub fn layout_workspace_json(
    snapshot_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    format_workspace(snapshot_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::format_workspace;

    const TREE: &str = r#"{
        "nodes": [
            {"id": "dad", "type": "peopleNode"},
            {"id": "mum", "type": "peopleNode"},
            {"id": "heart", "type": "familyNode"},
            {"id": "kid", "type": "peopleNode"}
        ],
        "edges": [
            {"id": "e1", "source": "dad", "sourceHandle": "b", "target": "heart"},
            {"id": "e2", "source": "mum", "sourceHandle": "a", "target": "heart"},
            {"id": "e3", "source": "heart", "sourceHandle": "c", "target": "kid"}
        ]
    }"#;

    #[test]
    fn formats_snapshot_and_lists_moved_nodes() {
        let json = format_workspace(TREE, None).expect("tree should format");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"][3]["position"]["x"], 450.0);
        assert_eq!(value["nodes"][3]["position"]["y"], 200.0);
        assert_eq!(value["changedNodeIds"].as_array().unwrap().len(), 4);
        assert!(value["diagnostics"].as_array().unwrap().is_empty());
    }

    #[test]
    fn honours_spacing_options() {
        let json = format_workspace(TREE, Some(r#"{"spacingX": 100}"#)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"][3]["position"]["x"], 300.0);
    }

    #[test]
    fn reports_malformed_graphs() {
        let broken = TREE.replace("\"target\": \"kid\"", "\"target\": \"ghost\"");
        let error = format_workspace(&broken, None).unwrap_err();
        assert!(error.contains("ghost"));
    }
}
