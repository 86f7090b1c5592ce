//! Editing-session bookkeeping around a workspace's graph.
//!
//! Every node and edge carries a [`RowState`] so a save can be split into
//! create, update and delete batches for the persistence layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::ir::{Edge, FamilyGraph, Node, Position};
use crate::layout::{self, FamilyLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Original,
    Added,
    Edited,
    Deleted,
}

/// The document exchanged with the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(flatten)]
    pub graph: FamilyGraph,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet<T> {
    pub added: Vec<T>,
    pub updated: Vec<T>,
    pub deleted: Vec<String>,
}

impl<T> ChangeSet<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TrackedWorkspace {
    workspace_id: Option<String>,
    graph: FamilyGraph,
    node_states: BTreeMap<String, RowState>,
    edge_states: BTreeMap<String, RowState>,
}

impl TrackedWorkspace {
    /// Starts a session from freshly loaded data; every row is `Original`.
    pub fn from_snapshot(snapshot: WorkspaceSnapshot) -> Self {
        let node_states = snapshot
            .graph
            .nodes
            .iter()
            .map(|node| (node.id.clone(), RowState::Original))
            .collect();
        let edge_states = snapshot
            .graph
            .edges
            .iter()
            .map(|edge| (edge.id.clone(), RowState::Original))
            .collect();
        Self {
            workspace_id: snapshot.workspace_id,
            graph: snapshot.graph,
            node_states,
            edge_states,
        }
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            workspace_id: self.workspace_id.clone(),
            graph: self.graph.clone(),
        }
    }

    pub fn graph(&self) -> &FamilyGraph {
        &self.graph
    }

    pub fn node_state(&self, id: &str) -> Option<RowState> {
        self.node_states.get(id).copied()
    }

    pub fn edge_state(&self, id: &str) -> Option<RowState> {
        self.edge_states.get(id).copied()
    }

    pub fn add_node(&mut self, node: Node) {
        self.node_states.insert(node.id.clone(), RowState::Added);
        self.graph.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edge_states.insert(edge.id.clone(), RowState::Added);
        self.graph.edges.push(edge);
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(index) = self.graph.nodes.iter().position(|node| node.id == id) else {
            return false;
        };
        self.graph.nodes.remove(index);
        forget_or_delete(&mut self.node_states, id);

        let incident: Vec<String> = self
            .graph
            .edges
            .iter()
            .filter(|edge| edge.source == id || edge.target == id)
            .map(|edge| edge.id.clone())
            .collect();
        for edge_id in incident {
            self.remove_edge(&edge_id);
        }
        true
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let Some(index) = self.graph.edges.iter().position(|edge| edge.id == id) else {
            return false;
        };
        self.graph.edges.remove(index);
        forget_or_delete(&mut self.edge_states, id);
        true
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        let Some(node) = self.graph.nodes.iter_mut().find(|node| node.id == id) else {
            return false;
        };
        node.position = position;
        mark_edited(&mut self.node_states, id);
        true
    }

    /// Runs the family layout and moves every node it reaches. Nodes whose
    /// position actually changes become `Edited` (unless they are new).
    /// Returns the layout that was applied.
    pub fn auto_format(&mut self, config: &LayoutConfig) -> layout::Result<FamilyLayout> {
        let computed = layout::compute_layout(&self.graph, config)?;
        let mut moved = 0usize;
        for node in &mut self.graph.nodes {
            let Some(&position) = computed.positions.get(&node.id) else {
                continue;
            };
            if node.position != position {
                node.position = position;
                mark_edited(&mut self.node_states, &node.id);
                moved += 1;
            }
        }
        tracing::debug!(moved, "applied auto-format positions");
        Ok(computed)
    }

    pub fn node_changes(&self) -> ChangeSet<Node> {
        collect_changes(&self.graph.nodes, &self.node_states, |node| &node.id)
    }

    pub fn edge_changes(&self) -> ChangeSet<Edge> {
        collect_changes(&self.graph.edges, &self.edge_states, |edge| &edge.id)
    }
}

fn forget_or_delete(states: &mut BTreeMap<String, RowState>, id: &str) {
    if states.get(id) == Some(&RowState::Added) {
        states.remove(id);
    } else {
        states.insert(id.to_string(), RowState::Deleted);
    }
}

fn mark_edited(states: &mut BTreeMap<String, RowState>, id: &str) {
    if states.get(id) != Some(&RowState::Added) {
        states.insert(id.to_string(), RowState::Edited);
    }
}

fn collect_changes<T: Clone>(
    rows: &[T],
    states: &BTreeMap<String, RowState>,
    id_of: impl Fn(&T) -> &String,
) -> ChangeSet<T> {
    let with_state = |wanted: RowState| -> Vec<T> {
        rows.iter()
            .filter(|row| states.get(id_of(row)) == Some(&wanted))
            .cloned()
            .collect()
    };
    ChangeSet {
        added: with_state(RowState::Added),
        updated: with_state(RowState::Edited),
        deleted: states
            .iter()
            .filter(|(_, state)| **state == RowState::Deleted)
            .map(|(id, _)| id.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeKind;

    fn loaded() -> TrackedWorkspace {
        let mut graph = FamilyGraph::new();
        graph
            .add_person("p1")
            .add_person("p2")
            .add_union("u1")
            .marry("p1", "p2", "u1");
        TrackedWorkspace::from_snapshot(WorkspaceSnapshot {
            workspace_id: Some("ws".to_string()),
            graph,
        })
    }

    fn person(id: &str) -> Node {
        Node {
            id: id.to_string(),
            kind: NodeKind::Person,
            person_id: None,
            position: Position::default(),
        }
    }

    #[test]
    fn loaded_rows_have_no_changes() {
        let workspace = loaded();
        assert_eq!(workspace.node_state("p1"), Some(RowState::Original));
        assert!(workspace.node_changes().is_empty());
        assert!(workspace.edge_changes().is_empty());
    }

    #[test]
    fn auto_format_marks_moved_nodes_edited() {
        let mut workspace = loaded();
        workspace.add_node(person("p3"));
        let applied = workspace.auto_format(&LayoutConfig::default()).unwrap();
        assert!(applied.diagnostics.is_empty());
        assert_eq!(applied.positions["p3"], workspace.graph().node("p3").unwrap().position);

        let changes = workspace.node_changes();
        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.added[0].id, "p3");
        let updated: Vec<&str> = changes.updated.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(updated, vec!["p1", "p2", "u1"]);
        assert_eq!(
            workspace.graph().node("u1").unwrap().position,
            Position::new(264.0, 290.0)
        );
    }

    #[test]
    fn second_auto_format_moves_nothing() {
        let mut workspace = loaded();
        workspace.auto_format(&LayoutConfig::default()).unwrap();
        let reloaded = TrackedWorkspace::from_snapshot(workspace.snapshot());
        let mut again = reloaded.clone();
        again.auto_format(&LayoutConfig::default()).unwrap();
        assert!(again.node_changes().is_empty());
        assert_eq!(again.graph(), reloaded.graph());
    }

    #[test]
    fn removing_a_node_drops_its_edges() {
        let mut workspace = loaded();
        assert!(workspace.remove_node("p2"));
        let nodes = workspace.node_changes();
        assert_eq!(nodes.deleted, vec!["p2".to_string()]);
        let edges = workspace.edge_changes();
        assert_eq!(edges.deleted.len(), 1);
        assert_eq!(workspace.graph().edges.len(), 1);
        assert!(!workspace.remove_node("p2"));
    }

    #[test]
    fn removing_an_added_row_forgets_it() {
        let mut workspace = loaded();
        workspace.add_node(person("temp"));
        workspace.remove_node("temp");
        assert_eq!(workspace.node_state("temp"), None);
        assert!(workspace.node_changes().is_empty());
    }

    #[test]
    fn moving_an_added_node_keeps_it_added() {
        let mut workspace = loaded();
        workspace.add_node(person("new"));
        workspace.move_node("new", Position::new(1.0, 1.0));
        workspace.move_node("p1", Position::new(2.0, 2.0));
        assert_eq!(workspace.node_state("new"), Some(RowState::Added));
        assert_eq!(workspace.node_state("p1"), Some(RowState::Edited));
    }

    #[test]
    fn snapshot_json_round_trips_through_front_end_names() {
        let json = r#"{
            "workspaceId": "w1",
            "nodes": [{"id": "a", "type": "peopleNode", "position": {"x": 0, "y": 50}}],
            "edges": []
        }"#;
        let snapshot: WorkspaceSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.workspace_id.as_deref(), Some("w1"));
        assert_eq!(snapshot.graph.nodes.len(), 1);
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["nodes"][0]["type"], "peopleNode");
        assert_eq!(value["workspaceId"], "w1");
    }
}
