use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "peopleNode", alias = "person")]
    Person,
    /// Marriage or partnership ("heart") node.
    #[serde(rename = "familyNode", alias = "union")]
    Union,
}

/// Connection slot on a node.
///
/// A union receives its two partners on `A` (secondary) and `B` (anchor) and
/// emits its children from `C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    A,
    B,
    C,
}

impl Handle {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "a" => Some(Self::A),
            "b" => Some(Self::B),
            "c" => Some(Self::C),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    #[serde(default)]
    pub position: Position,
}

impl Node {
    pub fn is_person(&self) -> bool {
        self.kind == NodeKind::Person
    }

    pub fn is_union(&self) -> bool {
        self.kind == NodeKind::Union
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    #[serde(default, alias = "sourceHandler")]
    pub source_handle: Option<String>,
    pub target: String,
    #[serde(default, alias = "targetHandler")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn source_role(&self) -> Option<Handle> {
        self.source_handle.as_deref().and_then(Handle::parse)
    }
}

/// Nodes and edges of one workspace, in load order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl FamilyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn add_person(&mut self, id: &str) -> &mut Self {
        self.push_node(id, NodeKind::Person)
    }

    pub fn add_union(&mut self, id: &str) -> &mut Self {
        self.push_node(id, NodeKind::Union)
    }

    fn push_node(&mut self, id: &str, kind: NodeKind) -> &mut Self {
        self.nodes.push(Node {
            id: id.to_string(),
            kind,
            person_id: None,
            position: Position::default(),
        });
        self
    }

    pub fn connect(
        &mut self,
        source: &str,
        source_handle: Option<Handle>,
        target: &str,
    ) -> &mut Self {
        let id = format!("e{}-{}-{}", self.edges.len(), source, target);
        self.edges.push(Edge {
            id,
            source: source.to_string(),
            source_handle: source_handle.map(|handle| handle.as_str().to_string()),
            target: target.to_string(),
            target_handle: None,
        });
        self
    }

    /// Wires `anchor` into the `b` slot and `spouse` into the `a` slot of `union`.
    pub fn marry(&mut self, anchor: &str, spouse: &str, union: &str) -> &mut Self {
        self.connect(anchor, Some(Handle::B), union)
            .connect(spouse, Some(Handle::A), union)
    }

    pub fn add_child(&mut self, union: &str, child: &str) -> &mut Self {
        self.connect(union, Some(Handle::C), child)
    }

    /// Returns a copy whose nodes take their coordinates from `positions`;
    /// nodes missing from the map keep the position they already had.
    pub fn with_positions(&self, positions: &BTreeMap<String, Position>) -> Self {
        let nodes = self
            .nodes
            .iter()
            .map(|node| Node {
                position: positions.get(&node.id).copied().unwrap_or(node.position),
                ..node.clone()
            })
            .collect();
        Self {
            nodes,
            edges: self.edges.clone(),
        }
    }
}
