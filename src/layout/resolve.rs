use std::collections::{HashMap, HashSet};

use super::error::{Diagnostic, MalformedGraph, Result};
use crate::ir::{Edge, FamilyGraph, Handle};

/// One incoming edge seen from its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef<'a> {
    pub id: &'a str,
    pub handle: Option<Handle>,
}

/// A union whose two partners have been told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partnership<'a> {
    pub union_id: &'a str,
    pub anchor_id: &'a str,
    pub spouse_id: &'a str,
}

/// Adjacency of a validated graph, borrowed from it.
#[derive(Debug, Default)]
pub struct Resolved<'a> {
    pub parents_of: HashMap<&'a str, Vec<ParentRef<'a>>>,
    pub child_edges_of: HashMap<&'a str, Vec<&'a Edge>>,
    pub union_ids: Vec<&'a str>,
    pub person_ids: Vec<&'a str>,
    persons: HashSet<&'a str>,
}

impl<'a> Resolved<'a> {
    pub fn parents(&self, id: &str) -> &[ParentRef<'a>] {
        self.parents_of.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn child_edges(&self, id: &str) -> &[&'a Edge] {
        self.child_edges_of
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_parents(&self, id: &str) -> bool {
        !self.parents(id).is_empty()
    }

    pub fn is_person(&self, id: &str) -> bool {
        self.persons.contains(id)
    }

    /// Splits the two parents of `union_id` into anchor and spouse.
    ///
    /// The parent attached through the `b` slot is the anchor. When neither
    /// edge uses `b` the second recorded parent is taken.
    pub fn partnership(&self, union_id: &'a str) -> std::result::Result<Partnership<'a>, Diagnostic> {
        let parents = self.parents(union_id);
        let [first, second] = parents else {
            return Err(Diagnostic::UnresolvedUnion {
                union_id: union_id.to_string(),
                parent_count: parents.len(),
            });
        };
        for partner in [first, second] {
            if !self.is_person(partner.id) {
                return Err(Diagnostic::NonPersonPartner {
                    union_id: union_id.to_string(),
                    partner_id: partner.id.to_string(),
                });
            }
        }
        let (anchor, spouse) = if first.handle == Some(Handle::B) {
            (first, second)
        } else {
            (second, first)
        };
        Ok(Partnership {
            union_id,
            anchor_id: anchor.id,
            spouse_id: spouse.id,
        })
    }
}

/// Validates `graph` and indexes its edges by target and by source.
pub fn resolve(graph: &FamilyGraph) -> Result<Resolved<'_>> {
    let mut resolved = Resolved::default();
    let mut node_ids: HashSet<&str> = HashSet::with_capacity(graph.nodes.len());

    for node in &graph.nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(MalformedGraph::DuplicateNode(node.id.clone()));
        }
        resolved.parents_of.insert(node.id.as_str(), Vec::new());
        if node.is_person() {
            resolved.person_ids.push(node.id.as_str());
            resolved.persons.insert(node.id.as_str());
        } else {
            resolved.union_ids.push(node.id.as_str());
        }
    }

    let mut edge_ids: HashSet<&str> = HashSet::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        if !edge_ids.insert(edge.id.as_str()) {
            return Err(MalformedGraph::DuplicateEdge(edge.id.clone()));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                return Err(MalformedGraph::MissingEndpoint {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
        resolved
            .child_edges_of
            .entry(edge.source.as_str())
            .or_default()
            .push(edge);
        resolved
            .parents_of
            .entry(edge.target.as_str())
            .or_default()
            .push(ParentRef {
                id: edge.source.as_str(),
                handle: edge.source_role(),
            });
    }

    tracing::debug!(
        persons = resolved.person_ids.len(),
        unions = resolved.union_ids.len(),
        edges = graph.edges.len(),
        "resolved family graph"
    );
    Ok(resolved)
}
