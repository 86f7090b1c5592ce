use std::collections::{HashMap, HashSet};

use super::error::Diagnostic;
use super::resolve::Resolved;

/// Index of a wrapper inside its [`WrapperForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WrapperId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpouseLink {
    pub union_id: String,
    pub spouse_id: String,
}

/// A family unit: one anchor person with every union it anchors and the
/// partner of each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    pub id: WrapperId,
    pub anchor_id: String,
    pub spouses: Vec<SpouseLink>,
    pub is_root: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WrapperForest {
    pub wrappers: Vec<Wrapper>,
    /// Every grouped node id (anchor, union, spouse) to the wrapper holding it.
    pub wrapper_of: HashMap<String, WrapperId>,
    /// Child wrappers per wrapper, indexed like `wrappers`.
    pub children: Vec<Vec<WrapperId>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl WrapperForest {
    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    pub fn get(&self, id: WrapperId) -> Option<&Wrapper> {
        self.wrappers.get(id.0)
    }

    pub fn children_of(&self, id: WrapperId) -> &[WrapperId] {
        self.children.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn wrapper_for(&self, node_id: &str) -> Option<&Wrapper> {
        self.wrapper_of.get(node_id).and_then(|id| self.get(*id))
    }

    /// Root wrappers in build order, skipping any root that also hangs below
    /// another wrapper (a parentless partner who married into the family).
    pub fn roots(&self) -> Vec<WrapperId> {
        let nested: HashSet<WrapperId> = self.children.iter().flatten().copied().collect();
        self.wrappers
            .iter()
            .filter(|wrapper| wrapper.is_root && !nested.contains(&wrapper.id))
            .map(|wrapper| wrapper.id)
            .collect()
    }
}

/// Groups unions by anchor, gives every ungrouped person its own wrapper and
/// links wrappers through the children of their unions.
pub fn build_wrappers(resolved: &Resolved<'_>) -> WrapperForest {
    let mut forest = WrapperForest::default();
    let mut anchored: HashMap<&str, WrapperId> = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for &union_id in &resolved.union_ids {
        let partnership = match resolved.partnership(union_id) {
            Ok(partnership) => partnership,
            Err(diagnostic) => {
                diagnostic.emit();
                forest.diagnostics.push(diagnostic);
                continue;
            }
        };
        visited.insert(partnership.anchor_id);
        visited.insert(partnership.spouse_id);

        let id = *anchored.entry(partnership.anchor_id).or_insert_with(|| {
            let id = WrapperId(forest.wrappers.len());
            forest.wrappers.push(Wrapper {
                id,
                anchor_id: partnership.anchor_id.to_string(),
                spouses: Vec::new(),
                is_root: !resolved.has_parents(partnership.anchor_id),
            });
            id
        });
        forest.wrappers[id.0].spouses.push(SpouseLink {
            union_id: union_id.to_string(),
            spouse_id: partnership.spouse_id.to_string(),
        });
    }

    for &person_id in &resolved.person_ids {
        if visited.contains(person_id) {
            continue;
        }
        let id = WrapperId(forest.wrappers.len());
        forest.wrappers.push(Wrapper {
            id,
            anchor_id: person_id.to_string(),
            spouses: Vec::new(),
            is_root: !resolved.has_parents(person_id),
        });
    }

    // Anchors claim their own wrapper before anyone can claim them as a spouse.
    for wrapper in &forest.wrappers {
        forest.wrapper_of.insert(wrapper.anchor_id.clone(), wrapper.id);
    }
    for wrapper in &forest.wrappers {
        for link in &wrapper.spouses {
            forest
                .wrapper_of
                .entry(link.union_id.clone())
                .or_insert(wrapper.id);
            forest
                .wrapper_of
                .entry(link.spouse_id.clone())
                .or_insert(wrapper.id);
        }
    }

    forest.children = forest
        .wrappers
        .iter()
        .map(|wrapper| {
            let mut seen: HashSet<WrapperId> = HashSet::new();
            let mut children = Vec::new();
            for link in &wrapper.spouses {
                for edge in resolved.child_edges(&link.union_id) {
                    let Some(&child) = forest.wrapper_of.get(edge.target.as_str()) else {
                        continue;
                    };
                    if child != wrapper.id && seen.insert(child) {
                        children.push(child);
                    }
                }
            }
            children
        })
        .collect();

    tracing::debug!(
        wrappers = forest.wrappers.len(),
        unresolved = forest.diagnostics.len(),
        "built family units"
    );
    forest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FamilyGraph, Handle};
    use crate::layout::resolve::resolve;

    fn build(graph: &FamilyGraph) -> WrapperForest {
        build_wrappers(&resolve(graph).unwrap())
    }

    #[test]
    fn lone_person_is_a_root_singleton() {
        let mut graph = FamilyGraph::new();
        graph.add_person("solo");
        let forest = build(&graph);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.wrappers[0].anchor_id, "solo");
        assert!(forest.wrappers[0].spouses.is_empty());
        assert!(forest.wrappers[0].is_root);
        assert_eq!(forest.roots(), vec![WrapperId(0)]);
    }

    #[test]
    fn couple_shares_one_wrapper() {
        let mut graph = FamilyGraph::new();
        graph
            .add_person("p1")
            .add_person("p2")
            .add_union("u1")
            .marry("p1", "p2", "u1");
        let forest = build(&graph);
        assert_eq!(forest.len(), 1);
        let wrapper = &forest.wrappers[0];
        assert_eq!(wrapper.anchor_id, "p1");
        assert_eq!(
            wrapper.spouses,
            vec![SpouseLink {
                union_id: "u1".to_string(),
                spouse_id: "p2".to_string(),
            }]
        );
        assert!(wrapper.is_root);
        for id in ["p1", "p2", "u1"] {
            assert_eq!(forest.wrapper_of.get(id), Some(&WrapperId(0)));
        }
    }

    #[test]
    fn unions_sharing_an_anchor_accumulate_in_edge_order() {
        let mut graph = FamilyGraph::new();
        graph
            .add_person("anchor")
            .add_person("first")
            .add_person("second")
            .add_union("u1")
            .add_union("u2")
            .marry("anchor", "first", "u1")
            .marry("anchor", "second", "u2");
        let forest = build(&graph);
        assert_eq!(forest.len(), 1);
        let spouses: Vec<&str> = forest.wrappers[0]
            .spouses
            .iter()
            .map(|link| link.spouse_id.as_str())
            .collect();
        assert_eq!(spouses, vec!["first", "second"]);
    }

    #[test]
    fn children_link_through_unions() {
        let mut graph = FamilyGraph::new();
        graph
            .add_person("mum")
            .add_person("dad")
            .add_union("u1")
            .add_person("kid1")
            .add_person("kid2")
            .marry("dad", "mum", "u1")
            .add_child("u1", "kid1")
            .add_child("u1", "kid2");
        let forest = build(&graph);
        assert_eq!(forest.len(), 3);
        let root = forest.roots();
        assert_eq!(root, vec![WrapperId(0)]);
        let kids: Vec<&str> = forest
            .children_of(WrapperId(0))
            .iter()
            .map(|id| forest.wrappers[id.0].anchor_id.as_str())
            .collect();
        assert_eq!(kids, vec!["kid1", "kid2"]);
        assert!(!forest.wrappers[1].is_root);
    }

    #[test]
    fn in_law_anchor_is_not_an_extra_root() {
        // gran+grandad -> alice; alice is the `a` partner of bob, who has no parents.
        let mut graph = FamilyGraph::new();
        graph
            .add_person("grandad")
            .add_person("gran")
            .add_union("u1")
            .add_person("alice")
            .add_person("bob")
            .add_union("u2")
            .marry("grandad", "gran", "u1")
            .add_child("u1", "alice")
            .marry("bob", "alice", "u2");
        let forest = build(&graph);
        let bob = forest.wrapper_for("bob").unwrap();
        assert!(bob.is_root);
        assert_eq!(forest.wrapper_for("alice").unwrap().id, bob.id);
        assert_eq!(forest.children_of(WrapperId(0)), &[bob.id]);
        assert_eq!(forest.roots(), vec![WrapperId(0)]);
    }

    #[test]
    fn unresolved_union_leaves_parent_as_singleton() {
        let mut graph = FamilyGraph::new();
        graph
            .add_person("p1")
            .add_union("u1")
            .connect("p1", Some(Handle::B), "u1");
        let forest = build(&graph);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.wrappers[0].anchor_id, "p1");
        assert!(forest.wrappers[0].spouses.is_empty());
        assert!(forest.wrapper_for("u1").is_none());
        assert_eq!(
            forest.diagnostics,
            vec![Diagnostic::UnresolvedUnion {
                union_id: "u1".to_string(),
                parent_count: 1,
            }]
        );
    }

    #[test]
    fn duplicate_child_edges_yield_one_child() {
        let mut graph = FamilyGraph::new();
        graph
            .add_person("p1")
            .add_person("p2")
            .add_union("u1")
            .add_person("kid")
            .marry("p1", "p2", "u1")
            .add_child("u1", "kid")
            .add_child("u1", "kid");
        let forest = build(&graph);
        assert_eq!(forest.children_of(WrapperId(0)).len(), 1);
    }
}
