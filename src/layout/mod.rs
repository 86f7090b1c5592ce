//! Family-tree auto layout.
//!
//! The pipeline runs in four passes over a fresh snapshot of the graph:
//! resolve edges, group people into family-unit wrappers, size every
//! wrapper's subtree, then walk each root placing wrappers left to right
//! with their children stacked in bands of their subtree height.

pub mod error;
pub mod height;
pub mod position;
pub mod resolve;
pub(crate) mod types;
pub mod wrapper;

pub use error::{Diagnostic, MalformedGraph, Result};
pub use types::*;
pub use wrapper::{SpouseLink, Wrapper, WrapperForest, WrapperId};

use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::ir::{FamilyGraph, Position};
use height::compute_heights;
use position::place_wrapper;
use resolve::resolve;
use wrapper::build_wrappers;

pub fn compute_layout(graph: &FamilyGraph, config: &LayoutConfig) -> Result<FamilyLayout> {
    let resolved = resolve(graph)?;
    let mut forest = build_wrappers(&resolved);
    let mut diagnostics = std::mem::take(&mut forest.diagnostics);

    let roots = forest.roots();
    let heights = compute_heights(&roots, &forest, config);

    let mut positions = BTreeMap::new();
    let mut placed = vec![false; forest.len()];
    let mut root_y = config.origin_y;
    let mut previous_height: Option<f64> = None;
    for &root in &roots {
        let height = heights.get(&root).copied().unwrap_or(1.0);
        if let Some(previous) = previous_height {
            root_y += (previous + height) / 2.0 * config.spacing_y;
        }
        place_wrapper(
            root,
            (config.origin_x, root_y),
            &forest,
            &heights,
            config,
            &mut positions,
            &mut placed,
        );
        previous_height = Some(height);
    }

    let unplaced: Vec<String> = forest
        .wrappers
        .iter()
        .filter(|wrapper| !placed[wrapper.id.0])
        .map(|wrapper| wrapper.anchor_id.clone())
        .collect();
    if !unplaced.is_empty() {
        let diagnostic = Diagnostic::NoRootFound {
            anchor_ids: unplaced,
        };
        diagnostic.emit();
        diagnostics.push(diagnostic);
    }

    tracing::debug!(
        roots = roots.len(),
        positioned = positions.len(),
        nodes = graph.nodes.len(),
        "family layout computed"
    );

    Ok(FamilyLayout {
        positions,
        forest,
        heights,
        roots,
        diagnostics,
    })
}

/// Position of every node after an auto-format: computed where the layout
/// reached the node, unchanged otherwise.
pub fn layout(graph: &FamilyGraph, config: &LayoutConfig) -> Result<BTreeMap<String, Position>> {
    let computed = compute_layout(graph, config)?;
    Ok(graph
        .nodes
        .iter()
        .map(|node| {
            let position = computed
                .positions
                .get(&node.id)
                .copied()
                .unwrap_or(node.position);
            (node.id.clone(), position)
        })
        .collect())
}
