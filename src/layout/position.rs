use std::collections::{BTreeMap, HashMap};

use super::wrapper::{WrapperForest, WrapperId};
use crate::config::LayoutConfig;
use crate::ir::Position;

/// Positions every node of the subtree rooted at `root`, with the root's
/// anchor at `(x, y)`. Only nodes of that subtree appear in the result.
pub fn assign_positions(
    root: WrapperId,
    x: f64,
    y: f64,
    forest: &WrapperForest,
    heights: &HashMap<WrapperId, f64>,
    config: &LayoutConfig,
) -> BTreeMap<String, Position> {
    let mut positions = BTreeMap::new();
    let mut placed = vec![false; forest.len()];
    place_wrapper(
        root,
        (x, y),
        forest,
        heights,
        config,
        &mut positions,
        &mut placed,
    );
    positions
}

pub(super) fn place_wrapper(
    id: WrapperId,
    origin: (f64, f64),
    forest: &WrapperForest,
    heights: &HashMap<WrapperId, f64>,
    config: &LayoutConfig,
    positions: &mut BTreeMap<String, Position>,
    placed: &mut [bool],
) {
    let Some(wrapper) = forest.get(id) else {
        return;
    };
    if placed[id.0] {
        return;
    }
    placed[id.0] = true;

    let (x, y) = origin;
    positions.insert(wrapper.anchor_id.clone(), Position::new(x, y));
    for (index, link) in wrapper.spouses.iter().enumerate() {
        let row_y = y + index as f64 * config.multi_spouse_gap;
        positions.insert(
            link.union_id.clone(),
            Position::new(x + config.heart_offset_x, row_y + config.heart_offset_y),
        );
        positions.insert(
            link.spouse_id.clone(),
            Position::new(x, row_y + config.spouse_offset_y),
        );
    }

    let children = forest.children_of(id);
    if children.is_empty() {
        return;
    }
    let height = heights.get(&id).copied().unwrap_or(1.0);
    let mut cursor = y - height * config.spacing_y / 2.0;
    for &child in children {
        let child_height = heights.get(&child).copied().unwrap_or(1.0);
        let child_y = cursor + child_height * config.spacing_y / 2.0;
        place_wrapper(
            child,
            (x + config.spacing_x, child_y),
            forest,
            heights,
            config,
            positions,
            placed,
        );
        cursor += child_height * config.spacing_y;
    }
}
