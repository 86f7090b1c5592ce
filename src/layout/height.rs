use std::collections::HashMap;

use super::wrapper::{Wrapper, WrapperForest, WrapperId};
use crate::config::LayoutConfig;

/// Vertical footprint of a wrapper on its own, in subtree units.
pub fn self_height(wrapper: &Wrapper, config: &LayoutConfig) -> f64 {
    let spouses = wrapper.spouses.len() as f64;
    (1.0 + (spouses - 1.0) * config.extra_spouse_height).max(1.0)
}

/// Subtree heights of everything reachable from `roots`.
///
/// Wrappers no root reaches get no entry; look them up with a fallback of 1.
pub fn compute_heights(
    roots: &[WrapperId],
    forest: &WrapperForest,
    config: &LayoutConfig,
) -> HashMap<WrapperId, f64> {
    let mut memo = HashMap::new();
    let mut on_path = vec![false; forest.len()];
    for &root in roots {
        subtree_height(root, forest, config, &mut memo, &mut on_path);
    }
    memo
}

fn subtree_height(
    id: WrapperId,
    forest: &WrapperForest,
    config: &LayoutConfig,
    memo: &mut HashMap<WrapperId, f64>,
    on_path: &mut [bool],
) -> f64 {
    if let Some(value) = memo.get(&id) {
        return *value;
    }
    let Some(wrapper) = forest.get(id) else {
        return 0.0;
    };
    let own = self_height(wrapper, config);
    on_path[id.0] = true;
    let mut total = 0.0;
    for &child in forest.children_of(id) {
        if on_path[child.0] {
            tracing::debug!(wrapper = %wrapper.anchor_id, "skipping cyclic child family unit");
            continue;
        }
        total += subtree_height(child, forest, config, memo, on_path);
    }
    on_path[id.0] = false;
    let height = own.max(total);
    memo.insert(id, height);
    height
}
