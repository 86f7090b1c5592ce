use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::error::Diagnostic;
use super::wrapper::{Wrapper, WrapperForest, WrapperId};
use crate::ir::{FamilyGraph, Position};

/// Padded box around a set of node positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn from_positions<'a, I>(positions: I, padding: f64) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Position>,
    {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for position in positions {
            min_x = min_x.min(position.x);
            min_y = min_y.min(position.y);
            max_x = max_x.max(position.x);
            max_y = max_y.max(position.y);
        }
        if min_x == f64::MAX {
            return None;
        }
        Some(Self {
            x: min_x - padding,
            y: min_y - padding,
            width: max_x - min_x + padding * 2.0,
            height: max_y - min_y + padding * 2.0,
        })
    }
}

/// Result of one layout run. Built fresh per call; holds no reference to the
/// input graph.
#[derive(Debug, Clone)]
pub struct FamilyLayout {
    /// Coordinates of every node the layout reached.
    pub positions: BTreeMap<String, Position>,
    pub forest: WrapperForest,
    pub heights: HashMap<WrapperId, f64>,
    pub roots: Vec<WrapperId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FamilyLayout {
    pub fn wrappers(&self) -> &[Wrapper] {
        &self.forest.wrappers
    }

    pub fn height_of(&self, id: WrapperId) -> f64 {
        self.heights.get(&id).copied().unwrap_or(1.0)
    }

    /// A copy of `graph` with the computed positions applied.
    pub fn apply(&self, graph: &FamilyGraph) -> FamilyGraph {
        graph.with_positions(&self.positions)
    }

    pub fn bounds(&self, padding: f64) -> Option<Bounds> {
        Bounds::from_positions(self.positions.values(), padding)
    }
}
