use crate::layout::{Bounds, Diagnostic, FamilyLayout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub roots: Vec<usize>,
    pub bounds: Option<Bounds>,
    pub wrappers: Vec<WrapperDump>,
    pub positions: Vec<PositionDump>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapperDump {
    pub index: usize,
    pub anchor_id: String,
    pub unions: Vec<String>,
    pub spouses: Vec<String>,
    pub is_root: bool,
    /// `None` for wrappers no root reached.
    pub height: Option<f64>,
    pub children: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct PositionDump {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl LayoutDump {
    pub fn from_layout(layout: &FamilyLayout, padding: f64) -> Self {
        let wrappers = layout
            .wrappers()
            .iter()
            .map(|wrapper| WrapperDump {
                index: wrapper.id.0,
                anchor_id: wrapper.anchor_id.clone(),
                unions: wrapper
                    .spouses
                    .iter()
                    .map(|link| link.union_id.clone())
                    .collect(),
                spouses: wrapper
                    .spouses
                    .iter()
                    .map(|link| link.spouse_id.clone())
                    .collect(),
                is_root: wrapper.is_root,
                height: layout.heights.get(&wrapper.id).copied(),
                children: layout
                    .forest
                    .children_of(wrapper.id)
                    .iter()
                    .map(|child| child.0)
                    .collect(),
            })
            .collect();

        let positions = layout
            .positions
            .iter()
            .map(|(id, position)| PositionDump {
                id: id.clone(),
                x: position.x,
                y: position.y,
            })
            .collect();

        LayoutDump {
            roots: layout.roots.iter().map(|root| root.0).collect(),
            bounds: layout.bounds(padding),
            wrappers,
            positions,
            diagnostics: layout.diagnostics.clone(),
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &FamilyLayout, padding: f64) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, padding);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
