use crate::layout::{Layout, Routing};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub selected: Option<String>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub left_pct: f32,
    pub top_pct: f32,
    pub center: [f32; 2],
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub selected: bool,
    pub border: String,
    pub glow: Option<String>,
    pub badge: String,
    pub preview: Vec<String>,
    pub more: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub index: usize,
    pub from: String,
    pub to: String,
    pub d: String,
    pub routing: Routing,
    pub dashed: bool,
    pub active: bool,
    pub label: Option<String>,
    pub label_at: Option<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                left_pct: node.left_pct,
                top_pct: node.top_pct,
                center: [node.center.x, node.center.y],
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                selected: node.selected,
                border: node.style.border.to_string(),
                glow: node.style.glow.map(str::to_string),
                badge: node.badge.to_string(),
                preview: node.preview.entries.clone(),
                more: node.preview.more,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                index: edge.index,
                from: edge.from.clone(),
                to: edge.to.clone(),
                d: edge.path.to_svg_d(),
                routing: edge.routing,
                dashed: edge.dashed(),
                active: edge.active,
                label: edge.label.as_ref().map(|label| label.text.clone()),
                label_at: edge.label.as_ref().map(|label| [label.x, label.y]),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            selected: layout.selected.clone(),
            nodes,
            edges,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
