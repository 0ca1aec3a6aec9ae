//! Projection of the percentage-space dataset onto the logical canvas.
//!
//! Nodes are authored as percentages of the container. The node layer places
//! boxes at `left: x%; top: y%`, the edge layer draws in a fixed canvas (1000x600
//! by default). Both are derived here from the same `scale_x`/`scale_y`
//! factors so a node center and the endpoints of its edges always coincide.

use serde::Serialize;

use crate::config::{CanvasConfig, Config};
use crate::icon::IconKind;
use crate::ir::{Diagram, Edge, Node, Selection, TechStack};
use crate::text_metrics::{text_width, truncate_to_width};
use crate::theme::{StyleBundle, Theme, node_style};

// Node box metrics, shared with the SVG writer.
pub(crate) const NODE_PADDING: f32 = 12.0;
pub(crate) const ICON_SIZE: f32 = 24.0;
pub(crate) const LABEL_LINE: f32 = 14.0;
pub(crate) const SUB_LABEL_LINE: f32 = 12.0;
pub(crate) const DETAIL_LINE: f32 = 13.0;
pub(crate) const MORE_LINE: f32 = 12.0;
pub(crate) const ICON_WELL_PADDING: f32 = 8.0;
pub(crate) const SECTION_GAP: f32 = 8.0;
pub(crate) const SUB_LABEL_SIZE: f32 = 10.0;
pub(crate) const DETAIL_SIZE: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A single cubic Bezier segment in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicPath {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicPath {
    pub fn to_svg_d(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            fmt_num(self.start.x),
            fmt_num(self.start.y),
            fmt_num(self.c1.x),
            fmt_num(self.c1.y),
            fmt_num(self.c2.x),
            fmt_num(self.c2.y),
            fmt_num(self.end.x),
            fmt_num(self.end.y),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Routing {
    /// S-curve leaving and arriving horizontally.
    Direct,
    /// Wide bow for feedback relationships; drawn dashed.
    Loop,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    /// Position of the edge in the dataset; stable key for duplicate pairs.
    pub index: usize,
    pub from: String,
    pub to: String,
    pub path: CubicPath,
    pub routing: Routing,
    pub active: bool,
    pub label: Option<EdgeLabel>,
}

impl EdgeLayout {
    pub fn dashed(&self) -> bool {
        self.routing == Routing::Loop
    }
}

/// The node-box preview of a detail list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailPreview {
    pub entries: Vec<String>,
    /// Count of entries left out, when any are.
    pub more: Option<usize>,
}

impl DetailPreview {
    pub fn summary(&self) -> Option<String> {
        self.more.map(|n| format!("+ {n} more..."))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    /// Container-relative placement, in percent.
    pub left_pct: f32,
    pub top_pct: f32,
    /// Center in canvas units.
    pub center: Point,
    /// Box bounds in canvas units.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: String,
    pub sub_label: Option<String>,
    pub tech_stack: TechStack,
    pub badge: &'static str,
    pub icon: IconKind,
    pub selected: bool,
    #[serde(skip)]
    pub style: StyleBundle,
    pub preview: DetailPreview,
}

impl NodeLayout {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub selected: Option<String>,
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
}

impl Layout {
    /// Topmost node box under `point`. Later nodes paint over earlier ones.
    pub fn node_at(&self, point: Point) -> Option<&NodeLayout> {
        self.nodes.iter().rev().find(|node| node.contains(point))
    }

    /// Resolves a click in canvas space and hands the full record of the hit
    /// node to `on_node_select`. Returns whether a node was hit.
    pub fn activate<'d>(
        &self,
        diagram: &'d Diagram,
        point: Point,
        mut on_node_select: impl FnMut(&'d Node),
    ) -> bool {
        let Some(hit) = self.node_at(point) else {
            return false;
        };
        match diagram.node(&hit.id) {
            Some(node) => {
                on_node_select(node);
                true
            }
            None => false,
        }
    }
}

/// Percent to canvas units. Linear, no clipping.
pub fn project(x_pct: f32, y_pct: f32, canvas: &CanvasConfig) -> Point {
    Point::new(x_pct * canvas.scale_x, y_pct * canvas.scale_y)
}

/// Where an edge attaches to `node`. Sources with a custom box width get no
/// horizontal nudge.
pub fn edge_anchor(node: &Node, canvas: &CanvasConfig, is_source: bool) -> Point {
    let nudge_x = if is_source && node.width.is_some() {
        0.0
    } else {
        canvas.endpoint_nudge_x
    };
    project(node.x, node.y, canvas).offset(nudge_x, canvas.endpoint_nudge_y)
}

pub fn route(start: Point, end: Point, routing: Routing, canvas: &CanvasConfig) -> CubicPath {
    match routing {
        Routing::Direct => {
            let mid_x = (start.x + end.x) / 2.0;
            CubicPath {
                start,
                c1: Point::new(mid_x, start.y),
                c2: Point::new(mid_x, end.y),
                end,
            }
        }
        Routing::Loop => {
            let bow = canvas.loop_bow;
            CubicPath {
                start,
                c1: start.offset(bow, bow),
                c2: end.offset(bow, bow),
                end,
            }
        }
    }
}

pub fn edge_is_active(edge: &Edge, selection: &Selection) -> bool {
    selection.id().is_some_and(|id| edge.touches(id))
}

pub fn preview_details(details: &[String], limit: usize) -> DetailPreview {
    let shown = details.len().min(limit);
    DetailPreview {
        entries: details[..shown].to_vec(),
        more: (details.len() > limit).then(|| details.len() - limit),
    }
}

/// Lays out `diagram` for the given selection. Edges naming a missing node
/// are dropped without a trace.
pub fn compute_layout(diagram: &Diagram, selection: &Selection, config: &Config) -> Layout {
    let canvas = &config.canvas;
    let nodes = diagram
        .nodes
        .iter()
        .map(|node| layout_node(node, selection.is(&node.id), canvas, &config.theme))
        .collect();

    let edges = diagram
        .edges
        .iter()
        .enumerate()
        .filter_map(|(index, edge)| {
            let source = diagram.node(&edge.from)?;
            let target = diagram.node(&edge.to)?;
            Some(layout_edge(index, edge, source, target, selection, config))
        })
        .collect();

    Layout {
        width: canvas.width,
        height: canvas.height,
        selected: selection.id().map(str::to_string),
        nodes,
        edges,
    }
}

fn layout_edge(
    index: usize,
    edge: &Edge,
    source: &Node,
    target: &Node,
    selection: &Selection,
    config: &Config,
) -> EdgeLayout {
    let canvas = &config.canvas;
    let routing = if edge.curved {
        Routing::Loop
    } else {
        Routing::Direct
    };
    let start = edge_anchor(source, canvas, true);
    let end = edge_anchor(target, canvas, false);
    let path = route(start, end, routing, canvas);

    let label = edge.label.as_ref().map(|text| {
        let a = project(source.x, source.y, canvas);
        let b = project(target.x, target.y, canvas);
        EdgeLabel {
            text: text.clone(),
            x: (a.x + b.x) / 2.0 + canvas.label_offset,
            y: (a.y + b.y) / 2.0 + canvas.label_offset,
            width: text_width(
                text,
                config.theme.edge_label_size,
                &config.theme.font_family,
            ),
        }
    });

    EdgeLayout {
        index,
        from: edge.from.clone(),
        to: edge.to.clone(),
        path,
        routing,
        active: edge_is_active(edge, selection),
        label,
    }
}

fn layout_node(node: &Node, selected: bool, canvas: &CanvasConfig, theme: &Theme) -> NodeLayout {
    let center = project(node.x, node.y, canvas);
    let width = node.width.unwrap_or(canvas.node_width);
    let inner = (width - NODE_PADDING * 2.0) * 0.9;

    let mut preview = preview_details(&node.tech_details, canvas.detail_preview_limit);
    for entry in &mut preview.entries {
        *entry = truncate_to_width(entry, DETAIL_SIZE, &theme.font_family, inner);
    }

    let height = node_box_height(node.sub_label.is_some(), &preview);
    NodeLayout {
        id: node.id.clone(),
        left_pct: node.x,
        top_pct: node.y,
        center,
        x: center.x - width / 2.0,
        y: center.y - height / 2.0,
        width,
        height,
        label: node.label.clone(),
        sub_label: node.sub_label.clone(),
        tech_stack: node.tech_stack,
        badge: node.tech_stack.badge_text(),
        icon: node.icon,
        selected,
        style: node_style(node.tech_stack, selected),
        preview,
    }
}

fn node_box_height(has_sub_label: bool, preview: &DetailPreview) -> f32 {
    let mut height = NODE_PADDING * 2.0;
    height += ICON_SIZE + ICON_WELL_PADDING * 2.0 + SECTION_GAP;
    height += LABEL_LINE;
    if has_sub_label {
        height += SUB_LABEL_LINE + SECTION_GAP;
    }
    height += SECTION_GAP + preview.entries.len() as f32 * DETAIL_LINE;
    if preview.more.is_some() {
        height += MORE_LINE;
    }
    height
}

/// Shortest decimal form with at most two fractional digits.
pub(crate) fn fmt_num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let text = format!("{rounded:.2}");
        text.trim_end_matches('0').to_string()
    }
}
