use crate::config::RenderConfig;
use crate::icon::Icon;
use crate::layout::{
    DETAIL_LINE, DETAIL_SIZE, EdgeLayout, ICON_SIZE, ICON_WELL_PADDING, LABEL_LINE, Layout,
    MORE_LINE, NODE_PADDING, NodeLayout, SECTION_GAP, SUB_LABEL_LINE, SUB_LABEL_SIZE, fmt_num,
};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&svg_defs(theme));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/><rect width=\"100%\" height=\"100%\" fill=\"url(#grid)\"/>",
        theme.background
    ));
    svg.push_str(&edges_svg(layout, theme));

    svg.push_str("<g class=\"nodes\">");
    for node in &layout.nodes {
        svg.push_str(&node_svg(node, theme));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

/// Markers, grid pattern and glow filter.
pub(crate) fn svg_defs(theme: &Theme) -> String {
    let mut defs = String::from("<defs>");
    for (id, fill) in [
        ("arrowhead", theme.marker_color.as_str()),
        ("arrowhead-active", theme.marker_active_color.as_str()),
    ] {
        defs.push_str(&format!(
            "<marker id=\"{id}\" markerWidth=\"10\" markerHeight=\"7\" refX=\"9\" refY=\"3.5\" orient=\"auto\"><polygon points=\"0 0, 10 3.5, 0 7\" fill=\"{fill}\"/></marker>"
        ));
    }
    defs.push_str(&format!(
        "<pattern id=\"grid\" width=\"20\" height=\"20\" patternUnits=\"userSpaceOnUse\"><circle cx=\"1\" cy=\"1\" r=\"1\" fill=\"{}\" fill-opacity=\"0.1\"/></pattern>",
        theme.grid_dot_color
    ));
    defs.push_str(
        "<filter id=\"glow\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\"><feGaussianBlur stdDeviation=\"8\"/></filter>",
    );
    defs.push_str("</defs>");
    defs
}

/// The edge layer alone, without the surrounding `<svg>`.
pub(crate) fn edges_svg(layout: &Layout, theme: &Theme) -> String {
    let mut out = String::from("<g class=\"edges\">");
    for edge in &layout.edges {
        out.push_str(&edge_svg(edge, theme));
    }
    out.push_str("</g>");
    out
}

fn edge_svg(edge: &EdgeLayout, theme: &Theme) -> String {
    let (stroke, width, marker) = if edge.active {
        (&theme.edge_active_color, theme.edge_active_width, "arrowhead-active")
    } else {
        (&theme.edge_color, theme.edge_width, "arrowhead")
    };
    let dash = if edge.dashed() {
        format!(" stroke-dasharray=\"{}\"", theme.loop_dasharray)
    } else {
        String::new()
    };
    let mut out = format!(
        "<g class=\"edge{}\" data-from=\"{}\" data-to=\"{}\">",
        if edge.active { " active" } else { "" },
        escape_xml(&edge.from),
        escape_xml(&edge.to)
    );
    out.push_str(&format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{width}\" marker-end=\"url(#{marker})\"{dash}/>",
        edge.path.to_svg_d()
    ));
    if let Some(label) = &edge.label {
        let pad = 4.0;
        out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"3\" fill=\"{}\" fill-opacity=\"0.8\"/>",
            fmt_num(label.x - label.width / 2.0 - pad),
            fmt_num(label.y - theme.edge_label_size),
            fmt_num(label.width + pad * 2.0),
            fmt_num(theme.edge_label_size + pad),
            theme.background
        ));
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}\" font-family=\"{}\" text-anchor=\"middle\">{}</text>",
            fmt_num(label.x),
            fmt_num(label.y),
            theme.edge_label_color,
            theme.edge_label_size,
            escape_xml(&theme.font_family),
            escape_xml(&label.text)
        ));
    }
    out.push_str("</g>");
    out
}

fn node_svg(node: &NodeLayout, theme: &Theme) -> String {
    let style = node.style;
    let font = escape_xml(&theme.font_family);
    let cx = node.center.x;
    let mut out = format!(
        "<g class=\"node{}\" data-id=\"{}\">",
        if node.selected { " selected" } else { "" },
        escape_xml(&node.id)
    );

    if let Some(glow) = style.glow {
        out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"8\" fill=\"none\" stroke=\"{glow}\" stroke-width=\"10\" filter=\"url(#glow)\"/>",
            fmt_num(node.x),
            fmt_num(node.y),
            fmt_num(node.width),
            fmt_num(node.height)
        ));
    }
    out.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"8\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
        fmt_num(node.x),
        fmt_num(node.y),
        fmt_num(node.width),
        fmt_num(node.height),
        theme.node_fill,
        style.border
    ));

    let mut y = node.y + NODE_PADDING;
    let well_radius = ICON_SIZE / 2.0 + ICON_WELL_PADDING;
    out.push_str(&format!(
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
        fmt_num(cx),
        fmt_num(y + well_radius),
        fmt_num(well_radius),
        theme.icon_well
    ));
    out.push_str(&node.icon.render_at(
        cx - ICON_SIZE / 2.0,
        y + ICON_WELL_PADDING,
        ICON_SIZE,
        style.icon_tint,
    ));
    y += well_radius * 2.0 + SECTION_GAP;

    y += LABEL_LINE;
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}\" font-weight=\"bold\" font-family=\"{font}\" text-anchor=\"middle\">{}</text>",
        fmt_num(cx),
        fmt_num(y - 3.0),
        theme.node_text_color,
        theme.font_size,
        escape_xml(&node.label)
    ));

    if let Some(sub_label) = &node.sub_label {
        y += SUB_LABEL_LINE;
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{SUB_LABEL_SIZE}\" font-family=\"{font}\" letter-spacing=\"0.5\" text-anchor=\"middle\">{}</text>",
            fmt_num(cx),
            fmt_num(y - 2.0),
            theme.node_sub_text_color,
            escape_xml(&sub_label.to_uppercase())
        ));
        y += SECTION_GAP;
    }

    y += SECTION_GAP / 2.0;
    out.push_str(&format!(
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        fmt_num(node.x + NODE_PADDING),
        fmt_num(y),
        fmt_num(node.x + node.width - NODE_PADDING),
        fmt_num(y),
        theme.node_divider
    ));
    y += SECTION_GAP / 2.0;

    for entry in &node.preview.entries {
        y += DETAIL_LINE;
        out.push_str(&format!(
            "<g class=\"detail\"><circle cx=\"{}\" cy=\"{}\" r=\"2\" fill=\"{}\"/><text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{DETAIL_SIZE}\" font-family=\"{font}\" text-anchor=\"middle\">{}</text></g>",
            fmt_num(node.x + NODE_PADDING + 4.0),
            fmt_num(y - 6.0),
            style.bullet,
            fmt_num(cx),
            fmt_num(y - 3.0),
            theme.node_sub_text_color,
            escape_xml(entry)
        ));
    }
    if let Some(summary) = node.preview.summary() {
        y += MORE_LINE;
        out.push_str(&format!(
            "<text class=\"more\" x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"8\" font-style=\"italic\" font-family=\"{font}\" text-anchor=\"middle\">{}</text>",
            fmt_num(cx),
            fmt_num(y - 3.0),
            theme.edge_color,
            escape_xml(&summary)
        ));
    }

    let badge_width = node.badge.chars().count() as f32 * 6.0 + 10.0;
    let badge_x = node.x + node.width + 8.0 - badge_width;
    let badge_y = node.y - 8.0;
    out.push_str(&format!(
        "<g class=\"badge\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"14\" rx=\"3\" fill=\"{}\"/><text x=\"{}\" y=\"{}\" fill=\"#ffffff\" font-size=\"8\" font-weight=\"bold\" font-family=\"{font}\" letter-spacing=\"0.5\" text-anchor=\"middle\">{}</text></g>",
        fmt_num(badge_x),
        fmt_num(badge_y),
        fmt_num(badge_width),
        style.badge,
        fmt_num(badge_x + badge_width / 2.0),
        fmt_num(badge_y + 10.0),
        escape_xml(&node.badge.to_uppercase())
    ));

    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    write_output_text(svg, output)
}

pub fn write_output_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            tracing::info!(path = %path.display(), bytes = text.len(), "wrote output");
        }
        None => {
            print!("{}", text);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().to_string())
        .unwrap_or_else(|| "Inter".to_string());
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(1000.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size();
    let scale = raster_scale(size.width(), size.height(), render_cfg);
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    tracing::info!(path = %output.display(), width, height, "wrote png");
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

/// Largest scale that fits a `width` x `height` drawing inside the raster box.
#[cfg_attr(not(feature = "png"), allow(dead_code))]
pub(crate) fn raster_scale(width: f32, height: f32, render_cfg: &RenderConfig) -> f32 {
    let scale_x = render_cfg.width / width.max(1.0);
    let scale_y = render_cfg.height / height.max(1.0);
    scale_x.min(scale_y).max(0.01)
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ir::{Diagram, Edge, Node, Selection, TechStack};
    use crate::layout::compute_layout;

    fn diagram() -> Diagram {
        let mut diagram = Diagram::new();
        let mut a = Node::new("A", "Alpha & Co", TechStack::Azure, 5.0, 40.0);
        a.tech_details = ["one", "two", "three", "four", "five"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        diagram.nodes.push(a);
        diagram.nodes.push(Node::new("B", "Beta", TechStack::Generic, 25.0, 40.0));
        diagram.edges.push(Edge::new("A", "B"));
        diagram.edges.push(Edge::feedback("B", "A", "Retraining"));
        diagram
    }

    fn render(selection: Selection) -> String {
        let config = Config::default();
        let layout = compute_layout(&diagram(), &selection, &config);
        render_svg(&layout, &config.theme)
    }

    #[test]
    fn render_svg_basic() {
        let svg = render(Selection::none());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("viewBox=\"0 0 1000 600\""));
        assert!(svg.contains("Alpha &amp; Co"));
        assert!(svg.contains("M 55 244 C 155 244, 155 244, 255 244"));
    }

    #[test]
    fn loop_edges_are_dashed_and_labeled() {
        let svg = render(Selection::none());
        assert_eq!(svg.matches("stroke-dasharray=\"5,5\"").count(), 1);
        assert!(svg.contains(">Retraining</text>"));
    }

    #[test]
    fn selection_switches_markers() {
        let svg = render(Selection::none());
        assert_eq!(svg.matches("url(#arrowhead-active)").count(), 0);
        let svg = render(Selection::of("B"));
        assert_eq!(svg.matches("url(#arrowhead-active)").count(), 2);
        assert!(svg.contains("class=\"node selected\" data-id=\"B\""));
        assert!(svg.contains("filter=\"url(#glow)\""));
    }

    #[test]
    fn raster_fits_both_dimensions() {
        let fit = |width, height| raster_scale(1000.0, 600.0, &RenderConfig { width, height });
        assert_eq!(fit(1000.0, 600.0), 1.0);
        assert_eq!(fit(2000.0, 600.0), 1.0);
        assert_eq!(fit(2000.0, 1200.0), 2.0);
        assert_eq!(fit(500.0, 1200.0), 0.5);
    }

    #[test]
    fn node_box_shows_preview_and_summary() {
        let svg = render(Selection::none());
        assert_eq!(svg.matches("<g class=\"detail\">").count(), 3);
        assert!(svg.contains("+ 2 more..."));
        assert!(svg.contains(">SYSTEM</text>"));
    }
}
