//! Full page rendering: header, diagram, feature cards and detail panel.
//!
//! The diagram is two stacked layers. Node boxes are HTML positioned with
//! `left: x%; top: y%`; edges live in an SVG whose viewBox is the logical
//! canvas. The container's aspect ratio is pinned to the canvas and the SVG is
//! stretched with `preserveAspectRatio="none"`, so both layers map the same
//! percentages to the same pixels.

use crate::config::Config;
use crate::icon::Icon;
use crate::ir::{Diagram, Selection};
use crate::layout::{Layout, NodeLayout, fmt_num};
use crate::panel::DetailPanel;
use crate::render::{edges_svg, escape_xml, svg_defs};
use crate::theme::node_style;

const FEATURE_CARDS: [(&str, &str, &str); 3] = [
    ("Unified Data", "#0891b2", "Raw logs to Gold features via Delta Lake."),
    ("Agentic Intelligence", "#ea580c", "Autonomous agents handle data reliability."),
    ("Real-time Scoring", "#2563eb", "Sub-second fraud probability inference."),
];

const STYLE: &str = "\
*{box-sizing:border-box}body{margin:0;font-family:Inter,Segoe UI,system-ui,sans-serif;background:#f8fafc;color:#0f172a}\
header{height:64px;display:flex;align-items:center;padding:0 24px;border-bottom:1px solid #e2e8f0;background:#fff}\
header h1{font-size:16px;margin:0}header p{font-size:12px;color:#64748b;margin:0}\
.legend{margin-left:auto;font-size:12px;color:#64748b;display:flex;gap:8px;align-items:center}\
.dot{width:8px;height:8px;border-radius:50%;display:inline-block}\
main{display:flex}.stage{flex:1;padding:32px}\
.diagram{position:relative;width:100%;border-radius:12px;overflow:hidden;border:1px solid}\
.diagram svg{position:absolute;inset:0;width:100%;height:100%;pointer-events:none}\
.layer{position:absolute;inset:0}\
.node{position:absolute;transform:translate(-50%,-50%);cursor:pointer;padding:12px;border-radius:8px;border:2px solid;display:flex;flex-direction:column;align-items:center}\
.node:hover{transform:translate(-50%,-50%) scale(1.05)}\
.node h3{font-size:12px;margin:0 0 4px;text-align:center}\
.node .sub{font-size:10px;text-transform:uppercase;letter-spacing:.05em;margin-bottom:8px;text-align:center}\
.node ul{list-style:none;margin:0;padding:8px 0 0;width:100%;font-size:9px}\
.node li{display:flex;gap:6px;justify-content:center;align-items:center;white-space:nowrap;overflow:hidden;text-overflow:ellipsis}\
.node .more{font-size:8px;font-style:italic;text-align:center}\
.node .badge{position:absolute;top:-8px;right:-8px;padding:2px 6px;border-radius:4px;font-size:8px;font-weight:700;color:#fff;text-transform:uppercase}\
.well{padding:8px;border-radius:50%;margin-bottom:8px;line-height:0}\
.cards{display:grid;grid-template-columns:repeat(3,1fr);gap:16px;margin-top:32px}\
.card{background:#fff;border:1px solid #e2e8f0;border-radius:8px;padding:16px}.card h4{margin:0 0 4px;font-size:14px}.card p{margin:0;font-size:12px;color:#64748b}\
aside{width:384px;border-left:1px solid #e2e8f0;background:#fff;min-height:calc(100vh - 64px)}\
.panel{padding:24px}.panel[hidden]{display:none}.panel-header{display:flex;justify-content:space-between}\
.panel-badges{display:flex;gap:8px;align-items:center}.panel-icon{padding:8px;border-radius:8px;line-height:0}\
.panel-badge{font-size:12px;font-weight:700;text-transform:uppercase;padding:4px 8px;border-radius:4px}\
.panel-close{border:0;background:none;cursor:pointer}.panel-description{white-space:normal;font-size:14px;color:#475569}\
.panel-stack{list-style:none;padding:16px;border:1px solid #e2e8f0;border-radius:12px;background:#fff}.panel-stack li{display:flex;gap:12px;margin:6px 0}\
.panel-role{padding:16px;background:#f8fafc;border:1px solid #e2e8f0;border-radius:8px;font-size:12px;font-style:italic}\
.placeholder{text-align:center;color:#64748b;padding:32px}.panel-title{font-size:18px;font-weight:600;color:#334155}";

const SCRIPT: &str = "\
(function(){\
var panels=document.querySelectorAll('aside .panel');\
function show(id){\
panels.forEach(function(p){p.hidden=(p.dataset.id||'')!==id;});\
document.querySelectorAll('.node').forEach(function(n){\
var on=n.dataset.id===id;\
n.classList.toggle('selected',on);\
n.style.borderColor=on?n.dataset.activeBorder:n.dataset.border;\
n.style.boxShadow=on?'0 0 20px '+n.dataset.glow:'none';\
});\
document.querySelectorAll('g.edge').forEach(function(e){\
var on=!!id&&(e.dataset.from===id||e.dataset.to===id);\
e.classList.toggle('active',on);\
var p=e.querySelector('path');\
p.setAttribute('stroke',on?p.dataset.activeStroke:p.dataset.stroke);\
p.setAttribute('stroke-width',on?p.dataset.activeWidth:p.dataset.width);\
p.setAttribute('marker-end',on?'url(#arrowhead-active)':'url(#arrowhead)');\
});}\
document.querySelectorAll('.node').forEach(function(n){n.addEventListener('click',function(){show(n.dataset.id);});});\
document.querySelectorAll('[data-action=close]').forEach(function(b){b.addEventListener('click',function(){show('');});});\
})();";

pub fn render_html(layout: &Layout, diagram: &Diagram, config: &Config) -> String {
    let theme = &config.theme;
    let mut html = String::from("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"/>");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\"/>",
    );
    html.push_str(&format!(
        "<title>{}</title><style>{STYLE}</style></head><body>",
        escape_xml(&config.panel.title)
    ));

    html.push_str(&format!(
        "<header><div><h1>{}</h1><p>{}</p></div><div class=\"legend\"><span class=\"dot\" style=\"background:#06b6d4\"></span> Azure<span class=\"dot\" style=\"background:#f97316\"></span> Databricks</div></header>",
        escape_xml(&config.panel.title),
        escape_xml(&config.panel.subtitle)
    ));

    html.push_str("<main><div class=\"stage\">");
    html.push_str(&format!(
        "<div class=\"diagram\" style=\"aspect-ratio:{} / {};background:{};border-color:{}\">",
        fmt_num(layout.width),
        fmt_num(layout.height),
        theme.background,
        theme.frame_border
    ));
    html.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\" preserveAspectRatio=\"none\">",
        fmt_num(layout.width),
        fmt_num(layout.height)
    ));
    html.push_str(&svg_defs(theme));
    html.push_str("<rect width=\"100%\" height=\"100%\" fill=\"url(#grid)\"/>");
    html.push_str(&annotate_edge_paths(&edges_svg(layout, theme), config));
    html.push_str("</svg><div class=\"layer\">");
    for node in &layout.nodes {
        html.push_str(&node_html(node, layout.width, config));
    }
    html.push_str("</div></div>");

    html.push_str("<div class=\"cards\">");
    for (title, color, text) in FEATURE_CARDS {
        html.push_str(&format!(
            "<div class=\"card\"><h4 style=\"color:{color}\">{title}</h4><p>{text}</p></div>"
        ));
    }
    html.push_str("</div></div>");

    html.push_str("<aside>");
    html.push_str(&panels_html(layout, diagram, config));
    html.push_str("</aside></main>");
    html.push_str(&format!("<script>{SCRIPT}</script></body></html>"));
    html
}

/// One panel per node plus the placeholder; only the current one is visible.
fn panels_html(layout: &Layout, diagram: &Diagram, config: &Config) -> String {
    let current = layout.selected.as_deref();
    let mut out = String::new();
    let placeholder = DetailPanel::build(diagram, &Selection::none(), &config.panel).to_html();
    let shows_node = current.is_some_and(|id| diagram.node(id).is_some());
    out.push_str(&set_hidden(placeholder, shows_node));
    for node in &diagram.nodes {
        let panel = DetailPanel::build(diagram, &Selection::of(&node.id), &config.panel).to_html();
        out.push_str(&set_hidden(panel, current != Some(node.id.as_str())));
    }
    out
}

fn set_hidden(panel: String, hidden: bool) -> String {
    if hidden {
        panel.replacen("<div class=\"panel", "<div hidden class=\"panel", 1)
    } else {
        panel
    }
}

/// Stores both stroke states on each path so the page script can toggle them.
fn annotate_edge_paths(edges: &str, config: &Config) -> String {
    let theme = &config.theme;
    edges.replace(
        "<path ",
        &format!(
            "<path data-stroke=\"{}\" data-active-stroke=\"{}\" data-width=\"{}\" data-active-width=\"{}\" ",
            theme.edge_color, theme.edge_active_color, theme.edge_width, theme.edge_active_width
        ),
    )
}

/// Box width is a share of the container so custom widths scale with the canvas.
fn node_html(node: &NodeLayout, canvas_width: f32, config: &Config) -> String {
    let theme = &config.theme;
    let style = node.style;
    let idle = node_style(node.tech_stack, false);
    let active = node_style(node.tech_stack, true);
    let shadow = style
        .glow
        .map(|glow| format!("box-shadow:0 0 20px {glow};"))
        .unwrap_or_default();
    let mut out = format!(
        "<div class=\"node{}\" data-id=\"{}\" data-border=\"{}\" data-active-border=\"{}\" data-glow=\"{}\" style=\"left:{}%;top:{}%;width:{}%;background:{};border-color:{};{shadow}\">",
        if node.selected { " selected" } else { "" },
        escape_xml(&node.id),
        idle.border,
        active.border,
        active.glow.unwrap_or("transparent"),
        fmt_num(node.left_pct),
        fmt_num(node.top_pct),
        fmt_num(node.width / canvas_width * 100.0),
        theme.node_fill,
        style.border
    );
    out.push_str(&format!(
        "<div class=\"well\" style=\"background:{}\">{}</div>",
        theme.icon_well,
        node.icon.inline_svg(24.0, style.icon_tint)
    ));
    out.push_str(&format!(
        "<h3 style=\"color:{}\">{}</h3>",
        theme.node_text_color,
        escape_xml(&node.label)
    ));
    if let Some(sub_label) = &node.sub_label {
        out.push_str(&format!(
            "<span class=\"sub\" style=\"color:{}\">{}</span>",
            theme.node_sub_text_color,
            escape_xml(sub_label)
        ));
    }
    out.push_str(&format!(
        "<ul style=\"border-top:1px solid {};color:{}\">",
        theme.node_divider, theme.node_sub_text_color
    ));
    for entry in &node.preview.entries {
        out.push_str(&format!(
            "<li><span class=\"dot\" style=\"width:4px;height:4px;background:{}\"></span>{}</li>",
            style.bullet,
            escape_xml(entry)
        ));
    }
    out.push_str("</ul>");
    if let Some(summary) = node.preview.summary() {
        out.push_str(&format!(
            "<div class=\"more\" style=\"color:{}\">{}</div>",
            theme.edge_color,
            escape_xml(&summary)
        ));
    }
    out.push_str(&format!(
        "<div class=\"badge\" style=\"background:{}\">{}</div>",
        style.badge,
        escape_xml(node.badge)
    ));
    out.push_str("</div>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Node, TechStack};
    use crate::layout::compute_layout;

    fn page(selection: Selection) -> String {
        let config = Config::default();
        let diagram = Diagram::builtin();
        let layout = compute_layout(diagram, &selection, &config);
        render_html(&layout, diagram, &config)
    }

    #[test]
    fn node_layer_uses_percentages() {
        let html = page(Selection::none());
        assert!(html.contains("<div class=\"node\" data-id=\"sources\" data-border=\"#475569\""));
        assert!(html.contains("style=\"left:5%;top:40%;"));
        assert!(html.contains("viewBox=\"0 0 1000 600\" preserveAspectRatio=\"none\""));
        assert!(html.contains("aspect-ratio:1000 / 600"));
    }

    #[test]
    fn node_boxes_take_their_width_from_the_layout() {
        let html = page(Selection::none());
        assert!(html.contains("style=\"left:5%;top:40%;width:19.2%;"));

        let config = Config::default();
        let mut diagram = Diagram::new();
        let mut wide = Node::new("wide", "Wide", TechStack::Azure, 50.0, 50.0);
        wide.width = Some(300.0);
        diagram.nodes.push(wide);
        let layout = compute_layout(&diagram, &Selection::none(), &config);
        let html = render_html(&layout, &diagram, &config);
        assert!(html.contains("left:50%;top:50%;width:30%;"));
    }

    #[test]
    fn frame_border_follows_theme() {
        let html = page(Selection::none());
        assert!(html.contains(&format!("border-color:{}\">", Config::default().theme.frame_border)));
    }

    #[test]
    fn only_current_panel_is_visible() {
        let html = page(Selection::of("model"));
        assert_eq!(html.matches("<div class=\"panel\" data-id=").count(), 1);
        assert!(html.contains("<div class=\"panel\" data-id=\"model\""));
        assert!(!html.contains("<div class=\"panel placeholder\">"));
        assert_eq!(html.matches("<div hidden class=\"panel").count(), 10);
    }

    #[test]
    fn placeholder_is_visible_without_selection() {
        let html = page(Selection::none());
        assert!(html.contains("<div class=\"panel placeholder\">"));
    }

    #[test]
    fn edge_paths_carry_both_stroke_states() {
        let html = page(Selection::none());
        assert_eq!(html.matches("data-active-stroke=\"#38bdf8\"").count(), 16);
    }
}
