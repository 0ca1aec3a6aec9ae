use std::cell::RefCell;
use std::rc::Rc;

use archflow::layout::{Routing, edge_anchor};
use archflow::{
    Config, DetailPanel, Diagram, Edge, Node, Point, RenderOptions, Selection, Shell, TechStack,
    UiEvent, compute_layout, parse_dataset, render_html, render_svg, render_with_options,
};

fn assert_valid_svg(svg: &str, case: &str) {
    assert!(svg.starts_with("<svg"), "{case}: missing <svg tag");
    assert!(svg.trim_end().ends_with("</svg>"), "{case}: missing </svg tag");
}

fn two_node_diagram() -> Diagram {
    let mut diagram = Diagram::new();
    diagram.nodes.push(Node::new("a", "A", TechStack::Azure, 5.0, 40.0));
    diagram.nodes.push(Node::new("b", "B", TechStack::Databricks, 25.0, 40.0));
    diagram.edges.push(Edge::new("a", "b"));
    diagram
}

#[test]
fn builtin_renders_for_every_selection() {
    let diagram = Diagram::builtin();
    let config = Config::default();
    let mut selections = vec![Selection::none()];
    selections.extend(diagram.nodes.iter().map(|node| Selection::of(&node.id)));

    for selection in selections {
        let case = selection.id().unwrap_or("none").to_string();
        let layout = compute_layout(diagram, &selection, &config);
        assert_eq!(layout.nodes.len(), 10, "{case}");
        assert_eq!(layout.edges.len(), 16, "{case}");
        let svg = render_svg(&layout, &config.theme);
        assert_valid_svg(&svg, &case);
    }
}

#[test]
fn edges_run_between_transformed_centers() {
    let diagram = Diagram::builtin();
    let config = Config::default();
    let layout = compute_layout(diagram, &Selection::none(), &config);
    for edge in &layout.edges {
        let source = diagram.node(&edge.from).unwrap();
        let target = diagram.node(&edge.to).unwrap();
        assert_eq!(edge.path.start, edge_anchor(source, &config.canvas, true));
        assert_eq!(edge.path.end, edge_anchor(target, &config.canvas, false));
        assert_eq!(edge.dashed(), edge.routing == Routing::Loop);
    }
}

#[test]
fn curved_edges_are_the_only_dashed_ones() {
    let layout = compute_layout(Diagram::builtin(), &Selection::none(), &Config::default());
    let svg = render_svg(&layout, &Config::default().theme);
    assert_eq!(svg.matches("stroke-dasharray=\"5,5\"").count(), 2);
    let dashed: Vec<_> = layout
        .edges
        .iter()
        .filter(|edge| edge.dashed())
        .map(|edge| (edge.from.as_str(), edge.to.as_str()))
        .collect();
    assert_eq!(dashed, vec![("anomaly", "model"), ("alerts", "model")]);
}

#[test]
fn straight_edge_between_two_nodes() {
    let layout = compute_layout(&two_node_diagram(), &Selection::none(), &Config::default());
    assert_eq!(layout.edges.len(), 1);
    assert_eq!(
        layout.edges[0].path.to_svg_d(),
        "M 55 244 C 155 244, 155 244, 255 244"
    );
    let svg = render_svg(&layout, &Config::default().theme);
    assert!(svg.contains("d=\"M 55 244 C 155 244, 155 244, 255 244\""));
}

#[test]
fn dangling_edges_draw_nothing() {
    let mut diagram = two_node_diagram();
    diagram.edges.push(Edge::new("a", "missing"));
    diagram.edges.push(Edge::new("missing", "b"));
    let config = Config::default();
    let layout = compute_layout(&diagram, &Selection::of("a"), &config);
    assert_eq!(layout.edges.len(), 1);
    let svg = render_svg(&layout, &config.theme);
    assert_eq!(svg.matches("marker-end=").count(), 1);
    assert!(!svg.contains("missing"));
}

#[test]
fn active_edges_follow_selection() {
    let diagram = Diagram::builtin();
    let config = Config::default();

    let idle = compute_layout(diagram, &Selection::none(), &config);
    assert!(idle.edges.iter().all(|edge| !edge.active));

    let layout = compute_layout(diagram, &Selection::of("model"), &config);
    let active = layout.edges.iter().filter(|edge| edge.active).count();
    // vector, features, graph (both ways), gateway, anomaly (both ways), alerts
    assert_eq!(active, 8);
    for edge in &layout.edges {
        assert_eq!(edge.active, edge.from == "model" || edge.to == "model");
    }
    let svg = render_svg(&layout, &config.theme);
    assert_eq!(svg.matches("url(#arrowhead-active)").count(), 8);
}

#[test]
fn node_preview_caps_at_three() {
    let diagram = Diagram::builtin();
    let layout = compute_layout(diagram, &Selection::none(), &Config::default());
    for node in &layout.nodes {
        let count = diagram.node(&node.id).unwrap().tech_details.len();
        assert_eq!(node.preview.entries.len(), count.min(3), "{}", node.id);
        assert_eq!(node.preview.more, count.checked_sub(3).filter(|n| *n > 0));
    }

    let sources = layout.nodes.iter().find(|node| node.id == "sources").unwrap();
    assert_eq!(sources.preview.summary().as_deref(), Some("+ 1 more..."));

    let panel = DetailPanel::build(diagram, &Selection::of("sources"), &Config::default().panel);
    let DetailPanel::Node(details) = panel else {
        panic!("expected node details");
    };
    assert_eq!(details.details().len(), 4);
}

#[test]
fn click_then_dismiss_round_trip() {
    let selected: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let closes = Rc::new(RefCell::new(0usize));
    let sink = selected.clone();
    let counter = closes.clone();
    let mut shell = Shell::new(two_node_diagram(), Config::default())
        .on_node_select(move |node| sink.borrow_mut().push(node.id.clone()))
        .on_close(move || *counter.borrow_mut() += 1);

    assert!(shell.panel().is_placeholder());
    assert!(shell.handle(UiEvent::Click(Point::new(250.0, 240.0))));
    assert_eq!(*selected.borrow(), vec!["b".to_string()]);
    assert!(shell.layout().edges.iter().all(|edge| edge.active));

    assert!(shell.handle(UiEvent::Dismiss));
    assert_eq!(*closes.borrow(), 1);
    assert!(shell.panel().is_placeholder());
    assert!(shell.layout().edges.iter().all(|edge| !edge.active));
}

#[test]
fn empty_dataset_is_a_valid_canvas() {
    let diagram = parse_dataset(r#"{ "nodes": [], "edges": [] }"#).unwrap();
    let config = Config::default();
    let layout = compute_layout(&diagram, &Selection::none(), &config);
    assert!(layout.nodes.is_empty());
    assert!(layout.edges.is_empty());
    assert_valid_svg(&render_svg(&layout, &config.theme), "empty");
    let page = render_html(&layout, &diagram, &config);
    assert!(page.contains("Interactive Diagram"));
}

#[test]
fn one_shot_render_honours_options() {
    let svg = render_with_options(
        Diagram::builtin(),
        &RenderOptions::light().with_selection(Some("storage")),
    );
    assert_valid_svg(&svg, "light");
    assert!(svg.contains(&archflow::Theme::light().background));
    assert!(svg.contains("url(#arrowhead-active)"));
}
