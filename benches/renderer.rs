use archflow::config::Config;
use archflow::dataset::parse_dataset;
use archflow::html::render_html;
use archflow::ir::{Diagram, Selection};
use archflow::layout::compute_layout;
use archflow::render::render_svg;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A `side × side` grid of nodes, each wired to its right and lower neighbours,
/// plus `loops` dashed feedback edges running back to the first node.
fn grid_dataset_source(side: usize, loops: usize) -> String {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let step = 100.0 / (side as f32 + 1.0);
    let stacks = ["Azure", "Databricks", "Microsoft", "Generic"];
    for row in 0..side {
        for col in 0..side {
            let idx = row * side + col;
            nodes.push(format!(
                r#"{{"id":"n{idx}","label":"Node {idx}","techStack":"{}","techDetails":["one","two","three","four","five"],"x":{},"y":{}}}"#,
                stacks[idx % stacks.len()],
                step * (col as f32 + 1.0),
                step * (row as f32 + 1.0)
            ));
            if col + 1 < side {
                edges.push(format!(r#"{{"from":"n{idx}","to":"n{}"}}"#, idx + 1));
            }
            if row + 1 < side {
                edges.push(format!(r#"{{"from":"n{idx}","to":"n{}"}}"#, idx + side));
            }
        }
    }
    let total = side * side;
    for i in 0..loops.min(total.saturating_sub(1)) {
        edges.push(format!(
            r#"{{"from":"n{}","to":"n0","label":"loop {i}","curved":true}}"#,
            total - 1 - i
        ));
    }
    format!(r#"{{"nodes":[{}],"edges":[{}]}}"#, nodes.join(","), edges.join(","))
}

fn cases() -> Vec<(String, Diagram)> {
    let mut out = vec![("builtin".to_string(), Diagram::builtin().clone())];
    for (side, loops) in [(4usize, 2usize), (8, 8), (12, 24)] {
        let source = grid_dataset_source(side, loops);
        let diagram = parse_dataset(&source).expect("grid dataset should parse");
        out.push((format!("grid_{side}x{side}_{loops}"), diagram));
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (side, loops) in [(4usize, 2usize), (8, 8), (12, 24)] {
        let name = format!("grid_{side}x{side}_{loops}");
        let input = grid_dataset_source(side, loops);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let diagram = parse_dataset(black_box(data)).expect("parse failed");
                black_box(diagram.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = Config::default();
    for (name, diagram) in cases() {
        let selection = diagram
            .nodes
            .first()
            .map(|node| Selection::of(&node.id))
            .unwrap_or_default();
        group.bench_with_input(BenchmarkId::from_parameter(name), &diagram, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data), &selection, &config);
                black_box(layout.edges.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    let config = Config::default();
    for (name, diagram) in cases() {
        let layout = compute_layout(&diagram, &Selection::none(), &config);
        group.bench_with_input(BenchmarkId::from_parameter(name), &layout, |b, data| {
            b.iter(|| {
                let svg = render_svg(black_box(data), &config.theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_html(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_html");
    let config = Config::default();
    for (name, diagram) in cases() {
        let layout = compute_layout(&diagram, &Selection::none(), &config);
        group.bench_with_input(BenchmarkId::from_parameter(name), &layout, |b, data| {
            b.iter(|| {
                let page = render_html(black_box(data), &diagram, &config);
                black_box(page.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_layout, bench_render, bench_html
);
criterion_main!(benches);
