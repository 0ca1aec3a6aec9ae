use crate::config::load_config;
use crate::dataset::{load_dataset, parse_dataset};
use crate::html::render_html;
use crate::ir::Diagram;
use crate::layout::Point;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::render::{render_svg, write_output_png, write_output_svg, write_output_text};
use crate::shell::Shell;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "archflow", version, about = "Interactive architecture diagram renderer")]
pub struct Args {
    /// Dataset file (.json/.json5) or '-' for stdin. Defaults to the built-in architecture.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, canvas, panel)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Node id to select before rendering
    #[arg(short = 's', long = "select")]
    pub select: Option<String>,

    /// Canvas-space click, as `x,y`, applied after --select
    #[arg(long = "click", value_parser = parse_point, allow_hyphen_values = true)]
    pub click: Option<Point>,

    /// Raster width
    #[arg(short = 'w', long = "width", default_value_t = 1000.0)]
    pub width: f32,

    /// Raster height
    #[arg(short = 'H', long = "height", default_value_t = 600.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Html,
    Panel,
    Layout,
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    execute(Args::parse())
}

pub fn execute(args: Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let diagram = read_input(args.input.as_deref())?;
    let mut shell = Shell::new(diagram, config)
        .on_node_select(|node| tracing::info!(id = %node.id, label = %node.label, "node activated"));

    if let Some(id) = args.select.as_deref() {
        shell.select(id);
    }
    if let Some(point) = args.click {
        if shell.layout().node_at(point).is_none() {
            tracing::warn!(x = point.x, y = point.y, "click hit no node");
        }
        shell.click(point);
    }

    let layout = shell.layout();
    let output = args.output.as_deref();
    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &shell.config().theme);
            write_output_svg(&svg, output)?;
        }
        OutputFormat::Png => {
            let output = ensure_output(output, "png")?;
            let svg = render_svg(&layout, &shell.config().theme);
            write_output_png(&svg, output, &shell.config().render, &shell.config().theme)?;
        }
        OutputFormat::Html => {
            let page = render_html(&layout, shell.diagram(), shell.config());
            write_output_text(&page, output)?;
        }
        OutputFormat::Panel => {
            write_output_text(&shell.panel().to_text(), output)?;
        }
        OutputFormat::Layout => match output {
            Some(path) => write_layout_dump(path, &layout)?,
            None => {
                let json = LayoutDump::from_layout(&layout).to_json()?;
                write_output_text(&json, None)?;
            }
        },
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Diagram> {
    match path {
        None => Ok(Diagram::builtin().clone()),
        Some(path) if path == Path::new("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(parse_dataset(&buf)?)
        }
        Some(path) => Ok(load_dataset(path)?),
    }
}

fn ensure_output<'a>(output: Option<&'a Path>, ext: &str) -> Result<&'a Path> {
    output.ok_or_else(|| anyhow::anyhow!("Output path required for {} output", ext))
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{raw}'"))?;
    let x: f32 = x.trim().parse().map_err(|_| format!("invalid x coordinate '{x}'"))?;
    let y: f32 = y.trim().parse().map_err(|_| format!("invalid y coordinate '{y}'"))?;
    Ok(Point::new(x, y))
}
