#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod html;
pub mod icon;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod panel;
pub mod render;
pub mod shell;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{CanvasConfig, Config, PanelConfig, RenderConfig, load_config, parse_config};
pub use dataset::{DatasetError, load_dataset, parse_dataset};
pub use html::render_html;
pub use ir::{Diagram, Edge, Node, Selection, TechStack};
pub use layout::{Layout, Point, compute_layout};
pub use panel::DetailPanel;
pub use render::render_svg;
pub use shell::{Shell, UiEvent};
pub use theme::Theme;

/// Everything a one-shot render needs besides the dataset.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: Config,
    pub selection: Selection,
}

impl RenderOptions {
    pub fn dark() -> Self {
        Self::default()
    }

    pub fn light() -> Self {
        let mut options = Self::default();
        options.config.theme = Theme::light();
        options
    }

    pub fn with_selection(mut self, id: Option<&str>) -> Self {
        self.selection = Selection::from(id);
        self
    }
}

/// Lays out and draws `diagram` as a standalone SVG document.
pub fn render_with_options(diagram: &Diagram, options: &RenderOptions) -> String {
    let layout = compute_layout(diagram, &options.selection, &options.config);
    render_svg(&layout, &options.config.theme)
}

/// Parses a dataset document, then renders it.
pub fn render_dataset_str(contents: &str, options: &RenderOptions) -> Result<String, DatasetError> {
    let diagram = parse_dataset(contents)?;
    Ok(render_with_options(&diagram, options))
}
