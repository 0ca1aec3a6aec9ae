use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry of the logical canvas that percentages are projected onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    /// Canvas units per horizontal percent.
    pub scale_x: f32,
    /// Canvas units per vertical percent.
    pub scale_y: f32,
    pub endpoint_nudge_x: f32,
    pub endpoint_nudge_y: f32,
    pub loop_bow: f32,
    pub label_offset: f32,
    pub node_width: f32,
    pub detail_preview_limit: usize,
}

impl CanvasConfig {
    /// The node layer positions boxes at `x%` of a container sized to the
    /// canvas, the edge layer at `x * scale_x`. Both agree only when a percent
    /// is exactly one hundredth of the canvas on each axis.
    pub fn check_projection(&self) -> anyhow::Result<()> {
        let agrees = |scale: f32, extent: f32| (scale * 100.0 - extent).abs() <= 1e-3 * extent.abs().max(1.0);
        if !agrees(self.scale_x, self.width) {
            anyhow::bail!(
                "canvas scaleX ({}) must equal width / 100 ({})",
                self.scale_x,
                self.width / 100.0
            );
        }
        if !agrees(self.scale_y, self.height) {
            anyhow::bail!(
                "canvas scaleY ({}) must equal height / 100 ({})",
                self.scale_y,
                self.height / 100.0
            );
        }
        Ok(())
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            scale_x: 10.0,
            scale_y: 6.0,
            endpoint_nudge_x: 5.0,
            endpoint_nudge_y: 4.0,
            loop_bow: 50.0,
            label_offset: 5.0,
            node_width: 192.0,
            detail_preview_limit: 3,
        }
    }
}

/// Raster size for PNG output. The SVG is scaled to fit inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelConfig {
    pub pipeline_name: String,
    pub title: String,
    pub subtitle: String,
    pub placeholder_title: String,
    pub placeholder_text: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            pipeline_name: "LSEG Fraud Detection".to_string(),
            title: "Agentic AI Architecture".to_string(),
            subtitle: "Fraud Detection & Anomaly Analysis Platform".to_string(),
            placeholder_title: "Interactive Diagram".to_string(),
            placeholder_text: "Select any component in the architecture to view technical specifications and Azure/Databricks integration details.".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub canvas: CanvasConfig,
    pub render: RenderConfig,
    pub panel: PanelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::dark(),
            canvas: CanvasConfig::default(),
            render: RenderConfig::default(),
            panel: PanelConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    node_fill: Option<String>,
    node_text_color: Option<String>,
    edge_color: Option<String>,
    edge_active_color: Option<String>,
    edge_label_color: Option<String>,
    loop_dasharray: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    canvas: Option<CanvasConfig>,
    panel: Option<PanelConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme '{theme_name}'"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_text_color {
            config.theme.node_text_color = v;
        }
        if let Some(v) = vars.edge_color {
            config.theme.edge_color = v.clone();
            config.theme.marker_color = v;
        }
        if let Some(v) = vars.edge_active_color {
            config.theme.edge_active_color = v.clone();
            config.theme.marker_active_color = v;
        }
        if let Some(v) = vars.edge_label_color {
            config.theme.edge_label_color = v;
        }
        if let Some(v) = vars.loop_dasharray {
            config.theme.loop_dasharray = v;
        }
    }
    if let Some(canvas) = parsed.canvas {
        canvas.check_projection()?;
        config.canvas = canvas;
    }
    if let Some(panel) = parsed.panel {
        config.panel = panel;
    }

    tracing::debug!(theme = ?parsed.theme, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_project_onto_1000_by_600() {
        let canvas = CanvasConfig::default();
        assert_eq!(canvas.width, 100.0 * canvas.scale_x);
        assert_eq!(canvas.height, 100.0 * canvas.scale_y);
    }

    #[test]
    fn theme_variables_overlay_preset() {
        let config = parse_config(
            r##"{ "theme": "light", "themeVariables": { "edgeActiveColor": "#ff0000", "fontSize": 14 } }"##,
        )
        .unwrap();
        assert_eq!(config.theme.background, Theme::light().background);
        assert_eq!(config.theme.edge_active_color, "#ff0000");
        assert_eq!(config.theme.marker_active_color, "#ff0000");
        assert_eq!(config.theme.font_size, 14.0);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = parse_config(
            r#"{ "canvas": { "loopBow": 80 }, "panel": { "pipelineName": "Payments" } }"#,
        )
        .unwrap();
        assert_eq!(config.canvas.loop_bow, 80.0);
        assert_eq!(config.canvas.scale_x, 10.0);
        assert_eq!(config.panel.pipeline_name, "Payments");
        assert_eq!(config.panel.placeholder_title, "Interactive Diagram");
    }

    #[test]
    fn scale_that_breaks_layer_alignment_is_rejected() {
        let err = parse_config(r#"{ "canvas": { "scaleX": 8 } }"#).unwrap_err();
        assert!(err.to_string().contains("scaleX"));
        assert!(parse_config(r#"{ "canvas": { "height": 800 } }"#).is_err());
    }

    #[test]
    fn resized_canvas_keeps_layers_aligned() {
        use crate::ir::{Diagram, Selection};
        use crate::layout::compute_layout;

        let config = parse_config(
            r#"{ "canvas": { "width": 1200, "height": 900, "scaleX": 12, "scaleY": 9 } }"#,
        )
        .unwrap();
        let layout = compute_layout(Diagram::builtin(), &Selection::none(), &config);
        for node in &layout.nodes {
            assert!((node.left_pct / 100.0 * layout.width - node.center.x).abs() < 1e-3, "{}", node.id);
            assert!((node.top_pct / 100.0 * layout.height - node.center.y).abs() < 1e-3, "{}", node.id);
        }
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(parse_config(r#"{ "theme": "neon" }"#).is_err());
    }
}
