use serde::{Deserialize, Serialize};

/// Anything that can be drawn into a square at a given size and color.
///
/// Glyphs are authored on a 24x24 grid; `render_at` scales and places them.
/// The renderer never looks inside an icon.
pub trait Icon {
    /// Glyph markup on the 24x24 grid, colored with `color`.
    fn glyph(&self, color: &str) -> String;

    /// Places the glyph with its top-left corner at `(x, y)` in the caller's space.
    fn render_at(&self, x: f32, y: f32, size: f32, color: &str) -> String {
        let scale = size / 24.0;
        format!(
            "<g transform=\"translate({x:.2} {y:.2}) scale({scale:.4})\">{}</g>",
            self.glyph(color)
        )
    }

    /// Standalone inline `<svg>` element, for HTML surfaces.
    fn inline_svg(&self, size: f32, color: &str) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 24 24\" fill=\"none\">{}</svg>",
            self.glyph(color)
        )
    }
}

/// Built-in icon set. Unknown names in a dataset file resolve to `Box`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "kebab-case")]
pub enum IconKind {
    Azure,
    Databricks,
    ShieldAlert,
    Activity,
    Search,
    Globe,
    #[default]
    Box,
    CheckCircle,
    Close,
}

impl From<String> for IconKind {
    fn from(value: String) -> Self {
        Self::from_name(&value).unwrap_or_default()
    }
}

impl IconKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "azure" | "azureicon" => Some(Self::Azure),
            "databricks" | "databricksicon" => Some(Self::Databricks),
            "shieldalert" | "shield" => Some(Self::ShieldAlert),
            "activity" => Some(Self::Activity),
            "search" => Some(Self::Search),
            "globe" => Some(Self::Globe),
            "box" => Some(Self::Box),
            "checkcircle" | "checkcircle2" => Some(Self::CheckCircle),
            "x" | "close" => Some(Self::Close),
            _ => None,
        }
    }
}

impl Icon for IconKind {
    fn glyph(&self, color: &str) -> String {
        match self {
            Self::Azure => format!(
                "<path d=\"M12.9 2.1L4.8 16.2L12.9 21.9L21 16.2L12.9 2.1Z\" fill=\"{color}\" fill-opacity=\"0.2\"/>\
                 <path d=\"M5.5 16.5L12 5L13.5 8L9.5 15L5.5 16.5Z\" fill=\"{color}\"/>\
                 <path d=\"M11.5 21L8 16L15 6L18 16L11.5 21Z\" fill=\"{color}\" fill-opacity=\"0.8\"/>"
            ),
            Self::Databricks => format!(
                "<path d=\"M2.5 19.5L12 23L13.5 11.5L4 8L2.5 19.5Z\" fill=\"{color}\" fill-opacity=\"0.8\"/>\
                 <path d=\"M5 6L14.5 9.5L21.5 5.5L12 2L5 6Z\" fill=\"{color}\" fill-opacity=\"0.6\"/>\
                 <path d=\"M16 11L14.5 22.5L22 17L23.5 5.5L16 11Z\" fill=\"{color}\"/>"
            ),
            Self::ShieldAlert => stroked(
                color,
                "<path d=\"M20 13c0 5-3.5 7.5-7.66 8.95a1 1 0 0 1-.67-.01C7.5 20.5 4 18 4 13V6a1 1 0 0 1 1-1c2 0 4.5-1.2 6.24-2.72a1.17 1.17 0 0 1 1.52 0C14.51 3.81 17 5 19 5a1 1 0 0 1 1 1z\"/>\
                 <path d=\"M12 8v4\"/><path d=\"M12 16h.01\"/>",
            ),
            Self::Activity => stroked(color, "<path d=\"M22 12h-4l-3 9L9 3l-3 9H2\"/>"),
            Self::Search => stroked(
                color,
                "<circle cx=\"11\" cy=\"11\" r=\"8\"/><path d=\"m21 21-4.3-4.3\"/>",
            ),
            Self::Globe => stroked(
                color,
                "<circle cx=\"12\" cy=\"12\" r=\"10\"/>\
                 <path d=\"M12 2a14.5 14.5 0 0 0 0 20 14.5 14.5 0 0 0 0-20\"/><path d=\"M2 12h20\"/>",
            ),
            Self::Box => stroked(
                color,
                "<path d=\"M21 8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16Z\"/>\
                 <path d=\"m3.3 7 8.7 5 8.7-5\"/><path d=\"M12 22V12\"/>",
            ),
            Self::CheckCircle => stroked(
                color,
                "<circle cx=\"12\" cy=\"12\" r=\"10\"/><path d=\"m9 12 2 2 4-4\"/>",
            ),
            Self::Close => stroked(color, "<path d=\"M18 6 6 18\"/><path d=\"m6 6 12 12\"/>"),
        }
    }
}

fn stroked(color: &str, body: &str) -> String {
    format!(
        "<g fill=\"none\" stroke=\"{color}\" stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\">{body}</g>"
    )
}
