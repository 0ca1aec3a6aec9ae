use serde::{Deserialize, Serialize};

use crate::ir::TechStack;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub grid_dot_color: String,
    pub frame_border: String,
    pub node_fill: String,
    pub node_text_color: String,
    pub node_sub_text_color: String,
    pub node_divider: String,
    pub icon_well: String,
    pub edge_color: String,
    pub edge_active_color: String,
    pub edge_width: f32,
    pub edge_active_width: f32,
    pub marker_color: String,
    pub marker_active_color: String,
    pub edge_label_color: String,
    pub edge_label_size: f32,
    pub loop_dasharray: String,
}

impl Theme {
    /// Slate canvas with cyan highlights.
    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            background: "#0f172a".to_string(),
            grid_dot_color: "#94a3b8".to_string(),
            frame_border: "#334155".to_string(),
            node_fill: "#1e293b".to_string(),
            node_text_color: "#e2e8f0".to_string(),
            node_sub_text_color: "#94a3b8".to_string(),
            node_divider: "#334155".to_string(),
            icon_well: "#0f172a".to_string(),
            edge_color: "#475569".to_string(),
            edge_active_color: "#38bdf8".to_string(),
            edge_width: 2.0,
            edge_active_width: 3.0,
            marker_color: "#64748b".to_string(),
            marker_active_color: "#38bdf8".to_string(),
            edge_label_color: "#94a3b8".to_string(),
            edge_label_size: 12.0,
            loop_dasharray: "5,5".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: "#f8fafc".to_string(),
            grid_dot_color: "#cbd5e1".to_string(),
            frame_border: "#e2e8f0".to_string(),
            node_fill: "#ffffff".to_string(),
            node_text_color: "#0f172a".to_string(),
            node_sub_text_color: "#64748b".to_string(),
            node_divider: "#e2e8f0".to_string(),
            icon_well: "#f1f5f9".to_string(),
            edge_color: "#94a3b8".to_string(),
            edge_active_color: "#0284c7".to_string(),
            marker_color: "#94a3b8".to_string(),
            marker_active_color: "#0284c7".to_string(),
            edge_label_color: "#475569".to_string(),
            ..Self::dark()
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" | "default" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Colors a node box is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleBundle {
    pub border: &'static str,
    pub glow: Option<&'static str>,
    pub icon_tint: &'static str,
    pub badge: &'static str,
    pub bullet: &'static str,
}

struct CategoryStyle {
    stack: TechStack,
    badge: &'static str,
    bullet: &'static str,
    selected_border: &'static str,
    selected_glow: &'static str,
    selected_icon: &'static str,
}

const IDLE_BORDER: &str = "#475569";
const IDLE_ICON: &str = "#94a3b8";

const CATEGORY_STYLES: [CategoryStyle; 4] = [
    CategoryStyle {
        stack: TechStack::Azure,
        badge: "#0891b2",
        bullet: "#06b6d4",
        selected_border: "#06b6d4",
        selected_glow: "rgba(6,182,212,0.5)",
        selected_icon: "#22d3ee",
    },
    CategoryStyle {
        stack: TechStack::Databricks,
        badge: "#ea580c",
        bullet: "#f97316",
        selected_border: "#f97316",
        selected_glow: "rgba(249,115,22,0.5)",
        selected_icon: "#fb923c",
    },
    CategoryStyle {
        stack: TechStack::Microsoft,
        badge: "#1d4ed8",
        bullet: "#64748b",
        selected_border: "#3b82f6",
        selected_glow: "rgba(59,130,246,0.5)",
        selected_icon: "#60a5fa",
    },
    CategoryStyle {
        stack: TechStack::Generic,
        badge: "#475569",
        bullet: "#64748b",
        selected_border: "#3b82f6",
        selected_glow: "rgba(59,130,246,0.5)",
        selected_icon: "#60a5fa",
    },
];

fn category_entry(stack: TechStack) -> &'static CategoryStyle {
    CATEGORY_STYLES
        .iter()
        .find(|entry| entry.stack == stack)
        .unwrap_or(&CATEGORY_STYLES[CATEGORY_STYLES.len() - 1])
}

pub fn node_style(stack: TechStack, selected: bool) -> StyleBundle {
    let entry = category_entry(stack);
    if selected {
        StyleBundle {
            border: entry.selected_border,
            glow: Some(entry.selected_glow),
            icon_tint: entry.selected_icon,
            badge: entry.badge,
            bullet: entry.bullet,
        }
    } else {
        StyleBundle {
            border: IDLE_BORDER,
            glow: None,
            icon_tint: IDLE_ICON,
            badge: entry.badge,
            bullet: entry.bullet,
        }
    }
}

/// Colors of the detail panel. Azure reads cyan, Databricks orange, the rest blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelPalette {
    pub header: &'static str,
    pub icon_background: &'static str,
    pub badge_background: &'static str,
    pub badge_text: &'static str,
    pub gradient_from: &'static str,
}

pub fn panel_palette(stack: TechStack) -> PanelPalette {
    match stack {
        TechStack::Azure => PanelPalette {
            header: "#0e7490",
            icon_background: "#ecfeff",
            badge_background: "#cffafe",
            badge_text: "#155e75",
            gradient_from: "rgba(236,254,255,0.8)",
        },
        TechStack::Databricks => PanelPalette {
            header: "#c2410c",
            icon_background: "#fff7ed",
            badge_background: "#ffedd5",
            badge_text: "#9a3412",
            gradient_from: "rgba(255,247,237,0.8)",
        },
        _ => PanelPalette {
            header: "#1d4ed8",
            icon_background: "#eff6ff",
            badge_background: "#dbeafe",
            badge_text: "#1e40af",
            gradient_from: "rgba(239,246,255,0.8)",
        },
    }
}
