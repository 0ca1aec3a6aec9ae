use archflow::{Diagram, RenderOptions, Theme, parse_dataset, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchitectureRenderOptions {
    theme: Option<String>,
    selected: Option<String>,
    font_family: Option<String>,
}

fn build_render_options(options: ArchitectureRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = match options.theme.as_deref() {
        None => RenderOptions::dark(),
        Some(name) => {
            let theme = Theme::by_name(name).ok_or_else(|| format!("unknown theme '{name}'"))?;
            let mut render_options = RenderOptions::default();
            render_options.config.theme = theme;
            render_options
        }
    };

    if let Some(font_family) = options.font_family {
        render_options.config.theme.font_family = font_family;
    }

    Ok(render_options.with_selection(options.selected.as_deref()))
}

#[wasm_bindgen]
pub fn render_architecture_svg(
    dataset_json: Option<String>,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ArchitectureRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ArchitectureRenderOptions::default()
    };
    let render_options = build_render_options(options).map_err(|error| JsValue::from_str(&error))?;

    let parsed;
    let diagram = match dataset_json {
        Some(raw) => {
            parsed = parse_dataset(&raw).map_err(|error| JsValue::from_str(&error.to_string()))?;
            &parsed
        }
        None => Diagram::builtin(),
    };
    Ok(render_with_options(diagram, &render_options))
}
