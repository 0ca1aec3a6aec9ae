use crate::config::PanelConfig;
use crate::icon::{Icon, IconKind};
use crate::ir::{Diagram, Node, Selection};
use crate::render::escape_xml;
use crate::theme::{PanelPalette, panel_palette};

/// What the side panel shows for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailPanel<'a> {
    Placeholder { title: String, text: String },
    Node(NodeDetails<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetails<'a> {
    pub node: &'a Node,
    pub palette: PanelPalette,
    pub role: String,
}

impl<'a> NodeDetails<'a> {
    /// Description split on its embedded line breaks.
    pub fn description_lines(&self) -> Vec<&'a str> {
        self.node.description.lines().collect()
    }

    /// The full detail list, never truncated.
    pub fn details(&self) -> &'a [String] {
        &self.node.tech_details
    }
}

/// Short purpose phrase for a node. Only three components get bespoke wording.
pub fn role_phrase(node_id: &str) -> &'static str {
    match node_id {
        "storage" => "single source of truth",
        "agents" => "automated reliability",
        "model" => "predictive accuracy",
        _ => "seamless data flow",
    }
}

pub fn role_sentence(node: &Node, pipeline_name: &str) -> String {
    format!(
        "Part of the {} ecosystem within the {pipeline_name} pipeline. Ensures {}.",
        node.tech_stack,
        role_phrase(&node.id)
    )
}

impl<'a> DetailPanel<'a> {
    pub fn build(diagram: &'a Diagram, selection: &Selection, config: &PanelConfig) -> Self {
        match selection.resolve(diagram) {
            Some(node) => Self::Node(NodeDetails {
                node,
                palette: panel_palette(node.tech_stack),
                role: role_sentence(node, &config.pipeline_name),
            }),
            None => Self::Placeholder {
                title: config.placeholder_title.clone(),
                text: config.placeholder_text.clone(),
            },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    pub fn to_text(&self) -> String {
        let details = match self {
            Self::Placeholder { title, text } => return format!("{title}\n\n{text}\n"),
            Self::Node(details) => details,
        };
        let node = details.node;
        let mut out = String::new();
        out.push_str(&format!("{}  [{}]\n", node.label, node.tech_stack));
        if let Some(sub_label) = &node.sub_label {
            out.push_str(&format!("{sub_label}\n"));
        }
        out.push_str("\nFUNCTIONALITY\n");
        for line in details.description_lines() {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("\nTECHNOLOGY STACK\n");
        for tech in details.details() {
            out.push_str(&format!("  \u{2713} {tech}\n"));
        }
        out.push_str("\nARCHITECTURAL ROLE\n");
        out.push_str(&details.role);
        out.push('\n');
        out
    }

    /// Panel markup for the page shell. The close button carries
    /// `data-action="close"`.
    pub fn to_html(&self) -> String {
        let details = match self {
            Self::Placeholder { title, text } => {
                return format!(
                    "<div class=\"panel placeholder\"><p class=\"panel-title\">{}</p><p class=\"panel-hint\">{}</p></div>",
                    escape_xml(title),
                    escape_xml(text)
                );
            }
            Self::Node(details) => details,
        };
        let node = details.node;
        let palette = details.palette;
        let mut out = format!(
            "<div class=\"panel\" data-id=\"{}\" style=\"background:linear-gradient(to bottom,{},#ffffff)\">",
            escape_xml(&node.id),
            palette.gradient_from
        );

        out.push_str("<div class=\"panel-header\"><div>");
        out.push_str(&format!(
            "<div class=\"panel-badges\"><span class=\"panel-icon\" style=\"background:{}\">{}</span><span class=\"panel-badge\" style=\"background:{};color:{}\">{}</span></div>",
            palette.icon_background,
            node.icon.inline_svg(20.0, palette.header),
            palette.badge_background,
            palette.badge_text,
            escape_xml(node.tech_stack.name())
        ));
        out.push_str(&format!("<h2>{}</h2>", escape_xml(&node.label)));
        if let Some(sub_label) = &node.sub_label {
            out.push_str(&format!("<p class=\"panel-sub\">{}</p>", escape_xml(sub_label)));
        }
        out.push_str(&format!(
            "</div><button class=\"panel-close\" data-action=\"close\">{}</button></div>",
            IconKind::Close.inline_svg(20.0, "#94a3b8")
        ));

        out.push_str("<div class=\"panel-body\"><h3>Functionality</h3>");
        out.push_str(&format!(
            "<p class=\"panel-description\">{}</p>",
            details
                .description_lines()
                .iter()
                .map(|line| escape_xml(line))
                .collect::<Vec<_>>()
                .join("<br/>")
        ));

        out.push_str("<h3>Technology Stack</h3><ul class=\"panel-stack\">");
        for tech in details.details() {
            out.push_str(&format!(
                "<li>{}<span>{}</span></li>",
                IconKind::CheckCircle.inline_svg(16.0, palette.header),
                escape_xml(tech)
            ));
        }
        out.push_str("</ul>");

        out.push_str(&format!(
            "<div class=\"panel-role\"><h4>Architectural Role</h4><p>{}</p></div>",
            escape_xml(&details.role)
        ));
        out.push_str("</div></div>");
        out
    }
}
