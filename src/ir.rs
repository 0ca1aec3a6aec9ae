use serde::{Deserialize, Serialize};
use std::fmt;

use crate::icon::IconKind;

/// Platform affiliation of a node. Only ever used to pick a style bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum TechStack {
    Azure,
    Databricks,
    Microsoft,
    Generic,
}

impl From<String> for TechStack {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "azure" => Self::Azure,
            "databricks" => Self::Databricks,
            "microsoft" => Self::Microsoft,
            _ => Self::Generic,
        }
    }
}

impl TechStack {
    pub fn name(self) -> &'static str {
        match self {
            Self::Azure => "Azure",
            Self::Databricks => "Databricks",
            Self::Microsoft => "Microsoft",
            Self::Generic => "Generic",
        }
    }

    /// Text shown on the node badge. Generic nodes read as "System".
    pub fn badge_text(self) -> &'static str {
        match self {
            Self::Generic => "System",
            other => other.name(),
        }
    }
}

impl fmt::Display for TechStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_label: Option<String>,
    #[serde(default)]
    pub description: String,
    pub tech_stack: TechStack,
    #[serde(default)]
    pub tech_details: Vec<String>,
    #[serde(default)]
    pub icon: IconKind,
    /// Percentage of the container width, 0..=100.
    pub x: f32,
    /// Percentage of the container height, 0..=100.
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

impl Node {
    pub fn new(id: &str, label: &str, tech_stack: TechStack, x: f32, y: f32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            sub_label: None,
            description: String::new(),
            tech_stack,
            tech_details: Vec::new(),
            icon: IconKind::default(),
            x,
            y,
            width: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Feedback/retraining loop: routed as a wide dashed bow.
    #[serde(default)]
    pub curved: bool,
}

impl Edge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            label: None,
            curved: false,
        }
    }

    pub fn feedback(from: &str, to: &str, label: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            label: Some(label.to_string()),
            curved: true,
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.from == id || self.to == id
    }
}

/// Ordered node and edge records. Node order is paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// The currently active node, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Option<String>);

impl Selection {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn of(id: &str) -> Self {
        Self(Some(id.to_string()))
    }

    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    pub fn is(&self, id: &str) -> bool {
        self.0.as_deref() == Some(id)
    }

    pub fn set(&mut self, id: &str) {
        self.0 = Some(id.to_string());
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Resolves the selected record. A selection that names no node reads as none.
    pub fn resolve<'a>(&self, diagram: &'a Diagram) -> Option<&'a Node> {
        self.id().and_then(|id| diagram.node(id))
    }
}

impl From<Option<&str>> for Selection {
    fn from(value: Option<&str>) -> Self {
        Self(value.map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tech_stack_falls_back_to_generic() {
        let stack: TechStack = serde_json::from_str("\"Oracle\"").unwrap();
        assert_eq!(stack, TechStack::Generic);
        assert_eq!(stack.badge_text(), "System");
        assert_eq!(TechStack::Azure.badge_text(), "Azure");
    }

    #[test]
    fn selection_lifecycle() {
        let mut selection = Selection::none();
        assert!(!selection.is_some());
        selection.set("model");
        assert!(selection.is("model"));
        assert!(!selection.is("graph"));
        selection.clear();
        assert_eq!(selection.id(), None);
    }

    #[test]
    fn selection_of_missing_node_resolves_to_none() {
        let mut diagram = Diagram::new();
        diagram.nodes.push(Node::new("a", "A", TechStack::Azure, 5.0, 40.0));
        assert!(Selection::of("a").resolve(&diagram).is_some());
        assert!(Selection::of("zz").resolve(&diagram).is_none());
    }
}
