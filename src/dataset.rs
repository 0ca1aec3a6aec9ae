use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::icon::IconKind;
use crate::ir::{Diagram, Edge, Node, TechStack};

static NODE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

static BUILTIN: Lazy<Diagram> = Lazy::new(fraud_detection_pipeline);

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("duplicate node id '{0}'")]
    DuplicateId(String),
    #[error("node id '{0}' must match [A-Za-z0-9_-]+")]
    InvalidId(String),
    #[error("node '{id}' is positioned at ({x}, {y}); both axes must lie in 0..=100")]
    OutOfRange { id: String, x: f32, y: f32 },
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Parse(String),
}

impl Diagram {
    /// The fraud-detection architecture shipped with the crate.
    pub fn builtin() -> &'static Diagram {
        &BUILTIN
    }

    /// Load-time checks on node records. Edges are never checked; dangling
    /// references are dropped by the layout instead.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !NODE_ID_RE.is_match(&node.id) {
                return Err(DatasetError::InvalidId(node.id.clone()));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(DatasetError::DuplicateId(node.id.clone()));
            }
            let in_range = |v: f32| (0.0..=100.0).contains(&v);
            if !in_range(node.x) || !in_range(node.y) {
                return Err(DatasetError::OutOfRange {
                    id: node.id.clone(),
                    x: node.x,
                    y: node.y,
                });
            }
        }
        Ok(())
    }
}

/// Parses a dataset document. Strict JSON is tried first, then JSON5.
pub fn parse_dataset(contents: &str) -> Result<Diagram, DatasetError> {
    let diagram = match serde_json::from_str::<Diagram>(contents) {
        Ok(diagram) => diagram,
        Err(json_err) => json5::from_str::<Diagram>(contents).map_err(|json5_err| {
            DatasetError::Parse(format!("{json_err} (as JSON5: {json5_err})"))
        })?,
    };
    diagram.validate()?;
    Ok(diagram)
}

pub fn load_dataset(path: &Path) -> Result<Diagram, DatasetError> {
    let contents = std::fs::read_to_string(path)?;
    let diagram = parse_dataset(&contents)?;
    tracing::info!(
        path = %path.display(),
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        "loaded dataset"
    );
    Ok(diagram)
}

struct NodeSpec {
    id: &'static str,
    label: &'static str,
    sub_label: &'static str,
    description: &'static str,
    stack: TechStack,
    details: &'static [&'static str],
    icon: IconKind,
    x: f32,
    y: f32,
}

impl NodeSpec {
    fn build(&self) -> Node {
        Node {
            sub_label: Some(self.sub_label.to_string()),
            description: self.description.to_string(),
            tech_details: self.details.iter().map(|d| d.to_string()).collect(),
            icon: self.icon,
            ..Node::new(self.id, self.label, self.stack, self.x, self.y)
        }
    }
}

const SOURCES_DESCRIPTION: &str = "Data flows in from Microsoft and LSEG sources:
\u{2022} Transaction streams
\u{2022} User/account data
\u{2022} Device metadata
\u{2022} Geo/IP data
\u{2022} Labels & fraud-case logs

Streaming data enters via EventHub.
Batch data enters via Data Factory.

Why this step matters:
You need raw, continuous data to power fraud detection. Without this, the model cannot function.";

const NODES: &[NodeSpec] = &[
    NodeSpec {
        id: "sources",
        label: "Ingestion Layer",
        sub_label: "Data Sources & Intake",
        description: SOURCES_DESCRIPTION,
        stack: TechStack::Azure,
        details: &[
            "Azure Data Factory",
            "Azure Event Hubs",
            "API Connectors",
            "Data Intake Agent",
        ],
        icon: IconKind::Azure,
        x: 5.0,
        y: 40.0,
    },
    NodeSpec {
        id: "agents",
        label: "Autonomous Agents",
        sub_label: "Agentic AI (ETL)",
        description: "Automated scripts for data extraction, transformation, and loading. Handles schema inference, data validation, deduplication, and near real-time processing using Databricks Auto Loader.",
        stack: TechStack::Databricks,
        details: &[
            "Databricks Workflows",
            "Auto Loader",
            "Delta Live Tables",
            "Spark Structured Streaming",
        ],
        icon: IconKind::Databricks,
        x: 25.0,
        y: 40.0,
    },
    NodeSpec {
        id: "storage",
        label: "Unified Data Storage",
        sub_label: "Delta Lake",
        description: "Centralized storage layer supporting ACID transactions. Houses raw, standardized, and modeled data in a medallion architecture (Bronze/Silver/Gold).",
        stack: TechStack::Databricks,
        details: &["Azure Data Lake Gen2", "Delta Lake", "Unity Catalog"],
        icon: IconKind::Databricks,
        x: 25.0,
        y: 75.0,
    },
    NodeSpec {
        id: "features",
        label: "Feature Engineering",
        sub_label: "Variable Derivation",
        description: "Derives new variables from raw data (e.g., transaction frequency, velocity, network patterns). Uses domain expertise and statistical methods to prepare data for ML models.",
        stack: TechStack::Databricks,
        details: &["Databricks Feature Store", "PySpark", "Pandas API on Spark"],
        icon: IconKind::Databricks,
        x: 50.0,
        y: 25.0,
    },
    NodeSpec {
        id: "graph",
        label: "Knowledge Graph",
        sub_label: "Entity Relations",
        description: "Maps complex relationships between entities to detect organized fraud rings. Enriched by outputs from the fraud model.",
        stack: TechStack::Azure,
        details: &["Azure Cosmos DB (Gremlin API)", "GraphFrames"],
        icon: IconKind::Azure,
        x: 50.0,
        y: 75.0,
    },
    NodeSpec {
        id: "vector",
        label: "Vector Search",
        sub_label: "Similarity Search",
        description: "Enables semantic search capabilities over unstructured data to find similar fraud patterns across the dataset.",
        stack: TechStack::Databricks,
        details: &["Databricks Vector Search", "Mosaic AI"],
        icon: IconKind::Search,
        x: 40.0,
        y: 60.0,
    },
    NodeSpec {
        id: "model",
        label: "APP Fraud Model",
        sub_label: "Scoring Engine",
        description: "Machine Learning models (e.g., XGBoost, Deep Learning) that predict fraud probability (0-1). Interprets manager data linearly and outputs a risk score.",
        stack: TechStack::Databricks,
        details: &[
            "MLflow",
            "Azure Machine Learning",
            "XGBoost",
            "TensorFlow",
        ],
        icon: IconKind::Databricks,
        x: 70.0,
        y: 60.0,
    },
    NodeSpec {
        id: "gateway",
        label: "API Gateway",
        sub_label: "Product Consumption",
        description: "Secure entry point for external systems to consume fraud scores and alerts. Manages traffic, rate limiting, and authentication.",
        stack: TechStack::Azure,
        details: &["Azure API Management", "Azure Functions"],
        icon: IconKind::Globe,
        x: 70.0,
        y: 35.0,
    },
    NodeSpec {
        id: "alerts",
        label: "Fraud Detection & Alerts",
        sub_label: "Decisioning",
        description: "Rule-based systems combined with model thresholds. Triggers review teams when scores cross specific limits. Includes feedback loops for model retraining.",
        stack: TechStack::Generic,
        details: &["Power BI", "Custom Dashboards", "Logic Apps"],
        icon: IconKind::ShieldAlert,
        x: 90.0,
        y: 25.0,
    },
    NodeSpec {
        id: "anomaly",
        label: "Anomaly Detection",
        sub_label: "Unsupervised AI",
        description: "Unsupervised learning algorithms (Isolation Forest, Autoencoders) to detect novel fraud patterns not captured by supervised models.",
        stack: TechStack::Databricks,
        details: &["Isolation Forest", "Autoencoders", "Model Monitoring"],
        icon: IconKind::Activity,
        x: 90.0,
        y: 75.0,
    },
];

fn fraud_detection_pipeline() -> Diagram {
    let nodes = NODES.iter().map(NodeSpec::build).collect();
    let edges = vec![
        Edge::new("sources", "agents"),
        Edge::new("agents", "storage"),
        Edge::new("agents", "features"),
        Edge::new("storage", "vector"),
        Edge::new("vector", "model"),
        Edge::new("features", "gateway"),
        Edge::new("features", "model"),
        Edge::new("storage", "graph"),
        // model and graph feed each other; kept as two one-way edges
        Edge::new("model", "graph"),
        Edge::new("graph", "model"),
        Edge::new("model", "gateway"),
        Edge::new("model", "anomaly"),
        Edge::new("gateway", "alerts"),
        Edge::new("gateway", "anomaly"),
        Edge::feedback("anomaly", "model", "Feedback Loop"),
        Edge::feedback("alerts", "model", "Retraining"),
    ];
    Diagram { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let diagram = Diagram::builtin();
        assert_eq!(diagram.nodes.len(), 10);
        assert_eq!(diagram.edges.len(), 16);
        diagram.validate().unwrap();
        assert_eq!(diagram.edges.iter().filter(|e| e.curved).count(), 2);
    }

    #[test]
    fn builtin_keeps_detail_order() {
        let model = Diagram::builtin().node("model").unwrap();
        assert_eq!(model.tech_details[0], "MLflow");
        assert_eq!(model.tech_details[3], "TensorFlow");
    }

    #[test]
    fn duplicate_ids_fail_fast() {
        let err = parse_dataset(
            r#"{ "nodes": [
                { "id": "a", "label": "A", "techStack": "Azure", "x": 1, "y": 1 },
                { "id": "a", "label": "A2", "techStack": "Azure", "x": 2, "y": 2 }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let err = parse_dataset(
            r#"{ "nodes": [ { "id": "a", "label": "A", "techStack": "Azure", "x": 101, "y": 1 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::OutOfRange { .. }));
    }

    #[test]
    fn invalid_ids_are_rejected() {
        let err = parse_dataset(
            r#"{ "nodes": [ { "id": "a b", "label": "A", "techStack": "Azure", "x": 1, "y": 1 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidId(_)));
    }

    #[test]
    fn json5_documents_parse() {
        let diagram = parse_dataset(
            r#"{
                // comments and trailing commas are fine
                nodes: [
                    { id: 'a', label: 'A', techStack: 'Databricks', icon: 'search', x: 5, y: 40, },
                ],
                edges: [ { from: 'a', to: 'ghost', curved: true } ],
            }"#,
        )
        .unwrap();
        assert_eq!(diagram.nodes[0].icon, IconKind::Search);
        assert_eq!(diagram.nodes[0].tech_stack, TechStack::Databricks);
        assert!(diagram.edges[0].curved);
    }

    #[test]
    fn empty_document_is_valid() {
        let diagram = parse_dataset("{}").unwrap();
        assert!(diagram.is_empty());
    }

    #[test]
    fn garbage_reports_parse_error() {
        assert!(matches!(parse_dataset("nodes:"), Err(DatasetError::Parse(_))));
    }
}
