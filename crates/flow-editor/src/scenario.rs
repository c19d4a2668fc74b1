use chrono::{DateTime, Utc};
use eframe::egui::{Pos2, pos2};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::graph::{FlowEdge, FlowGraph, FlowNode, NodeConfig, NodeId, NodeKind};
use crate::settings::EditorSettings;

// ------------------------------------------------------------------
// Scenario record
// ------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    #[default]
    Draft,
    Published,
    Disabled,
}

impl ScenarioStatus {
    pub fn label(self) -> &'static str {
        match self {
            ScenarioStatus::Draft => "Draft",
            ScenarioStatus::Published => "Published",
            ScenarioStatus::Disabled => "Disabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerializablePosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub sub_type: String,
    pub label: String,
    /// As stored; may be non-finite until the record is turned into a graph.
    pub position: SerializablePosition,
    #[serde(default)]
    pub config: NodeConfig,
}

/// A named, persisted flow graph as the scenario list screen stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ScenarioStatus,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    nodes: Vec<SerializableNode>,
    #[serde(default)]
    edges: Vec<FlowEdge>,
}

impl Scenario {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            status: ScenarioStatus::Draft,
            updated_at: Utc::now(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Nodes as last saved. Only `snapshot` writes them.
    pub fn nodes(&self) -> &[SerializableNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Build the editable graph for this scenario.
    ///
    /// Non-finite coordinates are moved to the origin and duplicate node
    /// ids keep their first occurrence.
    pub fn to_graph(&self) -> FlowGraph {
        let nodes = self
            .nodes
            .iter()
            .map(|node| FlowNode {
                id: node.id.clone(),
                kind: node.kind,
                sub_type: node.sub_type.clone(),
                label: node.label.clone(),
                position: sanitize_position(&node.id, node.position),
                config: node.config.clone(),
            })
            .collect();
        FlowGraph::from_parts(nodes, self.edges.clone())
    }

    /// Store the graph's current collections in this record and stamp it.
    pub fn snapshot(&mut self, graph: &FlowGraph) {
        self.nodes = graph
            .nodes()
            .iter()
            .map(|node| SerializableNode {
                id: node.id.clone(),
                kind: node.kind,
                sub_type: node.sub_type.clone(),
                label: node.label.clone(),
                position: SerializablePosition {
                    x: node.position.x,
                    y: node.position.y,
                },
                config: node.config.clone(),
            })
            .collect();
        self.edges = graph.edges().to_vec();
        self.updated_at = Utc::now();
    }
}

fn sanitize_position(id: &NodeId, position: SerializablePosition) -> Pos2 {
    if position.x.is_finite() && position.y.is_finite() {
        pos2(position.x, position.y)
    } else {
        warn!(node_id = %id, "non-finite node position reset to origin");
        Pos2::ZERO
    }
}

// ------------------------------------------------------------------
// Project file
// ------------------------------------------------------------------

/// What the editor writes to disk: the scenario plus editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub scenario: Scenario,
    #[serde(default)]
    pub settings: EditorSettings,
}

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse project file: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize project: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub fn save_to_file(
    project: &ProjectFile,
    path: &Path,
) -> Result<(), ScenarioError> {
    let json = serde_json::to_string_pretty(project)
        .map_err(ScenarioError::Serialize)?;
    std::fs::write(path, json).map_err(|source| ScenarioError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_from_file(path: &Path) -> Result<ProjectFile, ScenarioError> {
    let json = std::fs::read_to_string(path).map_err(|source| {
        ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;
    serde_json::from_str(&json).map_err(ScenarioError::Parse)
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
