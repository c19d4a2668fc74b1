// Graph store - node/edge collections for the open scenario

use eframe::egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Open key/value configuration of a node. Valid keys depend on the
/// node's subtype; keys the schema does not know are kept untouched.
pub type NodeConfig = Map<String, Value>;

// ------------------------------------------------------------------
// Identifiers
// ------------------------------------------------------------------

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("node_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("edge_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ------------------------------------------------------------------
// Nodes and edges
// ------------------------------------------------------------------

/// Rendering/grouping category of a node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Trigger,
    Agent,
    Logic,
    Action,
    Data,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Trigger,
        NodeKind::Agent,
        NodeKind::Logic,
        NodeKind::Action,
        NodeKind::Data,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Trigger => "Triggers",
            NodeKind::Agent => "Agents",
            NodeKind::Logic => "Logic",
            NodeKind::Action => "Actions",
            NodeKind::Data => "Data",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub sub_type: String,
    pub label: String,
    /// Top-left corner of the node box, in world coordinates.
    pub position: Pos2,
    pub config: NodeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

impl FlowEdge {
    pub fn touches(&self, node_id: &NodeId) -> bool {
        self.source == *node_id || self.target == *node_id
    }
}

// ------------------------------------------------------------------
// Store
// ------------------------------------------------------------------

/// Node and edge collections of one open scenario.
///
/// Nodes are kept in draw order: later nodes are painted on top and win
/// hit tests. Edges may reference nodes that do not exist; the renderer
/// skips them instead of treating the graph as corrupt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowGraph {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from externally supplied collections.
    ///
    /// Node ids must be unique, so later duplicates are dropped.
    pub fn from_parts(nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> Self {
        let mut graph = Self::new();
        graph.replace(nodes, edges);
        graph
    }

    /// Replace both collections wholesale.
    pub fn replace(&mut self, nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) {
        let mut seen = HashSet::new();
        self.nodes = nodes
            .into_iter()
            .filter(|node| {
                let fresh = seen.insert(node.id.clone());
                if !fresh {
                    warn!(node_id = %node.id, "dropping duplicate node id");
                }
                fresh
            })
            .collect();
        self.edges = edges;
    }

    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&FlowNode> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut FlowNode> {
        self.nodes.iter_mut().find(|node| node.id == *id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&FlowEdge> {
        self.edges.iter().find(|edge| edge.id == *id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn nodes_by_id(&self) -> HashMap<&NodeId, &FlowNode> {
        self.nodes.iter().map(|node| (&node.id, node)).collect()
    }

    pub fn outgoing_edges<'a>(
        &'a self,
        id: &'a NodeId,
    ) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.source == *id)
    }

    /// Edges with at least one endpoint missing from the node set.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &FlowEdge> + '_ {
        self.edges.iter().filter(|edge| {
            !self.contains_node(&edge.source)
                || !self.contains_node(&edge.target)
        })
    }

    /// Insert a node with a fresh id. The label starts as the subtype key.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        sub_type: impl Into<String>,
        position: Pos2,
        default_config: NodeConfig,
    ) -> NodeId {
        let mut id = NodeId::generate();
        while self.contains_node(&id) {
            id = NodeId::generate();
        }
        let sub_type = sub_type.into();
        debug!(node_id = %id, %sub_type, ?position, "add node");
        self.nodes.push(FlowNode {
            id: id.clone(),
            kind,
            label: sub_type.clone(),
            sub_type,
            position,
            config: default_config,
        });
        id
    }

    /// Translate a node by `delta`. Returns false for an unknown id.
    pub fn move_node(&mut self, id: &NodeId, delta: Vec2) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position += delta;
                true
            }
            None => false,
        }
    }

    pub fn update_node_label(
        &mut self,
        id: &NodeId,
        label: impl Into<String>,
    ) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.label = label.into();
                true
            }
            None => false,
        }
    }

    /// Shallow-merge `patch` into the node's config.
    pub fn update_node_config(&mut self, id: &NodeId, patch: NodeConfig) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                for (key, value) in patch {
                    node.config.insert(key, value);
                }
                true
            }
            None => false,
        }
    }

    /// Append an edge. Endpoints are not checked here; an edge may be
    /// created while its target is still being placed.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        label: Option<String>,
        branch_id: Option<String>,
    ) -> EdgeId {
        let mut id = EdgeId::generate();
        while self.edge(&id).is_some() {
            id = EdgeId::generate();
        }
        debug!(edge_id = %id, %source, %target, "add edge");
        self.edges.push(FlowEdge {
            id: id.clone(),
            source,
            target,
            label,
            branch_id,
        });
        id
    }

    /// Remove a node. Its edges stay in place and dangle.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<FlowNode> {
        let index = self.nodes.iter().position(|node| node.id == *id)?;
        Some(self.nodes.remove(index))
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<FlowEdge> {
        let index = self.edges.iter().position(|edge| edge.id == *id)?;
        Some(self.edges.remove(index))
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node_cascade(
        &mut self,
        id: &NodeId,
    ) -> Option<(FlowNode, Vec<FlowEdge>)> {
        let node = self.remove_node(id)?;
        let (removed, kept) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|edge| edge.touches(id));
        self.edges = kept;
        Some((node, removed))
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};
    use serde_json::json;

    fn config(value: Value) -> NodeConfig {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn two_node_graph() -> (FlowGraph, NodeId, NodeId) {
        let mut graph = FlowGraph::new();
        let a = graph.add_node(
            NodeKind::Trigger,
            "inbound_call",
            pos2(0.0, 0.0),
            NodeConfig::new(),
        );
        let b = graph.add_node(
            NodeKind::Action,
            "hangup",
            pos2(300.0, 40.0),
            NodeConfig::new(),
        );
        (graph, a, b)
    }

    #[test]
    fn add_node_generates_unique_ids_and_copies_config() {
        let mut graph = FlowGraph::new();
        let defaults = config(json!({ "url": "", "method": "GET" }));
        let ids: Vec<NodeId> = (0..50)
            .map(|i| {
                graph.add_node(
                    NodeKind::Action,
                    "http_request",
                    pos2(i as f32, 0.0),
                    defaults.clone(),
                )
            })
            .collect();

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        let node = graph.node(&ids[3]).expect("node exists");
        assert_eq!(node.config, defaults);
        assert_eq!(node.label, "http_request");
        assert_eq!(node.position, pos2(3.0, 0.0));
    }

    #[test]
    fn move_node_translates_and_ignores_unknown_ids() {
        let (mut graph, a, _) = two_node_graph();
        assert!(graph.move_node(&a, vec2(10.0, -5.0)));
        assert!(graph.move_node(&a, vec2(2.5, 1.0)));
        assert_eq!(graph.node(&a).map(|n| n.position), Some(pos2(12.5, -4.0)));

        let before = graph.clone();
        assert!(!graph.move_node(&NodeId::from("missing"), vec2(1.0, 1.0)));
        assert_eq!(graph, before);
    }

    #[test]
    fn config_patch_is_a_shallow_merge() {
        let mut graph = FlowGraph::new();
        let id = graph.add_node(
            NodeKind::Action,
            "http_request",
            Pos2::ZERO,
            config(json!({
                "url": "https://a",
                "method": "GET",
                "legacy": { "keep": true }
            })),
        );

        assert!(graph.update_node_config(
            &id,
            config(json!({ "method": "POST", "timeout": 5 }))
        ));

        let node = graph.node(&id).expect("node exists");
        assert_eq!(
            Value::Object(node.config.clone()),
            json!({
                "url": "https://a",
                "method": "POST",
                "timeout": 5,
                "legacy": { "keep": true }
            })
        );
        assert!(!graph.update_node_config(&NodeId::from("nope"), NodeConfig::new()));
        assert!(!graph.update_node_label(&NodeId::from("nope"), "x"));
    }

    #[test]
    fn edges_may_dangle_and_removal_does_not_cascade() {
        let (mut graph, a, b) = two_node_graph();
        let ab = graph.add_edge(a.clone(), b.clone(), None, None);
        let ghost = graph.add_edge(a.clone(), NodeId::from("ghost"), None, None);

        assert_eq!(
            graph.dangling_edges().map(|e| e.id.clone()).collect::<Vec<_>>(),
            vec![ghost.clone()]
        );

        assert!(graph.remove_node(&b).is_some());
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.dangling_edges().count(), 2);
        assert!(graph.edge(&ab).is_some());

        assert!(graph.remove_edge(&ghost).is_some());
        assert!(graph.remove_edge(&ghost).is_none());
        assert!(graph.remove_node(&b).is_none());
    }

    #[test]
    fn cascade_removal_takes_touching_edges_only() {
        let (mut graph, a, b) = two_node_graph();
        let c = graph.add_node(NodeKind::Data, "set_variable", Pos2::ZERO, NodeConfig::new());
        graph.add_edge(a.clone(), b.clone(), None, None);
        graph.add_edge(b.clone(), c.clone(), None, None);
        let ac = graph.add_edge(a.clone(), c.clone(), Some("else".into()), None);

        let (node, removed) = graph.remove_node_cascade(&b).expect("b exists");
        assert_eq!(node.id, b);
        assert_eq!(removed.len(), 2);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].id, ac);
        assert!(graph.remove_node_cascade(&b).is_none());
    }

    #[test]
    fn replace_keeps_first_of_duplicate_ids() {
        let node = |id: &str, label: &str| FlowNode {
            id: NodeId::from(id),
            kind: NodeKind::Logic,
            sub_type: "condition".into(),
            label: label.into(),
            position: Pos2::ZERO,
            config: NodeConfig::new(),
        };
        let graph = FlowGraph::from_parts(
            vec![node("n1", "first"), node("n2", "other"), node("n1", "second")],
            Vec::new(),
        );
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.node(&NodeId::from("n1")).map(|n| n.label.as_str()), Some("first"));
    }

    #[test]
    fn outgoing_edges_filters_by_source() {
        let (mut graph, a, b) = two_node_graph();
        graph.add_edge(a.clone(), b.clone(), None, Some("matched".into()));
        graph.add_edge(b.clone(), a.clone(), None, None);
        graph.add_edge(a.clone(), b.clone(), None, Some("unmatched".into()));

        let branches: Vec<_> = graph
            .outgoing_edges(&a)
            .filter_map(|e| e.branch_id.as_deref())
            .collect();
        assert_eq!(branches, vec!["matched", "unmatched"]);
    }
}
