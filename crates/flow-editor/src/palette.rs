// Palette drag payloads and drop-to-create

use crate::catalog::{CatalogEntry, NodeCatalog};
use crate::graph::{FlowGraph, NodeConfig, NodeId, NodeKind};
use crate::viewport::Viewport;
use eframe::egui::{Pos2, Rect, Vec2};
use tracing::debug;

/// What a palette entry carries while it is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPayload {
    pub kind: NodeKind,
    pub sub_type: String,
    pub label: String,
    pub default_config: NodeConfig,
}

impl From<&CatalogEntry> for DragPayload {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            kind: entry.kind,
            sub_type: entry.sub_type.clone(),
            label: entry.label.clone(),
            default_config: entry.default_config.clone(),
        }
    }
}

/// Canvas extent in canvas-local screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    rect: Rect,
}

impl CanvasBounds {
    pub fn from_size(size: Vec2) -> Self {
        Self {
            rect: Rect::from_min_size(Pos2::ZERO, size),
        }
    }

    pub fn contains(&self, screen_pos: Pos2) -> bool {
        self.rect.contains(screen_pos)
    }
}

/// Create a node from a dropped payload.
///
/// `screen_pos` is where the drop happened, canvas-local. Drops outside
/// `bounds` create nothing.
pub fn drop_payload(
    graph: &mut FlowGraph,
    viewport: &Viewport,
    bounds: &CanvasBounds,
    payload: DragPayload,
    screen_pos: Pos2,
) -> Option<NodeId> {
    if !bounds.contains(screen_pos) {
        debug!(sub_type = %payload.sub_type, ?screen_pos, "drop outside canvas ignored");
        return None;
    }
    let world = viewport.to_world(screen_pos);
    let id = graph.add_node(
        payload.kind,
        payload.sub_type,
        world,
        payload.default_config,
    );
    graph.update_node_label(&id, payload.label);
    Some(id)
}

/// First branch of `source` that no outgoing edge uses yet.
///
/// Returns `None` for non-branching subtypes, and for branching ones
/// whose branches are all taken.
pub fn next_free_branch<'a>(
    catalog: &'a NodeCatalog,
    graph: &FlowGraph,
    source: &NodeId,
) -> Option<&'a str> {
    let node = graph.node(source)?;
    catalog
        .branches(&node.sub_type)
        .iter()
        .map(String::as_str)
        .find(|branch| {
            !graph
                .outgoing_edges(source)
                .any(|edge| edge.branch_id.as_deref() == Some(*branch))
        })
}
