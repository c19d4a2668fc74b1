use crate::effects::Effect;
use crate::graph::{EdgeId, NodeConfig, NodeId};
use crate::interaction::{PointerEvent, hit_test};
use crate::palette::{self, CanvasBounds, DragPayload};
use crate::property_panel::PropertyPanel;
use crate::scenario::Scenario;
use crate::schema::FieldValue;
use crate::settings::EditorSettings;
use crate::store::Store;
use eframe::egui::{Pos2, Vec2};
use std::path::PathBuf;
use tracing::debug;

/// Actions that can be dispatched to modify the editor state
#[derive(Debug, Clone)]
pub enum Action {
    // Canvas pointer, canvas-local coordinates
    /// Primary button pressed on the canvas
    PointerDown { pos: Pos2 },
    /// Pointer moved over the canvas
    PointerMove { pos: Pos2 },
    /// Primary button released
    PointerUp,
    /// Pointer left the canvas
    PointerLeave,

    // Palette
    /// A palette entry started being dragged
    BeginPaletteDrag { payload: DragPayload },
    /// The dragged palette entry was released at `screen_pos`
    DropPalette { screen_pos: Pos2 },
    /// The palette drag ended away from the canvas
    CancelPaletteDrag,

    // Selection
    SelectNode { node_id: NodeId },
    ClearSelection,

    // Node editing
    UpdateNodeLabel { node_id: NodeId, label: String },
    /// Edit one schema field of a node through its property panel
    UpdateNodeField {
        node_id: NodeId,
        key: String,
        value: FieldValue,
    },
    /// Merge a raw config patch into a node
    UpdateNodeConfig { node_id: NodeId, patch: NodeConfig },
    /// Remove a node and leave its edges dangling
    RemoveNode { node_id: NodeId },
    /// Remove a node and every edge touching it
    RemoveNodeCascade { node_id: NodeId },

    // Edges
    /// Start drawing an edge from a node's output port
    BeginEdgeDrag { source: NodeId },
    /// Finish drawing; `target` is the node under the pointer, if any
    FinishEdgeDrag { target: Option<NodeId> },
    /// Connect two nodes, tagging the edge with the source's next free branch
    AddEdge { source: NodeId, target: NodeId },
    RemoveEdge { edge_id: EdgeId },

    // Scenario
    /// Replace the open scenario with an empty one
    NewScenario,
    LoadScenario { scenario: Scenario },
    /// Snapshot the graph into the scenario record
    SaveSnapshot,

    // File Operations
    /// Export scenario and settings to file
    SaveToFile { path: PathBuf },
    /// Import a project file
    LoadFromFile { path: PathBuf },

    // Host
    SetSettings { settings: EditorSettings },
    SetCanvasSize { size: Vec2 },
    /// Drop the oldest notice
    DismissNotice,
}

/// Apply a single action to modify the store state
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match action {
        // Canvas pointer
        Action::PointerDown { pos } => {
            if store.pending_edge.is_some() || store.palette_drag.is_some() {
                return vec![];
            }
            let node = hit_test(
                store.graph.get(),
                &store.viewport,
                &store.settings.node,
                pos,
            );
            let step = store.interaction.handle(PointerEvent::Down { pos, node });
            step.apply(&mut store.graph, &mut store.viewport);
            vec![]
        }
        Action::PointerMove { pos } => {
            let step = store.interaction.handle(PointerEvent::Move { pos });
            step.apply(&mut store.graph, &mut store.viewport);
            vec![]
        }
        Action::PointerUp => {
            store.interaction.handle(PointerEvent::Up);
            vec![]
        }
        Action::PointerLeave => {
            store.interaction.handle(PointerEvent::Leave);
            store.pending_edge = None;
            vec![]
        }

        // Palette
        Action::BeginPaletteDrag { payload } => {
            debug!(sub_type = %payload.sub_type, "palette drag started");
            store.interaction.cancel();
            store.palette_drag = Some(payload);
            vec![]
        }
        Action::DropPalette { screen_pos } => {
            if let Some(payload) = store.palette_drag.take() {
                palette::drop_payload(
                    store.graph.get_mut(),
                    &store.viewport,
                    &store.canvas_bounds,
                    payload,
                    screen_pos,
                );
            }
            vec![]
        }
        Action::CancelPaletteDrag => {
            store.palette_drag = None;
            vec![]
        }

        // Selection
        Action::SelectNode { node_id } => {
            if store.graph.get().contains_node(&node_id) {
                store.interaction.select(node_id);
            }
            vec![]
        }
        Action::ClearSelection => {
            store.interaction.deselect();
            vec![]
        }

        // Node editing
        Action::UpdateNodeLabel { node_id, label } => {
            store.graph.get_mut().update_node_label(&node_id, label);
            vec![]
        }
        Action::UpdateNodeField {
            node_id,
            key,
            value,
        } => {
            let patch = PropertyPanel::bind(Some(&node_id), store.graph.get())
                .and_then(|panel| panel.edit(&key, value));
            match patch {
                Some((target, patch)) => {
                    store.graph.get_mut().update_node_config(&target, patch);
                }
                None => debug!(%node_id, %key, "rejected field edit"),
            }
            vec![]
        }
        Action::UpdateNodeConfig { node_id, patch } => {
            store.graph.get_mut().update_node_config(&node_id, patch);
            vec![]
        }
        Action::RemoveNode { node_id } => {
            if store.graph.get_mut().remove_node(&node_id).is_some() {
                forget_node(store, &node_id);
            }
            vec![]
        }
        Action::RemoveNodeCascade { node_id } => {
            if let Some((_, edges)) =
                store.graph.get_mut().remove_node_cascade(&node_id)
            {
                debug!(%node_id, edges = edges.len(), "removed node with edges");
                forget_node(store, &node_id);
            }
            vec![]
        }

        // Edges
        Action::BeginEdgeDrag { source } => {
            if store.graph.get().contains_node(&source) {
                store.interaction.cancel();
                store.pending_edge = Some(source);
            }
            vec![]
        }
        Action::FinishEdgeDrag { target } => {
            if let Some(source) = store.pending_edge.take()
                && let Some(target) = target
            {
                connect(store, source, target);
            }
            vec![]
        }
        Action::AddEdge { source, target } => {
            connect(store, source, target);
            vec![]
        }
        Action::RemoveEdge { edge_id } => {
            store.graph.get_mut().remove_edge(&edge_id);
            vec![]
        }

        // Scenario
        Action::NewScenario => {
            store.load_scenario(Store::untitled_scenario());
            vec![]
        }
        Action::LoadScenario { scenario } => {
            store.load_scenario(scenario);
            vec![]
        }
        Action::SaveSnapshot => {
            store.save_snapshot();
            vec![]
        }

        // File Operations
        Action::SaveToFile { path } => vec![Effect::SaveToFile { path }],
        Action::LoadFromFile { path } => vec![Effect::LoadFromFile { path }],

        // Host
        Action::SetSettings { settings } => {
            store.settings = settings.clamped();
            vec![]
        }
        Action::SetCanvasSize { size } => {
            store.canvas_bounds = CanvasBounds::from_size(size);
            vec![]
        }
        Action::DismissNotice => {
            store.notices.pop_front();
            vec![]
        }
    }
}

fn forget_node(store: &mut Store, node_id: &NodeId) {
    store.interaction.forget_node(node_id);
    if store.pending_edge.as_ref() == Some(node_id) {
        store.pending_edge = None;
    }
}

/// Add an edge between two distinct, existing nodes.
fn connect(store: &mut Store, source: NodeId, target: NodeId) {
    let graph = store.graph.get();
    if source == target
        || !graph.contains_node(&source)
        || !graph.contains_node(&target)
    {
        debug!(%source, %target, "edge not created");
        return;
    }
    let branch = palette::next_free_branch(&store.catalog, graph, &source)
        .map(str::to_owned);
    store
        .graph
        .get_mut()
        .add_edge(source, target, branch.clone(), branch);
}
