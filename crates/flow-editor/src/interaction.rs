// Pointer gesture state machine for the canvas

use crate::graph::{FlowGraph, NodeId};
use crate::settings::NodeGeometry;
use crate::versioned::Versioned;
use crate::viewport::Viewport;
use eframe::egui::{Pos2, Vec2};
use tracing::debug;

/// The single active canvas gesture. Panning and node dragging are
/// variants of one value, so they can never be active together.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        last: Pos2,
    },
    DraggingNode {
        node_id: NodeId,
        last: Pos2,
    },
}

/// Pointer input in canvas-local screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed; `node` is the node under the pointer, if
    /// any (see [`hit_test`]).
    Down { pos: Pos2, node: Option<NodeId> },
    Move { pos: Pos2 },
    Up,
    /// Pointer left the canvas bounds.
    Leave,
}

/// What the caller has to apply after an event was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureStep {
    None,
    /// Add to the viewport offset.
    Pan(Vec2),
    /// Translate a node's world position.
    MoveNode { node_id: NodeId, delta: Vec2 },
}

impl GestureStep {
    /// Only node moves borrow the graph mutably, so pans keep its version.
    pub fn apply(self, graph: &mut Versioned<FlowGraph>, viewport: &mut Viewport) {
        match self {
            GestureStep::None => {}
            GestureStep::Pan(delta) => viewport.pan(delta),
            GestureStep::MoveNode { node_id, delta } => {
                graph.get_mut().move_node(&node_id, delta);
            }
        }
    }
}

/// Owns the gesture state and the single node selection.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    gesture: Gesture,
    selection: Option<NodeId>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.selection.as_ref()
    }

    pub fn select(&mut self, node_id: NodeId) {
        self.selection = Some(node_id);
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    pub fn handle(&mut self, event: PointerEvent) -> GestureStep {
        match event {
            PointerEvent::Down { pos, node } => {
                if !self.is_idle() {
                    // A gesture is already running; a second press cannot
                    // start another one.
                    return GestureStep::None;
                }
                self.gesture = match node {
                    Some(node_id) => {
                        debug!(%node_id, "start node drag");
                        self.selection = Some(node_id.clone());
                        Gesture::DraggingNode { node_id, last: pos }
                    }
                    None => {
                        debug!(?pos, "start pan");
                        Gesture::Panning { last: pos }
                    }
                };
                GestureStep::None
            }
            PointerEvent::Move { pos } => match &mut self.gesture {
                Gesture::Idle => GestureStep::None,
                Gesture::Panning { last } => {
                    let delta = pos - *last;
                    *last = pos;
                    GestureStep::Pan(delta)
                }
                Gesture::DraggingNode { node_id, last } => {
                    let delta = pos - *last;
                    *last = pos;
                    GestureStep::MoveNode {
                        node_id: node_id.clone(),
                        delta,
                    }
                }
            },
            PointerEvent::Up | PointerEvent::Leave => {
                self.cancel();
                GestureStep::None
            }
        }
    }

    /// End whatever gesture is running.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            debug!(gesture = ?self.gesture, "gesture ended");
        }
        self.gesture = Gesture::Idle;
    }

    /// Drop every reference to a node that is being removed.
    pub fn forget_node(&mut self, node_id: &NodeId) {
        if self.selection.as_ref() == Some(node_id) {
            self.selection = None;
        }
        if matches!(&self.gesture, Gesture::DraggingNode { node_id: dragged, .. } if dragged == node_id)
        {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.selection = None;
    }
}

/// Topmost node whose box contains the canvas-local point.
pub fn hit_test(
    graph: &FlowGraph,
    viewport: &Viewport,
    geometry: &NodeGeometry,
    screen_pos: Pos2,
) -> Option<NodeId> {
    graph
        .nodes()
        .iter()
        .rev()
        .find(|node| {
            geometry
                .rect_at(viewport.to_screen(node.position))
                .contains(screen_pos)
        })
        .map(|node| node.id.clone())
}
