// Canvas view: paints the graph and turns raw pointer input into actions

use crate::actions::Action;
use crate::edge_path::EdgePath;
use crate::graph::{FlowNode, NodeId, NodeKind};
use crate::interaction::hit_test;
use crate::palette::CanvasBounds;
use crate::settings::EditorSettings;
use crate::store::Store;
use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape,
    Stroke, StrokeKind, Vec2, epaint::CubicBezierShape, vec2,
};

// UI Constants
const GRID_COLOR: Color32 = Color32::from_gray(45);
const EDGE_COLOR: Color32 = Color32::from_rgb(150, 160, 180);
const EDGE_PREVIEW_COLOR: Color32 = Color32::from_rgb(100, 100, 255);
const NODE_STROKE: Color32 = Color32::from_gray(90);
const SELECTED_STROKE: Color32 = Color32::from_rgb(255, 200, 60);
const UNKNOWN_FILL: Color32 = Color32::from_gray(70);
const PORT_FILL: Color32 = Color32::from_gray(200);
const TEXT_COLOR: Color32 = Color32::from_gray(235);
const SUBTYPE_COLOR: Color32 = Color32::from_gray(170);
const GHOST_ALPHA: u8 = 110;
const LABEL_FONT: f32 = 14.0;
const SUBTYPE_FONT: f32 = 11.0;
const EDGE_LABEL_FONT: f32 = 11.0;
const TEXT_PADDING: f32 = 10.0;
/// Port hit radius relative to its drawn radius.
const PORT_HIT_SCALE: f32 = 2.0;

fn kind_fill(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Trigger => Color32::from_rgb(46, 125, 80),
        NodeKind::Agent => Color32::from_rgb(106, 76, 160),
        NodeKind::Logic => Color32::from_rgb(176, 120, 40),
        NodeKind::Action => Color32::from_rgb(45, 105, 170),
        NodeKind::Data => Color32::from_rgb(60, 130, 140),
    }
}

/// Draw the canvas into the remaining space of `ui` and queue the actions
/// its pointer input produces.
pub fn show(
    ui: &mut egui::Ui,
    store: &Store,
    edge_paths: &[EdgePath],
    actions: &mut Vec<Action>,
) {
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    if store.canvas_bounds != CanvasBounds::from_size(rect.size()) {
        actions.push(Action::SetCanvasSize { size: rect.size() });
    }

    let painter = ui.painter_at(rect);
    let origin = rect.min.to_vec2();
    let settings = &store.settings;

    if settings.canvas.show_grid {
        draw_grid(&painter, rect, store.viewport.offset(), settings.canvas.grid_spacing);
    }
    for path in edge_paths {
        draw_edge(&painter, path, origin, settings);
    }
    for node in store.graph.get().nodes() {
        let top_left = store.viewport.to_screen(node.position) + origin;
        let selected = store.selection() == Some(&node.id);
        draw_node(&painter, store, node, top_left, selected);
    }

    let hover = ui.input(|i| i.pointer.hover_pos());
    draw_previews(&painter, store, origin, hover);
    handle_pointer(ui, store, rect, actions);
}

fn draw_grid(painter: &Painter, rect: Rect, offset: Vec2, spacing: f32) {
    let stroke = Stroke::new(1.0, GRID_COLOR);
    let mut x = rect.left() + offset.x.rem_euclid(spacing);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            stroke,
        );
        x += spacing;
    }
    let mut y = rect.top() + offset.y.rem_euclid(spacing);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            stroke,
        );
        y += spacing;
    }
}

fn bezier(points: [Pos2; 4], stroke: Stroke) -> Shape {
    Shape::CubicBezier(CubicBezierShape::from_points_stroke(
        points,
        false,
        Color32::TRANSPARENT,
        stroke,
    ))
}

fn draw_edge(
    painter: &Painter,
    path: &EdgePath,
    origin: Vec2,
    settings: &EditorSettings,
) {
    let points = path.points().map(|p| p + origin);
    painter.add(bezier(
        points,
        Stroke::new(settings.edges.stroke_width, EDGE_COLOR),
    ));
    let radius = settings.node.port_radius * 0.6;
    painter.circle_filled(points[3], radius, EDGE_COLOR);
    if let Some(label) = &path.label {
        painter.text(
            path.label_pos + origin,
            Align2::CENTER_BOTTOM,
            label,
            FontId::proportional(EDGE_LABEL_FONT),
            EDGE_COLOR,
        );
    }
}

fn draw_node(
    painter: &Painter,
    store: &Store,
    node: &FlowNode,
    top_left: Pos2,
    selected: bool,
) {
    let geometry = &store.settings.node;
    let rect = geometry.rect_at(top_left);
    let appearance = store.catalog.appearance(&node.sub_type);
    let fill = if appearance.known {
        kind_fill(node.kind)
    } else {
        UNKNOWN_FILL
    };
    let stroke = if selected {
        Stroke::new(2.5, SELECTED_STROKE)
    } else {
        Stroke::new(1.0, NODE_STROKE)
    };

    painter.rect_filled(rect, geometry.corner_radius, fill);
    painter.rect_stroke(rect, geometry.corner_radius, stroke, StrokeKind::Inside);

    let text_left = rect.left() + TEXT_PADDING;
    painter.text(
        Pos2::new(text_left, rect.center().y - LABEL_FONT * 0.5),
        Align2::LEFT_CENTER,
        format!("{} {}", appearance.icon, node.label),
        FontId::proportional(LABEL_FONT),
        TEXT_COLOR,
    );
    painter.text(
        Pos2::new(text_left, rect.center().y + SUBTYPE_FONT),
        Align2::LEFT_CENTER,
        &node.sub_type,
        FontId::monospace(SUBTYPE_FONT),
        SUBTYPE_COLOR,
    );

    painter.circle_filled(
        geometry.input_anchor(top_left),
        geometry.port_radius,
        PORT_FILL,
    );
    painter.circle_filled(
        geometry.output_anchor(top_left),
        geometry.port_radius,
        PORT_FILL,
    );
}

/// Edge being drawn and palette entry being dragged, following the pointer.
fn draw_previews(
    painter: &Painter,
    store: &Store,
    origin: Vec2,
    hover: Option<Pos2>,
) {
    let Some(hover) = hover else {
        return;
    };
    let settings = &store.settings;

    if let Some(source) = &store.pending_edge
        && let Some(node) = store.graph.get().node(source)
    {
        let start = settings
            .node
            .output_anchor(store.viewport.to_screen(node.position) + origin);
        let tangent = vec2(settings.edges.tangent_length, 0.0);
        painter.add(bezier(
            [start, start + tangent, hover - tangent, hover],
            Stroke::new(settings.edges.stroke_width, EDGE_PREVIEW_COLOR),
        ));
    }

    if let Some(payload) = &store.palette_drag
        && painter.clip_rect().contains(hover)
    {
        let rect = settings.node.rect_at(hover);
        let fill = kind_fill(payload.kind);
        painter.rect_filled(
            rect,
            settings.node.corner_radius,
            Color32::from_rgba_unmultiplied(fill.r(), fill.g(), fill.b(), GHOST_ALPHA),
        );
        painter.text(
            Pos2::new(rect.left() + TEXT_PADDING, rect.center().y),
            Align2::LEFT_CENTER,
            &payload.label,
            FontId::proportional(LABEL_FONT),
            TEXT_COLOR,
        );
    }
}

/// What a primary press at a canvas-local point starts: an edge from an
/// output port, otherwise a pan or a node drag.
fn press_action(store: &Store, local: Pos2) -> Action {
    match port_hit(store, local) {
        Some(source) => Action::BeginEdgeDrag { source },
        None => Action::PointerDown { pos: local },
    }
}

/// Output port under a canvas-local point, topmost node first. A node body
/// under the point hides every port but its own.
fn port_hit(store: &Store, local: Pos2) -> Option<NodeId> {
    let graph = store.graph.get();
    let geometry = &store.settings.node;
    let body = hit_test(graph, &store.viewport, geometry, local);
    let reach = geometry.port_radius * PORT_HIT_SCALE;
    graph
        .nodes()
        .iter()
        .rev()
        .filter(|node| body.as_ref().is_none_or(|id| *id == node.id))
        .find(|node| {
            geometry
                .output_anchor(store.viewport.to_screen(node.position))
                .distance(local)
                <= reach
        })
        .map(|node| node.id.clone())
}

fn handle_pointer(
    ui: &egui::Ui,
    store: &Store,
    rect: Rect,
    actions: &mut Vec<Action>,
) {
    let (pressed, released, pointer) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.interact_pos(),
        )
    });
    // Canvas-local position, only while no other layer covers the canvas
    // under the pointer.
    let local = pointer
        .filter(|_| ui.rect_contains_pointer(rect))
        .map(|p| p - rect.min.to_vec2());

    if pressed && let Some(local) = local {
        actions.push(press_action(store, local));
    } else if !store.interaction.is_idle() {
        match local {
            Some(pos) => actions.push(Action::PointerMove { pos }),
            None => actions.push(Action::PointerLeave),
        }
    }

    if released {
        if store.palette_drag.is_some() {
            actions.push(match local {
                Some(screen_pos) => Action::DropPalette { screen_pos },
                None => Action::CancelPaletteDrag,
            });
        }
        if store.pending_edge.is_some() {
            let target = local.and_then(|pos| {
                hit_test(
                    store.graph.get(),
                    &store.viewport,
                    &store.settings.node,
                    pos,
                )
            });
            actions.push(Action::FinishEdgeDrag { target });
        }
        actions.push(Action::PointerUp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::update;
    use crate::graph::NodeConfig;
    use crate::palette::DragPayload;
    use eframe::egui::{Event, PointerButton, RawInput, pos2};

    const SCREEN: Rect = Rect::from_min_max(Pos2::ZERO, pos2(800.0, 600.0));
    /// Floating window over the lower right of the canvas.
    const OVERLAY: Rect = Rect::from_min_max(pos2(500.0, 300.0), pos2(700.0, 450.0));

    struct Harness {
        ctx: egui::Context,
        store: Store,
        overlay: bool,
    }

    impl Harness {
        fn new(overlay: bool) -> Self {
            let mut harness = Self {
                ctx: egui::Context::default(),
                store: Store::default(),
                overlay,
            };
            // Windows become hit-testable once they were laid out.
            for _ in 0..3 {
                harness.frame(Vec::new());
            }
            harness
        }

        /// Run one frame with `events` and feed its actions to the store.
        fn frame(&mut self, events: Vec<Event>) -> Vec<Action> {
            let input = RawInput {
                screen_rect: Some(SCREEN),
                events,
                ..Default::default()
            };
            let store = &self.store;
            let overlay = self.overlay;
            let mut actions = Vec::new();
            let _ = self.ctx.run(input, |ctx| {
                actions.clear();
                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE)
                    .show(ctx, |ui| show(ui, store, &[], &mut actions));
                if overlay {
                    egui::Window::new("Settings")
                        .fixed_rect(OVERLAY)
                        .show(ctx, |ui| ui.label("grid"));
                }
            });
            for action in actions.iter().cloned() {
                update(&mut self.store, action);
            }
            actions
        }

        fn add_node(&mut self, at: Pos2) -> NodeId {
            self.store
                .graph
                .get_mut()
                .add_node(NodeKind::Action, "play_tts", at, NodeConfig::new())
        }
    }

    fn button(pos: Pos2, pressed: bool) -> Vec<Event> {
        vec![
            Event::PointerMoved(pos),
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                modifiers: Default::default(),
            },
        ]
    }

    fn press(pos: Pos2) -> Vec<Event> {
        button(pos, true)
    }

    fn release(pos: Pos2) -> Vec<Event> {
        button(pos, false)
    }

    fn pressed_down(actions: &[Action]) -> bool {
        actions.iter().any(|a| {
            matches!(a, Action::PointerDown { .. } | Action::BeginEdgeDrag { .. })
        })
    }

    #[test]
    fn press_on_a_floating_window_stays_off_the_canvas() {
        let mut harness = Harness::new(true);
        // Node hidden under the window.
        harness.add_node(pos2(520.0, 320.0));

        let actions = harness.frame(press(OVERLAY.center()));
        assert!(!pressed_down(&actions));
        assert!(harness.store.interaction.is_idle());
        assert_eq!(harness.store.selection(), None);

        harness.frame(release(OVERLAY.center()));
        let actions = harness.frame(press(pos2(100.0, 100.0)));
        assert!(matches!(
            actions.as_slice(),
            [Action::PointerDown { pos }] if *pos == pos2(100.0, 100.0)
        ));
    }

    #[test]
    fn covered_port_loses_to_the_body_on_top() {
        let mut harness = Harness::new(false);
        let below = harness.add_node(pos2(0.0, 0.0));
        let above = harness.add_node(pos2(150.0, 0.0));
        let geometry = harness.store.settings.node;
        let covered_port = geometry.output_anchor(pos2(0.0, 0.0));
        assert!(geometry.rect_at(pos2(150.0, 0.0)).contains(covered_port));

        let actions = harness.frame(press(covered_port));
        assert!(matches!(actions.as_slice(), [Action::PointerDown { .. }]));
        assert_eq!(harness.store.pending_edge, None);
        assert_eq!(harness.store.selection(), Some(&above));
        harness.frame(release(covered_port));

        let own_port = geometry.output_anchor(pos2(150.0, 0.0));
        let actions = harness.frame(press(own_port));
        assert!(matches!(
            actions.as_slice(),
            [Action::BeginEdgeDrag { source }] if *source == above
        ));
        assert_ne!(harness.store.pending_edge, Some(below));
    }

    #[test]
    fn port_outside_any_body_starts_an_edge() {
        let mut store = Store::default();
        let id = store.graph.get_mut().add_node(
            NodeKind::Logic,
            "condition",
            pos2(0.0, 0.0),
            NodeConfig::new(),
        );
        let geometry = store.settings.node;
        let beyond = geometry.output_anchor(pos2(0.0, 0.0)) + vec2(geometry.port_radius, 0.0);
        assert!(!geometry.rect_at(pos2(0.0, 0.0)).contains(beyond));

        assert!(matches!(
            press_action(&store, beyond),
            Action::BeginEdgeDrag { source } if source == id
        ));
        assert!(matches!(
            press_action(&store, pos2(400.0, 400.0)),
            Action::PointerDown { .. }
        ));
    }

    #[test]
    fn release_off_the_canvas_cancels_pending_drags() {
        let mut harness = Harness::new(true);
        let source = harness.add_node(pos2(40.0, 40.0));
        // Would be a valid target if the window did not cover it.
        harness.add_node(pos2(520.0, 320.0));

        let port = harness.store.settings.node.output_anchor(pos2(40.0, 40.0));
        harness.frame(press(port));
        assert_eq!(harness.store.pending_edge, Some(source));

        let actions = harness.frame(release(OVERLAY.center()));
        assert!(
            actions
                .iter()
                .any(|a| matches!(a, Action::FinishEdgeDrag { target: None }))
        );
        assert_eq!(harness.store.pending_edge, None);
        assert!(harness.store.graph.get().edges().is_empty());

        let entry = harness.store.catalog.get("hangup").expect("catalog entry");
        harness.store.palette_drag = Some(DragPayload::from(entry));
        let actions = harness.frame(release(OVERLAY.center()));
        assert!(actions.iter().any(|a| matches!(a, Action::CancelPaletteDrag)));
        assert_eq!(harness.store.palette_drag, None);
        assert_eq!(harness.store.graph.get().nodes().len(), 2);
    }

    #[test]
    fn leaving_the_canvas_mid_pan_ends_the_gesture() {
        let mut harness = Harness::new(true);
        harness.frame(press(pos2(100.0, 100.0)));
        assert!(!harness.store.interaction.is_idle());

        let actions = harness.frame(vec![Event::PointerMoved(pos2(120.0, 110.0))]);
        assert!(matches!(actions.as_slice(), [Action::PointerMove { .. }]));
        assert_eq!(harness.store.viewport.offset(), vec2(20.0, 10.0));

        let actions = harness.frame(vec![Event::PointerMoved(OVERLAY.center())]);
        assert!(matches!(actions.as_slice(), [Action::PointerLeave]));
        assert!(harness.store.interaction.is_idle());
        assert_eq!(harness.store.viewport.offset(), vec2(20.0, 10.0));
    }
}
