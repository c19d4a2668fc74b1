// Edge geometry: cubic bezier from source output to target input

use crate::graph::{EdgeId, FlowEdge, FlowGraph, FlowNode, NodeId};
use crate::settings::{EdgeStyle, NodeGeometry};
use crate::viewport::Viewport;
use eframe::egui::{Pos2, pos2, vec2};
use std::collections::HashMap;

/// Samples per curve when measuring the distance to a point.
const DISTANCE_SAMPLES: usize = 32;

/// A renderable edge in canvas-local screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub edge_id: EdgeId,
    pub start: Pos2,
    pub control_start: Pos2,
    pub control_end: Pos2,
    pub end: Pos2,
    pub label: Option<String>,
    /// Midpoint of the two anchors, regardless of how the curve bends.
    pub label_pos: Pos2,
}

impl EdgePath {
    pub fn points(&self) -> [Pos2; 4] {
        [self.start, self.control_start, self.control_end, self.end]
    }

    pub fn is_finite(&self) -> bool {
        self.points()
            .iter()
            .chain(std::iter::once(&self.label_pos))
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Pos2 {
        let t = t.clamp(0.0, 1.0);
        let mt = 1.0 - t;
        let [p0, p1, p2, p3] = self.points();
        let w0 = mt * mt * mt;
        let w1 = 3.0 * mt * mt * t;
        let w2 = 3.0 * mt * t * t;
        let w3 = t * t * t;
        Pos2::new(
            w0 * p0.x + w1 * p1.x + w2 * p2.x + w3 * p3.x,
            w0 * p0.y + w1 * p1.y + w2 * p2.y + w3 * p3.y,
        )
    }

    /// Approximate distance from `point` to the curve.
    pub fn distance_to(&self, point: Pos2) -> f32 {
        (0..=DISTANCE_SAMPLES)
            .map(|i| self.point_at(i as f32 / DISTANCE_SAMPLES as f32))
            .map(|p| p.distance(point))
            .fold(f32::INFINITY, f32::min)
    }

    /// SVG path data (`d` attribute).
    pub fn to_svg_path(&self) -> String {
        let [p0, p1, p2, p3] = self.points();
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
        )
    }
}

/// Path for one edge, or `None` when an endpoint is missing.
pub fn render(
    edge: &FlowEdge,
    nodes_by_id: &HashMap<&NodeId, &FlowNode>,
    viewport: &Viewport,
    geometry: &NodeGeometry,
    style: &EdgeStyle,
) -> Option<EdgePath> {
    let source = nodes_by_id.get(&edge.source)?;
    let target = nodes_by_id.get(&edge.target)?;

    let start =
        geometry.output_anchor(viewport.to_screen(source.position));
    let end = geometry.input_anchor(viewport.to_screen(target.position));
    let tangent = vec2(style.tangent_length, 0.0);

    Some(EdgePath {
        edge_id: edge.id.clone(),
        start,
        control_start: start + tangent,
        control_end: end - tangent,
        end,
        label: edge.label.clone(),
        label_pos: pos2((start.x + end.x) * 0.5, (start.y + end.y) * 0.5),
    })
}

/// Paths for every edge whose endpoints both exist.
pub fn render_all(
    graph: &FlowGraph,
    viewport: &Viewport,
    geometry: &NodeGeometry,
    style: &EdgeStyle,
) -> Vec<EdgePath> {
    let nodes_by_id = graph.nodes_by_id();
    graph
        .edges()
        .iter()
        .filter_map(|edge| {
            render(edge, &nodes_by_id, viewport, geometry, style)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeConfig, NodeKind};
    use proptest::prelude::*;

    fn graph_with(source: Pos2, target: Pos2) -> (FlowGraph, FlowEdge) {
        let mut graph = FlowGraph::new();
        let a = graph.add_node(NodeKind::Logic, "regex_match", source, NodeConfig::new());
        let b = graph.add_node(NodeKind::Action, "hangup", target, NodeConfig::new());
        let id = graph.add_edge(a, b, Some("matched".into()), Some("matched".into()));
        let edge = graph.edge(&id).cloned().expect("edge exists");
        (graph, edge)
    }

    #[test]
    fn anchors_and_controls_follow_box_sides() {
        let (graph, edge) = graph_with(pos2(0.0, 0.0), pos2(400.0, 100.0));
        let geometry = NodeGeometry::default();
        let style = EdgeStyle::default();
        let viewport = Viewport::with_offset(vec2(10.0, 20.0));

        let path = render(&edge, &graph.nodes_by_id(), &viewport, &geometry, &style)
            .expect("both endpoints exist");

        assert_eq!(path.start, pos2(10.0 + geometry.width, 20.0 + geometry.height / 2.0));
        assert_eq!(path.end, pos2(410.0, 120.0 + geometry.height / 2.0));
        assert_eq!(path.control_start, path.start + vec2(style.tangent_length, 0.0));
        assert_eq!(path.control_end, path.end - vec2(style.tangent_length, 0.0));
        assert_eq!(path.label.as_deref(), Some("matched"));
        assert_eq!(path.label_pos, pos2((path.start.x + path.end.x) / 2.0, (path.start.y + path.end.y) / 2.0));
        assert_eq!(path.point_at(0.0), path.start);
        assert_eq!(path.point_at(1.0), path.end);
    }

    #[test]
    fn dangling_edges_render_nothing() {
        let (mut graph, edge) = graph_with(pos2(0.0, 0.0), pos2(400.0, 0.0));
        graph.add_edge(edge.source.clone(), NodeId::from("gone"), None, None);
        graph.add_edge(NodeId::from("gone"), edge.target.clone(), None, None);

        let paths = render_all(&graph, &Viewport::new(), &NodeGeometry::default(), &EdgeStyle::default());
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].edge_id, edge.id);

        graph.remove_node(&edge.target);
        let paths = render_all(&graph, &Viewport::new(), &NodeGeometry::default(), &EdgeStyle::default());
        assert!(paths.is_empty());
    }

    #[test]
    fn svg_path_lists_all_four_points() {
        let (graph, edge) = graph_with(pos2(0.0, 0.0), pos2(300.0, 0.0));
        let mut geometry = NodeGeometry::default();
        geometry.width = 100.0;
        geometry.height = 40.0;
        let style = EdgeStyle { tangent_length: 50.0, stroke_width: 1.0 };
        let path = render(&edge, &graph.nodes_by_id(), &Viewport::new(), &geometry, &style)
            .expect("rendered");
        assert_eq!(path.to_svg_path(), "M 100 20 C 150 20, 250 20, 300 20");
    }

    #[test]
    fn distance_is_zero_on_the_curve() {
        let (graph, edge) = graph_with(pos2(0.0, 0.0), pos2(500.0, 300.0));
        let path = render(&edge, &graph.nodes_by_id(), &Viewport::new(), &NodeGeometry::default(), &EdgeStyle::default())
            .expect("rendered");
        assert!(path.distance_to(path.point_at(0.5)) < 1e-3);
        assert!(path.distance_to(pos2(-500.0, -500.0)) > 100.0);
    }

    proptest! {
        #[test]
        fn backwards_and_level_edges_stay_finite(
            sx in -5000i32..5000,
            sy in -5000i32..5000,
            back in 0i32..5000,
            dy in -1i32..=1,
            tangent in 10i32..200,
        ) {
            // Target at or to the left of the source, level or nearly so.
            let source = pos2(sx as f32, sy as f32);
            let target = pos2((sx - back) as f32, (sy + dy * back) as f32);
            let (graph, edge) = graph_with(source, target);
            let style = EdgeStyle { tangent_length: tangent as f32, stroke_width: 2.0 };

            let path = render(&edge, &graph.nodes_by_id(), &Viewport::new(), &NodeGeometry::default(), &style);
            let path = path.expect("both endpoints exist");
            prop_assert!(path.is_finite());
            prop_assert!(path.control_start.x > path.start.x);
            prop_assert!(path.control_end.x < path.end.x);
            for i in 0..=10 {
                let p = path.point_at(i as f32 / 10.0);
                prop_assert!(p.x.is_finite() && p.y.is_finite());
            }
        }
    }
}
