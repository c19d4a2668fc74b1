use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

/// Common slider metadata so bounds live in one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

// Node ranges
pub const NODE_WIDTH_RANGE: SliderRange =
    SliderRange::new(120.0, 320.0, 4.0);
pub const NODE_HEIGHT_RANGE: SliderRange =
    SliderRange::new(40.0, 120.0, 2.0);
pub const PORT_RADIUS_RANGE: SliderRange =
    SliderRange::new(3.0, 12.0, 0.5);

// Edge ranges
pub const TANGENT_LENGTH_RANGE: SliderRange =
    SliderRange::new(10.0, 200.0, 5.0);
pub const EDGE_STROKE_RANGE: SliderRange =
    SliderRange::new(0.5, 6.0, 0.1);

// Canvas ranges
pub const GRID_SPACING_RANGE: SliderRange =
    SliderRange::new(8.0, 80.0, 1.0);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub node: NodeGeometry,
    pub edges: EdgeStyle,
    pub canvas: CanvasStyle,
}

impl EditorSettings {
    /// Pull every value back inside its slider range, e.g. after loading
    /// a hand-edited project file.
    pub fn clamped(mut self) -> Self {
        self.node.width = NODE_WIDTH_RANGE.clamp(self.node.width);
        self.node.height = NODE_HEIGHT_RANGE.clamp(self.node.height);
        self.node.port_radius =
            PORT_RADIUS_RANGE.clamp(self.node.port_radius);
        self.edges.tangent_length =
            TANGENT_LENGTH_RANGE.clamp(self.edges.tangent_length);
        self.edges.stroke_width =
            EDGE_STROKE_RANGE.clamp(self.edges.stroke_width);
        self.canvas.grid_spacing =
            GRID_SPACING_RANGE.clamp(self.canvas.grid_spacing);
        self
    }
}

/// Size of every node box. Node positions are the box's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeGeometry {
    pub width: f32,
    pub height: f32,
    pub port_radius: f32,
    pub corner_radius: f32,
}

impl Default for NodeGeometry {
    fn default() -> Self {
        Self {
            width: 192.0,
            height: 64.0,
            port_radius: 6.0,
            corner_radius: 8.0,
        }
    }
}

impl NodeGeometry {
    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn rect_at(&self, top_left: Pos2) -> Rect {
        Rect::from_min_size(top_left, self.size())
    }

    /// Outgoing anchor: right-centre of the box.
    pub fn output_anchor(&self, top_left: Pos2) -> Pos2 {
        pos2(top_left.x + self.width, top_left.y + self.height * 0.5)
    }

    /// Incoming anchor: left-centre of the box.
    pub fn input_anchor(&self, top_left: Pos2) -> Pos2 {
        pos2(top_left.x, top_left.y + self.height * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
    /// Horizontal distance of each bezier control point from its anchor.
    pub tangent_length: f32,
    pub stroke_width: f32,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            tangent_length: 80.0,
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasStyle {
    pub grid_spacing: f32,
    pub show_grid: bool,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            grid_spacing: 24.0,
            show_grid: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_sit_on_box_sides() {
        let geometry = NodeGeometry::default();
        let top_left = pos2(10.0, 20.0);
        assert_eq!(geometry.output_anchor(top_left), pos2(202.0, 52.0));
        assert_eq!(geometry.input_anchor(top_left), pos2(10.0, 52.0));
        assert!(geometry.rect_at(top_left).contains(pos2(100.0, 50.0)));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{ "edges": { "tangent_length": 40.0 } }"#)
                .expect("valid settings json");
        assert_eq!(settings.edges.tangent_length, 40.0);
        assert_eq!(settings.edges.stroke_width, EdgeStyle::default().stroke_width);
        assert_eq!(settings.node, NodeGeometry::default());
    }

    #[test]
    fn clamped_pulls_values_into_range() {
        let mut settings = EditorSettings::default();
        settings.edges.tangent_length = 10_000.0;
        settings.node.width = 1.0;
        let settings = settings.clamped();
        assert_eq!(settings.edges.tangent_length, TANGENT_LENGTH_RANGE.max);
        assert_eq!(settings.node.width, NODE_WIDTH_RANGE.min);
    }
}
