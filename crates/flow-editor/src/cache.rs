use crate::edge_path::{self, EdgePath};
use crate::graph::NodeId;
use crate::property_panel::PropertyPanel;
use crate::settings::{EdgeStyle, NodeGeometry};
use crate::store::Store;
use crate::versioned::Memoized;
use eframe::egui::Vec2;

type EdgePathKey = (u64, Vec2, NodeGeometry, EdgeStyle);
type PanelKey = (u64, Option<NodeId>);

pub struct Cache {
    pub edge_paths: Memoized<Store, EdgePathKey, Vec<EdgePath>>,
    pub panel: Memoized<Store, PanelKey, Option<PropertyPanel>>,
}

impl Cache {
    pub fn new() -> Self {
        let edge_paths = Memoized::new(
            |s: &Store| {
                (
                    s.graph.version(),
                    s.viewport.offset(),
                    s.settings.node,
                    s.settings.edges,
                )
            },
            |s: &Store| {
                edge_path::render_all(
                    s.graph.get(),
                    &s.viewport,
                    &s.settings.node,
                    &s.settings.edges,
                )
            },
        );

        let panel = Memoized::new(
            |s: &Store| (s.graph.version(), s.selection().cloned()),
            |s: &Store| s.panel(),
        );

        Self { edge_paths, panel }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}
