use crate::catalog::NodeCatalog;
use crate::graph::{FlowGraph, NodeId};
use crate::interaction::InteractionController;
use crate::palette::{CanvasBounds, DragPayload};
use crate::property_panel::PropertyPanel;
use crate::scenario::{self, ProjectFile, Scenario, ScenarioError};
use crate::settings::EditorSettings;
use crate::versioned::Versioned;
use crate::viewport::Viewport;
use eframe::egui::Vec2;
use std::collections::VecDeque;
use std::path::Path;
use tracing::info;

/// Default canvas extent until the first frame reports the real one.
const DEFAULT_CANVAS_SIZE: Vec2 = Vec2::new(1024.0, 768.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// The editor session: one scenario open on the canvas.
pub struct Store {
    pub graph: Versioned<FlowGraph>,
    pub viewport: Viewport,
    pub interaction: InteractionController,
    pub catalog: NodeCatalog,
    pub settings: EditorSettings,
    pub scenario: Scenario,
    /// Palette entry being dragged towards the canvas.
    pub palette_drag: Option<DragPayload>,
    /// Source node of an edge being drawn from its output port.
    pub pending_edge: Option<NodeId>,
    pub canvas_bounds: CanvasBounds,
    pub notices: VecDeque<Notice>,
}

impl Store {
    pub fn new(
        catalog: NodeCatalog,
        scenario: Scenario,
        settings: EditorSettings,
    ) -> Self {
        let graph = scenario.to_graph();
        Self {
            graph: Versioned::new(graph),
            viewport: Viewport::new(),
            interaction: InteractionController::new(),
            catalog,
            settings: settings.clamped(),
            scenario,
            palette_drag: None,
            pending_edge: None,
            canvas_bounds: CanvasBounds::from_size(DEFAULT_CANVAS_SIZE),
            notices: VecDeque::new(),
        }
    }

    pub fn untitled_scenario() -> Scenario {
        Scenario::new(
            format!("scenario_{}", uuid::Uuid::new_v4().simple()),
            "Untitled flow",
        )
    }

    pub fn selection(&self) -> Option<&NodeId> {
        self.interaction.selection()
    }

    /// Property panel for the current selection.
    pub fn panel(&self) -> Option<PropertyPanel> {
        PropertyPanel::bind(self.selection(), self.graph.get())
    }

    pub fn load_scenario(&mut self, scenario: Scenario) {
        info!(
            scenario_id = %scenario.id,
            nodes = scenario.node_count(),
            edges = scenario.edge_count(),
            "scenario loaded"
        );
        self.graph.set(scenario.to_graph());
        self.scenario = scenario;
        self.viewport.reset();
        self.interaction.reset();
        self.palette_drag = None;
        self.pending_edge = None;
    }

    /// Copy the graph into the scenario record, stamp it and hand it back.
    pub fn save_snapshot(&mut self) -> &Scenario {
        self.scenario.snapshot(self.graph.get());
        info!(
            scenario_id = %self.scenario.id,
            updated_at = %self.scenario.updated_at,
            "scenario snapshot saved"
        );
        &self.scenario
    }

    pub fn project(&self) -> ProjectFile {
        ProjectFile {
            scenario: self.scenario.clone(),
            settings: self.settings.clone(),
        }
    }

    pub fn save_to_file(&mut self, path: &Path) -> Result<(), ScenarioError> {
        self.save_snapshot();
        scenario::save_to_file(&self.project(), path)?;
        info!(path = %path.display(), "project exported");
        Ok(())
    }

    pub fn load_from_file(&mut self, path: &Path) -> Result<(), ScenarioError> {
        let project = scenario::load_from_file(path)?;
        self.settings = project.settings.clamped();
        self.load_scenario(project.scenario);
        Ok(())
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice {
            level,
            message: message.into(),
        });
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(
            NodeCatalog::builtin(),
            Self::untitled_scenario(),
            EditorSettings::default(),
        )
    }
}
