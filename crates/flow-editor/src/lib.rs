pub mod actions;
pub mod app;
pub mod cache;
pub mod canvas;
pub mod catalog;
pub mod edge_path;
pub mod effects;
pub mod graph;
pub mod interaction;
pub mod palette;
pub mod palette_view;
pub mod panel_view;
pub mod property_panel;
pub mod scenario;
pub mod schema;
pub mod settings;
pub mod state;
pub mod store;
pub mod versioned;
pub mod viewport;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

use app::FlowEditorApp;
use store::Store;

/// Build the editor with the built-in catalog and an empty scenario.
pub fn create_app(_cc: &eframe::CreationContext<'_>) -> FlowEditorApp {
    FlowEditorApp::new(Store::default())
}
