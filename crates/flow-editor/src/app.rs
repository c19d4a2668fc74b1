use crate::actions::Action;
use crate::settings::{
    EDGE_STROKE_RANGE, EditorSettings, GRID_SPACING_RANGE, NODE_HEIGHT_RANGE,
    NODE_WIDTH_RANGE, PORT_RADIUS_RANGE, SliderRange, TANGENT_LENGTH_RANGE,
};
use crate::state::State;
use crate::store::{NoticeLevel, Store};
use crate::{canvas, palette_view, panel_view};
use eframe::egui;

const SIDE_PANEL_WIDTH: f32 = 240.0;
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 90, 80);

pub struct FlowEditorApp {
    state: State,
    show_settings: bool,
}

impl FlowEditorApp {
    pub fn new(store: Store) -> Self {
        Self {
            state: State::new(store),
            show_settings: false,
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New").clicked() {
                    ui.close();
                    actions.push(Action::NewScenario);
                }
                if ui.button("Save snapshot").clicked() {
                    ui.close();
                    actions.push(Action::SaveSnapshot);
                }

                #[cfg(not(target_arch = "wasm32"))]
                {
                    ui.separator();
                    if ui.button("Export…").clicked() {
                        ui.close();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .save_file()
                        {
                            actions.push(Action::SaveToFile { path });
                        }
                    }
                    if ui.button("Import…").clicked() {
                        ui.close();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            actions.push(Action::LoadFromFile { path });
                        }
                    }
                }
            });
            ui.menu_button("View", |ui| {
                if ui.checkbox(&mut self.show_settings, "Settings").clicked() {
                    ui.close();
                }
            });
        });
    }

    fn scenario_bar(&self, ui: &mut egui::Ui) {
        let store = &self.state.store;
        let graph = store.graph.get();
        ui.horizontal(|ui| {
            ui.strong(&store.scenario.name);
            ui.label(store.scenario.status.label());
            ui.separator();
            ui.label(format!(
                "{} nodes, {} edges",
                graph.nodes().len(),
                graph.edges().len()
            ));
            ui.separator();
            ui.label(format!(
                "Saved {}",
                store.scenario.updated_at.format("%Y-%m-%d %H:%M UTC")
            ));
        });
    }

    fn settings_window(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let mut settings = self.state.store.settings.clone();
        egui::Window::new("Settings")
            .open(&mut self.show_settings)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Nodes").strong());
                slider(ui, &mut settings.node.width, NODE_WIDTH_RANGE, "Width");
                slider(ui, &mut settings.node.height, NODE_HEIGHT_RANGE, "Height");
                slider(ui, &mut settings.node.port_radius, PORT_RADIUS_RANGE, "Port radius");
                ui.separator();
                ui.label(egui::RichText::new("Edges").strong());
                slider(ui, &mut settings.edges.tangent_length, TANGENT_LENGTH_RANGE, "Curvature");
                slider(ui, &mut settings.edges.stroke_width, EDGE_STROKE_RANGE, "Stroke");
                ui.separator();
                ui.label(egui::RichText::new("Canvas").strong());
                ui.checkbox(&mut settings.canvas.show_grid, "Show grid");
                slider(ui, &mut settings.canvas.grid_spacing, GRID_SPACING_RANGE, "Grid spacing");
                ui.separator();
                if ui.button("Reset to defaults").clicked() {
                    settings = EditorSettings::default();
                }
            });
        if settings != self.state.store.settings {
            actions.push(Action::SetSettings { settings });
        }
    }

    fn notices_window(&self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let Some(notice) = self.state.store.notices.front() else {
            return;
        };
        let title = match notice.level {
            NoticeLevel::Info => "Info",
            NoticeLevel::Error => "Error",
        };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                match notice.level {
                    NoticeLevel::Info => ui.label(&notice.message),
                    NoticeLevel::Error => ui.colored_label(ERROR_COLOR, &notice.message),
                };
                if ui.button("OK").clicked() {
                    actions.push(Action::DismissNotice);
                }
            });
    }
}

fn slider(ui: &mut egui::Ui, value: &mut f32, range: SliderRange, text: &str) {
    ui.add(
        egui::Slider::new(value, range.min..=range.max)
            .step_by(range.step as f64)
            .text(text),
    );
}

impl eframe::App for FlowEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ui, &mut actions);
        });
        egui::TopBottomPanel::top("scenario_bar").show(ctx, |ui| {
            self.scenario_bar(ui);
        });

        egui::SidePanel::left("palette")
            .default_width(SIDE_PANEL_WIDTH)
            .show(ctx, |ui| {
                palette_view::show(ui, &self.state.store, &mut actions);
            });

        let State { store, cache, .. } = &mut self.state;
        let store = &*store;
        if let Some(panel) = cache.panel.get(store) {
            egui::SidePanel::right("properties")
                .default_width(SIDE_PANEL_WIDTH)
                .show(ctx, |ui| {
                    panel_view::show(ui, store, panel, &mut actions);
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::canvas(&ctx.style()))
            .show(ctx, |ui| {
                let edge_paths = cache.edge_paths.get(store);
                canvas::show(ui, store, edge_paths, &mut actions);
            });

        self.settings_window(ctx, &mut actions);
        self.notices_window(ctx, &mut actions);

        for action in actions {
            self.state.dispatch(action);
        }
        self.state.flush_actions();
        self.state.flush_effects();
    }
}
