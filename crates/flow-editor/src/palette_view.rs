use crate::actions::Action;
use crate::graph::NodeKind;
use crate::palette::DragPayload;
use crate::store::Store;
use eframe::egui::{self, RichText, Sense};

pub fn show(ui: &mut egui::Ui, store: &Store, actions: &mut Vec<Action>) {
    ui.heading("Nodes");
    ui.label("Drag onto the canvas");
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for kind in NodeKind::ALL {
            let mut entries = store.catalog.by_kind(kind).peekable();
            if entries.peek().is_none() {
                continue;
            }
            ui.label(RichText::new(kind.label()).strong());
            for entry in entries {
                let text = format!("{} {}", entry.icon_ref, entry.label);
                let response = ui
                    .add(egui::Label::new(text).sense(Sense::click_and_drag()))
                    .on_hover_text(entry.tooltip_text.as_str());
                if response.drag_started() {
                    actions.push(Action::BeginPaletteDrag {
                        payload: DragPayload::from(entry),
                    });
                }
            }
            ui.add_space(6.0);
        }
    });

    if store.palette_drag.is_some() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    }
}
