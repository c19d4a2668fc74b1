use crate::actions::Action;
use crate::property_panel::{BoundField, PropertyPanel};
use crate::schema::{FieldKind, FieldValue};
use crate::store::Store;
use eframe::egui;

/// Property panel for the selected node.
pub fn show(
    ui: &mut egui::Ui,
    store: &Store,
    panel: &PropertyPanel,
    actions: &mut Vec<Action>,
) {
    let node_id = panel.node_id();

    ui.horizontal(|ui| {
        ui.heading("Properties");
        if ui.small_button("✕").on_hover_text("Close").clicked() {
            actions.push(Action::ClearSelection);
        }
    });
    ui.separator();

    let mut label = panel.label().to_owned();
    ui.horizontal(|ui| {
        ui.label("Label");
        if ui.text_edit_singleline(&mut label).changed() {
            actions.push(Action::UpdateNodeLabel {
                node_id: node_id.clone(),
                label: label.clone(),
            });
        }
    });
    ui.label(format!("Type: {}", panel.sub_type()));
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        if panel.fields().is_empty() {
            ui.label("No editable fields for this node type.");
        }
        egui::Grid::new(("fields", node_id.as_str()))
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for field in panel.fields() {
                    ui.label(field.descriptor.label);
                    if let Some(value) = field_editor(ui, field) {
                        actions.push(Action::UpdateNodeField {
                            node_id: node_id.clone(),
                            key: field.descriptor.key.to_owned(),
                            value,
                        });
                    }
                    ui.end_row();
                }
            });

        ui.add_space(8.0);
        ui.label(egui::RichText::new("Connections").strong());
        let graph = store.graph.get();
        let mut any = false;
        for edge in graph.outgoing_edges(node_id) {
            any = true;
            let target = graph
                .node(&edge.target)
                .map(|node| node.label.as_str())
                .unwrap_or("(missing)");
            ui.horizontal(|ui| {
                match &edge.branch_id {
                    Some(branch) => ui.label(format!("{branch} → {target}")),
                    None => ui.label(format!("→ {target}")),
                };
                if ui.small_button("✕").on_hover_text("Remove edge").clicked() {
                    actions.push(Action::RemoveEdge {
                        edge_id: edge.id.clone(),
                    });
                }
            });
        }
        if !any {
            ui.label("Drag from the output port to connect.");
        }
    });

    ui.separator();
    if ui.button("Delete node").clicked() {
        actions.push(Action::RemoveNodeCascade {
            node_id: node_id.clone(),
        });
    }
}

/// Widget for one field; returns the new value when the user changed it.
fn field_editor(ui: &mut egui::Ui, field: &BoundField) -> Option<FieldValue> {
    let descriptor = field.descriptor;
    match descriptor.kind {
        FieldKind::Text | FieldKind::MultilineText => {
            let mut text = field.value.as_text().unwrap_or_default().to_owned();
            let response = if descriptor.kind == FieldKind::Text {
                ui.text_edit_singleline(&mut text)
            } else {
                ui.text_edit_multiline(&mut text)
            };
            response.changed().then_some(FieldValue::Text(text))
        }
        FieldKind::Number => {
            let mut number = match field.value {
                FieldValue::Number(n) => n,
                _ => 0.0,
            };
            ui.add(egui::DragValue::new(&mut number).speed(1.0))
                .changed()
                .then_some(FieldValue::Number(number))
        }
        FieldKind::Toggle => {
            let mut on = matches!(field.value, FieldValue::Toggle(true));
            ui.checkbox(&mut on, "")
                .changed()
                .then_some(FieldValue::Toggle(on))
        }
        FieldKind::Select => {
            let current = field.value.as_text().unwrap_or_default();
            let mut selected = current.to_owned();
            egui::ComboBox::from_id_salt(descriptor.key)
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for option in descriptor.options {
                        ui.selectable_value(
                            &mut selected,
                            (*option).to_owned(),
                            *option,
                        );
                    }
                });
            (selected != current).then_some(FieldValue::Text(selected))
        }
    }
}
