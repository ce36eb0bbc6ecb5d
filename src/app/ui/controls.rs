use eframe::egui::{self, Ui, Vec2};

use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::physics::FULL_LAYOUT_ITERATIONS;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.add_space(6.0);
        ui.heading("Map");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
            if !self.search.is_empty() && ui.small_button("x").clicked() {
                self.search.clear();
            }
        });

        ui.add_space(8.0);
        ui.separator();
        ui.label("Layout");

        let mut params_changed = false;
        params_changed |= ui
            .add(
                egui::Slider::new(&mut self.params.repulsion, 500.0..=20_000.0)
                    .text("repulsion"),
            )
            .changed();
        params_changed |= ui
            .add(egui::Slider::new(&mut self.params.stiffness, 0.01..=0.30).text("stiffness"))
            .changed();
        params_changed |= ui
            .add(
                egui::Slider::new(&mut self.params.collision_padding, 0.0..=24.0)
                    .text("padding"),
            )
            .changed();
        if params_changed {
            self.graph_dirty = true;
        }

        ui.horizontal(|ui| {
            if ui.button("Re-run layout").clicked() {
                self.pending_iterations = FULL_LAYOUT_ITERATIONS;
                self.graph_dirty = true;
            }
            if ui.button("Reset view").clicked() {
                self.pan = Vec2::ZERO;
                self.zoom = 1.0;
            }
        });

        ui.add_space(8.0);
        ui.separator();
        ui.label("Documents");

        ui.horizontal(|ui| {
            if ui.button("Expand all").clicked() {
                let all = self
                    .collection
                    .documents
                    .iter()
                    .filter(|document| !document.sections.is_empty())
                    .map(|document| document.id.clone())
                    .collect();
                self.expanded = all;
                self.graph_dirty = true;
            }
            if ui.button("Collapse all").clicked() {
                self.expanded.clear();
                self.graph_dirty = true;
            }
        });

        ui.add_space(4.0);
        let mut toggled = Vec::new();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for document in &self.collection.documents {
                let mut is_expanded = self.expanded.contains(&document.id);
                let label = format!(
                    "{} ({})",
                    truncate_label(&document.title, 28),
                    document.sections.len()
                );
                let checkbox = ui.add_enabled(
                    !document.sections.is_empty(),
                    egui::Checkbox::new(&mut is_expanded, label),
                );
                if checkbox.changed() {
                    toggled.push(document.id.clone());
                }
            }
        });
        for document_id in toggled {
            self.toggle_expansion(&document_id);
        }
    }
}
