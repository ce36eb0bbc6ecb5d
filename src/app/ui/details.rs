use eframe::egui::{self, RichText, Ui};

use crate::docs::{Document, Section};

use super::super::ViewModel;
use super::super::render_utils::theme_color;

impl ViewModel {
    /// Full data of the currently selected section, resolved from the
    /// collection. This is the selection signal handed to the detail panel;
    /// the map itself only tracks the id.
    pub(in crate::app) fn selected_section_data(&self) -> Option<(&Document, &Section)> {
        let section_id = self.selected_section.as_deref()?;
        self.collection.section(section_id)
    }

    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.add_space(6.0);
        ui.heading("Section");
        ui.add_space(4.0);

        let Some((document, section)) = self.selected_section_data() else {
            ui.label("Click a section node to inspect it.");
            return;
        };

        ui.horizontal(|ui| {
            let (swatch, _) =
                ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(swatch, 2.0, theme_color(section.color_theme.as_deref()));
            ui.label(RichText::new(&section.title).strong());
        });
        ui.label(RichText::new(&document.title).weak());
        ui.add_space(8.0);

        if section.summary.is_empty() {
            ui.label(RichText::new("No summary available.").weak());
        } else {
            ui.label(section.summary.as_str());
        }

        if !section.key_points.is_empty() {
            ui.add_space(8.0);
            ui.label(RichText::new("Key points").strong());
            for point in &section.key_points {
                ui.horizontal_wrapped(|ui| {
                    ui.label("•");
                    ui.label(point.as_str());
                });
            }
        }

        ui.add_space(10.0);
        if ui.button("Clear selection").clicked() {
            self.selected_section = None;
        }
    }
}
