use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::docs::DocumentCollection;

use super::super::graph::{MapGraph, PointerCapture};
use super::super::physics::FULL_LAYOUT_ITERATIONS;
use super::super::{LayoutParams, ViewModel, ViewScratch};

impl ViewModel {
    pub(in crate::app) fn new(collection: DocumentCollection) -> Self {
        Self {
            collection,
            expanded: Default::default(),
            selected_section: None,
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            params: LayoutParams::default(),
            map: MapGraph::default(),
            capture: PointerCapture::Idle,
            graph_dirty: true,
            pending_iterations: FULL_LAYOUT_ITERATIONS,
            view_scratch: ViewScratch {
                screen_positions: Vec::new(),
                screen_radii: Vec::new(),
            },
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        document_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("doc-mindmap");
                    ui.separator();
                    if let Some(title) = &self.collection.title {
                        ui.label(title.as_str());
                    }
                    ui.label(format!("source: {document_path}"));
                    ui.label(format!(
                        "documents: {} / sections: {}",
                        self.collection.document_count(),
                        self.collection.section_count()
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload collection"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "nodes: {} / edges: {}",
                            self.visible_node_count, self.visible_edge_count
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading document collection...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}
