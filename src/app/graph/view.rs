use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::render_utils::{
    dim_color, draw_background, node_fill, screen_to_world, world_to_screen,
};
use super::{EdgeStyle, GestureEnd, NodeKind, PointerCapture};

const NODE_LABEL_MAX_CHARS: usize = 26;

impl ViewModel {
    fn update_screen_space(&mut self, rect: Rect) {
        let scratch = &mut self.view_scratch;
        scratch.screen_positions.clear();
        scratch.screen_radii.clear();
        for node in &self.map.nodes {
            scratch
                .screen_positions
                .push(world_to_screen(rect, self.pan, self.zoom, node.world_pos));
            scratch.screen_radii.push(node.radius() * self.zoom);
        }
    }

    /// Node index under a screen-space pointer, resolved against the
    /// current map. Callers must re-resolve after any rebuild; indices do
    /// not survive topology changes.
    fn hover_index(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        self.hit_test(screen_to_world(rect, self.pan, self.zoom, pointer))
            .map(|(index, _)| index)
    }

    fn search_matches(&self) -> Option<HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        Some(
            self.map
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    matcher.fuzzy_match(&node.label, query).map(|_| index)
                })
                .collect(),
        )
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_map();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_scroll(ui, &response);

        if response.drag_started_by(egui::PointerButton::Primary) {
            let hit = response
                .interact_pointer_pos()
                .and_then(|pointer| self.hover_index(rect, pointer));
            self.begin_gesture(hit);
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            self.apply_pointer_delta(response.drag_delta());
            self.settle_during_drag();
        }

        if response.drag_stopped() {
            match self.finish_gesture() {
                GestureEnd::ClickedNode(index) => self.node_clicked(index),
                GestureEnd::Released => self.settle_after_release(),
            }
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let hit = response
                .interact_pointer_pos()
                .and_then(|pointer| self.hover_index(rect, pointer));
            match hit {
                Some(index) => self.node_clicked(index),
                None => self.selected_section = None,
            }
        }

        if self.graph_dirty {
            self.rebuild_map();
        }
        // Positions (and the node set itself) may have changed since the
        // input was handled, so projection and hover both resolve against
        // the rebuilt map.
        self.update_screen_space(rect);
        let hovered_index = ui
            .input(|input| input.pointer.hover_pos())
            .and_then(|pointer| self.hover_index(rect, pointer));

        let matches = self.search_matches();
        let search_active = matches.as_ref().is_some_and(|set| !set.is_empty());
        let node_count = self.map.nodes.len();

        for edge in &self.map.edges {
            if edge.source >= node_count || edge.target >= node_count {
                continue;
            }

            let start = self.view_scratch.screen_positions[edge.source];
            let end = self.view_scratch.screen_positions[edge.target];
            match edge.style {
                EdgeStyle::Solid => {
                    painter.line_segment(
                        [start, end],
                        Stroke::new(2.0, Color32::from_rgba_unmultiplied(120, 130, 142, 200)),
                    );
                }
                EdgeStyle::Dashed => {
                    painter.extend(Shape::dashed_line(
                        &[start, end],
                        Stroke::new(1.4, Color32::from_rgba_unmultiplied(120, 130, 142, 150)),
                        7.0,
                        5.0,
                    ));
                }
            }
        }

        if hovered_index.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        for (index, node) in self.map.nodes.iter().enumerate() {
            let position = self.view_scratch.screen_positions[index];
            let radius = self.view_scratch.screen_radii[index];

            let is_hovered = hovered_index == Some(index);
            let is_selected = node.kind == NodeKind::Section
                && self.selected_section.as_deref() == node.source_id.as_deref();
            let is_match = matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base = node_fill(node);
            let fill = if is_hovered {
                Color32::from_rgb(255, 164, 101)
            } else if search_active && !is_match {
                dim_color(base, 0.38)
            } else {
                base
            };

            painter.circle_filled(position, radius, fill);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );

            if is_selected {
                painter.circle_stroke(
                    position,
                    radius + 4.0,
                    Stroke::new(1.6, Color32::from_rgb(245, 206, 93)),
                );
            }

            // Expanded documents get a marker ring so collapse targets read
            // at a glance.
            if node.kind == NodeKind::Document
                && node
                    .source_id
                    .as_deref()
                    .is_some_and(|id| self.expanded.contains(id))
            {
                painter.circle_stroke(
                    position,
                    radius - 4.0,
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(230, 238, 245, 140)),
                );
            }

            let show_label = match node.kind {
                NodeKind::Root | NodeKind::Document => true,
                NodeKind::Section => {
                    is_hovered || is_selected || is_match || self.zoom > 0.8
                }
            };
            if show_label {
                painter.text(
                    position + egui::vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    truncate_label(&node.label, NODE_LABEL_MAX_CHARS),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if response.dragged() || self.capture != PointerCapture::Idle {
            ui.ctx().request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use eframe::egui::{Pos2, Rect};

    use crate::docs::{Document, DocumentCollection, Section};

    use super::super::super::ViewModel;
    use super::super::build_topology;
    use super::world_to_screen;

    fn sample_collection() -> DocumentCollection {
        DocumentCollection {
            title: None,
            documents: vec![Document {
                id: "d1".to_owned(),
                title: "Paper".to_owned(),
                sections: vec![Section {
                    id: "s1".to_owned(),
                    title: "Intro".to_owned(),
                    summary: String::new(),
                    key_points: Vec::new(),
                    color_theme: None,
                }],
            }],
        }
    }

    fn canvas() -> Rect {
        Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(800.0, 600.0))
    }

    #[test]
    fn hover_resolves_against_the_current_topology() {
        let mut model = ViewModel::new(sample_collection());
        model.expanded.insert("d1".to_owned());
        model.map = build_topology(&model.collection, &model.expanded, &HashMap::new());
        model.graph_dirty = false;

        let section = model.map.node_index("sec:s1").expect("section present");
        let pointer = world_to_screen(
            canvas(),
            model.pan,
            model.zoom,
            model.map.nodes[section].world_pos,
        );
        assert_eq!(model.hover_index(canvas(), pointer), Some(section));

        // A collapse removes the section; the same pointer position must not
        // keep reporting the pre-rebuild index.
        model.expanded.clear();
        model.map =
            build_topology(&model.collection, &model.expanded, &model.map.position_snapshot());
        assert_eq!(model.hover_index(canvas(), pointer), None);
    }
}
