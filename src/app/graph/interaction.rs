use eframe::egui::{self, Ui, Vec2};

use super::super::ViewModel;
use super::super::physics::{DRAG_SETTLE_ITERATIONS, TOPOLOGY_UPDATE_ITERATIONS, relax};
use super::NodeKind;

/// Pointer travel (screen px) below which a press-release on a node counts
/// as a click instead of a drag.
pub(in crate::app) const CLICK_DRAG_THRESHOLD: f32 = 4.0;
pub(in crate::app) const MIN_ZOOM: f32 = 0.1;
pub(in crate::app) const MAX_ZOOM: f32 = 3.0;

/// One pointer session owns at most one gesture; whichever begins first
/// claims it. The drag target is tracked by id so a topology rebuild
/// mid-drag cannot redirect the gesture to an unrelated index.
#[derive(Clone, Debug, Default, PartialEq)]
pub(in crate::app) enum PointerCapture {
    #[default]
    Idle,
    DragNode {
        id: String,
        moved: f32,
    },
    PanCanvas,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) enum GestureEnd {
    Released,
    ClickedNode(usize),
}

impl ViewModel {
    /// Index of the node currently owned by the drag handler, if any. That
    /// node is excluded from relaxation's position writes.
    pub(in crate::app) fn held_index(&self) -> Option<usize> {
        match &self.capture {
            PointerCapture::DragNode { id, .. } => self.map.node_index(id),
            PointerCapture::Idle | PointerCapture::PanCanvas => None,
        }
    }

    pub(in crate::app) fn begin_gesture(&mut self, hit: Option<usize>) {
        self.capture = match hit.and_then(|index| self.map.nodes.get(index)) {
            Some(node) => PointerCapture::DragNode {
                id: node.id.clone(),
                moved: 0.0,
            },
            None => PointerCapture::PanCanvas,
        };
    }

    /// Routes a pointer movement to whichever gesture owns the session.
    pub(in crate::app) fn apply_pointer_delta(&mut self, delta: Vec2) {
        match &mut self.capture {
            PointerCapture::Idle => {}
            // Canvas pan accumulates the raw pointer delta, unscaled.
            PointerCapture::PanCanvas => self.pan += delta,
            PointerCapture::DragNode { id, moved } => {
                *moved += delta.length();
                let Some(index) = self.map.index_by_id.get(id.as_str()).copied() else {
                    // Target vanished under the pointer (collapsed branch);
                    // the drag ends silently.
                    self.capture = PointerCapture::Idle;
                    return;
                };
                // Screen delta maps to world space through the inverse zoom.
                self.map.nodes[index].world_pos += delta / self.zoom;
            }
        }
    }

    /// Ends the pointer session. A node gesture that never travelled past
    /// the click threshold is reported as a click; otherwise the dragged
    /// position simply sticks as the new simulation input.
    pub(in crate::app) fn finish_gesture(&mut self) -> GestureEnd {
        let capture = std::mem::take(&mut self.capture);
        match capture {
            PointerCapture::DragNode { id, moved } => match self.map.node_index(&id) {
                Some(index) if moved <= CLICK_DRAG_THRESHOLD => GestureEnd::ClickedNode(index),
                _ => GestureEnd::Released,
            },
            PointerCapture::Idle | PointerCapture::PanCanvas => GestureEnd::Released,
        }
    }

    pub(in crate::app) fn node_clicked(&mut self, index: usize) {
        let Some(node) = self.map.nodes.get(index) else {
            return;
        };

        match node.kind {
            NodeKind::Root => {}
            NodeKind::Document => {
                if let Some(document_id) = node.source_id.clone() {
                    self.toggle_expansion(&document_id);
                }
            }
            NodeKind::Section => {
                let section_id = node.source_id.clone();
                self.selected_section = if self.selected_section == section_id {
                    None
                } else {
                    section_id
                };
            }
        }
    }

    pub(in crate::app) fn toggle_expansion(&mut self, document_id: &str) {
        if !self.expanded.remove(document_id) {
            self.expanded.insert(document_id.to_owned());
        }
        self.pending_iterations = TOPOLOGY_UPDATE_ITERATIONS;
        self.graph_dirty = true;
    }

    pub(in crate::app) fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Modified scroll zooms (anchored at the canvas centre); unmodified
    /// scroll pans.
    pub(in crate::app) fn handle_scroll(&mut self, ui: &Ui, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let (scroll, modifiers) = ui.input(|input| (input.raw_scroll_delta, input.modifiers));
        if scroll == Vec2::ZERO {
            return;
        }

        if modifiers.command || modifiers.ctrl {
            let zoom_factor = (1.0 + scroll.y * 0.0018).clamp(0.85, 1.15);
            self.set_zoom(self.zoom * zoom_factor);
        } else {
            self.pan += scroll;
        }
    }

    /// Keeps the rest of the map settling around a live drag; the held node
    /// itself is excluded from the writes.
    pub(in crate::app) fn settle_during_drag(&mut self) {
        if let Some(held) = self.held_index() {
            relax(&mut self.map, &self.params, DRAG_SETTLE_ITERATIONS, Some(held));
        }
    }

    /// Low-iteration re-run after a drag release, with the released position
    /// as the new input. Nothing snaps back.
    pub(in crate::app) fn settle_after_release(&mut self) {
        relax(&mut self.map, &self.params, TOPOLOGY_UPDATE_ITERATIONS, None);
    }

    /// Nearest node whose footprint contains the world-space point.
    pub(in crate::app) fn hit_test(&self, world: Vec2) -> Option<(usize, f32)> {
        self.map
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let distance = (node.world_pos - world).length();
                (distance <= node.radius()).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use eframe::egui::vec2;

    use crate::docs::{Document, DocumentCollection, Section};

    use super::super::super::ViewModel;
    use super::super::build_topology;
    use super::{GestureEnd, MAX_ZOOM, MIN_ZOOM, PointerCapture};

    fn sample_collection() -> DocumentCollection {
        DocumentCollection {
            title: None,
            documents: vec![Document {
                id: "d1".to_owned(),
                title: "Paper".to_owned(),
                sections: vec![
                    Section {
                        id: "s1".to_owned(),
                        title: "Intro".to_owned(),
                        summary: "sum".to_owned(),
                        key_points: vec!["point".to_owned()],
                        color_theme: None,
                    },
                    Section {
                        id: "s2".to_owned(),
                        title: "Method".to_owned(),
                        summary: String::new(),
                        key_points: Vec::new(),
                        color_theme: None,
                    },
                ],
            }],
        }
    }

    fn expanded_model() -> ViewModel {
        let mut model = ViewModel::new(sample_collection());
        model.expanded.insert("d1".to_owned());
        model.map = build_topology(&model.collection, &model.expanded, &HashMap::new());
        model.graph_dirty = false;
        model
    }

    #[test]
    fn drag_moves_only_the_dragged_node_by_exactly_the_delta() {
        let mut model = expanded_model();
        let dragged = model.map.node_index("sec:s1").expect("section present");
        let before = model
            .map
            .nodes
            .iter()
            .map(|node| node.world_pos)
            .collect::<Vec<_>>();

        model.begin_gesture(Some(dragged));
        model.apply_pointer_delta(vec2(17.0, -6.0));

        for (index, node) in model.map.nodes.iter().enumerate() {
            if index == dragged {
                assert_eq!(node.world_pos, before[index] + vec2(17.0, -6.0));
            } else {
                assert_eq!(node.world_pos, before[index], "node {} moved", node.id);
            }
        }
        assert_eq!(model.finish_gesture(), GestureEnd::Released);
    }

    #[test]
    fn drag_delta_is_scaled_by_inverse_zoom() {
        let mut model = expanded_model();
        model.set_zoom(2.0);
        let dragged = model.map.node_index("sec:s1").expect("section present");
        let before = model.map.nodes[dragged].world_pos;

        model.begin_gesture(Some(dragged));
        model.apply_pointer_delta(vec2(10.0, 0.0));

        assert_eq!(model.map.nodes[dragged].world_pos, before + vec2(5.0, 0.0));
    }

    #[test]
    fn sub_threshold_gesture_is_a_click() {
        let mut model = expanded_model();
        let index = model.map.node_index("doc:d1").expect("document present");

        model.begin_gesture(Some(index));
        model.apply_pointer_delta(vec2(1.0, 1.0));
        assert_eq!(model.finish_gesture(), GestureEnd::ClickedNode(index));
    }

    #[test]
    fn document_click_toggles_the_expansion_set() {
        let mut model = expanded_model();
        let index = model.map.node_index("doc:d1").expect("document present");

        model.node_clicked(index);
        assert!(!model.expanded.contains("d1"));
        assert!(model.graph_dirty);

        model.graph_dirty = false;
        model.node_clicked(index);
        assert!(model.expanded.contains("d1"));
        assert!(model.graph_dirty);
    }

    #[test]
    fn section_click_selects_and_reclick_deselects() {
        let mut model = expanded_model();
        let index = model.map.node_index("sec:s1").expect("section present");

        model.node_clicked(index);
        assert_eq!(model.selected_section.as_deref(), Some("s1"));
        let (_, section) = model.selected_section_data().expect("selection data");
        assert_eq!(section.summary, "sum");

        model.node_clicked(index);
        assert!(model.selected_section.is_none());
    }

    #[test]
    fn vanished_drag_target_terminates_the_gesture_silently() {
        let mut model = expanded_model();
        let dragged = model.map.node_index("sec:s1").expect("section present");
        model.begin_gesture(Some(dragged));

        // Concurrent collapse removes the section nodes.
        model.expanded.clear();
        model.map = build_topology(&model.collection, &model.expanded, &HashMap::new());

        model.apply_pointer_delta(vec2(5.0, 5.0));
        assert_eq!(model.capture, PointerCapture::Idle);
    }

    #[test]
    fn empty_canvas_press_claims_a_pan_gesture() {
        let mut model = expanded_model();
        let pan_before = model.pan;

        model.begin_gesture(None);
        model.apply_pointer_delta(vec2(-30.0, 12.0));
        assert_eq!(model.pan, pan_before + vec2(-30.0, 12.0));
        assert_eq!(model.finish_gesture(), GestureEnd::Released);
    }

    #[test]
    fn zoom_is_clamped_to_the_supported_range() {
        let mut model = expanded_model();
        model.set_zoom(100.0);
        assert_eq!(model.zoom, MAX_ZOOM);
        model.set_zoom(0.0);
        assert_eq!(model.zoom, MIN_ZOOM);
    }

    #[test]
    fn hit_test_prefers_the_nearest_containing_footprint() {
        let mut model = expanded_model();
        let document = model.map.node_index("doc:d1").expect("document present");
        let section = model.map.node_index("sec:s1").expect("section present");
        model.map.nodes[document].world_pos = vec2(0.0, 0.0);
        model.map.nodes[section].world_pos = vec2(30.0, 0.0);

        // Inside both footprints (radii 22 and 13), but closer to the section.
        let hit = model.hit_test(vec2(20.0, 0.0));
        assert_eq!(hit.map(|(index, _)| index), Some(section));

        assert!(model.hit_test(vec2(5000.0, 5000.0)).is_none());
    }
}
