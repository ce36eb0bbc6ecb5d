use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::docs::DocumentCollection;

use super::super::ViewModel;
use super::super::physics::{TOPOLOGY_UPDATE_ITERATIONS, relax};
use super::{EdgeStyle, MapEdge, MapGraph, MapNode, NodeKind, PointerCapture, ROOT_NODE_ID};

/// Distance of the document ring from the root.
const DOCUMENT_RING_RADIUS: f32 = 260.0;
/// Radial offset of a freshly materialized section from its parent document.
const SECTION_OFFSET: f32 = 130.0;
/// Angular spread between sibling sections, in radians.
const SECTION_SPREAD: f32 = 0.52;

pub(in crate::app) fn document_node_id(document_id: &str) -> String {
    format!("doc:{document_id}")
}

pub(in crate::app) fn section_node_id(section_id: &str) -> String {
    format!("sec:{section_id}")
}

/// Derives the node and edge set from the collection plus the expansion set.
/// Positions of previously-seen ids are carried over from `previous`; only
/// brand-new nodes get seeded coordinates. Pure: no relaxation happens here.
pub(in crate::app) fn build_topology(
    collection: &DocumentCollection,
    expanded: &HashSet<String>,
    previous: &HashMap<String, Vec2>,
) -> MapGraph {
    let mut nodes = Vec::with_capacity(1 + collection.documents.len());
    let mut edges = Vec::new();

    let root_label = collection
        .title
        .clone()
        .unwrap_or_else(|| "Knowledge map".to_owned());
    nodes.push(MapNode {
        id: ROOT_NODE_ID.to_owned(),
        kind: NodeKind::Root,
        label: root_label,
        world_pos: Vec2::ZERO,
        parent: None,
        source_id: None,
        color_theme: None,
    });

    let document_count = collection.documents.len().max(1);
    for (document_index, document) in collection.documents.iter().enumerate() {
        let ring_angle = TAU * document_index as f32 / document_count as f32;
        let node_id = document_node_id(&document.id);
        let world_pos = previous.get(&node_id).copied().unwrap_or_else(|| {
            vec2(ring_angle.cos(), ring_angle.sin()) * DOCUMENT_RING_RADIUS
        });

        let document_node_index = nodes.len();
        edges.push(MapEdge {
            source: 0,
            target: document_node_index,
            style: EdgeStyle::Solid,
        });
        nodes.push(MapNode {
            id: node_id.clone(),
            kind: NodeKind::Document,
            label: document.title.clone(),
            world_pos,
            parent: Some(ROOT_NODE_ID.to_owned()),
            source_id: Some(document.id.clone()),
            color_theme: None,
        });

        if !expanded.contains(&document.id) || document.sections.is_empty() {
            continue;
        }

        // New sections fan out from the carried-over parent position, along
        // the parent's own angle from the root.
        let parent_angle = if world_pos.length() > 0.0001 {
            world_pos.y.atan2(world_pos.x)
        } else {
            ring_angle
        };
        let section_count = document.sections.len();
        for (section_index, section) in document.sections.iter().enumerate() {
            let id = section_node_id(&section.id);
            let section_pos = previous.get(&id).copied().unwrap_or_else(|| {
                let spread =
                    (section_index as f32 - (section_count - 1) as f32 * 0.5) * SECTION_SPREAD;
                let angle = parent_angle + spread;
                world_pos + vec2(angle.cos(), angle.sin()) * SECTION_OFFSET
            });

            edges.push(MapEdge {
                source: document_node_index,
                target: nodes.len(),
                style: EdgeStyle::Dashed,
            });
            nodes.push(MapNode {
                id,
                kind: NodeKind::Section,
                label: section.title.clone(),
                world_pos: section_pos,
                parent: Some(node_id.clone()),
                source_id: Some(section.id.clone()),
                color_theme: section.color_theme.clone(),
            });
        }
    }

    let mut index_by_id = HashMap::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        index_by_id.insert(node.id.clone(), index);
    }

    MapGraph {
        nodes,
        edges,
        index_by_id,
    }
}

impl ViewModel {
    /// Rebuilds the topology from the current expansion set, carrying over
    /// the live positions (including a mid-drag node's), then runs the
    /// pending relaxation budget.
    pub(in crate::app) fn rebuild_map(&mut self) {
        let previous = self.map.position_snapshot();
        self.map = build_topology(&self.collection, &self.expanded, &previous);

        // A collapse may have removed the node under the pointer; the drag
        // ends silently in that case.
        if let PointerCapture::DragNode { id, .. } = &self.capture
            && self.map.node_index(id).is_none()
        {
            self.capture = PointerCapture::Idle;
        }

        let held = self.held_index();
        relax(&mut self.map, &self.params, self.pending_iterations, held);
        log::debug!(
            "rebuilt map: {} nodes, {} edges, {} iterations",
            self.map.nodes.len(),
            self.map.edges.len(),
            self.pending_iterations
        );

        self.pending_iterations = TOPOLOGY_UPDATE_ITERATIONS;
        self.visible_node_count = self.map.nodes.len();
        self.visible_edge_count = self.map.edges.len();
        self.graph_dirty = false;
    }
}
