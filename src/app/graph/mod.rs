mod build;
mod interaction;
mod view;

use std::collections::HashMap;

use eframe::egui::Vec2;

pub(in crate::app) use build::build_topology;
pub(in crate::app) use interaction::{GestureEnd, PointerCapture};

pub(in crate::app) const ROOT_NODE_ID: &str = "root";

/// Closed set of node kinds; the topology is a bounded tree
/// root -> document -> section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum NodeKind {
    Root,
    Document,
    Section,
}

impl NodeKind {
    /// Footprint radius, used for collision resolution and hit-testing.
    pub(in crate::app) fn radius(self) -> f32 {
        match self {
            Self::Root => 34.0,
            Self::Document => 22.0,
            Self::Section => 13.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum EdgeStyle {
    /// root -> document
    Solid,
    /// document -> section
    Dashed,
}

impl EdgeStyle {
    /// Rest length the spring term pulls the edge toward.
    pub(in crate::app) fn target_length(self) -> f32 {
        match self {
            Self::Solid => 190.0,
            Self::Dashed => 95.0,
        }
    }
}

#[derive(Clone, Debug)]
pub(in crate::app) struct MapNode {
    /// Stable id derived from the source entity id and kind, so rebuilds
    /// recognize previously-seen nodes.
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub world_pos: Vec2,
    /// Back-reference to the spawning node's id; lookup only.
    pub parent: Option<String>,
    /// Id of the document or section this node represents in the collection.
    pub source_id: Option<String>,
    pub color_theme: Option<String>,
}

impl MapNode {
    pub(in crate::app) fn radius(&self) -> f32 {
        self.kind.radius()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct MapEdge {
    pub source: usize,
    pub target: usize,
    pub style: EdgeStyle,
}

#[derive(Clone, Debug, Default)]
pub(in crate::app) struct MapGraph {
    pub nodes: Vec<MapNode>,
    pub edges: Vec<MapEdge>,
    pub index_by_id: HashMap<String, usize>,
}

impl MapGraph {
    pub(in crate::app) fn node_index(&self, node_id: &str) -> Option<usize> {
        self.index_by_id.get(node_id).copied()
    }

    /// Snapshot of current positions keyed by node id, used to seed the next
    /// topology rebuild so the layout does not jump.
    pub(in crate::app) fn position_snapshot(&self) -> HashMap<String, Vec2> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.world_pos))
            .collect()
    }
}
