use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::LayoutParams;
use super::graph::{MapGraph, NodeKind};

/// Iteration budget for an initial or from-scratch layout.
pub(in crate::app) const FULL_LAYOUT_ITERATIONS: usize = 50;
/// Iteration budget after an incremental expand/collapse, where continuity
/// matters more than full convergence.
pub(in crate::app) const TOPOLOGY_UPDATE_ITERATIONS: usize = 20;
/// Per-pointer-move budget while a node is being dragged.
pub(in crate::app) const DRAG_SETTLE_ITERATIONS: usize = 2;

/// Zero center distance is treated as this before any division.
const DISTANCE_FLOOR: f32 = 1.0;
/// Repulsion multiplier once a pair is closer than twice its minimum
/// separation, to keep clusters from collapsing.
const CLOSE_RANGE_BOOST: f32 = 2.4;
/// Cap on how far a node moves in one iteration.
const MAX_STEP: f32 = 26.0;

/// Deterministic unit vector for coincident centers. Index-derived so
/// identical inputs always relax to identical outputs.
fn separation_axis(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin())
}

/// Runs `iterations` relaxation steps over the graph in place. Only
/// positions change. The root never receives displacement (it still exerts
/// force), and `held` excludes the currently-dragged node from every
/// position write for the duration of the drag.
pub(in crate::app) fn relax(
    graph: &mut MapGraph,
    params: &LayoutParams,
    iterations: usize,
    held: Option<usize>,
) {
    let node_count = graph.nodes.len();
    if node_count < 2 {
        return;
    }

    // Kind and hold state are fixed for the whole call, so the write mask is
    // computed once up front.
    let movable = (0..node_count)
        .map(|index| graph.nodes[index].kind != NodeKind::Root && Some(index) != held)
        .collect::<Vec<_>>();

    let mut displacement = vec![Vec2::ZERO; node_count];
    for _ in 0..iterations {
        displacement.fill(Vec2::ZERO);

        // Pairwise inverse-square repulsion. The tree is bounded (depth 3),
        // so the O(n^2) pass stays cheap and needs no spatial index.
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let delta = graph.nodes[i].world_pos - graph.nodes[j].world_pos;
                let raw_distance = delta.length();
                let distance = raw_distance.max(DISTANCE_FLOOR);
                let direction = if raw_distance > 0.0001 {
                    delta / raw_distance
                } else {
                    separation_axis(i, j)
                };

                let min_separation =
                    graph.nodes[i].radius() + graph.nodes[j].radius() + params.collision_padding;
                let mut force = params.repulsion / (distance * distance);
                if distance < min_separation * 2.0 {
                    force *= CLOSE_RANGE_BOOST;
                }

                displacement[i] += direction * force;
                displacement[j] -= direction * force;
            }
        }

        // Spring attraction along edges toward the per-style rest length.
        for edge in &graph.edges {
            let (from, to) = (edge.source, edge.target);
            if from >= node_count || to >= node_count || from == to {
                continue;
            }

            let delta = graph.nodes[from].world_pos - graph.nodes[to].world_pos;
            let raw_distance = delta.length();
            let distance = raw_distance.max(DISTANCE_FLOOR);
            let direction = if raw_distance > 0.0001 {
                delta / raw_distance
            } else {
                separation_axis(from, to)
            };

            let stretch = distance - edge.style.target_length();
            let correction = direction * (stretch * params.stiffness);
            displacement[from] -= correction;
            displacement[to] += correction;
        }

        for index in 0..node_count {
            if !movable[index] {
                continue;
            }

            let step = displacement[index];
            let length = step.length();
            if length > MAX_STEP {
                graph.nodes[index].world_pos += step * (MAX_STEP / length);
            } else {
                graph.nodes[index].world_pos += step;
            }
        }

        // Hard collision pass: any remaining footprint overlap gets resolved
        // directly, half per side, immovable nodes excluded.
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let delta = graph.nodes[i].world_pos - graph.nodes[j].world_pos;
                let raw_distance = delta.length();
                let min_separation =
                    graph.nodes[i].radius() + graph.nodes[j].radius() + params.collision_padding;
                let overlap = min_separation - raw_distance;
                if overlap <= 0.0 {
                    continue;
                }

                let direction = if raw_distance > 0.0001 {
                    delta / raw_distance
                } else {
                    separation_axis(i, j)
                };
                let push = direction * (overlap * 0.5);

                if movable[i] {
                    graph.nodes[i].world_pos += push;
                }
                if movable[j] {
                    graph.nodes[j].world_pos -= push;
                }
            }
        }
    }
}
