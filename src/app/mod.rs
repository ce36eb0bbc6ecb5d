use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};

use crate::docs::{DocumentCollection, load_collection};

mod graph;
mod physics;
mod render_utils;
mod ui;

use graph::{MapGraph, PointerCapture};

pub struct MindMapApp {
    document_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<DocumentCollection, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<DocumentCollection, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    collection: DocumentCollection,
    /// Document ids whose sections are currently materialized as nodes.
    expanded: HashSet<String>,
    /// Section id last clicked, shown in the detail panel.
    selected_section: Option<String>,
    search: String,
    pan: Vec2,
    zoom: f32,
    params: LayoutParams,
    map: MapGraph,
    capture: PointerCapture,
    graph_dirty: bool,
    /// Relaxation budget for the next rebuild: large for the initial layout,
    /// small for incremental expand/collapse updates.
    pending_iterations: usize,
    view_scratch: ViewScratch,
    visible_node_count: usize,
    visible_edge_count: usize,
}

struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
}

/// Empirically tuned simulation constants. These are configuration with
/// sensible defaults, not derived physical law; the controls panel exposes
/// them as sliders.
#[derive(Clone, Copy)]
struct LayoutParams {
    repulsion: f32,
    stiffness: f32,
    collision_padding: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            repulsion: 5200.0,
            stiffness: 0.06,
            collision_padding: 6.0,
        }
    }
}

impl MindMapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, document_path: String) -> Self {
        let state = Self::start_load(document_path.clone());
        Self {
            document_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(document_path: String) -> Receiver<Result<DocumentCollection, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_collection(&document_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(document_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(document_path),
        }
    }
}

impl eframe::App for MindMapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(collection) => AppState::Ready(Box::new(ViewModel::new(collection))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading document collection...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load document collection");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.document_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.document_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    log::info!("reloading document collection from {}", self.document_path);
                    self.reload_rx = Some(Self::spawn_load(self.document_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(collection) => {
                                    AppState::Ready(Box::new(ViewModel::new(collection)))
                                }
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
