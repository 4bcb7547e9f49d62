use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use chrono::{DateTime, Utc};
use eframe::egui::{self, Color32, Context, Vec2};
use log::{error, info};

use crate::board::{Board, TaskStatus, load_board};
use crate::bubbles::BubbleSim;

mod board_view;
mod highlight;
mod render_utils;
mod ui;

pub struct TaskBubbleApp {
    board_path: String,
    seed_override: Option<String>,
    state: AppState,
    reload_rx: Option<Receiver<Result<Board, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Board, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatusFilter {
    All,
    Open,
    InProgress,
}

impl StatusFilter {
    fn admits(self, status: TaskStatus) -> bool {
        match self {
            Self::All => status != TaskStatus::Done,
            Self::Open => status == TaskStatus::Open,
            Self::InProgress => status == TaskStatus::InProgress,
        }
    }
}

struct ViewModel {
    board: Board,
    sim: BubbleSim,
    status_filter: StatusFilter,
    search: String,
    selected: Option<String>,
    completing: HashMap<String, f64>,
    live_physics: bool,
    physics_intensity: f32,
    physics_spring: f32,
    physics_drift: f32,
    physics_collision: f32,
    physics_velocity_damping: f32,
    physics_wall_restitution: f32,
    board_dirty: bool,
    board_revision: u64,
    canvas_size: Vec2,
    visible: Vec<VisibleTask>,
    visible_index_by_id: HashMap<String, usize>,
    radius_range: (f32, f32),
    search_match_cache: Option<SearchMatchCache>,
    due_ranking: Vec<String>,
    tag_ranking: Vec<(String, usize)>,
    due_rows_visible: usize,
    tag_rows_visible: usize,
    related_rows_visible: usize,
    last_urgency_refresh_secs: f64,
    show_fps_bar: bool,
    fps_show_current: bool,
    fps_show_average: bool,
    fps_show_low: bool,
    fps_show_high: bool,
    fps_show_frame_time: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

struct SearchMatchCache {
    query: String,
    board_revision: u64,
    matches: Arc<HashSet<usize>>,
}

struct VisibleTask {
    id: String,
    title: String,
    status: TaskStatus,
    urgency: f32,
    radius: f32,
    tone: Color32,
    due_label: Option<String>,
    completing: f32,
}

struct HighlightState {
    related: HashSet<usize>,
}

#[derive(Clone)]
struct RelatedTaskEntry {
    id: String,
    title: String,
    due_at: Option<DateTime<Utc>>,
    status: TaskStatus,
    same_assignee: bool,
    shared_tag: bool,
    is_in_view: bool,
}

impl TaskBubbleApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        board_path: String,
        seed_override: Option<String>,
    ) -> Self {
        let state = Self::start_load(board_path.clone(), seed_override.clone());
        Self {
            board_path,
            seed_override,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(
        board_path: String,
        seed_override: Option<String>,
    ) -> Receiver<Result<Board, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_board(&board_path)
                .map(|mut board| {
                    if let Some(seed) = seed_override {
                        board.seed = seed;
                    }
                    board
                })
                .map_err(|error| {
                    error!("board load failed: {error:#}");
                    format!("{error:#}")
                });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(board_path: String, seed_override: Option<String>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(board_path, seed_override),
        }
    }

    fn ready_state(board: Board) -> AppState {
        info!(
            "board '{}' ready with {} tasks",
            board.name,
            board.task_count()
        );
        AppState::Ready(Box::new(ViewModel::new(board)))
    }
}

impl eframe::App for TaskBubbleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(board) => Self::ready_state(board),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading task board...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load task board");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(
                            self.board_path.clone(),
                            self.seed_override.clone(),
                        ));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.board_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(
                        self.board_path.clone(),
                        self.seed_override.clone(),
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(board) => Self::ready_state(board),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
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
