use std::collections::{HashMap, VecDeque};

use eframe::egui::{self, Align, Context, Layout, vec2};

use crate::board::Board;
use crate::board::urgency::{NOMINAL_RADIUS_MAX, NOMINAL_RADIUS_MIN};
use crate::bubbles::BubbleSim;

use super::super::{StatusFilter, ViewModel};

impl ViewModel {
    pub(in crate::app) const INITIAL_RANKING_ROWS: usize = 20;
    pub(in crate::app) const RANKING_PAGE_ROWS: usize = 20;
    pub(in crate::app) const RANKING_PREFETCH_MARGIN: usize = 4;
    pub(in crate::app) const INITIAL_RELATED_ROWS: usize = 24;
    pub(in crate::app) const RELATED_PAGE_ROWS: usize = 24;
    pub(in crate::app) const RELATED_PREFETCH_MARGIN: usize = 4;
    const URGENCY_REFRESH_SECS: f64 = 60.0;

    pub(in crate::app) fn new(board: Board) -> Self {
        let due_ranking = board.due_soon_ranking();
        let tag_ranking = board.tag_counts();
        let sim = BubbleSim::new(board.seed.clone());

        Self {
            board,
            sim,
            status_filter: StatusFilter::All,
            search: String::new(),
            selected: None,
            completing: HashMap::new(),
            live_physics: true,
            physics_intensity: 1.0,
            physics_spring: 1.0,
            physics_drift: 1.0,
            physics_collision: 1.0,
            physics_velocity_damping: 0.9,
            physics_wall_restitution: 0.72,
            board_dirty: true,
            board_revision: 0,
            canvas_size: vec2(1000.0, 800.0),
            visible: Vec::new(),
            visible_index_by_id: HashMap::new(),
            radius_range: (NOMINAL_RADIUS_MIN, NOMINAL_RADIUS_MAX),
            search_match_cache: None,
            due_ranking,
            tag_ranking,
            due_rows_visible: Self::INITIAL_RANKING_ROWS,
            tag_rows_visible: Self::INITIAL_RANKING_ROWS,
            related_rows_visible: Self::INITIAL_RELATED_ROWS,
            last_urgency_refresh_secs: 0.0,
            show_fps_bar: true,
            fps_show_current: true,
            fps_show_average: true,
            fps_show_low: false,
            fps_show_high: false,
            fps_show_frame_time: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        board_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.update_fps_counter(ctx);

        let clock = ctx.input(|input| input.time);
        if clock - self.last_urgency_refresh_secs > Self::URGENCY_REFRESH_SECS {
            self.board_dirty = true;
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("TaskBubble");
                    ui.separator();
                    ui.label(self.board.name.clone());
                    ui.label(format!("board file: {board_path}"));
                    let counts = self.board.status_counts();
                    ui.label(format!(
                        "tasks: {} open / {} in progress / {} done",
                        counts.open, counts.in_progress, counts.done
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload board"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(visible_text) = self.visible_bubbles_text() {
                            ui.label(visible_text);
                        }
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(350.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading task board...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_board(ui);
            }
        });
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        let changed = self.selected != selected;
        if !changed {
            return;
        }

        self.selected = selected;
        self.related_rows_visible = Self::INITIAL_RELATED_ROWS;
        self.board_dirty = true;
    }

    pub(in crate::app) fn refresh_rankings(&mut self) {
        self.due_ranking = self.board.due_soon_ranking();
        self.tag_ranking = self.board.tag_counts();
    }
}
