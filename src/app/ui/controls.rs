use chrono::Utc;
use eframe::egui::{self, Align, Key, Layout, Response, Ui};

use crate::util::{compact_title, format_due_relative};

use super::super::{StatusFilter, ViewModel};

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn default_slider_key_step(min: f32, max: f32) -> f32 {
    ((max - min) / 200.0).max(0.0005)
}

fn apply_slider_arrow_acceleration_f32(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    min: f32,
    max: f32,
    step: f32,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        hold_state = SliderKeyHoldState::default();
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, hold_state));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    if increase_down {
        hold_state.positive_secs += delta_time;
    } else {
        hold_state.positive_secs = 0.0;
    }

    if decrease_down {
        hold_state.negative_secs += delta_time;
    } else {
        hold_state.negative_secs = 0.0;
    }

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, hold_state));
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction as f32 * step * speed * delta_time;

    let old_value = *value;
    *value = (*value + delta).clamp(min, max);
    let changed = (*value - old_value).abs() > f32::EPSILON;

    if increase_down || decrease_down {
        ui.ctx().request_repaint();
    }

    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));
    changed
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Board Controls");
        ui.separator();
        ui.add_space(4.0);

        let mut filter_changed = false;

        ui.label("Search (title, tag, or assignee)")
            .on_hover_text("Fuzzy-highlight matching bubbles without changing the board.");
        let search_response = ui.text_edit_singleline(&mut self.search);
        search_response
            .on_hover_text("Type to highlight matching bubbles, then click one to select it.");

        ui.separator();

        ui.horizontal_wrapped(|ui| {
            filter_changed |= ui
                .selectable_value(&mut self.status_filter, StatusFilter::All, "All active")
                .on_hover_text("Show every task that is not done.")
                .changed();
            filter_changed |= ui
                .selectable_value(&mut self.status_filter, StatusFilter::Open, "Open")
                .on_hover_text("Show only open tasks.")
                .changed();
            filter_changed |= ui
                .selectable_value(
                    &mut self.status_filter,
                    StatusFilter::InProgress,
                    "In progress",
                )
                .on_hover_text("Show only tasks currently in progress.")
                .changed();
        });

        ui.separator();

        ui.checkbox(&mut self.live_physics, "Live bubble motion")
            .on_hover_text("Continuously animate bubbles while viewing the board.");

        ui.checkbox(&mut self.show_fps_bar, "FPS Display")
            .on_hover_text("Show a live FPS readout in the header.");

        ui.collapsing("FPS Display tuning", |ui| {
            ui.add_enabled_ui(self.show_fps_bar, |ui| {
                ui.checkbox(&mut self.fps_show_current, "Show current FPS")
                    .on_hover_text("Display the most recent frame rate sample.");
                ui.checkbox(&mut self.fps_show_average, "Show average FPS")
                    .on_hover_text("Display the running average FPS over recent samples.");
                ui.checkbox(&mut self.fps_show_low, "Show low FPS")
                    .on_hover_text("Display the minimum FPS from the recent sample window.");
                ui.checkbox(&mut self.fps_show_high, "Show high FPS")
                    .on_hover_text("Display the maximum FPS from the recent sample window.");
                ui.checkbox(&mut self.fps_show_frame_time, "Show frame time")
                    .on_hover_text("Display frame duration in milliseconds.");
            });
        });

        ui.collapsing("Motion tuning", |ui| {
            let intensity_slider = ui
                .add(
                    egui::Slider::new(&mut self.physics_intensity, 0.2..=2.5)
                        .text("Intensity")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Overall strength applied to all bubble motion.");
            if intensity_slider.hovered() {
                intensity_slider.request_focus();
            }
            apply_slider_arrow_acceleration_f32(
                ui,
                &intensity_slider,
                &mut self.physics_intensity,
                0.2,
                2.5,
                default_slider_key_step(0.2, 2.5),
            );

            let spring_slider = ui
                .add(
                    egui::Slider::new(&mut self.physics_spring, 0.2..=2.2)
                        .text("Anchor spring")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How strongly bubbles pull toward their home anchors.");
            if spring_slider.hovered() {
                spring_slider.request_focus();
            }
            apply_slider_arrow_acceleration_f32(
                ui,
                &spring_slider,
                &mut self.physics_spring,
                0.2,
                2.2,
                default_slider_key_step(0.2, 2.2),
            );

            let drift_slider = ui
                .add(
                    egui::Slider::new(&mut self.physics_drift, 0.0..=2.0)
                        .text("Drift")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Strength of the idle wobble that keeps bubbles alive.");
            if drift_slider.hovered() {
                drift_slider.request_focus();
            }
            apply_slider_arrow_acceleration_f32(
                ui,
                &drift_slider,
                &mut self.physics_drift,
                0.0,
                2.0,
                default_slider_key_step(0.0, 2.0),
            );

            let collision_slider = ui
                .add(
                    egui::Slider::new(&mut self.physics_collision, 0.2..=2.0)
                        .text("Collision")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Extra separation to prevent overlap between nearby bubbles.");
            if collision_slider.hovered() {
                collision_slider.request_focus();
            }
            apply_slider_arrow_acceleration_f32(
                ui,
                &collision_slider,
                &mut self.physics_collision,
                0.2,
                2.0,
                default_slider_key_step(0.2, 2.0),
            );

            let damping_slider = ui
                .add(
                    egui::Slider::new(&mut self.physics_velocity_damping, 0.78..=0.97)
                        .text("Velocity damping")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How quickly bubble movement slows each frame.");
            if damping_slider.hovered() {
                damping_slider.request_focus();
            }
            apply_slider_arrow_acceleration_f32(
                ui,
                &damping_slider,
                &mut self.physics_velocity_damping,
                0.78,
                0.97,
                default_slider_key_step(0.78, 0.97),
            );

            let wall_slider = ui
                .add(
                    egui::Slider::new(&mut self.physics_wall_restitution, 0.0..=0.95)
                        .text("Wall bounce")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How much speed survives a bounce off the board edge.");
            if wall_slider.hovered() {
                wall_slider.request_focus();
            }
            apply_slider_arrow_acceleration_f32(
                ui,
                &wall_slider,
                &mut self.physics_wall_restitution,
                0.0,
                0.95,
                default_slider_key_step(0.0, 0.95),
            );
        });

        if filter_changed {
            self.board_dirty = true;
        }

        ui.separator();

        egui::CollapsingHeader::new("Due soon")
            .default_open(true)
            .show(ui, |ui| {
                self.draw_due_ranking(ui);
            });

        ui.add_space(8.0);
        egui::CollapsingHeader::new("Tags")
            .default_open(true)
            .show(ui, |ui| {
                self.draw_tag_ranking(ui);
            });
    }

    fn draw_due_ranking(&mut self, ui: &mut Ui) {
        let ids_len = self.due_ranking.len();
        let row_count = ids_len.min(self.due_rows_visible);
        let mut should_load_more = false;
        let mut selected_id = None;
        let now = Utc::now();

        egui::ScrollArea::vertical()
            .id_salt("due_ranking_scroll")
            .max_height(180.0)
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, row_count, |ui, row_range| {
                if row_range.end + Self::RANKING_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for index in row_range {
                    let Some(id) = self.due_ranking.get(index) else {
                        continue;
                    };
                    let Some(task) = self.board.tasks.get(id) else {
                        continue;
                    };

                    let is_selected = self.selected.as_deref() == Some(id.as_str());
                    let value_label = task
                        .due_at
                        .map(|due| format_due_relative(now, due))
                        .unwrap_or_else(|| "no due date".to_owned());

                    let row_response = ui
                        .horizontal(|ui| {
                            let clicked = ui
                                .selectable_label(is_selected, compact_title(&task.title, 34))
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(value_label);
                            });
                            clicked
                        })
                        .inner;

                    if row_response {
                        selected_id = Some(id.clone());
                    }
                }
            });

        if let Some(id) = selected_id {
            self.set_selected(Some(id));
        }

        if should_load_more && row_count < ids_len {
            self.due_rows_visible = (row_count + Self::RANKING_PAGE_ROWS).min(ids_len);
        }
    }

    fn draw_tag_ranking(&mut self, ui: &mut Ui) {
        let tags_len = self.tag_ranking.len();
        let row_count = tags_len.min(self.tag_rows_visible);
        let mut should_load_more = false;
        let mut searched_tag = None;

        egui::ScrollArea::vertical()
            .id_salt("tag_ranking_scroll")
            .max_height(180.0)
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, row_count, |ui, row_range| {
                if row_range.end + Self::RANKING_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for index in row_range {
                    let Some((tag, count)) = self.tag_ranking.get(index) else {
                        continue;
                    };

                    let is_searched = self.search.trim() == tag.as_str();
                    let value_label = if *count == 1 {
                        "1 task".to_owned()
                    } else {
                        format!("{count} tasks")
                    };

                    let row_response = ui
                        .horizontal(|ui| {
                            let clicked = ui.selectable_label(is_searched, tag.as_str()).clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(value_label);
                            });
                            clicked
                        })
                        .inner;

                    if row_response {
                        searched_tag = Some(tag.clone());
                    }
                }
            });

        if let Some(tag) = searched_tag {
            if self.search.trim() == tag {
                self.search.clear();
            } else {
                self.search = tag;
            }
            self.set_selected(None);
        }

        if should_load_more && row_count < tags_len {
            self.tag_rows_visible = (row_count + Self::RANKING_PAGE_ROWS).min(tags_len);
        }
    }
}
