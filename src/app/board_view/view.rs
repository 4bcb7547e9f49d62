use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::bubbles::SimTuning;
use crate::util::{compact_title, format_due_relative};

use super::super::highlight::build_highlight_state;
use super::super::render_utils::{blend_color, dim_color, draw_background, fade_color};
use super::super::{SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        if self.selected.is_some() {
            return None;
        }

        let search_query = self.search.trim();
        if search_query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.board_revision == self.board_revision
            && cached.query == search_query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .visible
            .iter()
            .enumerate()
            .filter_map(|(index, task)| {
                let mut haystack = task.title.clone();
                if let Some(record) = self.board.tasks.get(&task.id) {
                    for tag in &record.tags {
                        haystack.push(' ');
                        haystack.push_str(tag);
                    }
                    if let Some(assignee) = &record.assignee {
                        haystack.push(' ');
                        haystack.push_str(assignee);
                    }
                }

                if fuzzy_match_score(&matcher, &haystack, search_query).is_some() {
                    Some(index)
                } else {
                    None
                }
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: search_query.to_owned(),
            board_revision: self.board_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_board(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());

        if (rect.size() - self.canvas_size).length() > 0.5 {
            self.canvas_size = rect.size();
            self.board_dirty = true;
        }

        if self.board_dirty {
            self.rebuild_visible_set(ui.ctx());
        }

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let search_matches = self.cached_search_matches();

        if self.visible.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No tasks to show",
                FontId::proportional(14.0),
                Color32::from_gray(150),
            );
            return;
        }

        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let tuning = SimTuning {
            intensity: self.physics_intensity,
            spring_scale: self.physics_spring,
            drift_scale: self.physics_drift,
            collision_scale: self.physics_collision,
            velocity_damping: self.physics_velocity_damping,
            wall_restitution: self.physics_wall_restitution,
        };

        let mut bubbles_moving = false;
        if self.live_physics {
            bubbles_moving = self.sim.step(rect, frame_delta_seconds, tuning);
        }

        if bubbles_moving || !self.completing.is_empty() {
            ui.ctx().request_repaint();
        }

        let hovered = Self::hovered_index(ui, self.sim.nodes());

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let hovered_id = hovered
            .and_then(|(index, _distance)| self.visible.get(index).map(|task| task.id.clone()));
        let double_clicked = response.double_clicked_by(egui::PointerButton::Primary);
        let pending_selection = if response.clicked_by(egui::PointerButton::Primary) {
            Some(hovered_id.clone())
        } else {
            None
        };

        let hovered_index = hovered.map(|(index, _)| index);
        let highlight = self.selected.as_ref().and_then(|id| {
            build_highlight_state(&self.board, &self.visible, &self.visible_index_by_id, id)
        });
        let selection_active = highlight
            .as_ref()
            .is_some_and(|state| !state.related.is_empty());
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());

        let selected_color = Color32::from_rgb(245, 206, 93);
        let mut selection_animating = false;

        let mut draw_order = (0..self.visible.len()).collect::<Vec<_>>();
        draw_order.sort_by(|a, b| self.visible[*a].radius.total_cmp(&self.visible[*b].radius));

        let nodes = self.sim.nodes();
        for index in draw_order {
            let Some(task) = self.visible.get(index) else {
                continue;
            };
            let Some(node) = nodes.get(index) else {
                continue;
            };

            let position = node.pos;
            let radius = node.radius;

            let is_selected = self.selected.as_deref() == Some(task.id.as_str());
            let is_hovered = hovered_index == Some(index);
            let is_related = highlight
                .as_ref()
                .is_some_and(|state| state.related.contains(&index));
            let is_search_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base_color = task.tone;
            let unselected_color = if is_hovered {
                Color32::from_rgb(255, 164, 101)
            } else if is_related {
                blend_color(base_color, Color32::from_rgb(246, 137, 92), 0.60)
            } else if is_search_match {
                blend_color(base_color, Color32::from_rgb(103, 196, 255), 0.68)
            } else if selection_active {
                dim_color(base_color, 0.52)
            } else if search_active {
                dim_color(base_color, 0.38)
            } else {
                base_color
            };

            let selection_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("bubble-selection", task.id.as_str())),
                is_selected,
            );
            if selection_mix > 0.0 && selection_mix < 1.0 {
                selection_animating = true;
            }

            let mut color = blend_color(unselected_color, selected_color, selection_mix);
            let mut ring_color = Color32::from_rgba_unmultiplied(15, 15, 15, 190);
            if task.completing > 0.0 {
                let opacity = 1.0 - task.completing;
                color = fade_color(color, opacity);
                ring_color = fade_color(ring_color, opacity);
            }

            painter.circle_filled(position, radius, color);
            if selection_mix > 0.0 {
                let halo_strength = (selection_mix * (1.0 - selection_mix) * 4.0).clamp(0.0, 1.0);
                let halo_alpha = (30.0 + (halo_strength * 145.0)) as u8;
                painter.circle_stroke(
                    position,
                    radius + 4.0 + ((1.0 - selection_mix) * 6.0),
                    Stroke::new(
                        1.0 + (halo_strength * 1.6),
                        Color32::from_rgba_unmultiplied(245, 206, 93, halo_alpha),
                    ),
                );
            }

            let stroke_width = if is_search_match { 1.55 } else { 1.0 } + (selection_mix * 1.2);
            painter.circle_stroke(position, radius, Stroke::new(stroke_width, ring_color));

            if radius > 26.0 {
                let max_chars = ((radius * 0.22) as usize).max(6);
                let title_font = FontId::proportional((radius * 0.28).clamp(10.0, 20.0));
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    compact_title(&task.title, max_chars),
                    title_font,
                    Color32::from_gray(238),
                );

                if radius > 44.0
                    && let Some(due_label) = &task.due_label
                {
                    painter.text(
                        position + vec2(0.0, (radius * 0.30).clamp(12.0, 20.0)),
                        Align2::CENTER_CENTER,
                        due_label,
                        FontId::proportional(11.0),
                        Color32::from_gray(205),
                    );
                }
            }
        }

        if selection_animating {
            ui.ctx().request_repaint();
        }

        if let Some(id) = &hovered_id
            && let Some(record) = self.board.tasks.get(id)
        {
            let due_text = record
                .due_at
                .map(|due| format_due_relative(chrono::Utc::now(), due))
                .unwrap_or_else(|| "no due date".to_owned());
            let mut panel_text = format!(
                "{}  |  {}  |  {}",
                record.title,
                record.status.label(),
                due_text
            );
            if let Some(assignee) = &record.assignee {
                panel_text.push_str("  |  @");
                panel_text.push_str(assignee);
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if double_clicked
            && let Some(id) = hovered_id.clone()
        {
            self.toggle_task_done(&id, ui.ctx());
        }

        if let Some(selected) = pending_selection {
            self.apply_board_selection(selected);
        }
    }
}
