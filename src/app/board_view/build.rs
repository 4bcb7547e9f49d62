use std::collections::HashMap;

use chrono::Utc;
use eframe::egui::Context;

use crate::board::{TaskStatus, compare_due};
use crate::board::urgency::{bubble_radius, effective_radius_range, task_urgency};
use crate::bubbles::BubbleItem;
use crate::util::format_due_relative;

use super::super::render_utils::urgency_color;
use super::super::{ViewModel, VisibleTask};

const COMPLETE_ANIM_SECS: f64 = 0.45;

impl ViewModel {
    fn filtered_task_ids(&self) -> Vec<String> {
        let mut rows = self
            .board
            .tasks
            .values()
            .filter(|task| {
                if task.status == TaskStatus::Done {
                    return self.completing.contains_key(&task.id);
                }

                self.status_filter.admits(task.status)
                    || self.selected.as_deref() == Some(task.id.as_str())
            })
            .collect::<Vec<_>>();

        rows.sort_by(|a, b| {
            compare_due(a.due_at, b.due_at)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });

        rows.into_iter().map(|task| task.id.clone()).collect()
    }

    pub(in crate::app) fn rebuild_visible_set(&mut self, ctx: &Context) {
        self.board_revision = self.board_revision.wrapping_add(1);
        self.search_match_cache = None;

        let clock = ctx.input(|i| i.time);
        self.completing
            .retain(|_, started| clock - *started < COMPLETE_ANIM_SECS);

        let ids = self.filtered_task_ids();

        if ids.is_empty() {
            self.visible.clear();
            self.visible_index_by_id.clear();
            self.sim.sync(&[]);
            self.last_urgency_refresh_secs = clock;
            self.board_dirty = false;
            return;
        }

        let now = Utc::now();
        let canvas_area = self.canvas_size.x * self.canvas_size.y;
        self.radius_range = effective_radius_range(ids.len(), canvas_area);
        let (radius_min, radius_max) = self.radius_range;

        let mut visible = Vec::with_capacity(ids.len());
        for id in &ids {
            let Some(task) = self.board.tasks.get(id) else {
                continue;
            };

            let urgency = task_urgency(now, task.created_at, task.due_at);
            let mut radius = bubble_radius(urgency, radius_min, radius_max);

            let completing = self
                .completing
                .get(id)
                .map(|started| ((clock - started) / COMPLETE_ANIM_SECS).clamp(0.0, 1.0) as f32)
                .unwrap_or(0.0);
            if completing > 0.0 {
                radius *= (1.0 - completing).max(0.05);
            }

            visible.push(VisibleTask {
                id: task.id.clone(),
                title: task.title.clone(),
                status: task.status,
                urgency,
                radius,
                tone: urgency_color(urgency),
                due_label: task.due_at.map(|due| format_due_relative(now, due)),
                completing,
            });
        }

        let mut index_by_id = HashMap::with_capacity(visible.len());
        for (index, task) in visible.iter().enumerate() {
            index_by_id.insert(task.id.clone(), index);
        }

        let items = visible
            .iter()
            .map(|task| BubbleItem {
                id: task.id.clone(),
                radius: task.radius,
            })
            .collect::<Vec<_>>();
        self.sim.sync(&items);

        self.visible = visible;
        self.visible_index_by_id = index_by_id;
        self.last_urgency_refresh_secs = clock;
        self.board_dirty = !self.completing.is_empty();
    }
}
