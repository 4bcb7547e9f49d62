use chrono::Utc;
use eframe::egui::{self, RichText, Ui};

use crate::board::urgency::task_urgency;
use crate::board::{TaskStatus, compare_due};
use crate::util::{compact_title, format_age, format_day, format_due_relative};

use super::super::{RelatedTaskEntry, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Task Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a bubble from the board or rankings.");
            return;
        };

        let Some(task) = self.board.tasks.get(&selected_id) else {
            ui.label("Selected task no longer exists on the board.");
            return;
        };

        let title = task.title.clone();
        let notes = task.notes.clone();
        let status = task.status;
        let created_at = task.created_at;
        let due_at = task.due_at;
        let assignee = task.assignee.clone();
        let tags = task.tags.clone();

        let now = Utc::now();
        let urgency = task_urgency(now, created_at, due_at);
        let related_tasks = self.related_tasks_for_details(&selected_id, 64);

        ui.label(RichText::new(title).strong());
        ui.small(selected_id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Status: {}", status.label()));
        ui.label(format!(
            "Created: {} ({})",
            format_day(created_at),
            format_age(now, created_at)
        ));
        if let Some(due) = due_at {
            ui.label(format!(
                "Due: {} ({})",
                format_day(due),
                format_due_relative(now, due)
            ));
        } else {
            ui.label("Due: no due date");
        }
        ui.label(format!("Urgency: {:.0}%", urgency * 100.0));
        if let Some(assignee) = &assignee {
            ui.label(format!("Assignee: @{assignee}"));
        }
        if !tags.is_empty() {
            ui.label(format!("Tags: {}", tags.join(", ")));
        }
        if !notes.trim().is_empty() {
            ui.add_space(4.0);
            ui.label(notes.as_str());
        }

        ui.separator();
        ui.label(RichText::new("Why this is urgent").strong());
        let overdue = due_at.is_some_and(|due| now >= due);
        let due_soon = due_at.is_some_and(|due| now < due && (due - now).num_hours() < 48);
        if due_at.is_none() {
            ui.label("- no due date, so it keeps the floor urgency");
        }
        if overdue {
            ui.label("- past its due date");
        }
        if due_soon {
            ui.label("- due within the next two days");
        }
        if due_at.is_some() && !overdue && !due_soon {
            if urgency > 0.75 {
                ui.label("- most of its scheduled time has elapsed");
            } else {
                ui.label("- comfortably ahead of its due date");
            }
        }

        ui.separator();
        ui.horizontal(|ui| {
            if status == TaskStatus::Done {
                if ui.button("Reopen").clicked() {
                    self.set_task_status(&selected_id, TaskStatus::Open, ui.ctx());
                }
            } else {
                if ui.button("Mark done").clicked() {
                    self.set_task_status(&selected_id, TaskStatus::Done, ui.ctx());
                }
                match status {
                    TaskStatus::Open => {
                        if ui.button("Start progress").clicked() {
                            self.set_task_status(&selected_id, TaskStatus::InProgress, ui.ctx());
                        }
                    }
                    TaskStatus::InProgress => {
                        if ui.button("Pause progress").clicked() {
                            self.set_task_status(&selected_id, TaskStatus::Open, ui.ctx());
                        }
                    }
                    TaskStatus::Done => {}
                }
            }
        });

        ui.separator();
        ui.label(RichText::new("Related tasks (shared assignee or tags)").strong());
        if related_tasks.is_empty() {
            ui.label("No related tasks found for this selection.");
        } else {
            let row_count = related_tasks.len().min(self.related_rows_visible);
            let mut should_load_more = false;

            egui::ScrollArea::vertical()
                .id_salt("related_tasks_scroll")
                .max_height(320.0)
                .auto_shrink([false, false])
                .show_rows(ui, 22.0, row_count, |ui, row_range| {
                    if row_range.end + Self::RELATED_PREFETCH_MARGIN >= row_count {
                        should_load_more = true;
                    }

                    for index in row_range {
                        let Some(related) = related_tasks.get(index) else {
                            continue;
                        };
                        let mut flags = Vec::new();
                        if related.is_in_view {
                            flags.push("in-view");
                        } else {
                            flags.push("out-of-view");
                        }
                        if related.same_assignee {
                            flags.push("same assignee");
                        }
                        if related.shared_tag {
                            flags.push("shared tag");
                        }
                        if related.status == TaskStatus::Done {
                            flags.push("done");
                        }

                        let due_label = related
                            .due_at
                            .map(|due| format_due_relative(now, due))
                            .unwrap_or_else(|| "no due date".to_owned());
                        let label = format!(
                            "{}  ({})  [{}]",
                            compact_title(&related.title, 30),
                            due_label,
                            flags.join(", ")
                        );

                        if ui.link(label).on_hover_text(related.id.as_str()).clicked() {
                            self.set_selected(Some(related.id.clone()));
                        }
                    }
                });

            if should_load_more && row_count < related_tasks.len() {
                self.related_rows_visible =
                    (row_count + Self::RELATED_PAGE_ROWS).min(related_tasks.len());
            }
        }
    }

    fn related_tasks_for_details(&self, selected_id: &str, limit: usize) -> Vec<RelatedTaskEntry> {
        if limit == 0 {
            return Vec::new();
        }

        let Some(selected_task) = self.board.tasks.get(selected_id) else {
            return Vec::new();
        };

        let mut related = Vec::new();
        for (id, task) in &self.board.tasks {
            if id == selected_id {
                continue;
            }

            let same_assignee =
                selected_task.assignee.is_some() && selected_task.assignee == task.assignee;
            let shared_tag = selected_task.tags.iter().any(|tag| task.tags.contains(tag));
            if !same_assignee && !shared_tag {
                continue;
            }

            related.push(RelatedTaskEntry {
                id: id.clone(),
                title: task.title.clone(),
                due_at: task.due_at,
                status: task.status,
                same_assignee,
                shared_tag,
                is_in_view: self.visible_index_by_id.contains_key(id),
            });
        }

        related.sort_by(|a, b| {
            b.is_in_view
                .cmp(&a.is_in_view)
                .then_with(|| compare_due(a.due_at, b.due_at))
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        related.truncate(limit);
        related
    }
}
