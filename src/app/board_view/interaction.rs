use eframe::egui::{Context, Ui};

use crate::board::TaskStatus;
use crate::bubbles::BubbleNode;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn hovered_index(ui: &Ui, nodes: &[BubbleNode]) -> Option<(usize, f32)> {
        let pointer_pos = ui.input(|input| input.pointer.hover_pos());
        pointer_pos.and_then(|pointer| {
            nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    let distance = node.pos.distance(pointer);
                    if distance <= node.radius {
                        Some((index, distance))
                    } else {
                        None
                    }
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
        })
    }

    pub(in crate::app) fn apply_board_selection(&mut self, selected: Option<String>) {
        self.set_selected(selected);
    }

    pub(in crate::app) fn set_task_status(&mut self, id: &str, status: TaskStatus, ctx: &Context) {
        let Some(task) = self.board.tasks.get_mut(id) else {
            return;
        };
        if task.status == status {
            return;
        }

        let was_done = task.status == TaskStatus::Done;
        task.status = status;

        if status == TaskStatus::Done {
            self.completing
                .insert(id.to_owned(), ctx.input(|input| input.time));
        } else if was_done {
            self.completing.remove(id);
        }

        self.refresh_rankings();
        self.board_dirty = true;
    }

    pub(in crate::app) fn toggle_task_done(&mut self, id: &str, ctx: &Context) {
        let next = match self.board.tasks.get(id).map(|task| task.status) {
            Some(TaskStatus::Done) => TaskStatus::Open,
            Some(_) => TaskStatus::Done,
            None => return,
        };
        self.set_task_status(id, next, ctx);
    }
}
