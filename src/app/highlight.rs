use std::collections::{HashMap, HashSet};

use crate::board::{Board, TaskRecord};

use super::{HighlightState, VisibleTask};

pub(super) fn tasks_are_related(a: &TaskRecord, b: &TaskRecord) -> bool {
    if let (Some(left), Some(right)) = (&a.assignee, &b.assignee)
        && left == right
    {
        return true;
    }

    a.tags.iter().any(|tag| b.tags.contains(tag))
}

pub(super) fn build_highlight_state(
    board: &Board,
    visible: &[VisibleTask],
    visible_index_by_id: &HashMap<String, usize>,
    selected_id: &str,
) -> Option<HighlightState> {
    let selected_task = board.tasks.get(selected_id)?;

    let mut related = HashSet::new();

    for task in visible {
        if task.id == selected_id {
            continue;
        }

        if let Some(candidate) = board.tasks.get(&task.id)
            && tasks_are_related(selected_task, candidate)
            && let Some(&index) = visible_index_by_id.get(&task.id)
        {
            related.insert(index);
        }
    }

    Some(HighlightState { related })
}
