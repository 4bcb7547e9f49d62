use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in progress",
            Self::Done => "done",
        }
    }
}

#[derive(Clone, Debug)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub notes: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub assignee: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub open: usize,
    pub in_progress: usize,
    pub done: usize,
}

#[derive(Clone, Debug)]
pub struct Board {
    pub name: String,
    pub seed: String,
    pub tasks: HashMap<String, TaskRecord>,
}

impl Board {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for task in self.tasks.values() {
            match task.status {
                TaskStatus::Open => counts.open += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Done => counts.done += 1,
            }
        }
        counts
    }

    pub fn due_soon_ranking(&self) -> Vec<String> {
        let mut rows = self
            .tasks
            .values()
            .filter(|task| task.status != TaskStatus::Done)
            .collect::<Vec<_>>();

        rows.sort_by(|a, b| {
            compare_due(a.due_at, b.due_at)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        rows.into_iter().map(|task| task.id.clone()).collect()
    }

    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for task in self.tasks.values() {
            if task.status == TaskStatus::Done {
                continue;
            }
            for tag in &task.tags {
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }

        let mut ranked = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}

pub fn compare_due(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
