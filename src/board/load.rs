use std::collections::HashMap;
use std::fs;

use anyhow::{Context, Result};
use log::{info, warn};

use super::model::{Board, TaskRecord};
use super::parse::parse_board_document;

pub fn load_board(path: &str) -> Result<Board> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read board file {path}"))?;
    let document = parse_board_document(&raw)
        .with_context(|| format!("failed to parse board file {path}"))?;

    let name = document
        .board
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Untitled board".to_string());
    let seed = document
        .seed
        .map(|seed| seed.trim().to_string())
        .filter(|seed| !seed.is_empty())
        .unwrap_or_else(|| name.clone());

    let mut tasks = HashMap::with_capacity(document.tasks.len());
    for raw_task in document.tasks {
        let id = raw_task.id.trim().to_string();
        if id.is_empty() {
            warn!("skipping task with empty id in {path}");
            continue;
        }

        let title = raw_task.title.trim();
        let title = if title.is_empty() {
            id.clone()
        } else {
            title.to_string()
        };

        let mut tags = raw_task
            .tags
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect::<Vec<_>>();
        tags.sort();
        tags.dedup();

        let assignee = raw_task
            .assignee
            .map(|assignee| assignee.trim().to_string())
            .filter(|assignee| !assignee.is_empty());

        let record = TaskRecord {
            id: id.clone(),
            title,
            notes: raw_task.notes,
            status: raw_task.status.unwrap_or_default(),
            created_at: raw_task.created_at,
            due_at: raw_task.due_at,
            assignee,
            tags,
        };

        if tasks.insert(id.clone(), record).is_some() {
            warn!("duplicate task id {id} in {path}; keeping the last entry");
        }
    }

    if tasks.is_empty() {
        warn!("board file {path} contains no usable tasks");
    }

    let board = Board { name, seed, tasks };
    info!(
        "loaded board '{}' with {} tasks from {path}",
        board.name,
        board.task_count()
    );
    Ok(board)
}
