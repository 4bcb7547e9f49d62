use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::model::TaskStatus;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawBoardDocument {
    #[serde(default)]
    pub(super) board: Option<String>,
    #[serde(default)]
    pub(super) seed: Option<String>,
    #[serde(default)]
    pub(super) tasks: Vec<RawTask>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawTask {
    pub(super) id: String,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) notes: String,
    #[serde(default)]
    pub(super) status: Option<TaskStatus>,
    pub(super) created_at: DateTime<Utc>,
    #[serde(default)]
    pub(super) due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) assignee: Option<String>,
    #[serde(default)]
    pub(super) tags: Vec<String>,
}

pub(super) fn parse_board_document(raw: &str) -> Result<RawBoardDocument> {
    if raw.trim().is_empty() {
        bail!("board document is empty");
    }

    serde_json::from_str(raw).context("invalid board JSON")
}
