//! Board service: every mutation and read on columns, tasks and labels.
//!
//! Each mutating operation opens one transaction on the shared connection
//! pool and commits it at the end, so a failure part-way leaves nothing
//! behind. Dropping an uncommitted transaction rolls it back.

use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::{DbErr, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::entities::{column, label, task};
use crate::repositories::{ColumnRepository, TaskRepository};
use crate::storage::LocalStorage;

mod columns;
mod labels;
mod tasks;

/// Errors returned by board operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Invalid data: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Storage error: {0}")]
    Store(#[from] DbErr),
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Arguments for creating a new column.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateColumnArgs {
    pub title: String,
    #[serde(default)]
    pub order: i32,
}

/// Arguments for updating a column. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateColumnArgs {
    pub title: Option<String>,
    pub order: Option<i32>,
}

/// Arguments for creating a new task.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateTaskArgs {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: i32,
    pub column_id: i32,
    /// Existing label ids to attach; ids that do not resolve are ignored.
    pub label_ids: Option<Vec<i32>>,
}

/// Arguments for updating a task. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateTaskArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i32>,
    pub column_id: Option<i32>,
    /// Replaces the whole label set when present.
    pub label_ids: Option<Vec<i32>>,
}

/// A `(text, color)` pair, used to create labels and to replace a task's labels.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LabelArgs {
    pub text: String,
    pub color: String,
}

/// Arguments for updating a label. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateLabelArgs {
    pub text: Option<String>,
    pub color: Option<String>,
}

/// A task together with the labels attached to it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskWithLabels {
    #[serde(flatten)]
    pub task: task::Model,
    pub labels: Vec<label::Model>,
}

/// A column with its tasks in display order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnWithTasks {
    #[serde(flatten)]
    pub column: column::Model,
    pub tasks: Vec<TaskWithLabels>,
}

/// The whole board, columns in display order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardState {
    pub columns: Vec<ColumnWithTasks>,
}

/// Entry point for board reads and writes.
#[derive(Clone)]
pub struct BoardService {
    storage: Arc<LocalStorage>,
}

impl BoardService {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    /// Load every column with its tasks and their labels.
    pub async fn board_state(&self) -> BoardResult<BoardState> {
        let conn = &self.storage.conn;
        let columns = ColumnRepository::get_all(conn).await?;
        let tasks = TaskRepository::get_all(conn, None).await?;
        let tasks = Self::attach_labels(conn, tasks).await?;

        let mut by_column: HashMap<i32, Vec<TaskWithLabels>> = HashMap::new();
        for task in tasks {
            by_column.entry(task.task.column_id).or_default().push(task);
        }

        let columns = columns
            .into_iter()
            .map(|column| {
                let tasks = by_column.remove(&column.id).unwrap_or_default();
                ColumnWithTasks { column, tasks }
            })
            .collect();

        log::debug!("Loaded board state");
        Ok(BoardState { columns })
    }

    /// Fill an empty board with a few columns and sample tasks.
    ///
    /// Returns `false` without touching anything when columns already exist.
    pub async fn seed_demo_board(&self) -> BoardResult<bool> {
        let txn = self.storage.conn.begin().await?;
        if ColumnRepository::any_exist(&txn).await? {
            log::info!("Board already has columns, skipping seed");
            return Ok(false);
        }

        let mut column_ids = Vec::new();
        for (order, title) in (1..).zip(["To Do", "In Progress", "Done"]) {
            let column = Self::insert_column(&txn, title.to_string(), order).await?;
            column_ids.push(column.id);
        }

        let samples = [
            ("Design UI", "Create mockups", column_ids[0], false),
            ("Setup Database", "Configure PostgreSQL", column_ids[1], false),
            ("API Development", "Create endpoints", column_ids[2], true),
        ];
        for (title, description, column_id, completed) in samples {
            Self::insert_task(
                &txn,
                CreateTaskArgs {
                    title: title.to_string(),
                    description: Some(description.to_string()),
                    completed,
                    order: 0,
                    column_id,
                    label_ids: None,
                },
            )
            .await?;
        }

        txn.commit().await?;
        log::info!("Seeded board with {} columns", column_ids.len());
        Ok(true)
    }
}

/// Reject blank values for required text fields.
fn require_text(field: &str, value: &str) -> BoardResult<()> {
    if value.trim().is_empty() {
        return Err(BoardError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
