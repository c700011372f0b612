use std::collections::HashSet;

use sea_orm::{ActiveValue, ConnectionTrait, IntoActiveModel, TransactionTrait};

use crate::entities::{label, task};
use crate::repositories::{ColumnRepository, LabelRepository, TaskRepository};

use super::{
    require_text, BoardError, BoardResult, BoardService, CreateTaskArgs, LabelArgs, TaskWithLabels, UpdateTaskArgs,
};

impl BoardService {
    /// Tasks ascending by `order`, limited to one column when `column_id` is given.
    ///
    /// `Some(0)` filters on column 0; only `None` means "every column".
    pub async fn list_tasks(&self, column_id: Option<i32>) -> BoardResult<Vec<TaskWithLabels>> {
        let conn = &self.storage.conn;
        let tasks = TaskRepository::get_all(conn, column_id).await?;
        log::debug!("Listed {} tasks (column filter: {:?})", tasks.len(), column_id);
        Self::attach_labels(conn, tasks).await
    }

    /// Create a task in an existing column.
    ///
    /// Label ids that do not match an existing label are ignored.
    pub async fn create_task(&self, args: CreateTaskArgs) -> BoardResult<TaskWithLabels> {
        require_text("title", &args.title)?;

        let txn = self.storage.conn.begin().await?;
        let created = Self::insert_task(&txn, args).await?;
        txn.commit().await?;

        log::info!(
            "Created task {} in column {} with {} labels",
            created.task.id,
            created.task.column_id,
            created.labels.len()
        );
        Ok(created)
    }

    /// Overwrite only the supplied fields of a task.
    ///
    /// When `label_ids` is present the label set is replaced, not merged.
    pub async fn update_task(&self, id: i32, args: UpdateTaskArgs) -> BoardResult<TaskWithLabels> {
        if let Some(title) = &args.title {
            require_text("title", title)?;
        }

        let txn = self.storage.conn.begin().await?;
        let existing = TaskRepository::get_by_id(&txn, id)
            .await?
            .ok_or(BoardError::NotFound("Task"))?;

        let mut active = existing.into_active_model();
        if let Some(title) = args.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(description) = args.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(completed) = args.completed {
            active.completed = ActiveValue::Set(completed);
        }
        if let Some(order) = args.order {
            active.order = ActiveValue::Set(order);
        }
        if let Some(column_id) = args.column_id {
            if ColumnRepository::get_by_id(&txn, column_id).await?.is_none() {
                return Err(BoardError::NotFound("Column"));
            }
            active.column_id = ActiveValue::Set(column_id);
        }

        let task = TaskRepository::update(&txn, active).await?;
        if let Some(label_ids) = &args.label_ids {
            Self::attach_existing_labels(&txn, task.id, label_ids).await?;
        }
        let labels = LabelRepository::get_for_task(&txn, &task).await?;
        txn.commit().await?;

        log::info!("Updated task {}", task.id);
        Ok(TaskWithLabels { task, labels })
    }

    /// Delete a task. Its labels stay in place for other tasks.
    pub async fn delete_task(&self, id: i32) -> BoardResult<()> {
        let txn = self.storage.conn.begin().await?;
        if TaskRepository::get_by_id(&txn, id).await?.is_none() {
            return Err(BoardError::NotFound("Task"));
        }

        TaskRepository::delete(&txn, id).await?;
        txn.commit().await?;

        log::info!("Deleted task {}", id);
        Ok(())
    }

    pub async fn get_task_labels(&self, task_id: i32) -> BoardResult<Vec<label::Model>> {
        let conn = &self.storage.conn;
        let task = TaskRepository::get_by_id(conn, task_id)
            .await?
            .ok_or(BoardError::NotFound("Task"))?;

        Ok(LabelRepository::get_for_task(conn, &task).await?)
    }

    /// Replace the task's labels with exactly the given `(text, color)` pairs.
    ///
    /// Each pair reuses an existing label with the same text and color, or
    /// creates one. Labels previously attached but not listed are detached.
    /// The lookup and the inserts share the replace transaction; there is no
    /// unique constraint, so two concurrent requests may still both insert
    /// the same new pair.
    pub async fn replace_task_labels(&self, task_id: i32, labels: Vec<LabelArgs>) -> BoardResult<Vec<label::Model>> {
        for label in &labels {
            require_text("text", &label.text)?;
            require_text("color", &label.color)?;
        }

        let txn = self.storage.conn.begin().await?;
        if TaskRepository::get_by_id(&txn, task_id).await?.is_none() {
            return Err(BoardError::NotFound("Task"));
        }

        let mut resolved: Vec<label::Model> = Vec::with_capacity(labels.len());
        for LabelArgs { text, color } in labels {
            let label = match LabelRepository::find_by_text_and_color(&txn, &text, &color).await? {
                Some(existing) => existing,
                None => {
                    let created = Self::insert_label(&txn, text, color).await?;
                    log::debug!("Created label {} while replacing labels of task {}", created.id, task_id);
                    created
                }
            };
            if !resolved.iter().any(|l| l.id == label.id) {
                resolved.push(label);
            }
        }

        let ids: Vec<i32> = resolved.iter().map(|l| l.id).collect();
        TaskRepository::set_labels(&txn, task_id, &ids).await?;
        txn.commit().await?;

        log::info!("Replaced labels of task {} with {:?}", task_id, ids);
        Ok(resolved)
    }

    pub(super) async fn insert_task<C>(conn: &C, args: CreateTaskArgs) -> BoardResult<TaskWithLabels>
    where
        C: ConnectionTrait,
    {
        if ColumnRepository::get_by_id(conn, args.column_id).await?.is_none() {
            return Err(BoardError::NotFound("Column"));
        }

        let model = task::ActiveModel {
            title: ActiveValue::Set(args.title),
            description: ActiveValue::Set(args.description),
            completed: ActiveValue::Set(args.completed),
            order: ActiveValue::Set(args.order),
            column_id: ActiveValue::Set(args.column_id),
            ..Default::default()
        };
        let task = TaskRepository::insert(conn, model).await?;

        let labels = match args.label_ids {
            Some(label_ids) if !label_ids.is_empty() => Self::attach_existing_labels(conn, task.id, &label_ids).await?,
            _ => Vec::new(),
        };

        Ok(TaskWithLabels { task, labels })
    }

    /// Point the task at the labels among `label_ids` that exist.
    async fn attach_existing_labels<C>(conn: &C, task_id: i32, label_ids: &[i32]) -> BoardResult<Vec<label::Model>>
    where
        C: ConnectionTrait,
    {
        let labels = LabelRepository::get_by_ids(conn, label_ids).await?;
        let unknown = unknown_label_ids(label_ids, &labels);
        if !unknown.is_empty() {
            log::debug!("Ignoring unknown label ids for task {}: {:?}", task_id, unknown);
        }

        let ids: Vec<i32> = labels.iter().map(|l| l.id).collect();
        TaskRepository::set_labels(conn, task_id, &ids).await?;
        Ok(labels)
    }

    pub(super) async fn attach_labels<C>(conn: &C, tasks: Vec<task::Model>) -> BoardResult<Vec<TaskWithLabels>>
    where
        C: ConnectionTrait,
    {
        let ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();
        let mut labels = TaskRepository::labels_by_task(conn, &ids).await?;

        Ok(tasks
            .into_iter()
            .map(|task| {
                let labels = labels.remove(&task.id).unwrap_or_default();
                TaskWithLabels { task, labels }
            })
            .collect())
    }
}

/// Requested ids with no matching label, deduplicated, in request order.
fn unknown_label_ids(requested: &[i32], found: &[label::Model]) -> Vec<i32> {
    let known: HashSet<i32> = found.iter().map(|l| l.id).collect();
    let mut seen = HashSet::new();
    requested
        .iter()
        .copied()
        .filter(|id| !known.contains(id) && seen.insert(*id))
        .collect()
}
