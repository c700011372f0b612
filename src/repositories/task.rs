//! Task repository for database operations.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait,
};

use crate::entities::{label, task, task_label};

/// Repository for task-related database operations.
pub struct TaskRepository;

impl TaskRepository {
    /// Get tasks ordered by display order, optionally limited to one column.
    pub async fn get_all<C>(conn: &C, column_id: Option<i32>) -> Result<Vec<task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::find()
            .apply_if(column_id, |query, id| query.filter(task::Column::ColumnId.eq(id)))
            .order_by_asc(task::Column::Order)
            .order_by_asc(task::Column::Id)
            .all(conn)
            .await
    }

    /// Get a single task by id.
    pub async fn get_by_id<C>(conn: &C, id: i32) -> Result<Option<task::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        task::Entity::find_by_id(id).one(conn).await
    }

    /// Insert a new task.
    pub async fn insert<C>(conn: &C, task: task::ActiveModel) -> Result<task::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        task.insert(conn).await
    }

    /// Update a task in the database.
    pub async fn update<C>(conn: &C, task: task::ActiveModel) -> Result<task::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        task.update(conn).await
    }

    /// Delete a task and its label links.
    pub async fn delete<C>(conn: &C, id: i32) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        Self::clear_labels(conn, id).await?;
        task::Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }

    /// Delete every task of a column together with their label links.
    ///
    /// Returns the number of deleted tasks.
    pub async fn delete_for_column<C>(conn: &C, column_id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        task_label::Entity::delete_many()
            .filter(
                task_label::Column::TaskId.in_subquery(
                    task::Entity::find()
                        .filter(task::Column::ColumnId.eq(column_id))
                        .select_only()
                        .column(task::Column::Id)
                        .into_query(),
                ),
            )
            .exec(conn)
            .await?;

        let result = task::Entity::delete_many()
            .filter(task::Column::ColumnId.eq(column_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Remove all label relationships for a task
    pub async fn clear_labels<C>(conn: &C, task_id: i32) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        task_label::Entity::delete_many()
            .filter(task_label::Column::TaskId.eq(task_id))
            .exec(conn)
            .await?;
        Ok(())
    }

    /// Replace the label set of a task with exactly `label_ids`.
    pub async fn set_labels<C>(conn: &C, task_id: i32, label_ids: &[i32]) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        Self::clear_labels(conn, task_id).await?;

        let mut unique_ids = label_ids.to_vec();
        unique_ids.sort_unstable();
        unique_ids.dedup();
        if unique_ids.is_empty() {
            return Ok(());
        }

        let links = unique_ids.into_iter().map(|label_id| task_label::ActiveModel {
            task_id: ActiveValue::Set(task_id),
            label_id: ActiveValue::Set(label_id),
        });
        task_label::Entity::insert_many(links).exec_without_returning(conn).await?;
        Ok(())
    }

    /// Load the labels of several tasks at once, keyed by task id.
    ///
    /// Tasks without labels have no entry in the map.
    pub async fn labels_by_task<C>(conn: &C, task_ids: &[i32]) -> Result<HashMap<i32, Vec<label::Model>>, DbErr>
    where
        C: ConnectionTrait,
    {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = task_label::Entity::find()
            .filter(task_label::Column::TaskId.is_in(task_ids.iter().copied()))
            .all(conn)
            .await?;
        if links.is_empty() {
            return Ok(HashMap::new());
        }

        let labels: HashMap<i32, label::Model> = label::Entity::find()
            .filter(label::Column::Id.is_in(links.iter().map(|link| link.label_id)))
            .all(conn)
            .await?
            .into_iter()
            .map(|label| (label.id, label))
            .collect();

        let mut by_task: HashMap<i32, Vec<label::Model>> = HashMap::new();
        for link in links {
            if let Some(label) = labels.get(&link.label_id) {
                by_task.entry(link.task_id).or_default().push(label.clone());
            }
        }
        for task_labels in by_task.values_mut() {
            task_labels.sort_by_key(|label| label.id);
        }

        Ok(by_task)
    }
}
