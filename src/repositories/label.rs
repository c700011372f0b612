//! Label repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};

use crate::entities::{label, task, task_label};

/// Repository for label-related database operations.
pub struct LabelRepository;

impl LabelRepository {
    /// Get all labels in storage order.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<label::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        label::Entity::find().all(conn).await
    }

    /// Get a single label by id.
    pub async fn get_by_id<C>(conn: &C, id: i32) -> Result<Option<label::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        label::Entity::find_by_id(id).one(conn).await
    }

    /// Get every label whose id is in `ids`. Unknown ids are skipped.
    pub async fn get_by_ids<C>(conn: &C, ids: &[i32]) -> Result<Vec<label::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        label::Entity::find()
            .filter(label::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(label::Column::Id)
            .all(conn)
            .await
    }

    /// Find the first label with exactly this text and color.
    pub async fn find_by_text_and_color<C>(conn: &C, text: &str, color: &str) -> Result<Option<label::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        label::Entity::find()
            .filter(label::Column::Text.eq(text))
            .filter(label::Column::Color.eq(color))
            .order_by_asc(label::Column::Id)
            .one(conn)
            .await
    }

    /// Get the labels attached to a task.
    pub async fn get_for_task<C>(conn: &C, task: &task::Model) -> Result<Vec<label::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        task.find_related(label::Entity)
            .order_by_asc(label::Column::Id)
            .all(conn)
            .await
    }

    /// Insert a new label.
    pub async fn insert<C>(conn: &C, label: label::ActiveModel) -> Result<label::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        label.insert(conn).await
    }

    /// Update a label in the database.
    pub async fn update<C>(conn: &C, label: label::ActiveModel) -> Result<label::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        label.update(conn).await
    }

    /// Delete a label and detach it from every task.
    pub async fn delete<C>(conn: &C, id: i32) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        task_label::Entity::delete_many()
            .filter(task_label::Column::LabelId.eq(id))
            .exec(conn)
            .await?;
        label::Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }
}
