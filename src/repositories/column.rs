//! Column repository for database operations.

use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder};

use crate::entities::column;

/// Repository for column-related database operations.
pub struct ColumnRepository;

impl ColumnRepository {
    /// Get all columns ordered by their display order.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<column::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        column::Entity::find()
            .order_by_asc(column::Column::Order)
            .order_by_asc(column::Column::Id)
            .all(conn)
            .await
    }

    /// Check whether the board has any column at all.
    pub async fn any_exist<C>(conn: &C) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(column::Entity::find().count(conn).await? > 0)
    }

    /// Get a single column by id.
    pub async fn get_by_id<C>(conn: &C, id: i32) -> Result<Option<column::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        column::Entity::find_by_id(id).one(conn).await
    }

    /// Insert a new column.
    pub async fn insert<C>(conn: &C, column: column::ActiveModel) -> Result<column::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        column.insert(conn).await
    }

    /// Update a column in the database.
    pub async fn update<C>(conn: &C, column: column::ActiveModel) -> Result<column::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        column.update(conn).await
    }

    /// Delete a column row. Its tasks must already be gone.
    pub async fn delete<C>(conn: &C, id: i32) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        column::Entity::delete_by_id(id).exec(conn).await?;
        Ok(())
    }
}
