use sea_orm::{ActiveValue, ConnectionTrait, IntoActiveModel, TransactionTrait};

use crate::entities::column;
use crate::repositories::{ColumnRepository, TaskRepository};

use super::{require_text, BoardError, BoardResult, BoardService, CreateColumnArgs, UpdateColumnArgs};

impl BoardService {
    /// All columns, ascending by `order`. Ties keep insertion order.
    pub async fn list_columns(&self) -> BoardResult<Vec<column::Model>> {
        let columns = ColumnRepository::get_all(&self.storage.conn).await?;
        log::debug!("Listed {} columns", columns.len());
        Ok(columns)
    }

    pub async fn create_column(&self, args: CreateColumnArgs) -> BoardResult<column::Model> {
        require_text("title", &args.title)?;

        let column = Self::insert_column(&self.storage.conn, args.title, args.order).await?;
        log::info!("Created column {} ({})", column.id, column.title);
        Ok(column)
    }

    /// Overwrite only the supplied fields of a column.
    pub async fn update_column(&self, id: i32, args: UpdateColumnArgs) -> BoardResult<column::Model> {
        if let Some(title) = &args.title {
            require_text("title", title)?;
        }

        let txn = self.storage.conn.begin().await?;
        let existing = ColumnRepository::get_by_id(&txn, id)
            .await?
            .ok_or(BoardError::NotFound("Column"))?;

        let mut active = existing.into_active_model();
        if let Some(title) = args.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(order) = args.order {
            active.order = ActiveValue::Set(order);
        }

        let column = ColumnRepository::update(&txn, active).await?;
        txn.commit().await?;

        log::info!("Updated column {}", column.id);
        Ok(column)
    }

    /// Delete a column and every task in it. Labels survive.
    pub async fn delete_column(&self, id: i32) -> BoardResult<()> {
        let txn = self.storage.conn.begin().await?;
        if ColumnRepository::get_by_id(&txn, id).await?.is_none() {
            return Err(BoardError::NotFound("Column"));
        }

        let removed_tasks = TaskRepository::delete_for_column(&txn, id).await?;
        ColumnRepository::delete(&txn, id).await?;
        txn.commit().await?;

        log::info!("Deleted column {} and {} tasks", id, removed_tasks);
        Ok(())
    }

    pub(super) async fn insert_column<C>(conn: &C, title: String, order: i32) -> BoardResult<column::Model>
    where
        C: ConnectionTrait,
    {
        let model = column::ActiveModel {
            title: ActiveValue::Set(title),
            order: ActiveValue::Set(order),
            ..Default::default()
        };
        Ok(ColumnRepository::insert(conn, model).await?)
    }
}
