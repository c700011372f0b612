use sea_orm::{ActiveValue, ConnectionTrait, IntoActiveModel, TransactionTrait};

use crate::entities::label;
use crate::repositories::LabelRepository;

use super::{require_text, BoardError, BoardResult, BoardService, LabelArgs, UpdateLabelArgs};

impl BoardService {
    /// All labels, in no particular order.
    ///
    /// Unlike the per-task lookups this listing carries no `ORDER BY`; clients sort it themselves.
    pub async fn list_labels(&self) -> BoardResult<Vec<label::Model>> {
        Ok(LabelRepository::get_all(&self.storage.conn).await?)
    }

    /// Create a label. Duplicates of an existing `(text, color)` pair are allowed here.
    pub async fn create_label(&self, args: LabelArgs) -> BoardResult<label::Model> {
        require_text("text", &args.text)?;
        require_text("color", &args.color)?;

        let label = Self::insert_label(&self.storage.conn, args.text, args.color).await?;
        log::info!("Created label {} ({}, {})", label.id, label.text, label.color);
        Ok(label)
    }

    pub async fn update_label(&self, id: i32, args: UpdateLabelArgs) -> BoardResult<label::Model> {
        if let Some(text) = &args.text {
            require_text("text", text)?;
        }
        if let Some(color) = &args.color {
            require_text("color", color)?;
        }

        let txn = self.storage.conn.begin().await?;
        let existing = LabelRepository::get_by_id(&txn, id)
            .await?
            .ok_or(BoardError::NotFound("Label"))?;

        let mut active = existing.into_active_model();
        if let Some(text) = args.text {
            active.text = ActiveValue::Set(text);
        }
        if let Some(color) = args.color {
            active.color = ActiveValue::Set(color);
        }

        let label = LabelRepository::update(&txn, active).await?;
        txn.commit().await?;

        log::info!("Updated label {}", label.id);
        Ok(label)
    }

    /// Delete a label and detach it from its tasks. The tasks remain.
    pub async fn delete_label(&self, id: i32) -> BoardResult<()> {
        let txn = self.storage.conn.begin().await?;
        if LabelRepository::get_by_id(&txn, id).await?.is_none() {
            return Err(BoardError::NotFound("Label"));
        }

        LabelRepository::delete(&txn, id).await?;
        txn.commit().await?;

        log::info!("Deleted label {}", id);
        Ok(())
    }

    pub(super) async fn insert_label<C>(conn: &C, text: String, color: String) -> BoardResult<label::Model>
    where
        C: ConnectionTrait,
    {
        let model = label::ActiveModel {
            text: ActiveValue::Set(text),
            color: ActiveValue::Set(color),
            ..Default::default()
        };
        Ok(LabelRepository::insert(conn, model).await?)
    }
}
