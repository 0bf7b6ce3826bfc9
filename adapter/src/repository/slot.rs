use crate::database::{map_write_error, model::slot::SlotRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::SlotId,
    slot::{
        event::{CreateSlot, UpdateSlotStatus},
        Slot, SlotStatus,
    },
};
use kernel::repository::slot::SlotRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct SlotRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SlotRepository for SlotRepositoryImpl {
    async fn create(&self, event: CreateSlot) -> AppResult<SlotId> {
        let slot_id = SlotId::new();
        sqlx::query(
            r#"
                INSERT INTO parking_slots (slot_id, slot_number, floor, status)
                VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(slot_id)
        .bind(event.slot_number)
        .bind(event.floor)
        .bind(SlotStatus::Available.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(map_write_error)?;

        Ok(slot_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Slot>> {
        sqlx::query_as::<_, SlotRow>(
            r#"
                SELECT slot_id, slot_number, floor, status, created_at
                FROM parking_slots
                ORDER BY floor ASC, slot_number ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Slot::try_from)
        .collect()
    }

    async fn find_by_id(&self, slot_id: SlotId) -> AppResult<Option<Slot>> {
        sqlx::query_as::<_, SlotRow>(
            r#"
                SELECT slot_id, slot_number, floor, status, created_at
                FROM parking_slots
                WHERE slot_id = $1
            "#,
        )
        .bind(slot_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Slot::try_from)
        .transpose()
    }

    async fn update_status(&self, event: UpdateSlotStatus) -> AppResult<()> {
        let res = sqlx::query("UPDATE parking_slots SET status = $2 WHERE slot_id = $1")
            .bind(event.slot_id)
            .bind(event.status.as_ref())
            .execute(self.db.inner_ref())
            .await
            .map_err(map_write_error)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "parking slot ({}) was not found",
                event.slot_id
            )));
        }

        tracing::warn!(
            slot.id = %event.slot_id,
            status = event.status.as_ref(),
            "slot status overridden outside a booking"
        );

        Ok(())
    }
}
