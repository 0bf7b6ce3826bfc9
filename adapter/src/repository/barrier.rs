use crate::database::{model::barrier::BarrierActionRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    barrier::{event::CreateBarrierAction, BarrierAction},
    id::{BarrierActionId, ReservationId},
};
use kernel::repository::barrier::BarrierRepository;
use shared::error::{AppError, AppResult};

const BARRIER_ACTION_COLUMNS: &str =
    "action_id, sequence, reservation_id, user_id, slot_id, action, action_time";

#[derive(new)]
pub struct BarrierRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BarrierRepository for BarrierRepositoryImpl {
    async fn create(&self, event: CreateBarrierAction) -> AppResult<BarrierAction> {
        // 予約からユーザーとスロットを引き継いで記録する。予約が無ければ 0 行になる
        let row: Option<BarrierActionRow> = sqlx::query_as(&format!(
            r#"
                INSERT INTO barrier_actions (action_id, reservation_id, user_id, slot_id, action)
                SELECT $1, reservation_id, user_id, slot_id, $3
                FROM reservations
                WHERE reservation_id = $2
                RETURNING {BARRIER_ACTION_COLUMNS}
            "#
        ))
        .bind(BarrierActionId::new())
        .bind(event.reservation_id)
        .bind(event.action.as_ref())
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound(format!(
                "reservation ({}) was not found",
                event.reservation_id
            )));
        };

        tracing::info!(
            reservation.id = %event.reservation_id,
            action = event.action.as_ref(),
            "barrier action recorded"
        );

        BarrierAction::try_from(row)
    }

    async fn find_all(&self) -> AppResult<Vec<BarrierAction>> {
        sqlx::query_as::<_, BarrierActionRow>(&format!(
            "SELECT {BARRIER_ACTION_COLUMNS} FROM barrier_actions ORDER BY sequence ASC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(BarrierAction::try_from)
        .collect()
    }

    async fn find_by_reservation_id(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Vec<BarrierAction>> {
        sqlx::query_as::<_, BarrierActionRow>(&format!(
            r#"
                SELECT {BARRIER_ACTION_COLUMNS} FROM barrier_actions
                WHERE reservation_id = $1
                ORDER BY sequence ASC
            "#
        ))
        .bind(reservation_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(BarrierAction::try_from)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{fixture, reservation::ReservationRepositoryImpl};
    use kernel::model::{
        barrier::GateAction,
        reservation::{event::CreateReservation, BookingType},
        tariff::Tariff,
    };
    use kernel::repository::reservation::ReservationRepository;

    #[sqlx::test]
    async fn actions_are_listed_in_the_order_they_were_recorded(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0301").await?;
        let slot_id = fixture::slot(&db, "D-01").await?;
        let reservation = ReservationRepositoryImpl::new(db.clone(), Tariff::default())
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(10, 12),
                BookingType::Hourly,
                None,
            ))
            .await?;

        let repo = BarrierRepositoryImpl::new(db.clone());
        let actions = [
            GateAction::Open,
            GateAction::Close,
            GateAction::Open,
            GateAction::Close,
        ];
        for action in actions {
            repo.create(CreateBarrierAction::new(reservation.reservation_id, action))
                .await?;
        }

        let recorded = repo.find_by_reservation_id(reservation.reservation_id).await?;
        assert_eq!(
            recorded.iter().map(|a| a.action).collect::<Vec<_>>(),
            actions.to_vec()
        );
        assert!(recorded.windows(2).all(|w| w[0].sequence < w[1].sequence));
        assert!(recorded
            .iter()
            .all(|a| a.user_id == user_id && a.slot_id == slot_id));

        let res = repo
            .create(CreateBarrierAction::new(
                ReservationId::new(),
                GateAction::Open,
            ))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        assert_eq!(repo.find_all().await?.len(), actions.len());
        Ok(())
    }

    #[sqlx::test]
    async fn recorded_actions_cannot_be_rewritten_or_removed(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0302").await?;
        let slot_id = fixture::slot(&db, "D-02").await?;
        let reservation = ReservationRepositoryImpl::new(db.clone(), Tariff::default())
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(10, 12),
                BookingType::Hourly,
                None,
            ))
            .await?;
        let repo = BarrierRepositoryImpl::new(db.clone());
        repo.create(CreateBarrierAction::new(
            reservation.reservation_id,
            GateAction::Open,
        ))
        .await?;

        let updated = sqlx::query("UPDATE barrier_actions SET action = 'close'")
            .execute(db.inner_ref())
            .await;
        assert!(updated.is_err());

        let deleted = sqlx::query("DELETE FROM barrier_actions")
            .execute(db.inner_ref())
            .await;
        assert!(deleted.is_err());

        let recorded = repo.find_by_reservation_id(reservation.reservation_id).await?;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].action, GateAction::Open);
        Ok(())
    }
}
