use super::{notification::insert_notification, reservation::fetch_reservation};
use crate::database::{map_write_error, model::penalty::PenaltyRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{PenaltyId, ReservationId},
    penalty::{
        event::{CreatePenalty, UpdatePenaltyStatus},
        Penalty, PenaltyStatus,
    },
    tariff::Tariff,
};
use kernel::repository::penalty::PenaltyRepository;
use shared::error::{AppError, AppResult};

const PENALTY_COLUMNS: &str =
    "penalty_id, reservation_id, user_id, actual_exit_time, amount, status, created_at";

#[derive(new)]
pub struct PenaltyRepositoryImpl {
    db: ConnectionPool,
    tariff: Tariff,
}

#[async_trait]
impl PenaltyRepository for PenaltyRepositoryImpl {
    async fn create(&self, event: CreatePenalty) -> AppResult<Penalty> {
        let mut tx = self.db.begin().await?;

        let reservation = fetch_reservation(&mut tx, event.reservation_id).await?;
        let end_time = reservation.window.end();
        if event.actual_exit_time <= end_time {
            return Err(AppError::InvalidRequest(format!(
                "exit at {} is not after the reservation end {}",
                event.actual_exit_time, end_time
            )));
        }

        // 金額の指定が無ければ超過時間から算出する
        let amount = event
            .amount
            .unwrap_or_else(|| self.tariff.overstay_fee(end_time, event.actual_exit_time));

        let row: PenaltyRow = sqlx::query_as(&format!(
            r#"
                INSERT INTO penalties
                (penalty_id, reservation_id, user_id, actual_exit_time, amount, status)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {PENALTY_COLUMNS}
            "#
        ))
        .bind(PenaltyId::new())
        .bind(reservation.reservation_id)
        .bind(reservation.user_id)
        .bind(event.actual_exit_time)
        .bind(amount)
        .bind(PenaltyStatus::Unpaid.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        insert_notification(
            &mut tx,
            reservation.user_id,
            Some(reservation.reservation_id),
            format!(
                "An overstay penalty of {} was recorded for slot {}.",
                amount, reservation.slot.slot_number
            ),
        )
        .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        tracing::info!(
            reservation.id = %reservation.reservation_id,
            amount = %amount,
            "penalty recorded"
        );

        Penalty::try_from(row)
    }

    async fn update_status(&self, event: UpdatePenaltyStatus) -> AppResult<Penalty> {
        let mut tx = self.db.begin().await?;

        let current: Penalty = sqlx::query_as::<_, PenaltyRow>(&format!(
            "SELECT {PENALTY_COLUMNS} FROM penalties WHERE penalty_id = $1 FOR UPDATE"
        ))
        .bind(event.penalty_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("penalty ({}) was not found", event.penalty_id))
        })
        .and_then(Penalty::try_from)?;

        let status = current.status.transition_to(event.status)?;

        let row: PenaltyRow = sqlx::query_as(&format!(
            r#"
                UPDATE penalties SET status = $2
                WHERE penalty_id = $1
                RETURNING {PENALTY_COLUMNS}
            "#
        ))
        .bind(event.penalty_id)
        .bind(status.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Penalty::try_from(row)
    }

    async fn find_by_id(&self, penalty_id: PenaltyId) -> AppResult<Option<Penalty>> {
        sqlx::query_as::<_, PenaltyRow>(&format!(
            "SELECT {PENALTY_COLUMNS} FROM penalties WHERE penalty_id = $1"
        ))
        .bind(penalty_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Penalty::try_from)
        .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Penalty>> {
        sqlx::query_as::<_, PenaltyRow>(&format!(
            "SELECT {PENALTY_COLUMNS} FROM penalties ORDER BY created_at ASC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Penalty::try_from)
        .collect()
    }

    async fn find_by_reservation_id(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Vec<Penalty>> {
        sqlx::query_as::<_, PenaltyRow>(&format!(
            r#"
                SELECT {PENALTY_COLUMNS} FROM penalties
                WHERE reservation_id = $1
                ORDER BY created_at ASC
            "#
        ))
        .bind(reservation_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Penalty::try_from)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        fixture, payment::PaymentRepositoryImpl, reservation::ReservationRepositoryImpl,
    };
    use kernel::model::{
        payment::{
            event::{CreatePayment, UpdatePaymentStatus},
            PaymentMethod, PaymentStatus,
        },
        reservation::{event::CreateReservation, BookingType},
    };
    use kernel::repository::{payment::PaymentRepository, reservation::ReservationRepository};
    use rust_decimal::Decimal;

    #[sqlx::test]
    async fn overstay_is_priced_and_settled_by_a_verified_payment(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0501").await?;
        let slot_id = fixture::slot(&db, "E-01").await?;
        let reservation = ReservationRepositoryImpl::new(db.clone(), Tariff::default())
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(10, 12),
                BookingType::Hourly,
                None,
            ))
            .await?;
        let repo = PenaltyRepositoryImpl::new(db.clone(), Tariff::default());

        // 終了前の退出はペナルティにならない
        let res = repo
            .create(CreatePenalty::new(
                reservation.reservation_id,
                fixture::at(11),
                None,
            ))
            .await;
        assert!(matches!(res, Err(AppError::InvalidRequest(_))));

        // 1 時間 30 分の超過は 2 時間分として課金される
        let penalty = repo
            .create(CreatePenalty::new(
                reservation.reservation_id,
                fixture::at(13) + chrono::Duration::minutes(30),
                None,
            ))
            .await?;
        assert_eq!(penalty.amount, Decimal::from(200));
        assert_eq!(penalty.status, PenaltyStatus::Unpaid);
        assert_eq!(penalty.user_id, user_id);

        let payments = PaymentRepositoryImpl::new(db.clone());
        let payment = payments
            .create(CreatePayment::new(
                reservation.reservation_id,
                Some(penalty.penalty_id),
                penalty.amount,
                PaymentMethod::BankTransfer,
                None,
            ))
            .await?;
        payments
            .update_status(UpdatePaymentStatus::new(
                payment.payment_id,
                PaymentStatus::Verified,
            ))
            .await?;

        let settled = repo.find_by_id(penalty.penalty_id).await?.unwrap();
        assert_eq!(settled.status, PenaltyStatus::Paid);

        let res = repo
            .update_status(UpdatePenaltyStatus::new(
                penalty.penalty_id,
                PenaltyStatus::Unpaid,
            ))
            .await;
        assert!(matches!(res, Err(AppError::Conflict(_))));
        Ok(())
    }
}
