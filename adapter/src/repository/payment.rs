use super::{notification::insert_notification, reservation::fetch_reservation};
use crate::database::{map_commit_error, map_write_error, model::payment::PaymentRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{PaymentId, ReservationId},
    payment::{
        event::{CreatePayment, UpdatePaymentStatus},
        Payment, PaymentStatus,
    },
    penalty::PenaltyStatus,
    reservation::ReservationStatus,
};
use kernel::repository::payment::PaymentRepository;
use shared::error::{AppError, AppResult};

const PAYMENT_COLUMNS: &str = r#"
    payment_id,
    reservation_id,
    penalty_id,
    amount,
    payment_method,
    payment_status,
    proof_of_payment,
    created_at
"#;

#[derive(new)]
pub struct PaymentRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl PaymentRepository for PaymentRepositoryImpl {
    async fn create(&self, event: CreatePayment) -> AppResult<Payment> {
        let mut tx = self.db.begin().await?;

        let reservation = fetch_reservation(&mut tx, event.reservation_id).await?;

        // ペナルティの支払いであれば、同じ予約のペナルティであることを確認する
        if let Some(penalty_id) = event.penalty_id {
            let owner: Option<ReservationId> =
                sqlx::query_scalar("SELECT reservation_id FROM penalties WHERE penalty_id = $1")
                    .bind(penalty_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;
            match owner {
                None => {
                    return Err(AppError::EntityNotFound(format!(
                        "penalty ({penalty_id}) was not found"
                    )))
                }
                Some(owner) if owner != reservation.reservation_id => {
                    return Err(AppError::InvalidRequest(format!(
                        "penalty ({penalty_id}) belongs to another reservation"
                    )))
                }
                Some(_) => {}
            }
        }

        let row: PaymentRow = sqlx::query_as(&format!(
            r#"
                INSERT INTO payments
                (payment_id, reservation_id, penalty_id, amount,
                payment_method, payment_status, proof_of_payment)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(PaymentId::new())
        .bind(event.reservation_id)
        .bind(event.penalty_id)
        .bind(event.amount)
        .bind(event.method.as_ref())
        .bind(PaymentStatus::Pending.as_ref())
        .bind(event.proof_of_payment)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Payment::try_from(row)
    }

    async fn update_status(&self, event: UpdatePaymentStatus) -> AppResult<Payment> {
        let mut tx = self.db.begin().await?;

        let current: Payment = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = $1 FOR UPDATE"
        ))
        .bind(event.payment_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("payment ({}) was not found", event.payment_id))
        })
        .and_then(Payment::try_from)?;

        let status = current.status.transition_to(event.status)?;

        let row: PaymentRow = sqlx::query_as(&format!(
            r#"
                UPDATE payments SET payment_status = $2
                WHERE payment_id = $1
                RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(event.payment_id)
        .bind(status.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        // 支払いが確認されたら、予約の確定とペナルティの支払い済み化を同じトランザクションで行う
        if status == PaymentStatus::Verified {
            let reservation = fetch_reservation(&mut tx, current.reservation_id).await?;
            if reservation.status == ReservationStatus::Pending {
                sqlx::query(
                    "UPDATE reservations SET status = $2 WHERE reservation_id = $1 AND status = $3",
                )
                .bind(reservation.reservation_id)
                .bind(ReservationStatus::Confirmed.as_ref())
                .bind(ReservationStatus::Pending.as_ref())
                .execute(&mut *tx)
                .await
                .map_err(map_write_error)?;
            }
            if let Some(penalty_id) = current.penalty_id {
                sqlx::query("UPDATE penalties SET status = $2 WHERE penalty_id = $1 AND status = $3")
                    .bind(penalty_id)
                    .bind(PenaltyStatus::Paid.as_ref())
                    .bind(PenaltyStatus::Unpaid.as_ref())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_write_error)?;
            }
            insert_notification(
                &mut tx,
                reservation.user_id,
                Some(reservation.reservation_id),
                format!(
                    "Payment of {} for slot {} was verified.",
                    current.amount, reservation.slot.slot_number
                ),
            )
            .await?;
        }

        tx.commit().await.map_err(map_commit_error)?;

        tracing::info!(
            payment.id = %event.payment_id,
            reservation.id = %current.reservation_id,
            status = status.as_ref(),
            "payment status updated"
        );

        Payment::try_from(row)
    }

    async fn find_by_id(&self, payment_id: PaymentId) -> AppResult<Option<Payment>> {
        sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = $1"
        ))
        .bind(payment_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Payment::try_from)
        .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Payment>> {
        sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY created_at ASC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Payment::try_from)
        .collect()
    }

    async fn find_by_reservation_id(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Vec<Payment>> {
        sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
                SELECT {PAYMENT_COLUMNS} FROM payments
                WHERE reservation_id = $1
                ORDER BY created_at ASC
            "#
        ))
        .bind(reservation_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Payment::try_from)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{fixture, reservation::ReservationRepositoryImpl};
    use kernel::model::{
        payment::PaymentMethod,
        reservation::{event::CreateReservation, BookingType},
        tariff::Tariff,
    };
    use kernel::repository::reservation::ReservationRepository;
    use rust_decimal::Decimal;

    #[sqlx::test]
    async fn verifying_a_payment_confirms_the_reservation(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0101").await?;
        let slot_id = fixture::slot(&db, "B-01").await?;
        let reservations = ReservationRepositoryImpl::new(db.clone(), Tariff::default());
        let reservation = reservations
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(10, 12),
                BookingType::Hourly,
                None,
            ))
            .await?;

        let repo = PaymentRepositoryImpl::new(db.clone());
        let payment = repo
            .create(CreatePayment::new(
                reservation.reservation_id,
                None,
                Decimal::from(100),
                PaymentMethod::QrCode,
                Some("receipt-001.png".into()),
            ))
            .await?;
        assert_eq!(payment.status, PaymentStatus::Pending);

        let verified = repo
            .update_status(UpdatePaymentStatus::new(
                payment.payment_id,
                PaymentStatus::Verified,
            ))
            .await?;
        assert_eq!(verified.status, PaymentStatus::Verified);

        let reservation = reservations
            .find_by_id(reservation.reservation_id)
            .await?
            .unwrap();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);

        // 確認済みの支払いを失敗に戻すことはできない
        let res = repo
            .update_status(UpdatePaymentStatus::new(
                payment.payment_id,
                PaymentStatus::Failed,
            ))
            .await;
        assert!(matches!(res, Err(AppError::Conflict(_))));
        Ok(())
    }

    #[sqlx::test]
    async fn payment_for_unknown_reservation_is_not_found(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = PaymentRepositoryImpl::new(ConnectionPool::new(pool));
        let res = repo
            .create(CreatePayment::new(
                ReservationId::new(),
                None,
                Decimal::from(100),
                PaymentMethod::BankTransfer,
                None,
            ))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        assert!(repo.find_all().await?.is_empty());
        Ok(())
    }
}
