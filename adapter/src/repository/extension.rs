use super::{
    notification::insert_notification,
    reservation::{ensure_slot_free, fetch_reservation, lock_slot},
};
use crate::database::{
    map_commit_error, map_write_error, model::extension::ExtensionRow, ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    extension::{event::CreateExtension, Extension},
    id::{ExtensionId, ReservationId},
    reservation::ReservationStatus,
    tariff::Tariff,
};
use kernel::repository::extension::ExtensionRepository;
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};

const EXTENSION_COLUMNS: &str =
    "extension_id, reservation_id, previous_end_time, new_end_time, additional_fee, created_at";

#[derive(new)]
pub struct ExtensionRepositoryImpl {
    db: ConnectionPool,
    tariff: Tariff,
}

#[async_trait]
impl ExtensionRepository for ExtensionRepositoryImpl {
    async fn create(&self, event: CreateExtension) -> AppResult<Extension> {
        let mut tx = self.db.begin().await?;

        let slot_id = fetch_reservation(&mut tx, event.reservation_id)
            .await?
            .slot
            .slot_id;
        lock_slot(&mut tx, slot_id).await?;
        // ロック取得後の状態で判定する
        let reservation = fetch_reservation(&mut tx, event.reservation_id).await?;

        if reservation.status == ReservationStatus::Completed {
            return Err(AppError::Conflict(format!(
                "reservation ({}) is already completed",
                reservation.reservation_id
            )));
        }
        let previous_end_time = reservation.window.end();
        if event.new_end_time <= previous_end_time {
            return Err(AppError::InvalidRequest(format!(
                "new end time must be after the current end {previous_end_time}"
            )));
        }

        // 延長後の時間帯についても他の予約と重ならないか確認する
        let extended = reservation.window.with_end(event.new_end_time)?;
        ensure_slot_free(&mut tx, slot_id, &extended, Some(reservation.reservation_id)).await?;

        let new_total = self.tariff.price(reservation.booking_type, &extended);
        let additional_fee = (new_total - reservation.total_price).max(Decimal::ZERO);
        self.tariff
            .ensure_quote_matches(event.quoted_fee, additional_fee)?;

        sqlx::query(
            r#"
                UPDATE reservations
                SET end_time = $2, total_price = total_price + $3
                WHERE reservation_id = $1
            "#,
        )
        .bind(reservation.reservation_id)
        .bind(event.new_end_time)
        .bind(additional_fee)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let row: ExtensionRow = sqlx::query_as(&format!(
            r#"
                INSERT INTO extensions
                (extension_id, reservation_id, previous_end_time, new_end_time, additional_fee)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {EXTENSION_COLUMNS}
            "#
        ))
        .bind(ExtensionId::new())
        .bind(reservation.reservation_id)
        .bind(previous_end_time)
        .bind(event.new_end_time)
        .bind(additional_fee)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        insert_notification(
            &mut tx,
            reservation.user_id,
            Some(reservation.reservation_id),
            format!(
                "Reservation for slot {} was extended to {} for an additional {}.",
                reservation.slot.slot_number, event.new_end_time, additional_fee
            ),
        )
        .await?;

        tx.commit().await.map_err(map_commit_error)?;

        tracing::info!(
            reservation.id = %reservation.reservation_id,
            new_end_time = %event.new_end_time,
            additional_fee = %additional_fee,
            "reservation extended"
        );

        Ok(Extension::from(row))
    }

    async fn find_by_reservation_id(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Vec<Extension>> {
        sqlx::query_as::<_, ExtensionRow>(&format!(
            r#"
                SELECT {EXTENSION_COLUMNS} FROM extensions
                WHERE reservation_id = $1
                ORDER BY created_at ASC
            "#
        ))
        .bind(reservation_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Extension::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{fixture, reservation::ReservationRepositoryImpl};
    use kernel::model::reservation::{event::CreateReservation, BookingType};
    use kernel::repository::reservation::ReservationRepository;

    #[sqlx::test]
    async fn extension_moves_the_end_and_charges_the_difference(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0201").await?;
        let slot_id = fixture::slot(&db, "C-01").await?;
        let reservations = ReservationRepositoryImpl::new(db.clone(), Tariff::default());
        let first = reservations
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(10, 12),
                BookingType::Hourly,
                None,
            ))
            .await?;
        reservations
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(14, 16),
                BookingType::Hourly,
                None,
            ))
            .await?;

        let repo = ExtensionRepositoryImpl::new(db.clone(), Tariff::default());
        let extension = repo
            .create(CreateExtension::new(
                first.reservation_id,
                fixture::at(13),
                Some(Decimal::from(50)),
            ))
            .await?;
        assert_eq!(extension.previous_end_time, fixture::at(12));
        assert_eq!(extension.additional_fee, Decimal::from(50));

        let updated = reservations
            .find_by_id(first.reservation_id)
            .await?
            .unwrap();
        assert_eq!(updated.window.end(), fixture::at(13));
        assert_eq!(updated.total_price, Decimal::from(150));

        // 次の予約にかかる延長は拒否される
        let res = repo
            .create(CreateExtension::new(
                first.reservation_id,
                fixture::at(15),
                None,
            ))
            .await;
        assert!(matches!(res, Err(AppError::Conflict(_))));

        assert_eq!(
            repo.find_by_reservation_id(first.reservation_id)
                .await?
                .len(),
            1
        );
        Ok(())
    }
}
