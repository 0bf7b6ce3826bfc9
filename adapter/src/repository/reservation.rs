use super::{notification::insert_notification, Tx};
use crate::database::{
    map_commit_error, map_write_error,
    model::{
        reservation::{ActiveWindowRow, DependentCountRow, ReservationRow, RESERVATION_COLUMNS},
        slot::LockedSlotRow,
    },
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{ReservationId, SlotId, UserId},
    reservation::{
        event::{CreateReservation, DeleteReservation, UpdateReservation},
        find_overlap, Reservation, ReservationStatus, ReservationWindow,
    },
    slot::SlotStatus,
    tariff::Tariff,
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
    tariff: Tariff,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        // 料金は書き込み前に確定させる
        let total_price = self.tariff.price(event.booking_type, &event.window);
        self.tariff
            .ensure_quote_matches(event.quoted_total_price, total_price)?;

        let mut tx = self.db.begin().await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定のユーザーが存在するか
        // - 指定のスロットが存在するか（存在すれば行ロックを取る）
        // - その時間帯に有効な予約が無いか
        {
            let user_exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                    .bind(event.user_id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_write_error)?;
            if !user_exists {
                return Err(AppError::EntityNotFound(format!(
                    "user ({}) was not found",
                    event.user_id
                )));
            }
        }
        let slot = lock_slot(&mut tx, event.slot_id).await?;
        ensure_slot_free(&mut tx, event.slot_id, &event.window, None).await?;

        let reservation_id = ReservationId::new();
        let row: ReservationRow = sqlx::query_as(&format!(
            r#"
                INSERT INTO reservations
                (reservation_id, user_id, slot_id, slot_number, floor,
                start_time, end_time, booking_type, total_price, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(reservation_id)
        .bind(event.user_id)
        .bind(slot.slot_id)
        .bind(&slot.slot_number)
        .bind(slot.floor)
        .bind(event.window.start())
        .bind(event.window.end())
        .bind(event.booking_type.as_ref())
        .bind(total_price)
        .bind(ReservationStatus::Pending.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        // 予約した時点でスロットは reserved とする
        set_slot_status(&mut tx, slot.slot_id, SlotStatus::Reserved).await?;

        insert_notification(
            &mut tx,
            event.user_id,
            Some(reservation_id),
            format!(
                "Slot {} is reserved from {} to {}. Total {}. Awaiting payment.",
                slot.slot_number,
                event.window.start(),
                event.window.end(),
                total_price
            ),
        )
        .await?;

        tx.commit().await.map_err(map_commit_error)?;

        tracing::info!(
            reservation.id = %reservation_id,
            slot.id = %slot.slot_id,
            user.id = %event.user_id,
            total_price = %total_price,
            "reservation created"
        );

        Reservation::try_from(row)
    }

    async fn update(&self, event: UpdateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        // ロックの順序を揃えるため、スロット -> 予約の順に扱う
        let slot_id = fetch_reservation(&mut tx, event.reservation_id)
            .await?
            .slot
            .slot_id;
        lock_slot(&mut tx, slot_id).await?;
        // ロック取得後の状態で判定する
        let current = fetch_reservation(&mut tx, event.reservation_id).await?;

        if current.status == ReservationStatus::Completed {
            return Err(AppError::Conflict(format!(
                "reservation ({}) is already completed",
                current.reservation_id
            )));
        }

        let status = match event.status {
            Some(next) => current.status.transition_to(next)?,
            None => current.status,
        };
        let window = ReservationWindow::new(
            event.start_time.unwrap_or(current.window.start()),
            event.end_time.unwrap_or(current.window.end()),
        )?;
        let booking_type = event.booking_type.unwrap_or(current.booking_type);

        // 自分自身を除いた有効な予約と重ならないか確認する
        if window != current.window {
            ensure_slot_free(&mut tx, slot_id, &window, Some(current.reservation_id)).await?;
        }
        let total_price = if window != current.window || booking_type != current.booking_type {
            self.tariff.price(booking_type, &window)
        } else {
            current.total_price
        };

        let row: ReservationRow = sqlx::query_as(&format!(
            r#"
                UPDATE reservations
                SET start_time = $2, end_time = $3, booking_type = $4,
                    total_price = $5, status = $6
                WHERE reservation_id = $1
                RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(current.reservation_id)
        .bind(window.start())
        .bind(window.end())
        .bind(booking_type.as_ref())
        .bind(total_price)
        .bind(status.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if status != current.status {
            if status == ReservationStatus::Completed {
                release_slot_if_idle(&mut tx, slot_id).await?;
            }
            insert_notification(
                &mut tx,
                current.user_id,
                Some(current.reservation_id),
                format!(
                    "Reservation for slot {} is now {}.",
                    current.slot.slot_number,
                    status.as_ref()
                ),
            )
            .await?;
        }

        tx.commit().await.map_err(map_commit_error)?;

        tracing::info!(
            reservation.id = %current.reservation_id,
            from = current.status.as_ref(),
            to = status.as_ref(),
            "reservation updated"
        );

        Reservation::try_from(row)
    }

    async fn delete(&self, event: DeleteReservation) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let slot_id = fetch_reservation(&mut tx, event.reservation_id)
            .await?
            .slot
            .slot_id;
        lock_slot(&mut tx, slot_id).await?;
        let current = fetch_reservation(&mut tx, event.reservation_id).await?;

        // 依存する記録が残っている場合は削除しない（自動カスケードはしない）
        let dependents: DependentCountRow = sqlx::query_as(
            r#"
                SELECT
                (SELECT COUNT(*) FROM payments WHERE reservation_id = $1) AS payments,
                (SELECT COUNT(*) FROM penalties WHERE reservation_id = $1) AS penalties,
                (SELECT COUNT(*) FROM extensions WHERE reservation_id = $1) AS extensions,
                (SELECT COUNT(*) FROM barrier_actions WHERE reservation_id = $1) AS barrier_actions
            "#,
        )
        .bind(event.reservation_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if dependents.has_dependents() {
            return Err(AppError::Conflict(format!(
                "reservation ({}) still has payments, penalties, extensions or barrier actions",
                event.reservation_id
            )));
        }

        let res = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(event.reservation_id)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;
        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been deleted".into(),
            ));
        }

        release_slot_if_idle(&mut tx, current.slot.slot_id).await?;

        tx.commit().await.map_err(map_commit_error)?;

        tracing::info!(reservation.id = %event.reservation_id, "reservation deleted");

        Ok(())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1"
        ))
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Reservation::try_from)
        .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations ORDER BY created_at ASC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Reservation::try_from)
        .collect()
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS} FROM reservations
                WHERE user_id = $1
                ORDER BY start_time ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Reservation::try_from)
        .collect()
    }

    async fn find_by_slot_id(&self, slot_id: SlotId) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS} FROM reservations
                WHERE slot_id = $1
                ORDER BY start_time ASC
            "#
        ))
        .bind(slot_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Reservation::try_from)
        .collect()
    }
}

pub(crate) async fn fetch_reservation(
    tx: &mut Tx<'_>,
    reservation_id: ReservationId,
) -> AppResult<Reservation> {
    let row: Option<ReservationRow> = sqlx::query_as(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1"
    ))
    .bind(reservation_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_write_error)?;

    match row {
        Some(row) => Reservation::try_from(row),
        None => Err(AppError::EntityNotFound(format!(
            "reservation ({reservation_id}) was not found"
        ))),
    }
}

// 同じスロットへの書き込みはこの行ロックで直列化される
pub(crate) async fn lock_slot(tx: &mut Tx<'_>, slot_id: SlotId) -> AppResult<LockedSlotRow> {
    sqlx::query_as::<_, LockedSlotRow>(
        r#"
            SELECT slot_id, slot_number, floor
            FROM parking_slots
            WHERE slot_id = $1
            FOR UPDATE
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(map_write_error)?
    .ok_or_else(|| AppError::EntityNotFound(format!("parking slot ({slot_id}) was not found")))
}

pub(crate) async fn ensure_slot_free(
    tx: &mut Tx<'_>,
    slot_id: SlotId,
    window: &ReservationWindow,
    exclude: Option<ReservationId>,
) -> AppResult<()> {
    let existing = sqlx::query_as::<_, ActiveWindowRow>(
        r#"
            SELECT reservation_id, start_time, end_time
            FROM reservations
            WHERE slot_id = $1
              AND status IN ('pending', 'confirmed')
              AND ($2::uuid IS NULL OR reservation_id <> $2)
        "#,
    )
    .bind(slot_id)
    .bind(exclude)
    .fetch_all(&mut **tx)
    .await
    .map_err(map_write_error)?
    .into_iter()
    .map(<(ReservationId, ReservationWindow)>::try_from)
    .collect::<AppResult<Vec<_>>>()?;

    if let Some(conflicting) = find_overlap(window, &existing) {
        tracing::warn!(
            slot.id = %slot_id,
            conflicting.id = %conflicting,
            "requested window overlaps an active reservation"
        );
        return Err(AppError::Conflict(
            "slot already reserved for that window".into(),
        ));
    }
    Ok(())
}

pub(crate) async fn set_slot_status(
    tx: &mut Tx<'_>,
    slot_id: SlotId,
    status: SlotStatus,
) -> AppResult<()> {
    sqlx::query("UPDATE parking_slots SET status = $2 WHERE slot_id = $1")
        .bind(slot_id)
        .bind(status.as_ref())
        .execute(&mut **tx)
        .await
        .map_err(map_write_error)?;
    Ok(())
}

// 他に有効な予約が残っていなければスロットを available に戻す
pub(crate) async fn release_slot_if_idle(tx: &mut Tx<'_>, slot_id: SlotId) -> AppResult<()> {
    sqlx::query(
        r#"
            UPDATE parking_slots SET status = 'available'
            WHERE slot_id = $1
              AND NOT EXISTS (
                SELECT 1 FROM reservations
                WHERE slot_id = $1 AND status IN ('pending', 'confirmed')
              )
        "#,
    )
    .bind(slot_id)
    .execute(&mut **tx)
    .await
    .map_err(map_write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixture;
    use kernel::model::reservation::BookingType;
    use kernel::repository::slot::SlotRepository;
    use rust_decimal::Decimal;

    fn repo(db: &ConnectionPool) -> ReservationRepositoryImpl {
        ReservationRepositoryImpl::new(db.clone(), Tariff::default())
    }

    #[sqlx::test]
    async fn create_reserves_the_slot_and_prices_the_window(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0001").await?;
        let slot_id = fixture::slot(&db, "A-01").await?;

        let reservation = repo(&db)
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(10, 13),
                BookingType::Hourly,
                Some(Decimal::from(150)),
            ))
            .await?;

        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.total_price, Decimal::from(150));
        assert_eq!(reservation.slot.slot_number, "A-01");

        let slot = crate::repository::slot::SlotRepositoryImpl::new(db.clone())
            .find_by_id(slot_id)
            .await?
            .unwrap();
        assert_eq!(slot.status, SlotStatus::Reserved);
        Ok(())
    }

    #[sqlx::test]
    async fn overlapping_windows_are_rejected(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0002").await?;
        let slot_id = fixture::slot(&db, "A-02").await?;
        let repo = repo(&db);

        repo.create(CreateReservation::new(
            user_id,
            slot_id,
            fixture::window(10, 12),
            BookingType::Hourly,
            None,
        ))
        .await?;

        let res = repo
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(11, 13),
                BookingType::Hourly,
                None,
            ))
            .await;
        assert!(matches!(res, Err(AppError::Conflict(_))));

        // 終了時刻ちょうどに始まる予約は重ならない
        repo.create(CreateReservation::new(
            user_id,
            slot_id,
            fixture::window(12, 14),
            BookingType::Hourly,
            None,
        ))
        .await?;

        assert_eq!(repo.find_by_slot_id(slot_id).await?.len(), 2);
        Ok(())
    }

    #[sqlx::test]
    async fn concurrent_bookings_of_one_window_have_a_single_winner(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let first_user = fixture::user(&db, "0003").await?;
        let second_user = fixture::user(&db, "0004").await?;
        let slot_id = fixture::slot(&db, "A-03").await?;
        let repo = repo(&db);

        let (a, b) = tokio::join!(
            repo.create(CreateReservation::new(
                first_user,
                slot_id,
                fixture::window(9, 11),
                BookingType::Hourly,
                None,
            )),
            repo.create(CreateReservation::new(
                second_user,
                slot_id,
                fixture::window(10, 12),
                BookingType::Hourly,
                None,
            )),
        );

        let results = [a, b];
        let won = results.iter().filter(|r| r.is_ok()).count();
        let conflicted = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::Conflict(_))))
            .count();
        assert_eq!(won, 1);
        assert_eq!(conflicted, 1);
        assert_eq!(repo.find_by_slot_id(slot_id).await?.len(), 1);
        Ok(())
    }

    #[sqlx::test]
    async fn concurrent_bookings_of_disjoint_windows_both_succeed(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let first_user = fixture::user(&db, "0010").await?;
        let second_user = fixture::user(&db, "0011").await?;
        let slot_id = fixture::slot(&db, "A-10").await?;
        let repo = repo(&db);

        // 同じスロットの重ならない時間帯は、何度競合させても両方成功する
        for round in 0..5u32 {
            let base = round * 10;
            let (a, b) = tokio::join!(
                repo.create(CreateReservation::new(
                    first_user,
                    slot_id,
                    fixture::window(base, base + 1),
                    BookingType::Hourly,
                    None,
                )),
                repo.create(CreateReservation::new(
                    second_user,
                    slot_id,
                    fixture::window(base + 5, base + 6),
                    BookingType::Hourly,
                    None,
                )),
            );
            assert!(a.is_ok(), "round {round}: {a:?}");
            assert!(b.is_ok(), "round {round}: {b:?}");
        }

        assert_eq!(repo.find_by_slot_id(slot_id).await?.len(), 10);
        Ok(())
    }

    #[sqlx::test]
    async fn random_windows_conflict_exactly_when_they_overlap(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        use rand::Rng;

        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0012").await?;
        let repo = repo(&db);
        let booked = fixture::window(10, 12);
        let candidates: Vec<(u32, u32)> = {
            let mut rng = rand::thread_rng();
            (0..20)
                .map(|_| {
                    let start = rng.gen_range(6..16u32);
                    (start, rng.gen_range(start + 1..=17))
                })
                .collect()
        };

        for (round, (start, end)) in candidates.into_iter().enumerate() {
            let slot_id = fixture::slot(&db, &format!("R-{round:02}")).await?;
            repo.create(CreateReservation::new(
                user_id,
                slot_id,
                booked,
                BookingType::Hourly,
                None,
            ))
            .await?;

            let candidate = fixture::window(start, end);
            let res = repo
                .create(CreateReservation::new(
                    user_id,
                    slot_id,
                    candidate,
                    BookingType::Hourly,
                    None,
                ))
                .await;

            if candidate.overlaps(&booked) {
                assert!(
                    matches!(res, Err(AppError::Conflict(_))),
                    "[{start}, {end}) should conflict: {res:?}"
                );
            } else {
                assert!(res.is_ok(), "[{start}, {end}) should be accepted: {res:?}");
            }
        }
        Ok(())
    }

    #[sqlx::test]
    async fn unknown_slot_is_not_found_and_writes_nothing(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0005").await?;
        let repo = repo(&db);

        let res = repo
            .create(CreateReservation::new(
                user_id,
                SlotId::new(),
                fixture::window(10, 12),
                BookingType::Hourly,
                None,
            ))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        assert!(repo.find_all().await?.is_empty());
        Ok(())
    }

    #[sqlx::test]
    async fn status_only_moves_forward_and_completion_frees_the_slot(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0006").await?;
        let slot_id = fixture::slot(&db, "A-04").await?;
        let repo = repo(&db);

        let created = repo
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(10, 12),
                BookingType::Hourly,
                None,
            ))
            .await?;
        let id = created.reservation_id;

        let skipped = repo
            .update(UpdateReservation::new(
                id,
                None,
                None,
                None,
                Some(ReservationStatus::Completed),
            ))
            .await;
        assert!(matches!(skipped, Err(AppError::Conflict(_))));

        let confirmed = repo
            .update(UpdateReservation::new(
                id,
                None,
                None,
                None,
                Some(ReservationStatus::Confirmed),
            ))
            .await?;
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);

        let completed = repo
            .update(UpdateReservation::new(
                id,
                None,
                None,
                None,
                Some(ReservationStatus::Completed),
            ))
            .await?;
        assert_eq!(completed.status, ReservationStatus::Completed);

        let slot = crate::repository::slot::SlotRepositoryImpl::new(db.clone())
            .find_by_id(slot_id)
            .await?
            .unwrap();
        assert_eq!(slot.status, SlotStatus::Available);

        // 完了した予約の時間帯は再び予約できる
        repo.create(CreateReservation::new(
            user_id,
            slot_id,
            fixture::window(10, 12),
            BookingType::Hourly,
            None,
        ))
        .await?;
        Ok(())
    }

    #[sqlx::test]
    async fn delete_is_refused_while_dependents_exist(pool: sqlx::PgPool) -> anyhow::Result<()> {
        use crate::repository::barrier::BarrierRepositoryImpl;
        use kernel::model::barrier::{event::CreateBarrierAction, GateAction};
        use kernel::repository::barrier::BarrierRepository;

        let db = ConnectionPool::new(pool);
        let user_id = fixture::user(&db, "0007").await?;
        let slot_id = fixture::slot(&db, "A-05").await?;
        let repo = repo(&db);

        let free = repo
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(8, 9),
                BookingType::Hourly,
                None,
            ))
            .await?;
        let guarded = repo
            .create(CreateReservation::new(
                user_id,
                slot_id,
                fixture::window(10, 12),
                BookingType::Hourly,
                None,
            ))
            .await?;

        BarrierRepositoryImpl::new(db.clone())
            .create(CreateBarrierAction::new(
                guarded.reservation_id,
                GateAction::Open,
            ))
            .await?;

        let res = repo
            .delete(DeleteReservation::new(guarded.reservation_id))
            .await;
        assert!(matches!(res, Err(AppError::Conflict(_))));
        assert!(repo.find_by_id(guarded.reservation_id).await?.is_some());

        repo.delete(DeleteReservation::new(free.reservation_id))
            .await?;
        assert!(repo.find_by_id(free.reservation_id).await?.is_none());

        let res = repo
            .delete(DeleteReservation::new(free.reservation_id))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }
}
