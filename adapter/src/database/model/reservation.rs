use super::parse_column;
use kernel::model::{
    id::{ReservationId, SlotId, UserId},
    reservation::{Reservation, ReservationSlot, ReservationWindow},
};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};
use sqlx::types::chrono::{DateTime, Utc};

pub(crate) const RESERVATION_COLUMNS: &str = r#"
    reservation_id,
    user_id,
    slot_id,
    slot_number,
    floor,
    start_time,
    end_time,
    booking_type,
    total_price,
    status,
    created_at
"#;

#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub slot_id: SlotId,
    pub slot_number: String,
    pub floor: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_type: String,
    pub total_price: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> AppResult<Self> {
        let ReservationRow {
            reservation_id,
            user_id,
            slot_id,
            slot_number,
            floor,
            start_time,
            end_time,
            booking_type,
            total_price,
            status,
            created_at,
        } = value;
        Ok(Reservation {
            reservation_id,
            user_id,
            slot: ReservationSlot {
                slot_id,
                slot_number,
                floor,
            },
            // テーブルの CHECK 制約で start_time < end_time は保証されている
            window: ReservationWindow::new(start_time, end_time)
                .map_err(|e| AppError::ConversionEntityError(e.to_string()))?,
            booking_type: parse_column("booking_type", &booking_type)?,
            total_price,
            status: parse_column("status", &status)?,
            created_at,
        })
    }
}

// 重複チェックに使う、同じスロットの有効な予約の時間帯
#[derive(sqlx::FromRow)]
pub struct ActiveWindowRow {
    pub reservation_id: ReservationId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl TryFrom<ActiveWindowRow> for (ReservationId, ReservationWindow) {
    type Error = AppError;

    fn try_from(value: ActiveWindowRow) -> AppResult<Self> {
        let window = ReservationWindow::new(value.start_time, value.end_time)
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
        Ok((value.reservation_id, window))
    }
}

// 削除可否の判定に使う、予約にぶら下がる記録の件数
#[derive(sqlx::FromRow)]
pub struct DependentCountRow {
    pub payments: i64,
    pub penalties: i64,
    pub extensions: i64,
    pub barrier_actions: i64,
}

impl DependentCountRow {
    pub fn has_dependents(&self) -> bool {
        self.payments + self.penalties + self.extensions + self.barrier_actions > 0
    }
}
