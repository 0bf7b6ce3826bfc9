use super::parse_column;
use kernel::model::{
    id::{PenaltyId, ReservationId, UserId},
    penalty::Penalty,
};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct PenaltyRow {
    pub penalty_id: PenaltyId,
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub actual_exit_time: DateTime<Utc>,
    pub amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PenaltyRow> for Penalty {
    type Error = AppError;

    fn try_from(value: PenaltyRow) -> AppResult<Self> {
        let PenaltyRow {
            penalty_id,
            reservation_id,
            user_id,
            actual_exit_time,
            amount,
            status,
            created_at,
        } = value;
        Ok(Penalty {
            penalty_id,
            reservation_id,
            user_id,
            actual_exit_time,
            amount,
            status: parse_column("status", &status)?,
            created_at,
        })
    }
}
