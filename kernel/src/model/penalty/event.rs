use super::PenaltyStatus;
use crate::model::id::{PenaltyId, ReservationId};
use chrono::{DateTime, Utc};
use derive_new::new;
use rust_decimal::Decimal;

#[derive(new, Debug)]
pub struct CreatePenalty {
    pub reservation_id: ReservationId,
    pub actual_exit_time: DateTime<Utc>,
    // None の場合は超過時間から算出する
    pub amount: Option<Decimal>,
}

#[derive(new, Debug)]
pub struct UpdatePenaltyStatus {
    pub penalty_id: PenaltyId,
    pub status: PenaltyStatus,
}
