use crate::model::id::{PenaltyId, ReservationId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, EnumString};

pub mod event;

#[derive(Debug)]
pub struct Penalty {
    pub penalty_id: PenaltyId,
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub actual_exit_time: DateTime<Utc>,
    pub amount: Decimal,
    pub status: PenaltyStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PenaltyStatus {
    Unpaid,
    Paid,
}

impl PenaltyStatus {
    pub fn transition_to(self, next: PenaltyStatus) -> AppResult<PenaltyStatus> {
        match (self, next) {
            (PenaltyStatus::Unpaid, PenaltyStatus::Paid) => Ok(next),
            _ => Err(AppError::Conflict(format!(
                "penalty status cannot move from {} to {}",
                self.as_ref(),
                next.as_ref()
            ))),
        }
    }
}
