use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{PenaltyId, ReservationId, UserId},
    penalty::{event::CreatePenalty, Penalty, PenaltyStatus},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePenaltyRequest {
    #[garde(skip)]
    pub reservation_id: ReservationId,
    #[garde(skip)]
    pub actual_exit_time: DateTime<Utc>,
    // 省略された場合は料金表の超過料金から算出する
    #[garde(custom(super::optional_positive_amount))]
    pub amount: Option<Decimal>,
}

impl From<CreatePenaltyRequest> for CreatePenalty {
    fn from(value: CreatePenaltyRequest) -> Self {
        let CreatePenaltyRequest {
            reservation_id,
            actual_exit_time,
            amount,
        } = value;
        CreatePenalty::new(reservation_id, actual_exit_time, amount)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePenaltyStatusRequest {
    pub status: PenaltyStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltiesResponse {
    pub items: Vec<PenaltyResponse>,
}

impl From<Vec<Penalty>> for PenaltiesResponse {
    fn from(value: Vec<Penalty>) -> Self {
        Self {
            items: value.into_iter().map(PenaltyResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyResponse {
    pub penalty_id: PenaltyId,
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub actual_exit_time: DateTime<Utc>,
    pub amount: Decimal,
    pub status: PenaltyStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Penalty> for PenaltyResponse {
    fn from(value: Penalty) -> Self {
        let Penalty {
            penalty_id,
            reservation_id,
            user_id,
            actual_exit_time,
            amount,
            status,
            created_at,
        } = value;
        Self {
            penalty_id,
            reservation_id,
            user_id,
            actual_exit_time,
            amount,
            status,
            created_at,
        }
    }
}
