use chrono::{DateTime, Utc};
use kernel::model::{
    barrier::{event::CreateBarrierAction, BarrierAction, GateAction},
    id::{BarrierActionId, ReservationId, SlotId, UserId},
};
use serde::{Deserialize, Serialize};

// open / close 以外の値はデシリアライズの時点で弾かれる
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBarrierActionRequest {
    pub reservation_id: ReservationId,
    pub action: GateAction,
}

impl From<CreateBarrierActionRequest> for CreateBarrierAction {
    fn from(value: CreateBarrierActionRequest) -> Self {
        CreateBarrierAction::new(value.reservation_id, value.action)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarrierActionsResponse {
    pub items: Vec<BarrierActionResponse>,
}

impl From<Vec<BarrierAction>> for BarrierActionsResponse {
    fn from(value: Vec<BarrierAction>) -> Self {
        Self {
            items: value.into_iter().map(BarrierActionResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarrierActionResponse {
    pub action_id: BarrierActionId,
    pub sequence: i64,
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub slot_id: SlotId,
    pub action: GateAction,
    pub action_time: DateTime<Utc>,
}

impl From<BarrierAction> for BarrierActionResponse {
    fn from(value: BarrierAction) -> Self {
        let BarrierAction {
            action_id,
            reservation_id,
            user_id,
            slot_id,
            action,
            action_time,
            sequence,
        } = value;
        Self {
            action_id,
            sequence,
            reservation_id,
            user_id,
            slot_id,
            action,
            action_time,
        }
    }
}
