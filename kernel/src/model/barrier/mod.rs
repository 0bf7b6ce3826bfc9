use crate::model::id::{BarrierActionId, ReservationId, SlotId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

pub mod event;

/// One logged gate intent. Rows are never updated or deleted on their own.
#[derive(Debug)]
pub struct BarrierAction {
    pub action_id: BarrierActionId,
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub slot_id: SlotId,
    pub action: GateAction,
    pub action_time: DateTime<Utc>,
    pub sequence: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GateAction {
    Open,
    Close,
}
