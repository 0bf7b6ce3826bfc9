use super::parse_column;
use kernel::model::{
    barrier::BarrierAction,
    id::{BarrierActionId, ReservationId, SlotId, UserId},
};
use shared::error::{AppError, AppResult};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct BarrierActionRow {
    pub action_id: BarrierActionId,
    pub sequence: i64,
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub slot_id: SlotId,
    pub action: String,
    pub action_time: DateTime<Utc>,
}

impl TryFrom<BarrierActionRow> for BarrierAction {
    type Error = AppError;

    fn try_from(value: BarrierActionRow) -> AppResult<Self> {
        let BarrierActionRow {
            action_id,
            sequence,
            reservation_id,
            user_id,
            slot_id,
            action,
            action_time,
        } = value;
        Ok(BarrierAction {
            action_id,
            reservation_id,
            user_id,
            slot_id,
            action: parse_column("action", &action)?,
            action_time,
            sequence,
        })
    }
}
