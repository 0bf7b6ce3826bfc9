use super::parse_column;
use kernel::model::{id::SlotId, slot::Slot};
use shared::error::{AppError, AppResult};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct SlotRow {
    pub slot_id: SlotId,
    pub slot_number: String,
    pub floor: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SlotRow> for Slot {
    type Error = AppError;

    fn try_from(value: SlotRow) -> AppResult<Self> {
        let SlotRow {
            slot_id,
            slot_number,
            floor,
            status,
            created_at,
        } = value;
        Ok(Slot {
            slot_id,
            slot_number,
            floor,
            status: parse_column("status", &status)?,
            created_at,
        })
    }
}

// 予約作成時に FOR UPDATE で取得するスロット情報
#[derive(sqlx::FromRow)]
pub struct LockedSlotRow {
    pub slot_id: SlotId,
    pub slot_number: String,
    pub floor: i32,
}
