use super::SlotStatus;
use crate::model::id::SlotId;

pub struct CreateSlot {
    pub slot_number: String,
    pub floor: i32,
}

#[derive(Debug)]
pub struct UpdateSlotStatus {
    pub slot_id: SlotId,
    pub status: SlotStatus,
}
