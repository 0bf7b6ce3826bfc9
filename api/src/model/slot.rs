use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::SlotId,
    slot::{
        event::{CreateSlot, UpdateSlotStatus},
        Slot, SlotStatus,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    #[garde(length(min = 1, max = 32))]
    pub slot_number: String,
    #[garde(range(min = -10, max = 200))]
    pub floor: i32,
}

impl From<CreateSlotRequest> for CreateSlot {
    fn from(value: CreateSlotRequest) -> Self {
        let CreateSlotRequest { slot_number, floor } = value;
        Self { slot_number, floor }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSlotResponse {
    pub slot_id: SlotId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlotStatusRequest {
    pub status: SlotStatus,
}

impl UpdateSlotStatusRequest {
    pub fn into_event(self, slot_id: SlotId) -> UpdateSlotStatus {
        UpdateSlotStatus {
            slot_id,
            status: self.status,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsResponse {
    pub items: Vec<SlotResponse>,
}

impl From<Vec<Slot>> for SlotsResponse {
    fn from(value: Vec<Slot>) -> Self {
        Self {
            items: value.into_iter().map(SlotResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotResponse {
    pub slot_id: SlotId,
    pub slot_number: String,
    pub floor: i32,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Slot> for SlotResponse {
    fn from(value: Slot) -> Self {
        let Slot {
            slot_id,
            slot_number,
            floor,
            status,
            created_at,
        } = value;
        Self {
            slot_id,
            slot_number,
            floor,
            status,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garde::Validate;

    #[test]
    fn unknown_status_values_are_rejected_at_parse_time() {
        let res = serde_json::from_value::<UpdateSlotStatusRequest>(
            serde_json::json!({ "status": "broken" }),
        );
        assert!(res.is_err());

        let req = serde_json::from_value::<UpdateSlotStatusRequest>(
            serde_json::json!({ "status": "reserved" }),
        )
        .unwrap();
        assert_eq!(req.status, SlotStatus::Reserved);
    }

    #[test]
    fn slot_number_must_not_be_empty() {
        let req = CreateSlotRequest {
            slot_number: String::new(),
            floor: 1,
        };
        assert!(req.validate(&()).is_err());
    }
}
