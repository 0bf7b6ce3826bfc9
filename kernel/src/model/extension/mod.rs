use crate::model::id::{ExtensionId, ReservationId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub mod event;

#[derive(Debug)]
pub struct Extension {
    pub extension_id: ExtensionId,
    pub reservation_id: ReservationId,
    pub previous_end_time: DateTime<Utc>,
    pub new_end_time: DateTime<Utc>,
    pub additional_fee: Decimal,
    pub created_at: DateTime<Utc>,
}
