use crate::model::id::ReservationId;
use chrono::{DateTime, Utc};
use derive_new::new;
use rust_decimal::Decimal;

#[derive(new, Debug)]
pub struct CreateExtension {
    pub reservation_id: ReservationId,
    pub new_end_time: DateTime<Utc>,
    pub quoted_fee: Option<Decimal>,
}
