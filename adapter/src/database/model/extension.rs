use kernel::model::{
    extension::Extension,
    id::{ExtensionId, ReservationId},
};
use rust_decimal::Decimal;
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct ExtensionRow {
    pub extension_id: ExtensionId,
    pub reservation_id: ReservationId,
    pub previous_end_time: DateTime<Utc>,
    pub new_end_time: DateTime<Utc>,
    pub additional_fee: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<ExtensionRow> for Extension {
    fn from(value: ExtensionRow) -> Self {
        let ExtensionRow {
            extension_id,
            reservation_id,
            previous_end_time,
            new_end_time,
            additional_fee,
            created_at,
        } = value;
        Extension {
            extension_id,
            reservation_id,
            previous_end_time,
            new_end_time,
            additional_fee,
            created_at,
        }
    }
}
