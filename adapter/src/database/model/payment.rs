use super::parse_column;
use kernel::model::{
    id::{PaymentId, PenaltyId, ReservationId},
    payment::Payment,
};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct PaymentRow {
    pub payment_id: PaymentId,
    pub reservation_id: ReservationId,
    pub penalty_id: Option<PenaltyId>,
    pub amount: Decimal,
    pub payment_method: String,
    pub payment_status: String,
    pub proof_of_payment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(value: PaymentRow) -> AppResult<Self> {
        let PaymentRow {
            payment_id,
            reservation_id,
            penalty_id,
            amount,
            payment_method,
            payment_status,
            proof_of_payment,
            created_at,
        } = value;
        Ok(Payment {
            payment_id,
            reservation_id,
            penalty_id,
            amount,
            method: parse_column("payment_method", &payment_method)?,
            proof_of_payment,
            status: parse_column("payment_status", &payment_status)?,
            created_at,
        })
    }
}
