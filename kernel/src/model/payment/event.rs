use super::{PaymentMethod, PaymentStatus};
use crate::model::id::{PaymentId, PenaltyId, ReservationId};
use derive_new::new;
use rust_decimal::Decimal;

#[derive(new, Debug)]
pub struct CreatePayment {
    pub reservation_id: ReservationId,
    pub penalty_id: Option<PenaltyId>,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub proof_of_payment: Option<String>,
}

#[derive(new, Debug)]
pub struct UpdatePaymentStatus {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
}
