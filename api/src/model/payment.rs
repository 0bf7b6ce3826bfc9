use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{PaymentId, PenaltyId, ReservationId},
    payment::{event::CreatePayment, Payment, PaymentMethod, PaymentStatus},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[garde(skip)]
    pub reservation_id: ReservationId,
    #[garde(skip)]
    pub penalty_id: Option<PenaltyId>,
    #[garde(custom(super::positive_amount))]
    pub amount: Decimal,
    #[garde(skip)]
    pub payment_method: PaymentMethod,
    #[garde(length(min = 1, max = 1024))]
    pub proof_of_payment: Option<String>,
}

impl From<CreatePaymentRequest> for CreatePayment {
    fn from(value: CreatePaymentRequest) -> Self {
        let CreatePaymentRequest {
            reservation_id,
            penalty_id,
            amount,
            payment_method,
            proof_of_payment,
        } = value;
        CreatePayment::new(
            reservation_id,
            penalty_id,
            amount,
            payment_method,
            proof_of_payment,
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsResponse {
    pub items: Vec<PaymentResponse>,
}

impl From<Vec<Payment>> for PaymentsResponse {
    fn from(value: Vec<Payment>) -> Self {
        Self {
            items: value.into_iter().map(PaymentResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: PaymentId,
    pub reservation_id: ReservationId,
    pub penalty_id: Option<PenaltyId>,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub proof_of_payment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(value: Payment) -> Self {
        let Payment {
            payment_id,
            reservation_id,
            penalty_id,
            amount,
            method,
            proof_of_payment,
            status,
            created_at,
        } = value;
        Self {
            payment_id,
            reservation_id,
            penalty_id,
            amount,
            payment_method: method,
            payment_status: status,
            proof_of_payment,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garde::Validate;
    use rstest::rstest;

    #[rstest]
    #[case(serde_json::json!(100), true)]
    #[case(serde_json::json!(0.5), true)]
    #[case(serde_json::json!(0), false)]
    #[case(serde_json::json!(-20), false)]
    fn amount_must_be_positive(#[case] amount: serde_json::Value, #[case] valid: bool) {
        let req: CreatePaymentRequest = serde_json::from_value(serde_json::json!({
            "reservationId": ReservationId::new(),
            "amount": amount,
            "paymentMethod": "qr_code",
        }))
        .unwrap();
        assert_eq!(req.validate(&()).is_ok(), valid);
    }

    #[test]
    fn unknown_payment_method_fails_to_parse() {
        let res = serde_json::from_value::<CreatePaymentRequest>(serde_json::json!({
            "reservationId": ReservationId::new(),
            "amount": 100,
            "paymentMethod": "cash",
        }));
        assert!(res.is_err());
    }
}
