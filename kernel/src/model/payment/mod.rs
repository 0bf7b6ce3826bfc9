use crate::model::id::{PaymentId, PenaltyId, ReservationId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, EnumString};

pub mod event;

#[derive(Debug)]
pub struct Payment {
    pub payment_id: PaymentId,
    pub reservation_id: ReservationId,
    pub penalty_id: Option<PenaltyId>,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub proof_of_payment: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    QrCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Failed,
}

impl PaymentStatus {
    // 決済結果が確定したら以降は変更しない
    pub fn transition_to(self, next: PaymentStatus) -> AppResult<PaymentStatus> {
        match (self, next) {
            (PaymentStatus::Pending, PaymentStatus::Verified | PaymentStatus::Failed) => Ok(next),
            _ => Err(AppError::Conflict(format!(
                "payment status cannot move from {} to {}",
                self.as_ref(),
                next.as_ref()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settled_payments_are_final() {
        assert!(PaymentStatus::Pending.transition_to(PaymentStatus::Verified).is_ok());
        assert!(PaymentStatus::Pending.transition_to(PaymentStatus::Failed).is_ok());
        assert!(PaymentStatus::Pending.transition_to(PaymentStatus::Pending).is_err());
        assert!(PaymentStatus::Verified.transition_to(PaymentStatus::Failed).is_err());
        assert!(PaymentStatus::Failed.transition_to(PaymentStatus::Verified).is_err());
    }
}
