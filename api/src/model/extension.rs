use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    extension::{event::CreateExtension, Extension},
    id::{ExtensionId, ReservationId},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExtensionRequest {
    #[garde(skip)]
    pub reservation_id: ReservationId,
    #[garde(skip)]
    pub new_end_time: DateTime<Utc>,
    #[garde(custom(super::optional_non_negative_amount))]
    pub additional_fee: Option<Decimal>,
}

impl From<CreateExtensionRequest> for CreateExtension {
    fn from(value: CreateExtensionRequest) -> Self {
        let CreateExtensionRequest {
            reservation_id,
            new_end_time,
            additional_fee,
        } = value;
        CreateExtension::new(reservation_id, new_end_time, additional_fee)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionsResponse {
    pub items: Vec<ExtensionResponse>,
}

impl From<Vec<Extension>> for ExtensionsResponse {
    fn from(value: Vec<Extension>) -> Self {
        Self {
            items: value.into_iter().map(ExtensionResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionResponse {
    pub extension_id: ExtensionId,
    pub reservation_id: ReservationId,
    pub previous_end_time: DateTime<Utc>,
    pub new_end_time: DateTime<Utc>,
    pub additional_fee: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Extension> for ExtensionResponse {
    fn from(value: Extension) -> Self {
        let Extension {
            extension_id,
            reservation_id,
            previous_end_time,
            new_end_time,
            additional_fee,
            created_at,
        } = value;
        Self {
            extension_id,
            reservation_id,
            previous_end_time,
            new_end_time,
            additional_fee,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garde::Validate;

    #[test]
    fn fee_may_be_zero_but_not_negative() {
        let parse = |fee: serde_json::Value| -> CreateExtensionRequest {
            serde_json::from_value(serde_json::json!({
                "reservationId": ReservationId::new(),
                "newEndTime": "2030-01-01T13:00:00Z",
                "additionalFee": fee,
            }))
            .unwrap()
        };
        assert!(parse(serde_json::json!(0)).validate(&()).is_ok());
        assert!(parse(serde_json::json!(null)).validate(&()).is_ok());
        assert!(parse(serde_json::json!(-5)).validate(&()).is_err());
    }
}
