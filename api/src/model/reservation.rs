use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{ReservationId, SlotId, UserId},
    reservation::{
        event::{CreateReservation, UpdateReservation},
        BookingType, Reservation, ReservationSlot, ReservationStatus, ReservationWindow,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    // 管理者は他のユーザーの予約を代わりに作成できる
    #[garde(skip)]
    pub user_id: Option<UserId>,
    #[garde(skip)]
    pub slot_id: SlotId,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    // 開始・終了の前後関係は ReservationWindow への変換時に検査する
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(skip)]
    pub booking_type: BookingType,
    #[garde(custom(super::optional_positive_amount))]
    pub total_price: Option<Decimal>,
    #[garde(custom(starts_pending))]
    pub status: Option<ReservationStatus>,
}

fn starts_pending(value: &Option<ReservationStatus>, _ctx: &()) -> garde::Result {
    match value {
        None | Some(ReservationStatus::Pending) => Ok(()),
        Some(_) => Err(garde::Error::new("a new reservation must start as pending")),
    }
}

#[derive(new)]
pub struct CreateReservationRequestWithUserId(UserId, CreateReservationRequest);

impl TryFrom<CreateReservationRequestWithUserId> for CreateReservation {
    type Error = AppError;

    fn try_from(value: CreateReservationRequestWithUserId) -> AppResult<Self> {
        let CreateReservationRequestWithUserId(
            user_id,
            CreateReservationRequest {
                slot_id,
                start_time,
                end_time,
                booking_type,
                total_price,
                ..
            },
        ) = value;
        Ok(CreateReservation::new(
            user_id,
            slot_id,
            ReservationWindow::new(start_time, end_time)?,
            booking_type,
            total_price,
        ))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReservationResponse {
    pub reservation_id: ReservationId,
    pub total_price: Decimal,
}

impl From<&Reservation> for CreatedReservationResponse {
    fn from(value: &Reservation) -> Self {
        Self {
            reservation_id: value.reservation_id,
            total_price: value.total_price,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    #[garde(skip)]
    pub start_time: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub end_time: Option<DateTime<Utc>>,
    #[garde(skip)]
    pub booking_type: Option<BookingType>,
    #[garde(skip)]
    pub status: Option<ReservationStatus>,
}

impl UpdateReservationRequest {
    // 状態の変更は管理者のみ。現在と同じ状態の指定は変更とみなさない
    pub fn ensure_status_change_allowed(
        &self,
        current: ReservationStatus,
        is_admin: bool,
    ) -> AppResult<()> {
        match self.status {
            Some(next) if next != current && !is_admin => Err(AppError::ForbiddenOperation),
            _ => Ok(()),
        }
    }
}

#[derive(new)]
pub struct UpdateReservationRequestWithId(ReservationId, UpdateReservationRequest);

impl From<UpdateReservationRequestWithId> for UpdateReservation {
    fn from(value: UpdateReservationRequestWithId) -> Self {
        let UpdateReservationRequestWithId(
            reservation_id,
            UpdateReservationRequest {
                start_time,
                end_time,
                booking_type,
                status,
            },
        ) = value;
        UpdateReservation::new(reservation_id, start_time, end_time, booking_type, status)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_type: BookingType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_type: BookingType,
    pub total_price: Decimal,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub user_id: UserId,
    pub slot_id: SlotId,
    pub slot_number: String,
    pub floor: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub booking_type: BookingType,
    pub total_price: Decimal,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            user_id,
            slot:
                ReservationSlot {
                    slot_id,
                    slot_number,
                    floor,
                },
            window,
            booking_type,
            total_price,
            status,
            created_at,
        } = value;
        Self {
            reservation_id,
            user_id,
            slot_id,
            slot_number,
            floor,
            start_time: window.start(),
            end_time: window.end(),
            booking_type,
            total_price,
            status,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, response::IntoResponse};
    use garde::Validate;
    use rstest::rstest;

    fn request(body: serde_json::Value) -> CreateReservationRequest {
        let mut base = serde_json::json!({
            "slotId": SlotId::new(),
            "startTime": "2030-01-01T10:00:00Z",
            "endTime": "2030-01-01T12:00:00Z",
            "bookingType": "hourly",
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), body.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    #[rstest]
    #[case(serde_json::json!({}), true)]
    #[case(serde_json::json!({ "status": "pending" }), true)]
    #[case(serde_json::json!({ "status": "confirmed" }), false)]
    #[case(serde_json::json!({ "totalPrice": 100 }), true)]
    #[case(serde_json::json!({ "totalPrice": -1 }), false)]
    fn create_request_validation(#[case] extra: serde_json::Value, #[case] valid: bool) {
        assert_eq!(request(extra).validate(&()).is_ok(), valid);
    }

    #[rstest]
    #[case("2030-01-01T10:00:00Z")]
    #[case("2030-01-01T09:00:00Z")]
    fn empty_or_inverted_windows_are_rejected(#[case] end_time: &str) {
        let req = request(serde_json::json!({ "endTime": end_time }));
        let res = CreateReservation::try_from(CreateReservationRequestWithUserId::new(
            UserId::new(),
            req,
        ));
        assert!(matches!(res, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn unknown_booking_type_fails_to_parse() {
        let res = serde_json::from_value::<CreateReservationRequest>(serde_json::json!({
            "slotId": SlotId::new(),
            "startTime": "2030-01-01T10:00:00Z",
            "endTime": "2030-01-01T12:00:00Z",
            "bookingType": "weekly",
        }));
        assert!(res.is_err());
    }

    #[test]
    fn request_becomes_an_event_for_the_given_user() {
        let user_id = UserId::new();
        let req = request(serde_json::json!({ "totalPrice": 100 }));
        let event =
            CreateReservation::try_from(CreateReservationRequestWithUserId::new(user_id, req))
                .unwrap();
        assert_eq!(event.user_id, user_id);
        assert_eq!(event.booking_type, BookingType::Hourly);
        assert_eq!(event.quoted_total_price, Some(Decimal::from(100)));
        assert_eq!(event.window.duration(), chrono::Duration::hours(2));
    }

    fn update_request(body: serde_json::Value) -> UpdateReservationRequest {
        serde_json::from_value(body).unwrap()
    }

    #[rstest]
    #[case(serde_json::json!({ "status": "completed" }), false, false)]
    #[case(serde_json::json!({ "status": "confirmed" }), false, false)]
    #[case(serde_json::json!({ "status": "pending" }), false, true)]
    #[case(serde_json::json!({ "endTime": "2030-01-01T14:00:00Z" }), false, true)]
    #[case(serde_json::json!({ "status": "completed" }), true, true)]
    fn only_admins_may_change_the_status(
        #[case] body: serde_json::Value,
        #[case] is_admin: bool,
        #[case] allowed: bool,
    ) {
        let res = update_request(body)
            .ensure_status_change_allowed(ReservationStatus::Pending, is_admin);
        if allowed {
            assert!(res.is_ok());
        } else {
            assert!(matches!(res, Err(AppError::ForbiddenOperation)));
        }
    }

    #[rstest]
    #[case("/reservations/quote?startTime=2030-01-01T10:00:00Z&endTime=2030-01-01T12:00:00Z&bookingType=weekly")]
    #[case("/reservations/quote?startTime=2030-01-01T10:00:00Z&bookingType=hourly")]
    #[case("/reservations/quote?startTime=tomorrow&endTime=2030-01-01T12:00:00Z&bookingType=hourly")]
    fn malformed_quote_query_is_a_bad_request(#[case] uri: &str) {
        let rejection = Query::<QuoteQuery>::try_from_uri(&uri.parse().unwrap()).unwrap_err();
        let err = AppError::from(rejection);
        assert!(matches!(err, AppError::InvalidQuery(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn well_formed_quote_query_parses() {
        let uri = "/reservations/quote?startTime=2030-01-01T10:00:00Z&endTime=2030-01-01T12:00:00Z&bookingType=daily";
        let Query(query) = Query::<QuoteQuery>::try_from_uri(&uri.parse().unwrap()).unwrap();
        assert_eq!(query.booking_type, BookingType::Daily);
    }
}
