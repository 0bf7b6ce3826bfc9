use super::{BookingType, ReservationStatus, ReservationWindow};
use crate::model::id::{ReservationId, SlotId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;
use rust_decimal::Decimal;

#[derive(new, Debug)]
pub struct CreateReservation {
    pub user_id: UserId,
    pub slot_id: SlotId,
    pub window: ReservationWindow,
    pub booking_type: BookingType,
    // クライアント側で表示した金額。指定された場合はサーバー側の計算結果と一致する必要がある
    pub quoted_total_price: Option<Decimal>,
}

#[derive(new, Debug)]
pub struct UpdateReservation {
    pub reservation_id: ReservationId,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub booking_type: Option<BookingType>,
    pub status: Option<ReservationStatus>,
}

#[derive(new, Debug)]
pub struct DeleteReservation {
    pub reservation_id: ReservationId,
}
