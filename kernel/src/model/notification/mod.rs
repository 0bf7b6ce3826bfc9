use crate::model::id::{NotificationId, ReservationId, UserId};
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug)]
pub struct Notification {
    pub notification_id: NotificationId,
    pub user_id: UserId,
    pub reservation_id: Option<ReservationId>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
