use kernel::model::{
    id::{NotificationId, ReservationId, UserId},
    notification::Notification,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct NotificationRow {
    pub notification_id: NotificationId,
    pub user_id: UserId,
    pub reservation_id: Option<ReservationId>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(value: NotificationRow) -> Self {
        let NotificationRow {
            notification_id,
            user_id,
            reservation_id,
            message,
            is_read,
            created_at,
        } = value;
        Notification {
            notification_id,
            user_id,
            reservation_id,
            message,
            is_read,
            created_at,
        }
    }
}
