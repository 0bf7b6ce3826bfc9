use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{NotificationId, ReservationId, UserId},
    notification::{event::CreateNotification, Notification},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[garde(skip)]
    pub reservation_id: ReservationId,
    #[garde(length(min = 1, max = 2000))]
    pub message: String,
}

impl From<CreateNotificationRequest> for CreateNotification {
    fn from(value: CreateNotificationRequest) -> Self {
        let CreateNotificationRequest {
            reservation_id,
            message,
        } = value;
        CreateNotification::new(reservation_id, message)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub items: Vec<NotificationResponse>,
}

impl From<Vec<Notification>> for NotificationsResponse {
    fn from(value: Vec<Notification>) -> Self {
        Self {
            items: value.into_iter().map(NotificationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub notification_id: NotificationId,
    pub user_id: UserId,
    pub reservation_id: Option<ReservationId>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(value: Notification) -> Self {
        let Notification {
            notification_id,
            user_id,
            reservation_id,
            message,
            is_read,
            created_at,
        } = value;
        Self {
            notification_id,
            user_id,
            reservation_id,
            message,
            is_read,
            created_at,
        }
    }
}
