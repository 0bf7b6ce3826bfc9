use crate::model::{
    id::{NotificationId, ReservationId, UserId},
    notification::{event::CreateNotification, Notification},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, event: CreateNotification) -> AppResult<Notification>;
    async fn mark_read(&self, notification_id: NotificationId) -> AppResult<()>;
    async fn find_by_id(&self, notification_id: NotificationId)
        -> AppResult<Option<Notification>>;
    async fn find_by_reservation_id(&self, reservation_id: ReservationId)
        -> AppResult<Vec<Notification>>;
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Notification>>;
}
