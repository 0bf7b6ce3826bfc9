use super::Tx;
use crate::database::{map_write_error, model::notification::NotificationRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{NotificationId, ReservationId, UserId},
    notification::{event::CreateNotification, Notification},
};
use kernel::repository::notification::NotificationRepository;
use shared::error::{AppError, AppResult};

const NOTIFICATION_COLUMNS: &str =
    "notification_id, user_id, reservation_id, message, is_read, created_at";

#[derive(new)]
pub struct NotificationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl NotificationRepository for NotificationRepositoryImpl {
    async fn create(&self, event: CreateNotification) -> AppResult<Notification> {
        let mut tx = self.db.begin().await?;

        // 通知先は予約の持ち主
        let user_id: Option<UserId> =
            sqlx::query_scalar("SELECT user_id FROM reservations WHERE reservation_id = $1")
                .bind(event.reservation_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;
        let Some(user_id) = user_id else {
            return Err(AppError::EntityNotFound(format!(
                "reservation ({}) was not found",
                event.reservation_id
            )));
        };

        let notification =
            insert_notification(&mut tx, user_id, Some(event.reservation_id), event.message)
                .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(notification)
    }

    async fn mark_read(&self, notification_id: NotificationId) -> AppResult<()> {
        let res = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE notification_id = $1")
            .bind(notification_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;
        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "notification ({notification_id}) was not found"
            )));
        }
        Ok(())
    }

    async fn find_by_id(&self, notification_id: NotificationId) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE notification_id = $1"
        ))
        .bind(notification_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Notification::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_reservation_id(
        &self,
        reservation_id: ReservationId,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
                SELECT {NOTIFICATION_COLUMNS} FROM notifications
                WHERE reservation_id = $1
                ORDER BY created_at ASC
            "#
        ))
        .bind(reservation_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Notification::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
                SELECT {NOTIFICATION_COLUMNS} FROM notifications
                WHERE user_id = $1
                ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Notification::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}

// 予約の状態変化に伴う通知は、呼び出し元のトランザクション内で書き込む
pub(crate) async fn insert_notification(
    tx: &mut Tx<'_>,
    user_id: UserId,
    reservation_id: Option<ReservationId>,
    message: String,
) -> AppResult<Notification> {
    sqlx::query_as::<_, NotificationRow>(&format!(
        r#"
            INSERT INTO notifications (notification_id, user_id, reservation_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTIFICATION_COLUMNS}
        "#
    ))
    .bind(NotificationId::new())
    .bind(user_id)
    .bind(reservation_id)
    .bind(message)
    .fetch_one(&mut **tx)
    .await
    .map(Notification::from)
    .map_err(map_write_error)
}
