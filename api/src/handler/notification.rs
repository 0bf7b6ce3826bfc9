use super::reservation::authorize_reservation;
use crate::{
    extractor::AuthorizedUser,
    model::notification::{CreateNotificationRequest, NotificationResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::{id::NotificationId, notification::Notification};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_notification(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<CreateNotificationRequest>, AppError>,
) -> AppResult<(StatusCode, Json<NotificationResponse>)> {
    req.validate(&())?;
    authorize_reservation(&registry, &user, req.reservation_id).await?;

    registry
        .notification_repository()
        .create(req.into())
        .await
        .map(|notification| (StatusCode::CREATED, Json(notification.into())))
}

pub async fn show_notification(
    user: AuthorizedUser,
    Path(notification_id): Path<NotificationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<NotificationResponse>> {
    find_own_notification(&registry, &user, notification_id)
        .await
        .map(NotificationResponse::from)
        .map(Json)
}

pub async fn mark_notification_read(
    user: AuthorizedUser,
    Path(notification_id): Path<NotificationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    find_own_notification(&registry, &user, notification_id).await?;

    registry
        .notification_repository()
        .mark_read(notification_id)
        .await
        .map(|_| StatusCode::OK)
}

async fn find_own_notification(
    registry: &AppRegistry,
    user: &AuthorizedUser,
    notification_id: NotificationId,
) -> AppResult<Notification> {
    let notification = registry
        .notification_repository()
        .find_by_id(notification_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("notification ({notification_id}) was not found"))
        })?;
    user.ensure_self_or_admin(notification.user_id)?;
    Ok(notification)
}
