use crate::{
    extractor::AuthorizedUser,
    model::{
        notification::NotificationsResponse,
        reservation::ReservationsResponse,
        user::{UpdateUserRequest, UpdateUserRequestWithUserId, UserResponse, UsersResponse},
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::{id::UserId, user::event::DeleteUser};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.user))
}

pub async fn list_users(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UsersResponse>> {
    user.ensure_admin()?;

    registry
        .user_repository()
        .find_all()
        .await
        .map(UsersResponse::from)
        .map(Json)
}

pub async fn get_user(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserResponse>> {
    user.ensure_self_or_admin(user_id)?;

    registry
        .user_repository()
        .find_current_user(user_id)
        .await?
        .map(UserResponse::from)
        .map(Json)
        .ok_or_else(|| AppError::EntityNotFound(format!("user ({user_id}) was not found")))
}

pub async fn update_user(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateUserRequest>, AppError>,
) -> AppResult<StatusCode> {
    user.ensure_self_or_admin(user_id)?;
    req.validate(&())?;

    registry
        .user_repository()
        .update(UpdateUserRequestWithUserId::new(user_id, req).into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_user(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    user.ensure_self_or_admin(user_id)?;

    registry
        .user_repository()
        .delete(DeleteUser { user_id })
        .await
        .map(|_| StatusCode::OK)
}

pub async fn list_user_reservations(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    user.ensure_self_or_admin(user_id)?;
    ensure_user_exists(&registry, user_id).await?;

    registry
        .reservation_repository()
        .find_by_user_id(user_id)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn list_user_notifications(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<NotificationsResponse>> {
    user.ensure_self_or_admin(user_id)?;
    ensure_user_exists(&registry, user_id).await?;

    registry
        .notification_repository()
        .find_by_user_id(user_id)
        .await
        .map(NotificationsResponse::from)
        .map(Json)
}

async fn ensure_user_exists(registry: &AppRegistry, user_id: UserId) -> AppResult<()> {
    match registry.user_repository().find_current_user(user_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::EntityNotFound(format!(
            "user ({user_id}) was not found"
        ))),
    }
}
