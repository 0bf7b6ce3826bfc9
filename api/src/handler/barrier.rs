use super::reservation::authorize_reservation;
use crate::{
    extractor::AuthorizedUser,
    model::barrier::{BarrierActionResponse, BarrierActionsResponse, CreateBarrierActionRequest},
};
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_barrier_action(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<CreateBarrierActionRequest>, AppError>,
) -> AppResult<(StatusCode, Json<BarrierActionResponse>)> {
    authorize_reservation(&registry, &user, req.reservation_id).await?;

    registry
        .barrier_repository()
        .create(req.into())
        .await
        .map(|action| (StatusCode::CREATED, Json(action.into())))
}

pub async fn show_barrier_action_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BarrierActionsResponse>> {
    user.ensure_admin()?;

    registry
        .barrier_repository()
        .find_all()
        .await
        .map(BarrierActionsResponse::from)
        .map(Json)
}
