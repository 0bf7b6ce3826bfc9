use super::reservation::authorize_reservation;
use crate::{
    extractor::AuthorizedUser,
    model::penalty::{
        CreatePenaltyRequest, PenaltiesResponse, PenaltyResponse, UpdatePenaltyStatusRequest,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::{id::PenaltyId, penalty::event::UpdatePenaltyStatus};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_penalty(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<CreatePenaltyRequest>, AppError>,
) -> AppResult<(StatusCode, Json<PenaltyResponse>)> {
    req.validate(&())?;
    authorize_reservation(&registry, &user, req.reservation_id).await?;

    registry
        .penalty_repository()
        .create(req.into())
        .await
        .map(|penalty| (StatusCode::CREATED, Json(penalty.into())))
}

pub async fn show_penalty_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PenaltiesResponse>> {
    user.ensure_admin()?;

    registry
        .penalty_repository()
        .find_all()
        .await
        .map(PenaltiesResponse::from)
        .map(Json)
}

pub async fn show_penalty(
    user: AuthorizedUser,
    Path(penalty_id): Path<PenaltyId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PenaltyResponse>> {
    let penalty = registry
        .penalty_repository()
        .find_by_id(penalty_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("penalty ({penalty_id}) was not found")))?;
    user.ensure_self_or_admin(penalty.user_id)?;

    Ok(Json(penalty.into()))
}

pub async fn update_penalty_status(
    user: AuthorizedUser,
    Path(penalty_id): Path<PenaltyId>,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<UpdatePenaltyStatusRequest>, AppError>,
) -> AppResult<Json<PenaltyResponse>> {
    user.ensure_admin()?;

    registry
        .penalty_repository()
        .update_status(UpdatePenaltyStatus::new(penalty_id, req.status))
        .await
        .map(PenaltyResponse::from)
        .map(Json)
}
