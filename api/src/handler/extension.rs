use super::reservation::authorize_reservation;
use crate::{
    extractor::AuthorizedUser,
    model::extension::{CreateExtensionRequest, ExtensionResponse, ExtensionsResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::id::ReservationId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_extension(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<CreateExtensionRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ExtensionResponse>)> {
    req.validate(&())?;
    authorize_reservation(&registry, &user, req.reservation_id).await?;

    registry
        .extension_repository()
        .create(req.into())
        .await
        .map(|extension| (StatusCode::CREATED, Json(extension.into())))
}

pub async fn show_extension_list(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ExtensionsResponse>> {
    authorize_reservation(&registry, &user, reservation_id).await?;

    registry
        .extension_repository()
        .find_by_reservation_id(reservation_id)
        .await
        .map(ExtensionsResponse::from)
        .map(Json)
}
