use crate::{
    extractor::AuthorizedUser,
    model::{
        reservation::ReservationsResponse,
        slot::{
            CreateSlotRequest, CreatedSlotResponse, SlotResponse, SlotsResponse,
            UpdateSlotStatusRequest,
        },
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::id::SlotId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_slot(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<CreateSlotRequest>, AppError>,
) -> AppResult<(StatusCode, Json<CreatedSlotResponse>)> {
    user.ensure_admin()?;
    req.validate(&())?;

    registry
        .slot_repository()
        .create(req.into())
        .await
        .map(|slot_id| (StatusCode::CREATED, Json(CreatedSlotResponse { slot_id })))
}

pub async fn show_slot_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SlotsResponse>> {
    registry
        .slot_repository()
        .find_all()
        .await
        .map(SlotsResponse::from)
        .map(Json)
}

pub async fn show_slot(
    _user: AuthorizedUser,
    Path(slot_id): Path<SlotId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SlotResponse>> {
    registry
        .slot_repository()
        .find_by_id(slot_id)
        .await
        .and_then(|slot| match slot {
            Some(slot) => Ok(Json(slot.into())),
            None => Err(AppError::EntityNotFound(format!(
                "parking slot ({slot_id}) was not found"
            ))),
        })
}

pub async fn update_slot_status(
    user: AuthorizedUser,
    Path(slot_id): Path<SlotId>,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateSlotStatusRequest>, AppError>,
) -> AppResult<StatusCode> {
    user.ensure_admin()?;

    registry
        .slot_repository()
        .update_status(req.into_event(slot_id))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn show_slot_reservations(
    _user: AuthorizedUser,
    Path(slot_id): Path<SlotId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    if registry.slot_repository().find_by_id(slot_id).await?.is_none() {
        return Err(AppError::EntityNotFound(format!(
            "parking slot ({slot_id}) was not found"
        )));
    }

    registry
        .reservation_repository()
        .find_by_slot_id(slot_id)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}
