use super::reservation::authorize_reservation;
use crate::{
    extractor::AuthorizedUser,
    model::payment::{
        CreatePaymentRequest, PaymentResponse, PaymentsResponse, UpdatePaymentStatusRequest,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::{id::PaymentId, payment::event::UpdatePaymentStatus};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_payment(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<CreatePaymentRequest>, AppError>,
) -> AppResult<(StatusCode, Json<PaymentResponse>)> {
    req.validate(&())?;
    authorize_reservation(&registry, &user, req.reservation_id).await?;

    registry
        .payment_repository()
        .create(req.into())
        .await
        .map(|payment| (StatusCode::CREATED, Json(payment.into())))
}

pub async fn show_payment_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaymentsResponse>> {
    user.ensure_admin()?;

    registry
        .payment_repository()
        .find_all()
        .await
        .map(PaymentsResponse::from)
        .map(Json)
}

pub async fn show_payment(
    user: AuthorizedUser,
    Path(payment_id): Path<PaymentId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaymentResponse>> {
    let payment = registry
        .payment_repository()
        .find_by_id(payment_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("payment ({payment_id}) was not found")))?;
    authorize_reservation(&registry, &user, payment.reservation_id).await?;

    Ok(Json(payment.into()))
}

// 支払いの確認・却下は管理者のみが行う
pub async fn update_payment_status(
    user: AuthorizedUser,
    Path(payment_id): Path<PaymentId>,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<UpdatePaymentStatusRequest>, AppError>,
) -> AppResult<Json<PaymentResponse>> {
    user.ensure_admin()?;

    registry
        .payment_repository()
        .update_status(UpdatePaymentStatus::new(payment_id, req.status))
        .await
        .map(PaymentResponse::from)
        .map(Json)
}
