use crate::{
    extractor::AuthorizedUser,
    model::{
        barrier::BarrierActionsResponse,
        extension::ExtensionsResponse,
        notification::NotificationsResponse,
        payment::PaymentsResponse,
        penalty::PenaltiesResponse,
        reservation::{
            CreateReservationRequest, CreateReservationRequestWithUserId,
            CreatedReservationResponse, QuoteQuery, QuoteResponse, ReservationResponse,
            ReservationsResponse, UpdateReservationRequest, UpdateReservationRequestWithId,
        },
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use garde::Validate;
use kernel::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, DeleteReservation},
        Reservation, ReservationWindow,
    },
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn quote_reservation(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Query(query), _): WithRejection<Query<QuoteQuery>, AppError>,
) -> AppResult<Json<QuoteResponse>> {
    let window = ReservationWindow::new(query.start_time, query.end_time)?;
    let total_price = registry.tariff().price(query.booking_type, &window);

    Ok(Json(QuoteResponse {
        start_time: query.start_time,
        end_time: query.end_time,
        booking_type: query.booking_type,
        total_price,
    }))
}

pub async fn register_reservation(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<CreateReservationRequest>, AppError>,
) -> AppResult<(StatusCode, Json<CreatedReservationResponse>)> {
    req.validate(&())?;

    let user_id = req.user_id.unwrap_or(user.id());
    user.ensure_self_or_admin(user_id)?;

    let event = CreateReservation::try_from(CreateReservationRequestWithUserId::new(user_id, req))?;
    let reservation = registry.reservation_repository().create(event).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReservationResponse::from(&reservation)),
    ))
}

// 管理者はすべての予約を、一般ユーザーは自分の予約だけを参照できる
pub async fn show_reservation_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    let repository = registry.reservation_repository();
    let reservations = if user.is_admin() {
        repository.find_all().await?
    } else {
        repository.find_by_user_id(user.id()).await?
    };

    Ok(Json(reservations.into()))
}

pub async fn show_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    authorize_reservation(&registry, &user, reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn update_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateReservationRequest>, AppError>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;
    let current = authorize_reservation(&registry, &user, reservation_id).await?;
    req.ensure_status_change_allowed(current.status, user.is_admin())?;

    registry
        .reservation_repository()
        .update(UpdateReservationRequestWithId::new(reservation_id, req).into())
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn delete_reservation(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    authorize_reservation(&registry, &user, reservation_id).await?;

    registry
        .reservation_repository()
        .delete(DeleteReservation::new(reservation_id))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn show_reservation_payments(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaymentsResponse>> {
    authorize_reservation(&registry, &user, reservation_id).await?;

    registry
        .payment_repository()
        .find_by_reservation_id(reservation_id)
        .await
        .map(PaymentsResponse::from)
        .map(Json)
}

pub async fn show_reservation_penalties(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PenaltiesResponse>> {
    authorize_reservation(&registry, &user, reservation_id).await?;

    registry
        .penalty_repository()
        .find_by_reservation_id(reservation_id)
        .await
        .map(PenaltiesResponse::from)
        .map(Json)
}

pub async fn show_reservation_extensions(
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

pub async fn show_reservation_notifications(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<NotificationsResponse>> {
    authorize_reservation(&registry, &user, reservation_id).await?;

    registry
        .notification_repository()
        .find_by_reservation_id(reservation_id)
        .await
        .map(NotificationsResponse::from)
        .map(Json)
}

pub async fn show_reservation_barrier_actions(
    user: AuthorizedUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BarrierActionsResponse>> {
    authorize_reservation(&registry, &user, reservation_id).await?;

    registry
        .barrier_repository()
        .find_by_reservation_id(reservation_id)
        .await
        .map(BarrierActionsResponse::from)
        .map(Json)
}

/// Loads the reservation and checks that the caller owns it or is an admin.
pub(crate) async fn authorize_reservation(
    registry: &AppRegistry,
    user: &AuthorizedUser,
    reservation_id: ReservationId,
) -> AppResult<Reservation> {
    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("reservation ({reservation_id}) was not found"))
        })?;
    user.ensure_self_or_admin(reservation.user_id)?;
    Ok(reservation)
}
