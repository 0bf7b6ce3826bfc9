use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    delete_reservation, quote_reservation, register_reservation, show_reservation,
    show_reservation_barrier_actions, show_reservation_extensions, show_reservation_list,
    show_reservation_notifications, show_reservation_payments, show_reservation_penalties,
    update_reservation,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/", post(register_reservation))
        .route("/", get(show_reservation_list))
        .route("/quote", get(quote_reservation))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id", put(update_reservation))
        .route("/:reservation_id", delete(delete_reservation))
        .route("/:reservation_id/payments", get(show_reservation_payments))
        .route("/:reservation_id/penalties", get(show_reservation_penalties))
        .route("/:reservation_id/extensions", get(show_reservation_extensions))
        .route(
            "/:reservation_id/notifications",
            get(show_reservation_notifications),
        )
        .route(
            "/:reservation_id/barrier-actions",
            get(show_reservation_barrier_actions),
        );

    Router::new().nest("/reservations", reservation_routers)
}
