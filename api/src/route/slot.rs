use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::slot::{
    register_slot, show_slot, show_slot_list, show_slot_reservations, update_slot_status,
};

pub fn build_slot_routers() -> Router<AppRegistry> {
    let slot_routers = Router::new()
        .route("/", post(register_slot))
        .route("/", get(show_slot_list))
        .route("/:slot_id", get(show_slot))
        .route("/:slot_id", put(update_slot_status))
        .route("/:slot_id/reservations", get(show_slot_reservations));

    Router::new().nest("/parking_slots", slot_routers)
}
