use super::{
    auth::build_auth_routers, barrier::build_barrier_routers,
    extension::build_extension_routers, notification::build_notification_routers,
    payment::build_payment_routers, penalty::build_penalty_routers,
    reservation::build_reservation_routers, slot::build_slot_routers,
    user::build_user_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_auth_routers())
        .merge(build_user_routers())
        .merge(build_slot_routers())
        .merge(build_reservation_routers())
        .merge(build_payment_routers())
        .merge(build_penalty_routers())
        .merge(build_extension_routers())
        .merge(build_notification_routers())
        .merge(build_barrier_routers());

    Router::new().nest("/api/v1", router)
}
