use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::user::{
    delete_user, get_current_user, get_user, list_user_notifications, list_user_reservations,
    list_users, update_user,
};

pub fn build_user_routers() -> Router<AppRegistry> {
    let user_routers = Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_current_user))
        .route(
            "/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/:user_id/reservations", get(list_user_reservations))
        .route("/:user_id/notifications", get(list_user_notifications));

    Router::new().nest("/users", user_routers)
}
