use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::notification::{
    mark_notification_read, register_notification, show_notification,
};

pub fn build_notification_routers() -> Router<AppRegistry> {
    let notification_routers = Router::new()
        .route("/", post(register_notification))
        .route("/:notification_id", get(show_notification))
        .route("/:notification_id/read", put(mark_notification_read));

    Router::new().nest("/notifications", notification_routers)
}
