use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::penalty::{
    register_penalty, show_penalty, show_penalty_list, update_penalty_status,
};

pub fn build_penalty_routers() -> Router<AppRegistry> {
    let penalty_routers = Router::new()
        .route("/", post(register_penalty))
        .route("/", get(show_penalty_list))
        .route("/:penalty_id", get(show_penalty))
        .route("/:penalty_id", put(update_penalty_status));

    Router::new().nest("/penalties", penalty_routers)
}
