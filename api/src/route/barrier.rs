use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::barrier::{register_barrier_action, show_barrier_action_list};

pub fn build_barrier_routers() -> Router<AppRegistry> {
    Router::new().route(
        "/barrier-control",
        get(show_barrier_action_list).post(register_barrier_action),
    )
}
