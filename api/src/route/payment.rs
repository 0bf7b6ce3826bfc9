use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::payment::{
    register_payment, show_payment, show_payment_list, update_payment_status,
};

pub fn build_payment_routers() -> Router<AppRegistry> {
    let payment_routers = Router::new()
        .route("/", post(register_payment))
        .route("/", get(show_payment_list))
        .route("/:payment_id", get(show_payment))
        .route("/:payment_id", put(update_payment_status));

    Router::new().nest("/payments", payment_routers)
}
