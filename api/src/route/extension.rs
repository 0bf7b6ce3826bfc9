use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::extension::{register_extension, show_extension_list};

pub fn build_extension_routers() -> Router<AppRegistry> {
    let extension_routers = Router::new()
        .route("/", post(register_extension))
        .route("/:reservation_id", get(show_extension_list));

    Router::new().nest("/extensions", extension_routers)
}
