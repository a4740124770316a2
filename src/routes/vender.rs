use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Sale flow: form plus submission, creating a vehicle owned by the session
/// user.
pub fn vender_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::vender_page).post(handlers::vender))
}
