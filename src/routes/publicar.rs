use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Publication submission: pick one of the user's vehicles and send a
/// listing to moderation (`estado = 'pendiente'`).
pub fn publicar_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::publicar_page).post(handlers::crear_publicacion),
    )
}
