use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Shopping cart group. Every handler needs a session user and redirects to
/// /login otherwise.
pub fn carrito_routes() -> Router<AppState> {
    Router::new()
        // GET /carrito: cart view with totals.
        .route("/", get(handlers::ver_carrito))
        // POST /carrito/agregar/{vehiculo_id}: idempotent add.
        .route("/agregar/{vehiculo_id}", post(handlers::agregar_al_carrito))
        // POST /carrito/quitar/{item_id}
        .route("/quitar/{item_id}", post(handlers::quitar_del_carrito))
        // POST /carrito/vaciar
        .route("/vaciar", post(handlers::vaciar_carrito))
}
