use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// User administration group.
pub fn usuario_routes() -> Router<AppState> {
    Router::new()
        // GET /usuarios: listing view. POST: create.
        .route(
            "/",
            get(handlers::listar_usuarios).post(handlers::crear_usuario),
        )
        // GET /usuarios/{id}: detail view. POST: update (form post).
        .route(
            "/{id}",
            get(handlers::detalle_usuario).post(handlers::actualizar_usuario),
        )
        // POST /usuarios/{id}/eliminar
        .route("/{id}/eliminar", post(handlers::eliminar_usuario))
}
