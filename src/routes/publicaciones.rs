use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Administrative listings group: the only group behind the Auth Gate.
///
/// The gate itself is layered in `create_router`: authentication first
/// (session token verified, claims attached), then authorization (`isAdmin`
/// must be truthy). Handlers here can therefore assume a verified admin.
pub fn publicaciones_routes() -> Router<AppState> {
    Router::new()
        // GET /publicaciones: every publication in every estado.
        .route("/", get(handlers::listar_publicaciones))
        // POST /publicaciones/{id}/estado: aprobar / rechazar.
        .route("/{id}/estado", post(handlers::cambiar_estado_publicacion))
        // POST /publicaciones/{id}/eliminar
        .route("/{id}/eliminar", post(handlers::eliminar_publicacion))
}
