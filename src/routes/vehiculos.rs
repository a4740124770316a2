use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Vehicle group. The index route is also the fixed `/vehiculos` page
/// (view `vehiculos`, title "Vehículos").
pub fn vehiculo_routes() -> Router<AppState> {
    Router::new()
        // GET /vehiculos: listing view. POST: create (logged-in seller).
        .route(
            "/",
            get(handlers::listado_vehiculos).post(handlers::crear_vehiculo),
        )
        // GET /vehiculos/{id}: detail view. POST: owner-only update.
        .route(
            "/{id}",
            get(handlers::detalle_vehiculo).post(handlers::actualizar_vehiculo),
        )
        // POST /vehiculos/{id}/eliminar: owner-only delete.
        .route("/{id}/eliminar", post(handlers::eliminar_vehiculo))
}
