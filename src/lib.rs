use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod views;

// Route tables, one module per URL prefix.
pub mod routes;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, handle_panic};
pub use repository::{PostgresRepository, RepositoryState};

/// AppState
///
/// The single shared container for all request-handling dependencies. Cloned
/// per request; both members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Persistence access behind the repository trait.
    pub repo: RepositoryState,
    /// Immutable startup configuration (includes the gate's JWT secret).
    pub config: AppConfig,
}

// Sub-state extraction for handlers and middleware that only need one
// component of the state.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure: fixed pages, the seven route groups,
/// the two-stage Auth Gate in front of `/publicaciones` only, the session
/// layer, observability layers, the panic-to-500 converter, and the
/// static-file fallback.
pub fn create_router(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.config.env == config::Env::Production);

    let x_request_id = HeaderName::from_static("x-request-id");

    // Authentication must run before authorization. Later `route_layer`
    // calls wrap earlier ones, so `require_token` is added last.
    let publicaciones = routes::publicaciones::publicaciones_routes()
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    let base_router = Router::new()
        // Fixed top-level pages. /vehiculos lives inside its group: the
        // group's index route renders the same fixed view.
        .route("/", axum::routing::get(handlers::index_page))
        .route("/login", axum::routing::get(handlers::login_page))
        .route("/dashboard", axum::routing::get(handlers::dashboard_page))
        .route("/health", axum::routing::get(handlers::health))
        // Route groups. Only /publicaciones passes through the gate.
        .nest("/auth", routes::auth::auth_routes())
        .nest("/usuarios", routes::usuarios::usuario_routes())
        .nest("/vehiculos", routes::vehiculos::vehiculo_routes())
        .nest("/carrito", routes::carrito::carrito_routes())
        .nest("/vender", routes::vender::vender_routes())
        .nest("/publicar", routes::publicar::publicar_routes())
        .nest("/publicaciones", publicaciones)
        // Static-file short-circuit for anything unmatched.
        .fallback_service(ServeDir::new("public"))
        .with_state(state);

    base_router
        // Sessions must be attached before any gate middleware runs.
        .layer(session_layer)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // Outermost: any fault that unwinds becomes the fixed 500 response.
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`; carries the request id so every log line
/// of a request correlates.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
