use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Identity flow: registration, login (issues the session token), logout.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        // GET /auth/registro: registration form.
        // POST /auth/registro: create the account, redirect to /login.
        .route(
            "/registro",
            get(handlers::registro_page).post(handlers::registrar),
        )
        // POST /auth/login: verify credentials, store user + token in the
        // session, redirect to /dashboard.
        .route("/login", post(handlers::login))
        // GET /auth/logout: destroy the session.
        .route("/logout", get(handlers::logout))
}
