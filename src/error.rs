use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-level failures surfaced by handlers.
///
/// Internal variants are logged with their details server-side and masked
/// behind the fixed generic body; the caller only ever sees status plus
/// plain text.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("recurso no encontrado")]
    NoEncontrado,
    #[error("error de base de datos: {0}")]
    Interno(#[from] sqlx::Error),
    #[error("error de sesión: {0}")]
    Sesion(#[from] tower_sessions::session::Error),
    #[error("error al firmar el token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("error al derivar el hash de contraseña")]
    Password,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoEncontrado => StatusCode::NOT_FOUND,
            AppError::Interno(_) | AppError::Sesion(_) | AppError::Token(_) | AppError::Password => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "fallo no manejado en un handler");
            return (status, "Algo salió mal!").into_response();
        }
        (status, "Recurso no encontrado").into_response()
    }
}

/// handle_panic
///
/// Converter for `CatchPanicLayer::custom`: any fault that unwinds out of a
/// downstream handler is recorded server-side and collapsed to the generic
/// 500 response.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detalle = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "panic sin mensaje"
    };
    tracing::error!(detalle, "panic capturado en un handler");
    (StatusCode::INTERNAL_SERVER_ERROR, "Algo salió mal!").into_response()
}
