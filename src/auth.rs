use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{config::AppConfig, error::AppError, models::Usuario};

/// Session key holding the signed token for the logged-in browser.
pub const SESSION_TOKEN_KEY: &str = "token";
/// Session key holding the `SessionUser` projection forwarded to views.
pub const SESSION_USER_KEY: &str = "user";

/// Lifetime of an issued token, in seconds.
const TOKEN_TTL_SECS: u64 = 60 * 60 * 24;

/// Claims
///
/// Payload of the signed session token. `sub` identifies the user;
/// `isAdmin` is the only authorization claim the gate consults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's UUID.
    pub sub: Uuid,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    /// Expiration time, seconds since the epoch. Tokens past it fail
    /// verification.
    pub exp: usize,
    /// Issued-at, seconds since the epoch.
    pub iat: usize,
}

/// GateRejection
///
/// Terminal outcome of a gate stage. Each variant carries a fixed status and
/// a fixed plain-text body; none is retried within the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// The session carries no token at all.
    MissingToken,
    /// A token is present but malformed, expired, or wrongly signed.
    InvalidToken,
    /// The verified credential lacks a truthy `isAdmin` claim.
    Forbidden,
}

impl GateRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            GateRejection::MissingToken => StatusCode::UNAUTHORIZED,
            GateRejection::InvalidToken => StatusCode::BAD_REQUEST,
            GateRejection::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    pub fn mensaje(&self) -> &'static str {
        match self {
            GateRejection::MissingToken => "Acceso denegado. No se proporcionó un token.",
            GateRejection::InvalidToken => "Token no válido.",
            GateRejection::Forbidden => {
                "Acceso denegado. No tienes permiso para realizar esta acción."
            }
        }
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        (self.status(), self.mensaje()).into_response()
    }
}

// --- Gate stages (pure) ---

/// authenticate
///
/// First gate stage. Inspects the session's token field and verifies it
/// against the configured secret. Every verification failure is terminal;
/// there is no refresh path.
pub fn authenticate(token: Option<&str>, secret: &str) -> Result<Claims, GateRejection> {
    let token = token.ok_or(GateRejection::MissingToken)?;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| GateRejection::InvalidToken)
}

/// authorize
///
/// Second gate stage. Passes only a request that already carries a verified
/// credential whose `isAdmin` claim is truthy.
pub fn authorize(claims: Option<&Claims>) -> Result<(), GateRejection> {
    match claims {
        Some(claims) if claims.is_admin => Ok(()),
        _ => Err(GateRejection::Forbidden),
    }
}

// --- Middleware adapters ---

/// require_token
///
/// Authentication middleware for the gated group. Reads the session token,
/// runs [`authenticate`], and on success attaches the decoded [`Claims`] to
/// the request extensions before continuing. The claims key is distinct from
/// the session's `user` entry.
pub async fn require_token(
    State(config): State<AppConfig>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match session.get::<String>(SESSION_TOKEN_KEY).await {
        Ok(token) => token,
        Err(err) => return AppError::Sesion(err).into_response(),
    };

    match authenticate(token.as_deref(), &config.jwt_secret) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(rejection) => rejection.into_response(),
    }
}

/// require_admin
///
/// Authorization middleware. Only meaningful behind [`require_token`], which
/// is the sole writer of the `Claims` extension.
pub async fn require_admin(request: Request, next: Next) -> Response {
    match authorize(request.extensions().get::<Claims>()) {
        Ok(()) => next.run(request).await,
        Err(rejection) => rejection.into_response(),
    }
}

// --- Token issuance ---

/// issue_token
///
/// Signs a token for a freshly authenticated user. Stored in the session by
/// the login handler; the gate re-verifies it on every gated request.
pub fn issue_token(usuario: &Usuario, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let claims = Claims {
        sub: usuario.id,
        is_admin: usuario.es_admin,
        iat: now as usize,
        exp: (now + TOKEN_TTL_SECS) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

// --- Passwords ---

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a password against a stored hash. An unparseable hash counts as a
/// mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
