use axum::{
    Json,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    AppState,
    auth::{self, SESSION_TOKEN_KEY, SESSION_USER_KEY},
    error::AppError,
    models::{
        EstadoForm, LoginForm, PublicacionForm, RegistroForm, SessionUser, UsuarioForm,
        VehiculoForm,
    },
    views,
};

/// Valid moderation states for a publication.
const ESTADOS: [&str; 3] = ["pendiente", "aprobada", "rechazada"];

/// Read the logged-in user from the session, if any. Views take the result
/// as-is; handlers that need an owner redirect to /login on `None`.
async fn session_user(session: &Session) -> Result<Option<SessionUser>, AppError> {
    Ok(session.get::<SessionUser>(SESSION_USER_KEY).await?)
}

// --- Fixed top-level pages ---

pub async fn index_page(session: Session) -> Result<Html<String>, AppError> {
    let user = session_user(&session).await?;
    Ok(views::index(user.as_ref()))
}

pub async fn login_page(session: Session) -> Result<Html<String>, AppError> {
    let user = session_user(&session).await?;
    Ok(views::login(user.as_ref(), None))
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let user = session_user(&session).await?;
    let resumen = state.repo.get_resumen().await;
    Ok(views::dashboard(user.as_ref(), &resumen))
}

/// Liveness probe for monitors and load balancers.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// --- /auth ---

pub async fn registro_page(session: Session) -> Result<Html<String>, AppError> {
    let user = session_user(&session).await?;
    Ok(views::registro(user.as_ref()))
}

pub async fn registrar(
    State(state): State<AppState>,
    Form(form): Form<RegistroForm>,
) -> Result<Response, AppError> {
    if state.repo.get_usuario_por_email(&form.email).await.is_some() {
        return Ok((StatusCode::CONFLICT, "El email ya está registrado.").into_response());
    }
    let hash = auth::hash_password(&form.password).map_err(|_| AppError::Password)?;
    state
        .repo
        .create_usuario(form.nombre, form.email, hash, false)
        .await?;
    Ok(Redirect::to("/login").into_response())
}

/// login
///
/// Verifies the credentials, issues the signed token, and stores both the
/// `user` projection and the `token` in the session. Failure renders the
/// login view again with a 401.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let usuario = match state.repo.get_usuario_por_email(&form.email).await {
        Some(usuario) if auth::verify_password(&form.password, &usuario.password_hash) => usuario,
        _ => {
            let pagina = views::login(None, Some("Credenciales inválidas."));
            return Ok((StatusCode::UNAUTHORIZED, pagina).into_response());
        }
    };

    let token = auth::issue_token(&usuario, &state.config.jwt_secret)?;
    session
        .insert(SESSION_USER_KEY, SessionUser::from(&usuario))
        .await?;
    session.insert(SESSION_TOKEN_KEY, token).await?;

    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn logout(session: Session) -> Result<Response, AppError> {
    session.flush().await?;
    Ok(Redirect::to("/").into_response())
}

// --- /usuarios ---

pub async fn listar_usuarios(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let user = session_user(&session).await?;
    let usuarios = state.repo.list_usuarios().await;
    Ok(views::usuarios(user.as_ref(), &usuarios))
}

pub async fn detalle_usuario(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let user = session_user(&session).await?;
    let usuario = state.repo.get_usuario(id).await.ok_or(AppError::NoEncontrado)?;
    Ok(views::usuario_detalle(user.as_ref(), &usuario))
}

pub async fn crear_usuario(
    State(state): State<AppState>,
    Form(form): Form<UsuarioForm>,
) -> Result<Response, AppError> {
    let hash = auth::hash_password(&form.password).map_err(|_| AppError::Password)?;
    state
        .repo
        .create_usuario(form.nombre, form.email, hash, false)
        .await?;
    Ok(Redirect::to("/usuarios").into_response())
}

pub async fn actualizar_usuario(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<UsuarioForm>,
) -> Result<Response, AppError> {
    // An empty password field leaves the stored hash untouched.
    let hash = if form.password.is_empty() {
        None
    } else {
        Some(auth::hash_password(&form.password).map_err(|_| AppError::Password)?)
    };
    state
        .repo
        .update_usuario(id, form.nombre, form.email, hash)
        .await?
        .ok_or(AppError::NoEncontrado)?;
    Ok(Redirect::to("/usuarios").into_response())
}

pub async fn eliminar_usuario(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if state.repo.delete_usuario(id).await {
        Ok(Redirect::to("/usuarios").into_response())
    } else {
        Err(AppError::NoEncontrado)
    }
}

// --- /vehiculos ---

pub async fn listado_vehiculos(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let user = session_user(&session).await?;
    let vehiculos = state.repo.list_vehiculos().await;
    Ok(views::vehiculos(user.as_ref(), &vehiculos))
}

pub async fn detalle_vehiculo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let user = session_user(&session).await?;
    let vehiculo = state.repo.get_vehiculo(id).await.ok_or(AppError::NoEncontrado)?;
    Ok(views::vehiculo_detalle(user.as_ref(), &vehiculo))
}

pub async fn crear_vehiculo(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<VehiculoForm>,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    state.repo.create_vehiculo(user.id, form).await?;
    Ok(Redirect::to("/vehiculos").into_response())
}

pub async fn actualizar_vehiculo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Form(form): Form<VehiculoForm>,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    // None covers both a missing vehicle and one owned by somebody else.
    state
        .repo
        .update_vehiculo(id, user.id, form)
        .await?
        .ok_or(AppError::NoEncontrado)?;
    Ok(Redirect::to("/vehiculos").into_response())
}

pub async fn eliminar_vehiculo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    if state.repo.delete_vehiculo(id, user.id).await {
        Ok(Redirect::to("/vehiculos").into_response())
    } else {
        Err(AppError::NoEncontrado)
    }
}

// --- /carrito ---

pub async fn ver_carrito(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    let items = state.repo.get_carrito(user.id).await;
    Ok(views::carrito(Some(&user), &items).into_response())
}

pub async fn agregar_al_carrito(
    State(state): State<AppState>,
    session: Session,
    Path(vehiculo_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    if state.repo.get_vehiculo(vehiculo_id).await.is_none() {
        return Err(AppError::NoEncontrado);
    }
    // Re-adding the same vehicle is a no-op.
    state.repo.add_al_carrito(user.id, vehiculo_id).await;
    Ok(Redirect::to("/carrito").into_response())
}

pub async fn quitar_del_carrito(
    State(state): State<AppState>,
    session: Session,
    Path(item_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    if state.repo.remove_del_carrito(item_id, user.id).await {
        Ok(Redirect::to("/carrito").into_response())
    } else {
        Err(AppError::NoEncontrado)
    }
}

pub async fn vaciar_carrito(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    state.repo.vaciar_carrito(user.id).await;
    Ok(Redirect::to("/carrito").into_response())
}

// --- /vender ---

pub async fn vender_page(session: Session) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    Ok(views::vender(Some(&user)).into_response())
}

pub async fn vender(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<VehiculoForm>,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    state.repo.create_vehiculo(user.id, form).await?;
    Ok(Redirect::to("/vehiculos").into_response())
}

// --- /publicar ---

pub async fn publicar_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    let vehiculos = state.repo.list_vehiculos_de(user.id).await;
    Ok(views::publicar(Some(&user), &vehiculos).into_response())
}

pub async fn crear_publicacion(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PublicacionForm>,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    let vehiculo = state
        .repo
        .get_vehiculo(form.vehiculo_id)
        .await
        .ok_or(AppError::NoEncontrado)?;
    if vehiculo.usuario_id != user.id {
        return Ok((
            StatusCode::FORBIDDEN,
            "No puedes publicar un vehículo ajeno.",
        )
            .into_response());
    }
    state.repo.create_publicacion(user.id, form).await?;
    Ok(Redirect::to("/dashboard").into_response())
}

// --- /publicaciones (admin) ---

pub async fn listar_publicaciones(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let user = session_user(&session).await?;
    let publicaciones = state.repo.list_publicaciones().await;
    Ok(views::publicaciones(user.as_ref(), &publicaciones))
}

pub async fn cambiar_estado_publicacion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<EstadoForm>,
) -> Result<Response, AppError> {
    if !ESTADOS.contains(&form.estado.as_str()) {
        return Ok((StatusCode::BAD_REQUEST, "Estado no válido.").into_response());
    }
    state
        .repo
        .set_estado_publicacion(id, form.estado)
        .await
        .ok_or(AppError::NoEncontrado)?;
    Ok(Redirect::to("/publicaciones").into_response())
}

pub async fn eliminar_publicacion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if state.repo.delete_publicacion(id).await {
        Ok(Redirect::to("/publicaciones").into_response())
    } else {
        Err(AppError::NoEncontrado)
    }
}
