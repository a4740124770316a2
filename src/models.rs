use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Usuario
///
/// Canonical identity record from the `usuarios` table. `es_admin` is the
/// single authorization flag carried into the signed token at login.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Usuario {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    /// Argon2 hash; never serialized out of the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub es_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vehiculo
///
/// A vehicle offered on the marketplace, owned by its seller (`usuario_id`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Vehiculo {
    pub id: Uuid,
    // FK usuarios.id (vendedor).
    pub usuario_id: Uuid,
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub precio: f64,
    pub descripcion: String,
    pub vendido: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DetalleCarrito
///
/// Cart row joined with the vehicle it references, ready for the cart view.
/// The underlying (usuario, vehiculo) pair is unique, so adding the same
/// vehicle twice is a no-op at the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct DetalleCarrito {
    pub item_id: Uuid,
    pub vehiculo_id: Uuid,
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub precio: f64,
}

/// Publicacion
///
/// A listing submitted for moderation. `estado` moves from `pendiente` to
/// `aprobada` or `rechazada` through the admin-only group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Publicacion {
    pub id: Uuid,
    pub vehiculo_id: Uuid,
    pub usuario_id: Uuid,
    pub titulo: String,
    pub descripcion: String,
    pub estado: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SessionUser
///
/// The projection of a logged-in user stored in the per-browser session and
/// forwarded to every rendered view. The password hash never enters the
/// session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionUser {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    pub es_admin: bool,
}

impl From<&Usuario> for SessionUser {
    fn from(usuario: &Usuario) -> Self {
        Self {
            id: usuario.id,
            nombre: usuario.nombre.clone(),
            email: usuario.email.clone(),
            es_admin: usuario.es_admin,
        }
    }
}

// --- Form Payloads (Input Schemas) ---

/// RegistroForm
///
/// Input for POST /auth/registro. The password is hashed before it touches
/// the repository and is never logged.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RegistroForm {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

/// LoginForm
///
/// Input for POST /auth/login.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// UsuarioForm
///
/// Create/update payload for the /usuarios group.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UsuarioForm {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

/// VehiculoForm
///
/// Create/update payload for vehicles, shared by /vehiculos and /vender.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct VehiculoForm {
    pub marca: String,
    pub modelo: String,
    pub anio: i32,
    pub precio: f64,
    #[serde(default)]
    pub descripcion: String,
}

/// PublicacionForm
///
/// Input for POST /publicar. The referenced vehicle must belong to the
/// session user; the handler enforces that before inserting.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PublicacionForm {
    pub vehiculo_id: Uuid,
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
}

/// EstadoForm
///
/// Input for the admin moderation action on a publication.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EstadoForm {
    pub estado: String,
}

// --- Dashboard Schemas (Output) ---

/// ResumenMercado
///
/// Counters shown on the dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResumenMercado {
    pub total_usuarios: i64,
    pub total_vehiculos: i64,
    pub total_publicaciones: i64,
    /// Publications still waiting for moderation (`estado = 'pendiente'`).
    pub publicaciones_pendientes: i64,
}
