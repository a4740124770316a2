use crate::models::{
    DetalleCarrito, Publicacion, PublicacionForm, ResumenMercado, Usuario, Vehiculo, VehiculoForm,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository
///
/// Abstract contract for all persistence operations, so handlers never see
/// the concrete backend. Read paths degrade to empty results on database
/// failure (logged server-side); write paths propagate the error to the
/// caller, where it surfaces as the generic 500 response.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Usuarios ---
    async fn list_usuarios(&self) -> Vec<Usuario>;
    async fn get_usuario(&self, id: Uuid) -> Option<Usuario>;
    async fn get_usuario_por_email(&self, email: &str) -> Option<Usuario>;
    async fn create_usuario(
        &self,
        nombre: String,
        email: String,
        password_hash: String,
        es_admin: bool,
    ) -> Result<Usuario, sqlx::Error>;
    // Password only changes when a new hash is supplied.
    async fn update_usuario(
        &self,
        id: Uuid,
        nombre: String,
        email: String,
        password_hash: Option<String>,
    ) -> Result<Option<Usuario>, sqlx::Error>;
    async fn delete_usuario(&self, id: Uuid) -> bool;

    // --- Vehiculos ---
    // Public listing: unsold vehicles only.
    async fn list_vehiculos(&self) -> Vec<Vehiculo>;
    async fn list_vehiculos_de(&self, usuario_id: Uuid) -> Vec<Vehiculo>;
    async fn get_vehiculo(&self, id: Uuid) -> Option<Vehiculo>;
    async fn create_vehiculo(
        &self,
        usuario_id: Uuid,
        form: VehiculoForm,
    ) -> Result<Vehiculo, sqlx::Error>;
    // Owner-only: updates only rows whose usuario_id matches.
    async fn update_vehiculo(
        &self,
        id: Uuid,
        usuario_id: Uuid,
        form: VehiculoForm,
    ) -> Result<Option<Vehiculo>, sqlx::Error>;
    // Owner-only.
    async fn delete_vehiculo(&self, id: Uuid, usuario_id: Uuid) -> bool;

    // --- Carrito ---
    async fn get_carrito(&self, usuario_id: Uuid) -> Vec<DetalleCarrito>;
    // Idempotent: returns true only when a new row was inserted.
    async fn add_al_carrito(&self, usuario_id: Uuid, vehiculo_id: Uuid) -> bool;
    async fn remove_del_carrito(&self, item_id: Uuid, usuario_id: Uuid) -> bool;
    async fn vaciar_carrito(&self, usuario_id: Uuid) -> bool;

    // --- Publicaciones ---
    // Administrative listing: every estado, pending first.
    async fn list_publicaciones(&self) -> Vec<Publicacion>;
    async fn create_publicacion(
        &self,
        usuario_id: Uuid,
        form: PublicacionForm,
    ) -> Result<Publicacion, sqlx::Error>;
    async fn set_estado_publicacion(&self, id: Uuid, estado: String) -> Option<Publicacion>;
    async fn delete_publicacion(&self, id: Uuid) -> bool;

    // --- Dashboard ---
    async fn get_resumen(&self) -> ResumenMercado;
}

/// Shared handle used across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const COLUMNAS_USUARIO: &str =
    "id, nombre, email, password_hash, es_admin, created_at, updated_at";
const COLUMNAS_VEHICULO: &str =
    "id, usuario_id, marca, modelo, anio, precio, descripcion, vendido, created_at, updated_at";
const COLUMNAS_PUBLICACION: &str =
    "id, vehiculo_id, usuario_id, titulo, descripcion, estado, created_at, updated_at";

/// PostgresRepository
///
/// Concrete implementation backed by the PostgreSQL pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn list_usuarios(&self) -> Vec<Usuario> {
        let sql = format!("SELECT {COLUMNAS_USUARIO} FROM usuarios ORDER BY created_at DESC");
        match sqlx::query_as::<_, Usuario>(&sql).fetch_all(&self.pool).await {
            Ok(usuarios) => usuarios,
            Err(e) => {
                tracing::error!("list_usuarios error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_usuario(&self, id: Uuid) -> Option<Usuario> {
        let sql = format!("SELECT {COLUMNAS_USUARIO} FROM usuarios WHERE id = $1");
        sqlx::query_as::<_, Usuario>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_usuario error: {:?}", e);
                None
            })
    }

    async fn get_usuario_por_email(&self, email: &str) -> Option<Usuario> {
        let sql = format!("SELECT {COLUMNAS_USUARIO} FROM usuarios WHERE email = $1");
        sqlx::query_as::<_, Usuario>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_usuario_por_email error: {:?}", e);
                None
            })
    }

    async fn create_usuario(
        &self,
        nombre: String,
        email: String,
        password_hash: String,
        es_admin: bool,
    ) -> Result<Usuario, sqlx::Error> {
        let sql = format!(
            "INSERT INTO usuarios (id, nombre, email, password_hash, es_admin, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {COLUMNAS_USUARIO}"
        );
        sqlx::query_as::<_, Usuario>(&sql)
            .bind(Uuid::new_v4())
            .bind(nombre)
            .bind(email)
            .bind(password_hash)
            .bind(es_admin)
            .fetch_one(&self.pool)
            .await
    }

    async fn update_usuario(
        &self,
        id: Uuid,
        nombre: String,
        email: String,
        password_hash: Option<String>,
    ) -> Result<Option<Usuario>, sqlx::Error> {
        let sql = format!(
            "UPDATE usuarios SET nombre = $2, email = $3, \
             password_hash = COALESCE($4, password_hash), updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNAS_USUARIO}"
        );
        sqlx::query_as::<_, Usuario>(&sql)
            .bind(id)
            .bind(nombre)
            .bind(email)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_usuario(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_usuario error: {:?}", e);
                false
            }
        }
    }

    async fn list_vehiculos(&self) -> Vec<Vehiculo> {
        let sql = format!(
            "SELECT {COLUMNAS_VEHICULO} FROM vehiculos WHERE vendido = false \
             ORDER BY created_at DESC"
        );
        match sqlx::query_as::<_, Vehiculo>(&sql).fetch_all(&self.pool).await {
            Ok(vehiculos) => vehiculos,
            Err(e) => {
                tracing::error!("list_vehiculos error: {:?}", e);
                vec![]
            }
        }
    }

    async fn list_vehiculos_de(&self, usuario_id: Uuid) -> Vec<Vehiculo> {
        let sql = format!(
            "SELECT {COLUMNAS_VEHICULO} FROM vehiculos WHERE usuario_id = $1 \
             ORDER BY created_at DESC"
        );
        match sqlx::query_as::<_, Vehiculo>(&sql)
            .bind(usuario_id)
            .fetch_all(&self.pool)
            .await
        {
            Ok(vehiculos) => vehiculos,
            Err(e) => {
                tracing::error!("list_vehiculos_de error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_vehiculo(&self, id: Uuid) -> Option<Vehiculo> {
        let sql = format!("SELECT {COLUMNAS_VEHICULO} FROM vehiculos WHERE id = $1");
        sqlx::query_as::<_, Vehiculo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_vehiculo error: {:?}", e);
                None
            })
    }

    async fn create_vehiculo(
        &self,
        usuario_id: Uuid,
        form: VehiculoForm,
    ) -> Result<Vehiculo, sqlx::Error> {
        let sql = format!(
            "INSERT INTO vehiculos (id, usuario_id, marca, modelo, anio, precio, descripcion, vendido, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, false, NOW(), NOW()) RETURNING {COLUMNAS_VEHICULO}"
        );
        sqlx::query_as::<_, Vehiculo>(&sql)
            .bind(Uuid::new_v4())
            .bind(usuario_id)
            .bind(form.marca)
            .bind(form.modelo)
            .bind(form.anio)
            .bind(form.precio)
            .bind(form.descripcion)
            .fetch_one(&self.pool)
            .await
    }

    async fn update_vehiculo(
        &self,
        id: Uuid,
        usuario_id: Uuid,
        form: VehiculoForm,
    ) -> Result<Option<Vehiculo>, sqlx::Error> {
        let sql = format!(
            "UPDATE vehiculos SET marca = $3, modelo = $4, anio = $5, precio = $6, \
             descripcion = $7, updated_at = NOW() \
             WHERE id = $1 AND usuario_id = $2 RETURNING {COLUMNAS_VEHICULO}"
        );
        sqlx::query_as::<_, Vehiculo>(&sql)
            .bind(id)
            .bind(usuario_id)
            .bind(form.marca)
            .bind(form.modelo)
            .bind(form.anio)
            .bind(form.precio)
            .bind(form.descripcion)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_vehiculo(&self, id: Uuid, usuario_id: Uuid) -> bool {
        match sqlx::query("DELETE FROM vehiculos WHERE id = $1 AND usuario_id = $2")
            .bind(id)
            .bind(usuario_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_vehiculo error: {:?}", e);
                false
            }
        }
    }

    async fn get_carrito(&self, usuario_id: Uuid) -> Vec<DetalleCarrito> {
        let sql = "SELECT c.id AS item_id, v.id AS vehiculo_id, v.marca, v.modelo, v.anio, v.precio \
                   FROM carrito_items c JOIN vehiculos v ON c.vehiculo_id = v.id \
                   WHERE c.usuario_id = $1 ORDER BY c.created_at ASC";
        match sqlx::query_as::<_, DetalleCarrito>(sql)
            .bind(usuario_id)
            .fetch_all(&self.pool)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("get_carrito error: {:?}", e);
                vec![]
            }
        }
    }

    async fn add_al_carrito(&self, usuario_id: Uuid, vehiculo_id: Uuid) -> bool {
        let result = sqlx::query(
            "INSERT INTO carrito_items (id, usuario_id, vehiculo_id) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(usuario_id)
        .bind(vehiculo_id)
        .execute(&self.pool)
        .await;
        match result {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                // A repeated add is not an error; only database failures land here.
                tracing::error!("add_al_carrito error: {:?}", e);
                false
            }
        }
    }

    async fn remove_del_carrito(&self, item_id: Uuid, usuario_id: Uuid) -> bool {
        match sqlx::query("DELETE FROM carrito_items WHERE id = $1 AND usuario_id = $2")
            .bind(item_id)
            .bind(usuario_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("remove_del_carrito error: {:?}", e);
                false
            }
        }
    }

    async fn vaciar_carrito(&self, usuario_id: Uuid) -> bool {
        match sqlx::query("DELETE FROM carrito_items WHERE usuario_id = $1")
            .bind(usuario_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("vaciar_carrito error: {:?}", e);
                false
            }
        }
    }

    async fn list_publicaciones(&self) -> Vec<Publicacion> {
        let sql = format!(
            "SELECT {COLUMNAS_PUBLICACION} FROM publicaciones \
             ORDER BY (estado = 'pendiente') DESC, created_at DESC"
        );
        match sqlx::query_as::<_, Publicacion>(&sql).fetch_all(&self.pool).await {
            Ok(publicaciones) => publicaciones,
            Err(e) => {
                tracing::error!("list_publicaciones error: {:?}", e);
                vec![]
            }
        }
    }

    async fn create_publicacion(
        &self,
        usuario_id: Uuid,
        form: PublicacionForm,
    ) -> Result<Publicacion, sqlx::Error> {
        let sql = format!(
            "INSERT INTO publicaciones (id, vehiculo_id, usuario_id, titulo, descripcion, estado, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, 'pendiente', NOW(), NOW()) RETURNING {COLUMNAS_PUBLICACION}"
        );
        sqlx::query_as::<_, Publicacion>(&sql)
            .bind(Uuid::new_v4())
            .bind(form.vehiculo_id)
            .bind(usuario_id)
            .bind(form.titulo)
            .bind(form.descripcion)
            .fetch_one(&self.pool)
            .await
    }

    async fn set_estado_publicacion(&self, id: Uuid, estado: String) -> Option<Publicacion> {
        let sql = format!(
            "UPDATE publicaciones SET estado = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNAS_PUBLICACION}"
        );
        sqlx::query_as::<_, Publicacion>(&sql)
            .bind(id)
            .bind(estado)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("set_estado_publicacion error: {:?}", e);
                None
            })
    }

    async fn delete_publicacion(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM publicaciones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_publicacion error: {:?}", e);
                false
            }
        }
    }

    async fn get_resumen(&self) -> ResumenMercado {
        let total_usuarios = contar(&self.pool, "SELECT COUNT(*) FROM usuarios").await;
        let total_vehiculos = contar(&self.pool, "SELECT COUNT(*) FROM vehiculos").await;
        let total_publicaciones = contar(&self.pool, "SELECT COUNT(*) FROM publicaciones").await;
        let publicaciones_pendientes = contar(
            &self.pool,
            "SELECT COUNT(*) FROM publicaciones WHERE estado = 'pendiente'",
        )
        .await;
        ResumenMercado {
            total_usuarios,
            total_vehiculos,
            total_publicaciones,
            publicaciones_pendientes,
        }
    }
}

async fn contar(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("contar error ({sql}): {:?}", e);
            0
        })
}
