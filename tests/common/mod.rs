//! Shared test scaffolding: an in-memory `Repository` and request helpers.
//! Everything runs against the router in-process; no database or network.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::Utc;
use mercado_motor::{
    AppState,
    config::AppConfig,
    models::{
        DetalleCarrito, Publicacion, PublicacionForm, ResumenMercado, Usuario, Vehiculo,
        VehiculoForm,
    },
    repository::{Repository, RepositoryState},
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory repository backing the handler tests. Keeps just enough
/// behavior (ownership checks, cart uniqueness) for the flows under test.
#[derive(Default)]
pub struct MockRepo {
    pub usuarios: Mutex<Vec<Usuario>>,
    pub vehiculos: Mutex<Vec<Vehiculo>>,
    pub carrito: Mutex<Vec<(Uuid, Uuid, Uuid)>>, // (item_id, usuario_id, vehiculo_id)
    pub publicaciones: Mutex<Vec<Publicacion>>,
}

impl MockRepo {
    pub fn con_usuario(usuario: Usuario) -> Self {
        let repo = Self::default();
        repo.usuarios.lock().unwrap().push(usuario);
        repo
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn list_usuarios(&self) -> Vec<Usuario> {
        self.usuarios.lock().unwrap().clone()
    }

    async fn get_usuario(&self, id: Uuid) -> Option<Usuario> {
        self.usuarios.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    async fn get_usuario_por_email(&self, email: &str) -> Option<Usuario> {
        self.usuarios
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    async fn create_usuario(
        &self,
        nombre: String,
        email: String,
        password_hash: String,
        es_admin: bool,
    ) -> Result<Usuario, sqlx::Error> {
        let usuario = Usuario {
            id: Uuid::new_v4(),
            nombre,
            email,
            password_hash,
            es_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.usuarios.lock().unwrap().push(usuario.clone());
        Ok(usuario)
    }

    async fn update_usuario(
        &self,
        id: Uuid,
        nombre: String,
        email: String,
        password_hash: Option<String>,
    ) -> Result<Option<Usuario>, sqlx::Error> {
        let mut usuarios = self.usuarios.lock().unwrap();
        let Some(usuario) = usuarios.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        usuario.nombre = nombre;
        usuario.email = email;
        if let Some(hash) = password_hash {
            usuario.password_hash = hash;
        }
        usuario.updated_at = Utc::now();
        Ok(Some(usuario.clone()))
    }

    async fn delete_usuario(&self, id: Uuid) -> bool {
        let mut usuarios = self.usuarios.lock().unwrap();
        let antes = usuarios.len();
        usuarios.retain(|u| u.id != id);
        usuarios.len() < antes
    }

    async fn list_vehiculos(&self) -> Vec<Vehiculo> {
        self.vehiculos
            .lock()
            .unwrap()
            .iter()
            .filter(|v| !v.vendido)
            .cloned()
            .collect()
    }

    async fn list_vehiculos_de(&self, usuario_id: Uuid) -> Vec<Vehiculo> {
        self.vehiculos
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.usuario_id == usuario_id)
            .cloned()
            .collect()
    }

    async fn get_vehiculo(&self, id: Uuid) -> Option<Vehiculo> {
        self.vehiculos.lock().unwrap().iter().find(|v| v.id == id).cloned()
    }

    async fn create_vehiculo(
        &self,
        usuario_id: Uuid,
        form: VehiculoForm,
    ) -> Result<Vehiculo, sqlx::Error> {
        let vehiculo = Vehiculo {
            id: Uuid::new_v4(),
            usuario_id,
            marca: form.marca,
            modelo: form.modelo,
            anio: form.anio,
            precio: form.precio,
            descripcion: form.descripcion,
            vendido: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.vehiculos.lock().unwrap().push(vehiculo.clone());
        Ok(vehiculo)
    }

    async fn update_vehiculo(
        &self,
        id: Uuid,
        usuario_id: Uuid,
        form: VehiculoForm,
    ) -> Result<Option<Vehiculo>, sqlx::Error> {
        let mut vehiculos = self.vehiculos.lock().unwrap();
        let Some(vehiculo) = vehiculos
            .iter_mut()
            .find(|v| v.id == id && v.usuario_id == usuario_id)
        else {
            return Ok(None);
        };
        vehiculo.marca = form.marca;
        vehiculo.modelo = form.modelo;
        vehiculo.anio = form.anio;
        vehiculo.precio = form.precio;
        vehiculo.descripcion = form.descripcion;
        vehiculo.updated_at = Utc::now();
        Ok(Some(vehiculo.clone()))
    }

    async fn delete_vehiculo(&self, id: Uuid, usuario_id: Uuid) -> bool {
        let mut vehiculos = self.vehiculos.lock().unwrap();
        let antes = vehiculos.len();
        vehiculos.retain(|v| !(v.id == id && v.usuario_id == usuario_id));
        vehiculos.len() < antes
    }

    async fn get_carrito(&self, usuario_id: Uuid) -> Vec<DetalleCarrito> {
        let carrito = self.carrito.lock().unwrap();
        let vehiculos = self.vehiculos.lock().unwrap();
        carrito
            .iter()
            .filter(|(_, u, _)| *u == usuario_id)
            .filter_map(|(item_id, _, vehiculo_id)| {
                vehiculos.iter().find(|v| v.id == *vehiculo_id).map(|v| DetalleCarrito {
                    item_id: *item_id,
                    vehiculo_id: v.id,
                    marca: v.marca.clone(),
                    modelo: v.modelo.clone(),
                    anio: v.anio,
                    precio: v.precio,
                })
            })
            .collect()
    }

    async fn add_al_carrito(&self, usuario_id: Uuid, vehiculo_id: Uuid) -> bool {
        let mut carrito = self.carrito.lock().unwrap();
        if carrito
            .iter()
            .any(|(_, u, v)| *u == usuario_id && *v == vehiculo_id)
        {
            return false;
        }
        carrito.push((Uuid::new_v4(), usuario_id, vehiculo_id));
        true
    }

    async fn remove_del_carrito(&self, item_id: Uuid, usuario_id: Uuid) -> bool {
        let mut carrito = self.carrito.lock().unwrap();
        let antes = carrito.len();
        carrito.retain(|(i, u, _)| !(*i == item_id && *u == usuario_id));
        carrito.len() < antes
    }

    async fn vaciar_carrito(&self, usuario_id: Uuid) -> bool {
        let mut carrito = self.carrito.lock().unwrap();
        let antes = carrito.len();
        carrito.retain(|(_, u, _)| *u != usuario_id);
        carrito.len() < antes
    }

    async fn list_publicaciones(&self) -> Vec<Publicacion> {
        self.publicaciones.lock().unwrap().clone()
    }

    async fn create_publicacion(
        &self,
        usuario_id: Uuid,
        form: PublicacionForm,
    ) -> Result<Publicacion, sqlx::Error> {
        let publicacion = Publicacion {
            id: Uuid::new_v4(),
            vehiculo_id: form.vehiculo_id,
            usuario_id,
            titulo: form.titulo,
            descripcion: form.descripcion,
            estado: "pendiente".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.publicaciones.lock().unwrap().push(publicacion.clone());
        Ok(publicacion)
    }

    async fn set_estado_publicacion(&self, id: Uuid, estado: String) -> Option<Publicacion> {
        let mut publicaciones = self.publicaciones.lock().unwrap();
        let publicacion = publicaciones.iter_mut().find(|p| p.id == id)?;
        publicacion.estado = estado;
        publicacion.updated_at = Utc::now();
        Some(publicacion.clone())
    }

    async fn delete_publicacion(&self, id: Uuid) -> bool {
        let mut publicaciones = self.publicaciones.lock().unwrap();
        let antes = publicaciones.len();
        publicaciones.retain(|p| p.id != id);
        publicaciones.len() < antes
    }

    async fn get_resumen(&self) -> ResumenMercado {
        let (total_publicaciones, publicaciones_pendientes) = {
            let publicaciones = self.publicaciones.lock().unwrap();
            let total = publicaciones.len() as i64;
            let pendientes = publicaciones
                .iter()
                .filter(|p| p.estado == "pendiente")
                .count() as i64;
            (total, pendientes)
        };
        ResumenMercado {
            total_usuarios: self.usuarios.lock().unwrap().len() as i64,
            total_vehiculos: self.vehiculos.lock().unwrap().len() as i64,
            total_publicaciones,
            publicaciones_pendientes,
        }
    }
}

// --- State and request helpers ---

pub fn test_state(repo: Arc<MockRepo>) -> AppState {
    AppState {
        repo: repo as RepositoryState,
        config: AppConfig::default(),
    }
}

/// Seed a user directly; the password is stored already hashed.
pub fn usuario_de_prueba(nombre: &str, email: &str, password: &str, es_admin: bool) -> Usuario {
    Usuario {
        id: Uuid::new_v4(),
        nombre: nombre.to_string(),
        email: email.to_string(),
        password_hash: mercado_motor::auth::hash_password(password).unwrap(),
        es_admin,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_con_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_post_con_cookie(uri: &str, body: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// First `Set-Cookie` value of a response, trimmed to the `name=value` pair.
pub fn cookie_de(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .expect("response did not set a session cookie")
        .to_string()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
