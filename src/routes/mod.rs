/// Route tables, one module per URL prefix of the application.
///
/// Every group is reachable without the gate except `publicaciones`, which
/// `create_router` wraps with the two-stage Auth Gate (authentication, then
/// authorization) before nesting it.
pub mod auth;
pub mod carrito;
pub mod publicaciones;
pub mod publicar;
pub mod usuarios;
pub mod vehiculos;
pub mod vender;
