//! Server-rendered views.
//!
//! Plain HTML assembled with `format!` and returned as [`Html`]; every page
//! goes through [`layout`], which takes the view's `title` and the session
//! user forwarded by the handler.

use axum::response::Html;

use crate::models::{DetalleCarrito, Publicacion, ResumenMercado, SessionUser, Usuario, Vehiculo};

/// Escape user-supplied text before interpolating it into markup.
pub fn escapar(texto: &str) -> String {
    texto
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// layout
///
/// Shared document shell. The navigation bar reflects the session user the
/// same way the views receive it: present means logged in.
pub fn layout(title: &str, user: Option<&SessionUser>, body: &str) -> Html<String> {
    let sesion = match user {
        Some(u) => format!(
            "<span class=\"usuario\">{}</span> <a href=\"/auth/logout\">Salir</a>",
            escapar(&u.nombre)
        ),
        None => "<a href=\"/login\">Iniciar Sesión</a>".to_string(),
    };
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<link rel=\"stylesheet\" href=\"/css/estilos.css\">\n</head>\n\
         <body>\n<nav>\n<a href=\"/\">Inicio</a>\n<a href=\"/vehiculos\">Vehículos</a>\n\
         <a href=\"/vender\">Vender</a>\n<a href=\"/carrito\">Carrito</a>\n{sesion}\n</nav>\n\
         <main>\n<h1>{title}</h1>\n{body}\n</main>\n</body>\n</html>\n",
        title = escapar(title),
        sesion = sesion,
        body = body,
    ))
}

pub fn index(user: Option<&SessionUser>) -> Html<String> {
    layout(
        "Dashboard",
        user,
        "<p>Bienvenido al mercado de vehículos.</p>\
         <p><a href=\"/vehiculos\">Ver vehículos disponibles</a></p>",
    )
}

pub fn login(user: Option<&SessionUser>, error: Option<&str>) -> Html<String> {
    let aviso = match error {
        Some(msg) => format!("<p class=\"error\">{}</p>", escapar(msg)),
        None => String::new(),
    };
    let body = format!(
        "{aviso}<form method=\"post\" action=\"/auth/login\">\
         <label>Email <input type=\"email\" name=\"email\" required></label>\
         <label>Contraseña <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Entrar</button></form>\
         <p>¿Sin cuenta? <a href=\"/auth/registro\">Regístrate</a></p>"
    );
    layout("Iniciar Sesión", user, &body)
}

pub fn registro(user: Option<&SessionUser>) -> Html<String> {
    layout(
        "Registro",
        user,
        "<form method=\"post\" action=\"/auth/registro\">\
         <label>Nombre <input name=\"nombre\" required></label>\
         <label>Email <input type=\"email\" name=\"email\" required></label>\
         <label>Contraseña <input type=\"password\" name=\"password\" required></label>\
         <button type=\"submit\">Crear cuenta</button></form>",
    )
}

pub fn dashboard(user: Option<&SessionUser>, resumen: &ResumenMercado) -> Html<String> {
    let body = format!(
        "<ul class=\"resumen\">\
         <li>Usuarios: {}</li>\
         <li>Vehículos: {}</li>\
         <li>Publicaciones: {}</li>\
         <li>Publicaciones pendientes: {}</li>\
         </ul>",
        resumen.total_usuarios,
        resumen.total_vehiculos,
        resumen.total_publicaciones,
        resumen.publicaciones_pendientes,
    );
    layout("Dashboard", user, &body)
}

pub fn vehiculos(user: Option<&SessionUser>, vehiculos: &[Vehiculo]) -> Html<String> {
    let filas: String = vehiculos
        .iter()
        .map(|v| {
            format!(
                "<tr><td><a href=\"/vehiculos/{id}\">{marca} {modelo}</a></td>\
                 <td>{anio}</td><td>${precio:.2}</td>\
                 <td><form method=\"post\" action=\"/carrito/agregar/{id}\">\
                 <button type=\"submit\">Al carrito</button></form></td></tr>",
                id = v.id,
                marca = escapar(&v.marca),
                modelo = escapar(&v.modelo),
                anio = v.anio,
                precio = v.precio,
            )
        })
        .collect();
    let body = format!(
        "<table><thead><tr><th>Vehículo</th><th>Año</th><th>Precio</th><th></th></tr></thead>\
         <tbody>{filas}</tbody></table>"
    );
    layout("Vehículos", user, &body)
}

pub fn vehiculo_detalle(user: Option<&SessionUser>, vehiculo: &Vehiculo) -> Html<String> {
    let body = format!(
        "<article class=\"vehiculo\">\
         <h2>{marca} {modelo} ({anio})</h2>\
         <p class=\"precio\">${precio:.2}</p>\
         <p>{descripcion}</p>\
         <form method=\"post\" action=\"/carrito/agregar/{id}\">\
         <button type=\"submit\">Agregar al carrito</button></form>\
         </article>",
        id = vehiculo.id,
        marca = escapar(&vehiculo.marca),
        modelo = escapar(&vehiculo.modelo),
        anio = vehiculo.anio,
        precio = vehiculo.precio,
        descripcion = escapar(&vehiculo.descripcion),
    );
    layout("Detalle del Vehículo", user, &body)
}

pub fn usuarios(user: Option<&SessionUser>, usuarios: &[Usuario]) -> Html<String> {
    let filas: String = usuarios
        .iter()
        .map(|u| {
            format!(
                "<tr><td><a href=\"/usuarios/{id}\">{nombre}</a></td><td>{email}</td>\
                 <td>{rol}</td></tr>",
                id = u.id,
                nombre = escapar(&u.nombre),
                email = escapar(&u.email),
                rol = if u.es_admin { "admin" } else { "usuario" },
            )
        })
        .collect();
    let body = format!(
        "<table><thead><tr><th>Nombre</th><th>Email</th><th>Rol</th></tr></thead>\
         <tbody>{filas}</tbody></table>"
    );
    layout("Usuarios", user, &body)
}

pub fn usuario_detalle(user: Option<&SessionUser>, usuario: &Usuario) -> Html<String> {
    let body = format!(
        "<dl><dt>Nombre</dt><dd>{nombre}</dd><dt>Email</dt><dd>{email}</dd>\
         <dt>Rol</dt><dd>{rol}</dd></dl>",
        nombre = escapar(&usuario.nombre),
        email = escapar(&usuario.email),
        rol = if usuario.es_admin { "admin" } else { "usuario" },
    );
    layout("Usuario", user, &body)
}

pub fn carrito(user: Option<&SessionUser>, items: &[DetalleCarrito]) -> Html<String> {
    if items.is_empty() {
        return layout("Carrito", user, "<p>Tu carrito está vacío.</p>");
    }
    let total: f64 = items.iter().map(|i| i.precio).sum();
    let filas: String = items
        .iter()
        .map(|i| {
            format!(
                "<tr><td>{marca} {modelo} ({anio})</td><td>${precio:.2}</td>\
                 <td><form method=\"post\" action=\"/carrito/quitar/{item_id}\">\
                 <button type=\"submit\">Quitar</button></form></td></tr>",
                marca = escapar(&i.marca),
                modelo = escapar(&i.modelo),
                anio = i.anio,
                precio = i.precio,
                item_id = i.item_id,
            )
        })
        .collect();
    let body = format!(
        "<table><tbody>{filas}</tbody></table>\
         <p class=\"total\">Total: ${total:.2}</p>\
         <form method=\"post\" action=\"/carrito/vaciar\">\
         <button type=\"submit\">Vaciar carrito</button></form>"
    );
    layout("Carrito", user, &body)
}

pub fn vender(user: Option<&SessionUser>) -> Html<String> {
    layout(
        "Vender",
        user,
        "<form method=\"post\" action=\"/vender\">\
         <label>Marca <input name=\"marca\" required></label>\
         <label>Modelo <input name=\"modelo\" required></label>\
         <label>Año <input type=\"number\" name=\"anio\" required></label>\
         <label>Precio <input type=\"number\" step=\"0.01\" name=\"precio\" required></label>\
         <label>Descripción <textarea name=\"descripcion\"></textarea></label>\
         <button type=\"submit\">Publicar venta</button></form>",
    )
}

pub fn publicar(user: Option<&SessionUser>, vehiculos: &[Vehiculo]) -> Html<String> {
    let opciones: String = vehiculos
        .iter()
        .map(|v| {
            format!(
                "<option value=\"{id}\">{marca} {modelo} ({anio})</option>",
                id = v.id,
                marca = escapar(&v.marca),
                modelo = escapar(&v.modelo),
                anio = v.anio,
            )
        })
        .collect();
    let body = format!(
        "<form method=\"post\" action=\"/publicar\">\
         <label>Vehículo <select name=\"vehiculo_id\" required>{opciones}</select></label>\
         <label>Título <input name=\"titulo\" required></label>\
         <label>Descripción <textarea name=\"descripcion\"></textarea></label>\
         <button type=\"submit\">Enviar a revisión</button></form>"
    );
    layout("Publicar", user, &body)
}

pub fn publicaciones(user: Option<&SessionUser>, publicaciones: &[Publicacion]) -> Html<String> {
    let filas: String = publicaciones
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{titulo}</td><td>{estado}</td>\
                 <td><form method=\"post\" action=\"/publicaciones/{id}/estado\">\
                 <input type=\"hidden\" name=\"estado\" value=\"aprobada\">\
                 <button type=\"submit\">Aprobar</button></form>\
                 <form method=\"post\" action=\"/publicaciones/{id}/estado\">\
                 <input type=\"hidden\" name=\"estado\" value=\"rechazada\">\
                 <button type=\"submit\">Rechazar</button></form>\
                 <form method=\"post\" action=\"/publicaciones/{id}/eliminar\">\
                 <button type=\"submit\">Eliminar</button></form></td></tr>",
                id = p.id,
                titulo = escapar(&p.titulo),
                estado = escapar(&p.estado),
            )
        })
        .collect();
    let body = format!(
        "<table><thead><tr><th>Título</th><th>Estado</th><th>Acciones</th></tr></thead>\
         <tbody>{filas}</tbody></table>"
    );
    layout("Publicaciones", user, &body)
}
