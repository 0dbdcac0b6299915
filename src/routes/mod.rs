use crate::auth::{acciones, Grant};
use crate::config;
use crate::guard::RouteGuard;
use crate::schema::{Column, ColumnKind, CrudSchema, SchemaRegistry};

/// One auto-generated admin route: a guarded generic table screen.
///
/// This crate only produces the descriptor list; registering the routes
/// with whatever router the embedder uses is their job.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub path: String,
    pub titulo: String,
    pub guard: RouteGuard,
    pub schema: CrudSchema,
}

/// Outer gate for the whole admin section: any signed-in user. The
/// per-screen guards nest inside it.
pub fn section_guard() -> RouteGuard {
    RouteGuard::authenticated()
}

/// Generate one guarded route per registry entry, in registry order.
pub fn admin_routes(registry: &SchemaRegistry) -> Vec<RouteEntry> {
    let prefix = &config::config().routes.admin_prefix;
    registry
        .iter()
        .map(|schema| RouteEntry {
            path: format!("{}/{}", prefix.trim_end_matches('/'), schema.endpoint),
            titulo: schema.titulo.clone(),
            guard: RouteGuard::require_any(vec![Grant::new(&schema.tabla, &schema.accion)]),
            schema: schema.clone(),
        })
        .collect()
}

/// The standard PQS administration screens.
pub fn default_registry() -> SchemaRegistry {
    SchemaRegistry::new(vec![
        CrudSchema {
            titulo: "Usuarios".to_string(),
            endpoint: "usuarios".to_string(),
            tabla: "usuarios".to_string(),
            accion: acciones::LEER.to_string(),
            columns: vec![
                Column::new("id", "Id"),
                Column::new("nombre", "Nombre"),
                Column::new("correo", "Correo"),
                Column::new("rol.nombre", "Rol"),
            ],
        },
        CrudSchema {
            titulo: "Roles".to_string(),
            endpoint: "roles".to_string(),
            tabla: "roles".to_string(),
            accion: acciones::LEER.to_string(),
            columns: vec![Column::new("id", "Id"), Column::new("nombre", "Nombre")],
        },
        CrudSchema {
            titulo: "Estados".to_string(),
            endpoint: "estados".to_string(),
            tabla: "estados".to_string(),
            accion: acciones::LEER.to_string(),
            columns: vec![
                Column::new("id", "Id"),
                Column::new("nombre", "Nombre"),
                Column::with_kind("color", "Color", ColumnKind::Color),
            ],
        },
        CrudSchema {
            titulo: "Tipos de Solicitud".to_string(),
            endpoint: "tipos".to_string(),
            tabla: "tipos".to_string(),
            accion: acciones::LEER.to_string(),
            columns: vec![Column::new("id", "Id"), Column::new("nombre", "Nombre")],
        },
        CrudSchema {
            titulo: "Solicitudes".to_string(),
            endpoint: "pqs".to_string(),
            tabla: "pqs".to_string(),
            accion: acciones::LEER.to_string(),
            columns: vec![
                Column::new("id", "Id"),
                Column::new("asunto", "Asunto"),
                Column::new("estado.nombre", "Estado"),
                Column::with_kind("fecha_creacion", "Fecha de Creación", ColumnKind::Date),
            ],
        },
    ])
}
