use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

mod service;

pub use service::{AuthService, LoginRequest, RegistroRequest, UsuarioSesion};

/// Well-known action names checked against grants.
pub mod acciones {
    pub const LEER: &str = "leer";
    pub const AGREGAR: &str = "agregar";
    pub const MODIFICAR: &str = "modificar";
    pub const ELIMINAR: &str = "eliminar";
}

/// One capability: the right to perform `accion` on the resource `tabla`.
///
/// Matching is exact equality on both fields - no hierarchy, no wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub tabla: String,
    pub accion: String,
}

impl Grant {
    pub fn new(tabla: impl Into<String>, accion: impl Into<String>) -> Self {
        Self { tabla: tabla.into(), accion: accion.into() }
    }
}

/// Snapshot of the authenticated session.
///
/// Duplicate grants are harmless; order is irrelevant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub token: Option<String>,
    pub permisos: Vec<Grant>,
}

impl Session {
    pub fn has_grant(&self, tabla: &str, accion: &str) -> bool {
        self.permisos.iter().any(|g| g.tabla == tabla && g.accion == accion)
    }

    pub fn holds(&self, grant: &Grant) -> bool {
        self.has_grant(&grant.tabla, &grant.accion)
    }
}

/// Shared handle to the session, injected into the guard, the table
/// controller, and the HTTP client.
///
/// Created once per signed-in user: `establish` on login, `clear` on logout.
/// Readers take a snapshot, so guards re-evaluate against the grant set
/// current at navigation time rather than a stale copy.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state as an owned snapshot.
    pub fn snapshot(&self) -> Session {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).authenticated
    }

    /// Bearer token for outgoing requests, if signed in.
    pub fn token(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).token.clone()
    }

    /// Install a fresh session after a successful login or token refresh.
    pub fn establish(&self, token: String, permisos: Vec<Grant>) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *session = Session { authenticated: true, token: Some(token), permisos };
        tracing::debug!(grants = session.permisos.len(), "session established");
    }

    /// Drop the session on logout; the handle stays usable for a later login.
    pub fn clear(&self) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *session = Session::default();
        tracing::debug!("session cleared");
    }
}
