use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::auth::{Grant, SessionHandle};
use crate::error::AuthError;

/// Authentication flows against the remote PQS API.
///
/// Only `login` touches the session; registration and password reset are
/// anonymous calls that leave the current session alone.
pub struct AuthService<C> {
    client: C,
    session: SessionHandle,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub correo: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegistroRequest {
    pub nombre: String,
    pub correo: String,
    pub password: String,
    pub documento: String,
}

/// Session payload returned by `auth/login`.
#[derive(Debug, Deserialize)]
pub struct UsuarioSesion {
    pub nombre: Option<String>,
    #[serde(default)]
    pub permisos: Vec<Grant>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    usuario: UsuarioSesion,
}

impl<C: ApiClient> AuthService<C> {
    pub fn new(client: C, session: SessionHandle) -> Self {
        Self { client, session }
    }

    /// Sign in and establish the shared session with the server's grants.
    pub async fn login(&self, request: &LoginRequest) -> Result<UsuarioSesion, AuthError> {
        let body = serde_json::to_value(request)
            .map_err(|e| AuthError::MalformedSession(e.to_string()))?;

        let response = self.client.post("auth/login", &body).await.map_err(AuthError::from_login)?;

        let login: LoginResponse = serde_json::from_value(response)
            .map_err(|e| AuthError::MalformedSession(e.to_string()))?;

        self.session.establish(login.token, login.usuario.permisos.clone());
        tracing::info!(usuario = ?login.usuario.nombre, "login succeeded");
        Ok(login.usuario)
    }

    /// Citizen self-registration. Does not sign the caller in.
    pub async fn register(&self, request: &RegistroRequest) -> Result<(), AuthError> {
        let body = serde_json::to_value(request)
            .map_err(|e| AuthError::MalformedSession(e.to_string()))?;
        self.client.post("auth/registro", &body).await?;
        Ok(())
    }

    /// Ask the server to mail a password-reset link.
    pub async fn request_password_reset(&self, correo: &str) -> Result<(), AuthError> {
        let body = serde_json::json!({ "correo": correo });
        self.client.post("auth/recuperar", &body).await?;
        Ok(())
    }

    /// Drop the session locally; the server keeps no session state.
    pub fn logout(&self) {
        self.session.clear();
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }
}
