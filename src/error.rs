// Client-side error types
//
// Transport and HTTP failures are absorbed by the table controller (logged,
// prior state retained); only the auth flows surface them to callers.

/// Errors raised by the remote API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to '{path}' failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("'{path}' returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("invalid response body from '{path}': {detail}")]
    InvalidBody { path: String, detail: String },

    #[error("invalid API base URL '{0}'")]
    BadBaseUrl(String),
}

impl ApiError {
    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised by the authentication flows (login, registration, reset).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("credenciales inválidas")]
    InvalidCredentials,

    #[error("malformed session payload: {0}")]
    MalformedSession(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Collapse a 401/403 on the login endpoint into a credentials failure.
    pub(crate) fn from_login(err: ApiError) -> Self {
        match err.status() {
            Some(401) | Some(403) => AuthError::InvalidCredentials,
            _ => AuthError::Api(err),
        }
    }
}
