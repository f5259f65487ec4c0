use serde::Deserialize;
use thiserror::Error;

use shared_models::auth::User;
use shared_models::error::ApiError;

/// Payload under `data` for both login and register.
#[derive(Debug, Deserialize)]
pub struct AuthData {
    pub token: String,
    pub user: User,
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// Field-level validation failure, passed through so forms can map
    /// messages onto inputs.
    #[error("{0}")]
    Validation(ApiError),

    #[error("Login failed")]
    LoginFailed(#[source] ApiError),

    #[error("Registration failed")]
    RegistrationFailed(#[source] ApiError),

    #[error("Credential storage error: {0}")]
    TokenStore(#[from] anyhow::Error),
}

impl AuthError {
    pub fn field_errors(&self) -> Option<&std::collections::HashMap<String, String>> {
        match self {
            AuthError::Validation(api) => api.field_errors(),
            _ => None,
        }
    }
}
