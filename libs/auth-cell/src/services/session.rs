use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_api::{ApiClient, Envelope};
use shared_models::auth::User;
use shared_models::error::ApiError;

use crate::models::{AuthData, AuthError};
use crate::token::TokenStore;

#[derive(Default, Clone)]
struct Session {
    user: Option<User>,
    token: Option<String>,
}

/// Owns the authenticated session: exchanges credentials for a bearer token,
/// persists it through the [`TokenStore`], and restores it on startup.
pub struct AuthService {
    api: Arc<ApiClient>,
    tokens: Arc<dyn TokenStore>,
    session: RwLock<Session>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            session: RwLock::new(Session::default()),
        }
    }

    /// Restores a previous session from the stored credential, if any. A
    /// rejected credential is removed so the next launch starts clean.
    pub async fn initialize(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.tokens.load().await? else {
            debug!("No stored credential, starting unauthenticated");
            return Ok(None);
        };

        match self
            .api
            .request::<User>(Method::GET, "/auth/user", Some(&token), None)
            .await
        {
            Ok(user) => {
                info!("Session restored for user {}", user.id);
                let mut session = self.session.write().await;
                session.user = Some(user.clone());
                session.token = Some(token);
                Ok(Some(user))
            }
            Err(e) => {
                warn!("Stored credential rejected, clearing it: {}", e);
                self.tokens.clear().await?;
                Ok(None)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let body = json!({ "email": email, "password": password });

        let envelope: Envelope<AuthData> = self
            .api
            .request(Method::POST, "/auth/login", None, Some(body))
            .await
            .map_err(|e| match e {
                ApiError::Validation { .. } => AuthError::Validation(e),
                other => AuthError::LoginFailed(other),
            })?;

        self.establish(envelope.data).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let body = json!({ "name": name, "email": email, "password": password });

        let envelope: Envelope<AuthData> = self
            .api
            .request(Method::POST, "/auth/register", None, Some(body))
            .await
            .map_err(|e| match e {
                ApiError::Validation { .. } => AuthError::Validation(e),
                other => AuthError::RegistrationFailed(other),
            })?;

        self.establish(envelope.data).await
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.tokens.clear().await?;
        *self.session.write().await = Session::default();
        info!("Session cleared");
        Ok(())
    }

    /// The bearer credential attached to every authenticated request.
    pub async fn token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    async fn establish(&self, data: AuthData) -> Result<User, AuthError> {
        self.tokens.save(&data.token).await?;

        let mut session = self.session.write().await;
        session.token = Some(data.token);
        session.user = Some(data.user.clone());
        info!("Authenticated as user {}", data.user.id);

        Ok(data.user)
    }
}
