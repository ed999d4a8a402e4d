// Auth service - Account registration and token-based login
use std::sync::Arc;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::user_repository::UserRepository;
use crate::infrastructure::auth::{hash_password, issue_token, verify_password};
use crate::infrastructure::config::AuthSettings;

/// Successful login: a signed bearer token plus the public identity.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub token: String,
    pub expires_in_secs: i64,
    pub user_id: i64,
    pub username: String,
}

#[derive(Clone)]
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(repository: Arc<dyn UserRepository>, settings: AuthSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> ServiceResult<i64> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ServiceError::Validation(
                "username and password are required".to_string(),
            ));
        }

        if self
            .repository
            .find_user_by_username(username)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "this username is already taken".to_string(),
            ));
        }

        let password_hash = hash_password(password)
            .map_err(|err| anyhow::anyhow!("password hashing failed: {err}"))?;
        let user_id = self.repository.insert_user(username, &password_hash).await?;

        tracing::info!(user_id, username, "account registered");
        Ok(user_id)
    }

    /// Verify credentials and issue an access token. Unknown usernames
    /// and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<AuthenticatedUser> {
        let user = self
            .repository
            .find_user_by_username(username.trim())
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|err| anyhow::anyhow!("password verification failed: {err}"))?;
        if !valid {
            return Err(ServiceError::Unauthorized);
        }

        let token = issue_token(user.id, &user.username, &self.settings)
            .map_err(|err| anyhow::anyhow!("token signing failed: {err}"))?;

        Ok(AuthenticatedUser {
            token,
            expires_in_secs: self.settings.token_ttl_mins * 60,
            user_id: user.id,
            username: user.username,
        })
    }
}
