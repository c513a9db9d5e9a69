//! Account registration and credential login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use defecthub_auth::jwt::{IssuedToken, JwtEncoder};
use defecthub_auth::password::{PasswordHasher, PasswordValidator};
use defecthub_core::config::AuthConfig;
use defecthub_core::error::{AppError, ErrorKind};
use defecthub_core::result::AppResult;
use defecthub_database::store::UserStore;
use defecthub_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// Data for creating an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Signed bearer token.
    pub token: IssuedToken,
    /// The authenticated user.
    pub user: User,
}

/// Handles registration, login and identity lookups.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
    bootstrap_first_admin: bool,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("bootstrap_first_admin", &self.bootstrap_first_admin)
            .finish()
    }
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            hasher,
            validator: Arc::new(PasswordValidator::new(config)),
            encoder,
            bootstrap_first_admin: config.bootstrap_first_admin,
        }
    }

    /// Create an account. New users are engineers, except that the very
    /// first account becomes an admin when bootstrapping is enabled.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<User> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name is required"));
        }
        self.validator.validate(&req.password)?;

        let role = if self.bootstrap_first_admin && self.users.count().await? == 0 {
            UserRole::Admin
        } else {
            UserRole::default()
        };

        let password_hash = self.hash_password(req.password).await?;
        let user = self
            .users
            .create(&CreateUser {
                name: name.to_string(),
                email: req.email.trim().to_string(),
                password_hash,
                role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Exchange email and password for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            warn!("Login attempt for unknown email");
            return Err(AppError::authentication("invalid credentials"));
        };

        if !self
            .verify_password(user.password_hash.clone(), password.to_string())
            .await?
        {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::authentication("invalid credentials"));
        }

        let token = self.encoder.issue(user.id, user.role)?;
        info!(user_id = %user.id, "User logged in");
        Ok(LoginResult { token, user })
    }

    /// Hashes on the blocking pool, off the runtime workers.
    async fn hash_password(&self, password: String) -> AppResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Password hashing task failed", e)
            })?
    }

    async fn verify_password(&self, encoded: String, password: String) -> AppResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&encoded, &password))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Password verification task failed", e)
            })
    }

    /// The user behind an authenticated request.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }
}
