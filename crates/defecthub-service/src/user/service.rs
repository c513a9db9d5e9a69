//! User self-service operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;
use defecthub_database::store::UserStore;
use defecthub_entity::user::User;

use crate::context::RequestContext;

/// Data for updating a user's own profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name (optional).
    pub name: Option<String>,
    /// New email (optional).
    pub email: Option<String>,
}

/// Handles user listing and self-service profile changes.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Every registered user.
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    /// The current user's profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }

    /// Change the current user's name or email.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        req: UpdateProfileRequest,
    ) -> AppResult<User> {
        let mut user = self.get_profile(ctx).await?;
        apply_profile_changes(&mut user, req.name, req.email)?;

        let user = self.users.update(&user).await?;
        info!(user_id = %ctx.user_id, "Profile updated");
        Ok(user)
    }
}

/// Apply optional name and email changes, rejecting blank values.
pub(crate) fn apply_profile_changes(
    user: &mut User,
    name: Option<String>,
    email: Option<String>,
) -> AppResult<()> {
    if let Some(name) = name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name cannot be empty"));
        }
        user.name = name.to_string();
    }
    if let Some(email) = email {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::validation("email cannot be empty"));
        }
        user.email = email.to_string();
    }
    Ok(())
}
