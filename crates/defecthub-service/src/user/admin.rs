//! Administrative user management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use defecthub_auth::rbac::{Action, RbacEnforcer};
use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;
use defecthub_database::store::UserStore;
use defecthub_entity::user::{User, UserRole};

use super::service::apply_profile_changes;
use crate::context::RequestContext;

/// Fields an admin may change on any account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminUpdateUserRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
}

/// Admin-only user operations.
#[derive(Clone)]
pub struct AdminUserService {
    users: Arc<dyn UserStore>,
    rbac: RbacEnforcer,
}

impl std::fmt::Debug for AdminUserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUserService").finish()
    }
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            rbac: RbacEnforcer::new(),
        }
    }

    /// Update another user's profile or role.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        req: AdminUpdateUserRequest,
    ) -> AppResult<User> {
        self.rbac.require(ctx.role, Action::ManageUsers)?;

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))?;

        apply_profile_changes(&mut user, req.name, req.email)?;
        if let Some(role) = req.role {
            user.role = role;
        }

        let user = self.users.update(&user).await?;
        info!(
            admin_id = %ctx.user_id,
            user_id = %user.id,
            role = %user.role,
            "User updated by admin"
        );
        Ok(user)
    }
}
