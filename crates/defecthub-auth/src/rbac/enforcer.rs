//! RBAC enforcement.

use tracing::debug;

use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;
use defecthub_entity::user::UserRole;

use super::policies::Action;

/// Checks a caller's role against an [`Action`]'s requirements.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Whether `role` may perform `action`.
    pub fn is_allowed(&self, role: UserRole, action: Action) -> bool {
        action.allowed_roles().contains(&role)
    }

    /// Fail with `forbidden` unless `role` may perform `action`.
    pub fn require(&self, role: UserRole, action: Action) -> AppResult<()> {
        if self.is_allowed(role, action) {
            Ok(())
        } else {
            debug!(%role, %action, "Role check denied");
            Err(AppError::authorization("forbidden"))
        }
    }
}
