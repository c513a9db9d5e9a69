//! Attachment download gate.

use uuid::Uuid;

use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;
use defecthub_entity::attachment::Attachment;
use defecthub_entity::user::UserRole;

/// Whether a requester may download `attachment`: its uploader may, as may
/// any privileged role (manager, admin, stakeholder).
pub fn can_access(requester_id: Uuid, requester_role: UserRole, attachment: &Attachment) -> bool {
    attachment.uploader_id == requester_id || requester_role.is_privileged()
}

/// [`can_access`] as a `Result`, denying with `forbidden`.
pub fn require_access(
    requester_id: Uuid,
    requester_role: UserRole,
    attachment: &Attachment,
) -> AppResult<()> {
    if can_access(requester_id, requester_role, attachment) {
        Ok(())
    } else {
        Err(AppError::authorization("forbidden"))
    }
}
