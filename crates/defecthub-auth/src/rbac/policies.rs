//! Which roles may perform which restricted actions.

use std::fmt;

use defecthub_entity::user::UserRole;

/// Operations restricted to a subset of roles. Anything not listed here is
/// open to every authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create a project.
    CreateProject,
    /// Rename or re-address a project.
    UpdateProject,
    /// File a defect.
    CreateDefect,
    /// Change a defect.
    UpdateDefect,
    /// Upload attachments to a defect.
    UploadAttachment,
    /// Change another user's profile or role.
    ManageUsers,
}

impl Action {
    /// Roles permitted to perform this action.
    pub fn allowed_roles(self) -> &'static [UserRole] {
        use UserRole::*;
        match self {
            Self::CreateProject | Self::UpdateProject => &[Manager, Admin],
            Self::CreateDefect | Self::UpdateDefect | Self::UploadAttachment => {
                &[Engineer, Manager, Admin]
            }
            Self::ManageUsers => &[Admin],
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateProject => "create_project",
            Self::UpdateProject => "update_project",
            Self::CreateDefect => "create_defect",
            Self::UpdateDefect => "update_defect",
            Self::UploadAttachment => "upload_attachment",
            Self::ManageUsers => "manage_users",
        };
        f.write_str(name)
    }
}
