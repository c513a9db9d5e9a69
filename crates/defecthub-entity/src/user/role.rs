//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of roles a user can hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Files and works on defects. Default for self-registration.
    #[default]
    Engineer,
    /// Manages projects and defects.
    Manager,
    /// Full system administrator.
    Admin,
    /// Read-only observer with access to every attachment.
    Stakeholder,
}

impl UserRole {
    /// All roles, in declaration order.
    pub const ALL: [UserRole; 4] = [
        Self::Engineer,
        Self::Manager,
        Self::Admin,
        Self::Stakeholder,
    ];

    /// Roles in this set may read any attachment regardless of uploader.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::Manager | Self::Admin | Self::Stakeholder)
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engineer => "engineer",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Stakeholder => "stakeholder",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = defecthub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "engineer" => Ok(Self::Engineer),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            "stakeholder" => Ok(Self::Stakeholder),
            _ => Err(defecthub_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: engineer, manager, admin, stakeholder"
            ))),
        }
    }
}
