//! Request DTOs with validation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;
use defecthub_entity::project::CreateProject;
use defecthub_entity::user::UserRole;
use defecthub_service::{
    AdminUpdateUserRequest, CreateDefectRequest as SvcCreateDefect, RegisterRequest,
    UpdateDefectRequest as SvcUpdateDefect, UpdateProfileRequest as SvcUpdateProfile,
    UpdateProjectRequest as SvcUpdateProject,
};

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterBody {
    /// Display name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "invalid email"))]
    pub email: String,
    /// Plaintext password. The configured minimum length is checked by the service.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl From<RegisterBody> for RegisterRequest {
    fn from(body: RegisterBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            password: body.password,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Self-service profile update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
}

impl From<UpdateProfileRequest> for SvcUpdateProfile {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

/// Admin update of another user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdminUpdateRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
}

impl From<AdminUpdateRequest> for AdminUpdateUserRequest {
    fn from(req: AdminUpdateRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            role: req.role,
        }
    }
}

/// Create project request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name.
    #[validate(length(min = 1, max = 255, message = "name is required"))]
    pub name: String,
    /// Site address.
    #[serde(default)]
    pub address: String,
}

impl From<CreateProjectRequest> for CreateProject {
    fn from(req: CreateProjectRequest) -> Self {
        Self {
            name: req.name,
            address: req.address,
        }
    }
}

/// Partial project update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    /// New name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
}

impl From<UpdateProjectRequest> for SvcUpdateProject {
    fn from(req: UpdateProjectRequest) -> Self {
        Self {
            name: req.name,
            address: req.address,
        }
    }
}

/// Create defect request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDefectRequest {
    /// Short summary.
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Free-form severity.
    #[serde(default)]
    pub severity: String,
    /// Initial status, `open` when absent.
    pub status: Option<String>,
    /// Assigned user.
    pub assignee_id: Option<Uuid>,
    /// Due date in one of the accepted formats.
    pub due_date: Option<String>,
    /// Free-form priority.
    #[serde(default)]
    pub priority: String,
}

impl CreateDefectRequest {
    /// Convert into the service request, parsing the due date.
    pub fn into_service(self) -> AppResult<SvcCreateDefect> {
        Ok(SvcCreateDefect {
            title: self.title,
            description: self.description,
            severity: self.severity,
            status: self.status,
            assignee_id: self.assignee_id,
            due_date: parse_optional_due_date(self.due_date.as_deref())?,
            priority: self.priority,
        })
    }
}

/// Partial defect update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDefectRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New severity.
    pub severity: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New priority.
    pub priority: Option<String>,
    /// New assignee. `null` or absent leaves the assignee unchanged.
    pub assignee_id: Option<Uuid>,
    /// Remove the current assignee.
    #[serde(default)]
    pub clear_assignee: bool,
    /// New due date in one of the accepted formats.
    pub due_date: Option<String>,
}

impl UpdateDefectRequest {
    /// Convert into the service request, parsing the due date.
    pub fn into_service(self) -> AppResult<SvcUpdateDefect> {
        Ok(SvcUpdateDefect {
            title: self.title,
            description: self.description,
            severity: self.severity,
            status: self.status,
            priority: self.priority,
            assignee_id: self.assignee_id,
            clear_assignee: self.clear_assignee,
            due_date: parse_optional_due_date(self.due_date.as_deref())?,
        })
    }
}

/// Create comment request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment text.
    #[validate(length(min = 1, message = "body is required"))]
    pub body: String,
}

/// `?defect_id=` query string. Kept as text so that a malformed id gets
/// a precise message instead of a generic query rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefectIdQuery {
    /// Target defect.
    pub defect_id: Option<String>,
}

/// Parse a textual defect id. Blank input counts as absent.
pub fn parse_defect_id(raw: Option<&str>) -> AppResult<Option<Uuid>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| AppError::validation("invalid defect_id")),
    }
}

fn parse_optional_due_date(raw: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_due_date(s).map(Some),
    }
}

/// Parse a due date given as RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`
/// or `YYYY-MM-DD HH:MM:SS`. Zone-less values are taken as UTC.
pub fn parse_due_date(raw: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::validation("invalid due_date format"))
}
