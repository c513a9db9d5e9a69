//! Password policy for new credentials.

use defecthub_core::config::AuthConfig;
use defecthub_core::error::AppError;
use defecthub_core::result::AppResult;

/// Enforces the configured minimum password length.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Reject passwords shorter than the minimum, counted in characters.
    pub fn validate(&self, password: &str) -> AppResult<()> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "password must be at least {} characters",
                self.min_length
            )));
        }
        Ok(())
    }
}
