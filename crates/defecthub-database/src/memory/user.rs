use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use defecthub_core::AppError;
use defecthub_core::result::AppResult;
use defecthub_entity::user::{CreateUser, User};

use crate::store::UserStore;

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, User>,
    /// Lowercased email to user id; enforces case-insensitive uniqueness.
    emails: DashMap<String, Uuid>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(email: &str) -> AppError {
    AppError::conflict(format!("Email '{email}' is already registered"))
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let id = Uuid::new_v4();
        match self.emails.entry(data.email.to_lowercase()) {
            Entry::Occupied(_) => return Err(email_taken(&data.email)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = Utc::now();
        let user = User {
            id,
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.emails.get(&email.to_lowercase()).map(|e| *e) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let previous_email = self
            .users
            .get(&user.id)
            .map(|u| u.email.to_lowercase())
            .ok_or_else(|| AppError::not_found("user not found"))?;

        let new_email = user.email.to_lowercase();
        if new_email != previous_email {
            match self.emails.entry(new_email) {
                Entry::Occupied(_) => return Err(email_taken(&user.email)),
                Entry::Vacant(slot) => {
                    slot.insert(user.id);
                }
            }
            self.emails.remove(&previous_email);
        }

        let mut stored = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::not_found("user not found"))?;
        stored.name = user.name.clone();
        stored.email = user.email.clone();
        stored.role = user.role;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.len() as u64)
    }
}
