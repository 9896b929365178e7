use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for stored users
///
/// Storage keeps insertion order. Email comparison is exact (case-sensitive).
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository {
    /// Append a user
    fn create(&mut self, user: User) -> UserResult<User>;

    /// Get a user by email
    fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// List users in insertion order
    fn list(&self) -> UserResult<Vec<User>>;

    /// Remove a user by ID, returning it if present
    fn remove(&mut self, id: u32) -> UserResult<Option<User>>;

    /// Check if an email already exists
    fn email_exists(&self, email: &str) -> UserResult<bool>;

    /// Count stored users
    fn count(&self) -> UserResult<usize>;
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Vec<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self { users: Vec::new() }
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create(&mut self, user: User) -> UserResult<User> {
        if self.users.iter().any(|u| u.id() == user.id()) {
            return Err(UserError::Internal(format!(
                "user id {} is already taken",
                user.id()
            )));
        }

        self.users.push(user.clone());

        tracing::debug!(user_id = user.id(), email = %user.email, "Stored user");
        Ok(user)
    }

    fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }

    fn list(&self) -> UserResult<Vec<User>> {
        Ok(self.users.clone())
    }

    fn remove(&mut self, id: u32) -> UserResult<Option<User>> {
        match self.users.iter().position(|u| u.id() == id) {
            Some(index) => {
                let removed = self.users.remove(index);
                tracing::debug!(user_id = id, "Removed user");
                Ok(Some(removed))
            }
            None => Ok(None),
        }
    }

    fn email_exists(&self, email: &str) -> UserResult<bool> {
        Ok(self.users.iter().any(|u| u.email == email))
    }

    fn count(&self) -> UserResult<usize> {
        Ok(self.users.len())
    }
}
