//! Domain service for authentication and account management.
//!
//! Handles login, self-registration, technician creation by an admin and
//! password changes. Session binding itself lives in the API layer.

use crate::models::{Actor, User};
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user and wrong password are deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the matching user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails for any reason
    /// tied to the supplied credentials.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Resolves the user bound to a session, if it still exists.
    async fn current_user(&self, user_id: i32) -> Result<Option<User>, AuthError>;

    /// Public self-registration. Always creates a technician.
    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Admin-only technician account creation.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] for non-admin actors and
    /// [`AuthError::DuplicateUsername`] when the name is taken.
    async fn create_technician(
        &self,
        actor: &Actor,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError>;

    /// Changes the actor's own password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is incorrect
    /// or the new one is invalid.
    async fn change_password(
        &self,
        actor: &Actor,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Technicians available for order assignment.
    async fn list_technicians(&self) -> Result<Vec<User>, AuthError>;
}
