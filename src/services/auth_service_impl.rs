//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{NewUser, Store};
use crate::models::{Actor, Role, User};
use crate::policy::{self, Operation};
use crate::services::auth_service::{AuthError, AuthService};
use async_trait::async_trait;
use tracing::{info, warn};

const MIN_PASSWORD_LEN: usize = 8;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    async fn create_account(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Debe completar todos los campos".to_string(),
            ));
        }

        match self
            .store
            .create_user(username, password, role, &self.security)
            .await?
        {
            NewUser::Created(user) => {
                info!(user_id = user.id, role = %user.role, "Created account '{}'", user.username);
                Ok(user)
            }
            NewUser::UsernameTaken => Err(AuthError::DuplicateUsername(username.to_string())),
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        let password = password.trim();

        let Some(user) = self.store.get_user_by_username(username).await? else {
            metrics::counter!("logins_total", "outcome" => "rejected").increment(1);
            return Err(AuthError::InvalidCredentials);
        };

        if !self.store.verify_user_password(user.id, password).await? {
            warn!(user_id = user.id, "Rejected login attempt");
            metrics::counter!("logins_total", "outcome" => "rejected").increment(1);
            return Err(AuthError::InvalidCredentials);
        }

        metrics::counter!("logins_total", "outcome" => "accepted").increment(1);
        info!(user_id = user.id, "User '{}' logged in", user.username);
        Ok(user)
    }

    async fn current_user(&self, user_id: i32) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(user_id).await?)
    }

    async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        self.create_account(username, password, Role::Technician)
            .await
    }

    async fn create_technician(
        &self,
        actor: &Actor,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if !policy::permits(actor, Operation::CreateTechnician, None) {
            return Err(AuthError::Forbidden);
        }

        self.create_account(username, password, Role::Technician)
            .await
    }

    async fn change_password(
        &self,
        actor: &Actor,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        // Login trims, so stored passwords must never carry edge whitespace.
        let current_password = current_password.trim();
        let new_password = new_password.trim();

        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "La nueva contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"
            )));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "La nueva contraseña debe ser distinta de la actual".to_string(),
            ));
        }

        if !self
            .store
            .verify_user_password(actor.id, current_password)
            .await?
        {
            return Err(AuthError::Validation(
                "La contraseña actual es incorrecta".to_string(),
            ));
        }

        self.store
            .update_user_password(actor.id, new_password, &self.security)
            .await?;

        info!(user_id = actor.id, "Password changed");
        Ok(())
    }

    async fn list_technicians(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.store.list_technicians().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;

    async fn service() -> (Store, SeaOrmAuthService) {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        store
            .ensure_admin(&BootstrapConfig::default(), &SecurityConfig::default())
            .await
            .unwrap();
        let service = SeaOrmAuthService::new(store.clone(), SecurityConfig::default());
        (store, service)
    }

    #[tokio::test]
    async fn test_login_does_not_reveal_which_part_failed() {
        let (_store, service) = service().await;

        let unknown = service.login("nobody", "admin123").await.unwrap_err();
        let wrong = service.login("admin", "nope").await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());

        let admin = service.login(" admin ", "admin123").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_register_creates_technician_and_rejects_duplicates() {
        let (store, service) = service().await;

        let user = service.register("  ana ", "clave-segura").await.unwrap();
        assert_eq!(user.username, "ana");
        assert_eq!(user.role, Role::Technician);

        let err = service.register("ana", "otra-clave").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername(_)));
        assert_eq!(store.list_technicians().await.unwrap().len(), 1);

        let err = service.register("   ", "x").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_after_store_level_creation_with_padded_password() {
        let (store, service) = service().await;
        store
            .create_user("carla", " clave123 ", Role::Technician, &SecurityConfig::default())
            .await
            .unwrap();

        assert!(service.login("carla", " clave123 ").await.is_ok());
        assert!(service.login("carla", "clave123").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_technician_requires_admin() {
        let (store, service) = service().await;
        let admin = Actor::from(&store.get_user_by_username("admin").await.unwrap().unwrap());

        let tech = service
            .create_technician(&admin, "carlos", "password1")
            .await
            .unwrap();
        let tech_actor = Actor::from(&tech);

        let err = service
            .create_technician(&tech_actor, "intruso", "password1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));
        assert!(store.get_user_by_username("intruso").await.unwrap().is_none());

        let err = service
            .create_technician(&admin, "admin", "password1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername(_)));
    }

    #[tokio::test]
    async fn test_change_password_rules() {
        let (store, service) = service().await;
        let admin = Actor::from(&store.get_user_by_username("admin").await.unwrap().unwrap());

        assert!(matches!(
            service.change_password(&admin, "admin123", "short").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            service.change_password(&admin, "admin123", "admin123").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            service.change_password(&admin, "wrong-pass", "brand-new-pass").await,
            Err(AuthError::Validation(_))
        ));

        service
            .change_password(&admin, "admin123", "brand-new-pass")
            .await
            .unwrap();
        assert!(service.login("admin", "brand-new-pass").await.is_ok());
        assert!(service.login("admin", "admin123").await.is_err());
    }
}
