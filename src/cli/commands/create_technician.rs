//! Create technician command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::User;
use crate::services::{AuthError, AuthService, SeaOrmAuthService};

pub async fn cmd_create_technician(
    config: &Config,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_url).await?;

    match create_technician(store, config, username, password).await {
        Ok(user) => {
            println!("✓ Created technician '{}' (ID: {})", user.username, user.id);
            Ok(())
        }
        Err(AuthError::DuplicateUsername(name)) => {
            println!("User '{name}' already exists.");
            Ok(())
        }
        Err(AuthError::Validation(_)) => {
            anyhow::bail!("Username and password must not be empty")
        }
        Err(e) => Err(e.into()),
    }
}

/// Same account rules as self-registration: trimmed input, technician role.
async fn create_technician(
    store: Store,
    config: &Config,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    SeaOrmAuthService::new(store, config.security.clone())
        .register(username, password)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[tokio::test]
    async fn test_padded_credentials_can_log_in() {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        let config = Config::default();

        let user = create_technician(store.clone(), &config, " carla ", " clave123 ")
            .await
            .unwrap();
        assert_eq!(user.username, "carla");
        assert_eq!(user.role, Role::Technician);

        let auth = SeaOrmAuthService::new(store.clone(), config.security.clone());
        assert!(auth.login("carla", "clave123").await.is_ok());

        let err = create_technician(store, &config, "carla", "otra-clave")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername(_)));
    }
}
