use crate::config::{BootstrapConfig, SecurityConfig};
use crate::models::{Order, OrderFields, Role, User};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::NewUser;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

fn is_in_memory(db_url: &str) -> bool {
    let path = db_url.trim_start_matches("sqlite:");
    path == ":memory:" || db_url.contains("mode=memory")
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if db_url.starts_with("sqlite:") && !is_in_memory(db_url) {
            let path_str = db_url
                .trim_start_matches("sqlite:")
                .trim_start_matches("//")
                .split('?')
                .next()
                .unwrap_or_default();
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn order_repo(&self) -> repositories::order::OrderRepository {
        repositories::order::OrderRepository::new(self.conn.clone())
    }

    /// Creates the bootstrap admin account when it does not exist yet.
    /// Returns whether an account was created.
    pub async fn ensure_admin(
        &self,
        bootstrap: &BootstrapConfig,
        security: &SecurityConfig,
    ) -> Result<bool> {
        let username = bootstrap.admin_username.trim();

        if let Some(existing) = self.get_user_by_username(username).await? {
            if existing.role != Role::Admin {
                tracing::warn!(
                    "Bootstrap account '{username}' exists but is not an admin; leaving it unchanged"
                );
            }
            return Ok(false);
        }

        match self
            .create_user(
                username,
                bootstrap.admin_password.trim(),
                Role::Admin,
                security,
            )
            .await?
        {
            NewUser::Created(_) => {
                info!("Created bootstrap admin account '{username}'");
                Ok(true)
            }
            NewUser::UsernameTaken => Ok(false),
        }
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<NewUser> {
        self.user_repo()
            .create(username, password, role, security)
            .await
    }

    pub async fn verify_user_password(&self, user_id: i32, password: &str) -> Result<bool> {
        self.user_repo().verify_password(user_id, password).await
    }

    pub async fn update_user_password(
        &self,
        user_id: i32,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(user_id, new_password, security)
            .await
    }

    pub async fn list_technicians(&self) -> Result<Vec<User>> {
        self.user_repo().list_by_role(Role::Technician).await
    }

    pub async fn add_order(&self, fields: OrderFields, tecnico_id: Option<i32>) -> Result<Order> {
        self.order_repo().insert(fields, tecnico_id).await
    }

    pub async fn get_order(&self, id: i32) -> Result<Option<Order>> {
        self.order_repo().get(id).await
    }

    pub async fn list_orders(&self, owner: Option<i32>) -> Result<Vec<Order>> {
        self.order_repo().list(owner).await
    }

    pub async fn update_order(&self, id: i32, fields: OrderFields) -> Result<Option<Order>> {
        self.order_repo().update(id, fields).await
    }

    pub async fn set_order_status(&self, id: i32, estado: &str) -> Result<Option<Order>> {
        self.order_repo().set_status(id, estado).await
    }

    pub async fn remove_order(&self, id: i32) -> Result<bool> {
        self.order_repo().remove(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:test?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:data/taller.db"));
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        let bootstrap = BootstrapConfig::default();
        let security = SecurityConfig::default();

        assert!(store.ensure_admin(&bootstrap, &security).await.unwrap());
        assert!(!store.ensure_admin(&bootstrap, &security).await.unwrap());

        let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(store.verify_user_password(admin.id, "admin123").await.unwrap());
        assert!(store.list_technicians().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_admin_trims_configured_password() {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        let bootstrap = BootstrapConfig {
            admin_username: " jefe ".to_string(),
            admin_password: " cambiame1 ".to_string(),
        };

        assert!(
            store
                .ensure_admin(&bootstrap, &SecurityConfig::default())
                .await
                .unwrap()
        );

        let admin = store.get_user_by_username("jefe").await.unwrap().unwrap();
        assert!(store.verify_user_password(admin.id, "cambiame1").await.unwrap());
    }
}
