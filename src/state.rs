use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, OrderService, SeaOrmAuthService, SeaOrmOrderService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub order_service: Arc<dyn OrderService>,
}

impl SharedState {
    /// Connects to the store, applies migrations and makes sure the
    /// bootstrap admin exists.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        store
            .ensure_admin(&config.bootstrap, &config.security)
            .await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        let order_service = Arc::new(SeaOrmOrderService::new(store.clone()))
            as Arc<dyn OrderService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            auth_service,
            order_service,
        })
    }
}
