//! Domain service for the service-order lifecycle.
//!
//! Every operation takes the acting user and consults the authorization
//! policy before reading or writing orders.

use crate::models::{Actor, Order, OrderForm};
use thiserror::Error;

/// Errors specific to order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(i32),

    #[error("Forbidden")]
    Forbidden,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for OrderError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for OrderError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait OrderService: Send + Sync {
    /// Orders visible to the actor, newest first, filtered by `query`.
    async fn list(&self, actor: &Actor, query: &str) -> Result<Vec<Order>, OrderError>;

    /// Loads a single order the actor may edit.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotFound`] before any ownership check.
    async fn get(&self, actor: &Actor, id: i32) -> Result<Order, OrderError>;

    /// Creates an order. Technicians always own what they create; admins
    /// assign the technician selected in the form, or nobody.
    async fn create(&self, actor: &Actor, form: &OrderForm) -> Result<Order, OrderError>;

    /// Rewrites the editable fields of an order. Ownership never changes.
    async fn update(&self, actor: &Actor, id: i32, form: &OrderForm)
    -> Result<Order, OrderError>;

    /// Admin-only removal.
    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), OrderError>;

    /// Sets `estado` to any caller-supplied value.
    async fn change_status(&self, actor: &Actor, id: i32, estado: &str)
    -> Result<Order, OrderError>;
}
