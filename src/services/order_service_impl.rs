//! `SeaORM` implementation of the `OrderService` trait.

use crate::db::Store;
use crate::models::{Actor, DEFAULT_STATUS, Order, OrderForm, Role};
use crate::policy::{self, Operation};
use crate::services::order_service::{OrderError, OrderService};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmOrderService {
    store: Store,
}

impl SeaOrmOrderService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn load(&self, id: i32) -> Result<Order, OrderError> {
        self.store
            .get_order(id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    fn authorize(actor: &Actor, operation: Operation, owner: Option<i32>) -> Result<(), OrderError> {
        if policy::permits(actor, operation, owner) {
            Ok(())
        } else {
            warn!(
                user_id = actor.id,
                operation = ?operation,
                owner = ?owner,
                "Denied order operation"
            );
            Err(OrderError::Forbidden)
        }
    }

    /// Picks the owner of a new order according to the actor's role.
    async fn resolve_owner(&self, actor: &Actor, form: &OrderForm) -> Result<Option<i32>, OrderError> {
        if actor.role == Role::Technician {
            return Ok(Some(actor.id));
        }

        let Some(tecnico_id) = form.technician_id().map_err(OrderError::Validation)? else {
            return Ok(None);
        };

        match self.store.get_user(tecnico_id).await? {
            Some(user) if user.role == Role::Technician => Ok(Some(user.id)),
            _ => Err(OrderError::Validation(format!(
                "El técnico {tecnico_id} no existe"
            ))),
        }
    }
}

#[async_trait]
impl OrderService for SeaOrmOrderService {
    async fn list(&self, actor: &Actor, query: &str) -> Result<Vec<Order>, OrderError> {
        let scope = policy::list_scope(actor);
        let orders = self.store.list_orders(scope.owner()).await?;

        Ok(orders.into_iter().filter(|o| o.matches(query)).collect())
    }

    async fn get(&self, actor: &Actor, id: i32) -> Result<Order, OrderError> {
        let order = self.load(id).await?;
        Self::authorize(actor, Operation::ViewOrder, order.tecnico_id)?;
        Ok(order)
    }

    async fn create(&self, actor: &Actor, form: &OrderForm) -> Result<Order, OrderError> {
        let fields = form.validate().map_err(OrderError::Validation)?;
        let owner = self.resolve_owner(actor, form).await?;
        Self::authorize(actor, Operation::CreateOrder, owner)?;

        let order = self.store.add_order(fields, owner).await?;

        metrics::counter!("orders_created_total", "role" => actor.role.as_str()).increment(1);
        info!(order_id = order.id, user_id = actor.id, "Order registered");
        Ok(order)
    }

    async fn update(
        &self,
        actor: &Actor,
        id: i32,
        form: &OrderForm,
    ) -> Result<Order, OrderError> {
        let existing = self.load(id).await?;
        Self::authorize(actor, Operation::EditOrder, existing.tecnico_id)?;

        let fields = form.validate().map_err(OrderError::Validation)?;
        let order = self
            .store
            .update_order(id, fields)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        info!(order_id = id, user_id = actor.id, "Order updated");
        Ok(order)
    }

    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), OrderError> {
        Self::authorize(actor, Operation::DeleteOrder, None)?;

        if !self.store.remove_order(id).await? {
            return Err(OrderError::NotFound(id));
        }

        info!(order_id = id, user_id = actor.id, "Order deleted");
        Ok(())
    }

    async fn change_status(
        &self,
        actor: &Actor,
        id: i32,
        estado: &str,
    ) -> Result<Order, OrderError> {
        let existing = self.load(id).await?;
        Self::authorize(actor, Operation::ChangeStatus, existing.tecnico_id)?;

        // Any value is accepted; only a blank one falls back to the default.
        let estado = if estado.trim().is_empty() {
            DEFAULT_STATUS
        } else {
            estado
        };

        let order = self
            .store
            .set_order_status(id, estado)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        info!(order_id = id, user_id = actor.id, estado = %order.estado, "Order status changed");
        Ok(order)
    }
}
