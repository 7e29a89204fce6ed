use crate::entities::{orders, prelude::*};
use crate::models::{Order, OrderFields};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use tracing::info;

/// Repository for service orders
pub struct OrderRepository {
    conn: DatabaseConnection,
}

impl OrderRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: orders::Model) -> Order {
        Order {
            id: m.id,
            fecha: m.fecha,
            cliente: m.cliente,
            contacto: m.contacto,
            equipo: m.equipo,
            marca: m.marca,
            modelo: m.modelo,
            falla: m.falla,
            diagnostico: m.diagnostico,
            trabajo: m.trabajo,
            estado: m.estado,
            tecnico_id: m.tecnico_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    pub async fn insert(&self, fields: OrderFields, tecnico_id: Option<i32>) -> Result<Order> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = orders::ActiveModel {
            fecha: Set(fields.fecha),
            cliente: Set(fields.cliente),
            contacto: Set(fields.contacto),
            equipo: Set(fields.equipo),
            marca: Set(fields.marca),
            modelo: Set(fields.modelo),
            falla: Set(fields.falla),
            diagnostico: Set(fields.diagnostico),
            trabajo: Set(fields.trabajo),
            estado: Set(fields.estado),
            tecnico_id: Set(tecnico_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert order")?;

        info!(order_id = model.id, tecnico_id = ?model.tecnico_id, "Order created");
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Order>> {
        let row = Orders::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query order")?;

        Ok(row.map(Self::map_model))
    }

    /// Newest first. `owner` restricts the listing to one technician.
    pub async fn list(&self, owner: Option<i32>) -> Result<Vec<Order>> {
        let mut query = Orders::find();
        if let Some(tecnico_id) = owner {
            query = query.filter(orders::Column::TecnicoId.eq(tecnico_id));
        }

        let rows = query
            .order_by_desc(orders::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list orders")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Overwrites every editable field. The owner is left untouched.
    pub async fn update(&self, id: i32, fields: OrderFields) -> Result<Option<Order>> {
        let Some(existing) = Orders::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: orders::ActiveModel = existing.into();
        active.fecha = Set(fields.fecha);
        active.cliente = Set(fields.cliente);
        active.contacto = Set(fields.contacto);
        active.equipo = Set(fields.equipo);
        active.marca = Set(fields.marca);
        active.modelo = Set(fields.modelo);
        active.falla = Set(fields.falla);
        active.diagnostico = Set(fields.diagnostico);
        active.trabajo = Set(fields.trabajo);
        active.estado = Set(fields.estado);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        self.save(active)
            .await
            .context("Failed to update order")
    }

    pub async fn set_status(&self, id: i32, estado: &str) -> Result<Option<Order>> {
        let Some(existing) = Orders::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: orders::ActiveModel = existing.into();
        active.estado = Set(estado.to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        self.save(active)
            .await
            .context("Failed to update order status")
    }

    /// A row deleted between lookup and write comes back as `None`.
    async fn save(&self, active: orders::ActiveModel) -> Result<Option<Order>, DbErr> {
        match active.update(&self.conn).await {
            Ok(model) => Ok(Some(Self::map_model(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Orders::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete order")?;

        Ok(result.rows_affected > 0)
    }
}
