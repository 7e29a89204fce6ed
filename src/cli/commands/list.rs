//! List orders command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_orders(config: &Config, query: Option<&str>) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_url).await?;
    let query = query.unwrap_or_default().trim();

    let orders: Vec<_> = store
        .list_orders(None)
        .await?
        .into_iter()
        .filter(|order| order.matches(query))
        .collect();

    if orders.is_empty() {
        if query.is_empty() {
            println!("No service orders yet.");
        } else {
            println!("No service orders matching '{query}'");
        }
        return Ok(());
    }

    println!("Service Orders ({} total)", orders.len());
    println!("{:-<70}", "");

    for order in orders {
        let device = [
            Some(order.equipo.as_str()),
            order.marca.as_deref(),
            order.modelo.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
        let owner = order
            .tecnico_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());

        println!("#{} {} [{}]", order.id, order.cliente, order.estado);
        println!(
            "  Date: {} | Device: {} | Technician: {}",
            order.fecha, device, owner
        );
    }

    Ok(())
}
