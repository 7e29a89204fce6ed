use serde::{Deserialize, Serialize};

use super::flash::FlashMessage;
use crate::models::{Actor, Order, Role, User};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl From<&Actor> for UserDto {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id,
            username: actor.username.clone(),
            role: actor.role,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderDto {
    pub id: i32,
    pub fecha: String,
    pub cliente: String,
    pub contacto: Option<String>,
    pub equipo: String,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub falla: Option<String>,
    pub diagnostico: String,
    pub trabajo: Option<String>,
    pub estado: String,
    pub tecnico_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            fecha: o.fecha,
            cliente: o.cliente,
            contacto: o.contacto,
            equipo: o.equipo,
            marca: o.marca,
            modelo: o.modelo,
            falla: o.falla,
            diagnostico: o.diagnostico,
            trabajo: o.trabajo,
            estado: o.estado,
            tecnico_id: o.tecnico_id,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

// ============================================================================
// Page views
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub flash: Vec<FlashMessage>,
    pub allow_registration: bool,
}

#[derive(Debug, Serialize)]
pub struct FormView {
    pub flash: Vec<FlashMessage>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub user: UserDto,
    pub q: String,
    pub orders: Vec<OrderDto>,
    pub flash: Vec<FlashMessage>,
    /// Required by the status-change form.
    pub csrf_token: String,
}

#[derive(Debug, Serialize)]
pub struct NewOrderView {
    pub user: UserDto,
    /// Assignment choices; empty for technicians.
    pub technicians: Vec<UserDto>,
    pub flash: Vec<FlashMessage>,
}

#[derive(Debug, Serialize)]
pub struct EditOrderView {
    pub user: UserDto,
    pub order: OrderDto,
    pub flash: Vec<FlashMessage>,
    pub csrf_token: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
    pub uptime_seconds: u64,
    pub version: String,
}

// ============================================================================
// Form payloads
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_omits_missing_parts() {
        let ok = serde_json::to_value(ApiResponse::success(FormView { flash: Vec::new() })).unwrap();
        assert_eq!(ok, serde_json::json!({ "success": true, "data": { "flash": [] } }));

        let err = serde_json::to_value(ApiResponse::<()>::error("Order 3 not found")).unwrap();
        assert_eq!(
            err,
            serde_json::json!({ "success": false, "error": "Order 3 not found" })
        );
    }

    #[test]
    fn test_user_dto_serializes_role_lowercase() {
        let actor = Actor {
            id: 7,
            username: "tech".to_string(),
            role: Role::Technician,
        };
        let value = serde_json::to_value(UserDto::from(&actor)).unwrap();
        assert_eq!(value["role"], "technician");
        assert_eq!(value["id"], 7);
    }
}
