use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::fmt;

use super::ApiResponse;
use super::flash::{FlashMessage, redirect_with};
use crate::models::Actor;
use crate::services::{AuthError, OrderError};

pub const LOGIN_PATH: &str = "/";

const NOT_AUTHORIZED: &str = "No autorizado";
const INVALID_CREDENTIALS: &str = "Usuario o contraseña incorrectos";

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    /// Bad form input; the browser is sent back to `redirect_to`.
    ValidationError { message: String, redirect_to: String },

    Conflict { message: String, redirect_to: String },

    /// No authenticated session.
    Unauthorized(String),

    InvalidCredentials,

    /// Authenticated but denied; `home` is the caller's own dashboard.
    Forbidden { home: &'static str, message: String },

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError { message, .. } => {
                write!(f, "Validation error: {}", message)
            }
            ApiError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::Forbidden { message, .. } => write!(f, "Forbidden: {}", message),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ValidationError {
                message,
                redirect_to,
            }
            | ApiError::Conflict {
                message,
                redirect_to,
            } => redirect_with(&redirect_to, FlashMessage::error(message)),
            ApiError::Forbidden { home, message } => {
                redirect_with(home, FlashMessage::error(message))
            }
            ApiError::InvalidCredentials => {
                redirect_with(LOGIN_PATH, FlashMessage::error(INVALID_CREDENTIALS))
            }
            ApiError::Unauthorized(msg) => {
                tracing::debug!("Redirecting to login: {}", msg);
                Redirect::to(LOGIN_PATH).into_response()
            }
            ApiError::NotFound(msg) => {
                let body = ApiResponse::<()>::error(msg);
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                let body = ApiResponse::<()>::error("A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                let body = ApiResponse::<()>::error("An internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl ApiError {
    pub fn order_not_found(id: i32) -> Self {
        ApiError::NotFound(format!("Order {} not found", id))
    }

    pub fn forbidden(actor: &Actor) -> Self {
        ApiError::Forbidden {
            home: actor.dashboard_path(),
            message: NOT_AUTHORIZED.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            redirect_to: redirect_to.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }

    /// Maps an order failure; validation errors return to `form_path`.
    pub fn from_order(err: OrderError, actor: &Actor, form_path: &str) -> Self {
        match err {
            OrderError::NotFound(id) => Self::order_not_found(id),
            OrderError::Forbidden => Self::forbidden(actor),
            OrderError::Validation(msg) => Self::validation(msg, form_path),
            OrderError::Database(msg) => ApiError::DatabaseError(msg),
            OrderError::Internal(msg) => ApiError::InternalError(msg),
        }
    }

    /// Maps an account failure; form errors return to `form_path`.
    pub fn from_auth(err: AuthError, actor: Option<&Actor>, form_path: &str) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::DuplicateUsername(_) => ApiError::Conflict {
                message: "El usuario ya existe".to_string(),
                redirect_to: form_path.to_string(),
            },
            AuthError::Validation(msg) => Self::validation(msg, form_path),
            AuthError::Forbidden => actor.map_or_else(
                || ApiError::Unauthorized("Not authenticated".to_string()),
                Self::forbidden,
            ),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}
